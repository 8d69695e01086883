//! RTW renderer - parallel CPU path tracing.
//!
//! A Monte Carlo path tracer that renders one pool task per pixel into a
//! shared RGB frame buffer.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rtw_renderer::{random_scene, save_ppm, RenderSettings, Renderer};
//!
//! let renderer = Renderer::new(RenderSettings::default())?;
//! let scene = Arc::new(random_scene(&mut rand::thread_rng())?);
//! renderer.render(scene, renderer.camera())?;
//! save_ppm("output.ppm", &renderer.frame())?;
//! # Ok::<(), rtw_renderer::RenderError>(())
//! ```

mod camera;
mod control;
mod error;
mod frame;
mod hittable;
mod material;
mod ppm;
pub mod random;
mod renderer;
mod scene;
mod settings;
mod sphere;
mod thread_pool;

pub use camera::{Camera, CameraSettings};
pub use control::{RenderCommand, RenderControl, RenderState};
pub use error::{RenderError, RenderResult};
pub use frame::FrameBuffer;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Lambertian, Material, MaterialId, Metal, ScatterResult};
pub use ppm::{save_ppm, write_ppm};
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render_pixel, sky_gradient, RenderOutcome,
    Renderer, SHADOW_ACNE_EPSILON,
};
pub use scene::{random_scene, Scene};
pub use settings::RenderSettings;
pub use sphere::Sphere;
pub use thread_pool::{TaskHandle, ThreadPool};

/// Re-export common math types from rtw_math
pub use rtw_math::{Interval, Ray, Vec3};
