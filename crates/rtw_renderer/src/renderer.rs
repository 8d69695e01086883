//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//! - One pool task per pixel, writing straight into a shared frame buffer

use crate::random::gen_f32;
use crate::{
    Camera, Color, FrameBuffer, HitRecord, RenderControl, RenderCommand, RenderError,
    RenderResult, RenderSettings, RenderState, Scene, ThreadPool,
};
use rand::RngCore;
use rtw_math::{Interval, Ray};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Lower bound of the hit interval; avoids re-hitting the surface a ray starts on.
pub const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating attenuation.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, rng: &mut dyn RngCore) -> Color {
    // Bounce budget exhausted: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !scene.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY), &mut rec) {
        return sky_gradient(ray);
    }

    // Scene::add only accepts ids the scene owns, so the lookup resolves
    let scattered = scene
        .material(rec.material)
        .and_then(|material| material.scatter(ray, &rec, rng));
    match scattered {
        Some(result) => {
            result.attenuation * ray_color(&result.scattered, scene, depth - 1, rng)
        }
        // Absorbed
        None => Color::ZERO,
    }
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an averaged linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 0.999);
    let to_byte = |c: f32| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// Render a single pixel with multi-sampling and return the averaged color.
///
/// `(x, y)` has its origin at the lower-left corner of the image.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    // Keep 1-pixel-wide images finite
    let u_span = settings.width.saturating_sub(1).max(1) as f32;
    let v_span = settings.height.saturating_sub(1).max(1) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..settings.samples_per_pixel {
        let u = (x as f32 + gen_f32(rng)) / u_span;
        let v = (y as f32 + gen_f32(rng)) / v_span;
        let ray = camera.get_ray(u, v);
        pixel_color += ray_color(&ray, scene, settings.max_depth, rng);
    }

    pixel_color / settings.samples_per_pixel as f32
}

/// How a render pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every pixel was written.
    Completed { pixels: usize },
    /// A stop was requested; only `rendered` of `total` pixels were written.
    Cancelled { rendered: usize, total: usize },
}

/// Frame orchestrator: owns the worker pool and the frame buffer.
pub struct Renderer {
    settings: RenderSettings,
    pool: ThreadPool,
    frame: Arc<FrameBuffer>,
    control: RenderControl,
}

impl Renderer {
    /// Validate settings, start the worker pool and allocate the frame.
    pub fn new(settings: RenderSettings) -> RenderResult<Self> {
        settings.validate()?;
        let pool = ThreadPool::new(settings.threads)?;
        let frame = Arc::new(FrameBuffer::new(settings.width, settings.height));

        Ok(Self {
            settings,
            pool,
            frame,
            control: RenderControl::new(),
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// The shared output buffer, for presentation.
    pub fn frame(&self) -> Arc<FrameBuffer> {
        Arc::clone(&self.frame)
    }

    /// Handle for sending stop requests from another thread.
    pub fn control(&self) -> RenderControl {
        self.control.clone()
    }

    pub fn state(&self) -> RenderState {
        self.control.state()
    }

    /// Camera described by the current settings.
    pub fn camera(&self) -> Camera {
        Camera::from_settings(&self.settings.camera, self.settings.aspect_ratio())
    }

    /// Render one pass on the calling thread, blocking until every pixel task
    /// has finished.
    pub fn render(&self, scene: Arc<Scene>, camera: Camera) -> RenderResult<RenderOutcome> {
        self.control.begin()?;
        self.run_pass(scene, camera)
    }

    /// Start a pass on a background thread and return immediately.
    ///
    /// The frame buffer fills in while the pass runs; join the handle to get
    /// the outcome.
    pub fn spawn_render(
        self: &Arc<Self>,
        scene: Arc<Scene>,
        camera: Camera,
    ) -> RenderResult<JoinHandle<RenderResult<RenderOutcome>>> {
        self.control.begin()?;

        let renderer = Arc::clone(self);
        thread::Builder::new()
            .name("rtw-render".to_string())
            .spawn(move || renderer.run_pass(scene, camera))
            .map_err(|err| {
                self.control.finish();
                RenderError::Io(err)
            })
    }

    /// Apply a front-end command.
    ///
    /// `Start` spawns a background pass over `scene` with the settings camera
    /// and returns its handle; `Stop` asks a running pass to wind down.
    pub fn handle_command(
        self: &Arc<Self>,
        command: RenderCommand,
        scene: &Arc<Scene>,
    ) -> RenderResult<Option<JoinHandle<RenderResult<RenderOutcome>>>> {
        match command {
            RenderCommand::Start => self
                .spawn_render(Arc::clone(scene), self.camera())
                .map(Some),
            RenderCommand::Stop => {
                self.control.request_stop();
                Ok(None)
            }
        }
    }

    fn run_pass(&self, scene: Arc<Scene>, camera: Camera) -> RenderResult<RenderOutcome> {
        let result = self.dispatch_pixels(scene, camera);
        self.control.finish();
        result
    }

    fn dispatch_pixels(&self, scene: Arc<Scene>, camera: Camera) -> RenderResult<RenderOutcome> {
        let start = Instant::now();
        let settings = self.settings;
        let total = settings.pixel_count();

        self.frame.clear();
        log::info!(
            "Rendering {}x{} @ {} spp, depth {}, {} workers",
            settings.width,
            settings.height,
            settings.samples_per_pixel,
            settings.max_depth,
            self.pool.workers()
        );

        let camera = Arc::new(camera);
        let mut handles = Vec::with_capacity(total);

        // Top row first, so a progressive viewer fills in from the top
        for y in (0..settings.height).rev() {
            for x in 0..settings.width {
                let camera = Arc::clone(&camera);
                let scene = Arc::clone(&scene);
                let frame = Arc::clone(&self.frame);
                let control = self.control.clone();

                handles.push(self.pool.submit(move || {
                    if control.is_stop_requested() {
                        return false;
                    }
                    let mut rng = rand::thread_rng();
                    let color = render_pixel(&camera, &scene, x, y, &settings, &mut rng);
                    // A stop that arrived mid-pixel discards the result
                    if control.is_stop_requested() {
                        return false;
                    }
                    frame.write_pixel(x, y, color_to_rgb(color));
                    true
                }));
            }
        }

        // Completion barrier
        let mut rendered = 0;
        let mut first_error = None;
        for handle in handles {
            match handle.wait() {
                Ok(true) => rendered += 1,
                Ok(false) => {}
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        let elapsed = start.elapsed();
        if rendered == total {
            log::info!("Rendered {} pixels in {:?}", total, elapsed);
            Ok(RenderOutcome::Completed { pixels: total })
        } else {
            log::warn!(
                "Render cancelled after {:?}: {}/{} pixels written",
                elapsed,
                rendered,
                total
            );
            Ok(RenderOutcome::Cancelled { rendered, total })
        }
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("settings", &self.settings)
            .field("pool", &self.pool)
            .field("state", &self.control.state())
            .finish()
    }
}
