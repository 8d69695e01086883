//! Camera for ray generation.

use crate::{RenderError, RenderResult};
use rtw_math::{Ray, Vec3};
use serde::{Deserialize, Serialize};

/// User-facing camera placement, resolved into a [`Camera`] per render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(13.0, 2.0, 3.0),
            look_at: Vec3::ZERO,
            vup: Vec3::Y,
            vfov: 25.0,
        }
    }
}

impl CameraSettings {
    /// Reject placements that leave the camera basis undefined.
    pub fn validate(&self) -> RenderResult<()> {
        let view = self.look_from - self.look_at;
        if !(view.length_squared() > f32::EPSILON) {
            return Err(RenderError::InvalidSettings(
                "camera look_from and look_at must differ".to_string(),
            ));
        }
        let side = self.vup.normalize_or_zero().cross(view.normalize());
        if !(side.length_squared() > f32::EPSILON) {
            return Err(RenderError::InvalidSettings(
                "camera vup must not be parallel to the view direction".to_string(),
            ));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(RenderError::InvalidSettings(format!(
                "camera vfov must be between 0 and 180 degrees, got {}",
                self.vfov
            )));
        }
        Ok(())
    }
}

/// Pinhole camera mapping image-plane coordinates to world rays.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Build a camera.
    ///
    /// - `vfov`: vertical field of view in degrees
    /// - `aspect_ratio`: image width / height
    pub fn new(look_from: Vec3, look_at: Vec3, vup: Vec3, vfov: f32, aspect_ratio: f32) -> Self {
        let theta = vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Orthonormal camera basis
        let w = (look_from - look_at).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = look_from;
        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
        }
    }

    /// Build a camera from settings for an image of the given aspect ratio.
    pub fn from_settings(settings: &CameraSettings, aspect_ratio: f32) -> Self {
        Self::new(
            settings.look_from,
            settings.look_at,
            settings.vup,
            settings.vfov,
            aspect_ratio,
        )
    }

    /// Ray through the image plane at (s, t), both in [0, 1] from the lower-left corner.
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        Ray::new(
            self.origin,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin,
        )
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_camera() -> Camera {
        Camera::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 90.0, 1.0)
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let ray = forward_camera().get_ray(0.5, 0.5);

        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((ray.direction() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_corner_rays_span_viewport() {
        let camera = forward_camera();

        // 90 degree fov at unit focal distance spans [-1, 1] in both axes
        let lower_left = camera.get_ray(0.0, 0.0).direction();
        let upper_right = camera.get_ray(1.0, 1.0).direction();

        assert!((lower_left - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);
        assert!((upper_right - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_aspect_ratio_widens_horizontal_span() {
        let camera = Camera::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 90.0, 2.0);
        let right_edge = camera.get_ray(1.0, 0.5).direction();

        assert!((right_edge - Vec3::new(2.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_default_settings_look_at_origin() {
        let settings = CameraSettings::default();
        let camera = Camera::from_settings(&settings, 16.0 / 9.0);
        let center = camera.get_ray(0.5, 0.5);

        assert_eq!(camera.origin(), Vec3::new(13.0, 2.0, 3.0));
        let toward_target = (settings.look_at - settings.look_from).normalize();
        assert!((center.direction().normalize() - toward_target).length() < 1e-4);
    }

    #[test]
    fn test_degenerate_placement_rejected() {
        assert!(CameraSettings::default().validate().is_ok());

        let same_point = CameraSettings {
            look_at: Vec3::new(13.0, 2.0, 3.0),
            ..CameraSettings::default()
        };
        let up_along_view = CameraSettings {
            look_from: Vec3::new(0.0, 5.0, 0.0),
            look_at: Vec3::ZERO,
            ..CameraSettings::default()
        };
        let no_up = CameraSettings {
            vup: Vec3::ZERO,
            ..CameraSettings::default()
        };
        let flat_fov = CameraSettings {
            vfov: 180.0,
            ..CameraSettings::default()
        };

        for settings in [same_point, up_along_view, no_up, flat_fov] {
            assert!(
                matches!(settings.validate(), Err(RenderError::InvalidSettings(_))),
                "{settings:?} should be rejected"
            );
        }
    }
}
