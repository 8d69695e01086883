//! Surface materials.
//!
//! The set of materials is closed, so dispatch is a `match` on [`Material`]
//! rather than a trait object. Materials live in the scene arena and are
//! referenced from geometry through [`MaterialId`].

use crate::hittable::HitRecord;
use crate::random::{gen_f32, random_in_unit_sphere, random_unit_vector};
use rand::RngCore;
use rtw_math::{near_zero, reflect, refract, Ray, Vec3};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Index of a material inside a [`Scene`](crate::Scene).
///
/// Only [`Scene::add_material`](crate::Scene::add_material) hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) usize);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Outcome of a successful scatter event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel energy retained by the bounce
    pub attenuation: Color,
    /// The continuation ray
    pub scattered: Ray,
}

/// A surface material.
#[derive(Debug, Clone)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let direction = lambertian_direction(rec.normal, random_unit_vector(rng));
        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Diffuse bounce direction: `normal + random_vec`, or the normal itself when
/// the two nearly cancel.
fn lambertian_direction(normal: Vec3, random_vec: Vec3) -> Vec3 {
    let direction = normal + random_vec;
    if near_zero(direction) {
        normal
    } else {
        direction
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push the reflection below the surface; those rays are absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    ///
    /// [`Scene::add_material`](crate::Scene::add_material) rejects a
    /// non-positive `ior`.
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    pub fn ior(&self) -> f32 {
        self.ior
    }

    /// Schlick's approximation for reflectance
    pub fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    /// Snell's law has no solution: the ray must reflect.
    pub fn total_internal_reflection(refraction_ratio: f32, cos_theta: f32) -> bool {
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
        refraction_ratio * sin_theta > 1.0
    }

    fn refraction_ratio(&self, front_face: bool) -> f32 {
        if front_face {
            1.0 / self.ior
        } else {
            self.ior
        }
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = self.refraction_ratio(rec.front_face);

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);

        let direction = if Self::total_internal_reflection(refraction_ratio, cos_theta)
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        // Glass absorbs nothing
        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn front_hit(normal: Vec3) -> HitRecord {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            t: 1.0,
            front_face: true,
            material: MaterialId(0),
        }
    }

    #[test]
    fn test_lambertian_never_degenerate() {
        let material = Material::from(Lambertian::new(Color::splat(0.5)));
        let rec = front_hit(Vec3::Y);
        let ray = Ray::new(Vec3::Y, Vec3::NEG_Y);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..10_000 {
            let result = material
                .scatter(&ray, &rec, &mut rng)
                .expect("diffuse surfaces always scatter");
            assert!(!near_zero(result.scattered.direction()));
            assert_eq!(result.attenuation, Color::splat(0.5));
        }
    }

    #[test]
    fn test_lambertian_cancelling_sample_falls_back_to_normal() {
        let normal = Vec3::new(0.0, 0.6, 0.8);

        assert_eq!(lambertian_direction(normal, -normal), normal);
        // Nearly opposite but still above the epsilon keeps the sum
        let offset = Vec3::new(1e-3, 0.0, 0.0);
        assert_eq!(lambertian_direction(normal, offset - normal), normal + (offset - normal));
        assert_eq!(lambertian_direction(normal, Vec3::X), normal + Vec3::X);
    }

    #[test]
    fn test_metal_fuzz_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz(), 0.0);
        assert_eq!(Metal::new(Color::ONE, 0.3).fuzz(), 0.3);
    }

    #[test]
    fn test_metal_without_fuzz_reflects_exactly() {
        let material = Material::from(Metal::new(Color::new(0.8, 0.6, 0.2), 0.0));
        let rec = front_hit(Vec3::Y);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(2.0, -1.0, 0.5));
        let mut rng = StdRng::seed_from_u64(3);

        let result = material.scatter(&ray, &rec, &mut rng).expect("should reflect");
        let expected = reflect(ray.direction().normalize(), rec.normal);

        assert_eq!(result.scattered.direction(), expected);
        assert_eq!(result.scattered.origin(), rec.p);
        assert_eq!(result.attenuation, Color::new(0.8, 0.6, 0.2));
    }

    #[test]
    fn test_metal_absorbs_below_surface() {
        // A grazing ray reflected with full fuzz sometimes ends up below the
        // surface; every returned scatter must point away from it.
        let material = Material::from(Metal::new(Color::ONE, 1.0));
        let rec = front_hit(Vec3::Y);
        let ray = Ray::new(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));
        let mut rng = StdRng::seed_from_u64(11);

        let mut absorbed = 0;
        for _ in 0..1000 {
            match material.scatter(&ray, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(rec.normal) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_dielectric_normal_incidence_never_tir() {
        let glass = Dielectric::new(1.5);

        // Entering and leaving the glass head on
        assert!(!Dielectric::total_internal_reflection(glass.refraction_ratio(true), 1.0));
        assert!(!Dielectric::total_internal_reflection(glass.refraction_ratio(false), 1.0));
    }

    #[test]
    fn test_dielectric_grazing_exit_is_tir() {
        let glass = Dielectric::new(1.5);
        // Leaving glass at a shallow angle: 1.5 * sin(theta) > 1
        assert!(Dielectric::total_internal_reflection(glass.refraction_ratio(false), 0.1));
    }

    #[test]
    fn test_dielectric_always_scatters_white() {
        let material = Material::from(Dielectric::new(1.5));
        let rec = front_hit(Vec3::Y);
        let ray = Ray::new(Vec3::Y, Vec3::NEG_Y);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).expect("glass never absorbs");
            assert_eq!(result.attenuation, Color::ONE);
            // Head-on: either straight through or straight back
            let dir = result.scattered.direction();
            assert!((dir.y.abs() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_schlick_reflectance() {
        // Normal incidence on glass reflects about 4%
        let r = Dielectric::reflectance(1.0, 1.5);
        assert!((r - 0.04).abs() < 1e-6);
        // Grazing incidence reflects everything
        assert!((Dielectric::reflectance(0.0, 1.5) - 1.0).abs() < 1e-6);
    }
}
