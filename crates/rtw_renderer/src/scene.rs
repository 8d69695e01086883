//! Scene arena: owns every material and the root list of hittables.
//!
//! Geometry refers to materials by [`MaterialId`], so a scene can be shared
//! read-only across worker threads behind a single `Arc`.

use crate::random::{gen_f32, gen_range, random_color};
use crate::{
    Color, Dielectric, HitRecord, Hittable, HittableList, Lambertian, Material, MaterialId, Metal,
    RenderError, RenderResult, Sphere,
};
use rand::RngCore;
use rtw_math::{Interval, Ray, Vec3};

/// A renderable scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    materials: Vec<Material>,
    world: HittableList,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a material and return its handle.
    ///
    /// Rejects a dielectric whose index of refraction is not a positive finite number.
    pub fn add_material(&mut self, material: impl Into<Material>) -> RenderResult<MaterialId> {
        let material = material.into();
        if let Material::Dielectric(glass) = &material {
            if !(glass.ior() > 0.0 && glass.ior().is_finite()) {
                return Err(RenderError::InvalidScene(format!(
                    "index of refraction must be positive, got {}",
                    glass.ior()
                )));
            }
        }
        self.materials.push(material);
        Ok(MaterialId(self.materials.len() - 1))
    }

    /// Look up a material. `None` if `id` was issued by another scene.
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    /// Add an object to the world.
    ///
    /// Every sphere in `object`, nested lists included, must have a positive
    /// radius and point at a material this scene owns.
    pub fn add(&mut self, object: impl Into<Hittable>) -> RenderResult<()> {
        let object = object.into();
        self.check_object(&object)?;
        self.world.add(object);
        Ok(())
    }

    fn check_object(&self, object: &Hittable) -> RenderResult<()> {
        match object {
            Hittable::Sphere(sphere) => self.check_sphere(sphere),
            Hittable::List(list) => list
                .objects()
                .iter()
                .try_for_each(|inner| self.check_object(inner)),
        }
    }

    fn check_sphere(&self, sphere: &Sphere) -> RenderResult<()> {
        if !(sphere.radius() > 0.0 && sphere.radius().is_finite()) {
            return Err(RenderError::InvalidScene(format!(
                "sphere radius must be positive, got {}",
                sphere.radius()
            )));
        }
        let index = sphere.material().index();
        if index >= self.materials.len() {
            return Err(RenderError::UnknownMaterial {
                index,
                count: self.materials.len(),
            });
        }
        Ok(())
    }

    pub fn world(&self) -> &HittableList {
        &self.world
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn len(&self) -> usize {
        self.world.len()
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    /// Closest hit in the world.
    pub fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        self.world.hit(ray, ray_t, rec)
    }
}

/// The classic "random spheres" scene.
///
/// A huge gray ground sphere, a 22x22 grid of small randomly placed spheres
/// and three large feature spheres (glass, brown diffuse, mirror).
pub fn random_scene(rng: &mut dyn RngCore) -> RenderResult<Scene> {
    let mut scene = Scene::new();

    let ground = scene.add_material(Lambertian::new(Color::new(0.5, 0.5, 0.5)))?;
    scene.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground))?;

    // Small glass spheres all share one material
    let small_glass = scene.add_material(Dielectric::new(1.5))?;

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            // Keep clear of the metal feature sphere
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                scene.add_material(Lambertian::new(albedo))?
            } else if choose_mat < 0.95 {
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = gen_range(rng, 0.0, 0.5);
                scene.add_material(Metal::new(albedo, fuzz))?
            } else {
                small_glass
            };
            scene.add(Sphere::new(center, 0.2, material))?;
        }
    }

    let glass = scene.add_material(Dielectric::new(1.5))?;
    scene.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass))?;

    let brown = scene.add_material(Lambertian::new(Color::new(0.4, 0.2, 0.1)))?;
    scene.add(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, brown))?;

    let mirror = scene.add_material(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0))?;
    scene.add(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, mirror))?;

    log::debug!(
        "Built random scene: {} objects, {} materials",
        scene.len(),
        scene.material_count()
    );

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_material_ids_are_sequential() {
        let mut scene = Scene::new();
        let a = scene.add_material(Lambertian::new(Color::ONE)).unwrap();
        let b = scene.add_material(Dielectric::new(1.5)).unwrap();

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert!(matches!(scene.material(b), Some(Material::Dielectric(_))));
    }

    #[test]
    fn test_scene_hit_reports_material() {
        let mut scene = Scene::new();
        let red = scene.add_material(Lambertian::new(Color::new(1.0, 0.0, 0.0))).unwrap();
        let steel = scene.add_material(Metal::new(Color::splat(0.8), 0.1)).unwrap();
        scene.add(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, red)).unwrap();
        scene.add(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, steel)).unwrap();

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();
        assert!(scene.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec));
        assert_eq!(rec.material, steel);
        assert!(matches!(scene.material(rec.material), Some(Material::Metal(_))));
    }

    #[test]
    fn test_foreign_material_rejected() {
        let mut donor = Scene::new();
        donor.add_material(Lambertian::new(Color::ONE)).unwrap();
        let foreign = donor.add_material(Lambertian::new(Color::ONE)).unwrap();

        let mut scene = Scene::new();
        scene.add_material(Lambertian::new(Color::ONE)).unwrap();
        assert!(scene.material(foreign).is_none());
        assert!(matches!(
            scene.add(Sphere::new(Vec3::NEG_Z, 0.5, foreign)),
            Err(RenderError::UnknownMaterial { index: 1, count: 1 })
        ));

        // Nested lists are checked too
        let mut nested = HittableList::new();
        nested.add(Sphere::new(Vec3::NEG_Z, 0.5, foreign));
        assert!(matches!(
            scene.add(nested),
            Err(RenderError::UnknownMaterial { .. })
        ));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_degenerate_geometry_rejected() {
        let mut scene = Scene::new();
        let gray = scene.add_material(Lambertian::new(Color::splat(0.5))).unwrap();

        for radius in [0.0, -1.0, f32::NAN] {
            assert!(matches!(
                scene.add(Sphere::new(Vec3::ZERO, radius, gray)),
                Err(RenderError::InvalidScene(_))
            ));
        }
        for ior in [0.0, -1.5, f32::INFINITY] {
            assert!(matches!(
                scene.add_material(Dielectric::new(ior)),
                Err(RenderError::InvalidScene(_))
            ));
        }
        assert!(scene.is_empty());
        assert_eq!(scene.material_count(), 1);
    }

    #[test]
    fn test_random_scene_layout() {
        let mut rng = StdRng::seed_from_u64(42);
        let scene = random_scene(&mut rng).unwrap();

        // Ground + up to 484 small spheres + 3 feature spheres
        assert!(scene.len() > 4);
        assert!(scene.len() <= 1 + 22 * 22 + 3);

        // Every object points at a material the scene owns
        for object in scene.world().objects() {
            if let Hittable::Sphere(sphere) = object {
                assert!(sphere.material().index() < scene.material_count());
            }
        }
    }

    #[test]
    fn test_random_scene_is_seeded() {
        let a = random_scene(&mut StdRng::seed_from_u64(9)).unwrap();
        let b = random_scene(&mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a.material_count(), b.material_count());
    }
}
