//! Nearest-hit ray queries against the scene's spheres

use nalgebra::{Point3, Vector3};

use crate::math::Ray;
use crate::scene::{Material, Scene, Sphere};
use crate::T_MIN;

/// Result of a successful intersection query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    /// Distance along the unit-length query direction
    pub t: f32,
    pub position: Point3<f32>,
    /// Unit outward normal, pointing away from the sphere center
    pub normal: Vector3<f32>,
    pub material: Material,
}

impl Sphere {
    /// Smallest root of `|O + tD - C|^2 = r^2` with `t_min < t < t_max`
    ///
    /// Spheres with a non-positive radius never report a hit.
    pub fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<f32> {
        if self.radius <= 0.0 || self.radius.is_nan() {
            return None;
        }

        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t0 = (-b - sqrt_d) / (2.0 * a);
        let t1 = (-b + sqrt_d) / (2.0 * a);

        [t0, t1].into_iter().find(|&t| t > t_min && t < t_max)
    }
}

/// Find the nearest sphere hit along `ray` beyond `T_MIN`
///
/// The direction is normalized first, so `t` is a world-space distance. With
/// exactly equal distances the sphere listed first wins.
pub fn intersect(scene: &Scene, ray: &Ray) -> Option<HitInfo> {
    let ray = ray.normalized();
    let mut closest: Option<(f32, &Sphere)> = None;
    let mut max_t = f32::INFINITY;

    for sphere in &scene.spheres {
        if let Some(t) = sphere.hit(&ray, T_MIN, max_t) {
            max_t = t;
            closest = Some((t, sphere));
        }
    }

    closest.map(|(t, sphere)| {
        let position = ray.at(t);
        HitInfo {
            t,
            position,
            normal: (position - sphere.center).normalize(),
            material: sphere.material,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color;

    fn red() -> Material {
        Material::diffuse(Color::new(1.0, 0.0, 0.0))
    }

    fn blue() -> Material {
        Material::diffuse(Color::new(0.0, 0.0, 1.0))
    }

    fn single_sphere(radius: f32) -> Scene {
        Scene::default().with_sphere(Sphere::new(Point3::origin(), radius, red()))
    }

    #[test]
    fn test_sphere_intersection() {
        for (r, d) in [(1.0, 2.0), (0.5, 3.0), (2.0, 2.5)] {
            let scene = single_sphere(r);
            let ray = Ray::new(Point3::new(0.0, 0.0, -2.0 * d), Vector3::new(0.0, 0.0, 1.0));
            let hit = intersect(&scene, &ray).expect("ray toward sphere must hit");
            assert!((hit.t - (2.0 * d - r)).abs() < 1e-4, "r={} d={} t={}", r, d, hit.t);
            assert!((hit.normal - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-4);
        }
    }

    #[test]
    fn test_ray_away_from_sphere_misses() {
        let scene = single_sphere(1.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, -4.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(intersect(&scene, &ray).is_none());

        let sideways = Ray::new(Point3::new(0.0, 0.0, -4.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(intersect(&scene, &sideways).is_none());
    }

    #[test]
    fn test_unnormalized_direction_gives_world_distance() {
        let scene = single_sphere(1.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, -4.0), Vector3::new(0.0, 0.0, 10.0));
        let hit = intersect(&scene, &ray).unwrap();
        assert!((hit.t - 3.0).abs() < 1e-4);
        assert!((hit.position.z + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_self_intersection_excluded() {
        let scene = single_sphere(1.0);
        let normal = Vector3::new(1.0, 1.0, 0.0).normalize();
        let surface = Point3::origin() + normal;
        let ray = Ray::new(surface, normal);
        assert!(intersect(&scene, &ray).is_none());
    }

    #[test]
    fn test_inside_sphere_hits_far_side_with_outward_normal() {
        let scene = single_sphere(2.0);
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 1.0, 0.0));
        let hit = intersect(&scene, &ray).unwrap();
        assert!((hit.t - 2.0).abs() < 1e-4);
        assert!((hit.normal - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-4);
    }

    #[test]
    fn test_nearest_hit_selection() {
        // Far sphere listed first so the query cannot just keep the first hit
        let scene = Scene::default()
            .with_sphere(Sphere::new(Point3::new(0.0, 0.0, 1.5), 1.0, blue()))
            .with_sphere(Sphere::new(Point3::new(0.0, 0.0, 0.0), 1.0, red()));
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));

        let hit = intersect(&scene, &ray).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-4);
        assert_eq!(hit.material, red());
    }

    #[test]
    fn test_degenerate_radius_is_a_miss() {
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(intersect(&single_sphere(0.0), &ray).is_none());
        assert!(intersect(&single_sphere(-1.0), &ray).is_none());
    }

    #[test]
    fn test_empty_scene_misses() {
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, 1.0));
        assert!(intersect(&Scene::default(), &ray).is_none());
    }

    #[test]
    fn test_sphere_hit_respects_range() {
        let sphere = Sphere::new(Point3::origin(), 1.0, red());
        let ray = Ray::new(Point3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, 1.0));
        assert!((sphere.hit(&ray, 0.0, 100.0).unwrap() - 2.0).abs() < 1e-4);
        // Near root excluded by t_max, far root too
        assert!(sphere.hit(&ray, 0.0, 1.5).is_none());
        // Near root excluded by t_min, far root accepted
        assert!((sphere.hit(&ray, 2.5, 100.0).unwrap() - 4.0).abs() < 1e-4);
    }
}
