//! Ray and vector helpers

use nalgebra::{Point3, Vector3};

/// Linear RGB color
pub type Color = Vector3<f32>;

/// A ray in 3D space
///
/// The direction does not need to be unit length; queries normalize it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Copy of this ray with a unit-length direction
    pub fn normalized(&self) -> Self {
        Self {
            origin: self.origin,
            direction: self.direction.normalize(),
        }
    }
}

/// Reflect a vector around a normal
pub fn reflect(v: &Vector3<f32>, n: &Vector3<f32>) -> Vector3<f32> {
    *v - 2.0 * v.dot(n) * *n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        assert!((ray.at(5.0).x - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_ray_normalized() {
        let ray = Ray::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 3.0, 4.0));
        let unit = ray.normalized();
        assert_eq!(unit.origin, ray.origin);
        assert!((unit.direction.norm() - 1.0).abs() < 1e-6);
        assert!((unit.direction.y - 0.6).abs() < 1e-6);
        assert!((unit.direction.z - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_reflect() {
        let v = Vector3::new(1.0, -1.0, 0.0);
        let n = Vector3::new(0.0, 1.0, 0.0);
        let r = reflect(&v, &n);
        assert!((r.x - 1.0).abs() < 0.001);
        assert!((r.y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_reflect_preserves_length() {
        let v = Vector3::new(0.3, -0.5, 0.8).normalize();
        let n = Vector3::new(0.0, 0.0, 1.0);
        assert!((reflect(&v, &n).norm() - 1.0).abs() < 1e-5);
    }
}
