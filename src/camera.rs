//! Pinhole camera producing primary rays

use nalgebra::{Point3, Vector3};

use crate::math::Ray;

/// Camera for viewing the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub origin: Point3<f32>,
    pub look_at: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect_ratio: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            origin: Point3::new(0.0, 1.0, 6.0),
            look_at: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: 40.0,
            aspect_ratio: 4.0 / 3.0,
        }
    }
}

impl Camera {
    pub fn new(origin: Point3<f32>, look_at: Point3<f32>, fov: f32, aspect_ratio: f32) -> Self {
        Self {
            origin,
            look_at,
            up: Vector3::new(0.0, 1.0, 0.0),
            fov,
            aspect_ratio,
        }
    }

    pub fn set_aspect_ratio(&mut self, ratio: f32) {
        self.aspect_ratio = ratio;
    }

    /// Orthonormal basis (right, up, backward)
    fn basis(&self) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
        let w = (self.origin - self.look_at).normalize();
        let u = self.up.cross(&w).normalize();
        let v = w.cross(&u);
        (u, v, w)
    }

    /// Primary ray through screen coordinates in [-1, 1], x to the right and y up
    pub fn ray_through(&self, sx: f32, sy: f32) -> Ray {
        let (u, v, w) = self.basis();
        let half_height = (self.fov.to_radians() / 2.0).tan();
        let half_width = self.aspect_ratio * half_height;

        let direction = (u * sx * half_width + v * sy * half_height - w).normalize();
        Ray::new(self.origin, direction)
    }
}
