//! Scene description consumed by the tracer

use nalgebra::Point3;
use std::fmt;
use std::sync::Arc;

use crate::environment::{Constant, Environment, Gradient};
use crate::math::Color;
use crate::{DEFAULT_BOUNCES, MAX_BOUNCES};

/// Blinn-Phong surface parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse reflectance, components in [0, 1]
    pub k_d: Color,
    /// Specular reflectance, components in [0, 1]; also scales mirror bounces
    pub k_s: Color,
    /// Specular exponent
    pub shininess: f32,
}

impl Material {
    pub fn new(k_d: Color, k_s: Color, shininess: f32) -> Self {
        Self { k_d, k_s, shininess }
    }

    /// Purely diffuse surface
    pub fn diffuse(k_d: Color) -> Self {
        Self::new(k_d, Color::zeros(), 1.0)
    }

    /// Perfect mirror tinted by `k_s`
    pub fn mirror(k_s: Color) -> Self {
        Self::new(Color::zeros(), k_s, 100.0)
    }
}

/// Sphere primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3<f32>,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    pub fn new(center: Point3<f32>, radius: f32, material: Material) -> Self {
        Self { center, radius, material }
    }
}

/// Point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Point3<f32>,
    /// Non-negative radiance per channel
    pub intensity: Color,
}

impl Light {
    pub fn new(position: Point3<f32>, intensity: Color) -> Self {
        Self { position, intensity }
    }
}

/// Spheres, lights, environment and bounce limit for one render pass
///
/// A scene is read-only while tracing. Cloning is cheap for the environment,
/// which is shared behind an `Arc`.
#[derive(Clone)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub lights: Vec<Light>,
    pub environment: Arc<dyn Environment>,
    pub bounce_limit: u32,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("spheres", &self.spheres)
            .field("lights", &self.lights)
            .field("environment", &self.environment.name())
            .field("bounce_limit", &self.bounce_limit)
            .finish()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Arc::new(Constant::black()))
    }
}

impl Scene {
    /// Empty scene with the default bounce limit
    pub fn new(environment: Arc<dyn Environment>) -> Self {
        Self {
            spheres: Vec::new(),
            lights: Vec::new(),
            environment,
            bounce_limit: DEFAULT_BOUNCES,
        }
    }

    pub fn with_sphere(mut self, sphere: Sphere) -> Self {
        self.spheres.push(sphere);
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_bounce_limit(mut self, bounce_limit: u32) -> Self {
        self.set_bounce_limit(bounce_limit);
        self
    }

    /// Set the bounce limit, clamped to `MAX_BOUNCES`
    pub fn set_bounce_limit(&mut self, bounce_limit: u32) {
        if bounce_limit > MAX_BOUNCES {
            tracing::warn!(
                requested = bounce_limit,
                max = MAX_BOUNCES,
                "Bounce limit above hard cap, clamping"
            );
        }
        self.bounce_limit = bounce_limit.min(MAX_BOUNCES);
    }

    /// Bounce limit actually honored by the integrator
    pub fn effective_bounce_limit(&self) -> u32 {
        self.bounce_limit.min(MAX_BOUNCES)
    }

    /// Built-in demo: a ground sphere, a red diffuse ball and two mirrors under a sky gradient
    pub fn showcase() -> Self {
        let sky = Gradient::new(Color::new(0.9, 0.9, 1.0), Color::new(0.25, 0.45, 0.85));

        Self::new(Arc::new(sky))
            // Ground
            .with_sphere(Sphere::new(
                Point3::new(0.0, -1001.0, 0.0),
                1000.0,
                Material::new(Color::new(0.5, 0.5, 0.5), Color::new(0.1, 0.1, 0.1), 10.0),
            ))
            .with_sphere(Sphere::new(
                Point3::new(-1.4, 0.0, 0.0),
                1.0,
                Material::new(Color::new(0.8, 0.1, 0.1), Color::new(0.2, 0.2, 0.2), 50.0),
            ))
            .with_sphere(Sphere::new(
                Point3::new(1.1, -0.2, -0.6),
                0.8,
                Material::mirror(Color::new(0.9, 0.9, 0.9)),
            ))
            .with_sphere(Sphere::new(
                Point3::new(0.2, -0.6, 1.3),
                0.4,
                Material::new(Color::new(0.1, 0.2, 0.6), Color::new(0.6, 0.6, 0.6), 200.0),
            ))
            .with_light(Light::new(Point3::new(-4.0, 6.0, 4.0), Color::new(0.7, 0.7, 0.7)))
            .with_light(Light::new(Point3::new(5.0, 3.0, 2.0), Color::new(0.3, 0.3, 0.35)))
            .with_bounce_limit(DEFAULT_BOUNCES)
    }
}
