//! Whitted-style ray tracer for analytic spheres
//!
//! This library computes a color for a camera ray by intersecting a flat list of
//! spheres, applying Blinn-Phong lighting with binary shadows, and following
//! mirror reflections up to a bounded depth. Rays that leave the scene sample an
//! environment map.

pub mod camera;
pub mod config;
pub mod environment;
pub mod integrator;
pub mod intersect;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod shade;

pub use camera::Camera;
pub use environment::Environment;
pub use integrator::{trace, trace_with_stats, TraceOutput, TraceStats};
pub use intersect::{intersect, HitInfo};
pub use math::{Color, Ray};
pub use renderer::Renderer;
pub use scene::{Light, Material, Scene, Sphere};
pub use shade::shade;

/// Intersections closer than this are rejected to avoid self-hits
pub const T_MIN: f32 = 0.01;

/// Hard cap on reflective bounces
pub const MAX_BOUNCES: u32 = 5;

/// Default number of reflective bounces
pub const DEFAULT_BOUNCES: u32 = 3;

/// UTF-8 character gradient from dark to light
pub const ASCII_GRADIENT: &str = " .:-=+*#%@";
