mod loader;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use loader::load_config;

use crate::camera::Camera;
use crate::environment::{Constant, CubeMap, Environment, EnvironmentError, Gradient};
use crate::scene::{Light, Material, Scene, Sphere};
use crate::{DEFAULT_BOUNCES, MAX_BOUNCES};

/// Complete render description: output, image size, camera and scene
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    /// Directory relative cube map paths resolve against (the config file's directory)
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_output() -> PathBuf {
    PathBuf::from("render.png")
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            image: ImageConfig::default(),
            camera: CameraConfig::default(),
            scene: SceneConfig::default(),
            base_dir: PathBuf::new(),
        }
    }
}

/// Output image size in pixels
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ImageConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_origin")]
    pub origin: [f32; 3],
    #[serde(default)]
    pub look_at: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov: f32,
}

fn default_camera_origin() -> [f32; 3] {
    [0.0, 1.0, 6.0]
}

fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_fov() -> f32 {
    40.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            origin: default_camera_origin(),
            look_at: [0.0; 3],
            up: default_up(),
            fov: default_fov(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default = "default_bounce_limit")]
    pub bounce_limit: u32,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub spheres: Vec<SphereConfig>,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
}

fn default_bounce_limit() -> u32 {
    DEFAULT_BOUNCES
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            bounce_limit: default_bounce_limit(),
            environment: EnvironmentConfig::default(),
            spheres: Vec::new(),
            lights: Vec::new(),
        }
    }
}

/// Environment sampler selection
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EnvironmentConfig {
    Constant {
        color: [f32; 3],
    },
    Gradient {
        horizon: [f32; 3],
        zenith: [f32; 3],
    },
    Cubemap {
        faces: CubeFacesConfig,
        #[serde(default)]
        swap_yz: bool,
    },
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::Constant { color: [0.0; 3] }
    }
}

/// Cube map face image paths
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CubeFacesConfig {
    pub px: PathBuf,
    pub nx: PathBuf,
    pub py: PathBuf,
    pub ny: PathBuf,
    pub pz: PathBuf,
    pub nz: PathBuf,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SphereConfig {
    pub center: [f32; 3],
    pub radius: f32,
    #[serde(default)]
    pub material: MaterialConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct MaterialConfig {
    #[serde(default = "default_diffuse")]
    pub diffuse: [f32; 3],
    #[serde(default)]
    pub specular: [f32; 3],
    #[serde(default = "default_shininess")]
    pub shininess: f32,
}

fn default_diffuse() -> [f32; 3] {
    [0.8, 0.8, 0.8]
}

fn default_shininess() -> f32 {
    1.0
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            diffuse: default_diffuse(),
            specular: [0.0; 3],
            shininess: default_shininess(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LightConfig {
    pub position: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: [f32; 3],
}

fn default_intensity() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

pub fn vec3_from(value: [f32; 3]) -> Vector3<f32> {
    Vector3::new(value[0], value[1], value[2])
}

pub fn point3_from(value: [f32; 3]) -> Point3<f32> {
    Point3::new(value[0], value[1], value[2])
}

fn is_finite_vec3(value: [f32; 3]) -> bool {
    value.iter().all(|c| c.is_finite())
}

fn in_unit_range(value: [f32; 3]) -> bool {
    value.iter().all(|c| (0.0..=1.0).contains(c))
}

impl RenderConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Check values the tracer cannot work with
    ///
    /// Degenerate spheres and oversized bounce limits are only warned about:
    /// the former never intersect and the latter are clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Validation(msg)) };

        if self.image.width == 0 || self.image.height == 0 {
            return invalid("image width and height must be positive".to_string());
        }

        let cam = &self.camera;
        if !is_finite_vec3(cam.origin) || !is_finite_vec3(cam.look_at) || !is_finite_vec3(cam.up) {
            return invalid("camera vectors must contain finite values".to_string());
        }
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return invalid(format!("camera fov must be in (0, 180) degrees, got {}", cam.fov));
        }
        let view = point3_from(cam.look_at) - point3_from(cam.origin);
        if view.norm() < 1e-4 {
            return invalid("camera origin must differ from look_at".to_string());
        }
        if view.normalize().cross(&vec3_from(cam.up)).norm() < 1e-4 {
            return invalid("camera up must not be parallel to the view direction".to_string());
        }

        if self.scene.bounce_limit > MAX_BOUNCES {
            tracing::warn!(
                bounce_limit = self.scene.bounce_limit,
                max = MAX_BOUNCES,
                "bounce_limit exceeds the hard cap and will be clamped"
            );
        }

        for (i, sphere) in self.scene.spheres.iter().enumerate() {
            let m = &sphere.material;
            if !is_finite_vec3(sphere.center) || !sphere.radius.is_finite() {
                return invalid(format!("sphere {} must have a finite center and radius", i));
            }
            if sphere.radius <= 0.0 {
                tracing::warn!(sphere = i, radius = sphere.radius, "Degenerate sphere will never be hit");
            }
            if !in_unit_range(m.diffuse) || !in_unit_range(m.specular) {
                return invalid(format!("sphere {} reflectances must be within [0, 1]", i));
            }
            if !(m.shininess >= 0.0 && m.shininess.is_finite()) {
                return invalid(format!("sphere {} shininess must be a non-negative number", i));
            }
        }

        for (i, light) in self.scene.lights.iter().enumerate() {
            if !is_finite_vec3(light.position) {
                return invalid(format!("light {} position must be finite", i));
            }
            if !is_finite_vec3(light.intensity) || light.intensity.iter().any(|c| *c < 0.0) {
                return invalid(format!("light {} intensity must be finite and non-negative", i));
            }
        }

        match &self.scene.environment {
            EnvironmentConfig::Constant { color } if !is_finite_vec3(*color) => {
                invalid("environment color must be finite".to_string())
            }
            EnvironmentConfig::Gradient { horizon, zenith }
                if !is_finite_vec3(*horizon) || !is_finite_vec3(*zenith) =>
            {
                invalid("environment gradient colors must be finite".to_string())
            }
            _ => Ok(()),
        }
    }

    pub fn build_camera(&self) -> Camera {
        let cam = &self.camera;
        Camera {
            origin: point3_from(cam.origin),
            look_at: point3_from(cam.look_at),
            up: vec3_from(cam.up),
            fov: cam.fov,
            aspect_ratio: self.image.width as f32 / self.image.height.max(1) as f32,
        }
    }

    /// Build the environment sampler, loading cube map faces from disk if needed
    pub fn build_environment(&self) -> Result<Arc<dyn Environment>, ConfigError> {
        let env: Arc<dyn Environment> = match &self.scene.environment {
            EnvironmentConfig::Constant { color } => Arc::new(Constant(vec3_from(*color))),
            EnvironmentConfig::Gradient { horizon, zenith } => {
                Arc::new(Gradient::new(vec3_from(*horizon), vec3_from(*zenith)))
            }
            EnvironmentConfig::Cubemap { faces, swap_yz } => {
                let paths = [&faces.px, &faces.nx, &faces.py, &faces.ny, &faces.pz, &faces.nz]
                    .map(|p| self.base_dir.join(p));
                Arc::new(CubeMap::load(&paths, *swap_yz)?)
            }
        };
        Ok(env)
    }

    pub fn build_scene(&self) -> Result<Scene, ConfigError> {
        let mut scene = Scene::new(self.build_environment()?);

        scene.spheres = self
            .scene
            .spheres
            .iter()
            .map(|s| {
                Sphere::new(
                    point3_from(s.center),
                    s.radius,
                    Material::new(
                        vec3_from(s.material.diffuse),
                        vec3_from(s.material.specular),
                        s.material.shininess,
                    ),
                )
            })
            .collect();

        scene.lights = self
            .scene
            .lights
            .iter()
            .map(|l| Light::new(point3_from(l.position), vec3_from(l.intensity)))
            .collect();

        scene.set_bounce_limit(self.scene.bounce_limit);

        tracing::info!(
            spheres = scene.spheres.len(),
            lights = scene.lights.len(),
            bounce_limit = scene.bounce_limit,
            environment = scene.environment.name(),
            "Scene built"
        );

        Ok(scene)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment error: {0}")]
    Environment(#[from] EnvironmentError),
}
