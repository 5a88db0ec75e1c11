use std::path::Path;

use super::{ConfigError, RenderConfig};

/// Load and validate a render configuration from a YAML file
///
/// Relative cube map paths are resolved against the file's directory.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let mut config: RenderConfig = serde_yaml::from_str(&content)?;
    config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    config.validate()?;

    tracing::debug!(path = %path.display(), "Loaded render configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_missing_config() {
        let result = load_config("/nonexistent/scene.yaml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let file = write_config("invalid: yaml: content: [");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_valid() {
        let file = write_config(
            r#"
output: "mirrors.png"
image:
  width: 320
  height: 200
camera:
  origin: [0.0, 2.0, 8.0]
  look_at: [0.0, 0.0, 0.0]
  fov: 50
scene:
  bounce_limit: 4
  environment:
    type: gradient
    horizon: [1.0, 1.0, 1.0]
    zenith: [0.2, 0.4, 0.8]
  spheres:
    - center: [0.0, 0.0, 0.0]
      radius: 1.0
      material:
        diffuse: [0.8, 0.1, 0.1]
        specular: [0.3, 0.3, 0.3]
        shininess: 40
    - center: [2.0, 0.0, 0.0]
      radius: 0.5
  lights:
    - position: [0.0, 10.0, 5.0]
      intensity: [0.9, 0.9, 0.9]
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.output.to_str(), Some("mirrors.png"));
        assert_eq!(config.image.width, 320);
        assert_eq!(config.image.height, 200);
        assert_eq!(config.camera.fov, 50.0);
        assert_eq!(config.camera.up, [0.0, 1.0, 0.0]);
        assert_eq!(config.scene.bounce_limit, 4);
        assert_eq!(config.scene.spheres.len(), 2);
        assert_eq!(config.scene.spheres[1].material.shininess, 1.0);
        assert_eq!(config.scene.lights.len(), 1);
        assert!(matches!(config.scene.environment, EnvironmentConfig::Gradient { .. }));
        assert_eq!(config.base_dir, file.path().parent().unwrap());

        let scene = config.build_scene().unwrap();
        assert_eq!(scene.bounce_limit, 4);
        assert_eq!(scene.spheres.len(), 2);
    }

    #[test]
    fn test_load_config_minimal() {
        let file = write_config("scene:\n  spheres: []\n");

        let config = load_config(file.path()).unwrap();
        assert!(config.scene.spheres.is_empty());
        assert_eq!(config.image.width, 640);
        assert_eq!(config.scene.environment, EnvironmentConfig::default());
    }

    #[test]
    fn test_load_config_constant_environment() {
        let file = write_config(
            "scene:\n  environment:\n    type: constant\n    color: [0.1, 0.2, 0.3]\n",
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(
            config.scene.environment,
            EnvironmentConfig::Constant { color: [0.1, 0.2, 0.3] }
        );
    }

    #[test]
    fn test_load_config_unknown_environment() {
        let file = write_config("scene:\n  environment:\n    type: skybox\n");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_fails_validation() {
        let file = write_config("image:\n  width: 0\n  height: 10\n");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_bundled_scene() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenes/mirrors.yaml");
        let config = load_config(path).unwrap();
        let scene = config.build_scene().unwrap();
        assert_eq!(scene.spheres.len(), 4);
        assert_eq!(scene.lights.len(), 2);
        assert_eq!(scene.bounce_limit, 4);
    }

    #[test]
    fn test_config_from_file() {
        let result = RenderConfig::from_file("/nonexistent/path.yaml");
        assert!(result.is_err());
    }
}
