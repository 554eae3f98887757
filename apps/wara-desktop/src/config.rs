use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wara_render::{CameraConfig, SceneConfig};
use wara_render_wgpu::RenderOptions;

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "WaraWara - Ground + Drag Camera".into(),
            width: 800,
            height: 600,
        }
    }
}

/// Everything the desktop viewer reads at startup.
///
/// Every section defaults, so a YAML file only needs the keys it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub render: RenderOptions,
    /// Icon image. Without one, a generated disc tinted per icon is used.
    pub texture: Option<PathBuf>,
}

impl AppConfig {
    /// Load and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.camera.validate().context("invalid camera config")?;
        self.scene.validate().context("invalid scene config")?;
        if !(0.0..=1.0).contains(&self.render.tint_strength) {
            anyhow::bail!(
                "render.tint_strength must be within 0..=1, got {}",
                self.render.tint_strength
            );
        }
        if self.window.width == 0 || self.window.height == 0 {
            anyhow::bail!(
                "window size must be non-zero, got {}x{}",
                self.window.width,
                self.window.height
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), text).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert!(config.texture.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(
            "camera:\n  sensitivity: 0.25\nscene:\n  icon_count: 12\ntexture: icons/wara.png\n",
        );
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.camera.sensitivity, 0.25);
        assert_eq!(config.camera.fov_y_degrees, 45.0);
        assert_eq!(config.scene.icon_count, 12);
        assert_eq!(config.scene.ring_radius, 3.0);
        assert_eq!(config.render.msaa_samples, 4);
        assert_eq!(config.texture, Some(PathBuf::from("icons/wara.png")));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let file = write_config("{}\n");
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn invalid_camera_is_rejected() {
        let file = write_config("camera:\n  near: 5.0\n  far: 1.0\n");
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("camera"));
    }

    #[test]
    fn tint_out_of_range_is_rejected() {
        let file = write_config("render:\n  tint_strength: 2.0\n");
        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn malformed_yaml_reports_path() {
        let file = write_config("camera: [not, a, map\n");
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::load(Path::new("/no/such/wara.yaml")).is_err());
    }
}
