//! Configuration file handling for ascii-booth.
//!
//! Loads configuration from `<config dir>/ascii-booth/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ascii::{clamp_density, Palette, RenderConfig, Theme, DEFAULT_DENSITY};
use crate::camera::Resolution;

/// Configuration file structure for ascii-booth.
/// Loaded from the user config dir (or custom path via --config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub camera: CameraSection,
    #[serde(default)]
    pub live: LiveSection,
    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSection {
    #[serde(default = "default_density")]
    pub density: i32,
    #[serde(default = "default_palette")]
    pub palette: String,
    #[serde(default = "default_true")]
    pub monochrome: bool,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            density: default_density(),
            palette: default_palette(),
            monochrome: true,
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSection {
    /// Flip captured stills so they match the on-screen selfie view
    #[serde(default = "default_true")]
    pub mirror: bool,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self { mirror: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveSection {
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Container layout box in device pixels
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for LiveSection {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExportSection {
    /// Output directory; the working directory when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_density() -> i32 {
    DEFAULT_DENSITY
}

fn default_palette() -> String {
    Palette::default().name().to_string()
}

fn default_fps() -> u32 {
    30
}

fn default_width() -> u32 {
    960
}

fn default_height() -> u32 {
    540
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {:?}", path);
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Write this configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }

    /// Render settings the context starts with.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            density: clamp_density(self.render.density),
            monochrome: self.render.monochrome,
            palette_name: self.render.palette.clone(),
        }
    }

    pub fn container_size(&self) -> Resolution {
        Resolution::new(self.live.width, self.live.height)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors that can occur when loading or saving configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to access config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::SerializeError(source) => {
                write!(f, "Failed to serialize config: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::SerializeError(source) => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ascii-booth").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/ascii-booth/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("none.toml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.render.density, 50);
        assert!(config.render.monochrome);
        assert!(config.camera.mirror);
        assert_eq!(config.live.fps, 30);
        assert_eq!(config.container_size(), Resolution::new(960, 540));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[render]\npalette = \"matrix\"\ntheme = \"retro\"\n\n[camera]\nmirror = false\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.render.palette, "matrix");
        assert_eq!(config.render.theme, Theme::Retro);
        assert_eq!(config.render.density, 50);
        assert!(config.render.monochrome);
        assert!(!config.camera.mirror);
        assert_eq!(config.live, LiveSection::default());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[render\ndensity = ").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.render.density = 80;
        config.export.directory = Some(PathBuf::from("/tmp/out"));
        config.save(&path).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_render_config_clamps_density() {
        let mut config = Config::default();
        config.render.density = 300;
        config.render.monochrome = false;
        let render = config.render_config();
        assert_eq!(render.density, 100);
        assert!(!render.monochrome);
        assert_eq!(render.palette(), Palette::Standard);
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        assert!(default_path().ends_with("ascii-booth/config.toml"));
    }
}
