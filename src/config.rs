//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`RASTRUM_SECTION__KEY`)

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::colors::Color;
use crate::render::RenderMode;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub rendering: RenderingConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`RASTRUM_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // RASTRUM_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("RASTRUM_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Frame rate cap, 0 for unlimited
    pub fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "rastrum".to_string(),
            width: 600,
            height: 600,
            fps: 60,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World position [x, y, z]
    pub position: [f32; 3],
    /// Degrees, positive turns right
    pub yaw: f32,
    /// Degrees, clamped to +-89
    pub pitch: f32,
    /// Degrees, positive tilts right
    pub roll: f32,
}

/// Where finished frames go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Window,
    /// Numbered PNG files, for headless runs
    Image,
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    pub mode: RenderMode,
    /// Distance from the camera to the projection plane
    pub projection_z: f32,
    /// Side length of the viewport window on the projection plane
    pub viewport_size: f32,
    /// Near clipping distance
    pub near: f32,
    /// Background color [r, g, b]
    pub background: Color,
    pub output: OutputKind,
    /// Directory for `output = "image"`
    pub image_dir: PathBuf,
    /// Frames to write before stopping, for `output = "image"`
    pub image_frames: u32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Filled,
            projection_z: 1.0,
            viewport_size: 1.0,
            near: 1.0,
            background: Color::BACKGROUND,
            output: OutputKind::Window,
            image_dir: PathBuf::from("frames"),
            image_frames: 1,
        }
    }
}

/// One placement of the scene mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    pub translation: [f32; 3],
    pub scale: f32,
    /// Degrees around `axis`
    pub rotation: f32,
    pub axis: [f32; 3],
    /// Degrees per second added to `rotation`
    pub spin: f32,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0, 7.0],
            scale: 1.0,
            rotation: 0.0,
            axis: [0.0, 1.0, 0.0],
            spin: 0.0,
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// A3DB or OBJ file. The built-in cube is used when unset.
    pub model: Option<PathBuf>,
    /// Color for OBJ models, which carry no per-triangle colors
    pub model_color: Color,
    pub instances: Vec<InstanceConfig>,
    /// Draw the three reference lines over the scene
    pub demo_lines: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model: None,
            model_color: Color::AQUAMARINE,
            instances: vec![
                InstanceConfig {
                    translation: [-1.5, 0.0, 7.0],
                    ..InstanceConfig::default()
                },
                InstanceConfig {
                    translation: [1.25, 2.5, 7.5],
                    rotation: 30.0,
                    spin: 45.0,
                    ..InstanceConfig::default()
                },
            ],
            demo_lines: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `env_logger` filter, e.g. "info" or "rastrum=debug". `RUST_LOG` is
    /// used when unset.
    pub filter: Option<String>,
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
