use serde_derive::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::Path;
use ze_gfx::render_context::RenderContextDesc;

pub const CONFIG_FILE: &str = "engine.yaml";

/// Kind of device the backend creates
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverType {
    Hardware,
    Reference,
    Warp,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fullscreen: bool,
    pub vsync: bool,
    pub screen_depth: f32,
    pub screen_near: f32,
    pub width: u32,
    pub height: u32,
    pub window_title: String,
    pub driver_type: DriverType,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fullscreen: false,
            vsync: true,
            screen_depth: 1000.0,
            screen_near: 0.1,
            width: 800,
            height: 600,
            window_title: "Engine Test".to_string(),
            driver_type: DriverType::Hardware,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(error) => write!(f, "failed to read config: {}", error),
            ConfigError::Parse(error) => write!(f, "failed to parse config: {}", error),
        }
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    /// Read the config at `path`, a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Size of the back buffer and of the window client area
    pub fn resolution(&self, screen_width: u32, screen_height: u32) -> (u32, u32) {
        if self.fullscreen {
            (screen_width, screen_height)
        } else {
            (self.width, self.height)
        }
    }

    pub fn render_context_desc(
        &self,
        width: u32,
        height: u32,
        window_handle: raw_window_handle::RawWindowHandle,
    ) -> RenderContextDesc {
        RenderContextDesc {
            width,
            height,
            vsync: self.vsync,
            window_handle,
            fullscreen: self.fullscreen,
            screen_depth: self.screen_depth,
            screen_near: self.screen_near,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{DriverType, EngineConfig};
    use raw_window_handle::{RawWindowHandle, Win32Handle};
    use std::path::Path;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_yaml("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(!config.fullscreen);
        assert!(config.vsync);
        assert_eq!(config.screen_depth, 1000.0);
        assert_eq!(config.screen_near, 0.1);
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.window_title, "Engine Test");
        assert_eq!(config.driver_type, DriverType::Hardware);
    }

    #[test]
    fn partial_document() {
        let config = EngineConfig::from_yaml("vsync: false\ndriver_type: warp\nwidth: 1280\n").unwrap();
        assert!(!config.vsync);
        assert_eq!(config.driver_type, DriverType::Warp);
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 600);
    }

    #[test]
    fn invalid_document() {
        assert!(EngineConfig::from_yaml("width: wide").is_err());
        assert!(EngineConfig::from_yaml("driver_type: software").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = EngineConfig::load(Path::new("this/file/does/not/exist.yaml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn fullscreen_uses_screen_resolution() {
        let mut config = EngineConfig::default();
        assert_eq!(config.resolution(1920, 1080), (800, 600));
        config.fullscreen = true;
        assert_eq!(config.resolution(1920, 1080), (1920, 1080));
    }

    #[test]
    fn render_context_desc() {
        let config = EngineConfig::default();
        let desc = config.render_context_desc(
            800,
            600,
            RawWindowHandle::Win32(Win32Handle::empty()),
        );
        assert_eq!((desc.width, desc.height), (800, 600));
        assert!(desc.vsync);
        assert!(!desc.fullscreen);
        assert_eq!(desc.screen_depth, 1000.0);
        assert_eq!(desc.screen_near, 0.1);
    }
}
