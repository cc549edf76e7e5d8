//! Drawer configuration.
//!
//! Settings load from TOML. Every table and field is optional:
//!
//! ```toml
//! [drawer]
//! use_frustum_culling = true
//! culling_distance = 250.0
//!
//! [meshes]
//! use_icosphere = true
//!
//! [scope]
//! thickness = 0.05
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::colors::{self, Color};

/// Upper bound of the scoped line thickness.
pub const MAX_THICKNESS: f32 = 100.0;

/// Errors that can occur while loading [`DrawerSettings`].
#[derive(Debug)]
pub enum ConfigError {
    /// The settings file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The TOML text is malformed or has wrongly typed fields.
    Parse(toml::de::Error),
    /// A field holds a value that cannot be clamped into range.
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Parse(err) => write!(f, "failed to parse drawer settings: {err}"),
            Self::InvalidValue(msg) => write!(f, "invalid drawer setting: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidValue(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err)
    }
}

/// Runtime behavior of the render tick. Can be swapped at any time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DrawerConfig {
    /// Skip all pool updates on render ticks; physics ticks keep running.
    pub freeze_render: bool,
    /// Draw the bounds of every visible entry.
    pub visible_instance_bounds: bool,
    pub use_frustum_culling: bool,
    /// Maximum distance from any camera; 0 disables distance culling.
    pub culling_distance: f32,
    pub render_layer_mask: u32,
    pub line_hit_color: Color,
    pub line_after_hit_color: Color,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            freeze_render: false,
            visible_instance_bounds: false,
            use_frustum_culling: true,
            culling_distance: 0.0,
            render_layer_mask: 1,
            line_hit_color: colors::RED,
            line_after_hit_color: colors::GREEN,
        }
    }
}

impl DrawerConfig {
    fn validate(&mut self) -> Result<(), ConfigError> {
        if !self.culling_distance.is_finite() {
            return Err(ConfigError::InvalidValue(format!(
                "culling_distance must be finite, got {}",
                self.culling_distance
            )));
        }
        self.culling_distance = self.culling_distance.max(0.0);
        Ok(())
    }
}

/// Shape mesh quality. Applied when meshes are (re)generated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    pub use_icosphere: bool,
    pub use_icosphere_hd: bool,
    /// Cap every thickened segment with a pyramid.
    pub add_bevel_to_volumetric: bool,
}

/// Values a scoped config overrides. Also the outermost baseline of every
/// thread's scope stack.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScopedConfigData {
    pub thickness: f32,
    pub center_brightness: f32,
    pub hd_sphere: bool,
    /// Side length of drawn planes; infinite means "camera far distance".
    pub plane_size: f32,
}

impl Default for ScopedConfigData {
    fn default() -> Self {
        Self {
            thickness: 0.0,
            center_brightness: 0.0,
            hd_sphere: false,
            plane_size: f32::INFINITY,
        }
    }
}

impl ScopedConfigData {
    pub fn clamp_thickness(value: f32) -> f32 {
        value.clamp(0.0, MAX_THICKNESS)
    }

    pub fn clamp_brightness(value: f32) -> f32 {
        value.clamp(0.0, 1.0)
    }

    pub(crate) fn validate(&mut self) {
        self.thickness = Self::clamp_thickness(self.thickness);
        self.center_brightness = Self::clamp_brightness(self.center_brightness);
    }
}

/// Everything needed to construct a [`DebugDrawer`](crate::DebugDrawer).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DrawerSettings {
    pub drawer: DrawerConfig,
    pub meshes: MeshSettings,
    pub scope: ScopedConfigData,
}

impl DrawerSettings {
    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut settings: Self = toml::from_str(text)?;
        settings.drawer.validate()?;
        settings.scope.validate();
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        log::info!("Loaded drawer settings from {}", path.display());
        Ok(settings)
    }
}
