//! Rendering options with TOML preset support.
//!
//! All tweakable settings live here and serialize to/from TOML, so a host
//! application can ship presets. `#[serde(default)]` keeps partial files
//! (e.g. only `motion_blur = false`) working.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CometError;

/// Renderer configuration shared by the GPU and CPU paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderOptions {
    /// Clear color, straight-alpha RGBA.
    pub background: [f32; 4],
    /// When off, every trail collapses to a plain ball at its leading end.
    pub motion_blur: bool,
    /// Initial vertex/index buffer capacity, in quads.
    pub quad_capacity: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 1.0],
            motion_blur: true,
            quad_capacity: 1024,
        }
    }
}

impl RenderOptions {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`CometError::Io`] if the file cannot be read,
    /// [`CometError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, CometError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CometError::OptionsParse(format!("{}: {e}", path.display())))
    }

    /// Save options to a TOML file (pretty-printed), creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// [`CometError::OptionsParse`] if serialization fails,
    /// [`CometError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), CometError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CometError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
