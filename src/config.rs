// Effect configuration: how strong the blur is, where it applies, and whether it is on.
// Loaded from TOML, e.g.
//
//   blur_radius = 24.0
//   [insets]
//   bottom = { fixed_mirrored = 64.0 }

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::inset::Insets;
use crate::surface::DEFAULT_BLUR_RADIUS;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    /// Radius where the mask is white.
    pub blur_radius: f32,
    pub insets: Insets,
    pub is_active: bool,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            blur_radius: DEFAULT_BLUR_RADIUS,
            insets: Insets::default(),
            is_active: true,
        }
    }
}

impl MorphConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| Error::ConfigRead { path: path.to_path_buf(), source })?;
        let config: Self = toml::from_str(&content)
            .map_err(|source| Error::ConfigParse { path: path.to_path_buf(), source })?;
        Ok(config.sanitized())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|source| Error::ConfigWrite { path: path.to_path_buf(), source })
    }

    /// Negative (or NaN) radii become 0.
    pub fn sanitized(mut self) -> Self {
        if self.blur_radius.is_nan() || self.blur_radius < 0.0 {
            self.blur_radius = 0.0;
        }
        self
    }
}
