// Error type for the few places that can genuinely fail.
// The layout pipeline itself never returns these: a pass that cannot produce a mask
// is reported as `LayoutOutcome::Skipped` and the previous filter stays on screen.
use std::path::PathBuf;

use thiserror::Error;

use crate::types::PixelSize;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the demo window failed.
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Pushing a frame to the demo window failed.
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// Two buffers handed to a compositor disagree on their dimensions.
    #[error("{context}: size mismatch, expected {expected:?} but got {actual:?}")]
    SizeMismatch {
        context: &'static str,
        expected: PixelSize,
        actual: PixelSize,
    },

    #[error("failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("failed to write config {path:?}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decoding an image used as a mask failed.
    #[error("mask image error: {0}")]
    MaskImage(#[from] image::ImageError),
}
