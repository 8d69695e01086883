//! Error type shared by the renderer crate.

use thiserror::Error;

/// Errors that can occur while configuring or running a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Thread pool needs at least one worker")]
    ZeroWorkers,

    #[error("Invalid resolution {width}x{height}: both dimensions must be non-zero")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("Material {index} is not in the scene ({count} materials)")]
    UnknownMaterial { index: usize, count: usize },

    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    #[error("A render pass is already running")]
    AlreadyRendering,

    #[error("Render task panicked: {0}")]
    TaskPanicked(String),

    #[error("Render task was dropped before it completed")]
    TaskLost,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
