//! Crate error type.

use crate::resources::ResourceId;

/// Errors surfaced at the fallible edges of the crate: resource decoding,
/// fonts, snapshots and the window host. Rendering itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no image registered for resource {0}")]
    UnknownResource(ResourceId),

    #[error("font data could not be parsed")]
    InvalidFont,

    #[error("malformed snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("framebuffer error: {0}")]
    Pixels(#[from] pixels::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
