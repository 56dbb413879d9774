use std::path::PathBuf;

use crate::config::Resolution;

pub type Result<T> = std::result::Result<T, CaptureError>;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Failed to open camera device {index}: {reason}")]
    DeviceOpen { index: u32, reason: String },

    #[error("Failed to set resolution to {requested}, got {actual}")]
    ResolutionMismatch {
        requested: Resolution,
        actual: Resolution,
    },

    #[error("Camera error: {0}")]
    Device(String),

    #[error("Failed to read frame {index}: {reason}")]
    FrameRead { index: u64, reason: String },

    #[error("Failed to write {}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to release camera: {0}")]
    Release(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}
