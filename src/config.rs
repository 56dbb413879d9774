use std::fmt;

use crate::error::{CaptureError, Result};

/// Frame size in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Validated capture settings for one run
#[derive(Clone, Debug, Default)]
pub struct CaptureOptions {
    pub name_prefix: Option<String>,
    /// `None` captures until interrupted
    pub frame_count: Option<u64>,
    pub resolution: Option<Resolution>,
    pub device_index: u32,
    pub verbose: bool,
}

impl CaptureOptions {
    /// Build options, rejecting a width without a height (or vice versa)
    pub fn new(
        name_prefix: Option<String>,
        frame_count: Option<u64>,
        width: Option<u32>,
        height: Option<u32>,
        device_index: u32,
        verbose: bool,
    ) -> Result<Self> {
        let resolution = match (width, height) {
            (Some(width), Some(height)) => {
                if width == 0 || height == 0 {
                    return Err(CaptureError::InvalidOptions(format!(
                        "resolution must be positive, got {width} x {height}"
                    )));
                }
                Some(Resolution::new(width, height))
            }
            (None, None) => None,
            _ => {
                return Err(CaptureError::InvalidOptions(
                    "must supply height AND width (or neither)".to_string(),
                ))
            }
        };

        Ok(Self {
            name_prefix,
            frame_count,
            resolution,
            device_index,
            verbose,
        })
    }
}
