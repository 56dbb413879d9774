mod image_file;

pub use image_file::ImageFileOutput;

use crate::error::Result;
use image::RgbImage;
use std::path::PathBuf;

/// Trait for frame destinations
pub trait OutputSink {
    /// Persist frame number `index`, returning where it went
    fn write_frame(&mut self, index: u64, frame: &RgbImage) -> Result<PathBuf>;
}

/// Builds `<prefix><index:05>.png` file names
///
/// The prefix is used verbatim. Indices past 99999 simply grow wider, so names
/// never collide within a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilenameTemplate {
    prefix: String,
}

impl FilenameTemplate {
    pub const EXTENSION: &'static str = "png";

    pub fn new(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.unwrap_or_default().to_string(),
        }
    }

    pub fn render(&self, index: u64) -> String {
        format!("{}{:05}.{}", self.prefix, index, Self::EXTENSION)
    }
}
