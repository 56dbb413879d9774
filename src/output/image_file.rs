use super::{FilenameTemplate, OutputSink};
use crate::error::{CaptureError, Result};
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};

/// Writes each frame to its own PNG file
pub struct ImageFileOutput {
    directory: PathBuf,
    template: FilenameTemplate,
}

impl ImageFileOutput {
    /// Files land in the current working directory
    pub fn new(template: FilenameTemplate) -> Self {
        Self::in_directory(".", template)
    }

    pub fn in_directory<P: AsRef<Path>>(directory: P, template: FilenameTemplate) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            template,
        }
    }

    fn path_for(&self, index: u64) -> PathBuf {
        let name = self.template.render(index);
        if self.directory == Path::new(".") {
            PathBuf::from(name)
        } else {
            self.directory.join(name)
        }
    }
}

impl OutputSink for ImageFileOutput {
    fn write_frame(&mut self, index: u64, frame: &RgbImage) -> Result<PathBuf> {
        let path = self.path_for(index);

        // Overwrites whatever a previous run left behind
        frame
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| CaptureError::FileWrite {
                path: path.clone(),
                source,
            })?;

        tracing::trace!("Wrote {}", path.display());
        Ok(path)
    }
}
