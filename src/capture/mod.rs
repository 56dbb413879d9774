mod properties;
mod v4l_capture;

#[cfg(test)]
pub mod fake;

pub use properties::{read_properties, Property, PropertyReading};
pub use v4l_capture::WebcamCapture;

use crate::config::Resolution;
use crate::error::{CaptureError, Result};
use image::RgbImage;

/// Trait for camera capture sources
pub trait CaptureSource {
    /// Capture a single frame
    fn capture_frame(&mut self) -> Result<RgbImage>;

    /// Resolution the device currently reports
    fn resolution(&self) -> Resolution;

    /// Ask the device for a new resolution. The device may silently pick another one.
    fn set_resolution(&mut self, resolution: Resolution) -> Result<()>;

    /// Current value of a device property, `None` when the device has no such control
    fn property(&mut self, property: Property) -> Option<f64>;

    /// Start streaming. Called once setup is done, before the first frame is timed.
    fn start(&mut self) -> Result<()>;

    /// Release the device. Calling it again is a no-op.
    fn release(&mut self) -> Result<()>;
}

/// Tracks whether a device still needs releasing
#[derive(Debug, Default)]
pub struct ReleaseLatch {
    released: bool,
}

impl ReleaseLatch {
    /// Mark the device as held again, e.g. after reopening its stream
    pub fn arm(&mut self) {
        self.released = false;
    }

    /// Run `release` unless it already ran since the last `arm`
    pub fn release_with<F>(&mut self, release: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        if self.released {
            return Ok(());
        }
        self.released = true;
        release()
    }
}

/// Request `requested` and fail unless the device reports back exactly that size
pub fn negotiate_resolution<C: CaptureSource + ?Sized>(
    source: &mut C,
    requested: Resolution,
) -> Result<Resolution> {
    tracing::info!("Requesting resolution {}", requested);

    if let Err(e) = source.set_resolution(requested) {
        tracing::warn!("Device rejected resolution {}: {}", requested, e);
    }

    let actual = source.resolution();
    if actual != requested {
        return Err(CaptureError::ResolutionMismatch { requested, actual });
    }

    tracing::info!("Resolution set to {}", actual);
    Ok(actual)
}
