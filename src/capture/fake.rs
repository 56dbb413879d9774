//! Scripted capture source for tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{CaptureSource, Property, ReleaseLatch};
use crate::config::Resolution;
use crate::error::{CaptureError, Result};
use image::{Rgb, RgbImage};

pub struct FakeCamera {
    resolution: Resolution,
    supported: Vec<Resolution>,
    reject_set: bool,
    properties: HashMap<Property, f64>,
    fail_at: Option<u64>,
    empty_at: Option<u64>,
    drift: Option<(u64, Resolution)>,
    stop_after: Option<(u64, Arc<AtomicBool>)>,
    reads: u64,
    starts: u32,
    releases: u32,
    latch: ReleaseLatch,
}

impl FakeCamera {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            supported: vec![resolution],
            reject_set: false,
            properties: HashMap::new(),
            fail_at: None,
            empty_at: None,
            drift: None,
            stop_after: None,
            reads: 0,
            starts: 0,
            releases: 0,
            latch: ReleaseLatch::default(),
        }
    }

    pub fn with_supported(mut self, resolution: Resolution) -> Self {
        self.supported.push(resolution);
        self
    }

    /// Make every `set_resolution` call error without changing anything
    pub fn rejecting_set(mut self) -> Self {
        self.reject_set = true;
        self
    }

    pub fn with_property(mut self, property: Property, value: f64) -> Self {
        self.properties.insert(property, value);
        self
    }

    /// Make the read with this zero-based ordinal fail
    pub fn failing_at(mut self, read: u64) -> Self {
        self.fail_at = Some(read);
        self
    }

    /// Make the read with this zero-based ordinal return an empty buffer
    pub fn empty_at(mut self, read: u64) -> Self {
        self.empty_at = Some(read);
        self
    }

    /// Make the read with this zero-based ordinal return a frame of another size
    pub fn frame_size_at(mut self, read: u64, size: Resolution) -> Self {
        self.drift = Some((read, size));
        self
    }

    /// Raise `stop` once `reads` frames have been handed out, like a Ctrl+C mid-run
    pub fn stopping_after(mut self, reads: u64, stop: Arc<AtomicBool>) -> Self {
        self.stop_after = Some((reads, stop));
        self
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }

    pub fn starts(&self) -> u32 {
        self.starts
    }

    pub fn releases(&self) -> u32 {
        self.releases
    }
}

impl CaptureSource for FakeCamera {
    fn capture_frame(&mut self) -> Result<RgbImage> {
        let read = self.reads;
        self.reads += 1;

        if let Some((after, stop)) = &self.stop_after {
            if self.reads >= *after {
                stop.store(true, Ordering::SeqCst);
            }
        }

        if self.fail_at == Some(read) {
            return Err(CaptureError::FrameRead {
                index: read,
                reason: "device went away".to_string(),
            });
        }
        if self.empty_at == Some(read) {
            return Ok(RgbImage::new(0, 0));
        }

        let size = match self.drift {
            Some((at, size)) if at == read => size,
            _ => self.resolution,
        };
        let shade = (read % 256) as u8;
        Ok(RgbImage::from_pixel(
            size.width,
            size.height,
            Rgb([shade, shade, shade]),
        ))
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        if self.reject_set {
            return Err(CaptureError::Device(format!(
                "{resolution} is not a supported format"
            )));
        }
        if self.supported.contains(&resolution) {
            self.resolution = resolution;
        }
        Ok(())
    }

    fn property(&mut self, property: Property) -> Option<f64> {
        self.properties.get(&property).copied()
    }

    fn start(&mut self) -> Result<()> {
        self.starts += 1;
        self.latch.arm();
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        let releases = &mut self.releases;
        self.latch.release_with(|| {
            *releases += 1;
            Ok(())
        })
    }
}
