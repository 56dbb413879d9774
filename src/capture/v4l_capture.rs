use super::{CaptureSource, Property, ReleaseLatch};
use crate::config::Resolution;
use crate::error::{CaptureError, Result};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraIndex, ControlValueSetter, KnownCameraControl, RequestedFormat, RequestedFormatType,
    Resolution as NokhwaResolution,
};
use nokhwa::Camera;

pub struct WebcamCapture {
    camera: Camera,
    index: u32,
    frames_read: u64,
    latch: ReleaseLatch,
}

impl WebcamCapture {
    /// Open the camera at `device_index`. Streaming waits for `start` so the resolution can change first.
    pub fn open(device_index: u32) -> Result<Self> {
        tracing::info!("Opening webcam {}", device_index);

        let index = CameraIndex::Index(device_index);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);

        let camera = Camera::new(index, requested).map_err(|e| CaptureError::DeviceOpen {
            index: device_index,
            reason: e.to_string(),
        })?;

        tracing::info!(
            "Webcam {} opened: {} at {:?}",
            device_index,
            camera.info().human_name(),
            camera.camera_format()
        );

        Ok(Self {
            camera,
            index: device_index,
            frames_read: 0,
            latch: ReleaseLatch::default(),
        })
    }

    fn ensure_stream(&mut self) -> Result<()> {
        if self.camera.is_stream_open() {
            return Ok(());
        }

        self.camera
            .open_stream()
            .map_err(|e| CaptureError::DeviceOpen {
                index: self.index,
                reason: format!("failed to open stream: {e}"),
            })?;
        self.latch.arm();

        tracing::debug!("Webcam {} stream open", self.index);
        Ok(())
    }
}

fn known_control(property: Property) -> Option<KnownCameraControl> {
    match property {
        // Deliberately unavailable: nokhwa's closest thing is the stream's pixel
        // format (logged on open), which has no numeric value to report.
        Property::Mode => None,
        Property::Brightness => Some(KnownCameraControl::Brightness),
        Property::Contrast => Some(KnownCameraControl::Contrast),
        Property::Saturation => Some(KnownCameraControl::Saturation),
        Property::Hue => Some(KnownCameraControl::Hue),
        Property::Gain => Some(KnownCameraControl::Gain),
        Property::Exposure => Some(KnownCameraControl::Exposure),
    }
}

fn numeric_value(value: ControlValueSetter) -> Option<f64> {
    match value {
        ControlValueSetter::Integer(v) => Some(v as f64),
        ControlValueSetter::Float(v) => Some(v),
        ControlValueSetter::Boolean(v) => Some(if v { 1.0 } else { 0.0 }),
        ControlValueSetter::EnumValue(v) => Some(v as f64),
        _ => None,
    }
}

impl CaptureSource for WebcamCapture {
    fn capture_frame(&mut self) -> Result<RgbImage> {
        let index = self.frames_read;
        self.ensure_stream()?;

        let frame = self.camera.frame().map_err(|e| CaptureError::FrameRead {
            index,
            reason: e.to_string(),
        })?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::FrameRead {
                index,
                reason: format!("failed to decode frame: {e}"),
            })?;

        self.frames_read += 1;
        Ok(decoded)
    }

    fn resolution(&self) -> Resolution {
        let res = self.camera.resolution();
        Resolution::new(res.width(), res.height())
    }

    fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        let requested = NokhwaResolution::new(resolution.width, resolution.height);
        self.camera
            .set_resolution(requested)
            .map_err(|e| CaptureError::Device(format!("cannot set {resolution}: {e}")))
    }

    fn property(&mut self, property: Property) -> Option<f64> {
        let control = known_control(property)?;
        match self.camera.camera_control(control) {
            Ok(control) => numeric_value(control.value()),
            Err(e) => {
                tracing::debug!("{} unavailable: {}", property.label(), e);
                None
            }
        }
    }

    fn start(&mut self) -> Result<()> {
        self.ensure_stream()
    }

    fn release(&mut self) -> Result<()> {
        let camera = &mut self.camera;
        let index = self.index;
        self.latch.release_with(|| {
            if camera.is_stream_open() {
                camera
                    .stop_stream()
                    .map_err(|e| CaptureError::Release(e.to_string()))?;
            }
            tracing::info!("Webcam {} released", index);
            Ok(())
        })
    }
}

impl Drop for WebcamCapture {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!("{}", e);
        }
    }
}
