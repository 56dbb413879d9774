use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::capture::{negotiate_resolution, read_properties, CaptureSource};
use crate::config::CaptureOptions;
use crate::error::{CaptureError, Result};
use crate::output::OutputSink;

/// Timing for one capture run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureStats {
    pub frames: u64,
    pub elapsed: Duration,
}

impl CaptureStats {
    /// Frames written per second, `None` when nothing was captured
    pub fn fps(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        if self.frames == 0 || secs <= 0.0 {
            return None;
        }
        Some(self.frames as f64 / secs)
    }

    pub fn summary(&self) -> String {
        match self.fps() {
            Some(fps) => format!("Approx {:.1}fps", fps),
            None => "No frames captured".to_string(),
        }
    }
}

fn print_properties<C, W>(source: &mut C, out: &mut W) -> Result<()>
where
    C: CaptureSource + ?Sized,
    W: Write,
{
    for reading in read_properties(source) {
        writeln!(out, "{}", reading)?;
    }
    Ok(())
}

/// Pre-capture setup: optional property report, resolution negotiation, then stream start
pub fn prepare<C, W>(source: &mut C, options: &CaptureOptions, out: &mut W) -> Result<()>
where
    C: CaptureSource + ?Sized,
    W: Write,
{
    if options.verbose {
        print_properties(source, out)?;
    }

    if let Some(requested) = options.resolution {
        negotiate_resolution(source, requested)?;
    }

    source.start()
}

/// Flag a stop request. Returns true if one was already pending.
pub fn request_stop(stop: &AtomicBool) -> bool {
    stop.swap(true, Ordering::SeqCst)
}

/// Full run: setup, capture, then release the source whether or not anything failed
pub fn run<C, O, W>(
    source: &mut C,
    sink: &mut O,
    options: &CaptureOptions,
    stop: &AtomicBool,
    out: &mut W,
) -> Result<CaptureStats>
where
    C: CaptureSource + ?Sized,
    O: OutputSink + ?Sized,
    W: Write,
{
    let outcome = match prepare(source, options, out) {
        Ok(()) => run_capture(source, sink, options, stop, out),
        Err(e) => Err(e),
    };

    match (outcome, source.release()) {
        (Ok(stats), Ok(())) => Ok(stats),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), released) => {
            if let Err(release_err) = released {
                tracing::warn!("{}", release_err);
            }
            Err(e)
        }
    }
}

/// Read frames and hand them to `sink` until the count is reached or `stop` is set
pub fn run_capture<C, O, W>(
    source: &mut C,
    sink: &mut O,
    options: &CaptureOptions,
    stop: &AtomicBool,
    out: &mut W,
) -> Result<CaptureStats>
where
    C: CaptureSource + ?Sized,
    O: OutputSink + ?Sized,
    W: Write,
{
    let expected = source.resolution();
    let limit = options.frame_count.unwrap_or(u64::MAX);
    let mut frames = 0u64;

    match options.frame_count {
        Some(n) => tracing::info!("Capturing {} frames at {}", n, expected),
        None => tracing::info!("Capturing at {} until interrupted (Ctrl+C to stop)", expected),
    }
    if options.verbose {
        writeln!(out, "Starting...")?;
    }

    let start = Instant::now();
    for index in 0..limit {
        if stop.load(Ordering::SeqCst) {
            tracing::info!("Interrupted after {} frames", frames);
            break;
        }

        let frame = source.capture_frame()?;
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(CaptureError::FrameRead {
                index,
                reason: "device returned an empty frame".to_string(),
            });
        }
        if (width, height) != (expected.width, expected.height) {
            tracing::warn!(
                "Frame {} is {}x{}, expected {}",
                index,
                width,
                height,
                expected
            );
        }

        let path = sink.write_frame(index, &frame)?;
        frames += 1;

        if options.verbose {
            writeln!(out, "{} - frame {}", path.display(), index)?;
        }
    }

    let stats = CaptureStats {
        frames,
        elapsed: start.elapsed(),
    };
    writeln!(out, "{}", stats.summary())?;

    if options.verbose {
        writeln!(out, "Done")?;
        print_properties(source, out)?;
    }

    Ok(stats)
}
