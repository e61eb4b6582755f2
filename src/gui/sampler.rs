//! Cursor and pixel sampling
//!
//! The cursor comes from `device_query`. Pixels on the primary display come
//! from a `scrap` capture (BGRA rows); `scrap` reports `WouldBlock` when the
//! screen has not changed since the last frame, so the last frame is kept and
//! reused. Points the primary frame does not cover (other monitors, or no
//! frame yet) are read from whichever monitor `xcap` says contains them.

use device_query::{DeviceQuery, DeviceState};
use scrap::{Capturer, Display};
use screen_color_picker::desktop::{CursorPosition, ScreenSampler};
use screen_color_picker::{Color, PickerError, Result};
use std::io::ErrorKind;
use tracing::{debug, info, warn};
use xcap::Monitor;

pub struct ScrapSampler {
    device: DeviceState,
    capturer: Option<Capturer>,
    frame: Vec<u8>,
    width: usize,
    height: usize,
}

impl ScrapSampler {
    /// Fails when no display connection is available for cursor queries
    pub fn new() -> Result<Self> {
        let device = DeviceState::checked_new().ok_or(PickerError::CursorUnavailable)?;
        Ok(Self {
            device,
            capturer: None,
            frame: Vec::new(),
            width: 0,
            height: 0,
        })
    }

    fn open_capturer() -> Result<Capturer> {
        let display = Display::main().map_err(|e| PickerError::CaptureFailed(Box::new(e)))?;
        let capturer = Capturer::new(display).map_err(|e| PickerError::CaptureFailed(Box::new(e)))?;
        info!(
            "Capturing primary display ({}x{})",
            capturer.width(),
            capturer.height()
        );
        Ok(capturer)
    }

    fn refresh_frame(&mut self) -> Result<()> {
        if self.capturer.is_none() {
            self.capturer = Some(Self::open_capturer()?);
        }
        let Some(capturer) = self.capturer.as_mut() else {
            return Err(PickerError::CaptureNotReady);
        };

        let width = capturer.width();
        let height = capturer.height();
        let outcome = match capturer.frame() {
            Ok(frame) => {
                self.frame.clear();
                self.frame.extend_from_slice(&frame);
                self.width = width;
                self.height = height;
                Ok(())
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                if self.frame.is_empty() {
                    Err(PickerError::CaptureNotReady)
                } else {
                    Ok(())
                }
            }
            Err(e) => {
                // Reopen on the next sample; the display may have been reconfigured
                warn!("Capture error, dropping capturer: {e}");
                self.release_capture();
                Err(PickerError::CaptureFailed(Box::new(e)))
            }
        }
    }

    fn primary_pixel(&mut self, position: CursorPosition) -> Result<Color> {
        self.refresh_frame()?;
        pixel_at(&self.frame, self.width, self.height, position)
    }
}

impl ScreenSampler for ScrapSampler {
    fn cursor_position(&mut self) -> Result<CursorPosition> {
        let (x, y) = self.device.get_mouse().coords;
        Ok(CursorPosition::new(x, y))
    }

    fn pixel_color(&mut self, position: CursorPosition) -> Result<Color> {
        match self.primary_pixel(position) {
            Err(PickerError::OutsideDisplay { .. } | PickerError::CaptureNotReady) => {
                monitor_pixel(position)
            }
            result => result,
        }
    }

    fn release_capture(&mut self) {
        if self.capturer.take().is_some() {
            debug!("Released screen capturer");
        }
        self.frame = Vec::new();
        self.width = 0;
        self.height = 0;
    }
}

fn xcap_error(e: xcap::XCapError) -> PickerError {
    PickerError::CaptureFailed(e.to_string().into())
}

/// Read `position` from the monitor that contains it
fn monitor_pixel(position: CursorPosition) -> Result<Color> {
    let outside = || PickerError::OutsideDisplay {
        x: position.x,
        y: position.y,
    };
    let monitor = Monitor::from_point(position.x, position.y).map_err(|_| outside())?;
    let origin = (
        monitor.x().map_err(xcap_error)?,
        monitor.y().map_err(xcap_error)?,
    );
    let image = monitor.capture_image().map_err(xcap_error)?;
    let (x, y) = monitor_local(position, origin, image.dimensions()).ok_or_else(outside)?;
    let [r, g, b, _] = image.get_pixel_checked(x, y).ok_or_else(outside)?.0;
    Ok(Color::from_rgb(r, g, b))
}

/// Translate a screen point into pixel coordinates of a monitor whose
/// top-left corner sits at `origin` and whose capture is `size` pixels.
fn monitor_local(
    position: CursorPosition,
    origin: (i32, i32),
    size: (u32, u32),
) -> Option<(u32, u32)> {
    let x = u32::try_from(position.x.checked_sub(origin.0)?).ok()?;
    let y = u32::try_from(position.y.checked_sub(origin.1)?).ok()?;
    (x < size.0 && y < size.1).then_some((x, y))
}

/// Decode the pixel at `position` from a BGRA frame of `width` x `height`.
/// Rows may be padded beyond `width * 4`, so the stride is taken from the
/// frame length.
fn pixel_at(frame: &[u8], width: usize, height: usize, position: CursorPosition) -> Result<Color> {
    let outside = PickerError::OutsideDisplay {
        x: position.x,
        y: position.y,
    };
    let (Ok(x), Ok(y)) = (usize::try_from(position.x), usize::try_from(position.y)) else {
        return Err(outside);
    };
    if x >= width || y >= height {
        return Err(outside);
    }

    let stride = frame.len() / height;
    let idx = y * stride + x * 4;
    match frame.get(idx..idx + 3) {
        Some(&[b, g, r]) => Ok(Color::from_rgb(r, g, b)),
        _ => Err(outside),
    }
}
