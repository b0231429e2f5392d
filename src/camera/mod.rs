// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Frame capture: open a camera by name, choose the capture mode and
//! geometry, then grab frames one at a time.
//!
//! # Example
//!
//! ```
//! use edgefirst_imgproc::camera::{Camera, CaptureMode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut cam = Camera::open("jaehne")?;
//! cam.set_mode(CaptureMode::Gray, 240, 320)?;
//!
//! let frame = cam.grab()?;
//! assert_eq!(frame.width(), 320);
//! assert_eq!(frame.height(), 240);
//! assert!(frame.step_bytes() >= 320);
//! # Ok(())
//! # }
//! ```

mod convert;
mod file;
mod synthetic;
#[cfg(feature = "v4l2")]
mod v4l2;

pub use file::FileSource;
pub use synthetic::SyntheticSource;
#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Source;

use crate::{
    error::{Error, Result},
    image::{Image, ImageView, ROW_ALIGN},
    roi::Size,
};
use std::path::Path;
use tracing::{debug, trace};

/// Capture resolution used until [`Camera::set_mode`] asks for another.
pub const DEFAULT_SIZE: Size = Size::new(640, 480);

/// Layout of the frames handed out by [`Camera::grab`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CaptureMode {
    /// One byte of luma per pixel.
    Gray,
    /// Three bytes per pixel, red first.
    Rgb,
}

impl CaptureMode {
    pub fn channels(self) -> usize {
        match self {
            CaptureMode::Gray => 1,
            CaptureMode::Rgb => 3,
        }
    }
}

/// Pixel layout produced by a [`FrameSource`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Gray8,
    Rgb8,
    /// Packed 4:2:2, two pixels in `Y0 U Y1 V`.
    Yuyv,
}

impl PixelFormat {
    pub fn row_bytes(self, width: usize) -> usize {
        match self {
            PixelFormat::Gray8 => width,
            PixelFormat::Rgb8 => 3 * width,
            PixelFormat::Yuyv => 2 * width,
        }
    }
}

/// A frame as delivered by a backend, before mode conversion.
#[derive(Clone, Debug)]
pub struct RawFrame {
    pub width: usize,
    pub height: usize,
    pub step: usize,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl RawFrame {
    /// Wraps tightly packed rows. YUYV frames need an even width since
    /// pixels come in pairs sharing chroma.
    pub fn new(width: usize, height: usize, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        if format == PixelFormat::Yuyv && width % 2 != 0 {
            return Err(Error::size(format!("yuyv frame width {width} is odd")));
        }
        let step = format.row_bytes(width);
        let expected = step * height;
        if data.len() < expected {
            return Err(Error::size(format!(
                "{width}x{height} {format:?} frame needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            step,
            format,
            data,
        })
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.step;
        &self.data[start..start + self.format.row_bytes(self.width)]
    }
}

/// Backend producing raw frames.
pub trait FrameSource {
    fn name(&self) -> &str;

    /// Asks the backend to capture at `size`. Backends that cannot change
    /// their native resolution ignore the request and [`Camera`] rescales.
    fn configure(&mut self, size: Size) -> Result<()> {
        let _ = size;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<RawFrame>;
}

/// One captured frame, borrowed from the camera until the next grab.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    data: &'a [u8],
    step: usize,
    width: usize,
    height: usize,
    mode: CaptureMode,
    sequence: u64,
}

impl<'a> Frame<'a> {
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Bytes between row starts, a multiple of 32.
    pub fn step_bytes(&self) -> usize {
        self.step
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Frames grabbed before this one.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Zero-copy view of a gray frame.
    pub fn view(&self) -> Result<ImageView<'a, u8>> {
        match self.mode {
            CaptureMode::Gray => ImageView::from_slice(self.width, self.height, self.step, self.data),
            CaptureMode::Rgb => Err(Error::NotSupportedMode(
                "rgb frames have no single-channel view".to_owned(),
            )),
        }
    }

    /// Copies the frame into an owned gray image, converting RGB to luma.
    pub fn to_image(&self) -> Result<Image<u8>> {
        match self.mode {
            CaptureMode::Gray => Ok(Image::from_view(&self.view()?)),
            CaptureMode::Rgb => {
                let mut img = Image::<u8>::new(self.size());
                for y in 0..self.height {
                    let src = &self.data[y * self.step..y * self.step + 3 * self.width];
                    for (d, px) in img.row_mut(y).iter_mut().zip(src.chunks_exact(3)) {
                        *d = convert::luma(px[0], px[1], px[2]);
                    }
                }
                Ok(img)
            }
        }
    }
}

/// Camera handle: a backend plus the requested capture mode and geometry.
///
/// The device is released when the handle is dropped.
pub struct Camera {
    source: Box<dyn FrameSource>,
    mode: CaptureMode,
    size: Option<Size>,
    buffer: Vec<u8>,
    step: usize,
    frame_size: Size,
    sequence: u64,
}

impl Camera {
    /// Opens a camera by name.
    ///
    /// - `"jaehne"` or `"synthetic"`: an animated test pattern.
    /// - `/dev/video*`: a V4L2 device, requires the `v4l2` feature.
    /// - a directory: its image files in name order, repeated forever.
    /// - a file: a single image, repeated forever.
    pub fn open(name: &str) -> Result<Self> {
        let source: Box<dyn FrameSource> = match name {
            "jaehne" | "synthetic" => Box::new(SyntheticSource::new(DEFAULT_SIZE)?),
            _ if name.starts_with("/dev/video") => open_device(name)?,
            _ => Box::new(FileSource::open(Path::new(name))?),
        };
        debug!("camera {} opened", source.name());
        Ok(Self::from_source(source))
    }

    pub fn from_source(source: Box<dyn FrameSource>) -> Self {
        Self {
            source,
            mode: CaptureMode::Gray,
            size: None,
            buffer: Vec::new(),
            step: 0,
            frame_size: Size::default(),
            sequence: 0,
        }
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Requested frame size, `None` while the native size is used.
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Selects the capture mode and the frame geometry.
    pub fn set_mode(&mut self, mode: CaptureMode, rows: usize, cols: usize) -> Result<()> {
        let size = Size::new(cols, rows);
        if size.is_empty() {
            return Err(Error::size(format!("capture size {size} is empty")));
        }
        self.source.configure(size)?;
        self.mode = mode;
        self.size = Some(size);
        debug!("camera {} mode {:?} {}", self.source.name(), mode, size);
        Ok(())
    }

    /// Captures the next frame.
    pub fn grab(&mut self) -> Result<Frame<'_>> {
        let raw = self.source.next_frame()?;
        let native = convert::to_mode(&raw, self.mode);
        let native_size = Size::new(raw.width, raw.height);
        let target = self.size.unwrap_or(native_size);
        let channels = self.mode.channels();

        let planes = if target == native_size {
            native
        } else {
            convert::resize_planes(&native, native_size, target)?
        };

        let row = target.width * channels;
        self.step = row.div_ceil(ROW_ALIGN) * ROW_ALIGN;
        self.buffer.clear();
        self.buffer.resize(self.step * target.height, 0);
        convert::interleave(&planes, target, &mut self.buffer, self.step);
        self.frame_size = target;

        let sequence = self.sequence;
        self.sequence += 1;
        trace!(sequence, "camera {} frame {}", self.source.name(), target);

        Ok(Frame {
            data: &self.buffer,
            step: self.step,
            width: self.frame_size.width,
            height: self.frame_size.height,
            mode: self.mode,
            sequence,
        })
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        debug!("camera {} closed", self.source.name());
    }
}

#[cfg(feature = "v4l2")]
fn open_device(name: &str) -> Result<Box<dyn FrameSource>> {
    Ok(Box::new(V4l2Source::open(name, DEFAULT_SIZE)?))
}

#[cfg(not(feature = "v4l2"))]
fn open_device(name: &str) -> Result<Box<dyn FrameSource>> {
    Err(Error::NotSupportedMode(format!(
        "{name}: built without the v4l2 feature"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;

    struct Checker {
        width: usize,
        height: usize,
    }

    impl FrameSource for Checker {
        fn name(&self) -> &str {
            "checker"
        }

        fn next_frame(&mut self) -> Result<RawFrame> {
            let mut data = Vec::with_capacity(3 * self.width * self.height);
            for y in 0..self.height {
                for x in 0..self.width {
                    let v = if (x + y) % 2 == 0 { 255 } else { 0 };
                    data.extend_from_slice(&[v, 0, 0]);
                }
            }
            RawFrame::new(self.width, self.height, PixelFormat::Rgb8, data)
        }
    }

    #[test]
    fn native_geometry_until_configured() {
        let mut cam = Camera::from_source(Box::new(Checker {
            width: 5,
            height: 3,
        }));
        let frame = cam.grab().expect("frame");
        assert_eq!(frame.size(), Size::new(5, 3));
        assert_eq!(frame.step_bytes(), 32);
        assert_eq!(frame.mode(), CaptureMode::Gray);
        assert_eq!(frame.sequence(), 0);

        // pure red maps to luma 77
        let img = frame.to_image().expect("image");
        assert_eq!(img.row(0), &[77, 0, 77, 0, 77]);
    }

    #[test]
    fn rgb_mode_keeps_channels() {
        let mut cam = Camera::from_source(Box::new(Checker {
            width: 4,
            height: 2,
        }));
        cam.set_mode(CaptureMode::Rgb, 2, 4).expect("mode");
        let _ = cam.grab().expect("frame");
        let frame = cam.grab().expect("frame");
        assert_eq!(frame.sequence(), 1);
        assert_eq!(&frame.data()[..6], &[255, 0, 0, 0, 0, 0]);
        assert_eq!(frame.view().unwrap_err().status(), Status::NotSupportedMode);
    }

    #[test]
    fn empty_mode_is_rejected() {
        let mut cam = Camera::from_source(Box::new(Checker {
            width: 4,
            height: 2,
        }));
        let err = cam.set_mode(CaptureMode::Gray, 0, 10).unwrap_err();
        assert_eq!(err.status(), Status::Size);
        assert_eq!(cam.size(), None);
    }

    struct OddYuyv;

    impl FrameSource for OddYuyv {
        fn name(&self) -> &str {
            "odd-yuyv"
        }

        fn next_frame(&mut self) -> Result<RawFrame> {
            RawFrame::new(5, 2, PixelFormat::Yuyv, vec![128; 20])
        }
    }

    #[test]
    fn odd_width_yuyv_is_rejected() {
        let err = RawFrame::new(5, 2, PixelFormat::Yuyv, vec![128; 20]).unwrap_err();
        assert_eq!(err.status(), Status::Size);
        assert!(RawFrame::new(4, 2, PixelFormat::Yuyv, vec![128; 16]).is_ok());

        let mut cam = Camera::from_source(Box::new(OddYuyv));
        cam.set_mode(CaptureMode::Rgb, 2, 5).expect("mode");
        let err = cam.grab().err().expect("odd frame");
        assert_eq!(err.status(), Status::Size);
    }

    #[cfg(not(feature = "v4l2"))]
    #[test]
    fn devices_need_v4l2_feature() {
        let err = Camera::open("/dev/video0").err().expect("no v4l2 support");
        assert_eq!(err.status(), Status::NotSupportedMode);
    }
}
