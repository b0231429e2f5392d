// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::{FrameSource, PixelFormat, RawFrame};
use crate::{
    error::{Error, Result},
    roi::Size,
};
use libc::{c_void, mmap, munmap, MAP_FAILED, MAP_SHARED, PROT_READ};
use std::ptr::null_mut;
use tracing::{debug, warn};
use videostream::{
    camera::{create_camera, CameraReader},
    fourcc::FourCC,
};

fn camera_error(e: impl std::fmt::Display) -> Error {
    Error::Camera(e.to_string())
}

/// Read-only mapping of a capture buffer, unmapped on drop.
struct MappedBuffer {
    ptr: *mut u8,
    len: usize,
}

impl MappedBuffer {
    fn new(fd: i32, len: usize) -> Result<Self> {
        let ptr = unsafe { mmap(null_mut(), len, PROT_READ, MAP_SHARED, fd, 0) };
        if ptr == MAP_FAILED {
            return Err(std::io::Error::last_os_error().into());
        }
        Ok(Self {
            ptr: ptr as *mut u8,
            len,
        })
    }

    fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl Drop for MappedBuffer {
    fn drop(&mut self) {
        if unsafe { munmap(self.ptr.cast::<c_void>(), self.len) } != 0 {
            warn!("unmap failed!");
        }
    }
}

/// Video4Linux2 capture device.
pub struct V4l2Source {
    device: String,
    reader: CameraReader,
}

impl V4l2Source {
    pub fn open(device: &str, size: Size) -> Result<Self> {
        Ok(Self {
            device: device.to_owned(),
            reader: start(device, size)?,
        })
    }
}

fn start(device: &str, size: Size) -> Result<CameraReader> {
    let reader = create_camera()
        .with_device(device)
        .with_resolution(size.width as i32, size.height as i32)
        .with_format(FourCC(*b"YUYV"))
        .open()
        .map_err(camera_error)?;
    reader.start().map_err(camera_error)?;

    if reader.width() != size.width as i32 || reader.height() != size.height as i32 {
        warn!(
            "{device}: requested {size} but the driver set {}x{}",
            reader.width(),
            reader.height()
        );
    }
    Ok(reader)
}

impl FrameSource for V4l2Source {
    fn name(&self) -> &str {
        &self.device
    }

    fn configure(&mut self, size: Size) -> Result<()> {
        if self.reader.width() == size.width as i32 && self.reader.height() == size.height as i32 {
            return Ok(());
        }
        debug!("{}: reopening at {size}", self.device);
        self.reader = start(&self.device, size)?;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<RawFrame> {
        let buf = self.reader.read().map_err(camera_error)?;
        let format = match &buf.format().0 {
            b"YUYV" => PixelFormat::Yuyv,
            b"GREY" => PixelFormat::Gray8,
            b"RGB3" => PixelFormat::Rgb8,
            other => {
                return Err(Error::NotSupportedMode(format!(
                    "{}: pixel format {}",
                    self.device,
                    String::from_utf8_lossy(other)
                )))
            }
        };
        let width = buf.width() as usize;
        let height = buf.height() as usize;
        let len = (buf.length() as usize).min(format.row_bytes(width) * height);

        let mapped = MappedBuffer::new(buf.rawfd(), len)?;
        RawFrame::new(width, height, format, mapped.as_slice().to_vec())
    }
}
