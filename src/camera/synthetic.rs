// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::{FrameSource, PixelFormat, RawFrame};
use crate::{
    error::Result,
    image::Image,
    ops,
    roi::{Roi, Size},
};

/// Horizontal travel of the pattern before it wraps, in pixels.
const TRAVEL: usize = 64;
const SPEED: usize = 2;

/// Test source: a Jaehne ring pattern drifting sideways, one step per frame.
pub struct SyntheticSource {
    pattern: Image<u8>,
    size: Size,
    frame: usize,
}

impl SyntheticSource {
    pub fn new(size: Size) -> Result<Self> {
        Ok(Self {
            pattern: render(size)?,
            size,
            frame: 0,
        })
    }
}

fn render(size: Size) -> Result<Image<u8>> {
    let wide = Size::new(size.width + TRAVEL, size.height);
    let mut rings = Image::<f32>::new(wide);
    ops::image_jaehne(&mut rings.view_mut())?;
    let mut pattern = Image::<u8>::new(wide);
    ops::scale_32f8u(&rings.view(), &mut pattern.view_mut(), 0.0, 1.0)?;
    Ok(pattern)
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &str {
        "jaehne"
    }

    fn configure(&mut self, size: Size) -> Result<()> {
        if size != self.size {
            self.pattern = render(size)?;
            self.size = size;
        }
        Ok(())
    }

    fn next_frame(&mut self) -> Result<RawFrame> {
        let offset = (self.frame * SPEED) % TRAVEL;
        self.frame += 1;

        let window = Roi::new(
            0,
            self.size.height as i32 - 1,
            offset as i32,
            (offset + self.size.width) as i32 - 1,
        );
        let view = self.pattern.roi_view(window)?;
        let mut data = Vec::with_capacity(self.size.area());
        for y in 0..view.height() {
            data.extend_from_slice(view.row(y));
        }
        RawFrame::new(self.size.width, self.size.height, PixelFormat::Gray8, data)
    }
}
