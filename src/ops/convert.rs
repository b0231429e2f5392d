// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::{check_nonempty, check_same_size};
use crate::{
    error::{Error, Result},
    image::{ImageView, ImageViewMut, Pixel},
};
use std::f32::consts::PI;

/// Fills the destination ROI with `value`.
pub fn set<T: Pixel>(value: T, dst: &mut ImageViewMut<'_, T>) -> Result<()> {
    check_nonempty(dst.size())?;
    for y in 0..dst.height() {
        dst.row_mut(y).fill(value);
    }
    Ok(())
}

pub fn copy<T: Pixel>(src: &ImageView<'_, T>, dst: &mut ImageViewMut<'_, T>) -> Result<()> {
    check_same_size(dst.size(), src.size())?;
    for y in 0..dst.height() {
        dst.row_mut(y).copy_from_slice(src.row(y));
    }
    Ok(())
}

/// Copies only the pixels whose mask value is non-zero.
pub fn copy_masked<T: Pixel>(
    src: &ImageView<'_, T>,
    dst: &mut ImageViewMut<'_, T>,
    mask: &ImageView<'_, u8>,
) -> Result<()> {
    check_same_size(dst.size(), src.size())?;
    check_same_size(dst.size(), mask.size())?;
    for y in 0..dst.height() {
        let s = src.row(y);
        let m = mask.row(y);
        for ((d, &s), &m) in dst.row_mut(y).iter_mut().zip(s).zip(m) {
            if m != 0 {
                *d = s;
            }
        }
    }
    Ok(())
}

/// Writes the Jaehne test pattern, concentric rings of increasing frequency
/// with values in `[0, 1]`.
pub fn image_jaehne(dst: &mut ImageViewMut<'_, f32>) -> Result<()> {
    check_nonempty(dst.size())?;
    let w = dst.width() as f32;
    let h = dst.height() as f32;
    for y in 0..dst.height() {
        let y2 = y as f32 - (h - 1.0) / 2.0;
        for (x, d) in dst.row_mut(y).iter_mut().enumerate() {
            let x2 = x as f32 - (w - 1.0) / 2.0;
            let phase = 0.5 * PI * (x2 * x2 + y2 * y2) / h;
            *d = 0.5 + 0.5 * phase.sin();
        }
    }
    Ok(())
}

/// Maps `0..=255` linearly onto `vmin..=vmax`.
pub fn scale_8u32f(
    src: &ImageView<'_, u8>,
    dst: &mut ImageViewMut<'_, f32>,
    vmin: f32,
    vmax: f32,
) -> Result<()> {
    check_scale_range(vmin, vmax)?;
    check_same_size(dst.size(), src.size())?;
    let k = (vmax - vmin) / 255.0;
    for y in 0..dst.height() {
        for (d, &s) in dst.row_mut(y).iter_mut().zip(src.row(y)) {
            *d = vmin + k * s as f32;
        }
    }
    Ok(())
}

/// Maps `vmin..=vmax` linearly onto `0..=255`, saturating values outside the
/// range.
pub fn scale_32f8u(
    src: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, u8>,
    vmin: f32,
    vmax: f32,
) -> Result<()> {
    check_scale_range(vmin, vmax)?;
    check_same_size(dst.size(), src.size())?;
    let k = 255.0 / (vmax - vmin);
    for y in 0..dst.height() {
        for (d, &s) in dst.row_mut(y).iter_mut().zip(src.row(y)) {
            *d = u8::from_f32((s - vmin) * k);
        }
    }
    Ok(())
}

fn check_scale_range(min: f32, max: f32) -> Result<()> {
    // also rejects NaN bounds
    if min < max {
        Ok(())
    } else {
        Err(Error::ScaleRange { min, max })
    }
}
