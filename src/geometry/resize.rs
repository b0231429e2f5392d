// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::{sample, Interpolation};
use crate::{
    error::Result,
    image::{ImageView, ImageViewMut},
    ops::check_nonempty,
};

/// Resizes the source ROI onto the destination ROI.
///
/// The scale factors are the ratios of the ROI sizes. Pixel centres are
/// aligned, so destination pixel `d` samples source position
/// `(d + 0.5) * src / dst - 0.5` relative to the source ROI origin.
pub fn resize(
    src: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
    interp: Interpolation,
) -> Result<()> {
    check_nonempty(src.size())?;
    check_nonempty(dst.size())?;

    let sroi = src.roi();
    let fx = src.width() as f32 / dst.width() as f32;
    let fy = src.height() as f32 / dst.height() as f32;

    for y in 0..dst.height() {
        let sy = sroi.r1 as f32 + (y as f32 + 0.5) * fy - 0.5;
        for (x, o) in dst.row_mut(y).iter_mut().enumerate() {
            let sx = sroi.c1 as f32 + (x as f32 + 0.5) * fx - 0.5;
            *o = sample(src, sx, sy, interp);
        }
    }
    Ok(())
}
