// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Neighbourhood filters.
//!
//! Filters read source pixels around the source ROI, so the ROI grown by
//! the mask extent must lie inside the source buffer. Shrink the ROI by the
//! mask radius to filter a whole image.

use super::check_same_size;
use crate::{
    error::{Error, Result},
    image::{ImageView, ImageViewMut},
    roi::{Point, Size},
};

const GAUSS_3X3: [f32; 3] = [0.25, 0.5, 0.25];
const GAUSS_5X5: [f32; 5] = [2.0 / 30.0, 7.0 / 30.0, 12.0 / 30.0, 7.0 / 30.0, 2.0 / 30.0];

/// Square mask sizes supported by the fixed filters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaskSize {
    Mask3x3,
    Mask5x5,
}

impl MaskSize {
    pub fn radius(self) -> usize {
        match self {
            MaskSize::Mask3x3 => 1,
            MaskSize::Mask5x5 => 2,
        }
    }

    fn gauss_kernel(self) -> &'static [f32] {
        match self {
            MaskSize::Mask3x3 => &GAUSS_3X3,
            MaskSize::Mask5x5 => &GAUSS_5X5,
        }
    }
}

impl TryFrom<i32> for MaskSize {
    type Error = Error;

    /// Accepts the side length of the mask, 3 or 5.
    fn try_from(value: i32) -> Result<Self> {
        match value {
            3 => Ok(MaskSize::Mask3x3),
            5 => Ok(MaskSize::Mask5x5),
            _ => Err(Error::MaskSize {
                width: value.max(0) as usize,
                height: value.max(0) as usize,
            }),
        }
    }
}

/// Separable Gaussian smoothing with a fixed 3x3 or 5x5 kernel.
pub fn filter_gauss(
    src: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
    mask: MaskSize,
) -> Result<()> {
    check_same_size(dst.size(), src.size())?;
    let r = mask.radius();
    src.check_margin(r, r, r, r)?;
    let kernel = mask.gauss_kernel();

    let roi = src.roi();
    let (w, h) = (src.width(), src.height());
    let c0 = roi.c1 as usize;
    let r0 = roi.r1 as usize - r;

    // horizontal pass over the rows the vertical pass needs
    let rows = h + 2 * r;
    let mut tmp = vec![0.0f32; rows * w];
    for (j, out) in tmp.chunks_exact_mut(w).enumerate() {
        let line = src.buffer_row(r0 + j);
        for (x, o) in out.iter_mut().enumerate() {
            let base = c0 + x - r;
            *o = kernel
                .iter()
                .zip(&line[base..base + kernel.len()])
                .map(|(k, v)| k * v)
                .sum();
        }
    }

    for y in 0..h {
        let out = dst.row_mut(y);
        for (x, o) in out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, kv) in kernel.iter().enumerate() {
                acc += kv * tmp[(y + k) * w + x];
            }
            *o = acc;
        }
    }
    Ok(())
}

/// Horizontal derivative (responds to vertical edges), positive where
/// intensity increases to the right.
pub fn filter_sobel_vert(src: &ImageView<'_, f32>, dst: &mut ImageViewMut<'_, f32>) -> Result<()> {
    sobel(src, dst, |above, centre, below, c| {
        (above[c + 1] - above[c - 1])
            + 2.0 * (centre[c + 1] - centre[c - 1])
            + (below[c + 1] - below[c - 1])
    })
}

/// Vertical derivative (responds to horizontal edges), positive where
/// intensity increases downwards.
pub fn filter_sobel_horiz(
    src: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
) -> Result<()> {
    sobel(src, dst, |above, _, below, c| {
        (below[c - 1] - above[c - 1])
            + 2.0 * (below[c] - above[c])
            + (below[c + 1] - above[c + 1])
    })
}

fn sobel(
    src: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
    f: impl Fn(&[f32], &[f32], &[f32], usize) -> f32,
) -> Result<()> {
    check_same_size(dst.size(), src.size())?;
    src.check_margin(1, 1, 1, 1)?;

    let roi = src.roi();
    let c0 = roi.c1 as usize;
    for y in 0..dst.height() {
        let r = roi.r1 as usize + y;
        let above = src.buffer_row(r - 1);
        let centre = src.buffer_row(r);
        let below = src.buffer_row(r + 1);
        for (x, o) in dst.row_mut(y).iter_mut().enumerate() {
            *o = f(above, centre, below, c0 + x);
        }
    }
    Ok(())
}

/// Rectangular maximum filter.
///
/// `dst(x, y)` is the maximum of the `mask`-sized source rectangle whose
/// pixel `anchor` sits on `(x, y)`.
pub fn filter_max(
    src: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
    mask: Size,
    anchor: Point,
) -> Result<()> {
    if mask.is_empty() {
        return Err(Error::MaskSize {
            width: mask.width,
            height: mask.height,
        });
    }
    if anchor.x >= mask.width || anchor.y >= mask.height {
        return Err(Error::Anchor {
            x: anchor.x,
            y: anchor.y,
            width: mask.width,
            height: mask.height,
        });
    }
    check_same_size(dst.size(), src.size())?;
    let (left, right) = (anchor.x, mask.width - 1 - anchor.x);
    let (top, bottom) = (anchor.y, mask.height - 1 - anchor.y);
    src.check_margin(top, bottom, left, right)?;

    let roi = src.roi();
    let (w, h) = (src.width(), src.height());
    let c0 = roi.c1 as usize - left;
    let r0 = roi.r1 as usize - top;

    // max is separable over a rectangle: rows first, then columns
    let rows = h + mask.height - 1;
    let mut tmp = vec![0.0f32; rows * w];
    for (j, out) in tmp.chunks_exact_mut(w).enumerate() {
        let line = src.buffer_row(r0 + j);
        for (x, o) in out.iter_mut().enumerate() {
            *o = line[c0 + x..c0 + x + mask.width]
                .iter()
                .copied()
                .fold(f32::NEG_INFINITY, f32::max);
        }
    }

    for y in 0..h {
        for (x, o) in dst.row_mut(y).iter_mut().enumerate() {
            let mut m = f32::NEG_INFINITY;
            for k in 0..mask.height {
                m = m.max(tmp[(y + k) * w + x]);
            }
            *o = m;
        }
    }
    Ok(())
}
