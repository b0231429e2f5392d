// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::{sample, Interpolation};
use crate::{
    error::{Error, Result, Status},
    image::{ImageView, ImageViewMut},
    ops::check_nonempty,
};
use tracing::trace;

/// Inverts a row-major 3x3 homography.
///
/// # Errors
///
/// [`Error::Coeff`] if the matrix has non-finite entries or is singular.
pub fn invert_homography(h: &[f64; 9]) -> Result<[f64; 9]> {
    if h.iter().any(|v| !v.is_finite()) {
        return Err(Error::Coeff("homography has non-finite entries".to_owned()));
    }

    let cof = [
        h[4] * h[8] - h[5] * h[7],
        h[5] * h[6] - h[3] * h[8],
        h[3] * h[7] - h[4] * h[6],
    ];
    let det = h[0] * cof[0] + h[1] * cof[1] + h[2] * cof[2];
    let scale = h.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if det.abs() <= 1e-12 * scale * scale * scale {
        return Err(Error::Coeff(format!("homography is singular (det {det:e})")));
    }

    let inv = 1.0 / det;
    Ok([
        cof[0] * inv,
        (h[2] * h[7] - h[1] * h[8]) * inv,
        (h[1] * h[5] - h[2] * h[4]) * inv,
        cof[1] * inv,
        (h[0] * h[8] - h[2] * h[6]) * inv,
        (h[2] * h[3] - h[0] * h[5]) * inv,
        cof[2] * inv,
        (h[1] * h[6] - h[0] * h[7]) * inv,
        (h[0] * h[4] - h[1] * h[3]) * inv,
    ])
}

/// Perspective warp.
///
/// `h` maps source buffer coordinates to destination buffer coordinates,
/// `x' = (h0 x + h1 y + h2) / (h6 x + h7 y + h8)` and likewise for `y'`
/// with `h3..h5`. Every destination ROI pixel is mapped back through the
/// inverse; pixels landing inside the source ROI are interpolated and
/// written, all other destination pixels keep their value.
///
/// Returns [`Status::WrongIntersectQuad`] when the warped source ROI does not
/// cover any destination ROI pixel.
pub fn warp_perspective(
    src: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
    h: &[f64; 9],
    interp: Interpolation,
) -> Result<Status> {
    check_nonempty(src.size())?;
    check_nonempty(dst.size())?;
    let inv = invert_homography(h)?;

    let sroi = src.roi();
    let (c1, c2) = (sroi.c1 as f64, sroi.c2 as f64);
    let (r1, r2) = (sroi.r1 as f64, sroi.r2 as f64);
    let droi = dst.roi();

    let mut written = 0usize;
    for y in 0..dst.height() {
        let v = (droi.r1 as usize + y) as f64;
        let out = dst.row_mut(y);
        for (x, o) in out.iter_mut().enumerate() {
            let u = (droi.c1 as usize + x) as f64;
            let w = inv[6] * u + inv[7] * v + inv[8];
            if w.abs() < f64::EPSILON {
                continue;
            }
            let sx = (inv[0] * u + inv[1] * v + inv[2]) / w;
            let sy = (inv[3] * u + inv[4] * v + inv[5]) / w;
            if sx < c1 || sx > c2 || sy < r1 || sy > r2 {
                continue;
            }
            *o = sample(src, sx as f32, sy as f32, interp);
            written += 1;
        }
    }

    trace!(written, "warp_perspective");
    if written == 0 {
        Ok(Status::WrongIntersectQuad)
    } else {
        Ok(Status::NoErr)
    }
}
