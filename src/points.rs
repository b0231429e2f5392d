// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Feature-point extraction.

use crate::{
    error::Result,
    image::{Image, ImageView},
    ops::{self, check_nonempty, CmpOp, MaskSize},
    roi::{Point, Size},
};
use tracing::{instrument, trace};

/// Positions extracted from a response image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Points {
    /// Up to `max` positions in raster order, in buffer coordinates.
    pub points: Vec<Point>,
    /// Number of positive pixels found, which may exceed `points.len()`.
    pub total: usize,
}

impl Points {
    pub fn is_truncated(&self) -> bool {
        self.total > self.points.len()
    }
}

/// Collects the positions of pixels greater than zero inside the ROI.
pub fn get_points(src: &ImageView<'_, f32>, max: usize) -> Result<Points> {
    check_nonempty(src.size())?;
    let origin = src.roi().top_left();
    let mut out = Points::default();
    for y in 0..src.height() {
        for (x, &v) in src.row(y).iter().enumerate() {
            if v > 0.0 {
                if out.points.len() < max {
                    out.points.push(Point::new(origin.x + x, origin.y + y));
                }
                out.total += 1;
            }
        }
    }
    Ok(out)
}

/// Parameters of [`detect_corners`].
#[derive(Clone, Debug, PartialEq)]
pub struct CornerParams {
    /// Smoothing mask applied before differentiation.
    pub smooth: MaskSize,
    /// Responses below `threshold * max_response` are discarded.
    pub threshold: f32,
    pub max_points: usize,
}

impl Default for CornerParams {
    fn default() -> Self {
        Self {
            smooth: MaskSize::Mask5x5,
            threshold: 0.1,
            max_points: 500,
        }
    }
}

/// Border, in pixels, that [`detect_corners`] consumes inside the source ROI.
pub fn corner_margin(params: &CornerParams) -> usize {
    // smoothing + first derivative + second derivative + non-max window
    params.smooth.radius() + 3
}

/// Hessian corner detector.
///
/// Computes the response `|gxx * gyy - gxy^2|` of the smoothed image, keeps
/// local maxima in 3x3 windows that exceed the relative threshold, and
/// returns their positions. Points are only reported at least
/// [`corner_margin`] pixels inside the source ROI.
#[instrument(skip_all, fields(roi = %src.roi()))]
pub fn detect_corners(src: &ImageView<'_, f32>, params: &CornerParams) -> Result<Points> {
    let size = src.buffer_size();
    let r = params.smooth.radius() as i32;
    let roi = src.roi();

    let smooth_roi = roi.shrink(r, r);
    let d1_roi = smooth_roi.shrink(1, 1);
    let d2_roi = d1_roi.shrink(1, 1);
    let nms_roi = d2_roi.shrink(1, 1);
    if nms_roi.is_empty() {
        return Ok(Points::default());
    }

    let mut smooth = Image::<f32>::new(size);
    ops::filter_gauss(
        &src.sub(smooth_roi)?,
        &mut smooth.roi_view_mut(smooth_roi)?,
        params.smooth,
    )?;

    let mut gx = Image::<f32>::new(size);
    let mut gy = Image::<f32>::new(size);
    ops::filter_sobel_vert(&smooth.roi_view(d1_roi)?, &mut gx.roi_view_mut(d1_roi)?)?;
    ops::filter_sobel_horiz(&smooth.roi_view(d1_roi)?, &mut gy.roi_view_mut(d1_roi)?)?;

    let mut gxx = Image::<f32>::new(size);
    let mut gyy = Image::<f32>::new(size);
    let mut gxy = Image::<f32>::new(size);
    ops::filter_sobel_vert(&gx.roi_view(d2_roi)?, &mut gxx.roi_view_mut(d2_roi)?)?;
    ops::filter_sobel_horiz(&gy.roi_view(d2_roi)?, &mut gyy.roi_view_mut(d2_roi)?)?;
    ops::filter_sobel_horiz(&gx.roi_view(d2_roi)?, &mut gxy.roi_view_mut(d2_roi)?)?;

    // reuse the derivative buffers for the determinant terms
    let (mut a, mut b) = (gx, gy);
    ops::mul(&gxx.roi_view(d2_roi)?, &gyy.roi_view(d2_roi)?, &mut a.roi_view_mut(d2_roi)?)?;
    ops::mul(&gxy.roi_view(d2_roi)?, &gxy.roi_view(d2_roi)?, &mut b.roi_view_mut(d2_roi)?)?;
    let mut det = gxy;
    ops::sub(&a.roi_view(d2_roi)?, &b.roi_view(d2_roi)?, &mut det.roi_view_mut(d2_roi)?)?;
    let mut response = gxx;
    ops::abs(&det.roi_view(d2_roi)?, &mut response.roi_view_mut(d2_roi)?)?;

    let mut local_max = Image::<f32>::new(size);
    ops::filter_max(
        &response.roi_view(nms_roi)?,
        &mut local_max.roi_view_mut(nms_roi)?,
        Size::new(3, 3),
        Point::new(1, 1),
    )?;
    let mut is_max = Image::<u8>::new(size);
    ops::compare(
        &response.roi_view(nms_roi)?,
        &local_max.roi_view(nms_roi)?,
        &mut is_max.roi_view_mut(nms_roi)?,
        CmpOp::Eq,
    )?;

    let (_, peak) = ops::min_max(&response.roi_view(nms_roi)?)?;
    if peak.is_nan() || peak <= 0.0 {
        return Ok(Points::default());
    }
    let threshold = params.threshold * peak;
    trace!(peak, threshold, "corner response");

    let mut strong = local_max;
    ops::threshold_val(
        &response.roi_view(nms_roi)?,
        &mut strong.roi_view_mut(nms_roi)?,
        threshold,
        0.0,
        CmpOp::Less,
    )?;
    let mut corners = det;
    ops::set(0.0, &mut corners.roi_view_mut(nms_roi)?)?;
    ops::copy_masked(
        &strong.roi_view(nms_roi)?,
        &mut corners.roi_view_mut(nms_roi)?,
        &is_max.roi_view(nms_roi)?,
    )?;

    get_points(&corners.roi_view(nms_roi)?, params.max_points)
}

/// Convenience wrapper running [`detect_corners`] on a whole image.
pub fn detect_corners_in(image: &Image<f32>, params: &CornerParams) -> Result<Points> {
    detect_corners(&image.view(), params)
}
