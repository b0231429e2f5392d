// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Pixel-buffer operations on single-channel `u8` and `f32` images.
//!
//! Every operation processes exactly the destination ROI. Source views must
//! have a ROI of the same size, otherwise [`Error::Size`] is returned, as it
//! is for empty regions.

mod arith;
mod convert;
mod filter;

pub use arith::{abs, add, compare, min_max, mul, mul_c, sqrt, sub, threshold_val, CmpOp};
pub use convert::{copy, copy_masked, image_jaehne, scale_32f8u, scale_8u32f, set};
pub use filter::{filter_gauss, filter_max, filter_sobel_horiz, filter_sobel_vert, MaskSize};

use crate::{
    error::{Error, Result},
    roi::Size,
};

pub(crate) fn check_nonempty(size: Size) -> Result<()> {
    if size.is_empty() {
        return Err(Error::size(format!("empty region {size}")));
    }
    Ok(())
}

pub(crate) fn check_same_size(dst: Size, src: Size) -> Result<()> {
    check_nonempty(dst)?;
    if dst != src {
        return Err(Error::size(format!(
            "source region {src} does not match destination region {dst}"
        )));
    }
    Ok(())
}
