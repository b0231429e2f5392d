// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Geometric transforms of `f32` images.
//!
//! Coordinates are buffer coordinates with integers at pixel centres.
//! Interpolation never reads outside the source ROI: neighbours beyond its
//! edges are clamped onto it.

mod resize;
mod sample;
mod warp;

pub use resize::resize;
pub use sample::sample;
pub use warp::{invert_homography, warp_perspective};

use crate::error::Error;

/// Interpolation selector; the discriminants are the integer codes accepted
/// by [`Interpolation::try_from`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Nearest = 1,
    Linear = 2,
    Cubic = 4,
}

impl TryFrom<i32> for Interpolation {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Interpolation::Nearest),
            2 => Ok(Interpolation::Linear),
            4 => Ok(Interpolation::Cubic),
            _ => Err(Error::Interpolation(value)),
        }
    }
}
