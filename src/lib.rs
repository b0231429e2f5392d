// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # EdgeFirst Image Processing Library
//!
//! Single-channel image processing primitives over 8-bit and 32-bit float
//! buffers, addressed by row stride and region of interest, together with a
//! minimal camera capture interface.
//!
//! ## Features
//!
//! - **Images and Views**: Owned images with 32-byte aligned rows, and
//!   borrowed views that can wrap external strided buffers.
//! - **Pixel Operations**: Fill, copy, scale conversions, arithmetic,
//!   comparison, thresholding and Gauss, Sobel and max filters.
//! - **Geometry**: Perspective warp and resize with nearest, bilinear and
//!   bicubic interpolation.
//! - **Feature Points**: Point extraction and a Hessian corner detector.
//! - **Camera Capture**: Synthetic test pattern, still images from disk and
//!   V4L2 devices (`v4l2` feature).
//!
//! ## Example
//!
//! ```
//! use edgefirst_imgproc::{
//!     image::Image,
//!     ops::{self, MaskSize},
//!     roi::{Roi, Size},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pattern = Image::<f32>::new(Size::new(64, 48));
//! ops::image_jaehne(&mut pattern.view_mut())?;
//!
//! // Leave a border so the 5x5 mask stays inside the source buffer
//! let inner = Roi::new(2, 45, 2, 61);
//! let mut smooth = Image::<f32>::new(Size::new(64, 48));
//! ops::filter_gauss(
//!     &pattern.roi_view(inner)?,
//!     &mut smooth.roi_view_mut(inner)?,
//!     MaskSize::Mask5x5,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Status Codes
//!
//! Every failure maps to a [`Status`] code. Negative codes are errors,
//! positive codes are warnings returned by operations that still complete,
//! and [`status_string`] describes any code.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod image;
pub mod ops;
pub mod points;
pub mod roi;

pub use error::{status_string, Error, Result, Status};
