// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Conversions from backend pixel formats to capture modes.
//!
//! Frames travel as planes: one tightly packed `width * height` byte plane
//! per channel.

use super::{CaptureMode, PixelFormat, RawFrame};
use crate::{
    error::Result,
    geometry::{self, Interpolation},
    image::Image,
    ops,
    roi::Size,
};

/// BT.601 luma in 8.8 fixed point.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32 + 128) >> 8) as u8
}

fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let c = y as f32 - 16.0;
    let d = u as f32 - 128.0;
    let e = v as f32 - 128.0;
    let clamp = |x: f32| x.round().clamp(0.0, 255.0) as u8;
    [
        clamp(1.164 * c + 1.596 * e),
        clamp(1.164 * c - 0.392 * d - 0.813 * e),
        clamp(1.164 * c + 2.017 * d),
    ]
}

pub fn to_mode(raw: &RawFrame, mode: CaptureMode) -> Vec<Vec<u8>> {
    let n = raw.width * raw.height;
    match mode {
        CaptureMode::Gray => {
            let mut plane = Vec::with_capacity(n);
            for y in 0..raw.height {
                let row = raw.row(y);
                match raw.format {
                    PixelFormat::Gray8 => plane.extend_from_slice(row),
                    PixelFormat::Rgb8 => plane.extend(row.chunks_exact(3).map(|p| luma(p[0], p[1], p[2]))),
                    PixelFormat::Yuyv => plane.extend(row.iter().step_by(2).copied()),
                }
            }
            vec![plane]
        }
        CaptureMode::Rgb => {
            let mut planes = vec![Vec::with_capacity(n); 3];
            let mut push = |rgb: [u8; 3]| {
                for (plane, v) in planes.iter_mut().zip(rgb) {
                    plane.push(v);
                }
            };
            for y in 0..raw.height {
                let row = raw.row(y);
                match raw.format {
                    PixelFormat::Gray8 => row.iter().for_each(|&v| push([v, v, v])),
                    PixelFormat::Rgb8 => row.chunks_exact(3).for_each(|p| push([p[0], p[1], p[2]])),
                    PixelFormat::Yuyv => {
                        for quad in row.chunks_exact(4) {
                            push(yuv_to_rgb(quad[0], quad[1], quad[3]));
                            push(yuv_to_rgb(quad[2], quad[1], quad[3]));
                        }
                    }
                }
            }
            planes
        }
    }
}

/// Rescales every plane from `from` to `to` with bilinear interpolation.
pub fn resize_planes(planes: &[Vec<u8>], from: Size, to: Size) -> Result<Vec<Vec<u8>>> {
    let mut src = Image::<f32>::new(from);
    let mut dst = Image::<f32>::new(to);
    let mut out8 = Image::<u8>::new(to);

    planes
        .iter()
        .map(|plane| {
            let plane = Image::from_vec(from.width, from.height, plane.clone())?;
            ops::scale_8u32f(&plane.view(), &mut src.view_mut(), 0.0, 255.0)?;
            geometry::resize(&src.view(), &mut dst.view_mut(), Interpolation::Linear)?;
            ops::scale_32f8u(&dst.view(), &mut out8.view_mut(), 0.0, 255.0)?;

            let mut packed = Vec::with_capacity(to.area());
            for y in 0..to.height {
                packed.extend_from_slice(out8.row(y));
            }
            Ok(packed)
        })
        .collect()
}

/// Interleaves planes into `out`, rows `step` bytes apart.
pub fn interleave(planes: &[Vec<u8>], size: Size, out: &mut [u8], step: usize) {
    let channels = planes.len();
    for y in 0..size.height {
        let row = &mut out[y * step..y * step + size.width * channels];
        for (c, plane) in planes.iter().enumerate() {
            let src = &plane[y * size.width..(y + 1) * size.width];
            for (x, &v) in src.iter().enumerate() {
                row[x * channels + c] = v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_extremes() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 77);
    }

    #[test]
    fn yuyv_gray_takes_luma_bytes() {
        let raw = RawFrame::new(4, 1, PixelFormat::Yuyv, vec![10, 128, 20, 128, 30, 128, 40, 128])
            .expect("valid frame");
        assert_eq!(to_mode(&raw, CaptureMode::Gray), vec![vec![10, 20, 30, 40]]);

        let rgb = to_mode(&raw, CaptureMode::Rgb);
        assert_eq!(rgb.len(), 3);
        // neutral chroma gives equal channels
        assert_eq!(rgb[0], rgb[1]);
        assert_eq!(rgb[1], rgb[2]);
    }

    #[test]
    fn resize_and_interleave() {
        let planes = vec![vec![100u8; 4], vec![200u8; 4]];
        let out = resize_planes(&planes, Size::new(2, 2), Size::new(3, 1)).expect("resize");
        assert_eq!(out, vec![vec![100; 3], vec![200; 3]]);

        let mut buf = vec![0u8; 32];
        interleave(&out, Size::new(3, 1), &mut buf, 32);
        assert_eq!(&buf[..7], &[100, 200, 100, 200, 100, 200, 0]);
    }
}
