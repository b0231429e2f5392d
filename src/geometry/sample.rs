// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::Interpolation;
use crate::image::ImageView;

/// Samples `src` at buffer coordinates `(x, y)`.
///
/// Nearest rounds to the closest pixel centre, linear uses the floor-based
/// 2x2 neighbourhood and cubic the 4x4 Catmull-Rom neighbourhood. Neighbours
/// outside the ROI are clamped onto its edge. The ROI must not be empty.
pub fn sample(src: &ImageView<'_, f32>, x: f32, y: f32, interp: Interpolation) -> f32 {
    match interp {
        Interpolation::Nearest => pixel(src, x.round() as isize, y.round() as isize),
        Interpolation::Linear => {
            let x0 = x.floor();
            let y0 = y.floor();
            let dx = x - x0;
            let dy = y - y0;
            let (x0, y0) = (x0 as isize, y0 as isize);

            let top = pixel(src, x0, y0) * (1.0 - dx) + pixel(src, x0 + 1, y0) * dx;
            let bottom = pixel(src, x0, y0 + 1) * (1.0 - dx) + pixel(src, x0 + 1, y0 + 1) * dx;
            top * (1.0 - dy) + bottom * dy
        }
        Interpolation::Cubic => {
            let x0 = x.floor();
            let y0 = y.floor();
            let wx = catmull_rom_weights(x - x0);
            let wy = catmull_rom_weights(y - y0);
            let (x0, y0) = (x0 as isize, y0 as isize);

            let mut acc = 0.0f32;
            for (j, wyj) in wy.iter().enumerate() {
                let yy = y0 - 1 + j as isize;
                let mut row = 0.0f32;
                for (i, wxi) in wx.iter().enumerate() {
                    row += wxi * pixel(src, x0 - 1 + i as isize, yy);
                }
                acc += wyj * row;
            }
            acc
        }
    }
}

fn catmull_rom_weights(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        0.5 * (-t3 + 2.0 * t2 - t),
        0.5 * (3.0 * t3 - 5.0 * t2 + 2.0),
        0.5 * (-3.0 * t3 + 4.0 * t2 + t),
        0.5 * (t3 - t2),
    ]
}

fn pixel(src: &ImageView<'_, f32>, x: isize, y: isize) -> f32 {
    let roi = src.roi();
    let c = x.clamp(roi.c1 as isize, roi.c2 as isize) as usize;
    let r = y.clamp(roi.r1 as isize, roi.r2 as isize) as usize;
    src.buffer_row(r)[c]
}
