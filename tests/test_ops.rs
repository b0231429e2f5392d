// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use edgefirst_imgproc::{
    image::{Image, ImageView, ImageViewMut},
    ops::{self, CmpOp, MaskSize},
    points::{self, CornerParams},
    roi::{Point, Roi, Size},
    status_string, Status,
};
use std::error::Error;

fn bright_square() -> Image<f32> {
    let mut img = Image::<f32>::new(Size::new(40, 40));
    let square = Roi::new(12, 27, 12, 27);
    ops::set(1.0, &mut img.roi_view_mut(square).unwrap()).unwrap();
    img
}

#[test]
fn corners_of_a_square() -> Result<(), Box<dyn Error>> {
    let img = bright_square();
    let found = points::detect_corners_in(&img, &CornerParams::default())?;
    println!("{} corner(s): {:?}", found.total, found.points);

    let corners = [(12, 12), (27, 12), (12, 27), (27, 27)];
    let near = |p: &Point, (cx, cy): (usize, usize)| p.x.abs_diff(cx) <= 6 && p.y.abs_diff(cy) <= 6;

    assert!(!found.points.is_empty());
    for p in &found.points {
        assert!(
            corners.iter().any(|&c| near(p, c)),
            "{p:?} is not near a corner"
        );
    }
    for c in corners {
        assert!(
            found.points.iter().any(|p| near(p, c)),
            "no point near corner {c:?}"
        );
    }
    Ok(())
}

#[test]
fn corner_limit_keeps_total() -> Result<(), Box<dyn Error>> {
    let img = bright_square();
    let params = CornerParams {
        max_points: 2,
        ..CornerParams::default()
    };
    let found = points::detect_corners_in(&img, &params)?;
    assert_eq!(found.points.len(), 2);
    assert!(found.total >= 4);
    assert!(found.is_truncated());
    Ok(())
}

#[test]
fn external_buffer_with_padding() -> Result<(), Box<dyn Error>> {
    // 10 pixels per row, 12 floats of stride
    let step = 12 * 4;
    let src = vec![0.5f32; 12 * 8];
    let mut dst = vec![-1.0f32; 12 * 8];

    let inner = Roi::new(2, 5, 2, 7);
    let src_view = ImageView::from_slice(10, 8, step, &src)?.sub(inner)?;
    let mut dst_view = ImageViewMut::from_slice_mut(10, 8, step, &mut dst)?.sub(inner)?;
    ops::filter_gauss(&src_view, &mut dst_view, MaskSize::Mask5x5)?;

    for r in 0..8 {
        for c in 0..12 {
            let v = dst[r * 12 + c];
            if (2..=5).contains(&r) && (2..=7).contains(&c) {
                assert!((v - 0.5).abs() < 1e-6, "({r}, {c}) = {v}");
            } else {
                assert_eq!(v, -1.0, "({r}, {c}) outside the roi was written");
            }
        }
    }
    Ok(())
}

#[test]
fn bad_step_is_rejected() {
    let data = vec![0u8; 64];
    let err = ImageView::from_slice(10, 4, 8, &data).unwrap_err();
    assert_eq!(err.status(), Status::Step);
}

#[test]
fn filter_needs_border() {
    let img = Image::new_fill(Size::new(16, 16), 1.0f32);
    let mut out = Image::<f32>::new(Size::new(16, 16));
    let err = ops::filter_sobel_vert(&img.view(), &mut out.view_mut()).unwrap_err();
    assert_eq!(err.status(), Status::Size);
}

#[test]
fn jaehne_through_8u() -> Result<(), Box<dyn Error>> {
    let size = Size::new(48, 32);
    let mut pattern = Image::<f32>::new(size);
    ops::image_jaehne(&mut pattern.view_mut())?;

    let (lo, hi) = ops::min_max(&pattern.view())?;
    assert!(lo >= 0.0 && hi <= 1.0);

    let mut bytes = Image::<u8>::new(size);
    ops::scale_32f8u(&pattern.view(), &mut bytes.view_mut(), 0.0, 1.0)?;
    let mut back = Image::<f32>::new(size);
    ops::scale_8u32f(&bytes.view(), &mut back.view_mut(), 0.0, 1.0)?;

    let mut diff = Image::<f32>::new(size);
    ops::sub(&pattern.view(), &back.view(), &mut diff.view_mut())?;
    let mut err = Image::<f32>::new(size);
    ops::abs(&diff.view(), &mut err.view_mut())?;
    let (_, worst) = ops::min_max(&err.view())?;
    assert!(worst <= 0.5 / 255.0 + 1e-6);
    Ok(())
}

#[test]
fn edge_magnitude_pipeline() -> Result<(), Box<dyn Error>> {
    // vertical step edge between columns 7 and 8
    let size = Size::new(16, 8);
    let mut img = Image::<f32>::new(size);
    ops::set(1.0, &mut img.roi_view_mut(Roi::new(0, 7, 8, 15))?)?;

    let inner = Roi::new(1, 6, 1, 14);
    let mut gx = Image::<f32>::new(size);
    let mut gy = Image::<f32>::new(size);
    ops::filter_sobel_vert(&img.roi_view(inner)?, &mut gx.roi_view_mut(inner)?)?;
    ops::filter_sobel_horiz(&img.roi_view(inner)?, &mut gy.roi_view_mut(inner)?)?;

    let mut gx2 = Image::<f32>::new(size);
    let mut gy2 = Image::<f32>::new(size);
    ops::mul(&gx.roi_view(inner)?, &gx.roi_view(inner)?, &mut gx2.roi_view_mut(inner)?)?;
    ops::mul(&gy.roi_view(inner)?, &gy.roi_view(inner)?, &mut gy2.roi_view_mut(inner)?)?;
    let mut sum = Image::<f32>::new(size);
    ops::add(&gx2.roi_view(inner)?, &gy2.roi_view(inner)?, &mut sum.roi_view_mut(inner)?)?;
    let mut mag = Image::<f32>::new(size);
    let status = ops::sqrt(&sum.roi_view(inner)?, &mut mag.roi_view_mut(inner)?)?;
    assert_eq!(status, Status::NoErr);

    let mut edges = Image::<u8>::new(size);
    let mut half = Image::<f32>::new(size);
    ops::mul_c(&mag.roi_view(inner)?, 0.5, &mut half.roi_view_mut(inner)?)?;
    ops::compare(
        &mag.roi_view(inner)?,
        &half.roi_view(inner)?,
        &mut edges.roi_view_mut(inner)?,
        CmpOp::Greater,
    )?;

    for y in 1..7 {
        // columns 7 and 8 straddle the step
        assert_eq!(&edges.row(y)[6..10], &[0, 255, 255, 0]);
        assert_eq!(*mag.get(7, y).unwrap(), 4.0);
    }
    Ok(())
}

#[test]
fn warnings_and_errors_have_strings() -> Result<(), Box<dyn Error>> {
    let src = Image::from_vec(3, 1, vec![4.0f32, -1.0, 9.0])?;
    let mut dst = Image::<f32>::new(Size::new(3, 1));
    let status = ops::sqrt(&src.view(), &mut dst.view_mut())?;
    assert_eq!(status, Status::SqrtNegArg);
    assert!(status.is_warning());
    assert_eq!(dst.row(0)[0], 2.0);
    assert!(dst.row(0)[1].is_nan());

    let err = ops::threshold_val(
        &src.view(),
        &mut dst.view_mut(),
        0.0,
        0.0,
        CmpOp::Eq,
    )
    .unwrap_err();
    assert_eq!(err.status(), Status::NotSupportedMode);
    assert_ne!(status_string(err.code()), status_string(12345));
    assert_eq!(status_string(12345), "Unknown status code");
    Ok(())
}
