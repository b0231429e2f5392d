// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::{check_nonempty, check_same_size};
use crate::{
    error::{Error, Result, Status},
    image::{ImageView, ImageViewMut},
};

/// Comparison predicates used by [`compare`] and [`threshold_val`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Less,
    LessEq,
    Eq,
    GreaterEq,
    Greater,
}

impl CmpOp {
    pub fn eval(self, a: f32, b: f32) -> bool {
        match self {
            CmpOp::Less => a < b,
            CmpOp::LessEq => a <= b,
            CmpOp::Eq => a == b,
            CmpOp::GreaterEq => a >= b,
            CmpOp::Greater => a > b,
        }
    }
}

fn unary(
    src: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
    f: impl Fn(f32) -> f32,
) -> Result<()> {
    check_same_size(dst.size(), src.size())?;
    for y in 0..dst.height() {
        for (d, &s) in dst.row_mut(y).iter_mut().zip(src.row(y)) {
            *d = f(s);
        }
    }
    Ok(())
}

fn binary(
    a: &ImageView<'_, f32>,
    b: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
    f: impl Fn(f32, f32) -> f32,
) -> Result<()> {
    check_same_size(dst.size(), a.size())?;
    check_same_size(dst.size(), b.size())?;
    for y in 0..dst.height() {
        let ra = a.row(y);
        let rb = b.row(y);
        for ((d, &va), &vb) in dst.row_mut(y).iter_mut().zip(ra).zip(rb) {
            *d = f(va, vb);
        }
    }
    Ok(())
}

pub fn abs(src: &ImageView<'_, f32>, dst: &mut ImageViewMut<'_, f32>) -> Result<()> {
    unary(src, dst, f32::abs)
}

pub fn add(
    a: &ImageView<'_, f32>,
    b: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
) -> Result<()> {
    binary(a, b, dst, |a, b| a + b)
}

/// `dst = a - b`
pub fn sub(
    a: &ImageView<'_, f32>,
    b: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
) -> Result<()> {
    binary(a, b, dst, |a, b| a - b)
}

pub fn mul(
    a: &ImageView<'_, f32>,
    b: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
) -> Result<()> {
    binary(a, b, dst, |a, b| a * b)
}

pub fn mul_c(src: &ImageView<'_, f32>, k: f32, dst: &mut ImageViewMut<'_, f32>) -> Result<()> {
    unary(src, dst, |v| v * k)
}

/// Square root of every pixel.
///
/// Negative inputs produce NaN and the operation reports
/// [`Status::SqrtNegArg`] instead of [`Status::NoErr`].
pub fn sqrt(src: &ImageView<'_, f32>, dst: &mut ImageViewMut<'_, f32>) -> Result<Status> {
    check_same_size(dst.size(), src.size())?;
    let mut negative = false;
    for y in 0..dst.height() {
        for (d, &s) in dst.row_mut(y).iter_mut().zip(src.row(y)) {
            negative |= s < 0.0;
            *d = s.sqrt();
        }
    }
    Ok(if negative {
        Status::SqrtNegArg
    } else {
        Status::NoErr
    })
}

/// Writes 255 where `a op b` holds and 0 elsewhere.
pub fn compare(
    a: &ImageView<'_, f32>,
    b: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, u8>,
    op: CmpOp,
) -> Result<()> {
    check_same_size(dst.size(), a.size())?;
    check_same_size(dst.size(), b.size())?;
    for y in 0..dst.height() {
        let ra = a.row(y);
        let rb = b.row(y);
        for ((d, &va), &vb) in dst.row_mut(y).iter_mut().zip(ra).zip(rb) {
            *d = if op.eval(va, vb) { 255 } else { 0 };
        }
    }
    Ok(())
}

/// Replaces pixels for which `src op threshold` holds by `value`, copying
/// the others. Only [`CmpOp::Less`] and [`CmpOp::Greater`] are supported.
pub fn threshold_val(
    src: &ImageView<'_, f32>,
    dst: &mut ImageViewMut<'_, f32>,
    threshold: f32,
    value: f32,
    op: CmpOp,
) -> Result<()> {
    if !matches!(op, CmpOp::Less | CmpOp::Greater) {
        return Err(Error::NotSupportedMode(format!(
            "threshold with {op:?} comparison"
        )));
    }
    unary(src, dst, |v| if op.eval(v, threshold) { value } else { v })
}

/// Minimum and maximum over the ROI. NaN pixels are ignored unless every
/// pixel is NaN.
pub fn min_max(src: &ImageView<'_, f32>) -> Result<(f32, f32)> {
    check_nonempty(src.size())?;
    let mut min = f32::NAN;
    let mut max = f32::NAN;
    for y in 0..src.height() {
        for &v in src.row(y) {
            min = min.min(v);
            max = max.max(v);
        }
    }
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        image::Image,
        roi::{Roi, Size},
    };

    fn img(data: &[f32]) -> Image<f32> {
        Image::from_vec(data.len(), 1, data.to_vec()).expect("valid image")
    }

    #[test]
    fn elementwise_arithmetic() {
        let a = img(&[1.0, -2.0, 3.0]);
        let b = img(&[4.0, 5.0, -6.0]);
        let mut dst = Image::<f32>::new(Size::new(3, 1));

        add(&a.view(), &b.view(), &mut dst.view_mut()).expect("add");
        assert_eq!(dst.row(0), &[5.0, 3.0, -3.0]);

        sub(&a.view(), &b.view(), &mut dst.view_mut()).expect("sub");
        assert_eq!(dst.row(0), &[-3.0, -7.0, 9.0]);

        mul(&a.view(), &b.view(), &mut dst.view_mut()).expect("mul");
        assert_eq!(dst.row(0), &[4.0, -10.0, -18.0]);

        mul_c(&a.view(), 0.5, &mut dst.view_mut()).expect("mul_c");
        assert_eq!(dst.row(0), &[0.5, -1.0, 1.5]);

        abs(&a.view(), &mut dst.view_mut()).expect("abs");
        assert_eq!(dst.row(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn sqrt_warns_on_negative_input() {
        let mut dst = Image::<f32>::new(Size::new(2, 1));

        let status = sqrt(&img(&[4.0, 9.0]).view(), &mut dst.view_mut()).expect("sqrt");
        assert_eq!(status, Status::NoErr);
        assert_eq!(dst.row(0), &[2.0, 3.0]);

        let status = sqrt(&img(&[-1.0, 16.0]).view(), &mut dst.view_mut()).expect("sqrt");
        assert_eq!(status, Status::SqrtNegArg);
        assert!(dst.row(0)[0].is_nan());
        assert_eq!(dst.row(0)[1], 4.0);
    }

    #[test]
    fn compare_writes_binary_mask() {
        let a = img(&[1.0, 2.0, 3.0]);
        let b = img(&[2.0, 2.0, 2.0]);
        let mut dst = Image::<u8>::new(Size::new(3, 1));

        compare(&a.view(), &b.view(), &mut dst.view_mut(), CmpOp::Less).expect("cmp");
        assert_eq!(dst.row(0), &[255, 0, 0]);
        compare(&a.view(), &b.view(), &mut dst.view_mut(), CmpOp::GreaterEq).expect("cmp");
        assert_eq!(dst.row(0), &[0, 255, 255]);
        compare(&a.view(), &b.view(), &mut dst.view_mut(), CmpOp::Eq).expect("cmp");
        assert_eq!(dst.row(0), &[0, 255, 0]);
    }

    #[test]
    fn threshold_replaces_and_rejects_modes() {
        let src = img(&[0.1, 0.5, 0.9]);
        let mut dst = Image::<f32>::new(Size::new(3, 1));

        threshold_val(&src.view(), &mut dst.view_mut(), 0.5, 0.0, CmpOp::Less).expect("thr");
        assert_eq!(dst.row(0), &[0.0, 0.5, 0.9]);
        threshold_val(&src.view(), &mut dst.view_mut(), 0.5, 1.0, CmpOp::Greater).expect("thr");
        assert_eq!(dst.row(0), &[0.1, 0.5, 1.0]);

        let err = threshold_val(&src.view(), &mut dst.view_mut(), 0.5, 1.0, CmpOp::Eq)
            .unwrap_err();
        assert_eq!(err.status(), Status::NotSupportedMode);
    }

    #[test]
    fn min_max_respects_roi() {
        let mut src = Image::from_vec(3, 2, vec![9.0f32, 1.0, 2.0, -5.0, 3.0, 4.0])
            .expect("valid image");
        assert_eq!(min_max(&src.view()).expect("min_max"), (-5.0, 9.0));

        src.set_roi(Roi::new(0, 1, 1, 2)).expect("valid roi");
        assert_eq!(min_max(&src.view()).expect("min_max"), (1.0, 4.0));
    }

    #[test]
    fn mismatched_sources_are_rejected() {
        let a = img(&[1.0, 2.0]);
        let b = img(&[1.0, 2.0, 3.0]);
        let mut dst = Image::<f32>::new(Size::new(2, 1));
        let err = add(&a.view(), &b.view(), &mut dst.view_mut()).unwrap_err();
        assert_eq!(err.status(), Status::Size);
    }
}
