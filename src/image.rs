// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Single-channel image buffers and borrowed views.
//!
//! An image is a buffer of `height` rows, each starting `step_bytes` after
//! the previous one, together with a region of interest. Operations only
//! touch pixels inside the destination ROI, but neighbourhood operations may
//! read source pixels around the source ROI as long as they are inside the
//! buffer.

use crate::{
    camera::Frame,
    error::{Error, Result},
    roi::{Roi, Size},
};
use core::fmt;
use std::mem::size_of;

/// Row starts of owned images are aligned to this many bytes.
pub const ROW_ALIGN: usize = 32;

/// Element types an image can hold.
pub trait Pixel: Copy + Default + PartialOrd + fmt::Debug + Send + Sync + 'static {
    fn to_f32(self) -> f32;

    /// Converts back from `f32`, rounding and saturating for integer types.
    fn from_f32(value: f32) -> Self;
}

impl Pixel for u8 {
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_f32(value: f32) -> Self {
        // `as` saturates and maps NaN to 0
        value.round() as u8
    }
}

impl Pixel for f32 {
    fn to_f32(self) -> f32 {
        self
    }

    fn from_f32(value: f32) -> Self {
        value
    }
}

fn aligned_stride<T>(width: usize) -> usize {
    let elem = size_of::<T>();
    let bytes = width * elem;
    bytes.div_ceil(ROW_ALIGN) * ROW_ALIGN / elem
}

fn min_required_len(width: usize, height: usize, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }
    (height - 1).checked_mul(stride)?.checked_add(width)
}

fn check_roi(roi: Roi, size: Size) -> Result<()> {
    if roi.fits_in(size) {
        Ok(())
    } else {
        Err(Error::size(format!("roi {roi} does not fit in {size} image")))
    }
}

/// Owned single-channel image with 32-byte aligned rows.
///
/// # Example
///
/// ```
/// use edgefirst_imgproc::{image::Image, roi::{Roi, Size}};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut img = Image::<f32>::new(Size::new(640, 480));
/// assert_eq!(img.step_bytes(), 2560);
///
/// img.set_roi(Roi::new(10, 19, 100, 149))?;
/// assert_eq!(img.view().width(), 50);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, PartialEq)]
pub struct Image<T> {
    size: Size,
    stride: usize,
    data: Vec<T>,
    roi: Roi,
}

impl<T: Pixel> Image<T> {
    pub fn new(size: Size) -> Self {
        Self::new_fill(size, T::default())
    }

    pub fn new_fill(size: Size, value: T) -> Self {
        let stride = aligned_stride::<T>(size.width);
        Self {
            size,
            stride,
            data: vec![value; stride * size.height],
            roi: Roi::full(size),
        }
    }

    /// Copies tightly packed rows into a new image, `data.len()` must be
    /// `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| Error::size("image size overflow"))?;
        if data.len() != expected {
            return Err(Error::size(format!(
                "expected {expected} pixels, got {}",
                data.len()
            )));
        }

        let mut out = Self::new(Size::new(width, height));
        if width > 0 {
            for (y, row) in data.chunks_exact(width).enumerate() {
                out.row_mut(y).copy_from_slice(row);
            }
        }
        Ok(out)
    }

    /// Copies a strided external buffer into a new image.
    pub fn from_view(src: &ImageView<'_, T>) -> Self {
        let mut out = Self::new(src.size());
        for y in 0..src.height() {
            out.row_mut(y).copy_from_slice(src.row(y));
        }
        out
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Distance between row starts in elements.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn step_bytes(&self) -> usize {
        self.stride * size_of::<T>()
    }

    pub fn roi(&self) -> Roi {
        self.roi
    }

    pub fn set_roi(&mut self, roi: Roi) -> Result<()> {
        check_roi(roi, self.size)?;
        self.roi = roi;
        Ok(())
    }

    pub fn with_roi(mut self, roi: Roi) -> Result<Self> {
        self.set_roi(roi)?;
        Ok(self)
    }

    pub fn reset_roi(&mut self) {
        self.roi = Roi::full(self.size);
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.size.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.size.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.size.height, "row index out of bounds");
        let start = y * self.stride;
        &mut self.data[start..start + self.size.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.data.get_mut(y * self.stride + x)
    }

    /// View over the current ROI.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            stride: self.stride,
            size: self.size,
            roi: self.roi,
        }
    }

    pub fn view_mut(&mut self) -> ImageViewMut<'_, T> {
        ImageViewMut {
            data: &mut self.data,
            stride: self.stride,
            size: self.size,
            roi: self.roi,
        }
    }

    /// View over an explicit ROI, leaving the stored ROI unchanged.
    pub fn roi_view(&self, roi: Roi) -> Result<ImageView<'_, T>> {
        self.view().sub(roi)
    }

    pub fn roi_view_mut(&mut self, roi: Roi) -> Result<ImageViewMut<'_, T>> {
        self.view_mut().sub(roi)
    }
}

impl Image<u8> {
    /// Copies a grabbed camera frame, converting RGB frames to luma.
    pub fn from_frame(frame: &Frame<'_>) -> Result<Self> {
        frame.to_image()
    }
}

impl<T> fmt::Debug for Image<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Image")
            .field("size", &self.size)
            .field("stride", &self.stride)
            .field("roi", &self.roi)
            .finish()
    }
}

impl<T> fmt::Display for Image<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} step:{} roi:[{}]",
            self.size,
            self.stride * size_of::<T>(),
            self.roi
        )
    }
}

/// Read-only view of a buffer restricted to a region of interest.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    stride: usize,
    size: Size,
    roi: Roi,
}

impl<'a, T: Pixel> ImageView<'a, T> {
    /// Wraps an external buffer described by its row step in bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::Step`] if the step is not a whole number of pixels or is
    ///   shorter than a row.
    /// - [`Error::Size`] if the slice is too short for `height` rows.
    pub fn from_slice(
        width: usize,
        height: usize,
        step_bytes: usize,
        data: &'a [T],
    ) -> Result<Self> {
        let stride = stride_from_step::<T>(width, step_bytes)?;
        check_len(width, height, stride, data.len())?;
        let size = Size::new(width, height);
        Ok(Self {
            data,
            stride,
            size,
            roi: Roi::full(size),
        })
    }

    /// Narrows the view to another ROI of the same buffer.
    pub fn sub(&self, roi: Roi) -> Result<ImageView<'a, T>> {
        check_roi(roi, self.size)?;
        Ok(ImageView {
            data: self.data,
            stride: self.stride,
            size: self.size,
            roi,
        })
    }

    pub fn roi(&self) -> Roi {
        self.roi
    }

    pub fn width(&self) -> usize {
        self.roi.width()
    }

    pub fn height(&self) -> usize {
        self.roi.height()
    }

    /// Size of the ROI.
    pub fn size(&self) -> Size {
        self.roi.size()
    }

    /// Size of the whole underlying buffer.
    pub fn buffer_size(&self) -> Size {
        self.size
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn step_bytes(&self) -> usize {
        self.stride * size_of::<T>()
    }

    /// Row `y` of the ROI, relative to its top edge.
    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height(), "row index out of bounds");
        let start = (self.roi.r1 as usize + y) * self.stride + self.roi.c1 as usize;
        &self.data[start..start + self.width()]
    }

    /// Full buffer row `r`, ignoring the ROI.
    pub fn buffer_row(&self, r: usize) -> &'a [T] {
        assert!(r < self.size.height, "row index out of bounds");
        let start = r * self.stride;
        &self.data[start..start + self.size.width]
    }

    /// Pixel at ROI-relative coordinates.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let idx = (self.roi.r1 as usize + y) * self.stride + self.roi.c1 as usize + x;
        self.data.get(idx)
    }

    /// Pixel at buffer coordinates, anywhere inside the buffer.
    pub fn at(&self, row: i32, col: i32) -> Option<T> {
        if row < 0 || col < 0 || row as usize >= self.size.height || col as usize >= self.size.width
        {
            return None;
        }
        self.data
            .get(row as usize * self.stride + col as usize)
            .copied()
    }

    /// Fails with [`Error::Size`] unless the ROI grown by the given margins
    /// still lies inside the buffer.
    pub fn check_margin(&self, top: usize, bottom: usize, left: usize, right: usize) -> Result<()> {
        // margins may exceed i32, compare in i64 with saturation
        let grow = |v: i32, by: usize, down: bool| {
            let by = i64::try_from(by).unwrap_or(i64::MAX);
            if down {
                (v as i64).saturating_sub(by)
            } else {
                (v as i64).saturating_add(by)
            }
        };
        let fits = !self.roi.is_empty()
            && grow(self.roi.r1, top, true) >= 0
            && grow(self.roi.c1, left, true) >= 0
            && grow(self.roi.r2, bottom, false) < self.size.height as i64
            && grow(self.roi.c2, right, false) < self.size.width as i64;
        if fits {
            Ok(())
        } else {
            Err(Error::size(format!(
                "roi [{}] needs a border of {top}/{bottom}/{left}/{right} pixels inside the {} buffer",
                self.roi, self.size
            )))
        }
    }
}

/// Mutable view of a buffer restricted to a region of interest.
#[derive(Debug)]
pub struct ImageViewMut<'a, T> {
    data: &'a mut [T],
    stride: usize,
    size: Size,
    roi: Roi,
}

impl<'a, T: Pixel> ImageViewMut<'a, T> {
    pub fn from_slice_mut(
        width: usize,
        height: usize,
        step_bytes: usize,
        data: &'a mut [T],
    ) -> Result<Self> {
        let stride = stride_from_step::<T>(width, step_bytes)?;
        check_len(width, height, stride, data.len())?;
        let size = Size::new(width, height);
        Ok(Self {
            data,
            stride,
            size,
            roi: Roi::full(size),
        })
    }

    pub fn sub(self, roi: Roi) -> Result<ImageViewMut<'a, T>> {
        check_roi(roi, self.size)?;
        Ok(ImageViewMut { roi, ..self })
    }

    /// Reborrows the view with a different ROI.
    pub fn sub_mut(&mut self, roi: Roi) -> Result<ImageViewMut<'_, T>> {
        check_roi(roi, self.size)?;
        Ok(ImageViewMut {
            data: &mut *self.data,
            stride: self.stride,
            size: self.size,
            roi,
        })
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &*self.data,
            stride: self.stride,
            size: self.size,
            roi: self.roi,
        }
    }

    pub fn roi(&self) -> Roi {
        self.roi
    }

    pub fn width(&self) -> usize {
        self.roi.width()
    }

    pub fn height(&self) -> usize {
        self.roi.height()
    }

    pub fn size(&self) -> Size {
        self.roi.size()
    }

    pub fn buffer_size(&self) -> Size {
        self.size
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn step_bytes(&self) -> usize {
        self.stride * size_of::<T>()
    }

    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height(), "row index out of bounds");
        let start = (self.roi.r1 as usize + y) * self.stride + self.roi.c1 as usize;
        &self.data[start..start + self.width()]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height(), "row index out of bounds");
        let start = (self.roi.r1 as usize + y) * self.stride + self.roi.c1 as usize;
        let width = self.width();
        &mut self.data[start..start + width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let idx = (self.roi.r1 as usize + y) * self.stride + self.roi.c1 as usize + x;
        self.data.get(idx)
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let idx = (self.roi.r1 as usize + y) * self.stride + self.roi.c1 as usize + x;
        self.data.get_mut(idx)
    }
}

fn stride_from_step<T>(width: usize, step_bytes: usize) -> Result<usize> {
    let elem = size_of::<T>();
    let row = width * elem;
    if step_bytes % elem != 0 || step_bytes < row {
        return Err(Error::Step {
            step: step_bytes,
            row,
        });
    }
    Ok(step_bytes / elem)
}

fn check_len(width: usize, height: usize, stride: usize, len: usize) -> Result<()> {
    let min_len = min_required_len(width, height, stride)
        .ok_or_else(|| Error::size("image size overflow"))?;
    if len < min_len {
        return Err(Error::size(format!(
            "buffer of {len} pixels is too short, expected at least {min_len}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Image, ImageView, ImageViewMut, Pixel};
    use crate::{
        error::Status,
        roi::{Roi, Size},
    };

    #[test]
    fn owned_rows_are_aligned() {
        let img = Image::<f32>::new(Size::new(10, 3));
        assert_eq!(img.step_bytes(), 64);
        assert_eq!(img.stride(), 16);
        assert_eq!(img.row(2).len(), 10);

        let img = Image::<u8>::new(Size::new(33, 2));
        assert_eq!(img.step_bytes(), 64);
        assert_eq!(img.step_bytes() % 32, 0);
    }

    #[test]
    fn packed_rows_are_realigned() {
        let img = Image::from_vec(3, 2, vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid image");
        assert_eq!(img.step_bytes(), 32);
        assert_eq!(img.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(img.row(1), &[4.0, 5.0, 6.0]);

        let img = Image::from_vec(5, 1, vec![7u8; 5]).expect("valid image");
        assert_eq!(img.step_bytes() % 32, 0);
    }

    #[test]
    fn roi_is_validated() {
        let mut img = Image::<u8>::new(Size::new(4, 4));
        assert!(img.set_roi(Roi::new(1, 2, 1, 3)).is_ok());
        assert_eq!(img.view().size(), Size::new(3, 2));

        let err = img.set_roi(Roi::new(1, 4, 0, 0)).unwrap_err();
        assert_eq!(err.status(), Status::Size);
        let err = img.set_roi(Roi::new(2, 1, 0, 0)).unwrap_err();
        assert_eq!(err.status(), Status::Size);
        assert_eq!(img.roi(), Roi::new(1, 2, 1, 3));

        img.reset_roi();
        assert_eq!(img.roi(), Roi::new(0, 3, 0, 3));
    }

    #[test]
    fn view_indexing_with_byte_step() {
        let data = vec![1u8, 2, 3, 99, 4, 5, 6, 88];
        let view = ImageView::from_slice(3, 2, 4, &data).expect("valid view");

        assert_eq!(view.row(0), &[1, 2, 3]);
        assert_eq!(view.row(1), &[4, 5, 6]);
        assert_eq!(view.get(2, 1), Some(&6));
        assert_eq!(view.get(3, 1), None);
        assert_eq!(view.at(1, 3), Some(88));
        assert_eq!(view.at(-1, 0), None);
    }

    #[test]
    fn step_must_cover_row_in_whole_pixels() {
        let data = vec![0.0f32; 16];
        let err = ImageView::from_slice(4, 2, 15, &data).unwrap_err();
        assert_eq!(err.status(), Status::Step);
        let err = ImageView::from_slice(4, 2, 12, &data).unwrap_err();
        assert_eq!(err.status(), Status::Step);
        let err = ImageView::from_slice(4, 5, 16, &data).unwrap_err();
        assert_eq!(err.status(), Status::Size);
        assert!(ImageView::from_slice(4, 4, 16, &data).is_ok());
    }

    #[test]
    fn sub_view_reads_relative_rows() {
        let img = Image::from_vec(
            4,
            3,
            vec![
                10u8, 11, 12, 13, // row 0
                20, 21, 22, 23, // row 1
                30, 31, 32, 33, // row 2
            ],
        )
        .expect("valid image");
        let sub = img.roi_view(Roi::new(1, 2, 1, 3)).expect("valid roi");

        assert_eq!(sub.row(0), &[21, 22, 23]);
        assert_eq!(sub.row(1), &[31, 32, 33]);
        assert_eq!(sub.buffer_row(0), &[10, 11, 12, 13]);
        assert!(sub.check_margin(1, 0, 1, 0).is_ok());
        assert!(sub.check_margin(0, 1, 0, 0).is_err());
    }

    #[test]
    fn huge_margins_are_rejected() {
        let img = Image::<f32>::new(Size::new(8, 8));
        let view = img.roi_view(Roi::new(2, 5, 2, 5)).expect("valid roi");
        assert!(view.check_margin(2, 2, 2, 2).is_ok());

        let huge = (1usize << 32) + 1;
        for (t, b, l, r) in [(0, 0, 0, huge), (0, 0, huge, 0), (huge, 0, 0, 0), (0, usize::MAX, 0, 0)] {
            let err = view.check_margin(t, b, l, r).unwrap_err();
            assert_eq!(err.status(), Status::Size);
        }
    }

    #[test]
    fn mutable_sub_view_writes_through() {
        let mut data = vec![0u8; 15];
        let view = ImageViewMut::from_slice_mut(4, 3, 5, &mut data).expect("valid view");
        let mut sub = view.sub(Roi::new(0, 2, 1, 2)).expect("valid roi");
        *sub.get_mut(0, 2).expect("in bounds") = 42;
        sub.row_mut(0).copy_from_slice(&[7, 8]);

        assert_eq!(&data[..5], &[0, 7, 8, 0, 0]);
        assert_eq!(data[11], 42);
    }

    #[test]
    fn u8_conversion_saturates() {
        assert_eq!(u8::from_f32(300.0), 255);
        assert_eq!(u8::from_f32(-4.0), 0);
        assert_eq!(u8::from_f32(2.5), 3);
        assert_eq!(u8::from_f32(f32::NAN), 0);
    }
}
