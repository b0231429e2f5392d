// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use core::fmt;

/// Width and height of an image or of a region of interest, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel position, `x` is the column and `y` the row.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Region of interest given by inclusive row and column bounds.
///
/// A region with `r2 < r1` or `c2 < c1` is empty. Bounds are signed so that
/// shrinking a small region yields an empty one instead of wrapping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Roi {
    pub r1: i32,
    pub r2: i32,
    pub c1: i32,
    pub c2: i32,
}

impl Roi {
    pub const fn new(r1: i32, r2: i32, c1: i32, c2: i32) -> Self {
        Self { r1, r2, c1, c2 }
    }

    /// Region covering a whole buffer of the given size.
    pub fn full(size: Size) -> Self {
        Self {
            r1: 0,
            r2: size.height as i32 - 1,
            c1: 0,
            c2: size.width as i32 - 1,
        }
    }

    pub fn width(&self) -> usize {
        (self.c2 - self.c1 + 1).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.r2 - self.r1 + 1).max(0) as usize
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.r2 < self.r1 || self.c2 < self.c1
    }

    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= self.r1 && row <= self.r2 && col >= self.c1 && col <= self.c2
    }

    pub fn intersection(&self, other: &Roi) -> Roi {
        Roi {
            r1: self.r1.max(other.r1),
            r2: self.r2.min(other.r2),
            c1: self.c1.max(other.c1),
            c2: self.c2.min(other.c2),
        }
    }

    pub fn shrink(&self, rows: i32, cols: i32) -> Roi {
        Roi {
            r1: self.r1 + rows,
            r2: self.r2 - rows,
            c1: self.c1 + cols,
            c2: self.c2 - cols,
        }
    }

    pub fn grow(&self, rows: i32, cols: i32) -> Roi {
        self.shrink(-rows, -cols)
    }

    /// Whether the region is non-empty and lies inside a buffer of `size`.
    pub fn fits_in(&self, size: Size) -> bool {
        !self.is_empty()
            && self.r1 >= 0
            && self.c1 >= 0
            && (self.r2 as i64) < size.height as i64
            && (self.c2 as i64) < size.width as i64
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.c1.max(0) as usize, self.r1.max(0) as usize)
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "rows {}..={} cols {}..={}",
            self.r1, self.r2, self.c1, self.c2
        )
    }
}
