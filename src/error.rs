// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use core::fmt;
use thiserror::Error;

/// Integer status reported by every image-processing operation.
///
/// Negative codes are errors, zero is success and positive codes are
/// warnings: the operation completed but the result may not be what the
/// caller expected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    NotSupportedMode = -9999,
    Coeff = -47,
    Anchor = -34,
    MaskSize = -33,
    Interpolation = -22,
    Step = -14,
    ScaleRange = -13,
    NullPtr = -8,
    Size = -6,
    BadArg = -5,
    Err = -2,
    NoErr = 0,
    NoOperation = 1,
    SqrtNegArg = 3,
    WrongIntersectQuad = 14,
}

const ALL_STATUS: [Status; 15] = [
    Status::NotSupportedMode,
    Status::Coeff,
    Status::Anchor,
    Status::MaskSize,
    Status::Interpolation,
    Status::Step,
    Status::ScaleRange,
    Status::NullPtr,
    Status::Size,
    Status::BadArg,
    Status::Err,
    Status::NoErr,
    Status::NoOperation,
    Status::SqrtNegArg,
    Status::WrongIntersectQuad,
];

impl Status {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        ALL_STATUS.iter().copied().find(|s| s.code() == code)
    }

    pub fn is_ok(self) -> bool {
        self == Status::NoErr
    }

    pub fn is_warning(self) -> bool {
        self.code() > 0
    }

    pub fn is_error(self) -> bool {
        self.code() < 0
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::NotSupportedMode => "The requested mode is not supported",
            Status::Coeff => "Incorrect values for transformation coefficients",
            Status::Anchor => "Anchor point is outside the mask",
            Status::MaskSize => "Invalid mask size",
            Status::Interpolation => "Invalid interpolation mode",
            Status::Step => "Step value is not valid",
            Status::ScaleRange => "Scale bounds are out of range",
            Status::NullPtr => "Null pointer error",
            Status::Size => "Incorrect value for data size",
            Status::BadArg => "Incorrect arg/param of the function",
            Status::Err => "Unclassified error",
            Status::NoErr => "No errors",
            Status::NoOperation => "No operation has been executed",
            Status::SqrtNegArg => "Negative value(s) for the argument in the function Sqrt",
            Status::WrongIntersectQuad => "Quadrangle does not intersect the destination image",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps any integer status code to its fixed description.
///
/// Codes outside the known table map to `"Unknown status code"`.
pub fn status_string(code: i32) -> &'static str {
    match Status::from_code(code) {
        Some(status) => status.as_str(),
        None => "Unknown status code",
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("size error: {0}")]
    Size(String),

    #[error("step error: step of {step} bytes is invalid for rows of {row} bytes")]
    Step { step: usize, row: usize },

    #[error("mask size error: {width}x{height}")]
    MaskSize { width: usize, height: usize },

    #[error("anchor error: anchor ({x}, {y}) is outside the {width}x{height} mask")]
    Anchor {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("interpolation mode {0} is not supported")]
    Interpolation(i32),

    #[error("scale range error: min {min} must be below max {max}")]
    ScaleRange { min: f32, max: f32 },

    #[error("coefficient error: {0}")]
    Coeff(String),

    #[error("mode not supported: {0}")]
    NotSupportedMode(String),

    #[error("bad argument: {0}")]
    BadArg(String),

    #[error("camera error: {0}")]
    Camera(String),

    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn size(msg: impl Into<String>) -> Self {
        Self::Size(msg.into())
    }

    /// The status code this error reports on the integer boundary.
    pub fn status(&self) -> Status {
        match self {
            Error::Size(_) => Status::Size,
            Error::Step { .. } => Status::Step,
            Error::MaskSize { .. } => Status::MaskSize,
            Error::Anchor { .. } => Status::Anchor,
            Error::Interpolation(_) => Status::Interpolation,
            Error::ScaleRange { .. } => Status::ScaleRange,
            Error::Coeff(_) => Status::Coeff,
            Error::NotSupportedMode(_) => Status::NotSupportedMode,
            Error::BadArg(_) => Status::BadArg,
            Error::Camera(_) | Error::Codec(_) | Error::Io(_) => Status::Err,
        }
    }

    pub fn code(&self) -> i32 {
        self.status().code()
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::{status_string, Error, Status};

    #[test]
    fn codes_round_trip_through_table() {
        for code in [-9999, -47, -34, -33, -22, -14, -13, -8, -6, -5, -2, 0, 1, 3, 14] {
            let status = Status::from_code(code).expect("known code");
            assert_eq!(status.code(), code);
        }
        assert_eq!(Status::from_code(-1), None);
    }

    #[test]
    fn status_strings() {
        assert_eq!(status_string(0), "No errors");
        assert!(status_string(-6).contains("size"));
        assert_eq!(status_string(12345), "Unknown status code");
        assert_eq!(Status::SqrtNegArg.to_string(), status_string(3));
    }

    #[test]
    fn warning_and_error_classes() {
        assert!(Status::NoErr.is_ok());
        assert!(Status::SqrtNegArg.is_warning());
        assert!(!Status::SqrtNegArg.is_error());
        assert!(Status::Step.is_error());
    }

    #[test]
    fn errors_report_status() {
        assert_eq!(Error::size("empty").status(), Status::Size);
        assert_eq!(Error::Step { step: 3, row: 4 }.code(), -14);
        assert_eq!(Error::Interpolation(7).status(), Status::Interpolation);
        assert_eq!(Error::Camera("gone".into()).status(), Status::Err);
    }
}
