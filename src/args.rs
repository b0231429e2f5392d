// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use edgefirst_imgproc::{camera::CaptureMode, ops::MaskSize, points::CornerParams};
use std::path::PathBuf;

/// Capture mode requested from the camera.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum ModeSetting {
    /// Single-channel luma frames
    Gray,
    /// Interleaved RGB frames, converted to luma for processing
    Rgb,
}

impl From<ModeSetting> for CaptureMode {
    fn from(mode: ModeSetting) -> Self {
        match mode {
            ModeSetting::Gray => CaptureMode::Gray,
            ModeSetting::Rgb => CaptureMode::Rgb,
        }
    }
}

/// Command-line arguments for the EdgeFirst corner detection tool.
///
/// Frames are captured from a camera, a directory of images or the built-in
/// test pattern, and the corners found in each frame are logged and
/// optionally saved. Arguments can be specified via command line or
/// environment variables.
///
/// # Example
///
/// ```bash
/// # Via command line
/// edgefirst-imgproc --camera /dev/video0 --camera-size 640 480 --frames 100
///
/// # Via environment variables
/// export CAMERA=./frames
/// export SAVE_DIR=/tmp/corners
/// edgefirst-imgproc
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Camera to open: "jaehne", a /dev/video* device, an image or a directory
    #[arg(short, long, env = "CAMERA", default_value = "jaehne")]
    pub camera: String,

    /// Capture resolution in pixels (width height)
    #[arg(
        long,
        env = "CAMERA_SIZE",
        default_value = "640 480",
        value_delimiter = ' ',
        num_args = 2
    )]
    pub camera_size: Vec<u32>,

    /// Capture mode
    #[arg(long, env = "MODE", default_value = "gray", value_enum)]
    pub mode: ModeSetting,

    /// Number of frames to capture, 0 runs until interrupted. Stale frames
    /// are skipped, so fewer may be processed.
    #[arg(short, long, env = "FRAMES", default_value = "0")]
    pub frames: u64,

    /// Maximum number of corners reported per frame
    #[arg(long, env = "MAX_POINTS", default_value = "500")]
    pub max_points: usize,

    /// Corner threshold relative to the strongest response in the frame
    #[arg(long, env = "THRESHOLD", default_value = "0.1")]
    pub threshold: f32,

    /// Smoothing mask side before differentiation (3 or 5)
    #[arg(long, env = "SMOOTH", default_value = "5")]
    pub smooth: i32,

    /// Directory where annotated frames are written as PNG
    #[arg(long, env = "SAVE_DIR")]
    pub save_dir: Option<PathBuf>,

    /// File receiving one JSON line of corners per frame
    #[arg(long, env = "POINTS_OUT")]
    pub points_out: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable Tracy profiler for performance analysis
    #[arg(long, env = "TRACY")]
    pub tracy: bool,
}

impl Args {
    /// Requested capture geometry as (rows, cols).
    pub fn rows_cols(&self) -> (usize, usize) {
        (self.camera_size[1] as usize, self.camera_size[0] as usize)
    }

    pub fn corner_params(&self) -> edgefirst_imgproc::Result<CornerParams> {
        Ok(CornerParams {
            smooth: MaskSize::try_from(self.smooth)?,
            threshold: self.threshold,
            max_points: self.max_points,
        })
    }
}
