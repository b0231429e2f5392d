// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use super::{FrameSource, PixelFormat, RawFrame};
use crate::error::{Error, Result};
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Plays back still images from disk, looping over them forever.
pub struct FileSource {
    name: String,
    files: Vec<PathBuf>,
    next: usize,
}

impl FileSource {
    /// Opens a single image or a directory of images. Directory entries are
    /// played in name order, files with unknown extensions are skipped.
    pub fn open(path: &Path) -> Result<Self> {
        let files = if path.is_dir() {
            let mut files = path
                .read_dir()?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && ImageFormat::from_path(p).is_ok())
                .collect::<Vec<_>>();
            files.sort();
            if files.is_empty() {
                return Err(Error::Camera(format!(
                    "{}: no image files found",
                    path.display()
                )));
            }
            files
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(Error::Camera(format!(
                "{}: no such camera or file",
                path.display()
            )));
        };

        debug!("{}: {} image(s)", path.display(), files.len());
        Ok(Self {
            name: path.display().to_string(),
            files,
            next: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_frame(&mut self) -> Result<RawFrame> {
        let path = &self.files[self.next];
        self.next = (self.next + 1) % self.files.len();
        trace!("decoding {}", path.display());

        let img = image::open(path)?;
        if img.color().has_color() {
            let rgb = img.to_rgb8();
            let (w, h) = rgb.dimensions();
            RawFrame::new(w as usize, h as usize, PixelFormat::Rgb8, rgb.into_raw())
        } else {
            let gray = img.to_luma8();
            let (w, h) = gray.dimensions();
            RawFrame::new(w as usize, h as usize, PixelFormat::Gray8, gray.into_raw())
        }
    }
}
