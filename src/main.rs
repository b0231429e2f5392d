// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

mod args;

use args::Args;
use clap::Parser;
use edgefirst_imgproc::{
    camera::Camera,
    image::Image,
    ops,
    points::{self, CornerParams, Points},
};
use serde_json::json;
use std::{
    error::Error,
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
    thread,
    time::Instant,
};
use tracing::{debug, error, info, trace};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, Layer};

type Message = (u64, Image<u8>);

fn update_fps(prev: &mut Instant, history: &mut [i64], index: &mut usize) -> i64 {
    let now = Instant::now();

    let elapsed = now.duration_since(*prev);
    *prev = now;

    history[*index] = 1e9 as i64 / elapsed.as_nanos().max(1) as i64;
    *index = (*index + 1) % history.len();

    (history.iter().sum::<i64>() as f64 / history.len() as f64).round() as i64
}

fn init_tracing(args: &Args) -> Result<(), Box<dyn Error>> {
    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let stdout_log = tracing_subscriber::fmt::layer().with_filter(level);
    let journald = tracing_journald::layer()
        .ok()
        .map(|layer| layer.with_filter(level));

    let tracy = if args.tracy {
        tracy_client::Client::start();
        Some(tracing_tracy::TracyLayer::default().with_filter(level))
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(stdout_log)
        .with(journald)
        .with(tracy);
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(&args)?;
    info!("EdgeFirst Image Processing {}", env!("CARGO_PKG_VERSION"));

    let params = args.corner_params()?;

    // Frames queue up while a slow detection runs, processing skips to the
    // newest one.
    let (tx, rx) = kanal::bounded::<Message>(2);
    let capture_args = args.clone();
    let capture_thread = thread::Builder::new()
        .name("capture".to_owned())
        .spawn(move || capture(&capture_args, tx))?;

    process(&args, &params, rx)?;

    match capture_thread.join() {
        Ok(result) => result?,
        Err(_) => return Err("capture thread panicked".into()),
    }
    Ok(())
}

fn capture(args: &Args, tx: kanal::Sender<Message>) -> edgefirst_imgproc::Result<()> {
    let mut cam = Camera::open(&args.camera)?;
    let (rows, cols) = args.rows_cols();
    cam.set_mode(args.mode.into(), rows, cols)?;

    loop {
        let now = Instant::now();
        let frame = cam.grab()?;
        let sequence = frame.sequence();
        let image = frame.to_image()?;
        trace!("camera capture: {:?}", now.elapsed());

        if tx.send((sequence, image)).is_err() {
            debug!("processing stopped, closing {}", cam.name());
            break;
        }
        if args.frames > 0 && sequence + 1 >= args.frames {
            break;
        }
    }
    Ok(())
}

fn process(
    args: &Args,
    params: &CornerParams,
    rx: kanal::Receiver<Message>,
) -> Result<(), Box<dyn Error>> {
    let mut points_out = args
        .points_out
        .as_ref()
        .map(|path| File::create(path).map(BufWriter::new))
        .transpose()?;
    if let Some(dir) = &args.save_dir {
        fs::create_dir_all(dir)?;
    }

    let mut prev = Instant::now();
    let mut history = vec![0; 30];
    let mut index = 0;

    while let Ok((mut sequence, mut frame)) = rx.recv() {
        while let Ok(Some((newer_seq, newer))) = rx.try_recv() {
            debug!("dropping stale frame {sequence}");
            sequence = newer_seq;
            frame = newer;
        }

        let fps = update_fps(&mut prev, &mut history, &mut index);
        let now = Instant::now();
        let corners = match detect(&frame, params) {
            Ok(corners) => corners,
            Err(e) => {
                error!("frame {sequence}: {e}");
                continue;
            }
        };
        info!(
            frame = sequence,
            corners = corners.points.len(),
            total = corners.total,
            fps,
            "detect: {:?}",
            now.elapsed()
        );

        if let Some(out) = points_out.as_mut() {
            let line = json!({
                "frame": sequence,
                "width": frame.width(),
                "height": frame.height(),
                "total": corners.total,
                "points": corners.points.iter().map(|p| [p.x, p.y]).collect::<Vec<_>>(),
            });
            writeln!(out, "{line}")?;
        }

        if let Some(dir) = &args.save_dir {
            if let Err(e) = save_annotated(dir, sequence, &frame, &corners) {
                error!("frame {sequence}: {e}");
            }
        }
    }

    if let Some(mut out) = points_out {
        out.flush()?;
    }
    Ok(())
}

fn detect(frame: &Image<u8>, params: &CornerParams) -> edgefirst_imgproc::Result<Points> {
    let mut float = Image::<f32>::new(frame.size());
    ops::scale_8u32f(&frame.view(), &mut float.view_mut(), 0.0, 1.0)?;
    points::detect_corners_in(&float, params)
}

/// Writes the frame as RGB with a red cross on every corner.
fn save_annotated(
    dir: &Path,
    sequence: u64,
    frame: &Image<u8>,
    corners: &Points,
) -> edgefirst_imgproc::Result<()> {
    const ARM: i64 = 3;
    const RED: image::Rgb<u8> = image::Rgb([255, 0, 0]);

    let (w, h) = (frame.width() as u32, frame.height() as u32);
    let mut rgb = image::RgbImage::from_fn(w, h, |x, y| {
        let v = frame.get(x as usize, y as usize).copied().unwrap_or_default();
        image::Rgb([v, v, v])
    });
    for p in &corners.points {
        let (cx, cy) = (p.x as i64, p.y as i64);
        for d in -ARM..=ARM {
            for (x, y) in [(cx + d, cy), (cx, cy + d)] {
                if (0..w as i64).contains(&x) && (0..h as i64).contains(&y) {
                    rgb.put_pixel(x as u32, y as u32, RED);
                }
            }
        }
    }

    let path = dir.join(format!("frame{sequence:06}.png"));
    rgb.save(&path)?;
    trace!("saved {}", path.display());
    Ok(())
}
