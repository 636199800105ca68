//! Replay harness: feeds a recorded or synthetic landmark trace through the
//! anchoring engine and prints what a renderer would draw each frame.

use anyhow::{bail, Context, Result};
use clap::Parser;
use landmark_anchor::{
    config::{Config, EXAMPLE_CONFIG},
    engine::{AnchorEngine, CameraFacing, FrameOutput, TrackingMode},
    geometry::{NormalizedPoint, SourceFrameSize},
    landmarks::{DetectionResult, LandmarkSelection},
};
use log::info;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Landmark trace to replay (YAML); a synthetic trace is used when omitted
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Number of synthetic frames
    #[arg(long, default_value = "90")]
    frames: usize,

    /// Synthetic frame rate
    #[arg(long, default_value = "30")]
    fps: f64,

    /// Drop the face from every Nth synthetic frame (0 = never)
    #[arg(long, default_value = "0")]
    drop_every: usize,

    /// Frame index at which to request a calibration lock
    #[arg(long)]
    lock_at: Option<usize>,

    /// Frame index at which to release the lock
    #[arg(long)]
    unlock_at: Option<usize>,

    /// Render surface size in CSS pixels
    #[arg(long, default_value = "800x600", value_parser = parse_size)]
    surface: (f64, f64),

    /// Device pixel ratio of the surface
    #[arg(long, default_value = "1.0")]
    dpr: f64,

    /// Source video resolution (overrides the trace header)
    #[arg(long, value_parser = parse_size)]
    source: Option<(f64, f64)>,

    /// Landmark to track (left, right, or a face-mesh index)
    #[arg(short, long)]
    landmark: Option<String>,

    /// Tracking mode (face, screen)
    #[arg(short, long)]
    mode: Option<String>,

    /// Camera facing (user, environment)
    #[arg(long)]
    facing: Option<String>,

    /// Print the example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// Recorded landmark trace
#[derive(Debug, Deserialize)]
struct Trace {
    source: Option<SourceFrameSize>,
    frames: Vec<TraceFrame>,
}

#[derive(Debug, Deserialize)]
struct TraceFrame {
    timestamp_ms: f64,
    /// Selected landmark for this frame; absent when no face was found
    #[serde(default)]
    landmark: Option<NormalizedPoint>,
    /// Detector had not produced a result yet
    #[serde(default)]
    pending: bool,
}

fn parse_size(s: &str) -> std::result::Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s}"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("bad width {w}: {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("bad height {h}: {e}"))?;
    Ok((w, h))
}

fn apply_overrides(config: &mut Config, args: &Args) -> Result<()> {
    if let Some(name) = &args.landmark {
        config.tracking.landmark =
            LandmarkSelection::parse(name).with_context(|| format!("Unknown landmark: {name}"))?;
    }
    if let Some(mode) = &args.mode {
        config.tracking.mode = match mode.as_str() {
            "face" | "face_anchored" => TrackingMode::FaceAnchored,
            "screen" | "screen_fixed" => TrackingMode::ScreenFixed,
            other => bail!("Unknown tracking mode: {other}"),
        };
    }
    if let Some(facing) = &args.facing {
        config.tracking.camera_facing = match facing.as_str() {
            "user" => CameraFacing::User,
            "environment" | "env" => CameraFacing::Environment,
            other => bail!("Unknown camera facing: {other}"),
        };
    }
    Ok(())
}

/// Slow circular drift with a little deterministic jitter
fn synthetic_trace(frames: usize, fps: f64, drop_every: usize) -> Trace {
    let frame_ms = 1000.0 / fps;
    let frames = (0..frames)
        .map(|i| {
            let t = i as f64 * frame_ms / 1000.0;
            let dropped = drop_every > 0 && i > 0 && i % drop_every == 0;
            let jitter = 0.002 * (i as f64 * 7.3).sin();
            TraceFrame {
                timestamp_ms: i as f64 * frame_ms,
                landmark: (!dropped).then(|| {
                    NormalizedPoint::new(0.5 + 0.08 * t.sin() + jitter, 0.45 + 0.04 * t.cos() - jitter)
                }),
                pending: false,
            }
        })
        .collect();

    Trace {
        source: Some(SourceFrameSize::new(1280.0, 720.0)),
        frames,
    }
}

fn detection_for(frame: &TraceFrame, landmark_index: usize) -> DetectionResult {
    match frame.landmark {
        Some(point) => DetectionResult::single_face(vec![point; landmark_index + 1]),
        None => DetectionResult::empty(),
    }
}

fn print_frame(index: usize, timestamp_ms: f64, out: &FrameOutput) {
    let fps = out.fps.map_or_else(|| "--".to_string(), |f| f.to_string());
    let point = out
        .point
        .map_or_else(|| "hidden".to_string(), |p| format!("({:.1}, {:.1})", p.x, p.y));
    let lock = if out.locked { " [locked]" } else { "" };
    println!(
        "{index:>5} {timestamp_ms:>9.1}ms {:<9} q={:>5.1} fps={fps:>3} {point}{lock}",
        out.presence.to_string(),
        out.quality
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &args)?;

    let trace = match &args.trace {
        Some(path) => {
            info!("Replaying trace {}", path.display());
            let content = std::fs::read_to_string(path)?;
            serde_yaml::from_str::<Trace>(&content).with_context(|| format!("Invalid trace {}", path.display()))?
        }
        None => synthetic_trace(args.frames, args.fps, args.drop_every),
    };

    let source = args
        .source
        .map(|(w, h)| SourceFrameSize::new(w, h))
        .or(trace.source)
        .context("Source resolution unknown: pass --source or add it to the trace")?;

    let landmark_index = config.tracking.landmark.index();
    let mut engine = AnchorEngine::new(config)?;
    engine.set_surface(args.surface.0, args.surface.1, args.dpr);
    engine.start()?;
    engine.set_source_size(source)?;

    for (index, frame) in trace.frames.iter().enumerate() {
        if args.lock_at == Some(index) {
            engine.request_lock()?;
        }
        if args.unlock_at == Some(index) {
            engine.unlock();
        }

        let detection = detection_for(frame, landmark_index);
        let out = engine.tick((!frame.pending).then_some(&detection), frame.timestamp_ms);
        print_frame(index, frame.timestamp_ms, &out);
    }

    engine.stop();
    Ok(())
}
