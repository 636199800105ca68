//! Landmark anchoring and smoothing engine for face-tracked overlay markers.
//!
//! Given a normalized facial landmark from an external detector and the
//! current render-surface geometry, the engine produces a stable screen
//! coordinate every frame:
//! 1. Cover-fit mapping from source-frame space onto the surface, with optional mirroring
//! 2. Exponential smoothing of the anchor, snapping on reacquisition
//! 3. A frozen calibration offset between anchor and target once locked
//!
//! Presence tracking and a windowed frame-rate estimate run alongside on the
//! same per-frame input. The engine neither detects faces nor draws anything;
//! a host loop feeds it one detector result and timestamp per tick.
//!
//! # Examples
//!
//! ## Driving the engine
//!
//! ```
//! use landmark_anchor::{
//!     config::Config,
//!     engine::AnchorEngine,
//!     geometry::{NormalizedPoint, SourceFrameSize},
//!     landmarks::DetectionResult,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = AnchorEngine::new(Config::default())?;
//! engine.set_surface(800.0, 600.0, 2.0);
//! engine.start()?;
//! engine.set_source_size(SourceFrameSize::new(1280.0, 720.0))?;
//!
//! // One face with 478 landmarks, all at the frame center
//! let face = vec![NormalizedPoint::new(0.5, 0.5); 478];
//! let frame = DetectionResult::single_face(face);
//!
//! let output = engine.tick(Some(&frame), 16.7);
//! if let Some(point) = output.point {
//!     println!("Draw marker at ({:.1}, {:.1}), r={}", point.x, point.y, output.radius);
//! }
//!
//! engine.request_lock()?;
//! engine.tick(Some(&frame), 33.4);
//! assert!(engine.is_locked());
//! # Ok(())
//! # }
//! ```
//!
//! ## Geometry only
//!
//! ```
//! use landmark_anchor::geometry::{FrameGeometryMapper, NormalizedPoint, SourceFrameSize, SurfaceGeometry};
//!
//! let surface = SurfaceGeometry::new(800.0, 600.0, 1.0, false);
//! let source = SourceFrameSize::new(1280.0, 720.0);
//! let point = FrameGeometryMapper::new()
//!     .map(NormalizedPoint::new(0.5, 0.5), source, &surface)
//!     .expect("sized geometry");
//! assert!((point.x - 400.0).abs() < 1e-9);
//! ```

/// Cover-fit mapping from normalized landmarks to surface pixels
pub mod geometry;

/// Anchor smoothing filters
pub mod filters;

/// Calibration offset capture and resolution
pub mod calibration;

/// Face presence state and quality signal
pub mod presence;

/// Windowed frame-rate estimation
pub mod frame_rate;

/// Detector output and landmark selection
pub mod landmarks;

/// Per-frame pipeline driver
pub mod engine;

/// Numeric helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the engine
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
