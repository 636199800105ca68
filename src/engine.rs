//! Per-frame pipeline driver.
//!
//! One [`AnchorEngine::tick`] runs the whole pipeline synchronously: landmark
//! lookup, geometry mapping, smoothing, offset resolution, then presence and
//! frame-rate bookkeeping. The host loop owns timing; the engine only consumes
//! the timestamps it is handed.

use crate::{
    calibration::{CalibrationOffsetManager, TargetPosition},
    config::Config,
    filters::PointFilter,
    frame_rate::FrameRateEstimator,
    geometry::{FrameGeometryMapper, ScreenPoint, SourceFrameSize, SurfaceGeometry},
    landmarks::DetectionResult,
    presence::{PresenceState, PresenceStateMachine},
    Error, Result,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Marker placement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
    /// Marker follows the selected landmark
    #[default]
    FaceAnchored,
    /// Marker stays at the target percent of the surface
    ScreenFixed,
}

/// Camera facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    /// Front camera, shown mirrored
    #[default]
    User,
    /// Rear camera
    Environment,
}

impl CameraFacing {
    #[must_use]
    pub const fn mirrored(self) -> bool {
        matches!(self, Self::User)
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    /// Resolved marker position, `None` means draw nothing
    pub point: Option<ScreenPoint>,
    /// Marker radius hint in surface pixels
    pub radius: f64,
    pub presence: PresenceState,
    /// Presence confidence in `[0, 100]`
    pub quality: f64,
    /// Latest frame-rate estimate
    pub fps: Option<u32>,
    /// A new frame-rate estimate was produced this frame
    pub fps_updated: bool,
    /// Lock requested or offset frozen
    pub locked: bool,
}

impl FrameOutput {
    fn idle(radius: f64) -> Self {
        Self {
            point: None,
            radius,
            presence: PresenceState::Searching,
            quality: 0.0,
            fps: None,
            fps_updated: false,
            locked: false,
        }
    }
}

/// Per-session state, created on start and dropped on stop
struct Session {
    source: Option<SourceFrameSize>,
    smoother: Box<dyn PointFilter>,
    calibration: CalibrationOffsetManager,
    presence: PresenceStateMachine,
    frame_rate: FrameRateEstimator,
    last_anchor: Option<ScreenPoint>,
}

/// Landmark anchoring engine
pub struct AnchorEngine {
    config: Config,
    mapper: FrameGeometryMapper,
    surface: SurfaceGeometry,
    target: TargetPosition,
    session: Option<Session>,
}

impl AnchorEngine {
    /// Create an engine from a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        info!(
            "Initializing anchor engine: mode {:?}, landmark {}",
            config.tracking.mode,
            config.tracking.landmark.index()
        );

        let surface = SurfaceGeometry::new(0.0, 0.0, 1.0, config.tracking.camera_facing.mirrored());
        let target = config.target;

        Ok(Self {
            config,
            mapper: FrameGeometryMapper::new(),
            surface,
            target,
            session: None,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn surface(&self) -> &SurfaceGeometry {
        &self.surface
    }

    #[must_use]
    pub const fn target(&self) -> TargetPosition {
        self.target
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Begin a capture session with fresh state
    ///
    /// Any previous session, including its calibration, is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured filters cannot be built
    pub fn start(&mut self) -> Result<()> {
        if self.session.is_some() {
            warn!("Session already running, restarting");
        }

        let session = Session {
            source: None,
            smoother: self.config.create_filter()?,
            calibration: CalibrationOffsetManager::new(self.config.offset_policy()),
            presence: PresenceStateMachine::new(
                self.config.presence.step_up,
                self.config.presence.step_down,
                self.config.presence.lost_after_misses,
            )?,
            frame_rate: FrameRateEstimator::new(self.config.frame_rate.window_ms)?,
            last_anchor: None,
        };
        info!("Session started with {} anchor filter", session.smoother.name());
        self.session = Some(session);
        Ok(())
    }

    /// End the session and drop all derived state
    pub fn stop(&mut self) {
        if self.session.take().is_some() {
            info!("Session stopped");
        }
    }

    /// Record the native video resolution once the stream is running
    ///
    /// # Errors
    ///
    /// Returns an error outside a session, for an unsized frame, or if a
    /// different size was already recorded for this session
    pub fn set_source_size(&mut self, source: SourceFrameSize) -> Result<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| Error::SessionError("Source size set outside a session".to_string()))?;

        if !source.is_sized() {
            return Err(Error::InvalidInput(format!(
                "Source frame size must be positive, got {}x{}",
                source.width, source.height
            )));
        }

        match session.source {
            Some(existing) if existing != source => Err(Error::SessionError(format!(
                "Source size is fixed at {}x{} for this session",
                existing.width, existing.height
            ))),
            Some(_) => Ok(()),
            None => {
                info!("Source frame size {}x{}", source.width, source.height);
                session.source = Some(source);
                Ok(())
            }
        }
    }

    /// Apply a surface resize; used from the next tick on
    pub fn set_surface(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
        debug!("Surface resized to {width}x{height} @{device_pixel_ratio}x");
        self.surface = SurfaceGeometry::new(width, height, device_pixel_ratio, self.surface.mirrored);
    }

    /// Switch camera facing, which toggles horizontal mirroring
    pub fn set_camera_facing(&mut self, facing: CameraFacing) {
        info!("Camera facing {facing:?}");
        self.config.tracking.camera_facing = facing;
        self.surface.mirrored = facing.mirrored();
    }

    /// Request a calibration lock; the offset is captured on the next frame with a face
    ///
    /// # Errors
    ///
    /// Returns an error when no session is running
    pub fn request_lock(&mut self) -> Result<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| Error::SessionError("Cannot lock without a running session".to_string()))?;
        session.calibration.arm();
        Ok(())
    }

    /// Release the calibration lock
    pub fn unlock(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.calibration.unlock();
        }
    }

    /// Whether a lock is requested or frozen
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.calibration.is_locked())
    }

    /// Move the target
    ///
    /// Returns `Ok(false)` without changing anything while locked, since the
    /// target is frozen for the duration of a lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid
    pub fn set_target(&mut self, target: TargetPosition) -> Result<bool> {
        target.validate()?;
        if self.is_locked() {
            warn!("Target change ignored while locked");
            return Ok(false);
        }
        self.target = target;
        Ok(true)
    }

    /// Run one frame of the pipeline
    ///
    /// `detection` is `None` when the detector has no result for this tick,
    /// which counts the same as a frame without a face.
    pub fn tick(&mut self, detection: Option<&DetectionResult>, timestamp_ms: f64) -> FrameOutput {
        let radius = self.target.radius;
        let Some(session) = self.session.as_mut() else {
            return FrameOutput::idle(radius);
        };

        let fps_updated = session.frame_rate.tick(timestamp_ms).is_some();

        let landmark_index = self.config.tracking.landmark.index();
        let raw_anchor = detection
            .and_then(|d| d.landmark(landmark_index))
            .zip(session.source)
            .and_then(|(point, source)| self.mapper.map(point, source, &self.surface));

        let presence = session.presence.update(raw_anchor.is_some());
        if presence.reacquired {
            session.smoother.reset();
        }

        if let Some(raw) = raw_anchor {
            session.last_anchor = Some(session.smoother.apply(raw));
        }

        let point = if session.presence.overlay_visible() {
            session.last_anchor.map(|anchor| {
                let target_px = self.target.to_screen(&self.surface);
                // A held anchor never captures the offset
                if raw_anchor.is_some() {
                    session.calibration.capture_if_armed(anchor, target_px);
                }
                session.calibration.resolve_frame(anchor, target_px)
            })
        } else {
            None
        };

        FrameOutput {
            point,
            radius,
            presence: presence.state,
            quality: presence.quality,
            fps: session.frame_rate.last_estimate(),
            fps_updated,
            locked: session.calibration.is_locked(),
        }
    }
}
