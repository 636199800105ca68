//! Configuration management for the anchoring engine

use crate::calibration::{OffsetPolicy, TargetPosition};
use crate::constants::{
    DEFAULT_FPS_WINDOW_MS, DEFAULT_LOST_AFTER_MISSES, DEFAULT_QUALITY_STEP_DOWN, DEFAULT_QUALITY_STEP_UP,
    DEFAULT_SMOOTHING_ALPHA,
};
use crate::engine::{CameraFacing, TrackingMode};
use crate::filters::{exponential::validate_alpha, PointFilter};
use crate::landmarks::LandmarkSelection;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What is tracked and how the camera is oriented
    pub tracking: TrackingConfig,

    /// Anchor smoothing
    pub smoothing: SmoothingConfig,

    /// Presence state machine tuning
    pub presence: PresenceConfig,

    /// Initial target position and marker radius
    pub target: TargetPosition,

    /// Frame-rate estimation
    pub frame_rate: FrameRateConfig,
}

/// Tracking configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Face-anchored or screen-fixed marker
    pub mode: TrackingMode,

    /// Landmark read from the first face
    pub landmark: LandmarkSelection,

    /// Camera facing; the user-facing camera is shown mirrored
    pub camera_facing: CameraFacing,
}

/// Smoothing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Smooth the face anchor (ignored in screen-fixed mode)
    pub enabled: bool,

    /// Exponential smoothing factor in (0, 1]; higher is more responsive
    pub alpha: f64,
}

/// Presence configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Quality gained per frame with a face
    pub step_up: f64,

    /// Quality lost per frame without a face
    pub step_down: f64,

    /// Consecutive missed frames before a detected face counts as lost
    pub lost_after_misses: u32,
}

/// Frame-rate estimation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameRateConfig {
    /// Window length in milliseconds
    pub window_ms: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            alpha: DEFAULT_SMOOTHING_ALPHA,
        }
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            step_up: DEFAULT_QUALITY_STEP_UP,
            step_down: DEFAULT_QUALITY_STEP_DOWN,
            lost_after_misses: DEFAULT_LOST_AFTER_MISSES,
        }
    }
}

impl Default for FrameRateConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_FPS_WINDOW_MS,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration document
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Offset policy implied by the tracking mode
    #[must_use]
    pub const fn offset_policy(&self) -> OffsetPolicy {
        match self.tracking.mode {
            TrackingMode::FaceAnchored => OffsetPolicy::AnchorRelative,
            TrackingMode::ScreenFixed => OffsetPolicy::Static,
        }
    }

    /// Create the anchor filter from configuration
    ///
    /// Screen-fixed targets are not face-derived and always bypass smoothing.
    ///
    /// # Errors
    ///
    /// Returns an error if smoothing is enabled with an invalid alpha
    pub fn create_filter(&self) -> Result<Box<dyn PointFilter>> {
        let name = if self.smoothing.enabled && self.tracking.mode == TrackingMode::FaceAnchored {
            "exponential"
        } else {
            "none"
        };
        crate::filters::create_filter(name, self.smoothing.alpha)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        // Checked even when smoothing is off
        validate_alpha(self.smoothing.alpha)?;

        if !(self.presence.step_up.is_finite() && self.presence.step_up > 0.0) {
            return Err(Error::ConfigError(
                "Presence step up must be greater than 0".to_string(),
            ));
        }
        if !(self.presence.step_down.is_finite() && self.presence.step_down > self.presence.step_up) {
            return Err(Error::ConfigError(
                "Presence step down must be greater than step up".to_string(),
            ));
        }
        if self.presence.lost_after_misses == 0 {
            return Err(Error::ConfigError(
                "Lost-after-misses must be at least 1".to_string(),
            ));
        }

        self.target.validate()?;

        if !(self.frame_rate.window_ms.is_finite() && self.frame_rate.window_ms > 0.0) {
            return Err(Error::ConfigError(
                "Frame-rate window must be greater than 0 ms".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Landmark anchor configuration

# What to track
tracking:
  mode: face_anchored        # face_anchored | screen_fixed
  landmark: right_eye_outer  # left_eye_outer | right_eye_outer
  camera_facing: user        # user (mirrored) | environment

# Anchor smoothing
smoothing:
  enabled: true
  alpha: 0.3

# Presence state machine
presence:
  step_up: 4.0
  step_down: 10.0
  lost_after_misses: 1

# Initial target, percent of the surface plus radius in pixels
target:
  x_pct: 62.0
  y_pct: 42.0
  radius: 18.0

# Frame-rate estimation
frame_rate:
  window_ms: 500.0
"#;
