//! Calibration: freezing the offset between the tracked landmark and the
//! user's chosen target.
//!
//! Locking captures `target - anchor` exactly once. Every later frame adds that
//! frozen offset to the *current* anchor, so the marker keeps following the face
//! while its position relative to the face stays fixed.

use crate::constants::{DEFAULT_TARGET_RADIUS, DEFAULT_TARGET_X_PCT, DEFAULT_TARGET_Y_PCT, PERCENT};
use crate::geometry::{ScreenPoint, SurfaceGeometry};
use crate::{Error, Result};
use log::info;
use serde::{Deserialize, Serialize};

/// User-chosen target: percent of the surface plus marker radius in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetPosition {
    pub x_pct: f64,
    pub y_pct: f64,
    pub radius: f64,
}

impl Default for TargetPosition {
    fn default() -> Self {
        Self {
            x_pct: DEFAULT_TARGET_X_PCT,
            y_pct: DEFAULT_TARGET_Y_PCT,
            radius: DEFAULT_TARGET_RADIUS,
        }
    }
}

impl TargetPosition {
    /// Build a validated target
    ///
    /// # Errors
    ///
    /// Returns an error if a percentage is outside `[0, 100]` or the radius is negative
    pub fn new(x_pct: f64, y_pct: f64, radius: f64) -> Result<Self> {
        let target = Self { x_pct, y_pct, radius };
        target.validate()?;
        Ok(target)
    }

    /// Validate the target
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=PERCENT).contains(&self.x_pct) {
            return Err(Error::ConfigError(format!(
                "Target x must be between 0 and 100 percent, got {}",
                self.x_pct
            )));
        }
        if !(0.0..=PERCENT).contains(&self.y_pct) {
            return Err(Error::ConfigError(format!(
                "Target y must be between 0 and 100 percent, got {}",
                self.y_pct
            )));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(Error::ConfigError(format!(
                "Target radius must be a non-negative number of pixels, got {}",
                self.radius
            )));
        }
        Ok(())
    }

    /// Target position on the given surface
    #[must_use]
    pub fn to_screen(&self, surface: &SurfaceGeometry) -> ScreenPoint {
        surface.percent_to_screen(self.x_pct, self.y_pct)
    }
}

/// Offset captured on lock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOffset {
    pub dx: f64,
    pub dy: f64,
    pub frozen: bool,
}

/// How the resolved point relates to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetPolicy {
    /// Resolved point = live anchor + frozen offset
    #[default]
    AnchorRelative,
    /// Resolved point = target percent of the surface, anchor ignored
    Static,
}

/// Owns the lock state and the captured offset
#[derive(Debug, Clone, Default)]
pub struct CalibrationOffsetManager {
    policy: OffsetPolicy,
    armed: bool,
    offset: Option<CalibrationOffset>,
}

impl CalibrationOffsetManager {
    #[must_use]
    pub const fn new(policy: OffsetPolicy) -> Self {
        Self {
            policy,
            armed: false,
            offset: None,
        }
    }

    /// Record a lock request; the offset is captured on the next frame with an anchor
    pub fn arm(&mut self) {
        if !self.armed {
            info!("Calibration lock requested");
        }
        self.armed = true;
    }

    /// Lock requested or offset already frozen
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.armed || self.offset.is_some()
    }

    /// Lock requested but no offset captured yet
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.armed && self.offset.is_none()
    }

    #[must_use]
    pub const fn offset(&self) -> Option<CalibrationOffset> {
        self.offset
    }

    /// Capture `target - anchor` and freeze it
    ///
    /// A no-op while an offset is already frozen: the stored offset is returned
    /// unchanged regardless of the arguments.
    pub fn lock(&mut self, anchor: ScreenPoint, target: ScreenPoint) -> CalibrationOffset {
        if let Some(existing) = self.offset {
            return existing;
        }

        let offset = CalibrationOffset {
            dx: target.x - anchor.x,
            dy: target.y - anchor.y,
            frozen: true,
        };
        info!(
            "Calibration locked: offset ({:.1}, {:.1}) from anchor ({:.1}, {:.1})",
            offset.dx, offset.dy, anchor.x, anchor.y
        );
        self.armed = true;
        self.offset = Some(offset);
        offset
    }

    /// Capture the offset if a lock was requested and none is frozen yet
    pub fn capture_if_armed(&mut self, anchor: ScreenPoint, target: ScreenPoint) -> Option<CalibrationOffset> {
        if self.is_pending() {
            Some(self.lock(anchor, target))
        } else {
            None
        }
    }

    /// Clear the lock so the next lock recomputes from scratch
    pub fn unlock(&mut self) {
        if self.is_locked() {
            info!("Calibration unlocked");
        }
        self.armed = false;
        self.offset = None;
    }

    /// Apply an offset to an anchor
    #[must_use]
    pub fn resolve(anchor: ScreenPoint, offset: &CalibrationOffset) -> ScreenPoint {
        ScreenPoint::new(anchor.x + offset.dx, anchor.y + offset.dy)
    }

    /// Resolve this frame's marker position under the configured policy
    ///
    /// Without a frozen offset the anchor-relative policy places the marker on
    /// the anchor itself.
    #[must_use]
    pub fn resolve_frame(&self, anchor: ScreenPoint, target: ScreenPoint) -> ScreenPoint {
        match self.policy {
            OffsetPolicy::AnchorRelative => match &self.offset {
                Some(offset) => Self::resolve(anchor, offset),
                None => anchor,
            },
            OffsetPolicy::Static => target,
        }
    }
}
