use super::PointFilter;
use crate::constants::{SMOOTHING_ALPHA_MAX, SMOOTHING_ALPHA_MIN};
use crate::geometry::ScreenPoint;
use crate::utils::lerp;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Last output of the smoother
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingState {
    pub x: f64,
    pub y: f64,
}

impl From<ScreenPoint> for SmoothingState {
    fn from(p: ScreenPoint) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<SmoothingState> for ScreenPoint {
    fn from(s: SmoothingState) -> Self {
        Self::new(s.x, s.y)
    }
}

/// Check a smoothing factor lies in `(0, 1]`
///
/// # Errors
///
/// Returns a configuration error naming the rejected value
pub fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > SMOOTHING_ALPHA_MIN && alpha <= SMOOTHING_ALPHA_MAX {
        Ok(())
    } else {
        Err(Error::ConfigError(format!(
            "Smoothing alpha must be in (0, 1], got {alpha}"
        )))
    }
}

/// One smoothing step: move `current` toward `raw` by `alpha` on each axis
#[must_use]
pub fn smooth(current: SmoothingState, raw: ScreenPoint, alpha: f64) -> SmoothingState {
    SmoothingState {
        x: lerp(current.x, raw.x, alpha),
        y: lerp(current.y, raw.y, alpha),
    }
}

/// Exponential smoother over surface positions
///
/// Holds no state until the first sample; the first sample after construction
/// or [`reset`](PointFilter::reset) is returned unchanged, so the marker snaps
/// to a reacquired face instead of gliding in from a stale position.
#[derive(Debug, Clone)]
pub struct PositionSmoother {
    alpha: f64,
    state: Option<SmoothingState>,
}

impl PositionSmoother {
    /// Create a smoother
    ///
    /// # Errors
    ///
    /// Returns an error if alpha is not in the range (0, 1]
    pub fn new(alpha: f64) -> Result<Self> {
        validate_alpha(alpha)?;
        Ok(Self { alpha, state: None })
    }

    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub const fn state(&self) -> Option<SmoothingState> {
        self.state
    }
}

impl PointFilter for PositionSmoother {
    fn apply(&mut self, raw: ScreenPoint) -> ScreenPoint {
        let next = match self.state {
            Some(current) => smooth(current, raw, self.alpha),
            None => SmoothingState::from(raw),
        };
        self.state = Some(next);
        next.into()
    }

    fn reset(&mut self) {
        self.state = None;
    }

    fn name(&self) -> &str {
        "PositionSmoother"
    }
}
