//! Face presence tracking.
//!
//! A discrete state drives overlay visibility; a continuous quality value in
//! `[0, 100]` ramps up while the landmark is seen and decays faster while it is
//! not, giving renderers a confidence signal for partial UI.

use crate::constants::{QUALITY_MAX, QUALITY_MIN};
use crate::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete presence state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PresenceState {
    /// No detector result with a landmark yet this session
    #[default]
    Searching,
    /// Current frame has the landmark
    Detected,
    /// Previously detected, landmark now missing
    Lost,
}

impl fmt::Display for PresenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Searching => "searching",
            Self::Detected => "detected",
            Self::Lost => "lost",
        };
        f.write_str(name)
    }
}

/// Result of feeding one frame to the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenceUpdate {
    pub state: PresenceState,
    pub quality: f64,
    /// Entered `Detected` on this frame from `Searching` or `Lost`
    pub reacquired: bool,
}

/// Presence state machine with quality ramp
#[derive(Debug, Clone)]
pub struct PresenceStateMachine {
    state: PresenceState,
    quality: f64,
    step_up: f64,
    step_down: f64,
    lost_after_misses: u32,
    misses: u32,
}

impl PresenceStateMachine {
    /// Create a state machine
    ///
    /// `lost_after_misses` is the number of consecutive landmark-less frames
    /// needed to leave `Detected`; 1 flips on the first miss.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < step_up < step_down` and `lost_after_misses >= 1`
    pub fn new(step_up: f64, step_down: f64, lost_after_misses: u32) -> Result<Self> {
        if !(step_up.is_finite() && step_up > 0.0) {
            return Err(Error::ConfigError(format!(
                "Quality step up must be positive, got {step_up}"
            )));
        }
        if !(step_down.is_finite() && step_down > step_up) {
            return Err(Error::ConfigError(format!(
                "Quality step down ({step_down}) must be greater than step up ({step_up})"
            )));
        }
        if lost_after_misses == 0 {
            return Err(Error::ConfigError(
                "Lost-after-misses must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            state: PresenceState::Searching,
            quality: QUALITY_MIN,
            step_up,
            step_down,
            lost_after_misses,
            misses: 0,
        })
    }

    #[must_use]
    pub const fn state(&self) -> PresenceState {
        self.state
    }

    #[must_use]
    pub const fn quality(&self) -> f64 {
        self.quality
    }

    /// The anchored marker is drawn only while `Detected`
    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.state == PresenceState::Detected
    }

    /// Feed whether this frame carried the landmark
    pub fn update(&mut self, landmark_present: bool) -> PresenceUpdate {
        let previous = self.state;

        if landmark_present {
            self.misses = 0;
            self.state = PresenceState::Detected;
            self.quality = (self.quality + self.step_up).min(QUALITY_MAX);
        } else {
            self.misses = self.misses.saturating_add(1);
            if self.state == PresenceState::Detected && self.misses >= self.lost_after_misses {
                self.state = PresenceState::Lost;
            }
            self.quality = (self.quality - self.step_down).max(QUALITY_MIN);
        }

        let reacquired = previous != PresenceState::Detected && self.state == PresenceState::Detected;
        if previous != self.state {
            if reacquired {
                info!("Face acquired (was {previous})");
            } else {
                info!("Face lost after {} missed frame(s)", self.misses);
            }
        } else if !landmark_present && self.state == PresenceState::Detected {
            debug!("Landmark missing, holding Detected ({}/{})", self.misses, self.lost_after_misses);
        }

        PresenceUpdate {
            state: self.state,
            quality: self.quality,
            reacquired,
        }
    }

    /// Return to `Searching` with zero quality
    pub fn reset(&mut self) {
        self.state = PresenceState::Searching;
        self.quality = QUALITY_MIN;
        self.misses = 0;
    }
}
