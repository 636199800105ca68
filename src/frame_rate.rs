//! Windowed frames-per-second estimate from caller-supplied timestamps.

use crate::constants::DEFAULT_FPS_WINDOW_MS;
use crate::utils::safe_cast::f64_round_to_u32_clamp;
use crate::{Error, Result};
use log::debug;

/// Frames counted since the window opened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsWindow {
    pub frame_count: u32,
    pub window_start_ms: f64,
}

/// Emits a new estimate once per elapsed window
#[derive(Debug, Clone)]
pub struct FrameRateEstimator {
    window_ms: f64,
    window: Option<FpsWindow>,
    last_estimate: Option<u32>,
}

impl Default for FrameRateEstimator {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_FPS_WINDOW_MS,
            window: None,
            last_estimate: None,
        }
    }
}

impl FrameRateEstimator {
    /// Create an estimator with the given window length
    ///
    /// # Errors
    ///
    /// Returns an error if the window is not a positive duration
    pub fn new(window_ms: f64) -> Result<Self> {
        if !(window_ms.is_finite() && window_ms > 0.0) {
            return Err(Error::ConfigError(format!(
                "Frame-rate window must be positive, got {window_ms} ms"
            )));
        }
        Ok(Self {
            window_ms,
            ..Self::default()
        })
    }

    /// Count one frame at `timestamp_ms`
    ///
    /// Returns a fresh estimate when more than one window has elapsed since the
    /// window opened, otherwise `None` and the caller keeps the previous value.
    /// The first call only opens the window.
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<u32> {
        if self.window.is_none() {
            self.window = Some(FpsWindow {
                frame_count: 0,
                window_start_ms: timestamp_ms,
            });
            return None;
        }
        let window = self.window.as_mut()?;

        if timestamp_ms < window.window_start_ms {
            debug!(
                "Timestamp went backwards ({timestamp_ms} < {}), restarting fps window",
                window.window_start_ms
            );
            *window = FpsWindow {
                frame_count: 0,
                window_start_ms: timestamp_ms,
            };
            return None;
        }

        window.frame_count = window.frame_count.saturating_add(1);
        let elapsed = timestamp_ms - window.window_start_ms;
        if elapsed > self.window_ms {
            let fps = f64_round_to_u32_clamp(f64::from(window.frame_count) * 1000.0 / elapsed, 0, u32::MAX);
            *window = FpsWindow {
                frame_count: 0,
                window_start_ms: timestamp_ms,
            };
            self.last_estimate = Some(fps);
            Some(fps)
        } else {
            None
        }
    }

    /// Most recent emitted estimate
    #[must_use]
    pub const fn last_estimate(&self) -> Option<u32> {
        self.last_estimate
    }

    #[must_use]
    pub const fn window(&self) -> Option<FpsWindow> {
        self.window
    }

    pub fn reset(&mut self) {
        self.window = None;
        self.last_estimate = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_30fps() {
        let mut estimator = FrameRateEstimator::default();
        let frame_ms = 1000.0 / 30.0;

        let mut emitted = Vec::new();
        for i in 0..=60 {
            if let Some(fps) = estimator.tick(i as f64 * frame_ms) {
                emitted.push(fps);
            }
        }

        assert!(!emitted.is_empty());
        for fps in emitted {
            assert_eq!(fps, 30);
        }
    }

    #[test]
    fn test_emits_only_after_window() {
        let mut estimator = FrameRateEstimator::default();
        assert_eq!(estimator.tick(1000.0), None);
        assert_eq!(estimator.tick(1250.0), None);
        assert_eq!(estimator.tick(1500.0), None); // exactly 500 ms is not past the window
        assert_eq!(estimator.tick(1600.0), Some(5)); // 3 frames over 600 ms

        let window = estimator.window().unwrap();
        assert_eq!(window.frame_count, 0);
        assert_eq!(window.window_start_ms, 1600.0);
        assert_eq!(estimator.last_estimate(), Some(5));
    }

    #[test]
    fn test_backwards_timestamp_restarts_window() {
        let mut estimator = FrameRateEstimator::default();
        estimator.tick(1000.0);
        estimator.tick(1100.0);
        assert_eq!(estimator.tick(50.0), None);
        assert_eq!(estimator.window().unwrap().window_start_ms, 50.0);
    }

    #[test]
    fn test_reset_clears_estimate() {
        let mut estimator = FrameRateEstimator::new(100.0).unwrap();
        estimator.tick(0.0);
        estimator.tick(101.0);
        assert!(estimator.last_estimate().is_some());
        estimator.reset();
        assert!(estimator.last_estimate().is_none());
        assert!(estimator.window().is_none());
    }

    #[test]
    fn test_invalid_window() {
        assert!(FrameRateEstimator::new(0.0).is_err());
        assert!(FrameRateEstimator::new(-5.0).is_err());
        assert!(FrameRateEstimator::new(f64::NAN).is_err());
    }
}
