//! Temporal filters for the anchor position.
//!
//! Face-anchored tracking runs the raw anchor through an exponential smoother
//! to damp detector jitter. Screen-fixed targets are not face-derived, so they
//! use the pass-through filter and skip smoothing entirely.

/// Exponential low-pass smoother with snap-on-reset
pub mod exponential;

use crate::geometry::ScreenPoint;
use crate::Result;

/// Trait for all anchor filters
pub trait PointFilter: Send + Sync {
    /// Feed one raw position and return the filtered position
    fn apply(&mut self, raw: ScreenPoint) -> ScreenPoint;

    /// Drop filter state so the next sample is taken as-is
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes positions through unchanged
pub struct NoFilter;

impl PointFilter for NoFilter {
    fn apply(&mut self, raw: ScreenPoint) -> ScreenPoint {
        raw
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create an anchor filter by type name
///
/// # Errors
///
/// Returns an error for an unknown filter name or an alpha outside `(0, 1]`
pub fn create_filter(filter_type: &str, alpha: f64) -> Result<Box<dyn PointFilter>> {
    match filter_type.to_lowercase().as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "exponential" | "ema" => Ok(Box::new(exponential::PositionSmoother::new(alpha)?)),
        _ => Err(crate::Error::FilterError(format!("Unknown filter type: {filter_type}"))),
    }
}
