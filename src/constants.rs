//! Constants used throughout the engine

/// Face-mesh landmark index of the left outer eye corner
pub const LEFT_EYE_OUTER: usize = 33;

/// Face-mesh landmark index of the right outer eye corner
pub const RIGHT_EYE_OUTER: usize = 263;

/// Default smoothing factor for face-anchored tracking
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.3;

/// Smoothing factor bounds, exclusive below and inclusive above
pub const SMOOTHING_ALPHA_MIN: f64 = 0.0;
pub const SMOOTHING_ALPHA_MAX: f64 = 1.0;

/// Presence quality range
pub const QUALITY_MIN: f64 = 0.0;
pub const QUALITY_MAX: f64 = 100.0;

/// Default quality ramp per frame while a face is detected
pub const DEFAULT_QUALITY_STEP_UP: f64 = 4.0;

/// Default quality decay per frame while no face is detected
pub const DEFAULT_QUALITY_STEP_DOWN: f64 = 10.0;

/// Consecutive landmark-less frames before Detected flips to Lost
pub const DEFAULT_LOST_AFTER_MISSES: u32 = 1;

/// Frame-rate estimation window in milliseconds
pub const DEFAULT_FPS_WINDOW_MS: f64 = 500.0;

/// Default target position, in percent of the surface
pub const DEFAULT_TARGET_X_PCT: f64 = 62.0;
pub const DEFAULT_TARGET_Y_PCT: f64 = 42.0;

/// Default marker radius in CSS pixels
pub const DEFAULT_TARGET_RADIUS: f64 = 18.0;

/// Percent scale
pub const PERCENT: f64 = 100.0;
