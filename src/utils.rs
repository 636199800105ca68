//! Small numeric helpers shared by the pipeline stages.

pub mod safe_cast;

/// Linear interpolation from `from` toward `to` by factor `t`
#[must_use]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    t.mul_add(to - from, from)
}
