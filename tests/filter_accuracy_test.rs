//! Convergence and bounds tests for the smoothing and presence signals

use landmark_anchor::{
    filters::{
        exponential::{smooth, PositionSmoother, SmoothingState},
        PointFilter,
    },
    geometry::ScreenPoint,
    presence::{PresenceState, PresenceStateMachine},
};
use proptest::prelude::*;

#[test]
fn test_converges_within_twenty_frames() {
    let target = ScreenPoint::new(100.0, 0.0);
    let mut state = SmoothingState { x: 0.0, y: 100.0 };

    let mut frames = 0;
    while (state.x - target.x).abs() >= 1.0 || (state.y - target.y).abs() >= 1.0 {
        state = smooth(state, target, 0.3);
        frames += 1;
        assert!(frames <= 20, "did not converge after {frames} frames");
    }
}

#[test]
fn test_error_shrinks_every_frame() {
    let mut filter = PositionSmoother::new(0.25).unwrap();
    filter.apply(ScreenPoint::new(0.0, 0.0));

    let target = ScreenPoint::new(250.0, -80.0);
    let mut last_error = f64::INFINITY;
    for _ in 0..50 {
        let p = filter.apply(target);
        let error = p.distance(target);
        assert!(error < last_error || error == 0.0);
        last_error = error;
    }
    assert!(last_error < 0.01);
}

#[test]
fn test_responsive_alpha_tracks_faster() {
    let mut slow = PositionSmoother::new(0.1).unwrap();
    let mut fast = PositionSmoother::new(0.3).unwrap();
    slow.apply(ScreenPoint::ORIGIN);
    fast.apply(ScreenPoint::ORIGIN);

    let target = ScreenPoint::new(100.0, 100.0);
    for _ in 0..5 {
        slow.apply(target);
        fast.apply(target);
    }

    let slow_err = ScreenPoint::from(slow.state().unwrap()).distance(target);
    let fast_err = ScreenPoint::from(fast.state().unwrap()).distance(target);
    assert!(fast_err < slow_err);
}

proptest! {
    #[test]
    fn prop_converges_for_any_alpha(alpha in 0.05..=1.0f64, gap in -1000.0..1000.0f64) {
        let target = ScreenPoint::new(gap, -gap);
        let mut state = SmoothingState { x: 0.0, y: 0.0 };
        for _ in 0..400 {
            state = smooth(state, target, alpha);
        }
        prop_assert!((state.x - target.x).abs() < 1e-3);
        prop_assert!((state.y - target.y).abs() < 1e-3);
    }

    #[test]
    fn prop_smooth_stays_between_current_and_raw(
        alpha in 0.01..=1.0f64,
        cx in -1e4..1e4f64,
        rx in -1e4..1e4f64,
    ) {
        let next = smooth(SmoothingState { x: cx, y: 0.0 }, ScreenPoint::new(rx, 0.0), alpha);
        let (lo, hi) = if cx <= rx { (cx, rx) } else { (rx, cx) };
        prop_assert!(next.x >= lo - 1e-9 && next.x <= hi + 1e-9);
    }

    #[test]
    fn prop_quality_stays_in_bounds(
        frames in proptest::collection::vec(any::<bool>(), 0..300),
        step_up in 0.5..20.0f64,
        extra_down in 0.1..40.0f64,
        misses in 1u32..5,
    ) {
        let mut machine = PresenceStateMachine::new(step_up, step_up + extra_down, misses).unwrap();
        for present in frames {
            let update = machine.update(present);
            prop_assert!((0.0..=100.0).contains(&update.quality));
            if present {
                prop_assert_eq!(update.state, PresenceState::Detected);
            }
        }
    }
}
