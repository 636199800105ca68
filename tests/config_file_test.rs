//! Tests for configuration loading, saving and validation

use landmark_anchor::{
    calibration::TargetPosition,
    config::{Config, EXAMPLE_CONFIG},
    engine::{AnchorEngine, CameraFacing, TrackingMode},
    landmarks::LandmarkSelection,
    Error,
};
use std::io::Write;

#[test]
fn test_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("anchor.yaml");

    let mut config = Config::default();
    config.tracking.mode = TrackingMode::ScreenFixed;
    config.tracking.landmark = LandmarkSelection::LeftEyeOuter;
    config.tracking.camera_facing = CameraFacing::Environment;
    config.smoothing.alpha = 0.25;
    config.target = TargetPosition::new(30.0, 70.0, 24.0).unwrap();

    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_example_config_loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(EXAMPLE_CONFIG.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.tracking.landmark.index(), 263);
    assert!(config.tracking.camera_facing.mirrored());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::from_file(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_yaml_is_config_error() {
    let result = Config::from_yaml("smoothing: [not, a, map");
    assert!(matches!(result, Err(Error::ConfigError(_))));

    let result = Config::from_yaml("tracking:\n  mode: sideways\n");
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_invalid_values_rejected_not_clamped() {
    let cases: Vec<(&str, fn(&mut Config))> = vec![
        ("alpha zero", |c| c.smoothing.alpha = 0.0),
        ("alpha above one", |c| c.smoothing.alpha = 1.01),
        ("negative radius", |c| c.target.radius = -1.0),
        ("x percent", |c| c.target.x_pct = 120.0),
        ("zero step up", |c| c.presence.step_up = 0.0),
        ("step down not above step up", |c| c.presence.step_down = c.presence.step_up),
        ("zero misses", |c| c.presence.lost_after_misses = 0),
        ("zero fps window", |c| c.frame_rate.window_ms = 0.0),
    ];

    for (name, mutate) in cases {
        let mut config = Config::default();
        mutate(&mut config);

        let err = config.validate().expect_err(name);
        assert!(matches!(err, Error::ConfigError(_)), "{name}: {err}");
        assert!(AnchorEngine::new(config.clone()).is_err(), "{name}");

        // Nothing was silently adjusted
        let mut expected = Config::default();
        mutate(&mut expected);
        assert_eq!(config, expected, "{name}");
    }
}

#[test]
fn test_smoothing_disabled_still_validates_alpha() {
    let mut config = Config::default();
    config.smoothing.enabled = false;
    config.smoothing.alpha = -1.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_set_target_validation_error() {
    let mut engine = AnchorEngine::new(Config::default()).unwrap();
    let bad = TargetPosition {
        x_pct: 50.0,
        y_pct: 50.0,
        radius: -5.0,
    };
    assert!(engine.set_target(bad).is_err());
    assert_eq!(engine.target(), TargetPosition::default());
}
