use std::fs;

use scatterstat_core::{
    BinningRule, FaultPolicy, Material, MeasurementKind, ModeEstimator, Particle, Side,
};

use crate::config::{ConfigError, RunConfig};

const FULL: &str = r#"
data_dir: data
output_dir: /tmp/scatterstat-out
sweep:
  particles: [mu+, e-]
  materials: [copper, gold_plated_copper]
  thicknesses: [0.5, 1]
  momenta: [100, 200]
  angles: [5, 1, 2.5]
  cut: 10
  expected_events: 5000
  side: transmitted
  measurements: [theta, momentum]
  binning: auto
  mode_estimator:
    policy: hwhm
    domain: [0, 90]
  policy: strict
  seed: 7
  depth_limit: 30
report:
  estimate_scatter: false
  thickness_study: true
  depth_study: true
"#;

#[test]
fn test_full_config_parses() {
    let config = RunConfig::from_yaml(FULL).unwrap();
    let sweep = &config.sweep;
    assert_eq!(sweep.particles, vec![Particle::MuPlus, Particle::Electron]);
    assert_eq!(
        sweep.materials,
        vec![Material::Copper, Material::GoldPlatedCopper]
    );
    assert_eq!(sweep.thicknesses, vec![0.5, 1.0]);
    assert_eq!(sweep.angles, vec![5.0, 1.0, 2.5]);
    assert_eq!(sweep.cut, 10);
    assert_eq!(sweep.expected_events, 5000);
    assert_eq!(sweep.side, Side::Transmitted);
    assert_eq!(
        sweep.measurements,
        vec![MeasurementKind::Theta, MeasurementKind::Momentum]
    );
    assert_eq!(sweep.binning, BinningRule::Auto);
    assert_eq!(
        sweep.mode_estimator,
        ModeEstimator::Hwhm {
            domain: Some((0.0, 90.0))
        }
    );
    assert_eq!(sweep.policy, FaultPolicy::Strict);
    assert_eq!(sweep.depth_limit, Some(30.0));
    assert!(!config.report.estimate_scatter);
    assert!(config.report.event_counts);
    assert!(config.report.thickness_study);
    assert!(config.report.depth_study);
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config = RunConfig::from_yaml(
        "data_dir: data\nsweep:\n  momenta: [100]\n  angles: [1, 2]\n",
    )
    .unwrap();
    assert_eq!(config.sweep.cut, 5);
    assert_eq!(config.sweep.expected_events, 100_000);
    assert_eq!(config.sweep.binning, BinningRule::Scott);
    assert_eq!(
        config.sweep.mode_estimator,
        ModeEstimator::RectangularBin {
            combine_with_mean_error: true
        }
    );
    assert_eq!(config.sweep.policy, FaultPolicy::Lenient);
    assert_eq!(config.sweep.measurements.len(), 3);
    assert_eq!(config.sweep.depth_limit, None);
    assert!(!config.report.thickness_study);
    assert!(!config.report.depth_study);
}

#[test]
fn test_bootstrap_resamples_default() {
    let config = RunConfig::from_yaml(
        "data_dir: d\nsweep:\n  mode_estimator:\n    policy: bootstrap\n",
    )
    .unwrap();
    assert_eq!(
        config.sweep.mode_estimator,
        ModeEstimator::Bootstrap { resamples: 100 }
    );
}

#[test]
fn test_load_anchors_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    fs::write(&path, FULL).unwrap();

    let config = RunConfig::load(&path).unwrap();
    assert_eq!(config.data_dir, dir.path().join("data"));
    assert_eq!(
        config.output_dir,
        std::path::PathBuf::from("/tmp/scatterstat-out")
    );
}

#[test]
fn test_load_rejects_unusable_sweep() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    fs::write(&path, "data_dir: data\nsweep:\n  angles: [1]\n").unwrap();
    assert!(matches!(
        RunConfig::load(&path),
        Err(ConfigError::Invalid(_))
    ));

    assert!(matches!(
        RunConfig::load(&dir.path().join("missing.yaml")),
        Err(ConfigError::Io { .. })
    ));

    fs::write(&path, "data_dir: [unclosed").unwrap();
    assert!(matches!(
        RunConfig::load(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_yaml_round_trip() {
    let config = RunConfig::from_yaml(FULL).unwrap();
    let yaml = config.to_yaml().unwrap();
    assert_eq!(RunConfig::from_yaml(&yaml).unwrap(), config);
}
