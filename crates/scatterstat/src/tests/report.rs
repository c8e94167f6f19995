use std::fs;

use scatterstat_core::{
    MeasurementKind, Particle, SweepConfig, SweepResults, SyntheticProfile, SyntheticSource,
    run_sweep,
};

use crate::report::{Artifact, ArtifactKind, ReportOptions, build_artifacts, write_report};

fn demo_results(thicknesses: Vec<f64>) -> SweepResults {
    let profile = SyntheticProfile {
        events: 300,
        ..SyntheticProfile::default()
    };
    let source = SyntheticSource::new(profile, 5);
    let config = SweepConfig {
        particles: vec![Particle::MuPlus],
        thicknesses,
        momenta: vec![100.0, 200.0],
        angles: vec![1.0, 2.0, 60.0],
        expected_events: 300,
        ..SweepConfig::default()
    };
    run_sweep(&source, &config).unwrap()
}

fn kinds(artifacts: &[Artifact]) -> Vec<ArtifactKind> {
    artifacts.iter().map(|a| a.kind).collect()
}

#[test]
fn test_default_options_build_expected_artifacts() {
    let results = demo_results(Vec::new());
    let artifacts = build_artifacts(&results, &ReportOptions::default());

    // three scatter plots, one count plot per momentum, one cutoff plot
    assert_eq!(
        kinds(&artifacts),
        vec![
            ArtifactKind::EstimateScatter,
            ArtifactKind::EstimateScatter,
            ArtifactKind::EstimateScatter,
            ArtifactKind::EventCounts,
            ArtifactKind::EventCounts,
            ArtifactKind::CutoffAngles,
        ]
    );

    let theta = &artifacts[0];
    assert_eq!(theta.name, "theta_muplus_copper");
    assert_eq!(theta.series.len(), 4);
    assert!(theta.series[0].label.starts_with("mode"));
    assert!(theta.series[0].points.iter().all(|p| p.y_error_low.is_some()));

    let counts = &artifacts[3];
    assert_eq!(counts.name, "counts_muplus_copper_100");
    let labels: Vec<&str> = counts.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "reflected",
            "transmitted",
            "absorbed",
            "decayed",
            "decayed_in",
            "decayed_out_reflected",
            "decayed_out_transmitted",
        ]
    );
    assert_eq!(counts.series[0].points.len(), 3);
}

#[test]
fn test_count_series_carry_every_tally_category() {
    let results = demo_results(Vec::new());
    let options = ReportOptions {
        estimate_scatter: false,
        cutoff_angles: false,
        ..ReportOptions::default()
    };
    let artifacts = build_artifacts(&results, &options);
    let series = results.series();
    for (artifact, momentum) in artifacts.iter().zip(&series) {
        for (i, tally) in momentum.tallies.iter().enumerate() {
            let y = |label: &str| {
                artifact
                    .series
                    .iter()
                    .find(|s| s.label == label)
                    .map(|s| s.points[i].y)
                    .unwrap()
            };
            assert_eq!(y("decayed_in"), tally.tally.decayed_in as f64);
            assert_eq!(
                y("decayed_out_reflected"),
                tally.tally.decayed_out_reflected as f64
            );
            assert_eq!(
                y("decayed_out_transmitted"),
                tally.tally.decayed_out_transmitted as f64
            );
        }
    }
}

#[test]
fn test_depth_study_plots_max_and_mean_per_angle() {
    let results = demo_results(Vec::new());
    let options = ReportOptions {
        estimate_scatter: false,
        event_counts: false,
        cutoff_angles: false,
        thickness_study: false,
        depth_study: true,
    };
    let artifacts = build_artifacts(&results, &options);
    assert_eq!(kinds(&artifacts), vec![ArtifactKind::DepthStudy; 2]);
    assert_eq!(artifacts[0].name, "depth_muplus_copper_100");

    let depths = results.series()[0].depths();
    let max: Vec<(f64, f64)> = artifacts[0].series[0]
        .points
        .iter()
        .map(|p| (p.x, p.y))
        .collect();
    let expected: Vec<(f64, f64)> = depths.iter().map(|(x, d)| (*x, d.max)).collect();
    assert_eq!(max, expected);
    assert!(
        artifacts[0].series[1]
            .points
            .iter()
            .zip(&artifacts[0].series[0].points)
            .all(|(mean, max)| mean.y <= max.y)
    );
}

#[test]
fn test_cutoff_artifact_matches_series() {
    let results = demo_results(Vec::new());
    let options = ReportOptions {
        estimate_scatter: false,
        event_counts: false,
        cutoff_angles: true,
        thickness_study: false,
        depth_study: false,
    };
    let artifacts = build_artifacts(&results, &options);
    assert_eq!(artifacts.len(), 1);

    let expected: Vec<(f64, f64)> = results
        .series()
        .iter()
        .filter_map(|s| s.cutoff_angle.map(|a| (s.momentum, a)))
        .collect();
    let found: Vec<(f64, f64)> = artifacts[0].series[0]
        .points
        .iter()
        .map(|p| (p.x, p.y))
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_thickness_study_needs_thicknesses() {
    let options = ReportOptions {
        estimate_scatter: false,
        event_counts: false,
        cutoff_angles: false,
        thickness_study: true,
        depth_study: false,
    };
    assert!(build_artifacts(&demo_results(Vec::new()), &options).is_empty());

    let artifacts = build_artifacts(&demo_results(vec![0.5, 1.0]), &options);
    assert_eq!(artifacts.len(), 2);
    assert!(artifacts.iter().all(|a| a.kind == ArtifactKind::ThicknessStudy));
    assert_eq!(artifacts[0].series.len(), 3);
    let xs: Vec<f64> = artifacts[0].series[0].points.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.5, 1.0]);
}

#[test]
fn test_write_report_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report");
    let results = demo_results(Vec::new());
    let artifacts = build_artifacts(&results, &ReportOptions::default());

    let manifest = write_report(&out, &results, &artifacts).unwrap();
    assert_eq!(manifest.configurations, 6);
    assert_eq!(manifest.faults, 0);
    assert_eq!(manifest.artifacts.len(), artifacts.len());

    for name in manifest.artifacts.iter() {
        let text = fs::read_to_string(out.join(format!("{name}.json"))).unwrap();
        let back: Artifact = serde_json::from_str(&text).unwrap();
        assert_eq!(&back.name, name);
    }
    let results_json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("results.json")).unwrap()).unwrap();
    assert_eq!(results_json["cut"], 5);
    let back: SweepResults =
        serde_json::from_str(&fs::read_to_string(out.join("results.json")).unwrap()).unwrap();
    assert_eq!(back.iter().count(), 6);
    assert_eq!(
        fs::read_to_string(out.join("faults.json")).unwrap().trim(),
        "[]"
    );
    assert!(out.join("manifest.json").is_file());
}

#[test]
fn test_scatter_follows_requested_measurements() {
    let source = SyntheticSource::new(SyntheticProfile::default(), 8);
    let config = SweepConfig {
        momenta: vec![100.0],
        angles: vec![1.0, 2.0],
        expected_events: SyntheticProfile::default().events,
        measurements: vec![MeasurementKind::Momentum],
        ..SweepConfig::default()
    };
    let results = run_sweep(&source, &config).unwrap();
    let options = ReportOptions {
        event_counts: false,
        cutoff_angles: false,
        ..ReportOptions::default()
    };
    let artifacts = build_artifacts(&results, &options);
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].name, "momentum_muplus_copper");
    assert_eq!(artifacts[0].y_label, "momentum [MeV/c]");
}
