//! Report artifacts handed to an external plotter
//!
//! Each artifact is one self-contained record: the numbers to draw plus the labels to draw
//! them with. Nothing here renders anything.

use std::fs;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use scatterstat_core::{
    Estimate, EventTally, Material, MeasurementKind, MomentumSeries, Particle, SweepResults,
};
use serde::{Deserialize, Serialize};

/// Which artifacts to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Mean and mode of every measurement against incident angle
    pub estimate_scatter: bool,
    /// Every event category of the tally against incident angle
    pub event_counts: bool,
    /// Cutoff angle against incident momentum
    pub cutoff_angles: bool,
    /// Reflected count against plate thickness
    pub thickness_study: bool,
    /// Maximum and mean penetration depth against incident angle
    pub depth_study: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            estimate_scatter: true,
            event_counts: true,
            cutoff_angles: true,
            thickness_study: false,
            depth_study: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    EstimateScatter,
    EventCounts,
    CutoffAngles,
    ThicknessStudy,
    DepthStudy,
}

/// One plotted value, with optional asymmetric error bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_error_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_error_high: Option<f64>,
}

impl Point {
    fn bare(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            y_error_low: None,
            y_error_high: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<Point>,
}

/// A single plot's worth of data and labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// File stem, unique within a report
    pub name: String,
    pub kind: ArtifactKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

/// Summary written next to the artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub generated_at: jiff::Timestamp,
    pub configurations: usize,
    pub faults: usize,
    pub artifacts: Vec<String>,
}

/// Build every artifact `options` asks for
#[must_use]
pub fn build_artifacts(results: &SweepResults, options: &ReportOptions) -> Vec<Artifact> {
    let all_series = results.series();
    let mut artifacts = Vec::new();

    if options.estimate_scatter {
        for group in group_by_target(&all_series) {
            for kind in MeasurementKind::ALL {
                if let Some(artifact) = estimate_scatter(&group, kind) {
                    artifacts.push(artifact);
                }
            }
        }
    }
    if options.event_counts {
        artifacts.extend(all_series.iter().map(event_counts));
    }
    if options.cutoff_angles {
        artifacts.extend(group_by_target(&all_series).iter().map(cutoff_angles));
    }
    if options.thickness_study && results.axes.thicknesses.iter().any(Option::is_some) {
        artifacts.extend(thickness_study(results));
    }
    if options.depth_study {
        artifacts.extend(all_series.iter().filter_map(depth_study));
    }

    tracing::debug!(artifacts = artifacts.len(), "built report artifacts");
    artifacts
}

/// Write artifacts, the full results and the fault list into `dir`.
///
/// Returns the manifest that was written.
pub fn write_report(
    dir: &Path,
    results: &SweepResults,
    artifacts: &[Artifact],
) -> color_eyre::Result<Manifest> {
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("failed to create output directory {}", dir.display()))?;

    for artifact in artifacts {
        write_json(&dir.join(format!("{}.json", artifact.name)), artifact)?;
    }
    write_json(&dir.join("results.json"), results)?;
    write_json(&dir.join("faults.json"), &results.faults)?;

    let manifest = Manifest {
        generated_at: jiff::Timestamp::now(),
        configurations: results.iter().count(),
        faults: results.faults.len(),
        artifacts: artifacts.iter().map(|a| a.name.clone()).collect(),
    };
    write_json(&dir.join("manifest.json"), &manifest)?;
    tracing::info!(
        dir = %dir.display(),
        artifacts = artifacts.len(),
        "report written"
    );
    Ok(manifest)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> color_eyre::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .wrap_err_with(|| format!("failed to serialize {}", path.display()))?;
    fs::write(path, json).wrap_err_with(|| format!("failed to write {}", path.display()))
}

/// Series sharing particle, material and thickness, in momentum order
struct TargetGroup<'a> {
    particle: Particle,
    material: Material,
    thickness: Option<f64>,
    series: Vec<&'a MomentumSeries>,
}

impl TargetGroup<'_> {
    fn stem(&self) -> String {
        let mut stem = format!(
            "{}_{}",
            particle_slug(self.particle),
            material_slug(self.material)
        );
        if let Some(t) = self.thickness {
            stem.push_str(&format!("_{}mm", number_slug(t)));
        }
        stem
    }

    fn title(&self) -> String {
        let mut title = format!("{} on {}", self.particle, self.material);
        if let Some(t) = self.thickness {
            title.push_str(&format!(" ({t} mm)"));
        }
        title
    }
}

fn group_by_target(all: &[MomentumSeries]) -> Vec<TargetGroup<'_>> {
    let mut groups: Vec<TargetGroup<'_>> = Vec::new();
    for series in all {
        let same = |g: &TargetGroup<'_>| {
            g.particle == series.particle
                && g.material == series.material
                && g.thickness.map(f64::to_bits) == series.thickness.map(f64::to_bits)
        };
        match groups.iter_mut().find(|g| same(g)) {
            Some(group) => group.series.push(series),
            None => groups.push(TargetGroup {
                particle: series.particle,
                material: series.material,
                thickness: series.thickness,
                series: vec![series],
            }),
        }
    }
    groups
}

fn estimate_scatter(group: &TargetGroup<'_>, kind: MeasurementKind) -> Option<Artifact> {
    let mut series = Vec::new();
    for momentum in &group.series {
        let estimates = momentum.estimates(kind);
        if estimates.is_empty() {
            continue;
        }
        let mode = |(x, e): &(f64, Estimate)| Point {
            x: *x,
            y: e.mode,
            y_error_low: Some(e.mode_error_left),
            y_error_high: Some(e.mode_error_right),
        };
        let mean = |(x, e): &(f64, Estimate)| Point {
            x: *x,
            y: e.mean,
            y_error_low: Some(e.mean_error),
            y_error_high: Some(e.mean_error),
        };
        series.push(Series {
            label: format!("mode, {} MeV/c", momentum.momentum),
            points: estimates.iter().map(mode).collect(),
        });
        series.push(Series {
            label: format!("mean, {} MeV/c", momentum.momentum),
            points: estimates.iter().map(mean).collect(),
        });
    }
    if series.is_empty() {
        return None;
    }
    Some(Artifact {
        name: format!("{}_{}", kind.label(), group.stem()),
        kind: ArtifactKind::EstimateScatter,
        title: format!("Outgoing {} for {}", kind.label(), group.title()),
        x_label: "incident angle [deg]".to_string(),
        y_label: format!("{} [{}]", kind.label(), kind.unit()),
        series,
    })
}

fn single_target(momentum: &MomentumSeries) -> TargetGroup<'_> {
    TargetGroup {
        particle: momentum.particle,
        material: momentum.material,
        thickness: momentum.thickness,
        series: Vec::new(),
    }
}

fn event_counts(momentum: &MomentumSeries) -> Artifact {
    let column = |label: &str, count: fn(&EventTally) -> u64| Series {
        label: label.to_string(),
        points: momentum
            .tallies
            .iter()
            .map(|t| Point::bare(t.incident_angle, count(&t.tally) as f64))
            .collect(),
    };
    let group = single_target(momentum);
    Artifact {
        name: format!(
            "counts_{}_{}",
            group.stem(),
            number_slug(momentum.momentum)
        ),
        kind: ArtifactKind::EventCounts,
        title: format!("Event counts for {} at {} MeV/c", group.title(), momentum.momentum),
        x_label: "incident angle [deg]".to_string(),
        y_label: "events".to_string(),
        series: vec![
            column("reflected", |t| t.reflected),
            column("transmitted", |t| t.transmitted),
            column("absorbed", |t| t.absorbed),
            column("decayed", |t| t.decayed),
            column("decayed_in", |t| t.decayed_in),
            column("decayed_out_reflected", |t| t.decayed_out_reflected),
            column("decayed_out_transmitted", |t| t.decayed_out_transmitted),
        ],
    }
}

/// `None` when no angle of the series recorded a usable depth
fn depth_study(momentum: &MomentumSeries) -> Option<Artifact> {
    let depths = momentum.depths();
    if depths.is_empty() {
        return None;
    }
    let group = single_target(momentum);
    Some(Artifact {
        name: format!(
            "depth_{}_{}",
            group.stem(),
            number_slug(momentum.momentum)
        ),
        kind: ArtifactKind::DepthStudy,
        title: format!(
            "Penetration depth for {} at {} MeV/c",
            group.title(),
            momentum.momentum
        ),
        x_label: "incident angle [deg]".to_string(),
        y_label: "depth [mm]".to_string(),
        series: vec![
            Series {
                label: "max depth".to_string(),
                points: depths.iter().map(|(x, d)| Point::bare(*x, d.max)).collect(),
            },
            Series {
                label: "mean depth".to_string(),
                points: depths.iter().map(|(x, d)| Point::bare(*x, d.mean)).collect(),
            },
        ],
    })
}

fn cutoff_angles(group: &TargetGroup<'_>) -> Artifact {
    let points = group
        .series
        .iter()
        .filter_map(|s| s.cutoff_angle.map(|angle| Point::bare(s.momentum, angle)))
        .collect();
    Artifact {
        name: format!("cutoff_{}", group.stem()),
        kind: ArtifactKind::CutoffAngles,
        title: format!("Cutoff angle for {}", group.title()),
        x_label: "momentum [MeV/c]".to_string(),
        y_label: "cutoff angle [deg]".to_string(),
        series: vec![Series {
            label: "cutoff".to_string(),
            points,
        }],
    }
}

fn thickness_study(results: &SweepResults) -> Vec<Artifact> {
    let axes = &results.axes;
    let mut artifacts = Vec::new();
    for &particle in &axes.particles {
        for &material in &axes.materials {
            for &momentum in &axes.momenta {
                let series: Vec<Series> = axes
                    .angles
                    .iter()
                    .map(|&angle| Series {
                        label: format!("{angle} deg"),
                        points: results
                            .thickness_scan(particle, material, momentum, angle)
                            .into_iter()
                            .map(|(t, tally)| Point::bare(t, tally.reflected as f64))
                            .collect(),
                    })
                    .filter(|s| !s.points.is_empty())
                    .collect();
                if series.is_empty() {
                    continue;
                }
                artifacts.push(Artifact {
                    name: format!(
                        "thickness_{}_{}_{}",
                        particle_slug(particle),
                        material_slug(material),
                        number_slug(momentum)
                    ),
                    kind: ArtifactKind::ThicknessStudy,
                    title: format!(
                        "Reflected {particle} on {material} at {momentum} MeV/c against thickness"
                    ),
                    x_label: "thickness [mm]".to_string(),
                    y_label: "reflected events".to_string(),
                    series,
                });
            }
        }
    }
    artifacts
}

/// File-name-safe particle label (`mu+` becomes `muplus`)
fn particle_slug(particle: Particle) -> String {
    particle
        .label()
        .replace('+', "plus")
        .replace('-', "minus")
}

fn material_slug(material: Material) -> String {
    material.name().to_ascii_lowercase().replace('-', "_")
}

/// `2.5` becomes `2p5`
fn number_slug(value: f64) -> String {
    value.to_string().replace('.', "p").replace('-', "m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs() {
        assert_eq!(particle_slug(Particle::MuPlus), "muplus");
        assert_eq!(particle_slug(Particle::Electron), "eminus");
        assert_eq!(material_slug(Material::GoldPlatedCopper), "gold_plated_copper");
        assert_eq!(number_slug(2.5), "2p5");
        assert_eq!(number_slug(100.0), "100");
    }
}
