//! Cartesian sweep over configurations with the minimum-sample cut.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rustc_hash::FxHasher;

use super::config::{FaultPolicy, SweepConfig};
use super::grid::SweepGrid;
use super::results::SweepResults;
use crate::accounting::{classify, depth_summary, select_samples, validate};
use crate::error::{FaultKind, IntegrityFault, Result, SourceError, SweepError, SweepFault};
use crate::model::{ConfigurationKey, ConfigurationOutcome, MeasurementKind};
use crate::source::{EventSource, check_columns};
use crate::stats::summarize;

/// Outcome of one configuration plus any integrity faults found in its tally
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub outcome: ConfigurationOutcome,
    pub faults: Vec<IntegrityFault>,
}

/// Bootstrap seed for one measurement of one configuration.
///
/// Depends only on the sweep seed, the key and the kind, never on evaluation order.
#[must_use]
pub fn measurement_seed(seed: u64, key: &ConfigurationKey, kind: MeasurementKind) -> u64 {
    let mut hasher = FxHasher::default();
    seed.hash(&mut hasher);
    key.stable_hash().hash(&mut hasher);
    kind.label().hash(&mut hasher);
    hasher.finish()
}

/// Resolve, classify and (when the sample passes the cut) summarize one configuration.
///
/// The tally is recorded whether or not the sample passes the cut or the integrity checks.
/// Tables with columns of different lengths are rejected as [`SourceError::Malformed`],
/// whichever source produced them.
pub fn evaluate_configuration<S: EventSource + ?Sized>(
    source: &S,
    key: &ConfigurationKey,
    config: &SweepConfig,
) -> std::result::Result<Evaluation, SourceError> {
    let data = check_columns(key, source.resolve(key)?)?;

    let tally = classify(&data);
    let faults = validate(&tally, config.expected_events).err().unwrap_or_default();
    let depth = depth_summary(&data.primary, config.depth_limit.or(key.thickness));

    let samples = select_samples(&data, config.side);
    let sample_size = samples.len();
    let below_cut = sample_size < config.cut;

    let mut estimates = BTreeMap::new();
    if !below_cut {
        for &kind in &config.measurements {
            let estimate = summarize(
                samples.get(kind),
                Some(kind.domain(key.momentum)),
                config.binning,
                &config.mode_estimator,
                measurement_seed(config.seed, key, kind),
            );
            estimates.insert(kind, estimate);
        }
    }

    tracing::debug!(
        configuration = %key,
        sample_size,
        below_cut,
        total = tally.total,
        "evaluated configuration"
    );

    Ok(Evaluation {
        outcome: ConfigurationOutcome {
            key: *key,
            tally,
            sample_size,
            below_cut,
            estimates,
            depth,
        },
        faults,
    })
}

/// Run every configuration of `config` against `source`.
///
/// Configurations are independent; with the `parallel` feature they are evaluated on the
/// rayon pool and folded into the result grid in sweep order afterwards, so the results are
/// the same either way. Under [`FaultPolicy::Strict`] the sweep stops at the first
/// configuration (in sweep order) with a fault and returns every fault it saw.
pub fn run_sweep<S: EventSource + Sync + ?Sized>(
    source: &S,
    config: &SweepConfig,
) -> Result<SweepResults> {
    config.validate()?;
    let axes = config.axes();
    let mut outcomes: SweepGrid<Option<ConfigurationOutcome>> = SweepGrid::new(axes.shape(), None);

    let mut points = Vec::with_capacity(outcomes.len());
    for indices in outcomes.indices() {
        let key = axes
            .key(&indices)
            .ok_or_else(|| SweepError::InvalidConfig(format!("no key at {indices:?}")))?;
        points.push((indices, key));
    }

    tracing::info!(
        configurations = points.len(),
        cut = config.cut,
        estimator = config.mode_estimator.label(),
        "starting sweep"
    );

    #[cfg(feature = "parallel")]
    let evaluations: Vec<_> = points
        .into_par_iter()
        .map(|(indices, key)| {
            let evaluation = evaluate_configuration(source, &key, config);
            (indices, key, evaluation)
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let evaluations = points.into_iter().map(|(indices, key)| {
        let evaluation = evaluate_configuration(source, &key, config);
        (indices, key, evaluation)
    });

    let mut faults = Vec::new();
    let mut below_cut = 0usize;
    for (indices, key, evaluation) in evaluations {
        let found: Vec<FaultKind> = match evaluation {
            Ok(Evaluation {
                outcome,
                faults: integrity,
            }) => {
                below_cut += usize::from(outcome.below_cut);
                outcomes.set(&indices, Some(outcome));
                integrity.into_iter().map(FaultKind::from).collect()
            }
            Err(err) => vec![FaultKind::from(&err)],
        };

        if found.is_empty() {
            continue;
        }
        for kind in found {
            tracing::warn!(configuration = %key, fault = %kind, "configuration fault");
            faults.push(SweepFault { key, kind });
        }
        if config.policy == FaultPolicy::Strict {
            tracing::error!(faults = faults.len(), "aborting sweep");
            return Err(SweepError::Aborted { faults });
        }
    }

    tracing::info!(
        evaluated = outcomes.data().iter().flatten().count(),
        below_cut,
        faults = faults.len(),
        "sweep complete"
    );

    Ok(SweepResults {
        axes,
        cut: config.cut,
        outcomes,
        faults,
    })
}
