//! Trial batches
//!
//! Repeats the full simulation under consecutive seeds. Trials share
//! nothing, so they run in parallel on the blocking pool.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{simulate, PerformanceMetrics, RuntimeError, Settings};

/// Result of one trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub trial: usize,
    pub seed: u64,
    pub detected: Vec<usize>,
    pub metrics: PerformanceMetrics,
}

/// Aggregate over a batch of trials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trials: Vec<TrialOutcome>,
    pub mean_detection_rate: f64,
    pub mean_false_alarm_rate: f64,
    pub mean_packet_delivery_ratio: f64,
}

impl TrialSummary {
    /// Aggregate outcomes (means are 0.0 for an empty batch)
    pub fn from_outcomes(mut trials: Vec<TrialOutcome>) -> Self {
        trials.sort_by_key(|t| t.trial);

        let mean = |f: fn(&PerformanceMetrics) -> f64| {
            if trials.is_empty() {
                0.0
            } else {
                trials.iter().map(|t| f(&t.metrics)).sum::<f64>() / trials.len() as f64
            }
        };

        let mean_detection_rate = mean(|m| m.detection_rate);
        let mean_false_alarm_rate = mean(|m| m.false_alarm_rate);
        let mean_packet_delivery_ratio = mean(|m| m.packet_delivery_ratio);

        Self {
            trials,
            mean_detection_rate,
            mean_false_alarm_rate,
            mean_packet_delivery_ratio,
        }
    }
}

/// Seed for trial `index` of a batch
pub fn trial_seed(base_seed: u64, index: usize) -> u64 {
    base_seed.wrapping_add(index as u64)
}

/// Run `count` trials concurrently with seeds `base_seed + i`
pub async fn run_trials(
    settings: &Settings,
    count: usize,
    base_seed: u64,
) -> Result<TrialSummary, RuntimeError> {
    settings.validate()?;
    info!("Starting {} trials from seed {}", count, base_seed);

    let handles = (0..count).map(|trial| {
        let settings = settings.clone();
        let seed = trial_seed(base_seed, trial);
        tokio::task::spawn_blocking(move || {
            let run = simulate(&settings, seed)?;
            debug!(
                "Trial {} (seed {}): {:.1}% detection",
                trial, seed, run.metrics.detection_rate
            );
            Ok::<_, RuntimeError>(TrialOutcome {
                trial,
                seed,
                detected: run.detected.iter().collect(),
                metrics: run.metrics,
            })
        })
    });

    let mut outcomes = Vec::with_capacity(count);
    for joined in join_all(handles).await {
        outcomes.push(joined??);
    }

    let summary = TrialSummary::from_outcomes(outcomes);
    info!(
        "Trials complete: mean detection {:.2}%, mean false alarms {:.2}%",
        summary.mean_detection_rate, summary.mean_false_alarm_rate
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinkhole_core::ColonyConfig;
    use sinkhole_net::NetworkConfig;

    fn settings() -> Settings {
        Settings {
            seed: None,
            colony: ColonyConfig::new(8).with_iterations(20),
            network: NetworkConfig::new(30).with_sinkholes(2, 3),
        }
    }

    #[test]
    fn test_trial_seed_wraps() {
        assert_eq!(trial_seed(10, 3), 13);
        assert_eq!(trial_seed(u64::MAX, 1), 0);
    }

    #[test]
    fn test_summary_means() {
        let outcome = |trial, detection_rate| TrialOutcome {
            trial,
            seed: trial as u64,
            detected: Vec::new(),
            metrics: PerformanceMetrics {
                detection_rate,
                ..Default::default()
            },
        };
        let summary = TrialSummary::from_outcomes(vec![outcome(1, 50.0), outcome(0, 100.0)]);
        assert_eq!(summary.mean_detection_rate, 75.0);
        assert_eq!(summary.trials[0].trial, 0);

        let empty = TrialSummary::from_outcomes(Vec::new());
        assert_eq!(empty.mean_detection_rate, 0.0);
    }

    #[tokio::test]
    async fn test_trials_match_sequential_runs() {
        let settings = settings();
        let summary = run_trials(&settings, 4, 100).await.unwrap();
        assert_eq!(summary.trials.len(), 4);

        for outcome in &summary.trials {
            assert_eq!(outcome.seed, 100 + outcome.trial as u64);
            let direct = simulate(&settings, outcome.seed).unwrap();
            assert_eq!(direct.metrics, outcome.metrics);
        }
    }

    #[tokio::test]
    async fn test_trials_reject_bad_settings() {
        let mut settings = settings();
        settings.colony.rho = 0.0;
        assert!(run_trials(&settings, 2, 0).await.is_err());
    }
}
