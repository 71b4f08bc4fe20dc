//! Run report
//!
//! A JSON record of one run: settings, detections, per-node consensus
//! evidence and metrics.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sinkhole_core::NodeId;
use sinkhole_net::TrafficSummary;

use crate::{
    ColonyStats, ConsensusVerdict, PerformanceMetrics, ResearchComparison, RuntimeError, Settings,
    SimulationRun,
};

/// Serializable summary of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub settings: Settings,
    pub sinkhole_nodes: Vec<NodeId>,
    pub detected: Vec<NodeId>,
    pub verdicts: Vec<ConsensusVerdict>,
    pub traffic: TrafficSummary,
    pub metrics: PerformanceMetrics,
    pub comparison: ResearchComparison,
    pub colony_stats: ColonyStats,
}

impl RunReport {
    pub fn new(settings: &Settings, run: &SimulationRun) -> Self {
        let mut sinkhole_nodes = run.network.sinkhole_nodes().to_vec();
        sinkhole_nodes.sort_unstable();

        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            seed: run.seed,
            settings: Settings {
                seed: Some(run.seed),
                ..settings.clone()
            },
            sinkhole_nodes,
            detected: run.detected.iter().collect(),
            verdicts: run.verdicts.clone(),
            traffic: run.traffic,
            metrics: run.metrics,
            comparison: ResearchComparison::against_baseline(&run.metrics),
            colony_stats: run.colony_stats,
        }
    }

    /// Default file name, `report_<timestamp>.json`
    pub fn default_file_name(&self) -> String {
        format!(
            "report_{}.json",
            self.generated_at.format("%Y-%m-%d_%H-%M-%S")
        )
    }

    pub fn to_json(&self) -> Result<String, RuntimeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), RuntimeError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
