//! One seeded end-to-end run: deploy, simulate traffic, detect, evaluate

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use sinkhole_net::{SensorNetwork, TrafficSummary};

use crate::{
    Colony, ColonyStats, ConsensusVerdict, DetectedAttacks, PerformanceMetrics, RuntimeError,
    Settings,
};

/// Everything produced by a single run
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub seed: u64,
    pub network: SensorNetwork,
    pub traffic: TrafficSummary,
    pub detected: DetectedAttacks,
    pub verdicts: Vec<ConsensusVerdict>,
    pub metrics: PerformanceMetrics,
    pub colony_stats: ColonyStats,
}

/// Execute one run; the same settings and seed always give the same result
pub fn simulate(settings: &Settings, seed: u64) -> Result<SimulationRun, RuntimeError> {
    settings.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);

    info!("Creating wireless sensor network (seed {})", seed);
    let mut network = SensorNetwork::generate(settings.network.clone(), &mut rng)?;
    let traffic = network.simulate_traffic(&mut rng);

    let (detected, verdicts, colony_stats) = {
        let mut colony = Colony::new(&network, settings.colony.clone())?;
        let detected = colony.run_default(&mut rng);
        (detected, colony.verdicts(), colony.stats())
    };

    let metrics = PerformanceMetrics::evaluate(&network, &detected);

    Ok(SimulationRun {
        seed,
        network,
        traffic,
        detected,
        verdicts,
        metrics,
        colony_stats,
    })
}

/// A fresh seed from the thread-local generator, for unseeded runs
pub fn random_seed() -> u64 {
    rand::random()
}
