//! Network simulation configuration

use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive `[min, max]` range a value is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + PartialOrd + SampleUniform> Bounds<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Draw a value uniformly from the range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.gen_range(self.min..=self.max)
    }

    fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Sensor network simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Number of sensor nodes (default: 100)
    pub num_nodes: usize,
    /// Deployment area width (default: 100.0)
    pub width: f64,
    /// Deployment area height (default: 100.0)
    pub height: f64,
    /// Radio range; nodes within it are neighbors (default: 20.0)
    pub communication_range: f64,
    /// Number of sinkholes injected, clamped to the node count (default: 5-10)
    pub sinkholes: Bounds<usize>,
    /// Random source/destination transmissions (default: 2000)
    pub traffic_rounds: usize,
    /// Delivery probability for packets from honest nodes (default: 0.85)
    pub honest_delivery_probability: f64,
    /// Delivery probability for packets from sinkholes (default: 0.45)
    pub sinkhole_delivery_probability: f64,
    /// Starting energy of honest nodes (default: 80-100)
    pub honest_energy: Bounds<f64>,
    /// Energy of sinkholes (default: 20-40)
    pub sinkhole_energy: Bounds<f64>,
    /// Packets a sinkhole has sent before traffic starts (default: 80-120)
    pub sinkhole_sent: Bounds<u32>,
    /// Packets a sinkhole has received before traffic starts (default: 5-25)
    pub sinkhole_received: Bounds<u32>,
    /// Undelivered packets each sinkhole adds after traffic (default: 20-50)
    pub sinkhole_extra_packets: Bounds<u32>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            num_nodes: 100,
            width: 100.0,
            height: 100.0,
            communication_range: 20.0,
            sinkholes: Bounds::new(5, 10),
            traffic_rounds: 2000,
            honest_delivery_probability: 0.85,
            sinkhole_delivery_probability: 0.45,
            honest_energy: Bounds::new(80.0, 100.0),
            sinkhole_energy: Bounds::new(20.0, 40.0),
            sinkhole_sent: Bounds::new(80, 120),
            sinkhole_received: Bounds::new(5, 25),
            sinkhole_extra_packets: Bounds::new(20, 50),
        }
    }
}

impl NetworkConfig {
    /// Create a config with a node count
    pub fn new(num_nodes: usize) -> Self {
        Self {
            num_nodes,
            ..Default::default()
        }
    }

    pub fn with_area(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_range(mut self, range: f64) -> Self {
        self.communication_range = range;
        self
    }

    pub fn with_sinkholes(mut self, min: usize, max: usize) -> Self {
        self.sinkholes = Bounds::new(min, max);
        self
    }

    pub fn with_traffic_rounds(mut self, rounds: usize) -> Self {
        self.traffic_rounds = rounds;
        self
    }

    /// Check every parameter is in range
    pub fn validate(&self) -> Result<(), NetworkError> {
        if self.num_nodes == 0 {
            return Err(NetworkError::InvalidConfig("num_nodes must be at least 1".into()));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "area must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.communication_range > 0.0) {
            return Err(NetworkError::InvalidConfig(format!(
                "communication_range must be positive, got {}",
                self.communication_range
            )));
        }
        for (name, p) in [
            ("honest_delivery_probability", self.honest_delivery_probability),
            ("sinkhole_delivery_probability", self.sinkhole_delivery_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(NetworkError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {p}"
                )));
            }
        }

        let ordered = self.sinkholes.is_ordered()
            && self.honest_energy.is_ordered()
            && self.sinkhole_energy.is_ordered()
            && self.sinkhole_sent.is_ordered()
            && self.sinkhole_received.is_ordered()
            && self.sinkhole_extra_packets.is_ordered();
        if !ordered {
            return Err(NetworkError::InvalidConfig("every range needs min <= max".into()));
        }

        Ok(())
    }
}

/// Errors from building a simulated network
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Invalid network config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_config() {
        let config = NetworkConfig::default();
        assert_eq!(config.num_nodes, 100);
        assert_eq!(config.communication_range, 20.0);
        assert_eq!(config.sinkholes, Bounds::new(5, 10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bounds_sample_inclusive() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = Bounds::new(3u32, 3u32);
        assert_eq!(bounds.sample(&mut rng), 3);

        let span = Bounds::new(20.0, 40.0);
        for _ in 0..100 {
            let value = span.sample(&mut rng);
            assert!((20.0..=40.0).contains(&value));
        }
    }

    #[test]
    fn test_invalid_configs() {
        assert!(NetworkConfig::new(0).validate().is_err());
        assert!(NetworkConfig::default().with_area(0.0, 10.0).validate().is_err());
        assert!(NetworkConfig::default().with_range(-1.0).validate().is_err());
        assert!(NetworkConfig::default().with_sinkholes(8, 2).validate().is_err());

        let config = NetworkConfig {
            honest_delivery_probability: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
