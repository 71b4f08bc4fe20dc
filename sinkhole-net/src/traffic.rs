//! Packet traffic simulation
//!
//! Random source/destination transmissions. Packets leaving a sinkhole
//! arrive far less often, and each sinkhole pads its send counter with
//! packets that never arrive.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::SensorNetwork;

/// Totals produced by one traffic simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub packets_sent: u64,
    pub packets_received: u64,
}

impl TrafficSummary {
    /// Fraction of packets delivered (0.0 when nothing was sent)
    pub fn delivery_ratio(&self) -> f64 {
        if self.packets_sent == 0 {
            0.0
        } else {
            self.packets_received as f64 / self.packets_sent as f64
        }
    }
}

impl SensorNetwork {
    /// Run the configured number of transmission rounds
    pub fn simulate_traffic<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TrafficSummary {
        let n = self.nodes.len();
        let mut summary = TrafficSummary::default();

        if n == 0 {
            return summary;
        }

        let honest_p = self.config().honest_delivery_probability;
        let sinkhole_p = self.config().sinkhole_delivery_probability;
        let rounds = self.config().traffic_rounds;

        for _ in 0..rounds {
            let source = rng.gen_range(0..n);
            let destination = rng.gen_range(0..n);
            if source == destination {
                continue;
            }

            self.nodes[source].packets_sent += 1;
            summary.packets_sent += 1;

            let p = if self.nodes[source].is_malicious {
                sinkhole_p
            } else {
                honest_p
            };
            if rng.gen::<f64>() < p {
                self.nodes[destination].packets_received += 1;
                summary.packets_received += 1;
            }
        }

        let extra = self.config().sinkhole_extra_packets;
        for id in self.sinkhole_nodes.clone() {
            let packets = extra.sample(rng);
            self.nodes[id].packets_sent += packets;
            summary.packets_sent += packets as u64;
        }

        self.total_packets_sent += summary.packets_sent;
        self.total_packets_received += summary.packets_received;

        info!(
            "Simulated traffic: {} sent, {} delivered ({:.1}%)",
            summary.packets_sent,
            summary.packets_received,
            summary.delivery_ratio() * 100.0
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetworkConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_totals_match_node_counters() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut network = SensorNetwork::generate(NetworkConfig::new(30), &mut rng).unwrap();

        let sent_before: u64 = network.nodes().iter().map(|n| n.packets_sent as u64).sum();
        let recv_before: u64 = network.nodes().iter().map(|n| n.packets_received as u64).sum();

        let summary = network.simulate_traffic(&mut rng);

        let sent_after: u64 = network.nodes().iter().map(|n| n.packets_sent as u64).sum();
        let recv_after: u64 = network.nodes().iter().map(|n| n.packets_received as u64).sum();

        assert_eq!(sent_after - sent_before, summary.packets_sent);
        assert_eq!(recv_after - recv_before, summary.packets_received);
        assert_eq!(network.total_packets_sent(), summary.packets_sent);
        assert!(summary.packets_received <= summary.packets_sent);
    }

    #[test]
    fn test_sinkholes_drop_more_traffic() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut network = SensorNetwork::generate(NetworkConfig::default(), &mut rng).unwrap();
        network.simulate_traffic(&mut rng);

        let mean_ratio = |malicious: bool| {
            let ratios: Vec<f64> = network
                .nodes()
                .iter()
                .filter(|n| n.is_malicious == malicious)
                .map(|n| n.behavior().delivery_ratio)
                .collect();
            ratios.iter().sum::<f64>() / ratios.len() as f64
        };

        assert!(mean_ratio(true) < 0.38);
        assert!(mean_ratio(false) > mean_ratio(true));
    }

    #[test]
    fn test_no_rounds_only_pads_sinkholes() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = NetworkConfig::new(20).with_traffic_rounds(0);
        let mut network = SensorNetwork::generate(config, &mut rng).unwrap();
        let summary = network.simulate_traffic(&mut rng);

        assert_eq!(summary.packets_received, 0);
        let sinkholes = network.sinkhole_nodes().len() as u64;
        assert!(summary.packets_sent >= 20 * sinkholes);
        assert!(summary.packets_sent <= 50 * sinkholes);
    }
}
