//! Performance evaluation against ground truth

use serde::{Deserialize, Serialize};

use sinkhole_net::SensorNetwork;

use crate::DetectedAttacks;

/// Published ACO detection rate (%) used as the comparison baseline
pub const BASELINE_DETECTION_RATE: f64 = 87.06;

/// Published ACO false alarm rate (%)
pub const BASELINE_FALSE_ALARM_RATE: f64 = 10.65;

/// Detection quality and network health, percentages in `0..=100`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub detection_rate: f64,
    pub false_alarm_rate: f64,
    pub packet_delivery_ratio: f64,
    pub message_drop: f64,
    pub true_detections: usize,
    pub false_alarms: usize,
    pub total_attacks: usize,
    pub detected_attacks: usize,
}

impl PerformanceMetrics {
    /// Score a detected set against the network's ground truth
    pub fn evaluate(network: &SensorNetwork, detected: &DetectedAttacks) -> Self {
        let true_detections = detected.iter().filter(|&n| network.is_sinkhole(n)).count();
        let false_alarms = detected.len() - true_detections;
        let total_attacks = network.sinkhole_nodes().len();

        let sent = network.total_packets_sent();
        let received = network.total_packets_received();

        Self {
            detection_rate: percentage(true_detections as f64, total_attacks as f64),
            false_alarm_rate: percentage(false_alarms as f64, detected.len() as f64),
            packet_delivery_ratio: percentage(received as f64, sent as f64),
            message_drop: percentage(sent.saturating_sub(received) as f64, sent as f64),
            true_detections,
            false_alarms,
            total_attacks,
            detected_attacks: detected.len(),
        }
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// How a run compares to the published baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResearchComparison {
    pub detection_rate: f64,
    pub false_alarm_rate: f64,
    pub baseline_detection_rate: f64,
    pub baseline_false_alarm_rate: f64,
    /// Positive means more attacks caught than the baseline
    pub detection_difference: f64,
    /// Negative means fewer false alarms than the baseline
    pub false_alarm_difference: f64,
}

impl ResearchComparison {
    pub fn against_baseline(metrics: &PerformanceMetrics) -> Self {
        Self::from_rates(metrics.detection_rate, metrics.false_alarm_rate)
    }

    /// Compare raw percentages, e.g. means over a trial batch
    pub fn from_rates(detection_rate: f64, false_alarm_rate: f64) -> Self {
        Self {
            detection_rate,
            false_alarm_rate,
            baseline_detection_rate: BASELINE_DETECTION_RATE,
            baseline_false_alarm_rate: BASELINE_FALSE_ALARM_RATE,
            detection_difference: detection_rate - BASELINE_DETECTION_RATE,
            false_alarm_difference: false_alarm_rate - BASELINE_FALSE_ALARM_RATE,
        }
    }

    pub fn detection_better(&self) -> bool {
        self.detection_difference > 0.0
    }

    pub fn false_alarms_better(&self) -> bool {
        self.false_alarm_difference < 0.0
    }
}
