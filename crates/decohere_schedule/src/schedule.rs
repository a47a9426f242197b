//! Layer schedule
//!
//! Gantree: L3_Schedule → LayerSchedule
//!
//! Places the layers of a circuit on a time axis: each layer starts when the
//! previous one ends and lasts its dwell time. Used to inspect how long every
//! qubit sits idle, which is what the idle-accounting policy turns into noise.

use crate::layer::{Layer, LayerSegmenter};
use decohere_core::circuit::Circuit;
use decohere_core::dialect::OperationClasses;
use decohere_core::error::DecohereResult;
use decohere_core::types::QubitId;
use decohere_noise::{pauli_twirl_probabilities, CoherenceTimes, GateDurations};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A layer placed in time
/// Gantree: ScheduledLayer // 시간 배치 레이어
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledLayer {
    /// Layer index
    pub index: usize,
    /// Start time
    pub start: f64,
    /// Dwell time (zero for empty layers)
    pub duration: f64,
    /// Qubits busy during the layer
    pub active: Vec<QubitId>,
}

impl ScheduledLayer {
    fn from_layer(layer: Layer, start: f64) -> Self {
        Self {
            index: layer.index,
            start,
            duration: layer.duration(),
            active: layer.active.into_iter().collect(),
        }
    }

    /// End time
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Check whether a qubit is busy in this layer
    pub fn is_active(&self, qubit: QubitId) -> bool {
        self.active.binary_search(&qubit).is_ok()
    }
}

/// Time layout of a layered circuit
/// Gantree: LayerSchedule // 레이어 스케줄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSchedule {
    /// Layers in time order
    /// Gantree: layers: Vec<ScheduledLayer> // 레이어 목록
    layers: Vec<ScheduledLayer>,

    /// Number of qubits of the circuit
    num_qubits: usize,
}

impl LayerSchedule {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Schedule the layers of a circuit
    /// Gantree: from_circuit(&Circuit,&durations,&classes) -> Result<Self> // 스케줄 계산
    pub fn from_circuit(
        circuit: &Circuit,
        durations: &GateDurations,
        classes: &OperationClasses,
    ) -> DecohereResult<Self> {
        let mut start = 0.0;
        let mut layers = Vec::new();
        for layer in LayerSegmenter::new(durations, classes).layers(circuit)? {
            let scheduled = ScheduledLayer::from_layer(layer, start);
            start = scheduled.end();
            layers.push(scheduled);
        }
        Ok(Self {
            layers,
            num_qubits: circuit.num_qubits(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Layers in time order
    pub fn layers(&self) -> &[ScheduledLayer] {
        &self.layers
    }

    /// Number of layers
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Total duration
    /// Gantree: total_duration(&self) -> f64 // 총 시간
    pub fn total_duration(&self) -> f64 {
        self.layers.last().map_or(0.0, ScheduledLayer::end)
    }

    // ========================================================================
    // Idle Time Analysis
    // ========================================================================

    /// Time each qubit spends outside an operation
    /// Gantree: idle_times(&self) -> Vec<f64> // 큐비트별 idle
    pub fn idle_times(&self) -> Vec<f64> {
        let mut idle = vec![0.0; self.num_qubits];
        for layer in &self.layers {
            for (qubit, slot) in idle.iter_mut().enumerate() {
                if !layer.is_active(qubit) {
                    *slot += layer.duration;
                }
            }
        }
        idle
    }

    /// Idle time summed over all qubits
    pub fn total_idle_time(&self) -> f64 {
        self.idle_times().iter().sum()
    }

    /// Fraction of qubit-time spent in operations
    /// Gantree: utilization(&self) -> f64 // 활용률
    pub fn utilization(&self) -> f64 {
        let capacity = self.total_duration() * self.num_qubits as f64;
        if capacity <= 0.0 {
            return 0.0;
        }
        1.0 - self.total_idle_time() / capacity
    }

    /// Total Pauli error probability each qubit accumulates while idle
    /// Gantree: idle_error(&self,&CoherenceTimes) -> Result<Vec<f64>> // idle 에러
    ///
    /// Layers are composed as independent channels, each evaluated with the
    /// qubit's T1/T2. Qubits no layer touches need no T1/T2 and report 0.
    pub fn idle_error(&self, coherence: &CoherenceTimes) -> DecohereResult<Vec<f64>> {
        let mut errors = Vec::with_capacity(self.num_qubits);
        for qubit in 0..self.num_qubits {
            if !self.layers.iter().any(|l| l.is_active(qubit)) {
                errors.push(0.0);
                continue;
            }
            let times = coherence.require(qubit)?;
            let mut fidelity = 1.0;
            for layer in self.layers.iter().filter(|l| !l.is_active(qubit)) {
                let probs = pauli_twirl_probabilities(layer.duration, times.t1, times.t2)?;
                fidelity *= 1.0 - probs.total();
            }
            errors.push(1.0 - fidelity);
        }
        Ok(errors)
    }
}

impl fmt::Display for LayerSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "LayerSchedule: {} layers, {} qubits, duration {}",
            self.num_layers(),
            self.num_qubits,
            self.total_duration()
        )?;
        for layer in &self.layers {
            writeln!(
                f,
                "  L{}: [{}, {}) active {:?}",
                layer.index,
                layer.start,
                layer.end(),
                layer.active
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use decohere_core::error::DecohereError;

    fn schedule(text: &str) -> LayerSchedule {
        let durations =
            GateDurations::new([("R", 100.0), ("CX", 10.0), ("MR", 50.0), ("M", 50.0)]).unwrap();
        LayerSchedule::from_circuit(
            &Circuit::parse(text).unwrap(),
            &durations,
            &OperationClasses::stim(),
        )
        .unwrap()
    }

    #[test]
    fn test_layer_times() {
        let s = schedule("R 0 1 2\nTICK\nCX 0 1\nTICK\nMR 1\n");
        assert_eq!(s.num_layers(), 3);
        assert_relative_eq!(s.layers()[1].start, 100.0);
        assert_relative_eq!(s.layers()[2].start, 110.0);
        assert_relative_eq!(s.total_duration(), 160.0);
    }

    #[test]
    fn test_idle_times() {
        let s = schedule("R 0 1 2\nTICK\nCX 0 1\nTICK\nMR 1\n");
        let idle = s.idle_times();
        assert_relative_eq!(idle[0], 50.0);
        assert_relative_eq!(idle[1], 0.0);
        assert_relative_eq!(idle[2], 60.0);
        assert_relative_eq!(s.total_idle_time(), 110.0);
        assert_relative_eq!(s.utilization(), 1.0 - 110.0 / 480.0, epsilon = 1e-12);
    }

    #[test]
    fn test_idle_error_matches_channel() {
        let s = schedule("R 0 1\nTICK\nM 1\n");
        let coherence = CoherenceTimes::uniform(2, 20.0, 10.0).unwrap();
        let errors = s.idle_error(&coherence).unwrap();
        let p = pauli_twirl_probabilities(50.0, 20.0, 10.0).unwrap();
        assert_relative_eq!(errors[0], p.total(), epsilon = 1e-12);
        assert_relative_eq!(errors[1], 0.0);
    }

    #[test]
    fn test_idle_error_skips_unused_labels() {
        let s = schedule("R 0 2\nTICK\nM 2\n");
        let coherence = CoherenceTimes::with_labels(vec![0, 2], vec![20.0; 2], vec![10.0; 2])
            .unwrap();
        let errors = s.idle_error(&coherence).unwrap();
        assert_eq!(errors.len(), 3);
        assert_relative_eq!(errors[1], 0.0);
        assert!(errors[0] > 0.0);

        let sparse = CoherenceTimes::with_labels(vec![0], vec![20.0], vec![10.0]).unwrap();
        assert!(matches!(
            s.idle_error(&sparse),
            Err(DecohereError::QubitNotCovered { qubit: 2, .. })
        ));
    }

    #[test]
    fn test_empty_circuit() {
        let s = schedule("");
        assert_eq!(s.num_layers(), 0);
        assert_eq!(s.total_duration(), 0.0);
        assert_eq!(s.utilization(), 0.0);
    }
}
