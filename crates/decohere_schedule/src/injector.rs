//! Noise injection
//!
//! Gantree: L3_Schedule → NoiseInjector
//!
//! Rewrites an idealized circuit into a noisy one. The circuit is walked
//! layer by layer and a noise model supplies the channels. Where channels
//! go depends on the [`NoisePolicy`]:
//!
//! - `IdleAccounting`: after each layer, the circuit qubits the layer left
//!   idle decay for the layer's dwell time;
//! - `PerOperation`: every operation decays its own targets for its own
//!   duration;
//! - `WholeLayer`: after each layer, every circuit qubit decays for the
//!   dwell time.
//!
//! Inputs are validated before anything is emitted; an error never comes
//! with a partial circuit.

use crate::layer::{Layer, LayerEvent, LayerSegmenter};
use decohere_core::circuit::Circuit;
use decohere_core::dialect::OperationClasses;
use decohere_core::error::{DecohereError, DecohereResult};
use decohere_core::instruction::Instruction;
use decohere_core::types::QubitId;
use decohere_noise::{CoherenceTimes, DecoherenceModel, GateDurations, NoiseModel, Setup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Where decoherence channels are placed
/// Gantree: NoisePolicy // 노이즈 배치 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoisePolicy {
    /// Channels on each operation's targets, using its own duration
    PerOperation,
    /// Channels on the qubits idle during a layer, using the dwell time
    #[default]
    IdleAccounting,
    /// Channels on every circuit qubit after each layer, using the dwell time
    WholeLayer,
}

impl fmt::Display for NoisePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NoisePolicy::PerOperation => "per_operation",
            NoisePolicy::IdleAccounting => "idle_accounting",
            NoisePolicy::WholeLayer => "whole_layer",
        };
        write!(f, "{}", name)
    }
}

/// Noise injector
/// Gantree: NoiseInjector // 노이즈 삽입기
pub struct NoiseInjector<'a, M: NoiseModel + ?Sized> {
    /// Channel source
    model: &'a M,

    /// Durations used for layer segmentation
    durations: &'a GateDurations,

    /// Operation classification
    classes: OperationClasses,

    /// Channel placement
    policy: NoisePolicy,
}

impl<'a> NoiseInjector<'a, DecoherenceModel> {
    /// Injector for a decoherence model, segmenting with its own durations
    /// Gantree: for_model(&DecoherenceModel) -> Self // 모델 기반 생성
    pub fn for_model(model: &'a DecoherenceModel) -> Self {
        Self::new(model, model.setup().gate_durations())
    }
}

impl<'a, M: NoiseModel + ?Sized> NoiseInjector<'a, M> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create with the stim operation classes and the default policy
    /// Gantree: new(&model,&durations) -> Self // 생성자
    pub fn new(model: &'a M, durations: &'a GateDurations) -> Self {
        Self {
            model,
            durations,
            classes: OperationClasses::stim(),
            policy: NoisePolicy::default(),
        }
    }

    /// Set the placement policy
    pub fn with_policy(mut self, policy: NoisePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the operation classes
    pub fn with_classes(mut self, classes: OperationClasses) -> Self {
        self.classes = classes;
        self
    }

    /// Placement policy
    pub fn policy(&self) -> NoisePolicy {
        self.policy
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Reject circuits that cannot be made noisy
    /// Gantree: validate(&self,&Circuit) -> Result<BTreeSet> // 사전 검증
    ///
    /// Returns the circuit qubits (targets of active operations).
    pub fn validate(&self, circuit: &Circuit) -> DecohereResult<BTreeSet<QubitId>> {
        if circuit.has_noise(&self.classes) {
            let name = circuit
                .first_noisy_operation(&self.classes)
                .unwrap_or_default()
                .to_string();
            return Err(DecohereError::PreexistingNoiseDetected(name));
        }

        if circuit.count_named(&self.classes.time_boundary) == 0 {
            return Err(DecohereError::MissingTimeBoundary(
                self.classes.time_boundary.clone(),
            ));
        }

        let qubits = circuit.active_qubits(&self.classes);
        for &qubit in &qubits {
            self.model.require_qubit(qubit)?;
        }
        Ok(qubits)
    }

    // ========================================================================
    // Injection
    // ========================================================================

    /// Produce the noisy circuit
    /// Gantree: inject(&self,&Circuit) -> Result<Circuit> // 노이즈 삽입
    pub fn inject(&self, circuit: &Circuit) -> DecohereResult<Circuit> {
        let qubits = self.validate(circuit)?;
        let segmenter = LayerSegmenter::new(self.durations, &self.classes);

        let mut out = Vec::with_capacity(circuit.len() * 2);
        let mut num_channels = 0usize;
        let mut num_layers = 0usize;

        for event in segmenter.events(circuit) {
            match event? {
                LayerEvent::Operation(inst, _) => match self.policy {
                    NoisePolicy::PerOperation => {
                        let emitted = self.model.apply(inst)?;
                        num_channels += emitted.len().saturating_sub(1);
                        out.extend(emitted);
                    }
                    NoisePolicy::IdleAccounting | NoisePolicy::WholeLayer => {
                        out.push(inst.clone());
                    }
                },
                LayerEvent::Passthrough(inst) => out.push(inst.clone()),
                LayerEvent::Sealed { layer, marker } => {
                    num_layers += 1;
                    let channels = self.layer_channels(&layer, &qubits)?;
                    num_channels += channels.len();
                    out.extend(channels);
                    if let Some(marker) = marker {
                        out.push(marker.clone());
                    }
                }
            }
        }

        log::info!(
            "injected {} noise channels over {} layers ({} policy)",
            num_channels,
            num_layers,
            self.policy
        );
        Ok(Circuit::from_instructions(out))
    }

    /// Channels emitted when a layer is sealed
    fn layer_channels(
        &self,
        layer: &Layer,
        qubits: &BTreeSet<QubitId>,
    ) -> DecohereResult<Vec<Instruction>> {
        let Some(dwell) = layer.dwell else {
            return Ok(Vec::new());
        };
        match self.policy {
            NoisePolicy::PerOperation => Ok(Vec::new()),
            NoisePolicy::IdleAccounting => {
                let idle: Vec<QubitId> = qubits.difference(&layer.active).copied().collect();
                self.model.idle(&idle, dwell)
            }
            NoisePolicy::WholeLayer => {
                let all: Vec<QubitId> = qubits.iter().copied().collect();
                self.model.idle(&all, dwell)
            }
        }
    }
}

/// Add T1/T2 decoherence noise to an idealized circuit
/// Gantree: add_noise(&Circuit,&CoherenceTimes,&GateDurations,NoisePolicy) -> Result<Circuit> // 진입점
pub fn add_noise(
    circuit: &Circuit,
    coherence: &CoherenceTimes,
    durations: &GateDurations,
    policy: NoisePolicy,
) -> DecohereResult<Circuit> {
    let model = DecoherenceModel::new(Setup::from_parts(coherence.clone(), durations.clone()));
    NoiseInjector::for_model(&model)
        .with_policy(policy)
        .inject(circuit)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use decohere_core::names::PAULI_CHANNEL_1;
    use decohere_noise::{pauli_twirl_probabilities, NoiselessModel};

    fn coherence() -> CoherenceTimes {
        CoherenceTimes::uniform(3, 20.0, 10.0).unwrap()
    }

    fn durations() -> GateDurations {
        GateDurations::new([("R", 100.0), ("CX", 10.0), ("MR", 50.0), ("M", 50.0)]).unwrap()
    }

    const CIRCUIT: &str = "R 0 1 2\nTICK\nCX 0 1\nTICK\nMR 1\nDETECTOR rec[-1]\n";

    fn channel(qubit: QubitId, duration: f64) -> Instruction {
        let p = pauli_twirl_probabilities(duration, 20.0, 10.0).unwrap();
        Instruction::pauli_channel_1(qubit, p.px, p.py, p.pz)
    }

    #[test]
    fn test_idle_accounting_shape() {
        let circuit = Circuit::parse(CIRCUIT).unwrap();
        let noisy = add_noise(&circuit, &coherence(), &durations(), NoisePolicy::IdleAccounting)
            .unwrap();
        let expected: Vec<Instruction> = vec![
            Instruction::gate("R", &[0, 1, 2]),
            Instruction::tick(),
            Instruction::gate("CX", &[0, 1]),
            channel(2, 10.0),
            Instruction::tick(),
            Instruction::gate("MR", &[1]),
            Instruction::annotation("DETECTOR", &[-1], vec![]),
            channel(0, 50.0),
            channel(2, 50.0),
        ];
        assert_eq!(noisy.instructions(), expected.as_slice());
    }

    #[test]
    fn test_per_operation_shape() {
        let circuit = Circuit::parse(CIRCUIT).unwrap();
        let noisy = add_noise(&circuit, &coherence(), &durations(), NoisePolicy::PerOperation)
            .unwrap();
        let expected: Vec<Instruction> = vec![
            Instruction::gate("R", &[0, 1, 2]),
            channel(0, 100.0),
            channel(1, 100.0),
            channel(2, 100.0),
            Instruction::tick(),
            Instruction::gate("CX", &[0, 1]),
            channel(0, 10.0),
            channel(1, 10.0),
            Instruction::tick(),
            Instruction::gate("MR", &[1]),
            channel(1, 50.0),
            Instruction::annotation("DETECTOR", &[-1], vec![]),
        ];
        assert_eq!(noisy.instructions(), expected.as_slice());
    }

    #[test]
    fn test_whole_layer_shape() {
        let circuit = Circuit::parse(CIRCUIT).unwrap();
        let noisy =
            add_noise(&circuit, &coherence(), &durations(), NoisePolicy::WholeLayer).unwrap();
        // 3 layers x 3 qubits
        assert_eq!(noisy.count_named(PAULI_CHANNEL_1), 9);
        assert_eq!(noisy.num_ticks(), 2);
        assert_eq!(noisy.instructions()[1], channel(0, 100.0));
    }

    #[test]
    fn test_strip_restores_input() {
        let circuit = Circuit::parse(CIRCUIT).unwrap();
        for policy in [
            NoisePolicy::IdleAccounting,
            NoisePolicy::PerOperation,
            NoisePolicy::WholeLayer,
        ] {
            let noisy = add_noise(&circuit, &coherence(), &durations(), policy).unwrap();
            assert_eq!(noisy.without_noise(), circuit, "policy {}", policy);
        }
    }

    #[test]
    fn test_empty_layer_gets_no_noise() {
        let circuit = Circuit::parse("R 0 1\nTICK\nTICK\nCX 0 1\n").unwrap();
        let noisy =
            add_noise(&circuit, &coherence(), &durations(), NoisePolicy::WholeLayer).unwrap();
        assert_eq!(noisy.count_named(PAULI_CHANNEL_1), 4);
    }

    #[test]
    fn test_uncovered_qubit() {
        let circuit = Circuit::parse("R 0 5\nTICK\n").unwrap();
        let err = add_noise(&circuit, &coherence(), &durations(), NoisePolicy::default())
            .unwrap_err();
        assert_eq!(
            err,
            DecohereError::QubitNotCovered {
                qubit: 5,
                num_covered: 3
            }
        );
    }

    #[test]
    fn test_missing_duration() {
        let circuit = Circuit::parse("H 0\nTICK\n").unwrap();
        let err = add_noise(&circuit, &coherence(), &durations(), NoisePolicy::default())
            .unwrap_err();
        assert_eq!(err, DecohereError::UnknownOperation("H".into()));
    }

    #[test]
    fn test_preexisting_noise() {
        let circuit = Circuit::parse("R 0\nX_ERROR(0.1) 0\nTICK\n").unwrap();
        let err = add_noise(&circuit, &coherence(), &durations(), NoisePolicy::default())
            .unwrap_err();
        assert_eq!(err, DecohereError::PreexistingNoiseDetected("X_ERROR".into()));
    }

    #[test]
    fn test_missing_tick() {
        let circuit = Circuit::parse("R 0 1\nCX 0 1\n").unwrap();
        let err = add_noise(&circuit, &coherence(), &durations(), NoisePolicy::default())
            .unwrap_err();
        assert_eq!(err, DecohereError::MissingTimeBoundary("TICK".into()));
    }

    #[test]
    fn test_noiseless_model_keeps_circuit() {
        let circuit = Circuit::parse(CIRCUIT).unwrap();
        let durations = durations();
        let noisy = NoiseInjector::new(&NoiselessModel, &durations)
            .inject(&circuit)
            .unwrap();
        assert_eq!(noisy, circuit);
    }

    #[test]
    fn test_dyn_model() {
        let circuit = Circuit::parse(CIRCUIT).unwrap();
        let durations = durations();
        let model: Box<dyn NoiseModel> = Box::new(DecoherenceModel::new(Setup::from_parts(
            coherence(),
            durations.clone(),
        )));
        let noisy = NoiseInjector::new(model.as_ref(), &durations)
            .with_policy(NoisePolicy::PerOperation)
            .inject(&circuit)
            .unwrap();
        assert_eq!(noisy.count_named(PAULI_CHANNEL_1), 6);
    }
}
