//! Noise models
//!
//! Gantree: L2_Noise → NoiseModel
//!
//! A noise model turns an operation into the instructions that realise it
//! on hardware (the operation itself followed by its noise) and produces
//! the noise of qubits that sit idle for a given time. Circuit generators
//! and the noise injector only talk to the [`NoiseModel`] trait, so other
//! models can be added without touching them.

use crate::error_probs::pauli_twirl_probabilities;
use crate::setup::Setup;
use decohere_core::error::DecohereResult;
use decohere_core::instruction::Instruction;
use decohere_core::types::{Duration, QubitId};

/// Capability interface of a noise model
/// Gantree: NoiseModel // trait {apply, idle}
pub trait NoiseModel: Send + Sync {
    /// Instructions realising `instruction`, noise included
    /// Gantree: apply(&self,&Instruction) -> Result<Vec<Instruction>> // 연산 + 노이즈
    fn apply(&self, instruction: &Instruction) -> DecohereResult<Vec<Instruction>>;

    /// Noise of `qubits` idling for `duration`, one entry per qubit in order
    /// Gantree: idle(&self,&[q],t) -> Result<Vec<Instruction>> // 대기 노이즈
    fn idle(&self, qubits: &[QubitId], duration: Duration) -> DecohereResult<Vec<Instruction>>;

    /// Duration of an operation
    fn duration(&self, name: &str) -> DecohereResult<Duration>;

    /// Fail with `QubitNotCovered` when the model has no parameters for `qubit`
    fn require_qubit(&self, _qubit: QubitId) -> DecohereResult<()> {
        Ok(())
    }

    /// [`NoiseModel::apply`] for a named gate on qubits
    fn gate(&self, name: &str, qubits: &[QubitId]) -> DecohereResult<Vec<Instruction>> {
        self.apply(&Instruction::gate(name, qubits))
    }

    /// Pauli X gates
    fn x_gate(&self, qubits: &[QubitId]) -> DecohereResult<Vec<Instruction>> {
        self.gate("X", qubits)
    }

    /// Hadamard gates
    fn hadamard(&self, qubits: &[QubitId]) -> DecohereResult<Vec<Instruction>> {
        self.gate("H", qubits)
    }

    /// CNOT gates on flattened (control, target) pairs
    fn cnot(&self, qubits: &[QubitId]) -> DecohereResult<Vec<Instruction>> {
        self.gate("CX", qubits)
    }

    /// CZ gates on flattened qubit pairs
    fn cphase(&self, qubits: &[QubitId]) -> DecohereResult<Vec<Instruction>> {
        self.gate("CZ", qubits)
    }

    /// Z-basis measurements
    fn measure(&self, qubits: &[QubitId]) -> DecohereResult<Vec<Instruction>> {
        self.gate("M", qubits)
    }

    /// Z-basis resets
    fn reset(&self, qubits: &[QubitId]) -> DecohereResult<Vec<Instruction>> {
        self.gate("R", qubits)
    }
}

// ============================================================================
// Decoherence Model
// ============================================================================

/// Coherence-limited noise: Pauli-twirled T1/T2 decay while an operation runs
/// or a qubit idles
/// Gantree: DecoherenceModel // PTA 구현
#[derive(Debug, Clone, PartialEq)]
pub struct DecoherenceModel {
    /// Device parameters
    /// Gantree: setup: Setup // 장치 파라미터
    setup: Setup,
}

impl DecoherenceModel {
    /// Create from a setup
    /// Gantree: new(Setup) -> Self // 생성자
    pub fn new(setup: Setup) -> Self {
        Self { setup }
    }

    /// Device parameters
    pub fn setup(&self) -> &Setup {
        &self.setup
    }
}

impl NoiseModel for DecoherenceModel {
    fn apply(&self, instruction: &Instruction) -> DecohereResult<Vec<Instruction>> {
        let duration = self.setup.duration(&instruction.name)?;
        let qubits = instruction.qubits();
        let mut out = Vec::with_capacity(qubits.len() + 1);
        out.push(instruction.clone());
        out.extend(self.idle(&qubits, duration)?);
        Ok(out)
    }

    fn idle(&self, qubits: &[QubitId], duration: Duration) -> DecohereResult<Vec<Instruction>> {
        qubits
            .iter()
            .map(|&qubit| {
                let coherence = self.setup.qubit(qubit)?;
                let probs = pauli_twirl_probabilities(duration, coherence.t1, coherence.t2)?;
                Ok(Instruction::pauli_channel_1(
                    qubit, probs.px, probs.py, probs.pz,
                ))
            })
            .collect()
    }

    fn duration(&self, name: &str) -> DecohereResult<Duration> {
        self.setup.duration(name)
    }

    fn require_qubit(&self, qubit: QubitId) -> DecohereResult<()> {
        self.setup.qubit(qubit).map(|_| ())
    }
}

// ============================================================================
// Noiseless Model
// ============================================================================

/// Ideal operations: emits gates unchanged and no idle noise
/// Gantree: NoiselessModel // 이상적
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoiselessModel;

impl NoiseModel for NoiselessModel {
    fn apply(&self, instruction: &Instruction) -> DecohereResult<Vec<Instruction>> {
        Ok(vec![instruction.clone()])
    }

    fn idle(&self, _qubits: &[QubitId], _duration: Duration) -> DecohereResult<Vec<Instruction>> {
        Ok(Vec::new())
    }

    fn duration(&self, _name: &str) -> DecohereResult<Duration> {
        Ok(0.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
