//! Device setup
//!
//! Gantree: L2_Noise → Setup
//!
//! Coherence times plus operation durations: everything a decoherence
//! noise model needs to know about a device. Built once, validated eagerly,
//! then shared by reference.

use crate::coherence::{CoherenceTimes, QubitCoherence};
use crate::gate_durations::GateDurations;
use decohere_core::error::DecohereResult;
use decohere_core::types::QubitId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coherence parameters of a device
/// Gantree: Setup // T1/T2 + 연산 시간
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setup {
    /// Per-qubit T1/T2
    /// Gantree: coherence: CoherenceTimes // T1/T2
    coherence: CoherenceTimes,

    /// Per-operation durations
    /// Gantree: gate_durations: GateDurations // 연산 시간
    gate_durations: GateDurations,
}

impl Setup {
    /// Create with validation
    /// Gantree: new(t1s,t2s,durations) -> Result<Self> // 생성+검증
    pub fn new<I, S>(
        relax_times: Vec<f64>,
        deph_times: Vec<f64>,
        gate_durations: I,
    ) -> DecohereResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Ok(Self {
            coherence: CoherenceTimes::new(relax_times, deph_times)?,
            gate_durations: GateDurations::new(gate_durations)?,
        })
    }

    /// Combine already validated parts
    pub fn from_parts(coherence: CoherenceTimes, gate_durations: GateDurations) -> Self {
        Self {
            coherence,
            gate_durations,
        }
    }

    /// Coherence times
    pub fn coherence(&self) -> &CoherenceTimes {
        &self.coherence
    }

    /// Operation durations
    pub fn gate_durations(&self) -> &GateDurations {
        &self.gate_durations
    }

    /// T1 values
    pub fn relax_times(&self) -> &[f64] {
        self.coherence.relax_times()
    }

    /// T2 values
    pub fn deph_times(&self) -> &[f64] {
        self.coherence.deph_times()
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.coherence.num_qubits()
    }

    /// Covered qubit labels
    pub fn qubits(&self) -> &[QubitId] {
        self.coherence.qubits()
    }

    /// Coherence of one qubit, or `QubitNotCovered`
    pub fn qubit(&self, qubit: QubitId) -> DecohereResult<QubitCoherence> {
        self.coherence.require(qubit)
    }

    /// Duration of an operation, or `UnknownOperation`
    pub fn duration(&self, name: &str) -> DecohereResult<f64> {
        self.gate_durations.duration(name)
    }
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Setup[{}, {}]", self.coherence, self.gate_durations)
    }
}

// ============================================================================
// Tests
// ============================================================================
