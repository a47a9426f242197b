//! Circuit builder for Decohere
//!
//! Gantree: L1_Circuit → CircuitBuilder
//!
//! Fluent builder for stim-dialect circuits, used by the code generators
//! and throughout the tests.

use crate::circuit::Circuit;
use crate::constants::names;
use crate::instruction::Instruction;
use crate::types::QubitId;

/// Fluent circuit builder (consuming self pattern)
/// Gantree: CircuitBuilder // 빌더 패턴
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    /// Internal circuit being built
    /// Gantree: circuit: Circuit // 내부 회로
    circuit: Circuit,
}

impl CircuitBuilder {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create a new circuit builder
    /// Gantree: new() -> Self // 생성자
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue building on an existing circuit
    pub fn from_circuit(circuit: Circuit) -> Self {
        Self { circuit }
    }

    // ========================================================================
    // Generic Operations
    // ========================================================================

    /// Add any gate by name
    /// Gantree: gate(self,name,&[q]) -> Self // 임의 게이트
    pub fn gate(mut self, name: &str, qubits: &[QubitId]) -> Self {
        self.circuit.push(Instruction::gate(name, qubits));
        self
    }

    /// Add a prepared instruction
    pub fn instruction(mut self, instruction: Instruction) -> Self {
        self.circuit.push(instruction);
        self
    }

    /// Add every instruction of another circuit
    pub fn extend(mut self, other: &Circuit) -> Self {
        self.circuit.append(other);
        self
    }

    // ========================================================================
    // Gates
    // ========================================================================

    /// Add reset in Z basis
    /// Gantree: reset(self,&[q]) -> Self // R 추가
    pub fn reset(self, qubits: &[QubitId]) -> Self {
        self.gate("R", qubits)
    }

    /// Add Hadamard gates
    /// Gantree: h(self,&[q]) -> Self // H 추가
    pub fn h(self, qubits: &[QubitId]) -> Self {
        self.gate("H", qubits)
    }

    /// Add Pauli-X gates
    pub fn x(self, qubits: &[QubitId]) -> Self {
        self.gate("X", qubits)
    }

    /// Add CNOT gates on (control, target) pairs
    /// Gantree: cx(self,&[(c,t)]) -> Self // CX 추가
    pub fn cx(self, pairs: &[(QubitId, QubitId)]) -> Self {
        let flat: Vec<QubitId> = pairs.iter().flat_map(|&(c, t)| [c, t]).collect();
        self.gate("CX", &flat)
    }

    /// Add CZ gates on qubit pairs
    /// Gantree: cz(self,&[(a,b)]) -> Self // CZ 추가
    pub fn cz(self, pairs: &[(QubitId, QubitId)]) -> Self {
        let flat: Vec<QubitId> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        self.gate("CZ", &flat)
    }

    /// Add Z-basis measurements
    /// Gantree: measure(self,&[q]) -> Self // M 추가
    pub fn measure(self, qubits: &[QubitId]) -> Self {
        self.gate("M", qubits)
    }

    /// Add Z-basis measure-and-reset
    pub fn measure_reset(self, qubits: &[QubitId]) -> Self {
        self.gate("MR", qubits)
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    /// Add a time boundary
    /// Gantree: tick(self) -> Self // TICK 추가
    pub fn tick(mut self) -> Self {
        self.circuit.push(Instruction::tick());
        self
    }

    /// Add a detector over measurement lookbacks
    /// Gantree: detector(self,coords,&[rec]) -> Self // DETECTOR 추가
    pub fn detector(mut self, coords: &[f64], lookbacks: &[i64]) -> Self {
        self.circuit.push(Instruction::annotation(
            names::DETECTOR,
            lookbacks,
            coords.to_vec(),
        ));
        self
    }

    /// Include measurements in a logical observable
    pub fn observable_include(mut self, index: usize, lookbacks: &[i64]) -> Self {
        self.circuit.push(Instruction::annotation(
            names::OBSERVABLE_INCLUDE,
            lookbacks,
            vec![index as f64],
        ));
        self
    }

    /// Shift detector coordinates
    pub fn shift_coords(mut self, offsets: &[f64]) -> Self {
        self.circuit.push(Instruction::annotation(
            names::SHIFT_COORDS,
            &[],
            offsets.to_vec(),
        ));
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the circuit
    /// Gantree: build(self) -> Circuit // 완성
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_text() {
        let circuit = CircuitBuilder::new()
            .reset(&[0, 1, 2])
            .tick()
            .cx(&[(0, 1)])
            .tick()
            .measure_reset(&[1])
            .detector(&[1.0, 0.0], &[-1])
            .measure(&[0, 2])
            .observable_include(0, &[-1])
            .build();

        let expected = "\
R 0 1 2
TICK
CX 0 1
TICK
MR 1
DETECTOR(1, 0) rec[-1]
M 0 2
OBSERVABLE_INCLUDE(0) rec[-1]
";
        assert_eq!(circuit.to_string(), expected);
    }

    #[test]
    fn test_builder_counts() {
        let circuit = CircuitBuilder::new()
            .h(&[0])
            .tick()
            .cz(&[(0, 1), (2, 3)])
            .shift_coords(&[0.0, 1.0])
            .build();
        assert_eq!(circuit.len(), 4);
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.instructions()[2].qubits(), vec![0, 1, 2, 3]);
    }
}
