//! Repetition-code memory circuit
//!
//! Gantree: L5_Circuits → RepetitionMemory
//!
//! The noiseless `repetition_code:memory` layout of stim: data qubits on
//! even indices, parity ancillas on odd ones. Each round is two CX layers
//! and a measure-reset of the ancillas; the experiment ends with a
//! measurement of every data qubit. The last round's `MR` and the final
//! `M` share one layer.

use decohere_core::builder::CircuitBuilder;
use decohere_core::circuit::Circuit;
use decohere_core::error::{DecohereError, DecohereResult};
use decohere_core::types::QubitId;

/// Data qubits of a distance-`distance` repetition code
pub fn data_qubits(distance: usize) -> Vec<QubitId> {
    (0..distance).map(|i| 2 * i).collect()
}

/// Ancilla qubits of a distance-`distance` repetition code
pub fn ancilla_qubits(distance: usize) -> Vec<QubitId> {
    (0..distance.saturating_sub(1)).map(|i| 2 * i + 1).collect()
}

/// Noiseless repetition-code memory experiment
/// Gantree: repetition_memory(d,r) -> Result<Circuit> // 반복 코드 메모리
///
/// Has `(distance - 1) * (rounds + 1)` detectors and observable 0 on the
/// last data qubit. Fails with `InvalidParameter` for `distance < 2` or
/// `rounds < 1`.
pub fn repetition_memory(distance: usize, rounds: usize) -> DecohereResult<Circuit> {
    if distance < 2 {
        return Err(DecohereError::InvalidParameter(format!(
            "repetition code distance must be at least 2, got {}",
            distance
        )));
    }
    if rounds < 1 {
        return Err(DecohereError::InvalidParameter(
            "memory experiment needs at least one round".into(),
        ));
    }

    let data = data_qubits(distance);
    let ancillas = ancilla_qubits(distance);
    let num_anc = ancillas.len() as i64;
    let num_data = data.len() as i64;
    let all: Vec<QubitId> = (0..2 * distance - 1).collect();
    let first_cx: Vec<(QubitId, QubitId)> = ancillas.iter().map(|&a| (a - 1, a)).collect();
    let second_cx: Vec<(QubitId, QubitId)> = ancillas.iter().map(|&a| (a + 1, a)).collect();

    let syndrome_round = |builder: CircuitBuilder| {
        builder
            .cx(&first_cx)
            .tick()
            .cx(&second_cx)
            .tick()
            .measure_reset(&ancillas)
    };

    let mut builder = syndrome_round(CircuitBuilder::new().reset(&all).tick());
    for (k, &anc) in ancillas.iter().enumerate() {
        builder = builder.detector(&[anc as f64, 0.0], &[k as i64 - num_anc]);
    }

    for _ in 1..rounds {
        builder = syndrome_round(builder.tick()).shift_coords(&[0.0, 1.0]);
        for (k, &anc) in ancillas.iter().enumerate() {
            let k = k as i64;
            builder = builder.detector(&[anc as f64, 0.0], &[k - num_anc, k - 2 * num_anc]);
        }
    }

    builder = builder.measure(&data);
    for (k, &anc) in ancillas.iter().enumerate() {
        let k = k as i64;
        builder = builder.detector(
            &[anc as f64, 1.0],
            &[k + 1 - num_data, k - num_data, k - num_data - num_anc],
        );
    }
    Ok(builder.observable_include(0, &[-1]).build())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const REP3_TWO_ROUNDS: &str = "\
R 0 1 2 3 4
TICK
CX 0 1 2 3
TICK
CX 2 1 4 3
TICK
MR 1 3
DETECTOR(1, 0) rec[-2]
DETECTOR(3, 0) rec[-1]
TICK
CX 0 1 2 3
TICK
CX 2 1 4 3
TICK
MR 1 3
SHIFT_COORDS(0, 1)
DETECTOR(1, 0) rec[-2] rec[-4]
DETECTOR(3, 0) rec[-1] rec[-3]
M 0 2 4
DETECTOR(1, 1) rec[-2] rec[-3] rec[-5]
DETECTOR(3, 1) rec[-1] rec[-2] rec[-4]
OBSERVABLE_INCLUDE(0) rec[-1]
";

    #[test]
    fn test_matches_stim_layout() {
        let circuit = repetition_memory(3, 2).unwrap();
        assert_eq!(circuit, Circuit::parse(REP3_TWO_ROUNDS).unwrap());
    }

    #[test]
    fn test_counts() {
        let circuit = repetition_memory(5, 6).unwrap();
        assert_eq!(circuit.num_qubits(), 9);
        assert_eq!(circuit.num_detectors(), 4 * 7);
        assert_eq!(circuit.num_observables(), 1);
        assert_eq!(circuit.num_measurements(), 4 * 6 + 5);
        assert_eq!(circuit.num_ticks(), 1 + 3 * 6 - 1);
    }

    #[test]
    fn test_qubit_roles() {
        assert_eq!(data_qubits(3), vec![0, 2, 4]);
        assert_eq!(ancilla_qubits(3), vec![1, 3]);
        assert!(ancilla_qubits(0).is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            repetition_memory(1, 3),
            Err(DecohereError::InvalidParameter(_))
        ));
        assert!(matches!(
            repetition_memory(3, 0),
            Err(DecohereError::InvalidParameter(_))
        ));
    }
}
