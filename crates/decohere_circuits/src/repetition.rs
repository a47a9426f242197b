//! Model-driven repetition code
//!
//! Gantree: L5_Circuits → RepetitionCode
//!
//! Builds repetition-code memory experiments with every operation emitted
//! through a [`NoiseModel`]. Syndrome extraction uses H and CZ on the
//! ancillas; qubits left out of a layer receive the model's idle noise for
//! the layer's duration. With [`NoiselessModel`](decohere_noise::NoiselessModel)
//! the result is the ideal circuit.

use decohere_core::circuit::Circuit;
use decohere_core::constants::names;
use decohere_core::error::{DecohereError, DecohereResult};
use decohere_core::instruction::Instruction;
use decohere_core::types::QubitId;
use decohere_noise::NoiseModel;
use std::collections::BTreeSet;

use crate::memory::{ancilla_qubits, data_qubits};

/// Repetition code over a noise model
/// Gantree: RepetitionCode // 반복 코드 생성기
pub struct RepetitionCode<'m, M: NoiseModel + ?Sized> {
    model: &'m M,
    data: Vec<QubitId>,
    ancillas: Vec<QubitId>,
}

impl<'m, M: NoiseModel + ?Sized> RepetitionCode<'m, M> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a distance-`distance` code (data on even, ancillas on odd qubits)
    /// Gantree: new(&model,d) -> Result<Self> // 생성자
    pub fn new(model: &'m M, distance: usize) -> DecohereResult<Self> {
        if distance < 2 {
            return Err(DecohereError::InvalidParameter(format!(
                "repetition code distance must be at least 2, got {}",
                distance
            )));
        }
        Ok(Self {
            model,
            data: data_qubits(distance),
            ancillas: ancilla_qubits(distance),
        })
    }

    /// Data qubits
    pub fn data_qubits(&self) -> &[QubitId] {
        &self.data
    }

    /// Ancilla qubits
    pub fn ancilla_qubits(&self) -> &[QubitId] {
        &self.ancillas
    }

    /// Code distance
    pub fn distance(&self) -> usize {
        self.data.len()
    }

    fn all_qubits(&self) -> Vec<QubitId> {
        let mut all: Vec<QubitId> = self.data.iter().chain(&self.ancillas).copied().collect();
        all.sort_unstable();
        all
    }

    /// Append `ops` and the idle noise of every other qubit
    fn layer(
        &self,
        circuit: &mut Circuit,
        ops: Vec<Instruction>,
        busy: &[QubitId],
        name: &str,
    ) -> DecohereResult<()> {
        let busy: BTreeSet<QubitId> = busy.iter().copied().collect();
        let idle: Vec<QubitId> = self
            .all_qubits()
            .into_iter()
            .filter(|q| !busy.contains(q))
            .collect();
        ops.into_iter().for_each(|op| circuit.push(op));
        let duration = self.model.duration(name)?;
        self.model
            .idle(&idle, duration)?
            .into_iter()
            .for_each(|op| circuit.push(op));
        Ok(())
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Reset every qubit, then flip the data qubits marked in `data_init`
    /// Gantree: init_qubits(&self,&[bool]) -> Result<Circuit> // 초기화
    pub fn init_qubits(&self, data_init: &[bool]) -> DecohereResult<Circuit> {
        if data_init.len() != self.data.len() {
            return Err(DecohereError::InvalidParameter(format!(
                "initial state has {} bits for {} data qubits",
                data_init.len(),
                self.data.len()
            )));
        }

        let mut circuit = Circuit::new();
        let all = self.all_qubits();
        self.model
            .reset(&all)?
            .into_iter()
            .for_each(|op| circuit.push(op));
        circuit.push(Instruction::tick());

        let excited: Vec<QubitId> = self
            .data
            .iter()
            .zip(data_init)
            .filter_map(|(&q, &flip)| flip.then_some(q))
            .collect();
        if !excited.is_empty() {
            let ops = self.model.x_gate(&excited)?;
            self.layer(&mut circuit, ops, &excited, "X")?;
            circuit.push(Instruction::tick());
        }
        Ok(circuit)
    }

    /// One round of ZZ parity checks
    /// Gantree: qec_round(&self,comp_rounds) -> Result<Circuit> // 신드롬 라운드
    ///
    /// Detectors compare each ancilla with its value `comp_rounds` rounds
    /// earlier; without `comp_rounds` they check the ancilla alone.
    pub fn qec_round(&self, comp_rounds: Option<usize>) -> DecohereResult<Circuit> {
        let mut circuit = Circuit::new();
        let anc = &self.ancillas;

        let ops = self.model.hadamard(anc)?;
        self.layer(&mut circuit, ops, anc, "H")?;
        circuit.push(Instruction::tick());

        for side in [Side::Left, Side::Right] {
            let pairs: Vec<QubitId> = anc.iter().flat_map(|&a| side.pair(a)).collect();
            let ops = self.model.cphase(&pairs)?;
            self.layer(&mut circuit, ops, &pairs, "CZ")?;
            circuit.push(Instruction::tick());
        }

        let ops = self.model.hadamard(anc)?;
        self.layer(&mut circuit, ops, anc, "H")?;
        circuit.push(Instruction::tick());

        let ops = self.model.measure(anc)?;
        self.layer(&mut circuit, ops, anc, "M")?;

        let num_anc = anc.len() as i64;
        for k in 0..num_anc {
            let lookbacks: Vec<i64> = match comp_rounds {
                Some(rounds) if rounds > 0 => {
                    vec![k - num_anc, k - num_anc * (rounds as i64 + 1)]
                }
                _ => vec![k - num_anc],
            };
            circuit.push(Instruction::annotation(names::DETECTOR, &lookbacks, vec![]));
        }
        circuit.push(Instruction::tick());

        let ops = self.model.reset(anc)?;
        self.layer(&mut circuit, ops, anc, "R")?;
        circuit.push(Instruction::tick());
        Ok(circuit)
    }

    /// Measure the data qubits and close the experiment
    /// Gantree: log_meas(&self,comp_rounds) -> Result<Circuit> // 논리 측정
    ///
    /// Each ancilla's final detector is the parity of its two neighbours,
    /// compared with the ancilla's last `comp_rounds` outcomes.
    pub fn log_meas(&self, comp_rounds: Option<usize>) -> DecohereResult<Circuit> {
        let mut circuit = Circuit::new();
        let ops = self.model.measure(&self.data)?;
        self.layer(&mut circuit, ops, &self.data, "M")?;

        let num_data = self.data.len() as i64;
        let num_anc = self.ancillas.len() as i64;
        for (k, &anc) in self.ancillas.iter().enumerate() {
            let mut lookbacks = Vec::new();
            for neighbour in [anc + 1, anc - 1] {
                let index = self
                    .data
                    .iter()
                    .position(|&q| q == neighbour)
                    .ok_or_else(|| {
                        DecohereError::invalid_circuit(format!(
                            "ancilla {} has no data neighbour {}",
                            anc, neighbour
                        ))
                    })?;
                lookbacks.push(index as i64 - num_data);
            }
            for round in 1..=comp_rounds.unwrap_or(0) as i64 {
                lookbacks.push(k as i64 - num_data - round * num_anc);
            }
            circuit.push(Instruction::annotation(names::DETECTOR, &lookbacks, vec![]));
        }

        let data_records: Vec<i64> = (-num_data..0).collect();
        circuit.push(Instruction::annotation(
            names::OBSERVABLE_INCLUDE,
            &data_records,
            vec![0.0],
        ));
        circuit.push(Instruction::tick());
        Ok(circuit)
    }

    /// Full memory experiment of `rounds` rounds
    /// Gantree: memory_experiment(&self,r,&[bool]) -> Result<Circuit> // 메모리 실험
    pub fn memory_experiment(&self, rounds: usize, data_init: &[bool]) -> DecohereResult<Circuit> {
        if rounds < 1 {
            return Err(DecohereError::InvalidParameter(
                "memory experiment needs at least one round".into(),
            ));
        }
        let mut circuit = self.init_qubits(data_init)?;
        circuit.append(&self.qec_round(None)?);
        for _ in 1..rounds {
            circuit.append(&self.qec_round(Some(1))?);
        }
        circuit.append(&self.log_meas(Some(1))?);
        log::info!(
            "repetition code memory: distance {}, {} rounds, {} instructions",
            self.distance(),
            rounds,
            circuit.len()
        );
        Ok(circuit)
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn pair(self, ancilla: QubitId) -> [QubitId; 2] {
        match self {
            Side::Left => [ancilla - 1, ancilla],
            Side::Right => [ancilla, ancilla + 1],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use decohere_noise::{DecoherenceModel, NoiselessModel, Setup};

    fn setup() -> Setup {
        Setup::new(
            vec![20.0; 5],
            vec![10.0; 5],
            [("R", 200.0), ("X", 20.0), ("H", 20.0), ("CZ", 40.0), ("M", 300.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_ideal_round() {
        let code = RepetitionCode::new(&NoiselessModel, 3).unwrap();
        let round = code.qec_round(Some(1)).unwrap();
        let expected = Circuit::parse(
            "H 1 3\nTICK\nCZ 0 1 2 3\nTICK\nCZ 1 2 3 4\nTICK\nH 1 3\nTICK\nM 1 3\n\
             DETECTOR rec[-2] rec[-4]\nDETECTOR rec[-1] rec[-3]\nTICK\nR 1 3\nTICK\n",
        )
        .unwrap();
        assert_eq!(round, expected);
    }

    #[test]
    fn test_ideal_logical_measurement() {
        let code = RepetitionCode::new(&NoiselessModel, 3).unwrap();
        let meas = code.log_meas(Some(1)).unwrap();
        let expected = Circuit::parse(
            "M 0 2 4\nDETECTOR rec[-2] rec[-3] rec[-5]\nDETECTOR rec[-1] rec[-2] rec[-4]\n\
             OBSERVABLE_INCLUDE(0) rec[-3] rec[-2] rec[-1]\nTICK\n",
        )
        .unwrap();
        assert_eq!(meas, expected);
    }

    #[test]
    fn test_init_with_excited_data() {
        let code = RepetitionCode::new(&NoiselessModel, 3).unwrap();
        let init = code.init_qubits(&[false, true, false]).unwrap();
        assert_eq!(
            init,
            Circuit::parse("R 0 1 2 3 4\nTICK\nX 2\nTICK\n").unwrap()
        );
        assert!(code.init_qubits(&[true]).is_err());
    }

    #[test]
    fn test_noisy_round_channels() {
        let model = DecoherenceModel::new(setup());
        let code = RepetitionCode::new(&model, 3).unwrap();
        let round = code.qec_round(None).unwrap();
        // H: 2 gate + 3 idle, CZ: 4 gate + 1 idle (twice), H again,
        // M: 2 gate + 3 idle, R: 2 gate + 3 idle
        assert_eq!(round.count_named(names::PAULI_CHANNEL_1), 5 + 5 + 5 + 5 + 5 + 5);
        let ideal = RepetitionCode::new(&NoiselessModel, 3)
            .unwrap()
            .qec_round(None)
            .unwrap();
        assert_eq!(round.without_noise(), ideal);
    }

    #[test]
    fn test_memory_experiment_shape() {
        let code = RepetitionCode::new(&NoiselessModel, 3).unwrap();
        let circuit = code.memory_experiment(4, &[false; 3]).unwrap();
        assert_eq!(circuit.num_detectors(), 2 * 4 + 2);
        assert_eq!(circuit.num_observables(), 1);
        assert_eq!(circuit.count_named("CZ"), 2 * 4);
        assert!(code.memory_experiment(0, &[false; 3]).is_err());
    }

    #[test]
    fn test_missing_duration() {
        let setup = Setup::new(vec![20.0; 5], vec![10.0; 5], [("H", 20.0)]).unwrap();
        let model = DecoherenceModel::new(setup);
        let code = RepetitionCode::new(&model, 3).unwrap();
        assert_eq!(
            code.qec_round(None).unwrap_err(),
            DecohereError::UnknownOperation("CZ".into())
        );
    }
}
