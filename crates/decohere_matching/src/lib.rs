//! # Decohere Matching
//!
//! Detector error model analysis and minimum-weight perfect matching
//! decoding of noisy QEC circuits.
//!
//! ## Gantree Architecture
//!
//! ```text
//! decohere_matching // L4: Matching (완료)
//!     SensitivityFrames // 역방향 감도 프레임 (완료)
//!     DetectorErrorModel // DEM 구조 + 출력 (완료)
//!     ErrorAnalyzer // 회로 → DEM (완료)
//!         gauge detectors, decomposition
//!     MatchingGraph // DEM → 그래프 (완료)
//!     MatchingDecoder // fusion-blossom MWPM (완료)
//!         build_decoder(), decode()
//!     DemSampler // 시드 샘플링 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use decohere_matching::prelude::*;
//! use decohere_core::Circuit;
//!
//! let circuit = Circuit::parse(
//!     "R 0 1 2\nX_ERROR(0.1) 0 2\nCX 0 1 2 1\nM 1\nDETECTOR rec[-1]\nM 0 2\n\
//!      DETECTOR rec[-1] rec[-2] rec[-3]\nOBSERVABLE_INCLUDE(0) rec[-1]\n",
//! )
//! .unwrap();
//!
//! let decoder = build_decoder(&circuit, DecoderOptions::default()).unwrap();
//! assert_eq!(decoder.num_detectors(), circuit.num_detectors());
//!
//! let prediction = decoder.decode(&[true, false]).unwrap();
//! assert_eq!(prediction.len(), 1);
//! ```
//!
//! ## Error Model Text
//!
//! ```rust
//! use decohere_matching::prelude::*;
//! use decohere_core::Circuit;
//!
//! let circuit = Circuit::parse("X_ERROR(0.25) 0\nM 0\nDETECTOR(0, 1) rec[-1]\n").unwrap();
//! let dem = ErrorAnalyzer::default().analyze(&circuit).unwrap();
//! assert_eq!(dem.to_string(), "error(0.25) D0\ndetector(0, 1) D0\n");
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Sensitivity frames (Gantree: L4_Matching → SensitivityFrames)
pub mod frame;

/// Detector error model (Gantree: L4_Matching → DetectorErrorModel)
pub mod dem;

/// Error analysis (Gantree: L4_Matching → ErrorAnalyzer)
pub mod analyzer;

/// Matching graph (Gantree: L4_Matching → MatchingGraph)
pub mod graph;

/// MWPM decoder (Gantree: L4_Matching → MatchingDecoder)
pub mod decoder;

/// Sampling (Gantree: L4_Matching → DemSampler)
pub mod sampler;

// ============================================================================
// Re-exports
// ============================================================================

pub use analyzer::ErrorAnalyzer;
pub use decoder::{build_decoder, DecoderOptions, MatchingDecoder};
pub use dem::{DemTargets, DetectorErrorModel, ErrorMechanism};
pub use frame::{SensitivityFrames, TargetSet};
pub use graph::{MatchingEdge, MatchingGraph};
pub use sampler::{DemSampler, Shot};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use decohere_matching::prelude::*;
    //! ```

    pub use crate::analyzer::ErrorAnalyzer;
    pub use crate::decoder::{build_decoder, DecoderOptions, MatchingDecoder};
    pub use crate::dem::{DemTargets, DetectorErrorModel, ErrorMechanism};
    pub use crate::graph::{MatchingEdge, MatchingGraph};
    pub use crate::sampler::{DemSampler, Shot};
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use decohere_core::prelude::*;
    use decohere_noise::prelude::*;

    /// Distance-3 repetition code memory, two rounds, with a T1/T2 channel
    /// on every data qubit before each round
    fn noisy_rep3(channel: &PauliProbabilities) -> Circuit {
        let mut circuit = Circuit::new();
        circuit.push(Instruction::gate("R", &[0, 1, 2, 3, 4]));
        circuit.push(Instruction::tick());
        for round in 0..2 {
            for q in [0, 2, 4] {
                circuit.push(Instruction::pauli_channel_1(q, channel.px, channel.py, channel.pz));
            }
            circuit.push(Instruction::gate("CX", &[0, 1, 2, 3]));
            circuit.push(Instruction::tick());
            circuit.push(Instruction::gate("CX", &[2, 1, 4, 3]));
            circuit.push(Instruction::tick());
            circuit.push(Instruction::gate("MR", &[1, 3]));
            if round == 0 {
                circuit.push(Instruction::annotation(names::DETECTOR, &[-2], vec![]));
                circuit.push(Instruction::annotation(names::DETECTOR, &[-1], vec![]));
            } else {
                circuit.push(Instruction::annotation(names::DETECTOR, &[-2, -4], vec![]));
                circuit.push(Instruction::annotation(names::DETECTOR, &[-1, -3], vec![]));
            }
            circuit.push(Instruction::tick());
        }
        circuit.push(Instruction::gate("M", &[0, 2, 4]));
        circuit.push(Instruction::annotation(names::DETECTOR, &[-2, -3, -5], vec![]));
        circuit.push(Instruction::annotation(names::DETECTOR, &[-1, -2, -4], vec![]));
        circuit.push(Instruction::annotation(names::OBSERVABLE_INCLUDE, &[-1], vec![0.0]));
        circuit
    }

    #[test]
    fn test_t1t2_channels_are_graphlike() {
        let channel = pauli_twirl_probabilities(10.0, 20.0, 10.0).unwrap();
        let circuit = noisy_rep3(&channel);
        let dem = ErrorAnalyzer::default().analyze(&circuit).unwrap();

        assert_eq!(dem.num_detectors, 6);
        assert_eq!(dem.num_observables, 1);
        assert!(dem.is_graphlike());
        assert!(dem.mechanisms.iter().all(|m| m.probability > 0.0 && m.probability < 0.5));
    }

    #[test]
    fn test_decoder_matches_circuit() {
        let channel = pauli_twirl_probabilities(10.0, 20.0, 10.0).unwrap();
        let circuit = noisy_rep3(&channel);
        let decoder = build_decoder(&circuit, DecoderOptions::default()).unwrap();
        assert_eq!(decoder.num_detectors(), circuit.num_detectors());
        assert_eq!(decoder.num_observables(), 1);
    }

    #[test]
    fn test_decoding_beats_no_correction() {
        let channel = pauli_twirl_probabilities(1.0, 20.0, 10.0).unwrap();
        let circuit = noisy_rep3(&channel);
        let dem = ErrorAnalyzer::default().analyze(&circuit).unwrap();
        let decoder = MatchingDecoder::from_dem(&dem).unwrap();

        let shots = DemSampler::new(&dem, 2024).sample_batch(2000);
        let mut raw_failures = 0;
        let mut decoded_failures = 0;
        for shot in &shots {
            let prediction = decoder.decode(&shot.detectors).unwrap();
            raw_failures += shot.observables[0] as usize;
            decoded_failures += (prediction[0] != shot.observables[0]) as usize;
        }
        assert!(raw_failures > 0);
        assert!(decoded_failures < raw_failures);
    }
}
