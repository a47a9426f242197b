//! # Decohere Engine
//!
//! Configuration, staged pipeline and memory experiments on top of the
//! noise-injection and decoding crates.
//!
//! ## Gantree Architecture
//!
//! ```text
//! decohere_engine // L6: Integration (완료)
//!     DecohereConfig // 통합 설정 (완료)
//!         distance, rounds, T1/T2, durations, policy, decoder
//!         from_json(), from_file(), to_setup()
//!     Pipeline // 단계별 실행 (완료)
//!         build_circuit() → add_noise() → analyze() → build_decoder()
//!         run() - 전체 파이프라인
//!     get_mwpm() // 원클릭 디코더 (완료)
//!     MemoryExperiment // 샘플링 + 디코딩 (완료)
//!         run() - 논리 오류율
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use decohere_engine::prelude::*;
//!
//! let config = DecohereConfig::default().with_code(3, 2).with_shots(100);
//! let result = MemoryExperiment::new(config).unwrap().run().unwrap();
//! assert_eq!(result.shots, 100);
//! println!("{}", result);
//! ```
//!
//! ## Using Pipeline
//!
//! ```rust
//! use decohere_engine::prelude::*;
//!
//! let mut pipeline = Pipeline::new(DecohereConfig::default());
//!
//! // Run stages individually
//! pipeline.build_circuit().unwrap();
//! pipeline.add_noise().unwrap();
//! let decoder = pipeline.build_decoder().unwrap();
//! assert_eq!(decoder.num_detectors(), 28);
//!
//! // Or run all at once
//! // let summary = pipeline.run().unwrap();
//! ```
//!
//! ## One-call Decoder
//!
//! ```rust
//! use decohere_engine::prelude::*;
//! use decohere_circuits::repetition_memory;
//! use std::collections::BTreeMap;
//!
//! let circuit = repetition_memory(3, 2).unwrap();
//! let t1: BTreeMap<usize, f64> = (0..5).map(|q| (q, 20.0)).collect();
//! let t2: BTreeMap<usize, f64> = (0..5).map(|q| (q, 10.0)).collect();
//! let durations: BTreeMap<String, f64> = [("R", 100.0), ("CX", 10.0), ("MR", 50.0), ("M", 50.0)]
//!     .iter()
//!     .map(|&(n, d)| (n.to_string(), d))
//!     .collect();
//!
//! let decoder = get_mwpm(&circuit, &t1, &t2, &durations, false).unwrap();
//! assert_eq!(decoder.num_detectors(), circuit.num_detectors());
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Configuration (Gantree: L6_Integration → DecohereConfig)
pub mod config;

/// Pipeline (Gantree: L6_Integration → Pipeline)
pub mod pipeline;

/// Memory experiment (Gantree: L6_Integration → MemoryExperiment)
pub mod experiment;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::DecohereConfig;
pub use experiment::{ExperimentResult, MemoryExperiment};
pub use pipeline::{get_mwpm, Pipeline, PipelineStage, PipelineState, PipelineSummary};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use decohere_engine::prelude::*;
    //! ```

    pub use crate::config::DecohereConfig;
    pub use crate::experiment::{ExperimentResult, MemoryExperiment};
    pub use crate::pipeline::{get_mwpm, Pipeline, PipelineStage, PipelineSummary};
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use decohere_matching::DecoderOptions;
    use decohere_schedule::NoisePolicy;

    #[test]
    fn test_pipeline_staged() {
        let mut pipeline = Pipeline::new(DecohereConfig::default().with_code(3, 3));

        assert_eq!(pipeline.stage(), PipelineStage::Initial);

        pipeline.build_circuit().unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::CircuitBuilt);

        pipeline.add_noise().unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::NoiseAdded);

        let dem = pipeline.analyze().unwrap();
        assert!(dem.is_graphlike());
        assert_eq!(pipeline.stage(), PipelineStage::Analyzed);

        pipeline.build_decoder().unwrap();
        assert_eq!(pipeline.stage(), PipelineStage::DecoderBuilt);
    }

    #[test]
    fn test_decoding_beats_no_correction() {
        let config = DecohereConfig::default()
            .with_coherence(2000.0, 1500.0)
            .with_shots(2000)
            .with_seed(2024);
        let result = MemoryExperiment::new(config).unwrap().run().unwrap();

        assert_eq!(result.pipeline.num_detectors, 28);
        assert!(result.raw_failures > 0);
        assert!(result.improved());
    }

    #[test]
    fn test_every_policy_decodes() {
        for policy in [
            NoisePolicy::PerOperation,
            NoisePolicy::IdleAccounting,
            NoisePolicy::WholeLayer,
        ] {
            let config = DecohereConfig::default().with_code(3, 2).with_policy(policy);
            let summary = Pipeline::new(config).run().unwrap();
            assert_eq!(summary.num_detectors, 6);
            assert!(summary.num_channels > 0);
        }
    }

    #[test]
    fn test_json_config_drives_pipeline() {
        let json = r#"{
            "distance": 3,
            "rounds": 2,
            "t1": 30.0,
            "t2": 20.0,
            "gate_durations": {"R": 100.0, "CX": 10.0, "MR": 50.0, "M": 50.0},
            "policy": "whole_layer",
            "decoder": {"approximate_disjoint_errors": true}
        }"#;
        let config = DecohereConfig::from_json(json).unwrap();
        assert_eq!(config.policy, NoisePolicy::WholeLayer);
        assert_eq!(
            config.decoder,
            DecoderOptions::default().with_approximate_disjoint_errors(true)
        );

        let summary = Pipeline::new(config).run().unwrap();
        assert_eq!(summary.num_detectors, 6);
    }
}
