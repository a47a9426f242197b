//! Memory experiment
//!
//! Gantree: L6_Integration → MemoryExperiment
//!
//! Samples shots from the error model of a noisy memory circuit, decodes
//! them and reports how often the decoder's prediction misses the true
//! observable flip.

use crate::config::DecohereConfig;
use crate::pipeline::{Pipeline, PipelineSummary};
use decohere_core::error::{DecohereError, DecohereResult};
use decohere_matching::DemSampler;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Result of a memory experiment with its pipeline metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Shots sampled
    pub shots: usize,

    /// Shots whose observable flipped
    pub raw_failures: usize,

    /// Shots the decoder predicted wrongly
    pub logical_failures: usize,

    /// Pipeline metrics
    pub pipeline: PipelineSummary,

    /// Wall time of sampling and decoding
    pub decode_time_ms: u64,
}

impl ExperimentResult {
    /// Fraction of shots decoded wrongly
    /// Gantree: logical_error_rate(&self) -> f64 // 논리 오류율
    pub fn logical_error_rate(&self) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.logical_failures as f64 / self.shots as f64
    }

    /// Fraction of shots with a flipped observable and no correction
    pub fn raw_error_rate(&self) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.raw_failures as f64 / self.shots as f64
    }

    /// Check if decoding beat leaving the observable uncorrected
    pub fn improved(&self) -> bool {
        self.logical_failures < self.raw_failures
    }
}

impl fmt::Display for ExperimentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} shots: logical error rate {:.4} (uncorrected {:.4})",
            self.shots,
            self.logical_error_rate(),
            self.raw_error_rate()
        )
    }
}

/// Repetition-code memory experiment
/// Gantree: MemoryExperiment // 메모리 실험
pub struct MemoryExperiment {
    /// Configuration
    config: DecohereConfig,
}

impl MemoryExperiment {
    /// Create with a validated configuration
    pub fn new(config: DecohereConfig) -> DecohereResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration
    pub fn config(&self) -> &DecohereConfig {
        &self.config
    }

    /// Build the decoder, then sample and decode `shots` shots
    /// Gantree: run(&self) -> Result<ExperimentResult> // 실험 실행
    pub fn run(&self) -> DecohereResult<ExperimentResult> {
        let mut pipeline = Pipeline::new(self.config.clone());
        let summary = pipeline.run()?;
        let state = pipeline.state();
        let (Some(dem), Some(decoder)) = (state.dem.as_ref(), state.decoder.as_ref()) else {
            return Err(DecohereError::ConfigError(
                "pipeline finished without a decoder".to_string(),
            ));
        };

        let start_time = Instant::now();
        let shots = DemSampler::new(dem, self.config.seed).sample_batch(self.config.shots);
        let syndromes: Vec<Vec<bool>> = shots.iter().map(|s| s.detectors.clone()).collect();
        let predictions = decoder.decode_batch(&syndromes)?;

        let mut raw_failures = 0;
        let mut logical_failures = 0;
        for (shot, prediction) in shots.iter().zip(&predictions) {
            if shot.observables.iter().any(|&flip| flip) {
                raw_failures += 1;
            }
            if shot.observables != *prediction {
                logical_failures += 1;
            }
        }

        let result = ExperimentResult {
            shots: shots.len(),
            raw_failures,
            logical_failures,
            pipeline: summary,
            decode_time_ms: start_time.elapsed().as_millis() as u64,
        };
        log::info!("{}", result);
        Ok(result)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rates() {
        let result = ExperimentResult {
            shots: 200,
            raw_failures: 20,
            logical_failures: 5,
            pipeline: PipelineSummary {
                num_instructions: 0,
                num_channels: 0,
                num_detectors: 0,
                num_errors: 0,
                num_edges: 0,
                circuit_duration: 0.0,
                total_time_ms: 0,
            },
            decode_time_ms: 0,
        };
        assert_relative_eq!(result.logical_error_rate(), 0.025);
        assert_relative_eq!(result.raw_error_rate(), 0.1);
        assert!(result.improved());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = DecohereConfig::default().with_shots(0);
        assert!(MemoryExperiment::new(config).is_err());
    }

    #[test]
    fn test_deterministic_per_seed() {
        let config = DecohereConfig::default()
            .with_code(3, 2)
            .with_coherence(500.0, 400.0)
            .with_shots(200);
        let a = MemoryExperiment::new(config.clone()).unwrap().run().unwrap();
        let b = MemoryExperiment::new(config).unwrap().run().unwrap();
        assert_eq!(a.logical_failures, b.logical_failures);
        assert_eq!(a.raw_failures, b.raw_failures);
    }

    #[test]
    fn test_long_coherence_is_quiet() {
        let config = DecohereConfig::long_coherence(3, 3).with_shots(2000);
        let result = MemoryExperiment::new(config).unwrap().run().unwrap();
        assert_eq!(result.shots, 2000);
        assert!(result.logical_error_rate() < 0.01);
    }
}
