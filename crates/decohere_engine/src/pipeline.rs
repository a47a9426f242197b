//! Pipeline for staged Decohere execution
//!
//! Gantree: L6_Integration → Pipeline
//!
//! Ideal circuit → noisy circuit → detector error model → decoder, with
//! every intermediate result kept. [`get_mwpm`] is the one-call form for
//! an arbitrary circuit.

use crate::config::DecohereConfig;
use decohere_circuits::repetition_memory;
use decohere_core::circuit::Circuit;
use decohere_core::dialect::OperationClasses;
use decohere_core::error::{DecohereError, DecohereResult};
use decohere_core::types::QubitId;
use decohere_matching::{build_decoder, DecoderOptions, DetectorErrorModel, ErrorAnalyzer, MatchingDecoder};
use decohere_noise::{CoherenceTimes, GateDurations};
use decohere_schedule::{add_noise, LayerSchedule, NoisePolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Initial state
    Initial,
    /// Ideal circuit built
    CircuitBuilt,
    /// Noise injected
    NoiseAdded,
    /// Detector error model extracted
    Analyzed,
    /// Decoder built
    DecoderBuilt,
}

/// Pipeline state holding intermediate results
#[derive(Debug, Clone)]
pub struct PipelineState {
    /// Current stage
    pub stage: PipelineStage,

    /// Configuration
    pub config: DecohereConfig,

    /// Ideal circuit
    pub circuit: Option<Circuit>,

    /// Layer schedule of the ideal circuit
    pub schedule: Option<LayerSchedule>,

    /// Noisy circuit
    pub noisy: Option<Circuit>,

    /// Detector error model of the noisy circuit
    pub dem: Option<DetectorErrorModel>,

    /// Matching decoder
    pub decoder: Option<MatchingDecoder>,
}

impl PipelineState {
    /// Create new pipeline state
    pub fn new(config: DecohereConfig) -> Self {
        Self {
            stage: PipelineStage::Initial,
            config,
            circuit: None,
            schedule: None,
            noisy: None,
            dem: None,
            decoder: None,
        }
    }

    /// Check if the ideal circuit is built
    pub fn has_circuit(&self) -> bool {
        self.circuit.is_some()
    }

    /// Check if noise was injected
    pub fn is_noisy(&self) -> bool {
        self.noisy.is_some()
    }

    /// Check if the decoder is built
    pub fn has_decoder(&self) -> bool {
        self.decoder.is_some()
    }
}

/// Summary of a full pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Instructions of the ideal circuit
    pub num_instructions: usize,

    /// Noise channels injected
    pub num_channels: usize,

    /// Detectors
    pub num_detectors: usize,

    /// Error mechanisms of the model
    pub num_errors: usize,

    /// Edges of the matching graph
    pub num_edges: usize,

    /// Duration of the circuit
    pub circuit_duration: f64,

    /// Wall time of the run
    pub total_time_ms: u64,
}

/// Decohere execution pipeline
/// Gantree: Pipeline // 단계별 실행
pub struct Pipeline {
    /// Current state
    state: PipelineState,
}

impl Pipeline {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create new pipeline with configuration
    pub fn new(config: DecohereConfig) -> Self {
        Self {
            state: PipelineState::new(config),
        }
    }

    // ========================================================================
    // Stage Accessors
    // ========================================================================

    /// Get current stage
    pub fn stage(&self) -> PipelineStage {
        self.state.stage
    }

    /// Get current state
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Get configuration
    pub fn config(&self) -> &DecohereConfig {
        &self.state.config
    }

    // ========================================================================
    // Pipeline Stages
    // ========================================================================

    /// Stage 1: ideal repetition-code memory circuit
    pub fn build_circuit(&mut self) -> DecohereResult<&Circuit> {
        let config = &self.state.config;
        let circuit = repetition_memory(config.distance, config.rounds)?;
        log::info!(
            "built distance-{} memory circuit over {} rounds",
            config.distance,
            config.rounds
        );
        self.state.stage = PipelineStage::CircuitBuilt;
        Ok(self.state.circuit.insert(circuit))
    }

    /// Layer schedule of the ideal circuit
    pub fn schedule(&mut self) -> DecohereResult<&LayerSchedule> {
        if self.state.circuit.is_none() {
            self.build_circuit()?;
        }
        let circuit = self.state.circuit.as_ref().ok_or_else(|| missing("circuit"))?;
        let schedule = LayerSchedule::from_circuit(
            circuit,
            &self.state.config.to_durations()?,
            &OperationClasses::stim(),
        )?;
        Ok(self.state.schedule.insert(schedule))
    }

    /// Stage 2: inject T1/T2 noise
    pub fn add_noise(&mut self) -> DecohereResult<&Circuit> {
        if self.state.circuit.is_none() {
            self.build_circuit()?;
        }
        let circuit = self.state.circuit.as_ref().ok_or_else(|| missing("circuit"))?;
        let config = &self.state.config;
        let noisy = add_noise(
            circuit,
            &config.to_coherence()?,
            &config.to_durations()?,
            config.policy,
        )
        .map_err(|err| rejected("noise injection", err))?;
        self.state.stage = PipelineStage::NoiseAdded;
        Ok(self.state.noisy.insert(noisy))
    }

    /// Stage 3: detector error model of the noisy circuit
    pub fn analyze(&mut self) -> DecohereResult<&DetectorErrorModel> {
        if self.state.noisy.is_none() {
            self.add_noise()?;
        }
        let noisy = self.state.noisy.as_ref().ok_or_else(|| missing("noisy circuit"))?;
        let dem = ErrorAnalyzer::new(self.state.config.decoder)
            .analyze(noisy)
            .map_err(|err| match err {
                DecohereError::DecoderConstructionFailed(_) => err,
                other => DecohereError::DecoderConstructionFailed(other.to_string()),
            })?;
        self.state.stage = PipelineStage::Analyzed;
        Ok(self.state.dem.insert(dem))
    }

    /// Stage 4: matching decoder
    pub fn build_decoder(&mut self) -> DecohereResult<&MatchingDecoder> {
        if self.state.dem.is_none() {
            self.analyze()?;
        }
        let dem = self.state.dem.as_ref().ok_or_else(|| missing("error model"))?;
        let decoder = MatchingDecoder::from_dem(dem)?;
        log::info!("built {}", decoder);
        self.state.stage = PipelineStage::DecoderBuilt;
        Ok(self.state.decoder.insert(decoder))
    }

    /// Run full pipeline
    ///
    /// Executes all stages in sequence.
    pub fn run(&mut self) -> DecohereResult<PipelineSummary> {
        let start_time = Instant::now();

        let num_instructions = self.build_circuit()?.len();
        let circuit_duration = self.schedule()?.total_duration();
        let num_channels = self
            .add_noise()?
            .count_named(decohere_core::names::PAULI_CHANNEL_1);
        let num_errors = self.analyze()?.num_errors();
        let decoder = self.build_decoder()?;

        Ok(PipelineSummary {
            num_instructions,
            num_channels,
            num_detectors: decoder.num_detectors(),
            num_errors,
            num_edges: decoder.num_edges(),
            circuit_duration,
            total_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    // ========================================================================
    // Reset
    // ========================================================================

    /// Reset pipeline to initial state
    pub fn reset(&mut self) {
        let config = self.state.config.clone();
        self.state = PipelineState::new(config);
    }

    /// Reset and reconfigure
    pub fn reconfigure(&mut self, config: DecohereConfig) {
        self.state = PipelineState::new(config);
    }
}

fn missing(what: &str) -> DecohereError {
    DecohereError::ConfigError(format!("pipeline has no {}", what))
}

fn rejected(stage: &str, err: DecohereError) -> DecohereError {
    let kind = if err.is_layer_error() {
        "layer"
    } else if err.is_validation_error() {
        "input"
    } else if err.is_circuit_error() {
        "circuit"
    } else {
        "internal"
    };
    log::warn!("{} failed with a {} error: {}", stage, kind, err);
    err
}

// ============================================================================
// One-call Decoder
// ============================================================================

/// Noise a circuit with per-qubit T1/T2 and build its matching decoder
/// Gantree: get_mwpm(&Circuit,&t1,&t2,&op_duration,approx) -> Result<MatchingDecoder> // 원클릭 디코더
///
/// `t1` and `t2` are keyed by qubit label and must cover every qubit the
/// circuit acts on. Every layer decoheres every circuit qubit for its dwell
/// time (`NoisePolicy::WholeLayer`); gauge detectors are allowed and errors
/// are decomposed.
pub fn get_mwpm(
    circuit: &Circuit,
    t1: &BTreeMap<QubitId, f64>,
    t2: &BTreeMap<QubitId, f64>,
    op_duration: &BTreeMap<String, f64>,
    approximate_disjoint_errors: bool,
) -> DecohereResult<MatchingDecoder> {
    let noisy = t1t2_noise(circuit, t1, t2, op_duration)?;
    build_decoder(
        &noisy,
        DecoderOptions::default().with_approximate_disjoint_errors(approximate_disjoint_errors),
    )
}

fn t1t2_noise(
    circuit: &Circuit,
    t1: &BTreeMap<QubitId, f64>,
    t2: &BTreeMap<QubitId, f64>,
    op_duration: &BTreeMap<String, f64>,
) -> DecohereResult<Circuit> {
    let coherence = CoherenceTimes::from_maps(t1, t2)?;
    let durations = GateDurations::try_from(op_duration.clone())?;
    add_noise(circuit, &coherence, &durations, NoisePolicy::WholeLayer)
}

// ============================================================================
// Tests
// ============================================================================
