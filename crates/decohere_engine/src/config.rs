//! Integrated configuration for Decohere
//!
//! Gantree: L6_Integration → DecohereConfig
//!
//! One serde configuration for a repetition-code memory run: code size,
//! coherence times, operation durations, noise placement, decoder options
//! and sampling.

use decohere_core::error::{DecohereError, DecohereResult};
use decohere_matching::DecoderOptions;
use decohere_noise::{CoherenceTimes, DecoherenceModel, GateDurations, Setup};
use decohere_schedule::NoisePolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Unified Decohere configuration
/// Gantree: DecohereConfig // 통합 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecohereConfig {
    // ========================================================================
    // Code Parameters
    // ========================================================================
    /// Repetition code distance
    pub distance: usize,

    /// Syndrome extraction rounds
    pub rounds: usize,

    // ========================================================================
    // Hardware Parameters
    // ========================================================================
    /// T1 relaxation time of every qubit
    pub t1: f64,

    /// T2 dephasing time of every qubit
    pub t2: f64,

    /// Duration per operation name, in the unit of `t1`/`t2`
    pub gate_durations: BTreeMap<String, f64>,

    // ========================================================================
    // Noise and Decoding
    // ========================================================================
    /// Channel placement
    pub policy: NoisePolicy,

    /// Error model construction options
    pub decoder: DecoderOptions,

    // ========================================================================
    // Sampling
    // ========================================================================
    /// Shots of a memory experiment
    pub shots: usize,

    /// Sampling seed
    pub seed: u64,
}

impl DecohereConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Distance-5 code over 6 rounds, T1 = 20 and T2 = 10
    /// Gantree: rep_code_5x6() -> Self // 기본 실험
    pub fn rep_code_5x6() -> Self {
        Self {
            distance: 5,
            rounds: 6,
            t1: 20.0,
            t2: 10.0,
            gate_durations: [("MR", 50.0), ("M", 50.0), ("CX", 10.0), ("R", 100.0)]
                .iter()
                .map(|&(name, d)| (name.to_string(), d))
                .collect(),
            policy: NoisePolicy::IdleAccounting,
            decoder: DecoderOptions::default(),
            shots: 1000,
            seed: 42,
        }
    }

    /// Transmon timings in nanoseconds with T1 = 100 us and T2 = 60 us
    pub fn transmon(distance: usize, rounds: usize) -> Self {
        Self {
            distance,
            rounds,
            t1: 100_000.0,
            t2: 60_000.0,
            gate_durations: GateDurations::transmon_ns().into(),
            ..Self::rep_code_5x6()
        }
    }

    /// Coherence far longer than any operation
    pub fn long_coherence(distance: usize, rounds: usize) -> Self {
        Self {
            distance,
            rounds,
            t1: 1.0e6,
            t2: 1.0e6,
            ..Self::rep_code_5x6()
        }
    }

    /// Load from a JSON string; missing fields take the defaults
    /// Gantree: from_json(&str) -> Result<Self> // JSON 로드
    pub fn from_json(json: &str) -> DecohereResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    /// Gantree: from_file(path) -> Result<Self> // 파일 로드
    pub fn from_file(path: impl AsRef<Path>) -> DecohereResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loaded configuration from {}", path.as_ref().display());
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> DecohereResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set the code size
    pub fn with_code(mut self, distance: usize, rounds: usize) -> Self {
        self.distance = distance;
        self.rounds = rounds;
        self
    }

    /// Set T1 and T2
    pub fn with_coherence(mut self, t1: f64, t2: f64) -> Self {
        self.t1 = t1;
        self.t2 = t2;
        self
    }

    /// Add or replace an operation duration
    pub fn with_duration(mut self, name: impl Into<String>, duration: f64) -> Self {
        self.gate_durations.insert(name.into(), duration);
        self
    }

    /// Set the channel placement
    pub fn with_policy(mut self, policy: NoisePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the decoder options
    pub fn with_decoder(mut self, decoder: DecoderOptions) -> Self {
        self.decoder = decoder;
        self
    }

    /// Set shots
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Qubits of the code: `2 * distance - 1`
    pub fn num_qubits(&self) -> usize {
        (2 * self.distance).saturating_sub(1)
    }

    /// Uniform coherence times over the code qubits
    pub fn to_coherence(&self) -> DecohereResult<CoherenceTimes> {
        CoherenceTimes::uniform(self.num_qubits(), self.t1, self.t2)
    }

    /// Validated duration table
    pub fn to_durations(&self) -> DecohereResult<GateDurations> {
        GateDurations::try_from(self.gate_durations.clone())
    }

    /// Device setup
    /// Gantree: to_setup(&self) -> Result<Setup> // Setup 변환
    pub fn to_setup(&self) -> DecohereResult<Setup> {
        Ok(Setup::from_parts(self.to_coherence()?, self.to_durations()?))
    }

    /// Decoherence noise model
    pub fn to_model(&self) -> DecohereResult<DecoherenceModel> {
        Ok(DecoherenceModel::new(self.to_setup()?))
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    /// Gantree: validate(&self) -> Result<()> // 검증
    pub fn validate(&self) -> DecohereResult<()> {
        if self.distance < 2 {
            return Err(DecohereError::ConfigError(format!(
                "distance must be >= 2, got {}",
                self.distance
            )));
        }

        if self.rounds == 0 {
            return Err(DecohereError::ConfigError("rounds must be > 0".to_string()));
        }

        if self.shots == 0 {
            return Err(DecohereError::ConfigError("shots must be > 0".to_string()));
        }

        self.to_setup().map(|_| ())
    }
}

impl Default for DecohereConfig {
    fn default() -> Self {
        Self::rep_code_5x6()
    }
}

impl fmt::Display for DecohereConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DecohereConfig(d={}, rounds={}, T1={}, T2={}, policy={}, shots={})",
            self.distance, self.rounds, self.t1, self.t2, self.policy, self.shots
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DecohereConfig::default();
        assert_eq!(config.distance, 5);
        assert_eq!(config.num_qubits(), 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let transmon = DecohereConfig::transmon(3, 2);
        assert_eq!(transmon.num_qubits(), 5);
        assert!(transmon.validate().is_ok());
        assert_eq!(transmon.gate_durations.get("CX"), Some(&60.0));

        let long = DecohereConfig::long_coherence(3, 3);
        assert!(long.t1 > 1e5);
    }

    #[test]
    fn test_validation() {
        let config = DecohereConfig::default().with_code(1, 3);
        assert!(matches!(config.validate(), Err(DecohereError::ConfigError(_))));

        let config = DecohereConfig::default().with_shots(0);
        assert!(config.validate().is_err());

        // T2 above 2*T1
        let config = DecohereConfig::default().with_coherence(2.0, 10.0);
        assert!(matches!(
            config.validate(),
            Err(DecohereError::InvalidParameter(_))
        ));

        let config = DecohereConfig::default().with_duration("CX", -1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = DecohereConfig::default()
            .with_policy(NoisePolicy::PerOperation)
            .with_seed(7);
        let json = config.to_json().unwrap();
        assert!(json.contains("per_operation"));
        assert_eq!(DecohereConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json() {
        let config = DecohereConfig::from_json(r#"{"distance": 3, "rounds": 2}"#).unwrap();
        assert_eq!(config.distance, 3);
        assert_eq!(config.t1, 20.0);
        assert!(DecohereConfig::from_json(r#"{"distance": "three"}"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join("decohere_config_test.json");
        std::fs::write(&path, r#"{"distance": 7, "shots": 10}"#).unwrap();
        let config = DecohereConfig::from_file(&path).unwrap();
        assert_eq!(config.distance, 7);
        assert_eq!(config.shots, 10);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            DecohereConfig::from_file("/nonexistent/decohere.json"),
            Err(DecohereError::FileError(_))
        ));
    }

    #[test]
    fn test_to_setup() {
        let setup = DecohereConfig::default().to_setup().unwrap();
        assert_eq!(setup.num_qubits(), 9);
        assert_eq!(setup.duration("MR").unwrap(), 50.0);
    }
}
