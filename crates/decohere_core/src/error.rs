//! Error types for Decohere
//!
//! Gantree: L0_Foundation → Errors
//!
//! Every failure of the noise-injection and decoding pipeline is a
//! variant of [`DecohereError`], carrying the offending qubit, operation
//! or value.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use crate::types::QubitId;
use thiserror::Error;

/// Main error type for Decohere
/// Gantree: DecohereError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecohereError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Malformed coherence parameters, durations or numeric arguments
    /// Gantree: InvalidParameter(String) // 파라미터 검증
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Probability value out of range [0, 1]
    #[error("Invalid probability {0}: must be in range [0, 1]")]
    InvalidProbability(f64),

    // ========================================================================
    // Layer Errors
    // ========================================================================
    /// Active operation without an entry in the duration table
    /// Gantree: UnknownOperation(name) // 시간 없음
    #[error("Operation '{0}' has no duration entry")]
    UnknownOperation(String),

    /// Two operations of one layer disagree on duration
    /// Gantree: InconsistentLayerDuration{{name,d,layer}} // 레이어 시간 불일치
    #[error(
        "Operation '{name}' lasts {duration} but its layer already lasts {layer_duration}"
    )]
    InconsistentLayerDuration {
        name: String,
        duration: f64,
        layer_duration: f64,
    },

    /// Two operations of one layer act on the same qubit
    /// Gantree: QubitConflict{{q,name}} // 큐비트 중복
    #[error("Qubit {qubit} is targeted twice in one layer (second use by '{name}')")]
    QubitConflict { qubit: QubitId, name: String },

    /// Active qubit without T1/T2 entry
    /// Gantree: QubitNotCovered{{q,n}} // T1/T2 누락
    #[error("Qubit {qubit} has no T1/T2 entry: only {num_covered} qubits are covered")]
    QubitNotCovered { qubit: QubitId, num_covered: usize },

    /// Input circuit already carries stochastic operations
    /// Gantree: PreexistingNoiseDetected(name) // 기존 노이즈
    #[error("The circuit already contains noise: found '{0}'")]
    PreexistingNoiseDetected(String),

    /// Input circuit has no time-boundary marker
    /// Gantree: MissingTimeBoundary // TICK 없음
    #[error("The circuit must contain at least one '{0}'")]
    MissingTimeBoundary(String),

    // ========================================================================
    // Decoder Errors
    // ========================================================================
    /// Decoding-graph construction rejected the noisy circuit
    /// Gantree: DecoderConstructionFailed(String) // 디코더 생성 실패
    #[error("Decoder construction failed: {0}")]
    DecoderConstructionFailed(String),

    /// Decoding of a syndrome failed
    #[error("Decoding failed: {0}")]
    DecodingFailed(String),

    // ========================================================================
    // Circuit Errors
    // ========================================================================
    /// Malformed circuit text or instruction
    #[error("Invalid circuit at line {line}: {message}")]
    InvalidCircuit { line: usize, message: String },

    /// Measurement record lookback points before the first measurement
    #[error("Record target rec[{lookback}] reaches before the start of {available} measurements")]
    RecordOutOfRange { lookback: i64, available: usize },

    // ========================================================================
    // Configuration / I/O Errors
    // ========================================================================
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),
}

/// Result type alias for Decohere operations
/// Gantree: DecohereResult<T> // type alias
pub type DecohereResult<T> = Result<T, DecohereError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for DecohereError {
    fn from(err: serde_json::Error) -> Self {
        DecohereError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for DecohereError {
    fn from(err: std::io::Error) -> Self {
        DecohereError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl DecohereError {
    /// Check if error comes from input validation (parameters or circuit shape)
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DecohereError::InvalidParameter(_)
                | DecohereError::InvalidProbability(_)
                | DecohereError::QubitNotCovered { .. }
                | DecohereError::PreexistingNoiseDetected(_)
                | DecohereError::MissingTimeBoundary(_)
        )
    }

    /// Check if error was raised while sealing a layer
    pub fn is_layer_error(&self) -> bool {
        matches!(
            self,
            DecohereError::UnknownOperation(_)
                | DecohereError::InconsistentLayerDuration { .. }
                | DecohereError::QubitConflict { .. }
        )
    }

    /// Check if error is a circuit format error
    pub fn is_circuit_error(&self) -> bool {
        matches!(
            self,
            DecohereError::InvalidCircuit { .. } | DecohereError::RecordOutOfRange { .. }
        )
    }

    /// Shorthand for a parse error without a line number
    pub fn invalid_circuit(message: impl Into<String>) -> Self {
        DecohereError::InvalidCircuit {
            line: 0,
            message: message.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DecohereError::InvalidProbability(1.5);
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_qubit_conflict_names_qubit() {
        let err = DecohereError::QubitConflict {
            qubit: 4,
            name: "CX".into(),
        };
        assert!(err.to_string().contains('4'));
        assert!(err.to_string().contains("CX"));
    }

    #[test]
    fn test_classification() {
        assert!(DecohereError::MissingTimeBoundary("TICK".into()).is_validation_error());
        assert!(DecohereError::UnknownOperation("H".into()).is_layer_error());
        assert!(!DecohereError::UnknownOperation("H".into()).is_validation_error());
        assert!(DecohereError::invalid_circuit("bad").is_circuit_error());
    }

    #[test]
    fn test_json_conversion() {
        let err: DecohereError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, DecohereError::JsonError(_)));
    }
}
