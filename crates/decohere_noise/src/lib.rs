//! # Decohere Noise
//!
//! T1/T2 coherence parameters and Pauli-twirl noise models.
//!
//! ## Gantree Architecture
//!
//! ```text
//! decohere_noise // L2: Noise Model (완료)
//!     CoherenceTimes // 큐비트별 T1/T2 (완료)
//!         new(), uniform(), from_maps(), validate()
//!     GateDurations // 연산 시간표 (완료)
//!         new(), transmon_ns(), duration()
//!     Setup // T1/T2 + 시간표 (완료)
//!     ErrorProbabilities // PTA 확률 (완료)
//!         pauli_twirl_probabilities(), to_independent()
//!     NoiseModel // trait {apply, idle} (완료)
//!         DecoherenceModel, NoiselessModel
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use decohere_noise::prelude::*;
//!
//! let probs = pauli_twirl_probabilities(50.0, 20.0, 10.0).unwrap();
//! assert!((probs.px - probs.py).abs() < 1e-15);
//! assert!(probs.pz > 0.0);
//!
//! // No time, no error
//! let none = pauli_twirl_probabilities(0.0, 20.0, 10.0).unwrap();
//! assert_eq!(none.total(), 0.0);
//! ```
//!
//! ## Noise Model
//!
//! ```rust
//! use decohere_noise::prelude::*;
//!
//! let setup = Setup::new(vec![20.0; 2], vec![10.0; 2], [("CZ", 10.0)]).unwrap();
//! let model = DecoherenceModel::new(setup);
//!
//! // CZ followed by one PAULI_CHANNEL_1 per target
//! let ops = model.cphase(&[0, 1]).unwrap();
//! assert_eq!(ops.len(), 3);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Per-qubit coherence times (Gantree: L2_Noise → CoherenceTimes)
pub mod coherence;

/// Operation durations (Gantree: L2_Noise → GateDurations)
pub mod gate_durations;

/// Device setup (Gantree: L2_Noise → Setup)
pub mod setup;

/// Pauli-twirl error probabilities (Gantree: L2_Noise → ErrorProbabilities)
pub mod error_probs;

/// Noise models (Gantree: L2_Noise → NoiseModel)
pub mod model;

// ============================================================================
// Re-exports
// ============================================================================

pub use coherence::{CoherenceTimes, QubitCoherence};
pub use error_probs::{pauli_twirl_probabilities, PauliProbabilities};
pub use gate_durations::GateDurations;
pub use model::{DecoherenceModel, NoiseModel, NoiselessModel};
pub use setup::Setup;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use decohere_noise::prelude::*;
    //! ```

    pub use crate::coherence::{CoherenceTimes, QubitCoherence};
    pub use crate::error_probs::{pauli_twirl_probabilities, PauliProbabilities};
    pub use crate::gate_durations::GateDurations;
    pub use crate::model::{DecoherenceModel, NoiseModel, NoiselessModel};
    pub use crate::setup::Setup;
}

// ============================================================================
// Integration Tests
// ============================================================================
