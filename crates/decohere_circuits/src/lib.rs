//! # Decohere Circuits
//!
//! Repetition-code memory experiments, either as ideal circuits to be made
//! noisy later or emitted directly through a noise model.
//!
//! ## Gantree Architecture
//!
//! ```text
//! decohere_circuits // L5: Circuits (완료)
//!     RepetitionMemory // 이상 회로 (CX 기반) (완료)
//!         repetition_memory(), data_qubits(), ancilla_qubits()
//!     RepetitionCode // 모델 기반 생성 (H + CZ) (완료)
//!         init_qubits(), qec_round(), log_meas(), memory_experiment()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use decohere_circuits::prelude::*;
//!
//! let circuit = repetition_memory(5, 6).unwrap();
//! assert_eq!(circuit.num_qubits(), 9);
//! assert_eq!(circuit.num_detectors(), 28);
//! ```
//!
//! ## Through a Noise Model
//!
//! ```rust
//! use decohere_circuits::prelude::*;
//! use decohere_noise::NoiselessModel;
//!
//! let code = RepetitionCode::new(&NoiselessModel, 3).unwrap();
//! let circuit = code.memory_experiment(2, &[false; 3]).unwrap();
//! assert_eq!(circuit.num_detectors(), 6);
//! assert_eq!(circuit.num_observables(), 1);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Ideal memory circuit (Gantree: L5_Circuits → RepetitionMemory)
pub mod memory;

/// Model-driven generator (Gantree: L5_Circuits → RepetitionCode)
pub mod repetition;

// ============================================================================
// Re-exports
// ============================================================================

pub use memory::{ancilla_qubits, data_qubits, repetition_memory};
pub use repetition::RepetitionCode;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use decohere_circuits::prelude::*;
    //! ```

    pub use crate::memory::{ancilla_qubits, data_qubits, repetition_memory};
    pub use crate::repetition::RepetitionCode;
}

// ============================================================================
// Integration Tests
// ============================================================================
