//! # Decohere Core
//!
//! Circuit model, operation classes and errors shared by every Decohere crate.
//!
//! ## Gantree Architecture
//!
//! ```text
//! decohere_core // L0+L1: Foundation + Circuit (완료)
//!     L0_Foundation // 기반 타입/상수/에러 (완료)
//!         CoreTypes // 핵심 타입 (완료)
//!         Constants // 연산 이름/디코더 상수 (완료)
//!         Errors // 에러 타입 (완료)
//!     L1_Circuit // 회로 구조 (완료)
//!         Instruction // 명령 + 대상 (완료)
//!         Dialect // 연산 분류 (완료)
//!         Circuit // 회로 구조체 + 텍스트 (완료)
//!         CircuitBuilder // 빌더 패턴 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use decohere_core::prelude::*;
//!
//! let circuit = CircuitBuilder::new()
//!     .reset(&[0, 1, 2])
//!     .tick()
//!     .cx(&[(0, 1), (2, 1)])
//!     .tick()
//!     .measure_reset(&[1])
//!     .detector(&[1.0, 0.0], &[-1])
//!     .build();
//!
//! assert_eq!(circuit.num_ticks(), 2);
//! assert_eq!(circuit.num_detectors(), 1);
//! println!("{}", circuit);
//! ```
//!
//! ## Circuit Text
//!
//! ```rust
//! use decohere_core::prelude::*;
//!
//! let text = "R 0 1\nTICK\nREPEAT 3 {\n    CX 0 1\n    TICK\n}\nM 0 1\n";
//! let circuit = Circuit::parse(text).unwrap();
//!
//! assert_eq!(circuit.count_named("CX"), 3);
//! assert!(!circuit.has_noise(&OperationClasses::stim()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Instructions and targets (Gantree: L1_Circuit → Instruction)
pub mod instruction;

/// Operation classes (Gantree: L1_Circuit → Dialect)
pub mod dialect;

/// Circuit structure (Gantree: L1_Circuit → Circuit)
pub mod circuit;

/// Circuit builder (Gantree: L1_Circuit → CircuitBuilder)
pub mod builder;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::CircuitBuilder;
pub use circuit::Circuit;
pub use constants::{matching, names};
pub use dialect::{OperationClasses, OperationKind};
pub use error::{DecohereError, DecohereResult};
pub use instruction::{Instruction, Target};
pub use types::{Basis, Duration, Probability, QubitId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use decohere_core::prelude::*;
    //! ```

    pub use crate::builder::CircuitBuilder;
    pub use crate::circuit::Circuit;
    pub use crate::constants::names;
    pub use crate::dialect::{OperationClasses, OperationKind};
    pub use crate::error::{DecohereError, DecohereResult};
    pub use crate::instruction::{Instruction, Target};
    pub use crate::types::{Basis, Duration, Probability, QubitId};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
