//! # Decohere Schedule
//!
//! Layer segmentation and T1/T2 noise injection for layered QEC circuits.
//!
//! ## Gantree Architecture
//!
//! ```text
//! decohere_schedule // L3: Schedule (완료)
//!     LayerSegmenter // 레이어 분할 + 검증 (완료)
//!         events(), layers()
//!     NoiseInjector // 노이즈 삽입 (완료)
//!         NoisePolicy: IdleAccounting | PerOperation | WholeLayer
//!         validate(), inject(), add_noise()
//!     LayerSchedule // 시간 배치 (완료)
//!         total_duration(), idle_times(), idle_error()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use decohere_schedule::prelude::*;
//! use decohere_core::Circuit;
//! use decohere_noise::{CoherenceTimes, GateDurations};
//!
//! let circuit = Circuit::parse("R 0 1 2\nTICK\nCX 0 1\nTICK\nM 0 1 2\n").unwrap();
//! let coherence = CoherenceTimes::uniform(3, 20.0, 10.0).unwrap();
//! let durations = GateDurations::new([("R", 100.0), ("CX", 10.0), ("M", 50.0)]).unwrap();
//!
//! let noisy = add_noise(&circuit, &coherence, &durations, NoisePolicy::IdleAccounting).unwrap();
//!
//! // Qubit 2 idles during the CX layer
//! assert_eq!(noisy.count_named("PAULI_CHANNEL_1"), 1);
//! assert_eq!(noisy.without_noise(), circuit);
//! ```
//!
//! ## Idle Analysis
//!
//! ```rust
//! use decohere_schedule::prelude::*;
//! use decohere_core::{Circuit, OperationClasses};
//! use decohere_noise::GateDurations;
//!
//! let circuit = Circuit::parse("R 0 1\nTICK\nM 1\n").unwrap();
//! let durations = GateDurations::new([("R", 100.0), ("M", 50.0)]).unwrap();
//! let schedule =
//!     LayerSchedule::from_circuit(&circuit, &durations, &OperationClasses::stim()).unwrap();
//!
//! assert_eq!(schedule.total_duration(), 150.0);
//! assert_eq!(schedule.idle_times(), vec![50.0, 0.0]);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Layer segmentation (Gantree: L3_Schedule → LayerSegmenter)
pub mod layer;

/// Noise injection (Gantree: L3_Schedule → NoiseInjector)
pub mod injector;

/// Layer schedule (Gantree: L3_Schedule → LayerSchedule)
pub mod schedule;

// ============================================================================
// Re-exports
// ============================================================================

pub use injector::{add_noise, NoiseInjector, NoisePolicy};
pub use layer::{Layer, LayerEvent, LayerEvents, LayerSegmenter};
pub use schedule::{LayerSchedule, ScheduledLayer};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use decohere_schedule::prelude::*;
    //! ```

    pub use crate::injector::{add_noise, NoiseInjector, NoisePolicy};
    pub use crate::layer::{Layer, LayerEvent, LayerSegmenter};
    pub use crate::schedule::{LayerSchedule, ScheduledLayer};
}

// ============================================================================
// Integration Tests
// ============================================================================
