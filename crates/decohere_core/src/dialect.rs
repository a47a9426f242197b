//! Operation classes of the circuit dialect
//!
//! Gantree: L1_Circuit → Dialect
//!
//! Noise injection needs to know which operations are time boundaries,
//! which are annotations, which are measurements and which are already
//! stochastic noise. These sets are held by an explicit [`OperationClasses`]
//! value instead of being hard-wired, so a segmenter can be configured for
//! a different dialect.

use crate::constants::names;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role of an operation during layer segmentation
/// Gantree: OperationKind // 분류 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Layer separator (`TICK`)
    TimeBoundary,
    /// Passed through without consuming qubit time
    Annotation,
    /// Pre-existing noise
    Stochastic,
    /// Measurement (active; its arguments are a flip probability)
    Measurement,
    /// Any other operation: consumes its target qubits for a duration
    Active,
}

impl OperationKind {
    /// Whether the operation occupies its target qubits
    pub fn is_active(&self) -> bool {
        matches!(self, OperationKind::Measurement | OperationKind::Active)
    }
}

/// Name sets that classify operations
/// Gantree: OperationClasses // 연산 분류 집합
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationClasses {
    /// Time-boundary operation name
    pub time_boundary: String,

    /// Annotation names
    pub annotations: BTreeSet<String>,

    /// Measurement names
    pub measurements: BTreeSet<String>,

    /// Reset names
    pub resets: BTreeSet<String>,

    /// Stochastic (noise) names
    pub stochastic: BTreeSet<String>,
}

fn to_set(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl OperationClasses {
    /// Classes of the stim dialect
    /// Gantree: stim() -> Self // stim 기본값
    pub fn stim() -> Self {
        Self {
            time_boundary: names::TICK.to_string(),
            annotations: to_set(names::ANNOTATIONS),
            measurements: to_set(names::MEASUREMENTS),
            resets: to_set(names::RESETS),
            stochastic: to_set(names::STOCHASTIC),
        }
    }

    /// Add an annotation name
    pub fn with_annotation(mut self, name: impl Into<String>) -> Self {
        self.annotations.insert(name.into());
        self
    }

    /// Add a stochastic operation name
    pub fn with_stochastic(mut self, name: impl Into<String>) -> Self {
        self.stochastic.insert(name.into());
        self
    }

    /// Classify an operation name
    /// Gantree: classify(&self,name) -> OperationKind // 분류
    pub fn classify(&self, name: &str) -> OperationKind {
        if name == self.time_boundary {
            OperationKind::TimeBoundary
        } else if self.annotations.contains(name) {
            OperationKind::Annotation
        } else if self.stochastic.contains(name) {
            OperationKind::Stochastic
        } else if self.measurements.contains(name) {
            OperationKind::Measurement
        } else {
            OperationKind::Active
        }
    }

    /// Check for a time boundary
    #[inline]
    pub fn is_time_boundary(&self, name: &str) -> bool {
        name == self.time_boundary
    }

    /// Check for stochastic noise
    #[inline]
    pub fn is_stochastic(&self, name: &str) -> bool {
        self.stochastic.contains(name)
    }

    /// Check for a measurement
    #[inline]
    pub fn is_measurement(&self, name: &str) -> bool {
        self.measurements.contains(name)
    }

    /// Check for a reset
    #[inline]
    pub fn is_reset(&self, name: &str) -> bool {
        self.resets.contains(name)
    }
}

impl Default for OperationClasses {
    fn default() -> Self {
        Self::stim()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stim_classification() {
        let classes = OperationClasses::stim();
        assert_eq!(classes.classify("TICK"), OperationKind::TimeBoundary);
        assert_eq!(classes.classify("DETECTOR"), OperationKind::Annotation);
        assert_eq!(classes.classify("X_ERROR"), OperationKind::Stochastic);
        assert_eq!(classes.classify("MR"), OperationKind::Measurement);
        assert_eq!(classes.classify("CX"), OperationKind::Active);
        assert_eq!(classes.classify("R"), OperationKind::Active);
        assert!(classes.is_reset("MR"));
    }

    #[test]
    fn test_custom_annotation() {
        let classes = OperationClasses::stim().with_annotation("BARRIER");
        assert_eq!(classes.classify("BARRIER"), OperationKind::Annotation);
        assert!(!classes.classify("BARRIER").is_active());
    }
}
