//! Detector error model
//!
//! Gantree: L4_Matching → DetectorErrorModel
//!
//! Independent error mechanisms, each flipping a set of detectors and
//! logical observables. A mechanism may be split into components separated
//! by `^`; every component is then used as its own matching edge.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// DemTargets
// ============================================================================

/// Detectors and observables flipped together
/// Gantree: DemTargets // 탐지기 + 관측량
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct DemTargets {
    /// Flipped detectors, ascending
    pub detectors: Vec<usize>,
    /// Flipped observables, ascending
    pub observables: Vec<usize>,
}

impl DemTargets {
    /// Create from detector and observable lists (sorted on the way in)
    pub fn new(mut detectors: Vec<usize>, mut observables: Vec<usize>) -> Self {
        detectors.sort_unstable();
        observables.sort_unstable();
        Self {
            detectors,
            observables,
        }
    }

    /// Check for no targets at all
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty() && self.observables.is_empty()
    }

    /// At most two detectors: usable as a matching edge
    pub fn is_graphlike(&self) -> bool {
        self.detectors.len() <= 2
    }

    /// Symmetric difference of two target sets
    /// Gantree: xor(&self,&other) -> DemTargets // 대칭차
    pub fn xor(&self, other: &DemTargets) -> DemTargets {
        DemTargets {
            detectors: sorted_xor(&self.detectors, &other.detectors),
            observables: sorted_xor(&self.observables, &other.observables),
        }
    }
}

fn sorted_xor(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

impl fmt::Display for DemTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for d in &self.detectors {
            write!(f, "{}D{}", if first { "" } else { " " }, d)?;
            first = false;
        }
        for o in &self.observables {
            write!(f, "{}L{}", if first { "" } else { " " }, o)?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// ErrorMechanism
// ============================================================================

/// One independent error
/// Gantree: ErrorMechanism // 에러 메커니즘
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMechanism {
    /// Probability of the error
    pub probability: f64,
    /// Components (a single one when undecomposed)
    pub components: Vec<DemTargets>,
}

impl ErrorMechanism {
    /// Mechanism with a single component
    pub fn new(probability: f64, targets: DemTargets) -> Self {
        Self {
            probability,
            components: vec![targets],
        }
    }

    /// Combined effect of all components
    /// Gantree: symptom(&self) -> DemTargets // 총 영향
    pub fn symptom(&self) -> DemTargets {
        self.components
            .iter()
            .fold(DemTargets::default(), |acc, c| acc.xor(c))
    }

    /// Check whether every component is graphlike
    pub fn is_graphlike(&self) -> bool {
        self.components.iter().all(DemTargets::is_graphlike)
    }
}

impl fmt::Display for ErrorMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error({})", self.probability)?;
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, " ^")?;
            }
            if !component.is_empty() {
                write!(f, " {}", component)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// DetectorErrorModel
// ============================================================================

/// Error mechanisms of a noisy circuit
/// Gantree: DetectorErrorModel // DEM
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectorErrorModel {
    /// Number of detectors
    pub num_detectors: usize,
    /// Number of logical observables
    pub num_observables: usize,
    /// Coordinates of each detector (empty when undeclared)
    pub detector_coords: Vec<Vec<f64>>,
    /// Error mechanisms
    pub mechanisms: Vec<ErrorMechanism>,
}

impl DetectorErrorModel {
    /// Number of mechanisms
    pub fn num_errors(&self) -> usize {
        self.mechanisms.len()
    }

    /// Check whether every mechanism is graphlike
    pub fn is_graphlike(&self) -> bool {
        self.mechanisms.iter().all(ErrorMechanism::is_graphlike)
    }

    /// Mechanisms whose combined effect is exactly `targets`
    pub fn find(&self, targets: &DemTargets) -> Option<&ErrorMechanism> {
        self.mechanisms.iter().find(|m| &m.symptom() == targets)
    }
}

impl fmt::Display for DetectorErrorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mechanism in &self.mechanisms {
            writeln!(f, "{}", mechanism)?;
        }
        for (d, coords) in self.detector_coords.iter().enumerate() {
            if coords.is_empty() {
                continue;
            }
            let args: Vec<String> = coords.iter().map(|c| c.to_string()).collect();
            writeln!(f, "detector({}) D{}", args.join(", "), d)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_xor() {
        let a = DemTargets::new(vec![3, 1], vec![0]);
        let b = DemTargets::new(vec![1, 4], vec![0]);
        assert_eq!(a.xor(&b), DemTargets::new(vec![3, 4], vec![]));
        assert!(a.is_graphlike());
        assert!(!DemTargets::new(vec![0, 1, 2], vec![]).is_graphlike());
    }

    #[test]
    fn test_mechanism_display() {
        let m = ErrorMechanism {
            probability: 0.125,
            components: vec![
                DemTargets::new(vec![0, 1], vec![]),
                DemTargets::new(vec![2], vec![0]),
            ],
        };
        assert_eq!(m.to_string(), "error(0.125) D0 D1 ^ D2 L0");
        assert_eq!(m.symptom(), DemTargets::new(vec![0, 1, 2], vec![0]));
        assert!(m.is_graphlike());
    }

    #[test]
    fn test_model_display() {
        let dem = DetectorErrorModel {
            num_detectors: 2,
            num_observables: 1,
            detector_coords: vec![vec![1.0, 0.0], vec![]],
            mechanisms: vec![ErrorMechanism::new(0.5, DemTargets::new(vec![1], vec![0]))],
        };
        assert_eq!(dem.to_string(), "error(0.5) D1 L0\ndetector(1, 0) D0\n");
        assert_eq!(dem.num_errors(), 1);
        assert!(dem.find(&DemTargets::new(vec![1], vec![0])).is_some());
    }
}
