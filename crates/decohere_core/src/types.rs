//! Core types for Decohere
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Fundamental type aliases and validated wrapper types used throughout
//! the workspace.

use crate::error::{DecohereError, DecohereResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Operation or idle duration, in the caller's time unit
/// Gantree: Duration // pub type Duration = f64
///
/// T1, T2 and gate durations must all be expressed in the same unit.
pub type Duration = f64;

// ============================================================================
// Probability (Validated Wrapper)
// ============================================================================

/// Probability value in range [0, 1]
/// Gantree: Probability // 범위 검증 구조체
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Probability(f64);

impl Probability {
    /// Create a new Probability with validation
    /// Gantree: new(f64) -> Result<Self> // 생성+검증
    pub fn new(value: f64) -> DecohereResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(DecohereError::InvalidProbability(value));
        }
        Ok(Self(value))
    }

    /// Get the probability value
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Get the complement (1 - p)
    #[inline]
    pub fn complement(&self) -> f64 {
        1.0 - self.0
    }

    /// Probability that exactly one of two independent events fires
    /// Gantree: xor(&self,other) -> Self // 독립 합성
    ///
    /// Two independent mechanisms with the same effect combine into one
    /// with `p = p1(1-p2) + p2(1-p1)`.
    pub fn xor(&self, other: Probability) -> Self {
        Self(self.0 * other.complement() + other.0 * self.complement())
    }

    /// Zero probability
    pub const ZERO: Self = Self(0.0);

    /// Half probability (a coin flip, e.g. a gauge degree of freedom)
    pub const HALF: Self = Self(0.5);
}

impl Default for Probability {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = DecohereError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

// ============================================================================
// Basis
// ============================================================================

/// Single-qubit Pauli basis of a measurement or reset
/// Gantree: Basis // X/Y/Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// X basis
    X,
    /// Y basis
    Y,
    /// Z (computational) basis
    Z,
}

impl Basis {
    /// Parse from character
    pub fn from_char(c: char) -> DecohereResult<Self> {
        match c.to_ascii_uppercase() {
            'X' => Ok(Basis::X),
            'Y' => Ok(Basis::Y),
            'Z' => Ok(Basis::Z),
            _ => Err(DecohereError::InvalidParameter(format!(
                "invalid basis '{}': must be X, Y, or Z",
                c
            ))),
        }
    }

    /// Convert to character
    pub fn to_char(&self) -> char {
        match self {
            Basis::X => 'X',
            Basis::Y => 'Y',
            Basis::Z => 'Z',
        }
    }

    /// Symplectic (x, z) bits of the Pauli operator for this basis
    pub fn xz_bits(&self) -> (bool, bool) {
        match self {
            Basis::X => (true, false),
            Basis::Y => (true, true),
            Basis::Z => (false, true),
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
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
    fn test_probability_valid() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(0.5).is_ok());
        assert!(Probability::new(1.0).is_ok());
    }

    #[test]
    fn test_probability_invalid() {
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(1.1).is_err());
        assert!(Probability::new(f64::NAN).is_err());
    }

    #[test]
    fn test_probability_xor() {
        let p = Probability::new(0.1).unwrap();
        let q = Probability::new(0.2).unwrap();
        assert_relative_eq!(p.xor(q).value(), 0.1 * 0.8 + 0.2 * 0.9, epsilon = 1e-12);
        assert_relative_eq!(p.xor(Probability::ZERO).value(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_basis_bits() {
        assert_eq!(Basis::X.xz_bits(), (true, false));
        assert_eq!(Basis::Y.xz_bits(), (true, true));
        assert_eq!(Basis::Z.xz_bits(), (false, true));
        assert_eq!(Basis::from_char('y').unwrap(), Basis::Y);
        assert!(Basis::from_char('Q').is_err());
    }
}
