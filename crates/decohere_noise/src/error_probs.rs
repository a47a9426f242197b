//! Pauli-twirl error probabilities
//!
//! Gantree: L2_Noise → ErrorProbabilities
//!
//! Combined amplitude and phase damping over a time `t`, twirled into a
//! stochastic Pauli channel (arXiv:1210.5799, arXiv:1305.2021):
//!
//! ```text
//! pX = pY = (1 - exp(-t/T1)) / 4
//! pZ      = (1 - exp(-t/T2)) / 2 - (1 - exp(-t/T1)) / 4
//! ```

use decohere_core::error::{DecohereError, DecohereResult};
use decohere_core::types::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Disjoint single-qubit Pauli error probabilities
/// Gantree: PauliProbabilities // (pX, pY, pZ)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PauliProbabilities {
    /// X error probability
    pub px: f64,
    /// Y error probability
    pub py: f64,
    /// Z error probability
    pub pz: f64,
}

impl PauliProbabilities {
    /// Create from three probabilities
    pub fn new(px: f64, py: f64, pz: f64) -> Self {
        Self { px, py, pz }
    }

    /// No error
    pub const NONE: Self = Self {
        px: 0.0,
        py: 0.0,
        pz: 0.0,
    };

    /// Total error probability
    /// Gantree: total(&self) -> f64 // 총 에러
    pub fn total(&self) -> f64 {
        self.px + self.py + self.pz
    }

    /// Probabilities as `[pX, pY, pZ]`
    pub fn as_array(&self) -> [f64; 3] {
        [self.px, self.py, self.pz]
    }

    /// Check that every entry is a probability and the total is at most 1
    pub fn is_valid(&self) -> bool {
        self.as_array().iter().all(|p| (0.0..=1.0).contains(p)) && self.total() <= 1.0 + 1e-12
    }

    /// Exact conversion into independent X, Y and Z channels
    /// Gantree: to_independent(&self) -> Option<Self> // 독립 채널 변환
    ///
    /// A channel applying X, Y and Z independently with probabilities
    /// `a`, `b`, `c` has Pauli eigenvalues `λX = BC`, `λY = AC`, `λZ = AB`
    /// where `A = 1 - 2a` etc. Returns `None` when no such `a, b, c` in
    /// `[0, 1/2]` exist. A vanishing eigenvalue is only solvable when a
    /// second one vanishes too; the fully mixed channel maps to
    /// `a = b = c = 1/2`.
    pub fn to_independent(&self) -> Option<Self> {
        if self.total() == 0.0 {
            return Some(Self::NONE);
        }
        let eigenvalue = |sum: f64| -> Option<f64> {
            let eig = 1.0 - 2.0 * sum;
            if eig < -1e-12 {
                None
            } else {
                Some(eig.max(0.0))
            }
        };
        let lx = eigenvalue(self.py + self.pz)?;
        let ly = eigenvalue(self.px + self.pz)?;
        let lz = eigenvalue(self.px + self.py)?;

        let (a, b, c) = match (lx > 0.0, ly > 0.0, lz > 0.0) {
            (true, true, true) => (
                (ly * lz / lx).sqrt(),
                (lx * lz / ly).sqrt(),
                (lx * ly / lz).sqrt(),
            ),
            (false, false, true) => (lz.sqrt(), lz.sqrt(), 0.0),
            (false, true, false) => (ly.sqrt(), 0.0, ly.sqrt()),
            (true, false, false) => (0.0, lx.sqrt(), lx.sqrt()),
            (false, false, false) => (0.0, 0.0, 0.0),
            _ => return None,
        };
        let to_prob = |eig: f64| -> Option<f64> {
            let p = (1.0 - eig) / 2.0;
            if p < -1e-12 {
                None
            } else {
                Some(p.max(0.0))
            }
        };
        Some(Self {
            px: to_prob(a)?,
            py: to_prob(b)?,
            pz: to_prob(c)?,
        })
    }

    /// Independent channels, reusing the disjoint values when an exact
    /// conversion does not exist
    pub fn to_independent_approx(&self) -> Self {
        self.to_independent().unwrap_or(*self)
    }
}

impl fmt::Display for PauliProbabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(pX={:.6}, pY={:.6}, pZ={:.6})", self.px, self.py, self.pz)
    }
}

/// Pauli-twirled T1/T2 error probabilities for a period of `duration`
/// Gantree: pauli_twirl_probabilities(t,t1,t2) -> Result<PauliProbabilities> // PTA
///
/// A zero duration yields no error. Fails with `InvalidParameter` for
/// non-positive T1/T2, negative durations and non-finite inputs.
pub fn pauli_twirl_probabilities(
    duration: Duration,
    t1: Duration,
    t2: Duration,
) -> DecohereResult<PauliProbabilities> {
    if !(t1.is_finite() && t1 > 0.0) {
        return Err(DecohereError::InvalidParameter(format!(
            "relaxation time T1 must be positive, got {}",
            t1
        )));
    }
    if !(t2.is_finite() && t2 > 0.0) {
        return Err(DecohereError::InvalidParameter(format!(
            "dephasing time T2 must be positive, got {}",
            t2
        )));
    }
    if !(duration.is_finite() && duration >= 0.0) {
        return Err(DecohereError::InvalidParameter(format!(
            "duration must be non-negative, got {}",
            duration
        )));
    }
    if duration == 0.0 {
        return Ok(PauliProbabilities::NONE);
    }

    let relax = 1.0 - (-duration / t1).exp();
    let deph = 1.0 - (-duration / t2).exp();
    let px = 0.25 * relax;
    Ok(PauliProbabilities {
        px,
        py: px,
        pz: 0.5 * deph - 0.25 * relax,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_duration() {
        let probs = pauli_twirl_probabilities(0.0, 20.0, 10.0).unwrap();
        assert_eq!(probs, PauliProbabilities::NONE);
    }

    #[test]
    fn test_closed_form() {
        let probs = pauli_twirl_probabilities(50.0, 20.0, 10.0).unwrap();
        let relax = 1.0 - (-2.5f64).exp();
        let deph = 1.0 - (-5.0f64).exp();
        assert_relative_eq!(probs.px, 0.25 * relax, epsilon = 1e-12);
        assert_relative_eq!(probs.py, probs.px, epsilon = 1e-15);
        assert_relative_eq!(probs.pz, 0.5 * deph - 0.25 * relax, epsilon = 1e-12);
        assert!(probs.is_valid());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(pauli_twirl_probabilities(1.0, 0.0, 1.0).is_err());
        assert!(pauli_twirl_probabilities(1.0, 1.0, -1.0).is_err());
        assert!(pauli_twirl_probabilities(-1.0, 1.0, 1.0).is_err());
        assert!(pauli_twirl_probabilities(f64::NAN, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_pz_nonnegative_at_t2_bound() {
        let probs = pauli_twirl_probabilities(3.0, 5.0, 10.0).unwrap();
        assert!(probs.pz >= 0.0);
    }

    #[test]
    fn test_independent_matches_eigenvalues() {
        let probs = pauli_twirl_probabilities(50.0, 20.0, 10.0).unwrap();
        let ind = probs.to_independent().unwrap();
        let (a, b, c) = (1.0 - 2.0 * ind.px, 1.0 - 2.0 * ind.py, 1.0 - 2.0 * ind.pz);
        assert_relative_eq!(b * c, 1.0 - 2.0 * (probs.py + probs.pz), epsilon = 1e-12);
        assert_relative_eq!(a * c, 1.0 - 2.0 * (probs.px + probs.pz), epsilon = 1e-12);
        assert_relative_eq!(a * b, 1.0 - 2.0 * (probs.px + probs.py), epsilon = 1e-12);
    }

    #[test]
    fn test_independent_small_error() {
        let probs = PauliProbabilities::new(0.001, 0.0, 0.0);
        let ind = probs.to_independent().unwrap();
        assert_relative_eq!(ind.px, 0.001, epsilon = 1e-12);
        assert_relative_eq!(ind.py, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_independent_with_vanishing_eigenvalues() {
        let mixed = PauliProbabilities::new(0.25, 0.25, 0.25).to_independent().unwrap();
        assert_relative_eq!(mixed.px, 0.5, epsilon = 1e-12);
        assert_relative_eq!(mixed.py, 0.5, epsilon = 1e-12);
        assert_relative_eq!(mixed.pz, 0.5, epsilon = 1e-12);

        let dephased = PauliProbabilities::new(0.0, 0.0, 0.5).to_independent().unwrap();
        assert_relative_eq!(dephased.px, 0.0, epsilon = 1e-12);
        assert_relative_eq!(dephased.py, 0.0, epsilon = 1e-12);
        assert_relative_eq!(dephased.pz, 0.5, epsilon = 1e-12);

        // one vanishing eigenvalue alone has no solution
        assert!(PauliProbabilities::new(0.1, 0.25, 0.25).to_independent().is_none());
    }

    #[test]
    fn test_independent_impossible() {
        let probs = PauliProbabilities::new(0.5, 0.5, 0.0);
        assert!(probs.to_independent().is_none());
        assert_eq!(probs.to_independent_approx(), probs);
    }
}
