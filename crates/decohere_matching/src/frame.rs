//! Sensitivity frames
//!
//! Gantree: L4_Matching → SensitivityFrames
//!
//! For every qubit an X and a Z bitset over the circuit's targets
//! (detectors first, then observables). A bit set in the Z set of qubit `q`
//! means an X error on `q` at the current point of the circuit flips that
//! target; a bit in the X set means a Z error does. Frames are walked
//! backward, so gates conjugate them in reverse order.

use decohere_core::types::{Basis, QubitId};

// ============================================================================
// TargetSet
// ============================================================================

/// Bitset over detector/observable targets
/// Gantree: TargetSet // 대상 비트셋
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TargetSet {
    words: Vec<u64>,
}

impl TargetSet {
    /// Empty set able to hold `num_targets` targets
    pub fn new(num_targets: usize) -> Self {
        Self {
            words: vec![0; num_targets.div_ceil(64)],
        }
    }

    /// Flip membership of a target
    pub fn toggle(&mut self, target: usize) {
        self.words[target / 64] ^= 1u64 << (target % 64);
    }

    /// Check membership
    pub fn contains(&self, target: usize) -> bool {
        self.words
            .get(target / 64)
            .is_some_and(|w| w & (1u64 << (target % 64)) != 0)
    }

    /// Symmetric difference in place
    pub fn xor_with(&mut self, other: &TargetSet) {
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w ^= o;
        }
    }

    /// Symmetric difference
    pub fn xor(&self, other: &TargetSet) -> TargetSet {
        let mut out = self.clone();
        out.xor_with(other);
        out
    }

    /// Remove every target
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Check for no members
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..64usize).filter(move |b| word & (1u64 << b) != 0).map(move |b| i * 64 + b)
        })
    }

    /// Largest member
    pub fn highest(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * 64 + 63 - w.leading_zeros() as usize)
    }
}

// ============================================================================
// SensitivityFrames
// ============================================================================

/// Per-qubit X/Z target sets
/// Gantree: SensitivityFrames // 감도 프레임
#[derive(Debug, Clone)]
pub struct SensitivityFrames {
    xs: Vec<TargetSet>,
    zs: Vec<TargetSet>,
}

impl SensitivityFrames {
    /// Empty frames for `num_qubits` qubits
    pub fn new(num_qubits: usize, num_targets: usize) -> Self {
        Self {
            xs: vec![TargetSet::new(num_targets); num_qubits],
            zs: vec![TargetSet::new(num_targets); num_qubits],
        }
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.xs.len()
    }

    /// Targets flipped by a Z error on the qubit
    pub fn x(&self, q: QubitId) -> &TargetSet {
        &self.xs[q]
    }

    /// Targets flipped by an X error on the qubit
    pub fn z(&self, q: QubitId) -> &TargetSet {
        &self.zs[q]
    }

    /// Targets flipped by a Pauli error on the qubit
    /// Gantree: flipped_by(q,basis) -> TargetSet // 에러 영향
    pub fn flipped_by(&self, q: QubitId, error: Basis) -> TargetSet {
        match error {
            Basis::X => self.zs[q].clone(),
            Basis::Z => self.xs[q].clone(),
            Basis::Y => self.xs[q].xor(&self.zs[q]),
        }
    }

    /// Targets whose sensitivity anticommutes with a measurement or reset
    /// in `basis`
    pub fn anticommuting(&self, q: QubitId, basis: Basis) -> TargetSet {
        match basis {
            Basis::Z => self.xs[q].clone(),
            Basis::X => self.zs[q].clone(),
            Basis::Y => self.xs[q].xor(&self.zs[q]),
        }
    }

    /// Add a measured observable in `basis` to the given targets
    pub fn include_measurement(&mut self, q: QubitId, basis: Basis, targets: &TargetSet) {
        let (x, z) = basis.xz_bits();
        if x {
            self.xs[q].xor_with(targets);
        }
        if z {
            self.zs[q].xor_with(targets);
        }
    }

    /// Forget everything before a reset
    pub fn reset(&mut self, q: QubitId) {
        self.xs[q].clear();
        self.zs[q].clear();
    }

    /// Remove the largest member of `gauge` from every frame by folding the
    /// gauge set into the frames holding it
    pub fn remove_gauge(&mut self, gauge: &TargetSet) {
        let Some(max) = gauge.highest() else {
            return;
        };
        for set in self.xs.iter_mut().chain(self.zs.iter_mut()) {
            if set.contains(max) {
                set.xor_with(gauge);
            }
        }
    }

    // ========================================================================
    // Clifford Conjugation
    // ========================================================================

    /// H and SQRT_Y: exchange X and Z
    pub fn apply_h(&mut self, q: QubitId) {
        std::mem::swap(&mut self.xs[q], &mut self.zs[q]);
    }

    /// S and S_DAG: X becomes Y
    pub fn apply_s(&mut self, q: QubitId) {
        let x = self.xs[q].clone();
        self.zs[q].xor_with(&x);
    }

    /// SQRT_X and SQRT_X_DAG: Z becomes Y
    pub fn apply_sqrt_x(&mut self, q: QubitId) {
        let z = self.zs[q].clone();
        self.xs[q].xor_with(&z);
    }

    /// CX with control `c` and target `t`
    pub fn apply_cx(&mut self, c: QubitId, t: QubitId) {
        let xc = self.xs[c].clone();
        let zt = self.zs[t].clone();
        self.xs[t].xor_with(&xc);
        self.zs[c].xor_with(&zt);
    }

    /// CZ between `a` and `b`
    pub fn apply_cz(&mut self, a: QubitId, b: QubitId) {
        let xa = self.xs[a].clone();
        let xb = self.xs[b].clone();
        self.zs[a].xor_with(&xb);
        self.zs[b].xor_with(&xa);
    }

    /// CY with control `c` and target `t`
    pub fn apply_cy(&mut self, c: QubitId, t: QubitId) {
        let xc = self.xs[c].clone();
        let yt = self.xs[t].xor(&self.zs[t]);
        self.xs[t].xor_with(&xc);
        self.zs[t].xor_with(&xc);
        self.zs[c].xor_with(&yt);
    }

    /// SWAP
    pub fn apply_swap(&mut self, a: QubitId, b: QubitId) {
        self.xs.swap(a, b);
        self.zs.swap(a, b);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn set(n: usize, members: &[usize]) -> TargetSet {
        let mut s = TargetSet::new(n);
        members.iter().for_each(|&m| s.toggle(m));
        s
    }

    #[test]
    fn test_target_set_ops() {
        let mut a = set(130, &[0, 65, 129]);
        assert!(a.contains(65));
        assert!(!a.contains(64));
        assert_eq!(a.highest(), Some(129));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![0, 65, 129]);

        a.xor_with(&set(130, &[65, 3]));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![0, 3, 129]);
        a.clear();
        assert!(a.is_empty());
        assert_eq!(a.highest(), None);
    }

    #[test]
    fn test_cx_moves_z_sensitivity_to_control() {
        // Z on the target after CX equals Z on both before it
        let mut frames = SensitivityFrames::new(2, 1);
        frames.include_measurement(1, Basis::Z, &set(1, &[0]));
        frames.apply_cx(0, 1);
        assert!(frames.z(0).contains(0));
        assert!(frames.z(1).contains(0));
        assert!(frames.x(0).is_empty());
    }

    #[test]
    fn test_h_and_s() {
        let mut frames = SensitivityFrames::new(1, 1);
        frames.include_measurement(0, Basis::X, &set(1, &[0]));
        frames.apply_h(0);
        assert!(frames.z(0).contains(0));
        assert!(frames.x(0).is_empty());

        frames.apply_sqrt_x(0);
        assert!(frames.x(0).contains(0));
        assert!(frames.flipped_by(0, Basis::Y).is_empty());
    }

    #[test]
    fn test_cy_matches_definition() {
        // X on the target after CY is Z_c X_t before it
        let mut frames = SensitivityFrames::new(2, 1);
        frames.include_measurement(1, Basis::X, &set(1, &[0]));
        frames.apply_cy(0, 1);
        assert!(frames.z(0).contains(0));
        assert!(frames.x(1).contains(0));
        assert!(frames.z(1).is_empty());
    }

    #[test]
    fn test_remove_gauge() {
        let mut frames = SensitivityFrames::new(2, 3);
        frames.include_measurement(0, Basis::Z, &set(3, &[0, 2]));
        frames.include_measurement(1, Basis::Z, &set(3, &[2]));
        frames.remove_gauge(&set(3, &[1, 2]));
        assert_eq!(frames.z(0).iter().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(frames.z(1).iter().collect::<Vec<_>>(), vec![1]);
    }
}
