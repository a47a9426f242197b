//! Per-qubit coherence times
//!
//! Gantree: L2_Noise → CoherenceTimes
//!
//! Relaxation (T1) and dephasing (T2) times for the qubits of a device,
//! keyed by qubit label. The dense constructors label qubits `0..n`; maps
//! may leave gaps, and coverage of the qubits a circuit actually uses is
//! checked later through `require`. Validation happens once, in the
//! constructor: equal lengths, unique labels, strictly positive finite
//! values and `T2 <= 2 * T1`.

use decohere_core::error::{DecohereError, DecohereResult};
use decohere_core::types::QubitId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Coherence times of one qubit
/// Gantree: QubitCoherence // 큐비트별 T1/T2
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QubitCoherence {
    /// Qubit index
    pub qubit: QubitId,
    /// Relaxation time T1
    pub t1: f64,
    /// Dephasing time T2
    pub t2: f64,
}

impl fmt::Display for QubitCoherence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}(T1={}, T2={})", self.qubit, self.t1, self.t2)
    }
}

/// Validated T1/T2 table
/// Gantree: CoherenceTimes // T1/T2 목록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoherenceTimes")]
pub struct CoherenceTimes {
    /// Qubit labels, ascending
    qubits: Vec<QubitId>,

    /// Relaxation times, one per qubit
    /// Gantree: relax_times: Vec<f64> // T1
    relax_times: Vec<f64>,

    /// Dephasing times, one per qubit
    /// Gantree: deph_times: Vec<f64> // T2
    deph_times: Vec<f64>,
}

#[derive(Deserialize)]
struct RawCoherenceTimes {
    #[serde(default)]
    qubits: Option<Vec<QubitId>>,
    relax_times: Vec<f64>,
    deph_times: Vec<f64>,
}

impl TryFrom<RawCoherenceTimes> for CoherenceTimes {
    type Error = DecohereError;

    fn try_from(raw: RawCoherenceTimes) -> Result<Self, Self::Error> {
        match raw.qubits {
            Some(qubits) => Self::with_labels(qubits, raw.relax_times, raw.deph_times),
            None => Self::new(raw.relax_times, raw.deph_times),
        }
    }
}

impl CoherenceTimes {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create with validation
    /// Gantree: new(t1s,t2s) -> Result<Self> // 생성+검증
    pub fn new(relax_times: Vec<f64>, deph_times: Vec<f64>) -> DecohereResult<Self> {
        let qubits = (0..relax_times.len()).collect();
        Self::with_labels(qubits, relax_times, deph_times)
    }

    /// Create for explicit qubit labels, given in ascending order
    pub fn with_labels(
        qubits: Vec<QubitId>,
        relax_times: Vec<f64>,
        deph_times: Vec<f64>,
    ) -> DecohereResult<Self> {
        let times = Self {
            qubits,
            relax_times,
            deph_times,
        };
        times.validate()?;
        Ok(times)
    }

    /// Same T1/T2 on every qubit
    /// Gantree: uniform(n,t1,t2) -> Result<Self> // 균일
    pub fn uniform(num_qubits: usize, t1: f64, t2: f64) -> DecohereResult<Self> {
        Self::new(vec![t1; num_qubits], vec![t2; num_qubits])
    }

    /// Create from maps keyed by qubit label
    /// Gantree: from_maps(&t1,&t2) -> Result<Self> // 딕셔너리 입력
    ///
    /// Both maps must have the same keys. Gaps are allowed.
    pub fn from_maps(
        t1: &BTreeMap<QubitId, f64>,
        t2: &BTreeMap<QubitId, f64>,
    ) -> DecohereResult<Self> {
        if let Some(&qubit) = t1.keys().find(|&q| !t2.contains_key(q)) {
            return Err(DecohereError::InvalidParameter(format!(
                "qubit {} has a T1 but no T2 entry",
                qubit
            )));
        }
        if let Some(&qubit) = t2.keys().find(|&q| !t1.contains_key(q)) {
            return Err(DecohereError::InvalidParameter(format!(
                "qubit {} has a T2 but no T1 entry",
                qubit
            )));
        }
        Self::with_labels(
            t1.keys().copied().collect(),
            t1.values().copied().collect(),
            t2.values().copied().collect(),
        )
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate lengths, labels and the physical T2 bound
    /// Gantree: validate(&self) -> Result<()> // 검증
    pub fn validate(&self) -> DecohereResult<()> {
        if self.qubits.len() != self.relax_times.len() {
            return Err(DecohereError::InvalidParameter(format!(
                "{} qubit labels for {} relax_times",
                self.qubits.len(),
                self.relax_times.len()
            )));
        }
        if let Some(pair) = self.qubits.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(DecohereError::InvalidParameter(format!(
                "qubit labels must be unique and ascending, got {} before {}",
                pair[0], pair[1]
            )));
        }
        if self.relax_times.len() != self.deph_times.len() {
            return Err(DecohereError::InvalidParameter(format!(
                "relax_times and deph_times must have the same length, got {} and {}",
                self.relax_times.len(),
                self.deph_times.len()
            )));
        }

        for (&qubit, (&t1, &t2)) in self
            .qubits
            .iter()
            .zip(self.relax_times.iter().zip(&self.deph_times))
        {
            if !(t1.is_finite() && t1 > 0.0) {
                return Err(DecohereError::InvalidParameter(format!(
                    "T1 of qubit {} must be positive, got {}",
                    qubit, t1
                )));
            }
            if !(t2.is_finite() && t2 > 0.0) {
                return Err(DecohereError::InvalidParameter(format!(
                    "T2 of qubit {} must be positive, got {}",
                    qubit, t2
                )));
            }
            if t2 > 2.0 * t1 {
                return Err(DecohereError::InvalidParameter(format!(
                    "T2 must not exceed 2*T1 for qubit {}: T2={}, T1={}",
                    qubit, t2, t1
                )));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of covered qubits
    pub fn num_qubits(&self) -> usize {
        self.relax_times.len()
    }

    /// Covered qubit labels, ascending
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Check whether a qubit has T1/T2 entries
    #[inline]
    pub fn covers(&self, qubit: QubitId) -> bool {
        self.position(qubit).is_some()
    }

    fn position(&self, qubit: QubitId) -> Option<usize> {
        self.qubits.binary_search(&qubit).ok()
    }

    /// Relaxation times
    pub fn relax_times(&self) -> &[f64] {
        &self.relax_times
    }

    /// Dephasing times
    pub fn deph_times(&self) -> &[f64] {
        &self.deph_times
    }

    /// Coherence times of a qubit
    /// Gantree: get(q) -> Option<QubitCoherence> // 조회
    pub fn get(&self, qubit: QubitId) -> Option<QubitCoherence> {
        let i = self.position(qubit)?;
        Some(QubitCoherence {
            qubit,
            t1: self.relax_times[i],
            t2: self.deph_times[i],
        })
    }

    /// Coherence times of a qubit, or `QubitNotCovered`
    pub fn require(&self, qubit: QubitId) -> DecohereResult<QubitCoherence> {
        self.get(qubit).ok_or(DecohereError::QubitNotCovered {
            qubit,
            num_covered: self.num_qubits(),
        })
    }

    /// Iterate over all qubits
    pub fn iter(&self) -> impl Iterator<Item = QubitCoherence> + '_ {
        self.qubits
            .iter()
            .zip(self.relax_times.iter().zip(&self.deph_times))
            .map(|(&qubit, (&t1, &t2))| QubitCoherence { qubit, t1, t2 })
    }

    /// Average T1 over all qubits
    pub fn avg_t1(&self) -> f64 {
        mean(&self.relax_times)
    }

    /// Average T2 over all qubits
    pub fn avg_t2(&self) -> f64 {
        mean(&self.deph_times)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

impl fmt::Display for CoherenceTimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CoherenceTimes({} qubits, avg T1={:.3}, avg T2={:.3})",
            self.num_qubits(),
            self.avg_t1(),
            self.avg_t2()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_times() {
        let times = CoherenceTimes::new(vec![20.0, 30.0], vec![10.0, 60.0]).unwrap();
        assert_eq!(times.num_qubits(), 2);
        assert_eq!(times.qubits(), &[0, 1]);
        let q1 = times.get(1).unwrap();
        assert!((q1.t1 - 30.0).abs() < 1e-10);
        assert!((q1.t2 - 60.0).abs() < 1e-10);
        assert!(times.get(2).is_none());
    }

    #[test]
    fn test_t2_bound() {
        let err = CoherenceTimes::new(vec![2.0], vec![10.0]).unwrap_err();
        assert!(matches!(err, DecohereError::InvalidParameter(_)));
        assert!(CoherenceTimes::new(vec![5.0], vec![10.0]).is_ok());
    }

    #[test]
    fn test_invalid_values() {
        assert!(CoherenceTimes::new(vec![0.0], vec![1.0]).is_err());
        assert!(CoherenceTimes::new(vec![1.0], vec![-1.0]).is_err());
        assert!(CoherenceTimes::new(vec![f64::NAN], vec![1.0]).is_err());
        assert!(CoherenceTimes::new(vec![1.0, 2.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_require_uncovered() {
        let times = CoherenceTimes::uniform(3, 20.0, 10.0).unwrap();
        let err = times.require(5).unwrap_err();
        assert_eq!(
            err,
            DecohereError::QubitNotCovered {
                qubit: 5,
                num_covered: 3
            }
        );
    }

    #[test]
    fn test_from_maps() {
        let t1: BTreeMap<_, _> = (0..4).map(|q| (q, 20.0)).collect();
        let t2: BTreeMap<_, _> = (0..4).map(|q| (q, 10.0)).collect();
        let times = CoherenceTimes::from_maps(&t1, &t2).unwrap();
        assert_eq!(times.num_qubits(), 4);

        let t2: BTreeMap<_, _> = (0..3).map(|q| (q, 10.0)).collect();
        assert!(matches!(
            CoherenceTimes::from_maps(&t1, &t2),
            Err(DecohereError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_maps_with_gaps() {
        let t1: BTreeMap<_, _> = [(0, 20.0), (2, 30.0)].into_iter().collect();
        let t2: BTreeMap<_, _> = [(0, 10.0), (2, 40.0)].into_iter().collect();
        let times = CoherenceTimes::from_maps(&t1, &t2).unwrap();

        assert_eq!(times.num_qubits(), 2);
        assert_eq!(times.qubits(), &[0, 2]);
        assert!(times.covers(2));
        assert!(!times.covers(1));
        assert_eq!(times.require(2).unwrap().t2, 40.0);
        assert_eq!(
            times.require(1).unwrap_err(),
            DecohereError::QubitNotCovered {
                qubit: 1,
                num_covered: 2
            }
        );
    }

    #[test]
    fn test_labels_must_ascend() {
        assert!(CoherenceTimes::with_labels(vec![3, 1], vec![1.0; 2], vec![1.0; 2]).is_err());
        assert!(CoherenceTimes::with_labels(vec![1, 1], vec![1.0; 2], vec![1.0; 2]).is_err());
        assert!(CoherenceTimes::with_labels(vec![1], vec![1.0; 2], vec![1.0; 2]).is_err());
    }

    #[test]
    fn test_deserialize_revalidates() {
        let ok: CoherenceTimes =
            serde_json::from_str(r#"{"relax_times":[20.0],"deph_times":[10.0]}"#).unwrap();
        assert_eq!(ok.num_qubits(), 1);

        let labelled: CoherenceTimes = serde_json::from_str(
            r#"{"qubits":[4],"relax_times":[20.0],"deph_times":[10.0]}"#,
        )
        .unwrap();
        assert!(labelled.covers(4));
        let json = serde_json::to_string(&labelled).unwrap();
        assert_eq!(serde_json::from_str::<CoherenceTimes>(&json).unwrap(), labelled);

        let bad = serde_json::from_str::<CoherenceTimes>(
            r#"{"relax_times":[2.0],"deph_times":[10.0]}"#,
        );
        assert!(bad.is_err());
    }
}
