//! Operation durations
//!
//! Gantree: L2_Noise → GateDurations
//!
//! Maps operation names (`H`, `CX`, `MR`, ...) to the time they keep their
//! target qubits busy. Every duration must be strictly positive and finite.
//! Durations share one unit with the T1/T2 times they are combined with.

use decohere_core::error::{DecohereError, DecohereResult};
use decohere_core::types::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Validated duration table
/// Gantree: GateDurations // 연산 시간표
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct GateDurations {
    /// Duration per operation name
    /// Gantree: durations: BTreeMap<String,f64> // 이름 → 시간
    durations: BTreeMap<String, f64>,
}

fn check_duration(name: &str, duration: Duration) -> DecohereResult<()> {
    if !(duration.is_finite() && duration > 0.0) {
        return Err(DecohereError::InvalidParameter(format!(
            "duration of '{}' must be positive, got {}",
            name, duration
        )));
    }
    Ok(())
}

impl GateDurations {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from (name, duration) pairs with validation
    /// Gantree: new(iter) -> Result<Self> // 생성+검증
    pub fn new<I, S>(entries: I) -> DecohereResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut durations = BTreeMap::new();
        for (name, duration) in entries {
            let name = name.into();
            check_duration(&name, duration)?;
            durations.insert(name, duration);
        }
        Ok(Self { durations })
    }

    /// Typical transmon timings in nanoseconds
    /// Gantree: transmon_ns() -> Self // 초전도 기본값
    pub fn transmon_ns() -> Self {
        let entries: [(&str, f64); 16] = [
            ("I", 20.0),
            ("X", 20.0),
            ("Y", 20.0),
            ("Z", 20.0),
            ("H", 20.0),
            ("S", 20.0),
            ("S_DAG", 20.0),
            ("SQRT_X", 20.0),
            ("CX", 60.0),
            ("CNOT", 60.0),
            ("CZ", 60.0),
            ("SWAP", 180.0),
            ("M", 500.0),
            ("MR", 700.0),
            ("R", 200.0),
            ("RZ", 200.0),
        ];
        Self {
            durations: entries
                .iter()
                .map(|&(name, duration)| (name.to_string(), duration))
                .collect(),
        }
    }

    /// Add or replace an entry
    /// Gantree: with_duration(self,name,d) -> Result<Self> // 항목 추가
    pub fn with_duration(
        mut self,
        name: impl Into<String>,
        duration: Duration,
    ) -> DecohereResult<Self> {
        let name = name.into();
        check_duration(&name, duration)?;
        self.durations.insert(name, duration);
        Ok(self)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Duration of an operation, if known
    pub fn get(&self, name: &str) -> Option<f64> {
        self.durations.get(name).copied()
    }

    /// Duration of an operation, or `UnknownOperation`
    /// Gantree: duration(&self,name) -> Result<f64> // 조회
    pub fn duration(&self, name: &str) -> DecohereResult<Duration> {
        self.get(name)
            .ok_or_else(|| DecohereError::UnknownOperation(name.to_string()))
    }

    /// Check for an entry
    pub fn contains(&self, name: &str) -> bool {
        self.durations.contains_key(name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Iterate over (name, duration) in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.durations.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

impl TryFrom<BTreeMap<String, f64>> for GateDurations {
    type Error = DecohereError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::new(map)
    }
}

impl From<GateDurations> for BTreeMap<String, f64> {
    fn from(durations: GateDurations) -> Self {
        durations.durations
    }
}

impl fmt::Display for GateDurations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .durations
            .iter()
            .map(|(name, d)| format!("{}={}", name, d))
            .collect();
        write!(f, "GateDurations({})", entries.join(", "))
    }
}

// ============================================================================
// Tests
// ============================================================================
