//! Circuit instructions for Decohere
//!
//! Gantree: L1_Circuit → Instruction
//!
//! A single line of a stim-dialect circuit: an operation name, numeric
//! arguments in parentheses and a list of targets. Targets are either
//! qubit indices or measurement-record lookbacks (`rec[-k]`).

use crate::error::{DecohereError, DecohereResult};
use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Target
// ============================================================================

/// Instruction target
/// Gantree: Target // Qubit | Rec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Qubit index
    Qubit(QubitId),

    /// Measurement record lookback, always negative (`rec[-1]` is the latest)
    Rec(i64),
}

impl Target {
    /// Qubit index, if this is a qubit target
    pub fn qubit(&self) -> Option<QubitId> {
        match self {
            Target::Qubit(q) => Some(*q),
            Target::Rec(_) => None,
        }
    }

    /// Record lookback, if this is a record target
    pub fn lookback(&self) -> Option<i64> {
        match self {
            Target::Rec(k) => Some(*k),
            Target::Qubit(_) => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Qubit(q) => write!(f, "{}", q),
            Target::Rec(k) => write!(f, "rec[{}]", k),
        }
    }
}

impl FromStr for Target {
    type Err = DecohereError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(inner) = s.strip_prefix("rec[").and_then(|r| r.strip_suffix(']')) {
            let k: i64 = inner
                .parse()
                .map_err(|_| DecohereError::invalid_circuit(format!("bad record target '{}'", s)))?;
            if k >= 0 {
                return Err(DecohereError::invalid_circuit(format!(
                    "record target '{}' must look back (negative index)",
                    s
                )));
            }
            return Ok(Target::Rec(k));
        }
        s.parse::<QubitId>()
            .map(Target::Qubit)
            .map_err(|_| DecohereError::invalid_circuit(format!("bad target '{}'", s)))
    }
}

// ============================================================================
// Instruction
// ============================================================================

/// One circuit operation
/// Gantree: Instruction // name + args + targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Operation name (upper case, e.g. `CX`, `TICK`)
    /// Gantree: name: String // 연산 이름
    pub name: String,

    /// Targets in order
    /// Gantree: targets: Vec<Target> // 대상
    pub targets: Vec<Target>,

    /// Parenthesised numeric arguments
    /// Gantree: args: Vec<f64> // 인자 (확률/좌표)
    pub args: Vec<f64>,
}

impl Instruction {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an instruction from its parts
    /// Gantree: new(name,targets,args) -> Self // 생성자
    pub fn new(name: impl Into<String>, targets: Vec<Target>, args: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            targets,
            args,
        }
    }

    /// Gate acting on qubits, without arguments
    /// Gantree: gate(name,&[q]) -> Self // 게이트
    pub fn gate(name: impl Into<String>, qubits: &[QubitId]) -> Self {
        Self::new(
            name,
            qubits.iter().copied().map(Target::Qubit).collect(),
            Vec::new(),
        )
    }

    /// Annotation with record targets and arguments (e.g. `DETECTOR(1, 0) rec[-1]`)
    pub fn annotation(name: impl Into<String>, lookbacks: &[i64], args: Vec<f64>) -> Self {
        Self::new(
            name,
            lookbacks.iter().copied().map(Target::Rec).collect(),
            args,
        )
    }

    /// Time-boundary marker
    pub fn tick() -> Self {
        Self::new(crate::constants::names::TICK, Vec::new(), Vec::new())
    }

    /// Single-qubit Pauli channel on one qubit
    /// Gantree: pauli_channel_1(q,px,py,pz) -> Self // 노이즈 채널
    pub fn pauli_channel_1(qubit: QubitId, px: f64, py: f64, pz: f64) -> Self {
        Self::new(
            crate::constants::names::PAULI_CHANNEL_1,
            vec![Target::Qubit(qubit)],
            vec![px, py, pz],
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Qubit targets in order (record targets skipped)
    /// Gantree: qubits(&self) -> Vec<QubitId> // 큐비트 대상
    pub fn qubits(&self) -> Vec<QubitId> {
        self.targets.iter().filter_map(Target::qubit).collect()
    }

    /// Record lookbacks in order (qubit targets skipped)
    pub fn lookbacks(&self) -> Vec<i64> {
        self.targets.iter().filter_map(Target::lookback).collect()
    }

    /// Check the operation name
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    /// Parse one instruction line (without comments or `REPEAT`)
    /// Gantree: parse_line(&str) -> Result<Self> // 한 줄 파싱
    pub fn parse_line(line: &str) -> DecohereResult<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Err(DecohereError::invalid_circuit("empty instruction"));
        }

        let (head, rest) = match line.find('(') {
            Some(open) if !line[..open].contains(char::is_whitespace) => {
                let close = line[open..].find(')').map(|c| open + c).ok_or_else(|| {
                    DecohereError::invalid_circuit(format!("unclosed '(' in '{}'", line))
                })?;
                let args = line[open + 1..close]
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        s.parse::<f64>().map_err(|_| {
                            DecohereError::invalid_circuit(format!("bad argument '{}'", s))
                        })
                    })
                    .collect::<DecohereResult<Vec<f64>>>()?;
                ((&line[..open], args), &line[close + 1..])
            }
            _ => {
                let end = line.find(char::is_whitespace).unwrap_or(line.len());
                ((&line[..end], Vec::new()), &line[end..])
            }
        };

        let (name, args) = head;
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(DecohereError::invalid_circuit(format!(
                "bad operation name '{}'",
                name
            )));
        }

        let targets = rest
            .split_whitespace()
            .map(str::parse::<Target>)
            .collect::<DecohereResult<Vec<Target>>>()?;

        Ok(Self::new(name.to_ascii_uppercase(), targets, args))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
            write!(f, "({})", args.join(", "))?;
        }
        for target in &self.targets {
            write!(f, " {}", target)?;
        }
        Ok(())
    }
}

impl FromStr for Instruction {
    type Err = DecohereError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gate() {
        let inst = Instruction::parse_line("CX 0 1 2 3").unwrap();
        assert_eq!(inst.name, "CX");
        assert_eq!(inst.qubits(), vec![0, 1, 2, 3]);
        assert!(inst.args.is_empty());
    }

    #[test]
    fn test_parse_args_and_records() {
        let inst = Instruction::parse_line("DETECTOR(1, 0) rec[-1] rec[-5]").unwrap();
        assert_eq!(inst.name, "DETECTOR");
        assert_eq!(inst.args, vec![1.0, 0.0]);
        assert_eq!(inst.lookbacks(), vec![-1, -5]);
        assert!(inst.qubits().is_empty());
    }

    #[test]
    fn test_parse_lowercase_name() {
        let inst = Instruction::parse_line("mr 1 3").unwrap();
        assert_eq!(inst.name, "MR");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Instruction::parse_line("CX 0 a").is_err());
        assert!(Instruction::parse_line("X_ERROR(0.1 0").is_err());
        assert!(Instruction::parse_line("DETECTOR rec[1]").is_err());
        assert!(Instruction::parse_line("").is_err());
    }

    #[test]
    fn test_display() {
        let inst = Instruction::pauli_channel_1(3, 0.25, 0.25, 0.125);
        assert_eq!(inst.to_string(), "PAULI_CHANNEL_1(0.25, 0.25, 0.125) 3");
        assert_eq!(Instruction::tick().to_string(), "TICK");
        let det = Instruction::annotation("DETECTOR", &[-1, -3], vec![2.0, 0.0]);
        assert_eq!(det.to_string(), "DETECTOR(2, 0) rec[-1] rec[-3]");
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let text = "OBSERVABLE_INCLUDE(0) rec[-1]";
        let inst: Instruction = text.parse().unwrap();
        assert_eq!(inst.to_string(), text);
    }
}
