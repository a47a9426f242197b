//! Circuit structure for Decohere
//!
//! Gantree: L1_Circuit → Circuit
//!
//! A flat, ordered list of [`Instruction`]s in the stim dialect. Text is
//! parsed line by line; `REPEAT n { ... }` blocks are unrolled so that every
//! later pass sees one linear stream. `Display` prints the same text format.

use crate::constants::names;
use crate::dialect::{OperationClasses, OperationKind};
use crate::error::{DecohereError, DecohereResult};
use crate::instruction::Instruction;
use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Flat stim-dialect circuit
/// Gantree: Circuit // 명령 목록
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Instruction sequence
    /// Gantree: instructions: Vec<Instruction> // 명령 목록
    instructions: Vec<Instruction>,
}

impl Circuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty circuit
    /// Gantree: new() -> Self // 생성자
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a vector of instructions
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Parse stim circuit text
    /// Gantree: parse(&str) -> Result<Self> // 텍스트 파싱
    pub fn parse(text: &str) -> DecohereResult<Self> {
        let mut lines = text.lines().enumerate();
        let instructions = parse_block(&mut lines, 0)?;
        Ok(Self { instructions })
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Append an instruction
    /// Gantree: push(&mut, Instruction) // 명령 추가
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Append all instructions of another circuit
    pub fn append(&mut self, other: &Circuit) {
        self.instructions.extend(other.instructions.iter().cloned());
    }

    /// Instructions in order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterate over instructions
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if circuit is empty
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Consume into the instruction vector
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    // ========================================================================
    // Noise Projection
    // ========================================================================

    /// Copy with all stochastic operations removed and measurement
    /// flip probabilities cleared
    /// Gantree: without_noise_in(&self,&classes) -> Circuit // 노이즈 제거
    pub fn without_noise_in(&self, classes: &OperationClasses) -> Circuit {
        let instructions = self
            .instructions
            .iter()
            .filter(|inst| !classes.is_stochastic(&inst.name))
            .map(|inst| {
                if classes.is_measurement(&inst.name) && !inst.args.is_empty() {
                    Instruction::new(inst.name.clone(), inst.targets.clone(), Vec::new())
                } else {
                    inst.clone()
                }
            })
            .collect();
        Circuit { instructions }
    }

    /// [`Circuit::without_noise_in`] with the stim classes
    pub fn without_noise(&self) -> Circuit {
        self.without_noise_in(&OperationClasses::stim())
    }

    /// Whether the circuit differs from its own noise-free projection
    /// Gantree: has_noise(&self,&classes) -> bool // 노이즈 존재
    pub fn has_noise(&self, classes: &OperationClasses) -> bool {
        *self != self.without_noise_in(classes)
    }

    /// Name of the first noisy instruction, if any
    pub fn first_noisy_operation(&self, classes: &OperationClasses) -> Option<&str> {
        self.instructions
            .iter()
            .find(|inst| {
                classes.is_stochastic(&inst.name)
                    || (classes.is_measurement(&inst.name) && !inst.args.is_empty())
            })
            .map(|inst| inst.name.as_str())
    }

    // ========================================================================
    // Circuit Analysis
    // ========================================================================

    /// Number of qubits (one more than the largest qubit target)
    /// Gantree: num_qubits(&self) -> usize // 큐비트 수
    pub fn num_qubits(&self) -> usize {
        self.instructions
            .iter()
            .flat_map(|inst| inst.qubits())
            .max()
            .map_or(0, |q| q + 1)
    }

    /// Qubits targeted by at least one active operation
    /// Gantree: active_qubits(&self,&classes) -> BTreeSet // 활성 큐비트
    pub fn active_qubits(&self, classes: &OperationClasses) -> BTreeSet<QubitId> {
        self.instructions
            .iter()
            .filter(|inst| classes.classify(&inst.name).is_active())
            .flat_map(|inst| inst.qubits())
            .collect()
    }

    /// Number of time-boundary markers
    /// Gantree: num_ticks(&self) -> usize // TICK 수
    pub fn num_ticks(&self) -> usize {
        self.count_named(names::TICK)
    }

    /// Number of measurement results produced
    pub fn num_measurements(&self) -> usize {
        let classes = OperationClasses::stim();
        self.instructions
            .iter()
            .filter(|inst| classes.classify(&inst.name) == OperationKind::Measurement)
            .map(|inst| inst.qubits().len())
            .sum()
    }

    /// Number of detectors
    /// Gantree: num_detectors(&self) -> usize // 검출기 수
    pub fn num_detectors(&self) -> usize {
        self.count_named(names::DETECTOR)
    }

    /// Number of logical observables (largest index + 1)
    pub fn num_observables(&self) -> usize {
        self.instructions
            .iter()
            .filter(|inst| inst.is(names::OBSERVABLE_INCLUDE))
            .filter_map(|inst| inst.args.first())
            .map(|&index| index as usize + 1)
            .max()
            .unwrap_or(0)
    }

    /// Count instructions with a given name
    pub fn count_named(&self, name: &str) -> usize {
        self.instructions.iter().filter(|inst| inst.is(name)).count()
    }
}

// ============================================================================
// Text Parsing
// ============================================================================

type NumberedLines<'a> = std::iter::Enumerate<std::str::Lines<'a>>;

fn strip_comment(line: &str) -> &str {
    let code = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    code.trim()
}

fn at_line(err: DecohereError, line: usize) -> DecohereError {
    match err {
        DecohereError::InvalidCircuit { message, .. } => {
            DecohereError::InvalidCircuit { line, message }
        }
        other => other,
    }
}

fn parse_block(lines: &mut NumberedLines<'_>, depth: usize) -> DecohereResult<Vec<Instruction>> {
    let mut out = Vec::new();
    while let Some((index, raw)) = lines.next() {
        let line_no = index + 1;
        let line = strip_comment(raw);
        if line.is_empty() {
            continue;
        }

        if line == "}" {
            if depth == 0 {
                return Err(DecohereError::InvalidCircuit {
                    line: line_no,
                    message: "unmatched '}'".into(),
                });
            }
            return Ok(out);
        }

        let head = line.split_whitespace().next().unwrap_or("");
        if head.eq_ignore_ascii_case(names::REPEAT) {
            let count = parse_repeat_header(line).map_err(|e| at_line(e, line_no))?;
            let body = parse_block(lines, depth + 1)?;
            for _ in 0..count {
                out.extend(body.iter().cloned());
            }
            continue;
        }

        out.push(Instruction::parse_line(line).map_err(|e| at_line(e, line_no))?);
    }

    if depth > 0 {
        return Err(DecohereError::invalid_circuit("unclosed REPEAT block"));
    }
    Ok(out)
}

fn parse_repeat_header(line: &str) -> DecohereResult<usize> {
    let body = line[names::REPEAT.len()..].trim();
    let count = body
        .strip_suffix('{')
        .ok_or_else(|| DecohereError::invalid_circuit("REPEAT must end with '{'"))?
        .trim();
    count
        .parse::<usize>()
        .map_err(|_| DecohereError::invalid_circuit(format!("bad repeat count '{}'", count)))
}

impl FromStr for Circuit {
    type Err = DecohereError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for inst in &self.instructions {
            writeln!(f, "{}", inst)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl FromIterator<Instruction> for Circuit {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
R 0 1 2
TICK
CX 0 1
TICK
MR 1
DETECTOR(1, 0) rec[-1]
REPEAT 2 {
    TICK
    CX 0 1
    TICK
    MR 1  # ancilla
    DETECTOR(1, 1) rec[-1] rec[-2]
}
M 0 2
OBSERVABLE_INCLUDE(0) rec[-1]
";

    #[test]
    fn test_parse_flattens_repeat() {
        let circuit = Circuit::parse(SMALL).unwrap();
        assert_eq!(circuit.num_ticks(), 2 + 2 * 2);
        assert_eq!(circuit.num_detectors(), 3);
        assert_eq!(circuit.num_measurements(), 1 + 2 + 2);
        assert_eq!(circuit.num_observables(), 1);
        assert_eq!(circuit.num_qubits(), 3);
    }

    #[test]
    fn test_text_roundtrip() {
        let circuit = Circuit::parse(SMALL).unwrap();
        let reparsed = Circuit::parse(&circuit.to_string()).unwrap();
        assert_eq!(circuit, reparsed);
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = Circuit::parse("H 0\nCX 0 x\n").unwrap_err();
        assert!(matches!(err, DecohereError::InvalidCircuit { line: 2, .. }));
        assert!(Circuit::parse("REPEAT 3 {\nH 0\n").is_err());
        assert!(Circuit::parse("H 0\n}\n").is_err());
        assert!(Circuit::parse("REPEAT x {\n}\n").is_err());
    }

    #[test]
    fn test_without_noise() {
        let noisy = Circuit::parse(
            "H 0\nDEPOLARIZE1(0.01) 0\nTICK\nM(0.02) 0\nPAULI_CHANNEL_1(0.1, 0.1, 0.1) 0\n",
        )
        .unwrap();
        let classes = OperationClasses::stim();
        assert!(noisy.has_noise(&classes));
        assert_eq!(noisy.first_noisy_operation(&classes), Some("DEPOLARIZE1"));

        let clean = noisy.without_noise();
        assert_eq!(clean, Circuit::parse("H 0\nTICK\nM 0\n").unwrap());
        assert!(!clean.has_noise(&classes));
    }

    #[test]
    fn test_active_qubits_skip_annotations() {
        let circuit = Circuit::parse("QUBIT_COORDS(0, 0) 7\nH 0\nTICK\nCX 0 2\n").unwrap();
        let active = circuit.active_qubits(&OperationClasses::stim());
        assert_eq!(active.into_iter().collect::<Vec<_>>(), vec![0, 2]);
    }
}
