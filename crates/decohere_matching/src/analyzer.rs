//! Detector error model analysis
//!
//! Gantree: L4_Matching → ErrorAnalyzer
//!
//! Turns a noisy circuit into a [`DetectorErrorModel`]. Measurements are
//! numbered in a forward scan that also resolves every detector and
//! observable to the measurements it compares. The circuit is then walked
//! backward carrying [`SensitivityFrames`]: each noise channel met on the
//! way becomes a mechanism flipping the targets its Paulis anticommute with.

use crate::decoder::DecoderOptions;
use crate::dem::{DemTargets, DetectorErrorModel, ErrorMechanism};
use crate::frame::{SensitivityFrames, TargetSet};
use decohere_core::circuit::Circuit;
use decohere_core::constants::names;
use decohere_core::error::{DecohereError, DecohereResult};
use decohere_core::instruction::{Instruction, Target};
use decohere_core::types::{Basis, Probability, QubitId};
use decohere_noise::PauliProbabilities;
use std::collections::BTreeMap;

// ============================================================================
// Instruction Steps
// ============================================================================

type SingleQubitRule = fn(&mut SensitivityFrames, QubitId);
type TwoQubitRule = fn(&mut SensitivityFrames, QubitId, QubitId);

#[derive(Clone, Copy)]
enum Step {
    Timeless,
    Single(SingleQubitRule),
    Pair(TwoQubitRule),
    Measure(Basis),
    Reset(Basis),
    MeasureReset(Basis),
    Noise(Channel),
}

#[derive(Clone, Copy)]
enum Channel {
    Pauli1,
    Pauli(Basis),
    Depolarize1,
}

fn pauli_frame(_: &mut SensitivityFrames, _: QubitId) {}

fn step_of(name: &str) -> Option<Step> {
    let step = match name {
        names::TICK
        | names::DETECTOR
        | names::OBSERVABLE_INCLUDE
        | names::QUBIT_COORDS
        | names::SHIFT_COORDS => Step::Timeless,
        "I" | "X" | "Y" | "Z" => Step::Single(pauli_frame),
        "H" | "SQRT_Y" | "SQRT_Y_DAG" => Step::Single(SensitivityFrames::apply_h),
        "S" | "S_DAG" => Step::Single(SensitivityFrames::apply_s),
        "SQRT_X" | "SQRT_X_DAG" => Step::Single(SensitivityFrames::apply_sqrt_x),
        "CX" | "CNOT" => Step::Pair(SensitivityFrames::apply_cx),
        "CY" => Step::Pair(SensitivityFrames::apply_cy),
        "CZ" => Step::Pair(SensitivityFrames::apply_cz),
        "SWAP" => Step::Pair(SensitivityFrames::apply_swap),
        "M" | "MZ" => Step::Measure(Basis::Z),
        "MX" => Step::Measure(Basis::X),
        "MY" => Step::Measure(Basis::Y),
        "R" | "RZ" => Step::Reset(Basis::Z),
        "RX" => Step::Reset(Basis::X),
        "RY" => Step::Reset(Basis::Y),
        "MR" | "MRZ" => Step::MeasureReset(Basis::Z),
        "MRX" => Step::MeasureReset(Basis::X),
        "MRY" => Step::MeasureReset(Basis::Y),
        names::PAULI_CHANNEL_1 => Step::Noise(Channel::Pauli1),
        "X_ERROR" => Step::Noise(Channel::Pauli(Basis::X)),
        "Y_ERROR" => Step::Noise(Channel::Pauli(Basis::Y)),
        "Z_ERROR" => Step::Noise(Channel::Pauli(Basis::Z)),
        "DEPOLARIZE1" => Step::Noise(Channel::Depolarize1),
        _ => return None,
    };
    Some(step)
}

fn is_measurement(name: &str) -> bool {
    matches!(step_of(name), Some(Step::Measure(_) | Step::MeasureReset(_)))
}

// ============================================================================
// Forward Scan
// ============================================================================

/// Detectors, observables and the targets every measurement feeds
#[derive(Debug)]
struct RecordLayout {
    num_detectors: usize,
    num_observables: usize,
    detector_coords: Vec<Vec<f64>>,
    records: Vec<TargetSet>,
}

impl RecordLayout {
    fn scan(circuit: &Circuit) -> DecohereResult<Self> {
        let mut num_measurements = 0usize;
        let mut detectors: Vec<Vec<usize>> = Vec::new();
        let mut detector_coords: Vec<Vec<f64>> = Vec::new();
        let mut observables: Vec<(usize, Vec<usize>)> = Vec::new();
        let mut offset: Vec<f64> = Vec::new();

        for inst in circuit {
            if is_measurement(&inst.name) {
                num_measurements += inst.qubits().len();
            } else if inst.is(names::DETECTOR) {
                detectors.push(resolve_records(inst, num_measurements)?);
                detector_coords.push(
                    inst.args
                        .iter()
                        .enumerate()
                        .map(|(i, a)| a + offset.get(i).copied().unwrap_or(0.0))
                        .collect(),
                );
            } else if inst.is(names::OBSERVABLE_INCLUDE) {
                let index = observable_index(inst)?;
                observables.push((index, resolve_records(inst, num_measurements)?));
            } else if inst.is(names::SHIFT_COORDS) {
                if offset.len() < inst.args.len() {
                    offset.resize(inst.args.len(), 0.0);
                }
                for (slot, shift) in offset.iter_mut().zip(&inst.args) {
                    *slot += shift;
                }
            }
        }

        let num_detectors = detectors.len();
        let num_observables = observables.iter().map(|(i, _)| i + 1).max().unwrap_or(0);
        let mut records = vec![TargetSet::new(num_detectors + num_observables); num_measurements];
        for (d, measured) in detectors.iter().enumerate() {
            measured.iter().for_each(|&m| records[m].toggle(d));
        }
        for (o, measured) in &observables {
            measured
                .iter()
                .for_each(|&m| records[m].toggle(num_detectors + o));
        }

        Ok(Self {
            num_detectors,
            num_observables,
            detector_coords,
            records,
        })
    }

    fn split(&self, set: &TargetSet) -> DemTargets {
        let (detectors, observables): (Vec<usize>, Vec<usize>) =
            set.iter().partition(|&t| t < self.num_detectors);
        DemTargets::new(
            detectors,
            observables
                .into_iter()
                .map(|t| t - self.num_detectors)
                .collect(),
        )
    }
}

fn resolve_records(inst: &Instruction, num_measurements: usize) -> DecohereResult<Vec<usize>> {
    inst.targets
        .iter()
        .map(|target| match target {
            Target::Rec(lookback) => {
                let absolute = num_measurements as i64 + lookback;
                if absolute < 0 {
                    Err(DecohereError::RecordOutOfRange {
                        lookback: *lookback,
                        available: num_measurements,
                    })
                } else {
                    Ok(absolute as usize)
                }
            }
            Target::Qubit(q) => Err(DecohereError::invalid_circuit(format!(
                "{} takes measurement records, found qubit {}",
                inst.name, q
            ))),
        })
        .collect()
}

fn observable_index(inst: &Instruction) -> DecohereResult<usize> {
    let index = inst.args.first().copied().unwrap_or(0.0);
    if index < 0.0 || index.fract() != 0.0 {
        return Err(DecohereError::invalid_circuit(format!(
            "observable index must be a non-negative integer, got {}",
            index
        )));
    }
    Ok(index as usize)
}

// ============================================================================
// Backward Pass
// ============================================================================

#[derive(Debug, Clone)]
struct RawError {
    probability: Probability,
    // X and Z parts of a Y error
    parts: Option<(TargetSet, TargetSet)>,
}

struct BackwardPass {
    options: DecoderOptions,
    layout: RecordLayout,
    frames: SensitivityFrames,
    unvisited_measurements: usize,
    errors: BTreeMap<TargetSet, RawError>,
}

impl BackwardPass {
    fn new(options: DecoderOptions, layout: RecordLayout, num_qubits: usize) -> Self {
        let num_targets = layout.num_detectors + layout.num_observables;
        Self {
            options,
            frames: SensitivityFrames::new(num_qubits, num_targets),
            unvisited_measurements: layout.records.len(),
            layout,
            errors: BTreeMap::new(),
        }
    }

    fn undo(&mut self, inst: &Instruction) -> DecohereResult<()> {
        let step = step_of(&inst.name).ok_or_else(|| {
            DecohereError::DecoderConstructionFailed(format!(
                "unsupported operation '{}'",
                inst.name
            ))
        })?;
        let qubits = inst.qubits();

        match step {
            Step::Timeless => {}
            Step::Single(rule) => {
                for &q in qubits.iter().rev() {
                    rule(&mut self.frames, q);
                }
            }
            Step::Pair(rule) => {
                if qubits.len() % 2 != 0 {
                    return Err(DecohereError::invalid_circuit(format!(
                        "{} needs an even number of qubit targets",
                        inst.name
                    )));
                }
                for pair in qubits.chunks(2).rev() {
                    rule(&mut self.frames, pair[0], pair[1]);
                }
            }
            Step::Measure(basis) => {
                for &q in qubits.iter().rev() {
                    self.undo_measurement(inst, q, basis)?;
                }
            }
            Step::Reset(basis) => {
                for &q in qubits.iter().rev() {
                    self.undo_reset(inst, q, basis)?;
                }
            }
            Step::MeasureReset(basis) => {
                for &q in qubits.iter().rev() {
                    self.undo_reset(inst, q, basis)?;
                    self.undo_measurement(inst, q, basis)?;
                }
            }
            Step::Noise(channel) => {
                for &q in &qubits {
                    self.undo_noise(inst, q, channel)?;
                }
            }
        }
        Ok(())
    }

    fn undo_measurement(&mut self, inst: &Instruction, q: QubitId, basis: Basis) -> DecohereResult<()> {
        self.unvisited_measurements -= 1;
        let record = self.layout.records[self.unvisited_measurements].clone();
        if let Some(&flip) = inst.args.first() {
            self.add_error(flip, record.clone(), None)?;
        }
        self.frames.include_measurement(q, basis, &record);
        let gauge = self.frames.anticommuting(q, basis);
        self.check_gauge(gauge, || format!("{} on qubit {}", inst.name, q))
    }

    fn undo_reset(&mut self, inst: &Instruction, q: QubitId, basis: Basis) -> DecohereResult<()> {
        let gauge = self.frames.anticommuting(q, basis);
        self.check_gauge(gauge, || format!("{} on qubit {}", inst.name, q))?;
        self.frames.reset(q);
        Ok(())
    }

    fn undo_noise(&mut self, inst: &Instruction, q: QubitId, channel: Channel) -> DecohereResult<()> {
        let independent = match channel {
            Channel::Pauli(basis) => {
                let p = single_argument(inst)?;
                let parts = (basis == Basis::Y)
                    .then(|| (self.frames.z(q).clone(), self.frames.x(q).clone()));
                return self.add_error(p, self.frames.flipped_by(q, basis), parts);
            }
            Channel::Pauli1 => {
                let [px, py, pz] = <[f64; 3]>::try_from(inst.args.as_slice()).map_err(|_| {
                    DecohereError::invalid_circuit(format!(
                        "{} takes 3 arguments, got {}",
                        inst.name,
                        inst.args.len()
                    ))
                })?;
                self.independent(PauliProbabilities::new(px, py, pz))?
            }
            Channel::Depolarize1 => {
                let p = single_argument(inst)? / 3.0;
                self.independent(PauliProbabilities::new(p, p, p))?
            }
        };

        self.add_error(independent.px, self.frames.flipped_by(q, Basis::X), None)?;
        let parts = (self.frames.z(q).clone(), self.frames.x(q).clone());
        self.add_error(independent.py, self.frames.flipped_by(q, Basis::Y), Some(parts))?;
        self.add_error(independent.pz, self.frames.flipped_by(q, Basis::Z), None)
    }

    fn independent(&self, disjoint: PauliProbabilities) -> DecohereResult<PauliProbabilities> {
        if !disjoint.is_valid() {
            return Err(DecohereError::InvalidParameter(format!(
                "invalid Pauli channel {}",
                disjoint
            )));
        }
        match disjoint.to_independent() {
            Some(independent) => Ok(independent),
            None if self.options.approximate_disjoint_errors => {
                Ok(disjoint.to_independent_approx())
            }
            None => Err(DecohereError::DecoderConstructionFailed(format!(
                "channel {} has no exact independent-error form; \
                 enable approximate_disjoint_errors",
                disjoint
            ))),
        }
    }

    fn add_error(
        &mut self,
        probability: f64,
        symptom: TargetSet,
        parts: Option<(TargetSet, TargetSet)>,
    ) -> DecohereResult<()> {
        let probability = Probability::new(probability)?;
        if probability.value() == 0.0 || symptom.is_empty() {
            return Ok(());
        }
        match self.errors.get_mut(&symptom) {
            Some(existing) => {
                existing.probability = existing.probability.xor(probability);
                if existing.parts.is_none() {
                    existing.parts = parts;
                }
                log::debug!(
                    "merged error on {}: p = {}",
                    self.layout.split(&symptom),
                    existing.probability
                );
            }
            None => {
                self.errors.insert(symptom, RawError { probability, parts });
            }
        }
        Ok(())
    }

    /// Targets anticommuting with a collapse are random: record them as a
    /// coin flip, then drop the largest one from all remaining frames
    fn check_gauge<F>(&mut self, gauge: TargetSet, context: F) -> DecohereResult<()>
    where
        F: FnOnce() -> String,
    {
        if gauge.is_empty() {
            return Ok(());
        }
        let targets = self.layout.split(&gauge);
        if let Some(observable) = targets.observables.first() {
            return Err(DecohereError::DecoderConstructionFailed(format!(
                "observable L{} is not deterministic: it anticommutes with {}",
                observable,
                context()
            )));
        }
        if !self.options.allow_gauge_detectors {
            return Err(DecohereError::DecoderConstructionFailed(format!(
                "detector D{} is not deterministic: it anticommutes with {}",
                targets.detectors[0],
                context()
            )));
        }

        log::debug!("gauge detectors {} from {}", targets, context());
        self.add_error(Probability::HALF.value(), gauge.clone(), None)?;
        self.frames.remove_gauge(&gauge);
        if let Some(max) = gauge.highest() {
            for record in self.layout.records.iter_mut().take(self.unvisited_measurements) {
                if record.contains(max) {
                    record.xor_with(&gauge);
                }
            }
        }
        Ok(())
    }

    /// Every qubit starts in |0>
    fn undo_initialization(&mut self) -> DecohereResult<()> {
        for q in 0..self.frames.num_qubits() {
            let gauge = self.frames.anticommuting(q, Basis::Z);
            self.check_gauge(gauge, || format!("initialization of qubit {} into |0>", q))?;
        }
        Ok(())
    }
}

fn single_argument(inst: &Instruction) -> DecohereResult<f64> {
    match inst.args.as_slice() {
        [p] => Ok(*p),
        args => Err(DecohereError::invalid_circuit(format!(
            "{} takes 1 argument, got {}",
            inst.name,
            args.len()
        ))),
    }
}

// ============================================================================
// Decomposition
// ============================================================================

struct Decomposer {
    // detectors of graphlike symptoms -> their observables
    known: BTreeMap<Vec<usize>, Vec<usize>>,
}

impl Decomposer {
    fn new<'a>(symptoms: impl Iterator<Item = &'a DemTargets>) -> Self {
        let mut known = BTreeMap::new();
        for symptom in symptoms {
            if symptom.is_graphlike() && !symptom.detectors.is_empty() {
                known
                    .entry(symptom.detectors.clone())
                    .or_insert_with(|| symptom.observables.clone());
            }
        }
        Self { known }
    }

    fn decompose(
        &self,
        symptom: &DemTargets,
        parts: Option<(DemTargets, DemTargets)>,
    ) -> Option<Vec<DemTargets>> {
        if let Some((x_part, z_part)) = parts {
            let usable = |p: &DemTargets| p.is_graphlike() && !p.detectors.is_empty();
            if usable(&x_part) && usable(&z_part) {
                return Some(vec![x_part, z_part]);
            }
        }
        self.split_into_known(symptom)
    }

    fn split_into_known(&self, symptom: &DemTargets) -> Option<Vec<DemTargets>> {
        let mut remaining = symptom.detectors.clone();
        let mut components = Vec::new();
        while let Some(&first) = remaining.first() {
            let partner = remaining[1..]
                .iter()
                .copied()
                .find(|&other| self.known.contains_key([first, other].as_slice()));
            let detectors = match partner {
                Some(other) => vec![first, other],
                None if self.known.contains_key([first].as_slice()) => vec![first],
                None => return None,
            };
            remaining.retain(|d| !detectors.contains(d));
            let observables = self.known.get(&detectors)?.clone();
            components.push(DemTargets {
                detectors,
                observables,
            });
        }

        let combined = components
            .iter()
            .fold(DemTargets::default(), |acc, c| acc.xor(c));
        (combined.observables == symptom.observables).then_some(components)
    }
}

// ============================================================================
// ErrorAnalyzer
// ============================================================================

/// Circuit to detector error model conversion
/// Gantree: ErrorAnalyzer // DEM 분석기
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorAnalyzer {
    options: DecoderOptions,
}

impl ErrorAnalyzer {
    /// Create an analyzer
    pub fn new(options: DecoderOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Build the detector error model of a noisy circuit
    /// Gantree: analyze(&self,&Circuit) -> Result<DetectorErrorModel> // DEM 생성
    ///
    /// Fails with `DecoderConstructionFailed` for unsupported operations,
    /// non-deterministic observables, gauge detectors when they are not
    /// allowed, and mechanisms that cannot be decomposed.
    pub fn analyze(&self, circuit: &Circuit) -> DecohereResult<DetectorErrorModel> {
        let layout = RecordLayout::scan(circuit)?;
        let mut pass = BackwardPass::new(self.options, layout, circuit.num_qubits());
        for inst in circuit.iter().rev() {
            pass.undo(inst)?;
        }
        pass.undo_initialization()?;

        let BackwardPass { layout, errors, .. } = pass;
        let mut raw: Vec<(DemTargets, RawError)> = errors
            .into_iter()
            .map(|(set, err)| (layout.split(&set), err))
            .collect();
        raw.sort_by(|a, b| a.0.cmp(&b.0));

        let decomposer = Decomposer::new(raw.iter().map(|(symptom, _)| symptom));
        let mut mechanisms = Vec::with_capacity(raw.len());
        for (symptom, err) in raw {
            let probability = err.probability.value();
            if symptom.is_graphlike() || !self.options.decompose_errors {
                mechanisms.push(ErrorMechanism::new(probability, symptom));
                continue;
            }
            let parts = err
                .parts
                .map(|(x, z)| (layout.split(&x), layout.split(&z)));
            let components = decomposer.decompose(&symptom, parts).ok_or_else(|| {
                DecohereError::DecoderConstructionFailed(format!(
                    "failed to decompose error({}) {} into graphlike components",
                    probability, symptom
                ))
            })?;
            mechanisms.push(ErrorMechanism {
                probability,
                components,
            });
        }

        log::info!(
            "detector error model: {} detectors, {} observables, {} mechanisms",
            layout.num_detectors,
            layout.num_observables,
            mechanisms.len()
        );
        Ok(DetectorErrorModel {
            num_detectors: layout.num_detectors,
            num_observables: layout.num_observables,
            detector_coords: layout.detector_coords,
            mechanisms,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn analyze(text: &str) -> DecohereResult<DetectorErrorModel> {
        ErrorAnalyzer::default().analyze(&Circuit::parse(text).unwrap())
    }

    fn targets(detectors: &[usize], observables: &[usize]) -> DemTargets {
        DemTargets::new(detectors.to_vec(), observables.to_vec())
    }

    #[test]
    fn test_single_x_error() {
        let dem = analyze("X_ERROR(0.1) 0\nM 0\nDETECTOR(2, 3) rec[-1]\n").unwrap();
        assert_eq!(dem.num_detectors, 1);
        assert_eq!(dem.num_errors(), 1);
        assert_relative_eq!(dem.mechanisms[0].probability, 0.1);
        assert_eq!(dem.mechanisms[0].components, vec![targets(&[0], &[])]);
        assert_eq!(dem.to_string(), "error(0.1) D0\ndetector(2, 3) D0\n");
    }

    #[test]
    fn test_z_error_is_invisible_to_z_measurement() {
        let dem = analyze("Z_ERROR(0.1) 0\nM 0\nDETECTOR rec[-1]\n").unwrap();
        assert_eq!(dem.num_errors(), 0);
    }

    #[test]
    fn test_error_through_cx_and_observable() {
        let text = "\
R 0 1
X_ERROR(0.2) 0
CX 0 1
M 0 1
DETECTOR rec[-1]
OBSERVABLE_INCLUDE(0) rec[-2]
";
        let dem = analyze(text).unwrap();
        assert_eq!(dem.num_observables, 1);
        assert_eq!(dem.mechanisms[0].components, vec![targets(&[0], &[0])]);
    }

    #[test]
    fn test_identical_mechanisms_merge() {
        let dem = analyze("X_ERROR(0.1) 0\nX_ERROR(0.2) 0\nM 0\nDETECTOR rec[-1]\n").unwrap();
        assert_eq!(dem.num_errors(), 1);
        assert_relative_eq!(dem.mechanisms[0].probability, 0.1 * 0.8 + 0.2 * 0.9);
    }

    #[test]
    fn test_pauli_channel_converted_to_independent() {
        let dem = analyze("PAULI_CHANNEL_1(0.1, 0, 0) 0\nM 0\nDETECTOR rec[-1]\n").unwrap();
        assert_relative_eq!(dem.mechanisms[0].probability, 0.1, epsilon = 1e-12);

        // X and Y both flip a Z measurement
        let dem = analyze("PAULI_CHANNEL_1(0.1, 0.1, 0.05) 0\nM 0\nDETECTOR rec[-1]\n").unwrap();
        let independent = PauliProbabilities::new(0.1, 0.1, 0.05).to_independent().unwrap();
        let p = Probability::new(independent.px)
            .unwrap()
            .xor(Probability::new(independent.py).unwrap());
        assert_relative_eq!(dem.mechanisms[0].probability, p.value(), epsilon = 1e-12);
    }

    #[test]
    fn test_fully_mixed_channel_is_exact() {
        let text = "PAULI_CHANNEL_1(0.25, 0.25, 0.25) 0\nM 0\nDETECTOR rec[-1]\n";
        let dem = analyze(text).unwrap();
        assert_eq!(dem.num_errors(), 1);
        assert_relative_eq!(dem.mechanisms[0].probability, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_disjoint_channel_without_independent_form() {
        let text = "PAULI_CHANNEL_1(0.5, 0.5, 0) 0\nM 0\nDETECTOR rec[-1]\n";
        let err = analyze(text).unwrap_err();
        assert!(matches!(err, DecohereError::DecoderConstructionFailed(_)));

        let options = DecoderOptions::default().with_approximate_disjoint_errors(true);
        let dem = ErrorAnalyzer::new(options)
            .analyze(&Circuit::parse(text).unwrap())
            .unwrap();
        assert_eq!(dem.num_errors(), 1);
    }

    #[test]
    fn test_gauge_detector() {
        // an X-basis detector after a Z reset is a coin flip
        let text = "R 0\nMX 0\nDETECTOR rec[-1]\n";
        let dem = analyze(text).unwrap();
        assert_eq!(dem.mechanisms, vec![ErrorMechanism::new(0.5, targets(&[0], &[]))]);

        let options = DecoderOptions::default().with_allow_gauge_detectors(false);
        let err = ErrorAnalyzer::new(options)
            .analyze(&Circuit::parse(text).unwrap())
            .unwrap_err();
        assert!(matches!(err, DecohereError::DecoderConstructionFailed(_)));
    }

    #[test]
    fn test_initial_state_gauge() {
        let dem = analyze("MX 0\nDETECTOR rec[-1]\n").unwrap();
        assert_relative_eq!(dem.mechanisms[0].probability, 0.5);
    }

    #[test]
    fn test_random_observable_fails() {
        let err = analyze("MX 0\nOBSERVABLE_INCLUDE(0) rec[-1]\n").unwrap_err();
        assert!(matches!(err, DecohereError::DecoderConstructionFailed(_)));
    }

    #[test]
    fn test_y_error_decomposes_into_parts() {
        // Bell pair on 1 2 with Z1Z2 read by ancilla 0, X1X2 by ancilla 3,
        // and Z1Z2 read again directly
        let text = "\
R 0 1 2 3
H 1
CX 1 2
Y_ERROR(0.1) 1
CX 1 0 2 0
H 3
CX 3 1 3 2
H 3
M 0 3 1 2
DETECTOR rec[-4]
DETECTOR rec[-3]
DETECTOR rec[-2] rec[-1]
";
        let dem = analyze(text).unwrap();
        assert_eq!(dem.num_errors(), 1);
        assert_eq!(
            dem.mechanisms[0].components,
            vec![targets(&[0, 2], &[]), targets(&[1], &[])]
        );
        assert_eq!(dem.mechanisms[0].to_string(), "error(0.1) D0 D2 ^ D1");
        assert!(dem.is_graphlike());
    }

    #[test]
    fn test_decompose_into_known_edges() {
        let text = "\
R 0 1 2
X_ERROR(0.1) 0
CX 0 1
X_ERROR(0.01) 0
CX 0 2
X_ERROR(0.01) 1
M 0 1 2
DETECTOR rec[-3]
DETECTOR rec[-2]
DETECTOR rec[-1]
";
        let dem = analyze(text).unwrap();
        let fanout = dem.find(&targets(&[0, 1, 2], &[])).unwrap();
        assert_eq!(
            fanout.components,
            vec![targets(&[0, 2], &[]), targets(&[1], &[])]
        );
        assert_relative_eq!(fanout.probability, 0.1);
    }

    #[test]
    fn test_undecomposable_error_fails() {
        let text = "\
R 0 1 2
X_ERROR(0.1) 0
CX 0 1 0 2
M 0 1 2
DETECTOR rec[-3]
DETECTOR rec[-2]
DETECTOR rec[-1]
";
        let err = analyze(text).unwrap_err();
        assert!(matches!(err, DecohereError::DecoderConstructionFailed(_)));

        let options = DecoderOptions::default().with_decompose_errors(false);
        let dem = ErrorAnalyzer::new(options)
            .analyze(&Circuit::parse(text).unwrap())
            .unwrap();
        assert!(!dem.is_graphlike());
    }

    #[test]
    fn test_unsupported_and_out_of_range() {
        assert!(matches!(
            analyze("CCZ 0 1 2\n").unwrap_err(),
            DecohereError::DecoderConstructionFailed(_)
        ));
        assert_eq!(
            analyze("M 0\nDETECTOR rec[-2]\n").unwrap_err(),
            DecohereError::RecordOutOfRange {
                lookback: -2,
                available: 1
            }
        );
    }

    #[test]
    fn test_detector_coordinates_shift() {
        let dem = analyze("M 0\nDETECTOR(1, 0) rec[-1]\nSHIFT_COORDS(0, 1)\nM 0\nDETECTOR(1, 0) rec[-1]\n")
            .unwrap();
        assert_eq!(dem.detector_coords, vec![vec![1.0, 0.0], vec![1.0, 1.0]]);
    }
}
