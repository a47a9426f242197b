//! MWPM decoder
//!
//! Gantree: L4_Matching → MatchingDecoder
//!
//! Minimum-weight perfect matching over a [`MatchingGraph`], solved with
//! the fusion-blossom serial solver. The decoder is immutable: every decode
//! call builds its own solver from the shared initializer.

use crate::analyzer::ErrorAnalyzer;
use crate::dem::DetectorErrorModel;
use crate::graph::MatchingGraph;
use decohere_core::circuit::Circuit;
use decohere_core::error::{DecohereError, DecohereResult};
use fusion_blossom::mwpm_solver::{PrimalDualSolver, SolverSerial};
use fusion_blossom::util::{SolverInitializer, SyndromePattern, VertexIndex, VertexNum, Weight};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// DecoderOptions
// ============================================================================

/// Options of detector error model construction
/// Gantree: DecoderOptions // 디코더 옵션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Turn non-deterministic detectors into coin-flip mechanisms instead
    /// of failing
    pub allow_gauge_detectors: bool,

    /// Split mechanisms with more than two detectors into graphlike parts
    pub decompose_errors: bool,

    /// Accept disjoint channels with no exact independent form, using their
    /// disjoint probabilities as independent ones
    pub approximate_disjoint_errors: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            allow_gauge_detectors: true,
            decompose_errors: true,
            approximate_disjoint_errors: false,
        }
    }
}

impl DecoderOptions {
    /// Builder: gauge detector handling
    pub fn with_allow_gauge_detectors(mut self, allow: bool) -> Self {
        self.allow_gauge_detectors = allow;
        self
    }

    /// Builder: error decomposition
    pub fn with_decompose_errors(mut self, decompose: bool) -> Self {
        self.decompose_errors = decompose;
        self
    }

    /// Builder: approximation of disjoint channels
    pub fn with_approximate_disjoint_errors(mut self, approximate: bool) -> Self {
        self.approximate_disjoint_errors = approximate;
        self
    }
}

// ============================================================================
// MatchingDecoder
// ============================================================================

/// MWPM decoder predicting observable flips from detection events
/// Gantree: MatchingDecoder // MWPM 디코더
#[derive(Debug, Clone)]
pub struct MatchingDecoder {
    graph: MatchingGraph,
    initializer: SolverInitializer,
    degrees: Vec<usize>,
    // connected component of every detector, and whether it reaches the boundary
    components: Vec<usize>,
    component_has_boundary: Vec<bool>,
}

impl MatchingDecoder {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Decoder over a matching graph
    /// Gantree: from_graph(MatchingGraph) -> Self // 그래프 → 디코더
    pub fn from_graph(graph: MatchingGraph) -> Self {
        let boundary = graph.boundary();
        let weighted_edges: Vec<(VertexIndex, VertexIndex, Weight)> = graph
            .edges()
            .iter()
            .map(|edge| {
                (
                    edge.node1 as VertexIndex,
                    edge.node2.unwrap_or(boundary) as VertexIndex,
                    edge.integer_weight() as Weight,
                )
            })
            .collect();
        let initializer = SolverInitializer::new(
            graph.num_nodes() as VertexNum,
            weighted_edges,
            vec![boundary as VertexIndex],
        );

        let (components, component_has_boundary) = connected_components(&graph);
        Self {
            degrees: graph.degrees(),
            graph,
            initializer,
            components,
            component_has_boundary,
        }
    }

    /// Decoder for a detector error model
    /// Gantree: from_dem(&DetectorErrorModel) -> Result<Self> // DEM → 디코더
    pub fn from_dem(dem: &DetectorErrorModel) -> DecohereResult<Self> {
        Ok(Self::from_graph(MatchingGraph::from_dem(dem)?))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of detectors
    pub fn num_detectors(&self) -> usize {
        self.graph.num_detectors()
    }

    /// Number of observables
    pub fn num_observables(&self) -> usize {
        self.graph.num_observables()
    }

    /// Number of edges
    pub fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    /// Underlying graph
    pub fn graph(&self) -> &MatchingGraph {
        &self.graph
    }

    // ========================================================================
    // Decoding
    // ========================================================================

    /// Predict observable flips from one shot of detection events
    /// Gantree: decode(&self,&[bool]) -> Result<Vec<bool>> // 디코딩
    pub fn decode(&self, detection_events: &[bool]) -> DecohereResult<Vec<bool>> {
        let defects = self.defects_of(detection_events)?;
        let mut solver = SolverSerial::new(&self.initializer);
        self.solve(&mut solver, &defects)
    }

    /// Predict observable flips from fired detector indices
    pub fn decode_defects(&self, defects: &[usize]) -> DecohereResult<Vec<bool>> {
        let mut solver = SolverSerial::new(&self.initializer);
        self.solve(&mut solver, defects)
    }

    /// Decode many shots with one solver
    /// Gantree: decode_batch(&self,&[Vec<bool>]) -> Result<Vec<Vec<bool>>> // 일괄 디코딩
    pub fn decode_batch(&self, shots: &[Vec<bool>]) -> DecohereResult<Vec<Vec<bool>>> {
        let mut solver = SolverSerial::new(&self.initializer);
        shots
            .iter()
            .map(|events| {
                let defects = self.defects_of(events)?;
                self.solve(&mut solver, &defects)
            })
            .collect()
    }

    fn defects_of(&self, detection_events: &[bool]) -> DecohereResult<Vec<usize>> {
        if detection_events.len() != self.num_detectors() {
            return Err(DecohereError::DecodingFailed(format!(
                "expected {} detection events, got {}",
                self.num_detectors(),
                detection_events.len()
            )));
        }
        Ok(detection_events
            .iter()
            .enumerate()
            .filter_map(|(d, &fired)| fired.then_some(d))
            .collect())
    }

    fn check_defects(&self, defects: &[usize]) -> DecohereResult<()> {
        let mut parity = vec![false; self.component_has_boundary.len()];
        let mut seen = vec![false; self.num_detectors()];
        for &d in defects {
            if d >= self.num_detectors() {
                return Err(DecohereError::DecodingFailed(format!(
                    "detector D{} out of range for {} detectors",
                    d,
                    self.num_detectors()
                )));
            }
            if std::mem::replace(&mut seen[d], true) {
                return Err(DecohereError::DecodingFailed(format!(
                    "detector D{} listed twice",
                    d
                )));
            }
            if self.degrees[d] == 0 {
                return Err(DecohereError::DecodingFailed(format!(
                    "detector D{} fired but no error mechanism flips it",
                    d
                )));
            }
            parity[self.components[d]] ^= true;
        }
        if let Some(component) = parity
            .iter()
            .zip(&self.component_has_boundary)
            .position(|(&odd, &boundary)| odd && !boundary)
        {
            return Err(DecohereError::DecodingFailed(format!(
                "odd number of defects in boundary-free component {}",
                component
            )));
        }
        Ok(())
    }

    fn solve(&self, solver: &mut SolverSerial, defects: &[usize]) -> DecohereResult<Vec<bool>> {
        let mut flips = vec![false; self.num_observables()];
        if defects.is_empty() {
            return Ok(flips);
        }
        self.check_defects(defects)?;

        let pattern =
            SyndromePattern::new_vertices(defects.iter().map(|&d| d as VertexIndex).collect());
        solver.solve(&pattern);
        for edge_index in solver.subgraph() {
            for &observable in &self.graph.edges()[edge_index as usize].observables {
                flips[observable] ^= true;
            }
        }
        solver.clear();
        Ok(flips)
    }
}

impl fmt::Display for MatchingDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchingDecoder({})", self.graph)
    }
}

/// Connected components of the detector graph (boundary excluded)
fn connected_components(graph: &MatchingGraph) -> (Vec<usize>, Vec<bool>) {
    let n = graph.num_detectors();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    for edge in graph.edges() {
        if let Some(other) = edge.node2 {
            let (a, b) = (find(&mut parent, edge.node1), find(&mut parent, other));
            if a != b {
                parent[a] = b;
            }
        }
    }

    let mut ids = vec![usize::MAX; n];
    let mut components = Vec::with_capacity(n);
    let mut num_components = 0;
    for d in 0..n {
        let root = find(&mut parent, d);
        if ids[root] == usize::MAX {
            ids[root] = num_components;
            num_components += 1;
        }
        components.push(ids[root]);
    }

    let mut has_boundary = vec![false; num_components];
    for edge in graph.edges().iter().filter(|e| e.is_boundary()) {
        has_boundary[components[edge.node1]] = true;
    }
    (components, has_boundary)
}

// ============================================================================
// Decoder Builder
// ============================================================================

/// Build a matching decoder for a noisy circuit
/// Gantree: build_decoder(&Circuit,DecoderOptions) -> Result<MatchingDecoder> // 디코더 생성
///
/// Every failure of the model analysis surfaces as
/// `DecoderConstructionFailed`.
pub fn build_decoder(
    noisy_circuit: &Circuit,
    options: DecoderOptions,
) -> DecohereResult<MatchingDecoder> {
    let dem = ErrorAnalyzer::new(options)
        .analyze(noisy_circuit)
        .map_err(|err| match err {
            DecohereError::DecoderConstructionFailed(_) => err,
            other => DecohereError::DecoderConstructionFailed(other.to_string()),
        })?;
    let decoder = MatchingDecoder::from_dem(&dem)?;
    log::info!("built {}", decoder);
    Ok(decoder)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // three data qubits 0 2 4, parity checks read by 1 and 3
    const REP3: &str = "\
R 0 1 2 3 4
TICK
X_ERROR(0.1) 0 2 4
CX 0 1 2 3
TICK
CX 2 1 4 3
TICK
M 1 3
DETECTOR rec[-2]
DETECTOR rec[-1]
M 0 2 4
DETECTOR rec[-2] rec[-3] rec[-5]
DETECTOR rec[-1] rec[-2] rec[-4]
OBSERVABLE_INCLUDE(0) rec[-1]
";

    fn decoder() -> MatchingDecoder {
        build_decoder(&Circuit::parse(REP3).unwrap(), DecoderOptions::default()).unwrap()
    }

    #[test]
    fn test_options_default() {
        let options = DecoderOptions::default();
        assert!(options.allow_gauge_detectors);
        assert!(options.decompose_errors);
        assert!(!options.approximate_disjoint_errors);
    }

    #[test]
    fn test_decoder_shape() {
        let decoder = decoder();
        assert_eq!(decoder.num_detectors(), 4);
        assert_eq!(decoder.num_observables(), 1);
        assert!(decoder.graph().has_boundary_edges());
    }

    #[test]
    fn test_corrects_single_flips() {
        let decoder = decoder();
        assert_eq!(decoder.decode(&[false; 4]).unwrap(), vec![false]);
        // flip of data qubit 4 (the observable) trips only the second check
        assert_eq!(
            decoder.decode(&[false, true, false, false]).unwrap(),
            vec![true]
        );
        // flip of data qubit 0 trips only the first check
        assert_eq!(
            decoder.decode(&[true, false, false, false]).unwrap(),
            vec![false]
        );
        // flip of data qubit 2 trips both
        assert_eq!(
            decoder.decode(&[true, true, false, false]).unwrap(),
            vec![false]
        );
    }

    #[test]
    fn test_decode_batch_matches_single() {
        let decoder = decoder();
        let shots = vec![
            vec![false, true, false, false],
            vec![true, true, false, false],
            vec![false; 4],
        ];
        let batch = decoder.decode_batch(&shots).unwrap();
        for (shot, prediction) in shots.iter().zip(&batch) {
            assert_eq!(&decoder.decode(shot).unwrap(), prediction);
        }
    }

    #[test]
    fn test_decode_defects_rejects_repeats() {
        let decoder = decoder();
        assert_eq!(
            decoder.decode_defects(&[1]).unwrap(),
            decoder.decode(&[false, true, false, false]).unwrap()
        );
        assert!(matches!(
            decoder.decode_defects(&[0, 0]),
            Err(DecohereError::DecodingFailed(_))
        ));
        assert!(matches!(
            decoder.decode_defects(&[9]),
            Err(DecohereError::DecodingFailed(_))
        ));
    }

    #[test]
    fn test_wrong_shot_length() {
        let err = decoder().decode(&[true]).unwrap_err();
        assert!(matches!(err, DecohereError::DecodingFailed(_)));
    }

    #[test]
    fn test_isolated_detector() {
        // D1 is never flipped
        let circuit = Circuit::parse(
            "X_ERROR(0.1) 0\nM 0 1\nDETECTOR rec[-2]\nDETECTOR rec[-1]\n",
        )
        .unwrap();
        let decoder = build_decoder(&circuit, DecoderOptions::default()).unwrap();
        assert_eq!(decoder.num_detectors(), 2);
        assert!(decoder.decode(&[true, false]).is_ok());
        assert!(matches!(
            decoder.decode(&[false, true]),
            Err(DecohereError::DecodingFailed(_))
        ));
    }

    #[test]
    fn test_construction_errors_are_wrapped() {
        let circuit = Circuit::parse("M 0\nDETECTOR rec[-3]\n").unwrap();
        let err = build_decoder(&circuit, DecoderOptions::default()).unwrap_err();
        assert!(matches!(err, DecohereError::DecoderConstructionFailed(_)));
    }
}
