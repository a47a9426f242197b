//! Matching graph
//!
//! Gantree: L4_Matching → MatchingGraph
//!
//! Nodes are detectors plus one boundary node. Each graphlike component of
//! a detector error model becomes an edge weighted `ln((1-p)/p)`, so a
//! minimum-weight matching picks the most likely set of errors.

use crate::dem::DetectorErrorModel;
use decohere_core::constants::matching::{MIN_EDGE_PROBABILITY, MIN_INTEGER_WEIGHT, WEIGHT_RESOLUTION};
use decohere_core::error::{DecohereError, DecohereResult};
use decohere_core::types::Probability;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Edge between two detectors, or a detector and the boundary
/// Gantree: MatchingEdge // 매칭 간선
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingEdge {
    /// First detector
    pub node1: usize,
    /// Second detector (`None` for the boundary)
    pub node2: Option<usize>,
    /// Probability of the edge's error
    pub probability: f64,
    /// Observables flipped when the edge is in the matching
    pub observables: Vec<usize>,
}

impl MatchingEdge {
    /// Log-likelihood weight `ln((1-p)/p)` (negative above one half)
    /// Gantree: weight(&self) -> f64 // 가중치
    pub fn weight(&self) -> f64 {
        ((1.0 - self.probability) / self.probability).ln()
    }

    /// Even integer weight for the blossom solver, at least
    /// [`MIN_INTEGER_WEIGHT`]
    pub fn integer_weight(&self) -> isize {
        let half = (self.weight() * WEIGHT_RESOLUTION / 2.0).round() as isize;
        (half * 2).max(MIN_INTEGER_WEIGHT)
    }

    /// Check whether the edge ends on the boundary
    pub fn is_boundary(&self) -> bool {
        self.node2.is_none()
    }
}

/// Detector graph with boundary
/// Gantree: MatchingGraph // 매칭 그래프
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchingGraph {
    num_detectors: usize,
    num_observables: usize,
    edges: Vec<MatchingEdge>,
    #[serde(skip)]
    index: HashMap<(usize, Option<usize>), usize>,
}

impl MatchingGraph {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Empty graph over `num_detectors` detectors
    pub fn new(num_detectors: usize, num_observables: usize) -> Self {
        Self {
            num_detectors,
            num_observables,
            ..Self::default()
        }
    }

    /// Build from a detector error model
    /// Gantree: from_dem(&DetectorErrorModel) -> Result<Self> // DEM → 그래프
    ///
    /// Fails with `DecoderConstructionFailed` for a component touching more
    /// than two detectors.
    pub fn from_dem(dem: &DetectorErrorModel) -> DecohereResult<Self> {
        let mut graph = Self::new(dem.num_detectors, dem.num_observables);
        let mut undetectable = 0usize;
        for mechanism in &dem.mechanisms {
            for component in &mechanism.components {
                match component.detectors.as_slice() {
                    [] => undetectable += 1,
                    [d] => graph.add_edge(*d, None, mechanism.probability, &component.observables)?,
                    [a, b] => {
                        graph.add_edge(*a, Some(*b), mechanism.probability, &component.observables)?
                    }
                    many => {
                        return Err(DecohereError::DecoderConstructionFailed(format!(
                            "error({}) {} flips {} detectors; decompose errors to build a matching graph",
                            mechanism.probability,
                            component,
                            many.len()
                        )))
                    }
                }
            }
        }
        if undetectable > 0 {
            log::warn!(
                "dropped {} error components that flip no detector",
                undetectable
            );
        }
        Ok(graph)
    }

    /// Add an edge, merging it with a parallel one
    /// Gantree: add_edge(n1,n2,p,obs) -> Result<()> // 간선 추가/병합
    ///
    /// Parallel edges with equal observables combine as independent errors;
    /// otherwise the more likely one is kept.
    pub fn add_edge(
        &mut self,
        node1: usize,
        node2: Option<usize>,
        probability: f64,
        observables: &[usize],
    ) -> DecohereResult<()> {
        let probability = Probability::new(probability)?.value();
        for node in std::iter::once(node1).chain(node2) {
            if node >= self.num_detectors {
                return Err(DecohereError::DecoderConstructionFailed(format!(
                    "edge touches detector D{} but the model has {} detectors",
                    node, self.num_detectors
                )));
            }
        }
        if probability < MIN_EDGE_PROBABILITY {
            return Ok(());
        }
        if let Some(&obs) = observables.iter().find(|&&o| o >= self.num_observables) {
            self.num_observables = obs + 1;
        }

        let key = match node2 {
            Some(other) if other < node1 => (other, Some(node1)),
            _ => (node1, node2),
        };
        match self.index.get(&key).copied() {
            Some(i) => {
                let edge = &mut self.edges[i];
                if edge.observables == observables {
                    edge.probability = Probability::new(edge.probability)?
                        .xor(Probability::new(probability)?)
                        .value();
                } else if probability > edge.probability {
                    edge.probability = probability;
                    edge.observables = observables.to_vec();
                }
            }
            None => {
                self.index.insert(key, self.edges.len());
                self.edges.push(MatchingEdge {
                    node1: key.0,
                    node2: key.1,
                    probability,
                    observables: observables.to_vec(),
                });
            }
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of detectors
    pub fn num_detectors(&self) -> usize {
        self.num_detectors
    }

    /// Number of observables
    pub fn num_observables(&self) -> usize {
        self.num_observables
    }

    /// Number of nodes including the boundary
    pub fn num_nodes(&self) -> usize {
        self.num_detectors + 1
    }

    /// Index of the boundary node
    pub fn boundary(&self) -> usize {
        self.num_detectors
    }

    /// All edges
    pub fn edges(&self) -> &[MatchingEdge] {
        &self.edges
    }

    /// Number of edges
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Edge between two nodes, if any
    pub fn edge(&self, node1: usize, node2: Option<usize>) -> Option<&MatchingEdge> {
        let key = match node2 {
            Some(other) if other < node1 => (other, Some(node1)),
            _ => (node1, node2),
        };
        self.index.get(&key).map(|&i| &self.edges[i])
    }

    /// Check whether any edge reaches the boundary
    pub fn has_boundary_edges(&self) -> bool {
        self.edges.iter().any(MatchingEdge::is_boundary)
    }

    /// Number of edges at each detector
    /// Gantree: degrees(&self) -> Vec<usize> // 차수
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.num_detectors];
        for edge in &self.edges {
            degrees[edge.node1] += 1;
            if let Some(other) = edge.node2 {
                degrees[other] += 1;
            }
        }
        degrees
    }
}

impl fmt::Display for MatchingGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MatchingGraph: {} detectors, {} observables, {} edges",
            self.num_detectors,
            self.num_observables,
            self.edges.len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
