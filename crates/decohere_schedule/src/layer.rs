//! Layer segmentation
//!
//! Gantree: L3_Schedule → LayerSegmenter
//!
//! Splits a circuit into synchronous layers separated by time-boundary
//! markers. While walking the circuit every active operation is checked:
//! it must have a known duration, share that duration with the rest of its
//! layer, and not touch a qubit already used in the layer.
//!
//! The segmenter is an iterator of [`LayerEvent`]s, holding only the state
//! of the layer being built.

use decohere_core::circuit::Circuit;
use decohere_core::dialect::{OperationClasses, OperationKind};
use decohere_core::error::{DecohereError, DecohereResult};
use decohere_core::instruction::Instruction;
use decohere_core::types::{Duration, QubitId};
use decohere_noise::GateDurations;
use std::collections::BTreeSet;

/// A sealed layer
/// Gantree: Layer // 동기 레이어
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layer {
    /// Position among all layers of the circuit
    pub index: usize,

    /// Common duration of the layer's operations (`None` for an empty layer)
    /// Gantree: dwell: Option<Duration> // 레이어 시간
    pub dwell: Option<Duration>,

    /// Qubits targeted by the layer's operations
    /// Gantree: active: BTreeSet<QubitId> // 활성 큐비트
    pub active: BTreeSet<QubitId>,

    /// Number of active operations
    pub num_operations: usize,
}

impl Layer {
    /// Check whether the layer holds no active operation
    pub fn is_empty(&self) -> bool {
        self.num_operations == 0
    }

    /// Dwell time, zero for an empty layer
    pub fn duration(&self) -> Duration {
        self.dwell.unwrap_or(0.0)
    }
}

/// One step of the segmentation
/// Gantree: LayerEvent // 세그먼트 이벤트
#[derive(Debug, Clone, PartialEq)]
pub enum LayerEvent<'c> {
    /// Active operation added to the current layer, with its duration
    Operation(&'c Instruction, f64),

    /// Annotation (or other timeless instruction) passed through
    Passthrough(&'c Instruction),

    /// Layer sealed by a time boundary, or by the end of the circuit
    /// (`marker` is `None` then)
    Sealed {
        /// The finished layer
        layer: Layer,
        /// The time-boundary instruction that closed it
        marker: Option<&'c Instruction>,
    },
}

/// Layer segmenter configuration
/// Gantree: LayerSegmenter // 레이어 분할기
#[derive(Debug, Clone, Copy)]
pub struct LayerSegmenter<'a> {
    durations: &'a GateDurations,
    classes: &'a OperationClasses,
}

impl<'a> LayerSegmenter<'a> {
    /// Create a segmenter
    /// Gantree: new(&durations,&classes) -> Self // 생성자
    pub fn new(durations: &'a GateDurations, classes: &'a OperationClasses) -> Self {
        Self { durations, classes }
    }

    /// Operation classes in use
    pub fn classes(&self) -> &'a OperationClasses {
        self.classes
    }

    /// Walk a circuit
    /// Gantree: events(&self,&Circuit) -> LayerEvents // 이벤트 반복자
    pub fn events<'c>(&self, circuit: &'c Circuit) -> LayerEvents<'a, 'c> {
        LayerEvents {
            segmenter: *self,
            instructions: circuit.instructions().iter(),
            current: Layer::default(),
            done: false,
        }
    }

    /// Collect all sealed layers of a circuit
    /// Gantree: layers(&self,&Circuit) -> Result<Vec<Layer>> // 레이어 목록
    pub fn layers(&self, circuit: &Circuit) -> DecohereResult<Vec<Layer>> {
        let mut layers = Vec::new();
        for event in self.events(circuit) {
            if let LayerEvent::Sealed { layer, .. } = event? {
                layers.push(layer);
            }
        }
        Ok(layers)
    }
}

/// Iterator over the [`LayerEvent`]s of one circuit
/// Gantree: LayerEvents // 반복자 상태
#[derive(Debug)]
pub struct LayerEvents<'a, 'c> {
    segmenter: LayerSegmenter<'a>,
    instructions: std::slice::Iter<'c, Instruction>,
    current: Layer,
    done: bool,
}

impl<'a, 'c> LayerEvents<'a, 'c> {
    fn seal(&mut self) -> Layer {
        let next = Layer {
            index: self.current.index + 1,
            ..Layer::default()
        };
        std::mem::replace(&mut self.current, next)
    }

    /// Add an active operation to the current layer
    /// Gantree: admit(inst) -> Result<f64> // 검증 + 추가
    fn admit(&mut self, inst: &Instruction) -> DecohereResult<f64> {
        let duration = self.segmenter.durations.duration(&inst.name)?;

        if let Some(layer_duration) = self.current.dwell {
            if layer_duration != duration {
                return Err(DecohereError::InconsistentLayerDuration {
                    name: inst.name.clone(),
                    duration,
                    layer_duration,
                });
            }
        }

        for qubit in inst.qubits() {
            if !self.current.active.insert(qubit) {
                return Err(DecohereError::QubitConflict {
                    qubit,
                    name: inst.name.clone(),
                });
            }
        }

        self.current.dwell = Some(duration);
        self.current.num_operations += 1;
        Ok(duration)
    }
}

impl<'a, 'c> Iterator for LayerEvents<'a, 'c> {
    type Item = DecohereResult<LayerEvent<'c>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(inst) = self.instructions.next() else {
            self.done = true;
            if self.current.is_empty() {
                return None;
            }
            let layer = self.seal();
            return Some(Ok(LayerEvent::Sealed {
                layer,
                marker: None,
            }));
        };

        let event = match self.segmenter.classes.classify(&inst.name) {
            OperationKind::TimeBoundary => {
                let layer = self.seal();
                log::debug!(
                    "sealed layer {}: {} ops, dwell {:?}",
                    layer.index,
                    layer.num_operations,
                    layer.dwell
                );
                LayerEvent::Sealed {
                    layer,
                    marker: Some(inst),
                }
            }
            OperationKind::Annotation | OperationKind::Stochastic => LayerEvent::Passthrough(inst),
            OperationKind::Measurement | OperationKind::Active => match self.admit(inst) {
                Ok(duration) => LayerEvent::Operation(inst, duration),
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            },
        };
        Some(Ok(event))
    }
}

// ============================================================================
// Tests
// ============================================================================
