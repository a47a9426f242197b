//! Detector error model sampling
//!
//! Gantree: L4_Matching → DemSampler
//!
//! Fires every mechanism of a model independently and reports the
//! resulting detection events and observable flips. Seeded, so a run is
//! reproducible.

use crate::dem::DetectorErrorModel;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// One sampled shot
/// Gantree: Shot // 샘플 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shot {
    /// Detection event per detector
    pub detectors: Vec<bool>,
    /// Flip per logical observable
    pub observables: Vec<bool>,
}

impl Shot {
    /// Number of fired detectors
    pub fn num_fired(&self) -> usize {
        self.detectors.iter().filter(|&&fired| fired).count()
    }
}

/// Sampler over a detector error model
/// Gantree: DemSampler // DEM 샘플러
#[derive(Debug, Clone)]
pub struct DemSampler<'a> {
    dem: &'a DetectorErrorModel,
    rng: ChaCha8Rng,
}

impl<'a> DemSampler<'a> {
    /// Create a sampler with a fixed seed
    /// Gantree: new(&dem,seed) -> Self // 생성자
    pub fn new(dem: &'a DetectorErrorModel, seed: u64) -> Self {
        Self {
            dem,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw one shot
    /// Gantree: sample(&mut self) -> Shot // 1회 샘플
    pub fn sample(&mut self) -> Shot {
        let mut shot = Shot {
            detectors: vec![false; self.dem.num_detectors],
            observables: vec![false; self.dem.num_observables],
        };
        for mechanism in &self.dem.mechanisms {
            if !self.rng.gen_bool(mechanism.probability.clamp(0.0, 1.0)) {
                continue;
            }
            for component in &mechanism.components {
                for &d in &component.detectors {
                    shot.detectors[d] ^= true;
                }
                for &o in &component.observables {
                    shot.observables[o] ^= true;
                }
            }
        }
        shot
    }

    /// Draw `num_shots` shots
    pub fn sample_batch(&mut self, num_shots: usize) -> Vec<Shot> {
        (0..num_shots).map(|_| self.sample()).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
