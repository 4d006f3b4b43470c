//! Simulated sensor readings for a herd.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use yieldwatch::{Reading, ReadingSeries, Subject, SubjectReadings};

use crate::config::SimulationConfig;

/// Produces quantities oscillating around a fixed mean.
pub struct SensorSimulator {
    mean: i64,
    max_oscillation: i64,
    rng: StdRng,
}

impl SensorSimulator {
    /// `max_oscillation` is an exclusive bound and is clamped to at least 1.
    pub fn new(mean: i64, max_oscillation: i64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mean,
            max_oscillation: max_oscillation.max(1),
            rng,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.mean_production, config.max_oscillation, config.seed)
    }

    /// Generate `count` readings: `mean ± offset`, offset in `0..max_oscillation`.
    pub fn generate(&mut self, count: usize) -> ReadingSeries {
        (0..count)
            .map(|_| {
                let offset = self.rng.gen_range(0..self.max_oscillation);
                let quantity = if self.rng.gen_bool(0.5) {
                    self.mean + offset
                } else {
                    self.mean - offset
                };
                Reading::new(quantity)
            })
            .collect()
    }
}

/// Build the subject→readings mapping described by `config`.
///
/// Ids are 1-based and zero-padded to a common width so that id order and
/// numeric order agree.
pub fn build_herd(config: &SimulationConfig, sensor: &mut SensorSimulator) -> SubjectReadings {
    let width = config.subjects.to_string().len();
    let herd: SubjectReadings = (0..config.subjects)
        .map(|i| {
            let subject = Subject::new(format!("{:0width$}", i + 1), config.name_for(i));
            (subject, sensor.generate(config.readings_per_subject))
        })
        .collect();

    tracing::debug!(
        subjects = herd.len(),
        readings = config.readings_per_subject,
        "generated herd"
    );
    herd
}
