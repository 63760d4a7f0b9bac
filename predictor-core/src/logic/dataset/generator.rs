//! Synthetic student dataset generation.
//!
//! Each feature is sampled independently from a fixed marginal distribution,
//! clipped to its valid range, then a weighted composite of five normalized
//! features plus noise and two categorical bonuses is thresholded into
//! Pass/Fail.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Exp, Gamma, Normal, Poisson};
use serde::{Deserialize, Serialize};

use super::record::StudentRecord;
use crate::constants::{DEFAULT_RECORD_COUNT, DEFAULT_SEED};
use crate::error::DatasetError;
use crate::logic::features::layout::{
    NumericRange, AGE, ASSIGNMENTS, ATTENDANCE, HOURS_STUDIED, INTERNAL_MARKS, PREVIOUS_SCORE,
};
use crate::logic::features::{FinalResult, Gender, InternetAccess, ParentEducation};

// ============================================================================
// PARAMETERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParams {
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaParams {
    pub shape: f64,
    pub scale: f64,
}

/// How `assignments_submitted` is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AssignmentSampling {
    Poisson { lambda: f64 },
    /// `floor(Exp(rate) * factor)`
    ScaledExponential { rate: f64, factor: f64 },
}

/// Weights of the composite score that decides Pass/Fail
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeFormula {
    pub attendance_weight: f64,
    pub hours_weight: f64,
    pub previous_score_weight: f64,
    pub internal_marks_weight: f64,
    pub assignments_weight: f64,
    pub noise_weight: f64,
    pub internet_bonus: f64,
    pub graduate_parent_bonus: f64,
    pub pass_threshold: f64,
}

impl Default for OutcomeFormula {
    fn default() -> Self {
        Self {
            attendance_weight: 0.15,
            hours_weight: 0.20,
            previous_score_weight: 0.25,
            internal_marks_weight: 0.20,
            assignments_weight: 0.10,
            noise_weight: 0.10,
            internet_bonus: 0.05,
            graduate_parent_bonus: 0.05,
            pass_threshold: 0.6,
        }
    }
}

impl OutcomeFormula {
    /// Composite score for one record; `noise` is a uniform draw in [0, 1)
    pub fn score(&self, record: &StudentRecord, noise: f64) -> f64 {
        let mut score = self.attendance_weight * (record.attendance_percentage / ATTENDANCE.max)
            + self.hours_weight * (record.hours_studied / HOURS_STUDIED.max)
            + self.previous_score_weight * (record.previous_score / PREVIOUS_SCORE.max)
            + self.internal_marks_weight * (record.internal_marks / INTERNAL_MARKS.max)
            + self.assignments_weight * (record.assignments_submitted as f64 / ASSIGNMENTS.max)
            + self.noise_weight * noise;

        if record.internet_access == InternetAccess::Yes {
            score += self.internet_bonus;
        }
        if record.parent_education.is_graduate() {
            score += self.graduate_parent_bonus;
        }
        score
    }

    pub fn classify(&self, score: f64) -> FinalResult {
        if score >= self.pass_threshold {
            FinalResult::Pass
        } else {
            FinalResult::Fail
        }
    }
}

/// Named parameter sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
pub enum GeneratorProfile {
    /// Weighted gender, Poisson assignments
    #[default]
    Default,
    /// Uniform gender, scaled-exponential assignments
    Lightweight,
}

/// Full generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub records: usize,
    pub seed: u64,
    /// Male, Female
    pub gender_weights: [f64; 2],
    pub age: NormalParams,
    pub attendance: NormalParams,
    pub hours_studied: GammaParams,
    pub previous_score: NormalParams,
    /// In `ParentEducation::ALL` order
    pub education_weights: [f64; 5],
    /// Yes, No
    pub internet_weights: [f64; 2],
    pub assignments: AssignmentSampling,
    pub internal_marks: NormalParams,
    pub outcome: OutcomeFormula,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            records: DEFAULT_RECORD_COUNT,
            seed: DEFAULT_SEED,
            gender_weights: [0.52, 0.48],
            age: NormalParams { mean: 21.0, std_dev: 2.0 },
            attendance: NormalParams { mean: 75.0, std_dev: 15.0 },
            hours_studied: GammaParams { shape: 2.0, scale: 5.0 },
            previous_score: NormalParams { mean: 65.0, std_dev: 15.0 },
            education_weights: [0.25, 0.20, 0.30, 0.20, 0.05],
            internet_weights: [0.85, 0.15],
            assignments: AssignmentSampling::Poisson { lambda: 8.0 },
            internal_marks: NormalParams { mean: 28.0, std_dev: 8.0 },
            outcome: OutcomeFormula::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn for_profile(profile: GeneratorProfile) -> Self {
        match profile {
            GeneratorProfile::Default => Self::default(),
            GeneratorProfile::Lightweight => Self {
                gender_weights: [0.5, 0.5],
                assignments: AssignmentSampling::ScaledExponential { rate: 0.125, factor: 8.0 },
                ..Self::default()
            },
        }
    }

    pub fn with_records(mut self, records: usize) -> Self {
        self.records = records;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject parameter sets the samplers cannot handle
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.records == 0 {
            return Err(invalid("record count must be >= 1"));
        }
        for (name, p) in [
            ("age", self.age),
            ("attendance", self.attendance),
            ("previous_score", self.previous_score),
            ("internal_marks", self.internal_marks),
        ] {
            if !(p.mean.is_finite() && p.std_dev.is_finite() && p.std_dev > 0.0) {
                return Err(invalid(format!("{name}: std_dev must be finite and > 0")));
            }
        }
        let g = self.hours_studied;
        if !(g.shape.is_finite() && g.scale.is_finite() && g.shape > 0.0 && g.scale > 0.0) {
            return Err(invalid("hours_studied: gamma shape and scale must be > 0"));
        }
        match self.assignments {
            AssignmentSampling::Poisson { lambda } if !(lambda.is_finite() && lambda > 0.0) => {
                return Err(invalid("assignments: poisson lambda must be > 0"));
            }
            AssignmentSampling::ScaledExponential { rate, factor }
                if !(rate.is_finite() && rate > 0.0 && factor.is_finite() && factor > 0.0) =>
            {
                return Err(invalid("assignments: exponential rate and factor must be > 0"));
            }
            _ => {}
        }
        let t = self.outcome.pass_threshold;
        if !(t.is_finite() && t > 0.0) {
            return Err(invalid("pass threshold must be finite and > 0"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> DatasetError {
    DatasetError::InvalidParameter(msg.into())
}

// ============================================================================
// SAMPLING
// ============================================================================

enum AssignmentSampler {
    Poisson(Poisson<f64>),
    ScaledExponential(Exp<f64>, f64),
}

struct Samplers {
    gender: WeightedIndex<f64>,
    age: Normal<f64>,
    attendance: Normal<f64>,
    hours: Gamma<f64>,
    previous: Normal<f64>,
    education: WeightedIndex<f64>,
    internet: WeightedIndex<f64>,
    assignments: AssignmentSampler,
    internal: Normal<f64>,
}

impl Samplers {
    fn new(config: &GeneratorConfig) -> Result<Self, DatasetError> {
        let normal = |name: &str, p: NormalParams| {
            Normal::new(p.mean, p.std_dev).map_err(|e| invalid(format!("{name}: {e}")))
        };
        let weighted = |name: &str, w: &[f64]| {
            WeightedIndex::new(w).map_err(|e| invalid(format!("{name} weights: {e}")))
        };

        let assignments = match config.assignments {
            AssignmentSampling::Poisson { lambda } => AssignmentSampler::Poisson(
                Poisson::new(lambda).map_err(|e| invalid(format!("assignments: {e}")))?,
            ),
            AssignmentSampling::ScaledExponential { rate, factor } => {
                AssignmentSampler::ScaledExponential(
                    Exp::new(rate).map_err(|e| invalid(format!("assignments: {e}")))?,
                    factor,
                )
            }
        };

        Ok(Self {
            gender: weighted("gender", &config.gender_weights)?,
            age: normal("age", config.age)?,
            attendance: normal("attendance", config.attendance)?,
            hours: Gamma::new(config.hours_studied.shape, config.hours_studied.scale)
                .map_err(|e| invalid(format!("hours_studied: {e}")))?,
            previous: normal("previous_score", config.previous_score)?,
            education: weighted("parent_education", &config.education_weights)?,
            internet: weighted("internet_access", &config.internet_weights)?,
            assignments,
            internal: normal("internal_marks", config.internal_marks)?,
        })
    }

    fn sample(&self, index: usize, outcome: &OutcomeFormula, rng: &mut StdRng) -> StudentRecord {
        let gender = Gender::ALL[self.gender.sample(rng)];
        // Truncate toward zero before clipping, like an integer cast of the draw.
        let age = clip(self.age.sample(rng).trunc(), AGE) as u32;
        let attendance_percentage = round2(clip(self.attendance.sample(rng), ATTENDANCE));
        let hours_studied = round2(clip(self.hours.sample(rng), HOURS_STUDIED));
        let previous_score = round2(clip(self.previous.sample(rng), PREVIOUS_SCORE));
        let parent_education = ParentEducation::ALL[self.education.sample(rng)];
        let internet_access = InternetAccess::ALL[self.internet.sample(rng)];
        let raw_assignments = match &self.assignments {
            AssignmentSampler::Poisson(p) => Distribution::<f64>::sample(p, rng),
            AssignmentSampler::ScaledExponential(e, factor) => (e.sample(rng) * factor).floor(),
        };
        let assignments_submitted = clip(raw_assignments, ASSIGNMENTS) as u32;
        let internal_marks = round2(clip(self.internal.sample(rng), INTERNAL_MARKS));

        let mut record = StudentRecord {
            student_id: format!("STU{:04}", index),
            gender,
            age,
            attendance_percentage,
            hours_studied,
            previous_score,
            parent_education,
            internet_access,
            assignments_submitted,
            internal_marks,
            final_result: FinalResult::Fail,
        };

        let noise: f64 = rng.gen();
        record.final_result = outcome.classify(outcome.score(&record, noise));
        record
    }
}

fn clip(value: f64, range: NumericRange) -> f64 {
    value.clamp(range.min, range.max)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generate `config.records` students, ids `STU0001..`
///
/// Same config (including seed) ⇒ identical records.
pub fn generate(config: &GeneratorConfig) -> Result<Vec<StudentRecord>, DatasetError> {
    config.validate()?;
    let samplers = Samplers::new(config)?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let records: Vec<StudentRecord> = (1..=config.records)
        .map(|i| samplers.sample(i, &config.outcome, &mut rng))
        .collect();

    log::debug!(
        "Generated {} records (seed {}, {} pass)",
        records.len(),
        config.seed,
        records.iter().filter(|r| r.final_result == FinalResult::Pass).count()
    );

    Ok(records)
}
