//! Dataset Module - synthetic student data
//!
//! Generates labeled student records, writes them as CSV and reads them back
//! for training.

pub mod generator;
pub mod reader;
pub mod record;
pub mod writer;


use serde::Serialize;

pub use generator::{generate, GeneratorConfig, GeneratorProfile};
pub use reader::load_csv_file;
pub use record::{DatasetRow, StudentRecord};
pub use writer::DatasetWriter;

use crate::logic::features::FinalResult;

/// Quick statistics printed after generation
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub pass: usize,
    pub fail: usize,
    pub mean_attendance: f64,
    pub mean_hours_studied: f64,
    pub mean_previous_score: f64,
    pub mean_internal_marks: f64,
}

impl DatasetSummary {
    pub fn from_records(records: &[StudentRecord]) -> Self {
        let n = records.len().max(1) as f64;
        let mean = |f: fn(&StudentRecord) -> f64| records.iter().map(f).sum::<f64>() / n;
        let pass = records
            .iter()
            .filter(|r| r.final_result == FinalResult::Pass)
            .count();

        Self {
            records: records.len(),
            pass,
            fail: records.len() - pass,
            mean_attendance: mean(|r| r.attendance_percentage),
            mean_hours_studied: mean(|r| r.hours_studied),
            mean_previous_score: mean(|r| r.previous_score),
            mean_internal_marks: mean(|r| r.internal_marks),
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.records == 0 {
            0.0
        } else {
            self.pass as f64 / self.records as f64
        }
    }
}
