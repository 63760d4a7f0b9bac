use serde::{Deserialize, Serialize};

use crate::logic::features::{
    FinalResult, Gender, InternetAccess, ParentEducation, StudentFeatures,
};

/// One generated student. Field order matches the dataset header.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub student_id: String,
    pub gender: Gender,
    pub age: u32,
    pub attendance_percentage: f64,
    pub hours_studied: f64,
    pub previous_score: f64,
    pub parent_education: ParentEducation,
    pub internet_access: InternetAccess,
    pub assignments_submitted: u32,
    pub internal_marks: f64,
    pub final_result: FinalResult,
}

impl StudentRecord {
    /// Model features of this record (id and label dropped)
    pub fn features(&self) -> StudentFeatures {
        StudentFeatures {
            gender: self.gender.to_string(),
            age: self.age,
            attendance_percentage: self.attendance_percentage,
            hours_studied: self.hours_studied,
            previous_score: self.previous_score,
            parent_education: self.parent_education.to_string(),
            internet_access: self.internet_access.to_string(),
            assignments_submitted: self.assignments_submitted,
            internal_marks: self.internal_marks,
        }
    }
}

/// One dataset row as read for training.
///
/// Numeric cells may be empty (missing); categorical cells and the label are
/// kept as raw strings for the encoders.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub student_id: String,
    pub gender: String,
    pub age: Option<f64>,
    pub attendance_percentage: Option<f64>,
    pub hours_studied: Option<f64>,
    pub previous_score: Option<f64>,
    pub parent_education: String,
    pub internet_access: String,
    pub assignments_submitted: Option<f64>,
    pub internal_marks: Option<f64>,
    pub final_result: String,
}

impl DatasetRow {
    /// Numeric cells in layout order
    pub fn numeric_cells(&self) -> [Option<f64>; 6] {
        [
            self.age,
            self.attendance_percentage,
            self.hours_studied,
            self.previous_score,
            self.assignments_submitted,
            self.internal_marks,
        ]
    }

    /// Categorical value by column name
    pub fn categorical(&self, column: &str) -> Option<&str> {
        match column {
            "gender" => Some(&self.gender),
            "parent_education" => Some(&self.parent_education),
            "internet_access" => Some(&self.internet_access),
            _ => None,
        }
    }
}

impl From<&StudentRecord> for DatasetRow {
    fn from(record: &StudentRecord) -> Self {
        Self {
            student_id: record.student_id.clone(),
            gender: record.gender.to_string(),
            age: Some(record.age as f64),
            attendance_percentage: Some(record.attendance_percentage),
            hours_studied: Some(record.hours_studied),
            previous_score: Some(record.previous_score),
            parent_education: record.parent_education.to_string(),
            internet_access: record.internet_access.to_string(),
            assignments_submitted: Some(record.assignments_submitted as f64),
            internal_marks: Some(record.internal_marks),
            final_result: record.final_result.to_string(),
        }
    }
}
