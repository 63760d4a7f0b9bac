//! Student form model

use serde::{Deserialize, Serialize};
use validator::Validate;

use predictor_core::StudentFeatures;

/// The nine fields posted by the form (urlencoded) or the JSON API.
///
/// Ranges are checked here for a friendly message; the predictor checks
/// them again at the preprocessing boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StudentForm {
    #[validate(length(min = 1, message = "select a gender"))]
    pub gender: String,

    #[validate(range(min = 18, max = 25, message = "must be between 18 and 25"))]
    pub age: u32,

    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub attendance_percentage: f64,

    #[validate(range(min = 0.0, max = 50.0, message = "must be between 0 and 50"))]
    pub hours_studied: f64,

    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub previous_score: f64,

    #[validate(length(min = 1, message = "select an education level"))]
    pub parent_education: String,

    #[validate(length(min = 1, message = "select Yes or No"))]
    pub internet_access: String,

    #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
    pub assignments_submitted: u32,

    #[validate(range(min = 0.0, max = 40.0, message = "must be between 0 and 40"))]
    pub internal_marks: f64,
}

impl Default for StudentForm {
    fn default() -> Self {
        StudentFeatures::default().into()
    }
}

impl From<StudentFeatures> for StudentForm {
    fn from(f: StudentFeatures) -> Self {
        Self {
            gender: f.gender,
            age: f.age,
            attendance_percentage: f.attendance_percentage,
            hours_studied: f.hours_studied,
            previous_score: f.previous_score,
            parent_education: f.parent_education,
            internet_access: f.internet_access,
            assignments_submitted: f.assignments_submitted,
            internal_marks: f.internal_marks,
        }
    }
}

impl From<StudentForm> for StudentFeatures {
    fn from(f: StudentForm) -> Self {
        Self {
            gender: f.gender,
            age: f.age,
            attendance_percentage: f.attendance_percentage,
            hours_studied: f.hours_studied,
            previous_score: f.previous_score,
            parent_education: f.parent_education,
            internet_access: f.internet_access,
            assignments_submitted: f.assignments_submitted,
            internal_marks: f.internal_marks,
        }
    }
}

impl StudentForm {
    /// (label, value) pairs for the input echo
    pub fn echo(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Gender", self.gender.clone()),
            ("Age", self.age.to_string()),
            ("Attendance (%)", format!("{:.1}", self.attendance_percentage)),
            ("Hours Studied (per week)", format!("{:.1}", self.hours_studied)),
            ("Previous Score", format!("{:.1}", self.previous_score)),
            ("Parent Education", self.parent_education.clone()),
            ("Internet Access", self.internet_access.clone()),
            ("Assignments Submitted", self.assignments_submitted.to_string()),
            ("Internal Marks", format!("{:.1}", self.internal_marks)),
        ]
    }
}
