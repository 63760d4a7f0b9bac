//! Student schema - typed categories and the nine-field feature record

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::layout::{
    NumericRange, AGE, ASSIGNMENTS, ATTENDANCE, HOURS_STUDIED, INTERNAL_MARKS, PREVIOUS_SCORE,
};
use crate::error::DataError;

// ============================================================================
// CATEGORIES
// ============================================================================

macro_rules! category_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// All variants in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(format!("unknown {} '{}'", stringify!($name), other)),
                }
            }
        }
    };
}

category_enum! {
    /// Student gender
    Gender { Male => "Male", Female => "Female" }
}

category_enum! {
    /// Highest education level of a parent, ordered low → high
    ParentEducation {
        HighSchool => "High School",
        SomeCollege => "Some College",
        Bachelors => "Bachelor's",
        Masters => "Master's",
        PhD => "PhD",
    }
}

category_enum! {
    /// Home internet access
    InternetAccess { Yes => "Yes", No => "No" }
}

category_enum! {
    /// Binary academic outcome
    FinalResult { Pass => "Pass", Fail => "Fail" }
}

impl ParentEducation {
    /// Graduate degrees earn a bonus in the synthetic outcome formula
    pub fn is_graduate(&self) -> bool {
        matches!(self, ParentEducation::Masters | ParentEducation::PhD)
    }
}

// ============================================================================
// FEATURE RECORD
// ============================================================================

/// The nine model features of one student, as they arrive at the
/// preprocessing boundary.
///
/// Categorical fields stay strings: whether a value is acceptable is decided
/// by the label encoders fit at training time, not by this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentFeatures {
    pub gender: String,
    pub age: u32,
    pub attendance_percentage: f64,
    pub hours_studied: f64,
    pub previous_score: f64,
    pub parent_education: String,
    pub internet_access: String,
    pub assignments_submitted: u32,
    pub internal_marks: f64,
}

impl StudentFeatures {
    /// Numeric fields paired with their allowed range, in layout order
    pub fn numeric_fields(&self) -> [(NumericRange, f64); 6] {
        [
            (AGE, self.age as f64),
            (ATTENDANCE, self.attendance_percentage),
            (HOURS_STUDIED, self.hours_studied),
            (PREVIOUS_SCORE, self.previous_score),
            (ASSIGNMENTS, self.assignments_submitted as f64),
            (INTERNAL_MARKS, self.internal_marks),
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

    /// Check every numeric field against its range
    pub fn validate_ranges(&self) -> Result<(), DataError> {
        for (range, value) in self.numeric_fields() {
            if !range.contains(value) {
                return Err(DataError::OutOfRange {
                    field: range.name,
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

impl Default for StudentFeatures {
    /// Mid-range defaults used to prefill the form
    fn default() -> Self {
        Self {
            gender: Gender::Male.to_string(),
            age: 21,
            attendance_percentage: 75.0,
            hours_studied: 15.0,
            previous_score: 65.0,
            parent_education: ParentEducation::HighSchool.to_string(),
            internet_access: InternetAccess::Yes.to_string(),
            assignments_submitted: 8,
            internal_marks: 28.0,
        }
    }
}
