//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema shared by training and inference.**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The version and layout hash are written into the artifact manifest, so a
//! model trained against another layout is rejected at load time.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the model input
pub const FEATURE_LAYOUT: &[&str] = &[
    "gender",                // 0: categorical
    "age",                   // 1: integer 18-25
    "attendance_percentage", // 2: 0-100
    "hours_studied",         // 3: hours per week, 0-50
    "previous_score",        // 4: 0-100
    "parent_education",      // 5: categorical
    "internet_access",       // 6: categorical
    "assignments_submitted", // 7: integer 0-10
    "internal_marks",        // 8: 0-40
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 9;

/// Columns that go through a label encoder
pub const CATEGORICAL_COLUMNS: [&str; 3] = ["gender", "parent_education", "internet_access"];

/// Identifier column (dropped before preprocessing)
pub const ID_COLUMN: &str = "student_id";

/// Target column
pub const TARGET_COLUMN: &str = "final_result";

/// Dataset CSV header, in file order
pub const DATASET_HEADER: [&str; 11] = [
    "student_id",
    "gender",
    "age",
    "attendance_percentage",
    "hours_studied",
    "previous_score",
    "parent_education",
    "internet_access",
    "assignments_submitted",
    "internal_marks",
    "final_result",
];

// ============================================================================
// NUMERIC RANGES
// ============================================================================

/// Valid range of a numeric feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub integer: bool,
}

pub const AGE: NumericRange = NumericRange { name: "age", min: 18.0, max: 25.0, integer: true };
pub const ATTENDANCE: NumericRange =
    NumericRange { name: "attendance_percentage", min: 0.0, max: 100.0, integer: false };
pub const HOURS_STUDIED: NumericRange =
    NumericRange { name: "hours_studied", min: 0.0, max: 50.0, integer: false };
pub const PREVIOUS_SCORE: NumericRange =
    NumericRange { name: "previous_score", min: 0.0, max: 100.0, integer: false };
pub const ASSIGNMENTS: NumericRange =
    NumericRange { name: "assignments_submitted", min: 0.0, max: 10.0, integer: true };
pub const INTERNAL_MARKS: NumericRange =
    NumericRange { name: "internal_marks", min: 0.0, max: 40.0, integer: false };

/// Numeric features, in layout order
pub const NUMERIC_RANGES: [NumericRange; 6] =
    [AGE, ATTENDANCE, HOURS_STUDIED, PREVIOUS_SCORE, ASSIGNMENTS, INTERNAL_MARKS];

impl NumericRange {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 hash of the feature layout
/// Used to detect layout mismatches between artifacts and code
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Check if layout is compatible (same version, same hash)
    pub fn is_compatible(&self) -> bool {
        self.version == FEATURE_VERSION && self.hash == layout_hash()
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// FEATURE NAME LOOKUP
// ============================================================================

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 9);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_header_contains_layout() {
        assert_eq!(DATASET_HEADER[0], ID_COLUMN);
        assert_eq!(DATASET_HEADER[10], TARGET_COLUMN);
        assert_eq!(&DATASET_HEADER[1..10], FEATURE_LAYOUT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
        assert_eq!(LayoutInfo::current().hash, layout_hash());
    }

    #[test]
    fn test_categorical_columns_are_features() {
        for col in CATEGORICAL_COLUMNS {
            assert!(FEATURE_LAYOUT.contains(&col), "{col} missing from layout");
        }
    }

    #[test]
    fn test_numeric_ranges_follow_layout_order() {
        let positions: Vec<usize> = NUMERIC_RANGES
            .iter()
            .map(|r| FEATURE_LAYOUT.iter().position(|&n| n == r.name).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert_eq!(NUMERIC_RANGES.len() + CATEGORICAL_COLUMNS.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_feature_name() {
        assert_eq!(feature_name(0), Some("gender"));
        assert_eq!(feature_name(8), Some("internal_marks"));
        assert_eq!(feature_name(5), Some("parent_education"));
        assert_eq!(feature_name(100), None);
    }

    #[test]
    fn test_range_contains() {
        assert!(AGE.contains(18.0));
        assert!(AGE.contains(25.0));
        assert!(!AGE.contains(26.0));
        assert!(!ATTENDANCE.contains(f64::NAN));
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);
        assert!(info.is_compatible());
    }
}
