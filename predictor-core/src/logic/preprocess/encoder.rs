//! Label encoders - category string ↔ integer code
//!
//! Classes are kept sorted, so code = position in the sorted class list.
//! An encoder is fit once on training data and never refit.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::logic::features::CATEGORICAL_COLUMNS;
use crate::logic::dataset::DatasetRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    column: String,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit on every observed value of one column. A blank value is a
    /// missing cell, not a category.
    pub fn fit<'a>(
        column: &str,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, DataError> {
        let mut classes = BTreeSet::new();
        for value in values {
            if is_blank(value) {
                return Err(missing_value(column));
            }
            classes.insert(value);
        }
        if classes.is_empty() {
            return Err(DataError::Empty);
        }

        Ok(Self {
            column: column.to_string(),
            classes: classes.into_iter().map(str::to_string).collect(),
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Category → code. Unseen categories are an error, never a default.
    pub fn transform(&self, value: &str) -> Result<usize, DataError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map_err(|_| DataError::UnknownCategory {
                column: self.column.clone(),
                value: value.to_string(),
                known: self.classes.join(", "),
            })
    }

    /// Code → category
    pub fn inverse_transform(&self, code: usize) -> Result<&str, DataError> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| DataError::Malformed {
                field: self.column.clone(),
                reason: format!("code {} outside 0..{}", code, self.classes.len()),
            })
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub(crate) fn missing_value(column: &str) -> DataError {
    DataError::Malformed {
        field: column.to_string(),
        reason: "missing value".to_string(),
    }
}

/// One encoder per categorical feature column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoricalEncoders {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl CategoricalEncoders {
    /// Fit an encoder for each of `CATEGORICAL_COLUMNS`
    pub fn fit(rows: &[DatasetRow]) -> Result<Self, DataError> {
        let mut encoders = BTreeMap::new();
        for column in CATEGORICAL_COLUMNS {
            let values = rows.iter().filter_map(|r| r.categorical(column));
            encoders.insert(column.to_string(), LabelEncoder::fit(column, values)?);
        }
        Ok(Self { encoders })
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }

    /// Encode `value` with the encoder of `column`
    pub fn encode(&self, column: &str, value: &str) -> Result<usize, DataError> {
        self.get(column)
            .ok_or_else(|| DataError::Malformed {
                field: column.to_string(),
                reason: "no encoder for column".to_string(),
            })?
            .transform(value)
    }

    /// Check the map covers exactly the categorical columns
    pub fn covers_layout(&self) -> bool {
        self.encoders.len() == CATEGORICAL_COLUMNS.len()
            && CATEGORICAL_COLUMNS.iter().all(|c| self.encoders.contains_key(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_sorted_order() {
        let enc = LabelEncoder::fit("internet_access", ["Yes", "No", "Yes"]).unwrap();
        assert_eq!(enc.classes(), &["No".to_string(), "Yes".to_string()]);
        assert_eq!(enc.transform("No").unwrap(), 0);
        assert_eq!(enc.transform("Yes").unwrap(), 1);
    }

    #[test]
    fn test_round_trip_every_class() {
        let values = ["High School", "Some College", "Bachelor's", "Master's", "PhD"];
        let enc = LabelEncoder::fit("parent_education", values).unwrap();
        for v in values {
            let code = enc.transform(v).unwrap();
            assert_eq!(enc.inverse_transform(code).unwrap(), v);
        }
    }

    #[test]
    fn test_unknown_category_is_error() {
        let enc = LabelEncoder::fit("parent_education", ["PhD", "Master's"]).unwrap();
        match enc.transform("Unknown") {
            Err(DataError::UnknownCategory { column, value, .. }) => {
                assert_eq!(column, "parent_education");
                assert_eq!(value, "Unknown");
            }
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
        // Case matters.
        assert!(enc.transform("phd").is_err());
    }

    #[test]
    fn test_inverse_out_of_range() {
        let enc = LabelEncoder::fit("final_result", ["Pass", "Fail"]).unwrap();
        assert!(enc.inverse_transform(2).is_err());
    }

    #[test]
    fn test_empty_fit_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(LabelEncoder::fit("gender", empty), Err(DataError::Empty));
    }

    #[test]
    fn test_blank_value_rejected_at_fit() {
        for blank in ["", "  "] {
            match LabelEncoder::fit("gender", ["Male", blank, "Female"]) {
                Err(DataError::Malformed { field, reason }) => {
                    assert_eq!(field, "gender");
                    assert_eq!(reason, "missing value");
                }
                other => panic!("expected Malformed, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_serde_keeps_classes() {
        let enc = LabelEncoder::fit("gender", ["Male", "Female"]).unwrap();
        let json = serde_json::to_string(&enc).unwrap();
        let back: LabelEncoder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, enc);
    }
}
