//! Features Module - schema shared by training and inference
//!
//! - `layout` - authoritative feature order, ranges, layout hash
//! - `student` - typed categories and the nine-field feature record
//! - `vector` - encoded, versioned model input

pub mod layout;
pub mod student;
pub mod vector;


pub use layout::{
    LayoutInfo, NumericRange, CATEGORICAL_COLUMNS, DATASET_HEADER, FEATURE_COUNT, FEATURE_LAYOUT,
    ID_COLUMN, TARGET_COLUMN,
};
pub use student::{FinalResult, Gender, InternetAccess, ParentEducation, StudentFeatures};
pub use vector::FeatureVector;
