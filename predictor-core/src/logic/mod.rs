//! Logic Module - pipeline stages
//!
//! - `features/` - schema: layout, typed categories, feature vectors
//! - `dataset/` - synthetic generator and CSV I/O
//! - `preprocess/` - imputation, label encoding, scaling
//! - `model/` - classifiers, metrics, selection, inference
//! - `artifacts/` - persisted bundle + manifest
//! - `training` - the end-to-end training job

pub mod artifacts;
pub mod dataset;
pub mod features;
pub mod model;
pub mod preprocess;
pub mod training;
