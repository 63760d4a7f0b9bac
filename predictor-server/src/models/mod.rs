//! Request models

pub mod form;

pub use form::StudentForm;
