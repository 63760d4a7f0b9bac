//! HTTP handlers

pub mod about;
pub mod health;
pub mod model;
pub mod predict;
