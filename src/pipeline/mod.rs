pub mod extraction;
pub mod normalization;
pub mod processor; // Report pipeline entry point
pub mod summary;

pub use processor::*;
