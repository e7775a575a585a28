//! Resolve candidate lines into validated lab results.
//!
//! Per line: fuzzy name match against the knowledge base, first numeric
//! token, physiological plausibility, then reference range classification.
//! Lines failing any step are dropped; the batch always completes.

pub mod matcher;
pub mod normalizer;
pub mod scorer;
pub mod value;

pub use matcher::*;
pub use normalizer::*;
pub use scorer::*;
pub use value::*;
