//! Knowledge base of supported lab tests: units, reference ranges and
//! physiological limits. Pure data, validated once at construction.

pub mod reference;

pub use reference::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("Knowledge base has no tests")]
    Empty,

    #[error("Duplicate test name in knowledge base: {0}")]
    DuplicateName(String),

    #[error("Invalid knowledge base entry '{name}': {reason}")]
    InvalidEntry { name: String, reason: String },

    #[error("Failed to read knowledge base {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse knowledge base: {0}")]
    Parse(#[from] serde_json::Error),
}
