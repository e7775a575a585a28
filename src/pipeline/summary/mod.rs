//! Patient-facing summary generation with a hallucination guardrail.
//!
//! Explanations come from a fixed (name, status) template table. Before a
//! summary leaves this module, the guardrail confirms every knowledge base
//! name it mentions belongs to an abnormal result; otherwise the summary is
//! replaced by an `Unprocessed` outcome.

pub mod generator;
pub mod guardrail;
pub mod templates;

pub use generator::*;
pub use guardrail::*;
pub use templates::*;
