//! Core data model types: parsed messages, violations and results.

pub mod message;
pub mod violation;
