//! The netiquette rules and the fixed pipeline that runs them.
//!
//! Every rule is a pure function of the message and the shared
//! [`RulesConfig`]. Rules never stop each other: an early exit only skips
//! the remaining checks of the same rule.

pub mod body;
pub mod quoting;
pub mod signature;
pub mod subject;
pub mod width;

use tracing::{debug, trace};

use crate::config::RulesConfig;
use crate::model::message::Message;
use crate::model::violation::Violation;

/// Line separating the body from the signature.
pub const SIGNATURE_DELIMITER: &str = "-- ";

/// Marker opening a quoted line.
pub const QUOTE_MARKER: char = '>';

/// A rule as run by the pipeline.
pub type RuleFn = fn(&Message, &RulesConfig) -> Vec<Violation>;

/// Evaluation order; reports list violations in this order.
pub const PIPELINE: [(&str, RuleFn); 5] = [
    ("subject", run_subject),
    ("body_format", run_body_format),
    ("line_width", run_line_width),
    ("signature", run_signature),
    ("quoting", run_quoting),
];

fn run_subject(message: &Message, config: &RulesConfig) -> Vec<Violation> {
    subject::check_subject(message.subject(), config)
}

fn run_body_format(message: &Message, config: &RulesConfig) -> Vec<Violation> {
    body::check_body_format(message.body_lines().as_deref(), config)
}

fn run_line_width(message: &Message, config: &RulesConfig) -> Vec<Violation> {
    width::check_line_width(message.body_lines().as_deref(), config)
}

fn run_signature(message: &Message, config: &RulesConfig) -> Vec<Violation> {
    signature::check_signature(message.body_lines().as_deref(), config)
}

fn run_quoting(message: &Message, config: &RulesConfig) -> Vec<Violation> {
    quoting::check_quoting(message.body_lines().as_deref(), config)
}

/// Run every rule against `message`, collecting violations in pipeline order.
pub fn run(message: &Message, config: &RulesConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (name, rule) in PIPELINE {
        let found = rule(message, config);
        if found.is_empty() {
            trace!(rule = name, "Rule passed");
        } else {
            debug!(rule = name, count = found.len(), "Rule found violations");
        }
        violations.extend(found);
    }
    violations
}

/// Whether `line` is part of a quotation.
pub fn is_quoted(line: &str) -> bool {
    line.starts_with(QUOTE_MARKER)
}
