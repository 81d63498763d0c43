//! Basic body layout: length, signature delimiter, trailing whitespace,
//! greeting and salutation lines.

use crate::config::RulesConfig;
use crate::model::violation::Violation;
use crate::rules::{is_quoted, SIGNATURE_DELIMITER};

/// Check the overall layout of the body.
///
/// Only an empty body stops the rule early; every other check is reported
/// independently.
pub fn check_body_format(body: Option<&[&str]>, config: &RulesConfig) -> Vec<Violation> {
    let body = match body {
        Some(lines) if !lines.is_empty() => lines,
        _ => return vec![Violation::body("empty body", "2.2.1")],
    };

    let mut violations = Vec::new();

    if body.len() < config.min_body_lines {
        violations.push(Violation::body(
            format!(
                "message too short (minimum {} content lines plus signature)",
                config.min_body_lines.saturating_sub(1)
            ),
            "2.2.1",
        ));
    }

    let delimiters = body.iter().filter(|l| **l == SIGNATURE_DELIMITER).count();
    match delimiters {
        0 => violations.push(Violation::body("no signature delimiter found", "2.3")),
        1 => {}
        _ => violations.push(Violation::body("signature delimiter must be unique", "2.3")),
    }

    for (i, line) in body.iter().enumerate() {
        if has_trailing_whitespace(line) {
            violations.push(Violation::body(
                format!("line {i} has trailing whitespace and is not a signature delimiter"),
                "2.2.2.5",
            ));
        }
    }

    let is_blank = |i: usize| body.get(i).is_some_and(|l| l.is_empty());
    let is_text = |i: usize| body.get(i).is_some_and(|l| !l.is_empty());

    if !(is_text(0) && is_blank(1)) {
        violations.push(Violation::body(
            "no greeting line, it must be followed by a blank line",
            "2.2.1.1",
        ));
    }

    if let Some(end_body) = body.iter().position(|l| *l == SIGNATURE_DELIMITER) {
        let framed = end_body >= 6
            && is_blank(end_body - 1)
            && is_text(end_body - 2)
            && is_blank(end_body - 3);
        if !framed {
            violations.push(Violation::body(
                "no salutation line found, must be surrounded by blank lines.",
                "2.2.1.1",
            ));
        }
    }

    violations
}

/// The delimiter and quoted lines may end with whitespace.
fn has_trailing_whitespace(line: &str) -> bool {
    if line == SIGNATURE_DELIMITER || is_quoted(line) {
        return false;
    }
    line.chars().next_back().is_some_and(char::is_whitespace)
}
