//! Quoting layout, checked with a forward scan over the body.
//!
//! The scan keeps two pieces of state: whether the previous lines belong to
//! a quote section, and how many non-empty lines the current paragraph has
//! (the current line included). Both reset on an empty line. The scan stops
//! at the signature delimiter.

use crate::config::RulesConfig;
use crate::model::violation::Violation;
use crate::rules::{is_quoted, SIGNATURE_DELIMITER};

/// Formatting problems in the run of `>` markers opening a quoted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerProblem {
    /// `>text`
    MissingSpace,
    /// `> > text`
    SpacedMarkers,
}

/// Check quote sections: separation from plain text, attribution, markers.
///
/// Line numbers in messages are 0-based.
pub fn check_quoting(body: Option<&[&str]>, config: &RulesConfig) -> Vec<Violation> {
    let Some(body) = body else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    let mut quote_section = false;
    let mut section_i = 0usize;
    let mut attribution_found = false;

    for (i, line) in body.iter().enumerate() {
        if *line == SIGNATURE_DELIMITER {
            break;
        }
        if line.is_empty() {
            section_i = 0;
            quote_section = false;
            continue;
        }
        section_i += 1;

        if is_quoted(line) {
            if !quote_section {
                if section_i > 2 {
                    violations.push(Violation::quoting(
                        format!("quote section must be preceded by a blank line or attribution line (line {i})"),
                        "2.2.3.2",
                    ));
                }
                if config.require_attribution && !attribution_found {
                    if i > 0 && !body[i - 1].is_empty() {
                        attribution_found = true;
                    } else {
                        violations.push(Violation::quoting(
                            format!("quote section must be attributed (line {i})"),
                            "2.2.3.3",
                        ));
                    }
                }
            }
            quote_section = true;

            match marker_problem(line) {
                Some(MarkerProblem::MissingSpace) => violations.push(Violation::quoting(
                    format!("quoting needs a space after the last '>' (line {i})"),
                    "2.2.3.2",
                )),
                Some(MarkerProblem::SpacedMarkers) => violations.push(Violation::quoting(
                    format!("quoting multiple times should use multiple '>' without spaces in between (line {i})"),
                    "2.2.3.2",
                )),
                None => {}
            }
        } else if quote_section {
            violations.push(Violation::quoting(
                format!("quoting sections must be separated by blank lines (line {i})"),
                "2.2.3.2",
            ));
            quote_section = false;
        }
    }

    violations
}

/// Walk the leading markers: `>` may repeat, then one space ends the
/// prefix unless another `>` follows it.
fn marker_problem(line: &str) -> Option<MarkerProblem> {
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '>' => continue,
            ' ' => {
                return (chars.peek() == Some(&'>')).then_some(MarkerProblem::SpacedMarkers);
            }
            _ => return Some(MarkerProblem::MissingSpace),
        }
    }
    None
}
