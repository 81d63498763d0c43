//! Line width limits, with an exception for numbered link references.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::RulesConfig;
use crate::model::violation::Violation;
use crate::rules::is_quoted;

/// `[1] https://...`, possibly quoted: such lines may be of any width.
static CITATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:>+ )?\[[0-9]{1,3}\] \w{2,5}://.*$")
        .expect("citation regex pattern is valid")
});

/// Check every body line against the width limits. Lines are numbered from 1.
pub fn check_line_width(body: Option<&[&str]>, config: &RulesConfig) -> Vec<Violation> {
    let Some(body) = body else {
        return Vec::new();
    };

    body.iter()
        .enumerate()
        .filter_map(|(i, line)| check_line(i + 1, line, config))
        .collect()
}

fn check_line(number: usize, line: &str, config: &RulesConfig) -> Option<Violation> {
    let width = line.chars().count();
    if width <= config.line_width || CITATION_LINE.is_match(line) {
        return None;
    }

    if width > config.max_line_width {
        Some(Violation::body(
            format!(
                "line {number} exceeds {} characters",
                config.max_line_width
            ),
            "2.2.2.1",
        ))
    } else if !is_quoted(line) {
        Some(Violation::body(
            format!(
                "line {number} exceeds {} characters without quoting",
                config.line_width
            ),
            "2.2.2.1",
        ))
    } else {
        None
    }
}
