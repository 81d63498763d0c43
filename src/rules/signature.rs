//! Signature block below the `-- ` delimiter.

use crate::config::RulesConfig;
use crate::model::violation::Violation;
use crate::rules::SIGNATURE_DELIMITER;

/// Check the lines following the last signature delimiter.
pub fn check_signature(body: Option<&[&str]>, config: &RulesConfig) -> Vec<Violation> {
    let body = body.unwrap_or_default();

    let Some(delimiter) = body.iter().rposition(|l| *l == SIGNATURE_DELIMITER) else {
        return vec![Violation::signature("signature not found", "2.3")];
    };

    let signature = &body[delimiter + 1..];
    let Some(first) = signature.first() else {
        return vec![Violation::signature("signature must not be empty", "2.3")];
    };

    let mut violations = Vec::new();
    if signature.len() > config.max_signature_lines {
        violations.push(Violation::signature(
            format!(
                "signature too long ({} lines, maximum {})",
                signature.len(),
                config.max_signature_lines
            ),
            "2.3",
        ));
    }
    if first.is_empty() {
        violations.push(Violation::signature(
            "signature must not start with a blank line",
            "2.3",
        ));
    }
    violations
}
