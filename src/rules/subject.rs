//! Subject line: presence, length, and the `[TAG][TAG] summary` shape.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::RulesConfig;
use crate::model::violation::Violation;

/// Two tags followed by a space and a summary with visible content.
static VALID_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Re: ?)?(?:\[[A-Z0-9_+/-]{1,10}\]){2} .*\S.*$")
        .expect("subject regex pattern is valid")
});

/// A single tag directly followed by the summary.
static ONE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Re: ?)?\[[A-Z0-9_+/-]{1,10}\]\s*[^\[\s].*$")
        .expect("one-tag regex pattern is valid")
});

const REPLY_PREFIX: &str = "Re: ";

/// Check the decoded `Subject` header.
pub fn check_subject(subject: Option<&str>, config: &RulesConfig) -> Vec<Violation> {
    let subject = match subject {
        Some(s) if !s.is_empty() => s,
        _ => return vec![Violation::subject("empty subject", "2.1.1")],
    };

    let mut violations = Vec::new();

    let length = subject.chars().count();
    if length > config.max_subject_length {
        violations.push(Violation::subject(
            format!(
                "subject too long ({length} characters, maximum {})",
                config.max_subject_length
            ),
            "2.1.1.2",
        ));
    }

    // Replies inherit the tags of the original post
    if subject.starts_with(REPLY_PREFIX) {
        return violations;
    }

    if !VALID_SUBJECT.is_match(subject) {
        violations.push(Violation::subject(
            "subject must have two tags and a summary",
            "2.1.1",
        ));
    }

    if config.strict_subject && ONE_TAG.is_match(subject) {
        violations.push(Violation::subject("subject cannot have only one tag", "2.1.1"));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(subject: Option<&str>, config: &RulesConfig) -> Vec<String> {
        check_subject(subject, config)
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    #[test]
    fn test_missing_or_empty_subject() {
        let cfg = RulesConfig::default();
        assert_eq!(messages(None, &cfg), vec!["empty subject"]);
        assert_eq!(messages(Some(""), &cfg), vec!["empty subject"]);
    }

    #[test]
    fn test_valid_two_tag_subject() {
        let cfg = RulesConfig::default();
        assert!(check_subject(Some("[INFRA][URGENT] disk full"), &cfg).is_empty());
        assert!(check_subject(Some("[C++][ASM/X86] a-b_c"), &cfg).is_empty());
        assert!(check_subject(Some("Re:[INFRA][URGENT] disk full"), &cfg).is_empty());
    }

    #[test]
    fn test_reply_skips_tag_checks() {
        let cfg = RulesConfig::default();
        assert!(check_subject(Some("Re: disk full"), &cfg).is_empty());
    }

    #[test]
    fn test_tag_shape_errors() {
        let cfg = RulesConfig::default();
        for subject in [
            "disk full",
            "[INFRA] disk full",
            "[infra][urgent] disk full",
            "[INFRA][URGENT]",
            "[INFRA][URGENT]   ",
            "[INFRA][URGENT]disk full",
            "[ABCDEFGHIJK][URGENT] disk full",
            "[INFRA][][URGENT] disk full",
        ] {
            assert_eq!(
                messages(Some(subject), &cfg),
                vec!["subject must have two tags and a summary"],
                "subject: {subject:?}"
            );
        }
    }

    #[test]
    fn test_too_long_does_not_short_circuit() {
        let cfg = RulesConfig::default();
        let long = format!("[INFRA][URGENT] {}", "x".repeat(70));
        let found = messages(Some(&long), &cfg);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("subject too long"));

        let long_untagged = "y".repeat(81);
        assert_eq!(messages(Some(&long_untagged), &cfg).len(), 2);
    }

    #[test]
    fn test_long_reply_only_reports_length() {
        let cfg = RulesConfig::default();
        let long = format!("Re: {}", "z".repeat(80));
        let found = messages(Some(&long), &cfg);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("subject too long"));
    }

    #[test]
    fn test_length_counts_characters() {
        let cfg = RulesConfig::default();
        let subject = format!("[INFRA][URGENT] {}", "é".repeat(64));
        assert_eq!(subject.chars().count(), 80);
        assert!(check_subject(Some(&subject), &cfg).is_empty());
    }

    #[test]
    fn test_strict_mode_flags_single_tag() {
        let cfg = RulesConfig {
            strict_subject: true,
            ..RulesConfig::default()
        };
        assert_eq!(
            messages(Some("[INFRA] disk full"), &cfg),
            vec![
                "subject must have two tags and a summary",
                "subject cannot have only one tag"
            ]
        );
        assert!(check_subject(Some("[INFRA][URGENT] disk full"), &cfg).is_empty());
        // Default mode stays quiet about the single tag
        assert_eq!(
            messages(Some("[INFRA] disk full"), &RulesConfig::default()).len(),
            1
        );
    }
}
