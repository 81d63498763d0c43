//! Entry point of the checker: raw text in, [`ComplianceResult`] out.

use tracing::debug;

use crate::config::RulesConfig;
use crate::error::Result;
use crate::model::message::Message;
use crate::model::violation::ComplianceResult;
use crate::parser::message::parse_message;
use crate::rules;

/// Parse `text` and run every rule against it.
///
/// Fails only when the message cannot be parsed
/// ([`NetiquetteError::Parse`](crate::error::NetiquetteError::Parse)); rule
/// violations are part of the returned result.
pub fn check(
    text: &str,
    identification: Option<&str>,
    config: &RulesConfig,
) -> Result<ComplianceResult> {
    let message = parse_message(text)?;
    Ok(check_message(&message, identification, config))
}

/// Run every rule against an already parsed message.
pub fn check_message(
    message: &Message,
    identification: Option<&str>,
    config: &RulesConfig,
) -> ComplianceResult {
    let violations = rules::run(message, config);
    debug!(
        id = identification.unwrap_or("<input>"),
        violations = violations.len(),
        "Checked message"
    );
    ComplianceResult::new(
        identification.map(str::to_string),
        violations,
        message.author().map(str::to_string),
    )
}
