//! Rendering of compliance results.
//!
//! What gets printed depends on the [`OutputMode`]: every violation in
//! normal and quiet modes, only authors in the listing modes.

use std::io::{self, Write};

use tracing::warn;

use crate::model::violation::ComplianceResult;

/// Caller-side listing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Print violations; progress goes to the log.
    #[default]
    Normal,
    /// Print violations only, nothing else.
    Quiet,
    /// Print the authors of compliant messages.
    ListSuccess,
    /// Print the authors of non-compliant messages.
    ListFail,
}

impl OutputMode {
    /// Whether the log is silenced in this mode.
    pub fn is_silent(self) -> bool {
        self != Self::Normal
    }
}

/// How violations are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One `Invalid <kind>: <message> / see <section>` line per violation.
    #[default]
    Text,
    /// One pretty-printed JSON object per message.
    Json,
}

/// Writes results to an output sink.
pub struct Reporter<W: Write> {
    out: W,
    mode: OutputMode,
    format: Format,
    verbose: u8,
    announce_compliant: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, mode: OutputMode, format: Format, verbose: u8) -> Self {
        Self {
            out,
            mode,
            format,
            verbose,
            announce_compliant: false,
        }
    }

    /// Also print a line for compliant messages (text format only).
    pub fn announce_compliant(mut self, announce: bool) -> Self {
        self.announce_compliant = announce;
        self
    }

    /// Render one result according to the mode and format.
    pub fn report(&mut self, result: &ComplianceResult) -> io::Result<()> {
        match self.mode {
            OutputMode::ListSuccess if result.compliant => self.list_author(result),
            OutputMode::ListFail if !result.compliant => self.list_author(result),
            OutputMode::ListSuccess | OutputMode::ListFail => Ok(()),
            OutputMode::Normal | OutputMode::Quiet => match self.format {
                Format::Json => {
                    serde_json::to_writer_pretty(&mut self.out, result)?;
                    writeln!(self.out)
                }
                Format::Text => self.print_violations(result),
            },
        }
    }

    fn print_violations(&mut self, result: &ComplianceResult) -> io::Result<()> {
        if result.compliant && self.announce_compliant {
            writeln!(self.out, "{}: netiquette is compliant", result.display_id())?;
        }
        for violation in &result.violations {
            writeln!(self.out, "{violation}")?;
        }
        Ok(())
    }

    fn list_author(&mut self, result: &ComplianceResult) -> io::Result<()> {
        match &result.author {
            Some(author) if self.verbose > 0 => {
                writeln!(self.out, "{author} / {}", result.display_id())
            }
            Some(author) => writeln!(self.out, "{author}"),
            None => {
                warn!(id = result.display_id(), "No From header");
                eprintln!("Could not get author from {}", result.display_id());
                Ok(())
            }
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::violation::Violation;

    fn passing() -> ComplianceResult {
        ComplianceResult::new(
            Some("ok.txt".into()),
            Vec::new(),
            Some("Jane <jane@example.com>".into()),
        )
    }

    fn failing() -> ComplianceResult {
        ComplianceResult::new(
            Some("ko.txt".into()),
            vec![
                Violation::subject("empty subject", "2.1.1"),
                Violation::signature("signature not found", "2.3"),
            ],
            Some("John <john@example.com>".into()),
        )
    }

    fn render(mode: OutputMode, format: Format, verbose: u8, results: &[ComplianceResult]) -> String {
        let mut reporter = Reporter::new(Vec::new(), mode, format, verbose);
        for r in results {
            reporter.report(r).unwrap();
        }
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_text_lists_violations() {
        let out = render(OutputMode::Quiet, Format::Text, 0, &[passing(), failing()]);
        assert_eq!(
            out,
            "Invalid subject: empty subject / see 2.1.1\n\
             Invalid signature: signature not found / see 2.3\n"
        );
    }

    #[test]
    fn test_list_modes_print_authors_only() {
        let both = [passing(), failing()];
        assert_eq!(
            render(OutputMode::ListSuccess, Format::Text, 0, &both),
            "Jane <jane@example.com>\n"
        );
        assert_eq!(
            render(OutputMode::ListFail, Format::Text, 0, &both),
            "John <john@example.com>\n"
        );
        assert_eq!(
            render(OutputMode::ListFail, Format::Text, 1, &both),
            "John <john@example.com> / ko.txt\n"
        );
    }

    #[test]
    fn test_listing_without_author_prints_nothing() {
        let anonymous = ComplianceResult::new(Some("anon.txt".into()), Vec::new(), None);
        assert_eq!(render(OutputMode::ListSuccess, Format::Text, 0, &[anonymous]), "");
    }

    #[test]
    fn test_json_output() {
        let out = render(OutputMode::Normal, Format::Json, 0, &[failing()]);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["identification"], "ko.txt");
        assert_eq!(value["violations"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_announce_compliant() {
        let mut reporter =
            Reporter::new(Vec::new(), OutputMode::Normal, Format::Text, 0).announce_compliant(true);
        reporter.report(&passing()).unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out, "ok.txt: netiquette is compliant\n");
    }
}
