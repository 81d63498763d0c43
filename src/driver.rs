//! Batch processing of files, standard input and chat code blocks.
//!
//! The driver owns the policies the checker itself knows nothing about:
//! what to do with unreadable files, whether to stop at the first
//! non-compliant message, and how outcomes are logged.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::blocks;
use crate::check::check;
use crate::config::{RulesConfig, RunConfig};
use crate::error::{NetiquetteError, Result};
use crate::report::Reporter;

/// What became of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Compliant,
    NonCompliant,
    /// The message could not be parsed; it counts neither way.
    Undetermined,
}

/// Tally of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub compliant: usize,
    pub non_compliant: usize,
    pub undetermined: usize,
    /// Unreadable inputs skipped under `ignore_missing_file`.
    pub skipped: usize,
    /// An unreadable input stopped the run.
    pub aborted: bool,
}

impl Summary {
    /// No message failed and the run was not aborted.
    pub fn success(&self) -> bool {
        !self.aborted && self.non_compliant == 0
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Compliant => self.compliant += 1,
            Outcome::NonCompliant => self.non_compliant += 1,
            Outcome::Undetermined => self.undetermined += 1,
        }
    }
}

/// Checks messages and hands the results to a [`Reporter`].
pub struct Driver<'a, W: Write> {
    rules: &'a RulesConfig,
    policy: &'a RunConfig,
    reporter: Reporter<W>,
}

impl<'a, W: Write> Driver<'a, W> {
    pub fn new(rules: &'a RulesConfig, policy: &'a RunConfig, reporter: Reporter<W>) -> Self {
        Self {
            rules,
            policy,
            reporter,
        }
    }

    /// Check one message and report it.
    pub fn process(&mut self, text: &str, identification: &str) -> io::Result<Outcome> {
        match check(text, Some(identification), self.rules) {
            Ok(result) => {
                self.reporter.report(&result)?;
                Ok(if result.compliant {
                    Outcome::Compliant
                } else {
                    Outcome::NonCompliant
                })
            }
            Err(e) => {
                error!(id = identification, error = %e, "Cannot parse content, skipping");
                Ok(Outcome::Undetermined)
            }
        }
    }

    /// Check files in order, applying the unreadable-file and
    /// stop-on-failure policies.
    pub fn run_files(&mut self, paths: &[PathBuf]) -> io::Result<Summary> {
        let mut summary = Summary::default();

        for path in paths {
            debug!(path = %path.display(), "Will check file");
            let text = match read_text(path) {
                Ok(text) => text,
                Err(e) if self.policy.ignore_missing_file => {
                    warn!(error = %e, "Unreadable file, skipping");
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!(error = %e, "Unreadable file, aborting");
                    summary.aborted = true;
                    break;
                }
            };

            let id = path.display().to_string();
            let outcome = self.process(&text, &id)?;
            summary.record(outcome);

            match outcome {
                Outcome::NonCompliant if self.policy.process_all_files => {
                    warn!(file = %id, "File does not respect the netiquette");
                }
                Outcome::NonCompliant => {
                    error!(file = %id, "File does not respect the netiquette");
                    break;
                }
                Outcome::Compliant => info!(file = %id, "File is netiquette compliant"),
                Outcome::Undetermined => {}
            }
        }

        if summary.skipped > 0 {
            info!(skipped = summary.skipped, "Some files could not be read");
        }
        Ok(summary)
    }

    /// Check a single message read from `input`, identified as `stdin`.
    pub fn run_stdin(&mut self, mut input: impl Read) -> Result<Summary> {
        debug!("Reading from stdin");
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        debug!(chars = text.chars().count(), "Read stdin");

        let mut summary = Summary::default();
        let outcome = self.process(&text, "stdin")?;
        summary.record(outcome);

        match outcome {
            Outcome::Compliant => info!("Input is netiquette compliant"),
            Outcome::NonCompliant => error!("Input does not respect the netiquette"),
            Outcome::Undetermined => {}
        }
        Ok(summary)
    }

    /// Check every code block found in a chat message. Blocks are
    /// identified as `<source>#<n>`, counting from 1.
    pub fn run_blocks(&mut self, input: &str, source: &str) -> Result<Summary> {
        let segments = blocks::extract(input)?;
        if segments.is_empty() {
            warn!(source = source, "No code block found");
        }

        let mut summary = Summary::default();
        for (n, segment) in segments.iter().enumerate() {
            let id = format!("{source}#{}", n + 1);
            let outcome = self.process(segment, &id)?;
            summary.record(outcome);
            if outcome == Outcome::NonCompliant {
                info!(block = %id, "Block does not respect the netiquette");
            }
        }
        Ok(summary)
    }

    pub fn into_reporter(self) -> Reporter<W> {
        self.reporter
    }
}

/// Read a message file as UTF-8 text, without a byte-order mark.
pub fn read_text(path: &Path) -> Result<String> {
    let data = std::fs::read(path).map_err(|e| NetiquetteError::io(path, e))?;
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&data);
    String::from_utf8(data.to_vec()).map_err(|_| NetiquetteError::InvalidEncoding(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Format, OutputMode};

    const GOOD: &str = "From: Jane <jane@example.com>\n\
Subject: [INFRA][URGENT] disk full\n\
\n\
Hello,\n\
\n\
The disk is full.\n\
Please clean up.\n\
\n\
Regards,\n\
\n\
-- \n\
Jane\n";

    fn driver<'a>(rules: &'a RulesConfig, policy: &'a RunConfig) -> Driver<'a, Vec<u8>> {
        Driver::new(
            rules,
            policy,
            Reporter::new(Vec::new(), OutputMode::Quiet, Format::Text, 0),
        )
    }

    fn output(driver: Driver<'_, Vec<u8>>) -> String {
        String::from_utf8(driver.into_reporter().into_inner()).unwrap()
    }

    #[test]
    fn test_process_outcomes() {
        let rules = RulesConfig::default();
        let policy = RunConfig::default();
        let mut d = driver(&rules, &policy);
        assert_eq!(d.process(GOOD, "good").unwrap(), Outcome::Compliant);
        assert_eq!(d.process("From: x\n\nHi", "bad").unwrap(), Outcome::NonCompliant);
        assert_eq!(d.process("", "empty").unwrap(), Outcome::Undetermined);
        assert!(output(d).contains("Invalid subject: empty subject / see 2.1.1"));
    }

    #[test]
    fn test_stdin_identification() {
        let rules = RulesConfig::default();
        let policy = RunConfig::default();
        let mut d = driver(&rules, &policy);
        let summary = d.run_stdin(GOOD.as_bytes()).unwrap();
        assert_eq!(summary.compliant, 1);
        assert!(summary.success());
    }

    #[test]
    fn test_blocks_are_checked_independently() {
        let rules = RulesConfig::default();
        let policy = RunConfig::default();
        let mut d = driver(&rules, &policy);
        let input = format!("first:\n```\n{GOOD}```\nsecond:\n```\nSubject: oops\n\nHi\n```");
        let summary = d.run_blocks(&input, "thread").unwrap();
        assert_eq!(summary.compliant, 1);
        assert_eq!(summary.non_compliant, 1);
        assert!(!summary.success());
    }

    #[test]
    fn test_unparsable_file_does_not_stop_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let empty = tmp.path().join("empty.txt");
        let good = tmp.path().join("good.txt");
        std::fs::write(&empty, "").unwrap();
        std::fs::write(&good, GOOD).unwrap();

        let rules = RulesConfig::default();
        let policy = RunConfig::default();
        let mut d = driver(&rules, &policy);
        let summary = d.run_files(&[empty, good]).unwrap();
        assert_eq!(summary.undetermined, 1);
        assert_eq!(summary.compliant, 1);
        assert_eq!(summary.non_compliant, 0);
        assert!(!summary.aborted);
        assert!(summary.success());
        assert_eq!(output(d), "");
    }

    #[test]
    fn test_non_compliant_file_stops_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        let bad = tmp.path().join("bad.txt");
        let good = tmp.path().join("good.txt");
        std::fs::write(&bad, "Subject: oops\n\nHi\n").unwrap();
        std::fs::write(&good, GOOD).unwrap();
        let paths = [bad, good];

        let rules = RulesConfig::default();
        let policy = RunConfig::default();
        let summary = driver(&rules, &policy).run_files(&paths).unwrap();
        assert_eq!(summary.non_compliant, 1);
        assert_eq!(summary.compliant, 0);
        assert!(!summary.success());

        let policy = RunConfig {
            process_all_files: true,
            ..RunConfig::default()
        };
        let summary = driver(&rules, &policy).run_files(&paths).unwrap();
        assert_eq!(summary.non_compliant, 1);
        assert_eq!(summary.compliant, 1);
    }

    #[test]
    fn test_missing_file_policy() {
        let tmp = tempfile::tempdir().unwrap();
        let good = tmp.path().join("good.txt");
        std::fs::write(&good, GOOD).unwrap();
        let paths = [tmp.path().join("missing.txt"), good];
        let rules = RulesConfig::default();

        let policy = RunConfig::default();
        let summary = driver(&rules, &policy).run_files(&paths).unwrap();
        assert!(summary.aborted);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.compliant, 0);
        assert!(!summary.success());

        let policy = RunConfig {
            ignore_missing_file: true,
            ..RunConfig::default()
        };
        let summary = driver(&rules, &policy).run_files(&paths).unwrap();
        assert!(!summary.aborted);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.compliant, 1);
        assert!(summary.success());
    }

    #[test]
    fn test_read_text_rejects_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("latin1.txt");
        std::fs::write(&path, b"Subject: caf\xe9\n\n").unwrap();
        assert!(matches!(
            read_text(&path),
            Err(NetiquetteError::InvalidEncoding(_))
        ));
        assert!(matches!(
            read_text(&tmp.path().join("missing.txt")),
            Err(NetiquetteError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_read_text_strips_bom() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bom.txt");
        std::fs::write(&path, b"\xEF\xBB\xBFSubject: x\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "Subject: x\n");
    }
}
