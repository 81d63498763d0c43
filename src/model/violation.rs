//! Rule findings and the per-message compliance outcome.

use std::fmt;

use serde::Serialize;

/// Category of a violated guideline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Subject,
    BodyFormat,
    Signature,
    Quoting,
}

impl ViolationKind {
    /// Human-readable label used when rendering a violation.
    pub fn label(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::BodyFormat => "message body",
            Self::Signature => "signature",
            Self::Quoting => "quoting",
        }
    }
}

/// A single violated guideline, produced by one rule invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Which category of rule was broken.
    pub kind: ViolationKind,

    /// Description of the specific problem, with a line number when relevant.
    pub message: String,

    /// Section of the written guidelines, e.g. `"2.2.3.2"`.
    pub reference: &'static str,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>, reference: &'static str) -> Self {
        Self {
            kind,
            message: message.into(),
            reference,
        }
    }

    pub fn subject(message: impl Into<String>, reference: &'static str) -> Self {
        Self::new(ViolationKind::Subject, message, reference)
    }

    pub fn body(message: impl Into<String>, reference: &'static str) -> Self {
        Self::new(ViolationKind::BodyFormat, message, reference)
    }

    pub fn signature(message: impl Into<String>, reference: &'static str) -> Self {
        Self::new(ViolationKind::Signature, message, reference)
    }

    pub fn quoting(message: impl Into<String>, reference: &'static str) -> Self {
        Self::new(ViolationKind::Quoting, message, reference)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {}: {} / see {}",
            self.kind.label(),
            self.message,
            self.reference
        )
    }
}

/// Outcome of checking one message.
///
/// Violations are kept in rule order: subject, body format, line width,
/// signature, quoting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceResult {
    /// File name, `stdin`, or block reference the message came from.
    pub identification: Option<String>,

    /// `true` iff `violations` is empty.
    pub compliant: bool,

    /// Every finding, in pipeline order.
    pub violations: Vec<Violation>,

    /// Decoded `From` header, for reporting only.
    pub author: Option<String>,
}

impl ComplianceResult {
    pub fn new(
        identification: Option<String>,
        violations: Vec<Violation>,
        author: Option<String>,
    ) -> Self {
        Self {
            identification,
            compliant: violations.is_empty(),
            violations,
            author,
        }
    }

    /// Name used in log lines and listings.
    pub fn display_id(&self) -> &str {
        self.identification.as_deref().unwrap_or("<input>")
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}
