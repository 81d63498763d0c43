//! A parsed news post: decoded headers and body lines.

use std::collections::HashMap;

/// A message split at its first empty line.
///
/// Built by [`crate::parser::message::parse_message`]; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Lower-cased field name → decoded value. The last occurrence of a
    /// duplicated field wins.
    pub headers: HashMap<String, String>,

    /// Lines after the header/body boundary, without line terminators.
    /// `None` when the text has no empty line at all.
    pub body: Option<Vec<String>>,
}

impl Message {
    /// Look up a header by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The decoded `Subject` header.
    pub fn subject(&self) -> Option<&str> {
        self.header("subject")
    }

    /// The decoded `From` header.
    pub fn author(&self) -> Option<&str> {
        self.header("from")
    }

    /// Body lines as borrowed slices, or `None` when there is no body.
    pub fn body_lines(&self) -> Option<Vec<&str>> {
        self.body
            .as_ref()
            .map(|lines| lines.iter().map(String::as_str).collect())
    }
}
