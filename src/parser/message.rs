//! Split raw message text into headers and body lines.

use tracing::debug;

use crate::error::{NetiquetteError, Result};
use crate::model::message::Message;
use crate::parser::header;

/// Parse a full message (headers, empty line, body).
///
/// Everything before the first empty line is the header block; the lines
/// after it are the body. Without an empty line the body is `None`.
pub fn parse_message(text: &str) -> Result<Message> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(NetiquetteError::Parse("empty input".to_string()));
    }

    let lines = split_lines(text);
    let boundary = lines.iter().position(|line| line.is_empty());

    let header_lines = &lines[..boundary.unwrap_or(lines.len())];
    let headers = header::parse_headers(header_lines)?;

    let body = boundary.map(|b| {
        lines[b + 1..]
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
    });

    debug!(
        headers = headers.len(),
        body_lines = body.as_ref().map_or(0, Vec::len),
        has_boundary = boundary.is_some(),
        "Parsed message"
    );

    Ok(Message { headers, body })
}

/// Split on `\n`, dropping a `\r` before it.
///
/// A final line terminator ends the last line rather than opening an empty one.
pub fn split_lines(text: &str) -> Vec<&str> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}
