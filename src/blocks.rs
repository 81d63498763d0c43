//! Extraction of preformatted segments from chat messages.
//!
//! Two shapes are understood: rich-text JSON (a message, or a history
//! response with a `messages` array) whose `rich_text_preformatted`
//! elements carry the code, and plain text with ```` ``` ```` fences.
//! Each segment is meant to be checked as a message of its own.

use serde::Deserialize;
use tracing::debug;

use crate::error::Result;

const FENCE: &str = "```";
const PREFORMATTED: &str = "rich_text_preformatted";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    History { messages: Vec<RichMessage> },
    Single(RichMessage),
}

#[derive(Debug, Default, Deserialize)]
struct RichMessage {
    #[serde(default)]
    blocks: Vec<Block>,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    elements: Vec<TextRun>,
}

/// A piece of a preformatted element. Links may come without `text`.
#[derive(Debug, Deserialize)]
struct TextRun {
    text: Option<String>,
    url: Option<String>,
}

impl TextRun {
    fn as_str(&self) -> &str {
        self.text
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or_default()
    }
}

/// Extract code segments from `input`, detecting its shape.
pub fn extract(input: &str) -> Result<Vec<String>> {
    if input.trim_start().starts_with('{') {
        from_rich_text(input)
    } else {
        Ok(from_fences(input))
    }
}

/// Collect every preformatted element of a rich-text message.
///
/// The chat service splits one code block into several runs (around links,
/// for instance); the runs are concatenated back.
pub fn from_rich_text(json: &str) -> Result<Vec<String>> {
    let messages = match serde_json::from_str::<Payload>(json)? {
        Payload::History { messages } => messages,
        Payload::Single(message) => vec![message],
    };

    let segments: Vec<String> = messages
        .iter()
        .flat_map(|m| &m.blocks)
        .flat_map(|b| &b.elements)
        .filter(|e| e.kind == PREFORMATTED)
        .map(|e| e.elements.iter().map(TextRun::as_str).collect())
        .collect();

    debug!(segments = segments.len(), "Extracted rich-text code blocks");
    Ok(segments)
}

/// Collect the text between pairs of ```` ``` ```` fences.
///
/// A newline right after the opening fence is dropped; an unclosed fence
/// is ignored.
pub fn from_fences(text: &str) -> Vec<String> {
    let parts: Vec<&str> = text.split(FENCE).collect();
    let closed = parts.len().saturating_sub(1);

    parts[..closed]
        .iter()
        .skip(1)
        .step_by(2)
        .map(|segment| {
            let segment = segment.strip_prefix("\r\n").unwrap_or(segment);
            segment.strip_prefix('\n').unwrap_or(segment).to_string()
        })
        .collect()
}
