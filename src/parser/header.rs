//! RFC 5322 header parsing: folding and encoded-words (RFC 2047).

use std::collections::HashMap;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use encoding_rs::{DecoderResult, Encoding, UTF_8};
use tracing::{trace, warn};

use crate::error::{NetiquetteError, Result};

/// Encoded words in the wild often drop their `=` padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Parse header lines into a map of lower-cased name → decoded value.
///
/// `lines` must stop before the header/body boundary. Duplicate fields
/// keep the last value.
pub fn parse_headers(lines: &[&str]) -> Result<HashMap<String, String>> {
    let mut headers = HashMap::new();
    for (name, raw) in unfold_headers(lines)? {
        let value = decode_encoded_words(&raw);
        trace!(header = %name, value = %value, "Parsed header");
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Unfold headers: join continuation lines (starting with space or tab) with the previous header.
///
/// The continuation line is appended verbatim after a single space.
/// Returns a list of `(lowercase_name, raw_value)` pairs in input order.
pub fn unfold_headers(lines: &[&str]) -> Result<Vec<(String, String)>> {
    let mut result: Vec<(String, String)> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if line.starts_with(' ') || line.starts_with('\t') {
            let Some(last) = result.last_mut() else {
                return Err(NetiquetteError::Parse(format!(
                    "continuation line {i} has no header to continue"
                )));
            };
            last.1.push(' ');
            last.1.push_str(line);
        } else if let Some((name, value)) = line.split_once(':') {
            let value = value.strip_prefix(' ').unwrap_or(value);
            result.push((name.trim().to_lowercase(), value.to_string()));
        } else {
            // A bare field name carries an empty value
            result.push((line.trim().to_lowercase(), String::new()));
        }
    }

    Ok(result)
}

/// Decode RFC 2047 encoded-words in a header value.
///
/// Example: `"=?UTF-8?Q?=5bINFRA=5d=5bMAINT=5d_Coupure?="` → `"[INFRA][MAINT] Coupure"`
///
/// Malformed tokens are preserved verbatim; bytes the declared charset
/// cannot decode are dropped.
pub fn decode_encoded_words(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut remaining = input;
    let mut last_was_encoded = false;

    while let Some(start) = remaining.find("=?") {
        let before = &remaining[..start];
        // Whitespace between two encoded words is not part of the text (RFC 2047 §6.2)
        if !last_was_encoded || !before.trim().is_empty() {
            result.push_str(before);
        }

        let after_start = &remaining[start + 2..];

        if let Some(decoded) = try_decode_one_word(after_start) {
            result.push_str(&decoded.text);
            remaining = &after_start[decoded.consumed..];
            last_was_encoded = true;
        } else {
            result.push_str("=?");
            remaining = after_start;
            last_was_encoded = false;
        }
    }

    result.push_str(remaining);
    result
}

struct DecodedWord {
    text: String,
    consumed: usize, // bytes consumed from the string *after* the initial "=?"
}

fn try_decode_one_word(s: &str) -> Option<DecodedWord> {
    // Format: charset?encoding?encoded_text?=
    let first_q = s.find('?')?;
    let charset = &s[..first_q];

    let rest = &s[first_q + 1..];
    let second_q = rest.find('?')?;
    let encoding = &rest[..second_q];

    let rest2 = &rest[second_q + 1..];
    let end = rest2.find("?=")?;
    let encoded_text = &rest2[..end];

    if charset.is_empty()
        || [charset, encoding, encoded_text]
            .iter()
            .any(|part| part.contains(char::is_whitespace))
    {
        return None;
    }

    let total_consumed = first_q + 1 + second_q + 1 + end + 2;

    let bytes = match encoding.to_ascii_uppercase().as_str() {
        "B" => LENIENT_BASE64.decode(encoded_text).ok()?,
        "Q" => decode_q_encoding(encoded_text),
        _ => return None,
    };

    Some(DecodedWord {
        text: decode_charset(charset, &bytes),
        consumed: total_consumed,
    })
}

/// Decode Q-encoding (RFC 2047): underscores → spaces, `=XX` → byte.
fn decode_q_encoding(input: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'_' => {
                result.push(b' ');
                i += 1;
            }
            b'=' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap_or("");
                if let Ok(byte) = u8::from_str_radix(hex, 16) {
                    result.push(byte);
                    i += 3;
                } else {
                    result.push(b'=');
                    i += 1;
                }
            }
            b => {
                result.push(b);
                i += 1;
            }
        }
    }
    result
}

/// Decode bytes using a named charset, dropping the byte sequences that
/// are malformed in it.
fn decode_charset(charset: &str, bytes: &[u8]) -> String {
    // RFC 2231 allows a language suffix: "utf-8*fr"
    let label = charset.split('*').next().unwrap_or(charset);
    let encoding = Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
        warn!(charset = charset, "Unknown charset, falling back to UTF-8");
        UTF_8
    });

    let mut decoder = encoding.new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(bytes.len())
        .unwrap_or(bytes.len() * 3);
    let mut decoded = String::with_capacity(capacity);
    let mut input = bytes;
    loop {
        let (result, read) = decoder.decode_to_string_without_replacement(input, &mut decoded, true);
        input = &input[read..];
        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::OutputFull => decoded.reserve(input.len() * 3 + 16),
            DecoderResult::Malformed(length, _) => {
                trace!(charset = charset, length, "Dropped malformed bytes");
            }
        }
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_base64_encoded_word() {
        let input = "=?UTF-8?B?SG9sYSBtdW5kbw==?=";
        assert_eq!(decode_encoded_words(input), "Hola mundo");
    }

    #[test]
    fn test_decode_base64_without_padding() {
        assert_eq!(decode_encoded_words("=?UTF-8?B?SG9sYQ?="), "Hola");
    }

    #[test]
    fn test_decode_q_encoded_tags() {
        let input = "=?UTF-8?Q?=5bINFRA=5d=5bMAINTENANCE=5d_Coupure?=";
        assert_eq!(decode_encoded_words(input), "[INFRA][MAINTENANCE] Coupure");
    }

    #[test]
    fn test_decode_q_encoded_latin1() {
        assert_eq!(decode_encoded_words("=?ISO-8859-1?Q?caf=E9?="), "café");
    }

    #[test]
    fn test_decode_adjacent_words_drop_whitespace() {
        let input = "=?UTF-8?B?SG9sYQ==?= =?UTF-8?B?IG11bmRv?=";
        assert_eq!(decode_encoded_words(input), "Hola mundo");
    }

    #[test]
    fn test_decode_mixed_plain_and_encoded() {
        let input = "Re: =?UTF-8?B?SG9sYQ==?= there";
        assert_eq!(decode_encoded_words(input), "Re: Hola there");
    }

    #[test]
    fn test_undecodable_bytes_are_dropped() {
        // 0xFF is never valid UTF-8
        assert_eq!(decode_encoded_words("=?UTF-8?Q?a=FFb?="), "ab");
    }

    #[test]
    fn test_encoded_replacement_character_is_kept() {
        assert_eq!(
            decode_encoded_words("=?UTF-8?Q?a=EF=BF=BDb=FF?="),
            "a\u{FFFD}b"
        );
        assert_eq!(decode_encoded_words("=?UTF-8?B?77+9?="), "\u{FFFD}");
    }

    #[test]
    fn test_unknown_charset_falls_back_to_utf8() {
        assert_eq!(decode_encoded_words("=?x-klingon?Q?plain?="), "plain");
    }

    #[test]
    fn test_malformed_word_is_kept() {
        assert_eq!(decode_encoded_words("cost =? unknown"), "cost =? unknown");
        assert_eq!(decode_encoded_words("=?UTF-8?X?abc?="), "=?UTF-8?X?abc?=");
    }

    #[test]
    fn test_unfold_keeps_continuation_verbatim() {
        let lines = ["Subject: [A][B] long", "\tsubject line", "From: user@example.com"];
        let headers = unfold_headers(&lines).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].0, "subject");
        assert_eq!(headers[0].1, "[A][B] long \tsubject line");
    }

    #[test]
    fn test_bare_field_has_empty_value() {
        let headers = unfold_headers(&["X-Flag"]).unwrap();
        assert_eq!(headers, vec![("x-flag".to_string(), String::new())]);
    }

    #[test]
    fn test_orphan_continuation_is_parse_failure() {
        let err = unfold_headers(&[" dangling", "Subject: x"]).unwrap_err();
        assert!(matches!(err, NetiquetteError::Parse(_)));
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let headers = parse_headers(&["Subject: first", "subject: second"]).unwrap();
        assert_eq!(headers.get("subject").map(String::as_str), Some("second"));
    }
}
