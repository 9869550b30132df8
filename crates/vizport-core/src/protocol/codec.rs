//! Field escaping and payload splitting

use super::{ESCAPE_CHAR, FIELD_DELIMITER};
use crate::error::{ScriptError, ScriptResult};

/// Escape a single field so it can be embedded in a payload
pub fn escape_field(field: &str) -> String {
    let extra = field
        .bytes()
        .filter(|b| *b == b'|' || *b == b'\\')
        .count();
    if extra == 0 {
        return field.to_string();
    }

    let mut out = String::with_capacity(field.len() + extra);
    for ch in field.chars() {
        if ch == FIELD_DELIMITER || ch == ESCAPE_CHAR {
            out.push(ESCAPE_CHAR);
        }
        out.push(ch);
    }
    out
}

/// Reverse [`escape_field`]
pub fn unescape_field(field: &str) -> ScriptResult<String> {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(ch) = chars.next() {
        if ch != ESCAPE_CHAR {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(next) if next == FIELD_DELIMITER || next == ESCAPE_CHAR => out.push(next),
            Some(other) => {
                return Err(ScriptError::protocol(format!(
                    "unknown escape sequence '\\{}'",
                    other
                )));
            }
            None => return Err(ScriptError::protocol("dangling escape at end of field")),
        }
    }
    Ok(out)
}

/// Join fields into a single payload, escaping each one
pub fn encode_fields<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut payload = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            payload.push(FIELD_DELIMITER);
        }
        payload.push_str(&escape_field(field.as_ref()));
    }
    payload
}

/// Split a payload on unescaped delimiters and unescape every field
///
/// An empty payload yields exactly one empty field; the wire cannot express a
/// response with zero fields.
pub fn decode_fields(payload: &str) -> ScriptResult<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = payload.chars();

    while let Some(ch) = chars.next() {
        if ch == ESCAPE_CHAR {
            match chars.next() {
                Some(next) if next == FIELD_DELIMITER || next == ESCAPE_CHAR => current.push(next),
                Some(other) => {
                    return Err(ScriptError::protocol(format!(
                        "unknown escape sequence '\\{}' in field {}",
                        other,
                        fields.len()
                    )));
                }
                None => {
                    return Err(ScriptError::protocol(format!(
                        "dangling escape at end of field {}",
                        fields.len()
                    )));
                }
            }
        } else if ch == FIELD_DELIMITER {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_field_is_unchanged() {
        assert_eq!(escape_field("/data/image.fits"), "/data/image.fits");
    }

    #[test]
    fn test_escape_delimiters() {
        assert_eq!(escape_field("a|b\\c"), "a\\|b\\\\c");
        assert_eq!(unescape_field("a\\|b\\\\c").unwrap(), "a|b\\c");
    }

    #[test]
    fn test_decode_three_fields() {
        let fields = decode_fields("gray|heat|cool").unwrap();
        assert_eq!(fields, vec!["gray", "heat", "cool"]);
    }

    #[test]
    fn test_empty_payload_is_single_empty_field() {
        assert_eq!(decode_fields("").unwrap(), vec![String::new()]);
    }

    #[test]
    fn test_empty_fields_are_preserved() {
        assert_eq!(decode_fields("|a|").unwrap(), vec!["", "a", ""]);
    }

    #[test]
    fn test_escaped_delimiter_does_not_split() {
        let payload = encode_fields(["one|two", "three"]);
        assert_eq!(payload, "one\\|two|three");
        assert_eq!(decode_fields(&payload).unwrap(), vec!["one|two", "three"]);
    }

    #[test]
    fn test_trailing_backslash_in_value_survives() {
        let payload = encode_fields(["C:\\data\\", "x"]);
        assert_eq!(decode_fields(&payload).unwrap(), vec!["C:\\data\\", "x"]);
    }

    #[test]
    fn test_dangling_escape_is_protocol_error() {
        let err = decode_fields("abc\\").unwrap_err();
        assert!(matches!(err, ScriptError::Protocol { .. }));
    }

    #[test]
    fn test_unknown_escape_is_protocol_error() {
        assert!(decode_fields("a\\nb").is_err());
        assert!(unescape_field("\\x").is_err());
    }

    #[test]
    fn test_unicode_fields() {
        let payload = encode_fields(["Δ|λ", "日本"]);
        assert_eq!(decode_fields(&payload).unwrap(), vec!["Δ|λ", "日本"]);
    }
}
