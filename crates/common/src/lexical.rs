//! Lexical grammar for operand payloads.
//!
//! The loader applies these checks to element text before any value is
//! built; READ reuses the string check to decide whether an input line is
//! an acceptable string.

use crate::error::LexError;

/// Characters allowed anywhere in an identifier (variable or label name).
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '$' | '&' | '%' | '*')
}

/// Returns true if `text` is a non-empty identifier.
pub fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_identifier_char)
}

/// Parse an optionally signed decimal integer.
pub fn parse_int(text: &str) -> Result<i64, LexError> {
    let digits = text
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LexError::Malformed {
            expected: "int",
            text: text.to_string(),
        });
    }
    text.parse::<i64>()
        .map_err(|_| LexError::IntegerOverflow(text.to_string()))
}

/// Parse one of the two canonical boolean spellings.
pub fn parse_bool(text: &str) -> Result<bool, LexError> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(LexError::Malformed {
            expected: "bool",
            text: text.to_string(),
        }),
    }
}

fn is_string_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || (' '..='~').contains(&c)
}

/// Check raw string text: only word characters and printable ASCII, every
/// backslash starts a `\ddd` escape, and no trailing whitespace.
pub fn check_string(text: &str) -> Result<(), LexError> {
    let malformed = || LexError::Malformed {
        expected: "string",
        text: text.to_string(),
    };

    if text.ends_with(char::is_whitespace) {
        return Err(malformed());
    }

    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            for _ in 0..3 {
                match chars.next() {
                    Some(d) if d.is_ascii_digit() => {}
                    _ => return Err(malformed()),
                }
            }
        } else if !is_string_char(c) {
            return Err(malformed());
        }
    }

    Ok(())
}

/// Replace every `\ddd` escape with the character at decimal codepoint `ddd`.
///
/// Input is expected to have passed [`check_string`]; anything that is not a
/// complete escape is copied through unchanged.
pub fn decode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let decoded = tail
            .get(..3)
            .filter(|d| d.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|d| d.parse::<u32>().ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[3..];
            }
            None => {
                out.push('\\');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Inverse of [`decode_escapes`] for display: characters that may not appear
/// raw in a string literal are written as `\ddd`.
pub fn encode_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        if code <= 999 && (c == '\\' || c == '#' || c.is_whitespace() || c.is_control()) {
            out.push_str(&format!("\\{code:03}"));
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_tmp-1"));
        assert!(is_identifier("$&%*"));
        assert!(is_identifier("příliš"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier("a@b"));
        assert!(!is_identifier("a#"));
    }

    #[test]
    fn integers() {
        assert_eq!(parse_int("0"), Ok(0));
        assert_eq!(parse_int("+17"), Ok(17));
        assert_eq!(parse_int("-42"), Ok(-42));
        assert_eq!(parse_int("-9223372036854775808"), Ok(i64::MIN));
        assert!(matches!(parse_int(""), Err(LexError::Malformed { .. })));
        assert!(matches!(parse_int("-"), Err(LexError::Malformed { .. })));
        assert!(matches!(parse_int("1.5"), Err(LexError::Malformed { .. })));
        assert!(matches!(parse_int(" 1"), Err(LexError::Malformed { .. })));
        assert!(matches!(parse_int("+-1"), Err(LexError::Malformed { .. })));
        assert_eq!(
            parse_int("9223372036854775808"),
            Err(LexError::IntegerOverflow("9223372036854775808".to_string()))
        );
    }

    #[test]
    fn booleans() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert!(parse_bool("True").is_err());
        assert!(parse_bool("1").is_err());
    }

    #[test]
    fn string_accepts_plain_and_escaped_text() {
        assert!(check_string("").is_ok());
        assert!(check_string("hello").is_ok());
        assert!(check_string("a b").is_ok());
        assert!(check_string("ahoj\\032svete").is_ok());
        assert!(check_string("\\035\\092").is_ok());
        assert!(check_string("žluťoučký").is_ok());
        assert!(check_string("<>&;").is_ok());
    }

    #[test]
    fn string_rejects_bad_escapes_and_whitespace() {
        assert!(check_string("\\").is_err());
        assert!(check_string("a\\n").is_err());
        assert!(check_string("\\03").is_err());
        assert!(check_string("\\03x").is_err());
        assert!(check_string("trailing ").is_err());
        assert!(check_string("tab\there").is_err());
        assert!(check_string("line\nbreak").is_err());
    }

    #[test]
    fn decode_replaces_escapes() {
        assert_eq!(decode_escapes("ahoj\\032svete"), "ahoj svete");
        assert_eq!(decode_escapes("\\092\\035"), "\\#");
        assert_eq!(decode_escapes("\\0101"), "\n1");
        assert_eq!(decode_escapes("plain"), "plain");
    }

    #[test]
    fn decode_leaves_incomplete_escape() {
        assert_eq!(decode_escapes("a\\1"), "a\\1");
    }

    #[test]
    fn encode_escapes_special_characters() {
        assert_eq!(encode_escapes("a b#c\\"), "a\\032b\\035c\\092");
        assert_eq!(encode_escapes("line\n"), "line\\010");
        assert_eq!(encode_escapes("plain"), "plain");
    }
}
