//! Instruction sort keys of unbounded magnitude.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::LexError;

/// The `order` of an instruction: any decimal integer, however large.
///
/// Stored normalized (no leading zeros, zero is never negative) so that
/// equal numbers compare and hash equal whatever their spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Order {
    negative: bool,
    digits: String,
}

impl Order {
    /// Parse `[+-]?[0-9]+`. Surrounding whitespace is the caller's concern.
    pub fn parse(text: &str) -> Result<Self, LexError> {
        let negative = text.starts_with('-');
        let body = text
            .strip_prefix(|c: char| c == '+' || c == '-')
            .unwrap_or(text);
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LexError::Malformed {
                expected: "order",
                text: text.to_string(),
            });
        }
        let trimmed = body.trim_start_matches('0');
        let digits = if trimmed.is_empty() { "0" } else { trimmed };
        Ok(Self {
            negative: negative && digits != "0",
            digits: digits.to_string(),
        })
    }

    /// The value as an `i64`, if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.to_string().parse().ok()
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl From<i64> for Order {
    fn from(n: i64) -> Self {
        Self {
            negative: n < 0,
            digits: n.unsigned_abs().to_string(),
        }
    }
}

impl FromStr for Order {
    type Err = LexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Ord for Order {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for Order {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.digits)
    }
}
