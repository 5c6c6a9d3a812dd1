//! Radix-aware integer literal parsing and formatting.

use crate::error::AsmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Radix {
    Bin,
    Oct,
    Dec,
    Hex,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Radix::Bin => 2,
            Radix::Oct => 8,
            Radix::Dec => 10,
            Radix::Hex => 16,
        }
    }
}

/// An integer literal together with the radix it was written in.
///
/// The radix only affects rendering; the value itself is radix-independent.
/// Decoded immediates are always constructed with [`Literal::hex`].
///
/// Negative values render under the prefixed radixes as the 64-bit
/// two's-complement bit pattern, which does not parse back as an `i64`.
/// The format/parse identity holds for non-negative values and for decimal;
/// the codecs only ever construct literals from unsigned byte material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub value: i64,
    pub radix: Radix,
}

impl Literal {
    pub fn new(value: i64, radix: Radix) -> Self {
        Self { value, radix }
    }

    pub fn hex(value: i64) -> Self {
        Self::new(value, Radix::Hex)
    }
}

/// Prefix detection looks at the first two characters case-insensitively;
/// anything without a `0x`/`0o`/`0b` prefix is decimal.
fn split_prefix(text: &str) -> (Radix, &str) {
    let mut chars = text.chars();
    if let (Some('0'), Some(c)) = (chars.next(), chars.next()) {
        match c.to_ascii_lowercase() {
            'x' => return (Radix::Hex, &text[2..]),
            'o' => return (Radix::Oct, &text[2..]),
            'b' => return (Radix::Bin, &text[2..]),
            _ => {}
        }
    }
    (Radix::Dec, text)
}

impl FromStr for Literal {
    type Err = AsmError;

    fn from_str(text: &str) -> Result<Self, AsmError> {
        let (radix, digits) = split_prefix(text);
        let value = i64::from_str_radix(digits, radix.base()).map_err(|_| AsmError::NotANumber {
            literal: text.to_string(),
        })?;
        Ok(Self { value, radix })
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.radix {
            Radix::Bin => write!(f, "0b{:b}", self.value),
            Radix::Oct => write!(f, "0o{:o}", self.value),
            Radix::Dec => write!(f, "{}", self.value),
            Radix::Hex => write!(f, "0x{:x}", self.value),
        }
    }
}

/// Parse a literal and return only its value.
pub fn parse_number(text: &str) -> Result<i64, AsmError> {
    text.parse::<Literal>().map(|lit| lit.value)
}

/// Render a value with the prefix matching `radix`.
pub fn format_number(value: i64, radix: Radix) -> String {
    Literal::new(value, radix).to_string()
}

/// Lookahead predicate: does `text` parse as a literal?
pub fn is_value(text: &str) -> bool {
    text.parse::<Literal>().is_ok()
}
