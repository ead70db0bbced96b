// Copyright (C) 2025, 2026 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Signal selector parsing
//!
//! User-facing commands address signals through a small selector grammar.
//! [`Selector`] discriminates the supported addressing patterns and carries
//! their decomposed fields:
//!
//! | pattern         | example       | used for                          |
//! |-----------------|---------------|-----------------------------------|
//! | plain name      | `ack`         | triggers, EIO reads               |
//! | single bit      | `data[3]`     | triggers                          |
//! | bit range       | `data[7:4]`   | triggers                          |
//! | name list       | `ack,req`     | EIO group reads                   |
//! | literal value   | `0x1f`        | compare operands, index addressing|
//! | assignment      | `led=0b101`   | EIO writes                        |
//! | bit assignment  | `led[2]=1`    | EIO writes                        |
//!
//! Parsing is strict: reversed ranges, malformed literals and empty names are
//! rejected rather than clamped or guessed at. Literals accept decimal,
//! `0x`/`0X` hexadecimal and `0b`/`0B` binary notation.

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

/// A parsed signal selector
///
/// Obtained through [`str::parse`]. Whitespace around the selector is
/// ignored, whitespace inside it is not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    /// A signal addressed by bare name
    Name(String),
    /// A single bit of a named signal (`name[index]`)
    Bit { name: String, index: u32 },
    /// An inclusive bit range of a named signal (`name[high:low]`)
    Range { name: String, high: u32, low: u32 },
    /// A comma separated list of names
    List(Vec<String>),
    /// A bare literal value
    Value(u64),
    /// A value assigned to a named signal (`name=value`)
    Assign { name: String, value: u64 },
    /// A value assigned to a single bit of a named signal (`name[index]=value`)
    AssignBit { name: String, index: u32, value: u64 },
}

impl Selector {
    /// Retrieve the selected sub-range of the signal, if any
    ///
    /// For [`Bit`][Self::Bit] and [`Range`][Self::Range] selectors, returns
    /// the range as a `(position, width)` pair. A single bit is a range of
    /// width `1`.
    pub fn range(&self) -> Option<(u32, u32)> {
        match self {
            Self::Bit { index, .. } => Some((*index, 1)),
            Self::Range { high, low, .. } => Some((*low, high - low + 1)),
            _ => None,
        }
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Empty);
        }

        if s.contains(',') {
            return s
                .split(',')
                .map(|n| parse_name(n.trim()))
                .collect::<Result<_, _>>()
                .map(Self::List);
        }

        if let Some((lhs, rhs)) = s.split_once('=') {
            let value = parse_literal(rhs.trim()).ok_or_else(|| Error::BadLiteral(rhs.into()))?;
            return match parse_base(lhs.trim())? {
                Self::Name(name) => Ok(Self::Assign { name, value }),
                Self::Bit { name, index } => Ok(Self::AssignBit { name, index, value }),
                _ => Err(Error::Malformed(s.into())),
            };
        }

        parse_base(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Bit { name, index } => write!(f, "{name}[{index}]"),
            Self::Range { name, high, low } => write!(f, "{name}[{high}:{low}]"),
            Self::List(names) => write!(f, "{}", names.join(",")),
            Self::Value(value) => write!(f, "{value}"),
            Self::Assign { name, value } => write!(f, "{name}={value:#x}"),
            Self::AssignBit { name, index, value } => write!(f, "{name}[{index}]={value:#x}"),
        }
    }
}

/// Parse a selector without list or assignment parts
fn parse_base(s: &str) -> Result<Selector, Error> {
    if let Some((name, rest)) = s.split_once('[') {
        let name = parse_plain_name(name)?;
        let inner = rest.strip_suffix(']').ok_or_else(|| Error::Malformed(s.into()))?;
        if let Some((high, low)) = inner.split_once(':') {
            let high = parse_index(high.trim())?;
            let low = parse_index(low.trim())?;
            if high < low {
                return Err(Error::ReversedRange { high, low });
            }
            Ok(Selector::Range { name, high, low })
        } else {
            let index = parse_index(inner.trim())?;
            Ok(Selector::Bit { name, index })
        }
    } else if let Some(value) = parse_literal(s) {
        Ok(Selector::Value(value))
    } else if s.starts_with(|c: char| c.is_ascii_digit()) {
        Err(Error::BadLiteral(s.into()))
    } else {
        parse_plain_name(s).map(Selector::Name)
    }
}

/// Parse a list element, which must be a bare name
fn parse_name(s: &str) -> Result<String, Error> {
    match parse_base(s)? {
        Selector::Name(name) => Ok(name),
        _ => Err(Error::Malformed(s.into())),
    }
}

/// Validate a bare signal name
fn parse_plain_name(s: &str) -> Result<String, Error> {
    if s.is_empty() {
        Err(Error::Empty)
    } else if s.contains(['[', ']', ':', '=', ',']) || s.contains(char::is_whitespace) {
        Err(Error::Malformed(s.into()))
    } else if s.starts_with(|c: char| c.is_ascii_digit()) {
        Err(Error::BadLiteral(s.into()))
    } else {
        Ok(s.into())
    }
}

/// Parse a bit index or range bound
fn parse_index(s: &str) -> Result<u32, Error> {
    parse_literal(s)
        .and_then(|v| v.try_into().ok())
        .ok_or_else(|| Error::BadLiteral(s.into()))
}

/// Parse a numeric literal in decimal, hexadecimal or binary notation
pub(crate) fn parse_literal(s: &str) -> Option<u64> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2).ok()
    } else {
        s.parse().ok()
    }
}

/// Selector parsing errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The selector or a name inside it is empty
    Empty,
    /// A bit range has its bounds in the wrong order
    ReversedRange { high: u32, low: u32 },
    /// A numeric literal could not be parsed
    BadLiteral(String),
    /// The selector matches none of the supported patterns
    Malformed(String),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty signal name"),
            Self::ReversedRange { high, low } => {
                write!(f, "reversed bit range [{high}:{low}]")
            }
            Self::BadLiteral(s) => write!(f, "malformed numeric literal '{s}'"),
            Self::Malformed(s) => write!(f, "unrecognized signal selector '{s}'"),
        }
    }
}
