//! Argument parsing utilities.

use crate::error::Error;

/// Error type for parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("number out of range: {0}")]
    OutOfRange(String),

    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse a u32 from string, accepting a `0x` prefix for hex.
pub fn get_u32(s: &str) -> Result<u32> {
    let s = s.trim();

    let val = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| ParseError::InvalidNumber(e.to_string()))?
    } else {
        s.parse::<u64>()
            .map_err(|e| ParseError::InvalidNumber(format!("{}: {}", s, e)))?
    };

    u32::try_from(val).map_err(|e| ParseError::OutOfRange(e.to_string()))
}

/// Parse a boolean value.
pub fn get_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ParseError::InvalidFormat(format!(
            "expected boolean, got '{}'",
            s
        ))),
    }
}

/// Parse an RSS hash key written as colon-separated hex bytes (`be:ef:00`).
pub fn get_hash_key(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError::InvalidFormat("empty hash key".to_string()));
    }

    s.split(':')
        .map(|byte| {
            if byte.len() != 2 {
                return Err(ParseError::InvalidFormat(format!(
                    "hash key byte '{}' is not two hex digits",
                    byte
                )));
            }
            u8::from_str_radix(byte, 16)
                .map_err(|e| ParseError::InvalidNumber(format!("{}: {}", byte, e)))
        })
        .collect()
}

/// Parse a whitespace- or comma-separated list of indirection weights.
pub fn get_weights(s: &str) -> Result<Vec<u32>> {
    let weights = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(get_u32)
        .collect::<Result<Vec<_>>>()?;

    if weights.is_empty() {
        return Err(ParseError::InvalidFormat("no weights given".to_string()));
    }
    Ok(weights)
}
