//! Command line tokenizer and numeric argument parsing

use crate::protocol::CommandOutcome;
use std::num::IntErrorKind;

/// A command line split into verb and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub verb: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split on whitespace, discarding empty tokens.
    /// Returns None for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next()?.to_string();
        Some(Self {
            verb,
            args: words.map(str::to_string).collect(),
        })
    }

    /// Decode a raw datagram and parse it
    pub fn from_datagram(datagram: &[u8]) -> Option<Self> {
        Self::parse(&String::from_utf8_lossy(datagram))
    }
}

/// Numeric argument rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgError {
    /// Not an integer (or missing)
    Malformed,
    /// Integer outside the allowed range
    OutOfRange,
}

impl ArgError {
    pub fn into_outcome(self, verb: &str) -> CommandOutcome {
        match self {
            ArgError::Malformed => CommandOutcome::Unknown(verb.to_string()),
            ArgError::OutOfRange => CommandOutcome::OutOfRange,
        }
    }
}

/// Parse an integer argument and check it against an inclusive range.
/// Integers too large for `i32` are out of range, not malformed.
pub fn parse_bounded(arg: &str, (min, max): (i32, i32)) -> Result<i32, ArgError> {
    let value: i32 = arg.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ArgError::OutOfRange,
        _ => ArgError::Malformed,
    })?;
    if value < min || value > max {
        return Err(ArgError::OutOfRange);
    }
    Ok(value)
}
