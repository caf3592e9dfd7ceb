//! Text commands accepted on the serial line.
//!
//! A command token is the received bytes with trailing line endings
//! removed.  Matching is exact and case-sensitive; leading or interior
//! whitespace makes a token unrecognised.

use super::ports::OutputLevel;

/// The known command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `ON`: drive the control output high.
    On,
    /// `OFF`: drive the control output low.
    Off,
}

impl Command {
    /// Match a trimmed token against the command set.
    pub fn parse(token: &[u8]) -> Option<Self> {
        match token {
            b"ON" => Some(Self::On),
            b"OFF" => Some(Self::Off),
            _ => None,
        }
    }

    /// Output level this command requests.
    pub fn level(self) -> OutputLevel {
        match self {
            Self::On => OutputLevel::On,
            Self::Off => OutputLevel::Off,
        }
    }
}

/// Strip every trailing `\r` and `\n` from `bytes`.
pub fn trim_line_ending(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != b'\r' && b != b'\n')
        .map_or(0, |i| i + 1);
    &bytes[..end]
}
