// src/common/command.rs

//! The ASCII command vocabulary of the 6485/6487.
//!
//! Commands are formatted without a terminator; the transport appends it.

use super::codec::General;
use arrayvec::ArrayString;
use core::fmt::{self, Write};

/// Longest command the driver will format.
pub const COMMAND_CAPACITY: usize = 64;

/// Bounded buffer a [`Command`] is formatted into.
pub type CommandBuffer = ArrayString<COMMAND_CAPACITY>;

/// The formatted command did not fit in a [`CommandBuffer`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Command does not fit in the command buffer")]
pub struct CommandTooLong;

/// Command verbs, shared by the query (`<verb>?`) and set (`<verb> <arg>`) forms.
pub mod verb {
    pub const RANGE: &str = ":RANGE";
    pub const RANGE_AUTO: &str = ":RANGE:AUTO";
    pub const RANGE_AUTO_ULIMIT: &str = ":RANGE:AUTO:ULIM";
    pub const RANGE_AUTO_LLIMIT: &str = ":RANGE:AUTO:LLIM";
    pub const RATE: &str = ":NPLC";
    pub const ZERO_CHECK: &str = "SYST:ZCH";
    pub const ZERO_CORRECT: &str = "SYST:ZCOR";
    pub const ZERO_CORRECT_ACQUIRE: &str = "SYST:ZCOR:ACQ";
    pub const MEDIAN_FILTER: &str = "MED";
    pub const MEDIAN_FILTER_RANK: &str = "MED:RANK";
    pub const DIGITAL_FILTER: &str = "AVER";
    pub const DIGITAL_FILTER_COUNT: &str = "AVER:COUN";
    pub const DIGITAL_FILTER_CONTROL: &str = "AVER:TCON";
    pub const VOLT_RANGE: &str = "SOUR:VOLT:RANG";
    pub const RESET: &str = "*RST";
}

/// Argument appended to a set command after a single space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Argument<'a> {
    /// Decimal integer.
    Integer(i32),
    /// Float in `%g` form.
    Float(f64),
    /// Text copied verbatim.
    Text(&'a str),
    /// Current range full scale, `2.0e<exponent>`.
    RangeExponent(i32),
    /// Fixed device token such as `MOV`.
    Token(&'static str),
}

impl fmt::Display for Argument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Integer(v) => write!(f, "{}", v),
            Argument::Float(v) => write!(f, "{}", General(*v)),
            Argument::Text(s) => f.write_str(s),
            Argument::RangeExponent(e) => write!(f, "2.0e{}", e),
            Argument::Token(t) => f.write_str(t),
        }
    }
}

/// One command sent to the instrument.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Command<'a> {
    /// `*CLS`
    ClearStatus,
    /// `*IDN?`
    Identify,
    /// `READ?`: triggers and returns `reading,timestamp,status`.
    Read,
    /// `<verb>?`
    Query(&'a str),
    /// `<verb> <argument>`
    Set {
        verb: &'a str,
        argument: Argument<'a>,
    },
    /// Bare verb with no argument and no reply, e.g. `*RST`.
    Trigger(&'a str),
    /// Empty line.
    Empty,
}

impl Command<'_> {
    /// True if the instrument answers this command.
    pub fn expects_reply(&self) -> bool {
        matches!(self, Command::Identify | Command::Read | Command::Query(_))
    }

    pub fn format_into(&self) -> Result<CommandBuffer, CommandTooLong> {
        let mut buffer = CommandBuffer::new();
        write!(buffer, "{}", self).map_err(|_| CommandTooLong)?;
        Ok(buffer)
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ClearStatus => f.write_str("*CLS"),
            Command::Identify => f.write_str("*IDN?"),
            Command::Read => f.write_str("READ?"),
            Command::Query(verb) => write!(f, "{}?", verb),
            Command::Set { verb, argument } => write!(f, "{} {}", verb, argument),
            Command::Trigger(verb) => f.write_str(verb),
            Command::Empty => Ok(()),
        }
    }
}
