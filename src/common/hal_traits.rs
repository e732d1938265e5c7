// src/common/hal_traits.rs

use super::error::TransportFailure;
use core::fmt::Debug;
use core::ops::Add;
use core::time::Duration;

/// How the read half of a write-then-read exchange came to an end.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The input terminator was matched (and stripped).
    Terminator,
    /// The reply filled the caller's buffer before a terminator arrived.
    BufferFull,
    /// The transport delivered a complete message without a terminator
    /// (message-based links such as GPIB with EOI).
    End,
}

/// Outcome of a successful write-then-read exchange.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// Bytes of the request the transport accepted.
    pub written: usize,
    /// Reply bytes placed at the start of the caller's buffer, terminator excluded.
    pub read: usize,
    pub termination: Termination,
}

/// Abstraction for the line-oriented, synchronous request/response channel
/// that connects the driver to one instrument.
///
/// Implementations supply the terminator on write and strip it on read.
/// Both operations block for at most `timeout`.
pub trait Transport {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Fire-and-forget write. Returns the number of request bytes written.
    fn write(
        &mut self,
        request: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportFailure<Self::Error>>;

    /// Writes `request`, then reads one reply line into `reply`.
    fn write_read(
        &mut self,
        request: &[u8],
        reply: &mut [u8],
        timeout: Duration,
    ) -> Result<Exchange, TransportFailure<Self::Error>>;
}

/// Instant type produced by a [`Timer`].
pub trait TimerInstant: Copy + Ord + Add<Duration, Output = Self> {}

impl<I> TimerInstant for I where I: Copy + Ord + Add<Duration, Output = I> {}

/// Abstraction for the monotonic clock and delay used to enforce deadlines.
pub trait Timer {
    type Instant: TimerInstant;

    /// Current instant.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);
}

/// Abstraction for non-blocking, byte-level serial communication.
///
/// [`crate::driver::SerialLink`] turns any implementation of this trait
/// (plus [`Timer`]) into a [`Transport`].
pub trait ByteSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if no byte is available yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}
