// src/test_support.rs

//! Hand-written mocks shared by the unit tests.

use crate::common::{
    error::{HostError, TransportFailure},
    hal_traits::{ByteSerial, Exchange, Termination, Timer, Transport},
    ValueKind, Variant,
};
use crate::driver::{setup::Host, Connection};
use alloc::collections::VecDeque;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::ops::Add;
use core::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MockIoError {
    Disconnected,
}

enum Step {
    Reply(Vec<u8>),
    Fail(TransportFailure<MockIoError>),
}

/// Scripted [`Transport`]: replies and failures are consumed in order.
///
/// A write only consumes a queued failure. A write-read with nothing
/// queued times out.
#[derive(Default)]
pub struct MockTransport {
    script: VecDeque<Step>,
    sent: Vec<String>,
    short_by: usize,
    last_timeout: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_reply(&mut self, reply: &str) {
        self.script.push_back(Step::Reply(reply.as_bytes().to_vec()));
    }

    pub fn expect_raw_reply(&mut self, reply: &[u8]) {
        self.script.push_back(Step::Reply(reply.to_vec()));
    }

    pub fn fail_next(&mut self, failure: TransportFailure<MockIoError>) {
        self.script.push_back(Step::Fail(failure));
    }

    /// Next operation reports `n` fewer bytes written than requested.
    pub fn short_write_by(&mut self, n: usize) {
        self.short_by = n;
    }

    /// Every request seen, in order.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    pub fn last_timeout(&self) -> Option<Duration> {
        self.last_timeout
    }

    fn record(&mut self, request: &[u8], timeout: Duration) -> usize {
        self.sent.push(String::from_utf8_lossy(request).to_string());
        self.last_timeout = Some(timeout);
        let written = request.len().saturating_sub(self.short_by);
        self.short_by = 0;
        written
    }
}

impl core::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockTransport").field("sent", &self.sent).finish()
    }
}

impl Transport for MockTransport {
    type Error = MockIoError;

    fn write(
        &mut self,
        request: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportFailure<Self::Error>> {
        let written = self.record(request, timeout);
        if matches!(self.script.front(), Some(Step::Fail(_))) {
            if let Some(Step::Fail(failure)) = self.script.pop_front() {
                return Err(failure);
            }
        }
        Ok(written)
    }

    fn write_read(
        &mut self,
        request: &[u8],
        reply: &mut [u8],
        timeout: Duration,
    ) -> Result<Exchange, TransportFailure<Self::Error>> {
        let written = self.record(request, timeout);
        match self.script.pop_front() {
            Some(Step::Reply(bytes)) => {
                let read = bytes.len().min(reply.len());
                reply[..read].copy_from_slice(&bytes[..read]);
                let termination = if bytes.len() > reply.len() {
                    Termination::BufferFull
                } else {
                    Termination::Terminator
                };
                Ok(Exchange { written, read, termination })
            }
            Some(Step::Fail(failure)) => Err(failure),
            None => Err(TransportFailure::Timeout),
        }
    }
}

/// Connection past setup, with an empty request log.
pub fn ready_connection(transport: MockTransport, variant: Variant) -> Connection<MockTransport> {
    Connection::ready_for_test(transport, variant)
}

// --- Host ---

pub struct MockHost {
    transport: Option<MockTransport>,
    refuse_bind: bool,
    refuse_register: bool,
    bound_to: Option<(String, i32)>,
    registered: Option<String>,
    advertised: Vec<ValueKind>,
}

impl MockHost {
    pub fn new(transport: MockTransport) -> Self {
        MockHost {
            transport: Some(transport),
            refuse_bind: false,
            refuse_register: false,
            bound_to: None,
            registered: None,
            advertised: Vec::new(),
        }
    }

    pub fn refuse_bind(&mut self) {
        self.refuse_bind = true;
    }

    pub fn refuse_register(&mut self) {
        self.refuse_register = true;
    }

    pub fn bound_to(&self) -> Option<(&str, i32)> {
        self.bound_to.as_ref().map(|(port, addr)| (port.as_str(), *addr))
    }

    pub fn registered(&self) -> Option<&str> {
        self.registered.as_deref()
    }

    pub fn advertised(&self) -> &[ValueKind] {
        &self.advertised
    }
}

impl Host for MockHost {
    type Transport = MockTransport;

    fn bind(&mut self, io_port: &str, io_address: i32) -> Result<MockTransport, HostError> {
        if self.refuse_bind {
            return Err(HostError::new("port not found"));
        }
        self.bound_to = Some((io_port.to_string(), io_address));
        self.transport.take().ok_or_else(|| HostError::new("already bound"))
    }

    fn register_port(&mut self, port_name: &str) -> Result<(), HostError> {
        if self.refuse_register {
            return Err(HostError::new("port already registered"));
        }
        self.registered = Some(port_name.to_string());
        Ok(())
    }

    fn advertise_interfaces(&mut self, _port_name: &str, kinds: &[ValueKind]) -> Result<(), HostError> {
        self.advertised = kinds.to_vec();
        Ok(())
    }
}

// --- Byte-level serial ---

/// Simulated clock reading, in microseconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MockInstant(u64);

impl Add<Duration> for MockInstant {
    type Output = MockInstant;

    fn add(self, rhs: Duration) -> MockInstant {
        MockInstant(self.0 + rhs.as_micros() as u64)
    }
}

/// Byte-level serial mock. Queued replies become readable once the
/// request that precedes them has been flushed.
#[derive(Debug, Default)]
pub struct MockSerial {
    now_us: u64,
    rx: VecDeque<u8>,
    replies: VecDeque<Vec<u8>>,
    written: Vec<u8>,
    flushed: bool,
    write_error: Option<MockIoError>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes already waiting in the receive buffer.
    pub fn preload(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn queue_reply(&mut self, bytes: &[u8]) {
        self.replies.push_back(bytes.to_vec());
    }

    pub fn fail_writes(&mut self, error: MockIoError) {
        self.write_error = Some(error);
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn flushed(&self) -> bool {
        self.flushed
    }
}

impl ByteSerial for MockSerial {
    type Error = MockIoError;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if let Some(e) = self.write_error {
            return Err(nb::Error::Other(e));
        }
        self.written.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.flushed = true;
        if let Some(reply) = self.replies.pop_front() {
            self.rx.extend(reply);
        }
        Ok(())
    }
}

impl Timer for MockSerial {
    type Instant = MockInstant;

    fn now(&self) -> MockInstant {
        MockInstant(self.now_us)
    }

    fn delay_us(&mut self, us: u32) {
        self.now_us += u64::from(us);
    }
}
