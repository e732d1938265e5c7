// src/driver/link.rs

use super::state::Statistics;
use crate::common::{
    error::{Error, TransportFailure},
    hal_traits::{Termination, Transport},
    Command,
};
use alloc::string::String;
use core::time::Duration;
use tracing::{debug, trace, warn};

/// Size of the buffer one reply is read into.
pub const REPLY_CAPACITY: usize = 100;

/// Transport adapter: formats commands, enforces the full-write rule and
/// keeps the I/O counters.
///
/// Every transport failure is counted in `io_errors` exactly once; nothing
/// is retried here.
#[derive(Debug)]
pub(crate) struct Link<T: Transport> {
    transport: T,
    port_name: String,
    timeout: Duration,
    statistics: Statistics,
    last_termination: Option<Termination>,
}

impl<T: Transport> Link<T> {
    pub(crate) fn new(transport: T, port_name: String, timeout: Duration) -> Self {
        Link {
            transport,
            port_name,
            timeout,
            statistics: Statistics::default(),
            last_termination: None,
        }
    }

    pub(crate) fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub(crate) fn last_termination(&self) -> Option<Termination> {
        self.last_termination
    }

    pub(crate) fn port_name(&self) -> &str {
        &self.port_name
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn fail(&mut self, command: &str, failure: TransportFailure<T::Error>) -> Error<T::Error> {
        self.statistics.io_errors = self.statistics.io_errors.wrapping_add(1);
        warn!(port = %self.port_name, command, "transport failure: {}", failure);
        Error::Transport(failure)
    }

    /// Fire-and-forget write of one command.
    pub(crate) fn send(&mut self, command: &Command<'_>) -> Result<(), Error<T::Error>> {
        let out = command.format_into()?;
        let requested = out.len();

        let written = match self.transport.write(out.as_bytes(), self.timeout) {
            Ok(written) => written,
            Err(failure) => return Err(self.fail(&out, failure)),
        };
        if written != requested {
            return Err(self.fail(&out, TransportFailure::ShortWrite { written, requested }));
        }

        self.statistics.write_onlys = self.statistics.write_onlys.wrapping_add(1);
        trace!(port = %self.port_name, command = %out, "write");
        Ok(())
    }

    /// Writes one command and reads its reply line into `reply`.
    ///
    /// The returned text has any trailing CR, LF or NUL removed. A reply that
    /// filled the buffer before its terminator is cut short and is rejected as
    /// malformed.
    pub(crate) fn query<'b>(
        &mut self,
        command: &Command<'_>,
        reply: &'b mut [u8; REPLY_CAPACITY],
    ) -> Result<&'b str, Error<T::Error>> {
        let out = command.format_into()?;
        let requested = out.len();

        let exchange = match self.transport.write_read(out.as_bytes(), reply, self.timeout) {
            Ok(exchange) => exchange,
            Err(failure) => return Err(self.fail(&out, failure)),
        };
        if exchange.written != requested {
            let written = exchange.written;
            return Err(self.fail(&out, TransportFailure::ShortWrite { written, requested }));
        }

        self.statistics.write_reads = self.statistics.write_reads.wrapping_add(1);
        self.last_termination = Some(exchange.termination);
        if exchange.termination == Termination::BufferFull {
            debug!(port = %self.port_name, command = %out, "reply overflowed the reply buffer");
            return Err(Error::MalformedReply);
        }

        let raw = &reply[..exchange.read.min(REPLY_CAPACITY)];
        let text = core::str::from_utf8(raw).map_err(|_| Error::<T::Error>::MalformedReply)?;
        let text = text.trim_end_matches(['\r', '\n', '\0']);
        trace!(port = %self.port_name, command = %out, reply = text, "write_read");
        Ok(text)
    }
}
