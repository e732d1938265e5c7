// src/driver/serial_link.rs

use crate::common::{
    error::TransportFailure,
    hal_traits::{ByteSerial, Exchange, Termination, Timer, Transport},
    timing,
};
use core::time::Duration;
use nb::Result as NbResult;

/// [`Transport`] over a byte-level serial interface.
///
/// Appends the output terminator to every request and reads replies until
/// the input terminator, the end of the caller's buffer or the deadline.
#[derive(Debug)]
pub struct SerialLink<IF>
where
    IF: ByteSerial + Timer,
{
    interface: IF,
    output_terminator: &'static [u8],
    input_terminator: &'static [u8],
}

impl<IF> SerialLink<IF>
where
    IF: ByteSerial + Timer,
{
    /// Link with `\n` terminators in both directions.
    pub fn new(interface: IF) -> Self {
        SerialLink {
            interface,
            output_terminator: b"\n",
            input_terminator: b"\n",
        }
    }

    /// Overrides the terminators, e.g. `b"\r"` for instruments set to CR.
    /// An empty input terminator means replies end only on a full buffer.
    pub fn with_terminators(mut self, output: &'static [u8], input: &'static [u8]) -> Self {
        self.output_terminator = output;
        self.input_terminator = input;
        self
    }

    pub fn interface(&self) -> &IF {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    pub fn into_inner(self) -> IF {
        self.interface
    }

    /// Retries the non-blocking operation `f` until it stops returning
    /// `WouldBlock` or `deadline` passes.
    fn block_until<FN, T>(
        &mut self,
        deadline: IF::Instant,
        mut f: FN,
    ) -> Result<T, TransportFailure<<IF as ByteSerial>::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, <IF as ByteSerial>::Error>,
    {
        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Err(TransportFailure::Timeout);
                    }
                    self.interface.delay_us(timing::POLL_INTERVAL_US);
                }
                Err(nb::Error::Other(e)) => return Err(TransportFailure::Io(e)),
            }
        }
    }

    fn discard_stale_input(&mut self) -> Result<(), TransportFailure<<IF as ByteSerial>::Error>> {
        for _ in 0..timing::STALE_INPUT_LIMIT {
            match self.interface.read_byte() {
                Ok(_) => continue,
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => return Err(TransportFailure::Io(e)),
            }
        }
        Ok(())
    }

    fn send_line(
        &mut self,
        request: &[u8],
        deadline: IF::Instant,
    ) -> Result<usize, TransportFailure<<IF as ByteSerial>::Error>> {
        let terminator = self.output_terminator;
        for byte in request.iter().chain(terminator) {
            self.block_until(deadline, |iface| iface.write_byte(*byte))?;
        }
        self.block_until(deadline, |iface| iface.flush())?;
        Ok(request.len())
    }
}

impl<IF> Transport for SerialLink<IF>
where
    IF: ByteSerial + Timer,
{
    type Error = <IF as ByteSerial>::Error;

    fn write(
        &mut self,
        request: &[u8],
        timeout: Duration,
    ) -> Result<usize, TransportFailure<Self::Error>> {
        let deadline = self.interface.now() + timeout;
        self.send_line(request, deadline)
    }

    fn write_read(
        &mut self,
        request: &[u8],
        reply: &mut [u8],
        timeout: Duration,
    ) -> Result<Exchange, TransportFailure<Self::Error>> {
        let deadline = self.interface.now() + timeout;
        self.discard_stale_input()?;
        let written = self.send_line(request, deadline)?;

        let terminator = self.input_terminator;
        let mut read = 0;
        loop {
            if read >= reply.len() {
                return Ok(Exchange { written, read, termination: Termination::BufferFull });
            }
            let byte = self.block_until(deadline, |iface| iface.read_byte())?;
            reply[read] = byte;
            read += 1;

            if !terminator.is_empty() && reply[..read].ends_with(terminator) {
                read -= terminator.len();
                return Ok(Exchange { written, read, termination: Termination::Terminator });
            }
        }
    }
}
