// src/driver/mod.rs

pub(crate) mod link;
pub mod serial_link;
pub mod setup;
pub mod state;

pub use serial_link::SerialLink;
pub use setup::{Host, SetupStage};
pub use state::{DeviceState, Reading, Statistics};

use crate::common::{Error, Termination, Transport, Value, ValueKind, Variant};
use crate::handlers::{Context, ParameterHandler};
use crate::registry::{Descriptor, ParamHandle, Registry};
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;
use link::Link;
use tracing::debug;

/// One set-up instrument connection.
///
/// Accesses are expected to be serialized by the caller; the connection does
/// no locking of its own.
#[derive(Debug)]
pub struct Connection<T: Transport> {
    registry: Registry,
    link: Link<T>,
    state: DeviceState,
    io_port: String,
    io_address: i32,
}

impl<T: Transport> Connection<T> {
    // --- Parameter Access ---

    /// Resolves `name` for this connection's variant. Failures here are
    /// binding errors, not access errors.
    pub fn bind(&self, name: &str) -> Result<ParamHandle, Error<T::Error>> {
        self.registry
            .resolve(name, self.state.variant())
            .map_err(|e| {
                debug!(port = self.link.port_name(), name, "bind failed: {}", e);
                Error::from(e)
            })
    }

    pub fn read(&mut self, handle: ParamHandle, kind: ValueKind) -> Result<Value, Error<T::Error>> {
        let descriptor = self.checked(handle)?;
        let mut ctx = Context::new(&mut self.link, &mut self.state);
        descriptor.handler.read(&mut ctx, kind)
    }

    pub fn write(&mut self, handle: ParamHandle, value: Value) -> Result<(), Error<T::Error>> {
        let descriptor = self.checked(handle)?;
        let mut ctx = Context::new(&mut self.link, &mut self.state);
        descriptor.handler.write(&mut ctx, value)
    }

    pub fn read_named(&mut self, name: &str, kind: ValueKind) -> Result<Value, Error<T::Error>> {
        let handle = self.bind(name)?;
        self.read(handle, kind)
    }

    pub fn write_named(&mut self, name: &str, value: Value) -> Result<(), Error<T::Error>> {
        let handle = self.bind(name)?;
        self.write(handle, value)
    }

    /// Descriptor behind `handle`, once the access is known to be allowed.
    fn checked(&self, handle: ParamHandle) -> Result<&'static Descriptor, Error<T::Error>> {
        let descriptor = self
            .registry
            .get(handle)
            .ok_or_else(|| Error::<T::Error>::NotFound(format!("#{}", handle.index())))?;
        let variant = self.state.variant();
        if !descriptor.applicability.includes(variant) {
            return Err(Error::WrongVariant { name: descriptor.name, variant });
        }
        if !self.state.is_ready() {
            return Err(Error::NotReady);
        }
        Ok(descriptor)
    }

    /// Ready connection that skipped the setup exchanges.
    #[cfg(test)]
    pub(crate) fn ready_for_test(transport: T, variant: Variant) -> Self {
        use crate::common::Identification;

        let timeout = variant.default_timeout();
        let mut state = DeviceState::new(variant);
        let model = format!("MODEL{}", variant.model_number());
        state.mark_ready(Identification {
            model,
            serial: "SN001".to_string(),
            digital_revision: "A1".to_string(),
            display_revision: "B2".to_string(),
            board_revision: "C3".to_string(),
        });
        Connection {
            registry: Registry::standard(),
            link: Link::new(transport, "K1".to_string(), timeout),
            state,
            io_port: "serial1".to_string(),
            io_address: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_context<R>(&mut self, f: impl FnOnce(&mut Context<'_, T>) -> R) -> R {
        let mut ctx = Context::new(&mut self.link, &mut self.state);
        f(&mut ctx)
    }

    // --- Lifecycle ---

    /// Marks the connection unusable; every later access fails with `NotReady`.
    pub fn close(&mut self) {
        self.state.mark_closed();
        debug!(port = self.link.port_name(), "connection closed");
    }

    // --- Inspection ---

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn variant(&self) -> Variant {
        self.state.variant()
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn statistics(&self) -> Statistics {
        self.link.statistics()
    }

    /// How the most recent write-then-read exchange ended.
    pub fn last_termination(&self) -> Option<Termination> {
        self.link.last_termination()
    }

    pub fn port_name(&self) -> &str {
        self.link.port_name()
    }

    pub fn timeout(&self) -> core::time::Duration {
        self.link.timeout()
    }

    pub fn transport(&self) -> &T {
        self.link.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.link.transport_mut()
    }

    pub fn report(&self) -> Report {
        Report {
            variant: self.state.variant(),
            port_name: self.link.port_name().to_string(),
            io_port: self.io_port.clone(),
            io_address: self.io_address,
            statistics: self.link.statistics(),
            ready: self.state.is_ready(),
        }
    }
}

/// Snapshot of a connection for human-readable status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub variant: Variant,
    pub port_name: String,
    pub io_port: String,
    pub io_address: i32,
    pub statistics: Statistics,
    pub ready: bool,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} port: {}", self.variant, self.port_name)?;
        writeln!(f, "    server:     {}", self.io_port)?;
        writeln!(f, "    address:    {}", self.io_address)?;
        writeln!(f, "    ioErrors:   {}", self.statistics.io_errors)?;
        writeln!(f, "    writeReads: {}", self.statistics.write_reads)?;
        writeln!(f, "    writeOnlys: {}", self.statistics.write_onlys)?;
        write!(
            f,
            "    support {} initialized",
            if self.ready { "IS" } else { "IS NOT" }
        )
    }
}
