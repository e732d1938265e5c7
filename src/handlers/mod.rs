// src/handlers/mod.rs

//! The three dispatch strategies behind registry entries.
//!
//! A value kind that does not fit the parameter is never an error: reads
//! report the kind's zero value and writes are dropped.

pub mod cached;
pub mod direct;
pub mod simple;

use crate::common::{Error, Transport, Value, ValueKind};
use crate::driver::{link::Link, state::DeviceState};
use crate::registry::Handler;
use tracing::debug;

/// What a handler may touch during one access.
pub struct Context<'c, T: Transport> {
    pub(crate) link: &'c mut Link<T>,
    pub(crate) state: &'c mut DeviceState,
}

impl<'c, T: Transport> Context<'c, T> {
    pub(crate) fn new(link: &'c mut Link<T>, state: &'c mut DeviceState) -> Self {
        Context { link, state }
    }

    pub fn state(&self) -> &DeviceState {
        self.state
    }
}

/// Read and write sides of one handler.
pub trait ParameterHandler {
    fn read<T: Transport>(
        &self,
        ctx: &mut Context<'_, T>,
        kind: ValueKind,
    ) -> Result<Value, Error<T::Error>>;

    fn write<T: Transport>(
        &self,
        ctx: &mut Context<'_, T>,
        value: Value,
    ) -> Result<(), Error<T::Error>>;
}

impl ParameterHandler for Handler {
    fn read<T: Transport>(
        &self,
        ctx: &mut Context<'_, T>,
        kind: ValueKind,
    ) -> Result<Value, Error<T::Error>> {
        match self {
            Handler::Direct(command) => command.read(ctx, kind),
            Handler::Simple(command) => command.read(ctx, kind),
            Handler::Cached(field) => field.read(ctx, kind),
        }
    }

    fn write<T: Transport>(
        &self,
        ctx: &mut Context<'_, T>,
        value: Value,
    ) -> Result<(), Error<T::Error>> {
        match self {
            Handler::Direct(command) => command.write(ctx, value),
            Handler::Simple(command) => command.write(ctx, value),
            Handler::Cached(field) => field.write(ctx, value),
        }
    }
}

/// Zero value for a read whose kind the parameter does not support.
pub(crate) fn skipped_read(what: &str, kind: ValueKind) -> Value {
    debug!(parameter = what, %kind, "read of unsupported kind skipped");
    Value::zero(kind)
}

/// Drops a write whose kind the parameter does not support.
pub(crate) fn skipped_write(what: &str, value: &Value) {
    debug!(parameter = what, kind = %value.kind(), "write of unsupported kind dropped");
}
