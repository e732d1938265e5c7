// src/handlers/cached.rs

//! Read-only projections of [`DeviceState`]. These never touch the transport.
//!
//! [`DeviceState`]: crate::driver::state::DeviceState

use super::{skipped_read, Context, ParameterHandler};
use crate::common::{Error, Transport, Value, ValueKind};
use crate::driver::state::DeviceState;
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CachedField {
    Model,
    Serial,
    DigitalRevision,
    DisplayRevision,
    BoardRevision,
    Timestamp,
    StatusRaw,
    Overflow,
    Filter,
    Math,
    Null,
    /// Limit result code; 0 (pass) whenever limit testing is off.
    Limits,
    Overvoltage,
    ZeroCheck,
    ZeroCorrect,
}

impl CachedField {
    fn name(&self) -> &'static str {
        match self {
            CachedField::Model => "MODEL",
            CachedField::Serial => "SERIAL",
            CachedField::DigitalRevision => "DIG_REV",
            CachedField::DisplayRevision => "DISP_REV",
            CachedField::BoardRevision => "BRD_REV",
            CachedField::Timestamp => "TIMESTAMP",
            CachedField::StatusRaw => "STATUS_RAW",
            CachedField::Overflow => "STATUS_OVERFLOW",
            CachedField::Filter => "STATUS_FILTER",
            CachedField::Math => "STATUS_MATH",
            CachedField::Null => "STATUS_NULL",
            CachedField::Limits => "STATUS_LIMITS",
            CachedField::Overvoltage => "STATUS_OVERVOLTAGE",
            CachedField::ZeroCheck => "STATUS_ZERO_CHECK",
            CachedField::ZeroCorrect => "STATUS_ZERO_CORRECT",
        }
    }

    fn text(&self, state: &DeviceState) -> Option<Value> {
        let id = state.identification();
        let field = match self {
            CachedField::Model => id.map(|i| i.model.as_str()),
            CachedField::Serial => id.map(|i| i.serial.as_str()),
            CachedField::DigitalRevision => id.map(|i| i.digital_revision.as_str()),
            CachedField::DisplayRevision => id.map(|i| i.display_revision.as_str()),
            CachedField::BoardRevision => id.map(|i| i.board_revision.as_str()),
            _ => return None,
        };
        Some(Value::text(field.unwrap_or("")))
    }

    fn integer(&self, state: &DeviceState) -> Option<Value> {
        let reading = state.last_reading();
        let flags = reading.status.decode();
        let v = match self {
            CachedField::Timestamp => reading.timestamp,
            CachedField::StatusRaw => i32::from(reading.status.raw()),
            CachedField::Overflow => i32::from(flags.overflow),
            CachedField::Filter => i32::from(flags.filter_enabled),
            CachedField::Math => i32::from(flags.math_enabled),
            CachedField::Null => i32::from(flags.null_enabled),
            CachedField::Limits => flags.effective_limit_result().code(),
            CachedField::Overvoltage => i32::from(flags.overvoltage),
            CachedField::ZeroCheck => i32::from(flags.zero_check_enabled),
            CachedField::ZeroCorrect => i32::from(flags.zero_correct_enabled),
            _ => return None,
        };
        Some(Value::Integer(v))
    }

    /// Current value of this field, without any I/O.
    pub fn project(&self, state: &DeviceState, kind: ValueKind) -> Value {
        let value = match kind {
            ValueKind::Text => self.text(state),
            ValueKind::Integer => self.integer(state),
            ValueKind::Float64 => None,
        };
        value.unwrap_or_else(|| skipped_read(self.name(), kind))
    }
}

impl ParameterHandler for CachedField {
    fn read<T: Transport>(
        &self,
        ctx: &mut Context<'_, T>,
        kind: ValueKind,
    ) -> Result<Value, Error<T::Error>> {
        Ok(self.project(ctx.state(), kind))
    }

    fn write<T: Transport>(
        &self,
        _ctx: &mut Context<'_, T>,
        _value: Value,
    ) -> Result<(), Error<T::Error>> {
        debug!(parameter = self.name(), "write to read-only parameter ignored");
        Ok(())
    }
}
