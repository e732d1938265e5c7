// src/handlers/simple.rs

//! Table-driven parameters: `<verb>?` to read, `<verb> <value>` to write,
//! or a bare trigger verb.

use super::{skipped_read, skipped_write, Context, ParameterHandler};
use crate::common::{codec, verb, Argument, Command, Error, Transport, Value, ValueKind};
use crate::driver::link::REPLY_CAPACITY;

/// Shape of a simple parameter's value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimpleKind {
    /// Read and written as this kind.
    Value(ValueKind),
    /// Write-only command with no argument; the written value is ignored.
    Trigger,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SimpleCommand {
    pub verb: &'static str,
    pub kind: SimpleKind,
}

const fn trigger(verb: &'static str) -> SimpleCommand {
    SimpleCommand { verb, kind: SimpleKind::Trigger }
}

const fn integer(verb: &'static str) -> SimpleCommand {
    SimpleCommand { verb, kind: SimpleKind::Value(ValueKind::Integer) }
}

pub static RESET: SimpleCommand = trigger(verb::RESET);
pub static RANGE_AUTO: SimpleCommand = integer(verb::RANGE_AUTO);
pub static ZERO_CHECK: SimpleCommand = integer(verb::ZERO_CHECK);
pub static ZERO_CORRECT: SimpleCommand = integer(verb::ZERO_CORRECT);
pub static ZERO_CORRECT_ACQUIRE: SimpleCommand = trigger(verb::ZERO_CORRECT_ACQUIRE);
pub static MEDIAN_FILTER: SimpleCommand = integer(verb::MEDIAN_FILTER);
pub static MEDIAN_FILTER_RANK: SimpleCommand = integer(verb::MEDIAN_FILTER_RANK);
pub static DIGITAL_FILTER: SimpleCommand = integer(verb::DIGITAL_FILTER);
pub static DIGITAL_FILTER_COUNT: SimpleCommand = integer(verb::DIGITAL_FILTER_COUNT);

/// Every simple command, in registry order.
pub static SIMPLE_COMMANDS: [&SimpleCommand; 9] = [
    &RESET,
    &RANGE_AUTO,
    &ZERO_CHECK,
    &ZERO_CORRECT,
    &ZERO_CORRECT_ACQUIRE,
    &MEDIAN_FILTER,
    &MEDIAN_FILTER_RANK,
    &DIGITAL_FILTER,
    &DIGITAL_FILTER_COUNT,
];

impl ParameterHandler for SimpleCommand {
    fn read<T: Transport>(
        &self,
        ctx: &mut Context<'_, T>,
        kind: ValueKind,
    ) -> Result<Value, Error<T::Error>> {
        if self.kind != SimpleKind::Value(kind) {
            return Ok(skipped_read(self.verb, kind));
        }

        let mut buf = [0u8; REPLY_CAPACITY];
        let reply = ctx.link.query(&Command::Query(self.verb), &mut buf)?;
        Ok(match kind {
            ValueKind::Integer => Value::Integer(codec::parse_integer(reply)?),
            ValueKind::Float64 => Value::Float64(codec::parse_float(reply)?),
            ValueKind::Text => Value::text(reply),
        })
    }

    fn write<T: Transport>(
        &self,
        ctx: &mut Context<'_, T>,
        value: Value,
    ) -> Result<(), Error<T::Error>> {
        let command = match self.kind {
            SimpleKind::Trigger => Command::Trigger(self.verb),
            SimpleKind::Value(kind) if kind == value.kind() => {
                let argument = match &value {
                    Value::Integer(v) => Argument::Integer(*v),
                    Value::Float64(v) => Argument::Float(*v),
                    Value::Text(t) => Argument::Text(t.as_str()),
                };
                Command::Set { verb: self.verb, argument }
            }
            SimpleKind::Value(_) => {
                skipped_write(self.verb, &value);
                return Ok(());
            }
        };
        ctx.link.send(&command)
    }
}
