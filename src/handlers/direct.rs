// src/handlers/direct.rs

//! Parameters whose wire encoding needs parameter-specific logic.

use super::{skipped_read, skipped_write, Context, ParameterHandler};
use crate::common::{
    codec::{self, FilterMode, Rate, VoltageRange},
    verb, Argument, Command, Error, Transport, Value, ValueKind,
};
use crate::driver::{link::REPLY_CAPACITY, state::Reading};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirectCommand {
    /// Accepts every access and does nothing.
    Void,
    /// `READ?`: refreshes the cached reading, timestamp and status.
    Read,
    Range,
    RangeAutoUpperLimit,
    RangeAutoLowerLimit,
    Rate,
    DigitalFilterControl,
    VoltRange,
}

impl DirectCommand {
    fn name(&self) -> &'static str {
        match self {
            DirectCommand::Void => "VOID",
            DirectCommand::Read => "READ",
            DirectCommand::Range => "RANGE",
            DirectCommand::RangeAutoUpperLimit => "RANGE_AUTO_ULIMIT",
            DirectCommand::RangeAutoLowerLimit => "RANGE_AUTO_LLIMIT",
            DirectCommand::Rate => "RATE",
            DirectCommand::DigitalFilterControl => "DIGITAL_FILTER_CONTROL",
            DirectCommand::VoltRange => "VOLT_RANGE",
        }
    }

    /// Kinds this parameter answers to; `Read` and `Void` are handled apart.
    fn supports(&self, kind: ValueKind) -> bool {
        match self {
            DirectCommand::Void => false,
            DirectCommand::Read => true,
            DirectCommand::Range
            | DirectCommand::RangeAutoUpperLimit
            | DirectCommand::RangeAutoLowerLimit => kind != ValueKind::Text,
            DirectCommand::Rate | DirectCommand::DigitalFilterControl | DirectCommand::VoltRange => {
                kind == ValueKind::Integer
            }
        }
    }
}

/// Queries `verb?` and hands the reply to `decode`.
fn query_with<T, R, F>(ctx: &mut Context<'_, T>, verb: &str, decode: F) -> Result<R, Error<T::Error>>
where
    T: Transport,
    F: FnOnce(&str) -> Result<R, codec::CodecError>,
{
    let mut buf = [0u8; REPLY_CAPACITY];
    let reply = ctx.link.query(&Command::Query(verb), &mut buf)?;
    Ok(decode(reply)?)
}

/// Range index for Integer reads, full scale in amperes for Float64 reads.
fn read_range<T: Transport>(
    ctx: &mut Context<'_, T>,
    verb: &str,
    kind: ValueKind,
) -> Result<Value, Error<T::Error>> {
    if kind == ValueKind::Float64 {
        query_with(ctx, verb, codec::range_amps).map(Value::Float64)
    } else {
        query_with(ctx, verb, codec::range_index).map(Value::Integer)
    }
}

fn set_range(verb: &'static str, index: i32) -> Result<Command<'static>, codec::CodecError> {
    Ok(Command::Set {
        verb,
        argument: Argument::RangeExponent(codec::range_exponent(index)?),
    })
}

fn read_sensor<T: Transport>(
    ctx: &mut Context<'_, T>,
    kind: ValueKind,
) -> Result<Value, Error<T::Error>> {
    let mut buf = [0u8; REPLY_CAPACITY];
    let reply = ctx.link.query(&Command::Read, &mut buf)?;
    let (reading, reading_text) = Reading::parse(reply)?;
    ctx.state.record_reading(reading);

    Ok(match kind {
        ValueKind::Text => Value::text(reading_text),
        ValueKind::Float64 => Value::Float64(reading.value),
        // The snapshot is refreshed, but there is no integer view of a reading.
        ValueKind::Integer => Value::Integer(0),
    })
}

impl ParameterHandler for DirectCommand {
    fn read<T: Transport>(
        &self,
        ctx: &mut Context<'_, T>,
        kind: ValueKind,
    ) -> Result<Value, Error<T::Error>> {
        if !self.supports(kind) {
            return Ok(skipped_read(self.name(), kind));
        }

        match self {
            DirectCommand::Read => read_sensor(ctx, kind),
            DirectCommand::Range => read_range(ctx, verb::RANGE, kind),
            DirectCommand::RangeAutoUpperLimit => read_range(ctx, verb::RANGE_AUTO_ULIMIT, kind),
            DirectCommand::RangeAutoLowerLimit => read_range(ctx, verb::RANGE_AUTO_LLIMIT, kind),
            DirectCommand::Rate => query_with(ctx, verb::RATE, |reply| {
                codec::parse_float(reply).map(|nplc| Rate::classify(nplc).index())
            })
            .map(Value::Integer),
            DirectCommand::DigitalFilterControl => {
                query_with(ctx, verb::DIGITAL_FILTER_CONTROL, |reply| {
                    FilterMode::from_token(reply).map(FilterMode::index)
                })
                .map(Value::Integer)
            }
            DirectCommand::VoltRange => query_with(ctx, verb::VOLT_RANGE, |reply| {
                codec::parse_float(reply).map(|volts| VoltageRange::classify(volts).index())
            })
            .map(Value::Integer),
            DirectCommand::Void => Ok(Value::zero(kind)),
        }
    }

    fn write<T: Transport>(
        &self,
        ctx: &mut Context<'_, T>,
        value: Value,
    ) -> Result<(), Error<T::Error>> {
        let index = match (self, value) {
            (DirectCommand::Void, _) | (DirectCommand::Read, _) => return Ok(()),
            (_, Value::Integer(index)) => index,
            _ => {
                skipped_write(self.name(), &value);
                return Ok(());
            }
        };

        let command = match self {
            DirectCommand::Range => set_range(verb::RANGE, index)?,
            DirectCommand::RangeAutoUpperLimit => set_range(verb::RANGE_AUTO_ULIMIT, index)?,
            DirectCommand::RangeAutoLowerLimit => set_range(verb::RANGE_AUTO_LLIMIT, index)?,
            DirectCommand::Rate => Command::Set {
                verb: verb::RATE,
                argument: Argument::Float(Rate::from_index(index)?.nplc()),
            },
            DirectCommand::DigitalFilterControl => Command::Set {
                verb: verb::DIGITAL_FILTER_CONTROL,
                argument: Argument::Token(FilterMode::from_index(index)?.token()),
            },
            DirectCommand::VoltRange => Command::Set {
                verb: verb::VOLT_RANGE,
                argument: Argument::Integer(VoltageRange::from_index(index)?.volts()),
            },
            DirectCommand::Void | DirectCommand::Read => return Ok(()),
        };
        ctx.link.send(&command)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{StatusWord, TransportFailure, Variant};
    use crate::test_support::{ready_connection, MockTransport};

    #[test]
    fn test_sensor_read_updates_snapshot() {
        let mut t = MockTransport::new();
        t.expect_reply("1.234E-6,12345,96");
        let mut conn = ready_connection(t, Variant::K6485);

        let h = conn.bind("READ").unwrap();
        assert_eq!(conn.read(h, ValueKind::Float64).unwrap(), Value::Float64(1.234e-6));
        let reading = conn.state().last_reading();
        assert_eq!(reading.value, 1.234e-6);
        assert_eq!(reading.timestamp, 12345);
        assert_eq!(reading.status, StatusWord(96));
        assert_eq!(conn.transport().sent(), ["READ?"]);
    }

    #[test]
    fn test_sensor_read_text_and_integer_kinds() {
        let mut t = MockTransport::new();
        t.expect_reply("-2.109665E-11A,+1.000000E+01,+0.000000E+00");
        t.expect_reply("5.0E-9,20,1");
        let mut conn = ready_connection(t, Variant::K6485);
        let h = conn.bind("READ").unwrap();

        let text = conn.read(h, ValueKind::Text).unwrap();
        assert_eq!(text.as_text(), Some("-2.109665E-11A"));

        // Integer kind still performs the exchange and refreshes the snapshot.
        assert_eq!(conn.read(h, ValueKind::Integer).unwrap(), Value::Integer(0));
        assert_eq!(conn.state().last_reading().timestamp, 20);
    }

    #[test]
    fn test_malformed_sensor_reply_leaves_snapshot() {
        let mut t = MockTransport::new();
        t.expect_reply("1.0E-9,7,1");
        t.expect_reply("abc,def");
        let mut conn = ready_connection(t, Variant::K6485);
        let h = conn.bind("READ").unwrap();

        conn.read(h, ValueKind::Float64).unwrap();
        let before = *conn.state().last_reading();
        assert!(matches!(conn.read(h, ValueKind::Float64), Err(Error::MalformedReply)));
        assert_eq!(*conn.state().last_reading(), before);
        assert_eq!(conn.statistics().io_errors, 0);
    }

    #[test]
    fn test_transport_failure_counts_once_and_leaves_snapshot() {
        let mut t = MockTransport::new();
        t.expect_reply("1.0E-9,7,1");
        t.fail_next(TransportFailure::Timeout);
        let mut conn = ready_connection(t, Variant::K6485);
        let h = conn.bind("READ").unwrap();

        conn.read(h, ValueKind::Float64).unwrap();
        let before = *conn.state().last_reading();
        let err = conn.read(h, ValueKind::Float64).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(conn.statistics().io_errors, 1);
        assert_eq!(*conn.state().last_reading(), before);
    }

    #[test]
    fn test_truncated_sensor_reply_leaves_snapshot() {
        let mut t = MockTransport::new();
        t.expect_reply("1.0E-9,7,1");
        let mut long = " ".repeat(REPLY_CAPACITY - 11);
        long.push_str("1.0,12345,96");
        t.expect_reply(&long);
        let mut conn = ready_connection(t, Variant::K6485);
        let h = conn.bind("READ").unwrap();

        conn.read(h, ValueKind::Float64).unwrap();
        let before = *conn.state().last_reading();
        assert!(matches!(conn.read(h, ValueKind::Float64), Err(Error::MalformedReply)));
        assert_eq!(*conn.state().last_reading(), before);
        assert_eq!(conn.state().last_reading().status, StatusWord(1));
    }

    #[test]
    fn test_range_write_domain() {
        let mut conn = ready_connection(MockTransport::new(), Variant::K6485);
        let h = conn.bind("RANGE").unwrap();

        conn.write(h, Value::Integer(0)).unwrap();
        assert!(matches!(
            conn.write(h, Value::Integer(8)),
            Err(Error::OutOfRange { value: 8, min: 0, max: 7 })
        ));
        assert!(matches!(conn.write(h, Value::Integer(-1)), Err(Error::OutOfRange { .. })));
        assert_eq!(conn.transport().sent(), [":RANGE 2.0e-9"]);
    }

    #[test]
    fn test_range_limits_use_their_own_verbs() {
        let mut t = MockTransport::new();
        t.expect_reply("2.000000E-02");
        let mut conn = ready_connection(t, Variant::K6485);

        let upper = conn.bind("RANGE_AUTO_ULIMIT").unwrap();
        let lower = conn.bind("RANGE_AUTO_LLIMIT").unwrap();
        assert_eq!(conn.read(upper, ValueKind::Integer).unwrap(), Value::Integer(7));
        conn.write(lower, Value::Integer(3)).unwrap();
        assert_eq!(conn.transport().sent(), [":RANGE:AUTO:ULIM?", ":RANGE:AUTO:LLIM 2.0e-6"]);
    }

    #[test]
    fn test_range_float_read_and_zero_rejection() {
        let mut t = MockTransport::new();
        t.expect_reply("2.000000E-06");
        t.expect_reply("0.000000E+00");
        let mut conn = ready_connection(t, Variant::K6485);
        let h = conn.bind("RANGE").unwrap();

        assert_eq!(conn.read(h, ValueKind::Float64).unwrap(), Value::Float64(2.0e-6));
        assert!(matches!(conn.read(h, ValueKind::Integer), Err(Error::MalformedReply)));
    }

    #[test]
    fn test_range_text_kind_is_noop() {
        let mut conn = ready_connection(MockTransport::new(), Variant::K6485);
        let h = conn.bind("RANGE").unwrap();
        assert_eq!(conn.read(h, ValueKind::Text).unwrap().as_text(), Some(""));
        conn.write(h, Value::text("2")).unwrap();
        conn.write(h, Value::Float64(2.0)).unwrap();
        assert!(conn.transport().sent().is_empty());
    }

    #[test]
    fn test_rate_read_and_write() {
        let mut t = MockTransport::new();
        t.expect_reply("6.000000E+00");
        t.expect_reply("1.000000E+00");
        t.expect_reply("1.000000E-01");
        let mut conn = ready_connection(t, Variant::K6485);
        let h = conn.bind("RATE").unwrap();

        assert_eq!(conn.read(h, ValueKind::Integer).unwrap(), Value::Integer(0));
        assert_eq!(conn.read(h, ValueKind::Integer).unwrap(), Value::Integer(1));
        assert_eq!(conn.read(h, ValueKind::Integer).unwrap(), Value::Integer(2));

        conn.write(h, Value::Integer(0)).unwrap();
        conn.write(h, Value::Integer(2)).unwrap();
        assert!(matches!(conn.write(h, Value::Integer(3)), Err(Error::OutOfRange { .. })));
        assert_eq!(&conn.transport().sent()[3..], [":NPLC 6", ":NPLC 0.1"]);
    }

    #[test]
    fn test_digital_filter_control() {
        let mut t = MockTransport::new();
        t.expect_reply("REP");
        t.expect_reply("AUTO");
        let mut conn = ready_connection(t, Variant::K6487);
        let h = conn.bind("DIGITAL_FILTER_CONTROL").unwrap();

        assert_eq!(conn.read(h, ValueKind::Integer).unwrap(), Value::Integer(1));
        assert!(matches!(conn.read(h, ValueKind::Integer), Err(Error::MalformedReply)));
        conn.write(h, Value::Integer(0)).unwrap();
        assert!(matches!(conn.write(h, Value::Integer(2)), Err(Error::OutOfRange { .. })));
        assert_eq!(&conn.transport().sent()[2..], ["AVER:TCON MOV"]);
    }

    #[test]
    fn test_volt_range() {
        let mut t = MockTransport::new();
        t.expect_reply("5.000000E+01");
        let mut conn = ready_connection(t, Variant::K6487);
        let h = conn.bind("VOLT_RANGE").unwrap();

        assert_eq!(conn.read(h, ValueKind::Integer).unwrap(), Value::Integer(1));
        conn.write(h, Value::Integer(2)).unwrap();
        assert_eq!(conn.transport().sent(), ["SOUR:VOLT:RANG?", "SOUR:VOLT:RANG 500"]);
    }

    #[test]
    fn test_void_accepts_everything() {
        let mut conn = ready_connection(MockTransport::new(), Variant::K6485);
        let h = conn.bind("void").unwrap();
        for kind in ValueKind::ALL {
            assert_eq!(conn.read(h, kind).unwrap(), Value::zero(kind));
        }
        conn.write(h, Value::Integer(42)).unwrap();
        assert!(conn.transport().sent().is_empty());
    }
}
