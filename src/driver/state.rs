// src/driver/state.rs

use crate::common::{codec, CodecError, Identification, StatusWord, Variant};

/// Most recent decoded `READ?` snapshot.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Reading {
    pub value: f64,
    pub timestamp: i32,
    pub status: StatusWord,
}

impl Reading {
    /// Parses `reading,timestamp,status`.
    ///
    /// Returns the snapshot and the reading field as the instrument sent it.
    /// All three fields must be numeric; a trailing `A` unit on the reading is
    /// tolerated.
    pub fn parse(reply: &str) -> Result<(Reading, &str), CodecError> {
        let mut fields = reply.split(',');
        let (Some(value_field), Some(timestamp_field), Some(status_field), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(CodecError::Malformed);
        };

        let value_field = value_field.trim();
        let value = codec::parse_float(value_field.strip_suffix('A').unwrap_or(value_field))?;
        let timestamp = codec::parse_float(timestamp_field)?;
        let status = codec::parse_float(status_field)?;
        let timestamp_range = f64::from(i32::MIN)..=f64::from(i32::MAX);
        if !timestamp_range.contains(&timestamp) || !(0.0..65536.0).contains(&status) {
            return Err(CodecError::Malformed);
        }

        let reading = Reading {
            value,
            timestamp: timestamp as i32,
            status: StatusWord(status as u16),
        };
        Ok((reading, value_field))
    }
}

/// I/O counters kept by the transport adapter. Monotonic.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub io_errors: u32,
    pub write_reads: u32,
    pub write_onlys: u32,
}

/// Per-connection snapshot of what the driver knows about the instrument.
#[derive(Debug, Clone)]
pub struct DeviceState {
    variant: Variant,
    identification: Option<Identification>,
    last_reading: Reading,
    ready: bool,
}

impl DeviceState {
    pub(crate) fn new(variant: Variant) -> Self {
        DeviceState {
            variant,
            identification: None,
            last_reading: Reading::default(),
            ready: false,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Fields captured from `*IDN?`; `None` until setup identified the instrument.
    pub fn identification(&self) -> Option<&Identification> {
        self.identification.as_ref()
    }

    pub fn last_reading(&self) -> &Reading {
        &self.last_reading
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Final setup step; the only writer of identification and readiness.
    pub(crate) fn mark_ready(&mut self, identification: Identification) {
        self.identification = Some(identification);
        self.last_reading = Reading::default();
        self.ready = true;
    }

    pub(crate) fn mark_closed(&mut self) {
        self.ready = false;
    }

    pub(crate) fn record_reading(&mut self, reading: Reading) {
        self.last_reading = reading;
    }
}
