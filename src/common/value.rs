// src/common/value.rs

use arrayvec::ArrayString;
use core::fmt;

/// Longest text value handed to the host, in characters.
pub const TEXT_CAPACITY: usize = 39;

/// Fixed-width text value. Longer input is cut at [`TEXT_CAPACITY`].
pub type Text = ArrayString<TEXT_CAPACITY>;

/// The representation the host requests or supplies for one access.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueKind {
    Text,
    Integer,
    Float64,
}

impl ValueKind {
    pub const ALL: [ValueKind; 3] = [ValueKind::Text, ValueKind::Integer, ValueKind::Float64];
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Float64 => "float64",
        })
    }
}

/// A typed parameter value.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Value {
    Text(Text),
    Integer(i32),
    Float64(f64),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float64(_) => ValueKind::Float64,
        }
    }

    /// The value a no-op read of `kind` reports.
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Text => Value::Text(Text::new()),
            ValueKind::Integer => Value::Integer(0),
            ValueKind::Float64 => Value::Float64(0.0),
        }
    }

    /// Text value holding at most the first [`TEXT_CAPACITY`] characters of `s`.
    pub fn text(s: &str) -> Self {
        Value::Text(truncate(s))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

/// Copies `s` into a [`Text`], silently dropping whatever does not fit.
///
/// The cut never splits a multi-byte character.
pub fn truncate(s: &str) -> Text {
    let mut out = Text::new();
    for c in s.chars() {
        if out.try_push(c).is_err() {
            break;
        }
    }
    out
}
