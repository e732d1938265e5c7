// src/common/codec.rs

//! Numeric transforms between host-facing enumerations and the device's
//! textual encodings.

use arrayvec::ArrayString;
use core::fmt::{self, Write};

/// Why a reply fragment or a host value could not be converted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Malformed value")]
    Malformed,

    #[error("Value {value} is out of range [{min}, {max}]")]
    OutOfRange { value: i64, min: i64, max: i64 },
}

fn check_index(value: i32, max: i32) -> Result<i32, CodecError> {
    if (0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(CodecError::OutOfRange {
            value: value as i64,
            min: 0,
            max: max as i64,
        })
    }
}

// --- Plain Numbers ---

/// Parses a whole reply (surrounding whitespace ignored) as a finite float.
///
/// `nan`, `inf` and values that overflow to infinity are malformed.
pub fn parse_float(reply: &str) -> Result<f64, CodecError> {
    let value = reply.trim().parse::<f64>().map_err(|_| CodecError::Malformed)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CodecError::Malformed)
    }
}

/// Parses a whole reply as an integer.
///
/// The instrument sometimes answers integer queries in scientific
/// notation (`1.000000E+00`); those are accepted when they are integral.
pub fn parse_integer(reply: &str) -> Result<i32, CodecError> {
    let s = reply.trim();
    if let Ok(v) = s.parse::<i32>() {
        return Ok(v);
    }
    let f = s.parse::<f64>().map_err(|_| CodecError::Malformed)?;
    if f.is_finite() && f >= i32::MIN as f64 && f <= i32::MAX as f64 && f == (f as i32) as f64 {
        Ok(f as i32)
    } else {
        Err(CodecError::Malformed)
    }
}

/// Leading signed decimal integer of `s`; trailing characters are ignored.
fn leading_integer(s: &str) -> Result<i32, CodecError> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return Err(CodecError::Malformed);
    }
    s[..end].parse::<i32>().map_err(|_| CodecError::Malformed)
}

// --- Current Range ---

/// Highest range index; index `n` selects a full scale of `2.0e(n - 9)` amperes.
pub const RANGE_INDEX_MAX: i32 = 7;
/// Decade exponent of range index 0.
const RANGE_EXPONENT_OFFSET: i32 = 9;

/// Validates a range index and returns the decade exponent sent on the wire.
pub fn range_exponent(index: i32) -> Result<i32, CodecError> {
    check_index(index, RANGE_INDEX_MAX).map(|i| i - RANGE_EXPONENT_OFFSET)
}

/// Full-scale value of a range reply, in amperes.
///
/// A reply that decodes to exactly zero is rejected: the instrument never
/// reports a zero range, so zero can only come from garbage.
pub fn range_amps(reply: &str) -> Result<f64, CodecError> {
    let amps = parse_float(reply)?;
    if amps == 0.0 {
        return Err(CodecError::Malformed);
    }
    Ok(amps)
}

/// Range index encoded by a scientific-notation range reply.
///
/// The index is `9 + exponent`; it is not clamped to the writable domain.
pub fn range_index(reply: &str) -> Result<i32, CodecError> {
    range_amps(reply)?;
    let marker = reply.find(['E', 'e']).ok_or(CodecError::Malformed)?;
    let exponent = leading_integer(&reply[marker + 1..])?;
    Ok(RANGE_EXPONENT_OFFSET + exponent)
}

// --- Integration Rate ---

/// Integration rate, exposed to the host as 0, 1 or 2.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rate {
    Slow = 0,
    Medium = 1,
    Fast = 2,
}

impl Rate {
    pub fn from_index(index: i32) -> Result<Self, CodecError> {
        match check_index(index, 2)? {
            0 => Ok(Rate::Slow),
            1 => Ok(Rate::Medium),
            _ => Ok(Rate::Fast),
        }
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    /// Integration time in power-line cycles.
    pub fn nplc(self) -> f64 {
        match self {
            Rate::Slow => 6.0,
            Rate::Medium => 1.0,
            Rate::Fast => 0.1,
        }
    }

    /// Classifies an integration time reported by the instrument.
    pub fn classify(nplc: f64) -> Self {
        if nplc > 1.0 {
            Rate::Slow
        } else if nplc > 0.1 {
            Rate::Medium
        } else {
            Rate::Fast
        }
    }
}

// --- Digital Filter Mode ---

/// Averaging filter type (`AVER:TCON`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FilterMode {
    Moving = 0,
    Repeating = 1,
}

impl FilterMode {
    pub fn from_index(index: i32) -> Result<Self, CodecError> {
        match check_index(index, 1)? {
            0 => Ok(FilterMode::Moving),
            _ => Ok(FilterMode::Repeating),
        }
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn token(self) -> &'static str {
        match self {
            FilterMode::Moving => "MOV",
            FilterMode::Repeating => "REP",
        }
    }

    /// Exact match on the device token; anything else is malformed.
    pub fn from_token(reply: &str) -> Result<Self, CodecError> {
        match reply {
            "MOV" => Ok(FilterMode::Moving),
            "REP" => Ok(FilterMode::Repeating),
            _ => Err(CodecError::Malformed),
        }
    }
}

// --- Voltage Source Range ---

/// Voltage source range of the 6487.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VoltageRange {
    V10 = 0,
    V50 = 1,
    V500 = 2,
}

impl VoltageRange {
    pub fn from_index(index: i32) -> Result<Self, CodecError> {
        match check_index(index, 2)? {
            0 => Ok(VoltageRange::V10),
            1 => Ok(VoltageRange::V50),
            _ => Ok(VoltageRange::V500),
        }
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn volts(self) -> i32 {
        match self {
            VoltageRange::V10 => 10,
            VoltageRange::V50 => 50,
            VoltageRange::V500 => 500,
        }
    }

    pub fn classify(volts: f64) -> Self {
        if volts > 50.0 {
            VoltageRange::V500
        } else if volts > 10.0 {
            VoltageRange::V50
        } else {
            VoltageRange::V10
        }
    }
}

// --- Float Formatting ---

/// Displays a float the way C's `%g` does: six significant digits, fixed
/// notation for moderate exponents, trailing zeros removed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct General(pub f64);

const SIGNIFICANT_DIGITS: i32 = 6;

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

impl fmt::Display for General {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return f.write_str("nan");
        }
        if v.is_infinite() {
            return f.write_str(if v < 0.0 { "-inf" } else { "inf" });
        }

        // Rounding to six significant digits can bump the exponent, so take it
        // from the rounded scientific form.
        let mut sci = ArrayString::<32>::new();
        write!(sci, "{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, v)?;
        let (mantissa, exponent) = sci.split_once('e').ok_or(fmt::Error)?;
        let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;

        if (-4..SIGNIFICANT_DIGITS).contains(&exponent) {
            let mut fixed = ArrayString::<32>::new();
            let precision = (SIGNIFICANT_DIGITS - 1 - exponent) as usize;
            write!(fixed, "{:.*}", precision, v)?;
            f.write_str(trim_fraction(&fixed))
        } else {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(
                f,
                "{}e{}{:02}",
                trim_fraction(mantissa),
                sign,
                exponent.unsigned_abs()
            )
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_range_round_trip() {
        for index in 0..=RANGE_INDEX_MAX {
            let exponent = range_exponent(index).unwrap();
            let wire = alloc::format!("2.0e{}", exponent);
            assert_eq!(range_index(&wire), Ok(index), "wire form {}", wire);
        }
    }

    #[test]
    fn test_range_reply_from_device() {
        assert_eq!(range_index("2.000000E-09"), Ok(0));
        assert_eq!(range_index("2.000000E-02"), Ok(7));
        assert_eq!(range_index("2.100000E+01"), Ok(10)); // not clamped
        assert_eq!(range_amps("2.000000E-06"), Ok(2.0e-6));
    }

    #[test]
    fn test_range_reply_rejects_zero_and_garbage() {
        assert_eq!(range_amps("0.000000E+00"), Err(CodecError::Malformed));
        assert_eq!(range_index("0"), Err(CodecError::Malformed));
        assert_eq!(range_index("garbage"), Err(CodecError::Malformed));
        // Valid float without an exponent marker.
        assert_eq!(range_index("0.002"), Err(CodecError::Malformed));
    }

    #[test]
    fn test_non_finite_numbers_are_malformed() {
        for reply in ["nan", "NaN", "inf", "-infinity", "1e400"] {
            assert_eq!(parse_float(reply), Err(CodecError::Malformed), "{}", reply);
        }
        assert_eq!(range_amps("inf"), Err(CodecError::Malformed));
        assert_eq!(range_index("inf"), Err(CodecError::Malformed));
        assert_eq!(parse_integer("nan"), Err(CodecError::Malformed));
    }

    #[test]
    fn test_range_exponent_domain() {
        assert_eq!(range_exponent(0), Ok(-9));
        assert_eq!(range_exponent(7), Ok(-2));
        assert_eq!(
            range_exponent(8),
            Err(CodecError::OutOfRange { value: 8, min: 0, max: 7 })
        );
        assert!(range_exponent(-1).is_err());
    }

    #[test]
    fn test_rate_round_trip() {
        for index in 0..=2 {
            let rate = Rate::from_index(index).unwrap();
            let wire = General(rate.nplc()).to_string();
            let nplc = parse_float(&wire).unwrap();
            assert_eq!(Rate::classify(nplc).index(), index);
        }
        assert!(Rate::from_index(3).is_err());
    }

    #[test]
    fn test_rate_thresholds() {
        assert_eq!(Rate::classify(10.0), Rate::Slow);
        assert_eq!(Rate::classify(1.0), Rate::Medium);
        assert_eq!(Rate::classify(0.5), Rate::Medium);
        assert_eq!(Rate::classify(0.1), Rate::Fast);
        assert_eq!(Rate::classify(0.01), Rate::Fast);
    }

    #[test]
    fn test_filter_mode_tokens() {
        assert_eq!(FilterMode::from_token("MOV"), Ok(FilterMode::Moving));
        assert_eq!(FilterMode::from_token("REP"), Ok(FilterMode::Repeating));
        assert_eq!(FilterMode::from_token("mov"), Err(CodecError::Malformed));
        assert_eq!(FilterMode::from_index(1).map(FilterMode::token), Ok("REP"));
        assert!(FilterMode::from_index(2).is_err());
    }

    #[test]
    fn test_voltage_range_classification() {
        assert_eq!(VoltageRange::classify(10.0), VoltageRange::V10);
        assert_eq!(VoltageRange::classify(50.0), VoltageRange::V50);
        assert_eq!(VoltageRange::classify(500.0), VoltageRange::V500);
        assert_eq!(VoltageRange::from_index(2).map(VoltageRange::volts), Ok(500));
    }

    #[test]
    fn test_parse_integer_forms() {
        assert_eq!(parse_integer("1"), Ok(1));
        assert_eq!(parse_integer(" 42 "), Ok(42));
        assert_eq!(parse_integer("1.000000E+00"), Ok(1));
        assert_eq!(parse_integer("1.5"), Err(CodecError::Malformed));
        assert_eq!(parse_integer("ON"), Err(CodecError::Malformed));
    }

    #[test]
    fn test_general_format() {
        assert_eq!(General(6.0).to_string(), "6");
        assert_eq!(General(1.0).to_string(), "1");
        assert_eq!(General(0.1).to_string(), "0.1");
        assert_eq!(General(-2.5).to_string(), "-2.5");
        assert_eq!(General(1234567.0).to_string(), "1.23457e+06");
        assert_eq!(General(0.00001).to_string(), "1e-05");
        assert_eq!(General(0.0).to_string(), "0");
        assert_eq!(General(100000.0).to_string(), "100000");
    }
}
