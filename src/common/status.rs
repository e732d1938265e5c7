// src/common/status.rs

/// Raw 16-bit status word returned as the third field of a `READ?` reply.
///
/// The raw value is what gets cached; [`StatusWord::decode`] is a pure
/// function of it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct StatusWord(pub u16);

// Bit layout of the status word.
const OVERFLOW: u16 = 1 << 0;
const FILTER: u16 = 1 << 1;
const MATH: u16 = 1 << 2;
const NULL: u16 = 1 << 3;
const LIMIT_TEST: u16 = 1 << 4;
const LIMIT_RESULT_SHIFT: u16 = 5;
const LIMIT_RESULT_MASK: u16 = 0b11 << LIMIT_RESULT_SHIFT;
const OVERVOLTAGE: u16 = 1 << 7;
// bit 8 is unused
const ZERO_CHECK: u16 = 1 << 9;
const ZERO_CORRECT: u16 = 1 << 10;

/// Outcome of the instrument's limit test.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LimitResult {
    Pass = 0,
    Limit1Failed = 1,
    Limit2Failed = 2,
    BothFailed = 3,
}

impl LimitResult {
    fn from_bits(bits: u16) -> Self {
        match bits & 0b11 {
            0 => LimitResult::Pass,
            1 => LimitResult::Limit1Failed,
            2 => LimitResult::Limit2Failed,
            _ => LimitResult::BothFailed,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Named fields of a decoded [`StatusWord`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StatusFlags {
    pub overflow: bool,
    pub filter_enabled: bool,
    pub math_enabled: bool,
    pub null_enabled: bool,
    pub limit_test_enabled: bool,
    /// Raw limit bits; may be stale while limit testing is disabled.
    pub limit_result: LimitResult,
    pub overvoltage: bool,
    pub zero_check_enabled: bool,
    pub zero_correct_enabled: bool,
}

impl StatusFlags {
    /// Limit result as reported to the host: `Pass` unless limit testing is on.
    pub fn effective_limit_result(&self) -> LimitResult {
        if self.limit_test_enabled {
            self.limit_result
        } else {
            LimitResult::Pass
        }
    }
}

impl StatusWord {
    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn decode(self) -> StatusFlags {
        let w = self.0;
        StatusFlags {
            overflow: w & OVERFLOW != 0,
            filter_enabled: w & FILTER != 0,
            math_enabled: w & MATH != 0,
            null_enabled: w & NULL != 0,
            limit_test_enabled: w & LIMIT_TEST != 0,
            limit_result: LimitResult::from_bits((w & LIMIT_RESULT_MASK) >> LIMIT_RESULT_SHIFT),
            overvoltage: w & OVERVOLTAGE != 0,
            zero_check_enabled: w & ZERO_CHECK != 0,
            zero_correct_enabled: w & ZERO_CORRECT != 0,
        }
    }
}
