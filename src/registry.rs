// src/registry.rs

//! The static table of named parameters.
//!
//! Entries, their order and their handlers are fixed at compile time and
//! shared by every connection.

use crate::common::{error::ResolveError, Variant};
use crate::handlers::{cached::CachedField, direct::DirectCommand, simple};
use alloc::string::ToString;
use alloc::vec::Vec;

/// Dispatch strategy of a parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Family {
    Direct,
    Simple,
    Cached,
}

/// Handler a descriptor dispatches to, tagged by family.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Handler {
    Direct(DirectCommand),
    Simple(&'static simple::SimpleCommand),
    Cached(CachedField),
}

impl Handler {
    pub fn family(&self) -> Family {
        match self {
            Handler::Direct(_) => Family::Direct,
            Handler::Simple(_) => Family::Simple,
            Handler::Cached(_) => Family::Cached,
        }
    }
}

/// Hardware models a parameter is valid for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Applicability {
    All,
    /// Exposed on one model only. The gate is a policy of this table: some
    /// `Only(K6487)` rows drive commands the 6485 firmware accepts too.
    Only(Variant),
}

impl Applicability {
    pub fn includes(&self, variant: Variant) -> bool {
        match self {
            Applicability::All => true,
            Applicability::Only(v) => *v == variant,
        }
    }
}

/// One named, externally addressable quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub name: &'static str,
    pub handler: Handler,
    pub applicability: Applicability,
}

impl Descriptor {
    const fn new(name: &'static str, handler: Handler, applicability: Applicability) -> Self {
        Descriptor { name, handler, applicability }
    }

    pub fn family(&self) -> Family {
        self.handler.family()
    }

    /// Cached parameters are projections of device state and cannot be written.
    pub fn is_writable(&self) -> bool {
        self.family() != Family::Cached
    }
}

/// Opaque reference to a registry entry, obtained by [`Registry::resolve`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ParamHandle(usize);

impl ParamHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

use self::Applicability::{All, Only};
use crate::common::Variant::K6487;

static STANDARD: [Descriptor; 32] = [
    // --- Direct ---
    Descriptor::new("VOID", Handler::Direct(DirectCommand::Void), All),
    Descriptor::new("READ", Handler::Direct(DirectCommand::Read), All),
    Descriptor::new("RANGE", Handler::Direct(DirectCommand::Range), All),
    Descriptor::new("RANGE_AUTO_ULIMIT", Handler::Direct(DirectCommand::RangeAutoUpperLimit), All),
    Descriptor::new("RANGE_AUTO_LLIMIT", Handler::Direct(DirectCommand::RangeAutoLowerLimit), All),
    Descriptor::new("RATE", Handler::Direct(DirectCommand::Rate), All),
    // The 6485 also understands `AVER:TCON`, `*RST`, `MED` and `AVER`; those
    // rows are still only exposed for the 6487.
    Descriptor::new(
        "DIGITAL_FILTER_CONTROL",
        Handler::Direct(DirectCommand::DigitalFilterControl),
        Only(K6487),
    ),
    Descriptor::new("VOLT_RANGE", Handler::Direct(DirectCommand::VoltRange), Only(K6487)),
    // --- Simple ---
    Descriptor::new("RESET", Handler::Simple(&simple::RESET), Only(K6487)),
    Descriptor::new("RANGE_AUTO", Handler::Simple(&simple::RANGE_AUTO), All),
    Descriptor::new("ZERO_CHECK", Handler::Simple(&simple::ZERO_CHECK), All),
    Descriptor::new("ZERO_CORRECT", Handler::Simple(&simple::ZERO_CORRECT), All),
    Descriptor::new("ZERO_CORRECT_ACQUIRE", Handler::Simple(&simple::ZERO_CORRECT_ACQUIRE), All),
    Descriptor::new("MEDIAN_FILTER", Handler::Simple(&simple::MEDIAN_FILTER), Only(K6487)),
    Descriptor::new("MEDIAN_FILTER_RANK", Handler::Simple(&simple::MEDIAN_FILTER_RANK), Only(K6487)),
    Descriptor::new("DIGITAL_FILTER", Handler::Simple(&simple::DIGITAL_FILTER), Only(K6487)),
    Descriptor::new("DIGITAL_FILTER_COUNT", Handler::Simple(&simple::DIGITAL_FILTER_COUNT), Only(K6487)),
    // --- Cached ---
    Descriptor::new("MODEL", Handler::Cached(CachedField::Model), All),
    Descriptor::new("SERIAL", Handler::Cached(CachedField::Serial), All),
    Descriptor::new("DIG_REV", Handler::Cached(CachedField::DigitalRevision), All),
    Descriptor::new("DISP_REV", Handler::Cached(CachedField::DisplayRevision), All),
    Descriptor::new("BRD_REV", Handler::Cached(CachedField::BoardRevision), All),
    Descriptor::new("TIMESTAMP", Handler::Cached(CachedField::Timestamp), All),
    Descriptor::new("STATUS_RAW", Handler::Cached(CachedField::StatusRaw), All),
    Descriptor::new("STATUS_OVERFLOW", Handler::Cached(CachedField::Overflow), All),
    Descriptor::new("STATUS_FILTER", Handler::Cached(CachedField::Filter), All),
    Descriptor::new("STATUS_MATH", Handler::Cached(CachedField::Math), All),
    Descriptor::new("STATUS_NULL", Handler::Cached(CachedField::Null), All),
    Descriptor::new("STATUS_LIMITS", Handler::Cached(CachedField::Limits), All),
    Descriptor::new("STATUS_OVERVOLTAGE", Handler::Cached(CachedField::Overvoltage), All),
    Descriptor::new("STATUS_ZERO_CHECK", Handler::Cached(CachedField::ZeroCheck), All),
    Descriptor::new("STATUS_ZERO_CORRECT", Handler::Cached(CachedField::ZeroCorrect), All),
];

/// Ordered, immutable parameter table.
#[derive(Debug, Copy, Clone)]
pub struct Registry {
    entries: &'static [Descriptor],
}

impl Default for Registry {
    fn default() -> Self {
        Registry::standard()
    }
}

impl Registry {
    /// The 6485/6487 parameter table.
    pub fn standard() -> Self {
        Registry { entries: &STANDARD }
    }

    pub fn entries(&self) -> &'static [Descriptor] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, handle: ParamHandle) -> Option<&'static Descriptor> {
        self.entries.get(handle.0)
    }

    /// Case-insensitive lookup, regardless of variant.
    pub fn lookup(&self, name: &str) -> Option<(ParamHandle, &'static Descriptor)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, d)| d.name.eq_ignore_ascii_case(name))
            .map(|(i, d)| (ParamHandle(i), d))
    }

    /// Binds `name` to a handle for a connection to `variant`.
    pub fn resolve(&self, name: &str, variant: Variant) -> Result<ParamHandle, ResolveError> {
        let (handle, descriptor) = self
            .lookup(name)
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))?;
        if !descriptor.applicability.includes(variant) {
            return Err(ResolveError::WrongVariant {
                name: descriptor.name,
                variant,
            });
        }
        Ok(handle)
    }

    /// Names valid for `variant`, in table order.
    pub fn names_for(&self, variant: Variant) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|d| d.applicability.includes(variant))
            .map(|d| d.name)
            .collect()
    }
}
