// src/lib.rs

#![cfg_attr(not(feature = "std"), no_std)] // no_std unless the host brings std

// Owned identification strings and parameter names need an allocator.
extern crate alloc;

pub mod common;
pub mod driver;
pub mod handlers;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types for convenience
pub use common::{Error, Value, ValueKind, Variant};
pub use driver::Connection;
pub use registry::{ParamHandle, Registry};
