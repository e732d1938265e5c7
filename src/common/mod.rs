// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod hal_traits;
pub mod identity;
pub mod status;
pub mod timing;
pub mod value;
pub mod variant;

// --- Re-export key types/traits/functions for easier access ---

// From codec.rs
pub use codec::{CodecError, FilterMode, General, Rate, VoltageRange};

// From command.rs
pub use command::{verb, Argument, Command, CommandBuffer, CommandTooLong};

// From config.rs
pub use config::{ConfigError, ConnectionSettings};

// From error.rs
pub use error::{Error, HostError, ResolveError, SetupError, TransportFailure};

// From hal_traits.rs
pub use hal_traits::{ByteSerial, Exchange, Termination, Timer, TimerInstant, Transport};

// From identity.rs
pub use identity::Identification;

// From status.rs
pub use status::{LimitResult, StatusFlags, StatusWord};

// From timing.rs (constants - users can access via common::timing::*)

// From value.rs
pub use value::{Text, Value, ValueKind, TEXT_CAPACITY};

// From variant.rs
pub use variant::{UnknownVariant, Variant};
