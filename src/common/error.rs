// src/common/error.rs

use alloc::string::String;
use core::fmt::Debug;

use super::codec::CodecError;
use super::command::CommandTooLong;
use super::config::ConfigError;
use super::variant::Variant;
use crate::driver::setup::SetupStage;

/// Failure reported by (or detected around) a single transport exchange.
#[derive(Debug, thiserror::Error)]
pub enum TransportFailure<E>
where
    E: Debug,
{
    /// Underlying I/O error from the transport implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// The exchange did not complete inside its timeout window.
    #[error("Operation timed out")]
    Timeout,

    /// The transport accepted fewer bytes than the request held.
    #[error("Short write: {written} of {requested} bytes")]
    ShortWrite { written: usize, requested: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error<E = ()>
where
    E: Debug,
{
    /// No registry entry carries this name.
    #[error("Unknown parameter '{0}'")]
    NotFound(String),

    /// The parameter exists but not for this hardware model.
    #[error("Parameter '{name}' is not available on the {variant}")]
    WrongVariant { name: &'static str, variant: Variant },

    /// Access attempted before setup completed or after the connection closed.
    #[error("Connection is not ready")]
    NotReady,

    #[error("Transport failure: {0}")]
    Transport(TransportFailure<E>),

    /// Reply did not parse into the expected shape, field count or numeric form.
    #[error("Malformed reply")]
    MalformedReply,

    /// Write value outside the parameter's legal domain.
    #[error("Value {value} is out of range [{min}, {max}]")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("Command does not fit in the command buffer")]
    CommandTooLong,

    #[error("Invalid connection settings: {0}")]
    Config(ConfigError),

    /// The host framework refused a setup request.
    #[error("Host refused request: {0}")]
    Host(HostError),
}

impl<E: Debug> Error<E> {
    /// True for failures that were counted as I/O errors.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl<E: Debug> From<TransportFailure<E>> for Error<E> {
    fn from(failure: TransportFailure<E>) -> Self {
        Error::Transport(failure)
    }
}

impl<E: Debug> From<CodecError> for Error<E> {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Malformed => Error::MalformedReply,
            CodecError::OutOfRange { value, min, max } => Error::OutOfRange { value, min, max },
        }
    }
}

impl<E: Debug> From<CommandTooLong> for Error<E> {
    fn from(_: CommandTooLong) -> Self {
        Error::CommandTooLong
    }
}

impl<E: Debug> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl<E: Debug> From<HostError> for Error<E> {
    fn from(e: HostError) -> Self {
        Error::Host(e)
    }
}

impl<E: Debug> From<ResolveError> for Error<E> {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound(name) => Error::NotFound(name),
            ResolveError::WrongVariant { name, variant } => Error::WrongVariant { name, variant },
        }
    }
}

/// Why a parameter name could not be bound.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Unknown parameter '{0}'")]
    NotFound(String),

    #[error("Parameter '{name}' is not available on the {variant}")]
    WrongVariant { name: &'static str, variant: Variant },
}

/// Refusal reported by the host framework during connection setup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        HostError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Connection setup aborted. `stage` is the last stage that was reached.
#[derive(Debug, thiserror::Error)]
#[error("Setup failed after reaching {stage:?}: {cause}")]
pub struct SetupError<E>
where
    E: Debug,
{
    pub stage: SetupStage,
    pub cause: Error<E>,
}

impl<E: Debug> SetupError<E> {
    pub fn new(stage: SetupStage, cause: impl Into<Error<E>>) -> Self {
        SetupError {
            stage,
            cause: cause.into(),
        }
    }
}
