// src/driver/setup.rs

use super::link::{Link, REPLY_CAPACITY};
use super::state::DeviceState;
use super::Connection;
use crate::common::{
    error::{HostError, SetupError},
    hal_traits::Transport,
    Command, ConnectionSettings, Identification, ValueKind,
};
use crate::registry::Registry;
use alloc::string::ToString;
use core::time::Duration;
use tracing::{debug, info};

/// Connection setup stages, in order. Each step either advances one stage
/// or aborts setup.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SetupStage {
    Unconnected,
    TransportBound,
    PortRegistered,
    InterfacesAdvertised,
    Cleared,
    Identified,
    Ready,
}

/// Services the host framework provides during setup.
pub trait Host {
    type Transport: Transport;

    /// Opens the transport to the device at `io_address` on `io_port`.
    fn bind(&mut self, io_port: &str, io_address: i32) -> Result<Self::Transport, HostError>;

    /// Registers the connection under `port_name`; must succeed before any I/O.
    fn register_port(&mut self, port_name: &str) -> Result<(), HostError>;

    /// Announces the value kinds the connection serves.
    fn advertise_interfaces(&mut self, port_name: &str, kinds: &[ValueKind])
        -> Result<(), HostError>;
}

type SetupResult<T, C> = Result<C, SetupError<<T as Transport>::Error>>;

fn advance(port: &str, stage: SetupStage) -> SetupStage {
    debug!(port, ?stage, "setup stage reached");
    stage
}

fn checked_timeout<T: Transport>(settings: &ConnectionSettings) -> SetupResult<T, Duration> {
    settings
        .timeout()
        .map_err(|e| SetupError::<T::Error>::new(SetupStage::Unconnected, e))
}

impl<T: Transport> Connection<T> {
    /// Runs the full setup sequence against `host`.
    ///
    /// On failure no connection exists; the error names the last stage reached.
    pub fn establish<H>(settings: &ConnectionSettings, host: &mut H) -> SetupResult<T, Self>
    where
        H: Host<Transport = T>,
    {
        let port = settings.port_name.as_str();
        let timeout = checked_timeout::<T>(settings)?;

        let transport = host
            .bind(&settings.io_port, settings.io_address)
            .map_err(|e| SetupError::<T::Error>::new(SetupStage::Unconnected, e))?;
        let stage = advance(port, SetupStage::TransportBound);

        host.register_port(port)
            .map_err(|e| SetupError::<T::Error>::new(stage, e))?;
        let stage = advance(port, SetupStage::PortRegistered);

        host.advertise_interfaces(port, &ValueKind::ALL)
            .map_err(|e| SetupError::<T::Error>::new(stage, e))?;
        advance(port, SetupStage::InterfacesAdvertised);

        Self::bring_up(transport, settings, timeout)
    }

    /// Sets up a connection over an already bound and registered transport.
    pub fn initialize(transport: T, settings: &ConnectionSettings) -> SetupResult<T, Self> {
        let timeout = checked_timeout::<T>(settings)?;
        Self::bring_up(transport, settings, timeout)
    }

    fn bring_up(
        transport: T,
        settings: &ConnectionSettings,
        timeout: Duration,
    ) -> SetupResult<T, Self> {
        let port = settings.port_name.as_str();
        let mut link = Link::new(transport, settings.port_name.clone(), timeout);
        let mut state = DeviceState::new(settings.variant);
        let stage = SetupStage::InterfacesAdvertised;

        if settings.flush_on_connect {
            link.send(&Command::Empty)
                .map_err(|e| SetupError::<T::Error>::new(stage, e))?;
        }

        link.send(&Command::ClearStatus)
            .map_err(|e| SetupError::<T::Error>::new(stage, e))?;
        let stage = advance(port, SetupStage::Cleared);

        let mut buf = [0u8; REPLY_CAPACITY];
        let reply = link
            .query(&Command::Identify, &mut buf)
            .map_err(|e| SetupError::<T::Error>::new(stage, e))?;
        let identification =
            Identification::parse(reply).map_err(|e| SetupError::<T::Error>::new(stage, e))?;
        advance(port, SetupStage::Identified);

        info!(
            port,
            variant = %settings.variant,
            model = %identification.model,
            serial = %identification.serial,
            "connection ready"
        );
        state.mark_ready(identification);
        advance(port, SetupStage::Ready);

        Ok(Connection {
            registry: Registry::standard(),
            link,
            state,
            io_port: settings.io_port.to_string(),
            io_address: settings.io_address,
        })
    }
}
