// src/common/timing.rs

use core::time::Duration;

// === Exchange Timeouts ===

/// Exchange timeout used for the 6485 when the settings do not override it.
pub const K6485_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(1);
/// Exchange timeout used for the 6487 when the settings do not override it.
/// The 6487 answers slowly while its voltage source settles.
pub const K6487_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Shortest timeout window the driver will hand to a transport.
pub const EXCHANGE_TIMEOUT_MIN: Duration = Duration::from_secs(1);
/// Longest timeout window the driver will hand to a transport.
pub const EXCHANGE_TIMEOUT_MAX: Duration = Duration::from_secs(5);

// === Serial Link Pacing ===

/// Back-off between polls of a byte-level interface that returned `WouldBlock`.
pub const POLL_INTERVAL_US: u32 = 100;

/// Upper bound on stale input bytes discarded before a new request is written.
pub const STALE_INPUT_LIMIT: usize = 256;
