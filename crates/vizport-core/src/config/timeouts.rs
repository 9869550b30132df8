//! Centralized timeout configuration
//!
//! Default values for connection and process operations. All of them can be
//! overridden via configuration.

use std::time::Duration;

/// Defaults for the script-port connection
pub mod connection {
    use super::*;

    /// Default port the application listens on for script commands
    pub const DEFAULT_PORT: u16 = 9999;

    /// Default bound on establishing the TCP connection (1 second)
    pub const CONNECT_MS: u64 = 1_000;

    /// Default bound on waiting for one response (5 minutes)
    ///
    /// Whole-file arguments can take the application a long time to digest.
    pub const REQUEST_SECS: u64 = 300;

    /// Get connect timeout as Duration
    pub fn connect_timeout() -> Duration {
        Duration::from_millis(CONNECT_MS)
    }

    /// Get request timeout as Duration
    pub fn request_timeout() -> Duration {
        Duration::from_secs(REQUEST_SECS)
    }
}

/// Defaults for the application process
pub mod process {
    use super::*;

    /// Fixed startup delay used by the legacy readiness gate (3 seconds)
    pub const FIXED_READY_DELAY_MS: u64 = 3_000;

    /// How long the polling readiness gate keeps trying (30 seconds)
    pub const READY_DEADLINE_SECS: u64 = 30;

    /// First delay between readiness probes (100 ms)
    pub const READY_INITIAL_DELAY_MS: u64 = 100;

    /// Longest delay between readiness probes (2 seconds)
    pub const READY_MAX_DELAY_MS: u64 = 2_000;

    /// How long to wait for a killed process to be reaped (5 seconds)
    pub const TERMINATE_SECS: u64 = 5;

    /// Get the fixed readiness delay as Duration
    pub fn fixed_ready_delay() -> Duration {
        Duration::from_millis(FIXED_READY_DELAY_MS)
    }

    /// Get the readiness deadline as Duration
    pub fn ready_deadline() -> Duration {
        Duration::from_secs(READY_DEADLINE_SECS)
    }

    /// Get the terminate wait as Duration
    pub fn terminate_timeout() -> Duration {
        Duration::from_secs(TERMINATE_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(connection::request_timeout(), Duration::from_secs(300));
        assert_eq!(connection::connect_timeout(), Duration::from_secs(1));
        assert_eq!(process::fixed_ready_delay(), Duration::from_secs(3));
        assert!(process::READY_INITIAL_DELAY_MS < process::READY_MAX_DELAY_MS);
    }
}
