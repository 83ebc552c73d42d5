//! Client configuration.
//!
//! Everything the sync stack needs to reach and pace the server lives here,
//! populated from CLI flags -- no hard-coded hosts or intervals at call
//! sites.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the world server, scheme + host + port.
    pub server_url: String,
    /// Cadence of the tick-update poll loop.
    pub poll_interval: Duration,
    /// Attempts for the blocking full-state fetch before giving up.
    pub bootstrap_attempts: u32,
    /// Fixed delay between full-state fetch attempts.
    pub retry_delay: Duration,
    /// Per-request timeout for every transport call.
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:1416".into(),
            poll_interval: Duration::from_millis(50),
            bootstrap_attempts: 3,
            retry_delay: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl SyncConfig {
    /// Build a config from process arguments, falling back to defaults:
    /// `--server URL --interval-ms N --bootstrap-attempts N --retry-delay-ms N --timeout-ms N`.
    pub fn from_args() -> Self {
        let defaults = Self::default();
        Self {
            server_url: arg_value("--server").unwrap_or(defaults.server_url),
            poll_interval: arg_millis("--interval-ms").unwrap_or(defaults.poll_interval),
            bootstrap_attempts: arg_value("--bootstrap-attempts")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.bootstrap_attempts),
            retry_delay: arg_millis("--retry-delay-ms").unwrap_or(defaults.retry_delay),
            request_timeout: arg_millis("--timeout-ms").unwrap_or(defaults.request_timeout),
        }
    }
}

fn arg_value(flag: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != flag).nth(1)
}

fn arg_millis(flag: &str) -> Option<Duration> {
    arg_value(flag)
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
}
