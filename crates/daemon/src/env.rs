// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: WFE_STATE_DIR > XDG_STATE_HOME/wfe > ~/.local/state/wfe
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("WFE_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("wfe"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/wfe"))
}

/// Path to the TOML runtime configuration file, if one is set.
pub fn config_path() -> Option<PathBuf> {
    std::env::var("WFE_CONFIG").ok().map(PathBuf::from)
}

/// Read timeout for a single subscriber frame.
pub fn ipc_timeout() -> Duration {
    std::env::var("WFE_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// TCP port for remote subscriber connections. When set, the Broadcaster's
/// listener accepts TCP alongside the Unix socket.
pub fn tcp_port() -> Option<u16> {
    std::env::var("WFE_TCP_PORT").ok().and_then(|s| s.parse::<u16>().ok())
}

/// Auth token for TCP connections. Validated in the Hello handshake.
pub fn auth_token() -> Option<String> {
    std::env::var("WFE_AUTH_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Shutdown drain timeout (default 5s, configurable via `WFE_DRAIN_TIMEOUT_MS`).
pub fn drain_timeout() -> Duration {
    std::env::var("WFE_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
