// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML-backed runtime configuration, mirroring how the control-loop
//! intervals and the Broadcaster's network settings are tuned in
//! deployment without a rebuild.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wfe_engine::RuntimeConfig;

use crate::env;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0:?}: {1}")]
    Read(std::path::PathBuf, std::io::Error),
    #[error("failed to parse config file {0:?}: {1}")]
    Parse(std::path::PathBuf, toml::de::Error),
}

/// On-disk shape of the TOML config file. Every field is optional so a
/// partial file only overrides what it names; everything else falls back
/// to `Default`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub runtime: RuntimeSection,
    #[serde(default)]
    pub network: NetworkSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSection {
    pub resumer_interval_ms: Option<u64>,
    pub resumer_batch_size: Option<usize>,
    pub timeout_interval_ms: Option<u64>,
    pub timeout_batch_size: Option<usize>,
    pub scheduler_interval_ms: Option<u64>,
    pub scheduler_batch_size: Option<usize>,
    pub approval_expiry_interval_ms: Option<u64>,
    pub approval_default_ttl_ms: Option<u64>,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            resumer_interval_ms: None,
            resumer_batch_size: None,
            timeout_interval_ms: None,
            timeout_batch_size: None,
            scheduler_interval_ms: None,
            scheduler_batch_size: None,
            approval_expiry_interval_ms: None,
            approval_default_ttl_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkSection {
    pub tcp_port: Option<u16>,
    pub auth_token: Option<String>,
}

/// Default approval TTL (24h) applied when neither the config file nor a
/// `require_approval` step names its own `expires_in`.
pub const DEFAULT_APPROVAL_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Fully resolved daemon configuration: the engine's `RuntimeConfig` plus
/// the network settings the Broadcaster's listener needs, plus the
/// default approval TTL used when a `require_approval` step doesn't name
/// one.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub runtime: RuntimeConfig,
    pub approval_default_ttl_ms: u64,
    pub tcp_port: Option<u16>,
    pub auth_token: Option<String>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            approval_default_ttl_ms: DEFAULT_APPROVAL_TTL_MS,
            tcp_port: None,
            auth_token: None,
        }
    }
}

impl DaemonConfig {
    /// Load from `path` if given, else fall back to `Default`. Environment
    /// variables (`WFE_TCP_PORT`, `WFE_AUTH_TOKEN`) always win over the
    /// file, matching the precedence the rest of the crate uses for env
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
                toml::from_str::<ConfigFile>(&raw).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?
            }
            None => ConfigFile::default(),
        };

        let defaults = RuntimeConfig::default();
        let runtime = RuntimeConfig {
            resumer_interval: file.runtime.resumer_interval_ms.map(Duration::from_millis).unwrap_or(defaults.resumer_interval),
            resumer_batch_size: file.runtime.resumer_batch_size.unwrap_or(defaults.resumer_batch_size),
            timeout_interval: file.runtime.timeout_interval_ms.map(Duration::from_millis).unwrap_or(defaults.timeout_interval),
            timeout_batch_size: file.runtime.timeout_batch_size.unwrap_or(defaults.timeout_batch_size),
            scheduler_interval: file.runtime.scheduler_interval_ms.map(Duration::from_millis).unwrap_or(defaults.scheduler_interval),
            scheduler_batch_size: file.runtime.scheduler_batch_size.unwrap_or(defaults.scheduler_batch_size),
            approval_expiry_interval: file
                .runtime
                .approval_expiry_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.approval_expiry_interval),
        };

        Ok(Self {
            runtime,
            approval_default_ttl_ms: file.runtime.approval_default_ttl_ms.unwrap_or(DEFAULT_APPROVAL_TTL_MS),
            tcp_port: env::tcp_port().or(file.network.tcp_port),
            auth_token: env::auth_token().or(file.network.auth_token),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
