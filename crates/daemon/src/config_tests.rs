// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::io::Write;

#[test]
#[serial]
fn missing_path_falls_back_to_defaults() {
    std::env::remove_var("WFE_TCP_PORT");
    std::env::remove_var("WFE_AUTH_TOKEN");
    let config = DaemonConfig::load(None).unwrap();
    assert_eq!(config.approval_default_ttl_ms, DEFAULT_APPROVAL_TTL_MS);
    assert_eq!(config.tcp_port, None);
}

#[test]
#[serial]
fn partial_file_overrides_only_named_fields() {
    std::env::remove_var("WFE_TCP_PORT");
    std::env::remove_var("WFE_AUTH_TOKEN");
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[runtime]\nresumer_batch_size = 7\n").unwrap();

    let config = DaemonConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.runtime.resumer_batch_size, 7);
    assert_eq!(config.runtime.timeout_batch_size, RuntimeConfig::default().timeout_batch_size);
}

#[test]
#[serial]
fn env_var_wins_over_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[network]\ntcp_port = 9000\n").unwrap();
    std::env::set_var("WFE_TCP_PORT", "7420");

    let config = DaemonConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.tcp_port, Some(7420));

    std::env::remove_var("WFE_TCP_PORT");
}

#[test]
fn unreadable_path_is_an_error() {
    let err = DaemonConfig::load(Some(Path::new("/does/not/exist.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read(..)));
}
