// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener: accepts subscriber connections over a Unix socket (always)
//! and TCP (when configured), spawning one task per connection. Each
//! connection reads `ClientMessage` frames and interleaves them with
//! whatever the Broadcaster forwards to its outbound queue, plus a
//! heartbeat ping.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, UnixListener};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use wfe_wire::{ClientMessage, ProtocolError, ServerMessage};

use crate::broadcaster::Broadcaster;

/// Server pings an idle connection on this cadence.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(54);
/// A connection that hasn't acknowledged a heartbeat (ping or any other
/// frame) within this long is considered dead and closed.
const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("unauthorized")]
    Unauthorized,
}

/// Shared context handed to every connection task.
pub struct ListenCtx {
    pub broadcaster: Arc<Broadcaster>,
    pub auth_token: Option<String>,
}

pub struct Listener {
    unix: UnixListener,
    tcp: Option<TcpListener>,
    ctx: Arc<ListenCtx>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionSource {
    Unix,
    Tcp,
}

impl Listener {
    pub fn bind(socket_path: &PathBuf, tcp_port: Option<u16>, ctx: Arc<ListenCtx>) -> std::io::Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)?;
        }
        let unix = UnixListener::bind(socket_path)?;
        let tcp = match tcp_port {
            Some(port) => Some(TcpListener::bind(("0.0.0.0", port))),
            None => None,
        }
        .transpose()?;
        Ok(Self { unix, tcp, ctx })
    }

    pub fn spawn(self, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    async fn run(self, shutdown: CancellationToken) {
        let Listener { unix, tcp, ctx } = self;
        match tcp {
            Some(tcp) => Self::run_dual(unix, tcp, ctx, shutdown).await,
            None => Self::run_unix_only(unix, ctx, shutdown).await,
        }
    }

    async fn run_unix_only(unix: UnixListener, ctx: Arc<ListenCtx>, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                result = unix.accept() => match result {
                    Ok((stream, _)) => {
                        let ctx = ctx.clone();
                        let shutdown = shutdown.clone();
                        let (reader, writer) = stream.into_split();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(reader, writer, ConnectionSource::Unix, ctx, shutdown).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!("unix accept error: {e}"),
                },
            }
        }
    }

    async fn run_dual(unix: UnixListener, tcp: TcpListener, ctx: Arc<ListenCtx>, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                result = unix.accept() => match result {
                    Ok((stream, _)) => {
                        let ctx = ctx.clone();
                        let shutdown = shutdown.clone();
                        let (reader, writer) = stream.into_split();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(reader, writer, ConnectionSource::Unix, ctx, shutdown).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!("unix accept error: {e}"),
                },
                result = tcp.accept() => match result {
                    Ok((stream, addr)) => {
                        debug!("tcp subscriber connection from {addr}");
                        let ctx = ctx.clone();
                        let shutdown = shutdown.clone();
                        let (reader, writer) = stream.into_split();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(reader, writer, ConnectionSource::Tcp, ctx, shutdown).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!("tcp accept error: {e}"),
                },
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::Io(_)) => debug!("subscriber disconnected"),
        ConnectionError::Unauthorized => warn!("subscriber connection rejected: unauthorized"),
        e => error!("subscriber connection error: {e}"),
    }
}

/// Drive one subscriber connection until it disconnects or the daemon
/// shuts down. TCP connections must authenticate with a `hello` frame
/// before anything else when the daemon has an auth token configured,
/// mirroring the Unix-trusted / TCP-must-authenticate split the teacher's
/// own listener uses.
async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    source: ConnectionSource,
    ctx: Arc<ListenCtx>,
    daemon_shutdown: CancellationToken,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + AsyncReadExt + Unpin + Send + 'static,
    W: AsyncWrite + AsyncWriteExt + Unpin + Send + 'static,
{
    if source == ConnectionSource::Tcp {
        if let Some(expected) = &ctx.auth_token {
            let frame = wfe_wire::read_client_message(&mut reader).await?;
            match frame {
                ClientMessage::Hello { token: Some(ref provided) } if provided == expected => {}
                _ => {
                    wfe_wire::write_server_message(&mut writer, &ServerMessage::Error {
                        code: "unauthorized".to_string(),
                        message: "TCP connections must start with a valid hello".to_string(),
                    })
                    .await?;
                    return Err(ConnectionError::Unauthorized);
                }
            }
        }
    }

    let mut handle = ctx.broadcaster.register();
    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await; // first tick fires immediately; skip it

    loop {
        tokio::select! {
            _ = daemon_shutdown.cancelled() => return Ok(()),

            outgoing = handle.rx.recv() => {
                match outgoing {
                    Some(message) => wfe_wire::write_server_message(&mut writer, &message).await?,
                    None => return Ok(()),
                }
            }

            incoming = tokio::time::timeout(HEARTBEAT_TIMEOUT, wfe_wire::read_client_message(&mut reader)) => {
                match incoming {
                    Ok(Ok(ClientMessage::Subscribe { channel, filters })) => {
                        handle.subscribe(channel.clone(), filters);
                        wfe_wire::write_server_message(&mut writer, &ServerMessage::Subscribed { channel }).await?;
                    }
                    Ok(Ok(ClientMessage::Unsubscribe { channel })) => {
                        handle.unsubscribe(&channel);
                        wfe_wire::write_server_message(&mut writer, &ServerMessage::Unsubscribed { channel }).await?;
                    }
                    Ok(Ok(ClientMessage::Ping)) => {
                        wfe_wire::write_server_message(&mut writer, &ServerMessage::Pong).await?;
                    }
                    Ok(Ok(ClientMessage::Hello { .. })) => {
                        // Only valid as the very first TCP frame; a stray
                        // one mid-stream is a protocol mistake, not fatal.
                        wfe_wire::write_server_message(&mut writer, &ServerMessage::Error {
                            code: "unexpected_hello".to_string(),
                            message: "hello is only valid as the first frame".to_string(),
                        })
                        .await?;
                    }
                    Ok(Err(e)) => return Err(e.into()),
                    Err(_elapsed) => {
                        debug!("subscriber missed the heartbeat window; closing");
                        return Ok(());
                    }
                }
            }

            _ = heartbeat.tick() => {
                wfe_wire::write_server_message(&mut writer, &ServerMessage::Pong).await?;
            }
        }
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
