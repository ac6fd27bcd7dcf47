// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire framing: 4-byte big-endian length prefix + JSON payload, the same
//! scheme used for the daemon's other IPC surfaces.

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Frames larger than this are rejected rather than read into memory.
pub const MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message of {0} bytes exceeds the {1} byte limit")]
    TooLarge(usize, usize),
}

/// Serialize `value` to JSON. No length prefix; pair with `write_message`.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

/// Deserialize a JSON payload previously produced by `encode`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write `payload` prefixed with its length as 4 big-endian bytes.
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError> {
    if payload.len() > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::TooLarge(payload.len(), MAX_MESSAGE_BYTES));
    }
    writer.write_all(&(payload.len() as u32).to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed payload.
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes).await?;
    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::TooLarge(len, MAX_MESSAGE_BYTES));
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

/// Read and decode one client frame.
pub async fn read_client_message<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<crate::ClientMessage, ProtocolError> {
    let payload = read_message(reader).await?;
    decode(&payload)
}

/// Encode and write one server frame.
pub async fn write_server_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &crate::ServerMessage,
) -> Result<(), ProtocolError> {
    let payload = encode(message)?;
    write_message(writer, &payload).await
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
