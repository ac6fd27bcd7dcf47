// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ContextCacheEntry`: a cached enrichment fragment owned by the
//! `ContextBuilder`, keyed by `entity_type:entity_id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextCacheEntry {
    pub cache_key: String,
    pub data: Value,
    pub cached_at_ms: u64,
    pub expires_at_ms: u64,
}

impl ContextCacheEntry {
    pub fn cache_key(entity_type: &str, entity_id: &str) -> String {
        format!("{entity_type}:{entity_id}")
    }

    pub fn new(entity_type: &str, entity_id: &str, data: Value, now_ms: u64, ttl_ms: u64) -> Self {
        Self { cache_key: Self::cache_key(entity_type, entity_id), data, cached_at_ms: now_ms, expires_at_ms: now_ms + ttl_ms }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at_ms
    }
}

#[cfg(test)]
#[path = "context_cache_tests.rs"]
mod tests;
