// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context enrichment: resolve `workflow.context_load` into a merged JSON
//! context before the interpreter sees a fresh execution.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use wfe_core::{Clock, ContextCacheEntry};
use wfe_storage::CacheStore;

/// One named enrichment source. `name()` is the identifier workflows
/// reference in `context.load[]`; `fetch` resolves it against the trigger
/// payload (e.g. looking a customer record up by id found in the payload).
#[async_trait]
pub trait ContextEnricher: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self, trigger_payload: &Value) -> Result<Value, String>;
}

/// Enriches a trigger payload into the execution context the interpreter
/// and evaluator operate on, caching each source's output with a TTL so a
/// workflow that loads the same entity repeatedly doesn't refetch it.
pub struct ContextBuilder<C: Clock> {
    sources: Vec<Arc<dyn ContextEnricher>>,
    cache: Arc<dyn CacheStore>,
    clock: C,
    ttl_ms: u64,
}

impl<C: Clock> ContextBuilder<C> {
    pub fn new(sources: Vec<Arc<dyn ContextEnricher>>, cache: Arc<dyn CacheStore>, clock: C, ttl_ms: u64) -> Self {
        Self { sources, cache, clock, ttl_ms }
    }

    /// Build `{ trigger: trigger_payload, <source_name>: fragment, ... }`
    /// for every name listed in `context_load`. Unknown source names are
    /// skipped — a workflow referencing a source this deployment never
    /// registered simply gets no data for it rather than failing startup.
    pub async fn build(&self, trigger_payload: &Value, context_load: &[String]) -> Result<Value, (String, String)> {
        let mut ctx = serde_json::json!({ "trigger": trigger_payload });
        let ctx_map = ctx.as_object_mut().expect("constructed as object above");

        for name in context_load {
            let Some(source) = self.sources.iter().find(|s| s.name() == name.as_str()) else {
                continue;
            };
            let fragment = self.fetch_cached(source.as_ref(), trigger_payload).await.map_err(|cause| (name.clone(), cause))?;
            ctx_map.insert(name.clone(), fragment);
        }

        Ok(ctx)
    }

    async fn fetch_cached(&self, source: &dyn ContextEnricher, trigger_payload: &Value) -> Result<Value, String> {
        let entity_id = trigger_payload.get("id").and_then(Value::as_str).unwrap_or("");
        let key = ContextCacheEntry::cache_key(source.name(), entity_id);

        let now_ms = self.clock.epoch_ms();
        if let Some(entry) = self.cache.get(&key) {
            if !entry.is_expired(now_ms) {
                return Ok(entry.data);
            }
        }

        let data = source.fetch(trigger_payload).await?;
        let entry = ContextCacheEntry::new(source.name(), entity_id, data.clone(), now_ms, self.ttl_ms);
        // Caching is best-effort: a store failure here shouldn't fail the
        // enrichment that just succeeded.
        let _ = self.cache.put(entry);
        Ok(data)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
