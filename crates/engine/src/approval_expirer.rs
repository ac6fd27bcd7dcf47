// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ApprovalExpirer: the periodic loop that expires approval requests past
//! their deadline, freeing the Resumer to wake their executions.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use wfe_core::Clock;

use crate::approval_coordinator::ApprovalCoordinator;
use crate::error::EngineError;

pub struct ApprovalExpirer<C: Clock> {
    approvals: Arc<ApprovalCoordinator<C>>,
}

impl<C: Clock + 'static> ApprovalExpirer<C> {
    pub fn new(approvals: Arc<ApprovalCoordinator<C>>) -> Self {
        Self { approvals }
    }

    pub fn spawn(self: Arc<Self>, interval: Duration, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = self.tick().await {
                            tracing::warn!(error = %err, "approval expirer tick failed");
                        }
                    }
                }
            }
        })
    }

    /// Expire one batch of overdue pending approvals. Returns how many
    /// were expired.
    pub async fn tick(&self) -> Result<usize, EngineError> {
        Ok(self.approvals.expire_due().await?)
    }
}

#[cfg(test)]
#[path = "approval_expirer_tests.rs"]
mod tests;
