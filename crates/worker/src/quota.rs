//! Daily invocation quota bookkeeping.
//!
//! Purely observational: counts invocations per calendar day against a
//! soft ceiling and logs advisory warnings as usage approaches it. It
//! never gates ingestion; the ingest path does not consult it.

use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info, warn};

use scanlog_core::{
    limits::{COUNTER_RETENTION_DAYS, DAILY_QUOTA, QUOTA_CRITICAL_MARGIN, QUOTA_WARN_RATIO},
    Result,
};
use scanlog_store::CounterStore;
use scanlog_telemetry::metrics;

/// Usage after recording one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageStatus {
    /// Day key, `YYYY-MM-DD`.
    pub date: String,
    /// Invocations recorded for the day so far, this one included.
    pub execution_count: u32,
    /// `max(0, daily_limit - execution_count)`.
    pub estimated_remaining: u32,
}

/// Per-day invocation counter with advisory warning tiers.
pub struct QuotaCounter {
    store: Arc<dyn CounterStore>,
    daily_limit: u32,
}

impl QuotaCounter {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self::with_limit(store, DAILY_QUOTA)
    }

    pub fn with_limit(store: Arc<dyn CounterStore>, daily_limit: u32) -> Self {
        Self { store, daily_limit }
    }

    /// Records one invocation for `day`: increments the stored count,
    /// evicts the entry from exactly seven days prior, and returns the
    /// updated usage.
    pub async fn record_invocation(&self, day: NaiveDate) -> Result<UsageStatus> {
        let key = day_key(day);
        let count = self.store.get(&key).await?.unwrap_or(0) + 1;
        self.store.put(&key, count).await?;

        let expired = day_key(day - Duration::days(COUNTER_RETENTION_DAYS));
        self.store.remove(&expired).await?;

        metrics().quota_checks.inc();
        let status = UsageStatus {
            date: key,
            execution_count: count,
            estimated_remaining: self.daily_limit.saturating_sub(count),
        };
        self.log_tier(&status);
        Ok(status)
    }

    /// Unconditionally removes the stored count for `day`.
    pub async fn reset_counter(&self, day: NaiveDate) -> Result<()> {
        self.store.remove(&day_key(day)).await?;
        info!(date = %day_key(day), "Daily counter reset");
        Ok(())
    }

    fn log_tier(&self, status: &UsageStatus) {
        let count = status.execution_count;
        if count > self.daily_limit - QUOTA_CRITICAL_MARGIN {
            warn!(
                date = %status.date,
                executions = count,
                remaining = status.estimated_remaining,
                "Daily quota nearly exhausted"
            );
        } else if f64::from(count) > f64::from(self.daily_limit) * QUOTA_WARN_RATIO {
            warn!(
                date = %status.date,
                executions = count,
                remaining = status.estimated_remaining,
                "Daily quota above 70%"
            );
        } else {
            debug!(
                date = %status.date,
                executions = count,
                remaining = status.estimated_remaining,
                "Quota check"
            );
        }
    }
}

fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
