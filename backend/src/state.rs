//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! The service holds no per-user data: every request carries the activities
//! or cycles it needs, so the state is just validated configuration.

use crate::config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use training_tracker_shared::{CoreResult, TimezonePolicy};

/// Shared application state
///
/// Cloned for every request; all fields are `Arc`s or `Copy`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Default timezone policy, validated at startup
    pub timezone: TimezonePolicy,
    /// Prometheus exporter handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails if the configured UTC offset is out of range.
    pub fn new(config: AppConfig) -> CoreResult<Self> {
        let timezone = config.aggregation.timezone_policy()?;

        Ok(Self {
            config: Arc::new(config),
            timezone,
            metrics: None,
        })
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether training logs are compacted when the request doesn't say
    #[inline]
    pub fn compact_by_default(&self) -> bool {
        self.config.aggregation.compact_by_default
    }
}
