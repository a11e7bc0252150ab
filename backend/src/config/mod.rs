//! Configuration management for the Training Tracker backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: TT__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use training_tracker_shared::{CoreResult, TimezonePolicy};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body
    pub max_body_bytes: usize,
    pub request_timeout_secs: u64,
}

/// Training log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Offset east of UTC used to assign activities to calendar days
    pub utc_offset_minutes: i32,
    /// Collapse empty buckets unless the request says otherwise
    pub compact_by_default: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            compact_by_default: true,
        }
    }
}

impl AggregationConfig {
    /// Default timezone policy for requests that don't carry their own
    pub fn timezone_policy(&self) -> CoreResult<TimezonePolicy> {
        TimezonePolicy::fixed(self.utc_offset_minutes)
    }
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                max_body_bytes: 16 * 1024 * 1024,
                request_timeout_secs: 30,
            },
            aggregation: AggregationConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with TT__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (TT__ prefix)
            // e.g., TT__AGGREGATION__UTC_OFFSET_MINUTES=-300
            .add_source(
                config::Environment::with_prefix("TT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
