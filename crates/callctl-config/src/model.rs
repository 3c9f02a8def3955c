// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level callctl configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CallctlConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Inbound queue and its publisher bindings.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Prometheus metrics.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Name used in logs.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` wins when
    /// set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Seconds an ended channel stays in the store. 0 keeps it forever.
    #[serde(default = "default_channel_retention_secs")]
    pub channel_retention_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            channel_retention_secs: default_channel_retention_secs(),
        }
    }
}

fn default_service_name() -> String {
    "call-manager".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_channel_retention_secs() -> u64 {
    3600
}

/// Inbound queue configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Queue the pipeline declares and consumes.
    #[serde(default = "default_queue_name")]
    pub name: String,

    /// Maximum number of messages processed concurrently.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Publishers the queue is bound to.
    #[serde(default)]
    pub publishers: PublisherConfig,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: default_queue_name(),
            max_in_flight: default_max_in_flight(),
            publishers: PublisherConfig::default(),
        }
    }
}

fn default_queue_name() -> String {
    "bin-manager.call-manager.subscribe".to_string()
}

fn default_max_in_flight() -> usize {
    100
}

/// Names of the upstream publishers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PublisherConfig {
    /// Signaling proxy that relays engine events.
    #[serde(default = "default_asterisk_proxy")]
    pub asterisk_proxy: String,

    #[serde(default = "default_customer")]
    pub customer: String,

    #[serde(default = "default_flow")]
    pub flow: String,

    #[serde(default = "default_fleet")]
    pub fleet: String,
}

impl PublisherConfig {
    /// All configured publishers, signaling proxy first.
    pub fn all(&self) -> [&str; 4] {
        [
            &self.asterisk_proxy,
            &self.customer,
            &self.flow,
            &self.fleet,
        ]
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            asterisk_proxy: default_asterisk_proxy(),
            customer: default_customer(),
            flow: default_flow(),
            fleet: default_fleet(),
        }
    }
}

fn default_asterisk_proxy() -> String {
    "asterisk-proxy".to_string()
}

fn default_customer() -> String {
    "customer-manager".to_string()
}

fn default_flow() -> String {
    "flow-manager".to_string()
}

fn default_fleet() -> String {
    "fleet-manager".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Record pipeline metrics.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}
