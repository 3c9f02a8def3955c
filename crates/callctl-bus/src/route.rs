// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message classification by `(publisher, type)`.

use callctl_config::PublisherConfig;

pub const TYPE_ARI_EVENT: &str = "ari_event";
pub const TYPE_CUSTOMER_DELETED: &str = "customer_deleted";
pub const TYPE_ACTIVEFLOW_UPDATED: &str = "activeflow_updated";
pub const TYPE_POD_DELETED: &str = "pod_deleted";

/// Where a consumed message goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Engine signaling event: parse and run through the event handler.
    AriEvent,
    CustomerDeleted,
    ActiveflowUpdated,
    PodDeleted,
    /// Not ours. Consumed without effect.
    Drop,
}

/// Maps `(publisher, type)` pairs onto routes using configured publisher
/// names.
#[derive(Debug, Clone)]
pub struct Classifier {
    publishers: PublisherConfig,
}

impl Classifier {
    pub fn new(publishers: PublisherConfig) -> Self {
        Self { publishers }
    }

    pub fn classify(&self, publisher: &str, message_type: &str) -> Route {
        let p = &self.publishers;
        if publisher == p.asterisk_proxy && message_type == TYPE_ARI_EVENT {
            Route::AriEvent
        } else if publisher == p.customer && message_type == TYPE_CUSTOMER_DELETED {
            Route::CustomerDeleted
        } else if publisher == p.flow && message_type == TYPE_ACTIVEFLOW_UPDATED {
            Route::ActiveflowUpdated
        } else if publisher == p.fleet && message_type == TYPE_POD_DELETED {
            Route::PodDeleted
        } else {
            Route::Drop
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(PublisherConfig::default())
    }
}
