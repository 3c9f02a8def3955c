// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message bus plumbing and the dispatch pipeline.
//!
//! [`Pipeline`] consumes one queue, classifies each message by
//! `(publisher, type)` and hands it to the [`Processor`]. Delivery is
//! at-most-once: a failed message is logged, counted, and not retried.

pub mod feeder;
pub mod pipeline;
pub mod processor;
pub mod queue;
pub mod route;
pub mod shutdown;

pub use feeder::{FeedStats, feed_lines, parse_line};
pub use pipeline::Pipeline;
pub use processor::Processor;
pub use queue::MemoryQueue;
pub use route::{Classifier, Route};
pub use shutdown::install_signal_handler;
