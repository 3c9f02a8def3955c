// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator contracts consumed by the signaling core.
//!
//! Every trait uses `#[async_trait]` so implementations can be held as
//! `Arc<dyn Trait>` by the event handler and the dispatch pipeline.

pub mod bridge;
pub mod call;
pub mod channel;
pub mod confbridge;
pub mod queue;
pub mod recording;
pub mod request;

pub use bridge::BridgeHandler;
pub use call::CallHandler;
pub use channel::ChannelHandler;
pub use confbridge::ConfbridgeHandler;
pub use queue::MessageQueue;
pub use recording::RecordingHandler;
pub use request::RequestHandler;
