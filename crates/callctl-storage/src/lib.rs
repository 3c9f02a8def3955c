// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence for callctl.
//!
//! [`ChannelStore`] and [`BridgeStore`] implement the channel and bridge
//! contracts from `callctl-core` on top of `DashMap`, which gives per-row
//! atomicity for concurrent event workers.

pub mod bridge;
pub mod channel;

pub use bridge::BridgeStore;
pub use channel::ChannelStore;
