// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for callctl integration tests.
//!
//! Provides recording mock collaborators that share one [`Journal`], wire
//! fixtures for engine events, and a [`TestHarness`] that wires the real
//! stores and event handler to the mocks.

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mocks::{
    Invocation, Journal, MockCallHandler, MockConfbridgeHandler, MockRecordingHandler,
    MockRequestHandler,
};
