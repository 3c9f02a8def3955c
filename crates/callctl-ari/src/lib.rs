// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine event model for callctl.
//!
//! [`parse`] turns a raw engine message into its [`Event`] envelope and, for
//! known types, a typed [`AriEvent`]. The [`reference`] module derives channel
//! technology and bridge ownership from engine naming conventions.

pub mod decode;
pub mod error;
pub mod event;
pub mod model;
pub mod reference;

pub use error::ParseError;
pub use event::{AriEvent, Event, EventType, parse};
pub use model::{AriBridge, AriChannel, ContactInfo, Endpoint, LiveRecording, Peer, Playback};
pub use reference::{BridgeReference, bridge_name, bridge_reference, channel_tech};
