// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the callctl signaling nucleus.
//!
//! Holds the domain entities (channels, bridges, recordings), the error
//! taxonomy, and the collaborator traits the event handler and dispatch
//! pipeline call into.

pub mod error;
pub mod traits;
pub mod types;

pub use error::CallctlError;
pub use types::{
    Activeflow, Bridge, BridgeReferenceType, Channel, ChannelState, ChannelTech, ChannelType,
    ContextType, Customer, Dialplan, Direction, HangupCause, Message, NewBridge, NewChannel, Pod,
    Recording, RecordingStatus,
};

pub use traits::{
    BridgeHandler, CallHandler, ChannelHandler, ConfbridgeHandler, MessageQueue,
    RecordingHandler, RequestHandler,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_collaborator_traits_are_exported() {
        fn _assert_channel<T: ChannelHandler>() {}
        fn _assert_bridge<T: BridgeHandler>() {}
        fn _assert_call<T: CallHandler>() {}
        fn _assert_confbridge<T: ConfbridgeHandler>() {}
        fn _assert_recording<T: RecordingHandler>() {}
        fn _assert_request<T: RequestHandler>() {}
        fn _assert_queue<T: MessageQueue>() {}
    }

    #[test]
    fn collaborator_traits_are_object_safe() {
        fn _dyn(_: &dyn ChannelHandler, _: &dyn BridgeHandler, _: &dyn MessageQueue) {}
    }
}
