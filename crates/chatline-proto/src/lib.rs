//! Chatline wire protocol
//!
//! Every frame on the persistent connection is a JSON object discriminated by
//! its `type` field. Outbound frames are produced from [`OutboundFrame`];
//! inbound frames are decoded into the closed set of [`ProtocolEvent`]s by
//! [`decode`].
//!
//! # Invariants
//!
//! - Decoding is all-or-nothing: a frame either yields one complete event or a
//!   [`DecodeError`], never a partially populated event.
//! - Unknown `type` values are reported as [`DecodeError::UnknownType`] so the
//!   caller can log and drop them without touching session state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod frame;
pub mod ids;
pub mod payloads;

pub use errors::{DecodeError, EncodeError};
pub use frame::decode;
pub use ids::{ChatId, UserId};
pub use payloads::{
    Candidate, ChatCandidate, ChatData, MessageData, OutboundFrame, OutboundMessage,
    ProtocolEvent, SuggestionKind, UserCandidate, UserData,
};
