//! Trait definitions for the Parley workspace.
//!
//! Two seams separate the retry governor from the network:
//!
//! - [`GenerativeBackend`] is the remote service boundary. It takes a prompt
//!   and optional prior history and returns an unvalidated [`RawResponse`].
//! - [`Invoker`] is the session adapter consumed by the retry governor. It
//!   hides whether a prompt is sent statelessly or appended to a conversation,
//!   validates the raw response and yields a [`Reply`].
//!
//! [`RawResponse`]: parley_core::RawResponse
//! [`Reply`]: parley_core::Reply

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{GenerativeBackend, Invoker};
