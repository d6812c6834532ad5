//! Core data types for the Parley workspace.
//!
//! These are the values that flow between the interactive loop, the retry
//! governor, the session adapters and the usage reporter. None of them own
//! any I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attempt;
mod mode;
mod response;
mod turn;
mod usage;

pub use attempt::{CallAttempt, CallOutcome};
pub use mode::Mode;
pub use response::{RawResponse, Reply};
pub use turn::{Role, Turn};
pub use usage::UsageSnapshot;
