//! Test utilities for Parley model tests.
//!
//! This module provides mock implementations and test helpers.

pub mod mock_backend;

#[allow(unused_imports)]
pub use mock_backend::{MockBackend, MockBehavior, MockResponse};
