//! Core abstractions for mythly.
//!
//! This module provides shared building blocks used across the repositories,
//! use cases and presentation models.

mod clock;
pub mod feed;

#[cfg(test)]
pub use clock::{ManualClock, MockClock};
pub use clock::{Clock, SystemClock};
pub use feed::{Feed, Subscription};
