//! Core types shared by every part of the crate.
//!
//! ### [`error`] - Error handling
//! [`LogError`] is the only error that crosses the handler boundary; it covers
//! sink write failures plus configuration problems found at construction.
//! [`ExtractError`] is what a context extractor reports; the handler recovers
//! from it locally.

pub mod error;

pub use error::{ExtractError, LogError, LogResult};
