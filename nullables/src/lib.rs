//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies (currently only the clock) are abstracted behind
//! traits in `upgov-types`. This crate provides test-friendly implementations
//! that return deterministic values and can be controlled programmatically.
//!
//! Usage: swap `SystemClock` for [`NullClock`] in tests.

pub mod clock;

pub use clock::NullClock;
