//! Stress tests for befunge-plus.
//!
//! These tests are designed to verify correctness under heavy load.
//! They are ignored by default and should be run with:
//! `cargo test --release -- --ignored`

mod heap_stress;
