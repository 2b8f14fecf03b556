//! Cross-layer integration tests for Datablock
//!
//! Tests that verify correct interaction between multiple crates.
