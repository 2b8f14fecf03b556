//! Integration tests for Layer 2: Access
//!
//! Tests for rename-proof object handles, attribute arrays, and column
//! proxies.

mod columns;
