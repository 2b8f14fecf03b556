//! Datablock - Identity-stable data access over a scene store
//!
//! This crate re-exports all layers of the Datablock system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: datablock_access     - Object handles, attribute arrays, column proxies
//! Layer 1: datablock_storage    - Scene store, objects, collections, modifiers
//! Layer 0: datablock_foundation - Core types (AttributeData, ObjectId, Error)
//! ```

pub use datablock_access as access;
pub use datablock_foundation as foundation;
pub use datablock_storage as storage;
