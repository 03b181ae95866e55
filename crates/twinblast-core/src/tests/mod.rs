//! Session-level tests.
//!
//! - `determinism.rs`: identical inputs give identical outcomes
//! - `integration.rs`: end-to-end input → animation → hit-scan runs
//! - `properties.rs`: proptest invariants of the attack resolver
//! - `helpers.rs`: setup utilities and test doubles

mod helpers;
mod integration;

pub use helpers::*;
