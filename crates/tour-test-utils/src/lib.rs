//! Shared test utilities for the fs-tour workspace.
//!
//! This crate provides standardised filesystem fixtures so crate test suites
//! do not each hand-roll temp directory setup. It is a dev-dependency only.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for directory trees with known counts

pub mod tree;

pub use tree::TestTree;
