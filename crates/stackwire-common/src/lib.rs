//! # stackwire-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used across the entire stackwire workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and provides the primitives the descriptor resolver and
//! the CLI build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
