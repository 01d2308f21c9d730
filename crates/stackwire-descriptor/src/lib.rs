//! # stackwire-descriptor
//!
//! Parser and resolver for `.stk` deployment descriptors.
//!
//! Handles:
//! - **Parser**: Lexing, AST construction, and validation of `.stk` files.
//! - **Graph**: Reference graph construction and ranked topological ordering.
//! - **Identity**: Stage-scoped runtime names and platform attributes.
//! - **Resolver**: Materialization, environment assembly, and output binding.
//! - **Secrets**: Process-level secret capture.
//! - **Manifest**: The resolved resources and output manifest.
//! - **Executor**: The seam consumed by provisioning backends.

pub mod executor;
pub mod graph;
pub mod identity;
pub mod manifest;
pub mod parser;
pub mod resolver;
pub mod secrets;

pub use manifest::{MaterializedResource, OutputManifest, Resolution};
pub use parser::ast::Descriptor;
pub use parser::{load_descriptor, load_descriptor_file};
pub use resolver::resolve;
pub use secrets::Secrets;
