//! Serde integration for path trees.
//!
//! This layer provides typed access to any [`Provider`]. It adds:
//! - `TypedProvider`: insert Rust types, read nodes back into Rust types
//! - `Value` <-> `serde_json::Value` conversions
//!
//! # Example
//!
//! ```rust
//! use pathtree_core::PathTree;
//! use pathtree_serde::TypedProvider;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Listener {
//!     host: String,
//!     ports: Vec<u16>,
//! }
//!
//! let mut tree = PathTree::new();
//! let listener = Listener { host: "localhost".into(), ports: vec![80, 443] };
//! tree.create_from("/listener", &listener).unwrap();
//!
//! assert!(tree.get("/listener/ports").unwrap().is_sequence());
//! let back: Listener = tree.get_as("/listener").unwrap();
//! assert_eq!(back, listener);
//! ```

mod convert;
mod typed;

pub use convert::{from_json, from_node, node_to_json, to_value, value_to_json};
pub use typed::TypedProvider;

// Re-export core types for convenience
pub use pathtree_core::{Error, NodeRef, Path, PathTree, Provider, Scalar, Value};
