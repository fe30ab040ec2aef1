//! Terse linked-data processing
//!
//! This crate merges JSON documents written in a compact linked-data style
//! (a subset of JSON-LD: `@context`, `@id`, `@type`, `@value`, `@list`,
//! `@included`) into one in-memory resource graph, and renders that graph
//! back out as flat triples or as a nested tree.
//!
//! # Example
//!
//! ```
//! use terse_graph::{Graph, MergeOptions, TreeOptions};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "@context": {"ex": "http://example.org/"},
//!     "@id": "ex:a",
//!     "ex:name": "Alice"
//! });
//!
//! let graph = Graph::from_input(doc, &MergeOptions::default()).unwrap();
//! let triples = graph.to_triples();
//! assert_eq!(triples[0].subject, "http://example.org/a");
//! assert_eq!(triples[0].predicate, "http://example.org/name");
//! assert_eq!(triples[0].object, json!({"@value": "Alice"}));
//!
//! let tree = graph.to_tree(None, &TreeOptions::new().no_array(true).raw_literals(true));
//! assert_eq!(tree["http://example.org/name"], json!("Alice"));
//! ```

pub mod context;
pub mod error;
pub mod expand;
pub mod graph;
pub mod iri;
pub mod literal;
pub mod merge;
pub mod select;
pub mod source;
pub mod tree;
pub mod triples;

pub use context::{effective_root_context, Context};
pub use error::{Result, TerseError};
pub use expand::{expand, expand_type, Position};
pub use graph::{Graph, NodeId, NodeRef, ResourceNode, Value};
pub use literal::{Literal, LiteralId};
pub use merge::{MergeOptions, DEFAULT_MAX_DEPTH};
pub use select::{Column, LiteralPattern, Match, Selector};
pub use source::{Source, SourceObject};
pub use tree::{TreeOptions, DEFAULT_TREE_DEPTH};
pub use triples::Triple;
