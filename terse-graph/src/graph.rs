//! The resource graph
//!
//! A `Graph` owns every resource node, the literal interner and the current
//! root. Nodes are stored in an arena and referred to by [`NodeId`]; a given
//! IRI maps to exactly one node for the lifetime of the graph. Merging more
//! documents mutates existing nodes in place: property sets accumulate, they
//! are never replaced.

use crate::error::Result;
use crate::literal::{Literal, LiteralId, LiteralInterner};
use crate::merge::{MergeOptions, Merger};
use crate::source::Source;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use terse_vocab::keyword;
use tracing::debug;

/// Handle to a resource node in a [`Graph`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A property value, or the result of merging a source value.
///
/// Nodes and literals compare by identity (handle). Lists and arrays have no
/// identity of their own: they are never deduplicated against each other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Node(NodeId),
    Literal(LiteralId),
    /// An ordered `@list` container
    List(Vec<Value>),
    /// A nested array (a source array appearing where a single value was
    /// expected)
    Array(Vec<Value>),
}

impl Value {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Value::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<LiteralId> {
        match self {
            Value::Literal(id) => Some(*id),
            _ => None,
        }
    }

    /// Identity comparison used for property-set deduplication
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Node(a), Value::Node(b)) => a == b,
            (Value::Literal(a), Value::Literal(b)) => a == b,
            _ => false,
        }
    }
}

/// A resource: an IRI (or none, for blank nodes) plus its properties
#[derive(Clone, Debug, Default)]
pub struct ResourceNode {
    iri: Option<String>,
    properties: IndexMap<String, Vec<Value>>,
}

impl ResourceNode {
    /// The node's IRI; None for blank nodes
    pub fn iri(&self) -> Option<&str> {
        self.iri.as_deref()
    }

    pub fn is_blank(&self) -> bool {
        self.iri.is_none()
    }

    /// Properties keyed by expanded predicate IRI, in first-seen order
    pub fn properties(&self) -> &IndexMap<String, Vec<Value>> {
        &self.properties
    }

    /// Values of one predicate (empty if absent)
    pub fn values(&self, predicate: &str) -> &[Value] {
        self.properties
            .get(predicate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Append values to a predicate's set, skipping values already present.
    ///
    /// The predicate is created even if `values` is empty.
    fn append(&mut self, predicate: &str, values: Vec<Value>) {
        let set = self.properties.entry(predicate.to_string()).or_default();
        for value in values {
            if !set.iter().any(|existing| existing.is_same(&value)) {
                set.push(value);
            }
        }
    }
}

/// Something that can name a node: an IRI, a handle, or a JSON reference
/// object carrying `@id`.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Iri(&'a str),
    Node(NodeId),
    Json(&'a JsonValue),
}

impl<'a> From<&'a str> for NodeRef<'a> {
    fn from(iri: &'a str) -> Self {
        NodeRef::Iri(iri)
    }
}

impl<'a> From<&'a String> for NodeRef<'a> {
    fn from(iri: &'a String) -> Self {
        NodeRef::Iri(iri)
    }
}

impl From<NodeId> for NodeRef<'_> {
    fn from(id: NodeId) -> Self {
        NodeRef::Node(id)
    }
}

impl<'a> From<&'a JsonValue> for NodeRef<'a> {
    fn from(value: &'a JsonValue) -> Self {
        NodeRef::Json(value)
    }
}

/// A merged resource graph
///
/// # Example
///
/// ```
/// use terse_graph::{Graph, MergeOptions};
/// use serde_json::json;
///
/// let doc = json!({
///     "@context": {"ex": "http://example.org/"},
///     "@id": "ex:a",
///     "ex:name": "Alice"
/// });
/// let graph = Graph::from_input(doc, &MergeOptions::default()).unwrap();
/// let a = graph.get("http://example.org/a").unwrap();
/// assert_eq!(graph.root(), Some(a));
/// assert_eq!(graph.to_triples().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<ResourceNode>,
    by_iri: HashMap<String, NodeId>,
    literals: LiteralInterner,
    root: Option<NodeId>,
}

impl Graph {
    /// Create an empty graph with no root
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph from an initial document.
    ///
    /// The root is the document's top-level node, or the first node created
    /// if the top level is not a single resource.
    pub fn from_input(input: impl Into<Source>, options: &MergeOptions) -> Result<Self> {
        let mut graph = Self::new();
        let merged = graph.merge(input, options)?;
        graph.root = merged.as_node().or_else(|| graph.first_node());
        Ok(graph)
    }

    /// Merge another document into the graph.
    ///
    /// Returns the merged top-level value; the root is unchanged. Blank node
    /// labels are scoped to this call.
    ///
    /// Fails with [`TerseError::NestingTooDeep`](crate::TerseError) when the
    /// input nests deeper than `options.max_depth`. There is no rollback:
    /// nodes and values committed before the failure stay in the graph.
    pub fn merge(&mut self, input: impl Into<Source>, options: &MergeOptions) -> Result<Value> {
        let input = input.into();
        let nodes_before = self.nodes.len();
        let literals_before = self.literals.len();

        let merged = Merger::new(self, options).run(&input)?;

        debug!(
            nodes = self.nodes.len(),
            new_nodes = self.nodes.len() - nodes_before,
            new_literals = self.literals.len() - literals_before,
            "merged document"
        );
        Ok(merged)
    }

    /// Resolve a reference to an existing node. Never creates nodes.
    pub fn get<'a>(&self, reference: impl Into<NodeRef<'a>>) -> Option<NodeId> {
        match reference.into() {
            NodeRef::Iri(iri) => self.by_iri.get(iri).copied(),
            NodeRef::Node(id) => (id.0 < self.nodes.len()).then_some(id),
            NodeRef::Json(JsonValue::String(iri)) => self.by_iri.get(iri.as_str()).copied(),
            NodeRef::Json(JsonValue::Object(map)) => map
                .get(keyword::ID)
                .and_then(JsonValue::as_str)
                .and_then(|iri| self.by_iri.get(iri).copied()),
            NodeRef::Json(_) => None,
        }
    }

    /// Snapshot of all resource nodes, in creation order
    pub fn nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len()).map(NodeId).collect()
    }

    /// Iterate over nodes with their handles, in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ResourceNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn node(&self, id: NodeId) -> Option<&ResourceNode> {
        self.nodes.get(id.0)
    }

    pub fn literal(&self, id: LiteralId) -> Option<&Literal> {
        self.literals.get(id)
    }

    /// Number of resource nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Set the root; a reference that does not resolve clears it.
    pub fn set_root<'a>(&mut self, reference: impl Into<NodeRef<'a>>) {
        self.root = self.get(reference);
    }

    /// IRI of a node, if it has one
    pub fn iri(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(ResourceNode::iri)
    }

    fn first_node(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId(0))
    }

    pub(crate) fn intern_literal(&mut self, literal: Literal) -> LiteralId {
        self.literals.intern(literal)
    }

    /// The node for `iri`, created on first sight
    pub(crate) fn node_for_iri(&mut self, iri: &str) -> NodeId {
        if let Some(&id) = self.by_iri.get(iri) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(ResourceNode {
            iri: Some(iri.to_string()),
            properties: IndexMap::new(),
        });
        self.by_iri.insert(iri.to_string(), id);
        id
    }

    /// A new node with no IRI
    pub(crate) fn new_blank(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ResourceNode::default());
        id
    }

    pub(crate) fn append_values(&mut self, node: NodeId, predicate: &str, values: Vec<Value>) {
        if let Some(node) = self.nodes.get_mut(node.0) {
            node.append(predicate, values);
        }
    }
}
