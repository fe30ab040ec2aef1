//! Nested tree rendering
//!
//! Renders the graph from one node outward. Each node is written in full the
//! first time it is reached and as an `{"@id": ...}` reference afterwards;
//! a blank node that is referenced more than once gets a synthetic `_:bN`
//! label so the references can be followed. Nodes not reachable from the
//! root are appended under `@included`, so every node in the graph appears
//! exactly once in full.
//!
//! A node nested more than [`TreeOptions::max_depth`] levels below the node
//! that started it is written as a reference and rendered under `@included`
//! instead, so long chains of linked nodes do not nest without bound.
//!
//! Node identifiers are made relative to an optional base IRI.

use crate::error::Result;
use crate::graph::{Graph, NodeId, Value};
use crate::iri::{self, RelativeBase};
use crate::triples::{id_ref, list_json, BlankLabels};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;
use terse_vocab::keyword;

/// Default for [`TreeOptions::max_depth`]
pub const DEFAULT_TREE_DEPTH: usize = 16;

/// Options for tree rendering
///
/// Both collapsing modes lose information and do not round-trip exactly.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Base IRI that node identifiers are made relative to
    pub base: Option<String>,
    /// Write single-element arrays as their bare element
    pub no_array: bool,
    /// Write literals without datatype, language or direction as bare JSON
    /// primitives
    pub raw_literals: bool,
    /// Deepest level at which a node is nested in full
    pub max_depth: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            base: None,
            no_array: false,
            raw_literals: false,
            max_depth: DEFAULT_TREE_DEPTH,
        }
    }
}

impl TreeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn no_array(mut self, enabled: bool) -> Self {
        self.no_array = enabled;
        self
    }

    pub fn raw_literals(mut self, enabled: bool) -> Self {
        self.raw_literals = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// One rendering pass over the graph.
///
/// Rendering runs twice in identical order: the first pass only discovers
/// which blank nodes are reached more than once and labels them, so the
/// second pass can write the label into the node's full rendering even though
/// that rendering comes before the repeat reference.
struct TreeWriter<'g> {
    graph: &'g Graph,
    options: &'g TreeOptions,
    base: Option<RelativeBase>,
    labels: BlankLabels,
    visited: HashSet<NodeId>,
    depth: usize,
}

impl<'g> TreeWriter<'g> {
    fn new(graph: &'g Graph, options: &'g TreeOptions) -> Self {
        Self {
            graph,
            options,
            base: options.base.as_deref().and_then(RelativeBase::parse),
            labels: BlankLabels::default(),
            visited: HashSet::new(),
            depth: 0,
        }
    }

    /// First pass: visit in rendering order, labelling repeated blank nodes.
    fn plan(&mut self, root: Option<NodeId>) {
        if let Some(root) = root {
            self.plan_node(root);
        }
        for id in self.graph.nodes() {
            if !self.visited.contains(&id) {
                self.plan_node(id);
            }
        }
        self.visited.clear();
    }

    fn plan_node(&mut self, id: NodeId) {
        if self.is_reference(id) {
            if self.graph.iri(id).is_none() {
                self.labels.get_or_assign(id);
            }
            return;
        }
        self.visited.insert(id);
        let Some(node) = self.graph.node(id) else {
            return;
        };
        self.depth += 1;
        for values in node.properties().values() {
            for value in values {
                self.plan_value(value);
            }
        }
        self.depth -= 1;
    }

    fn plan_value(&mut self, value: &Value) {
        match value {
            Value::Node(id) => self.plan_node(*id),
            Value::Literal(_) => {}
            Value::List(items) | Value::Array(items) => {
                for item in items {
                    self.plan_value(item);
                }
            }
        }
    }

    /// Second pass: render the root, then everything it did not reach.
    fn render(&mut self, root: Option<NodeId>) -> JsonValue {
        let mut tree = match root {
            Some(root) => self.render_node(root),
            None => JsonValue::Object(Map::new()),
        };

        let mut included = Vec::new();
        for id in self.graph.nodes() {
            // an earlier included node may already have reached this one
            if !self.visited.contains(&id) {
                included.push(self.render_node(id));
            }
        }

        if !included.is_empty() {
            if let JsonValue::Object(ref mut obj) = tree {
                obj.insert(keyword::INCLUDED.to_string(), JsonValue::Array(included));
            }
        }
        tree
    }

    /// A node already written in full, or one nested too deep to be written
    /// here, is written as a reference.
    fn is_reference(&self, id: NodeId) -> bool {
        self.visited.contains(&id) || self.depth > self.options.max_depth
    }

    fn identifier(&self, id: NodeId) -> Option<String> {
        match self.graph.iri(id) {
            Some(iri) => Some(iri::relativize(iri, self.base.as_ref())),
            None => self.labels.get(id).map(str::to_string),
        }
    }

    fn render_node(&mut self, id: NodeId) -> JsonValue {
        if self.is_reference(id) {
            return id_ref(self.identifier(id).unwrap_or_default());
        }
        self.visited.insert(id);

        let mut obj = Map::new();
        if let Some(identifier) = self.identifier(id) {
            obj.insert(keyword::ID.to_string(), JsonValue::String(identifier));
        }
        let Some(node) = self.graph.node(id) else {
            return JsonValue::Object(obj);
        };
        self.depth += 1;
        for (predicate, values) in node.properties() {
            let rendered = self.render_values(values);
            obj.insert(predicate.clone(), rendered);
        }
        self.depth -= 1;
        JsonValue::Object(obj)
    }

    fn render_values(&mut self, values: &[Value]) -> JsonValue {
        if self.options.no_array && values.len() == 1 {
            return self.render_value(&values[0]);
        }
        JsonValue::Array(values.iter().map(|v| self.render_value(v)).collect())
    }

    fn render_value(&mut self, value: &Value) -> JsonValue {
        match value {
            Value::Node(id) => self.render_node(*id),
            Value::Literal(id) => match self.graph.literal(*id) {
                Some(literal) if self.options.raw_literals && literal.is_plain_primitive() => {
                    literal.value.clone()
                }
                Some(literal) => literal.to_json(),
                None => JsonValue::Null,
            },
            Value::List(items) => {
                let items = items.iter().map(|v| self.render_value(v)).collect();
                list_json(items)
            }
            Value::Array(items) => self.render_values(items),
        }
    }
}

impl Graph {
    /// Render the graph as a nested tree starting at `root` (default: the
    /// graph's root).
    ///
    /// Every node in the graph appears exactly once in full across the
    /// returned tree and its `@included` array. An empty graph renders as
    /// `{}`.
    pub fn to_tree(&self, root: Option<NodeId>, options: &TreeOptions) -> JsonValue {
        let root = root.or(self.root()).and_then(|id| self.get(id));
        let mut writer = TreeWriter::new(self, options);
        writer.plan(root);
        writer.render(root)
    }

    /// Render the tree as JSON text, indented by `indent` spaces, or compact
    /// when `indent` is None.
    pub fn to_json_string(
        &self,
        root: Option<NodeId>,
        options: &TreeOptions,
        indent: Option<usize>,
    ) -> Result<String> {
        let tree = self.to_tree(root, options);
        let Some(width) = indent else {
            return Ok(serde_json::to_string(&tree)?);
        };

        let indent = " ".repeat(width);
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(
            &mut out,
            PrettyFormatter::with_indent(indent.as_bytes()),
        );
        tree.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
