//! Recursive merging of source documents into a [`Graph`]
//!
//! Each merge call walks the source tree once, recomputing the context at
//! every object, and lands its effects in the graph:
//!
//! - arrays merge element-wise, in order
//! - primitives become interned plain literals
//! - `{"@list": [...]}` becomes a list container
//! - `{"@value": ...}` becomes an interned literal
//! - any other object is a resource node, found or created by its `@id`
//!
//! A source object merged twice in one call (shared, or containing itself)
//! yields the same node both times without being walked again.

use crate::context::Context;
use crate::error::{Result, TerseError};
use crate::expand::{expand, expand_type, Position};
use crate::graph::{Graph, NodeId, Value};
use crate::literal::Literal;
use crate::source::{Source, SourceObject};
use indexmap::IndexMap;
use std::collections::HashMap;
use terse_vocab::{blank, keyword, rdf};
use tracing::{trace, warn};

/// Default maximum nesting depth of a merge call
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options for a merge call
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// URI of the document, the initial base for relative references
    pub document_uri: Option<String>,
    /// Initial default vocabulary
    pub vocab: Option<String>,
    /// Context applied outside the document's own `@context`
    pub fallback_context: Option<Source>,
    /// Maximum nesting depth; deeper input fails the merge
    pub max_depth: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            document_uri: None,
            vocab: None,
            fallback_context: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document_uri(mut self, uri: impl Into<String>) -> Self {
        self.document_uri = Some(uri.into());
        self
    }

    pub fn with_vocab(mut self, vocab: impl Into<String>) -> Self {
        self.vocab = Some(vocab.into());
        self
    }

    pub fn with_fallback_context(mut self, context: impl Into<Source>) -> Self {
        self.fallback_context = Some(context.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// State of one merge call
pub(crate) struct Merger<'g> {
    graph: &'g mut Graph,
    root_context: Context,
    max_depth: usize,
    /// Source object handle → node merged from it in this call
    visited: HashMap<usize, NodeId>,
    /// Blank node labels seen in this call
    blanks: HashMap<String, NodeId>,
}

impl<'g> Merger<'g> {
    pub(crate) fn new(graph: &'g mut Graph, options: &MergeOptions) -> Self {
        Self {
            graph,
            root_context: Context::root(options),
            max_depth: options.max_depth,
            visited: HashMap::new(),
            blanks: HashMap::new(),
        }
    }

    pub(crate) fn run(mut self, input: &Source) -> Result<Value> {
        let context = std::mem::take(&mut self.root_context);
        self.merge(input, &context, 0)
    }

    fn merge(&mut self, input: &Source, parent: &Context, depth: usize) -> Result<Value> {
        let depth = depth + 1;
        if depth > self.max_depth {
            warn!(max_depth = self.max_depth, "merge aborted: nested too deep");
            return Err(TerseError::NestingTooDeep {
                max_depth: self.max_depth,
            });
        }

        match input {
            Source::Array(items) => Ok(Value::Array(self.merge_all(items, parent, depth)?)),
            Source::Object(obj) => {
                let local = obj.get(keyword::CONTEXT);
                let context = parent.overlay(local.as_ref());
                self.merge_object(obj, &context, depth)
            }
            primitive => {
                let literal = Literal::plain(primitive.to_json());
                Ok(Value::Literal(self.graph.intern_literal(literal)))
            }
        }
    }

    fn merge_all(&mut self, items: &[Source], context: &Context, depth: usize) -> Result<Vec<Value>> {
        items
            .iter()
            .map(|item| self.merge(item, context, depth))
            .collect()
    }

    fn merge_object(&mut self, obj: &SourceObject, context: &Context, depth: usize) -> Result<Value> {
        let map = obj.borrow();

        if let Some(list) = map.get(keyword::LIST) {
            let items = match list {
                Source::Array(items) => self.merge_all(items, context, depth)?,
                _ => Vec::new(),
            };
            return Ok(Value::List(items));
        }

        if map.contains_key(keyword::VALUE) {
            let literal = literal_from(&map, context);
            return Ok(Value::Literal(self.graph.intern_literal(literal)));
        }

        if let Some(&node) = self.visited.get(&obj.handle()) {
            return Ok(Value::Node(node));
        }

        let identity = map
            .get(keyword::ID)
            .and_then(Source::as_str)
            .and_then(|id| expand(id, Position::Reference, context));
        let node = self.node_for_identity(identity.as_deref());
        // registered before the properties so references back to `obj` resolve
        self.visited.insert(obj.handle(), node);

        for (key, value) in map.iter() {
            match key.as_str() {
                keyword::TYPE => self.merge_types(node, value, context),
                keyword::INCLUDED => {
                    self.merge(value, context, depth)?;
                }
                k if keyword::is_keyword(k) => {}
                k => {
                    let Some(predicate) = expand(k, Position::Predicate, context) else {
                        trace!(key = k, "dropping unexpandable property");
                        continue;
                    };
                    self.graph.node_for_iri(&predicate);
                    let values = match value {
                        Source::Array(items) => self.merge_all(items, context, depth)?,
                        single => vec![self.merge(single, context, depth)?],
                    };
                    self.graph.append_values(node, &predicate, values);
                }
            }
        }

        Ok(Value::Node(node))
    }

    /// `@type` values are node references under `rdf:type`
    fn merge_types(&mut self, node: NodeId, value: &Source, context: &Context) {
        let names: Vec<&str> = match value {
            Source::Array(items) => items.iter().filter_map(Source::as_str).collect(),
            single => single.as_str().into_iter().collect(),
        };
        self.graph.node_for_iri(rdf::TYPE);
        let types = names
            .into_iter()
            .map(|name| {
                let iri = expand_type(name, context);
                Value::Node(self.node_for_identity(Some(&iri)))
            })
            .collect();
        self.graph.append_values(node, rdf::TYPE, types);
    }

    /// IRIs map to graph-wide nodes; blank labels to nodes scoped to this call;
    /// no identity at all to a fresh anonymous node.
    fn node_for_identity(&mut self, identity: Option<&str>) -> NodeId {
        match identity {
            Some(iri) if !blank::is_blank(iri) => self.graph.node_for_iri(iri),
            Some(label) => match self.blanks.get(label) {
                Some(&node) => node,
                None => {
                    let node = self.graph.new_blank();
                    self.blanks.insert(label.to_string(), node);
                    node
                }
            },
            None => self.graph.new_blank(),
        }
    }
}

/// Build a literal from a `@value` object: value, language and direction are
/// copied; a string `@type` is expanded as a reference.
fn literal_from(map: &IndexMap<String, Source>, context: &Context) -> Literal {
    let verbatim = |key: &str| map.get(key).map(Source::to_json);
    Literal {
        value: map
            .get(keyword::VALUE)
            .map(Source::to_json)
            .unwrap_or_default(),
        datatype: map
            .get(keyword::TYPE)
            .and_then(Source::as_str)
            .and_then(|t| expand(t, Position::Reference, context)),
        language: verbatim(keyword::LANGUAGE),
        direction: verbatim(keyword::DIRECTION),
    }
}
