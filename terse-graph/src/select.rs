//! Pattern queries over the graph
//!
//! A [`Selector`] names optional subject, predicate and object patterns, a
//! literal pattern, a subset of subjects and an arbitrary filter. Each
//! pattern that is given must resolve to a node in the graph, otherwise the
//! query matches nothing.

use crate::graph::{Graph, NodeId, NodeRef, Value};
use crate::literal::Literal;
use crate::triples::BlankLabels;
use serde_json::{Map, Value as JsonValue};
use terse_vocab::keyword;

type Filter<'a> = Box<dyn Fn(NodeId, &str, &Value) -> bool + 'a>;

/// A literal pattern
///
/// Each field that is set must equal the corresponding field of a literal for
/// it to match; unset fields match anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LiteralPattern {
    pub value: Option<JsonValue>,
    pub datatype: Option<String>,
    pub language: Option<JsonValue>,
    pub direction: Option<JsonValue>,
}

impl LiteralPattern {
    /// Match literals with exactly this value, whatever their datatype,
    /// language or direction
    pub fn value(value: impl Into<JsonValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<JsonValue>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_direction(mut self, direction: impl Into<JsonValue>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Build a pattern from JSON.
    ///
    /// An object is read as a value object: each of `@value`, `@type`,
    /// `@language` and `@direction` that is present becomes a constraint.
    /// Anything else is a bare value to match.
    pub fn from_json(pattern: &JsonValue) -> Self {
        let JsonValue::Object(map) = pattern else {
            return Self::value(pattern.clone());
        };
        Self {
            value: map.get(keyword::VALUE).cloned(),
            datatype: map
                .get(keyword::TYPE)
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            language: map.get(keyword::LANGUAGE).cloned(),
            direction: map.get(keyword::DIRECTION).cloned(),
        }
    }

    pub fn matches(&self, literal: &Literal) -> bool {
        self.value.as_ref().map_or(true, |v| *v == literal.value)
            && field_matches(&self.datatype, &literal.datatype)
            && field_matches(&self.language, &literal.language)
            && field_matches(&self.direction, &literal.direction)
    }
}

fn field_matches<T: PartialEq>(pattern: &Option<T>, actual: &Option<T>) -> bool {
    pattern.is_none() || pattern == actual
}

/// Query builder for [`Graph::select`]
///
/// ```
/// use terse_graph::{Graph, MergeOptions, Selector};
/// use serde_json::json;
///
/// let graph = Graph::from_input(
///     json!({"@id": "urn:a", "urn:name": "Alice", "urn:age": 30}),
///     &MergeOptions::default(),
/// ).unwrap();
/// let matches = graph.select(&Selector::new().predicate("urn:name"));
/// assert_eq!(matches.len(), 1);
/// ```
#[derive(Default)]
pub struct Selector<'a> {
    subject: Option<NodeRef<'a>>,
    predicate: Option<NodeRef<'a>>,
    object: Option<NodeRef<'a>>,
    literal: Option<LiteralPattern>,
    nodes: Option<Vec<NodeId>>,
    filter: Option<Filter<'a>>,
}

impl<'a> Selector<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: impl Into<NodeRef<'a>>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn predicate(mut self, predicate: impl Into<NodeRef<'a>>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    /// Only match values that are this node
    pub fn object(mut self, object: impl Into<NodeRef<'a>>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Only match literal values fitting the pattern
    pub fn literal(mut self, literal: LiteralPattern) -> Self {
        self.literal = Some(literal);
        self
    }

    /// Restrict the subjects considered (default: every node)
    pub fn nodes(mut self, nodes: Vec<NodeId>) -> Self {
        self.nodes = Some(nodes);
        self
    }

    /// Only keep matches for which `filter(subject, predicate, object)` holds
    pub fn filter(mut self, filter: impl Fn(NodeId, &str, &Value) -> bool + 'a) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }
}

impl std::fmt::Debug for Selector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("subject", &self.subject)
            .field("predicate", &self.predicate)
            .field("object", &self.object)
            .field("literal", &self.literal)
            .field("nodes", &self.nodes)
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// One (subject, predicate, object) match
#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub subject: NodeId,
    /// Expanded predicate IRI
    pub predicate: String,
    /// The predicate's own node
    pub predicate_node: Option<NodeId>,
    pub object: Value,
}

/// A column of a match list, for [`Graph::column`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Subject,
    Predicate,
    Object,
}

impl Graph {
    /// Run a query. Results are ordered by subject, then property, then value.
    pub fn select(&self, selector: &Selector<'_>) -> Vec<Match> {
        let mut results = Vec::new();

        let subject = match selector.subject {
            Some(pattern) => match self.get(pattern) {
                Some(id) => Some(id),
                None => return results,
            },
            None => None,
        };
        let predicate = match selector.predicate {
            Some(pattern) => match self.get(pattern).and_then(|id| self.iri(id)) {
                Some(iri) => Some(iri),
                None => return results,
            },
            None => None,
        };
        let object = match selector.object {
            Some(pattern) => match self.get(pattern) {
                Some(id) => Some(id),
                None => return results,
            },
            None => None,
        };

        let candidates = match (&selector.nodes, subject) {
            (Some(nodes), _) => nodes.clone(),
            (None, Some(subject)) => vec![subject],
            (None, None) => self.nodes(),
        };

        for id in candidates {
            if subject.is_some_and(|s| s != id) {
                continue;
            }
            let Some(node) = self.node(id) else {
                continue;
            };
            let properties = node
                .properties()
                .iter()
                .filter(|(key, _)| predicate.map_or(true, |p| p == key.as_str()))
                .filter(|(key, _)| !keyword::is_keyword(key));

            for (key, values) in properties {
                for value in values {
                    if object.is_some_and(|o| value.as_node() != Some(o)) {
                        continue;
                    }
                    if let Some(ref pattern) = selector.literal {
                        let literal = value.as_literal().and_then(|l| self.literal(l));
                        if !literal.is_some_and(|l| pattern.matches(l)) {
                            continue;
                        }
                    }
                    if let Some(ref filter) = selector.filter {
                        if !filter(id, key, value) {
                            continue;
                        }
                    }
                    results.push(Match {
                        subject: id,
                        predicate: key.clone(),
                        predicate_node: self.get(key),
                        object: value.clone(),
                    });
                }
            }
        }

        results
    }

    /// Distinct subjects of `matches`, in first-occurrence order
    pub fn subjects(matches: &[Match]) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        for m in matches {
            if !out.contains(&m.subject) {
                out.push(m.subject);
            }
        }
        out
    }

    /// Distinct predicate IRIs of `matches`, in first-occurrence order
    pub fn predicates(matches: &[Match]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for m in matches {
            if !out.contains(&m.predicate) {
                out.push(m.predicate.clone());
            }
        }
        out
    }

    /// Distinct objects of `matches` by identity, in first-occurrence order.
    /// Lists and nested arrays are always kept.
    pub fn objects(matches: &[Match]) -> Vec<Value> {
        let mut out: Vec<Value> = Vec::new();
        for m in matches {
            if !out.iter().any(|o| o.is_same(&m.object)) {
                out.push(m.object.clone());
            }
        }
        out
    }

    /// Render matches as `{"subject", "predicate", "object"}` JSON records.
    ///
    /// Blank nodes share one `_:bN` labelling across the whole list.
    pub fn matches_to_json(&self, matches: &[Match]) -> Vec<JsonValue> {
        let mut labels = BlankLabels::default();
        matches
            .iter()
            .map(|m| {
                let mut record = Map::new();
                record.insert(
                    "subject".to_string(),
                    JsonValue::String(self.identifier(m.subject, &mut labels)),
                );
                record.insert("predicate".to_string(), JsonValue::String(m.predicate.clone()));
                record.insert("object".to_string(), self.object_json(&m.object, &mut labels));
                JsonValue::Object(record)
            })
            .collect()
    }

    /// Distinct values of one column of `matches`, rendered as JSON
    pub fn column(&self, matches: &[Match], column: Column) -> Vec<JsonValue> {
        let mut labels = BlankLabels::default();
        match column {
            Column::Subject => Self::subjects(matches)
                .into_iter()
                .map(|id| JsonValue::String(self.identifier(id, &mut labels)))
                .collect(),
            Column::Predicate => Self::predicates(matches)
                .into_iter()
                .map(JsonValue::String)
                .collect(),
            Column::Object => Self::objects(matches)
                .iter()
                .map(|value| self.object_json(value, &mut labels))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MergeOptions;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn people() -> Graph {
        Graph::from_input(
            json!({
                "@context": {"ex": "http://example.org/"},
                "@id": "ex:alice",
                "@type": "ex:Person",
                "ex:name": {"@value": "Alice", "@language": "en"},
                "ex:knows": {
                    "@id": "ex:bob",
                    "@type": "ex:Person",
                    "ex:name": "Bob",
                    "ex:knows": {"@id": "ex:alice"}
                }
            }),
            &MergeOptions::default(),
        )
        .unwrap()
    }

    const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    #[test]
    fn test_select_by_subject() {
        let graph = people();
        assert_eq!(graph.select(&Selector::new().subject("http://example.org/alice")).len(), 3);
        let bob = graph.get("http://example.org/bob").unwrap();
        assert_eq!(graph.select(&Selector::new().subject(bob)).len(), 3);
    }

    #[test]
    fn test_select_by_predicate() {
        let graph = people();
        let matches = graph.select(&Selector::new().predicate(TYPE));
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].predicate, TYPE);
        assert_eq!(matches[0].predicate_node, graph.get(TYPE));
    }

    #[test]
    fn test_select_by_object() {
        let graph = people();
        let matches = graph.select(&Selector::new().object("http://example.org/alice"));
        assert_eq!(
            Graph::subjects(&matches),
            vec![graph.get("http://example.org/bob").unwrap()]
        );
    }

    #[test]
    fn test_unresolved_pattern_matches_nothing() {
        let graph = people();
        assert!(graph.select(&Selector::new().subject("http://www.notfound")).is_empty());
        assert!(graph.select(&Selector::new().predicate("urn:nope")).is_empty());
        assert!(graph.select(&Selector::new().object("urn:nope")).is_empty());
        // a predicate node has no properties of its own
        assert!(graph.select(&Selector::new().subject(TYPE)).is_empty());
    }

    #[test]
    fn test_select_literal_patterns() {
        let graph = people();
        let by_language = graph.select(&Selector::new().literal(LiteralPattern::from_json(
            &json!({"@language": "en"}),
        )));
        assert_eq!(
            Graph::subjects(&by_language),
            vec![graph.get("http://example.org/alice").unwrap()]
        );

        let by_value = graph.select(&Selector::new().literal(LiteralPattern::from_json(&json!("Bob"))));
        assert_eq!(by_value.len(), 1);

        let mismatch = graph.select(
            &Selector::new().literal(LiteralPattern::value("Alice").with_language("fr")),
        );
        assert!(mismatch.is_empty());
    }

    #[test]
    fn test_literal_pattern_skips_nodes() {
        let graph = people();
        let all = graph.select(&Selector::new().literal(LiteralPattern::default()));
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|m| m.object.as_literal().is_some()));
    }

    #[test]
    fn test_select_filter_and_nodes() {
        let graph = people();
        let alice = graph.get("http://example.org/alice").unwrap();
        let named_bob = graph.select(&Selector::new().filter(|_, _, value| {
            value
                .as_literal()
                .and_then(|id| graph.literal(id))
                .is_some_and(|l| l.value == json!("Bob"))
        }));
        assert_eq!(named_bob.len(), 1);

        let only_alice = graph.select(&Selector::new().nodes(vec![alice]));
        assert_eq!(Graph::subjects(&only_alice), vec![alice]);
    }

    #[test]
    fn test_columns() {
        let graph = people();
        let matches = graph.select(&Selector::new().predicate(TYPE));
        assert_eq!(
            graph.column(&matches, Column::Subject),
            vec![json!("http://example.org/alice"), json!("http://example.org/bob")]
        );
        assert_eq!(graph.column(&matches, Column::Predicate), vec![json!(TYPE)]);
        assert_eq!(
            graph.column(&matches, Column::Object),
            vec![json!({"@id": "http://example.org/Person"})]
        );
    }

    #[test]
    fn test_matches_to_json() {
        let graph = people();
        let matches = graph.select(
            &Selector::new()
                .subject("http://example.org/bob")
                .predicate("http://example.org/name"),
        );
        assert_eq!(
            graph.matches_to_json(&matches),
            vec![json!({
                "subject": "http://example.org/bob",
                "predicate": "http://example.org/name",
                "object": {"@value": "Bob"}
            })]
        );
    }
}
