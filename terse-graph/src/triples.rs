//! Flat triple rendering
//!
//! Every non-keyword property value of every node becomes one
//! (subject, predicate, object) record. Objects are rendered as JSON:
//! node references as `{"@id": ...}`, literals as value objects, lists as
//! `{"@list": [...]}` (one triple for the whole list; no `rdf:first`/
//! `rdf:rest` decomposition), nested arrays as arrays.

use crate::graph::{Graph, NodeId, Value};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use terse_vocab::{blank, keyword};

/// A (subject, predicate, object) record
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: JsonValue,
}

/// Synthetic `_:bN` labels for nodes without an IRI, assigned in
/// first-request order. Labels are only meaningful within one rendering.
#[derive(Debug, Default)]
pub(crate) struct BlankLabels {
    labels: HashMap<NodeId, String>,
}

impl BlankLabels {
    pub(crate) fn get(&self, node: NodeId) -> Option<&str> {
        self.labels.get(&node).map(String::as_str)
    }

    pub(crate) fn get_or_assign(&mut self, node: NodeId) -> &str {
        let next = self.labels.len();
        self.labels.entry(node).or_insert_with(|| blank::label(next))
    }
}

impl Graph {
    /// Render the graph as a flat list of triples, in node creation order.
    pub fn to_triples(&self) -> Vec<Triple> {
        let mut labels = BlankLabels::default();
        let mut triples = Vec::new();

        for (id, node) in self.iter() {
            let subject = self.identifier(id, &mut labels);
            for (predicate, values) in node.properties() {
                if keyword::is_keyword(predicate) {
                    continue;
                }
                for value in values {
                    triples.push(Triple {
                        subject: subject.clone(),
                        predicate: predicate.clone(),
                        object: self.object_json(value, &mut labels),
                    });
                }
            }
        }

        triples
    }

    pub(crate) fn identifier(&self, id: NodeId, labels: &mut BlankLabels) -> String {
        match self.iri(id) {
            Some(iri) => iri.to_string(),
            None => labels.get_or_assign(id).to_string(),
        }
    }

    pub(crate) fn object_json(&self, value: &Value, labels: &mut BlankLabels) -> JsonValue {
        match value {
            Value::Node(id) => id_ref(self.identifier(*id, labels)),
            Value::Literal(id) => self
                .literal(*id)
                .map(|literal| literal.to_json())
                .unwrap_or_default(),
            Value::List(items) => {
                let items: Vec<JsonValue> =
                    items.iter().map(|v| self.object_json(v, labels)).collect();
                list_json(items)
            }
            Value::Array(items) => {
                JsonValue::Array(items.iter().map(|v| self.object_json(v, labels)).collect())
            }
        }
    }
}

/// `{"@id": id}`
pub(crate) fn id_ref(id: String) -> JsonValue {
    let mut obj = Map::new();
    obj.insert(keyword::ID.to_string(), JsonValue::String(id));
    JsonValue::Object(obj)
}

/// `{"@list": [...]}`
pub(crate) fn list_json(items: Vec<JsonValue>) -> JsonValue {
    let mut obj = Map::new();
    obj.insert(keyword::LIST.to_string(), JsonValue::Array(items));
    JsonValue::Object(obj)
}

#[cfg(test)]
mod tests {
    use crate::{Graph, MergeOptions};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_blank_labels_in_encounter_order() {
        let graph = Graph::from_input(
            json!({
                "urn:knows": [{"urn:name": "b"}, {"urn:name": "c"}]
            }),
            &MergeOptions::default(),
        )
        .unwrap();
        let triples = graph.to_triples();
        assert_eq!(triples[0].subject, "_:b0");
        assert_eq!(triples[0].object, json!({"@id": "_:b1"}));
        assert_eq!(triples[1].object, json!({"@id": "_:b2"}));
        assert_eq!(triples[2].subject, "_:b1");
        assert_eq!(triples[3].subject, "_:b2");
    }

    #[test]
    fn test_list_is_one_triple() {
        let graph = Graph::from_input(
            json!({"@id": "urn:a", "urn:items": {"@list": [1, {"@id": "urn:b"}]}}),
            &MergeOptions::default(),
        )
        .unwrap();
        let triples = graph.to_triples();
        assert_eq!(triples.len(), 1);
        assert_eq!(
            triples[0].object,
            json!({"@list": [{"@value": 1}, {"@id": "urn:b"}]})
        );
    }

    #[test]
    fn test_nested_array_object() {
        let graph = Graph::from_input(
            json!({"@id": "urn:a", "urn:p": [[1, 2], 3]}),
            &MergeOptions::default(),
        )
        .unwrap();
        let objects: Vec<_> = graph.to_triples().into_iter().map(|t| t.object).collect();
        assert_eq!(
            objects,
            vec![json!([{"@value": 1}, {"@value": 2}]), json!({"@value": 3})]
        );
    }
}
