//! Literal values and the literal interner
//!
//! Literals are immutable and interned: two literals with the same value,
//! datatype, language and direction share one [`LiteralId`], so property sets
//! can deduplicate them by identity.

use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use terse_vocab::keyword;

/// Handle to an interned literal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LiteralId(pub(crate) usize);

/// A literal value with optional datatype, language tag and base direction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal {
    /// The value, copied verbatim (any JSON value; `@json` literals may be
    /// objects or arrays)
    pub value: JsonValue,
    /// Expanded datatype IRI
    pub datatype: Option<String>,
    /// Language tag, copied verbatim (normally a string)
    pub language: Option<JsonValue>,
    /// Base direction, copied verbatim (normally a string)
    pub direction: Option<JsonValue>,
}

impl Literal {
    /// A literal with no datatype, language or direction
    pub fn plain(value: impl Into<JsonValue>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
            direction: None,
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

    /// True when the literal has no datatype, language or direction and its
    /// value is a JSON primitive, so it can be written as a bare value.
    pub fn is_plain_primitive(&self) -> bool {
        self.datatype.is_none()
            && self.language.is_none()
            && self.direction.is_none()
            && !matches!(self.value, JsonValue::Array(_) | JsonValue::Object(_))
    }

    /// Render as a value object: `{"@value", "@type", "@language", "@direction"}`.
    pub fn to_json(&self) -> JsonValue {
        let mut obj = Map::new();
        obj.insert(keyword::VALUE.to_string(), self.value.clone());
        if let Some(ref datatype) = self.datatype {
            obj.insert(keyword::TYPE.to_string(), JsonValue::String(datatype.clone()));
        }
        if let Some(ref language) = self.language {
            obj.insert(keyword::LANGUAGE.to_string(), language.clone());
        }
        if let Some(ref direction) = self.direction {
            obj.insert(keyword::DIRECTION.to_string(), direction.clone());
        }
        JsonValue::Object(obj)
    }
}

/// Structural interning key.
///
/// `serde_json::Value` has no `Hash`; this hashes it consistently with its
/// `Eq`: integers and floats by representation, so `1` and `1.0` differ,
/// except that `0.0` and `-0.0` compare equal and hash alike; object keys
/// order-insensitively.
#[derive(PartialEq, Eq)]
struct LiteralKey(Literal);

impl Hash for LiteralKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_json(&self.0.value, state);
        self.0.datatype.hash(state);
        hash_optional(&self.0.language, state);
        hash_optional(&self.0.direction, state);
    }
}

fn hash_optional<H: Hasher>(value: &Option<JsonValue>, state: &mut H) {
    value.is_some().hash(state);
    if let Some(value) = value {
        hash_json(value, state);
    }
}

fn hash_number<H: Hasher>(n: &serde_json::Number, state: &mut H) {
    match n.as_f64() {
        // -0.0 == 0.0, but they print differently
        Some(f) if n.is_f64() && f == 0.0 => "0.0".hash(state),
        _ => n.to_string().hash(state),
    }
}

fn hash_json<H: Hasher>(value: &JsonValue, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        JsonValue::Null => {}
        JsonValue::Bool(b) => b.hash(state),
        JsonValue::Number(n) => hash_number(n, state),
        JsonValue::String(s) => s.hash(state),
        JsonValue::Array(items) => {
            items.len().hash(state);
            for item in items {
                hash_json(item, state);
            }
        }
        JsonValue::Object(map) => {
            map.len().hash(state);
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                key.hash(state);
                hash_json(&map[key.as_str()], state);
            }
        }
    }
}

/// Interning table for literals
#[derive(Debug, Default)]
pub struct LiteralInterner {
    literals: Vec<Literal>,
    index: HashMap<LiteralKey, LiteralId>,
}

impl std::fmt::Debug for LiteralKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl LiteralInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of an equal literal, interning `literal` if it is new.
    pub fn intern(&mut self, literal: Literal) -> LiteralId {
        let key = LiteralKey(literal);
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = LiteralId(self.literals.len());
        self.literals.push(key.0.clone());
        self.index.insert(key, id);
        id
    }

    pub fn get(&self, id: LiteralId) -> Option<&Literal> {
        self.literals.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }
}
