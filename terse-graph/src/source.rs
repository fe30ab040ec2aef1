//! Source documents with object identity
//!
//! A JSON tree cannot express "the same object appears twice" or "an object
//! contains itself", but terse documents built in memory can. `Source` is the
//! merge input: a JSON-shaped tree whose objects are shared handles, so the
//! merger can recognize an object it has already seen in the current call.
//!
//! Converting from `serde_json::Value` gives every JSON object its own
//! identity.
//!
//! # Example
//!
//! ```
//! use terse_graph::{Source, SourceObject};
//!
//! let me = SourceObject::new();
//! me.insert("@id", "http://example.org/me");
//! me.insert("http://example.org/knows", me.clone());
//!
//! let source = Source::from(me);
//! assert!(source.as_object().is_some());
//! ```

use indexmap::IndexMap;
use serde_json::{Map, Number, Value as JsonValue};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// A node of a source document
#[derive(Clone, Debug, Default)]
pub enum Source {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Source>),
    Object(SourceObject),
}

impl Source {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Source::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&SourceObject> {
        match self {
            Source::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Copy this tree into a plain JSON value.
    ///
    /// An object reached again while it is still being copied (a cycle) is
    /// copied as `null`.
    pub fn to_json(&self) -> JsonValue {
        let mut path = Vec::new();
        self.to_json_inner(&mut path)
    }

    fn to_json_inner(&self, path: &mut Vec<usize>) -> JsonValue {
        match self {
            Source::Null => JsonValue::Null,
            Source::Bool(b) => JsonValue::Bool(*b),
            Source::Number(n) => JsonValue::Number(n.clone()),
            Source::String(s) => JsonValue::String(s.clone()),
            Source::Array(items) => {
                JsonValue::Array(items.iter().map(|v| v.to_json_inner(path)).collect())
            }
            Source::Object(obj) => {
                if path.contains(&obj.handle()) {
                    return JsonValue::Null;
                }
                path.push(obj.handle());
                let map: Map<String, JsonValue> = obj
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_inner(path)))
                    .collect();
                path.pop();
                JsonValue::Object(map)
            }
        }
    }
}

/// A shared, mutable object node.
///
/// Clones share the same underlying map; two clones are the same object for
/// the purposes of merging.
#[derive(Clone, Default)]
pub struct SourceObject(Rc<RefCell<IndexMap<String, Source>>>);

impl SourceObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the previous value for `key`.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Source>) -> Option<Source> {
        self.0.borrow_mut().insert(key.into(), value.into())
    }

    /// Get a copy of the field value (objects inside are shared, not copied)
    pub fn get(&self, key: &str) -> Option<Source> {
        self.0.borrow().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns true if both handles refer to the same object.
    pub fn ptr_eq(&self, other: &SourceObject) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity of this object for as long as any handle is alive
    pub(crate) fn handle(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub(crate) fn borrow(&self) -> Ref<'_, IndexMap<String, Source>> {
        self.0.borrow()
    }
}

// Fields are not printed: an object may contain itself.
impl fmt::Debug for SourceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = self.0.borrow();
        f.debug_struct("SourceObject")
            .field("handle", &format_args!("{:#x}", self.handle()))
            .field("keys", &map.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl From<JsonValue> for Source {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Source::Null,
            JsonValue::Bool(b) => Source::Bool(b),
            JsonValue::Number(n) => Source::Number(n),
            JsonValue::String(s) => Source::String(s),
            JsonValue::Array(items) => Source::Array(items.into_iter().map(Source::from).collect()),
            JsonValue::Object(map) => {
                let obj = SourceObject::new();
                for (k, v) in map {
                    obj.insert(k, Source::from(v));
                }
                Source::Object(obj)
            }
        }
    }
}

impl From<&JsonValue> for Source {
    fn from(value: &JsonValue) -> Self {
        Source::from(value.clone())
    }
}

impl From<&Source> for Source {
    fn from(value: &Source) -> Self {
        value.clone()
    }
}

impl From<SourceObject> for Source {
    fn from(obj: SourceObject) -> Self {
        Source::Object(obj)
    }
}

impl From<Vec<Source>> for Source {
    fn from(items: Vec<Source>) -> Self {
        Source::Array(items)
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::String(s.to_string())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Source::String(s)
    }
}

impl From<bool> for Source {
    fn from(b: bool) -> Self {
        Source::Bool(b)
    }
}

impl From<i64> for Source {
    fn from(n: i64) -> Self {
        Source::Number(n.into())
    }
}
