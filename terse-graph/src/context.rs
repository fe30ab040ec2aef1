//! Context resolution: base IRI, prefix table and default vocabulary
//!
//! A `Context` is computed fresh at each nesting level of a document by
//! overlaying the level's local `@context` on its parent's. Contexts are never
//! mutated after construction; the prefix table is shared between a parent and
//! any child level that does not override it.

use crate::iri;
use crate::merge::MergeOptions;
use crate::source::Source;
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::rc::Rc;
use terse_vocab::keyword;
use url::Url;

/// Prefix table: term → expansion, or `None` when the term was disabled by a
/// non-string value.
pub type Prefixes = IndexMap<String, Option<String>>;

/// The (base, prefixes, vocab) triple governing term expansion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    /// Base IRI for resolving relative references
    pub base: Option<Url>,
    /// Default vocabulary for unprefixed predicates
    pub vocab: Option<String>,
    /// Term prefixes
    pub prefixes: Rc<Prefixes>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the outermost context for a merge call.
    ///
    /// The document URI is the starting base. The fallback context is then
    /// overlaid like any local context, and `options.vocab` applies only if
    /// the fallback context does not set `@vocab` itself.
    pub fn root(options: &MergeOptions) -> Self {
        let document = Context {
            base: options.document_uri.as_deref().and_then(|u| iri::resolve(u, None)),
            ..Default::default()
        };
        let mut context = document.overlay(options.fallback_context.as_ref());
        if !sets_vocab(options.fallback_context.as_ref()) {
            context.vocab = options
                .vocab
                .as_deref()
                .map(|v| iri::resolve_str(v, context.base.as_ref()));
        }
        context
    }

    /// Overlay a local `@context` on this context.
    ///
    /// Returns this context unchanged when `local` is absent or not an object.
    /// Otherwise:
    /// - `@base` is resolved against the current base
    /// - `@vocab` is resolved against the new base
    /// - every non-keyword entry becomes a prefix, resolved against the new
    ///   base; non-string entries disable the term
    pub fn overlay(&self, local: Option<&Source>) -> Context {
        let Some(Source::Object(obj)) = local else {
            return self.clone();
        };
        let map = obj.borrow();

        let base = match map.get(keyword::BASE).and_then(Source::as_str) {
            Some(b) if !b.is_empty() => {
                iri::resolve(b, self.base.as_ref()).or_else(|| self.base.clone())
            }
            _ => self.base.clone(),
        };

        let vocab = match map.get(keyword::VOCAB).and_then(Source::as_str) {
            Some(v) => Some(iri::resolve_str(v, base.as_ref())),
            None => self.vocab.clone(),
        };

        let mut prefixes = (*self.prefixes).clone();
        for (term, value) in map.iter() {
            if keyword::is_keyword(term) {
                continue;
            }
            let expansion = value.as_str().map(|s| iri::resolve_str(s, base.as_ref()));
            prefixes.insert(term.clone(), expansion);
        }

        Context {
            base,
            vocab,
            prefixes: Rc::new(prefixes),
        }
    }

    /// Look up a prefix. Disabled terms yield None.
    pub fn prefix(&self, term: &str) -> Option<&str> {
        self.prefixes.get(term).and_then(|p| p.as_deref())
    }

    /// Serialize as a JSON `@context` object: `@base`, `@vocab`, then every
    /// enabled prefix.
    pub fn to_json(&self) -> JsonValue {
        let mut ctx = Map::new();
        if let Some(ref base) = self.base {
            ctx.insert(keyword::BASE.to_string(), JsonValue::String(base.to_string()));
        }
        if let Some(ref vocab) = self.vocab {
            ctx.insert(keyword::VOCAB.to_string(), JsonValue::String(vocab.clone()));
        }
        for (term, expansion) in self.prefixes.iter() {
            if let Some(expansion) = expansion {
                ctx.insert(term.clone(), JsonValue::String(expansion.clone()));
            }
        }
        JsonValue::Object(ctx)
    }
}

fn sets_vocab(local: Option<&Source>) -> bool {
    local
        .and_then(Source::as_object)
        .and_then(|obj| obj.get(keyword::VOCAB))
        .is_some_and(|v| v.as_str().is_some())
}

/// Compute the context in effect at the top level of `document`.
///
/// The result is a JSON context object suitable as another merge's
/// fallback context, so companion data can reuse the document's prefixes.
///
/// # Example
///
/// ```
/// use terse_graph::{effective_root_context, MergeOptions};
/// use serde_json::json;
///
/// let doc = json!({"@context": {"ex": "ns#"}, "@id": "#me"});
/// let options = MergeOptions::new().with_document_uri("http://example.org/doc");
/// let ctx = effective_root_context(doc, &options);
/// assert_eq!(ctx["ex"], "http://example.org/ns#");
/// assert_eq!(ctx["@base"], "http://example.org/doc");
/// ```
pub fn effective_root_context(document: impl Into<Source>, options: &MergeOptions) -> JsonValue {
    let document = document.into();
    let local = document.as_object().and_then(|obj| obj.get(keyword::CONTEXT));
    Context::root(options).overlay(local.as_ref()).to_json()
}
