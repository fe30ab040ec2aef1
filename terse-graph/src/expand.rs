//! Term expansion against a resolved context

use crate::context::Context;
use crate::iri;
use terse_vocab::{keyword, rdf};

/// Position a term appears in; decides how an unprefixed term expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Property keys and `@type` values: unprefixed terms use `@vocab`
    Predicate,
    /// `@id` values and datatypes: unprefixed terms resolve against `@base`
    Reference,
}

/// Expand a compact term or relative reference to a full IRI.
///
/// 1. `@json` expands to `rdf:JSON`.
/// 2. A term with a colon is `prefix:suffix`; a known prefix is replaced by
///    its expansion, anything else is returned unchanged (already absolute or
///    deliberately opaque). `scheme://` terms are never prefix-expanded.
/// 3. A term without a colon uses an exact prefix-table match if present,
///    else the vocabulary (predicate position) or the base (reference
///    position).
///
/// Returns None when a predicate-position term has no prefix match and no
/// vocabulary is set; such properties are dropped.
pub fn expand(term: &str, position: Position, context: &Context) -> Option<String> {
    if term == keyword::JSON {
        return Some(rdf::JSON.to_string());
    }

    if let Some((prefix, suffix)) = iri::split_prefix(term) {
        if !iri::is_authority_suffix(suffix) {
            if let Some(expansion) = context.prefix(prefix) {
                return Some(format!("{expansion}{suffix}"));
            }
        }
        return Some(term.to_string());
    }

    if let Some(expansion) = context.prefix(term) {
        return Some(expansion.to_string());
    }

    match position {
        Position::Predicate => context
            .vocab
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|vocab| format!("{vocab}{term}")),
        Position::Reference => Some(iri::resolve_str(term, context.base.as_ref())),
    }
}

/// Expand a type name: predicate position first, falling back to reference
/// position so a bare type name is never dropped.
pub fn expand_type(term: &str, context: &Context) -> String {
    expand(term, Position::Predicate, context)
        .or_else(|| expand(term, Position::Reference, context))
        .unwrap_or_else(|| term.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use serde_json::json;
    use url::Url;

    fn context(local: serde_json::Value) -> Context {
        let parent = Context {
            base: Url::parse("https://example.org/docs/doc.jsonld").ok(),
            ..Default::default()
        };
        parent.overlay(Some(&Source::from(local)))
    }

    #[test]
    fn test_expand_prefixed() {
        let ctx = context(json!({"ex": "http://example.org/ns#"}));
        assert_eq!(
            expand("ex:name", Position::Predicate, &ctx).as_deref(),
            Some("http://example.org/ns#name")
        );
        assert_eq!(
            expand("ex:name", Position::Reference, &ctx).as_deref(),
            Some("http://example.org/ns#name")
        );
        // unknown prefix passes through
        assert_eq!(
            expand("urn:private:pred", Position::Predicate, &ctx).as_deref(),
            Some("urn:private:pred")
        );
        assert_eq!(
            expand("three:", Position::Predicate, &ctx).as_deref(),
            Some("three:")
        );
    }

    #[test]
    fn test_expand_absolute_iri_not_prefixed() {
        let ctx = context(json!({"http": "urn:wrong:"}));
        assert_eq!(
            expand("http://example.org/a", Position::Reference, &ctx).as_deref(),
            Some("http://example.org/a")
        );
        assert_eq!(
            expand("http:relative", Position::Reference, &ctx).as_deref(),
            Some("urn:wrong:relative")
        );
    }

    #[test]
    fn test_expand_json_keyword() {
        let ctx = Context::new();
        assert_eq!(expand("@json", Position::Reference, &ctx).as_deref(), Some(rdf::JSON));
    }

    #[test]
    fn test_expand_exact_term() {
        let ctx = context(json!({"name": "http://xmlns.com/foaf/0.1/name"}));
        assert_eq!(
            expand("name", Position::Predicate, &ctx).as_deref(),
            Some("http://xmlns.com/foaf/0.1/name")
        );
        assert_eq!(
            expand("name", Position::Reference, &ctx).as_deref(),
            Some("http://xmlns.com/foaf/0.1/name")
        );
    }

    #[test]
    fn test_expand_unprefixed_predicate() {
        let ctx = context(json!({}));
        assert_eq!(expand("name", Position::Predicate, &ctx), None);

        let ctx = context(json!({"@vocab": "http://schema.org/"}));
        assert_eq!(
            expand("name", Position::Predicate, &ctx).as_deref(),
            Some("http://schema.org/name")
        );
    }

    #[test]
    fn test_disabled_term_falls_back_to_vocab() {
        let ctx = context(json!({"@vocab": "http://schema.org/", "name": false}));
        assert_eq!(
            expand("name", Position::Predicate, &ctx).as_deref(),
            Some("http://schema.org/name")
        );
    }

    #[test]
    fn test_expand_reference() {
        let ctx = context(json!({"@vocab": "http://schema.org/"}));
        assert_eq!(
            expand("#me", Position::Reference, &ctx).as_deref(),
            Some("https://example.org/docs/doc.jsonld#me")
        );
        assert_eq!(
            expand("../", Position::Reference, &ctx).as_deref(),
            Some("https://example.org/")
        );
        assert_eq!(
            expand("#me", Position::Reference, &Context::new()).as_deref(),
            Some("#me")
        );
    }

    #[test]
    fn test_expand_type_falls_back_to_base() {
        let ctx = context(json!({}));
        assert_eq!(expand_type("Thing", &ctx), "https://example.org/docs/Thing");
        let ctx = context(json!({"@vocab": "http://schema.org/"}));
        assert_eq!(expand_type("Thing", &ctx), "http://schema.org/Thing");
    }
}
