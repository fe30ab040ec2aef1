//! IRI helpers: prefix splitting, reference resolution and relativization
//!
//! Resolution and origin comparison are delegated to the `url` crate.

use url::{Origin, Url};

/// Split a term at its first colon into (prefix, suffix).
///
/// Returns None if the term has no colon.
pub fn split_prefix(term: &str) -> Option<(&str, &str)> {
    term.split_once(':')
}

/// Returns true if the suffix of a split term marks an absolute IRI
/// (`http://...`), which is never prefix-expanded.
pub fn is_authority_suffix(suffix: &str) -> bool {
    suffix.starts_with("//")
}

/// Resolve `reference` against an optional base.
///
/// Returns None if the result is not an absolute URL (relative reference with
/// no usable base).
pub fn resolve(reference: &str, base: Option<&Url>) -> Option<Url> {
    match base {
        Some(base) => base.join(reference).ok(),
        None => Url::parse(reference).ok(),
    }
}

/// Resolve `reference` against an optional base, keeping it verbatim when it
/// cannot be made absolute.
pub fn resolve_str(reference: &str, base: Option<&Url>) -> String {
    resolve(reference, base)
        .map(String::from)
        .unwrap_or_else(|| reference.to_string())
}

/// A base IRI that identifiers are made relative to.
///
/// Precomputes the three reference points used for relativization: the
/// document (without fragment), its directory, and its origin root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeBase {
    document: Url,
    directory: Url,
    root: Url,
}

impl RelativeBase {
    /// Parse a base IRI. Returns None if it is not an absolute URL.
    pub fn parse(base: &str) -> Option<Self> {
        let mut document = Url::parse(base).ok()?;
        document.set_fragment(None);
        let directory = document.join(".").ok()?;
        let root = document.join("/").ok()?;
        Some(Self {
            document,
            directory,
            root,
        })
    }

    /// Make `iri` relative to this base.
    ///
    /// - same document: fragment only (`#me`, or empty)
    /// - same directory or below: relative path (`sub/doc#x`, `.` for the directory)
    /// - same origin: root-relative path (`/other/doc`)
    /// - anything else: `iri` unchanged
    pub fn relativize(&self, iri: &str) -> String {
        let Ok(url) = Url::parse(iri) else {
            return iri.to_string();
        };
        if !same_origin(&url, &self.document) {
            return iri.to_string();
        }

        let mut without_fragment = url.clone();
        without_fragment.set_fragment(None);
        if without_fragment == self.document {
            return url.fragment().map(|f| format!("#{f}")).unwrap_or_default();
        }

        let href = url.as_str();
        if let Ok(directory) = url.join(".") {
            if directory.as_str().starts_with(self.directory.as_str()) {
                let rest = href.get(self.directory.as_str().len()..).unwrap_or_default();
                return if rest.is_empty() {
                    ".".to_string()
                } else {
                    rest.to_string()
                };
            }
        }

        let root_len = self.root.as_str().len().saturating_sub(1);
        match href.get(root_len..) {
            Some(path) if href.starts_with(self.root.as_str()) => path.to_string(),
            _ => iri.to_string(),
        }
    }
}

/// Make `iri` relative to `base`, or return it unchanged when there is no base.
pub fn relativize(iri: &str, base: Option<&RelativeBase>) -> String {
    match base {
        Some(base) => base.relativize(iri),
        None => iri.to_string(),
    }
}

/// Opaque origins (`urn:`, `data:`, ...) never compare equal.
fn same_origin(a: &Url, b: &Url) -> bool {
    match (a.origin(), b.origin()) {
        (a @ Origin::Tuple(..), b @ Origin::Tuple(..)) => a == b,
        _ => false,
    }
}
