//! Vocabulary constants for the terse linked-data dialect
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `keyword` - the `@`-prefixed keys recognized in source documents
//! - `blank` - blank node label conventions

/// RDF vocabulary constants
pub mod rdf {
    /// RDF namespace IRI
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:JSON IRI (datatype of `@json` literals)
    pub const JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";
}

/// Keys with special meaning in a source document.
///
/// Any other key starting with [`keyword::MARKER`] is silently ignored by the
/// merger.
pub mod keyword {
    /// Prefix shared by every keyword
    pub const MARKER: char = '@';

    pub const CONTEXT: &str = "@context";
    pub const BASE: &str = "@base";
    pub const VOCAB: &str = "@vocab";
    pub const ID: &str = "@id";
    pub const TYPE: &str = "@type";
    pub const VALUE: &str = "@value";
    pub const LANGUAGE: &str = "@language";
    pub const DIRECTION: &str = "@direction";
    pub const LIST: &str = "@list";
    pub const INCLUDED: &str = "@included";

    /// Reserved datatype term; expands to [`crate::rdf::JSON`]
    pub const JSON: &str = "@json";

    /// Returns true if `key` is a keyword (starts with `@`).
    pub fn is_keyword(key: &str) -> bool {
        key.starts_with(MARKER)
    }
}

/// Blank node label conventions
pub mod blank {
    /// Prefix marking a blank node label (`_:b0`)
    pub const PREFIX: &str = "_:";

    /// Returns true if `id` is a blank node label.
    pub fn is_blank(id: &str) -> bool {
        id.starts_with(PREFIX)
    }

    /// Synthetic label for the `n`-th unnamed blank node of a serialization.
    pub fn label(n: usize) -> String {
        format!("{PREFIX}b{n}")
    }
}
