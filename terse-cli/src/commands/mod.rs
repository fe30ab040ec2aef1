pub mod context;
pub mod select;
pub mod tree;
pub mod triples;
