use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use terse_graph::{DEFAULT_MAX_DEPTH, DEFAULT_TREE_DEPTH};

#[derive(Parser, Debug)]
#[command(
    name = "terse",
    about = "Merge, render and query terse linked-data documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge documents and print the graph as a nested JSON tree
    Tree {
        #[command(flatten)]
        input: InputArgs,

        /// Render from this node instead of the graph's root
        #[arg(long)]
        root: Option<String>,

        /// Write node identifiers relative to this base IRI
        #[arg(long, conflicts_with = "relative")]
        base: Option<String>,

        /// Write node identifiers relative to the first document's URI
        #[arg(long)]
        relative: bool,

        /// Write single-element arrays as their bare element
        #[arg(long)]
        no_array: bool,

        /// Write plain literals as bare JSON values
        #[arg(long)]
        raw_literals: bool,

        /// Indent width; 0 prints compact JSON
        #[arg(long, default_value_t = 4)]
        indent: usize,

        /// Deepest level a node is nested at; deeper nodes are written as
        /// references and rendered under @included
        #[arg(long, default_value_t = DEFAULT_TREE_DEPTH)]
        nesting: usize,
    },

    /// Merge documents and print one line per triple
    Triples {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Merge documents and print the triples matching a pattern, as JSON lines
    Select {
        #[command(flatten)]
        input: InputArgs,

        /// Subject IRI
        #[arg(long, short = 's')]
        subject: Option<String>,

        /// Predicate IRI
        #[arg(long, short = 'p')]
        predicate: Option<String>,

        /// Object IRI
        #[arg(long, short = 'o')]
        object: Option<String>,

        /// Literal pattern: a JSON value, or a value object such as
        /// '{"@language": "en"}'
        #[arg(long)]
        literal: Option<String>,

        /// Print only the distinct values of one column
        #[arg(long, value_enum)]
        column: Option<ColumnArg>,
    },

    /// Print the context in effect at the top level of a document
    Context {
        /// Input file (`-` reads stdin)
        file: PathBuf,

        /// Document URI (default: the file's URL)
        #[arg(long)]
        document_uri: Option<String>,

        /// Default vocabulary
        #[arg(long)]
        vocab: Option<String>,
    },
}

/// Inputs shared by the merging commands
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Input files, merged in order (`-` reads stdin)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Document URI for the corresponding input file; repeat once per file.
    /// Files without one use their file URL.
    #[arg(long = "document-uri")]
    pub document_uris: Vec<String>,

    /// Default vocabulary for every input
    #[arg(long)]
    pub vocab: Option<String>,

    /// Maximum nesting depth of an input
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnArg {
    Subject,
    Predicate,
    Object,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tree_flags() {
        let cli = Cli::try_parse_from([
            "terse",
            "tree",
            "a.jsonld",
            "b.jsonld",
            "--document-uri",
            "https://example.org/a",
            "--no-array",
            "--raw-literals",
            "--indent",
            "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Tree {
                input,
                no_array,
                raw_literals,
                indent,
                relative,
                nesting,
                ..
            } => {
                assert_eq!(input.files.len(), 2);
                assert_eq!(input.document_uris, vec!["https://example.org/a"]);
                assert_eq!(input.max_depth, DEFAULT_MAX_DEPTH);
                assert!(no_array && raw_literals && !relative);
                assert_eq!(indent, 2);
                assert_eq!(nesting, DEFAULT_TREE_DEPTH);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_select_patterns() {
        let cli = Cli::try_parse_from([
            "terse",
            "select",
            "-",
            "-s",
            "urn:a",
            "--literal",
            r#"{"@language":"en"}"#,
            "--column",
            "subject",
        ])
        .unwrap();
        match cli.command {
            Commands::Select {
                subject,
                literal,
                column,
                predicate,
                ..
            } => {
                assert_eq!(subject.as_deref(), Some("urn:a"));
                assert_eq!(predicate, None);
                assert_eq!(literal.as_deref(), Some(r#"{"@language":"en"}"#));
                assert_eq!(column, Some(ColumnArg::Subject));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn files_are_required() {
        assert!(Cli::try_parse_from(["terse", "triples"]).is_err());
    }

    #[test]
    fn base_conflicts_with_relative() {
        let parsed = Cli::try_parse_from([
            "terse",
            "tree",
            "a.jsonld",
            "--base",
            "https://example.org/",
            "--relative",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["terse", "-v", "-q", "triples", "a.jsonld"]).is_err());
    }
}
