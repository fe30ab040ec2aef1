//! Terse CLI library.
//!
//! The command handlers behind the `terse` binary: read JSON documents from
//! files or stdin, merge them into one graph, and print it as a tree, as
//! triples, as pattern matches, or print a document's effective context.

pub mod cli;
pub mod commands;
pub mod error;
pub mod input;

use cli::{Cli, Commands};

/// Dispatch a parsed [`Cli`] to the appropriate command handler.
pub fn run(cli: Cli) -> error::CliResult<()> {
    match cli.command {
        Commands::Tree {
            input,
            root,
            base,
            relative,
            no_array,
            raw_literals,
            indent,
            nesting,
        } => commands::tree::run(
            &input,
            commands::tree::TreeOpts {
                root,
                base,
                relative,
                no_array,
                raw_literals,
                indent,
                nesting,
            },
        ),

        Commands::Triples { input } => commands::triples::run(&input),

        Commands::Select {
            input,
            subject,
            predicate,
            object,
            literal,
            column,
        } => commands::select::run(
            &input,
            commands::select::SelectOpts {
                subject,
                predicate,
                object,
                literal,
                column,
            },
        ),

        Commands::Context {
            file,
            document_uri,
            vocab,
        } => commands::context::run(&file, document_uri.as_deref(), vocab.as_deref()),
    }
}
