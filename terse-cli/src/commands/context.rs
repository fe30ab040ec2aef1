use crate::error::CliResult;
use crate::input;
use std::path::Path;
use terse_graph::{effective_root_context, MergeOptions};

pub fn run(file: &Path, document_uri: Option<&str>, vocab: Option<&str>) -> CliResult<()> {
    let document = input::load_document(file, document_uri.map(str::to_string))?;

    let mut options = MergeOptions::new();
    if let Some(uri) = document.uri {
        options = options.with_document_uri(uri);
    }
    if let Some(vocab) = vocab {
        options = options.with_vocab(vocab);
    }

    let context = effective_root_context(document.json, &options);
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}
