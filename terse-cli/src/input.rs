use crate::cli::InputArgs;
use crate::error::{CliError, CliResult};
use serde_json::Value as JsonValue;
use std::io::{self, Read};
use std::path::Path;
use terse_graph::{Graph, MergeOptions};
use tracing::info;
use url::Url;

/// A parsed input document and the URI it is merged under.
pub struct Document {
    pub name: String,
    pub uri: Option<String>,
    pub json: JsonValue,
}

/// Read one input: a file, or stdin for `-`.
pub fn read_input(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .map_err(|e| CliError::Input(format!("failed to read {}: {e}", path.display())))
}

/// The document URI of a file: its absolute `file:` URL. Stdin has none.
pub fn file_uri(path: &Path) -> Option<String> {
    if path == Path::new("-") {
        return None;
    }
    let absolute = std::fs::canonicalize(path).ok()?;
    Url::from_file_path(absolute).ok().map(String::from)
}

/// Read and parse one document.
pub fn load_document(path: &Path, uri: Option<String>) -> CliResult<Document> {
    let name = path.display().to_string();
    let text = read_input(path)?;
    let json = serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("{name}: JSON parse error: {e}")))?;
    Ok(Document {
        uri: uri.or_else(|| file_uri(path)),
        name,
        json,
    })
}

/// Read every input, pairing the n-th `--document-uri` with the n-th file.
pub fn load_documents(args: &InputArgs) -> CliResult<Vec<Document>> {
    if args.document_uris.len() > args.files.len() {
        return Err(CliError::Usage(format!(
            "{} --document-uri values given for {} input files",
            args.document_uris.len(),
            args.files.len()
        )));
    }
    args.files
        .iter()
        .enumerate()
        .map(|(i, path)| load_document(path, args.document_uris.get(i).cloned()))
        .collect()
}

/// Merge options for one document
pub fn merge_options(document: &Document, args: &InputArgs) -> MergeOptions {
    let mut options = MergeOptions::new().with_max_depth(args.max_depth);
    if let Some(ref uri) = document.uri {
        options = options.with_document_uri(uri.clone());
    }
    if let Some(ref vocab) = args.vocab {
        options = options.with_vocab(vocab.clone());
    }
    options
}

/// Build a graph from the inputs. The first document sets the root.
pub fn build_graph(documents: Vec<Document>, args: &InputArgs) -> CliResult<Graph> {
    let mut graph: Option<Graph> = None;
    for document in documents {
        let options = merge_options(&document, args);
        info!(
            input = %document.name,
            uri = document.uri.as_deref().unwrap_or("-"),
            "merging document"
        );
        match graph {
            None => graph = Some(Graph::from_input(document.json, &options)?),
            Some(ref mut g) => {
                g.merge(document.json, &options)?;
            }
        }
    }
    Ok(graph.unwrap_or_default())
}
