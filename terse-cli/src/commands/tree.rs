use crate::cli::InputArgs;
use crate::error::{CliError, CliResult};
use crate::input;
use terse_graph::TreeOptions;

pub struct TreeOpts {
    pub root: Option<String>,
    pub base: Option<String>,
    pub relative: bool,
    pub no_array: bool,
    pub raw_literals: bool,
    pub indent: usize,
    pub nesting: usize,
}

pub fn run(args: &InputArgs, opts: TreeOpts) -> CliResult<()> {
    let documents = input::load_documents(args)?;
    let first_uri = documents.first().and_then(|d| d.uri.clone());
    let graph = input::build_graph(documents, args)?;

    let root = match opts.root {
        Some(ref iri) => Some(
            graph
                .get(iri.as_str())
                .ok_or_else(|| CliError::NotFound(format!("root node '{iri}' not found")))?,
        ),
        None => None,
    };

    let base = if opts.relative {
        Some(first_uri.ok_or_else(|| {
            CliError::Usage("--relative needs a document URI; pass --document-uri".into())
        })?)
    } else {
        opts.base
    };

    let mut options = TreeOptions::new()
        .no_array(opts.no_array)
        .raw_literals(opts.raw_literals)
        .with_max_depth(opts.nesting);
    if let Some(base) = base {
        options = options.with_base(base);
    }

    let indent = (opts.indent > 0).then_some(opts.indent);
    println!("{}", graph.to_json_string(root, &options, indent)?);
    Ok(())
}
