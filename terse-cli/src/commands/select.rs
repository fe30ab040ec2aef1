use crate::cli::{ColumnArg, InputArgs};
use crate::error::{CliError, CliResult};
use crate::input;
use terse_graph::{Column, LiteralPattern, Selector};

pub struct SelectOpts {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
    pub literal: Option<String>,
    pub column: Option<ColumnArg>,
}

pub fn run(args: &InputArgs, opts: SelectOpts) -> CliResult<()> {
    let documents = input::load_documents(args)?;
    let graph = input::build_graph(documents, args)?;

    let mut selector = Selector::new();
    if let Some(ref subject) = opts.subject {
        selector = selector.subject(subject);
    }
    if let Some(ref predicate) = opts.predicate {
        selector = selector.predicate(predicate);
    }
    if let Some(ref object) = opts.object {
        selector = selector.object(object);
    }
    if let Some(ref literal) = opts.literal {
        let pattern: serde_json::Value = serde_json::from_str(literal)
            .map_err(|e| CliError::Usage(format!("--literal is not valid JSON: {e}")))?;
        selector = selector.literal(LiteralPattern::from_json(&pattern));
    }

    let matches = graph.select(&selector);
    let rows = match opts.column {
        Some(column) => graph.column(&matches, column.into()),
        None => graph.matches_to_json(&matches),
    };
    for row in rows {
        println!("{}", serde_json::to_string(&row)?);
    }
    Ok(())
}

impl From<ColumnArg> for Column {
    fn from(column: ColumnArg) -> Self {
        match column {
            ColumnArg::Subject => Column::Subject,
            ColumnArg::Predicate => Column::Predicate,
            ColumnArg::Object => Column::Object,
        }
    }
}
