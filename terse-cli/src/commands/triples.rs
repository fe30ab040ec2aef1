use crate::cli::InputArgs;
use crate::error::CliResult;
use crate::input;

pub fn run(args: &InputArgs) -> CliResult<()> {
    let documents = input::load_documents(args)?;
    let graph = input::build_graph(documents, args)?;

    for triple in graph.to_triples() {
        println!(
            "{}  {}  {}",
            triple.subject,
            triple.predicate,
            serde_json::to_string(&triple.object)?
        );
    }
    Ok(())
}
