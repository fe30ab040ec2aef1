use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerseError {
    /// A merge descended past the configured maximum depth.
    ///
    /// The merge call is aborted; nodes it already committed stay in the graph.
    #[error("Nested too deep: input exceeds the maximum merge depth of {max_depth}")]
    NestingTooDeep { max_depth: usize },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TerseError>;
