use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Error: Cannot find csv file: {0}")]
    FileNotFound(String),
    #[error("Invalid operator: '{0}'")]
    InvalidOperator(String),
    #[error("Invalid command syntax: {0}")]
    Syntax(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV format error: {0}")]
    Csv(#[from] csv::Error),
}

impl QueryError {
    /// True for failures the shell answers with usage help.
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }
}
