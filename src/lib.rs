// csvql - SQLite-style query engine for delimited text files

// Clippy configuration - allow non-critical warnings for pet project
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

// Core value types, operators and the error taxonomy
pub mod core;

// Command tokenizer and keyword-cursor parser
pub mod parser;

// Stage list construction with the fixed priority order
pub mod plan;

// Stage execution (filters, projection, join, order, mutations)
pub mod executor;

// File-backed table storage - the sole I/O boundary
pub mod storage;

// Pipe-delimited result rendering
pub mod format;

// Re-export commonly used types for convenience
pub use crate::core::{Operator, QueryError, Row, Table};
pub use crate::executor::{ExecutionContext, QueryExecutor};
pub use crate::format::Formatter;
pub use crate::parser::{Command, CommandParser, InsertPayload};
pub use crate::plan::{ExecutionPlanBuilder, Predicate, SortDirection, Stage};
pub use crate::storage::TableStore;
