mod error;
mod operator;
mod table;

pub use error::QueryError;
pub use operator::Operator;
pub use table::{Row, Table};
