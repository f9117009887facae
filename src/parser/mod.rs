mod command;
mod lexer;

pub use command::{ClauseArgs, Command, CommandParser, InsertPayload, Keyword};
pub use lexer::{SPACE_PLACEHOLDER, tokenize};
