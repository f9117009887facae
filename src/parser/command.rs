use super::lexer::SPACE_PLACEHOLDER;
use crate::core::QueryError;

/// Clause keywords. The first token of a command is the verb, which maps
/// to a default bucket; every later keyword token switches the bucket that
/// collects the following argument tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Selected,
    Into,
    Update,
    Deletes,
    From,
    Set,
    Where,
    And,
    Or,
    Values,
    Order,
    Join,
    On,
    /// Synthesized by the INSERT post-pass from INTO + VALUES; never an
    /// input token.
    Insert,
}

impl Keyword {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "SELECTED" => Some(Self::Selected),
            "INTO" => Some(Self::Into),
            "UPDATE" => Some(Self::Update),
            "DELETES" => Some(Self::Deletes),
            "FROM" => Some(Self::From),
            "SET" => Some(Self::Set),
            "WHERE" => Some(Self::Where),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "VALUES" => Some(Self::Values),
            "ORDER" => Some(Self::Order),
            "JOIN" => Some(Self::Join),
            "ON" => Some(Self::On),
            _ => None,
        }
    }

    /// Default bucket for each command verb. Verbs are case sensitive.
    fn for_verb(verb: &str) -> Option<Self> {
        match verb {
            "SELECT" => Some(Self::Selected),
            "INSERT" => Some(Self::Into),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Deletes),
            _ => None,
        }
    }
}

/// Payload of an INSERT: either raw VALUES written left to right, or an
/// explicit column list paired with its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertPayload {
    Positional(Vec<String>),
    Columns(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseArgs {
    /// Argument list as collected, e.g. FROM: [file].
    Flat(Vec<String>),
    /// WHERE-shaped (column, operator, value) groups for AND/OR. A short
    /// trailing group is kept and rejected later by the plan builder.
    Triples(Vec<Vec<String>>),
    Insert { file: String, payload: InsertPayload },
    /// SET column/value pairs, in parse order.
    Assignments(Vec<(String, String)>),
}

/// The parsed keyword -> argument mapping for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub entries: Vec<(Keyword, ClauseArgs)>,
}

pub struct CommandParser;

impl CommandParser {
    /// Parse a tokenized command (verb first) into the keyword mapping.
    ///
    /// Non-keyword tokens are cleaned: list punctuation and quotes are
    /// stripped and placeholder spaces restored. Most malformed shapes are
    /// deliberately left for the plan builder to reject; only structures
    /// the parser itself builds (INSERT pairing, SET pairing) fail here.
    pub fn parse(tokens: &[String]) -> Result<Command, QueryError> {
        let (verb, args) = tokens
            .split_first()
            .ok_or_else(|| QueryError::Syntax("empty command".to_string()))?;
        let default = Keyword::for_verb(verb)
            .ok_or_else(|| QueryError::Syntax(format!("unknown command: {verb}")))?;

        let mut buckets: Vec<(Keyword, Vec<String>)> = Vec::new();
        if default == Keyword::Deletes {
            // DELETE always carries its stage, even with no direct args.
            buckets.push((Keyword::Deletes, Vec::new()));
        }
        let mut current = default;
        for token in args {
            if let Some(keyword) = Keyword::from_token(token) {
                current = keyword;
            } else {
                bucket_mut(&mut buckets, current).push(clean(token));
            }
        }

        let mut entries: Vec<(Keyword, ClauseArgs)> = Vec::new();
        let mut insert_target: Option<Vec<String>> = None;
        let mut insert_values: Vec<String> = Vec::new();
        for (keyword, args) in buckets {
            match keyword {
                Keyword::And | Keyword::Or => entries.push((
                    keyword,
                    ClauseArgs::Triples(args.chunks(3).map(<[String]>::to_vec).collect()),
                )),
                Keyword::Set => {
                    entries.push((keyword, ClauseArgs::Assignments(pair_assignments(&args)?)));
                }
                Keyword::Into => insert_target = Some(args),
                Keyword::Values => insert_values = args,
                _ => entries.push((keyword, ClauseArgs::Flat(args))),
            }
        }

        match insert_target {
            Some(into) => entries.push((Keyword::Insert, pair_insert(into, insert_values)?)),
            None if !insert_values.is_empty() => {
                return Err(QueryError::Syntax("VALUES without INSERT INTO".to_string()));
            }
            None => {}
        }

        Ok(Command { entries })
    }
}

/// Zip the INTO argument list with VALUES. The first INTO argument is the
/// target file; with no further INTO arguments the insert is positional.
fn pair_insert(mut into: Vec<String>, values: Vec<String>) -> Result<ClauseArgs, QueryError> {
    if into.is_empty() {
        return Err(QueryError::Syntax("INSERT requires a target file".to_string()));
    }
    let file = into.remove(0);
    if values.is_empty() {
        return Err(QueryError::Syntax("INSERT requires VALUES".to_string()));
    }
    let payload = if into.is_empty() {
        InsertPayload::Positional(values)
    } else {
        InsertPayload::Columns(into.into_iter().zip(values).collect())
    };
    Ok(ClauseArgs::Insert { file, payload })
}

/// Reduce SET's flat (column, `=`, value) token groups to pairs. The
/// middle token is discarded.
fn pair_assignments(args: &[String]) -> Result<Vec<(String, String)>, QueryError> {
    if args.is_empty() || args.len() % 3 != 0 {
        return Err(QueryError::Syntax("SET expects column = value groups".to_string()));
    }
    Ok(args
        .chunks(3)
        .map(|group| (group[0].clone(), group[2].clone()))
        .collect())
}

fn bucket_mut(buckets: &mut Vec<(Keyword, Vec<String>)>, keyword: Keyword) -> &mut Vec<String> {
    let pos = match buckets.iter().position(|(k, _)| *k == keyword) {
        Some(pos) => pos,
        None => {
            buckets.push((keyword, Vec::new()));
            buckets.len() - 1
        }
    };
    &mut buckets[pos].1
}

fn clean(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '\'' | '"'))
        .map(|c| if c == SPACE_PLACEHOLDER { ' ' } else { c })
        .collect()
}
