use crate::core::{Operator, QueryError};
use crate::parser::{ClauseArgs, Command, InsertPayload, Keyword};

/// One WHERE/AND/OR comparison: column, operator, literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Only a case-insensitive `desc` sorts descending; anything else
    /// (including a missing argument) sorts ascending.
    fn parse(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// One unit of the execution pipeline, with typed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    From(String),
    Update(String),
    Where(Predicate),
    And(Predicate),
    Or(Predicate),
    Selected(Vec<String>),
    Insert { file: String, payload: InsertPayload },
    Deletes,
    Set(Vec<(String, String)>),
    Join(String),
    On { left: String, right: String },
    Order { column: String, direction: SortDirection },
}

impl Stage {
    /// Fixed execution priority: a table must load before filters run,
    /// filters before projection, projection before join, join before its
    /// ON fill, ordering always last.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            Self::From(_) => 1,
            Self::Update(_) => 2,
            Self::Where(_) => 3,
            Self::And(_) => 4,
            Self::Or(_) => 5,
            Self::Selected(_) => 6,
            Self::Insert { .. } => 7,
            Self::Deletes => 8,
            Self::Set(_) => 9,
            Self::Join(_) => 10,
            Self::On { .. } => 11,
            Self::Order { .. } => 12,
        }
    }
}

pub struct ExecutionPlanBuilder;

impl ExecutionPlanBuilder {
    /// Convert the keyword mapping into the ordered stage list. Each
    /// AND/OR triple becomes its own stage; the stable sort keeps triples
    /// of equal priority in parse order.
    pub fn build(command: Command) -> Result<Vec<Stage>, QueryError> {
        let mut stages = Vec::new();
        for (keyword, args) in command.entries {
            push_stages(&mut stages, keyword, args)?;
        }
        stages.sort_by_key(Stage::priority);

        if stages.iter().any(|s| matches!(s, Stage::Deletes))
            && !stages.iter().any(|s| matches!(s, Stage::Where(_)))
        {
            return Err(QueryError::Syntax("DELETE requires a WHERE clause".to_string()));
        }
        Ok(stages)
    }
}

fn push_stages(
    stages: &mut Vec<Stage>,
    keyword: Keyword,
    args: ClauseArgs,
) -> Result<(), QueryError> {
    match (keyword, args) {
        (Keyword::From, ClauseArgs::Flat(args)) => {
            stages.push(Stage::From(single(args, "FROM")?));
        }
        (Keyword::Update, ClauseArgs::Flat(args)) => {
            stages.push(Stage::Update(single(args, "UPDATE")?));
        }
        (Keyword::Where, ClauseArgs::Flat(args)) => {
            stages.push(Stage::Where(predicate(&args)?));
        }
        (Keyword::And, ClauseArgs::Triples(triples)) => {
            for triple in triples {
                stages.push(Stage::And(predicate(&triple)?));
            }
        }
        (Keyword::Or, ClauseArgs::Triples(triples)) => {
            for triple in triples {
                stages.push(Stage::Or(predicate(&triple)?));
            }
        }
        (Keyword::Selected, ClauseArgs::Flat(args)) => {
            if args.is_empty() {
                return Err(QueryError::Syntax("SELECT requires column names or *".to_string()));
            }
            stages.push(Stage::Selected(args));
        }
        (Keyword::Insert, ClauseArgs::Insert { file, payload }) => {
            stages.push(Stage::Insert { file, payload });
        }
        (Keyword::Deletes, _) => stages.push(Stage::Deletes),
        (Keyword::Set, ClauseArgs::Assignments(assignments)) => {
            stages.push(Stage::Set(assignments));
        }
        (Keyword::Join, ClauseArgs::Flat(args)) => {
            stages.push(Stage::Join(single(args, "JOIN")?));
        }
        (Keyword::On, ClauseArgs::Flat(args)) => {
            let [left, op, right] = take_triple(&args, "ON")?;
            if Operator::parse(&op)? != Operator::Eq {
                return Err(QueryError::Syntax(format!(
                    "JOIN ... ON supports only the = operator, got '{op}'"
                )));
            }
            stages.push(Stage::On { left, right });
        }
        (Keyword::Order, ClauseArgs::Flat(mut args)) => {
            if args.is_empty() || args.len() > 2 {
                return Err(QueryError::Syntax(
                    "ORDER expects a column and an optional direction".to_string(),
                ));
            }
            let direction = SortDirection::parse(args.get(1).map(String::as_str));
            stages.push(Stage::Order { column: args.remove(0), direction });
        }
        (keyword, _) => {
            return Err(QueryError::Syntax(format!("misplaced clause: {keyword:?}")));
        }
    }
    Ok(())
}

fn single(mut args: Vec<String>, clause: &str) -> Result<String, QueryError> {
    if args.len() == 1 {
        Ok(args.remove(0))
    } else {
        Err(QueryError::Syntax(format!("{clause} expects exactly one argument")))
    }
}

fn predicate(args: &[String]) -> Result<Predicate, QueryError> {
    let [column, op, value] = take_triple(args, "WHERE/AND/OR")?;
    Ok(Predicate { column, operator: Operator::parse(&op)?, value })
}

fn take_triple(args: &[String], clause: &str) -> Result<[String; 3], QueryError> {
    match args {
        [a, b, c] => Ok([a.clone(), b.clone(), c.clone()]),
        _ => Err(QueryError::Syntax(format!("{clause} expects column, operator, value"))),
    }
}
