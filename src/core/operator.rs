use super::error::QueryError;

/// Comparison operators usable in WHERE/AND/OR clauses.
///
/// `>` and `<` compare both operands as integers; a value that does not
/// parse as an integer counts as 0, so `'abc' > '5'` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
}

impl Operator {
    pub fn parse(token: &str) -> Result<Self, QueryError> {
        match token {
            "=" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            ">" => Ok(Self::Gt),
            "<" => Ok(Self::Lt),
            other => Err(QueryError::InvalidOperator(other.to_string())),
        }
    }

    /// Apply the operator to a row field and a literal. A field is `None`
    /// when the column does not exist in the row's header.
    #[must_use]
    pub fn matches(self, field: Option<&str>, literal: &str) -> bool {
        match self {
            Self::Eq => field == Some(literal),
            Self::Ne => field != Some(literal),
            Self::Gt => to_int(field) > to_int(Some(literal)),
            Self::Lt => to_int(field) < to_int(Some(literal)),
        }
    }

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }
}

fn to_int(value: Option<&str>) -> i64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}
