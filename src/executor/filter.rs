use super::{ExecutionContext, require_table};
use crate::core::{QueryError, Table};
use crate::plan::Predicate;

/// WHERE/AND/OR stage logic over the filtered subset.
pub struct FilterExecutor;

impl FilterExecutor {
    /// Establish the subset: every row of the full table satisfying the
    /// predicate, in table order.
    pub fn apply_where(ctx: &mut ExecutionContext, predicate: &Predicate) -> Result<(), QueryError> {
        let table = require_table(&ctx.source, "FROM")?;
        ctx.filtered = Some(Self::matching_rows(table, predicate));
        Ok(())
    }

    /// Keep only subset rows that also satisfy this predicate.
    pub fn apply_and(ctx: &mut ExecutionContext, predicate: &Predicate) -> Result<(), QueryError> {
        let table = require_table(&ctx.source, "FROM")?;
        let subset = ctx
            .filtered
            .as_mut()
            .ok_or_else(|| QueryError::Syntax("AND without a preceding WHERE".to_string()))?;
        subset.retain(|&idx| Self::row_matches(table, idx, predicate));
        Ok(())
    }

    /// Append every matching row of the full table to the subset. A row
    /// already selected by WHERE/AND is appended again, not de-duplicated.
    pub fn apply_or(ctx: &mut ExecutionContext, predicate: &Predicate) -> Result<(), QueryError> {
        let table = require_table(&ctx.source, "FROM")?;
        let additions = Self::matching_rows(table, predicate);
        let subset = ctx
            .filtered
            .as_mut()
            .ok_or_else(|| QueryError::Syntax("OR without a preceding WHERE".to_string()))?;
        subset.extend(additions);
        Ok(())
    }

    fn matching_rows(table: &Table, predicate: &Predicate) -> Vec<usize> {
        (0..table.rows.len())
            .filter(|&idx| Self::row_matches(table, idx, predicate))
            .collect()
    }

    fn row_matches(table: &Table, idx: usize, predicate: &Predicate) -> bool {
        let field = table.value(&table.rows[idx], &predicate.column);
        predicate.operator.matches(field, &predicate.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Operator, Row};

    fn ctx_with_table() -> ExecutionContext {
        let table = Table::new(
            vec!["name".to_string(), "age".to_string()],
            vec![
                Row::new(vec!["Alice".to_string(), "30".to_string()]),
                Row::new(vec!["Bob".to_string(), "25".to_string()]),
                Row::new(vec!["Carol".to_string(), "35".to_string()]),
                Row::new(vec!["Dan".to_string(), "30".to_string()]),
            ],
        );
        ExecutionContext { source: Some(table), ..ExecutionContext::default() }
    }

    fn pred(column: &str, operator: Operator, value: &str) -> Predicate {
        Predicate { column: column.to_string(), operator, value: value.to_string() }
    }

    #[test]
    fn test_where_selects_in_table_order() {
        let mut ctx = ctx_with_table();
        FilterExecutor::apply_where(&mut ctx, &pred("age", Operator::Eq, "30")).unwrap();
        assert_eq!(ctx.filtered, Some(vec![0, 3]));
    }

    #[test]
    fn test_and_intersects_the_subset() {
        let mut ctx = ctx_with_table();
        FilterExecutor::apply_where(&mut ctx, &pred("age", Operator::Gt, "26")).unwrap();
        assert_eq!(ctx.filtered, Some(vec![0, 2, 3]));
        FilterExecutor::apply_and(&mut ctx, &pred("age", Operator::Lt, "34")).unwrap();
        assert_eq!(ctx.filtered, Some(vec![0, 3]));
    }

    #[test]
    fn test_or_appends_from_full_table() {
        let mut ctx = ctx_with_table();
        FilterExecutor::apply_where(&mut ctx, &pred("name", Operator::Eq, "Bob")).unwrap();
        FilterExecutor::apply_or(&mut ctx, &pred("age", Operator::Eq, "35")).unwrap();
        assert_eq!(ctx.filtered, Some(vec![1, 2]));
    }

    #[test]
    fn test_or_keeps_duplicates() {
        // Bob matches both WHERE and OR and therefore appears twice.
        let mut ctx = ctx_with_table();
        FilterExecutor::apply_where(&mut ctx, &pred("name", Operator::Eq, "Bob")).unwrap();
        FilterExecutor::apply_or(&mut ctx, &pred("age", Operator::Lt, "31")).unwrap();
        assert_eq!(ctx.filtered, Some(vec![1, 0, 1, 3]));
    }

    #[test]
    fn test_and_without_where() {
        let mut ctx = ctx_with_table();
        let err = FilterExecutor::apply_and(&mut ctx, &pred("age", Operator::Eq, "30")).unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn test_missing_column_matches_nothing_on_equality() {
        let mut ctx = ctx_with_table();
        FilterExecutor::apply_where(&mut ctx, &pred("email", Operator::Eq, "x")).unwrap();
        assert_eq!(ctx.filtered, Some(Vec::new()));
    }
}
