use super::{ExecutionContext, require_table};
use crate::core::{QueryError, Row, Table};
use crate::format::Formatter;
use crate::plan::SortDirection;
use crate::storage::TableStore;

/// SELECT projection, JOIN/ON and ORDER stage logic.
pub struct SelectExecutor;

impl SelectExecutor {
    /// Resolve the projection header and build the projected table from
    /// the filtered subset (or the full table). When an ORDER stage is
    /// pending on a column this projection would drop, the row source is
    /// sorted first and the later ORDER stage becomes a no-op.
    pub fn project(ctx: &mut ExecutionContext, columns: &[String]) -> Result<(), QueryError> {
        let headers: Vec<String> = if columns.iter().any(|c| c == "*") {
            require_table(&ctx.source, "FROM")?.headers.clone()
        } else {
            columns.to_vec()
        };

        if let Some((order_column, direction)) = ctx.order.clone() {
            if ctx.order_pending() && !headers.contains(&order_column) {
                Self::order_before_projection(ctx, &order_column, direction)?;
                ctx.ordered_early = true;
            }
        }

        let table = require_table(&ctx.source, "FROM")?;
        let project_row = |row: &Row| -> Row {
            Row::new(
                headers
                    .iter()
                    .map(|h| table.value(row, h).unwrap_or("").to_string())
                    .collect(),
            )
        };
        let rows: Vec<Row> = match &ctx.filtered {
            Some(subset) => subset.iter().map(|&idx| project_row(&table.rows[idx])).collect(),
            None => table.rows.iter().map(project_row).collect(),
        };

        let projected = Table::new(headers, rows);
        if !ctx.has_join && !ctx.order_pending() {
            ctx.output.extend(Formatter::render(&projected));
        }
        ctx.projected = Some(projected);
        Ok(())
    }

    /// Early ordering: sort the pre-projection row source in place. With
    /// a WHERE subset the subset order changes; otherwise the source
    /// table's rows are re-sequenced.
    fn order_before_projection(
        ctx: &mut ExecutionContext,
        column: &str,
        direction: SortDirection,
    ) -> Result<(), QueryError> {
        let table = ctx
            .source
            .as_mut()
            .ok_or_else(|| QueryError::Syntax("missing FROM clause".to_string()))?;
        let column_idx = table.column_index(column);
        if let Some(subset) = ctx.filtered.as_mut() {
            let rows = &table.rows;
            subset.sort_by(|&a, &b| sort_key(&rows[a], column_idx).cmp(&sort_key(&rows[b], column_idx)));
            if direction == SortDirection::Desc {
                subset.reverse();
            }
        } else {
            table
                .rows
                .sort_by(|a, b| sort_key(a, column_idx).cmp(&sort_key(b, column_idx)));
            if direction == SortDirection::Desc {
                table.rows.reverse();
            }
        }
        Ok(())
    }

    /// Load the join table and prepare the combined header: the projected
    /// header alone, extended with the secondary's remaining columns when
    /// the SELECT was a wildcard.
    pub fn join(ctx: &mut ExecutionContext, file: &str) -> Result<(), QueryError> {
        let secondary = TableStore::load(file)?;
        let projected = require_table(&ctx.projected, "SELECT")?;
        let mut headers = projected.headers.clone();
        if ctx.wildcard {
            for header in &secondary.headers {
                if !headers.contains(header) {
                    headers.push(header.clone());
                }
            }
        }
        ctx.combined = Some(Table::empty(headers));
        ctx.secondary = Some(secondary);
        Ok(())
    }

    /// Nested-loop equality join: one combined row per (projected row,
    /// matching secondary row) pair; unmatched projected rows emit
    /// nothing. Combined fields prefer the secondary row's value and fall
    /// back to the projected row's.
    pub fn merge_on(ctx: &mut ExecutionContext, left: &str, right: &str) -> Result<(), QueryError> {
        let pending = ctx.order_pending();
        let projected = require_table(&ctx.projected, "SELECT")?;
        let secondary = require_table(&ctx.secondary, "JOIN")?;
        let combined = ctx
            .combined
            .as_mut()
            .ok_or_else(|| QueryError::Syntax("ON without a preceding JOIN".to_string()))?;

        for primary_row in &projected.rows {
            let key = projected.value(primary_row, left);
            for secondary_row in &secondary.rows {
                if secondary.value(secondary_row, right) != key {
                    continue;
                }
                let values: Vec<String> = combined
                    .headers
                    .iter()
                    .map(|header| match secondary.value(secondary_row, header) {
                        Some(v) if !v.is_empty() => v.to_string(),
                        _ => projected.value(primary_row, header).unwrap_or("").to_string(),
                    })
                    .collect();
                combined.rows.push(Row::new(values));
            }
        }

        if !pending {
            ctx.output.extend(Formatter::render(combined));
        }
        Ok(())
    }

    /// Final ordering over the active row sequence (combined rows after a
    /// join, projected rows otherwise). No-op when early ordering already
    /// ran. Rows with an empty or missing sort value come first; `desc`
    /// reverses the ascending result.
    pub fn order(
        ctx: &mut ExecutionContext,
        column: &str,
        direction: SortDirection,
    ) -> Result<(), QueryError> {
        if ctx.ordered_early {
            return Ok(());
        }
        let table = if ctx.has_join { ctx.combined.as_mut() } else { ctx.projected.as_mut() };
        let table =
            table.ok_or_else(|| QueryError::Syntax("ORDER without result rows".to_string()))?;
        let column_idx = table.column_index(column);
        table
            .rows
            .sort_by(|a, b| sort_key(a, column_idx).cmp(&sort_key(b, column_idx)));
        if direction == SortDirection::Desc {
            table.rows.reverse();
        }
        ctx.output.extend(Formatter::render(table));
        Ok(())
    }
}

fn sort_key(row: &Row, column_idx: Option<usize>) -> (bool, &str) {
    let value = column_idx
        .and_then(|idx| row.values.get(idx))
        .map_or("", String::as_str);
    (!value.is_empty(), value)
}
