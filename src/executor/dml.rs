use super::{ExecutionContext, require_table};
use crate::core::{QueryError, Row};
use crate::parser::InsertPayload;
use crate::storage::TableStore;

/// INSERT/SET/DELETE stage logic. All writes go through `TableStore`.
pub struct DmlExecutor;

impl DmlExecutor {
    /// Append one row to the target file.
    pub fn insert(file: &str, payload: &InsertPayload) -> Result<(), QueryError> {
        TableStore::append(file, payload)
    }

    /// Apply SET assignments to the WHERE-filtered rows (every row when
    /// no WHERE ran), then rewrite the file with the full mutated row
    /// set. Assignments to columns the table does not have are ignored.
    pub fn set(
        ctx: &mut ExecutionContext,
        assignments: &[(String, String)],
    ) -> Result<(), QueryError> {
        let table = ctx
            .source
            .as_mut()
            .ok_or_else(|| QueryError::Syntax("SET without a target table".to_string()))?;
        let columns: Vec<(usize, &str)> = assignments
            .iter()
            .filter_map(|(column, value)| {
                table.column_index(column).map(|idx| (idx, value.as_str()))
            })
            .collect();
        let targets: Vec<usize> = match &ctx.filtered {
            Some(subset) => subset.clone(),
            None => (0..table.rows.len()).collect(),
        };
        for row_idx in targets {
            for &(column_idx, value) in &columns {
                if let Some(field) = table.rows[row_idx].values.get_mut(column_idx) {
                    *field = value.to_string();
                }
            }
        }
        let path = ctx
            .source_path
            .as_ref()
            .ok_or_else(|| QueryError::Syntax("SET without a target table".to_string()))?;
        TableStore::rewrite(path, &table.headers, &table.rows)
    }

    /// Rewrite the target file with every row the WHERE subset did not
    /// select, preserving header and survivor order.
    pub fn deletes(ctx: &mut ExecutionContext) -> Result<(), QueryError> {
        let table = require_table(&ctx.source, "FROM")?;
        let subset = ctx
            .filtered
            .as_ref()
            .ok_or_else(|| QueryError::Syntax("DELETE requires a WHERE clause".to_string()))?;
        let survivors: Vec<Row> = table
            .rows
            .iter()
            .enumerate()
            .filter(|(idx, _)| !subset.contains(idx))
            .map(|(_, row)| row.clone())
            .collect();
        let path = ctx
            .source_path
            .as_ref()
            .ok_or_else(|| QueryError::Syntax("missing FROM clause".to_string()))?;
        TableStore::rewrite(path, &table.headers, &survivors)
    }
}
