use crate::core::Table;

/// Renders query results: one line per row, field values joined by `|`.
/// No header line is emitted.
pub struct Formatter;

impl Formatter {
    #[must_use]
    pub fn render(table: &Table) -> Vec<String> {
        table.rows.iter().map(|row| row.values.join("|")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Row;

    #[test]
    fn test_render_pipe_delimited() {
        let table = Table::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                Row::new(vec!["1".to_string(), "Alice".to_string()]),
                Row::new(vec!["2".to_string(), String::new()]),
            ],
        );
        assert_eq!(Formatter::render(&table), vec!["1|Alice", "2|"]);
    }

    #[test]
    fn test_render_empty_table() {
        let table = Table::empty(vec!["id".to_string()]);
        assert!(Formatter::render(&table).is_empty());
    }
}
