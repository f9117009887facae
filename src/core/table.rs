/// One data row: field values positionally aligned with the owning
/// table's header. A shorter on-disk record is padded with empty fields
/// on load, so the value count always equals the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub values: Vec<String>,
}

impl Row {
    #[must_use]
    pub const fn new(values: Vec<String>) -> Self {
        Self { values }
    }
}

/// An in-memory table: ordered header plus ordered rows. Tables are plain
/// value objects; the source table, a projection and a join target are
/// distinct instances even when loaded from the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    #[must_use]
    pub const fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    #[must_use]
    pub const fn empty(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Look up a field by column name. `None` when the column is not part
    /// of this table's header; an empty string is returned as `Some("")`.
    #[must_use]
    pub fn value<'a>(&self, row: &'a Row, column: &str) -> Option<&'a str> {
        self.column_index(column)
            .and_then(|idx| row.values.get(idx))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                Row::new(vec!["1".to_string(), "Alice".to_string()]),
                Row::new(vec!["2".to_string(), String::new()]),
            ],
        )
    }

    #[test]
    fn test_column_index() {
        let table = sample();
        assert_eq!(table.column_index("id"), Some(0));
        assert_eq!(table.column_index("name"), Some(1));
        assert_eq!(table.column_index("missing"), None);
    }

    #[test]
    fn test_value_lookup() {
        let table = sample();
        assert_eq!(table.value(&table.rows[0], "name"), Some("Alice"));
        assert_eq!(table.value(&table.rows[1], "name"), Some(""));
        assert_eq!(table.value(&table.rows[0], "missing"), None);
    }
}
