use crate::core::{QueryError, Row, Table};
use crate::parser::InsertPayload;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::OpenOptions;
use std::path::Path;
use tempfile::NamedTempFile;

/// The sole I/O boundary of the engine: loads tables from delimited files
/// and writes them back, either appending one row or replacing the whole
/// file.
pub struct TableStore;

impl TableStore {
    /// Load a table, preserving on-disk row and column order. Records
    /// shorter than the header are padded with empty fields, longer ones
    /// truncated, so every row matches the header width.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Table, QueryError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(QueryError::FileNotFound(path.display().to_string()));
        }
        let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(ToString::to_string).collect();
        let width = headers.len();
        let mut rows = Vec::new();
        for record in reader.records() {
            let mut values: Vec<String> = record?.iter().map(ToString::to_string).collect();
            values.resize(width, String::new());
            rows.push(Row::new(values));
        }
        Ok(Table::new(headers, rows))
    }

    /// Append one row. A positional payload is written left to right as
    /// given; a column payload is reordered to the file's header, with
    /// empty fields for unspecified columns.
    pub fn append<P: AsRef<Path>>(path: P, payload: &InsertPayload) -> Result<(), QueryError> {
        let path = path.as_ref();
        let values = match payload {
            InsertPayload::Positional(values) => {
                if !path.exists() {
                    return Err(QueryError::FileNotFound(path.display().to_string()));
                }
                values.clone()
            }
            InsertPayload::Columns(pairs) => {
                let headers = Self::load(path)?.headers;
                headers
                    .iter()
                    .map(|header| {
                        pairs
                            .iter()
                            .find(|(column, _)| column == header)
                            .map_or_else(String::new, |(_, value)| value.clone())
                    })
                    .collect()
            }
        };
        let file = OpenOptions::new().append(true).open(path)?;
        let mut writer = WriterBuilder::new().from_writer(file);
        writer.write_record(&values)?;
        writer.flush()?;
        Ok(())
    }

    /// Replace the file with the given header and complete row set. The
    /// content goes to a temporary file in the same directory first, then
    /// renames over the original, so an interrupted rewrite never leaves
    /// a truncated table behind.
    pub fn rewrite<P: AsRef<Path>>(
        path: P,
        headers: &[String],
        rows: &[Row],
    ) -> Result<(), QueryError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir)?;
        let mut writer = WriterBuilder::new().from_writer(tmp.as_file());
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(&row.values)?;
        }
        writer.flush()?;
        drop(writer);
        tmp.persist(path).map_err(|e| QueryError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_preserves_order() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "t.csv", "id,name\n2,Bob\n1,Alice\n");
        let table = TableStore::load(&path).unwrap();
        assert_eq!(table.headers, vec!["id", "name"]);
        assert_eq!(table.rows[0].values, vec!["2", "Bob"]);
        assert_eq!(table.rows[1].values, vec!["1", "Alice"]);
    }

    #[test]
    fn test_load_pads_short_records() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "t.csv", "id,name,email\n1,Alice\n");
        let table = TableStore::load(&path).unwrap();
        assert_eq!(table.rows[0].values, vec!["1", "Alice", ""]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = TableStore::load("no_such_file.csv").unwrap_err();
        assert!(matches!(err, QueryError::FileNotFound(_)));
    }

    #[test]
    fn test_append_positional() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "t.csv", "id,name\n1,Alice\n");
        TableStore::append(&path, &InsertPayload::Positional(vec!["2".into(), "Bob".into()]))
            .unwrap();
        let table = TableStore::load(&path).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].values, vec!["2", "Bob"]);
    }

    #[test]
    fn test_append_columns_reorders_and_fills() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "t.csv", "id,name,email\n1,Alice,a@x.io\n");
        let payload = InsertPayload::Columns(vec![
            ("email".to_string(), "b@x.io".to_string()),
            ("id".to_string(), "2".to_string()),
        ]);
        TableStore::append(&path, &payload).unwrap();
        let table = TableStore::load(&path).unwrap();
        assert_eq!(table.rows[1].values, vec!["2", "", "b@x.io"]);
    }

    #[test]
    fn test_rewrite_replaces_content_atomically() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "t.csv", "id,name\n1,Alice\n2,Bob\n");
        let rows = vec![Row::new(vec!["2".to_string(), "Bob".to_string()])];
        TableStore::rewrite(&path, &["id".to_string(), "name".to_string()], &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "id,name\n2,Bob\n");
        // no stray temporary files left next to the table
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
