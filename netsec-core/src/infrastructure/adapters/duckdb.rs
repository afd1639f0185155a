// netsec-core/src/infrastructure/adapters/duckdb.rs

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use duckdb::{Config, Connection};
use ndarray::Array2;
use serde_json::Value;
use tracing::{debug, warn};

use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, atomic_write_with};
use crate::ports::Document;

const TABLE: &str = "frame";

/// Column that documents carry from the store and the table never keeps.
pub const ID_COLUMN: &str = "_id";
/// Literal that stands for a missing value in the raw collection.
pub const MISSING_TOKEN: &str = "na";

/// In-memory table backed by a private DuckDB connection.
///
/// A frame without columns has no backing table: DuckDB cannot create one,
/// and an empty collection must still round-trip to an empty CSV.
pub struct DataFrame {
    conn: Mutex<Connection>,
    has_table: bool,
}

impl std::fmt::Debug for DataFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFrame")
            .field("has_table", &self.has_table)
            .finish_non_exhaustive()
    }
}

impl DataFrame {
    fn open(has_table: bool) -> Result<Self, InfrastructureError> {
        let conn = Connection::open_in_memory_with_flags(Config::default())?;
        Ok(Self {
            conn: Mutex::new(conn),
            has_table,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, InfrastructureError> {
        self.conn
            .lock()
            .map_err(|_| InfrastructureError::Io(std::io::Error::other("DuckDB Mutex Poisoned")))
    }

    pub fn empty() -> Result<Self, InfrastructureError> {
        Self::open(false)
    }

    /// Builds a frame from store documents: `_id` is dropped and every `"na"`
    /// string becomes NULL before type inference runs. Fields absent from a
    /// document are NULL in its row, so a document holding only `_id` still
    /// yields an (all-missing) row.
    pub fn from_documents(documents: Vec<Document>) -> Result<Self, InfrastructureError> {
        let rows: Vec<Document> = documents.into_iter().map(normalize_document).collect();
        let columns = union_of_keys(&rows);
        if columns.is_empty() {
            if !rows.is_empty() {
                warn!(documents = rows.len(), "Documents carry no fields besides _id");
            }
            return Self::empty();
        }
        let id_only = rows.iter().filter(|row| row.is_empty()).count();
        if id_only > 0 {
            warn!(count = id_only, "Documents with only an _id kept as all-missing rows");
        }

        let staging = tempfile::Builder::new()
            .prefix("netsec-documents-")
            .suffix(".json")
            .tempfile()?;
        {
            let mut writer = BufWriter::new(staging.as_file());
            for row in &rows {
                let full: Document = columns
                    .iter()
                    .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
                    .collect();
                serde_json::to_writer(&mut writer, &full)?;
                writer.write_all(b"\n")?;
            }
            writer.flush()?;
        }

        let frame = Self::open(true)?;
        frame.lock()?.execute_batch(&format!(
            "CREATE TABLE {TABLE} AS SELECT * FROM read_json_auto({}, format = 'newline_delimited')",
            sql_literal(staging.path())
        ))?;
        debug!(rows = rows.len(), columns = columns.len(), "Loaded documents into table engine");
        Ok(frame)
    }

    /// Reads a CSV with header. A zero-byte file yields a frame without columns.
    pub fn read_csv(path: &Path) -> Result<Self, InfrastructureError> {
        if fs::metadata(path)?.len() == 0 {
            return Self::empty();
        }
        let frame = Self::open(true)?;
        frame.lock()?.execute_batch(&format!(
            "CREATE TABLE {TABLE} AS SELECT * FROM read_csv_auto({}, header = true)",
            sql_literal(path)
        ))?;
        Ok(frame)
    }

    pub fn columns(&self) -> Result<Vec<String>, InfrastructureError> {
        if !self.has_table {
            return Ok(Vec::new());
        }
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("PRAGMA table_info('{TABLE}')"))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>("name"))?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    pub fn height(&self) -> Result<usize, InfrastructureError> {
        if !self.has_table {
            return Ok(0);
        }
        let count: i64 = self.lock()?.query_row(
            &format!("SELECT count(*) FROM {TABLE}"),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Writes the whole table as CSV with header and no index column.
    pub fn write_csv(&self, path: &Path) -> Result<(), InfrastructureError> {
        self.copy_to(path, &format!("SELECT * FROM {TABLE}"))
    }

    /// Shuffles rows with `seed` and writes the first `test_rows` to
    /// `test_path`, the rest to `train_path`. Returns `(train, test)` counts.
    pub fn split_to_csv(
        &self,
        test_rows: usize,
        seed: u64,
        train_path: &Path,
        test_path: &Path,
    ) -> Result<(usize, usize), InfrastructureError> {
        let total = self.height()?;
        let test_rows = test_rows.min(total);
        // hash() is variadic: mixing the seed in as a second argument keeps
        // the full u64 range without integer overflow.
        let order = format!("ORDER BY hash(rowid, {seed}::UBIGINT), rowid");

        self.copy_to(
            test_path,
            &format!("SELECT * FROM {TABLE} {order} LIMIT {test_rows}"),
        )?;
        self.copy_to(
            train_path,
            &format!("SELECT * FROM {TABLE} {order} OFFSET {test_rows}"),
        )?;
        Ok((total - test_rows, test_rows))
    }

    /// Column values as f64 in row order; NULL and non-numeric text become `None`.
    pub fn column_f64(&self, column: &str) -> Result<Vec<Option<f64>>, InfrastructureError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT TRY_CAST({} AS DOUBLE) FROM {TABLE} ORDER BY rowid",
            quote_ident(column)
        ))?;
        let rows = stmt.query_map([], |row| row.get::<_, Option<f64>>(0))?;

        let mut values = Vec::new();
        for row in rows {
            values.push(row?);
        }
        Ok(values)
    }

    /// Number of non-NULL cells in `column` that do not parse as a number.
    pub fn non_numeric_count(&self, column: &str) -> Result<usize, InfrastructureError> {
        let ident = quote_ident(column);
        let count: i64 = self.lock()?.query_row(
            &format!(
                "SELECT count(*) FROM {TABLE} WHERE {ident} IS NOT NULL AND TRY_CAST({ident} AS DOUBLE) IS NULL"
            ),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Stacks the given columns into a row-major matrix, NULL as NaN.
    pub fn to_matrix(&self, columns: &[String]) -> Result<Array2<f64>, InfrastructureError> {
        let height = self.height()?;
        let mut data = Array2::<f64>::from_elem((height, columns.len()), f64::NAN);
        for (j, column) in columns.iter().enumerate() {
            for (i, value) in self.column_f64(column)?.into_iter().enumerate() {
                if let Some(v) = value {
                    data[[i, j]] = v;
                }
            }
        }
        Ok(data)
    }

    fn copy_to(&self, path: &Path, query: &str) -> Result<(), InfrastructureError> {
        if !self.has_table {
            return atomic_write(path, "");
        }
        atomic_write_with(path, |temp_path| {
            self.lock()?.execute_batch(&format!(
                "COPY ({query}) TO {} (FORMAT CSV, HEADER, DELIMITER ',')",
                sql_literal(temp_path)
            ))?;
            Ok(())
        })
    }
}

fn normalize_document(mut doc: Document) -> Document {
    doc.shift_remove(ID_COLUMN);
    for value in doc.values_mut() {
        if matches!(value, Value::String(s) if s == MISSING_TOKEN) {
            *value = Value::Null;
        }
    }
    doc
}

/// Field names in first-seen order across all documents.
fn union_of_keys(rows: &[Document]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for key in rows.iter().flat_map(|row| row.keys()) {
        if !columns.contains(key) {
            columns.push(key.clone());
        }
    }
    columns
}

fn sql_literal(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', "''"))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
