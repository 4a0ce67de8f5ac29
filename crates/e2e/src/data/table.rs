//! Row-oriented CSV tables
//!
//! Fixtures are tens of rows, so a table is read whole, transformed column by
//! column, and written back with the header and row order untouched.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DataError, DataResult};

/// A CSV file held in memory as a header and string rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Read a CSV file with a header row
    ///
    /// A file with no content at all reads as a table with no header and no
    /// rows. Short rows are padded with empty fields.
    pub fn read(path: &Path) -> DataResult<Self> {
        let file = std::fs::File::open(path).map_err(|source| DataError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            if row.len() < headers.len() {
                row.resize(headers.len(), String::new());
            }
            rows.push(row);
        }

        debug!("Read {} row(s) from {}", rows.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    /// Whether the source had no header row
    pub fn is_empty_file(&self) -> bool {
        self.headers.is_empty() || self.headers.iter().all(|h| h.is_empty())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Index of a column, or a MissingColumn error naming the file
    pub fn column_index(&self, column: &str) -> DataResult<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| DataError::MissingColumn {
                column: column.to_string(),
                path: self.path.clone(),
            })
    }

    /// Values of one column in row order
    pub fn column(&self, column: &str) -> DataResult<Vec<&str>> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Replace every value in a column; `f` gets the row index and current value
    pub fn try_map_column<F>(&mut self, column: &str, mut f: F) -> DataResult<()>
    where
        F: FnMut(usize, &str) -> DataResult<String>,
    {
        let idx = self.column_index(column)?;
        for (row_idx, row) in self.rows.iter_mut().enumerate() {
            row[idx] = f(row_idx, &row[idx])?;
        }
        Ok(())
    }

    /// Infallible variant of [`CsvTable::try_map_column`]
    pub fn map_column<F>(&mut self, column: &str, mut f: F) -> DataResult<()>
    where
        F: FnMut(&str) -> String,
    {
        self.try_map_column(column, |_, value| Ok(f(value)))
    }

    /// Set a column to the same value on every row
    pub fn fill_column(&mut self, column: &str, value: &str) -> DataResult<()> {
        self.map_column(column, |_| value.to_string())
    }

    /// Write the table, header first
    pub fn write(&self, path: &Path) -> DataResult<()> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
        if !self.is_empty_file() {
            writer.write_record(&self.headers)?;
        }
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        debug!("Wrote {} row(s) to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Write the table back over its source file
    pub fn save(&self) -> DataResult<()> {
        self.write(&self.path)
    }
}

/// Sibling path whose stem carries `suffix`, keeping the extension
pub fn with_stem_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_and_column() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv(&tmp, "a.csv", "A,B\n1,2\n3,4\n");
        let table = CsvTable::read(&path).unwrap();
        assert_eq!(table.headers(), ["A", "B"]);
        assert_eq!(table.column("B").unwrap(), vec!["2", "4"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_column_names_file() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv(&tmp, "a.csv", "A,B\n1,2\n");
        let table = CsvTable::read(&path).unwrap();
        match table.column("C").unwrap_err() {
            DataError::MissingColumn { column, path: p } => {
                assert_eq!(column, "C");
                assert_eq!(p, path);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_reads_as_no_header() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv(&tmp, "empty.csv", "");
        let table = CsvTable::read(&path).unwrap();
        assert!(table.is_empty_file());
        assert!(table.is_empty());
    }

    #[test]
    fn test_short_rows_padded() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv(&tmp, "short.csv", "A,B,C\n1\n");
        let table = CsvTable::read(&path).unwrap();
        assert_eq!(table.rows()[0], vec!["1", "", ""]);
    }

    #[test]
    fn test_round_trip_preserves_quoting_and_order() {
        let tmp = TempDir::new().unwrap();
        let path = write_csv(&tmp, "q.csv", "NAME,NOTE\n\"Smith, Jo\",x\nAnn,\"say \"\"hi\"\"\"\n");
        let mut table = CsvTable::read(&path).unwrap();
        table.map_column("NOTE", |v| v.to_uppercase()).unwrap();
        table.save().unwrap();

        let reread = CsvTable::read(&path).unwrap();
        assert_eq!(reread.column("NAME").unwrap(), vec!["Smith, Jo", "Ann"]);
        assert_eq!(reread.column("NOTE").unwrap(), vec!["X", "SAY \"HI\""]);
    }

    #[test]
    fn test_with_stem_suffix() {
        assert_eq!(
            with_stem_suffix(Path::new("/data/i_positive.csv"), "withsite42"),
            PathBuf::from("/data/i_positivewithsite42.csv")
        );
        assert_eq!(
            with_stem_suffix(Path::new("records"), "_x"),
            PathBuf::from("records_x")
        );
    }
}
