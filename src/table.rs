use crate::error::{ReportError, Result};
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Rows of a trial-results file, held as text under the header's column names.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub(crate) fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a comma-separated file with a header row.
    ///
    /// Nothing is returned unless the whole file parsed, so a failed load never
    /// leaves a half-filled table behind.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ReportError::FileNotFound(path.to_path_buf()),
            _ => ReportError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ReportError::EmptyFile(path.to_path_buf()));
        }

        let table = Self::from_reader(bytes.as_slice())?;
        if table.headers.is_empty() {
            return Err(ReportError::EmptyFile(path.to_path_buf()));
        }

        log::debug!(
            "loaded {} rows x {} columns from {}",
            table.rows.len(),
            table.headers.len(),
            path.display()
        );
        Ok(table)
    }

    /// Build a table from any CSV source. Ragged rows and invalid UTF-8 are
    /// reported as `Malformed`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReportError::Schema {
                missing: vec![name.to_string()],
            })
    }

    /// Borrow one column's cells in row order. A row too short to reach the
    /// column reads as an empty cell.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| cell(row, idx)).collect())
    }

    /// Parse one column's cells as `T`, failing on the first cell that does
    /// not parse. Surrounding whitespace is ignored.
    pub fn parse_column<T: FromStr>(&self, name: &str) -> Result<Vec<T>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let raw = cell(row, idx);
                raw.trim().parse::<T>().map_err(|_| ReportError::InvalidValue {
                    row: i + 1,
                    column: name.to_string(),
                    value: raw.to_string(),
                })
            })
            .collect()
    }

    /// Lap times as finite numbers. `NaN` and infinities are rejected even
    /// though `f64` would accept them.
    pub fn time_column(&self, name: &str) -> Result<Vec<f64>> {
        let times = self.parse_column::<f64>(name)?;
        if let Some(i) = times.iter().position(|t| !t.is_finite()) {
            let idx = self.column_index(name)?;
            return Err(ReportError::InvalidValue {
                row: i + 1,
                column: name.to_string(),
                value: cell(&self.rows[i], idx).to_string(),
            });
        }
        Ok(times)
    }
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_reader_keeps_row_order() {
        let csv = "Rank,Vehicle,Driver,Time\n2,Acme Y,B,6.5\n1,Acme X,A,7.0\n";
        let table = Table::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Rank", "Vehicle", "Driver", "Time"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("Vehicle").unwrap(), vec!["Acme Y", "Acme X"]);
    }

    #[test]
    fn test_quoted_composite_header() {
        let csv = "Rank,\"PS / KG\"\n1,\"300 / 1200\"\n";
        let table = Table::from_reader(csv.as_bytes()).unwrap();
        assert!(table.has_column("PS / KG"));
        assert_eq!(table.column("PS / KG").unwrap(), vec!["300 / 1200"]);
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let csv = "Rank,Vehicle\n1,Acme X\n2\n";
        let err = Table::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ReportError::Malformed(_)));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = Table::from_reader("Rank,Vehicle,Driver,Time\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers.len(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Table::load(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ReportError::FileNotFound(_)));
        assert!(err.is_load_failure());
    }

    #[test]
    fn test_load_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = Table::load(file.path()).unwrap_err();
        assert!(matches!(err, ReportError::EmptyFile(_)));
    }

    #[test]
    fn test_load_whitespace_only_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\n  \n").unwrap();
        let err = Table::load(file.path()).unwrap_err();
        assert!(matches!(err, ReportError::EmptyFile(_)));
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Rank,Time\n1,6.5\n").unwrap();
        let table = Table::load(file.path()).unwrap();
        assert_eq!(table.time_column("Time").unwrap(), vec![6.5]);
    }

    #[test]
    fn test_time_column_rejects_text() {
        let table = Table::from_reader("Time\n6.5\nfast\n".as_bytes()).unwrap();
        match table.time_column("Time").unwrap_err() {
            ReportError::InvalidValue { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Time");
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_time_column_rejects_nan() {
        let table = Table::from_reader("Time\nNaN\n".as_bytes()).unwrap();
        assert!(matches!(
            table.time_column("Time"),
            Err(ReportError::InvalidValue { row: 1, .. })
        ));
    }

    #[test]
    fn test_short_row_reads_as_empty_cell() {
        let table = Table::new(
            vec!["Rank".to_string(), "Time".to_string()],
            vec![vec!["1".to_string()]],
        );
        assert_eq!(table.column("Time").unwrap(), vec![""]);
        assert!(matches!(
            table.time_column("Time"),
            Err(ReportError::InvalidValue { row: 1, .. })
        ));
    }

    #[test]
    fn test_parse_column_trims_whitespace() {
        let table = Table::from_reader("Rank\n 3 \n".as_bytes()).unwrap();
        assert_eq!(table.parse_column::<u64>("Rank").unwrap(), vec![3]);
    }
}
