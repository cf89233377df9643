//! Reading a CSV dataset into a column-addressable table

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use csv::{Reader, StringRecord};
use indicatif::{ProgressBar, ProgressStyle};

use crate::core::{
    Result,
    error::{CompareError, CompareErrorKind},
};

/// How often the loading spinner is updated, in rows
const PROGRESS_INTERVAL: usize = 50_000;

/// An in-memory CSV table. Rows are kept in file order.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    columns: HashMap<String, usize>,
    rows: Vec<StringRecord>,
}

/// A borrowed row of a [`Table`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    record: &'a StringRecord,
}

impl Table {
    /// Load a table from a CSV file with a header row
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| {
            CompareError::from(CompareErrorKind::DatasetUnreadable {
                path: path.to_path_buf(),
                source,
            })
            .with_hint(Some(
                "Set the dataset path with --world-data, --states-data, --counties-data or the [datasets] config section",
            ))
        })?;

        let progress = ProgressBar::new_spinner();
        progress.set_style(ProgressStyle::with_template(
            "{spinner} Loading {msg}: {pos} rows",
        )?);
        progress.set_message(path.display().to_string());

        let table = Self::read(file, Some(&progress));
        progress.finish_and_clear();
        let table = table?;

        tracing::debug!("Read {} rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Load a table from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::read(reader, None)
    }

    fn read<R: Read>(reader: R, progress: Option<&ProgressBar>) -> Result<Self> {
        let mut reader = Reader::from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut columns = HashMap::with_capacity(headers.len());
        for (index, name) in headers.iter().enumerate() {
            // Duplicate header names resolve to the leftmost column
            columns.entry(name.clone()).or_insert(index);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?);

            if let Some(progress) = progress {
                if rows.len() % PROGRESS_INTERVAL == 0 {
                    progress.set_position(rows.len() as u64);
                }
            }
        }

        Ok(Self {
            headers,
            columns,
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Index of the named column
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns.get(name).copied().ok_or_else(|| {
            CompareErrorKind::MissingColumn {
                column: name.to_string(),
            }
            .into()
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |record| Row {
            table: self,
            record,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> Row<'a> {
    /// Value of the named column
    pub fn get(&self, column: &str) -> Result<&'a str> {
        let index = self.table.column_index(column)?;
        Ok(self.get_index(index).unwrap_or_default())
    }

    pub fn get_index(&self, index: usize) -> Option<&'a str> {
        self.record.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const STATES: &str = "date,state,fips,cases,deaths\n\
        2023-03-23,New Jersey,34,3052636,36097\n\
        2023-03-23,Illinois,17,4107931,41496\n";

    #[test]
    fn test_from_reader_keeps_file_order() {
        let table = Table::from_reader(STATES.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.headers(), ["date", "state", "fips", "cases", "deaths"]);

        let states: Vec<&str> = table.rows().map(|row| row.get("state").unwrap()).collect();
        assert_eq!(states, ["New Jersey", "Illinois"]);
    }

    #[test]
    fn test_columns_are_addressed_by_name() {
        let table = Table::from_reader(STATES.as_bytes()).unwrap();
        let row = table.rows().next().unwrap();

        assert_eq!(table.column_index("cases").unwrap(), 3);
        assert_eq!(row.get("deaths").unwrap(), "36097");
    }

    #[test]
    fn test_missing_column() {
        let table = Table::from_reader(STATES.as_bytes()).unwrap();
        let err = table.column_index("total_cases").unwrap_err();

        assert!(matches!(
            err.kind(),
            CompareErrorKind::MissingColumn { column } if column == "total_cases"
        ));
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let err = Table::from_reader("state,cases\nOhio,1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err.kind(), CompareErrorKind::CsvError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(STATES.as_bytes()).unwrap();
        file.flush().unwrap();

        let table = Table::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Table::load(Path::new("/nonexistent/us-states.csv")).unwrap_err();

        assert!(matches!(
            err.kind(),
            CompareErrorKind::DatasetUnreadable { .. }
        ));
        assert!(err.hint().is_some());
    }
}
