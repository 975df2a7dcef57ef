//! Species lookup table ("milon") loading and label resolution.
//!
//! The milon is a headerless tab-separated file stored in the legacy
//! ISO-8859-8 Hebrew encoding. Column 0 holds the numeric species
//! identifier; every other column holds an alternative spelling or name
//! under which the species may appear in annotation files.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::warn;

/// One milon row: a species identifier and its raw cells.
#[derive(Debug, Clone)]
struct MilonRow {
    /// Parsed identifier from column 0.
    id: i64,
    /// All cells of the row, column 0 included, as decoded text.
    cells: Vec<String>,
}

/// The species lookup table.
#[derive(Debug, Clone)]
pub struct Milon {
    rows: Vec<MilonRow>,
    /// Widest row seen; columns are scanned up to this bound.
    width: usize,
}

impl Milon {
    /// Load a milon from a tab-separated ISO-8859-8 file with no header.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a row is empty, or a
    /// row's identifier column does not parse as an integer.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::MilonRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let (decoded, _, had_errors) = encoding_rs::ISO_8859_8.decode(&bytes);
        if had_errors {
            warn!(
                "lookup table '{}' contains bytes outside ISO-8859-8, replaced",
                path.display()
            );
        }

        Self::from_tsv(&decoded, path)
    }

    /// Parse already-decoded tab-separated text into a milon.
    ///
    /// `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the text holds no rows or a row's identifier
    /// column does not parse as an integer.
    pub fn from_tsv(text: &str, origin: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        let mut width = 0;

        for (line_num, record) in reader.records().enumerate() {
            let record = record.map_err(|e| Error::MilonParse {
                path: origin.to_path_buf(),
                message: format!("line {}: {e}", line_num + 1),
            })?;

            let cells: Vec<String> = record.iter().map(str::to_string).collect();
            if cells.iter().all(String::is_empty) {
                continue;
            }

            let id_cell = cells.first().map(String::as_str).unwrap_or_default();
            let id = id_cell.parse::<i64>().map_err(|_| Error::MilonParse {
                path: origin.to_path_buf(),
                message: format!(
                    "line {}: identifier column is not an integer: '{id_cell}'",
                    line_num + 1
                ),
            })?;

            width = width.max(cells.len());
            rows.push(MilonRow { id, cells });
        }

        if rows.is_empty() {
            return Err(Error::MilonParse {
                path: origin.to_path_buf(),
                message: "no rows".to_string(),
            });
        }

        Ok(Self { rows, width })
    }

    /// Resolve a label to a species identifier.
    ///
    /// Columns are scanned in order starting at column 0; the first column
    /// in which any row's cell equals the label verbatim wins, and the
    /// identifier is taken from column 0 of the first such row. Returns
    /// `None` when no column matches.
    pub fn resolve(&self, label: &str) -> Option<i64> {
        for col in 0..self.width {
            let matched = self
                .rows
                .iter()
                .find(|row| row.cells.get(col).is_some_and(|cell| cell == label));
            if let Some(row) = matched {
                return Some(row.id);
            }
        }
        None
    }

    /// Number of species rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows. Never true for a loaded milon.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn milon_from(text: &str) -> Milon {
        Milon::from_tsv(text, Path::new("milon.txt")).unwrap()
    }

    #[test]
    fn test_resolve_identifier_column_first() {
        let milon = milon_from("7\tsp1\tsparrow\n12\tsp2\tswift\n");
        // "12" matches column 0 of the second row directly.
        assert_eq!(milon.resolve("12"), Some(12));
    }

    #[test]
    fn test_resolve_scans_columns_in_order() {
        let milon = milon_from("7\tsp1\tsparrow\n12\tsp2\tswift\n");
        assert_eq!(milon.resolve("sp2"), Some(12));
        assert_eq!(milon.resolve("swift"), Some(12));
        assert_eq!(milon.resolve("sparrow"), Some(7));
    }

    #[test]
    fn test_resolve_first_column_with_match_wins() {
        // "dup" appears in column 1 of row 2 and column 2 of row 1; the
        // earlier column decides, so row 2's identifier is returned.
        let milon = milon_from("1\taaa\tdup\n2\tdup\tbbb\n");
        assert_eq!(milon.resolve("dup"), Some(2));
    }

    #[test]
    fn test_resolve_unknown_label_is_none() {
        let milon = milon_from("7\tsp1\n");
        assert_eq!(milon.resolve("nope"), None);
    }

    #[test]
    fn test_ragged_rows_are_accepted() {
        let milon = milon_from("1\ta\n2\tb\tlong name\textra\n");
        assert_eq!(milon.len(), 2);
        assert_eq!(milon.resolve("extra"), Some(2));
    }

    #[test]
    fn test_non_numeric_identifier_fails() {
        let result = Milon::from_tsv("abc\tsp1\n", Path::new("milon.txt"));
        assert!(matches!(result, Err(Error::MilonParse { .. })));
    }

    #[test]
    fn test_empty_table_fails() {
        let result = Milon::from_tsv("", Path::new("milon.txt"));
        assert!(matches!(result, Err(Error::MilonParse { .. })));
    }

    #[test]
    fn test_load_decodes_iso_8859_8() {
        // "עורב" (crow) in ISO-8859-8: ayin vav resh bet.
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"3\t\xF2\xE5\xF8\xE1\n").unwrap();
        file.flush().unwrap();

        let milon = Milon::load(file.path()).unwrap();
        assert_eq!(milon.resolve("\u{05E2}\u{05D5}\u{05E8}\u{05D1}"), Some(3));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Milon::load(Path::new("no-such-milon.txt"));
        assert!(matches!(result, Err(Error::MilonRead { .. })));
    }
}
