//! Annotation file parsing.
//!
//! Parses Audacity label-track exports as tab-separated values with no
//! header. Two layouts exist: the plain layout with one row per segment,
//! and the spectral-selection layout where each segment spans two physical
//! rows, the second carrying the frequency bounds behind a `\` marker.

use std::path::Path;

use csv::StringRecord;

use crate::constants::SPECTRAL_MARKER;
use crate::error::{Error, Result};

/// Frequency bounds of a spectral selection, in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreqBand {
    /// Lower bound in Hz.
    pub low: f64,
    /// Upper bound in Hz.
    pub high: f64,
}

/// One parsed label: a time span, its text, and optional frequency bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEntry {
    /// Raw label text.
    pub label: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Frequency bounds, present only in spectral-selection layout.
    pub freq: Option<FreqBand>,
}

/// Parse an annotation file and return its label entries.
///
/// Layout detection follows the file shape: a file with more than one row
/// whose second row starts with the `\` marker is spectral-selection;
/// anything else, including single-row files, is plain.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a required column is
/// missing, a time or frequency field is not numeric, or a
/// spectral-selection file has an odd number of rows or a pair row without
/// the marker.
///
/// Returns `Ok(vec![])` for an empty file.
pub fn parse_annotation_file(path: &Path) -> Result<Vec<LabelEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::AnnotationRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut records: Vec<(u64, StringRecord)> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Error::AnnotationRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(idx as u64 + 1, |p| p.line());
        records.push((line, record));
    }

    if records.is_empty() {
        return Ok(Vec::new());
    }

    let spectral = records.len() > 1 && records[1].1.get(0) == Some(SPECTRAL_MARKER);
    if spectral {
        parse_spectral(&records, path)
    } else {
        parse_plain(&records, path)
    }
}

/// Plain layout: every row is `start\tend\tlabel`.
fn parse_plain(records: &[(u64, StringRecord)], path: &Path) -> Result<Vec<LabelEntry>> {
    records
        .iter()
        .map(|(line, record)| {
            Ok(LabelEntry {
                start: numeric_field(record, 0, *line, path)?,
                end: numeric_field(record, 1, *line, path)?,
                label: field(record, 2, *line, path)?.to_string(),
                freq: None,
            })
        })
        .collect()
}

/// Spectral-selection layout: rows alternate between `start\tend\tlabel`
/// and `\\\tfreq_min\tfreq_max`.
fn parse_spectral(records: &[(u64, StringRecord)], path: &Path) -> Result<Vec<LabelEntry>> {
    if records.len() % 2 != 0 {
        return Err(Error::InvalidAnnotationFormat {
            path: path.to_path_buf(),
            message: format!(
                "spectral-selection layout requires row pairs, got {} rows",
                records.len()
            ),
        });
    }

    records
        .chunks_exact(2)
        .map(|pair| {
            let (time_line, time_row) = &pair[0];
            let (freq_line, freq_row) = &pair[1];

            let marker = field(freq_row, 0, *freq_line, path)?;
            if marker != SPECTRAL_MARKER {
                return Err(Error::InvalidAnnotationFormat {
                    path: path.to_path_buf(),
                    message: format!(
                        "line {freq_line}: expected '{SPECTRAL_MARKER}' marker, found '{marker}'"
                    ),
                });
            }

            Ok(LabelEntry {
                start: numeric_field(time_row, 0, *time_line, path)?,
                end: numeric_field(time_row, 1, *time_line, path)?,
                label: field(time_row, 2, *time_line, path)?.to_string(),
                freq: Some(FreqBand {
                    low: numeric_field(freq_row, 1, *freq_line, path)?,
                    high: numeric_field(freq_row, 2, *freq_line, path)?,
                }),
            })
        })
        .collect()
}

fn field<'r>(record: &'r StringRecord, idx: usize, line: u64, path: &Path) -> Result<&'r str> {
    record
        .get(idx)
        .ok_or_else(|| Error::InvalidAnnotationFormat {
            path: path.to_path_buf(),
            message: format!("line {line}: missing column {}", idx + 1),
        })
}

fn numeric_field(record: &StringRecord, idx: usize, line: u64, path: &Path) -> Result<f64> {
    let raw = field(record, idx, line, path)?;
    raw.parse().map_err(|_| Error::InvalidAnnotationFormat {
        path: path.to_path_buf(),
        message: format!("line {line}: '{raw}' is not a number"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_annotation(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_plain_layout() {
        let file = write_annotation("1.000000\t2.500000\tsp1\n4.0\t6.0\tsp2\n");
        let entries = parse_annotation_file(file.path()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].start, 1.0);
        assert_eq!(entries[0].end, 2.5);
        assert_eq!(entries[0].label, "sp1");
        assert_eq!(entries[0].freq, None);
        assert_eq!(entries[1].label, "sp2");
    }

    #[test]
    fn test_parse_single_row_is_plain() {
        let file = write_annotation("0.5\t1.5\tlone\n");
        let entries = parse_annotation_file(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "lone");
        assert!(entries[0].freq.is_none());
    }

    #[test]
    fn test_parse_second_row_without_marker_is_plain() {
        let file = write_annotation("0.0\t1.0\tsp1\n2.0\t3.0\tsp2\n");
        let entries = parse_annotation_file(file.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.freq.is_none()));
    }

    #[test]
    fn test_parse_spectral_selection_layout() {
        let file = write_annotation(
            "1.0\t2.5\tsp1\n\\\t500.0\t4000.0\n6.0\t8.0\tsp2\n\\\t1200.0\t9000.0\n",
        );
        let entries = parse_annotation_file(file.path()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "sp1");
        assert_eq!(entries[0].start, 1.0);
        assert_eq!(
            entries[0].freq,
            Some(FreqBand {
                low: 500.0,
                high: 4000.0
            })
        );
        assert_eq!(
            entries[1].freq,
            Some(FreqBand {
                low: 1200.0,
                high: 9000.0
            })
        );
    }

    #[test]
    fn test_parse_spectral_odd_row_count_fails() {
        let file = write_annotation("1.0\t2.5\tsp1\n\\\t500.0\t4000.0\n6.0\t8.0\tsp2\n");
        let result = parse_annotation_file(file.path());
        assert!(matches!(result, Err(Error::InvalidAnnotationFormat { .. })));
    }

    #[test]
    fn test_parse_spectral_missing_marker_on_later_pair_fails() {
        let file = write_annotation(
            "1.0\t2.5\tsp1\n\\\t500.0\t4000.0\n6.0\t8.0\tsp2\n9.0\t700.0\t5000.0\n",
        );
        let result = parse_annotation_file(file.path());
        assert!(matches!(result, Err(Error::InvalidAnnotationFormat { .. })));
    }

    #[test]
    fn test_parse_non_numeric_time_fails() {
        let file = write_annotation("abc\t2.5\tsp1\n");
        let result = parse_annotation_file(file.path());
        assert!(matches!(result, Err(Error::InvalidAnnotationFormat { .. })));
    }

    #[test]
    fn test_parse_missing_label_column_fails() {
        let file = write_annotation("1.0\t2.5\n");
        let result = parse_annotation_file(file.path());
        assert!(matches!(result, Err(Error::InvalidAnnotationFormat { .. })));
    }

    #[test]
    fn test_parse_empty_file_returns_empty_vec() {
        let file = write_annotation("");
        let entries = parse_annotation_file(file.path()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_missing_file_fails() {
        let result = parse_annotation_file(Path::new("no-such-annotation.txt"));
        assert!(matches!(result, Err(Error::AnnotationRead { .. })));
    }
}
