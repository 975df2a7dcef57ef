//! Segment and metadata output.
//!
//! Writes extracted segments as 16-bit WAV files into the results
//! directory and serializes the per-segment metadata log alongside them.

use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter as HoundWriter};
use serde::Serialize;

use crate::constants::METADATA_FILE_NAME;
use crate::error::{Error, Result};

/// One row of the per-segment metadata log.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentLogEntry {
    /// Source file base name, without extension.
    #[serde(rename = "file name")]
    pub file: String,
    /// Raw label text.
    pub label: String,
    /// 1-based index of the label within its annotation file.
    pub index: usize,
    /// Start time in seconds.
    #[serde(rename = "start time")]
    pub start: f64,
    /// End time in seconds.
    #[serde(rename = "end time")]
    pub end: f64,
    /// Lower frequency bound in Hz, empty in plain layout.
    #[serde(rename = "min freq")]
    pub freq_min: Option<f64>,
    /// Upper frequency bound in Hz, empty in plain layout.
    #[serde(rename = "max freq")]
    pub freq_max: Option<f64>,
}

/// Writes segments and metadata into the results directory.
pub struct SegmentWriter {
    output_dir: PathBuf,
}

impl SegmentWriter {
    /// Create a writer targeting the given directory.
    #[must_use]
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Ensure the results directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::OutputDirCreateFailed {
            path: self.output_dir.clone(),
            source: e,
        })
    }

    /// Write one segment as a 16-bit PCM WAV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn write_segment(
        &self,
        file_name: &str,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<PathBuf> {
        self.ensure_output_dir()?;
        let path = self.output_dir.join(file_name);
        write_wav_file(&path, samples, sample_rate)?;
        Ok(path)
    }

    /// Write the metadata log as `metadata.csv` in the results directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_metadata_log(&self, entries: &[SegmentLogEntry]) -> Result<PathBuf> {
        self.ensure_output_dir()?;
        let path = self.output_dir.join(METADATA_FILE_NAME);

        let mut writer = csv::Writer::from_path(&path).map_err(|e| Error::MetadataWriteFailed {
            path: path.clone(),
            source: Box::new(e),
        })?;

        for entry in entries {
            writer
                .serialize(entry)
                .map_err(|e| Error::MetadataWriteFailed {
                    path: path.clone(),
                    source: Box::new(e),
                })?;
        }

        writer.flush().map_err(|e| Error::MetadataWriteFailed {
            path: path.clone(),
            source: Box::new(e),
        })?;

        Ok(path)
    }
}

/// Write samples to a WAV file, converting f32 to i16.
fn write_wav_file(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = HoundWriter::create(path, spec).map_err(|e| Error::WavWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    for &sample in samples {
        #[allow(clippy::cast_possible_truncation)]
        let sample_i16 = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| Error::WavWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    writer.finalize().map_err(|e| Error::WavWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
