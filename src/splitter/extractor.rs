//! Segment extraction from source audio.

use std::path::Path;

use tracing::debug;

use crate::audio::{decode_audio_file, resample};
use crate::error::Result;

/// Extracts time-bounded segments from source recordings.
///
/// A source file is decoded once and resampled to the target rate; the
/// resampled signal is then sliced per label.
pub struct SegmentExtractor {
    target_rate: u32,
}

impl SegmentExtractor {
    /// Create an extractor producing segments at the given sample rate.
    #[must_use]
    pub fn new(target_rate: u32) -> Self {
        Self { target_rate }
    }

    /// Target sample rate of extracted segments in Hz.
    #[must_use]
    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    /// Decode a source file to mono f32 at the target rate.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding or resampling fails.
    pub fn load_source(&self, path: &Path) -> Result<Vec<f32>> {
        let decoded = decode_audio_file(path)?;
        if decoded.sample_rate != self.target_rate {
            debug!(
                "resampling '{}' from {} Hz to {} Hz",
                path.display(),
                decoded.sample_rate,
                self.target_rate
            );
        }
        resample(decoded.samples, decoded.sample_rate, self.target_rate)
    }

    /// Slice the span `[start, end)` seconds out of a loaded signal.
    ///
    /// Frame indices are rounded to the nearest sample and clamped to the
    /// signal length, so spans reaching past the end of the recording are
    /// shortened rather than rejected.
    #[must_use]
    pub fn slice(&self, samples: &[f32], start: f64, end: f64) -> Vec<f32> {
        let start_frame = self.frame_at(start).min(samples.len());
        let end_frame = self.frame_at(end).min(samples.len());
        samples[start_frame..end_frame.max(start_frame)].to_vec()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn frame_at(&self, seconds: f64) -> usize {
        (seconds * f64::from(self.target_rate)).round().max(0.0) as usize
    }
}
