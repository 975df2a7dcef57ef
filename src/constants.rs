//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for user-facing messages.
pub const APP_NAME: &str = "labelcut";

/// Target sample rate for extracted segments in Hz.
///
/// Source audio decoded at a different rate is resampled to this rate
/// before slicing, so every segment in a run shares one rate.
pub const TARGET_SAMPLE_RATE: u32 = 44_100;

/// Default lookup-table file name, resolved inside the input directory
/// when no explicit path is given.
pub const MILON_FILE_NAME: &str = "milon.txt";

/// Name of the results directory created under the input directory.
pub const RESULTS_DIR_NAME: &str = "results";

/// Name of the per-segment metadata file written into the results directory.
pub const METADATA_FILE_NAME: &str = "metadata.csv";

/// First field of the second physical row in spectral-selection annotation
/// files. Audacity writes a lone backslash there on frequency rows.
pub const SPECTRAL_MARKER: &str = "\\";

/// Audio file extension the input directory is scanned for.
pub const AUDIO_EXTENSION: &str = "wav";

/// Annotation file extension paired with each audio file.
pub const ANNOTATION_EXTENSION: &str = "txt";
