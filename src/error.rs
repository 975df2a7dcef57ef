//! Error types for labelcut.

/// Result type alias for labelcut operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for labelcut.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input directory does not exist or is not a directory.
    #[error("input directory does not exist: {path}")]
    InputDirNotFound {
        /// Path that was expected to be a directory.
        path: std::path::PathBuf,
    },

    /// No audio files found in the input directory.
    #[error("no .{extension} files found in '{path}'")]
    NoAudioFiles {
        /// Directory that was scanned.
        path: std::path::PathBuf,
        /// Extension that was scanned for.
        extension: String,
    },

    /// Failed to read the lookup-table file.
    #[error("failed to read lookup table '{path}'")]
    MilonRead {
        /// Path to the lookup-table file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Lookup-table contents could not be parsed.
    #[error("invalid lookup table '{path}': {message}")]
    MilonParse {
        /// Path to the lookup-table file.
        path: std::path::PathBuf,
        /// Description of the parse failure.
        message: String,
    },

    /// Annotation file for an audio file is missing.
    #[error("annotation file not found for '{audio_path}', expected '{annotation_path}'")]
    AnnotationNotFound {
        /// Path to the audio file.
        audio_path: std::path::PathBuf,
        /// Expected path to the annotation file.
        annotation_path: std::path::PathBuf,
    },

    /// Failed to read an annotation file.
    #[error("failed to read annotation file '{path}'")]
    AnnotationRead {
        /// Path to the annotation file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Annotation file contents do not match either recognized layout.
    #[error("invalid annotation file '{path}': {message}")]
    InvalidAnnotationFormat {
        /// Path to the annotation file.
        path: std::path::PathBuf,
        /// Description of the format error.
        message: String,
    },

    /// Failed to open an audio file.
    #[error("failed to open audio file '{path}'")]
    AudioOpen {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to decode audio.
    #[error("failed to decode audio from '{path}'")]
    AudioDecode {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No audio tracks found in a media file.
    #[error("no audio tracks found in '{path}'")]
    NoAudioTracks {
        /// Path to the audio file.
        path: std::path::PathBuf,
    },

    /// Failed to resample audio.
    #[error("failed to resample audio: {reason}")]
    Resample {
        /// Description of the resampling failure.
        reason: String,
    },

    /// Failed to create the results directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a segment WAV file.
    #[error("failed to write WAV file '{path}'")]
    WavWriteFailed {
        /// Path to the WAV file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: hound::Error,
    },

    /// Failed to write the segment metadata file.
    #[error("failed to write metadata file '{path}'")]
    MetadataWriteFailed {
        /// Path to the metadata file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
