//! Splitting labeled recordings into per-species audio segments.
//!
//! This module parses Audacity label files, resolves labels through the
//! milon, slices the matching spans out of the source audio, and writes
//! the results.

pub mod command;
mod extractor;
mod parser;
mod writer;

pub use command::{
    ExtractedSegment, RejectedSpan, SplitOptions, SplitOutcome, UnidentifiedLabel, run_split,
    run_split_with,
};
pub use extractor::SegmentExtractor;
pub use parser::{FreqBand, LabelEntry, parse_annotation_file};
pub use writer::{SegmentLogEntry, SegmentWriter};
