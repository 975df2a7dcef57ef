//! Split command execution.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::constants::{
    ANNOTATION_EXTENSION, AUDIO_EXTENSION, MILON_FILE_NAME, RESULTS_DIR_NAME, TARGET_SAMPLE_RATE,
};
use crate::error::{Error, Result};
use crate::milon::Milon;

use super::{SegmentExtractor, SegmentLogEntry, SegmentWriter, parse_annotation_file};

/// Options for a split run.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Directory holding paired audio and annotation files.
    pub input_dir: PathBuf,
    /// Lookup-table path; defaults to `milon.txt` inside the input directory.
    pub milon_path: Option<PathBuf>,
    /// Results directory; defaults to `results` inside the input directory.
    pub output_dir: Option<PathBuf>,
    /// Whether segments and the metadata log are written to disk.
    pub save_files: bool,
    /// Abort on the first per-file failure instead of continuing.
    pub fail_fast: bool,
    /// Show a per-file progress bar.
    pub progress: bool,
}

/// One extracted segment: its new file name and decoded samples.
#[derive(Debug, Clone)]
pub struct ExtractedSegment {
    /// Name in the form `{species_id}_{index}_{original_file_name}`.
    pub file_name: String,
    /// Mono samples at the target rate.
    pub samples: Vec<f32>,
}

/// A label no milon column matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnidentifiedLabel {
    /// Source file base name, without extension.
    pub file: String,
    /// 1-based index of the label within its annotation file.
    pub index: usize,
    /// Raw label text.
    pub label: String,
}

/// A matched label whose time span is empty or inverted.
#[derive(Debug, Clone)]
pub struct RejectedSpan {
    /// Source file base name, without extension.
    pub file: String,
    /// 1-based index of the label within its annotation file.
    pub index: usize,
    /// Raw label text.
    pub label: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

/// Everything a split run produced.
#[derive(Debug, Default)]
pub struct SplitOutcome {
    /// Extracted segments in processing order.
    pub segments: Vec<ExtractedSegment>,
    /// Labels no milon column matched.
    pub unidentified: Vec<UnidentifiedLabel>,
    /// Matched labels rejected for an empty or inverted time span.
    pub rejected: Vec<RejectedSpan>,
    /// Files processed to completion.
    pub files_processed: usize,
    /// Files skipped after a per-file failure.
    pub files_failed: usize,
}

/// Run a split over a directory of paired audio and annotation files.
///
/// Decodes each audio file once at the target rate, resolves every label
/// through the milon, and slices matched spans into the returned segment
/// collection. The results directory is created up front whether or not
/// `save_files` is set; segments and the metadata log are only written
/// when it is.
///
/// # Errors
///
/// Returns an error if the input directory or milon cannot be used, if no
/// audio files are found, or, with `fail_fast`, on the first per-file
/// failure. Per-file failures are otherwise logged and counted in the
/// outcome.
pub fn run_split(options: &SplitOptions) -> Result<SplitOutcome> {
    if !options.input_dir.is_dir() {
        return Err(Error::InputDirNotFound {
            path: options.input_dir.clone(),
        });
    }

    let milon_path = options
        .milon_path
        .clone()
        .unwrap_or_else(|| options.input_dir.join(MILON_FILE_NAME));
    let milon = Milon::load(&milon_path)?;
    info!(
        "Loaded lookup table with {} species from {}",
        milon.len(),
        milon_path.display()
    );

    run_split_with(&milon, options)
}

/// Run a split with an already-loaded lookup table.
///
/// Same contract as [`run_split`], for callers that built or cached the
/// milon themselves.
///
/// # Errors
///
/// See [`run_split`].
pub fn run_split_with(milon: &Milon, options: &SplitOptions) -> Result<SplitOutcome> {
    if !options.input_dir.is_dir() {
        return Err(Error::InputDirNotFound {
            path: options.input_dir.clone(),
        });
    }

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| options.input_dir.join(RESULTS_DIR_NAME));
    let writer = SegmentWriter::new(output_dir);
    writer.ensure_output_dir()?;

    let audio_files = collect_audio_files(&options.input_dir)?;
    info!("Found {} audio file(s) to process", audio_files.len());

    let extractor = SegmentExtractor::new(TARGET_SAMPLE_RATE);
    let pb = create_progress_bar(audio_files.len(), options.progress);

    let mut outcome = SplitOutcome::default();
    let mut log_entries: Vec<SegmentLogEntry> = Vec::new();

    for audio_path in &audio_files {
        pb.set_message(
            audio_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned(),
        );

        match process_recording(
            audio_path,
            milon,
            &extractor,
            &writer,
            options.save_files,
            &mut outcome,
            &mut log_entries,
        ) {
            Ok(()) => outcome.files_processed += 1,
            Err(e) => {
                if options.fail_fast {
                    pb.finish_with_message("failed");
                    return Err(e);
                }
                warn!("Failed to process {}: {e}", audio_path.display());
                outcome.files_failed += 1;
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("done");

    if options.save_files {
        match writer.write_metadata_log(&log_entries) {
            Ok(path) => debug!("Wrote segment metadata to {}", path.display()),
            Err(e) => warn!("Failed to write segment metadata: {e}"),
        }
    }

    Ok(outcome)
}

/// Execute the split command from parsed CLI arguments.
///
/// # Errors
///
/// Returns an error if the split run fails.
pub fn execute(cli: &Cli) -> Result<()> {
    let options = SplitOptions {
        input_dir: cli.directory.clone(),
        milon_path: cli.milon.clone(),
        output_dir: cli.output.clone(),
        save_files: cli.save,
        fail_fast: cli.fail_fast,
        progress: !cli.quiet && !cli.no_progress,
    };

    let outcome = run_split(&options)?;

    print_unidentified_report(&outcome.unidentified);
    print_rejected_report(&outcome.rejected);

    info!(
        "Complete: {} segments from {} file(s), {} failed, {} unidentified label(s)",
        outcome.segments.len(),
        outcome.files_processed,
        outcome.files_failed,
        outcome.unidentified.len()
    );

    Ok(())
}

/// Process one audio file and its annotation file.
fn process_recording(
    audio_path: &Path,
    milon: &Milon,
    extractor: &SegmentExtractor,
    writer: &SegmentWriter,
    save_files: bool,
    outcome: &mut SplitOutcome,
    log_entries: &mut Vec<SegmentLogEntry>,
) -> Result<()> {
    let file_name = audio_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let base_name = audio_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();

    let annotation_path = audio_path.with_extension(ANNOTATION_EXTENSION);
    if !annotation_path.exists() {
        return Err(Error::AnnotationNotFound {
            audio_path: audio_path.to_path_buf(),
            annotation_path,
        });
    }

    let entries = parse_annotation_file(&annotation_path)?;
    if entries.is_empty() {
        debug!("No labels in {}", annotation_path.display());
        return Ok(());
    }

    let samples = extractor.load_source(audio_path)?;

    for (j, entry) in entries.iter().enumerate() {
        let index = j + 1;

        let Some(species_id) = milon.resolve(&entry.label) else {
            outcome.unidentified.push(UnidentifiedLabel {
                file: base_name.clone(),
                index,
                label: entry.label.clone(),
            });
            continue;
        };

        if entry.end <= entry.start {
            warn!(
                "Rejected span {}..{} for '{}' #{index} in {}",
                entry.start, entry.end, entry.label, base_name
            );
            outcome.rejected.push(RejectedSpan {
                file: base_name.clone(),
                index,
                label: entry.label.clone(),
                start: entry.start,
                end: entry.end,
            });
            continue;
        }

        let segment = extractor.slice(&samples, entry.start, entry.end);
        let new_file_name = format!("{species_id}_{index}_{file_name}");

        if save_files {
            match writer.write_segment(&new_file_name, &segment, extractor.target_rate()) {
                Ok(path) => debug!("Wrote {}", path.display()),
                Err(e) => warn!("Failed to write segment '{new_file_name}': {e}"),
            }
        }

        log_entries.push(SegmentLogEntry {
            file: base_name.clone(),
            label: entry.label.clone(),
            index,
            start: entry.start,
            end: entry.end,
            freq_min: entry.freq.map(|f| f.low),
            freq_max: entry.freq.map(|f| f.high),
        });

        outcome.segments.push(ExtractedSegment {
            file_name: new_file_name,
            samples: segment,
        });
    }

    Ok(())
}

/// List audio files in the input directory, sorted by name.
fn collect_audio_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(AUDIO_EXTENSION))
        })
        .collect();

    if files.is_empty() {
        return Err(Error::NoAudioFiles {
            path: dir.to_path_buf(),
            extension: AUDIO_EXTENSION.to_string(),
        });
    }

    files.sort();
    Ok(files)
}

#[allow(clippy::cast_possible_truncation)]
fn create_progress_bar(len: usize, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    // Template is hardcoded and known to be valid
    #[allow(clippy::expect_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({msg})")
            .expect("valid progress template")
            .progress_chars("#>-"),
    );
    pb
}

fn print_unidentified_report(unidentified: &[UnidentifiedLabel]) {
    if unidentified.is_empty() {
        return;
    }
    println!("=====  unidentified labels  =====");
    println!("{:<28} {:>5}  label", "file name", "index");
    for entry in unidentified {
        println!("{:<28} {:>5}  {}", entry.file, entry.index, entry.label);
    }
    println!("=================================");
}

fn print_rejected_report(rejected: &[RejectedSpan]) {
    if rejected.is_empty() {
        return;
    }
    println!("=====  rejected time spans  =====");
    println!("{:<28} {:>5}  span", "file name", "index");
    for entry in rejected {
        println!(
            "{:<28} {:>5}  {} [{}..{}]",
            entry.file, entry.index, entry.label, entry.start, entry.end
        );
    }
    println!("=================================");
}
