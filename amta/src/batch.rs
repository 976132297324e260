//! Batch AMTA decoding
//!
//! This module walks a file or directory tree, decodes every candidate file
//! in parallel and writes the payloads under an output directory that mirrors
//! the input layout. A failing file never stops the batch.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::compression::Decompressor;
use crate::error::{Error, Result};
use crate::formats::amta::{AmtaDecoder, HEADER_SIZE};

pub use crate::config::BatchOptions;

/// Progress update for a batch run
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Files started so far (1-based)
    pub current: usize,
    /// Total number of candidate files
    pub total: usize,
    /// Path of the file being processed, relative to the input root
    pub current_file: Option<String>,
}

/// What happened to a single input file
#[derive(Debug)]
pub enum FileOutcome {
    /// Payload written to `output`
    Decoded {
        input: PathBuf,
        output: PathBuf,
        inflated_size: usize,
    },
    /// Not an AMTA container, or too small to be one
    Skipped { input: PathBuf, reason: String },
    /// Looked like an AMTA container but could not be decoded or written
    Failed { input: PathBuf, error: Error },
}

impl FileOutcome {
    /// The input file this outcome refers to.
    pub fn input(&self) -> &Path {
        match self {
            FileOutcome::Decoded { input, .. }
            | FileOutcome::Skipped { input, .. }
            | FileOutcome::Failed { input, .. } => input,
        }
    }
}

/// Result of a batch decode
#[derive(Debug, Default)]
pub struct BatchDecodeResult {
    /// Number of payloads written
    pub decoded: usize,
    /// Number of files skipped (wrong magic or too small)
    pub skipped: usize,
    /// Number of files that failed
    pub failed: usize,
    /// Per-file outcomes: candidates in input order, then unreadable entries
    pub outcomes: Vec<FileOutcome>,
}

/// Find every regular file under `input`.
///
/// A file path yields just that file; a directory is walked recursively.
/// Entries the walk cannot reach are left out; see [`batch_decode`] for a
/// driver that reports them.
///
/// # Errors
/// Returns [`Error::InputNotFound`] if `input` does not exist.
pub fn find_candidate_files<P: AsRef<Path>>(input: P) -> Result<Vec<PathBuf>> {
    let (files, unreadable) = walk_input(input.as_ref())?;
    for (path, error) in &unreadable {
        tracing::warn!("Cannot read '{}': {error}", path.display());
    }
    Ok(files)
}

/// Walk `input`, splitting candidates from entries that could not be read.
fn walk_input(input: &Path) -> Result<(Vec<PathBuf>, Vec<(PathBuf, Error)>)> {
    if !input.exists() {
        return Err(Error::InputNotFound {
            path: input.to_path_buf(),
        });
    }
    if input.is_file() {
        return Ok((vec![input.to_path_buf()], Vec::new()));
    }

    let mut files = Vec::new();
    let mut unreadable: Vec<(PathBuf, Error)> = Vec::new();
    for entry in WalkDir::new(input).follow_links(true) {
        match entry {
            Ok(entry) if entry.path().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(err) => {
                let path = err.path().unwrap_or(input).to_path_buf();
                unreadable.push((path, err.into()));
            }
        }
    }

    files.sort();
    Ok((files, unreadable))
}

/// Decode every candidate file under `input` with the LZO decoder.
///
/// # Arguments
/// * `input` - A single file or a directory to walk
/// * `options` - Output location, size limits and diagnostics
/// * `progress` - Callback for progress updates
///
/// # Errors
/// Returns an error if `input` does not exist or the output directory cannot
/// be created. Per-file failures, including entries the directory walk
/// cannot read, are reported in the result instead.
pub fn batch_decode<P, F>(
    input: P,
    options: &BatchOptions,
    progress: F,
) -> Result<BatchDecodeResult>
where
    P: AsRef<Path>,
    F: Fn(&BatchProgress) + Send + Sync,
{
    let decoder = AmtaDecoder::new().with_max_inflated_size(options.max_inflated_size);
    batch_decode_with(input, options, &decoder, progress)
}

/// Decode every candidate file under `input` with a caller-supplied decoder.
///
/// # Errors
/// See [`batch_decode`].
pub fn batch_decode_with<P, D, F>(
    input: P,
    options: &BatchOptions,
    decoder: &AmtaDecoder<D>,
    progress: F,
) -> Result<BatchDecodeResult>
where
    P: AsRef<Path>,
    D: Decompressor,
    F: Fn(&BatchProgress) + Send + Sync,
{
    let input = input.as_ref();
    let (files, unreadable) = walk_input(input)?;

    if !options.output_dir.exists() {
        std::fs::create_dir_all(&options.output_dir)?;
    }

    let source_base = if input.is_dir() {
        input
    } else {
        input.parent().unwrap_or(Path::new(""))
    };

    let mut result = decode_files(&files, source_base, options, decoder, progress);
    for (input, error) in unreadable {
        tracing::warn!("Failed to read '{}': {error}", input.display());
        result.failed += 1;
        result.outcomes.push(FileOutcome::Failed { input, error });
    }
    Ok(result)
}

/// Decode a list of files in parallel.
///
/// Outputs are written to `options.output_dir` joined with each file's path
/// relative to `source_base`.
pub fn decode_files<D, F>(
    files: &[PathBuf],
    source_base: &Path,
    options: &BatchOptions,
    decoder: &AmtaDecoder<D>,
    progress: F,
) -> BatchDecodeResult
where
    D: Decompressor,
    F: Fn(&BatchProgress) + Send + Sync,
{
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|path| {
            let relative_path = path.strip_prefix(source_base).unwrap_or(path.as_path());

            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&BatchProgress {
                current,
                total,
                current_file: Some(relative_path.to_string_lossy().to_string()),
            });

            decode_file(path, relative_path, options, decoder)
        })
        .collect();

    let mut result = BatchDecodeResult::default();
    for outcome in &outcomes {
        match outcome {
            FileOutcome::Decoded { .. } => result.decoded += 1,
            FileOutcome::Skipped { .. } => result.skipped += 1,
            FileOutcome::Failed { .. } => result.failed += 1,
        }
    }
    result.outcomes = outcomes;
    result
}

/// Decode one file and write its payload.
fn decode_file<D: Decompressor>(
    path: &Path,
    relative_path: &Path,
    options: &BatchOptions,
    decoder: &AmtaDecoder<D>,
) -> FileOutcome {
    let input = path.to_path_buf();

    let file_size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            return FileOutcome::Failed {
                input,
                error: e.into(),
            };
        }
    };
    let data_size = file_size.saturating_sub(HEADER_SIZE as u64);

    if options.verbose {
        tracing::info!("Processing file {}...", path.display());
        tracing::info!("Data size: {data_size} (bytes)");
    }

    if data_size < options.min_body_size {
        let reason = format!("file size is too small ({file_size} bytes)");
        if options.verbose {
            tracing::info!("Skipping file '{}': {reason}", path.display());
        }
        return FileOutcome::Skipped { input, reason };
    }

    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(e) => {
            return FileOutcome::Failed {
                input,
                error: e.into(),
            };
        }
    };

    let output = options.output_dir.join(relative_path);

    let inflated = decoder.decode_inspecting(&raw, |stream| {
        if options.keep_intermediate {
            let lzo_path = intermediate_path(&output);
            if options.verbose {
                tracing::info!(
                    "Writing decompressed lzo file to '{}'...",
                    lzo_path.display()
                );
            }
            if let Err(e) = write_output(&lzo_path, stream) {
                tracing::warn!("Failed to write '{}': {e}", lzo_path.display());
            }
        }
    });

    let payload = match inflated {
        Ok(payload) => payload,
        Err(e) if e.is_skippable() => {
            if options.verbose {
                tracing::info!("Skipping file '{}': {e}", path.display());
            }
            return FileOutcome::Skipped {
                input,
                reason: e.to_string(),
            };
        }
        Err(e) => {
            tracing::warn!("Failed to decode '{}': {e}", path.display());
            return FileOutcome::Failed {
                input,
                error: e.into(),
            };
        }
    };

    if options.verbose {
        tracing::info!("Inflated size: {} (bytes)", payload.len());
        tracing::info!("Writing decompressed data to '{}'...", output.display());
    }

    match write_output(&output, &payload) {
        Ok(()) => FileOutcome::Decoded {
            input,
            output,
            inflated_size: payload.len(),
        },
        Err(e) => FileOutcome::Failed {
            input,
            error: e.into(),
        },
    }
}

/// Path of the diagnostic LZO stream for a payload path: `<name>.lzo`.
pub fn intermediate_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".lzo");
    output.with_file_name(name)
}

fn write_output(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intermediate_path() {
        assert_eq!(
            intermediate_path(Path::new("out/sub/voice.amt")),
            PathBuf::from("out/sub/voice.amt.lzo")
        );
        assert_eq!(intermediate_path(Path::new("noext")), PathBuf::from("noext.lzo"));
    }

    #[test]
    fn test_missing_input() {
        let err = find_candidate_files("/definitely/not/here/amta").unwrap_err();
        assert!(matches!(err, Error::InputNotFound { .. }));
    }

    #[test]
    fn test_outcome_input() {
        let outcome = FileOutcome::Skipped {
            input: PathBuf::from("a.bin"),
            reason: "nope".into(),
        };
        assert_eq!(outcome.input(), Path::new("a.bin"));
    }
}
