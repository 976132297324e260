//! Batch decoding options
//!
//! Only the batch driver reads these. The decode pipeline itself takes the
//! size ceiling as a plain argument and nothing else.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::formats::amta::MAX_INFLATED_SIZE;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "inflated_files";

/// Default minimum body size; files whose `len - 8` is smaller are skipped.
pub const DEFAULT_MIN_BODY_SIZE: u64 = 8;

/// Options for a batch decode run.
///
/// Can be built in code or loaded from a TOML file where every key is optional:
///
/// ```toml
/// verbose = true
/// output_dir = "out"
/// keep_intermediate = true
/// min_body_size = 8
/// max_inflated_size = 104857601
/// ```
///
/// # Example
///
/// ```
/// use amta::config::BatchOptions;
///
/// let options = BatchOptions::new()
///     .with_output_dir("out")
///     .with_keep_intermediate(true);
/// assert!(!options.verbose);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchOptions {
    /// Log every file processed and every skip reason
    pub verbose: bool,

    /// Root directory for decoded payloads (created if missing)
    pub output_dir: PathBuf,

    /// Also write the de-obfuscated LZO stream as `<name>.lzo` next to each payload
    pub keep_intermediate: bool,

    /// Files with fewer body bytes than this are skipped without being read
    pub min_body_size: u64,

    /// Exclusive ceiling for the declared inflated size
    pub max_inflated_size: u32,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchOptions {
    /// Create options with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            verbose: false,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            keep_intermediate: false,
            min_body_size: DEFAULT_MIN_BODY_SIZE,
            max_inflated_size: MAX_INFLATED_SIZE,
        }
    }

    /// Load options from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse options from TOML text.
    ///
    /// # Errors
    /// Returns an error for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Set verbose logging.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Set whether to keep the intermediate LZO stream.
    #[must_use]
    pub fn with_keep_intermediate(mut self, keep: bool) -> Self {
        self.keep_intermediate = keep;
        self
    }

    /// Set the minimum body size.
    #[must_use]
    pub fn with_min_body_size(mut self, min_body_size: u64) -> Self {
        self.min_body_size = min_body_size;
        self
    }

    /// Set the declared inflated size ceiling.
    #[must_use]
    pub fn with_max_inflated_size(mut self, max_inflated_size: u32) -> Self {
        self.max_inflated_size = max_inflated_size;
        self
    }
}
