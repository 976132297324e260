//! Command execution implementations

use super::Commands;
use super::{decode, inspect, pack};
use crate::config::BatchOptions;

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self, options: BatchOptions) -> anyhow::Result<()> {
        match self {
            Commands::Decode {
                input,
                output,
                keep_lzo,
                min_body_size,
                max_inflated_size,
                quiet,
            } => {
                let mut options = options;
                if let Some(output) = output {
                    options.output_dir.clone_from(output);
                }
                options.keep_intermediate |= *keep_lzo;
                if let Some(min) = min_body_size {
                    options.min_body_size = *min;
                }
                if let Some(max) = max_inflated_size {
                    options.max_inflated_size = *max;
                }
                decode::execute(input, &options, *quiet)
            }
            Commands::Inspect { path, json } => inspect::execute(path, &options, *json),
            Commands::Pack {
                source,
                destination,
            } => pack::execute(source, destination, &options),
        }
    }
}
