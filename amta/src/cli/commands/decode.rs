//! CLI command for decoding AMTA containers

use std::path::Path;
use std::time::Instant;

use crate::batch::{FileOutcome, batch_decode};
use crate::cli::progress::{GEAR, print_done, print_step, simple_bar};
use crate::config::BatchOptions;

/// Decode a file or directory tree into `options.output_dir`
pub fn execute(input: &Path, options: &BatchOptions, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();

    if !quiet {
        print_step(
            1,
            1,
            &GEAR,
            &format!(
                "Decoding {} into {}...",
                input.display(),
                options.output_dir.display()
            ),
        );
    }

    let pb = simple_bar(0, "Decoding", quiet);
    let result = batch_decode(input, options, |progress| {
        pb.set_length(progress.total as u64);
        pb.set_position(progress.current as u64);
        if let Some(ref name) = progress.current_file {
            pb.set_message(name.clone());
        }
    })?;
    pb.finish_and_clear();

    println!();
    println!("Decoding complete:");
    println!("  Decoded: {}", result.decoded);
    println!("  Skipped: {}", result.skipped);
    println!("  Failed: {}", result.failed);

    if result.failed > 0 {
        println!();
        println!("Failures:");
        for outcome in &result.outcomes {
            if let FileOutcome::Failed { input, error } = outcome {
                println!("  {}: {error}", input.display());
            }
        }
    }

    if !quiet {
        print_done(start.elapsed());
    }

    Ok(())
}
