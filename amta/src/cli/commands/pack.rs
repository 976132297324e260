//! CLI command for building AMTA containers

use std::path::Path;

use crate::cli::progress::{PACKAGE, print_step};
use crate::config::BatchOptions;
use crate::formats::amta::encode_container_with_limit;

/// Compress and wrap `source` into an AMTA container at `destination`
pub fn execute(source: &Path, destination: &Path, options: &BatchOptions) -> anyhow::Result<()> {
    print_step(1, 1, &PACKAGE, &format!("Packing {}...", source.display()));

    let payload = std::fs::read(source)?;
    let container = encode_container_with_limit(&payload, options.max_inflated_size)?;

    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(destination, &container)?;

    println!(
        "Wrote {} ({} bytes, {} inflated)",
        destination.display(),
        container.len(),
        payload.len()
    );

    Ok(())
}
