//! CLI command for inspecting AMTA headers

use std::path::Path;

use crate::config::BatchOptions;
use crate::formats::amta::AmtaDecoder;

/// Print the header summary of an AMTA file
pub fn execute(path: &Path, options: &BatchOptions, json: bool) -> anyhow::Result<()> {
    let raw = std::fs::read(path)?;
    let info = AmtaDecoder::new()
        .with_max_inflated_size(options.max_inflated_size)
        .inspect(&raw)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("AMTA container: {}", path.display());
    println!("  Inflated size: {} bytes", info.inflated_size);
    println!("  Body size: {} bytes", info.body_size);
    match info.first_stream_byte {
        Some(byte) => println!("  First stream byte: 0x{byte:02x}"),
        None => println!("  First stream byte: (empty body)"),
    }

    Ok(())
}
