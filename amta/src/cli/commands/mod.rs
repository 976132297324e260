use clap::Subcommand;
use std::path::PathBuf;

pub mod decode;
pub mod execute;
pub mod inspect;
pub mod pack;

#[derive(Subcommand)]
pub enum Commands {
    /// Decode AMTA containers (a single file or a directory tree)
    Decode {
        /// Input file or directory
        input: PathBuf,

        /// Output directory (default: `inflated_files`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the de-obfuscated LZO stream as <name>.lzo
        #[arg(long)]
        keep_lzo: bool,

        /// Skip files with fewer body bytes than this (default: 8)
        #[arg(long)]
        min_body_size: Option<u64>,

        /// Reject declared inflated sizes at or above this (default: 104857601)
        #[arg(long)]
        max_inflated_size: Option<u32>,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the header of an AMTA container
    Inspect {
        /// AMTA file
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Wrap a file into an AMTA container
    Pack {
        /// Source file
        #[arg(short, long)]
        source: PathBuf,

        /// Output AMTA file
        #[arg(short, long)]
        destination: PathBuf,
    },
}
