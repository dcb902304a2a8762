use std::path::PathBuf;

use clap::Parser;
use riff::DEFAULT_MAX_DEPTH;

#[derive(Parser, Debug)]
#[command(about, version)]
/// Extract the creation date of a RIFF file
pub struct Args {
    /// Print the chunk tree (disables the AVI shortcuts and IDIT capture)
    #[arg(short = 'd', long = "tree")]
    pub tree: bool,

    /// Do not colour the chunk tree
    #[arg(long)]
    pub no_color: bool,

    /// Deepest LIST nesting to descend into
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Input file path
    #[arg()]
    pub path: PathBuf,
}
