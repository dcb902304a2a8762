use std::path::PathBuf;

use riff::DEFAULT_MAX_DEPTH;

use crate::args::Args;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Report every chunk and turn off the dialect heuristics.
    pub trace: bool,
    pub max_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> ExtractOptions {
        ExtractOptions {
            trace: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub path: PathBuf,
    pub extract: ExtractOptions,
    pub color: bool,
    pub log_level: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Config {
        Config {
            path: args.path,
            extract: ExtractOptions {
                trace: args.tree,
                max_depth: args.max_depth,
            },
            color: !args.no_color,
            log_level: args.log_level,
        }
    }
}
