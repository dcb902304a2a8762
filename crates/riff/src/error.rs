use thiserror::Error;

use crate::riff::FourCC;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not a RIFF file (found {found})")]
    NotARiffFile { found: FourCC },

    #[error("unexpected end of input: wanted {wanted} bytes, {available} available")]
    TruncatedInput { wanted: u64, available: u64 },

    #[error("cannot skip {wanted} bytes at offset {offset} (stream length {length})")]
    SeekError { offset: u64, wanted: u64, length: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
