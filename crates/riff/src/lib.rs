pub mod error;
pub mod reader;
pub mod riff;
pub mod walk;

pub use error::{Error, Result};
pub use reader::ByteReader;
pub use riff::{pad, Chunk, ChunkHeader, FourCC, RiffHeader, HEADER_LEN};
pub use walk::{ListAction, Outcome, Visitor, Walker, DEFAULT_MAX_DEPTH};
