use std::io::{Read, Seek};

use crate::error::Result;
use crate::reader::ByteReader;
use crate::riff::{ChunkHeader, FourCC, HEADER_LEN};

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What the walker does with a LIST once its subtype is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Descend,
    /// Stop walking the container holding this list. The list payload is left unread.
    Stop,
}

/// How the walk of one container ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    /// A child did not fit in the remaining budget.
    Inconsistent,
    /// A visitor asked to stop at a LIST.
    Stopped,
}

/// Callbacks for [`Walker::walk`]. `depth` is the number of enclosing LISTs.
pub trait Visitor<R> {
    fn list(&mut self, _depth: usize, _header: &ChunkHeader, _list_type: FourCC) -> ListAction {
        ListAction::Descend
    }

    /// The reader is positioned at the start of the payload. Whatever the
    /// visitor leaves unread, including the pad byte, is skipped afterwards.
    fn leaf(
        &mut self,
        _depth: usize,
        _header: &ChunkHeader,
        _reader: &mut ByteReader<R>,
    ) -> Result<()> {
        Ok(())
    }

    /// A chunk (leaf or LIST) at `depth` has been fully consumed.
    fn chunk_done(&mut self, _depth: usize) {}

    /// The chunk just handled needed `needed` bytes but only `budget` remained.
    fn inconsistent(&mut self, _depth: usize, _budget: u64, _needed: u64) {}

    /// A LIST was skipped because descending would exceed the depth limit.
    fn depth_exceeded(&mut self, _depth: usize, _header: &ChunkHeader, _list_type: FourCC) {}
}

/// Recursive descent over RIFF/LIST chunks with byte accounting.
#[derive(Debug, Clone, Copy)]
pub struct Walker {
    max_depth: usize,
}

impl Default for Walker {
    fn default() -> Walker {
        Walker::new(DEFAULT_MAX_DEPTH)
    }
}

impl Walker {
    pub fn new(max_depth: usize) -> Walker {
        Walker { max_depth }
    }

    /// Walk `budget` bytes of chunks starting at the reader's position.
    pub fn walk<R, V>(
        &self,
        reader: &mut ByteReader<R>,
        budget: u64,
        visitor: &mut V,
    ) -> Result<Outcome>
    where
        R: Read + Seek,
        V: Visitor<R>,
    {
        self.walk_level(reader, budget, 0, visitor)
    }

    fn walk_level<R, V>(
        &self,
        reader: &mut ByteReader<R>,
        mut budget: u64,
        depth: usize,
        visitor: &mut V,
    ) -> Result<Outcome>
    where
        R: Read + Seek,
        V: Visitor<R>,
    {
        while budget > 0 {
            let header = ChunkHeader::decode(reader)?;
            let needed = header.consumed();
            let end = reader.position() + header.padded_size();
            log::debug!(
                "{}{} {} at {}",
                "  ".repeat(depth),
                header.tag,
                header.declared_size,
                reader.position() - HEADER_LEN
            );

            if header.tag == FourCC::LIST {
                if header.declared_size < 4 {
                    // no room for the subtype
                    inconsistent::<R, V>(visitor, depth + 1, header.declared_size as u64, 4);
                } else {
                    let list_type = FourCC(reader.read_array()?);
                    match visitor.list(depth, &header, list_type) {
                        ListAction::Stop => {
                            log::debug!("stop at LIST {}", list_type);
                            return Ok(Outcome::Stopped);
                        }
                        ListAction::Descend if depth + 1 > self.max_depth => {
                            log::warn!(
                                "LIST {} nested deeper than {}, skipped",
                                list_type,
                                self.max_depth
                            );
                            visitor.depth_exceeded(depth, &header, list_type);
                        }
                        ListAction::Descend => {
                            let nested = header.declared_size as u64 - 4;
                            self.walk_level(reader, nested, depth + 1, visitor)?;
                        }
                    }
                }
            } else {
                visitor.leaf(depth, &header, reader)?;
            }

            realign(reader, end)?;
            visitor.chunk_done(depth);

            // the chunk is handled even when it overflows its container
            if budget < needed {
                return Ok(inconsistent::<R, V>(visitor, depth, budget, needed));
            }
            budget -= needed;
        }

        Ok(Outcome::Complete)
    }
}

fn inconsistent<R, V>(visitor: &mut V, depth: usize, budget: u64, needed: u64) -> Outcome
where
    V: Visitor<R>,
{
    log::warn!("inconsistent sizes {} < {}", budget, needed);
    visitor.inconsistent(depth, budget, needed);
    Outcome::Inconsistent
}

fn realign<R: Read + Seek>(reader: &mut ByteReader<R>, end: u64) -> Result<()> {
    let position = reader.position();
    if position > end {
        log::warn!("payload over-read by {} bytes", position - end);
        return Ok(());
    }
    reader.skip(end - position)
}
