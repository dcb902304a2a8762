use std::fmt;
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::reader::ByteReader;

/// Tag plus little-endian size field.
pub const HEADER_LEN: u64 = 8;

/// Four-character code naming a chunk. Any four bytes are a legal tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const RIFF: FourCC = FourCC(*b"RIFF");
    pub const LIST: FourCC = FourCC(*b"LIST");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<&[u8; 4]> for FourCC {
    fn from(bytes: &[u8; 4]) -> FourCC {
        FourCC(*bytes)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.iter() {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({})", self)
    }
}

/// Round up to the WORD boundary required between chunks.
pub fn pad(size: u32) -> u64 {
    let size = size as u64;
    size + (size & 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: FourCC,
    /// Unpadded payload length.
    pub declared_size: u32,
}

impl ChunkHeader {
    pub fn decode<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<ChunkHeader> {
        let tag = FourCC(reader.read_array()?);
        let declared_size = reader.read_u32_le()?;
        Ok(ChunkHeader { tag, declared_size })
    }

    pub fn padded_size(&self) -> u64 {
        pad(self.declared_size)
    }

    /// Bytes this chunk takes out of its container, header included.
    pub fn consumed(&self) -> u64 {
        HEADER_LEN + self.padded_size()
    }
}

/// The 12-byte preamble of a RIFF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiffHeader {
    pub size: u32,
    pub form_type: FourCC,
}

impl RiffHeader {
    pub fn read<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<RiffHeader> {
        let header = ChunkHeader::decode(reader)?;
        if header.tag != FourCC::RIFF {
            return Err(Error::NotARiffFile { found: header.tag });
        }
        let form_type = FourCC(reader.read_array()?);

        Ok(RiffHeader {
            size: header.declared_size,
            form_type,
        })
    }

    /// Budget for the walk over the body; the form type is already consumed.
    pub fn body_budget(&self) -> u64 {
        (self.size as u64).saturating_sub(4)
    }
}

/// In-memory chunk tree, serializable back to RIFF bytes.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub id: FourCC,
    pub size: u32,
    pub form_type: Option<FourCC>,
    pub children: Vec<Chunk>,
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn list(form_type: &[u8; 4], children: Vec<Chunk>) -> Chunk {
        Self::list_with_id(b"LIST", form_type, children)
    }

    pub fn list_with_id(id: &[u8; 4], form_type: &[u8; 4], children: Vec<Chunk>) -> Chunk {
        let body: u64 = children.iter().map(Chunk::written_len).sum();
        Chunk {
            id: id.into(),
            size: (4 + body) as u32,
            form_type: Some(form_type.into()),
            children,
            data: Vec::new(),
        }
    }

    pub fn new(id: &[u8; 4], data: impl Into<Vec<u8>>) -> Chunk {
        let data = data.into();
        Chunk {
            id: id.into(),
            size: data.len() as u32,
            form_type: None,
            children: Vec::new(),
            data,
        }
    }

    /// Override the size field written to the header, leaving the content as is.
    pub fn with_declared_size(mut self, size: u32) -> Chunk {
        self.size = size;
        self
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.id.as_bytes());
        out.extend_from_slice(self.size.to_le_bytes().as_ref());

        match self.form_type {
            Some(form_type) => {
                out.extend_from_slice(form_type.as_bytes());
                for child in self.children.iter() {
                    child.write(out);
                }
            }
            None => {
                out.extend_from_slice(&self.data);
                // Odd size chunks are padded with a null byte
                if self.data.len() & 1 == 1 {
                    out.push(0);
                }
            }
        }
    }

    /// Bytes `write` emits for this chunk, regardless of the declared size.
    pub fn written_len(&self) -> u64 {
        let body = match self.form_type {
            Some(_) => 4 + self.children.iter().map(Chunk::written_len).sum::<u64>(),
            None => pad(self.data.len() as u32),
        };
        HEADER_LEN + body
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn test_pad() {
        assert_eq!(pad(0), 0);
        assert_eq!(pad(1), 2);
        assert_eq!(pad(10), 10);
        assert_eq!(pad(u32::MAX), u32::MAX as u64 + 1);
    }

    proptest! {
        #[test]
        fn pad_rounds_up_to_even(x in any::<u32>()) {
            let padded = pad(x);
            prop_assert_eq!(padded % 2, 0);
            if x % 2 == 0 {
                prop_assert_eq!(padded, x as u64);
            } else {
                prop_assert_eq!(padded, x as u64 + 1);
            }
        }
    }

    #[test]
    fn test_decode_header() -> Result<()> {
        let mut reader = ByteReader::new(Cursor::new(b"IDIT\x1a\x00\x00\x00".to_vec()))?;
        let header = ChunkHeader::decode(&mut reader)?;

        assert_eq!(header.tag, FourCC(*b"IDIT"));
        assert_eq!(header.declared_size, 26);
        assert_eq!(header.consumed(), 34);

        Ok(())
    }

    #[test]
    fn test_riff_header() -> Result<()> {
        let bytes = Chunk::list_with_id(b"RIFF", b"AVI ", vec![Chunk::new(b"JUNK", vec![0; 3])])
            .to_bytes();
        assert_eq!(bytes.len(), 12 + 8 + 4);

        let mut reader = ByteReader::new(Cursor::new(bytes))?;
        let header = RiffHeader::read(&mut reader)?;

        assert_eq!(header.form_type, FourCC(*b"AVI "));
        assert_eq!(header.size, 4 + 8 + 4);
        assert_eq!(header.body_budget(), 12);

        Ok(())
    }

    #[test]
    fn test_not_riff() -> Result<()> {
        let mut reader = ByteReader::new(Cursor::new(b"RIFX\x04\x00\x00\x00WAVE".to_vec()))?;

        match RiffHeader::read(&mut reader) {
            Err(Error::NotARiffFile { found }) => assert_eq!(found, FourCC(*b"RIFX")),
            other => panic!("expected NotARiffFile, got {:?}", other),
        }

        Ok(())
    }

    #[test]
    fn test_fourcc_display() {
        assert_eq!(FourCC(*b"AVI ").to_string(), "AVI ");
        assert_eq!(FourCC([b'a', 0, b'b', 0xff]).to_string(), "a\\x00b\\xff");
    }
}
