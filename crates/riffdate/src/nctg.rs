//! Nikon `nctg` tag block: a flat run of (type, length, value) entries with no
//! padding between them.
//!
//! https://exiftool.org/TagNames/Nikon.html#AVITags

use std::io::{Read, Seek};

use riff::{ByteReader, FourCC, Result};

use crate::text::Text;

pub const NCTG: FourCC = FourCC(*b"nctg");

pub const DATE_TIME_ORIGINAL: u16 = 0x0013;
pub const CREATE_DATE: u16 = 0x0014;

const ENTRY_HEADER_LEN: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorDateKind {
    DateTimeOriginal,
    CreateDate,
}

impl VendorDateKind {
    pub fn from_type_code(type_code: u16) -> Option<VendorDateKind> {
        match type_code {
            DATE_TIME_ORIGINAL => Some(VendorDateKind::DateTimeOriginal),
            CREATE_DATE => Some(VendorDateKind::CreateDate),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VendorDateKind::DateTimeOriginal => "DateTimeOriginal",
            VendorDateKind::CreateDate => "CreateDate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorTagEntry {
    pub type_code: u16,
    pub length: u16,
    /// Only kept for the date entries; everything else is skipped unread.
    pub value: Option<Text>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorDate {
    pub kind: VendorDateKind,
    pub text: Text,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagBlock {
    pub entries: Vec<VendorTagEntry>,
    /// Set when an entry claimed more bytes than the block had left: `(remaining, needed)`.
    pub overrun: Option<(u64, u64)>,
}

impl TagBlock {
    pub fn dates(&self) -> impl Iterator<Item = VendorDate> + '_ {
        self.entries.iter().filter_map(|entry| {
            let kind = VendorDateKind::from_type_code(entry.type_code)?;
            let text = entry.value.clone()?;
            Some(VendorDate { kind, text })
        })
    }
}

/// Parse a tag block, consuming exactly `payload_len` bytes.
///
/// An entry running past the end of the block stops the parse; the rest of
/// the block is skipped and the overrun recorded.
pub fn parse_tag_block<R: Read + Seek>(
    reader: &mut ByteReader<R>,
    payload_len: u32,
) -> Result<TagBlock> {
    let mut block = TagBlock::default();
    let mut rest = payload_len as u64;

    while rest > 0 {
        if rest < ENTRY_HEADER_LEN {
            log::warn!("nctg: {} trailing bytes", rest);
            block.overrun = Some((rest, ENTRY_HEADER_LEN));
            reader.skip(rest)?;
            break;
        }

        let type_code = reader.read_u16_le()?;
        let length = reader.read_u16_le()?;
        let needed = ENTRY_HEADER_LEN + length as u64;
        if needed > rest {
            log::warn!("nctg: entry {:#06x} needs {} bytes, {} left", type_code, needed, rest);
            block.overrun = Some((rest, needed));
            reader.skip(rest - ENTRY_HEADER_LEN)?;
            break;
        }

        let value = match VendorDateKind::from_type_code(type_code) {
            Some(_) => Some(Text::new(reader.read_exact(length as usize)?)),
            None => {
                reader.skip(length as u64)?;
                None
            }
        };
        block.entries.push(VendorTagEntry {
            type_code,
            length,
            value,
        });
        rest -= needed;
    }

    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn entry(type_code: u16, value: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&type_code.to_le_bytes());
        out.extend_from_slice(&(value.len() as u16).to_le_bytes());
        out.extend_from_slice(value);
        out
    }

    fn parse(bytes: Vec<u8>, payload_len: u32) -> Result<(TagBlock, u64)> {
        let mut reader = ByteReader::new(Cursor::new(bytes))?;
        let block = parse_tag_block(&mut reader, payload_len)?;
        Ok((block, reader.position()))
    }

    #[test]
    fn test_date_time_original() -> Result<()> {
        let bytes = entry(0x0013, b"2013:06:11");
        let (block, position) = parse(bytes, 14)?;

        let dates: Vec<VendorDate> = block.dates().collect();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].kind, VendorDateKind::DateTimeOriginal);
        assert!(dates[0].text == *"2013:06:11");
        assert_eq!(block.overrun, None);
        assert_eq!(position, 14);

        Ok(())
    }

    #[test]
    fn test_unknown_entry_is_skipped() -> Result<()> {
        let mut bytes = entry(0x0001, b"NIKON\0");
        bytes.extend(entry(0x0014, b"2013:06:11 13:30:25\0"));
        let len = bytes.len() as u32;
        let (block, position) = parse(bytes, len)?;

        assert_eq!(block.entries.len(), 2);
        assert_eq!(block.entries[0].type_code, 0x0001);
        assert_eq!(block.entries[0].length, 6);
        assert_eq!(block.entries[0].value, None);

        let dates: Vec<VendorDate> = block.dates().collect();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].kind, VendorDateKind::CreateDate);
        assert!(dates[0].text == *"2013:06:11 13:30:25");
        assert_eq!(position, len as u64);

        Ok(())
    }

    #[test]
    fn test_unknown_entry_advances_by_header_and_length() -> Result<()> {
        let bytes = entry(0x0002, &[9; 7]);
        let (block, position) = parse(bytes, 11)?;

        assert_eq!(block.dates().count(), 0);
        assert_eq!(position, 4 + 7);

        Ok(())
    }

    #[test]
    fn test_entry_overruns_block() -> Result<()> {
        let mut bytes = entry(0x0013, b"2013:06:11");
        bytes.extend(entry(0x0014, b"2013:06:11"));
        // the block ends in the middle of the second entry
        let (block, position) = parse(bytes, 20)?;

        assert_eq!(block.entries.len(), 1);
        assert_eq!(block.overrun, Some((6, 14)));
        assert_eq!(position, 20);

        Ok(())
    }

    #[test]
    fn test_trailing_bytes() -> Result<()> {
        let mut bytes = entry(0x0005, b"ab");
        bytes.extend_from_slice(&[0, 0]);
        let (block, position) = parse(bytes, 8)?;

        assert_eq!(block.entries.len(), 1);
        assert_eq!(block.overrun, Some((2, 4)));
        assert_eq!(position, 8);

        Ok(())
    }
}
