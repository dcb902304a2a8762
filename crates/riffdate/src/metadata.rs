use riff::FourCC;

use crate::text::Text;

/// RIFF:AVI/LIST:INFO/IPRD
pub const IPRD: FourCC = FourCC(*b"IPRD");
/// RIFF:AVI/LIST:INFO/ISFT
pub const ISFT: FourCC = FourCC(*b"ISFT");
/// RIFF:AVI/IDIT, although some writers put it under LIST:hdrl.
/// http://www.den4b.com/forum/viewtopic.php?id=723
pub const IDIT: FourCC = FourCC(*b"IDIT");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub product: Text,
    pub software: Text,
    pub raw_date: Text,
}

/// Product, software and creation date seen so far in one file walk.
/// A later chunk with the same tag replaces the earlier value.
#[derive(Debug, Default)]
pub struct MetadataAccumulator {
    product: Option<Text>,
    software: Option<Text>,
    raw_date: Option<Text>,
}

impl MetadataAccumulator {
    pub fn set_product(&mut self, product: Text) {
        self.product = Some(product);
    }

    pub fn set_software(&mut self, software: Text) {
        self.software = Some(software);
    }

    pub fn set_raw_date(&mut self, raw_date: Text) {
        self.raw_date = Some(raw_date);
    }

    /// Hand out all three fields once they are present, leaving the accumulator empty.
    pub fn take_complete(&mut self) -> Option<Capture> {
        if self.product.is_none() || self.software.is_none() || self.raw_date.is_none() {
            return None;
        }
        Some(Capture {
            product: self.product.take()?,
            software: self.software.take()?,
            raw_date: self.raw_date.take()?,
        })
    }

    pub fn take_raw_date(&mut self) -> Option<Text> {
        self.raw_date.take()
    }
}
