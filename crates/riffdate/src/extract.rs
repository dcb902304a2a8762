use std::io::{Read, Seek};

use riff::{
    ByteReader, ChunkHeader, FourCC, ListAction, Outcome, Result, RiffHeader, Visitor, Walker,
};

use crate::config::ExtractOptions;
use crate::date::ReconciledDate;
use crate::dialect::{self, Dialect};
use crate::metadata::{MetadataAccumulator, IDIT, IPRD, ISFT};
use crate::nctg::{self, VendorDate, NCTG};
use crate::text::Text;

/// Longest INFO/IDIT payload kept in memory; the remainder is skipped.
const MAX_TEXT_LEN: u32 = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Riff { size: u32, form_type: FourCC },
    List { depth: usize, size: u32, list_type: FourCC },
    Chunk { depth: usize, tag: FourCC, size: u32 },
    VendorTag { depth: usize, type_code: u16, length: u16 },
    Inconsistent { depth: usize, budget: u64, needed: u64 },
    TooDeep { depth: usize, list_type: FourCC },
    Date(ReconciledDate),
    VendorDate(VendorDate),
}

impl Event {
    /// Tree and diagnostic events, only produced in trace mode.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Event::Date(_) | Event::VendorDate(_))
    }
}

pub trait EventSink {
    fn event(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn event(&mut self, event: Event) {
        self.push(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub header: RiffHeader,
    pub outcome: Outcome,
}

struct DateVisitor<'a, S> {
    dialect: Box<dyn Dialect>,
    trace: bool,
    metadata: MetadataAccumulator,
    sink: &'a mut S,
}

impl<S: EventSink> DateVisitor<'_, S> {
    fn trace(&mut self, event: Event) {
        if self.trace {
            self.sink.event(event);
        }
    }
}

fn read_text<R: Read + Seek>(reader: &mut ByteReader<R>, header: &ChunkHeader) -> Result<Text> {
    let len = header.declared_size.min(MAX_TEXT_LEN);
    Ok(Text::new(reader.read_exact(len as usize)?))
}

impl<R: Read + Seek, S: EventSink> Visitor<R> for DateVisitor<'_, S> {
    fn list(&mut self, depth: usize, header: &ChunkHeader, list_type: FourCC) -> ListAction {
        self.trace(Event::List {
            depth,
            size: header.declared_size,
            list_type,
        });
        if !self.trace && self.dialect.terminal_list() == Some(list_type) {
            return ListAction::Stop;
        }
        ListAction::Descend
    }

    fn leaf(
        &mut self,
        depth: usize,
        header: &ChunkHeader,
        reader: &mut ByteReader<R>,
    ) -> Result<()> {
        self.trace(Event::Chunk {
            depth,
            tag: header.tag,
            size: header.declared_size,
        });

        match header.tag {
            IPRD => self.metadata.set_product(read_text(reader, header)?),
            ISFT => self.metadata.set_software(read_text(reader, header)?),
            IDIT if self.dialect.captures_raw_date(self.trace) => {
                self.metadata.set_raw_date(read_text(reader, header)?)
            }
            NCTG => {
                let block = nctg::parse_tag_block(reader, header.declared_size)?;
                for entry in block.entries.iter() {
                    self.trace(Event::VendorTag {
                        depth: depth + 1,
                        type_code: entry.type_code,
                        length: entry.length,
                    });
                }
                if let Some((budget, needed)) = block.overrun {
                    self.trace(Event::Inconsistent {
                        depth: depth + 1,
                        budget,
                        needed,
                    });
                }
                for date in block.dates() {
                    self.sink.event(Event::VendorDate(date));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn chunk_done(&mut self, _depth: usize) {
        if let Some(capture) = self.metadata.take_complete() {
            self.sink.event(Event::Date(ReconciledDate::reconcile(capture)));
        }
    }

    fn inconsistent(&mut self, depth: usize, budget: u64, needed: u64) {
        self.trace(Event::Inconsistent { depth, budget, needed });
    }

    fn depth_exceeded(&mut self, depth: usize, _header: &ChunkHeader, list_type: FourCC) {
        self.trace(Event::TooDeep { depth, list_type });
    }
}

/// Walk a RIFF file and report its creation dates to `sink` as they are found.
pub fn extract<R, S>(source: R, options: &ExtractOptions, sink: &mut S) -> Result<Summary>
where
    R: Read + Seek,
    S: EventSink,
{
    let mut reader = ByteReader::new(source)?;
    let header = RiffHeader::read(&mut reader)?;
    if options.trace {
        sink.event(Event::Riff {
            size: header.size,
            form_type: header.form_type,
        });
    }

    let dialect = dialect::for_form_type(header.form_type);
    log::debug!("RIFF {} {} ({} dialect)", header.size, header.form_type, dialect.name());

    let mut visitor = DateVisitor {
        dialect,
        trace: options.trace,
        metadata: MetadataAccumulator::default(),
        sink,
    };
    let walker = Walker::new(options.max_depth);
    let outcome = walker.walk(&mut reader, header.body_budget(), &mut visitor)?;

    if let Some(raw_date) = visitor.metadata.take_raw_date() {
        visitor.sink.event(Event::Date(ReconciledDate::unreconciled(raw_date)));
    }

    Ok(Summary { header, outcome })
}
