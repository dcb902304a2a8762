use std::io::{self, Write};

use crate::extract::{Event, EventSink};

const LINE_LENGTH: usize = 50;

/// Writes dates, and in trace mode the chunk tree, as events arrive.
pub struct Printer<W: Write> {
    out: W,
    color: bool,
    error: Option<io::Error>,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, color: bool) -> Printer<W> {
        Printer {
            out,
            color,
            error: None,
        }
    }

    /// Flush and report the first write error, if any.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn color(&self, text: &str, color: u8) -> String {
        if self.color {
            format!("\x1b[38;5;{}m{}\x1b[m", color, text)
        } else {
            text.to_string()
        }
    }

    fn node(&self, depth: usize, id: &str, size: &str) -> String {
        let indent = "  ".repeat(depth);
        let dots = LINE_LENGTH
            .saturating_sub(indent.chars().count() + id.chars().count() + size.chars().count())
            .max(1);

        format!(
            "{}{} {}{}",
            indent,
            id,
            self.color(&".".repeat(dots), 239),
            self.color(size, 6)
        )
    }

    fn render(&self, event: &Event) -> String {
        match event {
            Event::Riff { size, form_type } => {
                self.node(0, &format!("RIFF:{}", form_type), &size.to_string())
            }
            Event::List {
                depth,
                size,
                list_type,
            } => self.node(depth + 1, &format!("LIST:{}", list_type), &size.to_string()),
            Event::Chunk { depth, tag, size } => {
                self.node(depth + 1, &tag.to_string(), &size.to_string())
            }
            Event::VendorTag {
                depth,
                type_code,
                length,
            } => self.node(depth + 1, &format!("{:#06x}", type_code), &length.to_string()),
            Event::Inconsistent { depth, budget, needed } => format!(
                "{}{}",
                "  ".repeat(depth + 1),
                self.color(&format!("inconsistent sizes {} < {}", budget, needed), 1)
            ),
            Event::TooDeep { depth, list_type } => format!(
                "{}{}",
                "  ".repeat(depth + 1),
                self.color(&format!("LIST:{} nested too deep, skipped", list_type), 1)
            ),
            Event::Date(date) => date.to_string(),
            Event::VendorDate(date) => format!("ntcg-{}: {}", date.kind.label(), date.text),
        }
    }
}

impl<W: Write> EventSink for Printer<W> {
    fn event(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }
        let line = self.render(&event);
        if let Err(e) = writeln!(self.out, "{}", line) {
            self.error = Some(e);
        }
    }
}
