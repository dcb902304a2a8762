use riff::FourCC;

pub const AVI_FORM: FourCC = FourCC(*b"AVI ");

/// Container-specific heuristics layered over the generic walker.
///
/// None of these apply in trace mode, where every chunk is visited.
pub trait Dialect {
    fn name(&self) -> &'static str;

    /// LIST subtype after which the rest of its level holds no metadata.
    fn terminal_list(&self) -> Option<FourCC> {
        None
    }

    fn captures_raw_date(&self, trace: bool) -> bool {
        !trace
    }
}

/// AVI: the `movi` list holds the media payload and dominates the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Avi;

impl Dialect for Avi {
    fn name(&self) -> &'static str {
        "AVI"
    }

    fn terminal_list(&self) -> Option<FourCC> {
        Some(FourCC(*b"movi"))
    }
}

/// Any other RIFF form (WAVE, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct Generic;

impl Dialect for Generic {
    fn name(&self) -> &'static str {
        "generic"
    }
}

pub fn for_form_type(form_type: FourCC) -> Box<dyn Dialect> {
    if form_type == AVI_FORM {
        Box::new(Avi)
    } else {
        Box::new(Generic)
    }
}
