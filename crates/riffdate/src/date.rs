use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::metadata::Capture;
use crate::text::Text;

const SIGMA: &str = "SIGMA";

/// ISFT values of the models affected by the IDIT digit bug, as listed by SIGMA.
const SIGMA_BUGGY_MODELS: [&str; 6] = ["DP1", "DP1S", "DP1X", "DP2", "DP2S", "DP2X"];

/// SIGMA DP1, DP1s, DP1x, DP2, DP2s, DP2x produce broken IDIT values like
///    "THU FEB 0= 0;:03:0? 200;\n "
///    "SUN APR 0> 11:08:03 200=\n "
/// where every two-digit field is written in base 16 on top of '0'.
const BROKEN_IDIT_TEMPLATE: &str = "SUN APR 0> 11:07:37 200=\n ";
const BROKEN_FIELDS: [usize; 5] = [8, 11, 14, 17, 22];

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

pub fn has_digit_bug(product: &Text, software: &Text) -> bool {
    *product == *SIGMA && SIGMA_BUGGY_MODELS.iter().any(|model| *software == **model)
}

fn is_pseudo_hex_digit(b: u8) -> bool {
    (b'0'..b'0' + 16).contains(&b)
}

/// Rewrite the five base-16 fields of a broken IDIT in base 10.
///
/// Leaves `raw` untouched and returns false unless it has the exact length of
/// the broken form and every field byte is a pseudo-hex digit. Both bytes of a
/// field are checked, not only the first, so no field can underflow.
pub fn repair_digits(raw: &mut [u8]) -> bool {
    if raw.len() != BROKEN_IDIT_TEMPLATE.len() {
        return false;
    }
    let in_range = BROKEN_FIELDS
        .iter()
        .all(|&at| is_pseudo_hex_digit(raw[at]) && is_pseudo_hex_digit(raw[at + 1]));
    if !in_range {
        return false;
    }

    for &at in BROKEN_FIELDS.iter() {
        let value = (raw[at] - b'0') as u32 * 16 + (raw[at + 1] - b'0') as u32;
        raw[at] = b'0' + (value / 10 % 10) as u8;
        raw[at + 1] = b'0' + (value % 10) as u8;
    }
    true
}

fn idit_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^\s*(\S{1,3})\s+([A-Za-z]{3})",
            r"\s+([0-9]{1,2})\s+([0-9]{1,2}):([0-9]{1,2}):([0-9]{1,2})",
            r"\s+([0-9]{1,4})",
        ))
        .expect("IDIT pattern compiles")
    })
}

/// "FRI SEP 07 23:37:15 2012" -> "2012:09:07 23:37:15"
pub fn to_exif_time(idit: &str) -> Option<String> {
    let caps = idit_pattern().captures(idit)?;
    let month = MONTHS.iter().position(|m| m.eq_ignore_ascii_case(&caps[2]))? + 1;
    let field = |i: usize| caps[i].parse::<u32>().ok();

    Some(format!(
        "{:04}:{:02}:{:02} {:02}:{:02}:{:02}",
        field(7)?,
        month,
        field(3)?,
        field(4)?,
        field(5)?,
        field(6)?
    ))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledDate {
    /// `YYYY:MM:DD hh:mm:ss` when the raw value matched the IDIT layout.
    pub normalized: Option<String>,
    pub raw: String,
}

impl ReconciledDate {
    pub fn reconcile(capture: Capture) -> ReconciledDate {
        let Capture {
            product,
            software,
            mut raw_date,
        } = capture;

        if has_digit_bug(&product, &software) && repair_digits(raw_date.as_bytes_mut()) {
            log::debug!("repaired {} {} IDIT digits", product, software);
        }
        let raw = raw_date.to_str_lossy().into_owned();

        ReconciledDate {
            normalized: to_exif_time(&raw),
            raw,
        }
    }

    /// A creation date that never met its product and software chunks.
    pub fn unreconciled(raw_date: Text) -> ReconciledDate {
        ReconciledDate {
            normalized: None,
            raw: raw_date.to_str_lossy().into_owned(),
        }
    }
}

impl fmt::Display for ReconciledDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.normalized {
            Some(normalized) => write!(f, "IDIT-exiftime: {}", normalized),
            None => write!(f, "IDIT: {}", self.raw.trim_end()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(product: &str, software: &str, raw_date: &str) -> Capture {
        Capture {
            product: Text::from(product),
            software: Text::from(software),
            raw_date: Text::from(raw_date),
        }
    }

    #[test]
    fn test_repair_known_sample() {
        let mut raw = b"SUN APR 0> 11:08:03 200=\n ".to_vec();

        assert!(repair_digits(&mut raw));
        assert_eq!(raw, b"SUN APR 14 17:08:03 2013\n ");
        for &at in BROKEN_FIELDS.iter() {
            assert!(raw[at].is_ascii_digit() && raw[at + 1].is_ascii_digit());
        }
    }

    #[test]
    fn test_repair_second_sample() {
        let mut raw = b"THU FEB 0= 0;:03:0? 200;\n ".to_vec();

        assert!(repair_digits(&mut raw));
        assert_eq!(raw, b"THU FEB 13 11:03:15 2011\n ");
    }

    #[test]
    fn test_repair_wrong_length_is_noop() {
        let mut raw = b"FRI SEP 07 23:37:15 2012".to_vec();

        assert!(!repair_digits(&mut raw));
        assert_eq!(raw, b"FRI SEP 07 23:37:15 2012");
    }

    #[test]
    fn test_repair_out_of_range_is_noop() {
        let mut raw = b"SUN APR A> 11:08:03 200=\n ".to_vec();
        assert!(!repair_digits(&mut raw));
        assert_eq!(raw, b"SUN APR A> 11:08:03 200=\n ");

        let mut raw = b"SUN APR 0> 11:08:03 20@=\n ".to_vec();
        assert!(!repair_digits(&mut raw));
        assert_eq!(raw, b"SUN APR 0> 11:08:03 20@=\n ");

        // second byte of the year field out of range
        let mut raw = b"SUN APR 0> 11:08:03 200@\n ".to_vec();
        assert!(!repair_digits(&mut raw));
        assert_eq!(raw, b"SUN APR 0> 11:08:03 200@\n ");
    }

    #[test]
    fn test_has_digit_bug() {
        assert!(has_digit_bug(&Text::from("SIGMA"), &Text::from("DP2")));
        assert!(has_digit_bug(&Text::from("SIGMA"), &Text::from("DP1X")));
        assert!(!has_digit_bug(&Text::from("SIGMA"), &Text::from("DP2 Merrill")));
        assert!(!has_digit_bug(&Text::from("sigma"), &Text::from("DP2")));
        assert!(!has_digit_bug(&Text::from("NIKON"), &Text::from("DP2")));
    }

    #[test]
    fn test_to_exif_time() {
        assert_eq!(
            to_exif_time("FRI SEP 07 23:37:15 2012").as_deref(),
            Some("2012:09:07 23:37:15")
        );
        assert_eq!(
            to_exif_time("thu feb 13 11:03:15 2011\n ").as_deref(),
            Some("2011:02:13 11:03:15")
        );
        // the weekday is any short token and never checked
        assert_eq!(
            to_exif_time("F? SEP 07 23:37:15 2012").as_deref(),
            Some("2012:09:07 23:37:15")
        );
        assert_eq!(to_exif_time("FRID SEP 07 23:37:15 2012"), None);
        assert_eq!(to_exif_time("FRI XYZ 07 23:37:15 2012"), None);
        assert_eq!(to_exif_time("2012:09:07 23:37:15"), None);
        assert_eq!(to_exif_time("THU FEB 0= 0;:03:0? 200;\n "), None);
    }

    #[test]
    fn test_reconcile_sigma_dp2() {
        let date = ReconciledDate::reconcile(capture("SIGMA", "DP2", "SUN APR 0> 11:08:03 200=\n "));

        assert_eq!(date.normalized.as_deref(), Some("2013:04:14 17:08:03"));
        assert_eq!(date.raw, "SUN APR 14 17:08:03 2013\n ");
        assert_eq!(date.to_string(), "IDIT-exiftime: 2013:04:14 17:08:03");
    }

    #[test]
    fn test_reconcile_unaffected_model() {
        let date = ReconciledDate::reconcile(capture("SIGMA", "DP2 Merrill", "FRI SEP 07 23:37:15 2012"));
        assert_eq!(date.normalized.as_deref(), Some("2012:09:07 23:37:15"));

        // not repaired, so the broken digits fail to parse
        let date = ReconciledDate::reconcile(capture("OTHER", "DP2", "SUN APR 0> 11:08:03 200=\n "));
        assert_eq!(date.normalized, None);
        assert_eq!(date.to_string(), "IDIT: SUN APR 0> 11:08:03 200=");
    }

    #[test]
    fn test_unreconciled() {
        let date = ReconciledDate::unreconciled(Text::from("THU FEB 13 11:03:15 2011"));

        assert_eq!(date.normalized, None);
        assert_eq!(date.to_string(), "IDIT: THU FEB 13 11:03:15 2011");
    }
}
