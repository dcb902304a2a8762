use std::borrow::Cow;
use std::fmt;

/// Text captured from a chunk payload, cut at the first NUL.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Text(Vec<u8>);

impl Text {
    pub fn new(mut bytes: Vec<u8>) -> Text {
        if let Some(nul) = bytes.iter().position(|&b| b == 0) {
            bytes.truncate(nul);
        }
        Text(bytes)
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Text {
        Text::new(s.as_bytes().to_vec())
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_str_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_at_nul() {
        let text = Text::new(b"SIGMA\0\0junk".to_vec());
        assert!(text == *"SIGMA");
        assert_eq!(text.to_string(), "SIGMA");
    }

    #[test]
    fn test_no_nul() {
        assert!(Text::new(b"DP2".to_vec()) == *"DP2");
        assert!(Text::new(vec![0, 1]) == *"");
    }
}
