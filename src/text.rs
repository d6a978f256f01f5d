/// Codepoint value used for bytes that cannot correspond to any character.
///
/// A byte `>= 0x80` taken out of a byte-only string must not be matched
/// against the codepoints `U+0080` - `U+00FF`, so it is mapped to a value no
/// valid codepoint can take. Such a byte can only ever cost a substitution.
pub(crate) const NO_CODEPOINT: i32 = -1;

/// A string prepared for fuzzy comparison: a byte sequence plus an optional
/// codepoint view of the same text.
///
/// [`Text::new`] decodes the codepoint view from valid UTF-8. Byte-only texts
/// created with [`Text::from_bytes`] carry no codepoint view; when one is
/// needed it is synthesized with [`Text::synthesized_codepoints`].
///
/// # Example
/// ```
/// use textfuzzy::Text;
///
/// let t = Text::new("naïve");
/// assert_eq!(t.bytes().len(), 6);
/// assert_eq!(t.codepoints().unwrap().len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct Text {
    bytes: Vec<u8>,
    codepoints: Option<Vec<i32>>,
}

impl Text {
    /// Builds a text from a string slice, decoding the codepoint view.
    pub fn new(s: &str) -> Self {
        Text {
            bytes: s.as_bytes().to_vec(),
            codepoints: Some(s.chars().map(|c| c as i32).collect()),
        }
    }

    /// Builds a text from raw bytes without a codepoint view.
    pub fn from_bytes<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Text {
            bytes: bytes.into(),
            codepoints: None,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn codepoints(&self) -> Option<&[i32]> {
        self.codepoints.as_deref()
    }

    /// Length in the requested comparison unit.
    pub(crate) fn len(&self, codepoints: bool) -> usize {
        if codepoints {
            match &self.codepoints {
                Some(cps) => cps.len(),
                None => self.bytes.len(),
            }
        } else {
            self.bytes.len()
        }
    }

    /// Codepoint view for a byte-only text: ASCII bytes map to themselves,
    /// anything else to [`NO_CODEPOINT`].
    pub(crate) fn synthesized_codepoints(&self) -> Vec<i32> {
        self.bytes
            .iter()
            .map(|&b| {
                if b < 0x80 {
                    i32::from(b)
                } else {
                    NO_CODEPOINT
                }
            })
            .collect()
    }

    /// Populates the codepoint view of a byte-only text in place.
    pub(crate) fn ensure_codepoints(&mut self) {
        if self.codepoints.is_none() {
            self.codepoints = Some(self.synthesized_codepoints());
        }
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::new(s)
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::new(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_codepoints() {
        let t = Text::new("abc");
        assert_eq!(t.bytes(), b"abc");
        assert_eq!(t.codepoints(), Some(&[97, 98, 99][..]));
    }

    #[test]
    fn multibyte_lengths_differ() {
        let t = Text::new("über");
        assert_eq!(t.len(false), 5);
        assert_eq!(t.len(true), 4);
    }

    #[test]
    fn synthesized_view_blanks_high_bytes() {
        let t = Text::from_bytes(vec![b'a', 0xC3, 0xBC, b'b']);
        assert_eq!(t.codepoints(), None);
        assert_eq!(
            t.synthesized_codepoints(),
            vec![97, NO_CODEPOINT, NO_CODEPOINT, 98]
        );
    }

    #[test]
    fn ensure_codepoints_is_idempotent() {
        let mut t = Text::from_bytes(b"hi".to_vec());
        t.ensure_codepoints();
        assert_eq!(t.codepoints(), Some(&[104, 105][..]));
        t.ensure_codepoints();
        assert_eq!(t.len(true), 2);
    }
}
