//! Control-character stripping.
//!
//! Removes every Unicode code point of general category Cc except tab,
//! carriage return and line feed. Nothing else about the text changes.

/// One removed character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedChar {
    pub character: char,
    /// Byte offset in the buffer that was scanned.
    pub offset: usize,
}

impl RemovedChar {
    /// The character as a double-quoted ASCII escape, e.g. `"\x01"`.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", escape_ascii(self.character))
    }
}

/// Characters removed from one document, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizationReport {
    pub removed: Vec<RemovedChar>,
}

impl SanitizationReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.removed.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RemovedChar> {
        self.removed.iter()
    }
}

/// Sanitized document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub bytes: Vec<u8>,
    pub report: SanitizationReport,
}

/// True for characters the sanitizer removes.
pub fn is_stripped(c: char) -> bool {
    c.is_control() && !matches!(c, '\t' | '\r' | '\n')
}

/// Strip disallowed control characters from `raw`.
///
/// Bytes that are not valid UTF-8 are copied through unchanged.
pub fn sanitize(raw: &[u8]) -> Sanitized {
    let mut removed = Vec::new();
    let (mut bytes, had_invalid) = strip_pass(raw, &mut removed);

    // Dropping a character between stray bytes can join them into a new
    // code point, which may itself be a control character.
    let mut rescan = had_invalid && !removed.is_empty();
    while rescan {
        let before = removed.len();
        let (next, had_invalid) = strip_pass(&bytes, &mut removed);
        bytes = next;
        rescan = had_invalid && removed.len() > before;
    }

    Sanitized {
        bytes,
        report: SanitizationReport { removed },
    }
}

/// One scan over `input`. Returns the cleaned bytes and whether any invalid
/// UTF-8 was seen.
fn strip_pass(input: &[u8], removed: &mut Vec<RemovedChar>) -> (Vec<u8>, bool) {
    let mut out = Vec::with_capacity(input.len());
    let mut offset = 0;
    let mut had_invalid = false;

    for chunk in input.utf8_chunks() {
        let valid = chunk.valid();
        let mut start = 0;
        for (i, c) in valid.char_indices() {
            if is_stripped(c) {
                out.extend_from_slice(&valid.as_bytes()[start..i]);
                removed.push(RemovedChar {
                    character: c,
                    offset: offset + i,
                });
                start = i + c.len_utf8();
            }
        }
        out.extend_from_slice(&valid.as_bytes()[start..]);

        let invalid = chunk.invalid();
        out.extend_from_slice(invalid);
        had_invalid |= !invalid.is_empty();
        offset += valid.len() + invalid.len();
    }

    (out, had_invalid)
}

/// Escape a character to printable ASCII: short escapes where they exist,
/// `\xNN` below 0x80, `\uNNNN` / `\UNNNNNNNN` above.
pub fn escape_ascii(c: char) -> String {
    match c {
        '\x07' => "\\a".to_string(),
        '\x08' => "\\b".to_string(),
        '\x0c' => "\\f".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\x0b' => "\\v".to_string(),
        '"' => "\\\"".to_string(),
        '\\' => "\\\\".to_string(),
        c if c.is_ascii() && !c.is_ascii_control() => c.to_string(),
        c if (c as u32) < 0x80 => format!("\\x{:02x}", c as u32),
        c if (c as u32) <= 0xffff => format!("\\u{:04x}", c as u32),
        c => format!("\\U{:08x}", c as u32),
    }
}
