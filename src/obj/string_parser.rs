//! Whitespace/paren/quote tokenizer shared by the OBJ and MTL readers.

use super::ObjError;

fn is_delimiter(c: u8) -> bool {
    matches!(c, b'\t' | b' ' | b'(' | b')' | b'"')
}

/// Cursor over one line of OBJ or MTL text
pub struct StringParser<'a> {
    text: &'a str,
    index: usize,
    line: usize,
}

impl<'a> StringParser<'a> {
    /// `line` is the 1-based line number, used only for error reporting.
    pub fn new(text: &'a str, line: usize) -> Self {
        Self {
            text,
            index: 0,
            line,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Advances past any run of delimiters.
    pub fn skip_delimiters(&mut self) {
        let bytes = self.text.as_bytes();
        while self.index < bytes.len() && is_delimiter(bytes[self.index]) {
            self.index += 1;
        }
    }

    /// Returns the next word, or `None` at end of line.
    pub fn get_word(&mut self) -> Option<&'a str> {
        self.skip_delimiters();
        let bytes = self.text.as_bytes();
        let start = self.index;
        let end = bytes[start..]
            .iter()
            .position(|c| is_delimiter(*c))
            .map_or(bytes.len(), |len| start + len);
        if end == start {
            return None;
        }
        self.index = end;
        Some(&self.text[start..end])
    }

    pub fn get_float(&mut self, command: &'static str) -> Result<f32, ObjError> {
        let word = self.get_word().ok_or(ObjError::MissingValue {
            line: self.line,
            command,
        })?;
        word.parse::<f32>().map_err(|_| ObjError::InvalidNumber {
            line: self.line,
            command,
            found: word.to_string(),
        })
    }

    /// Like [`get_float`](Self::get_float), but `None` at end of line.
    pub fn get_optional_float(&mut self, command: &'static str) -> Result<Option<f32>, ObjError> {
        match self.get_word() {
            None => Ok(None),
            Some(word) => word.parse::<f32>().map(Some).map_err(|_| ObjError::InvalidNumber {
                line: self.line,
                command,
                found: word.to_string(),
            }),
        }
    }

    pub fn get_int(&mut self, command: &'static str) -> Result<i64, ObjError> {
        let word = self.get_word().ok_or(ObjError::MissingValue {
            line: self.line,
            command,
        })?;
        word.parse::<i64>().map_err(|_| ObjError::InvalidNumber {
            line: self.line,
            command,
            found: word.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_every_delimiter_kind() {
        let mut sp = StringParser::new("  usemtl\t(\"wood\")  grain", 1);
        assert_eq!(sp.get_word(), Some("usemtl"));
        assert_eq!(sp.get_word(), Some("wood"));
        assert_eq!(sp.get_word(), Some("grain"));
        assert_eq!(sp.get_word(), None);
    }

    #[test]
    fn reads_numbers_and_reports_bad_ones() {
        let mut sp = StringParser::new("v 1.5 -2 abc", 7);
        assert_eq!(sp.get_word(), Some("v"));
        assert_eq!(sp.get_float("v").unwrap(), 1.5);
        assert_eq!(sp.get_int("v").unwrap(), -2);
        match sp.get_float("v") {
            Err(ObjError::InvalidNumber { line, found, .. }) => {
                assert_eq!(line, 7);
                assert_eq!(found, "abc");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            sp.get_float("v"),
            Err(ObjError::MissingValue { line: 7, .. })
        ));
    }

    #[test]
    fn optional_float_is_none_at_end_of_line() {
        let mut sp = StringParser::new("vt 0.25", 3);
        sp.get_word();
        assert_eq!(sp.get_optional_float("vt").unwrap(), Some(0.25));
        assert_eq!(sp.get_optional_float("vt").unwrap(), None);
    }

    #[test]
    fn face_tokens_keep_their_slashes() {
        let mut sp = StringParser::new("f 1/2/3 4//6 7", 1);
        sp.get_word();
        assert_eq!(sp.get_word(), Some("1/2/3"));
        assert_eq!(sp.get_word(), Some("4//6"));
        assert_eq!(sp.get_word(), Some("7"));
    }
}
