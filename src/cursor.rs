//! Line/column tracking cursor over a [`BufferedSource`]

use std::panic::Location;

use crate::error::{Diagnostic, Position, ReaderError};
use crate::source::BufferedSource;

/// Read/peek/advance interface that keeps `(line, col)` in sync with the bytes consumed
#[derive(Debug)]
pub struct Cursor {
    source: BufferedSource,
    /// Current line (0-based)
    line: usize,
    /// Current column (0-based)
    col: usize,
    /// Capture window contents and call sites in diagnostics
    verbose: bool,
}

impl Cursor {
    pub fn new(source: BufferedSource, verbose: bool) -> Self {
        Self {
            source,
            line: 0,
            col: 0,
            verbose,
        }
    }

    /// True iff a byte is available without a refill
    #[inline(always)]
    pub fn valid(&self) -> bool {
        self.source.valid()
    }

    /// Returns the current byte without consuming it
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.source.peek()
    }

    /// Moves past the current byte; no-op when nothing is available
    ///
    /// A consumed newline moves to the start of the next line, so the byte
    /// that follows it reports column 0.
    pub fn advance(&mut self) -> Result<(), ReaderError> {
        let Some(ch) = self.source.peek() else {
            return Ok(());
        };
        if ch == b'\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        self.source.bump()?;
        Ok(())
    }

    /// Returns the current byte and moves past it
    pub fn consume(&mut self) -> Result<Option<u8>, ReaderError> {
        let ch = self.peek();
        self.advance()?;
        Ok(ch)
    }

    /// Repositions to `offset` and reports `(line, col)` from there on
    ///
    /// The coordinates are taken verbatim; they are not recomputed from the
    /// input.
    #[track_caller]
    pub fn seek(&mut self, offset: i64, line: usize, col: usize) -> Result<(), ReaderError> {
        if offset < 0 {
            return Err(ReaderError::Seek(self.diagnose("position is out of range")));
        }
        let offset = offset as u64;
        if !self.source.has_origin() && offset > self.source.window().len() as u64 {
            return Err(ReaderError::Seek(self.diagnose("position is out of range")));
        }
        self.source.reposition(offset)?;
        self.line = line;
        self.col = col;
        Ok(())
    }

    /// Builds a diagnostic for the current state
    ///
    /// In verbose mode the window contents and the caller's location are
    /// attached.
    #[track_caller]
    pub fn diagnose(&self, message: impl Into<String>) -> Diagnostic {
        let diagnostic = Diagnostic::new(message, self.peek(), self.position())
            .with_origin(self.source.has_origin());
        if self.verbose {
            diagnostic.with_context(self.source.window(), Location::caller())
        } else {
            diagnostic
        }
    }

    /// Returns the current position
    pub fn position(&self) -> Position {
        Position::new(self.line, self.col, self.source.byte_offset())
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns the underlying source
    pub fn source(&self) -> &BufferedSource {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(input: &[u8]) -> Cursor {
        Cursor::new(BufferedSource::from_buffer(input.to_vec()), false)
    }

    #[test]
    fn test_column_advances() {
        let mut cursor = cursor(b"ab");
        assert_eq!((cursor.line(), cursor.col()), (0, 0));
        assert_eq!(cursor.consume().unwrap(), Some(b'a'));
        assert_eq!((cursor.line(), cursor.col()), (0, 1));
        assert_eq!(cursor.consume().unwrap(), Some(b'b'));
        assert_eq!((cursor.line(), cursor.col()), (0, 2));
        assert!(!cursor.valid());
    }

    #[test]
    fn test_newline_resets_column() {
        let mut cursor = cursor(b"a\nb");
        cursor.advance().unwrap();
        cursor.advance().unwrap();
        assert_eq!((cursor.line(), cursor.col()), (1, 0));
        assert_eq!(cursor.peek(), Some(b'b'));
    }

    #[test]
    fn test_consume_at_end_is_noop() {
        let mut cursor = cursor(b"");
        assert_eq!(cursor.consume().unwrap(), None);
        assert_eq!(cursor.position(), Position::new(0, 0, 0));
    }

    #[test]
    fn test_seek_takes_coordinates_verbatim() {
        let mut cursor = cursor(b"hello");
        cursor.seek(3, 7, 11).unwrap();
        assert_eq!(cursor.peek(), Some(b'l'));
        assert_eq!(cursor.position(), Position::new(7, 11, 3));
    }

    #[test]
    fn test_seek_rejects_out_of_range() {
        let mut cursor = cursor(b"hello");
        let error = cursor.seek(-1, 0, 0).unwrap_err();
        assert!(matches!(error, ReaderError::Seek(_)));

        let error = cursor.seek(6, 0, 0).unwrap_err();
        assert!(matches!(error, ReaderError::Seek(_)));
        // A failed seek leaves the cursor where it was
        assert_eq!(cursor.peek(), Some(b'h'));

        cursor.seek(5, 0, 5).unwrap();
        assert!(!cursor.valid());
    }

    #[test]
    fn test_verbose_diagnose_captures_window() {
        let cursor = Cursor::new(BufferedSource::from_buffer(b"xyz".to_vec()), true);
        let diagnostic = cursor.diagnose("look here");
        assert_eq!(diagnostic.window.as_deref(), Some(&b"xyz"[..]));
        assert_eq!(diagnostic.character, Some(b'x'));
        assert!(!diagnostic.has_origin);
        assert!(diagnostic.location.unwrap().file().ends_with("cursor.rs"));
    }
}
