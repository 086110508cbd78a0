//! Error types and position tracking for the reader
//!
//! Every error the reader raises carries a [`Diagnostic`] describing the
//! offending byte and where it was found. Diagnostics come in two tiers:
//! terse (message, byte, 1-based line/column) and verbose, which also records
//! the raw window contents and the call site that detected the problem.

use std::fmt;
use std::io;
use std::panic::Location;
use std::path::PathBuf;
use thiserror::Error;

/// Represents a position in the input
///
/// `line` and `column` are 0-based, matching [`Token`](crate::Token).
/// The `Display` form is 1-based for human consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line number (0-based)
    pub line: usize,
    /// Column number (0-based)
    pub column: usize,
    /// Absolute byte offset from start of input
    pub offset: u64,
}

impl Position {
    /// Creates a new position
    pub fn new(line: usize, column: usize, offset: u64) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Returns the (line, column) pair in 1-based form
    pub fn one_based(&self) -> (usize, usize) {
        (self.line + 1, self.column + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, column) = self.one_based();
        write!(f, "{}:{}", line, column)
    }
}

/// Context captured at the moment an error was detected
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Description of the problem
    pub message: String,
    /// The byte under the cursor, `None` when input is exhausted
    pub character: Option<u8>,
    /// Where the cursor stood
    pub position: Position,
    /// Whether the reader is backed by a file
    pub has_origin: bool,
    /// Raw window contents (verbose tier only)
    pub window: Option<Vec<u8>>,
    /// Call site that raised the error (verbose tier only)
    pub location: Option<&'static Location<'static>>,
}

impl Diagnostic {
    /// Creates a terse diagnostic
    pub fn new(message: impl Into<String>, character: Option<u8>, position: Position) -> Self {
        Self {
            message: message.into(),
            character,
            position,
            has_origin: false,
            window: None,
            location: None,
        }
    }

    /// Records whether the reader is backed by a file
    pub fn with_origin(mut self, has_origin: bool) -> Self {
        self.has_origin = has_origin;
        self
    }

    /// Upgrades the diagnostic to the verbose tier
    pub fn with_context(mut self, window: &[u8], location: &'static Location<'static>) -> Self {
        self.window = Some(window.to_vec());
        self.location = Some(location);
        self
    }

    /// Returns true if the window and call site were captured
    pub fn is_verbose(&self) -> bool {
        self.window.is_some()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, column) = self.position.one_based();
        write!(f, "[Reader-Error] {}. ", self.message)?;
        if self.is_verbose() && !self.has_origin {
            write!(f, "no input stream open. ")?;
        }
        match self.character {
            Some(ch) => write!(
                f,
                "character '{}' (ASCII: {}) was found at line {}, column {}.",
                ch.escape_ascii(),
                ch,
                line,
                column
            )?,
            None => write!(
                f,
                "position is out of range. line: {}, column: {} exceeds available input.",
                line, column
            )?,
        }
        if let Some(location) = self.location {
            write!(
                f,
                " in file: {}({}:{})",
                location.file(),
                location.line(),
                location.column()
            )?;
        }
        if let Some(window) = &self.window {
            write!(f, "\n{}", String::from_utf8_lossy(window))?;
        }
        Ok(())
    }
}

/// Fieldless classification of [`ReaderError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OpenFailure,
    NumberFormat,
    StringLiteral,
    Seek,
    Interrupted,
    Io,
}

/// Main error type for reader operations
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The input file could not be opened
    #[error("failed to open file: {}", .path.display())]
    OpenFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed integer or floating literal
    #[error("{0}")]
    NumberFormat(Diagnostic),

    /// Invalid escape or unterminated string literal
    #[error("{0}")]
    StringLiteral(Diagnostic),

    /// Repositioning target out of range
    #[error("{0}")]
    Seek(Diagnostic),

    /// Raised on behalf of a consumer through `Reader::interrupt`
    #[error("{0}")]
    Interrupted(Diagnostic),

    /// A read from the backing file failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ReaderError {
    /// Returns the error classification
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReaderError::OpenFailure { .. } => ErrorKind::OpenFailure,
            ReaderError::NumberFormat(_) => ErrorKind::NumberFormat,
            ReaderError::StringLiteral(_) => ErrorKind::StringLiteral,
            ReaderError::Seek(_) => ErrorKind::Seek,
            ReaderError::Interrupted(_) => ErrorKind::Interrupted,
            ReaderError::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns the captured context, if this error carries one
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ReaderError::NumberFormat(diagnostic)
            | ReaderError::StringLiteral(diagnostic)
            | ReaderError::Seek(diagnostic)
            | ReaderError::Interrupted(diagnostic) => Some(diagnostic),
            ReaderError::OpenFailure { .. } | ReaderError::Io(_) => None,
        }
    }

    /// Returns the position where the error was detected
    pub fn position(&self) -> Option<Position> {
        self.diagnostic().map(|diagnostic| diagnostic.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display_is_one_based() {
        let pos = Position::new(0, 0, 0);
        assert_eq!(format!("{}", pos), "1:1");

        let pos = Position::new(41, 12, 100);
        assert_eq!(format!("{}", pos), "42:13");
        assert_eq!(pos.one_based(), (42, 13));
    }

    #[test]
    fn test_terse_diagnostic() {
        let diagnostic = Diagnostic::new("invalid escape sequence", Some(b'q'), Position::new(2, 4, 20));
        assert!(!diagnostic.is_verbose());
        assert_eq!(
            diagnostic.to_string(),
            "[Reader-Error] invalid escape sequence. character 'q' (ASCII: 113) was found at line 3, column 5."
        );
    }

    #[test]
    fn test_terse_diagnostic_at_end_of_input() {
        let diagnostic = Diagnostic::new("missing closing quote", None, Position::new(0, 6, 6));
        assert_eq!(
            diagnostic.to_string(),
            "[Reader-Error] missing closing quote. position is out of range. line: 1, column: 7 exceeds available input."
        );
    }

    #[test]
    fn test_verbose_diagnostic() {
        let location = Location::caller();
        let diagnostic = Diagnostic::new("boom", Some(b'\n'), Position::new(0, 1, 1))
            .with_context(b"a\nb", location);
        let text = diagnostic.to_string();

        assert!(diagnostic.is_verbose());
        assert!(text.contains("no input stream open."));
        assert!(text.contains("character '\\n' (ASCII: 10)"));
        assert!(text.contains(&format!("in file: {}", location.file())));
        assert!(text.ends_with("\na\nb"));

        let diagnostic = diagnostic.with_origin(true);
        assert!(!diagnostic.to_string().contains("no input stream open."));
    }

    #[test]
    fn test_error_kind_and_diagnostic() {
        let error = ReaderError::Seek(Diagnostic::new("position is out of range", None, Position::default()));
        assert_eq!(error.kind(), ErrorKind::Seek);
        assert!(error.diagnostic().is_some());
        assert_eq!(error.position(), Some(Position::default()));

        let error = ReaderError::from(io::Error::new(io::ErrorKind::Other, "disk"));
        assert_eq!(error.kind(), ErrorKind::Io);
        assert!(error.diagnostic().is_none());
        assert_eq!(error.to_string(), "IO error: disk");
    }
}
