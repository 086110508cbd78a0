//! Streaming lexical scanner
//!
//! This module provides the tokenizer: it classifies the lexeme starting at
//! the cursor into one of the [`TokenKind`]s, consumes exactly the bytes that
//! belong to it and reports the position where it started.

use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::path::Path;

use crate::charset::CHARACTER_TABLE;
use crate::cursor::Cursor;
use crate::error::{Position, ReaderError};
use crate::source::{BufferedSource, DEFAULT_CHUNK_SIZE};

/// Configuration options for the reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Maximum number of bytes read from a file per refill
    pub chunk_size: usize,
    /// Attach window contents and call sites to diagnostics
    pub verbose_diagnostics: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            verbose_diagnostics: cfg!(debug_assertions),
        }
    }
}

impl ReaderConfig {
    /// Sets the refill chunk size (clamped to at least one byte)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Selects the diagnostic tier
    pub fn with_verbose_diagnostics(mut self, verbose: bool) -> Self {
        self.verbose_diagnostics = verbose;
        self
    }
}

/// Token kinds produced by the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    EndOfInput,
    /// `(`, `[` or `{`
    OpenBracket,
    /// `)`, `]` or `}`
    CloseBracket,
    /// `,`, `;` or `:`
    Separator,
    /// Identifier-shaped word; keyword vs identifier is up to the consumer
    Keyword,
    /// Quoted literal; the lexeme holds the unescaped value
    String,
    Whitespace,
    Integer,
    Floating,
    /// Any other single byte
    SpecialCharacter,
}

impl TokenKind {
    /// Returns a string representation of the kind for messages and dumps
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::EndOfInput => "end of input",
            TokenKind::OpenBracket => "open bracket",
            TokenKind::CloseBracket => "close bracket",
            TokenKind::Separator => "separator",
            TokenKind::Keyword => "keyword",
            TokenKind::String => "string",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Integer => "integer",
            TokenKind::Floating => "floating",
            TokenKind::SpecialCharacter => "special character",
        }
    }
}

/// A classified lexeme's kind and start position
///
/// The lexeme text itself is handed out separately by [`Reader::next_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Line number (0-based)
    pub line: usize,
    /// Column number (0-based)
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, col: usize) -> Self {
        Self { kind, line, col }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.kind.name(), self.line, self.col)
    }
}

/// Pull-based scanner over a file or an in-memory buffer
#[derive(Debug)]
pub struct Reader {
    cursor: Cursor,
    config: ReaderConfig,
}

impl Reader {
    /// Opens a file with default configuration
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReaderError> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Opens a file with custom configuration
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: ReaderConfig,
    ) -> Result<Self, ReaderError> {
        let source = BufferedSource::open(path, config.chunk_size)?;
        Ok(Self {
            cursor: Cursor::new(source, config.verbose_diagnostics),
            config,
        })
    }

    /// Takes ownership of `buffer`, leaving it empty
    pub fn from_buffer(buffer: &mut Vec<u8>) -> Self {
        Self::from_buffer_with_config(buffer, ReaderConfig::default())
    }

    /// Takes ownership of `buffer` with custom configuration
    ///
    /// `chunk_size` has no effect here: the whole buffer is one window.
    pub fn from_buffer_with_config(buffer: &mut Vec<u8>, config: ReaderConfig) -> Self {
        let source = BufferedSource::from_buffer(std::mem::take(buffer));
        Self {
            cursor: Cursor::new(source, config.verbose_diagnostics),
            config,
        }
    }

    /// Takes ownership of `text`, leaving it empty
    pub fn from_string(text: &mut String) -> Self {
        let mut bytes = std::mem::take(text).into_bytes();
        Self::from_buffer(&mut bytes)
    }

    /// Returns the configuration the reader was built with
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Returns the current position (0-based line/col, absolute byte offset)
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Returns the absolute offset of the next unread byte
    ///
    /// Recording this before a `next_token` call gives the offset to hand to
    /// [`jump_to`](Self::jump_to) when backtracking to that token.
    pub fn byte_offset(&self) -> u64 {
        self.cursor.source().byte_offset()
    }

    /// True once `next_token` would return `EndOfInput`
    pub fn is_exhausted(&self) -> bool {
        !self.cursor.valid()
    }

    /// Reads the next lexeme into `lexeme` and returns its token
    ///
    /// `lexeme` is cleared first. On error the cursor stays at the byte that
    /// caused the failure; bytes already consumed are not restored.
    pub fn next_token(&mut self, lexeme: &mut Vec<u8>) -> Result<Token, ReaderError> {
        lexeme.clear();
        let (line, col) = (self.cursor.line(), self.cursor.col());
        let Some(ch) = self.cursor.peek() else {
            return Ok(Token::new(TokenKind::EndOfInput, line, col));
        };

        let kind = if CHARACTER_TABLE.is_open_bracket(ch) {
            self.read_single(lexeme)?;
            TokenKind::OpenBracket
        } else if CHARACTER_TABLE.is_close_bracket(ch) {
            self.read_single(lexeme)?;
            TokenKind::CloseBracket
        } else if CHARACTER_TABLE.is_separator(ch) {
            self.read_single(lexeme)?;
            TokenKind::Separator
        } else if CHARACTER_TABLE.is_keyword_start(ch) {
            self.read_keyword(lexeme)?;
            TokenKind::Keyword
        } else if CHARACTER_TABLE.is_digit(ch) {
            self.read_number(lexeme)?
        } else if CHARACTER_TABLE.is_quote(ch) {
            self.read_string(lexeme)?;
            TokenKind::String
        } else if CHARACTER_TABLE.is_whitespace(ch) {
            self.read_whitespace(lexeme)?;
            TokenKind::Whitespace
        } else {
            self.read_single(lexeme)?;
            TokenKind::SpecialCharacter
        };

        Ok(Token::new(kind, line, col))
    }

    /// Owned-lexeme variant of [`next_token`](Self::next_token)
    pub fn next_lexeme(&mut self) -> Result<(Token, Vec<u8>), ReaderError> {
        let mut lexeme = Vec::new();
        let token = self.next_token(&mut lexeme)?;
        Ok((token, lexeme))
    }

    /// Reads up to and including the next newline, or `max_size` bytes
    ///
    /// Returns the `(line, col)` where the read began.
    pub fn read_line(
        &mut self,
        data: &mut Vec<u8>,
        max_size: usize,
    ) -> Result<(usize, usize), ReaderError> {
        data.clear();
        let start = (self.cursor.line(), self.cursor.col());
        while data.len() < max_size {
            let Some(ch) = self.cursor.consume()? else {
                break;
            };
            data.push(ch);
            if ch == b'\n' {
                break;
            }
        }
        Ok(start)
    }

    /// Jumps to an absolute byte offset
    ///
    /// `line` and `col` are trusted as the coordinates of `offset`; the reader
    /// does not validate them against the input.
    #[track_caller]
    pub fn jump_to(&mut self, offset: i64, line: usize, col: usize) -> Result<(), ReaderError> {
        self.cursor.seek(offset, line, col)
    }

    /// Builds an error carrying the reader's current context
    ///
    /// Intended for consumers that want their own failures to point at the
    /// scanner position.
    #[track_caller]
    pub fn interrupt(&self, message: impl Into<String>) -> ReaderError {
        ReaderError::Interrupted(self.cursor.diagnose(message))
    }

    fn read_single(&mut self, lexeme: &mut Vec<u8>) -> Result<(), ReaderError> {
        if let Some(ch) = self.cursor.consume()? {
            lexeme.push(ch);
        }
        Ok(())
    }

    /// Consumes bytes while `accept` holds
    fn read_while(
        &mut self,
        lexeme: &mut Vec<u8>,
        accept: impl Fn(u8) -> bool,
    ) -> Result<(), ReaderError> {
        while let Some(ch) = self.cursor.peek() {
            if !accept(ch) {
                break;
            }
            lexeme.push(ch);
            self.cursor.advance()?;
        }
        Ok(())
    }

    fn read_whitespace(&mut self, lexeme: &mut Vec<u8>) -> Result<(), ReaderError> {
        self.read_while(lexeme, |ch| CHARACTER_TABLE.is_whitespace(ch))
    }

    fn read_keyword(&mut self, lexeme: &mut Vec<u8>) -> Result<(), ReaderError> {
        self.read_single(lexeme)?;
        self.read_while(lexeme, |ch| CHARACTER_TABLE.is_keyword_char(ch))
    }

    fn read_digits(&mut self, lexeme: &mut Vec<u8>) -> Result<(), ReaderError> {
        self.read_while(lexeme, |ch| CHARACTER_TABLE.is_digit(ch))
    }

    fn peek_is_digit(&self) -> bool {
        self.cursor.peek().is_some_and(|ch| CHARACTER_TABLE.is_digit(ch))
    }

    #[track_caller]
    fn number_error(&self, message: &str) -> ReaderError {
        ReaderError::NumberFormat(self.cursor.diagnose(message))
    }

    #[track_caller]
    fn string_error(&self, message: &str) -> ReaderError {
        ReaderError::StringLiteral(self.cursor.diagnose(message))
    }

    /// Reads an integer or floating literal
    ///
    /// Grammar: `0 | [1-9][0-9]*`, then optional `.[0-9]+`, then optional
    /// `[eE][+-]?[0-9]+`. Either optional part makes the literal floating.
    fn read_number(&mut self, lexeme: &mut Vec<u8>) -> Result<TokenKind, ReaderError> {
        let mut kind = TokenKind::Integer;

        match self.cursor.peek() {
            Some(b'0') => {
                self.read_single(lexeme)?;
                if self.peek_is_digit() {
                    return Err(self.number_error(
                        "invalid number format: leading zeros are not allowed",
                    ));
                }
            }
            Some(ch) if CHARACTER_TABLE.is_digit(ch) => self.read_digits(lexeme)?,
            _ => return Err(self.number_error("invalid number format: expected digit")),
        }

        if self.cursor.peek() == Some(b'.') {
            kind = TokenKind::Floating;
            self.read_single(lexeme)?;
            if !self.peek_is_digit() {
                return Err(self.number_error(
                    "invalid number format: expected digit after decimal",
                ));
            }
            self.read_digits(lexeme)?;
        }

        if matches!(self.cursor.peek(), Some(b'e' | b'E')) {
            kind = TokenKind::Floating;
            self.read_single(lexeme)?;
            if matches!(self.cursor.peek(), Some(b'+' | b'-')) {
                self.read_single(lexeme)?;
            }
            if !self.peek_is_digit() {
                return Err(self.number_error(
                    "invalid number format: expected digit after exponent",
                ));
            }
            self.read_digits(lexeme)?;
        }

        Ok(kind)
    }

    /// Reads a quoted string, writing the unescaped value to `value`
    ///
    /// The opening byte (`'` or `"`) is also the closing one.
    fn read_string(&mut self, value: &mut Vec<u8>) -> Result<(), ReaderError> {
        let Some(quote) = self.cursor.consume()? else {
            return Err(self.string_error("missing closing quote"));
        };

        loop {
            let Some(ch) = self.cursor.peek() else {
                return Err(self.string_error("missing closing quote"));
            };

            if ch == quote {
                self.cursor.advance()?;
                return Ok(());
            }

            if ch != b'\\' {
                value.push(ch);
                self.cursor.advance()?;
                continue;
            }

            self.cursor.advance()?;
            let Some(escape) = self.cursor.peek() else {
                return Err(self.string_error("missing closing quote"));
            };
            match escape {
                b'"' => value.push(b'"'),
                b'\\' => value.push(b'\\'),
                b'/' => value.push(b'/'),
                b'b' => value.push(0x08),
                b'f' => value.push(0x0C),
                b'n' => value.push(b'\n'),
                b'r' => value.push(b'\r'),
                b't' => value.push(b'\t'),
                b'u' => {
                    let unit = self.read_unicode_escape()?;
                    push_code_unit(unit, value);
                }
                _ => return Err(self.string_error("invalid escape sequence")),
            }
            // Past the escape letter, or the last hex digit of `\u`
            self.cursor.advance()?;
        }
    }

    /// Reads the four hex digits after `\u`, leaving the cursor on the last one
    fn read_unicode_escape(&mut self) -> Result<u16, ReaderError> {
        let mut digits: SmallVec<[u8; 4]> = SmallVec::new();
        for _ in 0..4 {
            self.cursor.advance()?;
            match self.cursor.peek() {
                Some(ch) if ch.is_ascii_hexdigit() => digits.push(ch),
                _ => return Err(self.string_error("invalid Unicode escape sequence")),
            }
        }
        Ok(digits
            .iter()
            .fold(0u16, |unit, &digit| (unit << 4) | hex_value(digit)))
    }
}

fn hex_value(digit: u8) -> u16 {
    match digit {
        b'0'..=b'9' => (digit - b'0') as u16,
        b'a'..=b'f' => (digit - b'a' + 10) as u16,
        b'A'..=b'F' => (digit - b'A' + 10) as u16,
        _ => 0,
    }
}

/// Appends a UTF-16 code unit as UTF-8
///
/// Surrogate halves are not paired up: each one is written as its own
/// three-byte sequence, which is not valid UTF-8.
fn push_code_unit(unit: u16, out: &mut Vec<u8>) {
    match char::from_u32(unit as u32) {
        Some(ch) => {
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        }
        None => {
            debug!("lone surrogate \\u{:04X} in string literal", unit);
            out.extend_from_slice(&[
                0xE0 | (unit >> 12) as u8,
                0x80 | ((unit >> 6) & 0x3F) as u8,
                0x80 | (unit & 0x3F) as u8,
            ]);
        }
    }
}
