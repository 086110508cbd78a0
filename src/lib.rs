//! # Token Reader
//!
//! A buffered, pull-based lexical scanner that turns raw bytes into
//! classified lexemes with exact line/column provenance.
//!
//! ## Overview
//!
//! The reader owns all buffering: it reads its input (a file or an
//! in-memory buffer) in fixed-size chunks, keeps line/column bookkeeping
//! correct across refills and hands out one lexeme per call. Building a
//! syntax tree out of the tokens is left to the consumer, which may also
//! reposition the reader to backtrack or to resynchronize after an error.
//!
//! ## Key Features
//!
//! - **Streaming**: files are read in chunks of a configurable size (4 KiB by default)
//! - **Strict Numbers**: JSON-like integer and floating grammar, no leading zeros
//! - **Decoded Strings**: `'` or `"` delimited literals with JSON escapes and `\uXXXX`
//! - **Precise Positions**: every token carries its 0-based start line and column
//! - **Two-Tier Diagnostics**: terse errors in release builds, window contents and
//!   call sites in debug builds
//!
//! ## Basic Usage
//!
//! ```rust
//! use token_reader::{Reader, TokenKind};
//!
//! let mut text = String::from("point(3, 4.5)");
//! let mut reader = Reader::from_string(&mut text);
//! assert!(text.is_empty()); // the reader owns the bytes now
//!
//! let mut lexeme = Vec::new();
//! let token = reader.next_token(&mut lexeme)?;
//! assert_eq!(token.kind, TokenKind::Keyword);
//! assert_eq!(lexeme, b"point");
//!
//! let token = reader.next_token(&mut lexeme)?;
//! assert_eq!(token.kind, TokenKind::OpenBracket);
//! assert_eq!((token.line, token.col), (0, 5));
//! # Ok::<(), token_reader::ReaderError>(())
//! ```
//!
//! ## Reading Files
//!
//! ```rust,no_run
//! use token_reader::{Reader, ReaderConfig, TokenKind};
//!
//! let config = ReaderConfig::default().with_chunk_size(64 * 1024);
//! let mut reader = Reader::open_with_config("input.txt", config)?;
//!
//! let mut lexeme = Vec::new();
//! loop {
//!     let token = reader.next_token(&mut lexeme)?;
//!     if token.kind == TokenKind::EndOfInput {
//!         break;
//!     }
//!     println!("{} {:?}", token, String::from_utf8_lossy(&lexeme));
//! }
//! # Ok::<(), token_reader::ReaderError>(())
//! ```
//!
//! ## Error Handling
//!
//! Errors are raised by the call that detects them and leave the reader on
//! the offending byte. Use [`Reader::jump_to`] to resume from a known point:
//!
//! ```rust
//! use token_reader::{ErrorKind, Reader};
//!
//! let mut text = String::from("0123 next");
//! let mut reader = Reader::from_string(&mut text);
//!
//! let error = reader.next_lexeme().unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::NumberFormat);
//! let position = error.position().unwrap();
//! assert_eq!((position.line, position.column), (0, 1));
//!
//! reader.jump_to(5, 0, 5)?;
//! let (_, lexeme) = reader.next_lexeme()?;
//! assert_eq!(lexeme, b"next");
//! # Ok::<(), token_reader::ReaderError>(())
//! ```

pub mod charset;
pub mod cursor;
pub mod error;
pub mod lexer;
pub mod source;


// Re-export main types
pub use error::{Diagnostic, ErrorKind, Position, ReaderError};
pub use lexer::{Reader, ReaderConfig, Token, TokenKind};
pub use source::{BufferedSource, DEFAULT_CHUNK_SIZE};
