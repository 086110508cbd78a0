//! Buffered byte source
//!
//! A [`BufferedSource`] owns the origin of the input (an open file, or
//! nothing when reading from an in-memory buffer) and a finite window of
//! bytes read from it. The window is replaced wholesale on every refill.

use log::{debug, trace};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::ReaderError;

/// Default number of bytes read per refill
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Finite look-ahead window over a byte origin
#[derive(Debug)]
pub struct BufferedSource {
    /// Backing file, `None` for buffer-only sources
    origin: Option<File>,
    /// Bytes currently available without a refill
    window: Vec<u8>,
    /// Index of the next unread byte in `window`
    shift: usize,
    /// Byte offset in the origin where `window` begins
    offset: u64,
    /// Maximum window length
    chunk_size: usize,
    /// Set once a refill came back short
    exhausted: bool,
}

impl BufferedSource {
    /// Opens `path` for sequential binary reading and loads the first chunk
    ///
    /// The file handle is dropped on every failure path after it was opened.
    pub fn open<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<Self, ReaderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReaderError::OpenFailure {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("opened {} with chunk size {}", path.display(), chunk_size);

        let mut buffered = Self {
            origin: Some(file),
            window: Vec::with_capacity(chunk_size.max(1)),
            shift: 0,
            offset: 0,
            chunk_size: chunk_size.max(1),
            exhausted: false,
        };
        // A path that opens but cannot be read (a directory) fails here
        buffered
            .refill()
            .map_err(|source| ReaderError::OpenFailure {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(buffered)
    }

    /// Adopts `bytes` as the one and only window
    pub fn from_buffer(bytes: Vec<u8>) -> Self {
        let chunk_size = bytes.len();
        Self {
            origin: None,
            window: bytes,
            shift: 0,
            offset: 0,
            chunk_size,
            exhausted: true,
        }
    }

    /// True iff a byte is available without a refill
    #[inline(always)]
    pub fn valid(&self) -> bool {
        self.shift < self.window.len()
    }

    /// Returns the byte under the cursor
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.window.get(self.shift).copied()
    }

    /// Moves past the current byte, refilling once the window is used up
    pub fn bump(&mut self) -> io::Result<()> {
        debug_assert!(self.valid(), "bump past end of window");
        self.shift += 1;
        if self.shift >= self.window.len() {
            self.refill()?;
        }
        Ok(())
    }

    /// Replaces the window with the next chunk from the origin
    ///
    /// A short read shrinks the window and marks the origin exhausted. Does
    /// nothing for buffer-only sources or once the origin is exhausted.
    pub fn refill(&mut self) -> io::Result<()> {
        let Some(file) = self.origin.as_mut() else {
            return Ok(());
        };
        if self.exhausted {
            return Ok(());
        }

        self.offset = file.stream_position()?;
        self.window.clear();
        let read = file
            .by_ref()
            .take(self.chunk_size as u64)
            .read_to_end(&mut self.window)?;
        self.shift = 0;
        trace!("refilled {} bytes at offset {}", read, self.offset);

        if read < self.chunk_size {
            self.exhausted = true;
            debug!("origin exhausted at offset {}", self.offset + read as u64);
        }
        Ok(())
    }

    /// Repositions to an absolute byte offset
    ///
    /// File-backed sources seek the origin and refill; buffer-only sources
    /// move the in-window index. Range checks are the caller's job.
    pub fn reposition(&mut self, offset: u64) -> io::Result<()> {
        match self.origin.as_mut() {
            Some(file) => {
                file.seek(SeekFrom::Start(offset))?;
                self.exhausted = false;
                self.refill()?;
            }
            None => {
                self.shift = offset as usize;
            }
        }
        debug!("repositioned to offset {}", offset);
        Ok(())
    }

    /// Returns true if the source is backed by a file
    pub fn has_origin(&self) -> bool {
        self.origin.is_some()
    }

    /// Returns the current window contents
    pub fn window(&self) -> &[u8] {
        &self.window
    }

    /// Returns the index of the next unread byte in the window
    pub fn shift(&self) -> usize {
        self.shift
    }

    /// Returns the origin offset where the window starts
    pub fn window_offset(&self) -> u64 {
        self.offset
    }

    /// Returns the absolute offset of the next unread byte
    pub fn byte_offset(&self) -> u64 {
        self.offset + self.shift as u64
    }

    /// Returns the maximum window length
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}
