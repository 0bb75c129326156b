//! Parse input sources.

use std::fs::File;
use std::io::{self, Read};

/// A byte stream feeding the lexer.
///
/// Either an in-memory slice with an advancing cursor, or any
/// [`io::Read`] implementation (a file, stdin, a cursor). The lexer does
/// its own buffering, so readers need not be buffered.
pub struct Input<'a> {
    kind: InputKind<'a>,
}

enum InputKind<'a> {
    Bytes { bytes: &'a [u8], pos: usize },
    Reader(Box<dyn Read + 'a>),
}

impl<'a> Input<'a> {
    /// Input over an in-memory byte slice.
    pub fn bytes(bytes: &'a [u8]) -> Self {
        Self {
            kind: InputKind::Bytes { bytes, pos: 0 },
        }
    }

    /// Input over a string.
    pub fn text(text: &'a str) -> Self {
        Self::bytes(text.as_bytes())
    }

    /// Input over an arbitrary reader.
    pub fn reader(reader: impl Read + 'a) -> Self {
        Self {
            kind: InputKind::Reader(Box::new(reader)),
        }
    }

    /// Input over an open file.
    pub fn file(file: File) -> Input<'static> {
        Input {
            kind: InputKind::Reader(Box::new(file)),
        }
    }

    /// Read up to `dst.len()` bytes. Returns 0 only at end of input.
    pub(crate) fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        match &mut self.kind {
            InputKind::Bytes { bytes, pos } => {
                let remaining = &bytes[*pos..];
                let n = remaining.len().min(dst.len());
                dst[..n].copy_from_slice(&remaining[..n]);
                *pos += n;
                Ok(n)
            }
            InputKind::Reader(reader) => reader.read(dst),
        }
    }
}

impl std::fmt::Debug for Input<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            InputKind::Bytes { bytes, pos } => f
                .debug_struct("Input::Bytes")
                .field("len", &bytes.len())
                .field("pos", pos)
                .finish(),
            InputKind::Reader(_) => f.debug_struct("Input::Reader").finish_non_exhaustive(),
        }
    }
}
