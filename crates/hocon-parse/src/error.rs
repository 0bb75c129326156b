//! Error type for lexing and parsing.

use std::fmt;
use std::io;

use crate::Position;

/// What went wrong.
#[derive(Debug)]
pub enum ErrorKind {
    /// API misuse (unknown format tag).
    InvalidArgument(String),
    /// Malformed token or grammar violation.
    Syntax(String),
    /// Malformed UTF-8 in the input (RFC 3629 violation, overlong form,
    /// or out-of-range code point).
    InvalidEncoding,
    /// The underlying read primitive failed.
    Io(io::Error),
    /// A parse callback returned `false`.
    ReaderAborted,
    /// Explicitly deferred feature.
    Unimplemented(&'static str),
}

/// A lexing or parsing error, with the source position where it occurred
/// when known.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    pos: Option<Position>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, pos: Option<Position>) -> Self {
        Self { kind, pos }
    }

    pub(crate) fn syntax(msg: impl Into<String>, pos: Position) -> Self {
        Self::new(ErrorKind::Syntax(msg.into()), Some(pos))
    }

    pub(crate) fn invalid_encoding(pos: Position) -> Self {
        Self::new(ErrorKind::InvalidEncoding, Some(pos))
    }

    pub(crate) fn io(err: io::Error, pos: Position) -> Self {
        Self::new(ErrorKind::Io(err), Some(pos))
    }

    pub(crate) fn reader_aborted() -> Self {
        Self::new(ErrorKind::ReaderAborted, None)
    }

    pub(crate) fn unimplemented(what: &'static str, pos: Position) -> Self {
        Self::new(ErrorKind::Unimplemented(what), Some(pos))
    }

    /// The error kind.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The source position the error was reported at, if any.
    pub fn position(&self) -> Option<Position> {
        self.pos
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg)?,
            ErrorKind::Syntax(msg) => write!(f, "syntax error: {}", msg)?,
            ErrorKind::InvalidEncoding => write!(f, "invalid UTF-8 encoding")?,
            ErrorKind::Io(err) => write!(f, "i/o error: {}", err)?,
            ErrorKind::ReaderAborted => write!(f, "parsing aborted by reader")?,
            ErrorKind::Unimplemented(what) => write!(f, "unimplemented: {}", what)?,
        }
        if let Some(pos) = self.pos {
            write!(f, " at {}", pos)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}
