//! Document tree representation for HOCON configuration files.
//!
//! This crate assembles the event stream of [`hocon_parse`] into an
//! object/array tree and applies HOCON's post-processing: entries are
//! sorted by key, duplicate keys are merged (`=`/`:` overwrites, with
//! deep merge for object values; `+=` appends), and dotted keys expand
//! into nested objects. Scalar values stay unresolved token sequences;
//! substitution resolution is a later pass over the finished tree.

mod builder;
mod diagnostic;
mod path;
mod value;

pub use builder::{BuildError, TreeBuilder};
pub use diagnostic::{render, write_report};
pub use hocon_parse::{Assignment, Error, ErrorKind, Format, Input, Position, Token, TokenKind};
pub use value::{Array, Object, ObjectEntry, Tree, Value};

use std::fmt;

/// Error from the one-call tree API.
#[derive(Debug)]
pub enum TreeError {
    /// The parser rejected the input.
    Parse(hocon_parse::Error),
    /// The events were fine but the tree could not be built.
    Build(BuildError),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Parse(err) => err.fmt(f),
            TreeError::Build(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Parse(err) => Some(err),
            TreeError::Build(err) => Some(err),
        }
    }
}

impl From<hocon_parse::Error> for TreeError {
    fn from(err: hocon_parse::Error) -> Self {
        TreeError::Parse(err)
    }
}

impl From<BuildError> for TreeError {
    fn from(err: BuildError) -> Self {
        TreeError::Build(err)
    }
}

/// Parse a HOCON document into a post-processed tree.
pub fn parse(input: Input<'_>, fmt: Format) -> Result<Tree, TreeError> {
    let mut builder = TreeBuilder::new();
    match hocon_parse::parse(input, fmt, &mut builder) {
        Ok(()) => builder.finish().map_err(TreeError::Build),
        Err(err) => {
            // A refusal from the builder surfaces as its own error
            if matches!(err.kind(), ErrorKind::ReaderAborted) {
                if let Some(build_err) = builder.take_error() {
                    return Err(TreeError::Build(build_err));
                }
            }
            Err(TreeError::Parse(err))
        }
    }
}

/// Parse a HOCON document from a string.
pub fn parse_str(source: &str) -> Result<Tree, TreeError> {
    parse(Input::text(source), Format::Hocon)
}

#[cfg(test)]
mod tests;
