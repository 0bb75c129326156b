//! Event types for the HOCON event-based parser.

use crate::{Position, Token};

/// How a key binds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// `=`, `:`, or an object value directly following the key. A later
    /// assignment to the same key overwrites, except that two object
    /// values merge recursively.
    Assign,
    /// `+=`. A later append to the same key extends the existing value.
    Append,
}

/// Events emitted by the parser, in strict source order.
///
/// Tokens and token arrays carried by events are owned by the receiving
/// callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `{` opened, or the start of the implicit root object.
    ObjStart,
    /// Matching `}`, or the end of the implicit root object.
    ObjEnd,
    /// `[` opened.
    ArrStart,
    /// Matching `]`.
    ArrEnd,

    /// A key and its separator have been consumed; value events follow.
    ///
    /// `key` holds the key's tokens, including any whitespace tokens
    /// between them (whitespace is never first or last). It may be empty
    /// for an empty key.
    KeyValStart {
        /// Key tokens.
        key: Vec<Token>,
        /// Assignment mode of the separator.
        sep: Assignment,
    },
    /// The value of the current key-value pair is complete.
    KeyValEnd,

    /// Start of an array element; value events follow.
    ValStart,
    /// End of an array element.
    ValEnd,

    /// A token inside a value: scalar, string, unquoted text, or interior
    /// whitespace of a concatenation.
    Token(Token),

    /// A `${path}` or `${?path}` substitution inside a value.
    VarSub {
        /// Path tokens, in the same shape as a key token array.
        path: Vec<Token>,
        /// Whether the substitution is optional (`${?...}`).
        optional: bool,
        /// Position of the opening `${`.
        pos: Position,
    },
}
