//! Key-path flattening.
//!
//! HOCON allows `a.b.c = 1` as sugar for `a = { b = { c = 1 } }`. A key
//! arrives from the parser as a token array; this module splits it into
//! successive path segments. Dots inside unquoted (and number) tokens
//! separate segments; dots inside quoted strings are literal; interior
//! whitespace joins the current segment.

use hocon_parse::{Token, TokenKind};

/// Flatten a key (or substitution path) token array into path segments.
/// Always returns at least one segment; an empty key yields one empty
/// segment.
pub(crate) fn flatten_key(toks: &[Token]) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    for tok in toks {
        match tok.kind {
            TokenKind::String | TokenKind::Ws => current.push_str(&tok.text),
            TokenKind::True => current.push_str("true"),
            TokenKind::False => current.push_str("false"),
            TokenKind::Null => current.push_str("null"),
            TokenKind::Number | TokenKind::Unquoted => {
                let mut parts = tok.text.split('.');
                if let Some(first) = parts.next() {
                    current.push_str(first);
                }
                for part in parts {
                    segments.push(std::mem::take(&mut current));
                    current.push_str(part);
                }
            }
            // The parser only puts the kinds above into key arrays
            _ => {}
        }
    }
    segments.push(current);
    segments
}
