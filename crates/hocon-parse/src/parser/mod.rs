//! Event-based parser for HOCON documents.

use std::collections::VecDeque;

use crate::error::{Error, ErrorKind};
#[allow(unused_imports)]
use crate::trace;
use crate::{
    Assignment, Event, Input, LexOptions, Lexer, ParseCallback, Position, Token, TokenKind,
};

/// Input format tag.
///
/// HOCON is the only format currently defined; the tag exists so parse
/// entry points keep a stable shape if other formats are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Format {
    /// Human-Optimized Config Object Notation.
    Hocon,
}

/// Knobs for parser behavior.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Accept a `,` where a value was expected, producing an empty value.
    pub allow_empty_values: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_empty_values: true,
        }
    }
}

/// Parse `input` as `fmt`, pushing events into `callback`.
///
/// This is the main entry point. Events arrive in strict source order;
/// the first error (or the callback returning `false`) aborts the parse.
pub fn parse<C: ParseCallback>(input: Input<'_>, fmt: Format, callback: &mut C) -> Result<(), Error> {
    Parser::new(input, fmt)?.parse(callback)
}

/// Event-based parser over a token stream.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Lookahead buffer; tokens are popped front as they are consumed.
    lookahead: VecDeque<Token>,
    opts: ParseOptions,
}

/// Whitespace and comment text handling for the parser's lexer: interior
/// whitespace of keys and concatenations is passed through to the sink,
/// so its text is kept; comment text is never needed.
const LEX_OPTS: LexOptions = LexOptions {
    include_ws_text: true,
    include_comment_text: false,
};

impl<'a> Parser<'a> {
    /// Create a parser with default options.
    pub fn new(input: Input<'a>, fmt: Format) -> Result<Self, Error> {
        Self::with_options(input, fmt, ParseOptions::default())
    }

    /// Create a parser with explicit options.
    pub fn with_options(input: Input<'a>, fmt: Format, opts: ParseOptions) -> Result<Self, Error> {
        match fmt {
            Format::Hocon => {}
            #[allow(unreachable_patterns)]
            other => {
                return Err(Error::new(
                    ErrorKind::InvalidArgument(format!("unsupported format {:?}", other)),
                    None,
                ));
            }
        }
        Ok(Self {
            lexer: Lexer::new(input),
            lookahead: VecDeque::new(),
            opts,
        })
    }

    /// Run the parse, pushing events into `callback`.
    pub fn parse<C: ParseCallback>(mut self, callback: &mut C) -> Result<(), Error> {
        self.skip_ws()?;

        let opener = match self.peek()?.kind {
            TokenKind::OpenBrace => {
                self.pop();
                Some(TokenKind::OpenBrace)
            }
            TokenKind::OpenSquare => {
                self.pop();
                Some(TokenKind::OpenSquare)
            }
            _ => None,
        };

        if opener == Some(TokenKind::OpenSquare) {
            trace!("root array");
            emit(callback, Event::ArrStart)?;
            self.parse_array_body(callback)?;
            self.expect(TokenKind::CloseSquare, "']' to close the root array")?;
            emit(callback, Event::ArrEnd)?;
        } else {
            trace!("root object (explicit: {})", opener.is_some());
            emit(callback, Event::ObjStart)?;
            self.parse_object_body(callback)?;
            if opener.is_some() {
                self.expect(TokenKind::CloseBrace, "'}' to match the opening '{'")?;
            }
            emit(callback, Event::ObjEnd)?;
        }

        self.skip_ws()?;
        let tok = self.peek()?;
        if tok.kind != TokenKind::Eof {
            return Err(Error::syntax(
                format!("trailing input starting with {}", describe(tok)),
                tok.pos,
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookahead
    // ------------------------------------------------------------------

    /// Ensure `n` tokens of lookahead (the stream is padded with `Eof`).
    fn ensure(&mut self, n: usize) -> Result<(), Error> {
        while self.lookahead.len() < n {
            if matches!(self.lookahead.back(), Some(t) if t.kind == TokenKind::Eof) {
                break;
            }
            let tok = self.lexer.next_token(&LEX_OPTS)?;
            self.lookahead.push_back(tok);
        }
        Ok(())
    }

    /// Peek the next token without consuming it.
    fn peek(&mut self) -> Result<&Token, Error> {
        self.ensure(1)?;
        Ok(&self.lookahead[0])
    }

    /// Consume the next token. Must have been peeked first.
    fn pop(&mut self) -> Token {
        self.lookahead.pop_front().expect("pop without peek")
    }

    /// Discard whitespace and comment tokens.
    fn skip_ws(&mut self) -> Result<(), Error> {
        while self.peek()?.kind.is_ws_or_comment() {
            self.pop();
        }
        Ok(())
    }

    /// Consume the expected token kind or fail.
    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, Error> {
        self.skip_ws()?;
        let tok = self.peek()?;
        if tok.kind != kind {
            return Err(Error::syntax(
                format!("expected {}, found {}", what, describe(tok)),
                tok.pos,
            ));
        }
        Ok(self.pop())
    }

    // ------------------------------------------------------------------
    // Grammar
    // ------------------------------------------------------------------

    /// Parse the entries of an object, stopping before `}` or EOF.
    fn parse_object_body<C: ParseCallback>(&mut self, callback: &mut C) -> Result<(), Error> {
        loop {
            self.skip_ws()?;
            let tok = self.peek()?;
            match tok.kind {
                TokenKind::CloseBrace | TokenKind::Eof => break,
                _ => {}
            }

            // Include resolution (file loading, URL fetch) is deferred.
            if tok.kind == TokenKind::Unquoted && tok.text == "include" {
                return Err(Error::unimplemented("include statements", tok.pos));
            }

            let key = self.parse_key()?;
            let sep = self.parse_kv_sep()?;
            emit(callback, Event::KeyValStart { key, sep })?;
            self.parse_value(callback)?;
            emit(callback, Event::KeyValEnd)?;
        }
        Ok(())
    }

    /// Parse the elements of an array, stopping before `]` or EOF.
    fn parse_array_body<C: ParseCallback>(&mut self, callback: &mut C) -> Result<(), Error> {
        loop {
            self.skip_ws()?;
            match self.peek()?.kind {
                TokenKind::CloseSquare | TokenKind::Eof => break,
                _ => {}
            }
            emit(callback, Event::ValStart)?;
            self.parse_value(callback)?;
            emit(callback, Event::ValEnd)?;
        }
        Ok(())
    }

    /// Parse a key: a run of key tokens with interior whitespace kept.
    ///
    /// Whitespace between key tokens is preserved in the returned array
    /// (never first or last) so the sink can reconstruct dotted paths. A
    /// whitespace run containing a newline terminates the key; HOCON's
    /// implicit separator never lets a key continue on the next line. The
    /// result may be empty.
    fn parse_key(&mut self) -> Result<Vec<Token>, Error> {
        self.skip_ws()?;
        let mut key: Vec<Token> = Vec::new();
        let mut ws_run: Vec<Token> = Vec::new();
        loop {
            let tok = self.peek()?;
            match tok.kind {
                kind if kind.is_key_token() => {
                    key.append(&mut ws_run);
                    key.push(self.pop());
                }
                TokenKind::Ws if !key.is_empty() => {
                    ws_run.push(self.pop());
                }
                _ => break,
            }
        }
        Ok(key)
    }

    /// Parse the key-value separator, returning its assignment mode.
    ///
    /// `{` counts as an implicit assign and is left in the stream (the
    /// object is the value).
    fn parse_kv_sep(&mut self) -> Result<Assignment, Error> {
        self.skip_ws()?;
        let tok = self.peek()?;
        match tok.kind {
            TokenKind::Equal | TokenKind::Colon => {
                self.pop();
                Ok(Assignment::Assign)
            }
            TokenKind::PlusEqual => {
                self.pop();
                Ok(Assignment::Append)
            }
            TokenKind::OpenBrace => Ok(Assignment::Assign),
            TokenKind::Eof => Err(Error::syntax(
                "unexpected end of input, expected ':', '=', '+=' or '{' after key",
                tok.pos,
            )),
            _ => Err(Error::syntax(
                format!(
                    "expected ':', '=', '+=' or '{{' after key, found {}",
                    describe(tok)
                ),
                tok.pos,
            )),
        }
    }

    /// Parse one value: a concatenation of elements ending at an item
    /// separator (explicit `,` or a whitespace run containing a newline)
    /// or before a closer.
    fn parse_value<C: ParseCallback>(&mut self, callback: &mut C) -> Result<(), Error> {
        let mut ws_run: Vec<Token> = Vec::new();
        let mut nelems = 0usize;
        loop {
            // Accumulate whitespace and comments up to the next
            // significant token.
            let mut saw_newline = false;
            let mut comment_pos: Option<Position> = None;
            loop {
                let tok = self.peek()?;
                match tok.kind {
                    TokenKind::Ws => ws_run.push(self.pop()),
                    TokenKind::WsNewline => {
                        saw_newline = true;
                        ws_run.push(self.pop());
                    }
                    TokenKind::Comment => {
                        comment_pos = Some(tok.pos);
                        self.pop();
                    }
                    _ => break,
                }
            }

            let tok = self.peek()?;
            let tok_kind = tok.kind;
            let tok_pos = tok.pos;

            // Separators and closers terminate the concatenation.
            if tok_kind == TokenKind::Comma {
                if nelems == 0 && !self.opts.allow_empty_values {
                    return Err(Error::syntax("expected value, found ','", tok_pos));
                }
                self.pop();
                return Ok(());
            }
            if nelems > 0 && saw_newline {
                return Ok(());
            }
            if matches!(
                tok_kind,
                TokenKind::CloseBrace | TokenKind::CloseSquare | TokenKind::Eof
            ) {
                if nelems == 0 {
                    let tok = self.peek()?;
                    return Err(Error::syntax(
                        format!("expected value, found {}", describe(tok)),
                        tok_pos,
                    ));
                }
                return Ok(());
            }

            // The concatenation continues; a comment between elements is
            // not representable in the value.
            if nelems > 0 {
                if let Some(pos) = comment_pos {
                    return Err(Error::syntax("comment inside value concatenation", pos));
                }
            }

            match tok.kind {
                kind if kind.is_key_token() => {
                    self.flush_ws(callback, &mut ws_run, nelems)?;
                    let tok = self.pop();
                    emit(callback, Event::Token(tok))?;
                }
                TokenKind::OpenSub | TokenKind::OpenOptSub => {
                    let optional = tok.kind == TokenKind::OpenOptSub;
                    let pos = tok.pos;
                    self.flush_ws(callback, &mut ws_run, nelems)?;
                    self.pop();
                    let path = self.parse_key()?;
                    self.expect(TokenKind::CloseBrace, "'}' to close the substitution")?;
                    emit(callback, Event::VarSub { path, optional, pos })?;
                }
                TokenKind::OpenBrace => {
                    self.flush_ws(callback, &mut ws_run, nelems)?;
                    self.pop();
                    emit(callback, Event::ObjStart)?;
                    self.parse_object_body(callback)?;
                    self.expect(TokenKind::CloseBrace, "'}' to close the object")?;
                    emit(callback, Event::ObjEnd)?;
                }
                TokenKind::OpenSquare => {
                    self.flush_ws(callback, &mut ws_run, nelems)?;
                    self.pop();
                    emit(callback, Event::ArrStart)?;
                    self.parse_array_body(callback)?;
                    self.expect(TokenKind::CloseSquare, "']' to close the array")?;
                    emit(callback, Event::ArrEnd)?;
                }
                _ => {
                    if nelems == 0 {
                        return Err(Error::syntax(
                            format!("expected value, found {}", describe(tok)),
                            tok.pos,
                        ));
                    }
                    // Not part of the value; leave it for the caller.
                    return Ok(());
                }
            }
            nelems += 1;
        }
    }

    /// Emit buffered whitespace tokens between two elements of a
    /// concatenation; leading whitespace is dropped.
    fn flush_ws<C: ParseCallback>(
        &mut self,
        callback: &mut C,
        ws_run: &mut Vec<Token>,
        nelems: usize,
    ) -> Result<(), Error> {
        if nelems > 0 {
            for tok in ws_run.drain(..) {
                emit(callback, Event::Token(tok))?;
            }
        } else {
            ws_run.clear();
        }
        Ok(())
    }
}

/// Forward an event, converting a refusal into `ReaderAborted`.
fn emit<C: ParseCallback>(callback: &mut C, event: Event) -> Result<(), Error> {
    if callback.event(event) {
        Ok(())
    } else {
        Err(Error::reader_aborted())
    }
}

/// Describe a token for error messages.
fn describe(tok: &Token) -> String {
    if tok.text.is_empty() {
        tok.kind.to_string()
    } else {
        format!("{} '{}'", tok.kind, tok.text)
    }
}
