//! Diagnostic rendering for parse errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use hocon_parse::{Error, ErrorKind, Position};

/// Render a parse error against its source text.
///
/// Returns a formatted report with source context. The error's line and
/// column are resolved to a byte offset in `source`; errors without a
/// position point at the start of the input.
pub fn render(error: &Error, filename: &str, source: &str) -> String {
    let mut output = Vec::new();
    write_report(error, filename, source, &mut output);
    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}

/// Write a rendered error report to a writer.
pub fn write_report<W: std::io::Write>(error: &Error, filename: &str, source: &str, writer: W) {
    let report = build_report(error, filename, source);
    let _ = report
        .finish()
        .write((filename, Source::from(source)), writer);
}

fn build_report<'a>(
    error: &Error,
    filename: &'a str,
    source: &str,
) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
    let offset = error
        .position()
        .map(|pos| byte_offset(source, pos))
        .unwrap_or(0);
    let end = source[offset..]
        .chars()
        .next()
        .map(|c| offset + c.len_utf8())
        .unwrap_or(offset);
    let range = offset..end;

    match error.kind() {
        ErrorKind::Syntax(msg) => Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(msg.clone())
            .with_label(
                Label::new((filename, range))
                    .with_message("invalid syntax here")
                    .with_color(Color::Red),
            ),

        ErrorKind::InvalidEncoding => Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message("invalid UTF-8 encoding")
            .with_label(
                Label::new((filename, range))
                    .with_message("malformed byte sequence")
                    .with_color(Color::Red),
            )
            .with_help("HOCON input must be valid UTF-8 (RFC 3629)"),

        ErrorKind::Unimplemented(what) => Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(format!("unimplemented: {}", what))
            .with_label(
                Label::new((filename, range))
                    .with_message("not supported")
                    .with_color(Color::Red),
            ),

        ErrorKind::Io(err) => Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(format!("i/o error: {}", err))
            .with_label(
                Label::new((filename, range))
                    .with_message("while reading input")
                    .with_color(Color::Red),
            ),

        ErrorKind::InvalidArgument(msg) => {
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(format!("invalid argument: {}", msg))
        }

        ErrorKind::ReaderAborted => Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message("parsing aborted by reader"),
    }
}

/// Resolve a 1-based line/column position to a byte offset. Positions
/// past the end of a line or of the input clamp to the input's end.
fn byte_offset(source: &str, pos: Position) -> usize {
    let mut base = 0usize;
    let mut remaining = source;
    for _ in 1..pos.line {
        match remaining.find('\n') {
            Some(i) => {
                base += i + 1;
                remaining = &remaining[i + 1..];
            }
            None => return source.len(),
        }
    }
    let mut chars = remaining.char_indices();
    for _ in 1..pos.column {
        if chars.next().is_none() {
            return source.len();
        }
    }
    match chars.next() {
        Some((i, _)) => base + i,
        None => source.len(),
    }
}
