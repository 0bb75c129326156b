//! HOCON command-line tool.
//!
//! Parses a HOCON file (or stdin with `-`) and prints the post-processed
//! configuration tree, or dumps the raw token stream with `--tokens`.
//! Parse errors are rendered with source context.

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;
use hocon_parse::{ErrorKind, Format, Input, LexOptions, Lexer, TokenKind};
use hocon_tree::TreeError;

const EXIT_SYNTAX_ERROR: u8 = 1;
const EXIT_IO_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "hocon", version, about = "Inspect HOCON configuration files")]
struct Args {
    /// Input file path, or "-" for stdin
    input: String,

    /// Dump the token stream instead of the parsed tree
    #[arg(long)]
    tokens: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match read_input(&args.input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("hocon: {}: {}", args.input, err);
            return ExitCode::from(EXIT_IO_ERROR);
        }
    };
    let filename = if args.input == "-" {
        "<stdin>"
    } else {
        args.input.as_str()
    };

    if args.tokens {
        dump_tokens(&source, filename)
    } else {
        dump_tree(&source, filename)
    }
}

fn read_input(path: &str) -> io::Result<Vec<u8>> {
    if path == "-" {
        let mut source = Vec::new();
        io::stdin().lock().read_to_end(&mut source)?;
        Ok(source)
    } else {
        fs::read(path)
    }
}

fn dump_tokens(source: &[u8], filename: &str) -> ExitCode {
    let mut lexer = Lexer::new(Input::bytes(source));
    let opts = LexOptions::default();
    loop {
        match lexer.next_token(&opts) {
            Ok(tok) => {
                if tok.text.is_empty() {
                    println!("{}\t{}", tok.pos, tok.kind);
                } else {
                    println!("{}\t{}\t{:?}", tok.pos, tok.kind, tok.text);
                }
                if tok.kind == TokenKind::Eof {
                    return ExitCode::SUCCESS;
                }
            }
            Err(err) => return report(&TreeError::Parse(err), filename, source),
        }
    }
}

fn dump_tree(source: &[u8], filename: &str) -> ExitCode {
    match hocon_tree::parse(Input::bytes(source), Format::Hocon) {
        Ok(tree) => {
            println!("{:#?}", tree);
            ExitCode::SUCCESS
        }
        Err(err) => report(&err, filename, source),
    }
}

fn report(err: &TreeError, filename: &str, source: &[u8]) -> ExitCode {
    match err {
        TreeError::Parse(parse_err) => {
            let text = String::from_utf8_lossy(source);
            let mut stderr = io::stderr().lock();
            hocon_tree::write_report(parse_err, filename, &text, &mut stderr);
            if matches!(parse_err.kind(), ErrorKind::Io(_)) {
                ExitCode::from(EXIT_IO_ERROR)
            } else {
                ExitCode::from(EXIT_SYNTAX_ERROR)
            }
        }
        TreeError::Build(build_err) => {
            eprintln!("hocon: {}: {}", filename, build_err);
            ExitCode::from(EXIT_SYNTAX_ERROR)
        }
    }
}
