//! The rattle front-end CLI.
//!
//! Provides the `rattlec` command:
//!
//! `rattlec <FILES>...` - lex, parse, and analyze each file, reporting
//! diagnostics to stderr and exiting non-zero if any file failed to open
//! or any stage reported an error.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser as ClapParser;

use rattle_analyzer::StatementAnalyzer;
use rattle_common::arena::{Arena, Handle};
use rattle_common::error::{AnalyzerError, LexError, ParseError};
use rattle_common::location::Location;
use rattle_common::reactor::{LexReactor, Reactor};
use rattle_common::OnError;
use rattle_lexer::Lexer;
use rattle_parser::Parser;

#[derive(ClapParser)]
#[command(name = "rattlec", version, about = "The rattle front-end")]
struct Cli {
    /// Source files to lex, parse, and analyze
    files: Vec<PathBuf>,

    /// Print the resulting AST for each file instead of just diagnostics
    #[arg(long = "dump-ast")]
    dump_ast: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        eprintln!("error: no input files");
        process::exit(1);
    }

    let mut had_error = false;
    for path in &cli.files {
        if !process_file(path, cli.dump_ast) {
            had_error = true;
        }
    }

    if had_error {
        process::exit(1);
    }
}

/// Runs the full pipeline over one file. Returns `false` if the file
/// couldn't be read or any stage reported a diagnostic -- mirrors
/// `rattle.cpp`'s `read_file`/`lex_file`: one bad file in a batch doesn't
/// stop the rest from being processed.
fn process_file(path: &Path, dump_ast: bool) -> bool {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read '{}': {}", path.display(), e);
            return false;
        }
    };
    let display_path = path.display().to_string();

    let arena = Arena::new();
    let mut lex_reactor = CliLexReactor::new(&source, &display_path);
    let lexer = Lexer::new(&source, &mut lex_reactor);
    let parse_reactor = CliReactor::new(&arena, &source, &display_path);
    let mut parser = Parser::new(lexer, parse_reactor);

    let stmts = StatementAnalyzer::new(&mut parser).analyze_program();
    let parse_reactor = parser.into_reactor();

    let had_error = lex_reactor.had_error || parse_reactor.had_error;

    if dump_ast {
        for stmt in &stmts {
            println!("{:#?}", stmt.as_ref());
        }
    }

    !had_error
}

/// Forwards every lexical diagnostic straight to `ariadne`, so the first
/// error in a file is visible immediately rather than waiting on the whole
/// pipeline to finish.
struct CliLexReactor<'src> {
    source: &'src str,
    path: &'src str,
    had_error: bool,
}

impl<'src> CliLexReactor<'src> {
    fn new(source: &'src str, path: &'src str) -> Self {
        Self {
            source,
            path,
            had_error: false,
        }
    }
}

impl<'src> LexReactor<'src> for CliLexReactor<'src> {
    fn report(&mut self, error: LexError<'src>) -> OnError {
        self.had_error = true;
        emit_diagnostic(self.source, self.path, error.start, error.end, &error.kind.to_string());
        OnError::Resume
    }
}

/// Drives arena allocation for the parser and analyzer, and forwards every
/// parse/analysis diagnostic to `ariadne` the same way `CliLexReactor` does
/// for lexical ones.
struct CliReactor<'arena, 'src> {
    arena: &'arena Arena,
    source: &'src str,
    path: &'src str,
    had_error: bool,
}

impl<'arena, 'src> CliReactor<'arena, 'src> {
    fn new(arena: &'arena Arena, source: &'src str, path: &'src str) -> Self {
        Self {
            arena,
            source,
            path,
            had_error: false,
        }
    }
}

impl<'arena, 'src> Reactor<'arena, 'src> for CliReactor<'arena, 'src> {
    fn report(&mut self, error: ParseError<'src>) -> OnError {
        self.had_error = true;
        emit_diagnostic(
            self.source,
            self.path,
            error.offending_token.start,
            error.offending_token.end,
            &error.kind.to_string(),
        );
        OnError::Resume
    }

    fn alloc<T>(&self, val: T) -> Option<Handle<'arena, T>> {
        self.arena.try_alloc(val)
    }

    fn arena(&self) -> &'arena Arena {
        self.arena
    }

    fn report_analysis(&mut self, error: AnalyzerError) -> OnError {
        self.had_error = true;
        emit_diagnostic(self.source, self.path, error.start, error.end, &error.description);
        OnError::Resume
    }
}

/// Converts a `Location` into a byte offset by walking the source's line
/// starts -- `Location` carries line/column, not an offset, and `ariadne`
/// wants byte ranges into the rendered `Source`.
fn line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in source.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

fn offset_of(starts: &[usize], loc: Location) -> usize {
    if loc.is_synthetic() {
        return 0;
    }
    let line_idx = (loc.line as usize).saturating_sub(1);
    let base = starts.get(line_idx).copied().unwrap_or(0);
    base + loc.column as usize
}

fn emit_diagnostic(source: &str, path: &str, start: Location, end: Location, message: &str) {
    use ariadne::{Label, Report, ReportKind, Source};

    let starts = line_starts(source);
    let start_off = offset_of(&starts, start);
    let end_off = offset_of(&starts, end).max(start_off + 1).min(source.len());

    eprintln!("{}:", path);
    let _ = Report::<std::ops::Range<usize>>::build(ReportKind::Error, start_off..end_off)
        .with_message(message)
        .with_label(Label::new(start_off..end_off).with_message(message))
        .finish()
        .eprint(Source::from(source));
}
