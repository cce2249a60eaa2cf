//! faxc-drv - Compiler Driver
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! `faxc-drv` is the command-line front door onto `faxc-load`. It parses a
//! small argument surface, invokes the loader, and renders whatever it finds
//! through the shared `faxc-util` diagnostic stack:
//!
//! ```text
//! faxc load <path> [--debug]
//!        │
//!        ▼
//!   [faxc_load::Source::load] ──▶ classified lines + ErrorEntry list
//!        │
//!        ▼
//!   [adapt_error] ──▶ faxc_util::diagnostic::Diagnostic (E_LOAD_* codes)
//!        │
//!        ▼
//!   print diagnostics to stderr, optionally the glyph dump to stdout
//! ```
//!
//! There is exactly one subcommand today (`load`); the driver's `Config` and
//! exit-code scheme are kept deliberately small rather than anticipating
//! phases this crate no longer has.

use std::process::ExitCode;

use faxc_load::{ErrorEntry, LineCategory, LoadError, Source};
use faxc_util::diagnostic::{Diagnostic, DiagnosticCode, Level, Span};
use thiserror::Error;

/// Clean load, no diagnostics.
pub const EXIT_SUCCESS: u8 = 0;
/// The loader reported at least one error.
pub const EXIT_COMPILE_ERROR: u8 = 1;
/// The load aborted (I/O failure, line too long).
pub const EXIT_INTERNAL_ERROR: u8 = 2;
/// The command line itself could not be parsed.
pub const EXIT_CLI_ERROR: u8 = 3;

/// Parsed command-line configuration.
///
/// Deliberately thin: this driver has one job (load and report), so there is
/// no `opt_level`/`emit`/`target` surface to carry around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_path: String,
    pub debug: bool,
}

/// Errors in the command line itself, distinct from anything the loader
/// reports about the *contents* of a file.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("usage: faxc load <path> [--debug]")]
    MissingSubcommand,
    #[error("unknown subcommand '{0}'; only 'load' is supported")]
    UnknownSubcommand(String),
    #[error("missing <path> argument")]
    MissingPath,
    #[error("unrecognized argument '{0}'")]
    UnrecognizedArgument(String),
}

impl Config {
    /// Parses `faxc load <path> [--debug]` out of an argv-style iterator
    /// (the first element, the program name, is discarded).
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, CliError> {
        let mut args = args.into_iter();
        args.next(); // program name

        let subcommand = args.next().ok_or(CliError::MissingSubcommand)?;
        if subcommand != "load" {
            return Err(CliError::UnknownSubcommand(subcommand));
        }

        let mut input_path = None;
        let mut debug = false;
        for arg in args {
            match arg.as_str() {
                "--debug" => debug = true,
                _ if input_path.is_none() => input_path = Some(arg),
                other => return Err(CliError::UnrecognizedArgument(other.to_string())),
            }
        }

        Ok(Config {
            input_path: input_path.ok_or(CliError::MissingPath)?,
            debug,
        })
    }
}

/// Category glyph used by the `--debug` dump.
fn category_glyph(category: LineCategory) -> &'static str {
    match category {
        LineCategory::Empty => "/*   */",
        LineCategory::Preprocessor | LineCategory::PreprocessorEmitted => "/* # */",
        LineCategory::Comment => "/* / */",
        LineCategory::ModuleDirective => "/* m#*/",
        LineCategory::ModuleDeclaration => "/* m */",
        LineCategory::Import => "/* i */",
        LineCategory::Legacy => "/* 1 */",
        LineCategory::Modern => "/* 2 */",
        LineCategory::RawString => "/* R */",
    }
}

/// Renders the glyph-prefixed debug dump described in the loader's external
/// interface: one line per source line, sentinel excluded.
pub fn render_debug_dump(source: &Source) -> String {
    let mut out = String::new();
    for line in source.get_lines().into_iter().skip(1) {
        out.push_str(category_glyph(line.category));
        out.push(if line.dense_tokens { '+' } else { ' ' });
        out.push_str(&String::from_utf8_lossy(&line.text));
        out.push('\n');
    }
    out
}

/// Maps one loader [`ErrorEntry`] to a [`Diagnostic`], assigning the
/// `E_LOAD_*` code matching its message shape and demoting a fallback entry
/// to a warning when `has_real_error` is true (so the speculative fallback
/// never doubles up with the actual cause).
pub fn adapt_error(entry: &ErrorEntry, has_real_error: bool) -> Diagnostic {
    let span = Span::point(entry.location.line as u32, entry.location.column as u32);
    let code = classify_error_code(&entry.message);

    let diagnostic = if entry.fallback && has_real_error {
        Diagnostic::warning(entry.message.clone(), span)
    } else {
        Diagnostic::error(entry.message.clone(), span)
    };
    diagnostic.with_code(code)
}

fn classify_error_code(message: &str) -> DiagnosticCode {
    if message.contains("does not match a prior") && message.contains("#else") {
        DiagnosticCode::E_LOAD_UNMATCHED_ELSE
    } else if message.contains("does not match a prior") && message.contains("#endif") {
        DiagnosticCode::E_LOAD_UNMATCHED_ENDIF
    } else if message.contains("does not match a prior") {
        DiagnosticCode::E_LOAD_UNMATCHED_CLOSE
    } else if message.contains("unmatched") {
        DiagnosticCode::E_LOAD_UNMATCHED_EOF
    } else if message.contains("duplicate") {
        DiagnosticCode::E_LOAD_DUPLICATE_ELSE
    } else if message.contains("block comment") {
        DiagnosticCode::E_LOAD_TRAILING_COMMENT
    } else if message.contains("character literal") {
        DiagnosticCode::E_LOAD_UNTERMINATED_CHAR
    } else if message.contains("maximum line length") {
        DiagnosticCode::E_LOAD_LINE_TOO_LONG
    } else if message.contains("unexpected error reading source") {
        DiagnosticCode::E_LOAD_STREAM_ERROR
    } else {
        DiagnosticCode::E0001
    }
}

fn print_diagnostic(diagnostic: &Diagnostic) {
    let tag = match diagnostic.level {
        Level::Error => "error",
        Level::Warning => "warning",
        Level::Note => "note",
        Level::Help => "help",
    };
    match diagnostic.code {
        Some(code) => eprintln!("{tag}[{code}]: {} ({}:{})", diagnostic.message, diagnostic.span.line, diagnostic.span.column),
        None => eprintln!("{tag}: {} ({}:{})", diagnostic.message, diagnostic.span.line, diagnostic.span.column),
    }
}

/// Runs the `faxc load` subcommand against an already-parsed [`Config`],
/// returning one of the `EXIT_*` codes.
pub fn run_load(config: &Config) -> u8 {
    let mut source = Source::new();
    let mut errors = Vec::new();

    match source.load(&config.input_path, &mut errors) {
        Ok(()) => {}
        Err(LoadError::LineTooLong { line, max }) => {
            eprintln!("error: line {line} exceeds the maximum line length of {max} bytes");
            return EXIT_COMPILE_ERROR;
        }
        Err(LoadError::Io { path, source }) => {
            eprintln!("error: failed to open {path}: {source}");
            return EXIT_INTERNAL_ERROR;
        }
    }

    let has_real_error = errors.iter().any(|e| !e.fallback);
    for entry in &errors {
        print_diagnostic(&adapt_error(entry, has_real_error));
    }

    if config.debug {
        print!("{}", render_debug_dump(&source));
    }

    if errors.is_empty() {
        EXIT_SUCCESS
    } else {
        EXIT_COMPILE_ERROR
    }
}

/// Parses `std::env::args()` and dispatches to [`run_load`]. The sole entry
/// point for the `faxc` binary.
pub fn main() -> ExitCode {
    let code = match Config::parse(std::env::args()) {
        Ok(config) => run_load(&config),
        Err(e) => {
            eprintln!("error: {e}");
            EXIT_CLI_ERROR
        }
    };
    ExitCode::from(code)
}
