//! faxc-load - Source Loading Front End
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate turns a mixed legacy/modern source file into a classified,
//! line-oriented [`Source`]. It runs ahead of lexing and parsing: its only
//! job is to decide, for each physical line, which syntactic regime the line
//! belongs to, while correctly skipping over comments, string and character
//! literals (including raw strings with arbitrary delimiters), and
//! preprocessor conditionals.
//!
//! Layout:
//! - `char_classify` - byte-level predicates (digit, identifier, operator-name).
//! - `line_probes` - single-line predicates used before any cross-line state
//!   comes into play (comment/token/preprocessor-directive shape).
//! - `brace_tracker` - the `{}`/`()` depth counter, including `#if`/`#else`/
//!   `#endif` reconciliation.
//! - `scanner` - the two per-line state machines, legacy and modern, that
//!   advance comment/string/raw-string/char-literal state across lines.
//! - `source` - the [`Source`] object and the `load` driving loop that ties
//!   everything above together.
//! - `error` - the fatal [`LoadError`] for the two conditions that abort a
//!   load outright.
//!
//! Everything else a load reports is non-fatal and accumulates as
//! [`ErrorEntry`] records in the caller-supplied vector; see `error.rs` for
//! the fatal/non-fatal split and `source.rs` for the fallback-error
//! reconciliation rule.

pub mod brace_tracker;
pub mod char_classify;
pub mod error;
pub mod line_probes;
pub mod scanner;
pub mod source;

pub use error::{LoadError, LoadResult};
pub use scanner::{LegacyLineResult, LegacyScanState, ModernLineResult, ModernScanState};
pub use source::{ErrorEntry, LineCategory, Source, SourceLine, SourcePosition, MAX_LINE_LENGTH, STDIN_PATH};
