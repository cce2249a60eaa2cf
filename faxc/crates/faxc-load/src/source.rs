//! The data model and driver for source-loading: [`Source`], [`SourceLine`],
//! [`SourcePosition`], and [`ErrorEntry`].
//!
//! [`Source::load`] is the single entry point: it reads a file (or stdin)
//! line by line, classifies each line, and threads a [`BraceTracker`] plus
//! the legacy and modern line scanners across the whole pass. Everything
//! else in this crate exists to serve that one function.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Stdin};
use std::path::Path;

use crate::brace_tracker::BraceTracker;
use crate::char_classify::{is_identifier_continue, skip_whitespace};
use crate::error::{LoadError, LoadResult};
use crate::line_probes::{is_preprocessor, starts_with_identifier_colon, starts_with_preprocessor_if_else_endif, starts_with_tokens, PreprocessorDirective};
use crate::scanner::{process_cpp2_line, process_cpp_line, LegacyScanState, ModernScanState};

/// Physical lines longer than this are a fatal load error.
pub const MAX_LINE_LENGTH: usize = 90_000;

/// Sentinel path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "stdin";

/// The syntactic classification of one physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCategory {
    /// Whitespace only.
    Empty,
    /// `#...` directive (including continuation lines).
    Preprocessor,
    /// Entirely a `//` or `/* ... */` comment.
    Comment,
    /// `module foo;` / `export module foo;`.
    ModuleDirective,
    /// The module declaration line itself; establishes the module prefix.
    ModuleDeclaration,
    /// `import foo;` / `export import foo;`.
    Import,
    /// A legacy-syntax statement or declaration line.
    Legacy,
    /// A line within a modern (`name : ...`) declaration.
    Modern,
    /// A line lying (wholly) inside a raw string literal.
    RawString,
    /// A preprocessor continuation line that was re-emitted by the loader
    /// as its own record (kept distinct from the directive's first line).
    PreprocessorEmitted,
}

/// A 1-based `(line, column)` source location, totally ordered
/// lexicographically by `(line, column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourcePosition {
    pub line: i32,
    pub column: i32,
}

impl SourcePosition {
    pub fn new(line: i32, column: i32) -> Self {
        Self { line, column }
    }
}

/// One diagnostic produced while loading a source file.
///
/// `fallback` entries are speculative: they describe a plausible cause for
/// an abnormal load (e.g. a non-EOF stream error) but are only surfaced if
/// nothing more specific already explained the failure. See
/// [`Source::reconcile_fallback_errors`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub location: SourcePosition,
    pub message: String,
    pub internal: bool,
    pub fallback: bool,
}

impl ErrorEntry {
    pub fn new(location: SourcePosition, message: impl Into<String>) -> Self {
        Self { location, message: message.into(), internal: false, fallback: false }
    }

    pub fn internal(location: SourcePosition, message: impl Into<String>) -> Self {
        Self { location, message: message.into(), internal: true, fallback: false }
    }

    pub fn fallback(location: SourcePosition, message: impl Into<String>) -> Self {
        Self { location, message: message.into(), internal: false, fallback: true }
    }
}

/// One physical line of the loaded source, plus its classification.
#[derive(Debug, Clone)]
pub struct SourceLine {
    pub text: Vec<u8>,
    pub category: LineCategory,
    /// Cosmetic hint used by the debug dump: true when the line's tokens
    /// are packed with no doubled-up whitespace.
    pub dense_tokens: bool,
}

impl SourceLine {
    fn new(text: Vec<u8>, category: LineCategory) -> Self {
        let dense_tokens = is_dense(&text);
        Self { text, category, dense_tokens }
    }
}

/// No run of 2+ consecutive space/tab bytes.
fn is_dense(text: &[u8]) -> bool {
    let mut prev_space = false;
    for &b in text {
        let is_space = b == b' ' || b == b'\t';
        if is_space {
            if prev_space {
                return false;
            }
            prev_space = true;
        } else {
            prev_space = false;
        }
    }
    true
}

/// A page of a [`Source`]'s line storage. Lines are appended to the last
/// page; once a page is full a new one is started, so pushing a line never
/// invalidates a reference returned by [`Source::get_line`] for an earlier
/// one (unlike a flat `Vec<SourceLine>`, which may reallocate on growth).
const PAGE_SIZE: usize = 4096;

/// A classified, line-oriented view of one loaded source file.
pub struct Source {
    pages: Vec<Vec<SourceLine>>,
    module_directive_found: bool,
    module_lines: usize,
    has_legacy: bool,
    has_modern: bool,
    is_module_util: bool,
}

impl Source {
    pub fn new() -> Self {
        Self {
            // Index 0 is the sentinel; real lines start at index 1.
            pages: vec![vec![SourceLine::new(Vec::new(), LineCategory::Empty)]],
            module_directive_found: false,
            module_lines: 0,
            has_legacy: false,
            has_modern: false,
            is_module_util: false,
        }
    }

    fn len(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    fn push_line(&mut self, line: SourceLine) {
        let last = self.pages.last_mut().expect("pages is never empty");
        if last.len() >= PAGE_SIZE {
            self.pages.push(Vec::with_capacity(PAGE_SIZE));
        }
        self.pages.last_mut().expect("just ensured capacity").push(line);
    }

    /// 1-based line index of the line about to be appended.
    fn next_line_number(&self) -> i32 {
        self.len() as i32
    }

    /// All lines, sentinel included, in order.
    pub fn get_lines(&self) -> Vec<&SourceLine> {
        self.pages.iter().flatten().collect()
    }

    pub fn get_line(&self, n: i32) -> Option<&SourceLine> {
        if n < 0 {
            return None;
        }
        let mut remaining = n as usize;
        for page in &self.pages {
            if remaining < page.len() {
                return Some(&page[remaining]);
            }
            remaining -= page.len();
        }
        None
    }

    fn set_category(&mut self, n: i32, category: LineCategory) {
        if n < 0 {
            return;
        }
        let mut remaining = n as usize;
        for page in &mut self.pages {
            if remaining < page.len() {
                page[remaining].category = category;
                return;
            }
            remaining -= page.len();
        }
    }

    /// Lines `1..=module_lines`, the module/import prefix.
    pub fn get_module_lines(&self) -> Vec<&SourceLine> {
        self.get_lines().into_iter().skip(1).take(self.module_lines).collect()
    }

    /// Lines after the module/import prefix.
    pub fn get_non_module_lines(&self) -> Vec<&SourceLine> {
        self.get_lines().into_iter().skip(1 + self.module_lines).collect()
    }

    pub fn is_module(&self) -> bool {
        self.module_lines > 0
    }

    pub fn has_module_directive(&self) -> bool {
        self.module_directive_found
    }

    pub fn has_legacy(&self) -> bool {
        self.has_legacy
    }

    pub fn has_modern(&self) -> bool {
        self.has_modern
    }

    pub fn is_module_cpp2_util(&self) -> bool {
        self.is_module_util
    }

    /// Loads `path` (or stdin, if `path == "stdin"`) into this `Source`.
    ///
    /// Non-fatal diagnostics accumulate into `errors`; this call returns
    /// `Err` only for the two conditions that abort loading outright (a
    /// line too long to process, or a stream that could not be opened).
    pub fn load(&mut self, path: &str, errors: &mut Vec<ErrorEntry>) -> LoadResult<()> {
        let mut reader = LineReader::open(path)?;

        let mut braces = BraceTracker::new();
        let mut legacy_state = LegacyScanState::default();
        let mut last_line_no = 0i32;

        loop {
            let line_no = self.next_line_number();
            let Some(raw) = reader.read_line(line_no, errors) else {
                break;
            };
            if raw.len() > MAX_LINE_LENGTH {
                return Err(LoadError::LineTooLong { line: line_no, max: MAX_LINE_LENGTH });
            }
            last_line_no = line_no;

            let probe = is_preprocessor(&raw, true);
            if probe.is_preprocessor && !legacy_state.in_comment && !legacy_state.in_raw_string_literal {
                self.load_preprocessor_run(&raw, line_no, &mut reader, &mut braces, errors, &mut last_line_no)?;
                continue;
            }

            let at_top_level = braces.depth() == 0 && !legacy_state.in_comment && !legacy_state.in_raw_string_literal;

            if at_top_level
                && starts_with_identifier_colon(&raw)
                && !starts_with_tokens(&raw, &[b"import"])
                && !starts_with_tokens(&raw, &[b"export", b"import"])
            {
                self.promote_preceding_to_modern();
                self.push_line(SourceLine::new(raw.clone(), LineCategory::Modern));
                self.has_modern = true;

                let mut modern_state = ModernScanState::default();
                let mut ended = process_cpp2_line(&raw, line_no, &mut modern_state, &mut braces, errors).declaration_ended;
                while !ended {
                    let next_line_no = self.next_line_number();
                    let Some(next_raw) = reader.read_line(next_line_no, errors) else {
                        break;
                    };
                    if next_raw.len() > MAX_LINE_LENGTH {
                        return Err(LoadError::LineTooLong { line: next_line_no, max: MAX_LINE_LENGTH });
                    }
                    last_line_no = next_line_no;
                    self.push_line(SourceLine::new(next_raw.clone(), LineCategory::Modern));
                    ended = process_cpp2_line(&next_raw, next_line_no, &mut modern_state, &mut braces, errors).declaration_ended;
                }
                continue;
            }

            if let Some(category) = self.module_directive_category(&raw) {
                self.push_line(SourceLine::new(raw, category));
                match category {
                    LineCategory::ModuleDeclaration => {
                        self.module_directive_found = true;
                        self.module_lines = line_no as usize;
                        if raw_trimmed_eq(self.get_line(line_no).expect("just pushed").text.as_slice(), b"export module cpp2.util;") {
                            self.is_module_util = true;
                        }
                    }
                    LineCategory::Import => {
                        self.module_lines = line_no as usize;
                    }
                    LineCategory::ModuleDirective if self.module_directive_found => {
                        // A bare `module;`/`module :private;` fragment seen
                        // after a real module declaration is still part of
                        // the module preamble; one seen on its own (no
                        // preceding named declaration) is not, and must not
                        // make `is_module()` true on its own.
                        self.module_lines = line_no as usize;
                    }
                    _ => {}
                }
                continue;
            }

            let result = process_cpp_line(&raw, line_no, &mut legacy_state, &mut braces, errors);
            let category = if result.all_rawstring_line {
                LineCategory::RawString
            } else if result.all_comment_line {
                LineCategory::Comment
            } else if result.empty_line {
                LineCategory::Empty
            } else {
                self.has_legacy = true;
                LineCategory::Legacy
            };
            self.push_line(SourceLine::new(raw, category));
        }

        braces.found_eof(SourcePosition::new(last_line_no + 1, 1), errors);
        self.reconcile_fallback_errors(errors);
        Ok(())
    }

    /// Reads and classifies one preprocessor directive and any of its
    /// continuation lines (joined by trailing `\`).
    fn load_preprocessor_run(
        &mut self,
        first_line: &[u8],
        line_no: i32,
        reader: &mut LineReader,
        braces: &mut BraceTracker,
        errors: &mut Vec<ErrorEntry>,
        last_line_no: &mut i32,
    ) -> LoadResult<()> {
        self.has_legacy = true;
        self.push_line(SourceLine::new(first_line.to_vec(), LineCategory::Preprocessor));
        self.dispatch_preprocessor_directive(first_line, line_no, braces, errors);

        let mut continuing = first_line.last() == Some(&b'\\');
        while continuing {
            let next_line_no = self.next_line_number();
            let Some(raw) = reader.read_line(next_line_no, errors) else {
                break;
            };
            if raw.len() > MAX_LINE_LENGTH {
                return Err(LoadError::LineTooLong { line: next_line_no, max: MAX_LINE_LENGTH });
            }
            *last_line_no = next_line_no;
            continuing = is_preprocessor(&raw, false).has_continuation;
            self.push_line(SourceLine::new(raw, LineCategory::PreprocessorEmitted));
        }
        Ok(())
    }

    fn dispatch_preprocessor_directive(&self, line: &[u8], line_no: i32, braces: &mut BraceTracker, errors: &mut Vec<ErrorEntry>) {
        match starts_with_preprocessor_if_else_endif(line) {
            PreprocessorDirective::If => braces.found_pre_if(line_no),
            PreprocessorDirective::Else => braces.found_pre_else(SourcePosition::new(line_no, 1), errors),
            PreprocessorDirective::Endif => braces.found_pre_endif(SourcePosition::new(line_no, 1), errors),
            PreprocessorDirective::None => {}
        }
    }

    /// Classifies `line` as a module/import directive form, if it is one.
    ///
    /// A named `module foo;` / `export module foo;` is a
    /// [`LineCategory::ModuleDeclaration`]; a bare `module;` (global module
    /// fragment) or `module :private;` (private module fragment) names no
    /// module and is a [`LineCategory::ModuleDirective`] instead.
    fn module_directive_category(&self, line: &[u8]) -> Option<LineCategory> {
        if let Some(after_keyword) = module_keyword_end(line) {
            let i = skip_whitespace(line, after_keyword);
            return Some(match line.get(i) {
                Some(b';') | Some(b':') => LineCategory::ModuleDirective,
                _ => LineCategory::ModuleDeclaration,
            });
        }
        if starts_with_tokens(line, &[b"export", b"import"]) || starts_with_tokens(line, &[b"import"]) {
            Some(LineCategory::Import)
        } else {
            None
        }
    }

    /// Walks back over contiguous immediately-preceding `empty`/`comment`
    /// lines and reclassifies them as `modern` (invariant 5).
    fn promote_preceding_to_modern(&mut self) {
        let mut idx = (self.next_line_number() - 1) as i32;
        loop {
            if idx < 1 {
                break;
            }
            let Some(line) = self.get_line(idx) else { break };
            match line.category {
                LineCategory::Empty | LineCategory::Comment => {
                    self.set_category(idx, LineCategory::Modern);
                    idx -= 1;
                }
                _ => break,
            }
        }
    }

    /// Fallback errors (section 7) are dropped unless they are the *only*
    /// diagnostics produced for this load.
    fn reconcile_fallback_errors(&self, errors: &mut Vec<ErrorEntry>) {
        if errors.iter().any(|e| !e.fallback) {
            errors.retain(|e| !e.fallback);
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the index just past the `module` keyword if `line` begins with
/// (optionally `export` then whitespace, then) `module` as a whole word,
/// else `None`. Does not look past the keyword itself; the caller decides
/// whether what follows is a module name or a directive form (`;`/`:`).
fn module_keyword_end(line: &[u8]) -> Option<usize> {
    let mut i = skip_whitespace(line, 0);
    const EXPORT: &[u8] = b"export";
    let export_end = i + EXPORT.len();
    if export_end <= line.len() && &line[i..export_end] == EXPORT && (export_end >= line.len() || !is_identifier_continue(line[export_end])) {
        i = skip_whitespace(line, export_end);
    }
    const MODULE: &[u8] = b"module";
    let end = i + MODULE.len();
    if end > line.len() || &line[i..end] != MODULE {
        return None;
    }
    if end < line.len() && is_identifier_continue(line[end]) {
        return None;
    }
    Some(end)
}

fn raw_trimmed_eq(text: &[u8], expected: &[u8]) -> bool {
    let start = text.iter().position(|&b| b != b' ' && b != b'\t').unwrap_or(text.len());
    let end = text.iter().rposition(|&b| b != b' ' && b != b'\t').map(|p| p + 1).unwrap_or(start);
    &text[start..end] == expected
}

/// Abstracts over a file and stdin so [`Source::load`] doesn't care which
/// one it's reading. Acquired and released entirely within the scope of
/// [`Source::load`].
enum LineReader {
    File(BufReader<File>),
    Stdin(Stdin),
}

impl LineReader {
    fn open(path: &str) -> LoadResult<Self> {
        if path == STDIN_PATH {
            return Ok(Self::Stdin(io::stdin()));
        }
        let file = File::open(path).map_err(|source| LoadError::Io { path: path.to_string(), source })?;
        Ok(Self::File(BufReader::new(file)))
    }

    /// Reads one `\n`-delimited physical line, dropping the delimiter
    /// itself. Returns `None` at end of stream.
    ///
    /// A non-EOF read failure is not fatal: it is recorded as a fallback
    /// [`ErrorEntry`] and treated as if the stream had ended, so a caller
    /// that already has a real diagnostic to report isn't drowned out by a
    /// flaky pipe or a read racing a truncation.
    fn read_line(&mut self, line_no: i32, errors: &mut Vec<ErrorEntry>) -> Option<Vec<u8>> {
        let mut buf = Vec::new();
        let result = match self {
            Self::File(r) => r.read_until(b'\n', &mut buf),
            Self::Stdin(s) => s.lock().read_until(b'\n', &mut buf),
        };
        let n = match result {
            Ok(n) => n,
            Err(e) => {
                errors.push(ErrorEntry::fallback(
                    SourcePosition::new(line_no, 1),
                    format!("unexpected error reading source: {e}"),
                ));
                return None;
            }
        };
        if n == 0 {
            return None;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        Some(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_str(src: &str) -> (Source, Vec<ErrorEntry>) {
        let mut source = Source::new();
        let mut errors = Vec::new();
        // Route through a temp file so both the file and stdin paths of
        // LineReader get exercised across the test suite.
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("in.cpp2");
        std::fs::write(&path, src).expect("write fixture");
        source.load(path.to_str().expect("utf8 path"), &mut errors).expect("load should not abort");
        (source, errors)
    }

    #[test]
    fn s1_basic_modern() {
        let (source, errors) = load_str("main: () = { }\n");
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(source.has_modern());
        assert!(!source.has_legacy());
        let lines = source.get_lines();
        assert_eq!(lines.len(), 2); // sentinel + 1 real line
        assert_eq!(lines[1].category, LineCategory::Modern);
    }

    #[test]
    fn s2_mixed_blank_promoted() {
        let (source, errors) = load_str("#include <x>\n\nmain: () -> int = { return 0; }\n");
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(source.has_legacy());
        assert!(source.has_modern());
        let lines = source.get_lines();
        assert_eq!(lines[1].category, LineCategory::Preprocessor);
        assert_eq!(lines[2].category, LineCategory::Modern);
        assert_eq!(lines[3].category, LineCategory::Modern);
    }

    #[test]
    fn s3_raw_string_across_lines() {
        let (source, errors) = load_str("auto s = R\"xx(\nhello { not a brace }\n)xx\";\n");
        assert!(errors.is_empty(), "{:?}", errors);
        let lines = source.get_lines();
        assert_eq!(lines[2].category, LineCategory::RawString);
    }

    #[test]
    fn s4_if_else_arms_balanced() {
        let src = "void f(){\n#if A\n  if(x){\n#else\n  if(y){\n#endif\n    g();\n  }\n}\n";
        let (_source, errors) = load_str(src);
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn s5_operator_declaration() {
        let (source, errors) = load_str("operator+: (this, that) -> int = 0;\n");
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(source.has_modern());
        let lines = source.get_lines();
        assert_eq!(lines[1].category, LineCategory::Modern);
    }

    #[test]
    fn s6_unterminated_char_literal() {
        let (source, errors) = load_str("x := 'a\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("character literal was terminated"));
        let lines = source.get_lines();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn module_prefix_split() {
        let src = "export module foo;\nimport bar;\n\nmain: () = { }\n";
        let (source, errors) = load_str(src);
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(source.is_module());
        assert!(source.has_module_directive());
        assert_eq!(source.get_module_lines().len(), 2);
        let combined: Vec<_> = source
            .get_module_lines()
            .into_iter()
            .chain(source.get_non_module_lines())
            .collect();
        let all: Vec<_> = source.get_lines().into_iter().skip(1).collect();
        assert_eq!(combined.len(), all.len());
    }

    #[test]
    fn module_cpp2_util_flag() {
        let (source, errors) = load_str("export module cpp2.util;\n");
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(source.is_module_cpp2_util());
    }

    #[test]
    fn bare_global_module_fragment_is_not_a_declaration() {
        let (source, errors) = load_str("module;\n#include <cstdio>\nmain: () = { }\n");
        assert!(errors.is_empty(), "{:?}", errors);
        let lines = source.get_lines();
        assert_eq!(lines[1].category, LineCategory::ModuleDirective);
        assert!(!source.is_module());
        assert!(!source.has_module_directive());
    }

    #[test]
    fn private_module_fragment_is_a_directive_not_a_declaration() {
        let (source, errors) = load_str("export module foo;\nmodule :private;\nmain: () = { }\n");
        assert!(errors.is_empty(), "{:?}", errors);
        let lines = source.get_lines();
        assert_eq!(lines[1].category, LineCategory::ModuleDeclaration);
        assert_eq!(lines[2].category, LineCategory::ModuleDirective);
        assert!(source.is_module());
        assert!(source.has_module_directive());
        // The private fragment directly follows a real module declaration,
        // so it stays part of the module prefix.
        assert_eq!(source.get_module_lines().len(), 2);
    }

    #[test]
    fn unmatched_close_brace_reports_error() {
        // The first `{ }` pair balances and empties the opener stack, but
        // `current_open_type` stays `{`; the second `}` then matches that
        // tracked kind against an empty stack and is the one that errors.
        let (_source, errors) = load_str("void f() { } }\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("does not match"));
    }

    #[test]
    fn eof_with_unmatched_opener_reports_error() {
        let (_source, errors) = load_str("void f() {\n  g();\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unmatched"));
    }

    #[test]
    fn line_too_long_is_fatal() {
        let mut source = Source::new();
        let mut errors = Vec::new();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("huge.cpp2");
        let huge = "x".repeat(MAX_LINE_LENGTH + 1);
        std::fs::write(&path, huge).expect("write fixture");
        let result = source.load(path.to_str().expect("utf8 path"), &mut errors);
        assert!(matches!(result, Err(LoadError::LineTooLong { .. })));
    }

    #[test]
    fn round_trip_reproduces_input() {
        let src = "#include <x>\n\nmain: () -> int = { return 0; }\n";
        let (source, _errors) = load_str(src);
        let mut rebuilt = Vec::new();
        for line in source.get_lines().into_iter().skip(1) {
            rebuilt.extend_from_slice(&line.text);
            rebuilt.push(b'\n');
        }
        assert_eq!(rebuilt, src.as_bytes());
    }
}
