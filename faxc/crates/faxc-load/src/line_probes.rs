//! Single-line predicates used by the source loader to decide how a line
//! should be classified before any cross-line scanning happens.

use crate::char_classify::{is_identifier_continue, skip_whitespace, starts_with_identifier, starts_with_operator};

/// The first non-space, non-tab byte on the line, or `\0` if the line is
/// entirely whitespace.
pub fn peek_first_non_whitespace(line: &[u8]) -> u8 {
    for &b in line {
        if b != b' ' && b != b'\t' {
            return b;
        }
    }
    0
}

/// True iff `line` begins with each token in `tokens`, in order, separated
/// by (at least zero, since tokens may be adjacent) whitespace, and no
/// token is immediately followed by an identifier-continue byte (so
/// `"import"` does not match a line starting with `"importer"`).
pub fn starts_with_tokens(line: &[u8], tokens: &[&[u8]]) -> bool {
    let mut i = skip_whitespace(line, 0);
    for (idx, tok) in tokens.iter().enumerate() {
        if idx > 0 {
            i = skip_whitespace(line, i);
        }
        let end = i + tok.len();
        if end > line.len() || &line[i..end] != *tok {
            return false;
        }
        if end < line.len() && is_identifier_continue(line[end]) {
            return false;
        }
        i = end;
    }
    true
}

const ACCESS_SPECIFIERS: &[&[u8]] = &[b"public", b"protected", b"private", b"export"];

/// True iff the line, after skipping leading whitespace and at most one
/// access-specifier keyword, names an identifier or operator-name
/// immediately followed (modulo whitespace) by a single `:` that is not
/// part of `::`.
pub fn starts_with_identifier_colon(line: &[u8]) -> bool {
    let mut i = skip_whitespace(line, 0);

    for spec in ACCESS_SPECIFIERS {
        let end = i + spec.len();
        if end <= line.len() && &line[i..end] == *spec {
            if end >= line.len() || !is_identifier_continue(line[end]) {
                i = skip_whitespace(line, end);
            }
            break;
        }
    }

    let op_len = starts_with_operator(&line[i..]);
    if op_len > 0 {
        i += op_len;
    } else {
        let id_len = starts_with_identifier(&line[i..]);
        if id_len == 0 {
            return false;
        }
        i += id_len;
    }

    i = skip_whitespace(line, i);
    if i >= line.len() || line[i] != b':' {
        return false;
    }
    if i + 1 < line.len() && line[i + 1] == b':' {
        return false;
    }
    true
}

/// Tag returned by [`starts_with_preprocessor_if_else_endif`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreprocessorDirective {
    None,
    If,
    Else,
    Endif,
}

/// Recognizes `#if`, `#else`, `#endif` as a word prefix (e.g. `#ifdef` and
/// `#ifndef` still count as `If` since the caller only needs the group
/// kind; but that also means `#iffy` matches `If` too — this probe does not
/// check that the matched keyword ends at a word boundary, only that the
/// line starts with one of the fixed forms below).
///
/// `#elif` is deliberately not recognized as `Else`: unlike `#else`, an
/// `#elif` arm does not end the conditional's `#if`/`#else` brace-counting
/// group, so treating it as `Else` would misfire the `found_pre_else`
/// duplicate-else check on a second `#elif` and miscount its braces as the
/// else-arm. It is left as an ordinary (non-tagged) preprocessor line.
pub fn starts_with_preprocessor_if_else_endif(line: &[u8]) -> PreprocessorDirective {
    let mut i = skip_whitespace(line, 0);
    if i >= line.len() || line[i] != b'#' {
        return PreprocessorDirective::None;
    }
    i = skip_whitespace(line, i + 1);

    const FORMS: &[(&[u8], PreprocessorDirective)] = &[
        (b"ifdef", PreprocessorDirective::If),
        (b"ifndef", PreprocessorDirective::If),
        (b"if", PreprocessorDirective::If),
        (b"else", PreprocessorDirective::Else),
        (b"endif", PreprocessorDirective::Endif),
    ];
    for (tok, tag) in FORMS {
        let end = i + tok.len();
        if end <= line.len() && &line[i..end] == *tok {
            return *tag;
        }
    }
    PreprocessorDirective::None
}

/// Result of [`is_preprocessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessorProbe {
    pub is_preprocessor: bool,
    pub has_continuation: bool,
}

/// Determines whether `line` is a preprocessor directive line, and whether
/// it continues onto the next physical line via a trailing `\`.
///
/// `first_line` should be `true` for the first physical line of a
/// directive (requiring the leading `#`) and `false` for a line already
/// known to be a continuation of one.
pub fn is_preprocessor(line: &[u8], first_line: bool) -> PreprocessorProbe {
    let is_preprocessor = if first_line {
        peek_first_non_whitespace(line) == b'#'
    } else {
        true
    };
    let has_continuation = line.last() == Some(&b'\\');
    PreprocessorProbe {
        is_preprocessor,
        has_continuation,
    }
}
