//! Per-line state machines for the legacy and modern syntaxes.
//!
//! [`process_cpp_line`] advances a [`LegacyScanState`] one physical line at a
//! time; [`process_cpp2_line`] does the same for a [`ModernScanState`] once
//! the loader has decided a line begins a modern (`name : ...`) declaration.
//! Both thread brace/paren depth through the same [`BraceTracker`] so a
//! `{}`/`()` seen under either mode still balances against one counter.

use crate::brace_tracker::BraceTracker;
use crate::char_classify::is_encoding_prefix_and;
use crate::line_probes::peek_first_non_whitespace;
use crate::source::{ErrorEntry, SourcePosition};

/// Cross-line state carried by the legacy-mode scanner.
#[derive(Debug, Clone, Default)]
pub struct LegacyScanState {
    pub in_comment: bool,
    pub in_string_literal: bool,
    pub in_raw_string_literal: bool,
    pub raw_string_closing_seq: Vec<u8>,
}

/// What [`process_cpp_line`] observed about the line it just scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacyLineResult {
    pub all_comment_line: bool,
    pub empty_line: bool,
    pub all_rawstring_line: bool,
}

/// True iff byte at `i` opens a quoted form (plain string or raw string)
/// recognized by [`is_encoding_prefix_and`], returning `(quote_idx, is_raw)`.
fn opens_quoted_form(line: &[u8], i: usize) -> Option<(usize, bool)> {
    let len = is_encoding_prefix_and(line, i, b'"');
    if len == 0 {
        return None;
    }
    let quote_idx = i + len - 1;
    let is_raw = quote_idx > i && line[quote_idx - 1] == b'R';
    Some((quote_idx, is_raw))
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Scans one physical line of legacy-mode source, updating `state` and
/// `braces` in place.
///
/// Entering a fresh line (no flags set in `state`) takes a fast path for the
/// two common single-line forms (`// ...`, an unterminated `/* ...`);
/// everything else falls through to the general byte walk.
pub fn process_cpp_line(
    line: &[u8],
    line_no: i32,
    state: &mut LegacyScanState,
    braces: &mut BraceTracker,
    errors: &mut Vec<ErrorEntry>,
) -> LegacyLineResult {
    if !state.in_comment && !state.in_string_literal && !state.in_raw_string_literal {
        if peek_first_non_whitespace(line) == b'/' {
            let start = line.iter().position(|&b| b != b' ' && b != b'\t').expect("checked above");
            if line[start..].starts_with(b"//") {
                return LegacyLineResult { all_comment_line: true, empty_line: false, all_rawstring_line: false };
            }
            if line[start..].starts_with(b"/*") && find_subslice(&line[start + 2..], b"*/").is_none() {
                state.in_comment = true;
                return LegacyLineResult { all_comment_line: true, empty_line: false, all_rawstring_line: false };
            }
        }
    }

    let mut i = 0usize;
    let mut prev = 0u8;
    let mut prev2 = 0u8;
    let mut saw_non_ws = false;
    let mut saw_code = false;

    while i < line.len() {
        let b = line[i];
        if b != b' ' && b != b'\t' {
            saw_non_ws = true;
        }

        if state.in_raw_string_literal {
            match find_subslice(&line[i..], &state.raw_string_closing_seq) {
                Some(off) => {
                    i += off + state.raw_string_closing_seq.len();
                    state.in_raw_string_literal = false;
                    state.raw_string_closing_seq.clear();
                    prev = 0;
                    prev2 = 0;
                }
                None => {
                    return LegacyLineResult { all_comment_line: false, empty_line: false, all_rawstring_line: !saw_code };
                }
            }
            continue;
        }

        if state.in_comment {
            if b == b'/' && prev == b'*' {
                state.in_comment = false;
            }
            prev2 = prev;
            prev = b;
            i += 1;
            continue;
        }

        if state.in_string_literal {
            let escaped = prev == b'\\' && prev2 != b'\\';
            if b == b'"' && !escaped {
                state.in_string_literal = false;
            }
            saw_code = true;
            prev2 = prev;
            prev = b;
            i += 1;
            continue;
        }

        // Not inside any literal or comment.
        let in_char_literal_bracket = prev == b'\'' && line.get(i + 1) == Some(&b'\'');

        if !in_char_literal_bracket && b == b'/' && line.get(i + 1) == Some(&b'/') {
            return LegacyLineResult { all_comment_line: !saw_code, empty_line: false, all_rawstring_line: false };
        }

        if !in_char_literal_bracket && b == b'/' && line.get(i + 1) == Some(&b'*') {
            match find_subslice(&line[i + 2..], b"*/") {
                Some(off) => {
                    i += 2 + off + 2;
                    saw_code = true;
                    prev = 0;
                    prev2 = 0;
                }
                None => {
                    state.in_comment = true;
                    return LegacyLineResult { all_comment_line: !saw_code, empty_line: false, all_rawstring_line: false };
                }
            }
            continue;
        }

        if !in_char_literal_bracket {
            if let Some((quote_idx, is_raw)) = opens_quoted_form(line, i) {
                if is_raw {
                    let delim_start = quote_idx + 1;
                    if let Some(paren_off) = line[delim_start..].iter().position(|&c| c == b'(') {
                        let delim = &line[delim_start..delim_start + paren_off];
                        let mut closing = Vec::with_capacity(delim.len() + 2);
                        closing.push(b')');
                        closing.extend_from_slice(delim);
                        closing.push(b'"');
                        state.raw_string_closing_seq = closing;
                        state.in_raw_string_literal = true;
                        i = delim_start + paren_off + 1;
                        saw_code = true;
                        prev = 0;
                        prev2 = 0;
                        continue;
                    }
                    // Malformed raw-string opener (no delimiter paren found):
                    // fall through and treat the quote as a plain string open.
                }
                state.in_string_literal = true;
                i = quote_idx + 1;
                saw_code = true;
                prev = b'"';
                prev2 = 0;
                continue;
            }
        }

        if !in_char_literal_bracket && (b == b'{' || b == b'}') {
            if b == b'{' {
                braces.found_open_brace(line_no, b'{');
            } else {
                braces.found_close_brace(SourcePosition::new(line_no, (i + 1) as i32), b'}', errors);
            }
        } else if !in_char_literal_bracket && (b == b'(' || b == b')') {
            if b == b'(' {
                braces.found_open_brace(line_no, b'(');
            } else {
                braces.found_close_brace(SourcePosition::new(line_no, (i + 1) as i32), b')', errors);
            }
        }

        saw_code = true;
        prev2 = prev;
        prev = b;
        i += 1;
    }

    LegacyLineResult { all_comment_line: saw_non_ws && !saw_code, empty_line: !saw_non_ws, all_rawstring_line: false }
}

/// Cross-line state carried by the modern-mode scanner.
#[derive(Debug, Clone, Default)]
pub struct ModernScanState {
    pub in_comment: bool,
    pub in_string_literal: bool,
    pub in_char_literal: bool,
}

/// What [`process_cpp2_line`] observed about the line it just scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModernLineResult {
    pub declaration_ended: bool,
}

/// Scans one physical line of a modern declaration, updating `state` and
/// `braces` in place. Returns whether the declaration's terminator (a `;`
/// at brace depth zero, or a `}` bringing depth below one) was seen.
pub fn process_cpp2_line(
    line: &[u8],
    line_no: i32,
    state: &mut ModernScanState,
    braces: &mut BraceTracker,
    errors: &mut Vec<ErrorEntry>,
) -> ModernLineResult {
    let mut i = 0usize;
    let mut prev = 0u8;
    let mut prev2 = 0u8;
    let mut ended = false;

    while i < line.len() {
        let b = line[i];

        if state.in_comment {
            if b == b'/' && prev == b'*' {
                state.in_comment = false;
            }
            prev2 = prev;
            prev = b;
            i += 1;
            continue;
        }

        if state.in_string_literal {
            let escaped = prev == b'\\' && prev2 != b'\\';
            if b == b'"' && !escaped {
                state.in_string_literal = false;
            }
            prev2 = prev;
            prev = b;
            i += 1;
            continue;
        }

        if state.in_char_literal {
            let escaped = prev == b'\\' && prev2 != b'\\';
            if b == b'\'' && !escaped {
                state.in_char_literal = false;
            }
            prev2 = prev;
            prev = b;
            i += 1;
            continue;
        }

        if ended && b == b'/' && line.get(i + 1) == Some(&b'*') {
            errors.push(ErrorEntry::new(
                SourcePosition::new(line_no, (i + 1) as i32),
                "a block comment may not follow the end of a declaration on the same line",
            ));
            break;
        }

        if b == b'/' && line.get(i + 1) == Some(&b'/') {
            break;
        }
        if b == b'/' && line.get(i + 1) == Some(&b'*') {
            match find_subslice(&line[i + 2..], b"*/") {
                Some(off) => {
                    i += 2 + off + 2;
                }
                None => {
                    state.in_comment = true;
                    i += 2;
                }
            }
            prev = 0;
            prev2 = 0;
            continue;
        }

        let char_len = is_encoding_prefix_and(line, i, b'\'');
        if char_len > 0 {
            state.in_char_literal = true;
            i += char_len;
            prev = 0;
            prev2 = 0;
            continue;
        }

        if b == b'"' {
            state.in_string_literal = true;
            prev2 = prev;
            prev = b;
            i += 1;
            continue;
        }

        if b == b'{' || b == b'(' {
            braces.found_open_brace(line_no, b);
        } else if b == b'}' || b == b')' {
            let was_depth = braces.depth();
            braces.found_close_brace(SourcePosition::new(line_no, (i + 1) as i32), b, errors);
            if b == b'}' && was_depth > 0 && braces.depth() == 0 {
                ended = true;
            }
        } else if b == b';' && braces.depth() == 0 {
            ended = true;
        }

        prev2 = prev;
        prev = b;
        i += 1;
    }

    if state.in_char_literal {
        errors.push(ErrorEntry::new(
            SourcePosition::new(line_no, (line.len() + 1) as i32),
            "line ended before character literal was terminated",
        ));
        ended = true;
    }

    ModernLineResult { declaration_ended: ended }
}
