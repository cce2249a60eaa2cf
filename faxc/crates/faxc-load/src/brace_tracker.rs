//! Stateful `{}`/`()` depth counter with `#if`/`#else`/`#endif` reconciliation.
//!
//! Each arm of a conditional contributes to the same physical brace counter.
//! If both arms open the same number of extra braces, that count would be
//! counted twice by the time `#endif` is reached, so [`BraceTracker`] keeps a
//! stack of per-`#if` frames and discounts the duplicated count on `#endif`.

use crate::source::{ErrorEntry, SourcePosition};

/// Per-`#if` accounting frame.
#[derive(Debug, Clone, Copy, Default)]
struct PreIfFrame {
    if_net_braces: i32,
    found_else: bool,
    else_net_braces: i32,
}

/// Tracks brace/paren depth across a whole source file, reconciling the
/// double-counting that a naively-summed `#if`/`#else` pair would produce.
pub struct BraceTracker {
    current_open_type: Option<u8>,
    open_braces: Vec<i32>,
    preprocessor_stack: Vec<PreIfFrame>,
}

impl BraceTracker {
    pub fn new() -> Self {
        Self {
            current_open_type: None,
            open_braces: Vec::new(),
            preprocessor_stack: vec![PreIfFrame::default()],
        }
    }

    /// Current bracket kind being tracked (`{` or `(`), if any opener has
    /// been seen yet.
    pub fn current_open_type(&self) -> Option<u8> {
        self.current_open_type
    }

    /// Current unmatched-opener depth.
    pub fn depth(&self) -> usize {
        self.open_braces.len()
    }

    fn matching_closer(open: u8) -> u8 {
        match open {
            b'{' => b'}',
            b'(' => b')',
            _ => unreachable!("unsupported bracket kind"),
        }
    }

    fn active_frame_mut(&mut self) -> &mut PreIfFrame {
        self.preprocessor_stack
            .last_mut()
            .expect("preprocessor_stack is never empty")
    }

    /// An opening bracket byte (`{` or `(`) was seen at `line`.
    pub fn found_open_brace(&mut self, line: i32, ch: u8) {
        if self.open_braces.is_empty() {
            self.current_open_type = Some(ch);
        }
        if self.current_open_type == Some(ch) {
            self.open_braces.push(line);
            self.active_frame_mut().if_net_braces += 1;
        }
    }

    /// A closing bracket byte was seen at `pos`.
    pub fn found_close_brace(&mut self, pos: SourcePosition, ch: u8, errors: &mut Vec<ErrorEntry>) {
        let Some(open) = self.current_open_type else {
            return;
        };
        if ch != Self::matching_closer(open) {
            return;
        }
        if self.open_braces.pop().is_none() {
            errors.push(ErrorEntry::new(
                pos,
                format!(
                    "closing '{}' does not match a prior '{}'",
                    ch as char, open as char
                ),
            ));
            return;
        }
        self.active_frame_mut().if_net_braces -= 1;
    }

    /// A `#if`/`#ifdef`/`#ifndef` directive was seen.
    pub fn found_pre_if(&mut self, _line: i32) {
        self.preprocessor_stack.push(PreIfFrame::default());
    }

    /// A `#else` directive was seen at `pos`.
    pub fn found_pre_else(&mut self, pos: SourcePosition, errors: &mut Vec<ErrorEntry>) {
        if self.preprocessor_stack.len() < 2 {
            errors.push(ErrorEntry::new(pos, "#else does not match a prior #if".to_string()));
            return;
        }
        let frame = self.active_frame_mut();
        if frame.found_else {
            errors.push(ErrorEntry::new(pos, "duplicate #else".to_string()));
            return;
        }
        frame.found_else = true;
        frame.else_net_braces = frame.if_net_braces;
        frame.if_net_braces = 0;
    }

    /// A `#endif` directive was seen at `pos`.
    pub fn found_pre_endif(&mut self, pos: SourcePosition, errors: &mut Vec<ErrorEntry>) {
        if self.preprocessor_stack.len() < 2 {
            errors.push(ErrorEntry::new(pos, "#endif does not match a prior #if".to_string()));
            return;
        }
        let frame = *self.preprocessor_stack.last().expect("checked above");

        let this_arm_braces = if frame.found_else {
            frame.if_net_braces
        } else {
            0
        };
        let other_arm_braces = if frame.found_else {
            frame.else_net_braces
        } else {
            frame.if_net_braces
        };

        if frame.found_else && this_arm_braces == other_arm_braces && this_arm_braces >= 0 {
            let close = Self::matching_closer(self.current_open_type.unwrap_or(b'{'));
            for _ in 0..this_arm_braces {
                self.found_close_brace(pos, close, errors);
            }
        }

        self.preprocessor_stack.pop();
    }

    /// EOF was reached at `pos`; if any openers remain unmatched, emits a
    /// single diagnostic enumerating their line numbers.
    pub fn found_eof(&self, pos: SourcePosition, errors: &mut Vec<ErrorEntry>) {
        if self.open_braces.is_empty() {
            return;
        }
        let lines = &self.open_braces;
        let list = match lines.len() {
            1 => format!("{}", lines[0]),
            2 => format!("{} and {}", lines[0], lines[1]),
            _ => {
                let (last, rest) = lines.split_last().expect("non-empty");
                let rest: Vec<String> = rest.iter().map(|n| n.to_string()).collect();
                format!("{}, and {}", rest.join(", "), last)
            }
        };
        let open = self.current_open_type.unwrap_or(b'{') as char;
        errors.push(ErrorEntry::new(
            pos,
            format!("unmatched '{}' opened on line {}", open, list),
        ));
    }
}

impl Default for BraceTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: i32) -> SourcePosition {
        SourcePosition::new(line, 1)
    }

    #[test]
    fn simple_balanced_braces() {
        let mut t = BraceTracker::new();
        let mut errors = Vec::new();
        t.found_open_brace(1, b'{');
        t.found_close_brace(pos(1), b'}', &mut errors);
        assert!(errors.is_empty());
        assert_eq!(t.depth(), 0);
        t.found_eof(pos(2), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn unmatched_close_reports_error() {
        let mut t = BraceTracker::new();
        let mut errors = Vec::new();
        t.found_open_brace(1, b'{');
        t.found_close_brace(pos(1), b'}', &mut errors);
        t.found_close_brace(pos(2), b'}', &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("does not match"));
    }

    #[test]
    fn unmatched_eof_lists_openers() {
        let mut t = BraceTracker::new();
        let mut errors = Vec::new();
        t.found_open_brace(1, b'{');
        t.found_open_brace(2, b'{');
        t.found_open_brace(3, b'{');
        t.found_eof(pos(10), &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("1, 2, and 3"));
    }

    #[test]
    fn if_else_endif_balanced_arms_reconcile() {
        // void f(){
        // #if A
        //   if(x){
        // #else
        //   if(y){
        // #endif
        //     g();
        //   }
        // }
        let mut t = BraceTracker::new();
        let mut errors = Vec::new();
        t.found_open_brace(1, b'{'); // void f(){
        t.found_pre_if(2);
        t.found_open_brace(3, b'{'); // if(x){
        t.found_pre_else(pos(4), &mut errors);
        t.found_open_brace(5, b'{'); // if(y){
        t.found_pre_endif(pos(6), &mut errors);
        t.found_close_brace(pos(8), b'}', &mut errors); // closes the if
        t.found_close_brace(pos(9), b'}', &mut errors); // closes f
        t.found_eof(pos(10), &mut errors);
        assert!(errors.is_empty(), "errors: {:?}", errors.iter().map(|e| &e.message).collect::<Vec<_>>());
        assert_eq!(t.depth(), 0);
    }

    #[test]
    fn unmatched_else_and_endif() {
        let mut t = BraceTracker::new();
        let mut errors = Vec::new();
        t.found_pre_else(pos(1), &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("#else"));

        let mut t2 = BraceTracker::new();
        let mut errors2 = Vec::new();
        t2.found_pre_endif(pos(1), &mut errors2);
        assert_eq!(errors2.len(), 1);
        assert!(errors2[0].message.contains("#endif"));
    }

    #[test]
    fn duplicate_else() {
        let mut t = BraceTracker::new();
        let mut errors = Vec::new();
        t.found_pre_if(1);
        t.found_pre_else(pos(2), &mut errors);
        t.found_pre_else(pos(3), &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("duplicate"));
    }
}
