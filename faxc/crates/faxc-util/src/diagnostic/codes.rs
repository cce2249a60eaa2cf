//! Diagnostic codes for categorizing compiler errors and warnings.
//!
//! This module provides the [`DiagnosticCode`] type for uniquely identifying
//! diagnostic messages, enabling users to look up documentation and suppress
//! specific warnings.
//!
//! # Examples
//!
//! ```
//! use faxc_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::E0001;
//! assert_eq!(code.prefix(), "E");
//! assert_eq!(code.number(), 1);
//! assert_eq!(code.as_str(), "E0001");
//! ```

/// A unique code identifying a diagnostic message
///
/// Diagnostic codes follow the format `{prefix}{number}` where:
/// - `prefix` is typically "E" for errors or "W" for warnings
/// - `number` is a 4-digit number (padded with zeros)
///
/// This allows users to reference specific diagnostics in documentation
/// and suppression attributes.
///
/// # Examples
///
/// ```
/// use faxc_util::diagnostic::DiagnosticCode;
///
/// let code = DiagnosticCode::new("E", 1);
/// assert_eq!(code.as_str(), "E0001");
///
/// let warning = DiagnosticCode::W0001;
/// assert_eq!(warning.prefix(), "W");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix (e.g., "E" for error, "W" for warning)
    pub prefix: &'static str,
    /// The numeric identifier
    pub number: u32,
}

impl DiagnosticCode {
    /// Create a new diagnostic code
    ///
    /// # Arguments
    ///
    /// * `prefix` - The code prefix (typically "E" or "W")
    /// * `number` - The numeric identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use faxc_util::diagnostic::DiagnosticCode;
    ///
    /// let code = DiagnosticCode::new("E", 1001);
    /// assert_eq!(code.prefix(), "E");
    /// assert_eq!(code.number(), 1001);
    /// ```
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the prefix (e.g., "E" for error, "W" for warning)
    ///
    /// # Examples
    ///
    /// ```
    /// use faxc_util::diagnostic::DiagnosticCode;
    ///
    /// assert_eq!(DiagnosticCode::E0001.prefix(), "E");
    /// assert_eq!(DiagnosticCode::W0001.prefix(), "W");
    /// ```
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Get the numeric identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use faxc_util::diagnostic::DiagnosticCode;
    ///
    /// assert_eq!(DiagnosticCode::E0001.number(), 1);
    /// assert_eq!(DiagnosticCode::W0001.number(), 1);
    /// ```
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Get the full code string (e.g., "E0001", "W0001")
    ///
    /// # Examples
    ///
    /// ```
    /// use faxc_util::diagnostic::DiagnosticCode;
    ///
    /// assert_eq!(DiagnosticCode::E0001.as_str(), "E0001");
    /// assert_eq!(DiagnosticCode::W0001.as_str(), "W0001");
    /// ```
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // =========================================================================
    // PREDEFINED ERROR CODES (E0001-E9999)
    // =========================================================================

    /// E0001: generic error, unspecialized
    pub const E0001: Self = Self::new("E", 1);
    /// E0002: generic error, unspecialized
    pub const E0002: Self = Self::new("E", 2);
    /// W0001: generic warning, unspecialized
    pub const W0001: Self = Self::new("W", 1);

    /// E1001: Loader - closing bracket does not match a prior opener
    pub const E_LOAD_UNMATCHED_CLOSE: Self = Self::new("E", 1001);
    /// E1002: Loader - reached end of file with unmatched openers
    pub const E_LOAD_UNMATCHED_EOF: Self = Self::new("E", 1002);
    /// E1003: Loader - `#else` with no matching `#if`
    pub const E_LOAD_UNMATCHED_ELSE: Self = Self::new("E", 1003);
    /// E1004: Loader - a second `#else` inside the same `#if` group
    pub const E_LOAD_DUPLICATE_ELSE: Self = Self::new("E", 1004);
    /// E1005: Loader - `#endif` with no matching `#if`
    pub const E_LOAD_UNMATCHED_ENDIF: Self = Self::new("E", 1005);
    /// E1006: Loader - block comment opened after a declaration terminator
    pub const E_LOAD_TRAILING_COMMENT: Self = Self::new("E", 1006);
    /// E1007: Loader - character literal not closed before end of line
    pub const E_LOAD_UNTERMINATED_CHAR: Self = Self::new("E", 1007);
    /// E1008: Loader - physical line exceeded the maximum line length
    pub const E_LOAD_LINE_TOO_LONG: Self = Self::new("E", 1008);
    /// E1009: Loader - fallback diagnostic for a non-EOF stream read failure
    pub const E_LOAD_STREAM_ERROR: Self = Self::new("E", 1009);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Standalone constant exports for convenience
pub const E0001: DiagnosticCode = DiagnosticCode::E0001;
pub const E0002: DiagnosticCode = DiagnosticCode::E0002;
pub const W0001: DiagnosticCode = DiagnosticCode::W0001;
pub const E_LOAD_UNMATCHED_CLOSE: DiagnosticCode = DiagnosticCode::E_LOAD_UNMATCHED_CLOSE;
pub const E_LOAD_UNMATCHED_EOF: DiagnosticCode = DiagnosticCode::E_LOAD_UNMATCHED_EOF;
pub const E_LOAD_UNMATCHED_ELSE: DiagnosticCode = DiagnosticCode::E_LOAD_UNMATCHED_ELSE;
pub const E_LOAD_DUPLICATE_ELSE: DiagnosticCode = DiagnosticCode::E_LOAD_DUPLICATE_ELSE;
pub const E_LOAD_UNMATCHED_ENDIF: DiagnosticCode = DiagnosticCode::E_LOAD_UNMATCHED_ENDIF;
pub const E_LOAD_TRAILING_COMMENT: DiagnosticCode = DiagnosticCode::E_LOAD_TRAILING_COMMENT;
pub const E_LOAD_UNTERMINATED_CHAR: DiagnosticCode = DiagnosticCode::E_LOAD_UNTERMINATED_CHAR;
pub const E_LOAD_LINE_TOO_LONG: DiagnosticCode = DiagnosticCode::E_LOAD_LINE_TOO_LONG;
pub const E_LOAD_STREAM_ERROR: DiagnosticCode = DiagnosticCode::E_LOAD_STREAM_ERROR;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_code() {
        let code = DiagnosticCode::new("E", 1001);
        assert_eq!(code.prefix(), "E");
        assert_eq!(code.number(), 1001);
    }

    #[test]
    fn test_as_str() {
        let code = DiagnosticCode::new("E", 1);
        assert_eq!(code.as_str(), "E0001");

        let code = DiagnosticCode::new("W", 1);
        assert_eq!(code.as_str(), "W0001");

        let code = DiagnosticCode::new("E", 1001);
        assert_eq!(code.as_str(), "E1001");
    }

    #[test]
    fn test_display() {
        let code = DiagnosticCode::new("E", 1001);
        assert_eq!(format!("{}", code), "E1001");
    }

    #[test]
    fn test_debug() {
        let code = DiagnosticCode::new("E", 1001);
        assert_eq!(format!("{:?}", code), "DiagnosticCode(E1001)");
    }

    #[test]
    fn test_predefined_loader_codes() {
        assert_eq!(DiagnosticCode::E_LOAD_UNMATCHED_CLOSE.prefix(), "E");
        assert_eq!(DiagnosticCode::E_LOAD_UNMATCHED_CLOSE.number(), 1001);
        assert_eq!(DiagnosticCode::E_LOAD_UNMATCHED_CLOSE.as_str(), "E1001");

        assert_eq!(DiagnosticCode::E_LOAD_UNMATCHED_EOF.number(), 1002);
        assert_eq!(DiagnosticCode::E_LOAD_LINE_TOO_LONG.number(), 1008);
    }

    #[test]
    fn test_code_equality() {
        let code1 = DiagnosticCode::new("E", 1001);
        let code2 = DiagnosticCode::new("E", 1001);
        let code3 = DiagnosticCode::new("E", 1002);

        assert_eq!(code1, code2);
        assert_ne!(code1, code3);
    }

    #[test]
    fn test_const_codes() {
        // Verify const codes work correctly
        const CODE: DiagnosticCode = DiagnosticCode::E_LOAD_UNMATCHED_CLOSE;
        assert_eq!(CODE.prefix(), "E");
        assert_eq!(CODE.number(), 1001);
    }
}
