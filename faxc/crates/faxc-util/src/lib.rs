//! faxc-util - Core Utilities and Foundation Types
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate provides the foundation types shared by every phase of the faxc
//! toolchain: source positions and spans (`span`), diagnostic construction and
//! collection (`diagnostic`), and the error types (`error`) that the phase
//! crates build their own `Result`s from.
//!
//! DESIGN PRINCIPLES:
//! ------------------
//! 1. ZERO-COST ABSTRACTIONS
//!    Types here compile down to code no worse than a hand-written equivalent.
//!
//! 2. TYPE SAFETY
//!    Prefer small newtypes (`FileId`, diagnostic codes) over raw integers.
//!
//! 3. NO GLOBAL STATE
//!    A `Handler` is owned by whichever phase is running; nothing here reaches
//!    for a process-wide singleton. Components thread an explicit sink.

pub mod diagnostic;
pub mod error;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use error::{DiagnosticError, DiagnosticResult, SourceMapError, SourceMapResult};
pub use span::{FileId, SourceFile, SourceMap, Span};
