//! Common types and utilities shared across the eTPL compiler pipeline.
//!
//! This crate provides the foundational types every other `etpl-*` crate
//! depends on:
//! - Small shared enums (`SizeUnit`, `Signedness`)
//! - Source spans (`Span`, `Spanned`, `SpanBuilder`, `ByteSpan`)
//! - Line/column positions for diagnostic rendering
//! - The diagnostic catalogue and formatting helpers
//! - Centralized recursion/capacity limits
//! - Integer literal parsing

pub mod common;
pub use common::{Signedness, SizeUnit};

pub mod span;
pub use span::{ByteSpan, Span, SpanBuilder, Spanned};

pub mod limits;

pub mod position;
pub use position::{LineMap, Location, Position, Range, SourceLocation};

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage};

pub mod numeric;
pub use numeric::parse_integer_literal_value;
