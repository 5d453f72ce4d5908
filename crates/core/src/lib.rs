//! gcode-toolchain core library.
//!
//! Translates a machine-independent representation of toolpath commands into
//! textual instruction streams for many machine-control dialects, and parses
//! instruction streams of supported dialects back into the same canonical
//! form. The main entry points are [`parse_str`] for parsing, [`Writer`] for
//! emission, and [`CommandRegistry`] for dialect command dispatch.
//!
//! Dialects are additive: a new one needs only a [`DialectDescriptor`] and a
//! registry override list — no shared code changes.

#![warn(missing_docs)]

/// Canonical command types and dump helpers.
pub mod command;
/// Dialect identities and static per-dialect configuration.
pub mod dialect;
/// Dialect parser: raw lines → canonical commands + diagnostics.
pub mod parse;
/// Command registry: mnemonic → handler dispatch with per-dialect overrides.
pub mod registry;
/// Per-instance parser and writer state.
pub mod state;
/// Dialect writer: canonical commands + settings snapshot → dialect text.
pub mod write;

// ── Convenience re-exports ──────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Command model
pub use command::{Command, Param, ParamValue, strip_lines, to_pretty_json};

// Dialects
pub use dialect::{Dialect, DialectDescriptor, DialectFamily, HeaderStyle, descriptor};

// Parser
pub use parse::{ParseResult, Parser, parse_str};

// Registry
pub use registry::{CommandRegistry, Dispatch, Handler, LineContext, Transform};

// State
pub use state::{ParserState, Position, WriterState};

// Writer
pub use write::{EMPTY_STEP_COMMENT, PRODUCT_LINE, WriteError, Writer};

// Diagnostics (re-exported from the diagnostics crate)
pub use gcode_toolchain_diagnostics::{Diagnostic, Severity, codes};
