//! Diagnostics for the gcode-toolchain.
//!
//! Provides [`Diagnostic`], [`Severity`], and [`LineIndex`] types used to
//! report errors, warnings, and informational messages from the dialect
//! parser and writer. Diagnostic codes are defined in the [`codes`] module.
//!
//! Parse-direction failures are per-line and non-fatal: they accumulate in a
//! diagnostics list returned alongside whatever parsed successfully. Each
//! diagnostic carries the 1-based source line it is attributable to and, via
//! [`Diagnostic::with_context`], machine-readable detail such as the verbatim
//! line text or the offending mnemonic.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

// ── LineIndex ────────────────────────────────────────────────────────────

/// Maps 1-based line numbers of a source string to byte ranges.
///
/// Diagnostics in this toolchain are line-granular; renderers that annotate
/// source text (the CLI's pretty output) need the byte range a line occupies.
/// The index is built in O(n) and each lookup is O(1).
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line. `line_starts[0]` is always 0.
    line_starts: Vec<usize>,
    /// Total length of the indexed source in bytes.
    len: usize,
}

impl LineIndex {
    /// Build a `LineIndex` from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0usize];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Byte range `[start, end)` of the given 1-based line, excluding the
    /// trailing newline. Returns `None` if `line` is 0 or out of bounds.
    pub fn line_span(&self, line: usize) -> Option<(usize, usize)> {
        let idx = line.checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = match self.line_starts.get(idx + 1) {
            Some(next) => next - 1, // drop the '\n'
            None => self.len,
        };
        Some((start, end.max(start)))
    }

    /// Total number of lines (at least 1, even for empty input).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

// ── Severity ─────────────────────────────────────────────────────────────

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error — the input line could not be interpreted.
    Error,
    /// Warning — the input may produce unexpected results.
    Warn,
    /// Informational note.
    Info,
}

// ── Diagnostic ───────────────────────────────────────────────────────────

/// A diagnostic message produced by the parser or writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"GCD1001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// 1-based source line this diagnostic is attributable to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Machine-readable context for tooling. Keys and values are free-form
    /// strings (`"text"` carries the verbatim source line, `"command"` the
    /// offending mnemonic, and so on). Serialized only when present.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            line,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        Self::new(id, Severity::Error, message, line)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, line)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        Self::new(id, Severity::Info, message, line)
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if
    /// available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    Some(match id {
        codes::PARSER_UNKNOWN_COMMAND => {
            "The mnemonic at the start of this line is not registered for the \
             selected dialect, neither as a base command nor as a dialect \
             override or alias. The line was skipped; parsing continued at \
             the next line."
        }
        codes::PARSER_MALFORMED_PARAMETER => {
            "A parameter token on this line was present but could not be \
             parsed as the declared type for its letter (for example a \
             non-numeric value after an axis letter). The partially built \
             command for this line was discarded."
        }
        codes::PARSER_EMPTY_INPUT => {
            "The input contained no recognizable commands. This is often a \
             sign the wrong dialect was selected."
        }
        codes::WRITER_MISSING_SETTING => {
            "A writer operation required a profile key that is absent from \
             the settings snapshot. This is a configuration error and aborts \
             the whole generation pass."
        }
        codes::WRITER_UNSUPPORTED_AXIS => {
            "A canonical command uses a parameter letter that is not in the \
             target dialect's supported axis set. Encoding that command is \
             not possible; the caller decides whether to skip it or abort."
        }
        _ => return None,
    })
}
