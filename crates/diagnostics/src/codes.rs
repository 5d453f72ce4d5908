//! Stable diagnostic ID constants.
//!
//! IDs are grouped by the component that raises them: `GCD1xxx` for the
//! parser, `GCD2xxx` for the writer. IDs are append-only — a published ID is
//! never renumbered or reused.

/// Mnemonic not present in the resolved dialect registry.
pub const PARSER_UNKNOWN_COMMAND: &str = "GCD1001";
/// A parameter token failed to parse as its letter's declared type.
pub const PARSER_MALFORMED_PARAMETER: &str = "GCD1002";
/// The input produced no commands at all.
pub const PARSER_EMPTY_INPUT: &str = "GCD1003";
/// A writer operation required a profile key absent from the snapshot.
pub const WRITER_MISSING_SETTING: &str = "GCD2001";
/// A command used a parameter letter outside the target dialect's axis set.
pub const WRITER_UNSUPPORTED_AXIS: &str = "GCD2002";
