//! Dialect parser: raw instruction lines → canonical commands + diagnostics.
//!
//! Processing is strictly line-at-a-time. Each line is split into a mnemonic
//! and ordered parameter tokens, the mnemonic is resolved through the
//! dialect's [`CommandRegistry`], and the handler mutates [`ParserState`]
//! and emits zero or more canonical commands. Failures are local: an
//! unknown mnemonic or a malformed parameter produces one diagnostic for
//! that line and parsing resumes at the next — a whole-file parse never
//! aborts because of a single bad line.

use std::collections::BTreeMap;

use gcode_toolchain_diagnostics::{Diagnostic, codes};
use gcode_toolchain_profile::{SettingsError, SettingsSnapshot, keys};
use serde::Serialize;

use crate::command::{Command, Param, ParamValue};
use crate::dialect::{Dialect, DialectDescriptor, descriptor};
use crate::registry::{CommandRegistry, Dispatch, LineContext};
use crate::state::ParserState;

/// Shorthand for building a `BTreeMap<String, String>` context from
/// key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Result of parsing one instruction file.
#[derive(Debug, Serialize)]
pub struct ParseResult {
    /// Canonical commands, in source order.
    pub commands: Vec<Command>,
    /// Per-line diagnostics accumulated during the parse.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a whole input string under one dialect.
///
/// Construction reads the nozzle count from the snapshot; a missing or
/// mistyped `nozzle_count` is a fatal configuration error, not a per-line
/// diagnostic.
pub fn parse_str(
    dialect: Dialect,
    settings: &SettingsSnapshot,
    input: &str,
) -> Result<ParseResult, SettingsError> {
    let mut parser = Parser::new(dialect, settings)?;
    for line in input.lines() {
        parser.parse_line(line);
    }
    Ok(parser.finish())
}

/// A per-job dialect parser. Lives for the duration of one file.
#[derive(Debug)]
pub struct Parser {
    descriptor: &'static DialectDescriptor,
    registry: CommandRegistry,
    state: ParserState,
    commands: Vec<Command>,
    diagnostics: Vec<Diagnostic>,
    line_no: usize,
}

impl Parser {
    /// Create a parser for `dialect`, sizing per-nozzle state from the
    /// snapshot's nozzle count.
    pub fn new(dialect: Dialect, settings: &SettingsSnapshot) -> Result<Self, SettingsError> {
        let nozzle_count = settings.get_int(keys::NOZZLE_COUNT)?.max(0) as usize;
        Ok(Self {
            descriptor: descriptor(dialect),
            registry: CommandRegistry::for_dialect(dialect),
            state: ParserState::new(nozzle_count),
            commands: Vec::new(),
            diagnostics: Vec::new(),
            line_no: 0,
        })
    }

    /// The parser state, for callers that track modal values across lines.
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// The dialect registry in use, for callers registering ad-hoc overrides
    /// before parsing.
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// Consume one raw source line.
    pub fn parse_line(&mut self, raw: &str) {
        self.line_no += 1;

        let (code, comment) = split_comment(raw, self.descriptor);
        let trimmed = code.trim();

        if trimmed.is_empty() {
            // Comment-only (or blank) line: accumulate the text for the next
            // emitted command.
            if let Some(text) = comment.as_deref()
                && !text.is_empty()
            {
                self.state.push_comment(text);
            }
            return;
        }

        let upper = trimmed.to_uppercase();

        // Verbose vendor mnemonics can span the whole line ("WHEN TRUE DO
        // EXTR_END=2.0"), so the full text is tried against the registry
        // before token splitting.
        let (mnemonic, rest) = if self.registry.resolve(&upper).is_some() {
            (upper.as_str(), "")
        } else {
            match upper.split_once(char::is_whitespace) {
                Some((head, tail)) => (head, tail),
                None => (upper.as_str(), ""),
            }
        };

        let params = match self.parse_params(rest, raw, mnemonic) {
            Ok(params) => params,
            // Diagnostic already recorded; the line's partial command is
            // discarded and state is untouched.
            Err(()) => return,
        };

        let ctx = LineContext {
            mnemonic,
            params: &params,
            comment: comment.as_deref(),
            line: self.line_no,
        };

        if self.registry.dispatch(&mut self.state, &ctx, &mut self.commands) == Dispatch::Unknown {
            self.diagnostics.push(
                Diagnostic::error(
                    codes::PARSER_UNKNOWN_COMMAND,
                    format!("unknown command {mnemonic}"),
                    Some(self.line_no),
                )
                .with_context(ctx!("command" => mnemonic, "text" => raw)),
            );
        }
    }

    /// Finish the parse and hand back everything produced.
    pub fn finish(mut self) -> ParseResult {
        if self.commands.is_empty() {
            self.diagnostics.push(Diagnostic::info(
                codes::PARSER_EMPTY_INPUT,
                "no commands parsed",
                None,
            ));
        }
        ParseResult {
            commands: self.commands,
            diagnostics: self.diagnostics,
        }
    }

    /// Parse whitespace-separated `letter`+`literal` parameter tokens. On the
    /// first malformed token a diagnostic is recorded and `Err` returned.
    fn parse_params(&mut self, rest: &str, raw: &str, mnemonic: &str) -> Result<Vec<Param>, ()> {
        let mut params = Vec::new();
        for token in rest.split_whitespace() {
            match self.parse_param(token) {
                Some(param) => params.push(param),
                None => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            codes::PARSER_MALFORMED_PARAMETER,
                            format!("malformed parameter `{token}` for {mnemonic}"),
                            Some(self.line_no),
                        )
                        .with_context(ctx!(
                            "command" => mnemonic,
                            "parameter" => token,
                            "text" => raw,
                        )),
                    );
                    return Err(());
                }
            }
        }
        Ok(params)
    }

    fn parse_param(&self, token: &str) -> Option<Param> {
        let letter = token.chars().next()?.to_ascii_uppercase();
        if !letter.is_ascii_alphabetic() {
            return None;
        }
        let literal = &token[1..];
        if literal.is_empty() {
            return None;
        }
        let value = if self.descriptor.text_letters.contains(&letter) {
            ParamValue::Text(literal.to_string())
        } else {
            ParamValue::Number(literal.parse::<f64>().ok()?)
        };
        Some(Param { letter, value })
    }
}

/// Split a raw line into code text and comment text per the dialect's
/// delimiters. With an empty end delimiter the comment runs to end of line;
/// otherwise it is the text between the delimiters.
fn split_comment<'a>(raw: &'a str, desc: &DialectDescriptor) -> (&'a str, Option<String>) {
    let style = &desc.comment_style;
    let Some((code, after)) = raw.split_once(style.start) else {
        return (raw, None);
    };
    let comment = if style.end.is_empty() {
        after.trim()
    } else {
        match after.split_once(style.end) {
            Some((inner, _)) => inner.trim(),
            None => after.trim(), // unclosed comment runs to end of line
        }
    };
    (code, Some(comment.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcode_toolchain_profile::SettingValue;

    fn settings(nozzles: i64) -> SettingsSnapshot {
        SettingsSnapshot::new().set(keys::NOZZLE_COUNT, SettingValue::Int(nozzles))
    }

    #[test]
    fn split_comment_to_end_of_line() {
        let desc = descriptor(Dialect::Marlin);
        let (code, comment) = split_comment("G1 X5 ; perimeter", desc);
        assert_eq!(code, "G1 X5 ");
        assert_eq!(comment.as_deref(), Some("perimeter"));
    }

    #[test]
    fn split_comment_delimited() {
        let desc = descriptor(Dialect::Cincinnati);
        let (code, comment) = split_comment("G1 X5 (perimeter)", desc);
        assert_eq!(code, "G1 X5 ");
        assert_eq!(comment.as_deref(), Some("perimeter"));
    }

    #[test]
    fn split_comment_unclosed_runs_to_eol() {
        let desc = descriptor(Dialect::Cincinnati);
        let (_, comment) = split_comment("G1 X5 (perimeter", desc);
        assert_eq!(comment.as_deref(), Some("perimeter"));
    }

    #[test]
    fn missing_nozzle_count_is_fatal() {
        let err = Parser::new(Dialect::Common, &SettingsSnapshot::new()).unwrap_err();
        assert!(matches!(err, SettingsError::Missing { key } if key == keys::NOZZLE_COUNT));
    }

    #[test]
    fn mnemonics_are_case_normalized() {
        let result = parse_str(Dialect::Common, &settings(1), "g1 x10 y5").unwrap();
        assert_eq!(result.commands[0].mnemonic, "G1");
        assert_eq!(result.commands[0].number('X'), Some(10.0));
    }
}
