//! Canonical command types.
//!
//! A [`Command`] is the machine-independent representation of one toolpath
//! instruction, used as the interchange form between dialects: parsers
//! produce them, writers consume them. Once constructed a command is treated
//! as immutable data.

use serde::{Deserialize, Serialize};

/// One machine-independent toolpath instruction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Command {
    /// Case-normalized (uppercase) command mnemonic, e.g. `"G1"`. Dialect
    /// aliases keep their own mnemonic text here.
    pub mnemonic: String,
    /// Ordered parameter list, e.g. `X10 Y5 F1200`.
    pub params: Vec<Param>,
    /// Trailing comment text, without dialect delimiters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// 1-based source line this command came from (parse direction only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// A single `letter`+`value` parameter of a command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Param {
    /// Uppercase parameter letter (`'X'`, `'F'`, ...).
    pub letter: char,
    /// The typed parameter value.
    pub value: ParamValue,
}

/// A typed parameter value. Most letters carry numbers; a dialect may
/// declare specific letters as text-valued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ParamValue {
    /// Numeric literal.
    Number(f64),
    /// String literal.
    Text(String),
}

impl Command {
    /// Create a command with no parameters, comment, or line number.
    pub fn new(mnemonic: impl Into<String>) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            params: Vec::new(),
            comment: None,
            line: None,
        }
    }

    /// Append a numeric parameter (builder pattern).
    pub fn with_number(mut self, letter: char, value: f64) -> Self {
        self.params.push(Param {
            letter,
            value: ParamValue::Number(value),
        });
        self
    }

    /// Append a text parameter (builder pattern).
    pub fn with_text(mut self, letter: char, value: impl Into<String>) -> Self {
        self.params.push(Param {
            letter,
            value: ParamValue::Text(value.into()),
        });
        self
    }

    /// Set the comment text (builder pattern).
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The value of the first parameter with the given letter, if any.
    pub fn param(&self, letter: char) -> Option<&ParamValue> {
        self.params
            .iter()
            .find_map(|p| (p.letter == letter).then_some(&p.value))
    }

    /// The numeric value of the first parameter with the given letter.
    /// `None` when absent or text-valued.
    pub fn number(&self, letter: char) -> Option<f64> {
        match self.param(letter) {
            Some(ParamValue::Number(v)) => Some(*v),
            _ => None,
        }
    }
}

/// Strip source line numbers from a command list for comparison.
///
/// Line numbers differ after re-encoding, so round-trip comparisons run on
/// the line-free form.
pub fn strip_lines(commands: &[Command]) -> Vec<Command> {
    commands
        .iter()
        .map(|c| Command {
            line: None,
            ..c.clone()
        })
        .collect()
}

/// Serialize a command list to a pretty-printed JSON string.
pub fn to_pretty_json(commands: &[Command]) -> String {
    serde_json::to_string_pretty(commands).expect("Command serialization cannot fail")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_lookup_by_letter() {
        let cmd = Command::new("G1").with_number('X', 10.0).with_number('F', 1200.0);
        assert_eq!(cmd.number('X'), Some(10.0));
        assert_eq!(cmd.number('F'), Some(1200.0));
        assert_eq!(cmd.number('Y'), None);
    }

    #[test]
    fn number_rejects_text_values() {
        let cmd = Command::new("M3").with_text('P', "CUT01");
        assert!(cmd.param('P').is_some());
        assert_eq!(cmd.number('P'), None);
    }

    #[test]
    fn strip_lines_clears_only_line() {
        let mut cmd = Command::new("G0").with_number('X', 1.0).with_comment("travel");
        cmd.line = Some(42);
        let stripped = strip_lines(&[cmd.clone()]);
        assert_eq!(stripped[0].line, None);
        assert_eq!(stripped[0].mnemonic, cmd.mnemonic);
        assert_eq!(stripped[0].comment, cmd.comment);
    }

    #[test]
    fn serde_roundtrip() {
        let cmd = Command::new("G1")
            .with_number('X', 12.5)
            .with_text('P', "ABC")
            .with_comment("infill");
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }
}
