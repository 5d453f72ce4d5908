//! Per-instance parser and writer state.
//!
//! One `ParserState`/`WriterState` exists per job/file instance and holds no
//! state beyond that scope. The extruder-on vector is sized from the settings
//! snapshot's nozzle count at construction; index `i` refers to the same
//! physical nozzle for the instance's lifetime.

use serde::Serialize;

/// A machine position in the slicing frame (millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

/// Mutable state threaded through parser command handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ParserState {
    /// Per-nozzle extruder-on flags. Length is the configured nozzle count.
    pub extruders_on: Vec<bool>,
    /// Last feedrate seen (`F` parameter), in the dialect's native feed unit.
    pub feedrate: Option<f64>,
    /// Position after the most recent motion command.
    pub position: Position,
    /// Comment text accumulated from comment-only lines, awaiting the next
    /// emitted command.
    pending_comment: String,
}

impl ParserState {
    /// Create a parser state for a machine with `nozzle_count` nozzles.
    pub fn new(nozzle_count: usize) -> Self {
        Self {
            extruders_on: vec![false; nozzle_count],
            feedrate: None,
            position: Position::default(),
            pending_comment: String::new(),
        }
    }

    /// Accumulate comment text from a comment-only line.
    pub fn push_comment(&mut self, text: &str) {
        if !self.pending_comment.is_empty() {
            self.pending_comment.push(' ');
        }
        self.pending_comment.push_str(text);
    }

    /// Merge accumulated comment text with a line's own comment and clear
    /// the accumulator. `None` when there is no comment text at all.
    pub fn take_comment(&mut self, line_comment: Option<&str>) -> Option<String> {
        let mut merged = std::mem::take(&mut self.pending_comment);
        if let Some(c) = line_comment {
            if !merged.is_empty() {
                merged.push(' ');
            }
            merged.push_str(c);
        }
        if merged.is_empty() { None } else { Some(merged) }
    }

    /// Set the extruder-on flag for one nozzle. Out-of-range indices are
    /// ignored so a bad `P` parameter can never resize or corrupt the vector.
    pub fn set_extruder(&mut self, nozzle: usize, on: bool) {
        if let Some(slot) = self.extruders_on.get_mut(nozzle) {
            *slot = on;
        }
    }
}

/// Mutable state owned by a dialect writer for one generation pass.
#[derive(Debug, Clone, Serialize)]
pub struct WriterState {
    /// Current feedrate, if one has been emitted.
    pub feedrate: Option<f64>,
    /// Position of the last emitted motion command.
    pub last_position: Option<Position>,
    /// Per-nozzle extruder-on flags. Length is the configured nozzle count.
    pub extruders_on: Vec<bool>,
    /// Running output buffer assembled by `write_all`.
    pub buffer: String,
}

impl WriterState {
    /// Create a writer state for a machine with `nozzle_count` nozzles.
    pub fn new(nozzle_count: usize) -> Self {
        Self {
            feedrate: None,
            last_position: None,
            extruders_on: vec![false; nozzle_count],
            buffer: String::new(),
        }
    }
}
