//! Dialect writer: canonical commands + settings snapshot → dialect text.
//!
//! A [`Writer`] is created per generation pass from a dialect and a borrowed
//! read-only [`SettingsSnapshot`]. Per-line rendering, the opening header
//! block, the human-readable parameter summary, and the settings footer all
//! live here. Side effects are confined to the writer's own [`WriterState`];
//! the snapshot is never mutated.
//!
//! Failures at this level are pass-fatal, unlike the parser's per-line
//! diagnostics: a missing settings key ([`SettingsError::Missing`]) or a
//! parameter letter outside the dialect's axis set
//! ([`WriteError::UnsupportedAxis`]) halts the pass with enough context to
//! diagnose.

use chrono::Datelike;
use thiserror::Error;

use gcode_toolchain_diagnostics::codes;
use gcode_toolchain_profile::{SettingsError, SettingsSnapshot, keys, trim_f64};

use crate::command::{Command, ParamValue};
use crate::dialect::{Dialect, DialectDescriptor, DialectFamily, HeaderStyle, descriptor};
use crate::registry::CommandRegistry;
use crate::state::WriterState;

/// Product line printed in every program header.
pub const PRODUCT_LINE: &str = "Anvil shaping technology";

/// Comment emitted when a processing step intentionally produced no motion.
pub const EMPTY_STEP_COMMENT: &str =
    "INTENTIONALLY BLANK - NO PATHING PRODUCED USING CURRENT SETTINGS";

/// Infill pattern names by pattern index. Out-of-range indices fall back to
/// the first entry.
const INFILL_PATTERN_NAMES: [&str; 8] = [
    "Lines",
    "Grid",
    "Concentric",
    "Inside Out Concentric",
    "Triangles",
    "Hexagons and Triangles",
    "Honeycomb",
    "Radial Hatch",
];

/// Errors that abort a generation pass.
#[derive(Debug, Error)]
pub enum WriteError {
    /// A required settings key is absent or mistyped. Fatal for the pass.
    #[error(transparent)]
    MissingSetting(#[from] SettingsError),

    /// A command uses a parameter letter outside the target dialect's
    /// supported axis set. Fatal for encoding that command; the caller
    /// decides whether to abort the pass or skip the command.
    #[error("{dialect} does not support parameter letter `{letter}` in {mnemonic}")]
    UnsupportedAxis {
        /// The target dialect.
        dialect: Dialect,
        /// Mnemonic of the offending command.
        mnemonic: String,
        /// The unsupported parameter letter.
        letter: char,
    },
}

impl WriteError {
    /// Stable diagnostic code for this error, for CLI rendering.
    pub fn code(&self) -> &'static str {
        match self {
            WriteError::MissingSetting(_) => codes::WRITER_MISSING_SETTING,
            WriteError::UnsupportedAxis { .. } => codes::WRITER_UNSUPPORTED_AXIS,
        }
    }
}

// ── Family-grouped summary labels ───────────────────────────────────────

/// Label set for the parameter summary block, keyed by dialect family.
struct SummaryLabels {
    nozzle_diameter: &'static str,
    base_offset: &'static str,
    layer_height: &'static str,
    bead_width: &'static str,
}

// The two families currently render these lines identically; the split is
// kept as data so a family can diverge without touching the writer body.
static LARGE_FORMAT_LABELS: SummaryLabels = SummaryLabels {
    nozzle_diameter: "Nozzle Diameter",
    base_offset: "Printer Base Offset",
    layer_height: "Layer Height",
    bead_width: "Default Extrusion Width",
};
static GENERAL_LABELS: SummaryLabels = SummaryLabels {
    nozzle_diameter: "Nozzle Diameter",
    base_offset: "Printer Base Offset",
    layer_height: "Layer Height",
    bead_width: "Default Extrusion Width",
};

fn summary_labels(family: DialectFamily) -> &'static SummaryLabels {
    match family {
        DialectFamily::LargeFormat => &LARGE_FORMAT_LABELS,
        DialectFamily::General => &GENERAL_LABELS,
    }
}

// ── Writer ──────────────────────────────────────────────────────────────

/// A per-pass dialect writer.
#[derive(Debug)]
pub struct Writer<'a> {
    descriptor: &'static DialectDescriptor,
    registry: CommandRegistry,
    settings: &'a SettingsSnapshot,
    state: WriterState,
}

impl<'a> Writer<'a> {
    /// Create a writer for `dialect`, sizing per-nozzle state from the
    /// snapshot's nozzle count. A missing `nozzle_count` fails here, before
    /// any output exists.
    pub fn new(dialect: Dialect, settings: &'a SettingsSnapshot) -> Result<Self, SettingsError> {
        let nozzle_count = settings.get_int(keys::NOZZLE_COUNT)?.max(0) as usize;
        Ok(Self {
            descriptor: descriptor(dialect),
            registry: CommandRegistry::for_dialect(dialect),
            settings,
            state: WriterState::new(nozzle_count),
        })
    }

    /// The writer state (feedrate, last position, extruder flags, buffer).
    pub fn state(&self) -> &WriterState {
        &self.state
    }

    /// Current feedrate, if one has been emitted.
    pub fn feedrate(&self) -> Option<f64> {
        self.state.feedrate
    }

    /// Explicitly set the current feedrate.
    pub fn set_feedrate(&mut self, feedrate: f64) {
        self.state.feedrate = Some(feedrate);
    }

    // ── Comment primitives ──────────────────────────────────────────────

    /// Wrap text in the dialect's comment delimiters.
    pub fn comment(&self, text: &str) -> String {
        let style = &self.descriptor.comment_style;
        format!("{}{}{}", style.start, text, style.end)
    }

    /// A comment, newline-terminated.
    pub fn comment_line(&self, text: &str) -> String {
        format!("{}{}", self.comment(text), self.descriptor.newline)
    }

    /// A comment line prefixed with a single space.
    pub fn comment_space_line(&self, text: &str) -> String {
        format!(" {}", self.comment_line(text))
    }

    /// A comment line preceded by a blank line.
    pub fn write_comment_line(&self, text: &str) -> String {
        format!("{}{}", self.descriptor.newline, self.comment_line(text))
    }

    // ── Header / footer blocks ──────────────────────────────────────────

    /// The dialect-styled opening block: optional leading marker, product
    /// line, copyright with the current year, syntax name, blank separator.
    pub fn slicer_header(&self) -> String {
        let mut rv = String::new();
        match self.descriptor.header_style {
            HeaderStyle::Bracketed => rv.push_str(&self.comment_line("---BEGIN HEADER")),
            HeaderStyle::PercentPrefixed => {
                rv.push('%');
                rv.push_str(self.descriptor.newline);
            }
            HeaderStyle::Plain => {}
        }
        rv.push_str(&self.comment_line(PRODUCT_LINE));
        rv.push_str(&self.comment_line(&format!("Copyright {}", chrono::Utc::now().year())));
        rv.push_str(&self.comment_line(&format!("G-Code Syntax: {}", self.descriptor.name)));
        rv.push_str(self.descriptor.newline);
        rv
    }

    /// Human-readable summary of the active profile parameters, as comment
    /// lines. Spiralize mode short-circuits the per-region detail.
    pub fn settings_header(&self) -> Result<String, WriteError> {
        let sb = self.settings;
        let labels = summary_labels(self.descriptor.family);
        let mut text = String::new();

        text.push_str(&self.comment_line("Slicing Parameters"));

        text.push_str(&self.comment_line(&format!(
            "{}: {}mm",
            labels.nozzle_diameter,
            trim_f64(sb.get_distance(keys::NOZZLE_DIAMETER)?)
        )));
        // Filament machine type only; pellet feeds have no filament diameter.
        if sb.get_int(keys::MACHINE_TYPE)? == 1 {
            text.push_str(&self.comment_line(&format!(
                "Filament Diameter: {}mm",
                trim_f64(sb.get_distance(keys::FILAMENT_DIAMETER)?)
            )));
        }
        text.push_str(&self.comment_line(&format!(
            "{}: {}mm",
            labels.base_offset,
            trim_f64(sb.get_distance(keys::PRINTER_BASE_OFFSET)?)
        )));
        if sb.get_bool(keys::ENABLE_W)? {
            text.push_str(&self.comment_line(&format!(
                "Minimum Table Value: {}mm",
                trim_f64(sb.get_distance(keys::MINIMUM_W)?)
            )));
        }
        text.push_str(&self.comment_line(&format!(
            "{}: {}mm",
            labels.layer_height,
            trim_f64(sb.get_distance(keys::LAYER_HEIGHT)?)
        )));
        text.push_str(&self.comment_line(&format!(
            "{}: {}mm",
            labels.bead_width,
            trim_f64(sb.get_distance(keys::BEAD_WIDTH)?)
        )));

        if sb.get_bool(keys::SPIRALIZE)? {
            text.push_str(&self.comment_line("Spiralize is turned ON"));
            if sb.get_bool(keys::SMOOTHING)? {
                text.push_str(&self.comment_line("Smoothing is turned ON"));
            }
            if sb.get_bool(keys::OVERSIZE_ENABLE)? {
                text.push_str(&self.comment_line(&format!(
                    "Oversize part by: {}mm",
                    trim_f64(sb.get_distance(keys::OVERSIZE_DISTANCE)?)
                )));
            }
            text.push_str(self.descriptor.newline);
            return Ok(text);
        }

        if sb.get_bool(keys::PERIMETER_ENABLE)? {
            text.push_str(&self.comment_line(&format!(
                "Perimeter Count: {}",
                sb.get_int(keys::PERIMETER_COUNT)?
            )));
        }
        if sb.get_bool(keys::INSET_ENABLE)? {
            text.push_str(&self.comment_line(&format!(
                "Inset Count: {}",
                sb.get_int(keys::INSET_COUNT)?
            )));
        }
        if sb.get_bool(keys::SKIN_ENABLE)? {
            text.push_str(&self.comment_line(&format!(
                "Upskin Count: {}",
                sb.get_int(keys::SKIN_TOP_COUNT)?
            )));
        }
        if sb.get_bool(keys::SKIN_ENABLE)? {
            text.push_str(&self.comment_line(&format!(
                "Downskin Count: {}",
                sb.get_int(keys::SKIN_BOTTOM_COUNT)?
            )));
        }
        if sb.get_bool(keys::SKIN_ENABLE)?
            && (sb.get_int(keys::SKIN_TOP_COUNT)? > 0 || sb.get_int(keys::SKIN_BOTTOM_COUNT)? > 0)
        {
            if sb.get_int(keys::SKIN_PATTERN)? != 0 {
                text.push_str(&self.comment_line("Skin Pattern: Lines"));
            } else {
                text.push_str(&self.comment_line("Skin Patern: Concentric"));
            }
        }
        if sb.get_bool(keys::INFILL_ENABLE)? {
            if sb.get_bool(keys::INFILL_MANUAL_SPACING)? {
                let percentage = sb.get_distance(keys::BEAD_WIDTH)?
                    / sb.get_distance(keys::INFILL_LINE_SPACING)?
                    * 100.0;
                text.push_str(
                    &self.comment_line(&format!("Infill Percentage: {}%", trim_f64(percentage))),
                );
            } else {
                text.push_str(&self.comment_line(&format!(
                    "Infill Percentage: {}%",
                    trim_f64(sb.get_float(keys::INFILL_DENSITY)?)
                )));
            }
            let pattern = sb.get_int(keys::INFILL_PATTERN)?;
            let name = usize::try_from(pattern)
                .ok()
                .and_then(|idx| INFILL_PATTERN_NAMES.get(idx).copied())
                .unwrap_or(INFILL_PATTERN_NAMES[0]);
            text.push_str(&self.comment_line(&format!("Infill Pattern: {name}")));
        }
        if sb.get_bool(keys::FORCE_LAYER_TIME)? {
            text.push_str(&self.comment_line(&format!(
                "Forced Minimum / Maximum Layer Time: {} {} seconds",
                trim_f64(sb.get_seconds(keys::MIN_LAYER_TIME)?),
                trim_f64(sb.get_seconds(keys::MAX_LAYER_TIME)?)
            )));
        }
        if sb.get_bool(keys::SMOOTHING)? {
            text.push_str(&self.comment_line("Smoothing is turned ON"));
        }
        if sb.get_angle(keys::SLICING_YAW)? != 0.0
            || sb.get_angle(keys::SLICING_PITCH)? != 0.0
            || sb.get_angle(keys::SLICING_ROLL)? != 0.0
        {
            text.push_str(&self.comment_line("ANGLED SLICING ENABLED"));
        }
        if sb.get_bool(keys::OVERSIZE_ENABLE)? {
            text.push_str(&self.comment_line(&format!(
                "Oversize part by: {}mm",
                trim_f64(sb.get_distance(keys::OVERSIZE_DISTANCE)?)
            )));
        }

        if self.descriptor.header_style == HeaderStyle::Bracketed {
            text.push_str(&self.comment_line("---END HEADER"));
        }
        text.push_str(self.descriptor.newline);
        Ok(text)
    }

    /// One comment line announcing the upcoming layer. Layers are 0-based
    /// internally, 1-based in output.
    pub fn write_layer_change(&self, layer_index: u32) -> String {
        self.comment_line(&format!("BEGINNING LAYER: {}", layer_index + 1))
    }

    /// One comment line per snapshot key, in declared order, preceded by a
    /// blank line and a heading. The trailing newline is trimmed.
    pub fn settings_footer(&self) -> String {
        let mut rv = String::from(self.descriptor.newline);
        rv.push_str(&self.comment_line("Settings Footer"));
        for (key, value) in self.settings.iter() {
            rv.push_str(&self.comment_line(&format!("{} {}", key, value.compact())));
        }
        rv.truncate(rv.len() - self.descriptor.newline.len());
        rv
    }

    /// The fixed marker for a processing step that produced no motion.
    pub fn write_empty_step(&self) -> String {
        self.comment_line(EMPTY_STEP_COMMENT)
    }

    // ── Command encoding ────────────────────────────────────────────────

    /// Render one canonical command as a dialect line, updating writer state
    /// (feedrate, position, extruder flags).
    ///
    /// Every parameter letter must be in the dialect's supported axis set;
    /// a violation is reported, never silently dropped.
    pub fn encode_command(&mut self, cmd: &Command) -> Result<String, WriteError> {
        let mut line = String::new();
        line.push_str(&cmd.mnemonic);
        for param in &cmd.params {
            if !self.descriptor.axes.contains(&param.letter) {
                return Err(WriteError::UnsupportedAxis {
                    dialect: self.descriptor.dialect,
                    mnemonic: cmd.mnemonic.clone(),
                    letter: param.letter,
                });
            }
            line.push(' ');
            line.push(param.letter);
            match &param.value {
                ParamValue::Number(v) => {
                    line.push_str(&format_number(*v, self.descriptor.precision));
                }
                ParamValue::Text(s) => line.push_str(s),
            }
        }
        if let Some(text) = self.render_comment(cmd)
            && !text.is_empty()
        {
            line.push(' ');
            line.push_str(&self.comment(&text));
        }
        line.push_str(self.descriptor.newline);
        self.track(cmd);
        Ok(line)
    }

    /// Encode a command sequence into the state buffer. The first error
    /// aborts the pass.
    pub fn write_all(&mut self, commands: &[Command]) -> Result<(), WriteError> {
        for cmd in commands {
            let line = self.encode_command(cmd)?;
            self.state.buffer.push_str(&line);
        }
        Ok(())
    }

    /// Append pre-rendered text (headers, footers) to the state buffer.
    pub fn push(&mut self, text: &str) {
        self.state.buffer.push_str(text);
    }

    /// Consume the writer and return the assembled output buffer.
    pub fn finish(self) -> String {
        self.state.buffer
    }

    /// Comment text for a command with dialect annotations stripped: an
    /// annotation is implied on the wire and re-appended by the dialect's
    /// parse override.
    fn render_comment(&self, cmd: &Command) -> Option<String> {
        let mut text = cmd.comment.clone()?;
        for (mnemonic, suffix) in self.descriptor.comment_annotations {
            if cmd.mnemonic != *mnemonic {
                continue;
            }
            if text == *suffix {
                text.clear();
            } else {
                let keep = text
                    .strip_suffix(suffix)
                    .and_then(|rest| rest.strip_suffix(' '))
                    .map(str::len);
                if let Some(len) = keep {
                    text.truncate(len);
                }
            }
        }
        if text.is_empty() { None } else { Some(text) }
    }

    /// Track the state effects of an emitted command. Vendor mnemonics are
    /// followed to their canonical command first.
    fn track(&mut self, cmd: &Command) {
        let canonical = self
            .registry
            .canonical_mnemonic(&cmd.mnemonic)
            .unwrap_or(&cmd.mnemonic);
        match canonical {
            "G0" | "G1" | "G2" | "G3" => {
                let mut pos = self.state.last_position.unwrap_or_default();
                if let Some(x) = cmd.number('X') {
                    pos.x = x;
                }
                if let Some(y) = cmd.number('Y') {
                    pos.y = y;
                }
                if let Some(z) = cmd.number('Z') {
                    pos.z = z;
                }
                self.state.last_position = Some(pos);
                if let Some(f) = cmd.number('F') {
                    self.state.feedrate = Some(f);
                }
            }
            "M3" | "M5" => {
                let nozzle = cmd.number('P').map(|v| v as usize).unwrap_or(0);
                if let Some(slot) = self.state.extruders_on.get_mut(nozzle) {
                    *slot = canonical == "M3";
                }
            }
            _ => {}
        }
    }
}

/// Format a number at the given precision, trimming trailing zeros.
fn format_number(value: f64, precision: usize) -> String {
    let s = format!("{value:.precision$}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_trims_zeros() {
        assert_eq!(format_number(10.0, 3), "10");
        assert_eq!(format_number(10.5, 3), "10.5");
        assert_eq!(format_number(0.4567, 4), "0.4567");
        assert_eq!(format_number(-2.50, 3), "-2.5");
        assert_eq!(format_number(-0.0001, 3), "0");
    }

    #[test]
    fn write_error_codes() {
        let missing = WriteError::MissingSetting(SettingsError::Missing {
            key: "layer_height".into(),
        });
        assert_eq!(missing.code(), codes::WRITER_MISSING_SETTING);
        let axis = WriteError::UnsupportedAxis {
            dialect: Dialect::Meltio,
            mnemonic: "G1".into(),
            letter: 'W',
        };
        assert_eq!(axis.code(), codes::WRITER_UNSUPPORTED_AXIS);
        assert!(axis.to_string().contains('W'));
        assert!(axis.to_string().contains("Meltio"));
    }
}
