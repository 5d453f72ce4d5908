//! Shared test helpers for `gcode_toolchain_core` integration tests.

#![allow(unreachable_pub)]

use gcode_toolchain_core::parse::ParseResult;
use gcode_toolchain_diagnostics::Diagnostic;
use gcode_toolchain_profile::{SettingValue, SettingsSnapshot, keys};

/// A complete single-nozzle settings snapshot covering every key the writer
/// reads on its default (non-spiralize) path.
#[allow(dead_code)]
pub fn snapshot() -> SettingsSnapshot {
    SettingsSnapshot::new()
        .set(keys::NOZZLE_COUNT, SettingValue::Int(1))
        .set(keys::NOZZLE_DIAMETER, SettingValue::Distance(0.4))
        .set(keys::MACHINE_TYPE, SettingValue::Int(0))
        .set(keys::PRINTER_BASE_OFFSET, SettingValue::Distance(1.5))
        .set(keys::ENABLE_W, SettingValue::Bool(false))
        .set(keys::LAYER_HEIGHT, SettingValue::Distance(0.2))
        .set(keys::BEAD_WIDTH, SettingValue::Distance(0.5))
        .set(keys::SPIRALIZE, SettingValue::Bool(false))
        .set(keys::SMOOTHING, SettingValue::Bool(false))
        .set(keys::OVERSIZE_ENABLE, SettingValue::Bool(false))
        .set(keys::PERIMETER_ENABLE, SettingValue::Bool(true))
        .set(keys::PERIMETER_COUNT, SettingValue::Int(2))
        .set(keys::INSET_ENABLE, SettingValue::Bool(false))
        .set(keys::INSET_COUNT, SettingValue::Int(0))
        .set(keys::SKIN_ENABLE, SettingValue::Bool(true))
        .set(keys::SKIN_TOP_COUNT, SettingValue::Int(3))
        .set(keys::SKIN_BOTTOM_COUNT, SettingValue::Int(2))
        .set(keys::SKIN_PATTERN, SettingValue::Int(1))
        .set(keys::INFILL_ENABLE, SettingValue::Bool(true))
        .set(keys::INFILL_MANUAL_SPACING, SettingValue::Bool(false))
        .set(keys::INFILL_DENSITY, SettingValue::Float(35.0))
        .set(keys::INFILL_PATTERN, SettingValue::Int(6))
        .set(keys::FORCE_LAYER_TIME, SettingValue::Bool(false))
        .set(keys::SLICING_YAW, SettingValue::Angle(0.0))
        .set(keys::SLICING_PITCH, SettingValue::Angle(0.0))
        .set(keys::SLICING_ROLL, SettingValue::Angle(0.0))
}

/// A snapshot carrying only the nozzle count, for parse-only tests.
#[allow(dead_code)]
pub fn parse_snapshot(nozzles: i64) -> SettingsSnapshot {
    SettingsSnapshot::new().set(keys::NOZZLE_COUNT, SettingValue::Int(nozzles))
}

/// Collect command mnemonics, in order.
#[allow(dead_code)]
pub fn extract_mnemonics(result: &ParseResult) -> Vec<String> {
    result.commands.iter().map(|c| c.mnemonic.clone()).collect()
}

/// Collect diagnostic codes from parse diagnostics.
#[allow(dead_code)]
pub fn extract_diag_codes(result: &ParseResult) -> Vec<String> {
    result
        .diagnostics
        .iter()
        .map(|d| d.id.to_string())
        .collect()
}

/// Find the first diagnostic with the given code, panicking with context if
/// absent.
#[allow(dead_code)]
pub fn find_diag<'a>(diagnostics: &'a [Diagnostic], code: &str) -> &'a Diagnostic {
    diagnostics
        .iter()
        .find(|d| d.id == code)
        .unwrap_or_else(|| panic!("no diagnostic with code {code}: {diagnostics:?}"))
}

/// The first output line containing `needle`, panicking if absent.
#[allow(dead_code)]
pub fn find_line<'a>(text: &'a str, needle: &str) -> &'a str {
    text.lines()
        .find(|l| l.contains(needle))
        .unwrap_or_else(|| panic!("no line containing {needle:?} in:\n{text}"))
}
