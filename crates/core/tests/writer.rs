//! Tests for the dialect writer: comment wrapping, header conventions,
//! the settings summary and footer, per-command encoding, and pass-fatal
//! error reporting.

mod common;

use chrono::Datelike;
use common::{find_line, parse_snapshot, snapshot};
use gcode_toolchain_core::command::Command;
use gcode_toolchain_core::dialect::Dialect;
use gcode_toolchain_core::write::{EMPTY_STEP_COMMENT, PRODUCT_LINE, WriteError, Writer};
use gcode_toolchain_profile::{SettingValue, SettingsError, keys};

// ─── Comment primitives ─────────────────────────────────────────────────

#[test]
fn comment_wrapping_per_dialect() {
    let s = snapshot();
    let paren = Writer::new(Dialect::Cincinnati, &s).unwrap();
    assert_eq!(paren.comment("hello"), "(hello)");
    assert_eq!(paren.comment_line("hello"), "(hello)\n");
    assert_eq!(paren.comment_space_line("hello"), " (hello)\n");

    let semi = Writer::new(Dialect::Marlin, &s).unwrap();
    assert_eq!(semi.comment("hello"), ";hello");
    assert_eq!(semi.comment_line("hello"), ";hello\n");
}

#[test]
fn write_comment_line_prepends_blank_line() {
    let s = snapshot();
    let writer = Writer::new(Dialect::Ornl, &s).unwrap();
    assert_eq!(writer.write_comment_line("note"), "\n(note)\n");
}

// ─── Program header ─────────────────────────────────────────────────────

#[test]
fn plain_header_order() {
    let s = snapshot();
    let writer = Writer::new(Dialect::Cincinnati, &s).unwrap();
    let year = chrono::Utc::now().year();
    let expected = format!(
        "({PRODUCT_LINE})\n(Copyright {year})\n(G-Code Syntax: Cincinnati)\n\n"
    );
    assert_eq!(writer.slicer_header(), expected);
}

#[test]
fn bracketed_header_has_begin_marker() {
    let s = snapshot();
    let writer = Writer::new(Dialect::Ingersoll, &s).unwrap();
    let header = writer.slicer_header();
    assert!(header.starts_with("(---BEGIN HEADER)\n"));
    assert!(header.contains(PRODUCT_LINE));
}

#[test]
fn percent_prefixed_header_starts_with_bare_percent() {
    let s = snapshot();
    let writer = Writer::new(Dialect::Meltio, &s).unwrap();
    let header = writer.slicer_header();
    // The very first output character is a bare % on its own line.
    assert!(header.starts_with("%\n"));
    assert!(header.contains(";Anvil shaping technology\n"));
}

// ─── Settings header ────────────────────────────────────────────────────

#[test]
fn settings_header_default_path() {
    let s = snapshot();
    let writer = Writer::new(Dialect::Cincinnati, &s).unwrap();
    let header = writer.settings_header().unwrap();
    let expected = "(Slicing Parameters)\n\
                    (Nozzle Diameter: 0.4mm)\n\
                    (Printer Base Offset: 1.5mm)\n\
                    (Layer Height: 0.2mm)\n\
                    (Default Extrusion Width: 0.5mm)\n\
                    (Perimeter Count: 2)\n\
                    (Upskin Count: 3)\n\
                    (Downskin Count: 2)\n\
                    (Skin Pattern: Lines)\n\
                    (Infill Percentage: 35%)\n\
                    (Infill Pattern: Honeycomb)\n\n";
    assert_eq!(header, expected);
}

#[test]
fn settings_header_filament_machines_list_filament_diameter() {
    let s = snapshot()
        .set(keys::MACHINE_TYPE, SettingValue::Int(1))
        .set(keys::FILAMENT_DIAMETER, SettingValue::Distance(1.75));
    let writer = Writer::new(Dialect::Marlin, &s).unwrap();
    let header = writer.settings_header().unwrap();
    assert_eq!(
        find_line(&header, "Filament Diameter"),
        ";Filament Diameter: 1.75mm"
    );
}

#[test]
fn settings_header_w_table_line() {
    let s = snapshot()
        .set(keys::ENABLE_W, SettingValue::Bool(true))
        .set(keys::MINIMUM_W, SettingValue::Distance(-300.0));
    let writer = Writer::new(Dialect::Cincinnati, &s).unwrap();
    let header = writer.settings_header().unwrap();
    assert_eq!(
        find_line(&header, "Minimum Table Value"),
        "(Minimum Table Value: -300mm)"
    );
}

#[test]
fn spiralize_short_circuits_region_detail() {
    let s = snapshot()
        .set(keys::SPIRALIZE, SettingValue::Bool(true))
        .set(keys::SMOOTHING, SettingValue::Bool(true));
    let writer = Writer::new(Dialect::Cincinnati, &s).unwrap();
    let header = writer.settings_header().unwrap();
    assert!(header.contains("(Spiralize is turned ON)\n"));
    assert!(header.contains("(Smoothing is turned ON)\n"));
    assert!(!header.contains("Perimeter Count"));
    assert!(!header.contains("Infill"));
    assert!(header.ends_with("\n\n"));
}

#[test]
fn manual_infill_spacing_computes_percentage() {
    // bead 0.5mm at 2mm spacing = 25%
    let s = snapshot()
        .set(keys::INFILL_MANUAL_SPACING, SettingValue::Bool(true))
        .set(keys::INFILL_LINE_SPACING, SettingValue::Distance(2.0));
    let writer = Writer::new(Dialect::Cincinnati, &s).unwrap();
    let header = writer.settings_header().unwrap();
    assert_eq!(
        find_line(&header, "Infill Percentage"),
        "(Infill Percentage: 25%)"
    );
}

#[test]
fn forced_layer_time_bounds() {
    let s = snapshot()
        .set(keys::FORCE_LAYER_TIME, SettingValue::Bool(true))
        .set(keys::MIN_LAYER_TIME, SettingValue::Seconds(12.0))
        .set(keys::MAX_LAYER_TIME, SettingValue::Seconds(90.0));
    let writer = Writer::new(Dialect::Cincinnati, &s).unwrap();
    let header = writer.settings_header().unwrap();
    assert_eq!(
        find_line(&header, "Forced Minimum"),
        "(Forced Minimum / Maximum Layer Time: 12 90 seconds)"
    );
}

#[test]
fn angled_slicing_warning() {
    let s = snapshot().set(keys::SLICING_PITCH, SettingValue::Angle(45.0));
    let writer = Writer::new(Dialect::Cincinnati, &s).unwrap();
    let header = writer.settings_header().unwrap();
    assert!(header.contains("(ANGLED SLICING ENABLED)\n"));
}

#[test]
fn bracketed_dialect_closes_settings_header() {
    let s = snapshot();
    let writer = Writer::new(Dialect::Ingersoll, &s).unwrap();
    let header = writer.settings_header().unwrap();
    assert!(header.ends_with("(---END HEADER)\n\n"));
}

// ─── Scenario: family grouping ──────────────────────────────────────────

#[test]
fn family_grouping_emits_identical_geometry_lines() {
    // Cincinnati is in the large-format family, Ingersoll is not; both use
    // parenthesized comments, so the shared lines must be byte-identical.
    let s = snapshot();
    let large = Writer::new(Dialect::Cincinnati, &s)
        .unwrap()
        .settings_header()
        .unwrap();
    let general = Writer::new(Dialect::Ingersoll, &s)
        .unwrap()
        .settings_header()
        .unwrap();

    assert_eq!(
        find_line(&large, "Nozzle Diameter"),
        find_line(&general, "Nozzle Diameter")
    );
    assert_eq!(
        find_line(&large, "Printer Base Offset"),
        find_line(&general, "Printer Base Offset")
    );
}

// ─── Scenario: missing key is pass-fatal ────────────────────────────────

#[test]
fn missing_key_fails_naming_the_key() {
    let s = snapshot().set(keys::INFILL_MANUAL_SPACING, SettingValue::Bool(true));
    // infill_line_spacing is now required but absent.
    let writer = Writer::new(Dialect::Cincinnati, &s).unwrap();
    let err = writer.settings_header().unwrap_err();
    match err {
        WriteError::MissingSetting(SettingsError::Missing { ref key }) => {
            assert_eq!(key, keys::INFILL_LINE_SPACING);
        }
        other => panic!("expected MissingSetting, got {other:?}"),
    }
}

#[test]
fn missing_nozzle_count_fails_at_construction() {
    let s = gcode_toolchain_profile::SettingsSnapshot::new();
    let err = Writer::new(Dialect::Common, &s).unwrap_err();
    assert!(matches!(err, SettingsError::Missing { key } if key == keys::NOZZLE_COUNT));
}

// ─── Layer change / empty step / footer ─────────────────────────────────

#[test]
fn layer_change_is_one_based() {
    let s = snapshot();
    let writer = Writer::new(Dialect::Cincinnati, &s).unwrap();
    assert_eq!(writer.write_layer_change(0), "(BEGINNING LAYER: 1)\n");
    assert_eq!(writer.write_layer_change(41), "(BEGINNING LAYER: 42)\n");
}

#[test]
fn empty_step_marker() {
    let s = snapshot();
    let writer = Writer::new(Dialect::SkyBaam, &s).unwrap();
    assert_eq!(
        writer.write_empty_step(),
        format!("({EMPTY_STEP_COMMENT})\n")
    );
}

#[test]
fn settings_footer_lists_every_key_in_order() {
    let s = parse_snapshot(1).set("layer_height", SettingValue::Distance(0.2));
    let writer = Writer::new(Dialect::Cincinnati, &s).unwrap();
    let footer = writer.settings_footer();
    assert_eq!(
        footer,
        "\n(Settings Footer)\n(nozzle_count 1)\n(layer_height 0.2)"
    );
}

#[test]
fn settings_footer_trims_trailing_newline() {
    let s = parse_snapshot(1);
    let writer = Writer::new(Dialect::Marlin, &s).unwrap();
    let footer = writer.settings_footer();
    assert!(!footer.ends_with('\n'));
    assert!(footer.ends_with(";nozzle_count 1"));
}

// ─── Command encoding ───────────────────────────────────────────────────

#[test]
fn encoding_formats_at_dialect_precision() {
    let s = snapshot();
    let mut writer = Writer::new(Dialect::Cincinnati, &s).unwrap();
    let line = writer
        .encode_command(
            &Command::new("G1")
                .with_number('X', 10.0)
                .with_number('Y', 2.12345),
        )
        .unwrap();
    // Precision 4, trailing zeros trimmed.
    assert_eq!(line, "G1 X10 Y2.1234\n");
}

#[test]
fn encoding_appends_dialect_comment() {
    let s = snapshot();
    let mut writer = Writer::new(Dialect::Marlin, &s).unwrap();
    let line = writer
        .encode_command(&Command::new("G1").with_number('X', 1.0).with_comment("wall"))
        .unwrap();
    assert_eq!(line, "G1 X1 ;wall\n");
}

#[test]
fn unsupported_axis_is_reported_not_dropped() {
    let s = snapshot();
    let mut writer = Writer::new(Dialect::Meltio, &s).unwrap();
    let err = writer
        .encode_command(&Command::new("G1").with_number('W', 5.0))
        .unwrap_err();
    match err {
        WriteError::UnsupportedAxis {
            dialect,
            mnemonic,
            letter,
        } => {
            assert_eq!(dialect, Dialect::Meltio);
            assert_eq!(mnemonic, "G1");
            assert_eq!(letter, 'W');
        }
        other => panic!("expected UnsupportedAxis, got {other:?}"),
    }
}

#[test]
fn encoding_tracks_writer_state() {
    let s = snapshot();
    let mut writer = Writer::new(Dialect::Common, &s).unwrap();
    writer
        .encode_command(
            &Command::new("G1")
                .with_number('X', 7.0)
                .with_number('F', 1800.0),
        )
        .unwrap();
    writer.encode_command(&Command::new("M3")).unwrap();
    assert_eq!(writer.feedrate(), Some(1800.0));
    assert_eq!(writer.state().last_position.unwrap().x, 7.0);
    assert_eq!(writer.state().extruders_on, vec![true]);
}

#[test]
fn vendor_mnemonics_track_canonical_state() {
    let s = snapshot();
    let mut writer = Writer::new(Dialect::Siemens, &s).unwrap();
    writer.encode_command(&Command::new("BEAD_AREA")).unwrap();
    assert_eq!(writer.state().extruders_on, vec![true]);
    writer
        .encode_command(&Command::new("WHEN TRUE DO EXTR_END=2.0"))
        .unwrap();
    assert_eq!(writer.state().extruders_on, vec![false]);
}

#[test]
fn siemens_writer_strips_implied_annotation() {
    let s = snapshot();
    let mut writer = Writer::new(Dialect::Siemens, &s).unwrap();
    let line = writer
        .encode_command(
            &Command::new("G1")
                .with_number('X', 5.0)
                .with_comment("outer wall EM=1"),
        )
        .unwrap();
    assert_eq!(line, "G1 X5 ;outer wall\n");

    let bare = writer
        .encode_command(&Command::new("G1").with_number('X', 6.0).with_comment("EM=1"))
        .unwrap();
    assert_eq!(bare, "G1 X6\n");
}

#[test]
fn write_all_assembles_buffer_and_stops_on_error() {
    let s = snapshot();
    let mut writer = Writer::new(Dialect::Meltio, &s).unwrap();
    let commands = vec![
        Command::new("G1").with_number('X', 1.0),
        Command::new("G1").with_number('W', 2.0), // unsupported axis
        Command::new("G1").with_number('X', 3.0),
    ];
    assert!(writer.write_all(&commands).is_err());
    // Only the line before the failure made it into the buffer.
    assert_eq!(writer.state().buffer, "G1 X1\n");
}

#[test]
fn feedrate_accessor_roundtrip() {
    let s = snapshot();
    let mut writer = Writer::new(Dialect::Common, &s).unwrap();
    assert_eq!(writer.feedrate(), None);
    writer.set_feedrate(2400.0);
    assert_eq!(writer.feedrate(), Some(2400.0));
}
