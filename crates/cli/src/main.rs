mod render;

use std::fs;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gcode_toolchain_core::command::to_pretty_json;
use gcode_toolchain_core::dialect::{Dialect, descriptor};
use gcode_toolchain_core::parse::parse_str;
use gcode_toolchain_core::write::Writer;
use gcode_toolchain_diagnostics as diag;
use gcode_toolchain_profile::{SettingValue, SettingsSnapshot, keys, load_snapshot_from_str};

use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "gct",
    version,
    about = "gcode toolchain — parse, translate, and inspect machine-control G-code dialects"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse an instruction file into canonical commands.
    Parse {
        file: String,
        /// Dialect to parse under (see `dialects`).
        #[arg(long)]
        dialect: String,
        /// Path to a settings snapshot JSON. When omitted, a single-nozzle
        /// snapshot is assumed.
        #[arg(long)]
        settings: Option<String>,
    },

    /// Translate an instruction file from one dialect to another.
    Translate {
        file: String,
        /// Source dialect.
        #[arg(long)]
        from: String,
        /// Target dialect.
        #[arg(long)]
        to: String,
        /// Path to a settings snapshot JSON (see `parse --help`).
        #[arg(long)]
        settings: Option<String>,
        /// Prepend the program header and settings summary.
        #[arg(long)]
        header: bool,
        /// Append the settings footer.
        #[arg(long)]
        footer: bool,
    },

    /// List supported dialects and their conventions.
    Dialects,

    /// Explain a diagnostic ID (e.g. GCD1001).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Parse {
            file,
            dialect,
            settings,
        } => cmd_parse(&file, &dialect, settings.as_deref(), format)?,
        Cmd::Translate {
            file,
            from,
            to,
            settings,
            header,
            footer,
        } => cmd_translate(
            &file,
            &from,
            &to,
            settings.as_deref(),
            header,
            footer,
            format,
        )?,
        Cmd::Dialects => cmd_dialects(format),
        Cmd::Explain { id } => cmd_explain(&id, format),
    }

    Ok(())
}

// ── Shared helpers ──────────────────────────────────────────────────────

fn parse_dialect(name: &str) -> Result<Dialect> {
    name.parse::<Dialect>().map_err(anyhow::Error::msg)
}

/// Load the settings snapshot, or fall back to a minimal single-nozzle one.
fn load_settings(path: Option<&str>) -> Result<SettingsSnapshot> {
    match path {
        Some(p) => {
            let json = fs::read_to_string(p).with_context(|| format!("reading {p}"))?;
            load_snapshot_from_str(&json).with_context(|| format!("loading snapshot {p}"))
        }
        None => Ok(SettingsSnapshot::new().set(keys::NOZZLE_COUNT, SettingValue::Int(1))),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(file: &str, dialect: &str, settings_path: Option<&str>, format: Format) -> Result<()> {
    let dialect = parse_dialect(dialect)?;
    let snapshot = load_settings(settings_path)?;
    let input = fs::read_to_string(file).with_context(|| format!("reading {file}"))?;

    let result = parse_str(dialect, &snapshot, &input)?;

    match format {
        Format::Json => {
            // Single valid JSON object to stdout.
            let out = serde_json::json!({
                "commands": result.commands,
                "diagnostics": result.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            println!("{}", to_pretty_json(&result.commands));
            render_diagnostics(&input, file, &result.diagnostics, format);
            print_summary(result.commands.len(), &result.diagnostics);
        }
    }
    Ok(())
}

fn cmd_translate(
    file: &str,
    from: &str,
    to: &str,
    settings_path: Option<&str>,
    header: bool,
    footer: bool,
    format: Format,
) -> Result<()> {
    let from = parse_dialect(from)?;
    let to = parse_dialect(to)?;
    let snapshot = load_settings(settings_path)?;
    let input = fs::read_to_string(file).with_context(|| format!("reading {file}"))?;

    let result = parse_str(from, &snapshot, &input)?;
    // Per-line parse problems are reported but never stop a translation.
    // Stdout carries only the translated program, so diagnostics go to
    // stderr in both output modes.
    if !result.diagnostics.is_empty() {
        match format {
            Format::Pretty => render_diagnostics(&input, file, &result.diagnostics, format),
            Format::Json => eprintln!("{}", serde_json::to_string(&result.diagnostics)?),
        }
    }

    let mut writer = Writer::new(to, &snapshot)?;
    if header {
        let opening = writer.slicer_header();
        writer.push(&opening);
        let summary = writer.settings_header()?;
        writer.push(&summary);
    }
    if let Err(err) = writer.write_all(&result.commands) {
        // Pass-fatal: surface the code and halt with a non-zero exit.
        eprintln!("error[{}]: {}", err.code(), err);
        process::exit(1);
    }
    if footer {
        let closing = writer.settings_footer();
        writer.push(&closing);
    }

    print!("{}", writer.finish());
    Ok(())
}

fn cmd_dialects(format: Format) {
    match format {
        Format::Json => {
            let entries: Vec<_> = Dialect::ALL.iter().map(|&d| descriptor(d)).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&entries).expect("descriptor serialization")
            );
        }
        Format::Pretty => {
            for &d in Dialect::ALL {
                let desc = descriptor(d);
                let axes: String = desc.axes.iter().collect();
                println!(
                    "{:<16} family={:<12} comments={:?}..{:?} precision={} axes={}",
                    desc.name,
                    format!("{:?}", desc.family),
                    desc.comment_style.start,
                    desc.comment_style.end,
                    desc.precision,
                    axes
                );
            }
        }
    }
}

fn cmd_explain(id: &str, format: Format) {
    let explanation = diag::explain(id);
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": explanation,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("explain serialization")
            );
        }
        Format::Pretty => match explanation {
            Some(text) => println!("{id}: {text}"),
            None => println!("{id}: no explanation available"),
        },
    }
    if explanation.is_none() {
        process::exit(1);
    }
}
