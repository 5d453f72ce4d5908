//! Per-dialect command registry override lists.
//!
//! Each entry either introduces a vendor mnemonic or replaces a canonical
//! handler. Aliases delegate to the handler bound to another mnemonic;
//! composed overrides run the base handler to completion and then apply a
//! named transform to what it emitted.

use super::Dialect;
use crate::registry::{Handler, Transform};

/// Siemens deposition heads use their own vocabulary for extrusion control:
/// `BEAD_AREA` starts the bead (canonical `M3`), and a synchronized-action
/// expression ends it (canonical `M5`). Linear moves additionally carry the
/// `EM=1` extrusion-mode annotation in their comment.
static SIEMENS: &[(&str, Handler)] = &[
    ("BEAD_AREA", Handler::Alias("M3")),
    ("WHEN TRUE DO EXTR_END=2.0", Handler::Alias("M5")),
    (
        "G1",
        Handler::Composed {
            base_of: "G1",
            transform: Transform::AppendComment("EM=1"),
        },
    ),
];

/// Legacy RepRap extruder codes still accepted by Marlin-family firmware.
static MARLIN: &[(&str, Handler)] = &[
    ("M101", Handler::Alias("M3")),
    ("M103", Handler::Alias("M5")),
];

/// The registry override list for a dialect. Dialects without vendor
/// vocabulary use the base registry unchanged.
pub(crate) fn overrides(dialect: Dialect) -> &'static [(&'static str, Handler)] {
    match dialect {
        Dialect::Siemens => SIEMENS,
        Dialect::Marlin => MARLIN,
        _ => &[],
    }
}
