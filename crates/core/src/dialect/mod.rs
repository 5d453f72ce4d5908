//! Dialect identities and static per-dialect configuration.
//!
//! A [`DialectDescriptor`] captures everything about a machine-control text
//! convention that both the parser and the writer consume: comment
//! delimiters, the supported axis-letter set, numeric precision, the family
//! tag used for grouped formatting decisions, and the header style. Adding a
//! dialect means adding a descriptor here and an override list in
//! [`overrides`] — no shared code changes.

mod overrides;

pub(crate) use overrides::overrides;

use serde::{Deserialize, Serialize};

/// A supported machine-control dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Baseline dialect with the full canonical vocabulary.
    Common,
    /// Desktop FDM firmware dialect.
    Marlin,
    /// Cincinnati big-area additive machines.
    Cincinnati,
    /// Haas mills, inch programming.
    HaasInch,
    /// MELD solid-state deposition machines.
    Meld,
    /// ORNL research deposition systems.
    Ornl,
    /// Sheet-lamination cutters.
    SheetLamination,
    /// Siemens-controlled deposition machines.
    Siemens,
    /// SkyBAAM cable-driven deposition machines.
    SkyBaam,
    /// Ingersoll masterprint gantries.
    Ingersoll,
    /// Meltio wire-laser heads.
    Meltio,
}

/// A named group of dialects sharing identical formatting behavior for
/// specific output sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectFamily {
    /// Large-format industrial deposition machines.
    LargeFormat,
    /// Everything else.
    General,
}

/// Opening-block style emitted ahead of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// Comment lines only.
    Plain,
    /// `---BEGIN HEADER` / `---END HEADER` comment markers around the block.
    Bracketed,
    /// A bare `%` line precedes any comment content.
    PercentPrefixed,
}

/// Comment delimiters for a dialect. An empty `end` means the comment runs
/// from `start` to end of line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommentStyle {
    /// Opening delimiter.
    pub start: &'static str,
    /// Closing delimiter, or `""` for to-end-of-line comments.
    pub end: &'static str,
}

/// Static configuration for one dialect, consumed by both parser and writer.
#[derive(Debug, Clone, Serialize)]
pub struct DialectDescriptor {
    /// The dialect this descriptor configures.
    pub dialect: Dialect,
    /// Syntax display name, as printed in headers.
    pub name: &'static str,
    /// Comment delimiters.
    pub comment_style: CommentStyle,
    /// Newline convention for emitted text.
    pub newline: &'static str,
    /// Parameter letters this dialect supports. Encoding a command with a
    /// letter outside this set is an error, never silently dropped data.
    pub axes: &'static [char],
    /// Decimal places for numeric parameter formatting.
    pub precision: usize,
    /// Family tag for grouped formatting decisions.
    pub family: DialectFamily,
    /// Opening-block style.
    pub header_style: HeaderStyle,
    /// Letters whose values are string literals rather than numbers.
    pub text_letters: &'static [char],
    /// Fixed comment annotations: for each `(mnemonic, suffix)` pair, the
    /// writer strips the trailing suffix from that mnemonic's comment before
    /// rendering, and the dialect's parse override re-appends it. The
    /// annotation is implied on the wire, explicit in canonical form.
    pub comment_annotations: &'static [(&'static str, &'static str)],
}

const PAREN: CommentStyle = CommentStyle { start: "(", end: ")" };
const SEMI: CommentStyle = CommentStyle { start: ";", end: "" };

const AXES_FULL: &[char] = &[
    'X', 'Y', 'Z', 'W', 'E', 'F', 'S', 'P', 'I', 'J', 'K', 'R', 'L', 'Q', 'A', 'B',
];
const AXES_DESKTOP: &[char] = &['X', 'Y', 'Z', 'E', 'F', 'S', 'P', 'I', 'J', 'R'];
const AXES_PELLET: &[char] = &[
    'X', 'Y', 'Z', 'W', 'F', 'S', 'P', 'I', 'J', 'K', 'R', 'L', 'Q', 'A', 'B',
];
const AXES_MILL: &[char] = &['X', 'Y', 'Z', 'F', 'S', 'P', 'I', 'J', 'K', 'R', 'Q'];
const AXES_MELD: &[char] = &['X', 'Y', 'Z', 'W', 'F', 'S', 'P', 'R', 'Q'];
const AXES_ORNL: &[char] = &['X', 'Y', 'Z', 'W', 'E', 'F', 'S', 'P', 'I', 'J', 'K', 'R', 'Q'];
const AXES_SHEET: &[char] = &['X', 'Y', 'Z', 'F', 'S', 'P'];
const AXES_SIEMENS: &[char] = &['X', 'Y', 'Z', 'A', 'B', 'F', 'S', 'P', 'I', 'J', 'K', 'R'];
const AXES_CABLE: &[char] = &['X', 'Y', 'Z', 'F', 'S', 'P', 'Q', 'R'];
const AXES_GANTRY: &[char] = &['X', 'Y', 'Z', 'A', 'B', 'F', 'S', 'P', 'I', 'J', 'K'];
const AXES_WIRE: &[char] = &['X', 'Y', 'Z', 'E', 'F', 'S', 'P'];

static DESCRIPTORS: &[DialectDescriptor] = &[
    DialectDescriptor {
        dialect: Dialect::Common,
        name: "Common",
        comment_style: SEMI,
        newline: "\n",
        axes: AXES_FULL,
        precision: 3,
        family: DialectFamily::General,
        header_style: HeaderStyle::Plain,
        text_letters: &[],
        comment_annotations: &[],
    },
    DialectDescriptor {
        dialect: Dialect::Marlin,
        name: "Marlin",
        comment_style: SEMI,
        newline: "\n",
        axes: AXES_DESKTOP,
        precision: 3,
        family: DialectFamily::General,
        header_style: HeaderStyle::Plain,
        text_letters: &[],
        comment_annotations: &[],
    },
    DialectDescriptor {
        dialect: Dialect::Cincinnati,
        name: "Cincinnati",
        comment_style: PAREN,
        newline: "\n",
        axes: AXES_PELLET,
        precision: 4,
        family: DialectFamily::LargeFormat,
        header_style: HeaderStyle::Plain,
        text_letters: &[],
        comment_annotations: &[],
    },
    DialectDescriptor {
        dialect: Dialect::HaasInch,
        name: "HaasInch",
        comment_style: PAREN,
        newline: "\n",
        axes: AXES_MILL,
        precision: 4,
        family: DialectFamily::LargeFormat,
        header_style: HeaderStyle::Plain,
        text_letters: &[],
        comment_annotations: &[],
    },
    DialectDescriptor {
        dialect: Dialect::Meld,
        name: "Meld",
        comment_style: PAREN,
        newline: "\n",
        axes: AXES_MELD,
        precision: 3,
        family: DialectFamily::LargeFormat,
        header_style: HeaderStyle::Plain,
        text_letters: &[],
        comment_annotations: &[],
    },
    DialectDescriptor {
        dialect: Dialect::Ornl,
        name: "ORNL",
        comment_style: PAREN,
        newline: "\n",
        axes: AXES_ORNL,
        precision: 4,
        family: DialectFamily::LargeFormat,
        header_style: HeaderStyle::Plain,
        text_letters: &[],
        comment_annotations: &[],
    },
    DialectDescriptor {
        dialect: Dialect::SheetLamination,
        name: "SheetLamination",
        comment_style: PAREN,
        newline: "\n",
        axes: AXES_SHEET,
        precision: 3,
        family: DialectFamily::LargeFormat,
        header_style: HeaderStyle::Plain,
        text_letters: &['P'],
        comment_annotations: &[],
    },
    DialectDescriptor {
        dialect: Dialect::Siemens,
        name: "Siemens",
        comment_style: SEMI,
        newline: "\n",
        axes: AXES_SIEMENS,
        precision: 3,
        family: DialectFamily::LargeFormat,
        header_style: HeaderStyle::Plain,
        text_letters: &[],
        comment_annotations: &[("G1", "EM=1")],
    },
    DialectDescriptor {
        dialect: Dialect::SkyBaam,
        name: "SkyBaam",
        comment_style: PAREN,
        newline: "\n",
        axes: AXES_CABLE,
        precision: 3,
        family: DialectFamily::LargeFormat,
        header_style: HeaderStyle::Plain,
        text_letters: &[],
        comment_annotations: &[],
    },
    DialectDescriptor {
        dialect: Dialect::Ingersoll,
        name: "Ingersoll",
        comment_style: PAREN,
        newline: "\n",
        axes: AXES_GANTRY,
        precision: 3,
        family: DialectFamily::General,
        header_style: HeaderStyle::Bracketed,
        text_letters: &[],
        comment_annotations: &[],
    },
    DialectDescriptor {
        dialect: Dialect::Meltio,
        name: "Meltio",
        comment_style: SEMI,
        newline: "\n",
        axes: AXES_WIRE,
        precision: 3,
        family: DialectFamily::General,
        header_style: HeaderStyle::PercentPrefixed,
        text_letters: &[],
        comment_annotations: &[],
    },
];

impl Dialect {
    /// Every supported dialect, in a stable listing order.
    pub const ALL: &'static [Dialect] = &[
        Dialect::Common,
        Dialect::Marlin,
        Dialect::Cincinnati,
        Dialect::HaasInch,
        Dialect::Meld,
        Dialect::Ornl,
        Dialect::SheetLamination,
        Dialect::Siemens,
        Dialect::SkyBaam,
        Dialect::Ingersoll,
        Dialect::Meltio,
    ];
}

/// The static descriptor for a dialect.
pub fn descriptor(dialect: Dialect) -> &'static DialectDescriptor {
    DESCRIPTORS
        .iter()
        .find(|d| d.dialect == dialect)
        .expect("every Dialect variant has a descriptor entry")
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(descriptor(*self).name)
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    /// Case-insensitive lookup by syntax name (`"Siemens"`, `"haasinch"`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DESCRIPTORS
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(s))
            .map(|d| d.dialect)
            .ok_or_else(|| format!("unknown dialect `{s}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dialect_has_a_descriptor() {
        for &d in Dialect::ALL {
            let desc = descriptor(d);
            assert_eq!(desc.dialect, d);
            assert!(!desc.axes.is_empty());
        }
    }

    #[test]
    fn large_format_family_membership() {
        let large: Vec<Dialect> = Dialect::ALL
            .iter()
            .copied()
            .filter(|&d| descriptor(d).family == DialectFamily::LargeFormat)
            .collect();
        assert_eq!(
            large,
            vec![
                Dialect::Cincinnati,
                Dialect::HaasInch,
                Dialect::Meld,
                Dialect::Ornl,
                Dialect::SheetLamination,
                Dialect::Siemens,
                Dialect::SkyBaam,
            ]
        );
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("siemens".parse::<Dialect>().unwrap(), Dialect::Siemens);
        assert_eq!("ORNL".parse::<Dialect>().unwrap(), Dialect::Ornl);
        assert!("klingon".parse::<Dialect>().is_err());
    }

    #[test]
    fn text_letters_are_within_the_axis_set() {
        for &d in Dialect::ALL {
            let desc = descriptor(d);
            for letter in desc.text_letters {
                assert!(
                    desc.axes.contains(letter),
                    "{d}: text letter {letter} missing from axis set"
                );
            }
        }
    }
}
