//! Machine settings snapshots for the gcode-toolchain.
//!
//! A [`SettingsSnapshot`] is a read-only, insertion-ordered, typed key/value
//! view of one machine profile, captured by the caller before a generation
//! pass and borrowed by parsers and writers for the duration of that pass.
//! Writers never reach into ambient global state: every settings read goes
//! through an explicit snapshot parameter.
//!
//! Values carry a fixed canonical unit (millimeters for distances, degrees
//! for angles, seconds for times); unit conversion is the caller's concern.
//! Every key a writer reads for the active dialect must exist with the
//! correct type — absence is a fatal configuration error
//! ([`SettingsError::Missing`]), not a per-line diagnostic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known settings keys consumed by the dialect writers.
pub mod keys {
    /// Number of physical nozzles on the machine (int).
    pub const NOZZLE_COUNT: &str = "nozzle_count";
    /// Nozzle orifice diameter (distance, mm).
    pub const NOZZLE_DIAMETER: &str = "nozzle_diameter";
    /// Machine feed type: 0 = pellet, 1 = filament (int).
    pub const MACHINE_TYPE: &str = "machine_type";
    /// Filament diameter, read only for filament-type machines (distance, mm).
    pub const FILAMENT_DIAMETER: &str = "filament_diameter";
    /// Vertical offset between machine zero and the print surface (distance, mm).
    pub const PRINTER_BASE_OFFSET: &str = "printer_base_offset";
    /// Whether the machine has a movable W table (bool).
    pub const ENABLE_W: &str = "enable_w";
    /// Lowest permitted W table position (distance, mm).
    pub const MINIMUM_W: &str = "minimum_w";
    /// Height of one sliced layer (distance, mm).
    pub const LAYER_HEIGHT: &str = "layer_height";
    /// Default extrusion bead width (distance, mm).
    pub const BEAD_WIDTH: &str = "bead_width";
    /// Spiralize (continuous Z) mode (bool).
    pub const SPIRALIZE: &str = "spiralize";
    /// Path smoothing (bool).
    pub const SMOOTHING: &str = "smoothing";
    /// Oversize compensation enabled (bool).
    pub const OVERSIZE_ENABLE: &str = "oversize_enable";
    /// Oversize compensation distance (distance, mm).
    pub const OVERSIZE_DISTANCE: &str = "oversize_distance";
    /// Perimeter generation enabled (bool).
    pub const PERIMETER_ENABLE: &str = "perimeter_enable";
    /// Number of perimeters per layer (int).
    pub const PERIMETER_COUNT: &str = "perimeter_count";
    /// Inset generation enabled (bool).
    pub const INSET_ENABLE: &str = "inset_enable";
    /// Number of insets per layer (int).
    pub const INSET_COUNT: &str = "inset_count";
    /// Skin generation enabled (bool).
    pub const SKIN_ENABLE: &str = "skin_enable";
    /// Number of top skin layers (int).
    pub const SKIN_TOP_COUNT: &str = "skin_top_count";
    /// Number of bottom skin layers (int).
    pub const SKIN_BOTTOM_COUNT: &str = "skin_bottom_count";
    /// Skin fill pattern index: 0 = concentric, nonzero = lines (int).
    pub const SKIN_PATTERN: &str = "skin_pattern";
    /// Infill generation enabled (bool).
    pub const INFILL_ENABLE: &str = "infill_enable";
    /// Infill density is derived from an explicit line spacing (bool).
    pub const INFILL_MANUAL_SPACING: &str = "infill_manual_spacing";
    /// Explicit infill line spacing (distance, mm).
    pub const INFILL_LINE_SPACING: &str = "infill_line_spacing";
    /// Infill density percentage (float).
    pub const INFILL_DENSITY: &str = "infill_density";
    /// Infill pattern index, 0–7 (int).
    pub const INFILL_PATTERN: &str = "infill_pattern";
    /// Enforce minimum/maximum layer times (bool).
    pub const FORCE_LAYER_TIME: &str = "force_layer_time";
    /// Forced minimum layer time (seconds).
    pub const MIN_LAYER_TIME: &str = "min_layer_time";
    /// Forced maximum layer time (seconds).
    pub const MAX_LAYER_TIME: &str = "max_layer_time";
    /// Slicing plane yaw (angle, degrees).
    pub const SLICING_YAW: &str = "slicing_yaw";
    /// Slicing plane pitch (angle, degrees).
    pub const SLICING_PITCH: &str = "slicing_pitch";
    /// Slicing plane roll (angle, degrees).
    pub const SLICING_ROLL: &str = "slicing_roll";
}

/// Errors raised by typed snapshot access or snapshot loading.
///
/// `Missing` and `WrongType` abort the whole generation pass that raised
/// them — they indicate a misconfigured profile, not a bad input line.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A required key is absent from the snapshot.
    #[error("missing required setting `{key}`")]
    Missing {
        /// The absent key.
        key: String,
    },

    /// A key is present but holds a value of the wrong type.
    #[error("setting `{key}` has type {actual}, expected {expected}")]
    WrongType {
        /// The offending key.
        key: String,
        /// The type the caller asked for.
        expected: &'static str,
        /// The type actually stored.
        actual: &'static str,
    },

    /// JSON deserialization of a snapshot failed.
    #[error("invalid settings JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A typed settings value.
///
/// Distances are millimeters, angles degrees, times seconds. `Float` is a
/// unitless scalar (percentages, ratios).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SettingValue {
    /// Integer value.
    Int(i64),
    /// Distance in millimeters.
    Distance(f64),
    /// Angle in degrees.
    Angle(f64),
    /// Duration in seconds.
    Seconds(f64),
    /// Unitless scalar.
    Float(f64),
    /// Boolean flag.
    Bool(bool),
    /// Free-form string.
    Str(String),
}

impl SettingValue {
    /// Name of this value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Int(_) => "int",
            SettingValue::Distance(_) => "distance",
            SettingValue::Angle(_) => "angle",
            SettingValue::Seconds(_) => "seconds",
            SettingValue::Float(_) => "float",
            SettingValue::Bool(_) => "bool",
            SettingValue::Str(_) => "string",
        }
    }

    /// Compact textual rendering used by the settings footer: integers and
    /// booleans verbatim, floats with trailing zeros trimmed, strings as-is.
    pub fn compact(&self) -> String {
        match self {
            SettingValue::Int(v) => v.to_string(),
            SettingValue::Distance(v)
            | SettingValue::Angle(v)
            | SettingValue::Seconds(v)
            | SettingValue::Float(v) => trim_f64(*v),
            SettingValue::Bool(v) => v.to_string(),
            SettingValue::Str(v) => v.clone(),
        }
    }
}

/// Render a float in its shortest form without trailing zeros.
pub fn trim_f64(n: f64) -> String {
    let s = format!("{:.6}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.').to_string();
    if s.is_empty() { "0".to_string() } else { s }
}

/// An insertion-ordered, read-only snapshot of one machine profile.
///
/// Built once by the caller, then borrowed immutably by every parser and
/// writer instance for the lifetime of a pass. Changing settings mid-run
/// means building a new snapshot and a new writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsSnapshot {
    /// Key/value pairs in declared order. Keys are unique.
    entries: Vec<(String, SettingValue)>,
}

impl SettingsSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, replacing any existing value but keeping the key's original
    /// position in the declared order. Returns `self` for chaining.
    pub fn set(mut self, key: impl Into<String>, value: SettingValue) -> Self {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Raw lookup. `None` when the key is absent.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Number of keys in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in declared/insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn require(&self, key: &str) -> Result<&SettingValue, SettingsError> {
        self.get(key).ok_or_else(|| SettingsError::Missing {
            key: key.to_string(),
        })
    }

    fn wrong_type(key: &str, expected: &'static str, got: &SettingValue) -> SettingsError {
        SettingsError::WrongType {
            key: key.to_string(),
            expected,
            actual: got.type_name(),
        }
    }

    /// Typed read of an integer key.
    pub fn get_int(&self, key: &str) -> Result<i64, SettingsError> {
        match self.require(key)? {
            SettingValue::Int(v) => Ok(*v),
            other => Err(Self::wrong_type(key, "int", other)),
        }
    }

    /// Typed read of a distance key (millimeters).
    pub fn get_distance(&self, key: &str) -> Result<f64, SettingsError> {
        match self.require(key)? {
            SettingValue::Distance(v) => Ok(*v),
            other => Err(Self::wrong_type(key, "distance", other)),
        }
    }

    /// Typed read of an angle key (degrees).
    pub fn get_angle(&self, key: &str) -> Result<f64, SettingsError> {
        match self.require(key)? {
            SettingValue::Angle(v) => Ok(*v),
            other => Err(Self::wrong_type(key, "angle", other)),
        }
    }

    /// Typed read of a duration key (seconds).
    pub fn get_seconds(&self, key: &str) -> Result<f64, SettingsError> {
        match self.require(key)? {
            SettingValue::Seconds(v) => Ok(*v),
            other => Err(Self::wrong_type(key, "seconds", other)),
        }
    }

    /// Typed read of a unitless float key.
    pub fn get_float(&self, key: &str) -> Result<f64, SettingsError> {
        match self.require(key)? {
            SettingValue::Float(v) => Ok(*v),
            other => Err(Self::wrong_type(key, "float", other)),
        }
    }

    /// Typed read of a boolean key.
    pub fn get_bool(&self, key: &str) -> Result<bool, SettingsError> {
        match self.require(key)? {
            SettingValue::Bool(v) => Ok(*v),
            other => Err(Self::wrong_type(key, "bool", other)),
        }
    }

    /// Typed read of a string key.
    pub fn get_str(&self, key: &str) -> Result<&str, SettingsError> {
        match self.require(key)? {
            SettingValue::Str(v) => Ok(v),
            other => Err(Self::wrong_type(key, "string", other)),
        }
    }
}

/// Load a [`SettingsSnapshot`] from its JSON form: an array of
/// `[key, {"type": ..., "value": ...}]` pairs, preserving order.
pub fn load_snapshot_from_str(s: &str) -> Result<SettingsSnapshot, SettingsError> {
    let snapshot: SettingsSnapshot = serde_json::from_str(s)?;
    Ok(snapshot)
}
