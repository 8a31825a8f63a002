//! Payloads of Pianoteq's JSON-RPC API.
//!
//! Every field defaults so that older or newer engine builds that add or drop
//! attributes still decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of `getListOfPresets`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetInfo {
    pub name: String,
    /// Instrument attribution; presets are grouped by this.
    pub instr: String,
    #[serde(rename = "class")]
    pub instrument_class: String,
    pub collection: String,
    pub license: String,
    /// `"ok"` for licensed presets, `"demo"` otherwise.
    pub license_status: String,
    pub author: String,
    pub bank: String,
    pub comment: String,
    pub file: String,
}

impl PresetInfo {
    pub fn is_licensed(&self) -> bool {
        self.license_status == "ok"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentPreset {
    pub name: String,
    pub instrument: String,
    pub author: String,
    pub bank: String,
    pub comment: String,
    pub mini_presets: BTreeMap<String, String>,
}

/// Result of `getInfo`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PianoteqInfo {
    pub version: String,
    pub product_name: String,
    pub vendor_name: String,
    pub plugin_type: String,
    pub arch: String,
    pub arch_bits: u32,
    pub build_date: String,
    /// True when parameters differ from the loaded preset.
    pub modified: bool,
    pub computing_parameter_update: bool,
    pub current_preset: CurrentPreset,
}

/// Result of `getActivationInfo`. The engine reports `error_msg == "Demo"` when
/// no license is installed; the licensee fields are only present otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationInfo {
    pub error_msg: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub hwname: Option<String>,
    pub status: Option<i64>,
}

impl Default for ActivationInfo {
    fn default() -> Self {
        Self {
            error_msg: "Demo".to_string(),
            name: None,
            email: None,
            hwname: None,
            status: None,
        }
    }
}

impl ActivationInfo {
    pub fn is_licensed(&self) -> bool {
        self.error_msg != "Demo"
    }
}
