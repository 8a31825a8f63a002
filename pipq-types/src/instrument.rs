use serde::{Deserialize, Serialize};

/// A loadable Pianoteq preset.
///
/// `name` is the canonical identifier sent to the engine; `display_name` is the
/// shortened form shown in menus (computed once during discovery).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub display_name: String,
}

impl Preset {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
        }
    }

    /// Build a preset with a precomputed display name.
    /// An empty display name falls back to the full name.
    pub fn with_display_name(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        let name = name.into();
        let display_name = display_name.into();
        let display_name = if display_name.is_empty() {
            name.clone()
        } else {
            display_name
        };
        Self { name, display_name }
    }
}

/// A named group of presets, e.g. "D4 Grand Piano" with its mic variants.
///
/// The two background colors are hex strings (`#rrggbb`) used by the hardware
/// panel backlight; the core passes them through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    pub preset_prefix: String,
    pub background_primary: String,
    pub background_secondary: String,
    pub presets: Vec<Preset>,
}

impl Instrument {
    pub fn new(
        name: impl Into<String>,
        preset_prefix: impl Into<String>,
        background_primary: impl Into<String>,
        background_secondary: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            preset_prefix: preset_prefix.into(),
            background_primary: background_primary.into(),
            background_secondary: background_secondary.into(),
            presets: Vec::new(),
        }
    }

    pub fn add_preset(&mut self, preset: Preset) {
        self.presets.push(preset);
    }

    pub fn preset_index(&self, preset_name: &str) -> Option<usize> {
        self.presets.iter().position(|p| p.name == preset_name)
    }

    pub fn preset(&self, preset_name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == preset_name)
    }
}

/// Value key identifying a selection: `(instrument name, preset name)`.
///
/// UI code compares selections through this key, never by reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SelectionKey {
    pub instrument: String,
    pub preset: String,
}

impl SelectionKey {
    pub fn new(instrument: impl Into<String>, preset: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            preset: preset.into(),
        }
    }

    pub fn matches(&self, instrument: &Instrument, preset: &Preset) -> bool {
        self.instrument == instrument.name && self.preset == preset.name
    }
}

impl std::fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.instrument, self.preset)
    }
}
