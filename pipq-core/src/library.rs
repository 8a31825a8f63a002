use pipq_types::{Instrument, Preset};

/// Immutable, ordered catalog of instruments discovered at startup.
///
/// Shared read-only through `Arc<Library>` between the selector, the bridge and
/// any reader threads.
#[derive(Debug, Clone, Default)]
pub struct Library {
    instruments: Vec<Instrument>,
}

impl Library {
    /// Instruments without presets are dropped so that every instrument the
    /// selector can land on has a preset at index 0.
    pub fn new(instruments: Vec<Instrument>) -> Self {
        let before = instruments.len();
        let instruments: Vec<Instrument> = instruments
            .into_iter()
            .filter(|i| !i.presets.is_empty())
            .collect();
        if instruments.len() != before {
            log::debug!(
                target: "library",
                "dropped {} instruments without presets",
                before - instruments.len()
            );
        }
        Self { instruments }
    }

    pub fn get_instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn get_instrument_by_name(&self, name: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.name == name)
    }

    pub(crate) fn instrument_index(&self, name: &str) -> Option<usize> {
        self.instruments.iter().position(|i| i.name == name)
    }

    /// Presets of the named instrument, or an empty slice.
    pub fn get_presets_for_instrument(&self, name: &str) -> &[Preset] {
        self.get_instrument_by_name(name)
            .map(|i| i.presets.as_slice())
            .unwrap_or(&[])
    }

    /// First instrument (in catalog order) holding a preset with this exact name.
    pub fn find_preset_by_name(&self, preset_name: &str) -> Option<(&Instrument, &Preset)> {
        self.instruments
            .iter()
            .find_map(|i| i.preset(preset_name).map(|p| (i, p)))
    }

    pub fn instrument_count(&self) -> usize {
        self.instruments.len()
    }

    pub fn preset_count(&self) -> usize {
        self.instruments.iter().map(|i| i.presets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
