//! The instrument/preset cursor.
//!
//! `Selector` owns `(instrument_index, preset_index)` over a shared `Library`.
//! Every operation leaves both indices in range, so `current_instrument` and
//! `current_preset` never fail.

use std::sync::Arc;

use pipq_types::{Instrument, Preset, SelectionKey};

use crate::error::CoreError;
use crate::library::Library;

#[derive(Debug, Clone)]
pub struct Selector {
    library: Arc<Library>,
    instrument_index: usize,
    preset_index: usize,
}

impl Selector {
    /// Cursor at the first preset of the first instrument.
    pub fn new(library: Arc<Library>) -> Result<Self, CoreError> {
        if library.is_empty() {
            return Err(CoreError::EmptyCatalog);
        }
        Ok(Self {
            library,
            instrument_index: 0,
            preset_index: 0,
        })
    }

    pub fn library(&self) -> &Arc<Library> {
        &self.library
    }

    pub fn position(&self) -> (usize, usize) {
        (self.instrument_index, self.preset_index)
    }

    pub fn current_instrument(&self) -> &Instrument {
        &self.library.get_instruments()[self.instrument_index]
    }

    pub fn current_preset(&self) -> &Preset {
        &self.current_instrument().presets[self.preset_index]
    }

    pub fn current_key(&self) -> SelectionKey {
        SelectionKey::new(
            self.current_instrument().name.as_str(),
            self.current_preset().name.as_str(),
        )
    }

    fn instrument_count(&self) -> usize {
        self.library.instrument_count()
    }

    fn preset_count(&self) -> usize {
        self.current_instrument().presets.len()
    }

    /// Next instrument, wrapping; preset resets to 0.
    pub fn set_instrument_next(&mut self) {
        self.instrument_index = (self.instrument_index + 1) % self.instrument_count();
        self.preset_index = 0;
    }

    /// Previous instrument, wrapping; preset resets to 0.
    pub fn set_instrument_prev(&mut self) {
        let n = self.instrument_count();
        self.instrument_index = (self.instrument_index + n - 1) % n;
        self.preset_index = 0;
    }

    /// Exact-name switch. Unknown names are ignored.
    pub fn set_instrument(&mut self, name: &str) {
        if let Some(index) = self.library.instrument_index(name) {
            self.instrument_index = index;
            self.preset_index = 0;
        }
    }

    pub fn set_preset_next(&mut self) {
        if self.preset_index + 1 < self.preset_count() {
            self.preset_index += 1;
        } else {
            self.set_instrument_next();
        }
    }

    pub fn set_preset_prev(&mut self) {
        if self.preset_index == 0 {
            self.set_instrument_prev();
            self.preset_index = self.preset_count() - 1;
        } else {
            self.preset_index -= 1;
        }
    }

    /// Select by instrument and preset name. Returns `false` and leaves the
    /// cursor untouched when either name is unknown.
    pub fn set_preset(&mut self, instrument_name: &str, preset_name: &str) -> bool {
        let Some(instrument_index) = self.library.instrument_index(instrument_name) else {
            return false;
        };
        let Some(preset_index) =
            self.library.get_instruments()[instrument_index].preset_index(preset_name)
        else {
            return false;
        };
        self.instrument_index = instrument_index;
        self.preset_index = preset_index;
        true
    }
}
