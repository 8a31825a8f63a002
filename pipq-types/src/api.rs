//! The stable method surface UI clients program against.
//!
//! Call the API from one thread only. Background threads (scrolling text, state
//! monitors) must read their own cached copies and never call the mutators.

use crate::instrument::{Instrument, Preset, SelectionKey};

/// Interface version reported to third-party clients.
pub const API_VERSION: &str = "1.0.0";

/// Callback run once before the device powers off.
pub type ExitCallback = Box<dyn FnOnce() + Send>;

pub trait ClientApi {
    /// Interface version for compatibility checks.
    fn version() -> &'static str
    where
        Self: Sized,
    {
        API_VERSION
    }

    /// All instruments in discovery order.
    fn get_instruments(&self) -> &[Instrument];

    fn get_current_instrument(&self) -> &Instrument;

    /// Switch to an instrument by exact name and load its first preset.
    /// Unknown names leave the selection unchanged.
    fn set_instrument(&mut self, name: &str);

    /// Next instrument (wrapping), first preset.
    fn set_instrument_next(&mut self);

    /// Previous instrument (wrapping), first preset.
    fn set_instrument_prev(&mut self);

    /// Presets of an instrument, or an empty slice when the name is unknown.
    fn get_presets(&self, instrument_name: &str) -> &[Preset];

    fn get_current_preset(&self) -> &Preset;

    /// Load a preset by instrument and preset name (use `Preset::name`, not the
    /// display name). Unknown names leave the selection unchanged.
    fn set_preset(&mut self, instrument_name: &str, preset_name: &str);

    /// Next preset; past the last preset of an instrument this moves to the
    /// first preset of the next instrument.
    fn set_preset_next(&mut self);

    /// Previous preset; before the first preset of an instrument this moves to
    /// the last preset of the previous instrument.
    fn set_preset_prev(&mut self);

    /// Randomize the synthesis parameters of the current preset.
    fn randomize_current_preset(&mut self);

    /// Pick a random instrument and preset, then randomize its parameters.
    fn randomize_all(&mut self);

    /// Register the callback run by `shutdown_device`. The last registration wins.
    fn set_on_exit(&mut self, on_exit: ExitCallback);

    /// Run the exit callback, then power the device off.
    ///
    /// Only meant for hardware shutdown buttons.
    fn shutdown_device(&mut self);

    /// Value key of the current selection.
    fn current_key(&self) -> SelectionKey {
        SelectionKey::new(
            self.get_current_instrument().name.as_str(),
            self.get_current_preset().name.as_str(),
        )
    }
}
