//! Recording `ClientApi` used by the client state machine tests.

use std::sync::Arc;

use pipq_core::{Library, Selector};
use pipq_types::{ClientApi, ExitCallback, Instrument, Preset};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    SetInstrument(String),
    InstrumentNext,
    InstrumentPrev,
    SetPreset(String, String),
    PresetNext,
    PresetPrev,
    RandomizeCurrent,
    RandomizeAll,
    Shutdown,
}

/// Navigates a real `Selector` and records every mutator call.
pub struct FakeApi {
    selector: Selector,
    pub calls: Vec<ApiCall>,
    on_exit: Option<ExitCallback>,
}

fn instrument(name: &str, primary: &str, secondary: &str, presets: &[(&str, &str)]) -> Instrument {
    let mut instrument = Instrument::new(name, name, primary, secondary);
    for (preset, display) in presets {
        instrument.add_preset(Preset::with_display_name(*preset, *display));
    }
    instrument
}

pub fn sample_instruments() -> Vec<Instrument> {
    vec![
        instrument(
            "D4 Grand Piano",
            "#af2523",
            "#4e0e0e",
            &[
                ("D4 Grand Piano Prelude", "Prelude"),
                ("D4 Grand Piano Concert", "Concert"),
                ("D4 Grand Piano Jazz", "Jazz"),
            ],
        ),
        instrument(
            "Vintage Tines",
            "#4a2a6e",
            "#1f0f33",
            &[("Vintage Tines MKI", "MKI"), ("Vintage Tines MKII", "MKII")],
        ),
        instrument(
            "Celesta",
            "#1a5c8c",
            "#0b2a40",
            &[("Celesta Basic", "Celesta Basic")],
        ),
    ]
}

impl FakeApi {
    pub fn new() -> Self {
        let library = Arc::new(Library::new(sample_instruments()));
        let selector = match Selector::new(library) {
            Ok(selector) => selector,
            Err(e) => panic!("sample library is not empty: {}", e),
        };
        Self {
            selector,
            calls: Vec::new(),
            on_exit: None,
        }
    }

    pub fn position(&self) -> (usize, usize) {
        self.selector.position()
    }

    pub fn take_calls(&mut self) -> Vec<ApiCall> {
        std::mem::take(&mut self.calls)
    }
}

impl ClientApi for FakeApi {
    fn get_instruments(&self) -> &[Instrument] {
        self.selector.library().get_instruments()
    }

    fn get_current_instrument(&self) -> &Instrument {
        self.selector.current_instrument()
    }

    fn set_instrument(&mut self, name: &str) {
        self.calls.push(ApiCall::SetInstrument(name.to_string()));
        self.selector.set_instrument(name);
    }

    fn set_instrument_next(&mut self) {
        self.calls.push(ApiCall::InstrumentNext);
        self.selector.set_instrument_next();
    }

    fn set_instrument_prev(&mut self) {
        self.calls.push(ApiCall::InstrumentPrev);
        self.selector.set_instrument_prev();
    }

    fn get_presets(&self, instrument_name: &str) -> &[Preset] {
        self.selector.library().get_presets_for_instrument(instrument_name)
    }

    fn get_current_preset(&self) -> &Preset {
        self.selector.current_preset()
    }

    fn set_preset(&mut self, instrument_name: &str, preset_name: &str) {
        self.calls.push(ApiCall::SetPreset(
            instrument_name.to_string(),
            preset_name.to_string(),
        ));
        self.selector.set_preset(instrument_name, preset_name);
    }

    fn set_preset_next(&mut self) {
        self.calls.push(ApiCall::PresetNext);
        self.selector.set_preset_next();
    }

    fn set_preset_prev(&mut self) {
        self.calls.push(ApiCall::PresetPrev);
        self.selector.set_preset_prev();
    }

    fn randomize_current_preset(&mut self) {
        self.calls.push(ApiCall::RandomizeCurrent);
    }

    fn randomize_all(&mut self) {
        self.calls.push(ApiCall::RandomizeAll);
    }

    fn set_on_exit(&mut self, on_exit: ExitCallback) {
        self.on_exit = Some(on_exit);
    }

    fn shutdown_device(&mut self) {
        self.calls.push(ApiCall::Shutdown);
        if let Some(on_exit) = self.on_exit.take() {
            on_exit();
        }
    }
}
