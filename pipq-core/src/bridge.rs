//! `ClientApi` implementation joining the selector to the engine.
//!
//! Mutators move the selector first and then tell the engine to load the new
//! preset. Engine failures are logged and swallowed: the cursor stays where the
//! user put it, and the next successful load brings the engine back in line.

use std::panic::{self, AssertUnwindSafe};
use std::process::Command;
use std::sync::Arc;

use rand::Rng;

use pipq_types::{ClientApi, ExitCallback, Instrument, Preset};

use crate::error::CoreError;
use crate::library::Library;
use crate::rpc::EngineGateway;
use crate::selector::Selector;

pub const DEFAULT_SHUTDOWN_COMMAND: &str = "sudo shutdown -h now";

/// Powers the device off.
pub trait PowerControl: Send {
    fn power_off(&mut self);
}

/// Runs a shell command, `sudo shutdown -h now` by default.
pub struct ShellPowerControl {
    command: String,
}

impl ShellPowerControl {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for ShellPowerControl {
    fn default() -> Self {
        Self::new(DEFAULT_SHUTDOWN_COMMAND)
    }
}

impl PowerControl for ShellPowerControl {
    fn power_off(&mut self) {
        log::info!(target: "bridge", "running shutdown command: {}", self.command);
        match Command::new("sh").arg("-c").arg(&self.command).status() {
            Ok(status) if status.success() => {}
            Ok(status) => {
                log::error!(target: "bridge", "shutdown command exited with {}", status)
            }
            Err(e) => log::error!(target: "bridge", "failed to run shutdown command: {}", e),
        }
    }
}

pub struct Backend<G: EngineGateway> {
    library: Arc<Library>,
    selector: Selector,
    gateway: G,
    power: Box<dyn PowerControl>,
    on_exit: Option<ExitCallback>,
}

impl<G: EngineGateway> Backend<G> {
    /// Build the bridge and align the cursor with whatever the engine has loaded.
    pub fn new(
        library: Arc<Library>,
        gateway: G,
        power: Box<dyn PowerControl>,
    ) -> Result<Self, CoreError> {
        let selector = Selector::new(Arc::clone(&library))?;
        let mut backend = Self {
            library,
            selector,
            gateway,
            power,
            on_exit: None,
        };
        backend.sync_with_engine();
        Ok(backend)
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn library(&self) -> &Arc<Library> {
        &self.library
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Follow the engine's loaded preset when it is in the catalog; otherwise
    /// load the cursor's preset so both sides agree.
    ///
    /// The engine's instrument decides between presets that share a name.
    /// The name alone is only used when that instrument is missing from the
    /// catalog.
    fn sync_with_engine(&mut self) {
        let current = match self.gateway.get_info() {
            Ok(info) => info.current_preset,
            Err(e) => {
                log::warn!(target: "bridge", "could not read engine state ({}), loading first preset", e);
                self.load_current();
                return;
            }
        };

        if current.name.is_empty() {
            log::warn!(target: "bridge", "engine reported no current preset, loading first preset");
            self.load_current();
            return;
        }

        if !current.instrument.is_empty()
            && self.selector.set_preset(&current.instrument, &current.name)
        {
            log::info!(
                target: "bridge",
                "synced to current preset: {} - {}",
                current.instrument,
                current.name
            );
            return;
        }

        let found = self
            .library
            .find_preset_by_name(&current.name)
            .map(|(i, p)| (i.name.clone(), p.name.clone()));
        match found {
            Some((instrument, preset)) if self.selector.set_preset(&instrument, &preset) => {
                log::info!(
                    target: "bridge",
                    "synced to current preset by name: {} - {} (engine reported '{}')",
                    instrument,
                    preset,
                    current.instrument
                );
            }
            _ => {
                log::info!(
                    target: "bridge",
                    "current preset '{}' not in library, loading first preset",
                    current.name
                );
                self.load_current();
            }
        }
    }

    fn load_current(&mut self) {
        let name = self.selector.current_preset().name.clone();
        if let Err(e) = self.gateway.load_preset(&name) {
            log::warn!(target: "bridge", "failed to load preset '{}': {}", name, e);
        }
    }

    fn randomize(&mut self) {
        if let Err(e) = self.gateway.randomize_parameters(1.0) {
            log::warn!(target: "bridge", "failed to randomize parameters: {}", e);
        }
    }
}

impl<G: EngineGateway> ClientApi for Backend<G> {
    fn get_instruments(&self) -> &[Instrument] {
        self.library.get_instruments()
    }

    fn get_current_instrument(&self) -> &Instrument {
        self.selector.current_instrument()
    }

    fn set_instrument(&mut self, name: &str) {
        if self.library.get_instrument_by_name(name).is_none() {
            log::debug!(target: "bridge", "unknown instrument '{}'", name);
            return;
        }
        self.selector.set_instrument(name);
        self.load_current();
    }

    fn set_instrument_next(&mut self) {
        self.selector.set_instrument_next();
        self.load_current();
    }

    fn set_instrument_prev(&mut self) {
        self.selector.set_instrument_prev();
        self.load_current();
    }

    fn get_presets(&self, instrument_name: &str) -> &[Preset] {
        self.library.get_presets_for_instrument(instrument_name)
    }

    fn get_current_preset(&self) -> &Preset {
        self.selector.current_preset()
    }

    fn set_preset(&mut self, instrument_name: &str, preset_name: &str) {
        if self.selector.set_preset(instrument_name, preset_name) {
            self.load_current();
        } else {
            log::debug!(
                target: "bridge",
                "unknown preset '{}' for instrument '{}'",
                preset_name,
                instrument_name
            );
        }
    }

    fn set_preset_next(&mut self) {
        self.selector.set_preset_next();
        self.load_current();
    }

    fn set_preset_prev(&mut self) {
        self.selector.set_preset_prev();
        self.load_current();
    }

    fn randomize_current_preset(&mut self) {
        let current = self.selector.current_instrument().name.clone();
        match self.gateway.get_info() {
            Ok(info) if info.current_preset.instrument == current => {}
            Ok(_) => {
                log::info!(target: "bridge", "switching engine to {} before randomizing", current);
                self.load_current();
            }
            Err(e) => {
                log::warn!(target: "bridge", "could not check engine instrument ({}), loading preset first", e);
                self.load_current();
            }
        }
        log::info!(target: "bridge", "randomizing parameters");
        self.randomize();
    }

    fn randomize_all(&mut self) {
        let mut rng = rand::thread_rng();
        let instruments = self.library.get_instruments();
        let instrument = &instruments[rng.gen_range(0..instruments.len())];
        let preset = &instrument.presets[rng.gen_range(0..instrument.presets.len())];
        let (instrument_name, preset_name) = (instrument.name.clone(), preset.name.clone());

        log::info!(target: "bridge", "random pick: {} - {}", instrument_name, preset_name);
        if self.selector.set_preset(&instrument_name, &preset_name) {
            self.load_current();
        }
        self.randomize();
    }

    fn set_on_exit(&mut self, on_exit: ExitCallback) {
        self.on_exit = Some(on_exit);
    }

    fn shutdown_device(&mut self) {
        log::info!(target: "bridge", "client requested shutdown");
        if let Some(on_exit) = self.on_exit.take() {
            if panic::catch_unwind(AssertUnwindSafe(on_exit)).is_err() {
                log::error!(target: "bridge", "exit callback panicked, shutting down anyway");
            }
        }
        self.power.power_off();
    }
}
