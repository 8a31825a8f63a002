//! Background poller for engine-side changes.
//!
//! Presets can change behind our back (MIDI program change, the Pianoteq window,
//! parameter tweaks). The monitor polls `getInfo` on its own thread and reports
//! changes over a channel; the UI thread drains it and only reads the snapshot.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::rpc::EngineGateway;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What the engine reports about its loaded preset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineState {
    pub preset_name: String,
    pub modified: bool,
}

pub struct StateMonitor {
    current: Arc<Mutex<Option<EngineState>>>,
    changes_rx: Receiver<EngineState>,
    stop_tx: Option<Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl StateMonitor {
    pub fn start<G: EngineGateway + 'static>(gateway: G, interval: Duration) -> Self {
        let current = Arc::new(Mutex::new(None));
        let (changes_tx, changes_rx) = crossbeam_channel::unbounded();
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);

        let thread_current = Arc::clone(&current);
        let join_handle = thread::Builder::new()
            .name("state-monitor".into())
            .spawn(move || {
                loop {
                    poll_once(&gateway, &thread_current, &changes_tx);
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            });

        let join_handle = match join_handle {
            Ok(handle) => {
                log::info!(target: "state", "state monitor started (poll interval: {:?})", interval);
                Some(handle)
            }
            Err(e) => {
                log::error!(target: "state", "failed to spawn state monitor: {}", e);
                None
            }
        };

        Self {
            current,
            changes_rx,
            stop_tx: Some(stop_tx),
            join_handle,
        }
    }

    /// Last observed state, `None` until the first successful poll.
    pub fn current(&self) -> Option<EngineState> {
        self.current.lock().ok().and_then(|s| s.clone())
    }

    pub fn changes(&self) -> &Receiver<EngineState> {
        &self.changes_rx
    }

    /// Drain pending change notifications, oldest first.
    pub fn drain_changes(&self) -> Vec<EngineState> {
        self.changes_rx.try_iter().collect()
    }

    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.join_handle.take() {
            if handle.join().is_err() {
                log::warn!(target: "state", "state monitor thread panicked");
            }
            log::info!(target: "state", "state monitor stopped");
        }
    }
}

impl Drop for StateMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One poll: record the state and report it if it differs from the last one.
/// The first observation only initializes.
fn poll_once<G: EngineGateway + ?Sized>(
    gateway: &G,
    current: &Mutex<Option<EngineState>>,
    changes_tx: &Sender<EngineState>,
) {
    let info = match gateway.get_info() {
        Ok(info) => info,
        Err(e) => {
            log::debug!(target: "state", "error checking Pianoteq state: {}", e);
            return;
        }
    };
    let new_state = EngineState {
        preset_name: info.current_preset.name,
        modified: info.modified,
    };

    let Ok(mut guard) = current.lock() else {
        return;
    };
    match guard.as_ref() {
        None => {
            log::debug!(
                target: "state",
                "initial state: {} (modified={})",
                new_state.preset_name,
                new_state.modified
            );
            *guard = Some(new_state);
        }
        Some(old) if *old != new_state => {
            log::debug!(
                target: "state",
                "state changed: {} (modified={})",
                new_state.preset_name,
                new_state.modified
            );
            *guard = Some(new_state.clone());
            let _ = changes_tx.send(new_state);
        }
        Some(_) => {}
    }
}
