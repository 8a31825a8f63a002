//! Terminal client: menus, search and a log view on top of ratatui.

mod app;
mod view;

pub use app::{CliApp, Flow, Mode};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pipq_core::state_monitor::StateMonitor;
use pipq_types::ClientApi;

use crate::client::{Client, ClientError, Lifecycle, LifecycleState};
use crate::logging::LogBuffer;
use crate::ui::{AppEvent, InputSource, TerminalSession};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct CliClient {
    lifecycle: Lifecycle,
    app: CliApp,
    api: Option<Box<dyn ClientApi>>,
    monitor: Option<StateMonitor>,
    terminal: TerminalSession,
    logs: LogBuffer,
    quit: Arc<AtomicBool>,
}

impl CliClient {
    /// Take over the terminal. `quit` is shared with the signal handler.
    pub fn new(logs: LogBuffer, quit: Arc<AtomicBool>) -> Result<Self, ClientError> {
        let terminal = TerminalSession::open()?;
        Ok(Self {
            lifecycle: Lifecycle::new(),
            app: CliApp::new(),
            api: None,
            monitor: None,
            terminal,
            logs,
            quit,
        })
    }

    fn draw(&mut self) -> Result<(), ClientError> {
        let Self {
            app,
            api,
            logs,
            terminal,
            ..
        } = self;
        terminal.draw(|buf, area| view::render(app, api.as_deref(), logs, area, buf))?;
        Ok(())
    }

    fn apply_engine_changes(&mut self) {
        let Some(monitor) = &self.monitor else {
            return;
        };
        if let Some(state) = monitor.drain_changes().pop() {
            log::debug!(target: "cli", "engine state: {} (modified: {})", state.preset_name, state.modified);
            self.app.set_modified(state.modified);
        }
    }
}

impl Client for CliClient {
    fn show_loading_message(&mut self, message: &str) -> Result<(), ClientError> {
        self.lifecycle
            .require("show_loading_message", LifecycleState::Constructed)?;
        self.app.set_loading_message(message);
        self.draw()
    }

    fn set_api(&mut self, api: Box<dyn ClientApi>) -> Result<(), ClientError> {
        self.lifecycle.require("set_api", LifecycleState::Constructed)?;
        self.api = Some(api);
        self.app.enter_normal();
        self.lifecycle.advance(LifecycleState::Ready);
        Ok(())
    }

    fn attach_state_monitor(&mut self, monitor: StateMonitor) {
        self.monitor = Some(monitor);
    }

    fn start(&mut self) -> Result<(), ClientError> {
        self.lifecycle.require("start", LifecycleState::Ready)?;
        self.lifecycle.advance(LifecycleState::Running);
        log::info!(target: "cli", "terminal client running");

        while !self.quit.load(Ordering::SeqCst) {
            self.apply_engine_changes();
            self.draw()?;

            let Some(event) = self.terminal.poll_event(POLL_INTERVAL) else {
                continue;
            };
            let AppEvent::Key(key) = event else {
                continue;
            };
            let Some(api) = self.api.as_deref_mut() else {
                break;
            };
            if self.app.handle_key(api, &key) == Flow::Quit {
                break;
            }
        }

        if let Some(mut monitor) = self.monitor.take() {
            monitor.stop();
        }
        self.terminal.close()?;
        self.lifecycle.advance(LifecycleState::Finished);
        log::info!(target: "cli", "terminal client stopped");
        Ok(())
    }
}
