//! Client for the six-button LCD panel.
//!
//! `HatApp` owns the screens and button logic; `HatClient` drives it against
//! any [`Panel`] and keeps the marquee threads in step with what is on screen.

mod app;
mod buttons;
mod emulator;
mod frame;
mod marquee;
mod panel;

pub use emulator::TerminalPanel;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use pipq_types::ClientApi;

use crate::client::{Client, ClientError, Lifecycle, LifecycleState};
use crate::ui::Color;
use app::{HatApp, Screen, MAIN_TEXT_WIDTH, MENU_TEXT_WIDTH};
use frame::HatFrame;
use marquee::Marquee;
use panel::{Panel, LED_COUNT};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub struct HatClient<P: Panel> {
    lifecycle: Lifecycle,
    app: HatApp,
    api: Option<Box<dyn ClientApi>>,
    panel: P,
    quit: Arc<AtomicBool>,
    frame: HatFrame,
    instrument_line: Marquee,
    preset_line: Marquee,
    menu_line: Marquee,
}

impl<P: Panel> HatClient<P> {
    /// `quit` ends the loop; the device shutdown callback raises it too.
    pub fn new(panel: P, quit: Arc<AtomicBool>) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            app: HatApp::new(),
            api: None,
            panel,
            quit,
            frame: HatFrame::new(),
            instrument_line: Marquee::new(MAIN_TEXT_WIDTH),
            preset_line: Marquee::new(MAIN_TEXT_WIDTH),
            menu_line: Marquee::new(MENU_TEXT_WIDTH),
        }
    }

    pub fn app(&self) -> &HatApp {
        &self.app
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Point the marquees at the lines now on screen. Lines that left the
    /// screen get an empty text, which stops their thread.
    fn sync_marquees(&mut self) {
        let lines = self.app.scrolling_lines(self.api.as_deref());
        let on_main = *self.app.screen() == Screen::Main;
        let focus = lines.focus.unwrap_or_default();

        self.instrument_line.set_text(&lines.top.unwrap_or_default());
        if on_main {
            self.preset_line.set_text(&focus);
            self.menu_line.set_text("");
        } else {
            self.preset_line.set_text("");
            self.menu_line.set_text(&focus);
        }
    }

    fn draw(&mut self) -> Result<(), ClientError> {
        self.sync_marquees();
        let focus_offset = if *self.app.screen() == Screen::Main {
            self.preset_line.offset()
        } else {
            self.menu_line.offset()
        };
        self.app.render(
            self.api.as_deref(),
            &mut self.frame,
            self.instrument_line.offset(),
            focus_offset,
        );
        self.panel.set_backlight(&self.app.backlight(self.api.as_deref()))?;
        self.panel.show(&self.frame)?;
        Ok(())
    }

    fn blank(&mut self) -> Result<(), ClientError> {
        self.frame.clear_all();
        self.panel.show(&self.frame)?;
        self.panel.set_backlight(&[Color::BLACK; LED_COUNT])?;
        Ok(())
    }
}

impl<P: Panel> Client for HatClient<P> {
    fn show_loading_message(&mut self, message: &str) -> Result<(), ClientError> {
        self.lifecycle
            .require("show_loading_message", LifecycleState::Constructed)?;
        self.app.set_loading_message(message);
        self.draw()
    }

    fn set_api(&mut self, mut api: Box<dyn ClientApi>) -> Result<(), ClientError> {
        self.lifecycle.require("set_api", LifecycleState::Constructed)?;
        let quit = Arc::clone(&self.quit);
        api.set_on_exit(Box::new(move || {
            log::info!(target: "hat", "device shutting down, leaving the panel loop");
            quit.store(true, Ordering::SeqCst);
        }));
        self.api = Some(api);
        self.app.enter_main();
        self.lifecycle.advance(LifecycleState::Ready);
        Ok(())
    }

    fn start(&mut self) -> Result<(), ClientError> {
        self.lifecycle.require("start", LifecycleState::Ready)?;
        self.lifecycle.advance(LifecycleState::Running);
        log::info!(target: "hat", "panel client running");

        while !self.quit.load(Ordering::SeqCst) {
            self.draw()?;
            let Some((button, event)) = self.panel.poll_button(FRAME_INTERVAL) else {
                continue;
            };
            log::trace!(target: "hat", "{:?} {:?}", button, event);
            let Some(api) = self.api.as_deref_mut() else {
                break;
            };
            self.app.handle(api, button, event, Instant::now());
        }

        self.instrument_line.stop();
        self.preset_line.stop();
        self.menu_line.stop();
        self.blank()?;
        self.lifecycle.advance(LifecycleState::Finished);
        log::info!(target: "hat", "panel client stopped");
        Ok(())
    }
}
