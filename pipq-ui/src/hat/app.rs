use std::time::Instant;

use pipq_types::ClientApi;

use super::buttons::{Button, ButtonEvent, ButtonSuppression, HeldCounter};
use super::frame::{HatFrame, HEIGHT, WIDTH};
use super::marquee::WRAP_GAP;
use super::panel::{Backlight, LED_COUNT};
use crate::ui::{Bounds, Color, ListSelector};

pub const CONTROL_MENU_OPTIONS: [&str; 3] = ["Select Instrument", "Randomize Preset", "Random All"];
pub const SHUT_DOWN: &str = "Shut down";
pub const RANDOMISE: &str = "Randomise";
pub const SHUTDOWN_OPTIONS: [&str; 2] = ["Cancel", SHUT_DOWN];

const TEXT_X: i32 = 2;
const TEXT_MARGIN: i32 = 5;
const MENU_ARROW_WIDTH: i32 = 10;
const MENU_ITEM_HEIGHT: i32 = 12;

/// Width available to the main screen's two text lines.
pub const MAIN_TEXT_WIDTH: i32 = WIDTH as i32 - TEXT_MARGIN;
/// Width available to the highlighted menu row.
pub const MENU_TEXT_WIDTH: i32 = WIDTH as i32 - MENU_ARROW_WIDTH - TEXT_MARGIN;

const SHUTDOWN_BACKLIGHT: Color = Color::new(0xdd, 0xcc, 0xcc);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetMenuSource {
    Main,
    InstrumentMenu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Main,
    ControlMenu,
    InstrumentMenu,
    PresetMenu {
        instrument: String,
        source: PresetMenuSource,
    },
    ShutdownConfirm,
}

/// Lines that may need a marquee on the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrollingLines {
    /// Instrument line on the main screen.
    pub top: Option<String>,
    /// Preset line on the main screen, or the highlighted menu row.
    pub focus: Option<String>,
}

/// Button handling and drawing for the panel, independent of the hardware.
pub struct HatApp {
    screen: Screen,
    loading_message: String,
    control_menu: ListSelector,
    instrument_menu: ListSelector,
    preset_menu: ListSelector,
    shutdown_menu: ListSelector,
    held: HeldCounter,
    suppression: ButtonSuppression,
    ignore_next_enter_release: bool,
}

impl HatApp {
    pub fn new() -> Self {
        Self {
            screen: Screen::Loading,
            loading_message: "Loading...".to_string(),
            control_menu: ListSelector::new(0, Bounds::Wrap),
            instrument_menu: ListSelector::new(0, Bounds::Wrap),
            preset_menu: ListSelector::new(0, Bounds::Wrap),
            shutdown_menu: ListSelector::new(0, Bounds::Wrap),
            held: HeldCounter::default(),
            suppression: ButtonSuppression::default(),
            ignore_next_enter_release: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn loading_message(&self) -> &str {
        &self.loading_message
    }

    pub fn set_loading_message(&mut self, message: &str) {
        self.loading_message = message.to_string();
    }

    pub fn enter_main(&mut self) {
        self.go(Screen::Main);
    }

    /// Index of the highlighted row on the current menu screen.
    pub fn highlighted(&self) -> Option<usize> {
        self.menu_selector().map(|menu| menu.selected)
    }

    fn go(&mut self, screen: Screen) {
        log::debug!(target: "hat", "screen {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
        self.held.reset_all();
    }

    fn menu_selector(&self) -> Option<&ListSelector> {
        match self.screen {
            Screen::ControlMenu => Some(&self.control_menu),
            Screen::InstrumentMenu => Some(&self.instrument_menu),
            Screen::PresetMenu { .. } => Some(&self.preset_menu),
            Screen::ShutdownConfirm => Some(&self.shutdown_menu),
            Screen::Loading | Screen::Main => None,
        }
    }

    fn menu_selector_mut(&mut self) -> Option<&mut ListSelector> {
        match self.screen {
            Screen::ControlMenu => Some(&mut self.control_menu),
            Screen::InstrumentMenu => Some(&mut self.instrument_menu),
            Screen::PresetMenu { .. } => Some(&mut self.preset_menu),
            Screen::ShutdownConfirm => Some(&mut self.shutdown_menu),
            Screen::Loading | Screen::Main => None,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.screen {
            Screen::ControlMenu => "Menu:",
            Screen::InstrumentMenu => "Select Instrument:",
            Screen::PresetMenu { .. } => "Select Preset:",
            Screen::ShutdownConfirm => "Shut down?",
            Screen::Loading | Screen::Main => "",
        }
    }

    /// Labels of the current menu screen, empty elsewhere.
    pub fn menu_options(&self, api: &dyn ClientApi) -> Vec<String> {
        match &self.screen {
            Screen::ControlMenu => CONTROL_MENU_OPTIONS.iter().map(|s| s.to_string()).collect(),
            Screen::InstrumentMenu => api
                .get_instruments()
                .iter()
                .map(|i| i.name.clone())
                .chain(std::iter::once(SHUT_DOWN.to_string()))
                .collect(),
            Screen::PresetMenu { instrument, .. } => api
                .get_presets(instrument)
                .iter()
                .map(|p| p.display_name.clone())
                .chain(std::iter::once(RANDOMISE.to_string()))
                .collect(),
            Screen::ShutdownConfirm => SHUTDOWN_OPTIONS.iter().map(|s| s.to_string()).collect(),
            Screen::Loading | Screen::Main => Vec::new(),
        }
    }

    pub fn handle(
        &mut self,
        api: &mut dyn ClientApi,
        button: Button,
        event: ButtonEvent,
        now: Instant,
    ) {
        match self.screen {
            Screen::Loading => {}
            Screen::Main => self.handle_main(api, button, event, now),
            _ => self.handle_menu(api, button, event, now),
        }
    }

    fn handle_main(&mut self, api: &mut dyn ClientApi, button: Button, event: ButtonEvent, now: Instant) {
        match event {
            ButtonEvent::Press => {
                self.held.reset(button);
                self.navigate_main(api, button, now);
            }
            ButtonEvent::Held => {
                if !self.held.held(button) {
                    return;
                }
                if button == Button::Enter {
                    let instrument = api.get_current_instrument().name.clone();
                    self.open_preset_menu(api, &instrument, PresetMenuSource::Main);
                } else {
                    self.navigate_main(api, button, now);
                }
            }
            ButtonEvent::Release => {
                if button == Button::Enter {
                    if self.suppression.allow_action(now) {
                        self.go(Screen::ControlMenu);
                    }
                } else {
                    self.held.reset(button);
                }
            }
        }
    }

    fn navigate_main(&mut self, api: &mut dyn ClientApi, button: Button, now: Instant) {
        match button {
            Button::Down => api.set_preset_next(),
            Button::Up => api.set_preset_prev(),
            Button::Left => api.set_instrument_prev(),
            Button::Right => api.set_instrument_next(),
            Button::Back | Button::Enter => return,
        }
        self.suppression.record(now);
    }

    fn handle_menu(&mut self, api: &mut dyn ClientApi, button: Button, event: ButtonEvent, now: Instant) {
        match event {
            ButtonEvent::Press => {
                if button == Button::Back {
                    self.back();
                    return;
                }
                self.held.reset(button);
                self.move_highlight(api, button, now);
            }
            ButtonEvent::Held => {
                if button == Button::Enter {
                    if self.screen == Screen::InstrumentMenu {
                        self.open_highlighted_instrument_presets(api);
                    }
                } else if self.held.held(button) {
                    self.move_highlight(api, button, now);
                }
            }
            ButtonEvent::Release => {
                if button != Button::Enter {
                    self.held.reset(button);
                    return;
                }
                if self.ignore_next_enter_release {
                    self.ignore_next_enter_release = false;
                    return;
                }
                if self.suppression.allow_action(now) {
                    self.trigger(api);
                }
            }
        }
    }

    fn move_highlight(&mut self, api: &dyn ClientApi, button: Button, now: Instant) {
        let len = self.menu_options(api).len();
        let Some(menu) = self.menu_selector_mut() else {
            return;
        };
        match button {
            Button::Up | Button::Left => menu.select_prev(len),
            Button::Down | Button::Right => menu.select_next(len),
            Button::Back | Button::Enter => return,
        }
        self.suppression.record(now);
    }

    /// Return to the parent screen without touching the selection.
    fn back(&mut self) {
        let parent = match &self.screen {
            Screen::ControlMenu => Screen::Main,
            Screen::InstrumentMenu => Screen::ControlMenu,
            Screen::PresetMenu { source, .. } => match source {
                PresetMenuSource::Main => Screen::Main,
                PresetMenuSource::InstrumentMenu => Screen::InstrumentMenu,
            },
            Screen::ShutdownConfirm => Screen::InstrumentMenu,
            Screen::Loading | Screen::Main => return,
        };
        self.ignore_next_enter_release = false;
        self.go(parent);
    }

    fn trigger(&mut self, api: &mut dyn ClientApi) {
        let Some(index) = self.highlighted() else {
            return;
        };
        match self.screen.clone() {
            Screen::ControlMenu => match index {
                0 => self.open_instrument_menu(api),
                1 => {
                    api.randomize_current_preset();
                    self.go(Screen::Main);
                }
                _ => {
                    api.randomize_all();
                    self.go(Screen::Main);
                }
            },
            Screen::InstrumentMenu => {
                let name = api.get_instruments().get(index).map(|i| i.name.clone());
                match name {
                    Some(name) => {
                        api.set_instrument(&name);
                        self.go(Screen::Main);
                    }
                    None => {
                        self.shutdown_menu.reset();
                        self.go(Screen::ShutdownConfirm);
                    }
                }
            }
            Screen::PresetMenu { instrument, .. } => {
                let preset = api.get_presets(&instrument).get(index).map(|p| p.name.clone());
                match preset {
                    Some(preset) => api.set_preset(&instrument, &preset),
                    None => self.randomise_instrument(api, &instrument),
                }
                self.go(Screen::Main);
            }
            Screen::ShutdownConfirm => {
                if SHUTDOWN_OPTIONS.get(index) == Some(&SHUT_DOWN) {
                    log::info!(target: "hat", "shutdown confirmed");
                    api.shutdown_device();
                } else {
                    self.go(Screen::InstrumentMenu);
                }
            }
            Screen::Loading | Screen::Main => {}
        }
    }

    /// Randomise from a preset menu. Browsing another instrument switches to
    /// its first preset first.
    fn randomise_instrument(&mut self, api: &mut dyn ClientApi, instrument: &str) {
        if api.get_current_instrument().name != instrument {
            let first = api.get_presets(instrument).first().map(|p| p.name.clone());
            if let Some(first) = first {
                api.set_preset(instrument, &first);
            }
        }
        api.randomize_current_preset();
    }

    fn open_instrument_menu(&mut self, api: &dyn ClientApi) {
        let current = &api.get_current_instrument().name;
        let index = api
            .get_instruments()
            .iter()
            .position(|i| &i.name == current)
            .unwrap_or(0);
        self.instrument_menu = ListSelector::new(index, Bounds::Wrap);
        self.go(Screen::InstrumentMenu);
    }

    fn open_highlighted_instrument_presets(&mut self, api: &dyn ClientApi) {
        let name = api
            .get_instruments()
            .get(self.instrument_menu.selected)
            .map(|i| i.name.clone());
        if let Some(name) = name {
            self.open_preset_menu(api, &name, PresetMenuSource::InstrumentMenu);
        }
    }

    /// Opened by a long Enter press, so the Enter release that follows is
    /// swallowed.
    fn open_preset_menu(&mut self, api: &dyn ClientApi, instrument: &str, source: PresetMenuSource) {
        let index = if api.get_current_instrument().name == instrument {
            let current = &api.get_current_preset().name;
            api.get_presets(instrument)
                .iter()
                .position(|p| &p.name == current)
                .unwrap_or(0)
        } else {
            0
        };
        self.preset_menu = ListSelector::new(index, Bounds::Wrap);
        self.ignore_next_enter_release = true;
        self.go(Screen::PresetMenu {
            instrument: instrument.to_string(),
            source,
        });
    }

    pub fn scrolling_lines(&self, api: Option<&dyn ClientApi>) -> ScrollingLines {
        let Some(api) = api else {
            return ScrollingLines::default();
        };
        match self.screen {
            Screen::Loading => ScrollingLines::default(),
            Screen::Main => ScrollingLines {
                top: Some(api.get_current_instrument().name.clone()),
                focus: Some(api.get_current_preset().display_name.clone()),
            },
            _ => ScrollingLines {
                top: None,
                focus: self
                    .highlighted()
                    .and_then(|i| self.menu_options(api).get(i).cloned()),
            },
        }
    }

    pub fn backlight(&self, api: Option<&dyn ClientApi>) -> Backlight {
        match (&self.screen, api) {
            (Screen::Main, Some(api)) => {
                let instrument = api.get_current_instrument();
                let primary = Color::from_hex(&instrument.background_primary).unwrap_or(Color::BLACK);
                let secondary =
                    Color::from_hex(&instrument.background_secondary).unwrap_or(Color::BLACK);
                let mut leds = [primary; LED_COUNT];
                leds[0] = secondary;
                leds[LED_COUNT - 1] = secondary;
                leds
            }
            (Screen::ShutdownConfirm, Some(_)) => [SHUTDOWN_BACKLIGHT; LED_COUNT],
            (Screen::Loading, _) | (_, None) => [Color::BLUE; LED_COUNT],
            (_, Some(_)) => [Color::MENU_BACKLIGHT; LED_COUNT],
        }
    }

    /// Draw the current screen. `top_offset` and `focus_offset` are the marquee
    /// positions of the lines from `scrolling_lines`.
    pub fn render(
        &self,
        api: Option<&dyn ClientApi>,
        frame: &mut HatFrame,
        top_offset: i32,
        focus_offset: i32,
    ) {
        frame.clear_all();
        let api = match (&self.screen, api) {
            (Screen::Loading, _) | (_, None) => {
                self.render_loading(frame);
                return;
            }
            (_, Some(api)) => api,
        };
        if self.screen == Screen::Main {
            let instrument = &api.get_current_instrument().name;
            let preset = &api.get_current_preset().display_name;
            frame.marquee_text(instrument, TEXT_X, 0, top_offset, WRAP_GAP, false);
            let preset_y = (HEIGHT as i32 - 10) / 2;
            frame.marquee_text(preset, TEXT_X, preset_y, focus_offset, WRAP_GAP, false);
        } else {
            self.render_menu(api, frame, focus_offset);
        }
    }

    fn render_loading(&self, frame: &mut HatFrame) {
        let y = (HEIGHT as i32 - 10) / 2;
        frame.text(&self.loading_message, TEXT_X, y, false);
    }

    /// The highlighted row sits at mid-height; the heading and the other rows
    /// scroll with it.
    fn render_menu(&self, api: &dyn ClientApi, frame: &mut HatFrame, focus_offset: i32) {
        let options = self.menu_options(api);
        let highlighted = self.highlighted().unwrap_or(0);
        let offset_top = i32::try_from(highlighted).unwrap_or(0) * MENU_ITEM_HEIGHT;
        let centre = HEIGHT as i32 / 2 - 4;

        frame.text(self.heading(), MENU_ARROW_WIDTH, centre - MENU_ITEM_HEIGHT - offset_top, false);

        for (index, option) in options.iter().enumerate() {
            let y = i32::try_from(index).unwrap_or(0) * MENU_ITEM_HEIGHT + centre - offset_top;
            if !(-MENU_ITEM_HEIGHT..HEIGHT as i32).contains(&y) {
                continue;
            }
            if index == highlighted {
                frame.fill_rect(MENU_ARROW_WIDTH - 2, y - 1, WIDTH as u32, 12);
                frame.marquee_text(option, MENU_ARROW_WIDTH, y, focus_offset, WRAP_GAP, true);
            } else {
                frame.text(option, MENU_ARROW_WIDTH, y, false);
            }
        }
        frame.text(">", 0, centre, false);
    }
}

impl Default for HatApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ApiCall, FakeApi};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::Button::*;
    use super::ButtonEvent::*;

    struct Rig {
        app: HatApp,
        api: FakeApi,
        now: Instant,
    }

    impl Rig {
        fn new() -> Self {
            let mut app = HatApp::new();
            app.enter_main();
            Self {
                app,
                api: FakeApi::new(),
                now: Instant::now(),
            }
        }

        /// Send events 500 ms apart, outside the suppression window.
        fn send(&mut self, events: &[(Button, ButtonEvent)]) {
            for &(button, event) in events {
                self.now += Duration::from_millis(500);
                self.app.handle(&mut self.api, button, event, self.now);
            }
        }

        fn send_quickly(&mut self, events: &[(Button, ButtonEvent)]) {
            for &(button, event) in events {
                self.now += Duration::from_millis(50);
                self.app.handle(&mut self.api, button, event, self.now);
            }
        }

        fn click(&mut self, button: Button) {
            self.send(&[(button, Press), (button, Release)]);
        }

        fn long_enter(&mut self) {
            self.send(&[(Enter, Press), (Enter, Held), (Enter, Held), (Enter, Release)]);
        }

        fn options(&self) -> Vec<String> {
            self.app.menu_options(&self.api)
        }
    }

    #[test]
    fn loading_screen_ignores_buttons() {
        let mut app = HatApp::new();
        let mut api = FakeApi::new();
        app.handle(&mut api, Down, Press, Instant::now());
        assert_eq!(app.screen(), &Screen::Loading);
        assert!(api.calls.is_empty());
    }

    #[test]
    fn main_navigation_maps_buttons() {
        let mut rig = Rig::new();
        rig.click(Down);
        rig.click(Up);
        rig.click(Right);
        rig.click(Left);
        assert_eq!(
            rig.api.calls,
            vec![
                ApiCall::PresetNext,
                ApiCall::PresetPrev,
                ApiCall::InstrumentNext,
                ApiCall::InstrumentPrev,
            ]
        );
    }

    #[test]
    fn held_navigation_repeats_from_second_held() {
        let mut rig = Rig::new();
        rig.send(&[(Down, Press), (Down, Held), (Down, Held), (Down, Held), (Down, Release)]);
        assert_eq!(rig.api.calls, vec![ApiCall::PresetNext; 3]);
    }

    #[test]
    fn enter_release_opens_control_menu() {
        let mut rig = Rig::new();
        rig.click(Enter);
        assert_eq!(rig.app.screen(), &Screen::ControlMenu);
        assert_eq!(rig.options(), CONTROL_MENU_OPTIONS.to_vec());
    }

    #[test]
    fn enter_right_after_navigation_is_suppressed() {
        let mut rig = Rig::new();
        rig.send_quickly(&[(Down, Press), (Down, Release), (Enter, Press), (Enter, Release)]);
        assert_eq!(rig.app.screen(), &Screen::Main);
        assert_eq!(rig.api.calls, vec![ApiCall::PresetNext]);
    }

    #[test]
    fn long_enter_opens_preset_menu_and_swallows_release() {
        let mut rig = Rig::new();
        rig.click(Down);
        rig.api.take_calls();

        rig.long_enter();
        assert_eq!(
            rig.app.screen(),
            &Screen::PresetMenu {
                instrument: "D4 Grand Piano".into(),
                source: PresetMenuSource::Main,
            }
        );
        assert_eq!(rig.app.highlighted(), Some(1));
        assert_eq!(rig.options(), vec!["Prelude", "Concert", "Jazz", RANDOMISE]);
        assert!(rig.api.calls.is_empty());

        rig.click(Down);
        rig.click(Enter);
        assert_eq!(
            rig.api.calls,
            vec![ApiCall::SetPreset("D4 Grand Piano".into(), "D4 Grand Piano Jazz".into())]
        );
        assert_eq!(rig.app.screen(), &Screen::Main);
    }

    #[test]
    fn menu_highlight_wraps() {
        let mut rig = Rig::new();
        rig.click(Enter);
        rig.click(Up);
        assert_eq!(rig.app.highlighted(), Some(2));
        rig.click(Right);
        assert_eq!(rig.app.highlighted(), Some(0));
        rig.send(&[(Down, Press), (Down, Held), (Down, Held)]);
        assert_eq!(rig.app.highlighted(), Some(2));
    }

    #[test]
    fn back_returns_to_parent_without_mutation() {
        let mut rig = Rig::new();
        rig.click(Enter);
        rig.click(Enter);
        assert_eq!(rig.app.screen(), &Screen::InstrumentMenu);
        rig.click(Down);
        rig.click(Back);
        assert_eq!(rig.app.screen(), &Screen::ControlMenu);
        rig.click(Back);
        assert_eq!(rig.app.screen(), &Screen::Main);
        assert!(rig.api.calls.is_empty());
    }

    #[test]
    fn instrument_menu_selects_and_returns_to_main() {
        let mut rig = Rig::new();
        rig.click(Enter);
        rig.click(Enter);
        assert_eq!(rig.app.highlighted(), Some(0));
        assert_eq!(
            rig.options(),
            vec!["D4 Grand Piano", "Vintage Tines", "Celesta", SHUT_DOWN]
        );
        rig.click(Down);
        rig.click(Enter);
        assert_eq!(rig.api.calls, vec![ApiCall::SetInstrument("Vintage Tines".into())]);
        assert_eq!(rig.app.screen(), &Screen::Main);
    }

    #[test]
    fn held_enter_in_instrument_menu_browses_that_instrument() {
        let mut rig = Rig::new();
        rig.click(Enter);
        rig.click(Enter);
        rig.click(Down);
        rig.long_enter();
        assert_eq!(
            rig.app.screen(),
            &Screen::PresetMenu {
                instrument: "Vintage Tines".into(),
                source: PresetMenuSource::InstrumentMenu,
            }
        );
        assert_eq!(rig.app.highlighted(), Some(0));

        rig.click(Back);
        assert_eq!(rig.app.screen(), &Screen::InstrumentMenu);
        assert!(rig.api.calls.is_empty());
    }

    #[test]
    fn randomise_on_other_instrument_selects_its_first_preset() {
        let mut rig = Rig::new();
        rig.click(Enter);
        rig.click(Enter);
        rig.click(Down);
        rig.long_enter();
        rig.click(Up);
        rig.click(Enter);
        assert_eq!(
            rig.api.calls,
            vec![
                ApiCall::SetPreset("Vintage Tines".into(), "Vintage Tines MKI".into()),
                ApiCall::RandomizeCurrent,
            ]
        );
        assert_eq!(rig.app.screen(), &Screen::Main);
    }

    #[test]
    fn control_menu_randomize_options() {
        let mut rig = Rig::new();
        rig.click(Enter);
        rig.click(Down);
        rig.click(Enter);
        assert_eq!(rig.app.screen(), &Screen::Main);
        rig.click(Enter);
        rig.click(Down);
        rig.click(Enter);
        assert_eq!(rig.api.calls, vec![ApiCall::RandomizeCurrent, ApiCall::RandomizeAll]);
    }

    #[test]
    fn shutdown_needs_confirmation() {
        let mut rig = Rig::new();
        let exited = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&exited);
        rig.api
            .set_on_exit(Box::new(move || flag.store(true, Ordering::SeqCst)));

        rig.click(Enter);
        rig.click(Enter);
        rig.click(Up);
        rig.click(Enter);
        assert_eq!(rig.app.screen(), &Screen::ShutdownConfirm);
        assert_eq!(rig.app.highlighted(), Some(0));

        rig.click(Enter);
        assert_eq!(rig.app.screen(), &Screen::InstrumentMenu);
        assert!(rig.api.calls.is_empty());

        rig.click(Enter);
        rig.click(Down);
        rig.click(Enter);
        assert_eq!(rig.api.calls, vec![ApiCall::Shutdown]);
        assert!(exited.load(Ordering::SeqCst));
    }

    #[test]
    fn backlight_follows_screen() {
        let mut rig = Rig::new();
        let leds = rig.app.backlight(Some(&rig.api));
        let primary = Color::from_hex("#af2523").unwrap();
        let secondary = Color::from_hex("#4e0e0e").unwrap();
        assert_eq!(leds, [secondary, primary, primary, primary, primary, secondary]);

        rig.click(Enter);
        assert_eq!(rig.app.backlight(Some(&rig.api)), [Color::MENU_BACKLIGHT; 6]);
        assert_eq!(HatApp::new().backlight(None), [Color::BLUE; 6]);
    }

    #[test]
    fn scrolling_lines_follow_focus() {
        let mut rig = Rig::new();
        let lines = rig.app.scrolling_lines(Some(&rig.api));
        assert_eq!(lines.top.as_deref(), Some("D4 Grand Piano"));
        assert_eq!(lines.focus.as_deref(), Some("Prelude"));

        rig.click(Enter);
        rig.click(Down);
        let lines = rig.app.scrolling_lines(Some(&rig.api));
        assert_eq!(lines.top, None);
        assert_eq!(lines.focus.as_deref(), Some("Randomize Preset"));
    }

    #[test]
    fn every_screen_draws_something() {
        let mut rig = Rig::new();
        let mut frame = HatFrame::new();
        rig.app.render(Some(&rig.api), &mut frame, 0, 0);
        assert!(frame.lit_pixels() > 0);

        rig.click(Enter);
        let mut menu_frame = HatFrame::new();
        rig.app.render(Some(&rig.api), &mut menu_frame, 0, 0);
        assert!(menu_frame.lit_pixels() > 0);
        assert_ne!(frame, menu_frame);

        let mut loading = HatFrame::new();
        HatApp::new().render(None, &mut loading, 0, 0);
        assert!(loading.lit_pixels() > 0);
    }
}
