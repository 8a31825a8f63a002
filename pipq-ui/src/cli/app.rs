use pipq_core::search::{SearchAction, SearchContext, SearchManager};
use pipq_types::ClientApi;

use crate::ui::{Bounds, InputEvent, KeyCode, ListSelector};

/// What the terminal client is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Loading,
    Normal,
    InstrumentMenu,
    PresetMenu {
        instrument: String,
        from_instrument_menu: bool,
    },
    Search {
        context: SearchContext,
    },
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Key handling for the terminal client, independent of the terminal.
pub struct CliApp {
    mode: Mode,
    menu: ListSelector,
    search: SearchManager,
    loading_message: String,
    modified: bool,
}

impl CliApp {
    pub fn new() -> Self {
        Self {
            mode: Mode::Loading,
            menu: ListSelector::new(0, Bounds::Clamp),
            search: SearchManager::new(),
            loading_message: "Initializing...".to_string(),
            modified: false,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn menu(&self) -> &ListSelector {
        &self.menu
    }

    pub(crate) fn menu_mut(&mut self) -> &mut ListSelector {
        &mut self.menu
    }

    pub fn search(&self) -> &SearchManager {
        &self.search
    }

    pub fn loading_message(&self) -> &str {
        &self.loading_message
    }

    pub fn set_loading_message(&mut self, message: &str) {
        self.loading_message = message.to_string();
    }

    /// Leave the loading screen once the API is available.
    pub fn enter_normal(&mut self) {
        self.mode = Mode::Normal;
    }

    /// Whether the engine reports unsaved parameter edits on the loaded preset.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn title(&self) -> String {
        match &self.mode {
            Mode::Loading => "Pi-Pianoteq".to_string(),
            Mode::Normal => "Pi-Pianoteq CLI".to_string(),
            Mode::InstrumentMenu => "Select Instrument".to_string(),
            Mode::PresetMenu { instrument, .. } => format!("Select Preset - {}", instrument),
            Mode::Search { context } => match context {
                SearchContext::Instrument => "Search Instruments".to_string(),
                SearchContext::Preset(instrument) => format!("Search Presets - {}", instrument),
                SearchContext::Combined => "Search Instruments & Presets".to_string(),
            },
            Mode::Logs => "View Logs".to_string(),
        }
    }

    /// Number of rows in the list the current mode navigates.
    pub fn menu_len(&self, api: &dyn ClientApi) -> usize {
        match &self.mode {
            Mode::InstrumentMenu => api.get_instruments().len(),
            Mode::PresetMenu { instrument, .. } => api.get_presets(instrument).len(),
            Mode::Search { .. } => self.search.results().len(),
            _ => 0,
        }
    }

    pub fn handle_key(&mut self, api: &mut dyn ClientApi, event: &InputEvent) -> Flow {
        if event.is_ctrl('c') {
            return Flow::Quit;
        }
        match self.mode.clone() {
            Mode::Loading => Flow::Continue,
            Mode::Normal => self.handle_normal(api, event),
            Mode::InstrumentMenu => {
                self.handle_instrument_menu(api, event);
                Flow::Continue
            }
            Mode::PresetMenu {
                instrument,
                from_instrument_menu,
            } => {
                self.handle_preset_menu(api, event, &instrument, from_instrument_menu);
                Flow::Continue
            }
            Mode::Search { .. } => {
                self.handle_search(api, event);
                Flow::Continue
            }
            Mode::Logs => {
                if is_exit(event) {
                    self.mode = Mode::Normal;
                }
                Flow::Continue
            }
        }
    }

    fn handle_normal(&mut self, api: &mut dyn ClientApi, event: &InputEvent) -> Flow {
        if is_up(event) {
            api.set_preset_prev();
            self.modified = false;
        } else if is_down(event) {
            api.set_preset_next();
            self.modified = false;
        } else if event.key == KeyCode::Left || event.is_ctrl('b') {
            api.set_instrument_prev();
            self.modified = false;
        } else if event.key == KeyCode::Right || event.is_ctrl('f') {
            api.set_instrument_next();
            self.modified = false;
        } else if event.is_char('i') {
            self.open_instrument_menu(api);
        } else if event.is_char('p') {
            let current = api.get_current_instrument().name.clone();
            self.open_preset_menu(api, &current, false);
        } else if event.is_char('/') {
            self.open_search(api, SearchContext::Combined);
        } else if event.is_char('r') {
            api.randomize_current_preset();
        } else if event.is_char('R') {
            api.randomize_all();
            self.modified = false;
        } else if event.is_char('l') {
            self.mode = Mode::Logs;
        } else if event.is_char('q') {
            return Flow::Quit;
        }
        Flow::Continue
    }

    fn handle_instrument_menu(&mut self, api: &mut dyn ClientApi, event: &InputEvent) {
        let len = self.menu_len(api);
        if is_up(event) {
            self.menu.select_prev(len);
        } else if is_down(event) {
            self.menu.select_next(len);
        } else if event.key == KeyCode::Enter {
            if let Some(name) = self.highlighted_instrument(api) {
                api.set_instrument(&name);
                self.modified = false;
            }
            self.mode = Mode::Normal;
        } else if event.is_char('p') {
            if let Some(name) = self.highlighted_instrument(api) {
                self.open_preset_menu(api, &name, true);
            }
        } else if event.is_char('/') {
            self.open_search(api, SearchContext::Instrument);
        } else if is_exit(event) {
            self.mode = Mode::Normal;
        }
    }

    fn handle_preset_menu(
        &mut self,
        api: &mut dyn ClientApi,
        event: &InputEvent,
        instrument: &str,
        from_instrument_menu: bool,
    ) {
        let len = self.menu_len(api);
        if is_up(event) {
            self.menu.select_prev(len);
        } else if is_down(event) {
            self.menu.select_next(len);
        } else if event.key == KeyCode::Enter {
            let preset = api
                .get_presets(instrument)
                .get(self.menu.selected)
                .map(|p| p.name.clone());
            if let Some(preset) = preset {
                api.set_preset(instrument, &preset);
                self.modified = false;
            }
            self.mode = Mode::Normal;
        } else if event.is_char('/') {
            self.open_search(api, SearchContext::Preset(instrument.to_string()));
        } else if is_exit(event) {
            if from_instrument_menu {
                self.mode = Mode::InstrumentMenu;
                let index = api
                    .get_instruments()
                    .iter()
                    .position(|i| i.name == instrument)
                    .unwrap_or(0);
                self.menu = ListSelector::new(index, Bounds::Clamp);
            } else {
                self.mode = Mode::Normal;
            }
        }
    }

    fn handle_search(&mut self, api: &mut dyn ClientApi, event: &InputEvent) {
        let len = self.menu_len(api);
        match event.key {
            KeyCode::Up => self.menu.select_prev(len),
            KeyCode::Down => self.menu.select_next(len),
            KeyCode::Char('p') if event.modifiers.ctrl => self.menu.select_prev(len),
            KeyCode::Char('n') if event.modifiers.ctrl => self.menu.select_next(len),
            KeyCode::Escape => self.close_search(),
            KeyCode::Backspace => {
                if self.search.pop_char(api.get_instruments()) {
                    self.menu.reset();
                } else {
                    self.close_search();
                }
            }
            KeyCode::Enter => {
                if let Some(action) = self.search.action(self.menu.selected).cloned() {
                    match action {
                        SearchAction::SetInstrument(name) => api.set_instrument(&name),
                        SearchAction::SetPreset { instrument, preset } => {
                            api.set_preset(&instrument, &preset)
                        }
                    }
                    self.modified = false;
                    self.close_search();
                }
            }
            _ => {
                if let Some(c) = event.typed_char() {
                    self.search.push_char(c, api.get_instruments());
                    self.menu.reset();
                }
            }
        }
    }

    fn open_instrument_menu(&mut self, api: &dyn ClientApi) {
        let current = &api.get_current_instrument().name;
        let index = api
            .get_instruments()
            .iter()
            .position(|i| &i.name == current)
            .unwrap_or(0);
        self.menu = ListSelector::new(index, Bounds::Clamp);
        self.mode = Mode::InstrumentMenu;
    }

    /// The loaded preset is pre-highlighted only when browsing the current
    /// instrument.
    fn open_preset_menu(&mut self, api: &dyn ClientApi, instrument: &str, from_instrument_menu: bool) {
        let index = if api.get_current_instrument().name == instrument {
            let current = &api.get_current_preset().name;
            api.get_presets(instrument)
                .iter()
                .position(|p| &p.name == current)
                .unwrap_or(0)
        } else {
            0
        };
        self.menu = ListSelector::new(index, Bounds::Clamp);
        self.mode = Mode::PresetMenu {
            instrument: instrument.to_string(),
            from_instrument_menu,
        };
    }

    fn open_search(&mut self, api: &dyn ClientApi, context: SearchContext) {
        self.search.enter(context.clone(), api.get_instruments());
        self.menu = ListSelector::new(0, Bounds::Clamp);
        self.mode = Mode::Search { context };
    }

    fn close_search(&mut self) {
        self.search.exit();
        self.menu.reset();
        self.mode = Mode::Normal;
    }

    fn highlighted_instrument(&self, api: &dyn ClientApi) -> Option<String> {
        api.get_instruments()
            .get(self.menu.selected)
            .map(|i| i.name.clone())
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

fn is_up(event: &InputEvent) -> bool {
    event.key == KeyCode::Up || event.is_ctrl('p')
}

fn is_down(event: &InputEvent) -> bool {
    event.key == KeyCode::Down || event.is_ctrl('n')
}

fn is_exit(event: &InputEvent) -> bool {
    event.key == KeyCode::Escape || event.is_char('q')
}
