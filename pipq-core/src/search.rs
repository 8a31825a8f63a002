//! Incremental search over instruments and presets.

use pipq_types::Instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchContext {
    Instrument,
    /// Presets of one instrument.
    Preset(String),
    Combined,
}

/// What selecting a search result does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    SetInstrument(String),
    SetPreset { instrument: String, preset: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchItem {
    pub label: String,
    pub action: SearchAction,
}

/// Case-insensitive substring filter, refreshed on every query change.
#[derive(Debug, Default)]
pub struct SearchManager {
    query: String,
    context: Option<SearchContext>,
    results: Vec<SearchItem>,
}

impl SearchManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, context: SearchContext, instruments: &[Instrument]) {
        self.context = Some(context);
        self.query.clear();
        self.refresh(instruments);
    }

    pub fn exit(&mut self) {
        self.context = None;
        self.query.clear();
        self.results.clear();
    }

    pub fn is_active(&self) -> bool {
        self.context.is_some()
    }

    pub fn context(&self) -> Option<&SearchContext> {
        self.context.as_ref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str, instruments: &[Instrument]) {
        self.query = query.to_string();
        self.refresh(instruments);
    }

    pub fn push_char(&mut self, c: char, instruments: &[Instrument]) {
        self.query.push(c);
        self.refresh(instruments);
    }

    /// Delete the last character. Returns `false` when the query was already empty.
    pub fn pop_char(&mut self, instruments: &[Instrument]) -> bool {
        if self.query.pop().is_none() {
            return false;
        }
        self.refresh(instruments);
        true
    }

    pub fn results(&self) -> &[SearchItem] {
        &self.results
    }

    pub fn action(&self, index: usize) -> Option<&SearchAction> {
        self.results.get(index).map(|item| &item.action)
    }

    fn refresh(&mut self, instruments: &[Instrument]) {
        let Some(context) = &self.context else {
            self.results.clear();
            return;
        };
        let query = self.query.to_lowercase();
        self.results = candidates(context, instruments)
            .into_iter()
            .filter(|item| query.is_empty() || item.label.to_lowercase().contains(&query))
            .collect();
    }
}

fn instrument_item(instrument: &Instrument) -> SearchItem {
    SearchItem {
        label: instrument.name.clone(),
        action: SearchAction::SetInstrument(instrument.name.clone()),
    }
}

fn candidates(context: &SearchContext, instruments: &[Instrument]) -> Vec<SearchItem> {
    match context {
        SearchContext::Instrument => instruments.iter().map(instrument_item).collect(),
        SearchContext::Preset(name) => instruments
            .iter()
            .filter(|i| &i.name == name)
            .flat_map(|i| {
                i.presets.iter().map(move |p| SearchItem {
                    label: p.display_name.clone(),
                    action: SearchAction::SetPreset {
                        instrument: i.name.clone(),
                        preset: p.name.clone(),
                    },
                })
            })
            .collect(),
        SearchContext::Combined => {
            let mut items: Vec<SearchItem> = instruments.iter().map(instrument_item).collect();
            for i in instruments {
                items.extend(i.presets.iter().map(|p| SearchItem {
                    label: format!("{} ({})", p.display_name, i.name),
                    action: SearchAction::SetPreset {
                        instrument: i.name.clone(),
                        preset: p.name.clone(),
                    },
                }));
            }
            items
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::tests::sample_library;

    #[test]
    fn instrument_search_filters_case_insensitively() {
        let lib = sample_library();
        let mut search = SearchManager::new();
        search.enter(SearchContext::Instrument, lib.get_instruments());
        assert_eq!(search.results().len(), 2);

        search.set_query("mk", lib.get_instruments());
        assert_eq!(search.results().len(), 1);
        assert_eq!(
            search.action(0),
            Some(&SearchAction::SetInstrument("MKI".into()))
        );
        assert_eq!(search.action(1), None);
    }

    #[test]
    fn preset_search_stays_in_instrument() {
        let lib = sample_library();
        let mut search = SearchManager::new();
        search.enter(SearchContext::Preset("K2".into()), lib.get_instruments());
        assert_eq!(search.results().len(), 2);

        search.push_char('s', lib.get_instruments());
        search.push_char('O', lib.get_instruments());
        assert_eq!(search.results().len(), 1);
        assert_eq!(
            search.action(0),
            Some(&SearchAction::SetPreset {
                instrument: "K2".into(),
                preset: "K2 Soft".into()
            })
        );
    }

    #[test]
    fn combined_search_labels_presets_with_instrument() {
        let lib = sample_library();
        let mut search = SearchManager::new();
        search.enter(SearchContext::Combined, lib.get_instruments());
        assert_eq!(search.results().len(), 5);

        search.set_query("warm", lib.get_instruments());
        assert_eq!(search.results()[0].label, "MKI Warm (MKI)");
    }

    #[test]
    fn backspace_on_empty_query_reports_false() {
        let lib = sample_library();
        let mut search = SearchManager::new();
        search.enter(SearchContext::Combined, lib.get_instruments());
        search.push_char('x', lib.get_instruments());
        assert!(search.results().is_empty());

        assert!(search.pop_char(lib.get_instruments()));
        assert_eq!(search.results().len(), 5);
        assert!(!search.pop_char(lib.get_instruments()));

        search.exit();
        assert!(!search.is_active());
        assert!(search.results().is_empty());
    }
}
