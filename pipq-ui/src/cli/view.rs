use pipq_core::search::{SearchAction, SearchContext};
use pipq_types::ClientApi;

use super::app::{CliApp, Mode};
use crate::logging::LogBuffer;
use crate::ui::style::selected_style;
use crate::ui::{Color, Rect, RenderBuf, Style};

/// Longest name shown in a list row.
const MAX_ROW_CHARS: usize = 58;

type Span = (String, Style);

#[derive(Default)]
struct Text {
    lines: Vec<Vec<Span>>,
}

impl Text {
    fn blank(&mut self) {
        self.lines.push(Vec::new());
    }

    fn line(&mut self, text: impl Into<String>, style: Style) {
        self.lines.push(vec![(text.into(), style)]);
    }

    fn spans(&mut self, spans: Vec<Span>) {
        self.lines.push(spans);
    }

    fn control(&mut self, key: &str, help: &str) {
        self.spans(vec![
            (format!("  {:<12}", key), Style::new().fg(Color::WHITE).bold()),
            (format!(": {}", help), Style::new().fg(Color::GRAY)),
        ]);
    }

    fn len(&self) -> u16 {
        u16::try_from(self.lines.len()).unwrap_or(u16::MAX)
    }
}

fn heading() -> Style {
    Style::new().fg(Color::SKY_BLUE).bold()
}

fn hint() -> Style {
    Style::new().fg(Color::DARK_GRAY)
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Draw the whole terminal client into `area`.
pub fn render(
    app: &mut CliApp,
    api: Option<&dyn ClientApi>,
    logs: &LogBuffer,
    area: Rect,
    buf: &mut RenderBuf,
) {
    let title = format!(" {} ", app.title());
    let border = Style::new().fg(Color::SKY_BLUE);
    let inner = buf.draw_block(area, &title, border, border.bold());

    let (body, controls) = match (app.mode().clone(), api) {
        (Mode::Loading, _) | (_, None) => (loading_text(app, logs, inner), Text::default()),
        (Mode::Normal, Some(api)) => (normal_text(app, api), normal_controls()),
        (Mode::Logs, Some(_)) => {
            let mut controls = Text::default();
            controls.line("Logs Controls:", Style::new().bold().underline());
            controls.control("Esc or q", "Return to main view");
            let rows = inner.height.saturating_sub(controls.len() + 1);
            (logs_text(logs, rows, inner.width), controls)
        }
        (mode, Some(api)) => {
            let controls = menu_controls(&mode);
            let rows = inner.height.saturating_sub(controls.len());
            (list_text(app, api, &mode, rows), controls)
        }
    };

    let mut y = inner.y;
    let bottom = inner.y + inner.height;
    for line in body.lines.iter() {
        if y >= bottom {
            break;
        }
        draw_spans(buf, Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1), line);
        y += 1;
    }

    let controls_top = bottom.saturating_sub(controls.len()).max(y);
    for (offset, line) in controls.lines.iter().enumerate() {
        let Ok(offset) = u16::try_from(offset) else {
            break;
        };
        let row = controls_top + offset;
        if row >= bottom {
            break;
        }
        draw_spans(buf, Rect::new(inner.x + 1, row, inner.width.saturating_sub(2), 1), line);
    }
}

fn draw_spans(buf: &mut RenderBuf, area: Rect, spans: &[Span]) {
    let borrowed: Vec<(&str, Style)> = spans.iter().map(|(t, s)| (t.as_str(), *s)).collect();
    buf.draw_spans(area.x, area.y, area.width, &borrowed);
}

fn loading_text(app: &CliApp, logs: &LogBuffer, inner: Rect) -> Text {
    let mut text = Text::default();
    text.blank();
    text.line(app.loading_message(), Style::new().fg(Color::GOLD).bold());
    text.blank();
    let rows = usize::from(inner.height.saturating_sub(4));
    let width = usize::from(inner.width.saturating_sub(4));
    for line in logs.tail(rows) {
        text.line(format!("  {}", truncate(&line, width)), log_style(&line));
    }
    text
}

fn normal_text(app: &CliApp, api: &dyn ClientApi) -> Text {
    let instrument = api.get_current_instrument();
    let preset = api.get_current_preset();

    let mut text = Text::default();
    text.blank();
    text.line("Instrument:", heading());
    text.line(format!("  {}", instrument.name), Style::new().fg(Color::new(120, 220, 120)));
    text.blank();
    text.line("Preset:", heading());
    let mut preset_line = vec![(format!("  {}", preset.display_name), Style::new().fg(Color::GOLD))];
    if app.is_modified() {
        preset_line.push((" *".to_string(), Style::new().fg(Color::MODIFIED).bold()));
    }
    text.spans(preset_line);
    text
}

fn normal_controls() -> Text {
    let mut text = Text::default();
    text.line("Controls:", Style::new().bold().underline());
    text.control("Up/Down", "Navigate presets");
    text.control("Left/Right", "Quick instrument switch");
    text.control("i", "Open instrument menu");
    text.control("p", "Open preset menu");
    text.control("r", "Randomize current preset");
    text.control("R", "Random all (instrument + preset)");
    text.control("/", "Search instruments & presets");
    text.control("l", "View logs");
    text.control("q", "Quit");
    text
}

fn menu_controls(mode: &Mode) -> Text {
    let mut text = Text::default();
    match mode {
        Mode::InstrumentMenu => {
            text.line("Menu Controls:", Style::new().bold().underline());
            text.control("Up/Down", "Navigate menu");
            text.control("Enter", "Select instrument");
            text.control("p", "View presets for selected instrument");
            text.control("/", "Search instruments");
            text.control("Esc or q", "Exit menu");
        }
        Mode::PresetMenu { .. } => {
            text.line("Menu Controls:", Style::new().bold().underline());
            text.control("Up/Down", "Navigate menu");
            text.control("Enter", "Select preset");
            text.control("/", "Search presets");
            text.control("Esc or q", "Exit menu");
        }
        _ => {
            text.line("Search Controls:", Style::new().bold().underline());
            text.line("  Type to search", Style::new().fg(Color::GRAY));
            text.control("Up/Down", "Navigate results");
            text.control("Enter", "Select item");
            text.control("Backspace", "Delete character (or exit if empty)");
            text.control("Esc", "Exit search");
        }
    }
    text
}

fn list_text(app: &mut CliApp, api: &dyn ClientApi, mode: &Mode, rows: u16) -> Text {
    let mut text = Text::default();
    text.blank();

    let labels: Vec<String> = match mode {
        Mode::InstrumentMenu => api.get_instruments().iter().map(|i| i.name.clone()).collect(),
        Mode::PresetMenu { instrument, .. } => api
            .get_presets(instrument)
            .iter()
            .map(|p| p.display_name.clone())
            .collect(),
        Mode::Search { context } => {
            text.spans(vec![
                ("Search: ".to_string(), heading()),
                (app.search().query().to_string(), Style::new().fg(Color::GOLD)),
                ("_".to_string(), hint()),
            ]);
            let count = app.search().results().len();
            if count == 0 {
                text.line("  No matches found", hint());
            } else {
                text.line(format!("  {} result(s)", count), hint());
            }
            app.search()
                .results()
                .iter()
                .map(|item| match (context, &item.action) {
                    (SearchContext::Combined, SearchAction::SetInstrument(_)) => {
                        format!("[I] {}", item.label)
                    }
                    (SearchContext::Combined, SearchAction::SetPreset { .. }) => {
                        format!("[P] {}", item.label)
                    }
                    _ => item.label.clone(),
                })
                .collect()
        }
        _ => Vec::new(),
    };

    // Two rows for the scroll indicators.
    let visible = usize::from(rows.saturating_sub(text.len() + 2)).max(1);
    let menu = app.menu_mut();
    menu.clamp(labels.len());
    menu.adjust_scroll(visible);
    let start = menu.scroll_offset;
    let selected = menu.selected;
    let end = (start + visible).min(labels.len());

    if start > 0 {
        text.line("  ... (Up for more)", hint());
    } else {
        text.blank();
    }
    for (index, label) in labels.iter().enumerate().take(end).skip(start) {
        let label = truncate(label, MAX_ROW_CHARS);
        if index == selected {
            text.line(format!("> {}", label), selected_style(true, Color::SKY_BLUE).bold());
        } else {
            text.line(format!("  {}", label), selected_style(false, Color::WHITE));
        }
    }
    if end < labels.len() {
        text.line("  ... (Down for more)", hint());
    }
    text
}

fn logs_text(logs: &LogBuffer, rows: u16, width: u16) -> Text {
    let mut text = Text::default();
    text.blank();
    if logs.is_empty() {
        text.line("  No logs available", hint());
        return text;
    }
    let max_width = usize::from(width.saturating_sub(6));
    for line in logs.tail(usize::from(rows.saturating_sub(1))) {
        let shown = if line.chars().count() > max_width {
            format!("{}...", truncate(&line, max_width.saturating_sub(3)))
        } else {
            line.clone()
        };
        text.line(format!("  {}", shown), log_style(&line));
    }
    text
}

fn log_style(line: &str) -> Style {
    if line.contains("[ERROR]") {
        Style::new().fg(Color::LOG_ERROR)
    } else if line.contains("[WARN]") {
        Style::new().fg(Color::LOG_WARN)
    } else {
        Style::new().fg(Color::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeApi;
    use crate::ui::{InputEvent, KeyCode};
    use ratatui::buffer::Buffer;

    fn rendered(app: &mut CliApp, api: Option<&dyn ClientApi>, logs: &LogBuffer) -> Vec<String> {
        let area = Rect::new(0, 0, 70, 30);
        let mut buffer = Buffer::empty(area);
        {
            let mut buf = RenderBuf::new(&mut buffer);
            render(app, api, logs, area, &mut buf);
        }
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol().to_string()))
                    .collect::<String>()
            })
            .collect()
    }

    fn contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|row| row.contains(needle))
    }

    #[test]
    fn loading_screen_shows_message_and_logs() {
        let mut app = CliApp::new();
        app.set_loading_message("Starting Pianoteq...");
        let logs = LogBuffer::new(10);
        logs.push_line("[INFO] waiting for JSON-RPC");
        let rows = rendered(&mut app, None, &logs);
        assert!(contains(&rows, "Pi-Pianoteq"));
        assert!(contains(&rows, "Starting Pianoteq..."));
        assert!(contains(&rows, "waiting for JSON-RPC"));
    }

    #[test]
    fn normal_view_shows_selection_and_modified_marker() {
        let mut app = CliApp::new();
        app.enter_normal();
        let api = FakeApi::new();
        let logs = LogBuffer::default();

        let rows = rendered(&mut app, Some(&api), &logs);
        assert!(contains(&rows, "D4 Grand Piano"));
        assert!(contains(&rows, "Prelude"));
        assert!(!contains(&rows, "Prelude *"));

        app.set_modified(true);
        let rows = rendered(&mut app, Some(&api), &logs);
        assert!(contains(&rows, "Prelude *"));
    }

    #[test]
    fn combined_search_marks_item_kinds() {
        let mut app = CliApp::new();
        app.enter_normal();
        let mut api = FakeApi::new();
        for event in [InputEvent::key(KeyCode::Char('/')), InputEvent::key(KeyCode::Char('m'))] {
            app.handle_key(&mut api, &event);
        }
        let logs = LogBuffer::default();
        let rows = rendered(&mut app, Some(&api), &logs);
        assert!(contains(&rows, "Search: m"));
        assert!(contains(&rows, "[P] MKI (Vintage Tines)"));
    }
}
