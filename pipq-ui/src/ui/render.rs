use ratatui::buffer::Buffer;
use ratatui::widgets::{Block, Borders, Widget};

pub use ratatui::layout::Rect;

use super::style::Style;

/// Drawing surface for one frame, in our own `Style`/`Color` types.
///
/// Everything outside the underlying buffer is clipped.
pub struct RenderBuf<'a> {
    buf: &'a mut Buffer,
}

impl<'a> RenderBuf<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self { buf }
    }

    pub fn set_cell(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(ch).set_style(ratatui::style::Style::from(style));
        }
    }

    /// Write `text` from `x` without wrapping; returns the column after it.
    pub fn draw_str(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            self.set_cell(col, y, ch, style);
            col = col.saturating_add(1);
        }
        col
    }

    /// Bordered box with a title; returns the area inside the border.
    pub fn draw_block(&mut self, area: Rect, title: &str, border: Style, title_style: Style) -> Rect {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(ratatui::style::Style::from(border))
            .title_style(ratatui::style::Style::from(title_style));
        let inner = block.inner(area);
        block.render(area, self.buf);
        inner
    }

    /// Styled segments on one row, cut off after `width` columns.
    pub fn draw_spans(&mut self, x: u16, y: u16, width: u16, spans: &[(&str, Style)]) {
        let end = x.saturating_add(width);
        let mut col = x;
        for (text, style) in spans {
            for ch in text.chars() {
                if col >= end {
                    return;
                }
                self.set_cell(col, y, ch, *style);
                col += 1;
            }
        }
    }
}
