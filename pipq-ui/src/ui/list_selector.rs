//! Reusable list navigation state for menus with scrolling lists.

/// Whether moving past either end wraps around or stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bounds {
    #[default]
    Wrap,
    Clamp,
}

/// Reusable list navigation state.
#[derive(Debug, Clone, Default)]
pub struct ListSelector {
    pub selected: usize,
    pub scroll_offset: usize,
    pub bounds: Bounds,
}

impl ListSelector {
    pub fn new(initial: usize, bounds: Bounds) -> Self {
        Self {
            selected: initial,
            scroll_offset: 0,
            bounds,
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = match self.bounds {
            Bounds::Wrap => (self.selected + 1) % len,
            Bounds::Clamp => (self.selected + 1).min(len - 1),
        };
    }

    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = match (self.bounds, self.selected) {
            (Bounds::Wrap, 0) => len - 1,
            (Bounds::Clamp, 0) => 0,
            (_, n) => n - 1,
        };
    }

    /// Adjust scroll_offset to keep the selected item visible.
    pub fn adjust_scroll(&mut self, visible_rows: usize) {
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if visible_rows > 0 && self.selected >= self.scroll_offset + visible_rows {
            self.scroll_offset = self.selected - visible_rows + 1;
        }
    }

    /// Clamp selection to valid bounds. Call this after the item list changes.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Reset selection and scroll to beginning.
    pub fn reset(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_next_wraps() {
        let mut sel = ListSelector::new(2, Bounds::Wrap);
        sel.select_next(3);
        assert_eq!(sel.selected, 0);
    }

    #[test]
    fn select_prev_wraps() {
        let mut sel = ListSelector::new(0, Bounds::Wrap);
        sel.select_prev(3);
        assert_eq!(sel.selected, 2);
    }

    #[test]
    fn clamped_selection_stops_at_ends() {
        let mut sel = ListSelector::new(2, Bounds::Clamp);
        sel.select_next(3);
        assert_eq!(sel.selected, 2);
        sel.reset();
        sel.select_prev(3);
        assert_eq!(sel.selected, 0);
    }

    #[test]
    fn adjust_scroll_keeps_visible() {
        let mut sel = ListSelector::new(10, Bounds::Wrap);
        sel.adjust_scroll(5);
        assert_eq!(sel.scroll_offset, 6);
        sel.selected = 2;
        sel.adjust_scroll(5);
        assert_eq!(sel.scroll_offset, 2);
    }

    #[test]
    fn clamp_reduces_selection() {
        let mut sel = ListSelector::new(10, Bounds::Wrap);
        sel.clamp(5);
        assert_eq!(sel.selected, 4);
        sel.clamp(0);
        assert_eq!(sel.selected, 0);
    }
}
