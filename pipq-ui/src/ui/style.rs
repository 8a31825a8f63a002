use ratatui::style::{Color as RatatuiColor, Modifier, Style as RatatuiStyle};

/// RGB color. Construct with `Color::new(r, g, b)`, parse an instrument color
/// with `Color::from_hex("#af2523")`, or use the named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const DARK_GRAY: Color = Color::new(100, 100, 100);
    pub const GOLD: Color = Color::new(255, 215, 0);
    pub const SKY_BLUE: Color = Color::new(135, 206, 235);

    /// Panel backlight while a menu is open.
    pub const MENU_BACKLIGHT: Color = Color::new(0xcc, 0xcc, 0xcc);

    pub const SELECTION_BG: Color = Color::new(60, 100, 180);
    pub const MODIFIED: Color = Color::new(255, 220, 80);
    pub const LOG_WARN: Color = Color::new(255, 180, 80);
    pub const LOG_ERROR: Color = Color::new(255, 80, 80);
}

/// Create style with conditional selection background.
/// Useful for list items that highlight when selected.
pub fn selected_style(is_selected: bool, fg: Color) -> Style {
    if is_selected {
        Style::new().fg(fg).bg(Color::SELECTION_BG)
    } else {
        Style::new().fg(fg)
    }
}

/// Text style with foreground, background, and attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub underline: bool,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            underline: false,
        }
    }

    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

// --- Conversions to ratatui types ---

impl From<Color> for RatatuiColor {
    fn from(c: Color) -> Self {
        RatatuiColor::Rgb(c.r, c.g, c.b)
    }
}

impl From<Style> for RatatuiStyle {
    fn from(s: Style) -> Self {
        let mut rs = RatatuiStyle::default();
        if let Some(fg) = s.fg {
            rs = rs.fg(RatatuiColor::from(fg));
        }
        if let Some(bg) = s.bg {
            rs = rs.bg(RatatuiColor::from(bg));
        }
        if s.bold {
            rs = rs.add_modifier(Modifier::BOLD);
        }
        if s.underline {
            rs = rs.add_modifier(Modifier::UNDERLINED);
        }
        rs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(Color::from_hex("#af2523"), Some(Color::new(0xaf, 0x25, 0x23)));
        assert_eq!(Color::from_hex("cccccc"), Some(Color::MENU_BACKLIGHT));
        assert_eq!(Color::from_hex("#abc"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn style_converts_to_ratatui() {
        let rs = RatatuiStyle::from(Style::new().fg(Color::WHITE).bold());
        assert_eq!(rs.fg, Some(RatatuiColor::Rgb(255, 255, 255)));
        assert!(rs.add_modifier.contains(Modifier::BOLD));
    }
}
