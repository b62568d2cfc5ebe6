//! Theme system: immutable palettes built once at startup

use ratatui::style::{Color, Modifier, Style};

/// Complete theme definition
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
    pub styles: ThemeStyles,
}

#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub fg_primary: Color,
    pub fg_muted: Color,

    pub title: Color,
    pub section: Color,

    // Progress bars blend from start to end across the filled cells
    pub gradient_start: (u8, u8, u8),
    pub gradient_end: (u8, u8, u8),
    pub bar_empty: Color,

    pub border: Color,
    pub footer_bg: Color,
}

#[derive(Debug, Clone)]
pub struct ThemeStyles {
    pub title: Style,
    pub section_title: Style,
    pub text: Style,
    pub bar_empty: Style,
    pub bar_label: Style,
    pub table_header: Style,
    pub table_row: Style,
    pub table_border: Style,
    pub footer: Style,
    pub keybind: Style,
    pub keybind_key: Style,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "tokyo-night" | "tokyonight" => Self::tokyo_night(),
            "nord" => Self::nord(),
            "candy" => Self::candy(),
            other => {
                tracing::warn!("unknown theme {:?}, falling back to candy", other);
                Self::candy()
            }
        }
    }

    /// Pink to yellow, the default
    pub fn candy() -> Self {
        let colors = ThemeColors {
            fg_primary: Color::Reset,
            fg_muted: Color::Indexed(244),

            title: Color::Rgb(253, 255, 140),
            section: Color::Rgb(255, 124, 203),

            gradient_start: (255, 124, 203),
            gradient_end: (253, 255, 140),
            bar_empty: Color::Indexed(238),

            border: Color::Indexed(240),
            footer_bg: Color::Reset,
        };

        Self::from_colors("Candy", colors)
    }

    pub fn tokyo_night() -> Self {
        let colors = ThemeColors {
            fg_primary: Color::Rgb(192, 202, 245),
            fg_muted: Color::Rgb(86, 95, 137),

            title: Color::Rgb(187, 154, 247),
            section: Color::Rgb(122, 162, 247),

            gradient_start: (122, 162, 247),
            gradient_end: (247, 118, 142),
            bar_empty: Color::Rgb(41, 46, 66),

            border: Color::Rgb(41, 46, 66),
            footer_bg: Color::Rgb(36, 40, 59),
        };

        Self::from_colors("Tokyo Night", colors)
    }

    pub fn nord() -> Self {
        let colors = ThemeColors {
            fg_primary: Color::Rgb(236, 239, 244),
            fg_muted: Color::Rgb(216, 222, 233),

            title: Color::Rgb(129, 161, 193),
            section: Color::Rgb(136, 192, 208),

            gradient_start: (163, 190, 140),
            gradient_end: (191, 97, 106),
            bar_empty: Color::Rgb(67, 76, 94),

            border: Color::Rgb(67, 76, 94),
            footer_bg: Color::Rgb(59, 66, 82),
        };

        Self::from_colors("Nord", colors)
    }

    fn from_colors(name: &str, colors: ThemeColors) -> Self {
        let styles = ThemeStyles {
            title: Style::default().fg(colors.title),
            section_title: Style::default()
                .fg(colors.section)
                .add_modifier(Modifier::BOLD),
            text: Style::default().fg(colors.fg_primary),
            bar_empty: Style::default().fg(colors.bar_empty),
            bar_label: Style::default().fg(colors.fg_primary),
            table_header: Style::default()
                .fg(colors.fg_primary)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(colors.fg_primary),
            table_border: Style::default().fg(colors.border),
            footer: Style::default().bg(colors.footer_bg).fg(colors.fg_muted),
            keybind: Style::default().fg(colors.fg_muted),
            keybind_key: Style::default()
                .fg(colors.section)
                .add_modifier(Modifier::BOLD),
        };

        Self {
            name: name.to_string(),
            colors,
            styles,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::candy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("nord").name, "Nord");
        assert_eq!(Theme::from_name("Tokyo-Night").name, "Tokyo Night");
        assert_eq!(Theme::from_name("no-such-theme").name, "Candy");
    }
}
