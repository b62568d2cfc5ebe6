//! Footer widget with keybindings and refresh time

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::core::state::DashboardState;
use crate::ui::theme::Theme;

pub struct Footer<'a> {
    state: &'a DashboardState,
    theme: &'a Theme,
}

impl<'a> Footer<'a> {
    pub fn new(state: &'a DashboardState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl<'a> Widget for Footer<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.theme.styles.footer);

        let bindings = [("q", "Quit"), ("Ctrl+C", "Quit")];

        let mut spans = Vec::new();
        for (i, (key, action)) in bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", self.theme.styles.keybind));
            }
            spans.push(Span::styled(
                format!("[{}]", key),
                self.theme.styles.keybind_key,
            ));
            spans.push(Span::styled(
                format!(" {}", action),
                self.theme.styles.keybind,
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x + 1, area.y, &line, area.width.saturating_sub(2));

        // Time of the snapshot on screen, right aligned
        let stamp = format!(
            "updated {}",
            self.state.refreshed_at().format("%H:%M:%S")
        );
        let stamp_x = area.x + area.width.saturating_sub(stamp.len() as u16 + 1);
        buf.set_span(
            stamp_x,
            area.y,
            &Span::styled(&stamp, self.theme.styles.keybind),
            stamp.len() as u16,
        );
    }
}
