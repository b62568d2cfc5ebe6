//! Horizontal progress bar with a gradient fill and trailing percentage

use palette::{LinSrgb, Mix, Srgb};
use ratatui::{
    style::{Color, Style},
    text::Span,
};

use crate::ui::theme::Theme;

pub const DEFAULT_WIDTH: u16 = 40;

const FULL: char = '█';
const EMPTY: char = '░';
/// `" 100%"`
const LABEL_WIDTH: usize = 5;

/// Presentation state for one bar. A fresh bar starts empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    width: u16,
    ratio: f64,
}

impl ProgressBar {
    pub fn new(width: u16) -> Self {
        Self { width, ratio: 0.0 }
    }

    #[cfg(test)]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[cfg(test)]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Store the value to display. Non-finite input shows as empty and
    /// anything outside `[0, 1]` is pinned to the nearest end.
    pub fn set_ratio(&mut self, ratio: f64) {
        self.ratio = clamp_ratio(ratio);
    }

    /// Render the stored value.
    pub fn view(&self, theme: &Theme) -> Vec<Span<'static>> {
        self.view_as(self.ratio, theme)
    }

    /// Render an arbitrary value without touching the stored one.
    pub fn view_as(&self, ratio: f64, theme: &Theme) -> Vec<Span<'static>> {
        let ratio = clamp_ratio(ratio);
        let cells = (self.width as usize).saturating_sub(LABEL_WIDTH);
        let filled = ((cells as f64) * ratio).round() as usize;

        let mut spans = Vec::with_capacity(filled + 2);
        for i in 0..filled {
            let t = if filled > 1 {
                i as f32 / (filled - 1) as f32
            } else {
                0.0
            };
            let color = blend(theme.colors.gradient_start, theme.colors.gradient_end, t);
            spans.push(Span::styled(FULL.to_string(), Style::default().fg(color)));
        }
        if cells > filled {
            spans.push(Span::styled(
                EMPTY.to_string().repeat(cells - filled),
                theme.styles.bar_empty,
            ));
        }
        spans.push(Span::styled(
            format!(" {:>3.0}%", ratio * 100.0),
            theme.styles.bar_label,
        ));

        spans
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Mix two sRGB colors in linear space.
fn blend(start: (u8, u8, u8), end: (u8, u8, u8), t: f32) -> Color {
    let a: LinSrgb = Srgb::new(start.0, start.1, start.2).into_linear();
    let b: LinSrgb = Srgb::new(end.0, end.1, end.2).into_linear();
    let mixed: Srgb<u8> = Srgb::from_linear(a.mix(b, t.clamp(0.0, 1.0)));
    Color::Rgb(mixed.red, mixed.green, mixed.blue)
}
