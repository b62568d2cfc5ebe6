//! Main UI renderer

use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};

use crate::core::state::DashboardState;
use crate::ui::theme::Theme;
use crate::ui::widgets::Footer;

const TITLE: [&str; 3] = [
    "┌─┐┬ ┬┌─┐┌─┐┬  ┌─┐┌┐┌┌─┐┌─┐",
    "└─┐└┬┘└─┐│ ┬│  ├─┤││││  ├┤ ",
    "└─┘ ┴ └─┘└─┘┴─┘┴ ┴┘└┘└─┘└─┘",
];

const CPU_TITLE: &str = "CPU Metrics";
const MEM_TITLE: &str = "Memory Metrics";
const DISK_TITLE: &str = "Disk metrics";

pub struct Renderer;

impl Renderer {
    /// Place the dashboard text and the footer into the frame.
    pub fn draw(frame: &mut Frame, state: &DashboardState, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        frame.render_widget(Paragraph::new(render(state, theme)), chunks[0]);
        frame.render_widget(Footer::new(state, theme), chunks[1]);
    }
}

/// The whole dashboard as styled text. Same state in, same text out.
pub fn render(state: &DashboardState, theme: &Theme) -> Text<'static> {
    let metrics = state.snapshot();
    let mut lines: Vec<Line<'static>> = Vec::new();

    for row in TITLE {
        lines.push(Line::from(Span::styled(row, theme.styles.title)));
    }
    lines.push(Line::default());

    // CPU
    section(&mut lines, CPU_TITLE, theme);
    let cpu = &metrics.cpu;
    lines.push(plain(format!("Model Name: {}", cpu.model_name), theme));
    lines.push(plain(format!("Frequency: {:.2}MHz", cpu.frequency_mhz), theme));
    lines.push(plain(
        format!(
            "Total CPU: {} ({} Logical)",
            cpu.physical_cores, cpu.logical_cores
        ),
        theme,
    ));
    lines.push(Line::default());

    // Reconciliation keeps one bar per sampled core.
    for (i, bar) in state.cpu_bars().iter().enumerate() {
        let mut spans = vec![Span::styled(format!("CPU {}: ", i + 1), theme.styles.text)];
        spans.extend(bar.view(theme));
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());

    // Memory
    section(&mut lines, MEM_TITLE, theme);
    lines.push(plain(
        format!(
            "Used {} bytes (of {} bytes)",
            metrics.memory.used_bytes, metrics.memory.total_bytes
        ),
        theme,
    ));
    lines.push(Line::default());
    lines.push(Line::from(state.memory_bar().view(theme)));
    lines.push(Line::default());

    // Disk
    section(&mut lines, DISK_TITLE, theme);
    lines.extend(state.disk_table().view(theme));

    Text::from(lines)
}

fn section(lines: &mut Vec<Line<'static>>, title: &'static str, theme: &Theme) {
    lines.push(Line::from(Span::styled(title, theme.styles.section_title)));
    lines.push(Line::from(Span::styled(
        "#".repeat(title.len()),
        theme.styles.section_title,
    )));
}

fn plain(content: String, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(content, theme.styles.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::testing::snapshot;
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, Terminal};

    fn plain_lines(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_one_bar_per_core_in_order() {
        let state = DashboardState::new(snapshot(vec![0.0, 25.0, 50.0, 75.0, 100.0]), 40);
        let lines = plain_lines(&render(&state, &Theme::default()));

        let cores: Vec<&String> = lines
            .iter()
            .filter(|l| l.starts_with("CPU ") && l[4..].starts_with(|c: char| c.is_ascii_digit()))
            .collect();
        assert_eq!(cores.len(), 5);
        for (i, line) in cores.iter().enumerate() {
            assert!(line.starts_with(&format!("CPU {}: ", i + 1)));
        }
        assert!(cores[0].ends_with("   0%"));
        assert!(cores[2].ends_with("  50%"));
        assert!(cores[4].ends_with(" 100%"));
    }

    #[test]
    fn test_core_lines_follow_applied_snapshot() {
        let theme = Theme::default();
        let mut state = DashboardState::new(snapshot(vec![10.0; 4]), 40);
        state.apply(snapshot(vec![70.0, 80.0]));

        let lines = plain_lines(&render(&state, &theme));
        let cores: Vec<&String> = lines
            .iter()
            .filter(|l| l.starts_with("CPU ") && l[4..].starts_with(|c: char| c.is_ascii_digit()))
            .collect();
        assert_eq!(cores.len(), 2);
        assert!(cores[0].ends_with("  70%"));
        assert!(cores[1].ends_with("  80%"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let theme = Theme::default();
        let state = DashboardState::new(snapshot(vec![33.0, 66.0]), 40);
        assert_eq!(render(&state, &theme), render(&state, &theme));
    }

    #[test]
    fn test_memory_section() {
        let state = DashboardState::new(snapshot(vec![1.0]), 40);
        let lines = plain_lines(&render(&state, &Theme::default()));

        let used = lines
            .iter()
            .position(|l| l == "Used 4294967296 bytes (of 8589934592 bytes)")
            .expect("memory line");
        assert!(lines[used + 2].ends_with("  50%"));
        assert_eq!(lines[used + 2].chars().filter(|c| *c == '█').count(), 18);
    }

    #[test]
    fn test_sections_in_order() {
        let state = DashboardState::new(snapshot(vec![1.0, 2.0]), 40);
        let lines = plain_lines(&render(&state, &Theme::default()));

        let at = |needle: &str| lines.iter().position(|l| l == needle).expect(needle);
        assert!(at(TITLE[0]) < at(CPU_TITLE));
        assert!(at(CPU_TITLE) < at(MEM_TITLE));
        assert!(at(MEM_TITLE) < at(DISK_TITLE));
        assert_eq!(lines[at(CPU_TITLE) + 1], "###########");
        assert_eq!(lines[at(CPU_TITLE) + 2], "Model Name: Test CPU @ 3.00GHz");
        assert_eq!(lines[at(CPU_TITLE) + 3], "Frequency: 3000.00MHz");
        assert_eq!(lines[at(CPU_TITLE) + 4], "Total CPU: 1 (2 Logical)");
        assert!(lines.last().is_some_and(|l| l.starts_with('└')));
    }

    #[test]
    fn test_draw_fills_frame() {
        let state = DashboardState::new(snapshot(vec![10.0, 90.0]), 40);
        let mut terminal = Terminal::new(TestBackend::new(110, 40)).unwrap();
        terminal
            .draw(|frame| Renderer::draw(frame, &state, &Theme::default()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row = |y: u16| -> String {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(4).starts_with("CPU Metrics"));
        assert!(row(39).contains("[q] Quit"));
    }
}
