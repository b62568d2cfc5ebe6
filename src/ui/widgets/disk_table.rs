//! Tabular view of mounted partitions

use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::metrics::DiskMetrics;
use crate::ui::theme::Theme;

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub width: usize,
}

pub type Row = Vec<String>;

/// Rows, column layout and visible height of the partitions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskTable {
    columns: Vec<Column>,
    rows: Vec<Row>,
    height: usize,
}

impl DiskTable {
    pub fn columns() -> Vec<Column> {
        vec![
            Column { title: "Device", width: 20 },
            Column { title: "Mount", width: 40 },
            Column { title: "FS", width: 10 },
            Column { title: "Used", width: 10 },
            Column { title: "Total", width: 10 },
            Column { title: "Free", width: 10 },
        ]
    }

    pub fn new(disk: &DiskMetrics) -> Self {
        let mut table = Self {
            columns: Self::columns(),
            rows: Vec::new(),
            height: 1,
        };
        table.update(disk);
        table
    }

    /// Replace every row from `disk` and fit the height to rows plus header.
    pub fn update(&mut self, disk: &DiskMetrics) {
        self.rows = rows_from(disk);
        self.height = self.rows.len() + 1;
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[cfg(test)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Header plus at most `height - 1` rows, framed in a single-line border.
    pub fn view(&self, theme: &Theme) -> Vec<Line<'static>> {
        let inner: usize = self.columns.iter().map(|c| c.width).sum();
        let border = theme.styles.table_border;

        let mut lines = Vec::with_capacity(self.height + 2);
        lines.push(Line::from(Span::styled(
            format!("┌{}┐", "─".repeat(inner)),
            border,
        )));

        let header: String = self
            .columns
            .iter()
            .map(|c| fit(c.title, c.width))
            .collect();
        lines.push(Line::from(vec![
            Span::styled("│", border),
            Span::styled(header, theme.styles.table_header),
            Span::styled("│", border),
        ]));

        for row in self.rows.iter().take(self.height.saturating_sub(1)) {
            let cells: String = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, c)| fit(row.get(i).map(String::as_str).unwrap_or(""), c.width))
                .collect();
            lines.push(Line::from(vec![
                Span::styled("│", border),
                Span::styled(cells, theme.styles.table_row),
                Span::styled("│", border),
            ]));
        }

        lines.push(Line::from(Span::styled(
            format!("└{}┘", "─".repeat(inner)),
            border,
        )));
        lines
    }
}

pub fn rows_from(disk: &DiskMetrics) -> Vec<Row> {
    disk.partitions
        .iter()
        .map(|p| {
            vec![
                p.device.clone(),
                p.mount_point.clone(),
                p.fs_type.clone(),
                format_size(p.used_bytes),
                format_size(p.total_bytes),
                format_size(p.free_bytes),
            ]
        })
        .collect()
}

/// Whole mebibytes, or whole gibibytes once that reaches 1024. Truncates.
pub fn format_size(bytes: u64) -> String {
    let mb = bytes / MIB;
    if mb >= 1024 {
        format!("{}G", mb / 1024)
    } else {
        format!("{}M", mb)
    }
}

/// Pad or cut `s` to exactly `width` display cells, marking cuts with `…`.
fn fit(s: &str, width: usize) -> String {
    if s.width() <= width {
        return format!("{}{}", s, " ".repeat(width - s.width()));
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PartitionMetrics;
    use pretty_assertions::assert_eq;

    fn partition(device: &str, mount: &str) -> PartitionMetrics {
        PartitionMetrics {
            device: device.to_string(),
            mount_point: mount.to_string(),
            fs_type: "ext4".to_string(),
            used_bytes: 500 * MIB,
            total_bytes: 2 * 1024 * MIB,
            free_bytes: 1023 * MIB,
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500 * 1024 * 1024), "500M");
        assert_eq!(format_size(2 * 1024 * 1024 * 1024), "2G");
        assert_eq!(format_size(1023 * 1024 * 1024), "1023M");
        assert_eq!(format_size(1024 * 1024 * 1024), "1G");
        assert_eq!(format_size(0), "0M");
        assert_eq!(format_size(1536 * 1024 * 1024), "1G");
    }

    #[test]
    fn test_rows_follow_partitions() {
        let disk = DiskMetrics {
            partitions: vec![partition("/dev/sda1", "/"), partition("/dev/sdb1", "/data")],
        };
        let table = DiskTable::new(&disk);

        assert_eq!(table.height(), 3);
        assert_eq!(
            table.rows()[1],
            vec!["/dev/sdb1", "/data", "ext4", "500M", "2G", "1023M"]
        );
    }

    #[test]
    fn test_update_resizes_height() {
        let mut table = DiskTable::new(&DiskMetrics {
            partitions: vec![partition("/dev/sda1", "/")],
        });
        assert_eq!(table.height(), 2);

        table.update(&DiskMetrics::default());
        assert!(table.rows().is_empty());
        assert_eq!(table.height(), 1);

        // Header and both borders remain when there are no rows.
        assert_eq!(table.view(&Theme::default()).len(), 3);
    }

    #[test]
    fn test_view_lays_out_columns() {
        let table = DiskTable::new(&DiskMetrics {
            partitions: vec![partition("/dev/sda1", "/")],
        });
        let lines: Vec<String> = table
            .view(&Theme::default())
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("│Device              Mount"));
        assert!(lines[2].contains("/dev/sda1           /"));
        assert!(lines.iter().all(|l| l.width() == 102));
    }

    #[test]
    fn test_fit_truncates_long_values() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdefgh", 5), "abcd…");
    }
}
