//! Scan lists: recent scans and the full patient history.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{render_footer, render_header};
use crate::domain::StoredScan;
use crate::tui::styles::MedicalTheme;

/// Selection within a scan list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanListState {
    pub selected: usize,
}

impl ScanListState {
    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn prev(&mut self, len: usize) {
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    /// Keep the selection inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Id of the selected scan.
    #[must_use]
    pub fn selected_id<'a>(&self, scans: &'a [StoredScan]) -> Option<&'a str> {
        scans.get(self.selected).map(StoredScan::id)
    }
}

/// One formatted list row.
pub fn scan_row(scan: &StoredScan, is_selected: bool) -> Line<'_> {
    let entry = &scan.entry;
    let marker = if is_selected { "▸ " } else { "  " };
    let name_style = if is_selected {
        MedicalTheme::focused()
    } else {
        MedicalTheme::text()
    };

    Line::from(vec![
        Span::styled(marker, MedicalTheme::key_hint()),
        Span::styled(format!("{:<22}", entry.date), MedicalTheme::text_muted()),
        Span::styled(format!("{:<24}", entry.patient_name), name_style),
        Span::styled(format!("{:<14}", entry.patient_id), MedicalTheme::text_secondary()),
        Span::styled(format!("{:>4}  ", entry.age), MedicalTheme::text_secondary()),
        Span::styled(format!("{:<14}", entry.stage), MedicalTheme::stage(scan.results.risk_level)),
        Span::styled(entry.risk.to_string(), MedicalTheme::scan_risk(entry.risk)),
    ])
}

/// Render a full-screen scan list.
pub fn render_scan_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    scans: &[StoredScan],
    state: &ScanListState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // List
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(
        f,
        chunks[0],
        title,
        &format!("{} scan(s) this session", scans.len()),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    if scans.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No scans recorded yet.",
            MedicalTheme::text_muted(),
        )))
        .block(block);
        f.render_widget(empty, chunks[1]);
    } else {
        let inner_height = usize::from(block.inner(chunks[1]).height.max(2));
        let mut lines = vec![Line::from(Span::styled(
            format!(
                "  {:<22}{:<24}{:<14}{:>4}  {:<14}{}",
                "Date", "Patient", "ID", "Age", "Stage", "Risk"
            ),
            MedicalTheme::subtitle(),
        ))];
        lines.extend(
            scans
                .iter()
                .enumerate()
                .map(|(i, scan)| scan_row(scan, i == state.selected)),
        );

        // Header row stays fixed in the first line; scroll the rest.
        let offset = (state.selected + 1).saturating_sub(inner_height - 1);
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        f.render_widget(Paragraph::new(lines).block(block).scroll((offset, 0)), chunks[1]);
    }

    render_footer(
        f,
        chunks[2],
        vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Select ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("View Results ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Dashboard", MedicalTheme::key_desc()),
        ],
    );
}
