//! Landing screen and clinical dashboard.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::history::scan_row;
use super::render_header;
use crate::domain::{ScanRisk, StoredScan};
use crate::tui::styles::{MedicalTheme, LOGO};

/// Counts per risk bucket across all stored scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: usize,
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
}

impl ScanSummary {
    #[must_use]
    pub fn from_scans(scans: &[StoredScan]) -> Self {
        scans.iter().fold(
            Self {
                total: scans.len(),
                ..Self::default()
            },
            |mut acc, scan| {
                match scan.entry.risk {
                    ScanRisk::Low => acc.low += 1,
                    ScanRisk::Moderate => acc.moderate += 1,
                    ScanRisk::High => acc.high += 1,
                }
                acc
            },
        )
    }
}

/// Render the landing screen
pub fn render_welcome(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Logo
            Constraint::Length(5), // Tagline
            Constraint::Min(0),    // Actions
        ])
        .margin(1)
        .split(area);

    let logo = Paragraph::new(
        LOGO.lines()
            .map(|l| Line::from(Span::styled(l, MedicalTheme::subtitle())))
            .collect::<Vec<_>>(),
    )
    .alignment(Alignment::Center);
    f.render_widget(logo, chunks[0]);

    let tagline = Paragraph::new(vec![
        Line::from(Span::styled(
            "AI Bone Health Platform",
            MedicalTheme::title(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "X-ray analysis for osteoporosis detection and staging, plus a self-assessment risk calculator.",
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(tagline, chunks[1]);

    let actions = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("[C] ", MedicalTheme::key_hint()),
            Span::styled("Clinical X-ray Analysis", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[A] ", MedicalTheme::key_hint()),
            Span::styled("Self Risk Assessment", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Get Started ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(actions, chunks[2]);
}

/// Render the clinical dashboard.
pub fn render_dashboard(
    f: &mut Frame,
    area: Rect,
    recent: &[StoredScan],
    summary: ScanSummary,
    selected: usize,
    history_enabled: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0], "OsteoScan", "Clinical Dashboard");

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    render_side_panels(f, columns[0], summary, history_enabled);
    render_recent_scans(f, columns[1], recent, selected);
}

fn render_side_panels(f: &mut Frame, area: Rect, summary: ScanSummary, history_enabled: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Statistics
            Constraint::Min(0),    // Quick actions
        ])
        .margin(1)
        .split(area);

    let stats = vec![
        Line::from(vec![
            Span::styled("  Total scans: ", MedicalTheme::text_secondary()),
            Span::styled(summary.total.to_string(), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("  High risk: ", MedicalTheme::text_secondary()),
            Span::styled(summary.high.to_string(), MedicalTheme::scan_risk(ScanRisk::High)),
        ]),
        Line::from(vec![
            Span::styled("  Moderate: ", MedicalTheme::text_secondary()),
            Span::styled(
                summary.moderate.to_string(),
                MedicalTheme::scan_risk(ScanRisk::Moderate),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Low risk: ", MedicalTheme::text_secondary()),
            Span::styled(summary.low.to_string(), MedicalTheme::scan_risk(ScanRisk::Low)),
        ]),
        Line::from(vec![
            Span::styled("  History sync: ", MedicalTheme::text_secondary()),
            if history_enabled {
                Span::styled("on", MedicalTheme::success())
            } else {
                Span::styled("off", MedicalTheme::text_muted())
            },
        ]),
    ];

    let stats_block = Block::default()
        .title(Span::styled(" Session Statistics ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(stats).block(stats_block), chunks[0]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New X-ray Analysis", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Recent Scans", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[H] ", MedicalTheme::key_hint()),
            Span::styled("Patient History", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Open Selected Scan", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Home", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn render_recent_scans(f: &mut Frame, area: Rect, recent: &[StoredScan], selected: usize) {
    let block = Block::default()
        .title(Span::styled(" Recent Scans ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    if recent.is_empty() {
        let empty_msg = Paragraph::new(Line::from(vec![Span::styled(
            "No scans yet. Press [N] to start.",
            MedicalTheme::text_muted(),
        )]))
        .block(block);
        f.render_widget(empty_msg, area);
        return;
    }

    let lines: Vec<Line> = recent
        .iter()
        .enumerate()
        .map(|(i, scan)| scan_row(scan, i == selected))
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
