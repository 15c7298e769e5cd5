//! X-ray analysis views: progress timeline and imaging results.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use super::{render_footer, render_header};
use crate::application::{AnalysisPhase, ANALYSIS_STEPS};
use crate::domain::{AnalysisResults, ImagingStage, PatientData};
use crate::tui::styles::MedicalTheme;

/// Progress screen state
#[derive(Debug, Clone, Default)]
pub struct AnalysisViewState {
    pub progress: u8,
    pub step: usize,
    pub phase: AnalysisPhase,
}

/// Render the analysis progress screen
pub fn render_analysis(
    f: &mut Frame,
    area: Rect,
    state: &AnalysisViewState,
    patient: Option<&PatientData>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Patient
            Constraint::Length(5), // Gauge
            Constraint::Min(0),    // Steps
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "AI Analysis in Progress", "Processing X-ray");

    let patient_line = match patient {
        Some(p) => Line::from(vec![
            Span::styled("Patient: ", MedicalTheme::text_secondary()),
            Span::styled(format!("{} ({})", p.name, p.patient_id), MedicalTheme::text()),
            Span::styled("  Age: ", MedicalTheme::text_secondary()),
            Span::styled(p.age.to_string(), MedicalTheme::text()),
            Span::styled("  Gender: ", MedicalTheme::text_secondary()),
            Span::styled(p.gender.label(), MedicalTheme::text()),
        ]),
        None => Line::from(""),
    };
    f.render_widget(
        Paragraph::new(patient_line).alignment(Alignment::Center),
        chunks[1],
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" Stage: {} ", state.phase),
                    MedicalTheme::focused(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::info())
        .percent(u16::from(state.progress.min(100)))
        .label(format!("{}%", state.progress));
    f.render_widget(gauge, chunks[2]);

    render_steps(f, chunks[3], state);
    render_footer(
        f,
        chunks[4],
        vec![
            Span::styled("Processing... ", MedicalTheme::text_muted()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Cancel", MedicalTheme::key_desc()),
        ],
    );
}

fn render_steps(f: &mut Frame, area: Rect, state: &AnalysisViewState) {
    let finished = state.phase == AnalysisPhase::Done || state.progress >= 100;
    let mut lines = Vec::with_capacity(ANALYSIS_STEPS.len() * 2);

    for (i, step) in ANALYSIS_STEPS.iter().enumerate() {
        let (icon, style) = if i < state.step || finished {
            ("OK ", MedicalTheme::success())
        } else if i == state.step {
            (">> ", MedicalTheme::focused())
        } else {
            ("   ", MedicalTheme::text_muted())
        };
        lines.push(Line::from(vec![
            Span::styled(icon, style),
            Span::styled(step.title, style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {}", step.description),
            MedicalTheme::text_muted(),
        )));
    }

    let block = Block::default()
        .title(Span::styled(" Analysis Pipeline ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the imaging results screen
pub fn render_results(f: &mut Frame, area: Rect, results: &AnalysisResults) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(6), // Summary
            Constraint::Min(0),    // Details
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(
        f,
        chunks[0],
        "AI Analysis Results",
        &format!(
            "{} ({})",
            results.patient_data.name, results.patient_data.patient_id
        ),
    );
    render_summary(f, chunks[1], results);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);
    render_bone_analysis(f, columns[0], results);
    render_recommendations(f, columns[1], results);

    render_footer(
        f,
        chunks[3],
        vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Scan ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Dashboard", MedicalTheme::key_desc()),
        ],
    );
}

fn render_summary(f: &mut Frame, area: Rect, results: &AnalysisResults) {
    let style = MedicalTheme::stage(results.risk_level);
    let icon = match results.risk_level {
        ImagingStage::Normal => "OK",
        ImagingStage::Osteopenia | ImagingStage::Osteoporosis => "!",
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("{icon} {}", results.risk_level),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            results.risk_level.description(),
            MedicalTheme::text_secondary(),
        )),
        Line::from(vec![
            Span::styled("Risk score: ", MedicalTheme::text_secondary()),
            Span::styled(format!("{}/100", results.risk_score), style),
            Span::styled("   AI confidence: ", MedicalTheme::text_secondary()),
            Span::styled(format!("{:.1}%", results.confidence), MedicalTheme::text()),
        ]),
    ];

    let summary = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border_focused()),
        );
    f.render_widget(summary, area);
}

fn render_bone_analysis(f: &mut Frame, area: Rect, results: &AnalysisResults) {
    let block = Block::default()
        .title(Span::styled(" Bone Analysis ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let bars = [
        ("Bone Mineral Density", results.analysis.bone_mineral),
        ("Trabecular Pattern", results.analysis.trabecular),
        ("Cortical Thickness", results.analysis.cortical),
    ];
    for (i, (label, value)) in bars.into_iter().enumerate() {
        let pct = value.clamp(0.0, 100.0);
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(Span::styled(format!(" {label} "), MedicalTheme::text_secondary()))
                    .borders(Borders::ALL)
                    .border_style(MedicalTheme::border()),
            )
            .gauge_style(MedicalTheme::gauge(pct / 100.0))
            .ratio(pct / 100.0)
            .label(format!("{value:.1}%"));
        f.render_widget(gauge, rows[i]);
    }
}

fn render_recommendations(f: &mut Frame, area: Rect, results: &AnalysisResults) {
    let mut lines = Vec::new();
    let sections = [
        ("Medical", &results.recommendations.medical),
        ("Lifestyle", &results.recommendations.lifestyle),
        ("Follow-up", &results.recommendations.follow_up),
    ];
    for (title, items) in sections {
        lines.push(Line::from(Span::styled(title, MedicalTheme::focused())));
        for item in items {
            lines.push(Line::from(vec![
                Span::styled("  • ", MedicalTheme::text_muted()),
                Span::styled(item.as_str(), MedicalTheme::text()),
            ]));
        }
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .title(Span::styled(
            " Clinical Recommendations ",
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
