//! Self-assessment questionnaire and its results.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use super::form::{render_form, FormField, FormState};
use super::{render_footer, render_header};
use crate::domain::{
    AlcoholConsumption, AssessmentDraft, Gender, IntakeLevel, MenopauseStatus, PhysicalActivity,
    RiskResult, SmokingStatus, CHRONIC_DISEASES, MEDICATIONS,
};
use crate::tui::styles::MedicalTheme;

const DISEASE_KEYS: [&str; 6] = [
    "disease_ra",
    "disease_diabetes",
    "disease_thyroid",
    "disease_kidney",
    "disease_liver",
    "disease_gi",
];

const MEDICATION_KEYS: [&str; 6] = [
    "med_steroids",
    "med_seizure",
    "med_ppi",
    "med_thinners",
    "med_hormone",
    "med_chemo",
];

/// Questionnaire state
pub struct AssessmentFormState {
    pub form: FormState,
}

impl Default for AssessmentFormState {
    fn default() -> Self {
        let mut fields = vec![
            FormField::section("Basic Information"),
            FormField::number("age", "Age", "years"),
            FormField::choice(
                "gender",
                "Gender",
                Gender::ALL.iter().map(Gender::label).collect(),
            ),
            FormField::number("height", "Height", "cm"),
            FormField::number("weight", "Weight", "kg"),
            FormField::section("Medical History"),
            FormField::check("family_osteoporosis", "Family history of osteoporosis"),
            FormField::check("family_fractures", "Family history of fractures"),
            FormField::check("previous_fractures", "Previous fractures"),
            FormField::choice(
                "menopause",
                "Menopause status (women)",
                MenopauseStatus::ALL.iter().map(MenopauseStatus::label).collect(),
            ),
            FormField::section("Chronic Diseases"),
        ];
        fields.extend(
            DISEASE_KEYS
                .iter()
                .zip(CHRONIC_DISEASES)
                .map(|(key, label)| FormField::check(*key, label)),
        );
        fields.push(FormField::section("Medications"));
        fields.extend(
            MEDICATION_KEYS
                .iter()
                .zip(MEDICATIONS)
                .map(|(key, label)| FormField::check(*key, label)),
        );
        fields.extend([
            FormField::section("Lifestyle"),
            FormField::choice(
                "smoking",
                "Smoking status",
                SmokingStatus::ALL.iter().map(SmokingStatus::label).collect(),
            ),
            FormField::choice(
                "alcohol",
                "Alcohol consumption",
                AlcoholConsumption::ALL
                    .iter()
                    .map(AlcoholConsumption::label)
                    .collect(),
            ),
            FormField::choice(
                "activity",
                "Physical activity",
                PhysicalActivity::ALL
                    .iter()
                    .map(PhysicalActivity::label)
                    .collect(),
            ),
            FormField::section("Diet"),
            FormField::choice("calcium", "Calcium intake", intake_options()),
            FormField::choice("vitamin_d", "Vitamin D intake", intake_options()),
            FormField::choice("protein", "Protein intake", intake_options()),
        ]);

        Self {
            form: FormState::new("Bone Health Assessment", "Risk Questionnaire", fields),
        }
    }
}

fn intake_options() -> Vec<&'static str> {
    IntakeLevel::ALL.iter().map(IntakeLevel::label).collect()
}

fn pick<T: Copy>(all: &[T], index: Option<usize>) -> Option<T> {
    index.and_then(|i| all.get(i).copied())
}

impl AssessmentFormState {
    /// Collect the answers into a draft.
    ///
    /// # Errors
    /// Returns a message naming the field if a number does not parse.
    pub fn to_draft(&self) -> Result<AssessmentDraft, String> {
        let form = &self.form;
        let mut draft = AssessmentDraft {
            age: form.number("age")?,
            gender: pick(&Gender::ALL, form.choice("gender")),
            height: form.number("height")?,
            weight: form.number("weight")?,
            family_history_osteoporosis: form.checked("family_osteoporosis"),
            family_history_fractures: form.checked("family_fractures"),
            previous_fractures: form.checked("previous_fractures"),
            menopause_status: pick(&MenopauseStatus::ALL, form.choice("menopause")),
            smoking_status: pick(&SmokingStatus::ALL, form.choice("smoking")),
            alcohol_consumption: pick(&AlcoholConsumption::ALL, form.choice("alcohol")),
            physical_activity: pick(&PhysicalActivity::ALL, form.choice("activity")),
            calcium_intake: pick(&IntakeLevel::ALL, form.choice("calcium")),
            vitamin_d_intake: pick(&IntakeLevel::ALL, form.choice("vitamin_d")),
            protein_intake: pick(&IntakeLevel::ALL, form.choice("protein")),
            ..AssessmentDraft::default()
        };

        for (key, disease) in DISEASE_KEYS.iter().zip(CHRONIC_DISEASES) {
            draft.set_chronic_disease(disease, form.checked(key));
        }
        for (key, medication) in MEDICATION_KEYS.iter().zip(MEDICATIONS) {
            draft.set_medication(medication, form.checked(key));
        }

        Ok(draft)
    }

    /// Load sample data for testing
    pub fn load_sample_data(&mut self) {
        let form = &mut self.form;
        form.set_text("age", "62");
        form.set_choice("gender", 0);
        form.set_text("height", "165");
        form.set_text("weight", "52");
        form.set_checked("family_osteoporosis", true);
        form.set_choice("menopause", 2);
        form.set_checked("med_ppi", true);
        form.set_choice("smoking", 1);
        form.set_choice("alcohol", 1);
        form.set_choice("activity", 1);
        form.set_choice("calcium", 1);
        form.set_choice("vitamin_d", 0);
        form.set_choice("protein", 2);
    }

    pub fn clear_sensitive(&mut self) {
        self.form.clear_sensitive();
    }
}

/// Render the questionnaire
pub fn render_assessment_form(f: &mut Frame, area: Rect, state: &AssessmentFormState) {
    render_form(f, area, &state.form);
}

/// Render the assessment results screen
pub fn render_assessment_results(f: &mut Frame, area: Rect, result: &RiskResult) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(9), // Score
            Constraint::Min(0),    // Factors + recommendations
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(
        f,
        chunks[0],
        "Your Osteoporosis Risk Assessment",
        "Based on your questionnaire answers",
    );
    render_score(f, chunks[1], result);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);
    render_factors(f, columns[0], result);
    render_recommendations(f, columns[1], result);

    render_footer(
        f,
        chunks[3],
        vec![
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Start Over ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back", MedicalTheme::key_desc()),
        ],
    );
}

fn render_score(f: &mut Frame, area: Rect, result: &RiskResult) {
    let style = MedicalTheme::risk_level(result.risk_level);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let headline = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} Risk", result.risk_level),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            result.risk_level.description(),
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(headline, rows[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Risk Score ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(style)
        .percent(u16::try_from(result.risk_score.min(100)).unwrap_or(100))
        .label(format!("{}/100", result.risk_score));
    f.render_widget(gauge, rows[1]);
}

fn bullet_lines<'a>(items: &'a [String], bullet: &'static str, style: ratatui::style::Style) -> Vec<Line<'a>> {
    items
        .iter()
        .map(|item| {
            Line::from(vec![
                Span::styled(bullet, style),
                Span::styled(item.as_str(), MedicalTheme::text()),
            ])
        })
        .collect()
}

fn render_factors(f: &mut Frame, area: Rect, result: &RiskResult) {
    let mut lines = vec![Line::from(Span::styled(
        "Risk Factors",
        MedicalTheme::danger(),
    ))];
    if result.risk_factors.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No significant risk factors identified",
            MedicalTheme::text_muted(),
        )));
    } else {
        lines.extend(bullet_lines(&result.risk_factors, "  ! ", MedicalTheme::danger()));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Protective Factors",
        MedicalTheme::success(),
    )));
    if result.protective_factors.is_empty() {
        lines.push(Line::from(Span::styled(
            "  None recorded",
            MedicalTheme::text_muted(),
        )));
    } else {
        lines.extend(bullet_lines(
            &result.protective_factors,
            "  + ",
            MedicalTheme::success(),
        ));
    }

    let block = Block::default()
        .title(Span::styled(" Factors ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_recommendations(f: &mut Frame, area: Rect, result: &RiskResult) {
    let recs = &result.recommendations;
    let sections = [
        ("Nutrition", &recs.nutrition),
        ("Exercise", &recs.exercise),
        ("Medical Care", &recs.medical),
        ("Lifestyle", &recs.lifestyle),
    ];

    let mut lines = Vec::with_capacity(recs.len() + sections.len() * 2);
    for (title, items) in sections {
        lines.push(Line::from(Span::styled(title, MedicalTheme::focused())));
        lines.extend(bullet_lines(items, "  • ", MedicalTheme::text_muted()));
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .title(Span::styled(
            " Personalized Recommendations ",
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
