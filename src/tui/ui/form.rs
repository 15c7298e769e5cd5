//! Generic scrolling form used by the intake and questionnaire screens.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::tui::styles::MedicalTheme;

/// Kind of input a row accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text. `numeric` restricts input to digits and a decimal point.
    Text { numeric: bool, hint: &'static str },
    /// One of a fixed list; `None` until the user picks.
    Choice {
        options: Vec<&'static str>,
        selected: Option<usize>,
    },
    /// Checkbox.
    Check { checked: bool },
    /// Non-interactive section heading.
    Section,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

impl FormField {
    #[must_use]
    pub fn text(key: &'static str, label: &'static str, hint: &'static str) -> Self {
        Self::with_kind(key, label, FieldKind::Text { numeric: false, hint })
    }

    #[must_use]
    pub fn number(key: &'static str, label: &'static str, hint: &'static str) -> Self {
        Self::with_kind(key, label, FieldKind::Text { numeric: true, hint })
    }

    #[must_use]
    pub fn choice(key: &'static str, label: &'static str, options: Vec<&'static str>) -> Self {
        Self::with_kind(
            key,
            label,
            FieldKind::Choice {
                options,
                selected: None,
            },
        )
    }

    #[must_use]
    pub fn check(key: &'static str, label: &'static str) -> Self {
        Self::with_kind(key, label, FieldKind::Check { checked: false })
    }

    #[must_use]
    pub fn section(label: &'static str) -> Self {
        Self::with_kind("", label, FieldKind::Section)
    }

    fn with_kind(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            value: String::new(),
        }
    }

    fn is_interactive(&self) -> bool {
        !matches!(self.kind, FieldKind::Section)
    }
}

/// Form state
#[derive(Debug, Clone)]
pub struct FormState {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl FormState {
    #[must_use]
    pub fn new(title: &'static str, subtitle: &'static str, fields: Vec<FormField>) -> Self {
        let mut form = Self {
            title,
            subtitle,
            fields,
            selected_field: 0,
            error_message: None,
        };
        form.skip_sections(true);
        form
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.selected_field = (self.selected_field + 1) % self.fields.len();
        self.skip_sections(true);
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.selected_field = self
            .selected_field
            .checked_sub(1)
            .unwrap_or(self.fields.len() - 1);
        self.skip_sections(false);
    }

    fn skip_sections(&mut self, forward: bool) {
        for _ in 0..self.fields.len() {
            if self.fields[self.selected_field].is_interactive() {
                return;
            }
            self.selected_field = if forward {
                (self.selected_field + 1) % self.fields.len()
            } else {
                self.selected_field
                    .checked_sub(1)
                    .unwrap_or(self.fields.len() - 1)
            };
        }
    }

    fn current(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.selected_field)
    }

    /// Type a character into the current field.
    ///
    /// Space toggles checkboxes and advances choices.
    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.current() else {
            return;
        };
        let mut advance_choice = false;
        match &mut field.kind {
            FieldKind::Text { numeric, .. } => {
                let allowed = if *numeric {
                    c.is_ascii_digit() || c == '.'
                } else {
                    !c.is_control()
                };
                if allowed {
                    field.value.push(c);
                }
            }
            FieldKind::Choice { .. } => advance_choice = c == ' ',
            FieldKind::Check { checked } if c == ' ' => *checked = !*checked,
            _ => {}
        }
        if advance_choice {
            self.cycle(true);
        }
        self.error_message = None;
    }

    /// Step the current choice forward or back.
    pub fn cycle(&mut self, forward: bool) {
        let Some(field) = self.current() else {
            return;
        };
        if let FieldKind::Choice { options, selected } = &mut field.kind {
            if options.is_empty() {
                return;
            }
            let n = options.len();
            *selected = Some(match (*selected, forward) {
                (None, true) => 0,
                (None, false) => n - 1,
                (Some(i), true) => (i + 1) % n,
                (Some(i), false) => (i + n - 1) % n,
            });
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        if let Some(field) = self.current() {
            field.value.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        let Some(field) = self.current() else {
            return;
        };
        field.value.zeroize();
        match &mut field.kind {
            FieldKind::Choice { selected, .. } => *selected = None,
            FieldKind::Check { checked } => *checked = false,
            _ => {}
        }
    }

    /// Wipe all buffers and reset every answer.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
            match &mut field.kind {
                FieldKind::Choice { selected, .. } => *selected = None,
                FieldKind::Check { checked } => *checked = false,
                _ => {}
            }
        }
        self.error_message = None;
        self.selected_field = 0;
        self.skip_sections(true);
    }

    fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    /// Trimmed text of a field, `None` when blank.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.field(key)
            .map(|f| f.value.trim())
            .filter(|v| !v.is_empty())
    }

    /// Parse a numeric field. Blank yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns a message naming the field if the text does not parse.
    pub fn number<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, String> {
        let Some(raw) = self.text(key) else {
            return Ok(None);
        };
        let label = self.field(key).map_or(key, |f| f.label);
        raw.parse::<T>()
            .map(Some)
            .map_err(|_| format!("{label}: Invalid number"))
    }

    /// Index of the selected option.
    #[must_use]
    pub fn choice(&self, key: &str) -> Option<usize> {
        match self.field(key).map(|f| &f.kind) {
            Some(FieldKind::Choice { selected, .. }) => *selected,
            _ => None,
        }
    }

    #[must_use]
    pub fn checked(&self, key: &str) -> bool {
        matches!(
            self.field(key).map(|f| &f.kind),
            Some(FieldKind::Check { checked: true })
        )
    }

    /// Fill a field programmatically (sample data).
    pub fn set_text(&mut self, key: &str, value: &str) {
        if let Some(field) = self.field_mut(key) {
            field.value = value.to_string();
        }
    }

    pub fn set_choice(&mut self, key: &str, index: usize) {
        if let Some(FormField {
            kind: FieldKind::Choice { options, selected },
            ..
        }) = self.field_mut(key)
        {
            if index < options.len() {
                *selected = Some(index);
            }
        }
    }

    pub fn set_checked(&mut self, key: &str, value: bool) {
        if let Some(FormField {
            kind: FieldKind::Check { checked },
            ..
        }) = self.field_mut(key)
        {
            *checked = value;
        }
    }
}

/// Render a form with header, scrolling rows and key hints.
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Rows
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], state);
    render_form_rows(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, state: &FormState) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(state.title, MedicalTheme::title()),
        Span::styled(format!(" │ {}", state.subtitle), MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_rows(f: &mut Frame, area: Rect, state: &FormState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());
    let inner = block.inner(area);

    let lines: Vec<Line> = state
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| field_line(field, i == state.selected_field))
        .collect();

    // Keep the selected row in view.
    let visible = usize::from(inner.height.max(1));
    let offset = state.selected_field.saturating_sub(visible.saturating_sub(1));
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);

    let rows = Paragraph::new(lines).block(block).scroll((offset, 0));
    f.render_widget(rows, area);
}

fn field_line(field: &FormField, is_selected: bool) -> Line<'_> {
    let label_style = if is_selected {
        MedicalTheme::focused()
    } else {
        MedicalTheme::text_secondary()
    };
    let marker = if is_selected { "▸ " } else { "  " };

    let value = match &field.kind {
        FieldKind::Section => {
            return Line::from(Span::styled(
                format!(" {} ", field.label),
                MedicalTheme::subtitle(),
            ));
        }
        FieldKind::Text { hint, .. } if field.value.is_empty() => {
            Span::styled(*hint, MedicalTheme::text_muted())
        }
        FieldKind::Text { .. } => Span::styled(field.value.as_str(), MedicalTheme::text()),
        FieldKind::Choice { options, selected } => match selected.and_then(|i| options.get(i)) {
            Some(option) => Span::styled(format!("‹ {option} ›"), MedicalTheme::text()),
            None => Span::styled("‹ select ›", MedicalTheme::text_muted()),
        },
        FieldKind::Check { checked } => {
            if *checked {
                Span::styled("[x]", MedicalTheme::success())
            } else {
                Span::styled("[ ]", MedicalTheme::text_muted())
            }
        }
    };

    let cursor = if is_selected && matches!(field.kind, FieldKind::Text { .. }) {
        Span::styled("▌", MedicalTheme::cursor())
    } else {
        Span::raw("")
    };

    Line::from(vec![
        Span::styled(marker, MedicalTheme::key_hint()),
        Span::styled(format!("{:<34}", field.label), label_style),
        value,
        cursor,
    ])
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→/Space] ", MedicalTheme::key_hint()),
            Span::styled("Choose ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Submit ", MedicalTheme::key_desc()),
            Span::styled("[F2] ", MedicalTheme::key_hint()),
            Span::styled("Sample Data ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
