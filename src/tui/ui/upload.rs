//! X-ray intake: patient details plus the image file path.

use std::path::Path;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::form::{render_form, FormField, FormState};
use crate::domain::{
    mime_from_name, Gender, PatientData, PatientDraft, UploadError, XrayFile, MEDICAL_HISTORY,
};
use crate::tui::styles::MedicalTheme;

const HISTORY_KEYS: [&str; 6] = [
    "history_fractures",
    "history_family",
    "history_ra",
    "history_steroids",
    "history_thyroid",
    "history_menopause",
];

/// Intake form state
pub struct UploadFormState {
    pub form: FormState,
    /// Last file accepted from the path field
    pub attached: Option<XrayFile>,
}

impl Default for UploadFormState {
    fn default() -> Self {
        let mut fields = vec![
            FormField::section("Patient Information"),
            FormField::text("patient_id", "Patient ID", "e.g. P-2024-001"),
            FormField::text("name", "Full Name", "patient name"),
            FormField::number("age", "Age", "years"),
            FormField::choice(
                "gender",
                "Gender",
                Gender::ALL.iter().map(Gender::label).collect(),
            ),
            FormField::number("height", "Height", "cm"),
            FormField::number("weight", "Weight", "kg"),
            FormField::section("Medical History"),
        ];
        fields.extend(
            HISTORY_KEYS
                .iter()
                .zip(MEDICAL_HISTORY)
                .map(|(key, label)| FormField::check(*key, label)),
        );
        fields.push(FormField::section("X-ray Image"));
        fields.push(FormField::text(
            "xray_path",
            "File path",
            "JPEG, PNG or DICOM (.dcm)",
        ));

        let mut form = FormState::new("New X-ray Analysis", "Patient Intake", fields);
        form.set_choice("gender", 0);

        Self {
            form,
            attached: None,
        }
    }
}

impl UploadFormState {
    /// Read and validate the file named in the path field.
    ///
    /// # Errors
    /// Returns a user-facing message if the file is missing, unreadable or
    /// rejected by the upload rules.
    pub fn attach(&mut self, max_bytes: u64) -> Result<&XrayFile, String> {
        let path = self
            .form
            .text("xray_path")
            .ok_or_else(|| "Enter the path of an X-ray image".to_string())?
            .to_string();

        self.attached = None;
        let file = load_xray(Path::new(&path), max_bytes)?;
        tracing::debug!(
            "X-ray attached: {} bytes, sha256 {}",
            file.size_bytes,
            file.short_fingerprint()
        );
        let file = self.attached.insert(file);
        Ok(&*file)
    }

    /// Build the patient record from the form and the file currently named
    /// in the path field.
    ///
    /// The file is read and checked again on every call, so an edited path
    /// never reuses bytes from an earlier attachment.
    ///
    /// # Errors
    /// Returns a user-facing message for invalid numbers, rejected files or
    /// missing required fields.
    pub fn to_patient(&mut self, max_bytes: u64) -> Result<PatientData, String> {
        if self.form.text("xray_path").is_some() {
            self.attach(max_bytes)?;
        } else {
            self.attached = None;
        }

        let gender = self
            .form
            .choice("gender")
            .and_then(|i| Gender::ALL.get(i).copied())
            .unwrap_or(Gender::Female);

        let mut draft = PatientDraft {
            patient_id: self.form.text("patient_id").unwrap_or_default().to_string(),
            name: self.form.text("name").unwrap_or_default().to_string(),
            age: self.form.number("age")?.unwrap_or(0),
            gender,
            height: self.form.number("height")?.unwrap_or(0.0),
            weight: self.form.number("weight")?.unwrap_or(0.0),
            xray: self.attached.clone(),
            ..PatientDraft::default()
        };
        for (key, condition) in HISTORY_KEYS.iter().zip(MEDICAL_HISTORY) {
            draft.set_history(condition, self.form.checked(key));
        }

        draft.build().map_err(|e| e.to_string())
    }

    /// Load sample data for testing
    pub fn load_sample_data(&mut self) {
        self.form.set_text("patient_id", "P-2024-001");
        self.form.set_text("name", "Sample Patient");
        self.form.set_text("age", "68");
        self.form.set_choice("gender", 0);
        self.form.set_text("height", "160");
        self.form.set_text("weight", "58");
        self.form.set_checked("history_fractures", true);
    }

    /// Wipe all patient data held by the form.
    pub fn clear_sensitive(&mut self) {
        self.form.clear_sensitive();
        self.form.set_choice("gender", 0);
        self.attached = None;
    }
}

fn load_xray(path: &Path, max_bytes: u64) -> Result<XrayFile, String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| format!("Not a file: {}", path.display()))?;

    let metadata =
        std::fs::metadata(path).map_err(|e| format!("Cannot open {}: {e}", path.display()))?;
    if metadata.len() > max_bytes {
        return Err(UploadError::TooLarge {
            size: metadata.len(),
            limit: max_bytes,
        }
        .to_string());
    }

    let bytes = std::fs::read(path).map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
    XrayFile::accept(&name, mime_from_name(&name), &bytes, max_bytes).map_err(|e| e.to_string())
}

/// Render the intake screen
pub fn render_upload(f: &mut Frame, area: Rect, state: &UploadFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    render_form(f, columns[0], &state.form);
    render_file_panel(f, columns[1], state.attached.as_ref());
}

fn render_file_panel(f: &mut Frame, area: Rect, attached: Option<&XrayFile>) {
    let block = Block::default()
        .title(Span::styled(" X-ray File ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let lines = match attached {
        None => vec![
            Line::from(Span::styled(
                "No file attached.",
                MedicalTheme::text_muted(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Supports JPEG, PNG and DICOM formats.",
                MedicalTheme::text_secondary(),
            )),
        ],
        Some(file) => {
            let kind = if file.is_dicom() {
                "DICOM (preview not available)"
            } else {
                file.mime.as_deref().unwrap_or("unknown")
            };
            vec![
                Line::from(vec![
                    Span::styled("Name: ", MedicalTheme::text_secondary()),
                    Span::styled(file.name.clone(), MedicalTheme::text()),
                ]),
                Line::from(vec![
                    Span::styled("Type: ", MedicalTheme::text_secondary()),
                    Span::styled(kind, MedicalTheme::text()),
                ]),
                Line::from(vec![
                    Span::styled("Size: ", MedicalTheme::text_secondary()),
                    Span::styled(
                        format!("{:.2} MB", file.size_bytes as f64 / 1024.0 / 1024.0),
                        MedicalTheme::text(),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("SHA-256: ", MedicalTheme::text_secondary()),
                    Span::styled(file.short_fingerprint().to_string(), MedicalTheme::text_muted()),
                ]),
                Line::from(""),
                Line::from(Span::styled("OK File ready", MedicalTheme::success())),
            ]
        }
    };

    let panel = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UNSUPPORTED_TYPE_MESSAGE;
    use std::path::PathBuf;

    const MAX: u64 = 1024 * 1024;

    /// Per-test directory, removed on drop.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir()
                .join(format!("osteoscan-upload-{tag}-{}", std::process::id()));
            std::fs::create_dir_all(&dir).expect("Should create temp dir");
            Self(dir)
        }

        fn file(&self, relative: &str, bytes: &[u8]) -> PathBuf {
            let path = self.0.join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("Should create parent dir");
            }
            std::fs::write(&path, bytes).expect("Should write temp file");
            path
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn set_path(state: &mut UploadFormState, path: &Path) {
        state
            .form
            .set_text("xray_path", path.to_str().expect("Should be utf-8 path"));
    }

    #[test]
    fn test_sample_data_without_file_is_incomplete() {
        let mut state = UploadFormState::default();
        state.load_sample_data();

        let err = state.to_patient(MAX).expect_err("Should require X-ray");
        assert!(err.contains("xrayFile"));
    }

    #[test]
    fn test_complete_intake_builds_patient() {
        let dir = ScratchDir::new("complete");
        let path = dir.file("knee.png", b"\x89PNG fake image data");
        let mut state = UploadFormState::default();
        state.load_sample_data();
        set_path(&mut state, &path);

        let patient = state.to_patient(MAX).expect("Should build patient");

        assert_eq!(patient.patient_id, "P-2024-001");
        assert_eq!(patient.age, 68);
        assert_eq!(patient.gender, Gender::Female);
        assert!(patient.has_history("Previous fractures"));
        let xray = patient.xray.expect("Should carry X-ray");
        assert_eq!(xray.name, "knee.png");
        assert!(xray
            .preview
            .is_some_and(|p| p.starts_with("data:image/png;base64,")));
    }

    #[test]
    fn test_unsupported_file_is_rejected() {
        let dir = ScratchDir::new("unsupported");
        let path = dir.file("notes.txt", b"not an image");
        let mut state = UploadFormState::default();
        state.load_sample_data();
        set_path(&mut state, &path);

        let err = state.to_patient(MAX).expect_err("Should reject text file");
        assert_eq!(err, UNSUPPORTED_TYPE_MESSAGE);
        assert!(state.attached.is_none());
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let dir = ScratchDir::new("oversized");
        let path = dir.file("large.dcm", &[0u8; 64]);
        let mut state = UploadFormState::default();
        set_path(&mut state, &path);

        let err = state.attach(16).expect_err("Should reject large file");
        assert!(err.contains("too large"));
    }

    #[test]
    fn test_clear_sensitive_drops_attachment() {
        let dir = ScratchDir::new("clear");
        let path = dir.file("scan.dcm", b"DICM");
        let mut state = UploadFormState::default();
        set_path(&mut state, &path);
        state.attach(MAX).expect("Should attach DICOM");
        assert!(state.attached.as_ref().is_some_and(XrayFile::is_dicom));

        state.clear_sensitive();
        assert!(state.attached.is_none());
        assert_eq!(state.form.text("xray_path"), None);
        assert_eq!(state.form.choice("gender"), Some(0));
    }

    #[test]
    fn test_changed_path_reloads_same_named_file() {
        let dir = ScratchDir::new("same-name");
        let first = dir.file("a/knee.png", b"\x89PNG first");
        let second = dir.file("b/knee.png", b"\x89PNG second image");
        let mut state = UploadFormState::default();
        state.load_sample_data();

        set_path(&mut state, &first);
        let before = state
            .to_patient(MAX)
            .expect("Should build patient")
            .xray
            .expect("Should carry X-ray");

        set_path(&mut state, &second);
        let after = state
            .to_patient(MAX)
            .expect("Should build patient")
            .xray
            .expect("Should carry X-ray");

        assert_eq!(before.name, after.name);
        assert_ne!(before.sha256, after.sha256);
        assert_eq!(after.size_bytes, 17);
    }

    #[test]
    fn test_missing_path_after_attach_is_rejected() {
        let dir = ScratchDir::new("missing");
        let path = dir.file("knee.png", b"\x89PNG fake image data");
        let mut state = UploadFormState::default();
        state.load_sample_data();
        set_path(&mut state, &path);
        state.to_patient(MAX).expect("Should build patient");

        set_path(&mut state, &dir.0.join("gone").join("knee.png"));
        let err = state.to_patient(MAX).expect_err("Should reject missing file");

        assert!(err.starts_with("Cannot open"));
        assert!(state.attached.is_none());
    }
}
