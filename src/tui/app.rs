//! Main TUI application.
//!
//! Handles:
//! - Terminal setup and the draw/input loop
//! - Mapping keys to `AppState` transitions
//! - Driving the analysis worker and recording finished scans

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::HttpHistorySink;
use crate::application::{AppState, AssessmentService, HistoryService, PipelineSchedule, View};
use crate::config::AppConfig;

use super::ui::{
    analysis::{render_analysis, render_results, AnalysisViewState},
    assessment::{render_assessment_form, render_assessment_results, AssessmentFormState},
    dashboard::{render_dashboard, render_welcome, ScanSummary},
    form::FormState,
    history::{render_scan_list, ScanListState},
    render_disclaimer,
    upload::{render_upload, UploadFormState},
};
use super::worker::{AnalysisProgress, AnalysisWorker, AnalysisWorkerHandle};

/// Main application state
pub struct App {
    config: AppConfig,

    /// Navigation and stored scans
    state: AppState,

    /// Whether the app should quit
    should_quit: bool,

    history: HistoryService<HttpHistorySink>,
    assessment_service: AssessmentService,

    upload_form: UploadFormState,
    assessment_form: AssessmentFormState,
    analysis_view: AnalysisViewState,
    dashboard_selection: ScanListState,
    list_selection: ScanListState,

    /// Running analysis worker (if any). Dropping it cancels the run.
    pending_worker: Option<AnalysisWorkerHandle>,
}

impl App {
    /// Create the application, connecting the history sink when enabled.
    ///
    /// A sink that cannot be constructed disables history instead of failing
    /// startup.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let history = if config.history_enabled {
            match HttpHistorySink::new(&config.history_base_url, config.history_timeout) {
                Ok(sink) => {
                    tracing::info!("Scan history will be posted to {}", sink.endpoint());
                    HistoryService::new(Arc::new(sink))
                }
                Err(e) => {
                    tracing::warn!("History sink unavailable, continuing without it: {e}");
                    HistoryService::disabled()
                }
            }
        } else {
            tracing::info!("Scan history posting disabled");
            HistoryService::disabled()
        };

        Self::with_dependencies(config, history)
    }

    /// Create application with an injected history service.
    #[must_use]
    pub fn with_dependencies(config: AppConfig, history: HistoryService<HttpHistorySink>) -> Self {
        Self {
            config,
            state: AppState::new(),
            should_quit: false,
            history,
            assessment_service: AssessmentService::new(),
            upload_form: UploadFormState::default(),
            assessment_form: AssessmentFormState::default(),
            analysis_view: AnalysisViewState::default(),
            dashboard_selection: ScanListState::default(),
            list_selection: ScanListState::default(),
            pending_worker: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);
        if let Err(e) = &result {
            tracing::error!("UI loop failed: {e}");
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();

            terminal.draw(|f| self.render(f))?;

            // Short poll keeps the progress bar moving.
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        self.pending_worker = None;
        Ok(())
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(f.area());

        let content_area = chunks[0];
        let disclaimer_area = chunks[1];

        match self.state.view() {
            View::Welcome => render_welcome(f, content_area),
            View::Dashboard => render_dashboard(
                f,
                content_area,
                self.state.recent_scans(),
                ScanSummary::from_scans(self.state.scans()),
                self.dashboard_selection.selected,
                self.history.is_enabled(),
            ),
            View::XrayUpload => render_upload(f, content_area, &self.upload_form),
            View::AiAnalysis => render_analysis(
                f,
                content_area,
                &self.analysis_view,
                self.state.patient(),
            ),
            View::AiResults => {
                if let Some(results) = self.state.analysis() {
                    render_results(f, content_area, results);
                }
            }
            View::Assessment => render_assessment_form(f, content_area, &self.assessment_form),
            View::AssessmentResults => {
                if let Some(result) = self.state.assessment() {
                    render_assessment_results(f, content_area, result);
                }
            }
            View::RecentScans => render_scan_list(
                f,
                content_area,
                "Recent Scans",
                self.state.scans(),
                &self.list_selection,
            ),
            View::History => render_scan_list(
                f,
                content_area,
                "Patient History",
                self.state.scans(),
                &self.list_selection,
            ),
        }

        render_disclaimer(f, disclaimer_area);
    }

    /// Drain progress messages from the background worker.
    fn poll_worker(&mut self) {
        loop {
            let Some(progress) = self
                .pending_worker
                .as_ref()
                .and_then(AnalysisWorkerHandle::try_recv)
            else {
                break;
            };

            match progress {
                AnalysisProgress::Step {
                    progress,
                    step,
                    phase,
                } => {
                    self.analysis_view = AnalysisViewState {
                        progress,
                        step,
                        phase,
                    };
                }
                AnalysisProgress::Complete(results) => {
                    self.pending_worker = None;
                    let scan = self.state.analysis_complete(*results);
                    tracing::info!("Scan stored: stage={}, risk={}", scan.entry.stage, scan.entry.risk);
                    // Fire-and-forget: delivery failures are logged by the service.
                    let _ = self.history.persist(scan);
                    break;
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        match self.state.view() {
            View::Welcome => self.handle_welcome_key(key),
            View::Dashboard => self.handle_dashboard_key(key),
            View::XrayUpload => self.handle_upload_key(key),
            View::AiAnalysis => self.handle_analysis_key(key),
            View::AiResults => self.handle_results_key(key),
            View::Assessment => self.handle_assessment_key(key),
            View::AssessmentResults => self.handle_assessment_results_key(key),
            View::RecentScans | View::History => self.handle_scan_list_key(key),
        }
    }

    fn handle_welcome_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.dashboard_selection = ScanListState::default();
                self.state.start_clinical();
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.assessment_form.clear_sensitive();
                self.state.start_assessment();
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        let recent_len = self.state.recent_scans().len();
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => self.open_new_scan(),
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.list_selection = ScanListState::default();
                self.state.view_history();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.list_selection = ScanListState::default();
                self.state.view_recent_scans();
            }
            KeyCode::Up => self.dashboard_selection.prev(recent_len),
            KeyCode::Down => self.dashboard_selection.next(recent_len),
            KeyCode::Enter => {
                let id = self
                    .dashboard_selection
                    .selected_id(self.state.recent_scans())
                    .map(str::to_string);
                if let Some(id) = id {
                    self.state.open_scan(&id);
                }
            }
            KeyCode::Esc => self.state.back_to_welcome(),
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_upload_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.upload_form.clear_sensitive();
                self.state.back_to_dashboard();
            }
            KeyCode::F(2) => self.upload_form.load_sample_data(),
            KeyCode::Enter => self.submit_upload(),
            other => edit_form(&mut self.upload_form.form, other),
        }
    }

    fn handle_analysis_key(&mut self, key: KeyCode) {
        if key == KeyCode::Esc {
            // Dropping the handle stops the timer thread before it can complete.
            self.pending_worker = None;
            self.analysis_view = AnalysisViewState::default();
            tracing::info!("Analysis cancelled by user");
            self.state.back_to_dashboard();
        }
    }

    fn handle_results_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('n') | KeyCode::Char('N') => self.open_new_scan(),
            KeyCode::Enter | KeyCode::Esc => self.state.back_to_dashboard(),
            _ => {}
        }
    }

    fn handle_assessment_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.assessment_form.clear_sensitive();
                self.state.back_to_welcome();
            }
            KeyCode::F(2) => self.assessment_form.load_sample_data(),
            KeyCode::Enter => self.submit_assessment(),
            other => edit_form(&mut self.assessment_form.form, other),
        }
    }

    fn handle_assessment_results_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('s') | KeyCode::Char('S') => self.state.start_over(),
            KeyCode::Esc => self.state.back_to_welcome(),
            _ => {}
        }
    }

    fn handle_scan_list_key(&mut self, key: KeyCode) {
        let len = self.state.scans().len();
        match key {
            KeyCode::Up => self.list_selection.prev(len),
            KeyCode::Down => self.list_selection.next(len),
            KeyCode::Enter => {
                self.list_selection.clamp(len);
                let id = self
                    .list_selection
                    .selected_id(self.state.scans())
                    .map(str::to_string);
                if let Some(id) = id {
                    self.state.open_scan(&id);
                }
            }
            KeyCode::Esc => self.state.back_to_dashboard(),
            _ => {}
        }
    }

    fn open_new_scan(&mut self) {
        self.upload_form.clear_sensitive();
        self.state.new_scan();
    }

    fn submit_upload(&mut self) {
        match self.upload_form.to_patient(self.config.max_upload_bytes) {
            Ok(patient) => {
                self.analysis_view = AnalysisViewState::default();
                self.pending_worker = Some(AnalysisWorker::spawn(
                    patient.clone(),
                    PipelineSchedule::default(),
                    self.config.tick_interval,
                ));
                self.state.upload_complete(patient);

                // Clear plaintext buffers from the UI immediately.
                self.upload_form.clear_sensitive();
            }
            Err(message) => {
                self.upload_form.form.error_message = Some(message);
            }
        }
    }

    fn submit_assessment(&mut self) {
        let outcome = self
            .assessment_form
            .to_draft()
            .and_then(|draft| {
                self.assessment_service
                    .submit(&draft)
                    .map_err(|e| e.to_string())
            });

        match outcome {
            Ok(result) => {
                self.assessment_form.clear_sensitive();
                self.state.assessment_complete(result);
            }
            Err(message) => {
                self.assessment_form.form.error_message = Some(message);
            }
        }
    }
}

fn edit_form(form: &mut FormState, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::BackTab => form.prev_field(),
        KeyCode::Down | KeyCode::Tab => form.next_field(),
        KeyCode::Left => form.cycle(false),
        KeyCode::Right => form.cycle(true),
        KeyCode::Char(c) => form.input_char(c),
        KeyCode::Backspace => form.delete_char(),
        KeyCode::Delete => form.clear_field(),
        _ => {}
    }
}
