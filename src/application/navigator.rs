//! Navigation state: which view is shown and the data each view needs.
//!
//! All transitions live here so the front-end only maps input to calls.
//! The scoring engine is never invoked from this module; callers pass
//! finished results in.

use crate::domain::{AnalysisResults, PatientData, RiskResult, StoredScan};

/// Number of scans listed on the dashboard.
pub const RECENT_SCAN_LIMIT: usize = 5;

/// Application views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Welcome,
    Dashboard,
    XrayUpload,
    AiAnalysis,
    AiResults,
    Assessment,
    AssessmentResults,
    RecentScans,
    History,
}

/// View-controller state.
#[derive(Debug, Default)]
pub struct AppState {
    view: View,
    patient: Option<PatientData>,
    analysis: Option<AnalysisResults>,
    assessment: Option<RiskResult>,
    scans: Vec<StoredScan>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The view to render.
    ///
    /// Views that need data fall back to `Welcome` when it is absent.
    #[must_use]
    pub fn view(&self) -> View {
        match self.view {
            View::AiAnalysis if self.patient.is_none() => View::Welcome,
            View::AiResults if self.analysis.is_none() => View::Welcome,
            View::AssessmentResults if self.assessment.is_none() => View::Welcome,
            view => view,
        }
    }

    #[must_use]
    pub fn patient(&self) -> Option<&PatientData> {
        self.patient.as_ref()
    }

    #[must_use]
    pub fn analysis(&self) -> Option<&AnalysisResults> {
        self.analysis.as_ref()
    }

    #[must_use]
    pub fn assessment(&self) -> Option<&RiskResult> {
        self.assessment.as_ref()
    }

    /// All scans, newest first.
    #[must_use]
    pub fn scans(&self) -> &[StoredScan] {
        &self.scans
    }

    /// Newest scans shown on the dashboard.
    #[must_use]
    pub fn recent_scans(&self) -> &[StoredScan] {
        &self.scans[..self.scans.len().min(RECENT_SCAN_LIMIT)]
    }

    pub fn start_clinical(&mut self) {
        self.view = View::Dashboard;
    }

    pub fn start_assessment(&mut self) {
        self.view = View::Assessment;
    }

    pub fn new_scan(&mut self) {
        self.view = View::XrayUpload;
    }

    pub fn view_history(&mut self) {
        self.view = View::History;
    }

    pub fn view_recent_scans(&mut self) {
        self.view = View::RecentScans;
    }

    /// Intake submitted: hold the patient and show the progress screen.
    pub fn upload_complete(&mut self, patient: PatientData) {
        self.patient = Some(patient);
        self.view = View::AiAnalysis;
    }

    /// Analysis finished: record the scan and show its results.
    ///
    /// Returns the stored scan so the caller can hand it to the history
    /// service.
    pub fn analysis_complete(&mut self, results: AnalysisResults) -> &StoredScan {
        self.analysis_complete_with(StoredScan::new(results.clone()), results)
    }

    /// [`Self::analysis_complete`] with a prebuilt scan record.
    pub fn analysis_complete_with(
        &mut self,
        scan: StoredScan,
        results: AnalysisResults,
    ) -> &StoredScan {
        self.analysis = Some(results);
        self.scans.insert(0, scan);
        self.view = View::AiResults;
        &self.scans[0]
    }

    pub fn assessment_complete(&mut self, result: RiskResult) {
        self.assessment = Some(result);
        self.view = View::AssessmentResults;
    }

    /// Leave the clinical flow for the dashboard, dropping the current case.
    pub fn back_to_dashboard(&mut self) {
        self.view = View::Dashboard;
        self.patient = None;
        self.analysis = None;
    }

    /// Return to the landing view, dropping every in-progress result.
    pub fn back_to_welcome(&mut self) {
        self.view = View::Welcome;
        self.patient = None;
        self.analysis = None;
        self.assessment = None;
    }

    /// Discard assessment results and return to the landing view.
    pub fn start_over(&mut self) {
        self.assessment = None;
        self.view = View::Welcome;
    }

    /// Show a stored scan's results. Unknown ids leave the state unchanged.
    pub fn open_scan(&mut self, id: &str) -> bool {
        let Some(scan) = self.scans.iter().find(|s| s.id() == id) else {
            return false;
        };
        self.analysis = Some(scan.results.clone());
        self.view = View::AiResults;
        true
    }
}
