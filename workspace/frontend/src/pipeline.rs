//! Routing of a finished submission to what the user sees.

use std::cell::Cell;
use std::rc::Rc;

use common::{PredictionResponse, ValidationError};

use crate::api_client::PredictError;
use crate::chart::{ChartBackend, ChartLifecycleManager};

/// The parts of the page a submission outcome can touch.
pub trait ResultView {
    fn show_severity(&mut self, severity: &str);
    fn reveal_results(&mut self);
    fn hide_results(&mut self);
    /// Blocking notification; the user stays on the form.
    fn alert(&mut self, message: &str);
    fn navigate(&mut self, path: &str);
}

/// What a submission ended in.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    Rendered { severity: String, bars: usize },
    Alerted(String),
    Redirected(String),
}

pub struct ResultRenderer<B: ChartBackend> {
    charts: ChartLifecycleManager<B>,
    login_path: String,
}

impl<B: ChartBackend> ResultRenderer<B> {
    pub fn new(charts: ChartLifecycleManager<B>, login_path: impl Into<String>) -> Self {
        Self {
            charts,
            login_path: login_path.into(),
        }
    }

    pub fn charts(&self) -> &ChartLifecycleManager<B> {
        &self.charts
    }

    /// Form input could not be coerced; nothing was sent.
    pub fn reject<V: ResultView>(&mut self, view: &mut V, error: &ValidationError) -> Disposition {
        log::warn!("Form rejected: {}", error);
        let message = error.to_string();
        view.alert(&message);
        Disposition::Alerted(message)
    }

    pub fn finish<V: ResultView>(
        &mut self,
        view: &mut V,
        outcome: Result<PredictionResponse, PredictError>,
    ) -> Disposition {
        match outcome {
            Ok(prediction) => self.render(view, prediction),
            Err(err) if err.requires_login() => {
                log::info!("Session expired ({}), redirecting to {}", err, self.login_path);
                view.navigate(&self.login_path);
                Disposition::Redirected(self.login_path.clone())
            }
            Err(err) => {
                let message = err.user_message();
                view.alert(&message);
                Disposition::Alerted(message)
            }
        }
    }

    fn render<V: ResultView>(
        &mut self,
        view: &mut V,
        prediction: PredictionResponse,
    ) -> Disposition {
        // The previous chart is gone once this fails, so its results go too.
        if let Err(e) = self.charts.render(&prediction.probabilities) {
            log::error!("Failed to draw probability chart: {}", e);
            view.hide_results();
            let message = format!("Could not draw the probability chart: {}", e);
            view.alert(&message);
            return Disposition::Alerted(message);
        }

        view.show_severity(&prediction.severity);
        view.reveal_results();
        Disposition::Rendered {
            severity: prediction.severity,
            bars: prediction.probabilities.len(),
        }
    }

    /// Tears down the chart, e.g. when the page goes away.
    pub fn clear(&mut self) {
        self.charts.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
}

/// Admits one submission at a time.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGate {
    phase: Rc<Cell<SubmitPhase>>,
}

impl PartialEq for SubmissionGate {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.phase, &other.phase)
    }
}

impl SubmissionGate {
    pub fn phase(&self) -> SubmitPhase {
        self.phase.get()
    }

    /// `None` while another submission is in flight.
    pub fn try_begin(&self) -> Option<SubmissionTicket> {
        match self.phase.get() {
            SubmitPhase::Submitting => None,
            SubmitPhase::Idle => {
                self.phase.set(SubmitPhase::Submitting);
                Some(SubmissionTicket {
                    phase: Rc::clone(&self.phase),
                })
            }
        }
    }
}

/// Held for the duration of one submission; dropping it reopens the gate.
#[derive(Debug)]
pub struct SubmissionTicket {
    phase: Rc<Cell<SubmitPhase>>,
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.phase.set(SubmitPhase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::interpret;
    use crate::chart::testing::{ChartEvent, RecordingBackend};
    use common::{collect, fields, MapSource};

    #[derive(Debug, Default)]
    struct RecordingView {
        severity: Option<String>,
        revealed: bool,
        alerts: Vec<String>,
        navigations: Vec<String>,
    }

    impl ResultView for RecordingView {
        fn show_severity(&mut self, severity: &str) {
            self.severity = Some(severity.to_string());
        }

        fn reveal_results(&mut self) {
            self.revealed = true;
        }

        fn hide_results(&mut self) {
            self.revealed = false;
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }

        fn navigate(&mut self, path: &str) {
            self.navigations.push(path.to_string());
        }
    }

    fn renderer() -> ResultRenderer<RecordingBackend> {
        ResultRenderer::new(ChartLifecycleManager::new(RecordingBackend::default()), "/login")
    }

    const SUCCESS: &str = r#"{"severity":"SEVERE","probabilities":{
        "MILD":0.1,"MODERATE":0.2,"SEVERE":0.6,"VERY SEVERE":0.1}}"#;
    const MILD: &str = r#"{"severity":"MILD","probabilities":{"MILD":0.9,"SEVERE":0.1}}"#;

    #[test]
    fn test_success_renders_severity_and_chart() {
        let mut renderer = renderer();
        let mut view = RecordingView::default();

        let disposition = renderer.finish(&mut view, interpret(200, false, SUCCESS));

        assert_eq!(
            disposition,
            Disposition::Rendered {
                severity: "SEVERE".to_string(),
                bars: 4
            }
        );
        assert_eq!(view.severity.as_deref(), Some("SEVERE"));
        assert!(view.revealed);
        assert!(view.alerts.is_empty());
        assert_eq!(renderer.charts().backend().live_count(), 1);
        assert_eq!(
            renderer.charts().backend().events,
            vec![ChartEvent::Created { id: 0, bars: 4 }]
        );
    }

    #[test]
    fn test_two_successes_keep_one_chart() {
        let mut renderer = renderer();
        let mut view = RecordingView::default();

        renderer.finish(&mut view, interpret(200, false, SUCCESS));
        renderer.finish(&mut view, interpret(200, false, MILD));

        let backend = renderer.charts().backend();
        assert_eq!(backend.live_count(), 1);
        assert_eq!(backend.max_live, 1);
        assert_eq!(backend.events[1], ChartEvent::Destroyed { id: 0 });
        assert_eq!(view.severity.as_deref(), Some("MILD"));
    }

    #[test]
    fn test_application_error_alerts_without_touching_chart() {
        let mut renderer = renderer();
        let mut view = RecordingView::default();
        renderer.finish(&mut view, interpret(200, false, SUCCESS));

        let disposition =
            renderer.finish(&mut view, interpret(400, false, r#"{"error":"invalid input"}"#));

        assert_eq!(disposition, Disposition::Alerted("invalid input".to_string()));
        assert_eq!(view.alerts, vec!["invalid input".to_string()]);
        assert!(view.navigations.is_empty());
        assert_eq!(renderer.charts().backend().events.len(), 1);
        assert!(renderer.charts().is_live());
    }

    #[test]
    fn test_malformed_body_redirects_silently() {
        let mut renderer = renderer();
        let mut view = RecordingView::default();

        let disposition = renderer.finish(&mut view, interpret(200, false, "<html>Login</html>"));

        assert_eq!(disposition, Disposition::Redirected("/login".to_string()));
        assert_eq!(view.navigations, vec!["/login".to_string()]);
        assert!(view.alerts.is_empty());
        assert!(view.severity.is_none());
        assert!(renderer.charts().backend().events.is_empty());
    }

    #[test]
    fn test_unauthorized_redirects() {
        let mut renderer = renderer();
        let mut view = RecordingView::default();

        renderer.finish(&mut view, interpret(401, false, ""));

        assert_eq!(view.navigations, vec!["/login".to_string()]);
        assert!(view.alerts.is_empty());
    }

    #[test]
    fn test_transport_failure_alerts_generic_message() {
        let mut renderer = renderer();
        let mut view = RecordingView::default();

        let err = PredictError::Transport("connection refused".to_string());
        let expected = err.user_message();
        renderer.finish(&mut view, Err(err));

        assert_eq!(view.alerts, vec![expected]);
        assert!(view.navigations.is_empty());
        assert!(renderer.charts().backend().events.is_empty());
    }

    #[test]
    fn test_chart_failure_is_alerted() {
        let charts = ChartLifecycleManager::new(RecordingBackend::failing_from(0));
        let mut renderer = ResultRenderer::new(charts, "/login");
        let mut view = RecordingView::default();

        let disposition = renderer.finish(&mut view, interpret(200, false, SUCCESS));

        assert!(matches!(disposition, Disposition::Alerted(_)));
        assert!(!view.revealed);
        assert!(view.severity.is_none());
        assert!(!renderer.charts().is_live());
    }

    #[test]
    fn test_chart_failure_after_success_hides_stale_results() {
        let charts = ChartLifecycleManager::new(RecordingBackend::failing_from(1));
        let mut renderer = ResultRenderer::new(charts, "/login");
        let mut view = RecordingView::default();

        renderer.finish(&mut view, interpret(200, false, SUCCESS));
        assert!(view.revealed);

        let disposition = renderer.finish(&mut view, interpret(200, false, MILD));

        assert!(matches!(disposition, Disposition::Alerted(_)));
        assert_eq!(view.alerts.len(), 1);
        assert!(!view.revealed);
        assert_eq!(view.severity.as_deref(), Some("SEVERE"));
        assert!(!renderer.charts().is_live());
        assert_eq!(renderer.charts().backend().live_count(), 0);
    }

    #[test]
    fn test_validation_error_alerts_field() {
        let mut renderer = renderer();
        let mut view = RecordingView::default();
        let err = collect(&MapSource::new().with(fields::AGE, "sixty")).unwrap_err();

        renderer.reject(&mut view, &err);

        assert_eq!(view.alerts.len(), 1);
        assert!(view.alerts[0].contains("age"));
        assert!(renderer.charts().backend().events.is_empty());
    }

    #[test]
    fn test_gate_rejects_overlapping_submissions() {
        let gate = SubmissionGate::default();
        assert_eq!(gate.phase(), SubmitPhase::Idle);

        let ticket = gate.try_begin().expect("idle gate admits");
        assert_eq!(gate.phase(), SubmitPhase::Submitting);
        assert!(gate.clone().try_begin().is_none());

        drop(ticket);
        assert_eq!(gate.phase(), SubmitPhase::Idle);
        assert!(gate.try_begin().is_some());
    }

    #[test]
    fn test_clear_destroys_chart() {
        let mut renderer = renderer();
        let mut view = RecordingView::default();
        renderer.finish(&mut view, interpret(200, false, SUCCESS));

        renderer.clear();

        assert!(!renderer.charts().is_live());
        assert_eq!(renderer.charts().backend().live_count(), 0);
    }
}
