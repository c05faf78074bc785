//! Ownership of the single probability chart on the page.
//!
//! [`ChartLifecycleManager`] holds at most one live handle. Every render
//! destroys the held handle before asking the backend for a new one, so two
//! charts never coexist on the surface.

pub mod plotly;

use common::ProbabilityMap;
use serde_json::json;
use thiserror::Error;

/// Id of the element the probability chart is drawn into.
pub const CHART_SURFACE_ID: &str = "probabilityChart";

const TITLE: &str = "COPD Severity Probabilities";
const DATASET_LABEL: &str = "Probability";
const BAR_FILL: &str = "rgba(54, 162, 235, 0.5)";
const BAR_BORDER: &str = "rgba(54, 162, 235, 1)";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChartError {
    #[error("Failed to convert chart figure: {0}")]
    Serialize(String),

    #[error("Chart library error: {0}")]
    Library(String),
}

/// A single-dataset bar chart on a closed [0, 1] scale.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl BarChartSpec {
    pub fn probabilities(probabilities: &ProbabilityMap) -> Self {
        Self {
            title: TITLE.to_string(),
            labels: probabilities.labels(),
            values: probabilities.values(),
        }
    }

    pub fn bar_count(&self) -> usize {
        self.labels.len()
    }

    /// Plotly figure (`data`, `layout`, `config`) for this chart.
    pub fn figure(&self) -> serde_json::Value {
        json!({
            "data": [{
                "type": "bar",
                "name": DATASET_LABEL,
                "x": self.labels,
                "y": self.values,
                "marker": {
                    "color": BAR_FILL,
                    "line": {"color": BAR_BORDER, "width": 1}
                }
            }],
            "layout": {
                "title": {"text": self.title},
                "showlegend": false,
                "xaxis": {"type": "category"},
                "yaxis": {
                    "range": [0.0, 1.0],
                    "fixedrange": true,
                    "title": {"text": DATASET_LABEL}
                }
            },
            "config": {"responsive": true, "displayModeBar": false}
        })
    }
}

/// Something that can draw a chart onto a surface and tear it down again.
pub trait ChartBackend {
    /// Owned token for one live chart. Deliberately not `Clone`.
    type Handle;

    fn create(&mut self, surface: &str, spec: &BarChartSpec) -> Result<Self::Handle, ChartError>;

    fn destroy(&mut self, handle: Self::Handle);
}

pub struct ChartLifecycleManager<B: ChartBackend> {
    backend: B,
    surface: String,
    current: Option<B::Handle>,
}

impl<B: ChartBackend> ChartLifecycleManager<B> {
    pub fn new(backend: B) -> Self {
        Self::with_surface(backend, CHART_SURFACE_ID)
    }

    pub fn with_surface(backend: B, surface: impl Into<String>) -> Self {
        Self {
            backend,
            surface: surface.into(),
            current: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.current.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replaces whatever chart is showing with one built from `probabilities`.
    ///
    /// On failure no chart is held; the previous one is already gone.
    pub fn render(&mut self, probabilities: &ProbabilityMap) -> Result<(), ChartError> {
        self.clear();

        if probabilities.is_empty() {
            log::warn!("Prediction carried no class probabilities; drawing an empty chart");
        }
        let spec = BarChartSpec::probabilities(probabilities);
        log::trace!("Creating chart on '{}' with {} bars", self.surface, spec.bar_count());
        let handle = self.backend.create(&self.surface, &spec)?;
        self.current = Some(handle);
        Ok(())
    }

    /// Destroys the held chart, if any.
    pub fn clear(&mut self) {
        if let Some(handle) = self.current.take() {
            log::trace!("Destroying chart on '{}'", self.surface);
            self.backend.destroy(handle);
        }
    }
}
