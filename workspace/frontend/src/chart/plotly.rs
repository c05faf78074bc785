use js_sys::Promise;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{BarChartSpec, ChartBackend, ChartError};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = Plotly, js_name = newPlot)]
    fn new_plot(div_id: &str, figure: JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = Plotly)]
    fn purge(div_id: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["Plotly", "Plots"], js_name = resize)]
    fn plots_resize(div_id: &str) -> Result<Promise, JsValue>;
}

/// Plotly reports layout failures through the returned promise, not by throwing.
fn log_rejection(action: &'static str, div_id: String, promise: Promise) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            log::error!("Plotly {} of '{}' failed: {:?}", action, div_id, e);
        }
    });
}

/// Refits a chart to its container, e.g. after the container stops being hidden.
pub fn resize_chart(surface: &str) {
    match plots_resize(surface) {
        Ok(promise) => log_rejection("resize", surface.to_string(), promise),
        Err(e) => log::warn!("Failed to resize chart '{}': {:?}", surface, e),
    }
}

/// A chart Plotly has drawn into the element with this id.
#[derive(Debug)]
pub struct PlotlyChart {
    div_id: String,
}

/// Draws through the global `Plotly` object loaded by the host page.
#[derive(Debug, Default)]
pub struct PlotlyBackend;

impl ChartBackend for PlotlyBackend {
    type Handle = PlotlyChart;

    fn create(&mut self, surface: &str, spec: &BarChartSpec) -> Result<PlotlyChart, ChartError> {
        // Plain objects, not ES Maps: Plotly ignores Map instances.
        let figure = spec
            .figure()
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| ChartError::Serialize(e.to_string()))?;

        let drawn =
            new_plot(surface, figure).map_err(|e| ChartError::Library(format!("{:?}", e)))?;
        log_rejection("newPlot", surface.to_string(), drawn);
        log::debug!("Plotted {} bars into '{}'", spec.bar_count(), surface);

        Ok(PlotlyChart {
            div_id: surface.to_string(),
        })
    }

    fn destroy(&mut self, chart: PlotlyChart) {
        if let Err(e) = purge(&chart.div_id) {
            log::warn!("Failed to purge chart '{}': {:?}", chart.div_id, e);
        }
    }
}
