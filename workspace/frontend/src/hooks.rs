use std::cell::RefCell;
use std::rc::Rc;

use yew::prelude::*;

use crate::chart::plotly::PlotlyBackend;
use crate::chart::ChartLifecycleManager;
use crate::pipeline::{ResultRenderer, SubmissionGate};

pub type SharedRenderer = Rc<RefCell<ResultRenderer<PlotlyBackend>>>;

/// Gate shared by every submit of the calling component.
#[hook]
pub fn use_submission_gate() -> SubmissionGate {
    let gate = use_state(SubmissionGate::default);
    (*gate).clone()
}

/// Renderer owning the page's chart; the chart is purged on unmount.
#[hook]
pub fn use_result_renderer(login_path: String) -> SharedRenderer {
    let renderer = use_mut_ref(move || {
        ResultRenderer::new(ChartLifecycleManager::new(PlotlyBackend), login_path)
    });

    {
        let renderer = renderer.clone();
        use_effect_with((), move |_| {
            move || {
                log::debug!("Prediction page unmounted, releasing chart");
                renderer.borrow_mut().clear();
            }
        });
    }

    renderer
}
