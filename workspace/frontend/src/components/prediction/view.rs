use common::collect;
use web_sys::HtmlFormElement;
use yew::prelude::*;

use super::form::PredictionForm;
use super::results::PredictionResults;
use crate::api_client::prediction::submit;
use crate::form::FormDataSource;
use crate::hooks::{use_result_renderer, use_submission_gate};
use crate::pipeline::ResultView;
use crate::settings;

/// [`ResultView`] backed by this page's state and the browser window.
struct PageView {
    severity: UseStateHandle<Option<String>>,
    results_visible: UseStateHandle<bool>,
}

impl ResultView for PageView {
    fn show_severity(&mut self, severity: &str) {
        self.severity.set(Some(severity.to_string()));
    }

    fn reveal_results(&mut self) {
        self.results_visible.set(true);
    }

    fn hide_results(&mut self) {
        self.results_visible.set(false);
    }

    fn alert(&mut self, message: &str) {
        log::warn!("Displaying error to user: {}", message);
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.alert_with_message(message) {
                log::error!("Failed to show alert: {:?}", e);
            }
        }
    }

    fn navigate(&mut self, path: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(path) {
                log::error!("Failed to navigate to {}: {:?}", path, e);
            }
        }
    }
}

#[function_component(Prediction)]
pub fn prediction() -> Html {
    let login_path = settings::get_settings().login_path;
    let form_ref = use_node_ref();
    let gate = use_submission_gate();
    let renderer = use_result_renderer(login_path);
    let severity = use_state(|| None::<String>);
    let results_visible = use_state(|| false);
    let is_submitting = use_state(|| false);

    let on_submit = {
        let form_ref = form_ref.clone();
        let renderer = renderer.clone();
        let severity = severity.clone();
        let results_visible = results_visible.clone();
        let is_submitting = is_submitting.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let Some(ticket) = gate.try_begin() else {
                log::warn!("Submission ignored: a prediction is already in flight");
                return;
            };

            let mut view = PageView {
                severity: severity.clone(),
                results_visible: results_visible.clone(),
            };

            let Some(form) = form_ref.cast::<HtmlFormElement>() else {
                log::error!("Prediction form is not mounted");
                return;
            };
            let source = match FormDataSource::from_form(&form) {
                Ok(source) => source,
                Err(e) => {
                    log::error!("Failed to read form data: {:?}", e);
                    view.alert("Could not read the form.");
                    return;
                }
            };
            let request = match collect(&source) {
                Ok(request) => request,
                Err(err) => {
                    renderer.borrow_mut().reject(&mut view, &err);
                    return;
                }
            };

            log::debug!("Submitting prediction request: {:?}", request);
            is_submitting.set(true);

            let renderer = renderer.clone();
            let is_submitting = is_submitting.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let _ticket = ticket;
                let outcome = submit(&request).await;
                let disposition = renderer.borrow_mut().finish(&mut view, outcome);
                log::debug!("Submission finished: {:?}", disposition);
                is_submitting.set(false);
            });
        })
    };

    html! {
        <div class="container mx-auto max-w-3xl p-6">
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">{"COPD Severity Prediction"}</h2>
                    <PredictionForm
                        form_ref={form_ref}
                        on_submit={on_submit}
                        submitting={*is_submitting}
                    />
                </div>
            </div>
            <PredictionResults severity={(*severity).clone()} visible={*results_visible} />
        </div>
    }
}
