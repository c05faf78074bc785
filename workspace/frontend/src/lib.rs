use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod form;
pub mod api_client;
pub mod chart;
pub mod hooks;
pub mod pipeline;
pub mod settings;

use components::prediction::Prediction;

#[derive(Debug, Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/prediction-form")]
    PredictionForm,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    log::debug!("Routing to: {:?}", routes);
    match routes {
        Route::Home | Route::PredictionForm => {
            log::trace!("Rendering Prediction page");
            html! { <Prediction /> }
        }
        Route::NotFound => {
            log::warn!("404 - Route not found");
            html! { <h1 class="text-2xl p-6">{"404 Not Found"}</h1> }
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    // Initialize settings first
    settings::init_settings();

    // Initialize logger with settings
    let settings = settings::get_settings();
    wasm_logger::init(wasm_logger::Config::new(settings.log_level));

    log::info!("=== COPD Prediction Frontend Starting ===");
    log::info!("Application settings: {:?}", settings);
    log::debug!(
        "Prediction endpoint: {}",
        settings.api_url(api_client::prediction::PREDICT_ENDPOINT)
    );

    yew::Renderer::<App>::new().render();
    log::info!("Application initialized successfully");
}
