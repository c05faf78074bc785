use common::{PredictionRequest, PredictionResponse};
use gloo_net::http::Request;
use web_sys::RequestCredentials;

use super::{interpret, is_login_url, PredictError};
use crate::settings;

pub const PREDICT_ENDPOINT: &str = "/predict";

/// Sends one prediction request with the session cookie attached.
///
/// Exactly one attempt is made; there is no retry and no timeout beyond
/// whatever the browser applies.
pub async fn submit(request: &PredictionRequest) -> Result<PredictionResponse, PredictError> {
    let settings = settings::get_settings();
    let url = settings.api_url(PREDICT_ENDPOINT);
    log::debug!("POST request to: {}", url);

    let response = Request::post(&url)
        .credentials(RequestCredentials::Include)
        .json(request)
        .map_err(|e| {
            log::error!("POST {} - Failed to serialize request: {}", PREDICT_ENDPOINT, e);
            PredictError::Serialize(e.to_string())
        })?
        .send()
        .await
        .map_err(|e| {
            log::error!("POST {} - Request failed: {}", PREDICT_ENDPOINT, e);
            PredictError::Transport(e.to_string())
        })?;

    let status = response.status();
    let redirected_to_login =
        response.redirected() && is_login_url(&response.url(), &settings.login_path);
    if !response.ok() {
        log::warn!("POST {} - Non-OK response: {}", PREDICT_ENDPOINT, status);
    }

    log::trace!("POST {} - Response received, reading body", PREDICT_ENDPOINT);
    let body = response.text().await.map_err(|e| {
        log::error!("POST {} - Failed to read response body: {}", PREDICT_ENDPOINT, e);
        PredictError::Transport(e.to_string())
    })?;

    match interpret(status, redirected_to_login, &body) {
        Ok(prediction) => {
            log::info!("POST {} - Success: {}", PREDICT_ENDPOINT, prediction.severity);
            Ok(prediction)
        }
        Err(err) => {
            log::error!("POST {} - {}", PREDICT_ENDPOINT, err);
            Err(err)
        }
    }
}
