//! Transport-layer types shared between the prediction backend and the
//! browser client, plus the coercion that turns form state into a request.

mod form;
mod prediction;

#[cfg(any(test, feature = "testing"))]
pub use form::MapSource;
pub use form::{FieldSource, ValidationError, collect, fields};
pub use prediction::{
    DEFAULT_SMOKING_STATUS, ErrorBody, PredictionRequest, PredictionResponse, ProbabilityMap,
    age_quartile,
};
