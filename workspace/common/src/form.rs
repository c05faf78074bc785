//! Coercion of raw form values into a [`PredictionRequest`].
//!
//! The page is reached through [`FieldSource`], so the same collection logic
//! runs against browser `FormData` and against in-memory maps in tests.

#[cfg(any(test, feature = "testing"))]
use std::collections::HashMap;

use thiserror::Error;

use crate::prediction::{DEFAULT_SMOKING_STATUS, PredictionRequest, age_quartile};

/// Page identifiers of the inputs the prediction form must expose.
pub mod fields {
    pub const AGE: &str = "age";
    pub const PACK_HISTORY: &str = "packHistory";
    pub const MWT1_BEST: &str = "mwt1Best";
    pub const FEV1: &str = "fev1";
    pub const FEV1_PRED: &str = "fev1pred";
    pub const FVC: &str = "fvc";
    pub const FVC_PRED: &str = "fvcpred";
    pub const CAT: &str = "cat";
    pub const HAD: &str = "had";
    pub const SGRQ: &str = "sgrq";
    pub const GENDER: &str = "gender";
    pub const DIABETES: &str = "diabetes";
    pub const MUSCULAR: &str = "muscular";
    pub const HYPERTENSION: &str = "hypertension";
    pub const ATRIAL_FIB: &str = "atrialFib";
    pub const IHD: &str = "ihd";
}

/// Raised when a form value cannot be coerced to its declared type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Missing { field: &'static str },

    #[error("Field '{field}' must be a number, got '{value}'")]
    NotNumeric { field: &'static str, value: String },

    #[error("Field '{field}' must be a finite number, got '{value}'")]
    NotFinite { field: &'static str, value: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::NotNumeric { field, .. }
            | Self::NotFinite { field, .. } => *field,
        }
    }
}

/// Read access to the named inputs of a form.
pub trait FieldSource {
    /// Raw value of a text, number or select input; `None` if the input is absent.
    fn value(&self, field: &str) -> Option<String>;

    /// Whether a checkbox input is checked.
    fn checked(&self, field: &str) -> bool;
}

/// In-memory form state, keyed by page identifier.
///
/// Checkboxes follow `FormData` conventions: a checked box is present
/// (with any value), an unchecked one is absent.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, Default)]
pub struct MapSource(HashMap<String, String>);

#[cfg(any(test, feature = "testing"))]
impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn with_checked(self, field: &str) -> Self {
        self.with(field, "on")
    }

    pub fn without(mut self, field: &str) -> Self {
        self.0.remove(field);
        self
    }
}

#[cfg(any(test, feature = "testing"))]
impl FieldSource for MapSource {
    fn value(&self, field: &str) -> Option<String> {
        self.0.get(field).cloned()
    }

    fn checked(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

fn raw<S>(source: &S, field: &'static str) -> Result<String, ValidationError>
where
    S: FieldSource + ?Sized,
{
    match source.value(field) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ValidationError::Missing { field }),
    }
}

fn read_int<S>(source: &S, field: &'static str) -> Result<i32, ValidationError>
where
    S: FieldSource + ?Sized,
{
    let value = raw(source, field)?;
    if let Ok(n) = value.parse::<i32>() {
        return Ok(n);
    }
    // Number inputs may report whole numbers as "50.0".
    match value.parse::<f64>() {
        Ok(f)
            if f.is_finite()
                && f.fract() == 0.0
                && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&f) =>
        {
            Ok(f as i32)
        }
        _ => Err(ValidationError::NotNumeric { field, value }),
    }
}

fn read_float<S>(source: &S, field: &'static str) -> Result<f64, ValidationError>
where
    S: FieldSource + ?Sized,
{
    let value = raw(source, field)?;
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        Ok(_) => Err(ValidationError::NotFinite { field, value }),
        Err(_) => Err(ValidationError::NotNumeric { field, value }),
    }
}

fn read_flag<S: FieldSource + ?Sized>(source: &S, field: &'static str) -> u8 {
    u8::from(source.checked(field))
}

/// Builds a [`PredictionRequest`] from the current form state.
///
/// The age quartile is derived from the age just read and the smoking status
/// is always [`DEFAULT_SMOKING_STATUS`].
pub fn collect<S: FieldSource + ?Sized>(source: &S) -> Result<PredictionRequest, ValidationError> {
    let age = read_int(source, fields::AGE)?;

    Ok(PredictionRequest {
        age,
        pack_history: read_int(source, fields::PACK_HISTORY)?,
        mwt1_best: read_int(source, fields::MWT1_BEST)?,
        fev1: read_float(source, fields::FEV1)?,
        fev1_pred: read_int(source, fields::FEV1_PRED)?,
        fvc: read_float(source, fields::FVC)?,
        fvc_pred: read_int(source, fields::FVC_PRED)?,
        cat: read_int(source, fields::CAT)?,
        had: read_int(source, fields::HAD)?,
        sgrq: read_int(source, fields::SGRQ)?,
        age_quartiles: age_quartile(age),
        gender: read_int(source, fields::GENDER)?,
        smoking: DEFAULT_SMOKING_STATUS,
        diabetes: read_flag(source, fields::DIABETES),
        muscular: read_flag(source, fields::MUSCULAR),
        hypertension: read_flag(source, fields::HYPERTENSION),
        atrial_fib: read_flag(source, fields::ATRIAL_FIB),
        ihd: read_flag(source, fields::IHD),
    })
}
