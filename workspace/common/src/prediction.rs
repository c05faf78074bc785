use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Smoking status sent with every request; the form does not collect it.
pub const DEFAULT_SMOKING_STATUS: i32 = 2;

/// Request body for `POST /predict`.
///
/// Field names match the column names the classifier was trained on, so they
/// are renamed on the wire. Flags travel as `0`/`1` integers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRequest {
    #[serde(rename = "AGE")]
    pub age: i32,
    #[serde(rename = "PackHistory")]
    pub pack_history: i32,
    #[serde(rename = "MWT1Best")]
    pub mwt1_best: i32,
    #[serde(rename = "FEV1")]
    pub fev1: f64,
    #[serde(rename = "FEV1PRED")]
    pub fev1_pred: i32,
    #[serde(rename = "FVC")]
    pub fvc: f64,
    #[serde(rename = "FVCPRED")]
    pub fvc_pred: i32,
    #[serde(rename = "CAT")]
    pub cat: i32,
    #[serde(rename = "HAD")]
    pub had: i32,
    #[serde(rename = "SGRQ")]
    pub sgrq: i32,
    #[serde(rename = "AGEquartiles")]
    pub age_quartiles: i32,
    pub gender: i32,
    pub smoking: i32,
    #[serde(rename = "Diabetes")]
    pub diabetes: u8,
    pub muscular: u8,
    pub hypertension: u8,
    #[serde(rename = "AtrialFib")]
    pub atrial_fib: u8,
    #[serde(rename = "IHD")]
    pub ihd: u8,
}

/// Age bucket used by the model: `ceil(age / 25)`.
pub fn age_quartile(age: i32) -> i32 {
    (f64::from(age) / 25.0).ceil() as i32
}

/// Successful prediction payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub severity: String,
    pub probabilities: ProbabilityMap,
}

/// Body of a non-2xx response. The backend may omit `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Class label to probability, kept in the order the backend emitted them.
///
/// Values are displayed as returned; nothing checks that they sum to 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbabilityMap(Vec<(String, f64)>);

impl ProbabilityMap {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|(_, p)| *p).collect()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ProbabilityMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(l, p)| (l.into(), p)).collect())
    }
}

impl Serialize for ProbabilityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, p) in &self.0 {
            map.serialize_entry(label, p)?;
        }
        map.end()
    }
}

struct ProbabilityMapVisitor;

impl<'de> Visitor<'de> for ProbabilityMapVisitor {
    type Value = ProbabilityMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping class labels to probabilities")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((label, p)) = access.next_entry::<String, f64>()? {
            // Duplicate keys: the last one wins, like a JS object literal.
            if let Some(slot) = entries.iter_mut().find(|(l, _)| *l == label) {
                *slot = (label, p);
            } else {
                entries.push((label, p));
            }
        }
        Ok(ProbabilityMap(entries))
    }
}

impl<'de> Deserialize<'de> for ProbabilityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ProbabilityMapVisitor)
    }
}
