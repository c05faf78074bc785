use common::FieldSource;
use wasm_bindgen::JsValue;
use web_sys::{FormData, HtmlFormElement};

/// Snapshot of a submitted form, read by input `name`.
pub struct FormDataSource(FormData);

impl FormDataSource {
    pub fn from_form(form: &HtmlFormElement) -> Result<Self, JsValue> {
        FormData::new_with_form(form).map(Self)
    }
}

impl FieldSource for FormDataSource {
    fn value(&self, field: &str) -> Option<String> {
        self.0.get(field).as_string()
    }

    // Unchecked boxes are left out of FormData entirely.
    fn checked(&self, field: &str) -> bool {
        self.0.has(field)
    }
}
