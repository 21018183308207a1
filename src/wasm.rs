use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

use crate::model::ReportRequest;
use crate::reports::{self, GeneratedReport};

/// A rendered report handed to JavaScript for download.
#[wasm_bindgen]
pub struct ReportBytes {
    file_name: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl ReportBytes {
    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl From<GeneratedReport> for ReportBytes {
    fn from(report: GeneratedReport) -> Self {
        Self {
            file_name: report.file_name,
            bytes: report.bytes,
        }
    }
}

/// Render a request given as a JSON string.
#[wasm_bindgen(js_name = renderReport)]
pub fn render_report(json: &str) -> Result<ReportBytes, JsValue> {
    crate::render_json_on(json, today())
        .map(ReportBytes::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render a request given as a plain JavaScript object.
#[wasm_bindgen(js_name = renderReportValue)]
pub fn render_report_value(request: JsValue) -> Result<ReportBytes, JsValue> {
    let request: ReportRequest = serde_wasm_bindgen::from_value(request)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse report request: {}", e)))?;
    reports::render_request(&request, today())
        .map(ReportBytes::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The browser's local date.
fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or_default()
}
