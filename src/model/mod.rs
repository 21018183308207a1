//! # Report Input Model
//!
//! The form records the report builders read, plus the request envelope
//! that carries one of them with branding, fonts, style and a date.
//!
//! The records come straight from saved HR forms, so every field is
//! optional and every field is forgiving: a number where text was expected
//! is shown as its digits, a boolean as Yes/No, and anything that cannot be
//! shown at all is treated as unanswered. Malformed optional data never
//! fails a report.

pub mod appraisal;
pub mod job_application;
pub mod supervision;

pub use appraisal::{AppraisalForm, Grade, RatingKey, Ratings};
pub use job_application::JobApplication;
pub use supervision::{ServiceUserReview, SupervisionForm};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::font::FontSources;
use crate::style::ReportStyle;

/// A free-text or single-choice form answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Answer(pub Option<String>);

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Answer(Some(text.into()))
    }

    /// The trimmed answer, or `None` when unanswered or blank.
    pub fn text(&self) -> Option<&str> {
        self.0.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.text().is_none()
    }

    /// Whether the answer is an affirmative "yes" in any letter case.
    pub fn is_yes(&self) -> bool {
        self.text()
            .is_some_and(|t| t.eq_ignore_ascii_case("yes") || t.eq_ignore_ascii_case("true"))
    }
}

impl From<&str> for Answer {
    fn from(text: &str) -> Self {
        Answer::new(text)
    }
}

impl<'de> Deserialize<'de> for Answer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Answer(scalar_text(value)))
    }
}

/// A radio-group answer stored as `{ "value": ... }`. A bare scalar is
/// accepted too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: Answer,
}

impl<'de> Deserialize<'de> for Choice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = match Value::deserialize(deserializer)? {
            Value::Object(mut map) => map.remove("value").and_then(scalar_text),
            other => scalar_text(other),
        };
        Ok(Choice {
            value: Answer(value),
        })
    }
}

/// Object entries in the order the form wrote them, such as skill name to
/// level. Entries whose value has the wrong shape are dropped; anything that
/// is not an object at all reads as no entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entries<T>(pub Vec<(String, T)>);

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Entries(Vec::new())
    }
}

impl<T> Entries<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, (String, T)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }
}

impl<T: Serialize> Serialize for Entries<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (key, value)))
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Entries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = match Value::deserialize(deserializer)? {
            Value::Object(map) => map,
            Value::Null => return Ok(Entries::default()),
            other => {
                log::warn!("expected an object, found {}", type_name(&other));
                return Ok(Entries::default());
            }
        };
        let entries = map
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value(value) {
                Ok(value) => Some((key, value)),
                Err(e) => {
                    log::warn!("ignoring malformed entry '{}': {}", key, e);
                    None
                }
            })
            .collect();
        Ok(Entries(entries))
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("Yes".to_string()),
        Value::Bool(false) => Some("No".to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deserialize `T`, falling back to its default when the value has the
/// wrong shape.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        log::warn!("ignoring malformed form field: {}", e);
        T::default()
    }))
}

/// Deserialize a list, keeping the entries that have a usable shape.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            log::warn!("expected a list, found {}", type_name(&other));
            Vec::new()
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Which report a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportKind {
    JobApplication,
    Supervision,
    AnnualAppraisal,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::JobApplication,
        ReportKind::Supervision,
        ReportKind::AnnualAppraisal,
    ];

    /// File name prefix.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            ReportKind::JobApplication => "Job_Application",
            ReportKind::Supervision => "Supervision",
            ReportKind::AnnualAppraisal => "Annual_Appraisal",
        }
    }

    /// Title shown in the page header.
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::JobApplication => "Job Application",
            ReportKind::Supervision => "Supervision Report",
            ReportKind::AnnualAppraisal => "Annual Appraisal",
        }
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "jobapplication" | "job" | "application" => Ok(ReportKind::JobApplication),
            "supervision" => Ok(ReportKind::Supervision),
            "annualappraisal" | "appraisal" => Ok(ReportKind::AnnualAppraisal),
            _ => Err(format!(
                "unknown report kind '{}' (expected jobApplication, supervision or annualAppraisal)",
                s
            )),
        }
    }
}

/// Company branding shown in every page header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    pub name: Option<String>,
    /// Logo asset: data URI, base64 or file path.
    pub logo: Option<String>,
}

/// One report to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub kind: ReportKind,
    /// The form record, shaped per `kind`.
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub branding: Branding,
    #[serde(default)]
    pub fonts: FontSources,
    #[serde(default)]
    pub style: ReportStyle,
    /// Date printed in the file name and footer. Defaults to today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_on: Option<NaiveDate>,
}
