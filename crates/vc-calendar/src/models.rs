//! Data models for calendar assembly

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;
use vc_core::{TemporalPattern, parse_iso_date};

/// A display-ready calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Days the event covers
    pub when: TemporalPattern,
    /// Text shown in the cell, with ISO dates removed
    pub display: String,
    /// Where the event came from; passed through untouched
    #[serde(default)]
    pub link: JsonValue,
}

impl Event {
    /// Create a new event
    pub fn new(when: TemporalPattern, display: impl Into<String>) -> Self {
        Self {
            when,
            display: display.into(),
            link: JsonValue::Null,
        }
    }

    /// Set the link
    pub fn with_link(mut self, link: JsonValue) -> Self {
        self.link = link;
        self
    }
}

/// One row returned by the query executor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Raw line text. A missing or non-string value reads as empty.
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,
    /// Source location of the row
    #[serde(default)]
    pub key: JsonValue,
    /// Optional structured payload: `{start, end?, display?, link?}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,
}

impl RawRecord {
    /// Create a record with only text and a key
    pub fn new(text: impl Into<String>, key: JsonValue) -> Self {
        Self {
            text: text.into(),
            key,
            value: None,
        }
    }

    /// Attach a structured payload
    pub fn with_value(mut self, value: JsonValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Pattern from the payload's `start`/`end` fields.
    ///
    /// `None` when there is no payload, no readable `start`, or an `end`
    /// that is present but unreadable.
    pub fn payload_pattern(&self) -> Option<TemporalPattern> {
        let payload = self.value.as_ref()?;
        let start = payload.get("start")?.as_str().and_then(parse_iso_date)?;

        let mut builder = TemporalPattern::builder().start(start);
        match payload.get("end") {
            None | Some(JsonValue::Null) => {}
            Some(end) => {
                let end = end.as_str().and_then(parse_iso_date)?;
                builder = builder.end(end);
            }
        }
        builder.build()
    }

    /// Display text override from the payload
    pub fn payload_display(&self) -> Option<&str> {
        self.value.as_ref()?.get("display")?.as_str()
    }

    /// Link override from the payload
    pub fn payload_link(&self) -> Option<&JsonValue> {
        self.value
            .as_ref()?
            .get("link")
            .filter(|link| !link.is_null())
    }
}

/// A task line from the default vault scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Whether the task is checked off
    #[serde(default)]
    pub completed: bool,
    /// Task text without the checkbox marker
    pub text: String,
    /// Source location
    #[serde(default)]
    pub link: JsonValue,
}

impl TaskRecord {
    /// Create an open task
    pub fn open(text: impl Into<String>, link: JsonValue) -> Self {
        Self {
            completed: false,
            text: text.into(),
            link,
        }
    }

    /// Create a completed task
    pub fn done(text: impl Into<String>, link: JsonValue) -> Self {
        Self {
            completed: true,
            text: text.into(),
            link,
        }
    }
}

/// Payload of a successful query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryValue {
    /// Rows that are not records are dropped; the rest of the batch is kept.
    #[serde(default, deserialize_with = "lenient_records")]
    pub values: Vec<RawRecord>,
}

/// Decode rows one by one, skipping any that are not record objects
pub fn records_from_values(values: Vec<JsonValue>) -> Vec<RawRecord> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Skipping malformed record: {}", e);
                None
            }
        })
        .collect()
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string).unwrap_or_default())
}

fn lenient_records<'de, D>(deserializer: D) -> std::result::Result<Vec<RawRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<JsonValue>>::deserialize(deserializer)?;
    Ok(records_from_values(values.unwrap_or_default()))
}

/// Query executor reply: `{successful, value: {values}, error}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub successful: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<QueryValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResponse {
    /// A successful reply carrying `values`
    pub fn ok(values: Vec<RawRecord>) -> Self {
        Self {
            successful: true,
            value: Some(QueryValue { values }),
            error: None,
        }
    }

    /// An unsuccessful reply with a reason
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            successful: false,
            value: None,
            error: Some(error.into()),
        }
    }

    /// Records on success, the failure reason otherwise
    pub fn into_records(self) -> crate::Result<Vec<RawRecord>> {
        if !self.successful {
            let reason = self
                .error
                .unwrap_or_else(|| "query was not successful".to_string());
            return Err(crate::CalendarError::QueryFailed(reason));
        }
        Ok(self.value.map(|v| v.values).unwrap_or_default())
    }
}
