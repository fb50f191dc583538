use crate::prelude::ErrorKind;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Untyped input record as decoded from the upload.
pub type RawRecord = Value;

/// Optional descriptive fields carried through from the input untouched.
///
/// Each field is present exactly when the source record had the key; values
/// keep whatever JSON type they arrived with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointMetadata {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub cell_id: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub risk_value: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub risk_type: Option<Value>,
}

/// A key that is present stays `Some`, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl PointMetadata {
    pub fn is_empty(&self) -> bool {
        self.cell_id.is_none() && self.risk_value.is_none() && self.risk_type.is_none()
    }
}

/// An input record that passed geographic checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Position in the original input sequence, never compacted.
    pub index: usize,
    pub metadata: PointMetadata,
}

/// Why one input entry was excluded from the mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub index: usize,
    pub reason: ErrorKind,
    pub raw_snippet: Value,
}

impl RejectionRecord {
    pub fn new(index: usize, reason: ErrorKind, raw: &Value) -> Self {
        Self {
            index,
            reason,
            raw_snippet: raw.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_metadata_survives_a_round_trip() {
        let metadata = PointMetadata {
            cell_id: Some(Value::Null),
            risk_value: Some(json!(75)),
            risk_type: None,
        };
        let text = serde_json::to_string(&metadata).unwrap();
        assert_eq!(text, r#"{"cell_id":null,"risk_value":75}"#);

        let parsed: PointMetadata = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, metadata);
    }
}
