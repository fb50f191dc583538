use crate::mission::RawRecord;
use crate::prelude::{RunError, RunResult, Stage};
use crate::telemetry::log::LogManager;
use serde_json::Value;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses the upload into a list of untyped records.
pub struct InputDecoder {
    logger: LogManager,
}

impl InputDecoder {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("decoder"),
        }
    }

    /// Fails on invalid JSON or on any top-level value other than a list.
    pub fn decode(&self, input: &[u8]) -> RunResult<Vec<RawRecord>> {
        let payload = input.strip_prefix(UTF8_BOM).unwrap_or(input);
        let value: Value = serde_json::from_slice(payload)
            .map_err(|err| RunError::MalformedInput(format!("could not decode JSON: {}", err)))?;

        match value {
            Value::Array(records) => {
                self.logger
                    .detail(&format!("decoded {} raw records", records.len()));
                Ok(records)
            }
            other => Err(RunError::MalformedInput(format!(
                "expected a JSON list of records, found {}",
                describe_kind(&other)
            ))),
        }
    }
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<'a> Stage<&'a [u8]> for InputDecoder {
    type Output = Vec<RawRecord>;

    fn name(&self) -> &'static str {
        "decoder"
    }

    fn execute(&self, input: &'a [u8]) -> RunResult<Self::Output> {
        self.decode(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::ErrorKind;

    #[test]
    fn decoder_returns_records_in_order() {
        let records = InputDecoder::new()
            .decode(br#"[{"latitude": 1}, 5, "x"]"#)
            .unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_object());
        assert_eq!(records[1], 5);
    }

    #[test]
    fn empty_list_is_valid() {
        let records = InputDecoder::new().decode(b"[]").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn bare_object_is_not_wrapped() {
        let err = InputDecoder::new()
            .decode(br#"{"latitude": 1, "longitude": 2}"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.detail().contains("an object"));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = InputDecoder::new().decode(b"[{\"latitude\": ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn leading_bom_is_tolerated() {
        let records = InputDecoder::new().decode(b"\xEF\xBB\xBF[]").unwrap();
        assert!(records.is_empty());
    }
}
