use missioncore::{RejectionRecord, RunError};
use serde::{Deserialize, Serialize};

pub const KIND_INVALID_UPLOAD: &str = "invalid_upload";
pub const KIND_NO_WAYPOINTS: &str = "no_valid_waypoints";
pub const KIND_INVALID_FILENAME: &str = "invalid_filename";
pub const KIND_NOT_FOUND: &str = "not_found";
pub const KIND_INTERNAL: &str = "internal_error";

/// Body returned by `POST /process` when a mission was generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub status: String,
    pub message: String,
    pub download_filename: String,
    pub waypoint_count: usize,
    pub rejected_count: usize,
    pub rejections: Vec<RejectionRecord>,
}

impl ProcessResponse {
    pub fn new(
        download_filename: String,
        waypoint_count: usize,
        rejections: Vec<RejectionRecord>,
    ) -> Self {
        Self {
            status: "success".into(),
            message: format!(
                "Successfully generated mission file with {} waypoints.",
                waypoint_count
            ),
            download_filename,
            waypoint_count,
            rejected_count: rejections.len(),
            rejections,
        }
    }
}

/// Structured failure body shared by every route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub kind: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<RejectionRecord>,
}

impl ErrorResponse {
    pub fn new(kind: &str, detail: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            kind: kind.to_string(),
            detail: detail.into(),
            index: None,
            rejections: Vec::new(),
        }
    }

    pub fn from_run_error(err: &RunError) -> Self {
        Self::new(err.kind().as_str(), err.detail())
    }

    /// Every record was rejected; points the caller at the first offender.
    pub fn no_waypoints(rejections: Vec<RejectionRecord>) -> Self {
        let detail = match rejections.first() {
            Some(first) => format!(
                "No valid waypoints could be generated: all {} records rejected, first at index {} ({}).",
                rejections.len(),
                first.index,
                first.reason
            ),
            None => "No valid waypoints could be generated: the input list is empty.".to_string(),
        };
        Self {
            index: rejections.first().map(|r| r.index),
            rejections,
            ..Self::new(KIND_NO_WAYPOINTS, detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use missioncore::ErrorKind;
    use serde_json::json;

    #[test]
    fn run_error_keeps_core_kind() {
        let body = ErrorResponse::from_run_error(&RunError::MalformedInput("bad".into()));
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["kind"], "malformed_input");
        assert_eq!(value["status"], "error");
        assert!(value.get("index").is_none());
    }

    #[test]
    fn no_waypoints_points_at_first_rejection() {
        let rejections = vec![
            RejectionRecord::new(2, ErrorKind::MissingCoordinates, &json!({})),
            RejectionRecord::new(5, ErrorKind::InvalidRecordShape, &json!(1)),
        ];
        let body = ErrorResponse::no_waypoints(rejections);
        assert_eq!(body.kind, KIND_NO_WAYPOINTS);
        assert_eq!(body.index, Some(2));
        assert!(body.detail.contains("missing_coordinates"));
        assert_eq!(body.rejections.len(), 2);
    }

    #[test]
    fn empty_input_has_no_index() {
        let body = ErrorResponse::no_waypoints(Vec::new());
        assert_eq!(body.index, None);
        assert!(body.detail.contains("empty"));
    }
}
