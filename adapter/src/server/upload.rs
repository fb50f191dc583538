use futures_util::TryStreamExt;
use warp::hyper::body::Buf;
use warp::multipart::{FormData, Part};

const FILE_FIELD: &str = "risk_file";
const ALTITUDE_FIELD: &str = "altitude_m";
const HOVER_FIELD: &str = "hover_time_s";

/// One uploaded file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Accepts a `.json` extension (any case) or a JSON content type.
    pub fn is_json(&self) -> bool {
        let by_name = self.filename.to_ascii_lowercase().ends_with(".json");
        let by_type = self
            .content_type
            .as_deref()
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("application/json"))
            .unwrap_or(false);
        by_name || by_type
    }
}

/// Parsed `POST /process` form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedFile>,
    pub altitude_m: Option<String>,
    pub hover_time_s: Option<String>,
}

impl UploadForm {
    /// Files only count under the `risk_file` field; other parts are ignored.
    pub fn accept_part(
        &mut self,
        field: &str,
        filename: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) {
        match filename {
            Some(filename) if field == FILE_FIELD => self.files.push(UploadedFile {
                filename,
                content_type,
                bytes,
            }),
            Some(_) => {}
            None if field == ALTITUDE_FIELD => self.altitude_m = Some(text(&bytes)),
            None if field == HOVER_FIELD => self.hover_time_s = Some(text(&bytes)),
            None => {}
        }
    }

    /// Exactly one file part is allowed per request.
    pub fn single_file(self) -> Result<UploadedFile, String> {
        let count = self.files.len();
        let mut files = self.files.into_iter();
        match (files.next(), count) {
            (Some(file), 1) => Ok(file),
            (None, _) => Err("no file was uploaded".to_string()),
            _ => Err(format!("expected exactly one file, got {}", count)),
        }
    }
}

pub async fn read_form(form: FormData) -> Result<UploadForm, warp::Error> {
    let parts: Vec<Part> = form.try_collect().await?;
    let mut upload = UploadForm::default();

    for part in parts {
        let field = part.name().to_string();
        let filename = part.filename().map(str::to_string);
        let content_type = part.content_type().map(str::to_string);
        let bytes = read_part(part).await?;
        upload.accept_part(&field, filename, content_type, bytes);
    }

    Ok(upload)
}

async fn read_part(part: Part) -> Result<Vec<u8>, warp::Error> {
    part.stream()
        .try_fold(Vec::new(), |mut acc, buf| async move {
            acc.extend_from_slice(buf.chunk());
            Ok::<_, warp::Error>(acc)
        })
        .await
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(filename: &str, content_type: Option<&str>) -> UploadedFile {
        UploadedFile {
            filename: filename.into(),
            content_type: content_type.map(str::to_string),
            bytes: b"[]".to_vec(),
        }
    }

    #[test]
    fn json_detection_by_extension_or_type() {
        assert!(file("cells.JSON", None).is_json());
        assert!(file("cells", Some("application/json; charset=utf-8")).is_json());
        assert!(!file("cells.csv", Some("text/csv")).is_json());
        assert!(!file("cells.json.exe", None).is_json());
    }

    #[test]
    fn single_file_rules() {
        let none = UploadForm::default();
        assert!(none.single_file().is_err());

        let two = UploadForm {
            files: vec![file("a.json", None), file("b.json", None)],
            ..Default::default()
        };
        assert_eq!(two.single_file().unwrap_err(), "expected exactly one file, got 2");

        let one = UploadForm {
            files: vec![file("a.json", None)],
            ..Default::default()
        };
        assert_eq!(one.single_file().unwrap().filename, "a.json");
    }

    #[test]
    fn only_risk_file_field_counts_as_upload() {
        let mut form = UploadForm::default();
        form.accept_part("attachment", Some("extra.json".into()), None, b"[]".to_vec());
        form.accept_part("altitude_m", None, None, b" 45 ".to_vec());
        assert!(form.files.is_empty());
        assert_eq!(form.altitude_m.as_deref(), Some("45"));

        form.accept_part("risk_file", Some("cells.json".into()), None, b"[]".to_vec());
        assert_eq!(form.single_file().unwrap().filename, "cells.json");
    }
}
