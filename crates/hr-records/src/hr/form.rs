use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::ServiceError;
use super::uploads::{IncomingFile, UploadError, UploadPolicy};

/// Request body accepted either as a JSON object or as `multipart/form-data`.
///
/// Multipart text parts become string fields; file parts are held until an
/// [`UploadPolicy`] admits them.
#[derive(Debug, Default)]
pub struct SubmittedForm {
    fields: Map<String, Value>,
    files: Vec<IncomingFile>,
}

impl SubmittedForm {
    pub fn from_json(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: IncomingFile) -> Self {
        self.files.push(file);
        self
    }

    /// Admit at most one file under `policy`; any other file part is rejected.
    pub fn take_file(&mut self, policy: &UploadPolicy) -> Result<Option<IncomingFile>, UploadError> {
        let mut files = std::mem::take(&mut self.files).into_iter();
        let Some(file) = files.next() else {
            return Ok(None);
        };
        if let Some(extra) = files.next() {
            return Err(UploadError::UnexpectedField(extra.field));
        }
        policy.admit(&file)?;
        Ok(Some(file))
    }

    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, ServiceError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|err| ServiceError::bad_request(format!("Invalid request payload: {err}")))
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for SubmittedForm
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&request) {
            let Json(value) = Json::<Value>::from_request(request, state)
                .await
                .map_err(|rejection| ServiceError::bad_request(rejection.body_text()))?;
            return match value {
                Value::Object(fields) => Ok(Self::from_json(fields)),
                _ => Err(ServiceError::bad_request(
                    "Request body must be a JSON object",
                )),
            };
        }

        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|rejection| UploadError::Malformed(rejection.body_text()))?;

        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| UploadError::Malformed(err.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            match file_name {
                // File input left empty by the browser.
                Some(file_name) if file_name.is_empty() => continue,
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|err| UploadError::Malformed(err.body_text()))?;
                    form.files.push(IncomingFile {
                        field: name,
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|err| UploadError::Malformed(err.body_text()))?;
                    form.fields.insert(name, Value::String(text));
                }
            }
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hr::domain::LeaveSubmission;
    use crate::hr::uploads::{LEAVE_DOCUMENT_UPLOADS, RESUME_UPLOADS};
    use axum::body::{Body, Bytes};
    use serde_json::json;

    fn pdf(field: &str) -> IncomingFile {
        IncomingFile {
            field: field.to_string(),
            file_name: "scan.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    #[tokio::test]
    async fn reads_json_objects() {
        let request = axum::http::Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"employeeName":"Ravi","reason":"fever"}"#))
            .expect("request");
        let form = SubmittedForm::from_request(request, &()).await.expect("parsed");
        let payload: LeaveSubmission = form.payload().expect("payload");
        assert_eq!(payload.employee_name.as_deref(), Some("Ravi"));
        assert_eq!(payload.leave_date, None);
    }

    #[tokio::test]
    async fn rejects_non_object_json() {
        let request = axum::http::Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("[1,2]"))
            .expect("request");
        let error = SubmittedForm::from_request(request, &())
            .await
            .expect_err("rejected");
        assert!(matches!(error, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn splits_multipart_text_and_file_parts() {
        let body = concat!(
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"employeeName\"\r\n\r\n",
            "Ravi\r\n",
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"document\"; filename=\"note.pdf\"\r\n",
            "Content-Type: application/pdf\r\n\r\n",
            "%PDF-1.4\r\n",
            "--XBOUNDARY--\r\n",
        );
        let request = axum::http::Request::builder()
            .header(CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .expect("request");

        let mut form = SubmittedForm::from_request(request, &()).await.expect("parsed");
        let file = form
            .take_file(&LEAVE_DOCUMENT_UPLOADS)
            .expect("admitted")
            .expect("file present");
        assert_eq!(file.file_name, "note.pdf");
        assert_eq!(&file.bytes[..], b"%PDF-1.4");

        let payload: LeaveSubmission = form.payload().expect("payload");
        assert_eq!(payload.employee_name.as_deref(), Some("Ravi"));
    }

    #[tokio::test]
    async fn skips_file_inputs_left_empty() {
        let body = concat!(
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"employeeName\"\r\n\r\n",
            "Ravi\r\n",
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"document\"; filename=\"\"\r\n",
            "Content-Type: application/octet-stream\r\n\r\n",
            "\r\n",
            "--XBOUNDARY--\r\n",
        );
        let request = axum::http::Request::builder()
            .header(CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .expect("request");

        let mut form = SubmittedForm::from_request(request, &()).await.expect("parsed");
        assert!(form
            .take_file(&LEAVE_DOCUMENT_UPLOADS)
            .expect("nothing to admit")
            .is_none());
        let payload: LeaveSubmission = form.payload().expect("payload");
        assert_eq!(payload.employee_name.as_deref(), Some("Ravi"));
        assert_eq!(payload.document, None);
    }

    #[test]
    fn take_file_rejects_parts_outside_policy() {
        let mut form = SubmittedForm::from_json(Map::new()).with_file(pdf("document"));
        assert!(matches!(
            form.take_file(&RESUME_UPLOADS),
            Err(UploadError::UnexpectedField(field)) if field == "document"
        ));

        let mut form = SubmittedForm::from_json(Map::new())
            .with_file(pdf("resume"))
            .with_file(pdf("resume"));
        assert!(form.take_file(&RESUME_UPLOADS).is_err());
    }

    #[test]
    fn payload_reports_type_mismatches() {
        let fields = json!({ "status": 7 });
        let Value::Object(fields) = fields else {
            unreachable!()
        };
        let form = SubmittedForm::from_json(fields);
        let error = form
            .payload::<crate::hr::domain::LeaveStatusUpdate>()
            .expect_err("status must be text");
        assert!(error.to_string().starts_with("Invalid request payload"));
    }
}
