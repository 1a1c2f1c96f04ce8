//! Upload admission and storage for resumes and leave documents.

use std::fs;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Per-operation rules for an attached file.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    /// Form part name the file must arrive under.
    pub field: &'static str,
    /// Sub-directory of the upload root the file is written to.
    pub folder: &'static str,
    pub allowed_types: &'static [&'static str],
    pub max_bytes: usize,
    pub rejection: &'static str,
}

pub const RESUME_UPLOADS: UploadPolicy = UploadPolicy {
    field: "resume",
    folder: "resumes",
    allowed_types: &[
        "application/pdf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "image/png",
        "image/jpeg",
    ],
    max_bytes: MAX_FILE_BYTES,
    rejection: "Only PDF, DOC, DOCX, JPG, and PNG files are allowed!",
};

pub const LEAVE_DOCUMENT_UPLOADS: UploadPolicy = UploadPolicy {
    field: "document",
    folder: "documents",
    allowed_types: &["image/jpeg", "image/png", "application/pdf"],
    max_bytes: MAX_FILE_BYTES,
    rejection: "Only JPEG, PNG, and PDF files are allowed!",
};

impl UploadPolicy {
    /// Same policy with a different per-file size cap.
    pub const fn with_max_bytes(self, max_bytes: usize) -> Self {
        Self { max_bytes, ..self }
    }

    /// Body limit for routes using this policy, leaving room for the other form parts.
    pub fn body_limit(&self) -> usize {
        self.max_bytes + 1024 * 1024
    }

    pub fn admit(&self, file: &IncomingFile) -> Result<(), UploadError> {
        if file.field != self.field {
            return Err(UploadError::UnexpectedField(file.field.clone()));
        }

        let essence = file
            .content_type
            .parse::<mime::Mime>()
            .map(|parsed| parsed.essence_str().to_ascii_lowercase())
            .unwrap_or_default();
        if !self.allowed_types.contains(&essence.as_str()) {
            return Err(UploadError::UnsupportedType {
                message: self.rejection,
                found: file.content_type.clone(),
            });
        }

        if file.bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                max: self.max_bytes,
                found: file.bytes.len(),
            });
        }

        Ok(())
    }
}

/// File part received with a request, before admission.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl IncomingFile {
    /// Extension for the stored copy: the original one, or one implied by the MIME type.
    fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(str::to_ascii_lowercase)
            .or_else(|| {
                mime_guess::get_mime_extensions_str(&self.content_type)
                    .and_then(|extensions| extensions.first())
                    .map(|ext| ext.to_string())
            })
    }
}

/// Opaque reference to a persisted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredDocument {
    pub path: String,
}

/// Storage abstraction for admitted uploads.
pub trait DocumentStore: Send + Sync {
    fn store(&self, folder: &str, file: &IncomingFile) -> Result<StoredDocument, UploadError>;

    /// Drop a stored upload whose record was never persisted.
    fn discard(&self, document: &StoredDocument) -> Result<(), UploadError>;
}

/// Writes uploads beneath a root directory with timestamped names.
#[derive(Debug, Clone)]
pub struct DiskDocumentStore {
    root: PathBuf,
}

impl DiskDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentStore for DiskDocumentStore {
    fn store(&self, folder: &str, file: &IncomingFile) -> Result<StoredDocument, UploadError> {
        let directory = self.root.join(folder);
        fs::create_dir_all(&directory).map_err(UploadError::Storage)?;

        let suffix = Uuid::new_v4().simple().to_string();
        let stem = format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..8]);
        let name = match file.extension() {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        };
        let path = directory.join(name);
        fs::write(&path, &file.bytes).map_err(UploadError::Storage)?;

        tracing::debug!(path = %path.display(), bytes = file.bytes.len(), "stored upload");
        Ok(StoredDocument {
            path: path.to_string_lossy().replace('\\', "/"),
        })
    }

    fn discard(&self, document: &StoredDocument) -> Result<(), UploadError> {
        match fs::remove_file(&document.path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
                Err(UploadError::Storage(err))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Unexpected field: {0}")]
    UnexpectedField(String),
    #[error("{message}")]
    UnsupportedType {
        message: &'static str,
        found: String,
    },
    #[error("File too large (limit {max} bytes, received {found})")]
    TooLarge { max: usize, found: usize },
    #[error("Malformed upload: {0}")]
    Malformed(String),
    #[error("failed to store upload: {0}")]
    Storage(std::io::Error),
}

impl UploadError {
    pub fn is_client_error(&self) -> bool {
        !matches!(self, UploadError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(field: &str, name: &str, content_type: &str, size: usize) -> IncomingFile {
        IncomingFile {
            field: field.to_string(),
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn resume_policy_accepts_documents_and_images() {
        for content_type in [
            "application/pdf",
            "application/msword",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "image/png",
            "image/jpeg",
        ] {
            assert!(RESUME_UPLOADS
                .admit(&file("resume", "cv", content_type, 10))
                .is_ok());
        }
    }

    #[test]
    fn leave_policy_rejects_word_documents() {
        let error = LEAVE_DOCUMENT_UPLOADS
            .admit(&file("document", "note.doc", "application/msword", 10))
            .expect_err("doc rejected");
        assert!(matches!(error, UploadError::UnsupportedType { .. }));
        assert_eq!(error.to_string(), "Only JPEG, PNG, and PDF files are allowed!");
    }

    #[test]
    fn mime_parameters_are_ignored() {
        assert!(RESUME_UPLOADS
            .admit(&file("resume", "cv.pdf", "application/pdf; name=cv.pdf", 10))
            .is_ok());
    }

    #[test]
    fn rejects_wrong_field_and_oversized_files() {
        assert!(matches!(
            RESUME_UPLOADS.admit(&file("avatar", "me.png", "image/png", 10)),
            Err(UploadError::UnexpectedField(field)) if field == "avatar"
        ));
        assert!(matches!(
            RESUME_UPLOADS.admit(&file("resume", "cv.pdf", "application/pdf", MAX_FILE_BYTES + 1)),
            Err(UploadError::TooLarge { .. })
        ));
    }

    #[test]
    fn disk_store_keeps_extension() {
        let root = std::env::temp_dir().join(format!("hr-records-{}", Uuid::new_v4().simple()));
        let store = DiskDocumentStore::new(&root);

        let stored = store
            .store("resumes", &file("resume", "Jane CV.PDF", "application/pdf", 16))
            .expect("stored");
        assert!(stored.path.ends_with(".pdf"));
        assert!(stored.path.contains("resumes"));
        assert_eq!(fs::read(&stored.path).expect("written").len(), 16);

        let guessed = store
            .store("documents", &file("document", "scan", "image/png", 4))
            .expect("stored");
        assert!(guessed.path.ends_with(".png"));

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn disk_store_discards_written_files() {
        let root = std::env::temp_dir().join(format!("hr-discard-{}", Uuid::new_v4().simple()));
        let store = DiskDocumentStore::new(&root);
        let stored = store
            .store("resumes", &file("resume", "cv.pdf", "application/pdf", 8))
            .expect("stored");

        store.discard(&stored).expect("discarded");
        assert!(!Path::new(&stored.path).exists());
        store.discard(&stored).expect("already gone is fine");

        fs::remove_dir_all(root).ok();
    }
}
