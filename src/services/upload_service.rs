//! Upload intake
//!
//! Checks picked files against the allow-list, builds image previews and turns
//! the upload form into a `MATERIAL` document. Non-image files are never read.

use std::path::{Path, PathBuf};

use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ValidationError};
use crate::models::{Difficulty, Document, DocumentContent, DocumentType};
use crate::utils::{generate_id, simulate_latency};

pub const DEFAULT_SUBJECT: &str = "Materia Varia";
pub const DEFAULT_USER: &str = "user1";

/// Extension → MIME type for accepted uploads
const ACCEPTED_TYPES: [(&str, &str); 8] = [
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
];

/// MIME type for an accepted file, `None` when the type is not allowed
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    ACCEPTED_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Upload form fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMeta {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl UploadMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            subject: String::new(),
            doc_type: DocumentType::Material,
            difficulty: Difficulty::Medium,
            tags: Vec::new(),
        }
    }

    /// Add a tag unless blank or already present
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }
}

/// One accepted file
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: &'static str,
    /// `data:` URI, images only
    pub preview: Option<String>,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Result of a completed upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub document: Document,
    pub files: Vec<UploadedFile>,
    /// File names dropped by the allow-list
    pub rejected: Vec<String>,
}

impl UploadOutcome {
    /// Activity feed text, e.g. `Hai caricato "Appunti" (2 files)`
    pub fn activity_description(&self) -> String {
        let count = self.files.len();
        format!(
            "Hai caricato \"{}\" ({} file{})",
            self.document.title,
            count,
            if count > 1 { "s" } else { "" }
        )
    }
}

#[derive(Debug, Clone)]
pub struct UploadService {
    delay_min_ms: u64,
    delay_max_ms: u64,
}

impl UploadService {
    pub fn new(config: &Config) -> Self {
        Self {
            delay_min_ms: config.generation_delay_min_ms,
            delay_max_ms: config.generation_delay_max_ms,
        }
    }

    /// Check one file against the allow-list, reading it only for a preview
    pub async fn accept(&self, path: &Path) -> AppResult<UploadedFile> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let Some(mime_type) = mime_for(path) else {
            return Err(ValidationError::UnsupportedFileType { file_name }.into());
        };

        let preview = if mime_type.starts_with("image/") {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
            let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
            debug!("🖼️ anteprima {} ({} byte)", file_name, bytes.len());
            Some(format!("data:{};base64,{}", mime_type, encoded))
        } else {
            None
        };

        Ok(UploadedFile {
            path: path.to_path_buf(),
            file_name,
            mime_type,
            preview,
        })
    }

    /// Run the upload form: validate, filter files, build the document
    ///
    /// Files outside the allow-list are skipped with a warning; if nothing is
    /// left the upload fails with `NoFilesSelected`.
    pub async fn intake(&self, paths: &[PathBuf], meta: UploadMeta) -> AppResult<UploadOutcome> {
        if meta.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if paths.is_empty() {
            return Err(ValidationError::NoFilesSelected.into());
        }

        let mut files = Vec::new();
        let mut rejected = Vec::new();
        for path in paths {
            match self.accept(path).await {
                Ok(file) => files.push(file),
                Err(AppError::Validation(ValidationError::UnsupportedFileType { file_name })) => {
                    warn!("⚠️ Formato file non supportato: {}", file_name);
                    rejected.push(file_name);
                }
                Err(e) => return Err(e),
            }
        }
        if files.is_empty() {
            return Err(ValidationError::NoFilesSelected.into());
        }

        simulate_latency(self.delay_min_ms, self.delay_max_ms).await;

        let subject = if meta.subject.trim().is_empty() {
            DEFAULT_SUBJECT.to_string()
        } else {
            meta.subject.trim().to_string()
        };
        let file_names = files
            .iter()
            .map(|f| f.file_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let preview = files.iter().find_map(|f| f.preview.clone());
        let now = Utc::now();

        let document = Document {
            id: generate_id(),
            title: meta.title.trim().to_string(),
            content: DocumentContent::Material {
                description: meta.description,
                file_name: Some(file_names),
                preview,
            },
            doc_type: meta.doc_type,
            subject,
            grade: None,
            difficulty: meta.difficulty,
            tags: meta.tags,
            is_public: false,
            created_at: now,
            updated_at: now,
            user_id: DEFAULT_USER.to_string(),
            school_info: None,
        };

        info!(
            "📁 Caricato \"{}\": {} file, {} scartati",
            document.title,
            files.len(),
            rejected.len()
        );
        Ok(UploadOutcome {
            document,
            files,
            rejected,
        })
    }
}
