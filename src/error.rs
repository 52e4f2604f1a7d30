use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Form validation failed before the action started
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Mock generation failed
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    /// Formatting or emitting an export failed
    #[error("export error: {0}")]
    Export(#[from] ExportError),
    /// File operation failed
    #[error("file error: {0}")]
    File(#[from] FileError),
    /// Configuration problem
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// In-memory store lookup failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Validation failures, surfaced to the user as a notice
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Generation form submitted without subject or topic
    #[error("Compila almeno Materia e Argomento")]
    SubjectAndTopicRequired,
    /// Saving or uploading a document without a title
    #[error("Il titolo è obbligatorio")]
    EmptyTitle,
    /// Upload submitted with no files
    #[error("Seleziona almeno un file")]
    NoFilesSelected,
    /// File type outside the upload allow-list
    #[error("formato file non supportato: {file_name}")]
    UnsupportedFileType { file_name: String },
    /// Unknown value for a closed set (format, document type, ...)
    #[error("valore non valido per {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Mock generation failures
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The simulated backend failure branch
    #[error("Errore nella generazione della verifica. Riprova più tardi.")]
    Simulated,
    /// Requested question count outside 1..=50
    #[error("numero di domande non valido: {count} (1-50)")]
    InvalidQuestionCount { count: usize },
}

/// Export failures
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing the byte stream failed
    #[error("impossibile generare il documento: {source}")]
    EmitFailed {
        #[source]
        source: std::io::Error,
    },
}

/// File operation failures
#[derive(Debug, Error)]
pub enum FileError {
    /// File does not exist
    #[error("file non trovato: {path}")]
    NotFound { path: String },
    /// Reading failed
    #[error("lettura fallita ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML parsing failed
    #[error("TOML non valido ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// JSON parsing failed
    #[error("JSON non valido ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Extension is neither toml nor json
    #[error("estensione non supportata: {path}")]
    UnsupportedExtension { path: String },
    /// Directory does not exist
    #[error("cartella non trovata: {path}")]
    DirectoryNotFound { path: String },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be parsed
    #[error("file di configurazione non valido ({path}): {message}")]
    InvalidFile { path: String, message: String },
    /// Delay bounds are inverted
    #[error("intervallo di ritardo non valido: {min_ms}..{max_ms} ms")]
    InvalidDelayRange { min_ms: u64, max_ms: u64 },
    /// `max_concurrent_exports` is zero
    #[error("il numero di export concorrenti deve essere almeno 1")]
    InvalidConcurrency,
}

/// Store lookup errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with the given id
    #[error("documento non trovato: {id}")]
    DocumentNotFound { id: String },
}

// ========== conversions from common error types ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // toml errors carry no path
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== convenience constructors ==========

impl AppError {
    /// File read error with path
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// Unknown document id
    pub fn document_not_found(id: impl Into<String>) -> Self {
        AppError::Store(StoreError::DocumentNotFound { id: id.into() })
    }

    /// Whether the error is shown to the user as a notice rather than aborting
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::Generation(_) | AppError::Store(_)
        )
    }

    /// Message shown in a notice, without the category prefix
    pub fn user_message(&self) -> Option<String> {
        match self {
            AppError::Validation(e) => Some(e.to_string()),
            AppError::Generation(e) => Some(e.to_string()),
            AppError::Store(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
