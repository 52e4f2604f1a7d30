//! Download trigger
//!
//! Hands finished bytes to a [`DownloadSink`] under a sanitized file name.
//! Saving never reports an error to the caller: a refused save is logged and
//! the trigger returns `None`.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use regex::Regex;
use tracing::{debug, info, warn};

use super::format::ExportFormat;

const MAX_FILENAME_CHARS: usize = 50;
const FALLBACK_FILENAME: &str = "documento";
const MAX_COPIES: usize = 1000;

static STRIP_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn strip_regex() -> Option<&'static Regex> {
    STRIP_REGEX
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9_\s-]").ok())
        .as_ref()
}

fn whitespace_regex() -> Option<&'static Regex> {
    WHITESPACE_REGEX
        .get_or_init(|| Regex::new(r"\s+").ok())
        .as_ref()
}

/// File-system-safe base name for a title
///
/// Drops everything but ASCII word characters, whitespace and `-`, turns each
/// whitespace run into `_`, and keeps at most 50 characters.
pub fn sanitize_filename(title: &str) -> String {
    let (Some(strip), Some(whitespace)) = (strip_regex(), whitespace_regex()) else {
        return sanitize_by_chars(title);
    };
    let stripped = strip.replace_all(title, "");
    let underscored = whitespace.replace_all(&stripped, "_");
    underscored.chars().take(MAX_FILENAME_CHARS).collect()
}

/// Same result as the regex path, one character at a time
fn sanitize_by_chars(title: &str) -> String {
    let mut out = String::new();
    let mut in_whitespace = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
            in_whitespace = false;
        }
    }
    out.chars().take(MAX_FILENAME_CHARS).collect()
}

/// `name.ext`, then `name (1).ext`, `name (2).ext`, ...
fn numbered_name(file_name: &str, copy: usize) -> String {
    if copy == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{} ({}).{}", stem, copy, ext),
        None => format!("{} ({})", file_name, copy),
    }
}

/// Where downloaded files end up
pub trait DownloadSink: Send + Sync {
    /// Store `bytes` as `file_name`, returning where it went
    fn save(&self, file_name: &str, mime_type: &str, bytes: &[u8]) -> std::io::Result<PathBuf>;
}

/// Writes downloads into a folder, creating it on first use
///
/// An existing file is never overwritten: the copy gets a ` (n)` suffix, as a
/// browser download would.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    folder: PathBuf,
}

impl DirectorySink {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, file_name: &str, mime_type: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.folder)?;
        for copy in 0..MAX_COPIES {
            let path = self.folder.join(numbered_name(file_name, copy));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(bytes)?;
                    debug!("💾 {} ({}, {} byte)", path.display(), mime_type, bytes.len());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }
        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("troppe copie di {}", file_name),
        ))
    }
}

/// One file captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Keeps downloads in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<SavedFile>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<SavedFile> {
        self.files
            .lock()
            .map(|files| files.clone())
            .unwrap_or_default()
    }
}

impl DownloadSink for MemorySink {
    fn save(&self, file_name: &str, mime_type: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| std::io::Error::new(ErrorKind::Other, "sink poisoned"))?;
        files.push(SavedFile {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(PathBuf::from(file_name))
    }
}

/// Saves export bytes through a sink
#[derive(Clone)]
pub struct DownloadTrigger {
    sink: Arc<dyn DownloadSink>,
}

impl DownloadTrigger {
    pub fn new(sink: Arc<dyn DownloadSink>) -> Self {
        Self { sink }
    }

    /// Trigger writing into `folder`
    pub fn to_directory(folder: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(DirectorySink::new(folder)))
    }

    /// `{sanitized title}.{extension}`
    pub fn file_name(title: &str, format: ExportFormat) -> String {
        let base = sanitize_filename(title);
        let base = if base.is_empty() {
            FALLBACK_FILENAME.to_string()
        } else {
            base
        };
        format!("{}.{}", base, format.extension())
    }

    /// Save the bytes; `None` when the sink refused them
    pub fn trigger(&self, bytes: &[u8], title: &str, format: ExportFormat) -> Option<PathBuf> {
        let file_name = Self::file_name(title, format);
        match self.sink.save(&file_name, format.mime_type(), bytes) {
            Ok(path) => {
                info!("⬇️ Download: {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("⚠️ Salvataggio di {} non riuscito: {}", file_name, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for DownloadTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadTrigger").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RefusingSink;

    impl DownloadSink for RefusingSink {
        fn save(&self, _: &str, _: &str, _: &[u8]) -> std::io::Result<PathBuf> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_sanitize_strips_and_underscores() {
        assert_eq!(
            sanitize_filename("Verifica Dante - Inferno"),
            "Verifica_Dante_-_Inferno"
        );
        assert_eq!(sanitize_filename("Perché?  L'età   è\tvera!"), "Perch_Let_vera");
    }

    #[test]
    fn test_sanitize_limits_length_and_charset() {
        let title = format!("{} {}", "Equazioni di secondo grado: esercizi & problemi!", "x".repeat(40));
        let name = sanitize_filename(&title);
        assert!(name.chars().count() <= 50);
        assert!(name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    }

    #[test]
    fn test_file_name_falls_back_when_empty() {
        assert_eq!(DownloadTrigger::file_name("???", ExportFormat::Txt), "documento.txt");
        assert_eq!(DownloadTrigger::file_name("Quiz 1", ExportFormat::Pdf), "Quiz_1.pdf");
    }

    #[test]
    fn test_trigger_saves_through_sink() {
        let sink = Arc::new(MemorySink::new());
        let trigger = DownloadTrigger::new(sink.clone());

        let saved = trigger.trigger(b"ciao", "Quiz Storia", ExportFormat::Docx);
        assert_eq!(saved, Some(PathBuf::from("Quiz_Storia.docx")));

        let files = sink.files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].mime_type, "text/plain");
        assert_eq!(files[0].bytes, b"ciao");
    }

    #[test]
    fn test_refused_save_is_silent() {
        let trigger = DownloadTrigger::new(Arc::new(RefusingSink));
        assert!(trigger.trigger(b"x", "Quiz", ExportFormat::Pdf).is_none());
    }

    #[test]
    fn test_directory_sink_creates_folder() {
        let dir = std::env::temp_dir().join(format!("th-download-{}", std::process::id()));
        let trigger = DownloadTrigger::to_directory(dir.join("nested"));

        let path = trigger.trigger(b"%PDF", "Verifica", ExportFormat::Pdf).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_char_sanitizer_matches_regex_path() {
        for title in [
            "Verifica Dante - Inferno",
            "Perché?  L'età   è\tvera!",
            "  spazi ai bordi  ",
            "a ? b",
            "???",
        ] {
            assert_eq!(sanitize_by_chars(title), sanitize_filename(title), "{:?}", title);
        }
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name("Quiz.pdf", 0), "Quiz.pdf");
        assert_eq!(numbered_name("Quiz.pdf", 2), "Quiz (2).pdf");
        assert_eq!(numbered_name("Quiz", 1), "Quiz (1)");
    }

    #[test]
    fn test_directory_sink_never_overwrites() {
        let dir = std::env::temp_dir().join(format!("th-download-copies-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        let trigger = DownloadTrigger::to_directory(&dir);

        let first = trigger.trigger(b"uno", "Verifica: Storia", ExportFormat::Txt).unwrap();
        let second = trigger.trigger(b"due", "Verifica: Storia", ExportFormat::Txt).unwrap();
        assert!(first.ends_with("Verifica_Storia.txt"));
        assert!(second.ends_with("Verifica_Storia (1).txt"));
        assert_eq!(std::fs::read(&first).unwrap(), b"uno");
        assert_eq!(std::fs::read(&second).unwrap(), b"due");

        std::fs::remove_dir_all(&dir).ok();
    }
}
