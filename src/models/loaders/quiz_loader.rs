use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{AppError, AppResult, FileError};
use crate::models::quiz::QuizContent;

fn is_quiz_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("toml") | Some("json")
    )
}

/// Load one QuizContent from a `.toml` or `.json` file
pub async fn load_quiz_file(path: &Path) -> AppResult<QuizContent> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(FileError::NotFound { path: display }.into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(&display, e))?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            FileError::TomlParseFailed {
                path: display,
                source: Box::new(e),
            }
            .into()
        }),
        Some("json") => serde_json::from_str(&content).map_err(|e| {
            FileError::JsonParseFailed {
                path: display,
                source: Box::new(e),
            }
            .into()
        }),
        _ => Err(FileError::UnsupportedExtension { path: display }.into()),
    }
}

/// Load every quiz file in a folder
///
/// Files that fail to parse are logged and skipped. Results are sorted by path.
pub async fn load_all_quiz_files(folder_path: &str) -> AppResult<Vec<(PathBuf, QuizContent)>> {
    let folder = PathBuf::from(folder_path);

    if !folder.is_dir() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_quiz_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut quizzes = Vec::new();
    for path in paths {
        tracing::info!(
            "Caricamento: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_quiz_file(&path).await {
            Ok(quiz) => {
                tracing::info!("Caricate {} domande", quiz.questions.len());
                quizzes.push((path, quiz));
            }
            Err(e) => {
                tracing::warn!("Impossibile caricare {}: {}", path.display(), e);
            }
        }
    }

    Ok(quizzes)
}
