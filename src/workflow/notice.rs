//! User-facing notices
//!
//! What the user is told after an action: a success line, or the reason it
//! failed. Validation, generation and lookup errors carry their own message; anything
//! else is reported with the action's generic failure text and logged.

use std::fmt::Display;

use tracing::{error, warn};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Notice for a failed action; `fallback` is used for internal errors
    pub fn from_error(err: &AppError, fallback: &str) -> Self {
        match err.user_message() {
            Some(message) => {
                warn!("⚠️ {}", message);
                Self::error(message)
            }
            None => {
                error!("❌ {}: {}", fallback, err);
                Self::error(fallback)
            }
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.level {
            NoticeLevel::Success => "✅",
            NoticeLevel::Error => "❌",
        };
        write!(f, "{} {}", icon, self.message)
    }
}

/// A finished action and what to tell the user about it
#[derive(Debug, Clone)]
pub struct Completed<T> {
    pub value: T,
    pub notice: Notice,
}

impl<T> Completed<T> {
    pub fn new(value: T, notice: impl Into<String>) -> Self {
        Self {
            value,
            notice: Notice::success(notice),
        }
    }
}

/// Outcome of a flow action: the value, or the notice explaining the failure
pub type FlowResult<T> = Result<Completed<T>, Notice>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GenerationError, ValidationError};

    #[test]
    fn test_user_facing_errors_keep_their_message() {
        let notice = Notice::from_error(
            &ValidationError::SubjectAndTopicRequired.into(),
            "Errore imprevisto durante la generazione",
        );
        assert_eq!(notice.message, "Compila almeno Materia e Argomento");
        assert!(notice.is_error());

        let notice = Notice::from_error(&GenerationError::Simulated.into(), "x");
        assert_eq!(
            notice.message,
            "Errore nella generazione della verifica. Riprova più tardi."
        );
    }

    #[test]
    fn test_internal_errors_use_fallback() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let notice = Notice::from_error(&io.into(), "Errore durante il download");
        assert_eq!(notice.to_string(), "❌ Errore durante il download");

        let notice = Notice::from_error(&AppError::document_not_found("42"), "x");
        assert_eq!(notice.message, "documento non trovato: 42");
    }
}
