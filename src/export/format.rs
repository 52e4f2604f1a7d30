use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// File format offered by the download menu
///
/// Only `pdf` gets the container wrapper; `docx` and `txt` are the formatted
/// text saved as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Docx,
    Txt,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Docx, ExportFormat::Txt];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Txt => "txt",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx | ExportFormat::Txt => "text/plain",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "📄",
            ExportFormat::Docx => "📝",
            ExportFormat::Txt => "📋",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "Formato PDF universale",
            ExportFormat::Docx => "Documento Word modificabile",
            ExportFormat::Txt => "Testo semplice",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" | "doc" | "word" => Ok(ExportFormat::Docx),
            "txt" | "text" => Ok(ExportFormat::Txt),
            _ => Err(ValidationError::InvalidValue {
                field: "formato",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Flags chosen in the download dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Mark the correct option of multiple-choice questions
    pub include_answers: bool,
    /// Print per-question points and the score footer
    pub include_points: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Pdf,
            include_answers: false,
            include_points: true,
        }
    }
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_answers(mut self, include: bool) -> Self {
        self.include_answers = include;
        self
    }

    pub fn with_points(mut self, include: bool) -> Self {
        self.include_points = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pdf_is_binary_mime() {
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(ExportFormat::Docx.mime_type(), "text/plain");
        assert_eq!(ExportFormat::Txt.mime_type(), "text/plain");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(".PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("word".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert!("odt".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_options_builder() {
        let options = ExportOptions::new(ExportFormat::Txt)
            .with_answers(true)
            .with_points(false);
        assert_eq!(options.format, ExportFormat::Txt);
        assert!(options.include_answers);
        assert!(!options.include_points);
    }
}
