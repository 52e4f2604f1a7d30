//! Export templates
//!
//! A fixed set of header/layout presets picked at export time. Templates only
//! change literal strings in the header and how much room questions get; the
//! block order is the same for all of them.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Academic,
    Professional,
    Quick,
}

impl TemplateCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateCategory::Academic => "academic",
            TemplateCategory::Professional => "professional",
            TemplateCategory::Quick => "quick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportTemplate {
    #[default]
    SchoolStandard,
    UniversityFormal,
    ExamGrid,
    Minimalist,
    QuizCompact,
}

impl ExportTemplate {
    pub const ALL: [ExportTemplate; 5] = [
        ExportTemplate::SchoolStandard,
        ExportTemplate::UniversityFormal,
        ExportTemplate::ExamGrid,
        ExportTemplate::Minimalist,
        ExportTemplate::QuizCompact,
    ];

    /// Look up a template id; unknown ids fall back to `school-standard`
    pub fn from_id(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.id() == id.trim())
            .unwrap_or_else(|| {
                debug!("template sconosciuto '{}', uso school-standard", id);
                ExportTemplate::default()
            })
    }

    pub fn id(self) -> &'static str {
        match self {
            ExportTemplate::SchoolStandard => "school-standard",
            ExportTemplate::UniversityFormal => "university-formal",
            ExportTemplate::ExamGrid => "exam-grid",
            ExportTemplate::Minimalist => "minimalist",
            ExportTemplate::QuizCompact => "quiz-compact",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExportTemplate::SchoolStandard => "Template Scolastico",
            ExportTemplate::UniversityFormal => "Template Universitario",
            ExportTemplate::ExamGrid => "Template Esame Ufficiale",
            ExportTemplate::Minimalist => "Template Minimalista",
            ExportTemplate::QuizCompact => "Template Quiz Veloce",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExportTemplate::SchoolStandard => {
                "Formato tradizionale per scuole superiori con intestazione istituzionale"
            }
            ExportTemplate::UniversityFormal => {
                "Stile formale per esami universitari con layout accademico"
            }
            ExportTemplate::ExamGrid => {
                "Template per esami di stato e certificazioni con criteri di valutazione"
            }
            ExportTemplate::Minimalist => "Design pulito senza fronzoli, focus totale sul contenuto",
            ExportTemplate::QuizCompact => {
                "Formato super compatto ottimizzato per test a risposta multipla"
            }
        }
    }

    pub fn category(self) -> TemplateCategory {
        match self {
            ExportTemplate::SchoolStandard => TemplateCategory::Academic,
            ExportTemplate::UniversityFormal | ExportTemplate::ExamGrid => {
                TemplateCategory::Professional
            }
            ExportTemplate::Minimalist | ExportTemplate::QuizCompact => TemplateCategory::Quick,
        }
    }

    pub fn features(self) -> &'static [&'static str] {
        match self {
            ExportTemplate::SchoolStandard => &[
                "Intestazione scuola",
                "Spazio nome/cognome",
                "Sezione valutazione",
                "Formato A4",
            ],
            ExportTemplate::UniversityFormal => &[
                "Anno accademico",
                "Matricola studente",
                "Layout formale",
                "Bordi eleganti",
            ],
            ExportTemplate::ExamGrid => &[
                "Criteri valutazione",
                "Commissione esame",
                "Punteggi dettagliati",
                "Protocollo ufficiale",
            ],
            ExportTemplate::Minimalist => &[
                "Zero distrazioni",
                "Risparmio carta",
                "Solo essenziale",
                "Eco-friendly",
            ],
            ExportTemplate::QuizCompact => &[
                "Bubble sheet",
                "Correzione rapida",
                "Formato compatto",
                "Multi-colonna",
            ],
        }
    }

    /// Compact templates truncate long text and leave less answer space
    pub fn is_compact(self) -> bool {
        matches!(self, ExportTemplate::Minimalist | ExportTemplate::QuizCompact)
    }
}

impl std::fmt::Display for ExportTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
