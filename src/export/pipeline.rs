//! Export pipeline
//!
//! formatter → emitter (pdf) or raw text (docx/txt) → download trigger,
//! preceded by a short simulated "generation" wait.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{Question, QuizContent, SchoolInfo};
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::delay::simulate_latency;
use crate::utils::logging::log_export_complete;

use super::download::DownloadTrigger;
use super::format::{ExportFormat, ExportOptions};
use super::formatter::format_quiz;
use super::pdf::PseudoPdfEmitter;
use super::template::ExportTemplate;

/// Result of one export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub file_name: String,
    pub format: ExportFormat,
    pub template: ExportTemplate,
    pub size: usize,
    /// `None` when the sink refused the file
    pub saved_to: Option<PathBuf>,
}

/// Quiz used when a stored document has no quiz content of its own
pub fn placeholder_quiz(title: &str, format: ExportFormat) -> QuizContent {
    QuizContent {
        title: title.to_string(),
        instructions: Some(format!(
            "Verifica scaricata in formato {}. Tempo suggerito: 60 minuti.",
            format.extension().to_uppercase()
        )),
        questions: vec![
            Question::multiple_choice(
                "1",
                format!("Prima domanda di {}", title),
                ["Opzione A", "Opzione B", "Opzione C", "Opzione D"],
                1,
                5,
            ),
            Question::open("2", format!("Domanda aperta relativa a {}", title), 15),
        ],
        total_points: 20,
        time_limit: Some(60),
    }
}

#[derive(Clone)]
pub struct ExportPipeline {
    emitter: PseudoPdfEmitter,
    trigger: DownloadTrigger,
    clock: Arc<dyn Clock>,
    delay_min_ms: u64,
    delay_max_ms: u64,
}

impl ExportPipeline {
    pub fn new(config: &Config, trigger: DownloadTrigger) -> Self {
        Self {
            emitter: PseudoPdfEmitter::new(),
            trigger,
            clock: Arc::new(SystemClock),
            delay_min_ms: config.export_delay_min_ms,
            delay_max_ms: config.export_delay_max_ms,
        }
    }

    /// Pipeline saving into the configured output folder
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, DownloadTrigger::to_directory(&config.output_folder))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Bytes of the file, without delay or saving
    pub fn render(
        &self,
        quiz: &QuizContent,
        template: ExportTemplate,
        school: &SchoolInfo,
        options: ExportOptions,
    ) -> AppResult<Vec<u8>> {
        let document = format_quiz(quiz, template, school, options, self.clock.as_ref());
        debug!(
            "formattate {} righe ({} domande)",
            document.line_count(),
            quiz.questions.len()
        );

        match options.format {
            ExportFormat::Pdf => self.emitter.emit(&document),
            ExportFormat::Docx | ExportFormat::Txt => Ok(document.to_text().into_bytes()),
        }
    }

    /// Format, emit and save a quiz
    pub async fn export(
        &self,
        quiz: &QuizContent,
        template: ExportTemplate,
        school: &SchoolInfo,
        options: ExportOptions,
    ) -> AppResult<ExportOutcome> {
        info!(
            "{} Export di \"{}\" ({}, {})",
            options.format.icon(),
            quiz.title,
            options.format,
            template
        );
        simulate_latency(self.delay_min_ms, self.delay_max_ms).await;

        let bytes = self.render(quiz, template, school, options)?;
        let saved_to = self.trigger.trigger(&bytes, &quiz.title, options.format);
        log_export_complete(&quiz.title, template.id(), bytes.len());

        Ok(ExportOutcome {
            file_name: DownloadTrigger::file_name(&quiz.title, options.format),
            format: options.format,
            template,
            size: bytes.len(),
            saved_to,
        })
    }

    /// Export the placeholder quiz for a document, answers and points included
    pub async fn download_document(
        &self,
        title: &str,
        format: ExportFormat,
        template: ExportTemplate,
        school: &SchoolInfo,
    ) -> AppResult<ExportOutcome> {
        let quiz = placeholder_quiz(title, format);
        let options = ExportOptions::new(format)
            .with_answers(true)
            .with_points(true);
        self.export(&quiz, template, school, options).await
    }
}

impl std::fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("trigger", &self.trigger)
            .field("delay_min_ms", &self.delay_min_ms)
            .field("delay_max_ms", &self.delay_max_ms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::download::MemorySink;
    use crate::utils::FixedClock;
    use chrono::NaiveDate;

    fn pipeline(sink: Arc<MemorySink>) -> ExportPipeline {
        let config = Config::default().without_delays();
        ExportPipeline::new(&config, DownloadTrigger::new(sink))
            .with_clock(Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap())))
    }

    #[tokio::test]
    async fn test_pdf_export_saves_container() {
        let sink = Arc::new(MemorySink::new());
        let quiz = placeholder_quiz("Verifica Storia - Risorgimento", ExportFormat::Pdf);

        let outcome = pipeline(sink.clone())
            .export(
                &quiz,
                ExportTemplate::SchoolStandard,
                &SchoolInfo::default(),
                ExportOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.file_name, "Verifica_Storia_-_Risorgimento.pdf");
        assert!(outcome.saved_to.is_some());
        let files = sink.files();
        assert_eq!(files[0].mime_type, "application/pdf");
        assert!(files[0].bytes.starts_with(b"%PDF-1.4"));
        assert_eq!(files[0].bytes.len(), outcome.size);
    }

    #[tokio::test]
    async fn test_txt_export_is_formatted_text() {
        let sink = Arc::new(MemorySink::new());
        let quiz = placeholder_quiz("Quiz", ExportFormat::Txt);

        pipeline(sink.clone())
            .export(
                &quiz,
                ExportTemplate::Minimalist,
                &SchoolInfo::default(),
                ExportOptions::new(ExportFormat::Txt),
            )
            .await
            .unwrap();

        let text = String::from_utf8(sink.files()[0].bytes.clone()).unwrap();
        assert!(text.starts_with("QUIZ\n2/5/2024    Tempo: 60 min"));
        assert!(text.contains("DOMANDA 2 (15 punti)"));
    }

    #[tokio::test]
    async fn test_download_document_marks_answers() {
        let sink = Arc::new(MemorySink::new());
        pipeline(sink.clone())
            .download_document(
                "Equazioni",
                ExportFormat::Docx,
                ExportTemplate::SchoolStandard,
                &SchoolInfo::default(),
            )
            .await
            .unwrap();

        let file = &sink.files()[0];
        assert_eq!(file.file_name, "Equazioni.docx");
        let text = String::from_utf8_lossy(&file.bytes);
        assert!(text.contains("Verifica scaricata in formato DOCX. Tempo suggerito: 60 minuti."));
        assert!(text.contains("   B) Opzione B ← RISPOSTA CORRETTA"));
        assert!(text.contains("PUNTEGGIO OTTENUTO: _____ / 20 punti"));
    }

    #[test]
    fn test_placeholder_quiz_totals() {
        let quiz = placeholder_quiz("X", ExportFormat::Pdf);
        assert_eq!(quiz.points_sum(), quiz.total_points);
        assert_eq!(quiz.questions.len(), 2);
    }
}
