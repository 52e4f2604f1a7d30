//! One user action, end to end
//!
//! Responsibilities:
//! - run the service or export step for the action
//! - record the activity and update the counters
//! - turn the result into a [`Notice`]
//!
//! State is touched only after the fallible step succeeded, so a failed action
//! leaves it as it was.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::error::{AppResult, ValidationError};
use crate::export::{
    DownloadTrigger, ExportFormat, ExportOptions, ExportOutcome, ExportPipeline, ExportTemplate,
};
use crate::models::{
    ActivityKind, Difficulty, Document, DocumentContent, DocumentType, QuizContent, SchoolInfo,
};
use crate::services::{
    AiService, Clipboard, GenerateQuizParams, ShareKind, ShareService, UploadMeta, UploadOutcome,
    UploadService,
};
use crate::store::{AppState, StatsUpdate};
use crate::utils::{generate_id, Clock};

use super::notice::{Completed, FlowResult, Notice};

const USER_ID: &str = "user1";

/// Text-only rendition of a document ready for printing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOut {
    pub title: String,
    pub text: String,
}

pub struct QuizFlow {
    ai: AiService,
    upload: UploadService,
    share: ShareService,
    export: ExportPipeline,
    school: SchoolInfo,
    default_template: ExportTemplate,
    include_answers: bool,
    include_points: bool,
}

impl QuizFlow {
    pub fn new(config: &Config, trigger: DownloadTrigger, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            ai: AiService::new(config),
            upload: UploadService::new(config),
            share: ShareService::new(config, clipboard),
            export: ExportPipeline::new(config, trigger),
            school: config.school_info(),
            default_template: ExportTemplate::from_id(&config.default_template),
            include_answers: config.include_answers,
            include_points: config.include_points,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.export = self.export.with_clock(clock);
        self
    }

    pub fn default_template(&self) -> ExportTemplate {
        self.default_template
    }

    pub fn pipeline(&self) -> &ExportPipeline {
        &self.export
    }

    pub fn school(&self) -> &SchoolInfo {
        &self.school
    }

    /// Export options from the configured defaults
    pub fn options(&self, format: ExportFormat) -> ExportOptions {
        ExportOptions::new(format)
            .with_answers(self.include_answers)
            .with_points(self.include_points)
    }

    /// Generate a quiz with the mock AI
    pub async fn generate(
        &self,
        state: &mut AppState,
        params: &GenerateQuizParams,
    ) -> FlowResult<QuizContent> {
        let quiz = self
            .ai
            .generate_quiz(params)
            .await
            .map_err(|e| Notice::from_error(&e, "Errore imprevisto durante la generazione"))?;

        state.activity.add_activity(
            ActivityKind::Generate,
            "Verifica generata",
            format!("Hai generato una nuova verifica di {}", params.subject),
        );
        let generated = state.activity.stats().quizzes_generated + 1;
        state.activity.update_stats(StatsUpdate {
            quizzes_generated: Some(generated),
            ..StatsUpdate::default()
        });

        Ok(Completed::new(quiz, "Verifica generata con successo!"))
    }

    /// Quiz from a community template
    pub async fn use_template(&self, state: &mut AppState, name: &str) -> FlowResult<QuizContent> {
        let quiz = self.ai.generate_from_template(name).await;

        state.activity.add_activity(
            ActivityKind::Template,
            "Template utilizzato",
            format!("Hai usato il template \"{}\"", name),
        );
        let used = state.activity.stats().templates_used + 1;
        state.activity.update_stats(StatsUpdate {
            templates_used: Some(used),
            ..StatsUpdate::default()
        });

        Ok(Completed::new(
            quiz,
            format!("Nuova verifica generata dal template \"{}\"", name),
        ))
    }

    /// Store a generated quiz as a `QUIZ` document
    pub fn save_quiz(
        &self,
        state: &mut AppState,
        quiz: QuizContent,
        subject: &str,
        difficulty: Difficulty,
    ) -> FlowResult<Document> {
        let title = quiz.title.trim().to_string();
        if title.is_empty() {
            return Err(Notice::from_error(
                &ValidationError::EmptyTitle.into(),
                "Impossibile salvare il documento",
            ));
        }

        let now = Utc::now();
        let document = Document {
            id: generate_id(),
            title: title.clone(),
            content: DocumentContent::Quiz(quiz),
            doc_type: DocumentType::Quiz,
            subject: subject.to_string(),
            grade: None,
            difficulty,
            tags: Vec::new(),
            is_public: false,
            created_at: now,
            updated_at: now,
            user_id: USER_ID.to_string(),
            school_info: Some(self.school.clone()),
        };

        state.documents.add(document.clone());
        state.activity.add_activity(
            ActivityKind::Save,
            "Documento salvato",
            format!("Hai salvato \"{}\"", title),
        );
        state
            .activity
            .add_recent_document(&title, subject, DocumentType::Quiz.as_str(), false);

        info!("💾 Salvato \"{}\" ({})", title, document.id);
        Ok(Completed::new(
            document,
            format!("\"{}\" salvata nei tuoi documenti", title),
        ))
    }

    /// Export a quiz that is not (yet) stored
    pub async fn export_quiz(
        &self,
        state: &mut AppState,
        quiz: &QuizContent,
        template: ExportTemplate,
        options: ExportOptions,
    ) -> FlowResult<ExportOutcome> {
        let outcome = self
            .export
            .export(quiz, template, &self.school, options)
            .await
            .map_err(|e| Notice::from_error(&e, "Errore durante il download"))?;

        state.activity.add_activity(
            ActivityKind::Download,
            "Documento scaricato",
            format!("Hai scaricato \"{}\"", quiz.title),
        );
        Ok(Completed::new(
            outcome,
            format!("Download di \"{}\" avviato", quiz.title),
        ))
    }

    /// Export a stored document
    ///
    /// Documents without quiz content are exported as the two-question
    /// placeholder, answers and points included.
    pub async fn export_document(
        &self,
        state: &mut AppState,
        id: &str,
        format: ExportFormat,
        template: Option<ExportTemplate>,
    ) -> FlowResult<ExportOutcome> {
        let fallback = "Errore durante il download";
        let document = state
            .documents
            .get(id)
            .map_err(|e| Notice::from_error(&e, fallback))?
            .clone();
        let template = template.unwrap_or(self.default_template);
        let school = document.school_info.as_ref().unwrap_or(&self.school);

        let result = match document.content.as_quiz() {
            Some(quiz) => {
                self.export
                    .export(quiz, template, school, self.options(format))
                    .await
            }
            None => {
                self.export
                    .download_document(&document.title, format, template, school)
                    .await
            }
        };
        let outcome = result.map_err(|e| Notice::from_error(&e, fallback))?;

        state.activity.add_activity(
            ActivityKind::Download,
            "Documento scaricato",
            format!("Hai scaricato \"{}\"", document.title),
        );
        Ok(Completed::new(
            outcome,
            format!("\"{}\" scaricato con successo!", document.title),
        ))
    }

    fn print_quiz(&self, document: &Document) -> QuizContent {
        match document.content.as_quiz() {
            Some(quiz) => quiz.clone(),
            None => self.ai.preview_quiz_for(&document.subject, &document.title),
        }
    }

    fn render_print(&self, document: &Document) -> AppResult<String> {
        let quiz = self.print_quiz(document);
        let school = document.school_info.as_ref().unwrap_or(&self.school);
        let bytes = self.export.render(
            &quiz,
            self.default_template,
            school,
            self.options(ExportFormat::Txt),
        )?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Printable text of a stored document
    pub fn print_document(&self, state: &mut AppState, id: &str) -> FlowResult<PrintOut> {
        let fallback = "Errore durante la stampa";
        let document = state
            .documents
            .get(id)
            .map_err(|e| Notice::from_error(&e, fallback))?
            .clone();
        let text = self
            .render_print(&document)
            .map_err(|e| Notice::from_error(&e, fallback))?;

        state.activity.add_activity(
            ActivityKind::Save,
            "Documento stampato",
            format!("Hai inviato in stampa \"{}\"", document.title),
        );
        Ok(Completed::new(
            PrintOut {
                title: document.title.clone(),
                text,
            },
            format!("\"{}\" inviato alla stampa", document.title),
        ))
    }

    /// Download the print version of a stored document
    pub async fn download_print_version(
        &self,
        state: &mut AppState,
        id: &str,
        format: ExportFormat,
    ) -> FlowResult<ExportOutcome> {
        let fallback = "Errore durante il download";
        let document = state
            .documents
            .get(id)
            .map_err(|e| Notice::from_error(&e, fallback))?
            .clone();
        let quiz = self.print_quiz(&document);
        let school = document.school_info.as_ref().unwrap_or(&self.school);
        let outcome = self
            .export
            .export(&quiz, self.default_template, school, self.options(format))
            .await
            .map_err(|e| Notice::from_error(&e, fallback))?;

        state.activity.add_activity(
            ActivityKind::Download,
            "Documento scaricato",
            format!("Hai scaricato \"{}\" (versione stampa)", document.title),
        );
        Ok(Completed::new(
            outcome,
            format!("\"{}\" scaricato con successo!", document.title),
        ))
    }

    /// Copy the link of a stored document
    pub fn share_document(&self, state: &mut AppState, id: &str) -> FlowResult<String> {
        let title = state
            .documents
            .get(id)
            .map_err(|e| Notice::from_error(&e, "Impossibile condividere il documento"))?
            .title
            .clone();
        Ok(self.share_with_activity(state, ShareKind::Document, id, &title))
    }

    /// Copy the link of a template
    pub fn share_template(&self, state: &mut AppState, id: &str, title: &str) -> FlowResult<String> {
        Ok(self.share_with_activity(state, ShareKind::Template, id, title))
    }

    fn share_with_activity(
        &self,
        state: &mut AppState,
        kind: ShareKind,
        id: &str,
        title: &str,
    ) -> Completed<String> {
        let link = self.share.share_link(kind, id);
        let (activity_title, description) = kind.activity_text(title);
        state
            .activity
            .add_activity(ActivityKind::Share, activity_title, description);

        let notice = match kind {
            ShareKind::Document => format!("Link di \"{}\" copiato negli appunti", title),
            ShareKind::Template => format!("Link del template \"{}\" copiato negli appunti", title),
        };
        Completed::new(link, notice)
    }

    /// Upload files as a new document
    pub async fn upload(
        &self,
        state: &mut AppState,
        paths: &[PathBuf],
        meta: UploadMeta,
    ) -> FlowResult<UploadOutcome> {
        let outcome = self
            .upload
            .intake(paths, meta)
            .await
            .map_err(|e| Notice::from_error(&e, "Errore durante il caricamento"))?;

        let document = &outcome.document;
        state.documents.add(document.clone());
        state.activity.add_recent_document(
            &document.title,
            &document.subject,
            document.doc_type.as_str(),
            false,
        );
        state.activity.add_activity(
            ActivityKind::Upload,
            "Documento caricato",
            outcome.activity_description(),
        );

        let notice = format!("Documento \"{}\" caricato con successo!", document.title);
        Ok(Completed::new(outcome, notice))
    }
}

impl std::fmt::Debug for QuizFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizFlow")
            .field("export", &self.export)
            .field("share", &self.share)
            .field("default_template", &self.default_template)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use crate::services::{MemoryClipboard, QuizKind};
    use crate::utils::FixedClock;
    use chrono::NaiveDate;

    struct Fixture {
        flow: QuizFlow,
        state: AppState,
        sink: Arc<MemorySink>,
        clipboard: Arc<MemoryClipboard>,
    }

    fn fixture_with(config: Config) -> Fixture {
        let sink = Arc::new(MemorySink::new());
        let clipboard = Arc::new(MemoryClipboard::new());
        let flow = QuizFlow::new(&config, DownloadTrigger::new(sink.clone()), clipboard.clone())
            .with_clock(Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())));
        Fixture {
            flow,
            state: AppState::default(),
            sink,
            clipboard,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Config::default().without_delays())
    }

    fn params(subject: &str, topic: &str) -> GenerateQuizParams {
        GenerateQuizParams {
            question_count: 3,
            ..GenerateQuizParams::new(subject, topic, QuizKind::suggested_for(subject))
        }
    }

    #[tokio::test]
    async fn test_generate_records_activity_and_counter() {
        let mut fx = fixture();
        let done = fx
            .flow
            .generate(&mut fx.state, &params("Matematica", "Equazioni"))
            .await
            .unwrap();

        assert_eq!(done.value.title, "Test di Matematica - Equazioni di Secondo Grado");
        assert_eq!(done.notice.message, "Verifica generata con successo!");
        assert_eq!(fx.state.activity.stats().quizzes_generated, 9);
        let latest = &fx.state.activity.activities()[0];
        assert_eq!(latest.kind, ActivityKind::Generate);
        assert_eq!(latest.description, "Hai generato una nuova verifica di Matematica");
    }

    #[tokio::test]
    async fn test_failed_generation_leaves_state_unchanged() {
        let mut fx = fixture_with(Config {
            generation_failure_rate: 1.0,
            ..Config::default().without_delays()
        });
        let notice = fx
            .flow
            .generate(&mut fx.state, &params("Storia", "Roma"))
            .await
            .unwrap_err();

        assert!(notice.is_error());
        assert_eq!(fx.state.activity.activities().len(), 3);
        assert_eq!(fx.state.activity.stats().quizzes_generated, 8);

        let notice = fx
            .flow
            .generate(&mut fx.state, &params("", "Roma"))
            .await
            .unwrap_err();
        assert_eq!(notice.message, "Compila almeno Materia e Argomento");
    }

    #[tokio::test]
    async fn test_save_then_export_stored_quiz() {
        let mut fx = fixture();
        let quiz = fx
            .flow
            .generate(&mut fx.state, &params("Letteratura Italiana", "Dante"))
            .await
            .unwrap()
            .value;

        let saved = fx
            .flow
            .save_quiz(&mut fx.state, quiz, "Letteratura Italiana", Difficulty::Medium)
            .unwrap();
        assert_eq!(
            saved.notice.message,
            "\"Verifica su Dante Alighieri - Inferno\" salvata nei tuoi documenti"
        );
        assert_eq!(fx.state.documents.len(), 7);
        assert_eq!(fx.state.activity.stats().total_documents, 13);

        let exported = fx
            .flow
            .export_document(&mut fx.state, &saved.value.id, ExportFormat::Txt, None)
            .await
            .unwrap();
        assert_eq!(exported.value.file_name, "Verifica_su_Dante_Alighieri_-_Inferno.txt");

        let text = String::from_utf8(fx.sink.files()[0].bytes.clone()).unwrap();
        assert!(text.contains("Chi è Virgilio nella Divina Commedia"));
        assert!(text.contains("15/3/2024"));
        assert_eq!(fx.state.activity.activities()[0].title, "Documento scaricato");
    }

    #[tokio::test]
    async fn test_save_rejects_blank_title() {
        let mut fx = fixture();
        let mut quiz = crate::export::placeholder_quiz("x", ExportFormat::Pdf);
        quiz.title = "   ".into();
        let notice = fx
            .flow
            .save_quiz(&mut fx.state, quiz, "Storia", Difficulty::Easy)
            .unwrap_err();
        assert_eq!(notice.message, "Il titolo è obbligatorio");
        assert_eq!(fx.state.documents.len(), 6);
    }

    #[tokio::test]
    async fn test_export_outline_document_uses_placeholder() {
        let mut fx = fixture();
        let done = fx
            .flow
            .export_document(&mut fx.state, "2", ExportFormat::Pdf, Some(ExportTemplate::ExamGrid))
            .await
            .unwrap();

        assert_eq!(done.value.file_name, "Test_Equazioni_di_Secondo_Grado.pdf");
        assert_eq!(done.value.template, ExportTemplate::ExamGrid);
        assert!(fx.sink.files()[0].bytes.starts_with(b"%PDF-1.4"));

        let notice = fx
            .flow
            .export_document(&mut fx.state, "missing", ExportFormat::Pdf, None)
            .await
            .unwrap_err();
        assert_eq!(notice.message, "documento non trovato: missing");
    }

    #[tokio::test]
    async fn test_template_use_bumps_counter() {
        let mut fx = fixture();
        let done = fx.flow.use_template(&mut fx.state, "Verifica Dante").await.unwrap();
        assert_eq!(done.value.total_points, 25);
        assert_eq!(fx.state.activity.stats().templates_used, 6);
        assert_eq!(
            fx.state.activity.activities()[0].description,
            "Hai usato il template \"Verifica Dante\""
        );
    }

    #[test]
    fn test_share_document_copies_link() {
        let mut fx = fixture();
        let done = fx.flow.share_document(&mut fx.state, "3").unwrap();
        assert_eq!(done.value, "https://www.teachinghub.it/documents/3");
        assert_eq!(fx.clipboard.contents().as_deref(), Some(done.value.as_str()));
        assert_eq!(
            done.notice.message,
            "Link di \"Quiz Rivoluzione Francese\" copiato negli appunti"
        );
        assert_eq!(fx.state.activity.activities()[0].kind, ActivityKind::Share);
    }

    #[test]
    fn test_print_uses_preview_for_outline_documents() {
        let mut fx = fixture();
        let done = fx.flow.print_document(&mut fx.state, "2").unwrap();
        assert!(done.value.text.contains("x² - 5x + 6 = 0"));
        assert_eq!(
            fx.state.activity.activities()[0].description,
            "Hai inviato in stampa \"Test Equazioni di Secondo Grado\""
        );
    }

    #[tokio::test]
    async fn test_upload_adds_document() {
        let mut fx = fixture();
        let mut meta = UploadMeta::new("Dispense");
        meta.subject = "Scienze".into();
        let done = fx
            .flow
            .upload(&mut fx.state, &[PathBuf::from("cap1.pdf")], meta)
            .await
            .unwrap();

        assert_eq!(done.notice.message, "Documento \"Dispense\" caricato con successo!");
        assert_eq!(fx.state.documents.len(), 7);
        assert_eq!(fx.state.activity.recent_documents()[0].doc_type, "MATERIAL");
        assert_eq!(
            fx.state.activity.activities()[0].description,
            "Hai caricato \"Dispense\" (1 file)"
        );
    }
}
