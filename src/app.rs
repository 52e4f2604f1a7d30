//! Application entry
//!
//! Owns the configuration, the state and the flow, and runs one [`Command`].
//! Batch export fans out over a semaphore-bounded set of tasks.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::export::{DownloadTrigger, ExportFormat, ExportOptions, ExportTemplate};
use crate::math;
use crate::models::{load_all_quiz_files, load_quiz_file, ActivityKind, Difficulty, QuizContent};
use crate::services::mock_responses::community_templates;
use crate::services::{Clipboard, GenerateQuizParams, MemoryClipboard, UploadMeta};
use crate::store::{AppState, DocumentFilters};
use crate::utils::logging::{log_startup, print_final_stats, truncate_text};
use crate::workflow::{FlowResult, Notice, QuizFlow};

/// One CLI action
#[derive(Debug, Clone)]
pub enum Command {
    /// Generate a quiz, optionally saving and exporting it
    Generate {
        params: GenerateQuizParams,
        save: bool,
        export: Option<ExportFormat>,
        template: Option<ExportTemplate>,
        json_out: Option<PathBuf>,
    },
    /// Export a quiz file (`.toml` / `.json`)
    Export {
        quiz_file: PathBuf,
        format: Option<ExportFormat>,
        template: Option<ExportTemplate>,
        include_answers: Option<bool>,
    },
    /// Export every quiz file in a folder
    BatchExport {
        folder: Option<String>,
        format: Option<ExportFormat>,
        template: Option<ExportTemplate>,
    },
    /// Render a formula
    Math { formula: String, html: bool },
    /// List, download or print stored documents
    Documents {
        filters: DocumentFilters,
        download: Option<String>,
        print: Option<String>,
        format: Option<ExportFormat>,
    },
    /// List templates, or generate from a community template
    Templates {
        use_template: Option<String>,
        export: Option<ExportFormat>,
    },
    /// Upload files as a document
    Upload { files: Vec<PathBuf>, meta: UploadMeta },
    /// Copy the link of a document or template
    Share {
        id: String,
        template_title: Option<String>,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Generate { .. } => "generate",
            Command::Export { .. } => "export",
            Command::BatchExport { .. } => "batch-export",
            Command::Math { .. } => "math",
            Command::Documents { .. } => "documents",
            Command::Templates { .. } => "templates",
            Command::Upload { .. } => "upload",
            Command::Share { .. } => "share",
        }
    }
}

/// Batch totals
#[derive(Debug, Default)]
struct BatchStats {
    success: usize,
    failed: usize,
    total: usize,
}

pub struct App {
    config: Config,
    state: AppState,
    flow: QuizFlow,
    clipboard: Arc<MemoryClipboard>,
}

impl App {
    /// App saving downloads into the configured output folder
    pub fn new(config: Config) -> Self {
        let trigger = DownloadTrigger::to_directory(&config.output_folder);
        Self::with_trigger(config, trigger)
    }

    pub fn with_trigger(config: Config, trigger: DownloadTrigger) -> Self {
        let clipboard = Arc::new(MemoryClipboard::new());
        let flow = QuizFlow::new(&config, trigger, clipboard.clone() as Arc<dyn Clipboard>);
        Self {
            config,
            state: AppState::default(),
            flow,
            clipboard,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Last text copied by a share
    pub fn clipboard_contents(&self) -> Option<String> {
        self.clipboard.contents()
    }

    fn default_format(&self) -> ExportFormat {
        self.config.default_format.parse().unwrap_or_else(|e| {
            warn!("⚠️ {}, uso pdf", e);
            ExportFormat::Pdf
        })
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        log_startup(command.name());

        match command {
            Command::Generate {
                params,
                save,
                export,
                template,
                json_out,
            } => self.generate(params, save, export, template, json_out).await,
            Command::Export {
                quiz_file,
                format,
                template,
                include_answers,
            } => self.export_file(&quiz_file, format, template, include_answers).await,
            Command::BatchExport {
                folder,
                format,
                template,
            } => self.batch_export(folder, format, template).await,
            Command::Math { formula, html } => {
                if html {
                    println!("{}", math::render_html(&formula));
                } else {
                    println!("{}", math::to_plain_text(&formula));
                }
                Ok(())
            }
            Command::Documents {
                filters,
                download,
                print,
                format,
            } => self.documents(filters, download, print, format).await,
            Command::Templates {
                use_template,
                export,
            } => self.templates(use_template, export).await,
            Command::Upload { files, meta } => {
                let outcome = report(self.flow.upload(&mut self.state, &files, meta).await)?;
                for name in &outcome.rejected {
                    println!("{}", Notice::error(format!("Formato file non supportato: {}", name)));
                }
                println!("[{}] {}", outcome.document.id, outcome.document.title);
                Ok(())
            }
            Command::Share { id, template_title } => {
                let link = match template_title {
                    Some(title) => report(self.flow.share_template(&mut self.state, &id, &title))?,
                    None => report(self.flow.share_document(&mut self.state, &id))?,
                };
                println!("{}", link);
                Ok(())
            }
        }
    }

    async fn generate(
        &mut self,
        params: GenerateQuizParams,
        save: bool,
        export: Option<ExportFormat>,
        template: Option<ExportTemplate>,
        json_out: Option<PathBuf>,
    ) -> Result<()> {
        let quiz = report(self.flow.generate(&mut self.state, &params).await)?;
        print_quiz(&quiz);

        if let Some(path) = json_out {
            let json = serde_json::to_string_pretty(&quiz)?;
            tokio::fs::write(&path, json).await?;
            info!("💾 Quiz scritto in {}", path.display());
        }

        if let Some(format) = export {
            let template = template.unwrap_or(self.flow.default_template());
            let options = self.flow.options(format);
            report(
                self.flow
                    .export_quiz(&mut self.state, &quiz, template, options)
                    .await,
            )?;
        }

        if save {
            let difficulty = params.difficulty;
            let document = report(self.flow.save_quiz(
                &mut self.state,
                quiz,
                &params.subject,
                difficulty,
            ))?;
            println!("[{}] {}", document.id, document.title);
        }
        Ok(())
    }

    async fn export_file(
        &mut self,
        path: &Path,
        format: Option<ExportFormat>,
        template: Option<ExportTemplate>,
        include_answers: Option<bool>,
    ) -> Result<()> {
        let quiz = load_quiz_file(path).await?;
        let format = format.unwrap_or_else(|| self.default_format());
        let template = template.unwrap_or(self.flow.default_template());
        let mut options = self.flow.options(format);
        if let Some(answers) = include_answers {
            options = options.with_answers(answers);
        }

        let outcome = report(
            self.flow
                .export_quiz(&mut self.state, &quiz, template, options)
                .await,
        )?;
        match outcome.saved_to {
            Some(path) => println!("{}", path.display()),
            None => warn!("⚠️ {} non salvato", outcome.file_name),
        }
        Ok(())
    }

    async fn batch_export(
        &mut self,
        folder: Option<String>,
        format: Option<ExportFormat>,
        template: Option<ExportTemplate>,
    ) -> Result<()> {
        let folder = folder.unwrap_or_else(|| self.config.quiz_folder.clone());
        info!("\n📁 Scansione di {}...", folder);
        let quizzes = load_all_quiz_files(&folder).await?;

        if quizzes.is_empty() {
            warn!("⚠️ Nessun file di verifica trovato, fine");
            return Ok(());
        }

        let format = format.unwrap_or_else(|| self.default_format());
        let template = template.unwrap_or(self.flow.default_template());
        let options: ExportOptions = self.flow.options(format);
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_exports));
        let mut stats = BatchStats {
            total: quizzes.len(),
            ..Default::default()
        };
        info!(
            "✓ {} verifiche, {} export alla volta",
            stats.total, self.config.max_concurrent_exports
        );

        let mut handles = Vec::new();
        for (idx, (path, quiz)) in quizzes.into_iter().enumerate() {
            let permit = semaphore.clone().acquire_owned().await?;
            let pipeline = self.flow.pipeline().clone();
            let school = self.flow.school().clone();
            let title = quiz.title.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                pipeline.export(&quiz, template, &school, options).await
            });
            handles.push((idx + 1, path, title, handle));
        }

        for (index, path, title, handle) in handles {
            match handle.await {
                Ok(Ok(outcome)) if outcome.saved_to.is_some() => {
                    stats.success += 1;
                    self.state.activity.add_activity(
                        ActivityKind::Download,
                        "Documento scaricato",
                        format!("Hai scaricato \"{}\"", title),
                    );
                }
                Ok(Ok(outcome)) => {
                    warn!("[{}] ⚠️ {} non salvato", index, outcome.file_name);
                    stats.failed += 1;
                }
                Ok(Err(e)) => {
                    error!("[{}] ❌ {}: {}", index, path.display(), e);
                    stats.failed += 1;
                }
                Err(e) => {
                    error!("[{}] task interrotto: {}", index, e);
                    stats.failed += 1;
                }
            }
        }

        print_final_stats(stats.success, stats.failed, stats.total, &self.config.output_folder);
        Ok(())
    }

    async fn documents(
        &mut self,
        filters: DocumentFilters,
        download: Option<String>,
        print: Option<String>,
        format: Option<ExportFormat>,
    ) -> Result<()> {
        if let Some(id) = download {
            let format = format.unwrap_or_else(|| self.default_format());
            let outcome = report(
                self.flow
                    .export_document(&mut self.state, &id, format, None)
                    .await,
            )?;
            if let Some(path) = outcome.saved_to {
                println!("{}", path.display());
            }
            return Ok(());
        }

        if let Some(id) = print {
            let print_out = report(self.flow.print_document(&mut self.state, &id))?;
            println!("{}", print_out.text);
            return Ok(());
        }

        self.state.documents.set_filters(filters);
        let documents = self.state.documents.filtered();
        if documents.is_empty() {
            println!("Nessun documento trovato");
            return Ok(());
        }
        for doc in documents {
            println!(
                "[{}] {} | {} | {} | {}{}",
                doc.id,
                truncate_text(&doc.title, 50),
                doc.subject,
                doc.doc_type,
                doc.difficulty,
                if doc.is_public { " | pubblico" } else { "" }
            );
        }
        Ok(())
    }

    async fn templates(
        &mut self,
        use_template: Option<String>,
        export: Option<ExportFormat>,
    ) -> Result<()> {
        let Some(name) = use_template else {
            println!("Template di esportazione:");
            for template in ExportTemplate::ALL {
                println!(
                    "  {:<18} {} ({}) - {}",
                    template.id(),
                    template.name(),
                    template.category().as_str(),
                    template.description()
                );
            }
            println!("Template della community:");
            for template in community_templates() {
                println!(
                    "  [{}] {} - {} ({}) #{}",
                    template.id,
                    template.title,
                    template.subject,
                    template.difficulty.as_str(),
                    template.tags.join(" #")
                );
                if let Some(description) = &template.description {
                    println!("       {}", description);
                }
            }
            return Ok(());
        };

        let quiz = report(self.flow.use_template(&mut self.state, &name).await)?;
        print_quiz(&quiz);
        if let Some(format) = export {
            let template = self.flow.default_template();
            let options = self.flow.options(format);
            report(
                self.flow
                    .export_quiz(&mut self.state, &quiz, template, options)
                    .await,
            )?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("flow", &self.flow)
            .finish_non_exhaustive()
    }
}

/// Print the notice; an error notice ends the command
fn report<T>(result: FlowResult<T>) -> Result<T> {
    match result {
        Ok(done) => {
            println!("{}", done.notice);
            Ok(done.value)
        }
        Err(notice) => {
            println!("{}", notice);
            Err(anyhow!(notice.message))
        }
    }
}

fn print_quiz(quiz: &QuizContent) {
    println!("{}", quiz.title);
    if let Some(instructions) = &quiz.instructions {
        println!("{}", instructions);
    }
    for (i, question) in quiz.questions.iter().enumerate() {
        println!(
            "{:>2}. {} ({} punti)",
            i + 1,
            truncate_text(&question.text, 80),
            question.points
        );
    }
    match quiz.time_limit {
        Some(minutes) => println!("Totale: {} punti, {} min", quiz.total_points, minutes),
        None => println!("Totale: {} punti", quiz.total_points),
    }
}

/// Parse a difficulty flag, defaulting to medium
pub fn parse_difficulty(value: Option<&str>) -> Result<Difficulty> {
    match value {
        Some(v) => Ok(v.parse()?),
        None => Ok(Difficulty::Medium),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use crate::services::QuizKind;

    fn app() -> (App, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let app = App::with_trigger(
            Config::default().without_delays(),
            DownloadTrigger::new(sink.clone()),
        );
        (app, sink)
    }

    #[tokio::test]
    async fn test_generate_save_and_export() {
        let (mut app, sink) = app();
        let params = GenerateQuizParams::new("Storia", "Rivoluzione", QuizKind::Quick);
        app.run(Command::Generate {
            params,
            save: true,
            export: Some(ExportFormat::Txt),
            template: Some(ExportTemplate::Minimalist),
            json_out: None,
        })
        .await
        .unwrap();

        assert_eq!(sink.files().len(), 1);
        assert_eq!(sink.files()[0].file_name, "Quiz_di_Storia_-_Rivoluzione.txt");
        assert_eq!(app.state().documents.len(), 7);
        assert_eq!(app.state().activity.stats().quizzes_generated, 9);
    }

    #[tokio::test]
    async fn test_use_template_by_id() {
        let (mut app, sink) = app();
        app.run(Command::Templates {
            use_template: Some("t2".into()),
            export: Some(ExportFormat::Txt),
        })
        .await
        .unwrap();

        assert_eq!(
            sink.files()[0].file_name,
            "Quiz_Storia_-_Rivoluzione_Francese_Template.txt"
        );
        assert_eq!(app.state().activity.stats().templates_used, 6);
    }

    #[tokio::test]
    async fn test_failed_command_is_an_error() {
        let (mut app, _) = app();
        let result = app
            .run(Command::Share {
                id: "404".into(),
                template_title: None,
            })
            .await;
        assert!(result.is_err());
        assert!(app.clipboard_contents().is_none());
    }

    #[tokio::test]
    async fn test_batch_export_counts_files() {
        let dir = std::env::temp_dir().join(format!("th-batch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for (name, title) in [("a.json", "Quiz A"), ("b.json", "Quiz B")] {
            let quiz = crate::export::placeholder_quiz(title, ExportFormat::Pdf);
            std::fs::write(dir.join(name), serde_json::to_string(&quiz).unwrap()).unwrap();
        }

        let (mut app, sink) = app();
        app.run(Command::BatchExport {
            folder: Some(dir.display().to_string()),
            format: Some(ExportFormat::Pdf),
            template: None,
        })
        .await
        .unwrap();

        let mut names: Vec<String> = sink.files().into_iter().map(|f| f.file_name).collect();
        names.sort();
        assert_eq!(names, vec!["Quiz_A.pdf", "Quiz_B.pdf"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_batch_export_keeps_files_with_same_title() {
        let dir = std::env::temp_dir().join(format!("th-batch-same-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        let quizzes = dir.join("quiz");
        let out = dir.join("out");
        std::fs::create_dir_all(&quizzes).unwrap();
        for name in ["prima.json", "seconda.json"] {
            let quiz = crate::export::placeholder_quiz("Verifica: Storia", ExportFormat::Txt);
            std::fs::write(quizzes.join(name), serde_json::to_string(&quiz).unwrap()).unwrap();
        }

        let mut app = App::with_trigger(
            Config::default().without_delays(),
            DownloadTrigger::to_directory(&out),
        );
        let downloads_before = count_downloads(&app);
        app.run(Command::BatchExport {
            folder: Some(quizzes.display().to_string()),
            format: Some(ExportFormat::Txt),
            template: None,
        })
        .await
        .unwrap();

        let mut names: Vec<String> = std::fs::read_dir(&out)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Verifica_Storia (1).txt", "Verifica_Storia.txt"]);
        assert_eq!(count_downloads(&app), downloads_before + 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    fn count_downloads(app: &App) -> usize {
        app.state()
            .activity
            .activities()
            .iter()
            .filter(|a| a.kind == ActivityKind::Download)
            .count()
    }

    #[test]
    fn test_parse_difficulty_default() {
        assert_eq!(parse_difficulty(None).unwrap(), Difficulty::Medium);
        assert!(parse_difficulty(Some("impossibile")).is_err());
    }
}
