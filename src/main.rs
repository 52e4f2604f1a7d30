use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use teaching_hub::app::{parse_difficulty, App, Command};
use teaching_hub::export::{ExportFormat, ExportTemplate};
use teaching_hub::services::{GenerateQuizParams, QuizKind, UploadMeta};
use teaching_hub::store::DocumentFilters;
use teaching_hub::utils::logging;
use teaching_hub::Config;

#[derive(Parser, Debug)]
#[command(name = "teaching-hub")]
#[command(version, about = "Genera, esporta e gestisci verifiche", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file, overridden by TEACHING_HUB_* variables
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Skip the simulated waits
    #[arg(long, global = true)]
    no_delay: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a quiz with the mock AI
    Generate {
        #[arg(short, long)]
        subject: String,
        #[arg(short, long)]
        topic: String,
        /// literature, stem or quick; guessed from the subject when missing
        #[arg(short, long)]
        kind: Option<QuizKind>,
        #[arg(short, long)]
        difficulty: Option<String>,
        #[arg(short = 'n', long, default_value = "10")]
        questions: usize,
        #[arg(long)]
        instructions: Option<String>,
        /// Minutes
        #[arg(long)]
        time_limit: Option<u32>,
        /// Store the quiz as a document
        #[arg(long)]
        save: bool,
        /// Export right away in this format
        #[arg(short, long)]
        export: Option<ExportFormat>,
        #[arg(long)]
        template: Option<String>,
        /// Write the quiz as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Export a quiz file (.toml or .json)
    Export {
        file: PathBuf,
        #[arg(short, long)]
        format: Option<ExportFormat>,
        #[arg(short, long)]
        template: Option<String>,
        /// Mark the correct answers
        #[arg(long)]
        answers: Option<bool>,
    },
    /// Export every quiz file in a folder
    BatchExport {
        folder: Option<String>,
        #[arg(short, long)]
        format: Option<ExportFormat>,
        #[arg(short, long)]
        template: Option<String>,
    },
    /// Render a LaTeX formula
    Math {
        formula: String,
        /// HTML preview instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// List, download or print stored documents
    Documents {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long = "type")]
        doc_type: Option<String>,
        #[arg(short, long)]
        difficulty: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        /// Download the document with this id
        #[arg(long, value_name = "ID")]
        download: Option<String>,
        /// Print the document with this id
        #[arg(long, value_name = "ID")]
        print: Option<String>,
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },
    /// List templates or generate from a community template
    Templates {
        #[arg(long = "use", value_name = "NAME")]
        use_template: Option<String>,
        #[arg(short, long)]
        export: Option<ExportFormat>,
    },
    /// Upload files as a new document
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "")]
        subject: String,
        #[arg(long = "type")]
        doc_type: Option<String>,
        #[arg(short, long)]
        difficulty: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Copy the share link of a document or template
    Share {
        id: String,
        /// Share a template with this title instead of a document
        #[arg(long, value_name = "TITLE")]
        template: Option<String>,
    },
}

fn template_arg(value: Option<String>) -> Option<ExportTemplate> {
    value.map(|id| ExportTemplate::from_id(&id))
}

fn into_command(command: Commands) -> Result<Command> {
    let command = match command {
        Commands::Generate {
            subject,
            topic,
            kind,
            difficulty,
            questions,
            instructions,
            time_limit,
            save,
            export,
            template,
            json,
        } => {
            let kind = kind.unwrap_or_else(|| QuizKind::suggested_for(&subject));
            let params = GenerateQuizParams {
                difficulty: parse_difficulty(difficulty.as_deref())?,
                question_count: questions,
                instructions,
                time_limit,
                ..GenerateQuizParams::new(subject, topic, kind)
            };
            Command::Generate {
                params,
                save,
                export,
                template: template_arg(template),
                json_out: json,
            }
        }
        Commands::Export {
            file,
            format,
            template,
            answers,
        } => Command::Export {
            quiz_file: file,
            format,
            template: template_arg(template),
            include_answers: answers,
        },
        Commands::BatchExport {
            folder,
            format,
            template,
        } => Command::BatchExport {
            folder,
            format,
            template: template_arg(template),
        },
        Commands::Math { formula, html } => Command::Math { formula, html },
        Commands::Documents {
            search,
            doc_type,
            difficulty,
            subject,
            download,
            print,
            format,
        } => Command::Documents {
            filters: DocumentFilters {
                search_term: search.unwrap_or_default(),
                doc_type: doc_type.map(|t| t.parse()).transpose()?,
                difficulty: difficulty.map(|d| d.parse()).transpose()?,
                subject: subject.unwrap_or_default(),
            },
            download,
            print,
            format,
        },
        Commands::Templates {
            use_template,
            export,
        } => Command::Templates {
            use_template,
            export,
        },
        Commands::Upload {
            files,
            title,
            description,
            subject,
            doc_type,
            difficulty,
            tags,
        } => {
            let mut meta = UploadMeta::new(title);
            meta.description = description;
            meta.subject = subject;
            if let Some(t) = doc_type {
                meta.doc_type = t.parse()?;
            }
            meta.difficulty = parse_difficulty(difficulty.as_deref())?;
            for tag in &tags {
                meta.add_tag(tag);
            }
            Command::Upload { files, meta }
        }
        Commands::Share { id, template } => Command::Share {
            id,
            template_title: template,
        },
    };
    Ok(command)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env(),
    };
    if cli.verbose {
        config.verbose_logging = true;
    }
    if cli.no_delay {
        config = config.without_delays();
    }
    config.validate()?;

    logging::init(config.verbose_logging);

    let command = into_command(cli.command)?;
    App::new(config).run(command).await
}
