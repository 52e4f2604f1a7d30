//! # Teaching Hub
//!
//! Quiz generation, preview and export for teachers: a mock AI produces
//! quizzes, an in-memory library stores them, and the export pipeline lays
//! them out and saves them as pdf / docx / txt files.
//!
//! ## Layers
//!
//! ### ① Model
//! - `models/` - quizzes, documents, activities, subjects and the quiz file loaders
//!
//! ### ② Capabilities
//! - `math/` - LaTeX-subset parser with HTML and plain-text renderers
//! - `export/` - export templates, formatter, pseudo-PDF emitter, download trigger, pipeline
//! - `services/` - mock AI generation, upload intake, share links
//!
//! ### ③ State
//! - `store/` - `AppState`: document library and activity feed, owned by the caller
//!
//! ### ④ Workflow
//! - `workflow/` - `QuizFlow`: one user action end to end, reported as a `Notice`
//!
//! ### ⑤ Orchestration
//! - `app` - `App::run(Command)`, including the concurrent batch export

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod math;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

pub use app::{App, Command};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use export::{ExportFormat, ExportOptions, ExportPipeline, ExportTemplate};
pub use models::{Document, Question, QuizContent, SchoolInfo};
pub use store::AppState;
pub use workflow::{Notice, QuizFlow};
