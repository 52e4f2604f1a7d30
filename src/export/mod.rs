//! Quiz export
//!
//! Pick an [`ExportTemplate`] and [`ExportOptions`], then run the
//! [`ExportPipeline`]: the formatter lays the quiz out as lines, the emitter
//! wraps them for `pdf`, and the download trigger saves the result.

pub mod download;
pub mod format;
pub mod formatter;
pub mod pdf;
pub mod pipeline;
pub mod template;

pub use download::{sanitize_filename, DirectorySink, DownloadSink, DownloadTrigger, MemorySink};
pub use format::{ExportFormat, ExportOptions};
pub use formatter::{format_quiz, FormattedDocument};
pub use pdf::PseudoPdfEmitter;
pub use pipeline::{placeholder_quiz, ExportOutcome, ExportPipeline};
pub use template::{ExportTemplate, TemplateCategory};
