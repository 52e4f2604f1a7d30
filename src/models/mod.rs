pub mod activity;
pub mod document;
pub mod loaders;
pub mod quiz;
pub mod school;
pub mod subject;

pub use activity::{Activity, ActivityKind, RecentDocument};
pub use document::{Difficulty, Document, DocumentContent, DocumentType, Template};
pub use loaders::{load_all_quiz_files, load_quiz_file};
pub use quiz::{CorrectAnswer, Question, QuestionType, QuizContent, RichContent};
pub use school::SchoolInfo;
pub use subject::Subject;
