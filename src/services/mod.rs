pub mod ai_service;
pub mod mock_responses;
pub mod share_service;
pub mod upload_service;

pub use ai_service::{AiService, GenerateQuizParams, QuizKind};
pub use share_service::{Clipboard, MemoryClipboard, ShareKind, ShareService};
pub use upload_service::{UploadMeta, UploadOutcome, UploadService, UploadedFile};
