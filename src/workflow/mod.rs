pub mod notice;
pub mod quiz_flow;

pub use notice::{Completed, FlowResult, Notice, NoticeLevel};
pub use quiz_flow::{PrintOut, QuizFlow};
