//! Mock quiz generation
//!
//! Stands in for the AI backend: waits a random time, optionally fails, and
//! answers with a canned quiz picked from the subject and topic.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppResult, GenerationError, ValidationError};
use crate::models::{Difficulty, Question, QuizContent, Subject};
use crate::utils::delay::simulate_latency;

use super::mock_responses;

pub const DEFAULT_QUESTION_COUNT: usize = 10;
pub const MAX_QUESTION_COUNT: usize = 50;
const EXTRA_QUESTION_POINTS: u32 = 5;

/// Which generator form the request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizKind {
    Literature,
    Stem,
    #[default]
    Quick,
}

impl QuizKind {
    /// Best form for a subject name: literature, STEM, or quick quiz
    pub fn suggested_for(subject: &str) -> Self {
        match Subject::find(subject) {
            Some(s) if s.is_literature() => QuizKind::Literature,
            Some(s) if s.is_stem() => QuizKind::Stem,
            _ => QuizKind::Quick,
        }
    }

    /// Title of the generator dialog
    pub fn title(self) -> &'static str {
        match self {
            QuizKind::Literature => "Genera Verifica Letteraria",
            QuizKind::Stem => "Genera Esercizi STEM",
            QuizKind::Quick => "Genera Quiz Veloce",
        }
    }
}

impl std::str::FromStr for QuizKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "literature" | "letteratura" => Ok(QuizKind::Literature),
            "stem" => Ok(QuizKind::Stem),
            "quick" | "veloce" => Ok(QuizKind::Quick),
            _ => Err(ValidationError::InvalidValue {
                field: "tipo di verifica",
                value: s.to_string(),
            }),
        }
    }
}

/// Generator form contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizParams {
    pub subject: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub question_count: usize,
    #[serde(rename = "type")]
    pub kind: QuizKind,
    /// Replaces the canned instructions when not blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
}

impl GenerateQuizParams {
    pub fn new(subject: impl Into<String>, topic: impl Into<String>, kind: QuizKind) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
            difficulty: Difficulty::Medium,
            question_count: DEFAULT_QUESTION_COUNT,
            kind,
            instructions: None,
            time_limit: None,
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.subject.trim().is_empty() || self.topic.trim().is_empty() {
            return Err(ValidationError::SubjectAndTopicRequired.into());
        }
        if self.question_count == 0 || self.question_count > MAX_QUESTION_COUNT {
            return Err(GenerationError::InvalidQuestionCount {
                count: self.question_count,
            }
            .into());
        }
        Ok(())
    }
}

/// Canned response for the request, before count adjustment
fn pick_response(params: &GenerateQuizParams) -> QuizContent {
    let subject = params.subject.to_lowercase();
    let topic = params.topic.to_lowercase();

    if params.kind == QuizKind::Literature || subject.contains("letteratura") {
        if topic.contains("dante") || topic.contains("inferno") {
            mock_responses::dante()
        } else if topic.contains("manzoni") || topic.contains("promessi") {
            mock_responses::manzoni()
        } else {
            mock_responses::literature_generic(&params.subject, &params.topic)
        }
    } else if params.kind == QuizKind::Stem
        || subject.contains("matematica")
        || subject.contains("fisica")
    {
        if subject.contains("matematica") {
            mock_responses::mathematics()
        } else if subject.contains("fisica") {
            mock_responses::physics()
        } else {
            mock_responses::stem_generic(&params.subject, &params.topic)
        }
    } else {
        QuizContent {
            title: format!("Quiz di {} - {}", params.subject, params.topic),
            ..mock_responses::history()
        }
    }
}

/// Pad with open questions or cut to `count`, then reconcile the total
fn adjust_question_count(quiz: &mut QuizContent, count: usize, topic: &str) {
    if count == quiz.questions.len() {
        return;
    }
    if count < quiz.questions.len() {
        quiz.questions.truncate(count);
    } else {
        for i in quiz.questions.len()..count {
            quiz.questions.push(Question::open(
                (i + 1).to_string(),
                format!("Domanda aggiuntiva {} su \"{}\"", i + 1, topic),
                EXTRA_QUESTION_POINTS,
            ));
        }
    }
    quiz.recompute_total_points();
}

/// Mock AI generator
///
/// Responsibilities:
/// - validate the generator form
/// - simulate backend latency and failures
/// - return a fresh canned quiz per request
#[derive(Debug, Clone)]
pub struct AiService {
    delay_min_ms: u64,
    delay_max_ms: u64,
    failure_rate: f64,
}

impl AiService {
    pub fn new(config: &Config) -> Self {
        Self {
            delay_min_ms: config.generation_delay_min_ms,
            delay_max_ms: config.generation_delay_max_ms,
            failure_rate: config.generation_failure_rate.clamp(0.0, 1.0),
        }
    }

    fn should_fail(&self) -> bool {
        self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate)
    }

    /// Generate a quiz for the form
    pub async fn generate_quiz(&self, params: &GenerateQuizParams) -> AppResult<QuizContent> {
        params.validate()?;

        info!(
            "🪄 Generazione: {} - {} ({:?}, {} domande)",
            params.subject, params.topic, params.kind, params.question_count
        );
        simulate_latency(self.delay_min_ms, self.delay_max_ms).await;

        if self.should_fail() {
            warn!("⚠️ Generazione fallita (simulata)");
            return Err(GenerationError::Simulated.into());
        }

        let mut quiz = pick_response(params);
        adjust_question_count(&mut quiz, params.question_count, &params.topic);

        if let Some(instructions) = params.instructions.as_deref() {
            if !instructions.trim().is_empty() {
                quiz.instructions = Some(instructions.trim().to_string());
            }
        }
        if let Some(minutes) = params.time_limit {
            quiz.time_limit = Some(minutes);
        }

        debug!(
            "generata \"{}\": {} domande, {} punti",
            quiz.title,
            quiz.questions.len(),
            quiz.total_points
        );
        Ok(quiz)
    }

    /// Quiz behind a community template (id or title); unknown keys get "Quiz Storia"
    pub async fn generate_from_template(&self, key: &str) -> QuizContent {
        info!("🧩 Template: {}", key);
        simulate_latency(self.delay_min_ms, self.delay_max_ms).await;

        let fallback = mock_responses::DEFAULT_COMMUNITY_TEMPLATE;
        mock_responses::find_community_template(key)
            .or_else(|| {
                debug!("template \"{}\" sconosciuto, uso {}", key, fallback);
                mock_responses::find_community_template(fallback)
            })
            .and_then(|template| template.quiz().cloned())
            .unwrap_or_else(mock_responses::history)
    }

    /// Printable quiz for a stored document without quiz content
    pub fn preview_quiz_for(&self, subject: &str, title: &str) -> QuizContent {
        mock_responses::print_preview(subject, title)
    }
}
