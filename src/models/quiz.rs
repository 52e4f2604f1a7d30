use serde::{Deserialize, Serialize};

/// Answer shape of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    OpenEnded,
    TrueFalse,
}

/// Either an index into `options` or a free-text answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Index(usize),
    Text(String),
}

/// One typed fragment of a question body
///
/// Purely presentational: contents are never validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RichContent {
    Text { id: String, content: String },
    Latex { id: String, content: String },
    /// `content` is a data URI
    Image { id: String, content: String },
    Table { id: String, content: String },
}

impl RichContent {
    pub fn id(&self) -> &str {
        match self {
            RichContent::Text { id, .. }
            | RichContent::Latex { id, .. }
            | RichContent::Image { id, .. }
            | RichContent::Table { id, .. } => id,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            RichContent::Text { content, .. }
            | RichContent::Latex { content, .. }
            | RichContent::Image { content, .. }
            | RichContent::Table { content, .. } => content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<CorrectAnswer>,
    #[serde(default)]
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_content: Option<Vec<RichContent>>,
}

impl Question {
    /// Open question with no options
    pub fn open(id: impl Into<String>, text: impl Into<String>, points: u32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            question_type: QuestionType::OpenEnded,
            options: None,
            correct_answer: None,
            points,
            rich_content: None,
        }
    }

    /// Multiple-choice question; `correct` indexes into `options`
    pub fn multiple_choice<S: Into<String>>(
        id: impl Into<String>,
        text: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        correct: usize,
        points: u32,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            question_type: QuestionType::MultipleChoice,
            options: Some(options.into_iter().map(Into::into).collect()),
            correct_answer: Some(CorrectAnswer::Index(correct)),
            points,
            rich_content: None,
        }
    }

    /// Whether option `idx` is the marked correct one
    ///
    /// A text answer matches an option with the same text; out-of-range indices match nothing.
    pub fn is_correct_option(&self, idx: usize) -> bool {
        match &self.correct_answer {
            Some(CorrectAnswer::Index(i)) => *i == idx,
            Some(CorrectAnswer::Text(text)) => self
                .options
                .as_ref()
                .and_then(|opts| opts.get(idx))
                .is_some_and(|opt| opt == text),
            None => false,
        }
    }

    /// Options slice, empty when none are set
    pub fn option_list(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }
}

/// A generated test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizContent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Order defines on-page numbering
    pub questions: Vec<Question>,
    /// Expected to equal the sum of question points; not enforced
    pub total_points: u32,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
}

impl QuizContent {
    pub fn points_sum(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }

    /// Reconcile `total_points` with the questions
    ///
    /// Only this path keeps the two in sync; manual edits elsewhere may leave them apart.
    pub fn recompute_total_points(&mut self) {
        self.total_points = self.points_sum();
    }

    /// Title up to the first `" - "`, upper-cased
    pub fn subject_heading(&self) -> String {
        let head = self.title.split(" - ").next().unwrap_or_default();
        if head.is_empty() {
            "MATERIA".to_string()
        } else {
            head.to_uppercase()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_json() {
        let json = r#"{
            "title": "Verifica Dante - Inferno",
            "instructions": "Leggi con attenzione",
            "totalPoints": 20,
            "timeLimit": 60,
            "questions": [
                {"id": "1", "text": "Chi è Virgilio?", "type": "multiple_choice",
                 "options": ["Un poeta", "Un re"], "correctAnswer": 0, "points": 5},
                {"id": "2", "text": "Commenta", "type": "open_ended", "points": 15,
                 "richContent": [{"type": "latex", "id": "r1", "content": "\\frac{1}{2}"}]}
            ]
        }"#;

        let quiz: QuizContent = serde_json::from_str(json).unwrap();
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.time_limit, Some(60));
        assert_eq!(
            quiz.questions[0].correct_answer,
            Some(CorrectAnswer::Index(0))
        );
        assert_eq!(quiz.questions[1].question_type, QuestionType::OpenEnded);
        let rich = quiz.questions[1].rich_content.as_ref().unwrap();
        assert_eq!(rich[0].id(), "r1");
        assert!(matches!(rich[0], RichContent::Latex { .. }));
    }

    #[test]
    fn test_text_correct_answer_matches_option() {
        let mut q = Question::multiple_choice("1", "?", ["1788", "1789"], 0, 3);
        q.correct_answer = Some(CorrectAnswer::Text("1789".into()));
        assert!(!q.is_correct_option(0));
        assert!(q.is_correct_option(1));
        assert!(!q.is_correct_option(7));
    }

    #[test]
    fn test_total_points_not_reconciled_until_asked() {
        let mut quiz = QuizContent {
            title: "Test".into(),
            instructions: None,
            questions: vec![Question::open("1", "a", 4), Question::open("2", "b", 6)],
            total_points: 99,
            time_limit: None,
        };
        assert_eq!(quiz.total_points, 99);
        quiz.recompute_total_points();
        assert_eq!(quiz.total_points, 10);
    }

    #[test]
    fn test_subject_heading() {
        let mut quiz = QuizContent {
            title: "Verifica Dante - Inferno".into(),
            instructions: None,
            questions: vec![],
            total_points: 0,
            time_limit: None,
        };
        assert_eq!(quiz.subject_heading(), "VERIFICA DANTE");
        quiz.title = "  ".into();
        assert_eq!(quiz.subject_heading(), "  ");
        quiz.title = " - Inferno".into();
        assert_eq!(quiz.subject_heading(), "MATERIA");
        quiz.title = String::new();
        assert_eq!(quiz.subject_heading(), "MATERIA");
    }
}
