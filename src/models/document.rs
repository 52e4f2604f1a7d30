use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quiz::QuizContent;
use super::school::SchoolInfo;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Quiz,
    Test,
    Homework,
    LessonPlan,
    Material,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Quiz => "QUIZ",
            DocumentType::Test => "TEST",
            DocumentType::Homework => "HOMEWORK",
            DocumentType::LessonPlan => "LESSON_PLAN",
            DocumentType::Material => "MATERIAL",
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "QUIZ" => Ok(DocumentType::Quiz),
            "TEST" => Ok(DocumentType::Test),
            "HOMEWORK" => Ok(DocumentType::Homework),
            "LESSON_PLAN" => Ok(DocumentType::LessonPlan),
            "MATERIAL" => Ok(DocumentType::Material),
            _ => Err(ValidationError::InvalidValue {
                field: "tipo",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EASY" | "FACILE" => Ok(Difficulty::Easy),
            "MEDIUM" | "MEDIA" | "MEDIO" => Ok(Difficulty::Medium),
            "HARD" | "DIFFICILE" => Ok(Difficulty::Hard),
            _ => Err(ValidationError::InvalidValue {
                field: "difficoltà",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a stored document holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentContent {
    /// A full generated test
    Quiz(QuizContent),
    /// Question prompts only, no answers or scoring
    Outline { questions: Vec<String> },
    /// Teaching material (uploads, notes)
    Material {
        description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preview: Option<String>,
    },
}

impl DocumentContent {
    pub fn as_quiz(&self) -> Option<&QuizContent> {
        match self {
            DocumentContent::Quiz(quiz) => Some(quiz),
            _ => None,
        }
    }
}

/// A document kept in the in-memory store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: DocumentContent,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_info: Option<SchoolInfo>,
}

impl Document {
    /// Case-insensitive match on title, subject or any tag
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.subject.to_lowercase().contains(&term)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
    }
}

/// Reusable quiz skeleton shared with the community
///
/// Not to be confused with `export::ExportTemplate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub content: DocumentContent,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub subject: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
}

impl Template {
    /// The quiz carried by the template, if any
    pub fn quiz(&self) -> Option<&QuizContent> {
        self.content.as_quiz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_closed_sets() {
        assert_eq!("lesson-plan".parse::<DocumentType>().unwrap(), DocumentType::LessonPlan);
        assert_eq!("difficile".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("poster".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_content_serializes_with_kind_tag() {
        let content = DocumentContent::Outline {
            questions: vec!["Chi è Virgilio?".into()],
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["kind"], "outline");
        assert!(content.as_quiz().is_none());
    }
}
