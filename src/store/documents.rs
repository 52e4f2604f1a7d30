//! Document library with search and filters
//!
//! Every filter setter re-runs the filters, so `filtered()` is always current.

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{Difficulty, Document, DocumentContent, DocumentType};

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    title: &str,
    content: DocumentContent,
    doc_type: DocumentType,
    subject: &str,
    grade: &str,
    difficulty: Difficulty,
    tags: &[&str],
    is_public: bool,
    created: DateTime<Utc>,
) -> Document {
    Document {
        id: id.to_string(),
        title: title.to_string(),
        content,
        doc_type,
        subject: subject.to_string(),
        grade: Some(grade.to_string()),
        difficulty,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        is_public,
        created_at: created,
        updated_at: created,
        user_id: "user1".to_string(),
        school_info: None,
    }
}

fn outline(questions: &[&str]) -> DocumentContent {
    DocumentContent::Outline {
        questions: questions.iter().map(|q| q.to_string()).collect(),
    }
}

/// The six sample documents
pub fn sample_documents() -> Vec<Document> {
    vec![
        seed(
            "1",
            "Verifica Dante - Inferno Canti I-III",
            outline(&["Chi è Virgilio?", "Descrivi il primo cerchio"]),
            DocumentType::Quiz,
            "Letteratura Italiana",
            "3° Superiore",
            Difficulty::Medium,
            &["dante", "inferno", "letteratura"],
            false,
            seed_date(2024, 1, 15),
        ),
        seed(
            "2",
            "Test Equazioni di Secondo Grado",
            outline(&["Risolvi x² - 5x + 6 = 0", "Delta e soluzioni"]),
            DocumentType::Test,
            "Matematica",
            "2° Superiore",
            Difficulty::Hard,
            &["equazioni", "algebra"],
            false,
            seed_date(2024, 1, 10),
        ),
        seed(
            "3",
            "Quiz Rivoluzione Francese",
            outline(&["Quando iniziò?", "Cause principali", "Personaggi chiave"]),
            DocumentType::Quiz,
            "Storia",
            "4° Superiore",
            Difficulty::Easy,
            &["rivoluzione", "francia", "storia moderna"],
            true,
            seed_date(2024, 1, 8),
        ),
        seed(
            "4",
            "Materiale Didattico - Fotosintesi",
            DocumentContent::Material {
                description: "Processo di fotosintesi clorofilliana".to_string(),
                file_name: None,
                preview: None,
            },
            DocumentType::Material,
            "Scienze",
            "1° Superiore",
            Difficulty::Easy,
            &["fotosintesi", "biologia", "piante"],
            false,
            seed_date(2024, 1, 5),
        ),
        seed(
            "5",
            "Verifica Manzoni - I Promessi Sposi",
            outline(&["Analizza Renzo", "Il tema della Provvidenza"]),
            DocumentType::Quiz,
            "Letteratura Italiana",
            "3° Superiore",
            Difficulty::Medium,
            &["manzoni", "promessi-sposi", "romanzo"],
            false,
            seed_date(2024, 1, 12),
        ),
        seed(
            "6",
            "Test Fisica - Meccanica",
            outline(&["Leggi di Newton", "Moto rettilineo uniforme"]),
            DocumentType::Test,
            "Fisica",
            "4° Superiore",
            Difficulty::Hard,
            &["fisica", "meccanica", "newton"],
            true,
            seed_date(2024, 1, 14),
        ),
    ]
}

/// Active filters; `None` and empty strings mean "all"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilters {
    pub search_term: String,
    pub doc_type: Option<DocumentType>,
    pub difficulty: Option<Difficulty>,
    pub subject: String,
}

impl DocumentFilters {
    pub fn matches(&self, doc: &Document) -> bool {
        let term = self.search_term.trim();
        if !term.is_empty() && !doc.matches_term(term) {
            return false;
        }
        if self.doc_type.is_some_and(|t| t != doc.doc_type) {
            return false;
        }
        if self.difficulty.is_some_and(|d| d != doc.difficulty) {
            return false;
        }
        let subject = self.subject.trim().to_lowercase();
        subject.is_empty() || doc.subject.to_lowercase().contains(&subject)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    documents: Vec<Document>,
    filtered: Vec<usize>,
    filters: DocumentFilters,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::with_documents(sample_documents())
    }
}

impl DocumentStore {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        let mut store = Self {
            documents,
            filtered: Vec::new(),
            filters: DocumentFilters::default(),
        };
        store.apply_filters();
        store
    }

    pub fn all(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn filters(&self) -> &DocumentFilters {
        &self.filters
    }

    /// Documents passing the current filters, in store order
    pub fn filtered(&self) -> Vec<&Document> {
        self.filtered.iter().filter_map(|&i| self.documents.get(i)).collect()
    }

    pub fn get(&self, id: &str) -> AppResult<&Document> {
        self.documents
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::document_not_found(id))
    }

    /// Replace everything; filters are reset
    pub fn set_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        self.filters = DocumentFilters::default();
        self.apply_filters();
    }

    pub fn add(&mut self, document: Document) {
        debug!("📄 aggiunto documento {} ({})", document.id, document.title);
        self.documents.insert(0, document);
        self.apply_filters();
    }

    /// Apply `change` to a stored document and bump `updated_at`
    pub fn update<F>(&mut self, id: &str, change: F) -> AppResult<&Document>
    where
        F: FnOnce(&mut Document),
    {
        let idx = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| AppError::document_not_found(id))?;
        change(&mut self.documents[idx]);
        self.documents[idx].updated_at = Utc::now();
        self.apply_filters();
        Ok(&self.documents[idx])
    }

    pub fn remove(&mut self, id: &str) -> AppResult<Document> {
        let idx = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| AppError::document_not_found(id))?;
        let removed = self.documents.remove(idx);
        self.apply_filters();
        Ok(removed)
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filters.search_term = term.into();
        self.apply_filters();
    }

    pub fn set_filter_type(&mut self, doc_type: Option<DocumentType>) {
        self.filters.doc_type = doc_type;
        self.apply_filters();
    }

    pub fn set_filter_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.filters.difficulty = difficulty;
        self.apply_filters();
    }

    pub fn set_filter_subject(&mut self, subject: impl Into<String>) {
        self.filters.subject = subject.into();
        self.apply_filters();
    }

    /// Set all filters at once
    pub fn set_filters(&mut self, filters: DocumentFilters) {
        self.filters = filters;
        self.apply_filters();
    }

    pub fn apply_filters(&mut self) {
        let filters = &self.filters;
        self.filtered = self
            .documents
            .iter()
            .enumerate()
            .filter(|(_, doc)| filters.matches(doc))
            .map(|(i, _)| i)
            .collect();
    }

    pub fn clear_filters(&mut self) {
        self.filters = DocumentFilters::default();
        self.apply_filters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(store: &DocumentStore) -> Vec<&str> {
        store.filtered().into_iter().map(|d| d.title.as_str()).collect()
    }

    #[test]
    fn test_seeded_with_six_documents() {
        let store = DocumentStore::default();
        assert_eq!(store.len(), 6);
        assert_eq!(store.filtered().len(), 6);
        let doc = store.get("4").unwrap();
        assert_eq!(doc.doc_type, DocumentType::Material);
        assert_eq!(doc.created_at, seed_date(2024, 1, 5));
        assert!(store.get("99").is_err());
    }

    #[test]
    fn test_search_term_matches_title_subject_and_tags() {
        let mut store = DocumentStore::default();
        store.set_search_term("NEWTON");
        assert_eq!(titles(&store), vec!["Test Fisica - Meccanica"]);

        store.set_search_term("letteratura");
        assert_eq!(store.filtered().len(), 2);
    }

    #[test]
    fn test_filters_combine_and_clear() {
        let mut store = DocumentStore::default();
        store.set_filter_type(Some(DocumentType::Quiz));
        assert_eq!(store.filtered().len(), 3);

        store.set_filter_difficulty(Some(Difficulty::Medium));
        store.set_filter_subject("italiana");
        assert_eq!(
            titles(&store),
            vec!["Verifica Dante - Inferno Canti I-III", "Verifica Manzoni - I Promessi Sposi"]
        );

        store.clear_filters();
        assert!(store.filters().is_empty());
        assert_eq!(store.filtered().len(), 6);
    }

    #[test]
    fn test_add_update_remove_keep_filters_current() {
        let mut store = DocumentStore::default();
        store.set_filter_subject("storia");

        let mut doc = sample_documents().remove(2);
        doc.id = "nuovo".into();
        doc.title = "Quiz Risorgimento".into();
        store.add(doc);
        assert_eq!(titles(&store), vec!["Quiz Risorgimento", "Quiz Rivoluzione Francese"]);

        let before = store.get("nuovo").unwrap().updated_at;
        let updated = store
            .update("nuovo", |d| d.subject = "Educazione Civica".into())
            .unwrap();
        assert!(updated.updated_at >= before);
        assert_eq!(store.filtered().len(), 1);

        store.remove("3").unwrap();
        assert!(store.filtered().is_empty());
        assert!(store.remove("3").is_err());
    }

    #[test]
    fn test_set_documents_resets_filters() {
        let mut store = DocumentStore::default();
        store.set_search_term("dante");
        store.set_documents(sample_documents().into_iter().take(2).collect());
        assert_eq!(store.filtered().len(), 2);
        assert!(store.filters().is_empty());
    }
}
