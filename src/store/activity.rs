//! Activity feed, recent documents and dashboard counters

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Activity, ActivityKind, RecentDocument};
use crate::utils::generate_id;

pub const MAX_ACTIVITIES: usize = 10;
pub const MAX_RECENT_DOCUMENTS: usize = 3;

/// Dashboard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_documents: u32,
    pub documents_created_this_month: u32,
    pub quizzes_generated: u32,
    pub templates_used: u32,
    /// Hours
    pub times_saved: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            total_documents: 12,
            documents_created_this_month: 4,
            quizzes_generated: 8,
            templates_used: 5,
            times_saved: 24,
        }
    }
}

/// Partial counter update; `None` fields are left alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsUpdate {
    pub total_documents: Option<u32>,
    pub documents_created_this_month: Option<u32>,
    pub quizzes_generated: Option<u32>,
    pub templates_used: Option<u32>,
    pub times_saved: Option<u32>,
}

fn activity(
    id: &str,
    kind: ActivityKind,
    title: &str,
    description: &str,
    timestamp: DateTime<Utc>,
) -> Activity {
    Activity {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        description: description.to_string(),
        timestamp,
    }
}

fn recent(
    id: &str,
    title: &str,
    subject: &str,
    doc_type: &str,
    is_starred: bool,
    created_at: DateTime<Utc>,
) -> RecentDocument {
    RecentDocument {
        id: id.to_string(),
        title: title.to_string(),
        subject: subject.to_string(),
        doc_type: doc_type.to_string(),
        is_starred,
        created_at,
    }
}

#[derive(Debug, Clone)]
pub struct ActivityStore {
    activities: Vec<Activity>,
    recent_documents: Vec<RecentDocument>,
    stats: Stats,
}

impl Default for ActivityStore {
    fn default() -> Self {
        Self::seeded(Utc::now())
    }
}

impl ActivityStore {
    /// Store with the sample feed, timestamps relative to `now`
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let activities = vec![
            activity(
                "1",
                ActivityKind::Generate,
                "Verifica generata",
                "Hai generato una nuova verifica di Letteratura",
                now - Duration::hours(2),
            ),
            activity(
                "2",
                ActivityKind::Save,
                "Documento salvato",
                "Hai salvato \"Quiz Rivoluzione Francese\"",
                now - Duration::days(1),
            ),
            activity(
                "3",
                ActivityKind::Template,
                "Template utilizzato",
                "Hai usato il template \"Verifica Dante\"",
                now - Duration::days(3),
            ),
        ];
        let recent_documents = vec![
            recent(
                "1",
                "Verifica Dante - Inferno Canti I-III",
                "Letteratura Italiana",
                "QUIZ",
                true,
                now - Duration::hours(2),
            ),
            recent(
                "2",
                "Test Equazioni di Secondo Grado",
                "Matematica",
                "TEST",
                false,
                now - Duration::days(1),
            ),
            recent(
                "3",
                "Quiz Rivoluzione Francese",
                "Storia",
                "QUIZ",
                true,
                now - Duration::days(1),
            ),
        ];
        Self {
            activities,
            recent_documents,
            stats: Stats::default(),
        }
    }

    /// Empty feed, zeroed counters
    pub fn empty() -> Self {
        Self {
            activities: Vec::new(),
            recent_documents: Vec::new(),
            stats: Stats {
                total_documents: 0,
                documents_created_this_month: 0,
                quizzes_generated: 0,
                templates_used: 0,
                times_saved: 0,
            },
        }
    }

    /// Newest first
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Newest first
    pub fn recent_documents(&self) -> &[RecentDocument] {
        &self.recent_documents
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Prepend an entry, keeping the newest ten
    pub fn add_activity(
        &mut self,
        kind: ActivityKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> &Activity {
        let entry = Activity {
            id: generate_id(),
            kind,
            title: title.into(),
            description: description.into(),
            timestamp: Utc::now(),
        };
        debug!("{} {}: {}", kind.icon(), entry.title, entry.description);
        self.activities.insert(0, entry);
        self.activities.truncate(MAX_ACTIVITIES);
        &self.activities[0]
    }

    /// Prepend a recent document, keeping the newest three, and count it
    pub fn add_recent_document(
        &mut self,
        title: impl Into<String>,
        subject: impl Into<String>,
        doc_type: impl Into<String>,
        is_starred: bool,
    ) -> &RecentDocument {
        let entry = RecentDocument {
            id: generate_id(),
            title: title.into(),
            subject: subject.into(),
            doc_type: doc_type.into(),
            is_starred,
            created_at: Utc::now(),
        };
        self.recent_documents.insert(0, entry);
        self.recent_documents.truncate(MAX_RECENT_DOCUMENTS);
        self.stats.total_documents += 1;
        self.stats.documents_created_this_month += 1;
        &self.recent_documents[0]
    }

    pub fn update_stats(&mut self, update: StatsUpdate) {
        let stats = &mut self.stats;
        if let Some(v) = update.total_documents {
            stats.total_documents = v;
        }
        if let Some(v) = update.documents_created_this_month {
            stats.documents_created_this_month = v;
        }
        if let Some(v) = update.quizzes_generated {
            stats.quizzes_generated = v;
        }
        if let Some(v) = update.templates_used {
            stats.templates_used = v;
        }
        if let Some(v) = update.times_saved {
            stats.times_saved = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_state() {
        let now = Utc::now();
        let store = ActivityStore::seeded(now);
        assert_eq!(store.activities().len(), 3);
        assert_eq!(store.activities()[0].timestamp, now - Duration::hours(2));
        assert_eq!(store.recent_documents()[1].title, "Test Equazioni di Secondo Grado");
        assert_eq!(store.stats(), Stats::default());
    }

    #[test]
    fn test_activity_feed_keeps_newest_ten() {
        let mut store = ActivityStore::default();
        for i in 0..12 {
            store.add_activity(ActivityKind::Download, "Documento scaricato", format!("n. {}", i));
        }
        assert_eq!(store.activities().len(), MAX_ACTIVITIES);
        assert_eq!(store.activities()[0].description, "n. 11");
        assert_eq!(store.activities()[9].description, "n. 2");
    }

    #[test]
    fn test_recent_documents_keep_three_and_count() {
        let mut store = ActivityStore::default();
        store.add_recent_document("Nuovo quiz", "Storia", "QUIZ", false);
        assert_eq!(store.recent_documents().len(), MAX_RECENT_DOCUMENTS);
        assert_eq!(store.recent_documents()[0].title, "Nuovo quiz");
        assert_eq!(store.recent_documents()[2].title, "Test Equazioni di Secondo Grado");
        assert_eq!(store.stats().total_documents, 13);
        assert_eq!(store.stats().documents_created_this_month, 5);
    }

    #[test]
    fn test_partial_stats_update() {
        let mut store = ActivityStore::empty();
        store.update_stats(StatsUpdate {
            templates_used: Some(3),
            ..StatsUpdate::default()
        });
        assert_eq!(store.stats().templates_used, 3);
        assert_eq!(store.stats().quizzes_generated, 0);
    }
}
