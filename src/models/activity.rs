use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Generate,
    Download,
    Save,
    Share,
    Upload,
    Template,
}

impl ActivityKind {
    /// Icon shown next to the entry
    pub fn icon(self) -> &'static str {
        match self {
            ActivityKind::Generate => "🪄",
            ActivityKind::Download => "⬇️",
            ActivityKind::Save => "💾",
            ActivityKind::Share => "🔗",
            ActivityKind::Upload => "📁",
            ActivityKind::Template => "🧩",
        }
    }
}

/// One entry of the activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Short entry of the "recent documents" panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDocument {
    pub id: String,
    pub title: String,
    pub subject: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub is_starred: bool,
    pub created_at: DateTime<Utc>,
}
