use serde::{Deserialize, Serialize};

/// Free-form institutional metadata printed into headers
///
/// Nothing here is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolInfo {
    pub school_name: String,
    pub school_address: String,
    pub class_name: String,
    /// Display date; the formatter falls back to today when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
}

impl Default for SchoolInfo {
    fn default() -> Self {
        Self {
            school_name: "ISTITUTO COMPRENSIVO \"ALESSANDRO MANZONI\"".to_string(),
            school_address: "Via dei Promessi Sposi, 25 - 20100 Milano (MI)".to_string(),
            class_name: "3°A".to_string(),
            date: None,
            teacher_name: None,
        }
    }
}
