/// School subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Subject {
    /// Matematica
    Mathematics,
    /// Fisica
    Physics,
    /// Chimica
    Chemistry,
    /// Scienze
    Science,
    /// Italiano
    Italian,
    /// Letteratura Italiana
    ItalianLiterature,
    /// Storia
    History,
    /// Geografia
    Geography,
    /// Inglese
    English,
    /// Filosofia
    Philosophy,
    /// Latino
    Latin,
    /// Informatica
    ComputerScience,
}

impl Subject {
    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Subject::Mathematics => "Matematica",
            Subject::Physics => "Fisica",
            Subject::Chemistry => "Chimica",
            Subject::Science => "Scienze",
            Subject::Italian => "Italiano",
            Subject::ItalianLiterature => "Letteratura Italiana",
            Subject::History => "Storia",
            Subject::Geography => "Geografia",
            Subject::English => "Inglese",
            Subject::Philosophy => "Filosofia",
            Subject::Latin => "Latino",
            Subject::ComputerScience => "Informatica",
        }
    }

    /// Exact match on the display name (case-insensitive)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "matematica" => Some(Subject::Mathematics),
            "fisica" => Some(Subject::Physics),
            "chimica" => Some(Subject::Chemistry),
            "scienze" => Some(Subject::Science),
            "italiano" => Some(Subject::Italian),
            "letteratura italiana" => Some(Subject::ItalianLiterature),
            "storia" => Some(Subject::History),
            "geografia" => Some(Subject::Geography),
            "inglese" => Some(Subject::English),
            "filosofia" => Some(Subject::Philosophy),
            "latino" => Some(Subject::Latin),
            "informatica" => Some(Subject::ComputerScience),
            _ => None,
        }
    }

    /// Lookup with fuzzy fallback ("Matematica Applicata" → Mathematics)
    pub fn find(s: &str) -> Option<Self> {
        if let Some(subject) = Self::from_name(s) {
            return Some(subject);
        }

        let s_lower = s.to_lowercase();
        if s_lower.contains("matematic") {
            return Some(Subject::Mathematics);
        }
        if s_lower.contains("fisic") {
            return Some(Subject::Physics);
        }
        if s_lower.contains("chimic") {
            return Some(Subject::Chemistry);
        }
        if s_lower.contains("letteratura") {
            return Some(Subject::ItalianLiterature);
        }
        if s_lower.contains("italian") {
            return Some(Subject::Italian);
        }
        if s_lower.contains("storia") {
            return Some(Subject::History);
        }
        if s_lower.contains("geograf") {
            return Some(Subject::Geography);
        }
        if s_lower.contains("scienz") || s_lower.contains("biolog") {
            return Some(Subject::Science);
        }
        if s_lower.contains("ingles") {
            return Some(Subject::English);
        }
        if s_lower.contains("filosof") {
            return Some(Subject::Philosophy);
        }
        if s_lower.contains("latin") {
            return Some(Subject::Latin);
        }
        if s_lower.contains("informatic") {
            return Some(Subject::ComputerScience);
        }

        None
    }

    pub fn is_stem(self) -> bool {
        matches!(
            self,
            Subject::Mathematics
                | Subject::Physics
                | Subject::Chemistry
                | Subject::Science
                | Subject::ComputerScience
        )
    }

    pub fn is_literature(self) -> bool {
        matches!(self, Subject::Italian | Subject::ItalianLiterature)
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_fuzzy_lookup() {
        assert_eq!(Subject::from_name("STORIA"), Some(Subject::History));
        assert_eq!(Subject::find("Matematica Avanzata"), Some(Subject::Mathematics));
        assert_eq!(Subject::find("Storia dell'Arte"), Some(Subject::History));
        assert_eq!(Subject::find("Musica"), None);
    }

    #[test]
    fn test_literature_precedes_italian() {
        assert_eq!(Subject::find("Letteratura Italiana"), Some(Subject::ItalianLiterature));
        assert!(Subject::ItalianLiterature.is_literature());
        assert!(!Subject::History.is_stem());
    }
}
