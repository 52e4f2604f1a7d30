//! Canned quizzes returned by the mock generator
//!
//! Built fresh on every call so callers can edit what they get back.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Difficulty, DocumentContent, DocumentType, Question, QuizContent, Template};

fn quiz(
    title: impl Into<String>,
    instructions: impl Into<String>,
    questions: Vec<Question>,
    total_points: u32,
    time_limit: Option<u32>,
) -> QuizContent {
    QuizContent {
        title: title.into(),
        instructions: Some(instructions.into()),
        questions,
        total_points,
        time_limit,
    }
}

// ========== generator responses ==========

pub fn dante() -> QuizContent {
    quiz(
        "Verifica su Dante Alighieri - Inferno",
        "Leggere attentamente i brani e rispondere alle domande seguenti. Tempo: 60 minuti.",
        vec![
            Question::open(
                "1",
                "Chi è Virgilio nella Divina Commedia e quale ruolo svolge nel viaggio di Dante?",
                10,
            ),
            Question::open(
                "2",
                "Nel primo canto dell'Inferno, Dante incontra tre fiere. Quali sono e cosa simboleggiano?",
                15,
            ),
            Question::multiple_choice(
                "3",
                "Cosa rappresenta la \"selva oscura\" in cui si trova Dante all'inizio del poema?",
                [
                    "Una foresta reale in cui si è perso",
                    "Lo smarrimento spirituale e morale",
                    "I boschi intorno a Firenze",
                    "Un sogno di Dante",
                ],
                1,
                5,
            ),
        ],
        30,
        None,
    )
}

pub fn manzoni() -> QuizContent {
    quiz(
        "Verifica su Alessandro Manzoni - I Promessi Sposi",
        "Analizza i personaggi e i temi principali del romanzo.",
        vec![
            Question::open(
                "1",
                "Analizza la figura di Renzo Tramaglino: caratteristiche, evoluzione nel romanzo.",
                12,
            ),
            Question::open("2", "Qual è il ruolo della Provvidenza nei Promessi Sposi?", 13),
            Question::multiple_choice(
                "3",
                "Chi è Don Abbondio?",
                [
                    "Il parroco del paese di Renzo e Lucia",
                    "Un nobile milanese",
                    "Un mercante di seta",
                    "Un bandito",
                ],
                0,
                5,
            ),
        ],
        30,
        None,
    )
}

pub fn literature_generic(subject: &str, topic: &str) -> QuizContent {
    quiz(
        format!("Verifica di {} - {}", subject, topic),
        "Analizza attentamente i testi e rispondi alle domande seguenti.",
        vec![
            Question::open(
                "1",
                format!(
                    "Analizza il tema principale di \"{}\" nel contesto letterario studiato.",
                    topic
                ),
                15,
            ),
            Question::multiple_choice(
                "2",
                format!("Quale tra queste affermazioni su \"{}\" è corretta?", topic),
                [
                    "Opzione A (generica)",
                    "Opzione B (corretta)",
                    "Opzione C (generica)",
                    "Opzione D (generica)",
                ],
                1,
                5,
            ),
        ],
        20,
        None,
    )
}

pub fn mathematics() -> QuizContent {
    quiz(
        "Test di Matematica - Equazioni di Secondo Grado",
        "Risolvi gli esercizi mostrando tutti i passaggi. Calcolatrice non consentita.",
        vec![
            Question::open("1", "Risolvi l'equazione: x² - 5x + 6 = 0", 10),
            Question::open(
                "2",
                "Determina per quali valori di k l'equazione kx² - 2x + 1 = 0 ha soluzioni reali.",
                15,
            ),
            Question::multiple_choice(
                "3",
                "Il discriminante di un'equazione di secondo grado ax² + bx + c = 0 è:",
                ["b² - 4ac", "b² + 4ac", "4ac - b²", "a² + b² + c²"],
                0,
                5,
            ),
        ],
        30,
        None,
    )
}

pub fn physics() -> QuizContent {
    quiz(
        "Test di Fisica - Meccanica",
        "Risolvi i problemi indicando le formule utilizzate.",
        vec![
            Question::open(
                "1",
                "Un corpo di massa 2 kg è soggetto a una forza di 10 N. Calcola l'accelerazione.",
                8,
            ),
            Question::open(
                "2",
                "Enuncia la seconda legge di Newton e fornisci un esempio pratico.",
                12,
            ),
            Question::multiple_choice(
                "3",
                "L'unità di misura della forza nel Sistema Internazionale è:",
                ["Joule", "Newton", "Watt", "Pascal"],
                1,
                5,
            ),
        ],
        25,
        None,
    )
}

pub fn stem_generic(subject: &str, topic: &str) -> QuizContent {
    quiz(
        format!("Test di {} - {}", subject, topic),
        "Risolvi gli esercizi mostrando tutti i passaggi.",
        vec![
            Question::open("1", format!("Risolvi il problema relativo a \"{}\"", topic), 12),
            Question::multiple_choice(
                "2",
                format!("Formula principale per \"{}\":", topic),
                ["Formula A", "Formula B (corretta)", "Formula C", "Formula D"],
                1,
                8,
            ),
        ],
        20,
        None,
    )
}

pub fn history() -> QuizContent {
    quiz(
        "Quiz di Storia - Rivoluzione Francese",
        "Rispondi alle domande sulla Rivoluzione Francese.",
        vec![
            Question::multiple_choice(
                "1",
                "In che anno iniziò la Rivoluzione Francese?",
                ["1788", "1789", "1790", "1791"],
                1,
                3,
            ),
            Question::multiple_choice(
                "2",
                "Chi fu ghigliottinato il 21 gennaio 1793?",
                ["Luigi XVI", "Maria Antonietta", "Robespierre", "Marat"],
                0,
                3,
            ),
            Question::open("3", "Descrivi le cause principali della Rivoluzione Francese.", 14),
        ],
        20,
        None,
    )
}

// ========== community templates ==========

/// Title of the template used when a lookup fails
pub const DEFAULT_COMMUNITY_TEMPLATE: &str = "Quiz Storia";

struct CommunityEntry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    doc_type: DocumentType,
    subject: &'static str,
    difficulty: Difficulty,
    tags: &'static [&'static str],
}

const COMMUNITY: [CommunityEntry; 3] = [
    CommunityEntry {
        id: "t1",
        title: "Verifica Dante",
        description: "Domande aperte e a scelta multipla sull'Inferno di Dante",
        doc_type: DocumentType::Quiz,
        subject: "Letteratura Italiana",
        difficulty: Difficulty::Medium,
        tags: &["dante", "inferno", "letteratura"],
    },
    CommunityEntry {
        id: "t2",
        title: "Quiz Storia",
        description: "Template per quiz storici con domande a scelta multipla",
        doc_type: DocumentType::Quiz,
        subject: "Storia",
        difficulty: Difficulty::Easy,
        tags: &["quiz", "storia", "multipla"],
    },
    CommunityEntry {
        id: "t3",
        title: "Test Matematica",
        description: "Esercizi su equazioni di secondo grado",
        doc_type: DocumentType::Test,
        subject: "Matematica",
        difficulty: Difficulty::Hard,
        tags: &["equazioni", "algebra"],
    },
];

fn published_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn build_template(entry: &CommunityEntry) -> Option<Template> {
    let quiz = community_quiz(entry.title)?;
    Some(Template {
        id: entry.id.to_string(),
        title: entry.title.to_string(),
        description: Some(entry.description.to_string()),
        content: DocumentContent::Quiz(quiz),
        doc_type: entry.doc_type,
        subject: entry.subject.to_string(),
        difficulty: entry.difficulty,
        tags: entry.tags.iter().map(|t| t.to_string()).collect(),
        is_public: true,
        created_at: published_at(),
        updated_at: published_at(),
        user_id: "community".to_string(),
    })
}

/// Templates shared by the community
pub fn community_templates() -> Vec<Template> {
    COMMUNITY.iter().filter_map(build_template).collect()
}

/// Community template by id or title (case-insensitive)
pub fn find_community_template(key: &str) -> Option<Template> {
    let key = key.trim();
    COMMUNITY
        .iter()
        .find(|entry| entry.id == key || entry.title.eq_ignore_ascii_case(key))
        .and_then(build_template)
}

fn community_quiz(name: &str) -> Option<QuizContent> {
    match name {
        "Verifica Dante" => Some(quiz(
            "Verifica su Dante Alighieri - Template",
            "Verifica basata sul template della community. Tempo: 60 minuti.",
            vec![
                Question::multiple_choice(
                    "1",
                    "Chi accompagna Dante nel suo viaggio attraverso l'Inferno?",
                    ["Beatrice", "Virgilio", "San Bernardo", "Catone"],
                    1,
                    5,
                ),
                Question::open(
                    "2",
                    "Analizza il significato allegorico della \"selva oscura\" nel primo canto dell'Inferno.",
                    15,
                ),
                Question::multiple_choice(
                    "3",
                    "Le tre fiere che ostacolano Dante simboleggiano:",
                    [
                        "I tre regni dell'oltretomba",
                        "I peccati di incontinenza, violenza e frode",
                        "Le tre guide del viaggio",
                        "I tre cantori classici",
                    ],
                    1,
                    5,
                ),
            ],
            25,
            Some(60),
        )),
        "Quiz Storia" => Some(quiz(
            "Quiz Storia - Rivoluzione Francese Template",
            "Quiz basato su template della community per la Rivoluzione Francese.",
            vec![
                Question::multiple_choice(
                    "1",
                    "La Rivoluzione Francese iniziò nel:",
                    ["1788", "1789", "1790", "1791"],
                    1,
                    3,
                ),
                Question::open(
                    "2",
                    "Quali furono le principali cause della Rivoluzione Francese?",
                    12,
                ),
                Question::multiple_choice(
                    "3",
                    "La presa della Bastiglia avvenne il:",
                    ["14 luglio 1789", "14 luglio 1790", "15 luglio 1789", "13 luglio 1789"],
                    0,
                    3,
                ),
            ],
            18,
            Some(45),
        )),
        "Test Matematica" => Some(quiz(
            "Test Matematica - Equazioni di Secondo Grado Template",
            "Test basato su template per equazioni di secondo grado.",
            vec![
                Question::open("1", "Risolvi l'equazione: x² - 7x + 12 = 0", 10),
                Question::multiple_choice(
                    "2",
                    "Il discriminante (Delta) dell'equazione ax² + bx + c = 0 è:",
                    ["b² - 4ac", "b² + 4ac", "4ac - b²", "ab - 4c"],
                    0,
                    5,
                ),
                Question::open(
                    "3",
                    "Determina per quali valori di k l'equazione kx² - 4x + 1 = 0 ha soluzioni reali.",
                    15,
                ),
            ],
            30,
            Some(75),
        )),
        _ => None,
    }
}

// ========== print preview ==========

const PREVIEW_INSTRUCTIONS: &str = "Leggi attentamente ogni domanda e scegli la risposta corretta. \
     Tempo a disposizione: 60 minuti. Buon lavoro!";

/// Printable quiz shown for a stored document, chosen by subject
pub fn print_preview(subject: &str, title: &str) -> QuizContent {
    let questions = match subject {
        "Matematica" => vec![
            Question::multiple_choice(
                "1",
                "Risolvi la seguente equazione di secondo grado: x² - 5x + 6 = 0",
                ["x = 2 e x = 3", "x = 1 e x = 6", "x = -2 e x = -3", "x = 0 e x = 5"],
                0,
                5,
            ),
            Question::multiple_choice(
                "2",
                "Calcola il valore dell'espressione: (3x + 2)² quando x = 1",
                ["25", "11", "17", "9"],
                0,
                4,
            ),
            Question::open(
                "3",
                "Dimostra che la funzione f(x) = x² - 4x + 3 ha due zeri reali e calcolali.",
                8,
            ),
            Question::multiple_choice(
                "4",
                "Il discriminante di un'equazione ax² + bx + c = 0 è:",
                ["b² - 4ac", "b² + 4ac", "4ac - b²", "ab - 4c"],
                0,
                3,
            ),
            Question::open(
                "5",
                "Determina l'insieme di definizione della funzione f(x) = √(x - 2) e traccia un grafico approssimativo.",
                5,
            ),
        ],
        "Letteratura Italiana" | "Italiano" => vec![
            Question::multiple_choice(
                "1",
                "Chi è l'autore della Divina Commedia?",
                [
                    "Dante Alighieri",
                    "Francesco Petrarca",
                    "Giovanni Boccaccio",
                    "Ludovico Ariosto",
                ],
                0,
                2,
            ),
            Question::multiple_choice(
                "2",
                "In quale anno inizia il viaggio di Dante descritto nella Divina Commedia?",
                ["1300", "1321", "1265", "1290"],
                0,
                3,
            ),
            Question::open(
                "3",
                "Analizza il significato allegorico della \"selva oscura\" nel primo canto dell'Inferno, \
                 facendo riferimento al contesto biografico di Dante.",
                10,
            ),
            Question::multiple_choice(
                "4",
                "Le tre fiere che ostacolano Dante simboleggiano:",
                [
                    "I peccati di incontinenza, violenza e frode",
                    "I tre regni dell'oltretomba",
                    "Le tre guide del viaggio",
                    "Gli ostacoli politici dell'epoca",
                ],
                0,
                4,
            ),
            Question::open(
                "5",
                "Commenta il ruolo di Virgilio come guida di Dante, spiegando perché Dante sceglie proprio lui.",
                6,
            ),
        ],
        "Storia" => vec![
            Question::multiple_choice(
                "1",
                "In che anno iniziò la Rivoluzione Francese?",
                ["1789", "1788", "1790", "1791"],
                0,
                2,
            ),
            Question::multiple_choice(
                "2",
                "La presa della Bastiglia avvenne il:",
                ["14 luglio 1789", "14 luglio 1790", "15 luglio 1789", "13 luglio 1789"],
                0,
                3,
            ),
            Question::open(
                "3",
                "Analizza le principali cause economiche, sociali e politiche che portarono alla Rivoluzione Francese.",
                12,
            ),
            Question::multiple_choice(
                "4",
                "Chi fu il primo re ghigliottinato durante la Rivoluzione?",
                ["Luigi XVI", "Luigi XIV", "Luigi XVIII", "Carlo X"],
                0,
                3,
            ),
            Question::open(
                "5",
                "Descrivi l'importanza della Dichiarazione dei Diritti dell'Uomo e del Cittadino nel contesto rivoluzionario.",
                5,
            ),
        ],
        other => vec![
            Question::multiple_choice(
                "1",
                format!("Domanda di base su {}", other),
                ["Opzione A", "Opzione B", "Opzione C", "Opzione D"],
                0,
                5,
            ),
            Question::open("2", format!("Domanda aperta riguardante {}", other), 10),
            Question::multiple_choice(
                "3",
                format!("Seconda domanda di approfondimento su {}", other),
                ["Prima scelta", "Seconda scelta", "Terza scelta", "Quarta scelta"],
                1,
                5,
            ),
            Question::open("4", format!("Esercizio pratico di {}", other), 5),
        ],
    };

    quiz(title, PREVIEW_INSTRUCTIONS, questions, 25, Some(60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_totals_match_points() {
        for quiz in [
            dante(),
            manzoni(),
            mathematics(),
            physics(),
            history(),
            literature_generic("Italiano", "Leopardi"),
            stem_generic("Chimica", "Moli"),
        ] {
            assert_eq!(quiz.points_sum(), quiz.total_points, "{}", quiz.title);
        }
        for template in community_templates() {
            let quiz = template.quiz().unwrap();
            assert_eq!(quiz.points_sum(), quiz.total_points, "{}", template.title);
        }
    }

    #[test]
    fn test_community_templates_are_records() {
        let templates = community_templates();
        assert_eq!(templates.len(), 3);
        assert!(templates.iter().all(|t| t.is_public && t.description.is_some()));

        let by_id = find_community_template("t3").unwrap();
        assert_eq!(by_id.title, "Test Matematica");
        assert_eq!(by_id.doc_type, DocumentType::Test);
        assert_eq!(by_id.difficulty, Difficulty::Hard);

        let by_title = find_community_template("verifica dante").unwrap();
        assert_eq!(by_title.subject, "Letteratura Italiana");
        assert_eq!(
            by_title.quiz().unwrap().title,
            "Verifica su Dante Alighieri - Template"
        );

        assert!(find_community_template("Verifica Leopardi").is_none());
    }

    #[test]
    fn test_print_preview_by_subject() {
        for subject in ["Matematica", "Italiano", "Letteratura Italiana", "Storia", "Geografia"] {
            let quiz = print_preview(subject, "Doc");
            assert_eq!(quiz.points_sum(), 25, "{}", subject);
            assert_eq!(quiz.title, "Doc");
        }
        assert_eq!(
            print_preview("Geografia", "Doc").questions[0].text,
            "Domanda di base su Geografia"
        );
    }
}
