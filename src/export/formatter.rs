//! Content formatter
//!
//! Turns a `QuizContent` into the flat line layout shared by every export
//! format: template header, instructions, numbered questions, footer.
//!
//! Pure over its inputs. The only outside value is today's date, read from the
//! injected [`Clock`] when the school info carries none.
//!
//! Output is a single page: there is no pagination, long quizzes simply run on.

use chrono::Datelike;

use crate::math;
use crate::models::{QuestionType, QuizContent, RichContent, SchoolInfo};
use crate::utils::clock::{format_it_date, Clock};
use crate::utils::logging::truncate_text;

use super::format::ExportOptions;
use super::template::ExportTemplate;

const RULE_WIDTH: usize = 55;
const ANSWER_LINE_WIDTH: usize = 60;
const COMPACT_QUESTION_CHARS: usize = 100;
const COMPACT_OPTION_CHARS: usize = 50;
const CREDIT_LINE: &str = "--- Documento generato con Teaching Hub - www.teachinghub.it ---";

/// Lines of a formatted quiz, in print order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedDocument {
    pub lines: Vec<String>,
}

impl FormattedDocument {
    /// Lines joined with `\n`, no trailing newline
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Lines starting with `DOMANDA `, in order
    pub fn question_labels(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|line| line.starts_with("DOMANDA "))
    }
}

fn heavy_rule() -> String {
    "═".repeat(RULE_WIDTH)
}

fn light_rule() -> String {
    "─".repeat(RULE_WIDTH)
}

fn answer_line() -> String {
    format!("   {}", "_".repeat(ANSWER_LINE_WIDTH))
}

/// Center `text` within the rule width (no right padding)
fn center(text: &str) -> String {
    let len = text.chars().count();
    let pad = RULE_WIDTH.saturating_sub(len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn option_letter(idx: usize) -> char {
    // past Z the letters continue into `[`, `\`, ... as a plain code-point offset
    char::from_u32('A' as u32 + idx as u32).unwrap_or('?')
}

struct Formatter<'a> {
    quiz: &'a QuizContent,
    template: ExportTemplate,
    school: &'a SchoolInfo,
    options: ExportOptions,
    date: String,
    year: i32,
    lines: Vec<String>,
}

impl<'a> Formatter<'a> {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn header(&mut self) {
        let school = self.school;
        let heading = self.quiz.subject_heading();
        let class = self.school.class_name.clone();
        let date = self.date.clone();

        match self.template {
            ExportTemplate::SchoolStandard => {
                self.push(heavy_rule());
                self.push(center(&school.school_name));
                self.push(center(&school.school_address));
                self.push(heavy_rule());
                self.blank();
                self.push(format!("VERIFICA DI {}", heading));
                self.blank();
                self.push(format!("Classe: {}                    Data: {}", class, date));
                self.push("Nome: _____________________    Cognome: _____________________");
            }
            ExportTemplate::UniversityFormal => {
                self.push(heavy_rule());
                self.push(center(&school.school_name));
                self.push(center(&school.school_address));
                self.push(heavy_rule());
                self.blank();
                self.push(format!("ESAME DI {}", heading));
                self.push(format!("Anno Accademico {}/{}", self.year, self.year + 1));
                self.blank();
                self.push(format!("Corso: {}                    Sessione: {}", class, date));
                self.push("Matricola: __________    Candidato: ________________________");
            }
            ExportTemplate::ExamGrid => {
                self.push(heavy_rule());
                self.push(center(&school.school_name.to_uppercase()));
                self.push(center("PROVA D'ESAME UFFICIALE"));
                self.push(center(&heading));
                self.push(heavy_rule());
                self.blank();
                self.push(format!(
                    "CLASSE: {}    DATA: {}    DURATA: 90 min",
                    class, date
                ));
                self.push("CANDIDATO: ________________________    N. PROTOCOLLO: _______________");
                self.blank();
                self.push("GRIGLIA DI VALUTAZIONE");
                self.push("Conoscenze ___/10    Competenze ___/10    Abilità ___/5    TOTALE ___/25");
            }
            ExportTemplate::Minimalist => {
                self.push(heading);
                match self.quiz.time_limit {
                    Some(minutes) => self.push(format!("{}    Tempo: {} min", date, minutes)),
                    None => self.push(date),
                }
                self.push("Nome: ______________________");
            }
            ExportTemplate::QuizCompact => {
                self.push(heavy_rule());
                self.push(center("⚡ QUIZ RAPIDO ⚡"));
                self.push(center(&heading));
                self.push(heavy_rule());
                self.push(format!(
                    "📅 {}    ⏰ 20 min    🎯 {} pt",
                    date, self.quiz.total_points
                ));
                self.push(format!(
                    "Nome: __________    Classe: {}    Punti: ___/___",
                    class
                ));
            }
        }
        self.blank();
    }

    fn instructions(&mut self) {
        let quiz = self.quiz;
        let Some(instructions) = quiz.instructions.as_deref() else {
            return;
        };

        self.push("ISTRUZIONI PER LO SVOLGIMENTO:");
        self.push(instructions);
        if let Some(minutes) = quiz.time_limit {
            self.push(format!("Tempo a disposizione: {} minuti", minutes));
        }
        if self.options.include_points {
            self.push(format!("Punteggio totale: {} punti", quiz.total_points));
        }
        self.blank();
        self.push(light_rule());
        self.blank();
    }

    fn questions(&mut self) {
        let quiz = self.quiz;
        let compact = self.template.is_compact();
        let count = quiz.questions.len();

        for (index, question) in quiz.questions.iter().enumerate() {
            let mut label = format!("DOMANDA {}", index + 1);
            if self.options.include_points {
                label.push_str(&format!(" ({} punti)", question.points));
            }
            self.push(label);

            if compact {
                self.push(truncate_text(&question.text, COMPACT_QUESTION_CHARS));
            } else {
                self.push(question.text.clone());
            }
            for fragment in question.rich_content.iter().flatten() {
                self.rich_content(fragment);
            }
            self.blank();

            match question.question_type {
                QuestionType::MultipleChoice => {
                    for (opt_idx, option) in question.option_list().iter().enumerate() {
                        let text = if compact {
                            truncate_text(option, COMPACT_OPTION_CHARS)
                        } else {
                            option.clone()
                        };
                        let mut line = format!("   {}) {}", option_letter(opt_idx), text);
                        if self.options.include_answers && question.is_correct_option(opt_idx) {
                            line.push_str(" ← RISPOSTA CORRETTA");
                        }
                        self.push(line);
                    }
                    self.blank();
                    self.push("   Risposta: ____");
                    self.blank();
                }
                QuestionType::OpenEnded => {
                    let answer_lines = if compact { 3 } else { 4 };
                    for _ in 0..answer_lines {
                        self.push(answer_line());
                    }
                    self.blank();
                }
                QuestionType::TrueFalse => {
                    let mut line = "   Risposta:  Vero / Falso".to_string();
                    if self.options.include_answers {
                        if let Some(answer) = true_false_answer(question) {
                            line.push_str(&format!(" ← RISPOSTA CORRETTA: {}", answer));
                        }
                    }
                    self.push(line);
                    self.blank();
                }
            }

            if index + 1 < count {
                self.push(light_rule());
                self.blank();
            }
        }
    }

    fn rich_content(&mut self, fragment: &RichContent) {
        match fragment {
            RichContent::Text { content, .. } | RichContent::Table { content, .. } => {
                for line in content.lines() {
                    self.push(line);
                }
            }
            RichContent::Latex { content, .. } => {
                self.push(format!("   {}", math::to_plain_text(content)));
            }
            RichContent::Image { .. } => self.push("   [immagine]"),
        }
    }

    fn footer(&mut self) {
        self.blank();
        self.push(heavy_rule());
        if self.options.include_points {
            // printed as stored, never reconciled with the per-question sum
            self.push(format!(
                "PUNTEGGIO OTTENUTO: _____ / {} punti",
                self.quiz.total_points
            ));
            self.push("VOTO: _____");
            self.blank();
        }

        let teacher = match self.school.teacher_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => "____________________".to_string(),
        };
        self.push(format!(
            "Docente: {}    Firma: ____________________",
            teacher
        ));
        self.blank();
        self.push(CREDIT_LINE);
    }
}

/// Display answer of a true/false question, if one is set
fn true_false_answer(question: &crate::models::Question) -> Option<String> {
    use crate::models::CorrectAnswer;

    match question.correct_answer.as_ref()? {
        CorrectAnswer::Index(0) => Some("Vero".to_string()),
        CorrectAnswer::Index(_) => Some("Falso".to_string()),
        CorrectAnswer::Text(text) => match text.trim().to_lowercase().as_str() {
            "true" | "vero" | "v" => Some("Vero".to_string()),
            "false" | "falso" | "f" => Some("Falso".to_string()),
            _ => Some(text.clone()),
        },
    }
}

/// Lay out a quiz for export
///
/// Deterministic for a given clock: identical inputs give identical lines.
pub fn format_quiz(
    quiz: &QuizContent,
    template: ExportTemplate,
    school: &SchoolInfo,
    options: ExportOptions,
    clock: &dyn Clock,
) -> FormattedDocument {
    let today = clock.today();
    let date = school
        .date
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format_it_date(today));

    let mut formatter = Formatter {
        quiz,
        template,
        school,
        options,
        date,
        year: today.year(),
        lines: Vec::new(),
    };

    formatter.header();
    formatter.instructions();
    formatter.questions();
    formatter.footer();

    FormattedDocument {
        lines: formatter.lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CorrectAnswer, Question};
    use crate::utils::FixedClock;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    fn dante_quiz() -> QuizContent {
        QuizContent {
            title: "Verifica Dante - Inferno".to_string(),
            instructions: Some("Rispondi a tutte le domande.".to_string()),
            questions: vec![
                Question::multiple_choice(
                    "1",
                    "Chi accompagna Dante nell'Inferno?",
                    ["Beatrice", "Virgilio", "San Bernardo", "Caronte"],
                    1,
                    5,
                ),
                Question::open("2", "Descrivi la legge del contrappasso.", 15),
            ],
            total_points: 20,
            time_limit: Some(60),
        }
    }

    fn format(quiz: &QuizContent, template: ExportTemplate, options: ExportOptions) -> FormattedDocument {
        format_quiz(quiz, template, &SchoolInfo::default(), options, &clock())
    }

    #[test]
    fn test_question_labels_in_order() {
        let mut quiz = dante_quiz();
        for i in 3..=7 {
            quiz.questions.push(Question::open(i.to_string(), "Altro", 1));
        }
        let doc = format(&quiz, ExportTemplate::SchoolStandard, ExportOptions::default());

        let labels: Vec<_> = doc.question_labels().collect();
        assert_eq!(labels.len(), 7);
        for (i, label) in labels.iter().enumerate() {
            assert!(label.starts_with(&format!("DOMANDA {} ", i + 1)));
        }
    }

    #[test]
    fn test_all_options_listed_beyond_four() {
        let options = ["uno", "due", "tre", "quattro", "cinque", "sei"];
        let quiz = QuizContent {
            questions: vec![Question::multiple_choice("1", "Conta", options, 5, 2)],
            ..dante_quiz()
        };
        for template in ExportTemplate::ALL {
            let doc = format(&quiz, template, ExportOptions::default());
            let lettered: Vec<_> = doc
                .lines
                .iter()
                .filter(|l| l.len() > 5 && l.starts_with("   ") && l.as_bytes()[4] == b')')
                .collect();
            assert_eq!(lettered.len(), 6, "template {}", template);
            assert!(lettered[5].starts_with("   F) sei"));
        }
    }

    #[test]
    fn test_footer_passes_total_through() {
        let mut quiz = dante_quiz();
        quiz.total_points = 42;
        let doc = format(&quiz, ExportTemplate::SchoolStandard, ExportOptions::default());
        assert!(doc
            .lines
            .contains(&"PUNTEGGIO OTTENUTO: _____ / 42 punti".to_string()));
        assert!(doc.lines.contains(&"Punteggio totale: 42 punti".to_string()));
    }

    #[test]
    fn test_school_standard_end_to_end() {
        let doc = format(&dante_quiz(), ExportTemplate::SchoolStandard, ExportOptions::default());
        let text = doc.to_text();

        assert!(text.contains("ISTITUTO COMPRENSIVO \"ALESSANDRO MANZONI\""));
        assert!(text.contains("Via dei Promessi Sposi, 25 - 20100 Milano (MI)"));
        assert!(text.contains("VERIFICA DI VERIFICA DANTE"));
        assert!(text.contains("Classe: 3°A                    Data: 15/3/2024"));

        let q1 = doc.lines.iter().position(|l| l == "DOMANDA 1 (5 punti)").unwrap();
        assert_eq!(doc.lines[q1 + 3], "   A) Beatrice");
        assert_eq!(doc.lines[q1 + 6], "   D) Caronte");
        assert_eq!(doc.lines[q1 + 8], "   Risposta: ____");

        let q2 = doc.lines.iter().position(|l| l == "DOMANDA 2 (15 punti)").unwrap();
        let blanks = doc.lines[q2..]
            .iter()
            .take_while(|l| !l.starts_with('═'))
            .filter(|l| **l == answer_line())
            .count();
        assert_eq!(blanks, 4);

        assert!(text.contains("PUNTEGGIO OTTENUTO: _____ / 20 punti"));
        assert!(text.ends_with(CREDIT_LINE));
        assert!(!text.contains("RISPOSTA CORRETTA"));
    }

    #[test]
    fn test_answers_marked_only_when_requested() {
        let options = ExportOptions::default().with_answers(true);
        let doc = format(&dante_quiz(), ExportTemplate::SchoolStandard, options);
        assert!(doc
            .lines
            .contains(&"   B) Virgilio ← RISPOSTA CORRETTA".to_string()));
        assert_eq!(
            doc.lines.iter().filter(|l| l.contains("RISPOSTA CORRETTA")).count(),
            1
        );
    }

    #[test]
    fn test_points_hidden_when_disabled() {
        let options = ExportOptions::default().with_points(false);
        let doc = format(&dante_quiz(), ExportTemplate::SchoolStandard, options);
        let text = doc.to_text();
        assert!(text.contains("DOMANDA 1\n"));
        assert!(!text.contains("PUNTEGGIO OTTENUTO"));
        assert!(!text.contains("Punteggio totale"));
    }

    #[test]
    fn test_compact_templates_truncate() {
        let long_text = "a".repeat(130);
        let long_option = "b".repeat(70);
        let quiz = QuizContent {
            questions: vec![
                Question::multiple_choice("1", long_text.clone(), [long_option.clone()], 0, 1),
                Question::open("2", "Breve", 1),
            ],
            ..dante_quiz()
        };

        let doc = format(&quiz, ExportTemplate::QuizCompact, ExportOptions::default());
        assert!(doc.lines.contains(&format!("{}...", "a".repeat(100))));
        assert!(doc.lines.contains(&format!("   A) {}...", "b".repeat(50))));
        assert_eq!(doc.lines.iter().filter(|l| **l == answer_line()).count(), 3);

        let doc = format(&quiz, ExportTemplate::ExamGrid, ExportOptions::default());
        assert!(doc.lines.contains(&long_text));
        assert!(doc.lines.contains(&format!("   A) {}", long_option)));
    }

    #[test]
    fn test_template_headers() {
        let quiz = dante_quiz();

        let doc = format(&quiz, ExportTemplate::UniversityFormal, ExportOptions::default());
        assert!(doc.lines.contains(&"ESAME DI VERIFICA DANTE".to_string()));
        assert!(doc.lines.contains(&"Anno Accademico 2024/2025".to_string()));

        let doc = format(&quiz, ExportTemplate::ExamGrid, ExportOptions::default());
        assert!(doc.to_text().contains("PROVA D'ESAME UFFICIALE"));
        assert!(doc.to_text().contains("TOTALE ___/25"));

        let doc = format(&quiz, ExportTemplate::Minimalist, ExportOptions::default());
        assert_eq!(doc.lines[0], "VERIFICA DANTE");
        assert_eq!(doc.lines[1], "15/3/2024    Tempo: 60 min");

        let doc = format(&quiz, ExportTemplate::QuizCompact, ExportOptions::default());
        assert!(doc.to_text().contains("🎯 20 pt"));
    }

    #[test]
    fn test_school_date_wins_over_clock() {
        let school = SchoolInfo {
            date: Some("1 aprile".to_string()),
            teacher_name: Some("Prof. Rossi".to_string()),
            ..SchoolInfo::default()
        };
        let doc = format_quiz(
            &dante_quiz(),
            ExportTemplate::SchoolStandard,
            &school,
            ExportOptions::default(),
            &clock(),
        );
        let text = doc.to_text();
        assert!(text.contains("Data: 1 aprile"));
        assert!(text.contains("Docente: Prof. Rossi    Firma:"));
    }

    #[test]
    fn test_instructions_block_skipped_without_instructions() {
        let mut quiz = dante_quiz();
        quiz.instructions = None;
        let doc = format(&quiz, ExportTemplate::SchoolStandard, ExportOptions::default());
        assert!(!doc.to_text().contains("ISTRUZIONI"));
    }

    #[test]
    fn test_rich_content_and_true_false() {
        let mut tf = Question::open("3", "La Terra è piatta.", 2);
        tf.question_type = QuestionType::TrueFalse;
        tf.correct_answer = Some(CorrectAnswer::Text("falso".into()));
        tf.rich_content = Some(vec![
            RichContent::Latex {
                id: "r1".into(),
                content: r"x^{2} = \frac{1}{2}".into(),
            },
            RichContent::Image {
                id: "r2".into(),
                content: "data:image/png;base64,AAAA".into(),
            },
        ]);
        let quiz = QuizContent {
            questions: vec![tf],
            ..dante_quiz()
        };

        let doc = format(&quiz, ExportTemplate::SchoolStandard, ExportOptions::default().with_answers(true));
        assert!(doc.lines.contains(&"   x² = 1/2".to_string()));
        assert!(doc.lines.contains(&"   [immagine]".to_string()));
        assert!(doc
            .lines
            .contains(&"   Risposta:  Vero / Falso ← RISPOSTA CORRETTA: Falso".to_string()));
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let quiz = dante_quiz();
        for template in ExportTemplate::ALL {
            let a = format(&quiz, template, ExportOptions::default()).to_text();
            let b = format(&quiz, template, ExportOptions::default()).to_text();
            assert_eq!(a, b);
        }
    }
}
