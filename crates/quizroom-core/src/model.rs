//! Question bank types.
//!
//! A [`Challenge`] is the static definition of one assessment run: an ordered
//! list of pages ("rooms"), each holding an ordered list of questions. It is
//! validated on construction and immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier for this question.
    pub id: String,
    /// The text shown to the user.
    pub prompt: String,
    /// Options in display order.
    pub options: Vec<String>,
    /// The one correct option.
    pub correct_answer: String,
    /// Shown after answering.
    #[serde(default)]
    pub explanation: String,
    /// Short learning takeaway, repeated on the page summary.
    #[serde(default)]
    pub takeaway: String,
    /// Optional clue shown alongside the question.
    #[serde(default)]
    pub hint: Option<String>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options,
            correct_answer: correct_answer.into(),
            explanation: String::new(),
            takeaway: String::new(),
            hint: None,
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    #[must_use]
    pub fn with_takeaway(mut self, takeaway: impl Into<String>) -> Self {
        self.takeaway = takeaway.into();
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Exact, case-sensitive comparison against the correct answer.
    ///
    /// No trimming or normalisation is applied: `"a"` and `"A "` are both
    /// wrong when the answer is `"A"`.
    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_answer
    }

    pub(crate) fn check(&self) -> Result<(), ConfigError> {
        if self.options.is_empty() {
            return Err(ConfigError::NoOptions {
                question: self.id.clone(),
            });
        }
        if !self.options.contains(&self.correct_answer) {
            return Err(ConfigError::AnswerNotInOptions {
                question: self.id.clone(),
                answer: self.correct_answer.clone(),
            });
        }
        Ok(())
    }
}

/// One room of the challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
}

impl Page {
    pub fn new(id: impl Into<String>, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            questions,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// The full, validated definition of one assessment run.
///
/// Only constructible through [`Challenge::new`], so every value of this type
/// has at least one page, every page has at least one question, and every
/// correct answer is among its question's options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Challenge {
    pages: Vec<Page>,
    total_questions: usize,
}

impl Challenge {
    pub fn new(pages: Vec<Page>) -> Result<Self, ConfigError> {
        if pages.is_empty() {
            return Err(ConfigError::NoPages);
        }
        for page in &pages {
            if page.questions.is_empty() {
                return Err(ConfigError::EmptyPage {
                    page: page.id.clone(),
                });
            }
            for question in &page.questions {
                question.check()?;
            }
        }
        let total_questions = pages.iter().map(Page::question_count).sum();
        Ok(Self {
            pages,
            total_questions,
        })
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Sum of question counts over all pages. Never zero.
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    /// Iterate every question in display order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.pages.iter().flat_map(|p| p.questions.iter())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn question(id: &str, answer: &str) -> Question {
        Question::new(
            id,
            format!("Prompt for {id}?"),
            vec!["A".into(), "B".into(), "C".into(), "X".into()],
            answer,
        )
        .with_explanation(format!("Because {answer}."))
        .with_takeaway(format!("Takeaway {id}"))
    }

    /// One page, two questions answered "A" then "B".
    pub fn two_question_challenge() -> Challenge {
        Challenge::new(vec![Page::new(
            "page-1",
            "Formation Lab",
            vec![question("q1", "A"), question("q2", "B")],
        )])
        .unwrap()
    }

    /// `sizes[i]` questions on page `i`, every answer "A".
    pub fn challenge_with(sizes: &[usize]) -> Challenge {
        let pages = sizes
            .iter()
            .enumerate()
            .map(|(p, &n)| {
                let questions = (0..n)
                    .map(|q| question(&format!("p{p}-q{q}"), "A"))
                    .collect();
                Page::new(format!("page-{p}"), format!("Room {p}"), questions)
            })
            .collect();
        Challenge::new(pages).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn correctness_is_exact() {
        let q = question("q1", "A");
        assert!(q.is_correct("A"));
        assert!(!q.is_correct("a"));
        assert!(!q.is_correct(" A"));
        assert!(!q.is_correct("A "));
        assert!(!q.is_correct(""));
    }

    #[test]
    fn rejects_empty_challenge() {
        assert_eq!(Challenge::new(vec![]), Err(ConfigError::NoPages));
    }

    #[test]
    fn rejects_empty_page() {
        let err = Challenge::new(vec![Page::new("empty", "Empty", vec![])]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyPage {
                page: "empty".into()
            }
        );
    }

    #[test]
    fn rejects_answer_outside_options() {
        let bad = Question::new("q1", "?", vec!["A".into(), "B".into()], "C");
        let err = Challenge::new(vec![Page::new("p", "P", vec![bad])]).unwrap_err();
        assert!(matches!(err, ConfigError::AnswerNotInOptions { .. }));
    }

    #[test]
    fn rejects_question_without_options() {
        let bad = Question::new("q1", "?", vec![], "C");
        let err = Challenge::new(vec![Page::new("p", "P", vec![bad])]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NoOptions {
                question: "q1".into()
            }
        );
    }

    #[test]
    fn totals_span_all_pages() {
        let challenge = challenge_with(&[5, 3, 2]);
        assert_eq!(challenge.page_count(), 3);
        assert_eq!(challenge.total_questions(), 10);
        assert_eq!(challenge.questions().count(), 10);
        assert_eq!(challenge.page(1).unwrap().question_count(), 3);
        assert!(challenge.page(3).is_none());
    }
}
