//! Yes-or-no scenario quizzes about online safety: spotting phishing emails, deciding what
//! is safe to share, and telling safe links from fake ones.
//!
//! All three share one state machine, [`Quiz`]. The student answers each scenario once,
//! moves on, and after the last one passes when enough answers were right.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::null_as_empty;
use crate::{Completion, Score};

/// A question with a yes-or-no answer.
pub trait Scenario {
    /// Name used in logs.
    const KIND: &'static str;

    /// Share of right answers needed to pass, in percent, when the lesson sets none.
    const PASS_PERCENT: usize;

    /// Identifier within the quiz.
    fn id(&self) -> &str;

    /// The right answer.
    fn answer(&self) -> bool;
}

/// An email to judge. The right answer is whether it is phishing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhishingEmail {
    /// Identifier.
    pub id: String,
    /// Sender address.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Whether the email is a scam.
    pub is_phishing: bool,
    /// What gives a scam away.
    #[serde(deserialize_with = "null_as_empty")]
    pub red_flags: Vec<String>,
}

impl Scenario for PhishingEmail {
    const KIND: &'static str = "phishing";
    const PASS_PERCENT: usize = 100;

    fn id(&self) -> &str {
        &self.id
    }

    fn answer(&self) -> bool {
        self.is_phishing
    }
}

/// The kind of personal information in a privacy question.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyCategory {
    /// Facts about the student.
    #[default]
    Personal,
    /// Where the student lives or goes.
    Location,
    /// Money and cards.
    Financial,
    /// Hobbies and tastes.
    Social,
}

/// A piece of information to judge. The right answer is whether it is safe to share.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacyItem {
    /// Identifier.
    pub id: String,
    /// The information.
    pub text: String,
    /// Whether sharing it online is fine.
    pub is_safe_to_share: bool,
    /// Shown after answering.
    pub explanation: String,
    /// What kind of information it is.
    pub category: PrivacyCategory,
}

impl Scenario for PrivacyItem {
    const KIND: &'static str = "privacy";
    const PASS_PERCENT: usize = 80;

    fn id(&self) -> &str {
        &self.id
    }

    fn answer(&self) -> bool {
        self.is_safe_to_share
    }
}

/// A link to judge. The right answer is whether it is safe to open.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UrlQuestion {
    /// Identifier.
    pub id: String,
    /// The link.
    pub url: String,
    /// Whether it is genuine.
    pub is_safe: bool,
    /// Shown after answering.
    pub explanation: String,
    /// What gives a fake away.
    #[serde(deserialize_with = "null_as_empty")]
    pub red_flags: Vec<String>,
}

impl Scenario for UrlQuestion {
    const KIND: &'static str = "url safety";
    const PASS_PERCENT: usize = 80;

    fn id(&self) -> &str {
        &self.id
    }

    fn answer(&self) -> bool {
        self.is_safe
    }
}

/// Configuration of a phishing quiz.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhishingConfig {
    /// The emails.
    #[serde(deserialize_with = "null_as_empty")]
    pub emails: Vec<PhishingEmail>,
    /// Right answers needed to pass; every one when unset.
    pub required_correct: Option<usize>,
}

/// Configuration of a privacy quiz.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacyConfig {
    /// The pieces of information.
    #[serde(deserialize_with = "null_as_empty")]
    pub items: Vec<PrivacyItem>,
    /// Right answers needed to pass; 80 % rounded up when unset.
    pub required_correct: Option<usize>,
}

/// Configuration of a link-safety quiz.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UrlSafetyConfig {
    /// The links.
    #[serde(deserialize_with = "null_as_empty")]
    pub urls: Vec<UrlQuestion>,
    /// Right answers needed to pass; 80 % rounded up when unset.
    pub required_correct: Option<usize>,
}

/// A quiz in progress.
#[derive(Clone, Debug)]
pub struct Quiz<S> {
    questions: Vec<S>,
    required: usize,
    current: usize,
    choices: Vec<Option<bool>>,
    finished: bool,
    completion: Option<Completion>,
}

/// A phishing quiz.
pub type PhishingQuiz = Quiz<PhishingEmail>;

/// A privacy quiz.
pub type PrivacyQuiz = Quiz<PrivacyItem>;

/// A link-safety quiz.
pub type UrlSafetyQuiz = Quiz<UrlQuestion>;

impl<S: Scenario> Default for Quiz<S> {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl<S: Scenario> Quiz<S> {
    /// Starts a quiz on its first question. A missing or zero requirement falls back to
    /// [`Scenario::PASS_PERCENT`] of the questions, rounded up.
    pub fn new(questions: Vec<S>, required_correct: Option<usize>) -> Self {
        let required = required_correct
            .filter(|&required| required > 0)
            .unwrap_or_else(|| (questions.len() * S::PASS_PERCENT + 99) / 100)
            .min(questions.len());

        Self {
            choices: vec![None; questions.len()],
            questions,
            required,
            current: 0,
            finished: false,
            completion: None,
        }
    }

    /// All questions.
    pub fn questions(&self) -> &[S] {
        &self.questions
    }

    /// The index of the question on screen.
    pub fn current(&self) -> usize {
        self.current
    }

    /// The question on screen.
    pub fn question(&self) -> Option<&S> {
        self.questions.get(self.current)
    }

    /// Right answers needed to pass.
    pub fn required(&self) -> usize {
        self.required
    }

    /// The student's answer to a question.
    pub fn choice(&self, index: usize) -> Option<bool> {
        self.choices.get(index).copied().flatten()
    }

    /// Whether the student's answer to a question was right, once answered.
    pub fn is_right(&self, index: usize) -> Option<bool> {
        let choice = self.choice(index)?;
        Some(choice == self.questions.get(index)?.answer())
    }

    /// Questions answered so far.
    pub fn answered_count(&self) -> usize {
        self.choices.iter().flatten().count()
    }

    /// Right answers so far.
    pub fn correct_count(&self) -> usize {
        (0..self.questions.len())
            .filter(|&index| self.is_right(index) == Some(true))
            .count()
    }

    /// Right answers out of all questions.
    pub fn score(&self) -> Score {
        Score::new(self.correct_count(), self.questions.len())
    }

    /// Whether the last question was left behind.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the quiz was passed.
    pub fn is_locked(&self) -> bool {
        self.completion.is_some()
    }

    /// The completion, once passed.
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    /// Answers the question on screen. Each question takes one answer. Returns whether it
    /// was right.
    pub fn answer(&mut self, choice: bool) -> Option<bool> {
        if self.finished {
            return None;
        }

        let slot = self.choices.get_mut(self.current)?;
        if slot.is_some() {
            return None;
        }
        *slot = Some(choice);

        let right = self.is_right(self.current);
        debug!(kind = S::KIND, question = self.current, ?right, "quiz answered");
        right
    }

    /// Moves past an answered question. Leaving the last one finishes the quiz and returns
    /// the completion when enough answers were right.
    pub fn next(&mut self) -> Option<Completion> {
        if self.finished || (!self.questions.is_empty() && self.choice(self.current).is_none()) {
            return None;
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            return None;
        }

        self.finished = true;
        let score = self.score();
        if score.correct < self.required {
            debug!(kind = S::KIND, correct = score.correct, required = self.required, "quiz failed");
            return None;
        }

        let completion: Completion = score.into();
        self.completion = Some(completion);
        info!(kind = S::KIND, correct = score.correct, total = score.total, "quiz passed");

        Some(completion)
    }

    /// Clears every answer and starts over. Unavailable once passed.
    pub fn reset(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }

        self.choices.iter_mut().for_each(|choice| *choice = None);
        self.current = 0;
        self.finished = false;
        true
    }
}

impl PhishingQuiz {
    /// Sets up a phishing quiz.
    pub fn from_config(config: PhishingConfig) -> Self {
        Self::new(config.emails, config.required_correct)
    }
}

impl PrivacyQuiz {
    /// Sets up a privacy quiz.
    pub fn from_config(config: PrivacyConfig) -> Self {
        Self::new(config.items, config.required_correct)
    }
}

impl UrlSafetyQuiz {
    /// Sets up a link-safety quiz.
    pub fn from_config(config: UrlSafetyConfig) -> Self {
        Self::new(config.urls, config.required_correct)
    }
}
