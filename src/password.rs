//! The password-strength exercise: the student types passwords and watches a rule table
//! score them until one is strong enough.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::Completion;

/// Characters counted as special.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Words that make a password easy to guess, matched case-insensitively anywhere in it.
pub const COMMON_WORDS: [&str; 5] = ["heslo", "password", "123456", "qwerty", "admin"];

/// Brute-force speed the crack-time estimate assumes, in guesses per second.
pub const GUESSES_PER_SECOND: f64 = 10_000_000_000.0;

/// One line of the strength table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    /// At least 8 characters.
    MinLength8,
    /// At least 12 characters.
    MinLength12,
    /// Contains `a-z`.
    Lowercase,
    /// Contains `A-Z`.
    Uppercase,
    /// Contains `0-9`.
    Digit,
    /// Contains one of [`SPECIAL_CHARACTERS`].
    Special,
    /// Is not empty and contains none of [`COMMON_WORDS`].
    NoCommonWord,
}

impl Rule {
    /// Every rule, in table order.
    pub const ALL: [Rule; 7] = [
        Rule::MinLength8,
        Rule::MinLength12,
        Rule::Lowercase,
        Rule::Uppercase,
        Rule::Digit,
        Rule::Special,
        Rule::NoCommonWord,
    ];

    /// What passing the rule is worth.
    pub fn points(self) -> u32 {
        match self {
            Rule::MinLength8 => 5,
            Rule::MinLength12 => 10,
            Rule::Lowercase | Rule::Uppercase => 15,
            Rule::Digit => 20,
            Rule::Special => 25,
            Rule::NoCommonWord => 10,
        }
    }

    /// Whether `password` passes the rule.
    pub fn passes(self, password: &str) -> bool {
        match self {
            Rule::MinLength8 => password.chars().count() >= 8,
            Rule::MinLength12 => password.chars().count() >= 12,
            Rule::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            Rule::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            Rule::Digit => password.chars().any(|c| c.is_ascii_digit()),
            Rule::Special => password.chars().any(is_special),
            Rule::NoCommonWord => {
                let lowered = password.to_lowercase();
                !password.is_empty() && !COMMON_WORDS.iter().any(|word| lowered.contains(word))
            }
        }
    }
}

fn is_special(c: char) -> bool {
    SPECIAL_CHARACTERS.contains(c)
}

/// A rule applied to a password.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Check {
    /// The rule.
    pub rule: Rule,
    /// Whether the password passed it.
    pub passed: bool,
}

/// Coarse strength labels for the meter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Nothing typed yet.
    Empty,
    /// Below 30.
    VeryWeak,
    /// Below 50.
    Weak,
    /// Below 70.
    Fair,
    /// Below 90.
    Strong,
    /// 90 and up.
    VeryStrong,
}

impl Level {
    /// The label for a strength score.
    pub fn of(strength: u32) -> Self {
        match strength {
            0 => Level::Empty,
            1..=29 => Level::VeryWeak,
            30..=49 => Level::Weak,
            50..=69 => Level::Fair,
            70..=89 => Level::Strong,
            _ => Level::VeryStrong,
        }
    }
}

/// The rule table applied to one password.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Strength {
    checks: Vec<Check>,
}

impl Strength {
    /// Applies every rule to `password`.
    pub fn analyze(password: &str) -> Self {
        Self {
            checks: Rule::ALL
                .iter()
                .map(|&rule| Check {
                    rule,
                    passed: rule.passes(password),
                })
                .collect(),
        }
    }

    /// The individual checks, in table order.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Points of every passed rule, capped at 100.
    pub fn score(&self) -> u32 {
        self.checks
            .iter()
            .filter(|check| check.passed)
            .map(|check| check.rule.points())
            .sum::<u32>()
            .min(100)
    }

    /// The meter label.
    pub fn level(&self) -> Level {
        Level::of(self.score())
    }
}

/// Roughly how long an average brute-force attack would take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CrackTime {
    /// Under a second.
    Instant,
    /// Whole seconds.
    Seconds(u64),
    /// Whole minutes.
    Minutes(u64),
    /// Whole hours.
    Hours(u64),
    /// Whole days.
    Days(u64),
    /// Whole 30-day months.
    Months(u64),
    /// Whole years, below a thousand.
    Years(u64),
    /// Thousands of years.
    Millennia,
    /// Millions of years.
    MillionsOfYears,
    /// Billions of years and beyond.
    BillionsOfYears,
}

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3_600.0;
const DAY: f64 = 86_400.0;
const MONTH: f64 = 2_592_000.0;
const YEAR: f64 = 31_536_000.0;

impl CrackTime {
    /// Estimates the attack time from the character classes used and the length. An
    /// empty password gets no estimate.
    pub fn estimate(password: &str) -> Option<Self> {
        if password.is_empty() {
            return None;
        }

        let charset: u32 = [
            (Rule::Lowercase, 26),
            (Rule::Uppercase, 26),
            (Rule::Digit, 10),
            (Rule::Special, 32),
        ]
        .iter()
        .filter(|(rule, _)| rule.passes(password))
        .map(|&(_, size)| size)
        .sum();
        if charset == 0 {
            return Some(CrackTime::Instant);
        }

        let length = i32::try_from(password.chars().count()).unwrap_or(i32::MAX);
        let combinations = f64::from(charset).powi(length);
        Some(Self::from_seconds(combinations / GUESSES_PER_SECOND / 2.0))
    }

    /// Buckets a duration in seconds.
    pub fn from_seconds(seconds: f64) -> Self {
        let whole = |unit: f64| (seconds / unit).round() as u64;

        if seconds < 1.0 {
            CrackTime::Instant
        } else if seconds < MINUTE {
            CrackTime::Seconds(whole(1.0))
        } else if seconds < HOUR {
            CrackTime::Minutes(whole(MINUTE))
        } else if seconds < DAY {
            CrackTime::Hours(whole(HOUR))
        } else if seconds < MONTH {
            CrackTime::Days(whole(DAY))
        } else if seconds < YEAR {
            CrackTime::Months(whole(MONTH))
        } else if seconds < YEAR * 1e3 {
            CrackTime::Years(whole(YEAR))
        } else if seconds < YEAR * 1e6 {
            CrackTime::Millennia
        } else if seconds < YEAR * 1e9 {
            CrackTime::MillionsOfYears
        } else {
            CrackTime::BillionsOfYears
        }
    }
}

fn default_min_strength() -> u32 {
    60
}

fn default_true() -> bool {
    true
}

/// Configuration of a password exercise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordConfig {
    /// Strength needed to pass.
    #[serde(default = "default_min_strength")]
    pub min_strength: u32,

    /// Whether the crack-time estimate is shown.
    #[serde(default = "default_true")]
    pub show_hack_time: bool,

    /// Whether the rule table is shown.
    #[serde(default = "default_true")]
    pub show_tips: bool,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_strength: default_min_strength(),
            show_hack_time: true,
            show_tips: true,
        }
    }
}

/// A password exercise.
#[derive(Clone, Debug, Default)]
pub struct PasswordExercise {
    config: PasswordConfig,
    password: String,
    completion: Option<Completion>,
}

impl PasswordExercise {
    /// Creates the exercise.
    pub fn new(config: PasswordConfig) -> Self {
        Self {
            config,
            password: String::new(),
            completion: None,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &PasswordConfig {
        &self.config
    }

    /// The password typed so far.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// The rule table for the current password.
    pub fn strength(&self) -> Strength {
        Strength::analyze(&self.password)
    }

    /// The crack-time estimate for the current password.
    pub fn crack_time(&self) -> Option<CrackTime> {
        CrackTime::estimate(&self.password)
    }

    /// Whether a strong enough password was typed. The student may keep typing.
    pub fn is_locked(&self) -> bool {
        self.completion.is_some()
    }

    /// The completion, once earned.
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    /// Replaces the password. Returns the completion the first time the strength
    /// reaches the configured minimum.
    pub fn set_password(&mut self, password: impl Into<String>) -> Option<Completion> {
        self.password = password.into();

        if self.is_locked() {
            return None;
        }

        let strength = self.strength().score();
        if strength < self.config.min_strength {
            return None;
        }

        let completion = Completion {
            is_correct: true,
            correct: 1,
            total: 1,
        };
        self.completion = Some(completion);
        info!(strength, "password strong enough");

        Some(completion)
    }

    /// Clears the password. Unavailable once passed.
    pub fn reset(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }

        self.password.clear();
        true
    }
}
