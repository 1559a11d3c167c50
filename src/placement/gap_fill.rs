use rand::Rng;
use tracing::warn;

use super::{Board, Layout, PlacementExercise, PlacementRules};
use crate::shuffle::shuffle_unsolved_with;

/// The token marking a gap in a gap-fill sentence.
pub const GAP_MARKER: &str = "___";

/// A piece of a gap-fill sentence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SentencePart {
    /// Plain text between gaps.
    Text(String),

    /// A gap, numbered from 0 in reading order.
    Gap(usize),
}

/// Splits a sentence at every [`GAP_MARKER`]. Empty text between adjacent gaps is dropped.
pub fn parse_sentence(sentence: &str) -> Vec<SentencePart> {
    let segments: Vec<&str> = sentence.split(GAP_MARKER).collect();
    let mut parts = Vec::with_capacity(segments.len() * 2);

    for (index, segment) in segments.iter().enumerate() {
        if !segment.is_empty() {
            parts.push(SentencePart::Text(segment.to_string()));
        }
        if index + 1 < segments.len() {
            parts.push(SentencePart::Gap(index));
        }
    }

    parts
}

/// A word in the gap-fill word bank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordTile {
    /// Stable identifier, `answer-N` or `distractor-N`.
    pub id: String,

    /// The word.
    pub text: String,

    /// The gap this word was listed as the answer for; [`None`] for distractors.
    pub answer_for: Option<usize>,
}

/// Gap-fill: gaps are the slots, answers plus distractors are the items.
///
/// A gap is filled correctly by any word whose text equals that gap's answer, so repeated
/// words are interchangeable.
#[derive(Clone, Debug, Default)]
pub struct GapFillRules {
    parts: Vec<SentencePart>,
    gap_count: usize,
    answers: Vec<String>,
    words: Vec<WordTile>,
}

impl GapFillRules {
    /// Rules for `sentence`, whose gaps are filled by `answers` in order.
    pub fn new(sentence: &str, answers: Vec<String>, distractors: Vec<String>) -> Self {
        let parts = parse_sentence(sentence);
        let gap_count = parts
            .iter()
            .filter(|part| matches!(part, SentencePart::Gap(_)))
            .count();

        if gap_count != answers.len() {
            warn!(
                gaps = gap_count,
                answers = answers.len(),
                "gap-fill sentence and answers disagree"
            );
        }

        let answer_tiles = answers.iter().enumerate().map(|(index, text)| WordTile {
            id: format!("answer-{}", index),
            text: text.clone(),
            answer_for: Some(index),
        });
        let distractor_tiles = distractors.into_iter().enumerate().map(|(index, text)| WordTile {
            id: format!("distractor-{}", index),
            text,
            answer_for: None,
        });
        let words = answer_tiles.chain(distractor_tiles).collect();

        Self {
            parts,
            gap_count,
            answers,
            words,
        }
    }

    /// The sentence split into text and gaps.
    pub fn parts(&self) -> &[SentencePart] {
        &self.parts
    }

    /// All word tiles, answers first.
    pub fn words(&self) -> &[WordTile] {
        &self.words
    }

    /// The expected answer of a gap.
    pub fn answer(&self, gap: usize) -> Option<&str> {
        self.answers.get(gap).map(String::as_str)
    }
}

impl PlacementRules for GapFillRules {
    const KIND: &'static str = "gap-fill";

    fn item_count(&self) -> usize {
        self.words.len()
    }

    fn slot_count(&self) -> usize {
        self.gap_count
    }

    fn is_correct(&self, slot: usize, item: usize) -> bool {
        match (self.answer(slot), self.words.get(item)) {
            (Some(answer), Some(word)) => word.text == answer,
            _ => false,
        }
    }

    fn layout<R: Rng + ?Sized>(&self, rng: &mut R) -> Layout {
        let items: Vec<usize> = (0..self.words.len()).collect();

        Layout {
            board: Board::new(
                shuffle_unsolved_with(&items, |&item| &self.words[item].id, rng),
                self.gap_count,
            ),
            slot_order: (0..self.gap_count).collect(),
        }
    }
}

/// A gap-fill exercise.
pub type GapFill = PlacementExercise<GapFillRules>;

impl GapFill {
    /// Sets up a gap-fill exercise with a shuffled word bank.
    pub fn from_sentence(sentence: &str, answers: Vec<String>, distractors: Vec<String>) -> Self {
        Self::new(GapFillRules::new(sentence, answers, distractors))
    }

    /// The sentence split into text and gaps.
    pub fn parts(&self) -> &[SentencePart] {
        self.rules().parts()
    }

    /// The word placed in a gap.
    pub fn word_in_gap(&self, gap: usize) -> Option<&WordTile> {
        let item = self.board().occupant(gap)?;
        self.rules().words().get(item)
    }

    /// Clicking a gap: with a word selected, the word goes in (replacing any occupant);
    /// without one, a filled gap is emptied.
    pub fn click_gap(&mut self, gap: usize) -> bool {
        if self.selected().is_some() {
            return self.target(gap);
        }

        match self.board().occupant(gap) {
            Some(item) => self.return_to_pool(item),
            None => false,
        }
    }

    /// The sentence with the placed words filled in and `___` left in empty gaps.
    pub fn filled_sentence(&self) -> String {
        self.parts()
            .iter()
            .map(|part| match part {
                SentencePart::Text(text) => text.as_str(),
                SentencePart::Gap(gap) => self
                    .word_in_gap(*gap)
                    .map_or(GAP_MARKER, |word| word.text.as_str()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Completion;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    fn exercise() -> GapFill {
        GapFill::from_sentence(
            "Use ___ to show text and ___ to read it.",
            strings(&["print", "input"]),
            strings(&["len"]),
        )
    }

    fn item(exercise: &GapFill, text: &str) -> usize {
        exercise
            .rules()
            .words()
            .iter()
            .position(|word| word.text == text)
            .unwrap()
    }

    #[test]
    fn sentence_parts() {
        assert_eq!(
            parse_sentence("a ___ b ___"),
            vec![
                SentencePart::Text("a ".into()),
                SentencePart::Gap(0),
                SentencePart::Text(" b ".into()),
                SentencePart::Gap(1),
            ]
        );
        assert_eq!(
            parse_sentence("______"),
            vec![SentencePart::Gap(0), SentencePart::Gap(1)]
        );
        assert!(parse_sentence("").is_empty());
    }

    #[test]
    fn word_bank_is_shuffled_and_complete() {
        let exercise = exercise();

        assert_eq!(exercise.board().slot_count(), 2);
        assert_eq!(exercise.board().pool().len(), 3);
        assert_ne!(exercise.board().pool(), &[0, 1, 2]);
    }

    #[test]
    fn distractors_may_stay_in_the_bank() {
        let mut exercise = exercise();
        let print = item(&exercise, "print");
        let input = item(&exercise, "input");

        exercise.select(print);
        exercise.click_gap(0);
        assert!(!exercise.can_check());

        exercise.select(input);
        exercise.click_gap(1);
        assert_eq!(exercise.filled_sentence(), "Use print to show text and input to read it.");
        assert_eq!(
            exercise.check_answers(),
            Some(Completion {
                is_correct: true,
                correct: 2,
                total: 2
            })
        );
    }

    #[test]
    fn distractor_in_a_gap_is_wrong() {
        let mut exercise = exercise();
        let len = item(&exercise, "len");
        let input = item(&exercise, "input");

        exercise.place(len, 0);
        exercise.place(input, 1);

        let completion = exercise.check_answers().unwrap();
        assert_eq!((completion.correct, completion.total), (1, 2));
        assert_eq!(exercise.results(), Some(&[false, true][..]));
    }

    #[test]
    fn repeated_answers_are_interchangeable() {
        let mut exercise = GapFill::from_sentence("___ and ___", strings(&["if", "if"]), Vec::new());

        exercise.place(1, 0);
        exercise.place(0, 1);
        assert!(exercise.check_answers().unwrap().is_correct);
    }

    #[test]
    fn clicking_a_filled_gap_empties_it() {
        let mut exercise = exercise();
        let print = item(&exercise, "print");

        exercise.place(print, 0);
        assert!(exercise.click_gap(0));
        assert_eq!(exercise.word_in_gap(0), None);
        assert!(!exercise.click_gap(0));
        assert_eq!(exercise.filled_sentence(), "Use ___ to show text and ___ to read it.");
    }

    #[test]
    fn gaps_without_words_cannot_be_checked() {
        let mut exercise = GapFill::from_sentence("___", Vec::new(), Vec::new());
        assert_eq!(exercise.check_answers(), None);
    }
}
