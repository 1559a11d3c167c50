use std::time::Duration;

use lesson_exercises::config::parse_lesson;
use lesson_exercises::crossword::Key;
use lesson_exercises::{Carousel, CarouselEvent, Exercise, Score};
use rand::{rngs::StdRng, SeedableRng};

const LESSON: &str = r#"[
    {
        "id": 12,
        "type": "GAPFILL",
        "title": "Fill in",
        "ordering": 3,
        "config": "{\"sentence\": \"___ shows text, ___ reads it.\", \"answers\": [\"print\", \"input\"], \"distractors\": [\"len\"]}"
    },
    {
        "id": 10,
        "type": "Crossword",
        "title": "Warm-up",
        "ordering": 1,
        "config": {
            "words": [
                {"id": "a", "word": "BIT", "clue": "0 or 1", "row": 0, "col": 0, "direction": "across"},
                {"id": "b", "word": "BYTE", "clue": "8 bits", "row": 0, "col": 0, "direction": "down"}
            ]
        }
    },
    {
        "id": 11,
        "type": "matching",
        "title": null,
        "ordering": 2,
        "config": {
            "pairs": [
                {"id": "1", "left": "CPU", "right": "computes"},
                {"id": "2", "left": "RAM", "right": "remembers"},
                {"id": "3", "left": "SSD", "right": "stores"}
            ]
        }
    }
]"#;

fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

fn carousel() -> Carousel {
    let lesson = parse_lesson(LESSON).unwrap();
    Carousel::from_lesson_with(&lesson, &mut StdRng::seed_from_u64(7)).unwrap()
}

fn solve_crossword(carousel: &mut Carousel) {
    let Some(Exercise::Crossword(crossword)) = carousel.exercise_mut(0) else {
        panic!("the lesson starts with the crossword");
    };

    for answer in ["BIT", "BYTE"] {
        crossword.key(Key::Tab);
        for letter in answer.to_lowercase().chars() {
            crossword.key(Key::Letter(letter));
        }
    }
}

fn mismatch_two(carousel: &mut Carousel) {
    let Some(Exercise::Matching(matching)) = carousel.exercise_mut(1) else {
        panic!("matching comes second");
    };

    matching.place(0, 1);
    matching.place(1, 0);
    matching.place(2, 2);
}

fn fill_gaps(carousel: &mut Carousel) {
    let Some(Exercise::GapFill(gap_fill)) = carousel.exercise_mut(2) else {
        panic!("gap-fill comes last");
    };

    for (gap, text) in ["print", "input"].into_iter().enumerate() {
        let item = gap_fill
            .rules()
            .words()
            .iter()
            .position(|word| word.text == text)
            .unwrap();
        gap_fill.select(item);
        gap_fill.click_gap(gap);
    }
    assert_eq!(gap_fill.filled_sentence(), "print shows text, input reads it.");
}

#[test]
fn whole_lesson() {
    let mut carousel = carousel();

    let titles: Vec<&str> = carousel.info().iter().map(|info| info.title.as_str()).collect();
    assert_eq!(titles, vec!["Warm-up", "Exercise 2", "Fill in"]);

    solve_crossword(&mut carousel);
    let crossword = carousel.check(0, ms(0)).unwrap();
    assert_eq!(crossword.score(), Score::new(2, 2));
    assert_eq!(carousel.tick(ms(1500)), vec![CarouselEvent::Advanced { index: 1 }]);

    mismatch_two(&mut carousel);
    let matching = carousel.check(1, ms(2000)).unwrap();
    assert!(!matching.is_correct);
    assert_eq!(matching.score(), Score::new(1, 3));

    // two of three done: no total yet
    assert_eq!(carousel.tick(ms(3500)), vec![CarouselEvent::Advanced { index: 2 }]);
    assert_eq!(carousel.tick(ms(10_000)), Vec::new());

    fill_gaps(&mut carousel);
    carousel.check(2, ms(10_000)).unwrap();
    assert_eq!(
        carousel.tick(ms(10_500)),
        vec![CarouselEvent::AllComplete {
            total_score: 5,
            total_possible: 7
        }]
    );
    assert_eq!(carousel.tick(ms(60_000)), Vec::new());

    for index in 0..3 {
        let exercise = carousel.exercise_mut(index).unwrap();
        assert!(exercise.is_locked());
        assert!(!exercise.reset());
    }
}

#[test]
fn leaving_the_lesson_cancels_pending_work() {
    let mut carousel = carousel();

    solve_crossword(&mut carousel);
    carousel.check(0, ms(0));
    carousel.dispose();

    assert_eq!(carousel.tick(ms(5000)), Vec::new());
    assert_eq!(carousel.current(), 0);
    assert_eq!(carousel.completed_count(), 1);
}

#[test]
fn bad_lessons_are_rejected() {
    let unknown = r#"[{"id": 1, "type": "QUIZ", "config": null}]"#;
    let lesson = parse_lesson(unknown).unwrap();
    assert!(Carousel::from_lesson(&lesson).is_err());

    let malformed = r#"[{"id": 1, "type": "SORTING", "config": "{\"items\": "}]"#;
    let lesson = parse_lesson(malformed).unwrap();
    let err = Carousel::from_lesson(&lesson).unwrap_err();
    assert!(err.to_string().starts_with("Invalid configuration for SORTING exercise"));
}

#[test]
fn self_completing_exercises_are_picked_up() {
    use lesson_exercises::maze::Command::{Forward, TurnLeft};

    let lesson = parse_lesson(
        r#"[
            {"id": 1, "type": "MAZE", "ordering": 1, "config": {"requiredCompleted": 1}},
            {"id": 2, "type": "PHISHING", "ordering": 2, "config": {"emails": [
                {"id": "bank", "from": "support@banka.cz.fake-site.com", "isPhishing": true},
                {"id": "shop", "from": "info@shop.cz", "isPhishing": false}
            ], "requiredCorrect": null}}
        ]"#,
    )
    .unwrap();
    let mut carousel = Carousel::from_lesson(&lesson).unwrap();

    let Some(Exercise::Maze(maze)) = carousel.exercise_mut(0) else {
        panic!("the lesson starts with the maze");
    };
    for command in [Forward, Forward, TurnLeft, Forward, Forward] {
        maze.push(command);
    }
    maze.run();
    assert_eq!(carousel.sync(ms(0)), 1);
    assert_eq!(carousel.tick(ms(1500)), vec![CarouselEvent::Advanced { index: 1 }]);

    let Some(Exercise::Phishing(quiz)) = carousel.exercise_mut(1) else {
        panic!("the phishing quiz comes second");
    };
    quiz.answer(true);
    quiz.next();
    quiz.answer(false);
    assert!(quiz.next().is_some());

    assert_eq!(carousel.sync(ms(2000)), 1);
    assert_eq!(carousel.sync(ms(2100)), 0);
    assert_eq!(
        carousel.tick(ms(2500)),
        vec![CarouselEvent::AllComplete {
            total_score: 3,
            total_possible: 3
        }]
    );
}
