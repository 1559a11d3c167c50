use std::time::Duration;

use lesson_exercises::crossword::Key;
use lesson_exercises::{config, Carousel, CarouselEvent, Exercise};

const LESSON: &str = r#"[
    {
        "id": 1,
        "type": "CROSSWORD",
        "title": "Python words",
        "ordering": 1,
        "config": {
            "words": [
                {"id": "print", "word": "PRINT", "clue": "Shows text", "row": 0, "col": 0, "direction": "across"},
                {"id": "python", "word": "PYTHON", "clue": "A language", "row": 0, "col": 0, "direction": "down"},
                {"id": "input", "word": "INPUT", "clue": "Reads text", "row": 0, "col": 2, "direction": "down"}
            ]
        }
    },
    {
        "id": 2,
        "type": "password",
        "ordering": 2,
        "config": "{\"minStrength\": 80}"
    }
]"#;

fn main() -> Result<(), lesson_exercises::Error> {
    let lesson = config::parse_lesson(LESSON)?;
    let mut carousel = Carousel::from_lesson(&lesson)?;

    if let Some(Exercise::Crossword(crossword)) = carousel.exercise_mut(0) {
        println!("{}", crossword.grid());

        for answer in ["PRINT", "PYTHON", "INPUT"] {
            crossword.key(Key::Tab);
            for letter in answer.chars() {
                crossword.key(Key::Letter(letter));
            }
        }

        println!("{}", crossword.grid());
    }
    carousel.check(0, Duration::ZERO);

    if let Some(Exercise::Password(password)) = carousel.exercise_mut(1) {
        for attempt in ["password", "Summer2024", "Summer2024!lake"] {
            password.set_password(attempt);
            println!(
                "{:<16} strength {:>3}  {:?}",
                attempt,
                password.strength().score(),
                password.crack_time()
            );
        }
    }
    carousel.sync(Duration::from_millis(100));

    for event in carousel.tick(Duration::from_secs(2)) {
        match event {
            CarouselEvent::Advanced { index } => println!("moved to {}", carousel.info()[index].title),
            CarouselEvent::AllComplete {
                total_score,
                total_possible,
            } => println!("lesson complete: {} of {}", total_score, total_possible),
        }
    }

    Ok(())
}
