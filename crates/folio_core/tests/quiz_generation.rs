use folio_core::quiz::MAX_QUESTIONS;
use folio_core::{generate_quiz, QuizGenerator, RngShuffle, Tokenizer};

const SAMPLES: &[(&str, &str, &[&str])] = &[
    (
        "Django ORM tips",
        "Django ORM makes queries easy. Django ORM can also be slow.\nUse select_related wisely!",
        &["Backend", "Programming", "Database", "Python", "Web"],
    ),
    ("Lifetimes", "Short.", &[]),
    ("러스트 소유권", "소유권은 값의 이동을 다룹니다. 빌림은 참조를 빌려줍니다.", &["언어"]),
    ("<b>Markup</b> heavy", "<p>Tags are stripped before splitting sentences.</p>", &["Web"]),
    ("a", "b c d", &[]),
];

#[test]
fn generated_questions_are_always_well_formed() {
    for seed in 0..16 {
        let mut rng = RngShuffle::seeded(seed);
        for &(title, body, categories) in SAMPLES {
            let questions = generate_quiz(title, body, categories, &mut rng);
            assert!(questions.len() <= MAX_QUESTIONS);
            for question in &questions {
                question.validate().unwrap();
                assert!(!question.answer().trim().is_empty());
            }
        }
    }
}

#[test]
fn same_seed_reproduces_same_quiz() {
    let (title, body, categories) = SAMPLES[0];
    let first = generate_quiz(title, body, categories, &mut RngShuffle::seeded(42));
    let second = generate_quiz(title, body, categories, &mut RngShuffle::seeded(42));
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn category_options_are_capped_at_four() {
    let (title, body, categories) = SAMPLES[0];
    let questions = generate_quiz(title, body, categories, &mut RngShuffle::seeded(1));
    assert_eq!(questions[0].choices.len(), 4);
    assert_eq!(questions[0].answer(), "Backend");
    assert!(!questions[0].choices.contains(&"Web".to_string()));
}

#[test]
fn custom_stop_words_change_the_keyword() {
    let tokenizer = Tokenizer::with_word_class("0-9A-Za-z", &["django"]).unwrap();
    let generator = QuizGenerator::new(tokenizer);
    let questions = generator.generate(
        "Django ORM tips",
        "Django ORM makes queries easy.",
        &["Backend", "Programming"],
        &mut RngShuffle::seeded(3),
    );
    assert_eq!(
        questions[0].prompt,
        "Which category best relates to 'orm'?"
    );
}
