//! Quiz question generator.
//!
//! Stages run in a fixed order and each may be skipped:
//! category pick, sentence excerpt, core keyword, then a fallback that only
//! runs when nothing else produced a question.
//!
//! Shuffle calls are made in this order: category options, sentence
//! distractors, sentence options, keyword options, fallback options.

use crate::model::quiz::QuizQuestion;
use crate::quiz::shuffle::Shuffle;
use crate::text::{split_sentences, truncate_choice, Tokenizer};
use once_cell::sync::Lazy;

/// Upper bound on questions per quiz.
pub const MAX_QUESTIONS: usize = 5;
/// Category label used when a document has none.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

const MAX_CATEGORY_OPTIONS: usize = 4;
const MAX_SENTENCE_DISTRACTORS: usize = 3;
const KEYWORD_WINDOW: usize = 12;
const KEYWORD_OPTIONS: usize = 4;
const FALLBACK_OPTIONS: usize = 4;
const FALLBACK_CATEGORY_SLOTS: usize = 3;
const FALLBACK_FILLERS: &[&str] = &["overview", "summary", "example", "basics", "core"];
const NONE_OF_THE_ABOVE: &str = "None of the above";

static DEFAULT_GENERATOR: Lazy<QuizGenerator> = Lazy::new(QuizGenerator::default);

/// Generates questions with the default quiz tokenizer.
pub fn generate_quiz<C, S>(
    title: &str,
    body: &str,
    category_names: &[C],
    rng: &mut S,
) -> Vec<QuizQuestion>
where
    C: AsRef<str>,
    S: Shuffle + ?Sized,
{
    DEFAULT_GENERATOR.generate(title, body, category_names, rng)
}

/// Quiz generator bound to one keyword tokenizer.
#[derive(Debug, Clone)]
pub struct QuizGenerator {
    tokenizer: Tokenizer,
}

impl Default for QuizGenerator {
    fn default() -> Self {
        Self::new(Tokenizer::quiz())
    }
}

impl QuizGenerator {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Derives 0 to [`MAX_QUESTIONS`] questions.
    ///
    /// Returns an empty list when title and body hold no usable token.
    pub fn generate<C, S>(
        &self,
        title: &str,
        body: &str,
        category_names: &[C],
        rng: &mut S,
    ) -> Vec<QuizQuestion>
    where
        C: AsRef<str>,
        S: Shuffle + ?Sized,
    {
        let tokens = self.tokenizer.token_list(&format!("{title} {body}"));
        let Some(keyword) = tokens.first() else {
            return Vec::new();
        };
        let categories = normalize_categories(category_names);

        let mut questions = Vec::new();
        questions.extend(category_question(keyword, &categories, rng));
        questions.extend(sentence_question(keyword, body, rng));
        questions.extend(keyword_question(&tokens, rng));
        if questions.is_empty() {
            questions.push(fallback_question(keyword, &categories, rng));
        }

        questions.truncate(MAX_QUESTIONS);
        questions
    }
}

/// Drops blank names and repeats, keeping first-seen order.
fn normalize_categories<C: AsRef<str>>(category_names: &[C]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for name in category_names {
        let name = name.as_ref();
        if name.trim().is_empty() || categories.iter().any(|seen| seen == name) {
            continue;
        }
        categories.push(name.to_string());
    }
    if categories.is_empty() {
        categories.push(FALLBACK_CATEGORY.to_string());
    }
    categories
}

fn category_question<S: Shuffle + ?Sized>(
    keyword: &str,
    categories: &[String],
    rng: &mut S,
) -> Option<QuizQuestion> {
    if categories.len() < 2 {
        return None;
    }
    let mut options = categories
        .iter()
        .take(MAX_CATEGORY_OPTIONS)
        .cloned()
        .collect::<Vec<_>>();
    let correct = options[0].clone();
    rng.shuffle(&mut options);
    Some(question(
        format!("Which category best relates to '{keyword}'?"),
        options,
        &correct,
    ))
}

fn sentence_question<S: Shuffle + ?Sized>(
    keyword: &str,
    body: &str,
    rng: &mut S,
) -> Option<QuizQuestion> {
    let sentences = split_sentences(body);
    let needle = keyword.to_lowercase();
    let correct = sentences
        .iter()
        .find(|sentence| sentence.to_lowercase().contains(&needle))
        .or_else(|| sentences.first())?;
    let correct_choice = truncate_choice(correct);

    let mut distractors = sentences
        .iter()
        .map(|sentence| truncate_choice(sentence))
        .filter(|choice| *choice != correct_choice)
        .collect::<Vec<_>>();
    rng.shuffle(&mut distractors);

    let mut options = vec![correct_choice.clone()];
    options.extend(distractors.into_iter().take(MAX_SENTENCE_DISTRACTORS));
    if options.len() < 2 {
        options.push(NONE_OF_THE_ABOVE.to_string());
    }
    rng.shuffle(&mut options);
    Some(question(
        format!("Which best describes '{keyword}'?"),
        options,
        &correct_choice,
    ))
}

fn keyword_question<S: Shuffle + ?Sized>(tokens: &[String], rng: &mut S) -> Option<QuizQuestion> {
    let mut unique: Vec<&String> = Vec::new();
    for token in tokens {
        if unique.len() == KEYWORD_WINDOW {
            break;
        }
        if !unique.contains(&token) {
            unique.push(token);
        }
    }
    if unique.len() < KEYWORD_OPTIONS {
        return None;
    }

    let correct = unique[0].clone();
    let mut options = unique
        .into_iter()
        .take(KEYWORD_OPTIONS)
        .cloned()
        .collect::<Vec<_>>();
    rng.shuffle(&mut options);
    Some(question(
        "Which is the core keyword of this content?".to_string(),
        options,
        &correct,
    ))
}

fn fallback_question<S: Shuffle + ?Sized>(
    keyword: &str,
    categories: &[String],
    rng: &mut S,
) -> QuizQuestion {
    let pool = std::iter::once(keyword)
        .chain(
            categories
                .iter()
                .take(FALLBACK_CATEGORY_SLOTS)
                .map(String::as_str),
        )
        .chain(FALLBACK_FILLERS.iter().copied());

    let mut options: Vec<String> = Vec::with_capacity(FALLBACK_OPTIONS);
    for candidate in pool {
        if options.len() == FALLBACK_OPTIONS {
            break;
        }
        if !candidate.is_empty() && !options.iter().any(|option| option == candidate) {
            options.push(candidate.to_string());
        }
    }
    while options.len() < FALLBACK_OPTIONS {
        options.push(format!("option {}", options.len() + 1));
    }
    rng.shuffle(&mut options);

    let answer_index = options
        .iter()
        .position(|option| option == keyword)
        .unwrap_or(0);
    build(
        "Which best represents the keywords of this content/note?".to_string(),
        options,
        answer_index,
    )
}

fn question(prompt: String, choices: Vec<String>, correct: &str) -> QuizQuestion {
    let answer_index = choices
        .iter()
        .position(|choice| choice == correct)
        .unwrap_or(0);
    build(prompt, choices, answer_index)
}

fn build(prompt: String, choices: Vec<String>, answer_index: usize) -> QuizQuestion {
    let question = QuizQuestion {
        prompt,
        choices,
        answer_index,
    };
    debug_assert!(
        question.validate().is_ok(),
        "generator produced malformed question: {question:?}"
    );
    question
}
