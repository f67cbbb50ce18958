// src/validation.rs
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub const QUESTION_MAX_CHARS: usize = 500;
pub const OPTION_MAX_CHARS: usize = 200;
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PollInputError {
    #[error("Poll question is required")]
    EmptyQuestion,
    #[error("Poll question must be 500 characters or fewer")]
    QuestionTooLong,
    #[error("A poll needs at least 2 options")]
    TooFewOptions,
    #[error("A poll can have at most 10 options")]
    TooManyOptions,
    #[error("Poll options must be 200 characters or fewer")]
    OptionTooLong,
}

/// Cleaned poll text, ready to persist.
#[derive(Debug, PartialEq, Eq)]
pub struct PollInput {
    pub question: String,
    pub options: Vec<String>,
}

static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn tag_pattern() -> &'static Regex {
    TAG_PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Removes anything shaped like an HTML tag. A denylist pass only: markup
/// with no closing `>` passes through untouched.
pub fn strip_tags(text: &str) -> String {
    tag_pattern().replace_all(text, "").into_owned()
}

/// Checks a question and its options against the poll shape rules, then
/// sanitizes the surviving text.
///
/// Blank options are dropped before the count limits apply, so an input of
/// twelve entries where three are whitespace still passes.
pub fn validate_poll_input(
    question: &str,
    options: &[String],
) -> Result<PollInput, PollInputError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(PollInputError::EmptyQuestion);
    }
    if question.chars().count() > QUESTION_MAX_CHARS {
        return Err(PollInputError::QuestionTooLong);
    }

    let kept: Vec<&str> = options
        .iter()
        .map(|option| option.trim())
        .filter(|option| !option.is_empty())
        .collect();

    if kept.len() < MIN_OPTIONS {
        return Err(PollInputError::TooFewOptions);
    }
    if kept.len() > MAX_OPTIONS {
        return Err(PollInputError::TooManyOptions);
    }
    if kept
        .iter()
        .any(|option| option.chars().count() > OPTION_MAX_CHARS)
    {
        return Err(PollInputError::OptionTooLong);
    }

    Ok(PollInput {
        question: strip_tags(question),
        options: kept.into_iter().map(strip_tags).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_valid_input() {
        let input =
            validate_poll_input("Favorite language?", &opts(&["Rust", "Go", "Zig"])).unwrap();
        assert_eq!(input.question, "Favorite language?");
        assert_eq!(input.options, vec!["Rust", "Go", "Zig"]);
    }

    #[test]
    fn trims_and_strips_tags() {
        let input = validate_poll_input(
            "  Which <b>editor</b>?  ",
            &opts(&[" <i>vim</i> ", "emacs"]),
        )
        .unwrap();
        assert_eq!(input.question, "Which editor?");
        assert_eq!(input.options, vec!["vim", "emacs"]);
    }

    #[test]
    fn rejects_empty_question() {
        assert_eq!(
            validate_poll_input("", &opts(&["A", "B"])),
            Err(PollInputError::EmptyQuestion)
        );
        assert_eq!(
            validate_poll_input("   ", &opts(&["A", "B"])),
            Err(PollInputError::EmptyQuestion)
        );
    }

    #[test]
    fn enforces_question_length() {
        let at_limit = "x".repeat(QUESTION_MAX_CHARS);
        assert!(validate_poll_input(&at_limit, &opts(&["A", "B"])).is_ok());

        let over = "x".repeat(QUESTION_MAX_CHARS + 1);
        assert_eq!(
            validate_poll_input(&over, &opts(&["A", "B"])),
            Err(PollInputError::QuestionTooLong)
        );
    }

    #[test]
    fn drops_blank_options_before_counting() {
        let input =
            validate_poll_input("Q?", &opts(&["A", "   ", "", "B"])).unwrap();
        assert_eq!(input.options, vec!["A", "B"]);
    }

    #[test]
    fn rejects_too_few_options_after_filtering() {
        assert_eq!(
            validate_poll_input("Q?", &opts(&["A", "   ", ""])),
            Err(PollInputError::TooFewOptions)
        );
    }

    #[test]
    fn rejects_too_many_options_after_filtering() {
        let eleven: Vec<String> = (0..11).map(|i| format!("option {i}")).collect();
        assert_eq!(
            validate_poll_input("Q?", &eleven),
            Err(PollInputError::TooManyOptions)
        );

        // Twelve raw entries that reduce to ten are fine.
        let mut twelve = (0..10).map(|i| format!("option {i}")).collect::<Vec<_>>();
        twelve.push("  ".to_string());
        twelve.push(String::new());
        assert!(validate_poll_input("Q?", &twelve).is_ok());
    }

    #[test]
    fn enforces_option_length() {
        let at_limit = "y".repeat(OPTION_MAX_CHARS);
        assert!(validate_poll_input("Q?", &opts(&["A", &at_limit])).is_ok());

        let over = "y".repeat(OPTION_MAX_CHARS + 1);
        assert_eq!(
            validate_poll_input("Q?", &opts(&["A", &over])),
            Err(PollInputError::OptionTooLong)
        );
    }

    #[test]
    fn strip_tags_is_best_effort() {
        assert_eq!(strip_tags("<script>alert(1)</script>hi"), "alert(1)hi");
        // An unterminated tag is not recognized.
        assert_eq!(strip_tags("1 < 2"), "1 < 2");
    }

    #[test]
    fn preserves_option_order() {
        let input = validate_poll_input("Q?", &opts(&["C", "A", "B"])).unwrap();
        assert_eq!(input.options, vec!["C", "A", "B"]);
    }
}
