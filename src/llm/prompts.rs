use crate::card::CardRequest;
use crate::mask::PLACEHOLDER;

const ANSWER_ONLY: &str = "You are an AI that is strictly returning only the answer to the question without any ambient information. Just output the data. ";

const CONTEXT_HINT: &str =
    "If this word (phrase) has multiple meanings, get the correct one using this example as context: ";

/// Wraps a question into the single system instruction sent to the model.
pub fn instruction(request: &str) -> String {
    format!("{ANSWER_ONLY}{request}")
}

fn with_context(question: String, card: &CardRequest) -> String {
    instruction(&format!("{question} {CONTEXT_HINT}{}.", card.example))
}

pub fn transcription(card: &CardRequest) -> String {
    instruction(&format!(
        "Give me the phonetic transcription in English language for how to pronounce this: \"{}\". Just return the transcription, nothing else.",
        card.phrase
    ))
}

pub fn definition(card: &CardRequest) -> String {
    with_context(
        format!(
            "Give me definition in English language for: \"{}\". Do not include the word itself in the description as it will be used for flashcards.",
            card.phrase
        ),
        card,
    )
}

pub fn synonyms(card: &CardRequest) -> String {
    with_context(
        format!(
            "Give me up to 5 synonyms for this: \"{}\", without new lines, split them by comma.",
            card.phrase
        ),
        card,
    )
}

pub fn antonyms(card: &CardRequest) -> String {
    with_context(
        format!(
            "Give me up to 5 antonyms for this: \"{}\", without new lines, split them by comma.",
            card.phrase
        ),
        card,
    )
}

pub fn origin(card: &CardRequest) -> String {
    with_context(
        format!("Give me the origin of this English word: \"{}\".", card.phrase),
        card,
    )
}

pub fn translation(card: &CardRequest, language: &str) -> String {
    with_context(
        format!(
            "Give me up to 5 closest {language} translations of this: \"{}\", without new lines, split them by comma.",
            card.phrase
        ),
        card,
    )
}

pub fn masked_example(card: &CardRequest) -> String {
    instruction(&format!(
        "For the following sentence, replace the word/phrase \"{}\" with this: \"{PLACEHOLDER}\" so that I can use the sentence to learn this word. This is the sentence: {}",
        card.phrase, card.example
    ))
}

pub fn more_examples(card: &CardRequest) -> String {
    with_context(
        format!(
            "Generate up to 3 different examples of using the word/phrase: \"{}\", split them by newline.",
            card.phrase
        ),
        card,
    )
}
