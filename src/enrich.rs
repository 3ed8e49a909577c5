use anyhow::{Context, Result};
use futures::try_join;

use crate::card::{CardFields, CardRequest};
use crate::llm::{CardBackend, prompts};
use crate::mask::{mask_definition, mask_help};

/// Asks the backend for every field of one card. All ten requests are in
/// flight at once; the first failure fails the card.
pub async fn enrich_card<B: CardBackend>(
    backend: &B,
    card: &CardRequest,
    target_language: &str,
) -> Result<CardFields> {
    let ask = move |what: &'static str, instruction: String| async move {
        backend
            .complete(&instruction)
            .await
            .with_context(|| format!("Failed to get {what} for \"{}\"", card.phrase))
    };
    let speak = move |what: &'static str, text: &str| {
        let text = text.to_string();
        async move {
            backend
                .synthesize(&text)
                .await
                .with_context(|| format!("Failed to synthesize {what} for \"{}\"", card.phrase))
        }
    };

    let (
        transcription,
        definition,
        synonyms,
        antonyms,
        origin,
        translation,
        help,
        more_examples,
        phrase_audio,
        example_audio,
    ) = try_join!(
        ask("transcription", prompts::transcription(card)),
        ask("definition", prompts::definition(card)),
        ask("synonyms", prompts::synonyms(card)),
        ask("antonyms", prompts::antonyms(card)),
        ask("origin", prompts::origin(card)),
        ask("translation", prompts::translation(card, target_language)),
        ask("masked example", prompts::masked_example(card)),
        ask("more examples", prompts::more_examples(card)),
        speak("phrase audio", &card.phrase),
        speak("example audio", &card.example),
    )?;

    Ok(CardFields {
        transcription,
        definition: mask_definition(&definition, &card.phrase)?,
        synonyms,
        antonyms,
        origin,
        translation,
        help: mask_help(&help, &card.phrase)?,
        more_examples,
        phrase_audio,
        example_audio,
    })
}
