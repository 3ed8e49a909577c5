use std::path::Path;

use anyhow::Result;

use crate::card::{AudioNames, CardFields, CardRecord, CardRequest};
use crate::media::write_audio_files;

/// Anki renders this as a line break inside a field.
pub const LINE_BREAK: &str = "</br>";

/// Lays out the seven pipe-separated columns, then folds the record onto a
/// single line. Field values are not escaped, so a `|` inside one shifts the
/// columns.
pub fn format_record(card: &CardRequest, fields: &CardFields, names: &AudioNames) -> CardRecord {
    let raw = format!(
        "{phrase}|{transcription}\n\
         [sound:{phrase_file}]|{definition}|{synonyms}\n\
         [ {antonyms} ]|{origin}|{translation}|[sound:{example_file}]\n\
         {example}\n\
         \n\
         {more_examples}||{help}|",
        phrase = card.phrase,
        transcription = fields.transcription,
        phrase_file = names.phrase_file,
        definition = fields.definition,
        synonyms = fields.synonyms,
        antonyms = fields.antonyms,
        origin = fields.origin,
        translation = fields.translation,
        example_file = names.example_file,
        example = card.example,
        more_examples = fields.more_examples,
        help = fields.help,
    );

    CardRecord::new(raw.replace('\r', "").replace('\n', LINE_BREAK))
}

/// Writes the card's two audio clips, then formats its record.
pub async fn build_record(
    media_dir: &Path,
    card: &CardRequest,
    fields: &CardFields,
    names: &AudioNames,
) -> Result<CardRecord> {
    write_audio_files(media_dir, names, fields).await?;
    Ok(format_record(card, fields, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::audio_names;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn fields() -> CardFields {
        CardFields {
            transcription: "/rʌn/".to_string(),
            definition: "To ... quickly".to_string(),
            synonyms: "sprint, dash".to_string(),
            antonyms: "walk".to_string(),
            origin: "Old English".to_string(),
            translation: "бегать".to_string(),
            help: "I like to  [...]  every morning.".to_string(),
            more_examples: "They ... daily.\r\nWe ... fast.".to_string(),
            phrase_audio: vec![1, 2, 3],
            example_audio: vec![4, 5],
        }
    }

    #[test]
    fn lays_out_the_columns() {
        let card = CardRequest::new("run", "I like to run every morning.");
        let record = format_record(&card, &fields(), &audio_names("run"));

        assert_eq!(
            record.as_str(),
            "run|/rʌn/</br>[sound:acf-run.mp3]|To ... quickly|sprint, dash</br>\
             [ walk ]|Old English|бегать|[sound:acf-run-example.mp3]</br>\
             I like to run every morning.</br></br>\
             They ... daily.</br>We ... fast.||I like to  [...]  every morning.|"
        );
    }

    #[test]
    fn record_is_a_single_line() {
        let card = CardRequest::new("run", "line one\r\nline two");
        let record = format_record(&card, &fields(), &audio_names("run"));
        assert!(!record.as_str().contains('\n'));
        assert!(!record.as_str().contains('\r'));
        assert!(record.as_str().contains("line one</br>line two"));
    }

    #[test]
    fn first_column_is_the_phrase() {
        let card = CardRequest::new("run", "I run.");
        let record = format_record(&card, &fields(), &audio_names("run"));
        assert_eq!(record.as_str().split('|').next(), Some("run"));
    }

    #[tokio::test]
    async fn build_writes_audio_then_formats() {
        let dir = tempdir().unwrap();
        let card = CardRequest::new("run", "I run.");
        let names = audio_names("run");

        let record = build_record(dir.path(), &card, &fields(), &names)
            .await
            .unwrap();

        assert_eq!(record, format_record(&card, &fields(), &names));
        assert_eq!(
            std::fs::read(dir.path().join("acf-run.mp3")).unwrap(),
            vec![1, 2, 3]
        );
        assert_eq!(
            std::fs::read(dir.path().join("acf-run-example.mp3")).unwrap(),
            vec![4, 5]
        );
    }

    proptest! {
        #[test]
        fn formatting_is_deterministic(
            phrase in "[a-z ]{1,12}",
            example in "\\PC{0,40}",
            definition in "\\PC{0,40}",
        ) {
            let card = CardRequest::new(phrase.clone(), example);
            let fields = CardFields { definition, ..fields() };
            let names = audio_names(&phrase);
            let first = format_record(&card, &fields, &names);
            let second = format_record(&card, &fields, &names);
            prop_assert!(!first.as_str().contains('\n'));
            prop_assert_eq!(first, second);
        }
    }
}
