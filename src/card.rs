use std::fmt;

/// One parsed input line: the phrase being studied and a sentence using it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardRequest {
    pub phrase: String,
    pub example: String,
}

impl CardRequest {
    pub fn new(phrase: impl Into<String>, example: impl Into<String>) -> Self {
        CardRequest {
            phrase: phrase.into(),
            example: example.into(),
        }
    }
}

/// Everything the backend produced for a single [`CardRequest`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardFields {
    pub transcription: String,
    pub definition: String,
    pub synonyms: String,
    pub antonyms: String,
    pub origin: String,
    pub translation: String,
    /// The example sentence with the phrase masked out.
    pub help: String,
    pub more_examples: String,
    pub phrase_audio: Vec<u8>,
    pub example_audio: Vec<u8>,
}

/// File names (not paths) of the two audio clips attached to a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioNames {
    pub phrase_file: String,
    pub example_file: String,
}

/// A formatted flashcard line, ready to be joined into the output document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardRecord(String);

impl CardRecord {
    pub(crate) fn new(line: String) -> Self {
        CardRecord(line)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CardRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
