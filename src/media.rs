use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use blake3::Hasher;

use crate::card::{AudioNames, CardFields, CardRequest};

const AUDIO_PREFIX: &str = "acf-";
const AUDIO_EXTENSION: &str = "mp3";
const EXAMPLE_SUFFIX: &str = "-example";
const DISAMBIGUATION_LEN: usize = 8;

fn is_unsafe_filename_char(ch: char) -> bool {
    matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || ch.is_control()
}

pub fn audio_slug(phrase: &str) -> String {
    phrase
        .chars()
        .map(|ch| {
            if ch == ' ' || is_unsafe_filename_char(ch) {
                '_'
            } else {
                ch
            }
        })
        .collect()
}

pub fn audio_names(slug: &str) -> AudioNames {
    AudioNames {
        phrase_file: format!("{AUDIO_PREFIX}{slug}.{AUDIO_EXTENSION}"),
        example_file: format!("{AUDIO_PREFIX}{slug}{EXAMPLE_SUFFIX}.{AUDIO_EXTENSION}"),
    }
}

fn phrase_digest(phrase: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(phrase.as_bytes());
    let hex = hasher.finalize().to_hex();
    hex.as_str()[..DISAMBIGUATION_LEN].to_string()
}

/// Names the audio for every request, index-aligned with `requests`.
///
/// Distinct phrases whose slugs match ignoring case would overwrite each
/// other's clips on case-insensitive file systems, so every such phrase after
/// the first gets a short digest of itself appended. Repeated identical
/// phrases share one name.
pub fn assign_audio_names(requests: &[CardRequest]) -> Vec<AudioNames> {
    let mut owners: HashMap<String, &str> = HashMap::new();

    requests
        .iter()
        .map(|request| {
            let slug = audio_slug(&request.phrase);
            let key = slug.to_lowercase();
            match owners.get(&key).copied() {
                Some(owner) if owner != request.phrase => {
                    let slug = format!("{slug}-{}", phrase_digest(&request.phrase));
                    audio_names(&slug)
                }
                Some(_) => audio_names(&slug),
                None => {
                    owners.insert(key, &request.phrase);
                    audio_names(&slug)
                }
            }
        })
        .collect()
}

pub async fn write_audio_files(
    media_dir: &Path,
    names: &AudioNames,
    fields: &CardFields,
) -> Result<()> {
    let phrase_path = media_dir.join(&names.phrase_file);
    tokio::fs::write(&phrase_path, &fields.phrase_audio)
        .await
        .with_context(|| format!("Failed to write audio to {}", phrase_path.display()))?;

    let example_path = media_dir.join(&names.example_file);
    tokio::fs::write(&example_path, &fields.example_audio)
        .await
        .with_context(|| format!("Failed to write audio to {}", example_path.display()))?;

    Ok(())
}
