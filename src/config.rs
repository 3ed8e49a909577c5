use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::BaseDirs;

pub const DEFAULT_SOURCE: &str = "d:/anki.txt";
pub const DEFAULT_DESTINATION: &str = "d:/anki.csv";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SPEECH_MODEL: &str = "tts-1";
pub const DEFAULT_VOICE: &str = "fable";
pub const DEFAULT_TARGET_LANGUAGE: &str = "Russian";

/// Anki's media folder for the default profile, relative to the home directory.
const ANKI_MEDIA_SUBDIR: [&str; 5] = ["AppData", "Roaming", "Anki2", "User 1", "collection.media"];

/// Everything a generate run needs, resolved once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub media_directory: PathBuf,
    pub backend_credential: String,
    pub model: String,
    pub speech_model: String,
    pub voice: String,
    pub target_language: String,
}

pub fn default_media_directory() -> Result<PathBuf> {
    let dirs = BaseDirs::new().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(ANKI_MEDIA_SUBDIR
        .iter()
        .fold(dirs.home_dir().to_path_buf(), |path, part| path.join(part)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_directory_is_under_home() {
        let media = default_media_directory().unwrap();
        assert!(media.ends_with("AppData/Roaming/Anki2/User 1/collection.media"));
    }
}
