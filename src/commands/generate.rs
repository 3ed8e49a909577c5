use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::card::{AudioNames, CardRecord, CardRequest};
use crate::config::Config;
use crate::enrich::enrich_card;
use crate::llm::CardBackend;
use crate::media::assign_audio_names;
use crate::parser::read_card_requests;
use crate::record::build_record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub cards_written: usize,
}

pub async fn run<B: CardBackend>(config: &Config, backend: &B) -> Result<GenerateSummary> {
    let requests = read_card_requests(&config.source_path)?;
    info!(
        cards = requests.len(),
        source = %config.source_path.display(),
        "parsed word list"
    );

    fs::create_dir_all(&config.media_directory).with_context(|| {
        format!(
            "Failed to create media directory {}",
            config.media_directory.display()
        )
    })?;

    let records = generate_records(config, backend, &requests).await?;
    let document = join_records(records);
    write_document(&config.destination_path, &document)?;

    info!(
        cards = requests.len(),
        destination = %config.destination_path.display(),
        "wrote cards"
    );
    Ok(GenerateSummary {
        cards_written: requests.len(),
    })
}

/// Builds every record concurrently. The result is index-aligned with
/// `requests` whatever order the cards finish in.
pub async fn generate_records<B: CardBackend>(
    config: &Config,
    backend: &B,
    requests: &[CardRequest],
) -> Result<Vec<CardRecord>> {
    let names = assign_audio_names(requests);
    let tasks = requests
        .iter()
        .zip(names.iter())
        .map(|(request, names)| process_card(config, backend, request, names));

    try_join_all(tasks).await
}

async fn process_card<B: CardBackend>(
    config: &Config,
    backend: &B,
    request: &CardRequest,
    names: &AudioNames,
) -> Result<CardRecord> {
    debug!(phrase = %request.phrase, "enriching card");
    let fields = enrich_card(backend, request, &config.target_language).await?;
    let record = build_record(&config.media_directory, request, &fields, names)
        .await
        .with_context(|| format!("Failed to build card for \"{}\"", request.phrase))?;
    info!(phrase = %request.phrase, audio = %names.phrase_file, "card ready");
    Ok(record)
}

pub fn join_records(records: Vec<CardRecord>) -> String {
    records
        .into_iter()
        .map(CardRecord::into_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces `path` in one rename so readers never see a half-written file.
fn write_document(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write cards for {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("Failed to write cards to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::enrich::tests::{GaugeBackend, StubBackend};
    use std::sync::atomic::Ordering;
    use tempfile::{TempDir, tempdir};

    fn config_in(dir: &TempDir, contents: &str) -> Config {
        let source_path = dir.path().join("anki.txt");
        fs::write(&source_path, contents).unwrap();
        Config {
            source_path,
            destination_path: dir.path().join("anki.csv"),
            media_directory: dir.path().join("collection.media"),
            backend_credential: "sk-test".to_string(),
            model: "test-model".to_string(),
            speech_model: "test-speech".to_string(),
            voice: "fable".to_string(),
            target_language: "Russian".to_string(),
        }
    }

    fn columns(record: &str) -> Vec<&str> {
        record.split('|').collect()
    }

    #[tokio::test]
    async fn single_card_end_to_end() {
        let dir = tempdir().unwrap();
        let config = config_in(&dir, "run|I like to run every morning.\n");
        let backend = StubBackend::default();

        let summary = run(&config, &backend).await.unwrap();
        assert_eq!(summary.cards_written, 1);

        let output = fs::read_to_string(&config.destination_path).unwrap();
        let cols = columns(&output);
        assert_eq!(cols[0], "run");
        assert!(output.contains("[sound:acf-run.mp3]"));
        assert!(output.contains("[sound:acf-run-example.mp3]"));
        // definition and help columns
        assert!(!cols[2].to_lowercase().contains("run"), "{}", cols[2]);
        assert!(!cols[8].to_lowercase().contains("run"), "{}", cols[8]);
        assert!(config.media_directory.join("acf-run.mp3").is_file());
        assert!(config.media_directory.join("acf-run-example.mp3").is_file());
    }

    #[tokio::test]
    async fn keeps_input_order_when_later_cards_finish_first() {
        let dir = tempdir().unwrap();
        let config = config_in(&dir, "slow|A slow start.\n\nquick|A quick end.\n");
        let backend = StubBackend {
            delays: [("slow".to_string(), Duration::from_millis(50))].into(),
            ..StubBackend::default()
        };

        run(&config, &backend).await.unwrap();

        let output = fs::read_to_string(&config.destination_path).unwrap();
        let lines: Vec<&str> = output.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("slow|"));
        assert!(lines[1].starts_with("quick|"));
    }

    #[tokio::test]
    async fn cards_are_enriched_concurrently() {
        let dir = tempdir().unwrap();
        let config = config_in(&dir, "");
        fs::create_dir_all(&config.media_directory).unwrap();
        let requests = vec![
            CardRequest::new("run", "I run."),
            CardRequest::new("walk", "I walk."),
        ];
        let backend = GaugeBackend::default();

        let records = generate_records(&config, &backend, &requests).await.unwrap();

        assert_eq!(records.len(), 2);
        assert!(backend.peak.load(Ordering::SeqCst) > 10);
    }

    #[tokio::test]
    async fn malformed_line_fails_before_any_request() {
        let dir = tempdir().unwrap();
        let config = config_in(&dir, "run|I run.\njustoneword\n");
        let backend = StubBackend::default();

        assert!(run(&config, &backend).await.is_err());
        assert!(backend.calls.lock().unwrap().is_empty());
        assert!(!config.destination_path.exists());
    }

    #[tokio::test]
    async fn one_failing_card_aborts_the_batch() {
        let dir = tempdir().unwrap();
        let config = config_in(&dir, "run|I run.\nwalk|I walk.\n");
        let backend = StubBackend {
            failing: Some("walk".to_string()),
            ..StubBackend::default()
        };

        let err = run(&config, &backend).await.unwrap_err();
        assert!(format!("{err:?}").contains("walk"));
        assert!(!config.destination_path.exists());
    }

    #[tokio::test]
    async fn overwrites_previous_output() {
        let dir = tempdir().unwrap();
        let config = config_in(&dir, "run|I run.\n");
        fs::write(&config.destination_path, "stale\nstale\nstale").unwrap();

        run(&config, &StubBackend::default()).await.unwrap();

        let output = fs::read_to_string(&config.destination_path).unwrap();
        assert!(!output.contains("stale"));
        assert!(output.starts_with("run|"));
    }

    #[tokio::test]
    async fn empty_word_list_writes_empty_document() {
        let dir = tempdir().unwrap();
        let config = config_in(&dir, "\n   \n");

        let summary = run(&config, &StubBackend::default()).await.unwrap();

        assert_eq!(summary.cards_written, 0);
        assert_eq!(fs::read_to_string(&config.destination_path).unwrap(), "");
    }

    #[tokio::test]
    async fn colliding_phrases_get_distinct_audio() {
        let dir = tempdir().unwrap();
        let config = config_in(&dir, "give up|Never give up.\ngive_up|Odd spelling.\n");
        let backend = StubBackend::default();

        let requests = read_card_requests(&config.source_path).unwrap();
        fs::create_dir_all(&config.media_directory).unwrap();
        let records = generate_records(&config, &backend, &requests).await.unwrap();

        let audio: Vec<PathBuf> = fs::read_dir(&config.media_directory)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(audio.len(), 4);
        assert!(records[0].as_str().contains("[sound:acf-give_up.mp3]"));
        assert!(!records[1].as_str().contains("[sound:acf-give_up.mp3]"));
    }

    #[test]
    fn records_are_newline_joined() {
        let records = vec![
            CardRecord::new("a|1".to_string()),
            CardRecord::new("b|2".to_string()),
        ];
        assert_eq!(join_records(records), "a|1\nb|2");
    }
}
