use std::future::Future;

use anyhow::Result;

/// The two generative operations a card needs.
pub trait CardBackend: Sync {
    /// Sends a single system instruction and returns the first text answer.
    fn complete(&self, instruction: &str) -> impl Future<Output = Result<String>> + Send;

    /// Renders `text` as speech, returning the encoded audio bytes.
    fn synthesize(&self, text: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}
