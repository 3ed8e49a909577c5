use anyhow::{Context, Result, anyhow};
use async_openai::{Client, config::OpenAIConfig};

use super::backend::CardBackend;
use super::response::request_instruction_response;
use super::secrets::{API_KEY_ENV, ApiKeySource, get_api_key_from_sources};
use super::speech::request_speech;
use crate::config::Config;

/// [`CardBackend`] backed by the OpenAI text and speech endpoints.
#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
    http: reqwest::Client,
    api_key: String,
    model: String,
    speech_model: String,
    voice: String,
}

impl OpenAiBackend {
    pub fn new(config: &Config) -> Result<Self> {
        let client = initialize_client(&config.backend_credential)?;
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            http,
            api_key: config.backend_credential.clone(),
            model: config.model.clone(),
            speech_model: config.speech_model.clone(),
            voice: config.voice.clone(),
        })
    }
}

impl CardBackend for OpenAiBackend {
    async fn complete(&self, instruction: &str) -> Result<String> {
        request_instruction_response(&self.client, &self.model, instruction).await
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        request_speech(
            &self.http,
            &self.api_key,
            &self.speech_model,
            &self.voice,
            text,
        )
        .await
    }
}

pub async fn test_configured_api_key() -> Result<ApiKeySource> {
    let lookup = get_api_key_from_sources()?;
    let (Some(key), Some(source)) = (lookup.api_key, lookup.source) else {
        return Err(anyhow!(
            "No API key configured. Set {} or run `cardfather llm --set <KEY>`.",
            API_KEY_ENV
        ));
    };
    let client = initialize_client(&key)?;
    healthcheck_client(&client).await?;
    Ok(source)
}

fn initialize_client(api_key: &str) -> Result<Client<OpenAIConfig>> {
    let config = OpenAIConfig::new().with_api_key(api_key);

    let client = Client::with_config(config);
    Ok(client)
}

async fn healthcheck_client(client: &Client<OpenAIConfig>) -> Result<()> {
    client
        .models()
        .list()
        .await
        .context("Failed to validate API key with OpenAI")?;
    Ok(())
}
