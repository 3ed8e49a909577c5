use anyhow::{Context, Result, bail};
use serde::Serialize;

pub const SPEECH_ENDPOINT: &str = "https://api.openai.com/v1/audio/speech";
const RESPONSE_FORMAT: &str = "mp3";

#[derive(Serialize, Debug)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

pub async fn request_speech(
    http: &reqwest::Client,
    api_key: &str,
    model: &str,
    voice: &str,
    input: &str,
) -> Result<Vec<u8>> {
    let body = SpeechRequest {
        model,
        input,
        voice,
        response_format: RESPONSE_FORMAT,
    };

    let response = http
        .post(SPEECH_ENDPOINT)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .context("Speech request failed")?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        bail!("Speech API returned {status}: {error_text}");
    }

    let audio = response
        .bytes()
        .await
        .context("Failed to read speech response")?;
    if audio.is_empty() {
        bail!("Speech API returned no audio");
    }
    Ok(audio.to_vec())
}
