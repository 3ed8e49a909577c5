use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use dialoguer::{Password, theme::ColorfulTheme};
use serde::{Deserialize, Serialize};

use crate::palette::Palette;
use crate::utils::{get_data_dir, strip_controls_and_escapes, trim_line};

pub const API_KEY_ENV: &str = "CARDFATHER_OPENAI_API_KEY";

const AUTH_FILE_NAME: &str = "auth.json";
const OPENAI_PROVIDER: &str = "openai";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Argument,
    Environment,
    AuthFile,
    Prompt,
}

impl ApiKeySource {
    pub fn description(&self) -> &'static str {
        match self {
            ApiKeySource::Argument => "command line",
            ApiKeySource::Environment => "environment variable",
            ApiKeySource::AuthFile => "local auth file",
            ApiKeySource::Prompt => "interactive prompt",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct AuthFile {
    #[serde(flatten)]
    providers: HashMap<String, ProviderAuth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProviderAuth {
    key: String,
}

#[derive(Debug)]
pub struct ApiKeyLookup {
    pub api_key: Option<String>,
    pub source: Option<ApiKeySource>,
}

impl ApiKeyLookup {
    fn none() -> Self {
        ApiKeyLookup {
            api_key: None,
            source: None,
        }
    }

    fn found(api_key: String, source: ApiKeySource) -> Self {
        ApiKeyLookup {
            api_key: Some(api_key),
            source: Some(source),
        }
    }
}

pub fn store_api_key(api_key: &str) -> Result<()> {
    store_api_key_at(&auth_file_path()?, api_key)
}

pub fn clear_api_key() -> Result<bool> {
    clear_api_key_at(&auth_file_path()?)
}

pub fn get_api_key_from_sources() -> Result<ApiKeyLookup> {
    if let Ok(value) = env::var(API_KEY_ENV)
        && let Some(trimmed) = trim_line(&value)
    {
        return Ok(ApiKeyLookup::found(
            trimmed.to_string(),
            ApiKeySource::Environment,
        ));
    }

    lookup_auth_file(&auth_file_path()?)
}

/// Resolves the key for a batch run: flag, environment, auth file, then an
/// interactive prompt whose answer is stored for next time.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<(String, ApiKeySource)> {
    if let Some(key) = explicit.and_then(trim_line) {
        return Ok((key.to_string(), ApiKeySource::Argument));
    }

    let lookup = get_api_key_from_sources()?;
    if let (Some(key), Some(source)) = (lookup.api_key, lookup.source) {
        return Ok((key, source));
    }

    let key = prompt_for_api_key()?;
    if key.is_empty() {
        bail!(
            "No API key provided. Set {} or run `cardfather llm --set <KEY>`.",
            API_KEY_ENV
        );
    }
    store_api_key(&key)?;
    Ok((key, ApiKeySource::Prompt))
}

fn prompt_for_api_key() -> Result<String> {
    println!(
        "{} (https://platform.openai.com/account/api-keys) to generate cards. It's stored locally for future use.",
        Palette::paint(Palette::SUCCESS, "Enter your OpenAI API key")
    );
    println!("{}", Palette::dim("Leave the field blank to abort."));
    let raw_password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("API Key")
        .allow_empty_password(true)
        .interact()
        .context("Failed to read API key from the terminal")?;

    Ok(strip_controls_and_escapes(&raw_password))
}

fn auth_file_path() -> Result<PathBuf> {
    let data_dir = get_data_dir()?;
    Ok(data_dir.join(AUTH_FILE_NAME))
}

fn store_api_key_at(auth_path: &Path, api_key: &str) -> Result<()> {
    let trimmed = trim_line(api_key).with_context(|| "Cannot store an empty API key")?;

    let mut auth = read_auth_file(auth_path)?.unwrap_or_default();
    auth.providers.insert(
        OPENAI_PROVIDER.to_string(),
        ProviderAuth {
            key: trimmed.to_string(),
        },
    );

    write_auth_file(auth_path, &auth)
}

fn clear_api_key_at(auth_path: &Path) -> Result<bool> {
    let Some(mut auth) = read_auth_file(auth_path)? else {
        return Ok(false);
    };

    if auth.providers.remove(OPENAI_PROVIDER).is_none() {
        return Ok(false);
    }

    if auth.providers.is_empty() {
        fs::remove_file(auth_path).with_context(|| {
            format!(
                "Failed to remove empty auth file at {}",
                auth_path.display()
            )
        })?;
        return Ok(true);
    }

    write_auth_file(auth_path, &auth)?;
    Ok(true)
}

fn lookup_auth_file(auth_path: &Path) -> Result<ApiKeyLookup> {
    let Some(auth) = read_auth_file(auth_path)? else {
        return Ok(ApiKeyLookup::none());
    };

    let key = auth
        .providers
        .get(OPENAI_PROVIDER)
        .and_then(|entry| trim_line(&entry.key))
        .map(str::to_string);

    Ok(match key {
        Some(api_key) => ApiKeyLookup::found(api_key, ApiKeySource::AuthFile),
        None => ApiKeyLookup::none(),
    })
}

fn read_auth_file(path: &Path) -> Result<Option<AuthFile>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(parse_auth_contents(&contents, path)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to read auth file at {}", path.display()))
        }
    }
}

fn write_auth_file(path: &Path, value: &AuthFile) -> Result<()> {
    let contents = serialize_auth(value)?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write auth file at {}", path.display()))?;
    Ok(())
}

fn parse_auth_contents(contents: &str, path: &Path) -> Result<Option<AuthFile>> {
    if contents.trim().is_empty() {
        return Ok(Some(AuthFile::default()));
    }

    let parsed: AuthFile = serde_json::from_str(contents)
        .with_context(|| format!("Failed to parse auth file at {}", path.display()))?;
    Ok(Some(parsed))
}

fn serialize_auth(value: &AuthFile) -> Result<String> {
    let contents = serde_json::to_string_pretty(value)?;
    Ok(format!("{}\n", contents))
}
