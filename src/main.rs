use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueHint};
use tracing::info;

use cardfather::commands::generate;
use cardfather::config::{
    Config, DEFAULT_DESTINATION, DEFAULT_MODEL, DEFAULT_SOURCE, DEFAULT_SPEECH_MODEL,
    DEFAULT_TARGET_LANGUAGE, DEFAULT_VOICE, default_media_directory,
};
use cardfather::llm::{self, OpenAiBackend};
use cardfather::logging::init_tracing;
use cardfather::palette::Palette;

#[derive(Parser, Debug)]
#[command(
    name = "cardfather",
    version,
    about = "Turn a word list into AI-enriched Anki flashcards.",
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate cards from a `<phrase>|<example>` word list
    Generate {
        /// Word list to read, one `<phrase>|<example>` entry per line
        #[arg(long, value_name = "PATH", default_value = DEFAULT_SOURCE, value_hint = ValueHint::FilePath)]
        source: PathBuf,
        /// File to overwrite with the generated cards
        #[arg(long, value_name = "PATH", default_value = DEFAULT_DESTINATION, value_hint = ValueHint::FilePath)]
        destination: PathBuf,
        /// Anki media folder for the audio clips. Defaults to the `User 1` profile.
        #[arg(long, value_name = "PATH", value_hint = ValueHint::DirPath)]
        media_dir: Option<PathBuf>,
        /// Text model used for every field
        #[arg(long, value_name = "MODEL", default_value = DEFAULT_MODEL)]
        model: String,
        /// Speech model used for the audio clips
        #[arg(long, value_name = "MODEL", default_value = DEFAULT_SPEECH_MODEL)]
        speech_model: String,
        /// Voice used for the audio clips
        #[arg(long, value_name = "VOICE", default_value = DEFAULT_VOICE)]
        voice: String,
        /// Language the phrase is translated into
        #[arg(long, value_name = "LANGUAGE", default_value = DEFAULT_TARGET_LANGUAGE)]
        language: String,
        /// OpenAI API key. Falls back to the environment, then the local auth file.
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,
    },
    /// Manage the stored OpenAI API key
    Llm {
        /// Store a new API key in the local auth file
        #[arg(long, value_name = "KEY", conflicts_with = "clear")]
        set: Option<String>,
        /// Remove the stored API key from the local auth file
        #[arg(long, conflicts_with = "test")]
        clear: bool,
        /// Verify the configured API key by calling the OpenAI API
        #[arg(long, conflicts_with = "clear")]
        test: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run_cli().await {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            source,
            destination,
            media_dir,
            model,
            speech_model,
            voice,
            language,
            api_key,
        } => {
            let (credential, key_source) = llm::resolve_api_key(api_key.as_deref())?;
            info!(source = key_source.description(), "using OpenAI API key");

            let media_directory = match media_dir {
                Some(dir) => dir,
                None => default_media_directory()?,
            };
            let config = Config {
                source_path: source,
                destination_path: destination,
                media_directory,
                backend_credential: credential,
                model,
                speech_model,
                voice,
                target_language: language,
            };

            let backend = OpenAiBackend::new(&config)?;
            generate::run(&config, &backend).await?;
            println!("{}", Palette::paint(Palette::SUCCESS, "Done"));
        }
        Command::Llm { set, clear, test } => handle_llm_command(set, clear, test).await?,
    }

    Ok(())
}

async fn handle_llm_command(set: Option<String>, clear: bool, test: bool) -> Result<()> {
    let mut action_taken = false;

    if let Some(key) = set {
        llm::store_api_key(&key)?;
        println!("Stored OpenAI API key in the local auth file.");
        action_taken = true;
    }

    if clear {
        let removed = llm::clear_api_key()?;
        if removed {
            println!("Removed the stored OpenAI API key.");
        } else {
            println!(
                "{}",
                Palette::paint(Palette::WARNING, "No OpenAI API key found in the auth file.")
            );
        }
        action_taken = true;
    }

    if test {
        let source = llm::test_configured_api_key().await?;
        println!(
            "OpenAI API key from the {} is valid.",
            Palette::paint(Palette::ACCENT, source.description())
        );
        action_taken = true;
    }

    if !action_taken {
        bail!("No action provided. Use --set, --clear, or --test.");
    }
    Ok(())
}
