pub mod card;
pub mod commands;
pub mod config;
pub mod enrich;
pub mod llm;
pub mod logging;
pub mod mask;
pub mod media;
pub mod palette;
pub mod parser;
pub mod record;
pub mod utils;
