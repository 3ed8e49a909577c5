pub mod backend;
pub mod client;
pub mod prompts;
pub mod response;
pub mod secrets;
pub mod speech;

pub use backend::CardBackend;
pub use client::{OpenAiBackend, test_configured_api_key};
pub use secrets::{clear_api_key, resolve_api_key, store_api_key};
