use anyhow::{Context, Result, bail};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::responses::{
        CreateResponseArgs, InputMessage, InputRole, OutputItem, OutputMessageContent,
    },
};

const MAX_OUTPUT_TOKENS: u32 = 2000;

pub async fn request_instruction_response(
    client: &Client<OpenAIConfig>,
    model: &str,
    instruction: &str,
) -> Result<String> {
    let request = CreateResponseArgs::default()
        .model(model)
        .max_output_tokens(MAX_OUTPUT_TOKENS)
        .input(vec![InputMessage {
            role: InputRole::System,
            content: vec![instruction.into()],
            status: None,
        }])
        .build()?;

    let response = client
        .responses()
        .create(request)
        .await
        .with_context(|| "Failed to get response from LLM")?;

    for item in response.output {
        if let OutputItem::Message(message) = item {
            for content in message.content {
                if let OutputMessageContent::OutputText(text) = content {
                    if text.text.trim().is_empty() {
                        continue;
                    }
                    return Ok(text.text);
                }
            }
        }
    }

    bail!("No text output returned from model")
}
