use anyhow::{Result, bail};
use compute::session::{Dashboard, Section};
use model::{ChatMessage, Role};
use tracing::{debug, trace};

use crate::cli::output::{OutputFormat, render};

pub async fn ask(session: &mut Dashboard, prompt: &str, format: OutputFormat) -> Result<String> {
    trace!("Entering ask command");
    session.navigate(Section::Proask);
    let assistant = session.assistant();

    if !assistant.send(prompt) {
        bail!("The prompt is empty");
    }
    debug!("Waiting for the assistant");
    assistant.finish_reply().await?;

    // The greeting is not repeated in the output
    let conversation: Vec<ChatMessage> = assistant.messages().iter().skip(1).cloned().collect();
    render(format, &conversation, render_text)
}

fn render_text(messages: &Vec<ChatMessage>) -> String {
    messages
        .iter()
        .map(|message| {
            let speaker = match message.role {
                Role::User => "You",
                Role::Assistant => "ProAsk",
            };
            format!("[{}] {}: {}", message.display_time(), speaker, message.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
