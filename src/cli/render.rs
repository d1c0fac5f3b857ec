//! Terminal output shared by `ask` and `chat`

use anyhow::{bail, Result};
use parley_core::{ChatRequest, ChatResponse, Orchestrator, StreamEvent};
use std::io::Write;
use std::sync::Arc;

/// Print a finished answer with a one-line summary on stderr
pub(crate) fn print_response(response: &ChatResponse) {
    println!("{}", response.content);

    let source = match (response.cache_type, response.tier) {
        (Some(cache_type), _) => format!("cache:{}", cache_type.as_str()),
        (None, Some(tier)) => tier.to_string(),
        (None, None) => "unknown".to_string(),
    };
    eprintln!(
        "[{source}] {} | {} in / {} out | ${:.6} | {}",
        response.model,
        response.usage.input_tokens,
        response.usage.output_tokens,
        response.cost,
        response.stop_reason
    );
}

/// Stream an answer to stdout and return the text printed
pub(crate) async fn stream_response(
    orchestrator: &Arc<Orchestrator>,
    request: ChatRequest,
) -> Result<String> {
    let mut rx = orchestrator.chat_stream(request);
    let mut text = String::new();
    let mut stdout = std::io::stdout();

    while let Some(event) = rx.recv().await {
        match event {
            StreamEvent::Text { content } => {
                print!("{content}");
                stdout.flush()?;
                text.push_str(&content);
            }
            StreamEvent::ToolStart { tool } => eprintln!("\n[tool] {tool} ..."),
            StreamEvent::ToolComplete { tool, success } => {
                let status = if success { "ok" } else { "failed" };
                eprintln!("[tool] {tool} {status}");
            }
            StreamEvent::Done { stop_reason } => {
                println!();
                eprintln!("[{stop_reason}]");
                return Ok(text);
            }
            StreamEvent::Error { message } => {
                println!();
                bail!(message);
            }
        }
    }

    bail!("stream ended without a result")
}
