//! `parley chat` - interactive conversation
//!
//! Lines starting with `/` are commands: `/stats`, `/reset`, `/quit`.

use super::render::{print_response, stream_response};
use anyhow::Result;
use parley_core::{ChatRequest, MemoryTranscriptStore, Orchestrator, TranscriptStore};
use parley_llm::{format_snapshot, Turn};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// What to do with one input line
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Message(&'a str),
    Stats,
    Reset,
    Quit,
    Empty,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line {
        "" => Input::Empty,
        "/stats" => Input::Stats,
        "/reset" => Input::Reset,
        "/quit" | "/exit" => Input::Quit,
        cmd if cmd.starts_with('/') => Input::Unknown(cmd),
        message => Input::Message(message),
    }
}

/// Run `parley chat`
pub async fn run(tenant: &str, stream: bool) -> Result<()> {
    let transcripts = Arc::new(MemoryTranscriptStore::new());
    let store: Arc<dyn TranscriptStore> = transcripts.clone();
    let orchestrator = super::start(Some(store))?;

    let conversation_id = uuid::Uuid::new_v4().to_string();
    info!(%conversation_id, tenant, "Conversation started");
    println!("Parley chat ({tenant}). Commands: /stats /reset /quit");

    let mut history: Vec<Turn> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Stats => print_stats(&orchestrator),
            Input::Reset => {
                history.clear();
                println!("History cleared.");
            }
            Input::Unknown(cmd) => eprintln!("Unknown command: {cmd}"),
            Input::Message(message) => {
                let request = ChatRequest::new(tenant, message)
                    .with_history(history.clone())
                    .with_conversation_id(conversation_id.clone());

                let answer = if stream {
                    stream_response(&orchestrator, request).await
                } else {
                    orchestrator
                        .chat(request)
                        .await
                        .map(|response| {
                            print_response(&response);
                            response.content
                        })
                        .map_err(|e| anyhow::anyhow!(e.user_message()))
                };

                match answer {
                    Ok(text) => {
                        history.push(Turn::user(message));
                        history.push(Turn::assistant(text));
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
        }
    }

    println!();
    print_stats(&orchestrator);
    println!(
        "Transcript {conversation_id}: {} lines",
        transcripts.history(&conversation_id).len()
    );
    Ok(())
}

fn print_stats(orchestrator: &Orchestrator) {
    println!("{}", format_snapshot(&orchestrator.accountant().snapshot()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("  "), Input::Empty);
        assert_eq!(parse_input("/stats"), Input::Stats);
        assert_eq!(parse_input("/reset "), Input::Reset);
        assert_eq!(parse_input("/exit"), Input::Quit);
        assert_eq!(parse_input("/help"), Input::Unknown("/help"));
        assert_eq!(
            parse_input(" Book me for Tuesday "),
            Input::Message("Book me for Tuesday")
        );
    }
}
