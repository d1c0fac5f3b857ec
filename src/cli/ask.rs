//! `parley ask` - one request, one answer

use super::render::{print_response, stream_response};
use super::AskArgs;
use anyhow::{bail, Result};
use parley_core::{ChatOptions, ChatRequest};
use parley_llm::format_snapshot;
use tracing::debug;

impl AskArgs {
    /// Request described by these arguments
    pub fn to_request(&self) -> ChatRequest {
        ChatRequest::new(self.tenant.clone(), self.message.clone()).with_options(ChatOptions {
            force_model: self.force_model.clone(),
            skip_cache: self.skip_cache,
            max_tokens: self.max_tokens,
        })
    }
}

/// Run `parley ask`
pub async fn run(args: AskArgs) -> Result<()> {
    let orchestrator = super::start(None)?;
    let request = args.to_request();
    debug!(tenant = %request.tenant_id, stream = args.stream, "Sending request");

    if args.stream {
        stream_response(&orchestrator, request).await?;
    } else {
        match orchestrator.chat(request).await {
            Ok(response) => print_response(&response),
            Err(e) => bail!(e.user_message()),
        }
    }

    if args.stats {
        println!();
        println!("{}", format_snapshot(&orchestrator.accountant().snapshot()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_request_carries_options() {
        let args = AskArgs {
            message: "Quote for a deposit refund".to_string(),
            tenant: "acme".to_string(),
            stream: false,
            force_model: Some("economy".to_string()),
            skip_cache: true,
            max_tokens: Some(64),
            stats: false,
        };
        let request = args.to_request();

        assert_eq!(request.tenant_id, "acme");
        assert_eq!(request.message, "Quote for a deposit refund");
        assert_eq!(request.options.force_model.as_deref(), Some("economy"));
        assert!(request.options.skip_cache);
        assert_eq!(request.options.max_tokens, Some(64));
        assert!(request.conversation_history.is_empty());
        assert!(!request.has_tools());
    }
}
