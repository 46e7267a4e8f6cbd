//! `chatrelay send`: submit one message through the relay pipeline.

use anyhow::Result;
use console::style;

use chatrelay_types::error::RelayError;
use chatrelay_types::message::SubmitMessageRequest;

use chatrelay_api::state::AppState;

/// Run one submission and report the outcome.
///
/// A fanout failure is reported but the stored message is still printed,
/// since it is durable and visible in history.
pub async fn send_message(state: &AppState, request: SubmitMessageRequest, json: bool) -> Result<()> {
    match state.relay_service.submit(request).await {
        Ok(message) => {
            if json {
                let out = serde_json::json!({ "status": "ok", "message": message });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!();
                println!(
                    "  {} Message {} sent to {}",
                    style("✓").green().bold(),
                    style(format!("#{}", message.id)).bold(),
                    style(&message.channel).cyan()
                );
                println!();
            }
            Ok(())
        }
        Err(RelayError::Fanout { message, source }) => {
            if json {
                let out = serde_json::json!({
                    "error": format!("message saved but live delivery failed: {source}"),
                    "stage": "fanout",
                    "message": message,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!();
                println!(
                    "  {} Message {} saved to {} but hub delivery failed:",
                    style("!").yellow().bold(),
                    style(format!("#{}", message.id)).bold(),
                    style(&message.channel).cyan()
                );
                println!("    {}", style(&source).dim());
                println!();
            }
            Err(anyhow::anyhow!("fanout failed for message {}", message.id))
        }
        Err(e) => Err(anyhow::anyhow!("[{}] {e}", e.stage())),
    }
}
