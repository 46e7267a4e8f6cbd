//! `chatrelay history`: print one page of a channel's history.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use chatrelay_types::message::ChatMessage;

use chatrelay_api::state::AppState;

/// Longest message body shown in the table before truncation.
const BODY_PREVIEW_CHARS: usize = 60;

pub async fn show_history(
    state: &AppState,
    channel: &str,
    before: Option<i64>,
    json: bool,
) -> Result<()> {
    let messages = state
        .history_service
        .page(channel, before)
        .await
        .map_err(|e| anyhow::anyhow!("[{}] {e}", e.stage()))?;

    if json {
        let out = serde_json::json!({ "messages": messages });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!("  No messages in '{}'.", channel);
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Time"),
            Cell::new("User"),
            Cell::new("Read"),
            Cell::new("Message"),
        ]);

    for m in &messages {
        table.add_row(vec![
            Cell::new(m.id),
            Cell::new(m.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(&m.user_id),
            Cell::new(if m.is_read { "yes" } else { "" }),
            Cell::new(preview(&m.body)),
        ]);
    }

    println!();
    println!("  Messages in '{}' (most recent first)", style(channel).cyan());
    println!();
    println!("{table}");
    if let Some(hint) = next_page_hint(channel, &messages) {
        println!("  {}", style(hint).dim());
    }
    println!();

    Ok(())
}

fn preview(body: &str) -> String {
    let single_line = body.replace('\n', " ");
    if single_line.chars().count() > BODY_PREVIEW_CHARS {
        let cut: String = single_line.chars().take(BODY_PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        single_line
    }
}

/// Command for fetching the next (older) page, if this page was full.
fn next_page_hint(channel: &str, messages: &[ChatMessage]) -> Option<String> {
    if messages.len() < chatrelay_types::message::HISTORY_PAGE_SIZE as usize {
        return None;
    }
    messages
        .last()
        .map(|oldest| format!("Older: chatrelay history {channel} --before {}", oldest.id))
}
