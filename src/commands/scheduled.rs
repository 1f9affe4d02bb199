use anyhow::Result;

use super::send::print_outcome;
use super::{api_failure, preview, report_unsaved, Context};
use crate::api::models::{MessageStatus, ScheduledMessage};
use crate::drafts::{summarize, upcoming};
use crate::schedule::{parse_backend_timestamp, to_local, OffsetSource};

/// Show the backend's scheduled queue. If the backend can't be reached the
/// last fetched copy is shown instead, marked as possibly stale.
pub async fn list(ctx: &mut Context, all: bool) -> Result<()> {
    let client = ctx.client()?;
    let messages = match client.scheduled().await {
        Ok(messages) => {
            report_unsaved(ctx.store.save_scheduled_cache(&messages), "scheduled messages");
            messages
        }
        Err(e) => {
            let cached = ctx.store.scheduled_cache().unwrap_or_default();
            if cached.is_empty() {
                return Err(api_failure(e));
            }
            eprintln!("{}\nShowing the last fetched copy, which may be out of date.", e.user_message());
            cached
        }
    };

    let source = ctx.config.offset_source()?;
    let shown: Vec<&ScheduledMessage> = if all { messages.iter().collect() } else { upcoming(&messages) };
    for m in &shown {
        print_message(m, source);
    }

    let s = summarize(&messages);
    println!(
        "{} pending, {} sent, {} failed ({} total)",
        s.pending,
        s.sent,
        s.failed,
        s.total()
    );
    Ok(())
}

fn print_message(m: &ScheduledMessage, source: OffsetSource) {
    let when = parse_backend_timestamp(&m.scheduled_for)
        .map(|utc| to_local(utc, source).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| m.scheduled_for.clone());
    let status = match m.status {
        MessageStatus::Pending => "pending",
        MessageStatus::Sent => "sent",
        MessageStatus::Failed => "failed",
    };
    println!(
        "{:<8} {:<8} {}  → {} recipients  {}",
        m.id,
        status,
        when,
        m.recipients.len(),
        preview(&m.message, 40)
    );
}

pub async fn execute(ctx: &Context, id: &str) -> Result<()> {
    let resp = ctx.client()?.execute_scheduled(id).await.map_err(api_failure)?;
    print_outcome(&resp);
    Ok(())
}

pub async fn cancel(ctx: &Context, id: &str) -> Result<()> {
    if ctx.client()?.delete_scheduled(id).await.map_err(api_failure)? {
        println!("Cancelled scheduled message {}.", id);
    } else {
        println!("Server did not confirm deleting {}.", id);
    }
    Ok(())
}

pub async fn scheduler(ctx: &Context) -> Result<()> {
    let st = ctx.client()?.scheduler_status().await.map_err(api_failure)?;
    println!(
        "Scheduler {} (server time {})",
        if st.scheduler_running { "running" } else { "stopped" },
        st.server_time.as_deref().unwrap_or("unknown")
    );
    println!(
        "{} pending, {} sent, {} failed ({} total)",
        st.stats.pending_messages, st.stats.sent_messages, st.stats.failed_messages, st.stats.total_messages
    );
    Ok(())
}
