use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;

use super::{api_failure, resolve_recipients, Context};
use crate::api::client::MediaSchedule;
use crate::api::models::SendResponse;
use crate::media;
use crate::schedule::{self, ScheduledTime};

pub struct SendArgs {
    pub lists: Vec<String>,
    pub to: Vec<String>,
    pub message: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub images: Vec<PathBuf>,
}

/// Convert an optional `--date`/`--time` pair with the configured offset source.
pub fn schedule_from_args(ctx: &Context, date: Option<&str>, time: Option<&str>) -> Result<Option<ScheduledTime>> {
    match (date, time) {
        (None, None) => Ok(None),
        (Some(d), Some(t)) => {
            let source = ctx.config.offset_source()?;
            let when = schedule::convert(d, t, source)?;
            when.ensure_future(Utc::now())?;
            Ok(Some(when))
        }
        _ => anyhow::bail!("--date and --time must be given together"),
    }
}

pub async fn run(ctx: &Context, args: SendArgs) -> Result<()> {
    let lists = ctx.lists()?;
    let recipients = resolve_recipients(&lists, &args.lists, &args.to)?;
    if recipients.is_empty() {
        anyhow::bail!("No recipients: use --list and/or --to");
    }

    let when = schedule_from_args(ctx, args.date.as_deref(), args.time.as_deref())?;
    if let Some(w) = &when {
        println!("Scheduling for {} = {}", w.confirmation(), w.utc_display());
    }

    let client = ctx.client()?;
    let result = if args.images.is_empty() {
        if args.message.trim().is_empty() {
            anyhow::bail!("Message is empty");
        }
        client
            .send(&recipients, &args.message, when.as_ref().map(|w| w.utc_iso()))
            .await
    } else {
        let attachments = media::load_all(&args.images)?;
        media::ensure_payload(&args.message, &attachments)?;
        let schedule = when.as_ref().map(|w| MediaSchedule {
            local_iso: w.local_iso(),
            offset_minutes: w.offset_minutes,
        });
        client
            .send_media(&recipients, &args.message, schedule.as_ref(), attachments)
            .await
    };
    let resp = result.map_err(api_failure)?;

    print_outcome(&resp);
    Ok(())
}

pub fn print_outcome(resp: &SendResponse) {
    println!("{}", outcome_lines(resp).join("\n"));
}

fn outcome_lines(resp: &SendResponse) -> Vec<String> {
    let mut lines = Vec::new();
    if !resp.success {
        lines.push(format!(
            "Server reported a failure: {}",
            resp.message.as_deref().unwrap_or("no details")
        ));
    } else if let Some(id) = resp.scheduled_id {
        lines.push(format!("Scheduled (id {}).", id));
        return lines;
    } else if let Some(msg) = &resp.message {
        lines.push(msg.clone());
    }
    let sent = resp.sent_count.unwrap_or(0);
    let failed = resp.failed_count.unwrap_or(0);
    match resp.media_count {
        Some(n) if n > 0 => lines.push(format!("Sent to {} recipients with {} images, {} failed.", sent, n, failed)),
        _ => lines.push(format!("Sent to {} recipients, {} failed.", sent, failed)),
    }
    for r in resp.results.iter().filter(|r| !r.success) {
        lines.push(format!(
            "  ✗ {} ({}): {}",
            r.recipient,
            r.identifier,
            r.error.as_deref().unwrap_or("unknown error")
        ));
    }
    lines
}

pub fn preview_conversion(ctx: &Context, date: &str, time: &str, zone: Option<&str>) -> Result<()> {
    let source = match zone {
        Some(z) => schedule::OffsetSource::zone(z)?,
        None => ctx.config.offset_source()?,
    };
    let when = schedule::convert(date, time, source)?;
    println!("Local:  {}", when.confirmation());
    println!("UTC:    {}", when.utc_display());
    println!("Source: {}", source.describe());
    println!("Back:   {}", schedule::to_local(when.utc, source).format("%Y-%m-%d %H:%M"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::DeliveryResult;

    #[test]
    fn outcome_shows_server_message_and_failures() {
        let resp = SendResponse {
            success: true,
            sent_count: Some(1),
            failed_count: Some(1),
            results: vec![DeliveryResult {
                recipient: "Bob".into(),
                identifier: "@bob".into(),
                success: false,
                error: Some("blocked".into()),
            }],
            message: Some("Sent to 1 of 2".into()),
            ..SendResponse::default()
        };
        assert_eq!(
            outcome_lines(&resp),
            vec!["Sent to 1 of 2", "Sent to 1 recipients, 1 failed.", "  ✗ Bob (@bob): blocked"]
        );
    }

    #[test]
    fn outcome_flags_unsuccessful_replies() {
        let resp = SendResponse {
            success: false,
            message: Some("Not connected".into()),
            ..SendResponse::default()
        };
        assert_eq!(outcome_lines(&resp)[0], "Server reported a failure: Not connected");

        let scheduled = SendResponse {
            success: true,
            scheduled_id: Some(4),
            ..SendResponse::default()
        };
        assert_eq!(outcome_lines(&scheduled), vec!["Scheduled (id 4)."]);
    }
}
