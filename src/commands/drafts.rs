use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;

use super::send::print_outcome;
use super::{api_failure, preview, report_unsaved, resolve_recipients, Context};
use crate::drafts::{ensure_pending, new_draft, position, take};
use crate::schedule;

#[derive(Subcommand)]
pub enum DraftsCommand {
    /// Show saved drafts
    Show,
    /// Save a scheduled message locally without sending it
    Add {
        #[arg(short, long = "list")]
        lists: Vec<String>,
        #[arg(long)]
        to: Vec<String>,
        #[arg(short, long)]
        message: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
    },
    Remove { id: String },
    /// Hand a draft to the server for scheduled delivery
    Submit { id: String },
}

pub async fn run(ctx: &mut Context, command: DraftsCommand) -> Result<()> {
    let mut drafts = ctx.store.drafts()?;

    match command {
        DraftsCommand::Show => {
            if drafts.is_empty() {
                println!("No drafts.");
            }
            for d in &drafts {
                println!(
                    "{}  {}  → {} recipients  {}",
                    short_id(&d.id),
                    d.scheduled_for,
                    d.recipients.len(),
                    preview(&d.message, 40)
                );
            }
        }
        DraftsCommand::Add {
            lists,
            to,
            message,
            date,
            time,
        } => {
            if message.trim().is_empty() {
                anyhow::bail!("Message is empty");
            }
            let recipients = resolve_recipients(&ctx.lists()?, &lists, &to)?;
            if recipients.is_empty() {
                anyhow::bail!("No recipients: use --list and/or --to");
            }
            let when = schedule::convert(&date, &time, ctx.config.offset_source()?)?;
            when.ensure_future(Utc::now())?;
            let draft = new_draft(recipients, &message, &when, Utc::now());
            println!("Draft {} for {}", short_id(&draft.id), when.confirmation());
            drafts.push(draft);
            report_unsaved(ctx.store.save_drafts(&drafts), "drafts");
        }
        DraftsCommand::Remove { id } => {
            let removed = take(&mut drafts, &id)?;
            report_unsaved(ctx.store.save_drafts(&drafts), "drafts");
            println!("Removed draft {}", removed.id);
        }
        DraftsCommand::Submit { id } => {
            let idx = position(&drafts, &id)?;
            let draft = &drafts[idx];
            let at = ensure_pending(draft, Utc::now())?;
            let resp = ctx
                .client()?
                .send(&draft.recipients, &draft.message, Some(draft.scheduled_for.clone()))
                .await
                .map_err(api_failure)?;
            print_outcome(&resp);
            if !resp.success {
                anyhow::bail!("Draft {} kept; the server did not accept it", short_id(&draft.id));
            }
            log::info!("submitted draft {} for {}", draft.id, schedule::format_utc(at));
            drafts.remove(idx);
            report_unsaved(ctx.store.save_drafts(&drafts), "drafts");
        }
    }
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
