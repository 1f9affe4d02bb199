use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Subcommand;
use std::fs;
use std::path::{Path, PathBuf};

use super::Context;
use crate::lists::{parse_import, GroupType, ImportError};

#[derive(Subcommand)]
pub enum ListsCommand {
    /// Show all lists, or the recipients of one
    Show { list: Option<String> },
    New { name: String },
    Delete { list: String },
    Rename { list: String, name: String },
    /// Add a recipient (@handle or numeric chat id)
    Add {
        list: String,
        identifier: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 't', long = "type", default_value = "user")]
        kind: GroupType,
    },
    /// Remove a recipient by identifier or id
    Remove { list: String, recipient: String },
    Export {
        /// Only export this list
        #[arg(short, long)]
        list: Option<String>,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    Import {
        file: PathBuf,
        /// Merge every recipient into this existing list instead of adding new lists
        #[arg(long)]
        into: Option<String>,
    },
}

pub fn run(ctx: &mut Context, command: ListsCommand) -> Result<()> {
    let mut lists = ctx.lists()?;
    let now = Utc::now();

    match command {
        ListsCommand::Show { list: None } => {
            if lists.is_empty() {
                println!("No lists yet. Create one with `messagehub lists new <NAME>`.");
            }
            for l in lists.lists() {
                println!("{:<30} {:>4} recipients  {}", l.name, l.groups.len(), l.id);
            }
        }
        ListsCommand::Show { list: Some(key) } => {
            let l = lists
                .find(&key)
                .ok_or_else(|| anyhow::anyhow!("List '{}' not found", key))?;
            println!("{} ({} recipients)", l.name, l.groups.len());
            for g in &l.groups {
                println!("  {:<6} {:<24} {}", g.kind, g.identifier, g.name);
            }
        }
        ListsCommand::New { name } => {
            let id = lists.create(&name, now)?.id.clone();
            ctx.save_lists(&lists);
            println!("Created '{}' ({})", name.trim(), id);
        }
        ListsCommand::Delete { list } => {
            let removed = lists.delete(&list)?;
            ctx.save_lists(&lists);
            println!("Deleted '{}' ({} recipients)", removed.name, removed.groups.len());
        }
        ListsCommand::Rename { list, name } => {
            lists.rename(&list, &name)?;
            ctx.save_lists(&lists);
            println!("Renamed to '{}'", name.trim());
        }
        ListsCommand::Add {
            list,
            identifier,
            name,
            kind,
        } => {
            let g = lists.add_group(&list, name.as_deref().unwrap_or(""), kind, &identifier)?;
            ctx.save_lists(&lists);
            println!("Added {} ({})", g.name, g.identifier);
        }
        ListsCommand::Remove { list, recipient } => {
            let g = lists.remove_group(&list, &recipient)?;
            ctx.save_lists(&lists);
            println!("Removed {} ({})", g.name, g.identifier);
        }
        ListsCommand::Export { list, output } => {
            let json = match list {
                Some(key) => lists.export_one(&key, now)?,
                None => lists.export(now)?,
            };
            match output {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("could not write {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        ListsCommand::Import { file, into } => import(ctx, lists, &file, into.as_deref())?,
    }
    Ok(())
}

fn import(ctx: &mut Context, mut lists: crate::lists::ListCollection, file: &Path, into: Option<&str>) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("could not read {}", file.display()))?;
    let doc = parse_import(&text)?;

    match into {
        Some(key) => match lists.import_into(key, doc) {
            Ok(added) => {
                ctx.save_lists(&lists);
                println!("Imported {} new contacts", added);
            }
            Err(ImportError::NothingToImport) => println!("No new contacts to import"),
            Err(e) => return Err(e.into()),
        },
        None => {
            let summary = lists.import_all(doc, Utc::now());
            ctx.save_lists(&lists);
            for (from, to) in &summary.renamed {
                println!("'{}' already exists, imported as '{}'", from, to);
            }
            println!(
                "Imported {} lists with {} contacts",
                summary.lists_added, summary.groups_added
            );
        }
    }
    Ok(())
}
