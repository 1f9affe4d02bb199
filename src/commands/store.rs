use anyhow::Result;
use clap::Subcommand;

use super::Context;
use crate::storage::SESSION_KEY;

#[derive(Subcommand)]
pub enum StoreCommand {
    /// List stored keys and their sizes
    Keys,
    /// Print the raw value of a key
    Get { key: String },
    Remove { key: String },
    /// Remove every key, including the session and all lists
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(ctx: &mut Context, command: StoreCommand) -> Result<()> {
    match command {
        StoreCommand::Keys => {
            let keys = ctx.store.inspect()?;
            if keys.is_empty() {
                println!("Store is empty.");
            }
            let total: usize = keys.iter().map(|k| k.bytes).sum();
            for k in &keys {
                println!("{:<32} {:>8} bytes", k.key, k.bytes);
            }
            println!("{} keys, {} bytes", keys.len(), total);
        }
        StoreCommand::Get { key } => match ctx.store.raw(&key)? {
            Some(_) if key == SESSION_KEY => println!("(session token hidden)"),
            Some(value) => match serde_json::from_str::<serde_json::Value>(&value) {
                Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
                Err(_) => println!("{}", value),
            },
            None => anyhow::bail!("No such key: {}", key),
        },
        StoreCommand::Remove { key } => {
            if ctx.store.remove(&key)? {
                println!("Removed {}", key);
            } else {
                println!("No such key: {}", key);
            }
        }
        StoreCommand::Clear { yes } => {
            if !yes {
                anyhow::bail!("This removes every stored key. Re-run with --yes to confirm.");
            }
            let n = ctx.store.clear()?;
            println!("Removed {} keys", n);
        }
    }
    Ok(())
}
