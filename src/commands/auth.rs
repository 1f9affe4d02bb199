use anyhow::Result;

use super::{api_failure, report_unsaved, Context};
use crate::storage::Credentials;

pub async fn login(ctx: &mut Context, phone: &str, api_id: Option<String>, api_hash: Option<String>) -> Result<()> {
    let creds = match (api_id, api_hash) {
        (Some(api_id), Some(api_hash)) => {
            let creds = Credentials { api_id, api_hash };
            report_unsaved(ctx.store.save_credentials(&creds), "API credentials");
            creds
        }
        (None, None) => ctx.store.credentials()?.ok_or_else(|| {
            anyhow::anyhow!("No saved API credentials. Pass --api-id and --api-hash the first time.")
        })?,
        _ => anyhow::bail!("--api-id and --api-hash must be given together"),
    };

    println!("Connecting as {}…", phone);
    let client = ctx.client()?;
    let resp = client
        .login(&creds.api_id, &creds.api_hash, phone)
        .await
        .map_err(api_failure)?;

    if !resp.success {
        anyhow::bail!(resp.message.unwrap_or_else(|| "Login failed".into()));
    }
    if let Some(token) = resp.session_token.filter(|_| !resp.requires_code) {
        report_unsaved(ctx.store.save_session_token(&token), "session");
        println!("Logged in.");
        return Ok(());
    }
    if let Some(msg) = resp.message {
        println!("{}", msg);
    }
    println!("Enter the code you received with:\n  messagehub verify --phone {} --code <CODE>", phone);
    Ok(())
}

pub async fn verify(ctx: &mut Context, phone: &str, code: &str, password: Option<&str>) -> Result<()> {
    let client = ctx.client()?;
    let resp = client.verify(phone, code, password).await.map_err(api_failure)?;

    if resp.requires_password {
        println!("This account has two-step verification. Run again with --password <PASSWORD>.");
        return Ok(());
    }
    if !resp.success {
        anyhow::bail!(resp.message.unwrap_or_else(|| "Verification failed".into()));
    }
    match resp.session_token {
        Some(token) => {
            report_unsaved(ctx.store.save_session_token(&token), "session");
            println!("Logged in.");
            Ok(())
        }
        None => anyhow::bail!("Server accepted the code but returned no session token"),
    }
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    if ctx.store.clear_session()? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub async fn status(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    match client.health().await {
        Ok(h) => println!(
            "Server: {} {} at {} (scheduler {})",
            client.base_url(),
            h.status,
            h.timestamp.as_deref().unwrap_or("unknown time"),
            if h.scheduler_running { "running" } else { "stopped" }
        ),
        Err(e) => println!("Server: {} unreachable ({})", client.base_url(), e.user_message()),
    }

    let status = client.auth_status().await.map_err(api_failure)?;
    if status.connected {
        println!("Session: connected as {}", status.phone_number.as_deref().unwrap_or("unknown"));
    } else {
        println!("Session: not connected");
    }
    Ok(())
}

pub async fn chats(ctx: &mut Context, filter: Option<&str>, add_to: Option<&str>) -> Result<()> {
    let client = ctx.client()?;
    let chats = client.chats().await.map_err(api_failure)?;
    let needle = filter.map(|f| f.to_lowercase());
    let matching: Vec<_> = chats
        .into_iter()
        .filter(|c| match &needle {
            Some(n) => c.name.to_lowercase().contains(n) || c.identifier().to_lowercase().contains(n),
            None => true,
        })
        .collect();

    for c in &matching {
        println!("{:<12} {:<22} {}", c.kind, c.identifier(), c.name);
    }
    println!("{} chats", matching.len());

    let Some(list_key) = add_to else {
        return Ok(());
    };
    let mut lists = ctx.lists()?;
    let mut added = 0;
    for c in &matching {
        let kind = if c.kind == "user" {
            crate::lists::GroupType::User
        } else {
            crate::lists::GroupType::Group
        };
        match lists.add_group(list_key, &c.name, kind, &c.identifier()) {
            Ok(_) => added += 1,
            Err(crate::lists::ListError::DuplicateIdentifier { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }
    ctx.save_lists(&lists);
    println!("Added {} to '{}'", added, list_key);
    Ok(())
}
