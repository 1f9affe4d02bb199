pub mod auth;
pub mod config;
pub mod drafts;
pub mod lists;
pub mod scheduled;
pub mod send;
pub mod store;

use anyhow::{Context as _, Result};

use crate::api::client::{ApiClient, ApiError};
use crate::app::AppConfig;
use crate::lists::{Group, GroupType, ListCollection};
use crate::storage::{warn_unsaved, LocalStore, MemoryStore, SqliteStore, StoreError};

/// What every command works against: settings plus the local store.
pub struct Context {
    pub config: AppConfig,
    pub store: LocalStore,
}

impl Context {
    pub fn open(config: AppConfig) -> Self {
        let opened = match &config.store_path {
            Some(path) => SqliteStore::open(path),
            None => SqliteStore::open_default(),
        };
        let store = match opened {
            Ok(sqlite) => LocalStore::new(sqlite),
            Err(e) => {
                log::warn!("local store unavailable: {}", e);
                eprintln!("warning: local store unavailable ({}); nothing will be saved", e);
                LocalStore::new(MemoryStore::new())
            }
        };
        Self { config, store }
    }

    pub fn client(&self) -> Result<ApiClient> {
        let token = self.store.session_token().context("could not read session token")?;
        self.config.client(token).map_err(api_failure)
    }

    pub fn lists(&self) -> Result<ListCollection> {
        let lists = self.store.lists().context("could not read saved lists")?;
        Ok(ListCollection::new(lists))
    }

    pub fn save_lists(&mut self, lists: &ListCollection) {
        report_unsaved(self.store.save_lists(lists.lists()), "lists");
    }
}

/// Print the store warning, if any. Never fatal.
pub fn report_unsaved(result: Result<(), StoreError>, what: &str) {
    if let Some(warning) = warn_unsaved(result, what) {
        eprintln!("{}", warning);
    }
}

pub fn api_failure(e: ApiError) -> anyhow::Error {
    if e.is_timeout() {
        log::warn!("{}", e);
    } else {
        log::debug!("api error: {:?}", e);
    }
    anyhow::anyhow!(e.user_message())
}

/// Recipients from saved lists plus ad-hoc identifiers, without repeats.
pub fn resolve_recipients(lists: &ListCollection, list_keys: &[String], ad_hoc: &[String]) -> Result<Vec<Group>> {
    let mut out: Vec<Group> = Vec::new();
    for key in list_keys {
        let list = lists
            .find(key)
            .ok_or_else(|| anyhow::anyhow!("List '{}' not found", key))?;
        out.extend(list.groups.iter().cloned());
    }
    for identifier in ad_hoc {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            continue;
        }
        out.push(Group {
            id: crate::utils::new_id(),
            name: identifier.to_string(),
            kind: guess_kind(identifier),
            identifier: identifier.to_string(),
        });
    }
    let mut seen = std::collections::HashSet::new();
    out.retain(|g| seen.insert(g.identifier.clone()));
    Ok(out)
}

/// Negative numeric ids are group chats; everything else is treated as a user.
pub fn guess_kind(identifier: &str) -> GroupType {
    let digits = identifier.strip_prefix('-');
    match digits {
        Some(d) if !d.is_empty() && d.chars().all(|c| c.is_ascii_digit()) => GroupType::Group,
        _ => GroupType::User,
    }
}

pub fn preview(text: &str, max: usize) -> String {
    let single: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single.chars().count() <= max {
        single
    } else {
        let cut: String = single.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
