//! Locally held scheduled-message drafts and the tallies shown for the
//! backend's scheduled queue.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::api::models::{MessageStatus, ScheduledMessage};
use crate::lists::Group;
use crate::schedule::{format_utc, parse_backend_timestamp, ScheduledTime};
use crate::utils::{new_id, rfc3339};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("draft id cannot be empty")]
    EmptyId,
    #[error("draft '{0}' not found")]
    NotFound(String),
    #[error("'{prefix}' matches {count} drafts; use more of the id")]
    Ambiguous { prefix: String, count: usize },
    #[error("draft time '{0}' is unreadable")]
    UnreadableTime(String),
    #[error("draft was scheduled for {0}, which has passed")]
    Expired(String),
}

pub fn new_draft(recipients: Vec<Group>, message: &str, when: &ScheduledTime, now: DateTime<Utc>) -> ScheduledMessage {
    ScheduledMessage {
        id: new_id(),
        recipients,
        message: message.to_string(),
        scheduled_for: when.utc_iso(),
        status: MessageStatus::Pending,
        created_at: Some(rfc3339(now)),
        executed_at: None,
    }
}

/// Index of the draft whose id is `id`, or the only one starting with it.
pub fn position(drafts: &[ScheduledMessage], id: &str) -> Result<usize, DraftError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(DraftError::EmptyId);
    }
    if let Some(idx) = drafts.iter().position(|d| d.id == id) {
        return Ok(idx);
    }
    let matches: Vec<usize> = drafts
        .iter()
        .enumerate()
        .filter(|(_, d)| d.id.starts_with(id))
        .map(|(i, _)| i)
        .collect();
    match matches.as_slice() {
        [] => Err(DraftError::NotFound(id.to_string())),
        [idx] => Ok(*idx),
        _ => Err(DraftError::Ambiguous {
            prefix: id.to_string(),
            count: matches.len(),
        }),
    }
}

pub fn take(drafts: &mut Vec<ScheduledMessage>, id: &str) -> Result<ScheduledMessage, DraftError> {
    let idx = position(drafts, id)?;
    Ok(drafts.remove(idx))
}

/// A draft can only be handed over while its instant is still ahead of `now`;
/// the server sends anything already due straight away.
pub fn ensure_pending(draft: &ScheduledMessage, now: DateTime<Utc>) -> Result<DateTime<Utc>, DraftError> {
    let at = parse_backend_timestamp(&draft.scheduled_for)
        .ok_or_else(|| DraftError::UnreadableTime(draft.scheduled_for.clone()))?;
    if at <= now {
        return Err(DraftError::Expired(format_utc(at)));
    }
    Ok(at)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub pending: usize,
    pub sent: usize,
    pub failed: usize,
}

impl StatusSummary {
    pub fn total(&self) -> usize {
        self.pending + self.sent + self.failed
    }
}

pub fn summarize(messages: &[ScheduledMessage]) -> StatusSummary {
    messages.iter().fold(StatusSummary::default(), |mut acc, m| {
        match m.status {
            MessageStatus::Pending => acc.pending += 1,
            MessageStatus::Sent => acc.sent += 1,
            MessageStatus::Failed => acc.failed += 1,
        }
        acc
    })
}

/// Pending messages in the order they will go out. Entries whose timestamp
/// cannot be read sort last.
pub fn upcoming(messages: &[ScheduledMessage]) -> Vec<&ScheduledMessage> {
    let mut pending: Vec<&ScheduledMessage> = messages
        .iter()
        .filter(|m| m.status == MessageStatus::Pending)
        .collect();
    pending.sort_by_key(|m| {
        parse_backend_timestamp(&m.scheduled_for)
            .map(|t| (0, t.timestamp()))
            .unwrap_or((1, 0))
    });
    pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{convert, OffsetSource};
    use chrono::TimeZone;

    fn msg(id: &str, status: MessageStatus, at: &str) -> ScheduledMessage {
        ScheduledMessage {
            id: id.into(),
            recipients: vec![],
            message: "m".into(),
            scheduled_for: at.into(),
            status,
            created_at: None,
            executed_at: None,
        }
    }

    #[test]
    fn draft_carries_utc_instant() {
        let when = convert("2025-06-01", "12:00", OffsetSource::Fixed(-120)).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let d = new_draft(vec![], "hello", &when, now);
        assert_eq!(d.scheduled_for, "2025-06-01T10:00:00Z");
        assert_eq!(d.status, MessageStatus::Pending);
        assert_eq!(d.created_at.as_deref(), Some("2025-05-01T00:00:00.000Z"));
    }

    #[test]
    fn take_by_id_or_prefix() {
        let mut drafts = vec![msg("abc-123", MessageStatus::Pending, "x"), msg("def", MessageStatus::Pending, "x")];
        assert_eq!(take(&mut drafts, "abc").unwrap().id, "abc-123");
        assert_eq!(take(&mut drafts, "zzz").unwrap_err(), DraftError::NotFound("zzz".into()));
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn empty_or_ambiguous_ids_remove_nothing() {
        let mut drafts = vec![msg("abc-1", MessageStatus::Pending, "x"), msg("abc-2", MessageStatus::Pending, "x")];
        assert_eq!(take(&mut drafts, "").unwrap_err(), DraftError::EmptyId);
        assert_eq!(take(&mut drafts, "  ").unwrap_err(), DraftError::EmptyId);
        assert_eq!(
            take(&mut drafts, "abc").unwrap_err(),
            DraftError::Ambiguous { prefix: "abc".into(), count: 2 }
        );
        assert_eq!(drafts.len(), 2);

        // a full id wins even when it is also a prefix of another id
        let mut drafts = vec![msg("abc", MessageStatus::Pending, "x"), msg("abc-2", MessageStatus::Pending, "x")];
        assert_eq!(take(&mut drafts, "abc").unwrap().id, "abc");
    }

    #[test]
    fn lapsed_drafts_are_not_pending() {
        let now = Utc.with_ymd_and_hms(2025, 3, 9, 8, 0, 0).unwrap();
        let later = msg("a", MessageStatus::Pending, "2025-03-09T08:01:00Z");
        let lapsed = msg("b", MessageStatus::Pending, "2025-03-09T07:55:00Z");
        let exact = msg("c", MessageStatus::Pending, "2025-03-09T08:00:00Z");
        let garbled = msg("d", MessageStatus::Pending, "tomorrow");

        assert_eq!(ensure_pending(&later, now).unwrap(), now + chrono::Duration::minutes(1));
        assert_eq!(
            ensure_pending(&lapsed, now).unwrap_err(),
            DraftError::Expired("2025-03-09 07:55:00 UTC".into())
        );
        assert!(matches!(ensure_pending(&exact, now), Err(DraftError::Expired(_))));
        assert!(matches!(ensure_pending(&garbled, now), Err(DraftError::UnreadableTime(_))));
    }

    #[test]
    fn summary_counts_statuses() {
        let all = vec![
            msg("1", MessageStatus::Pending, "x"),
            msg("2", MessageStatus::Sent, "x"),
            msg("3", MessageStatus::Failed, "x"),
            msg("4", MessageStatus::Pending, "x"),
        ];
        let s = summarize(&all);
        assert_eq!(s, StatusSummary { pending: 2, sent: 1, failed: 1 });
        assert_eq!(s.total(), 4);
    }

    #[test]
    fn upcoming_sorted_by_time() {
        let all = vec![
            msg("late", MessageStatus::Pending, "2025-02-01T00:00:00Z"),
            msg("bad", MessageStatus::Pending, "whenever"),
            msg("done", MessageStatus::Sent, "2025-01-01T00:00:00Z"),
            msg("early", MessageStatus::Pending, "2025-01-01T00:00:00"),
        ];
        let ids: Vec<&str> = upcoming(&all).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", "bad"]);
    }
}
