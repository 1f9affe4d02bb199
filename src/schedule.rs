//! Local wall-clock to UTC conversion for scheduled sends.
//!
//! Offsets follow the browser convention: minutes *behind* UTC, so
//! `utc = local + offset` (CET in winter is `-60`, EST is `300`).

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use thiserror::Error;

pub const UTC_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
const UTC_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const LOCAL_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("unknown time zone '{0}'")]
    UnknownZone(String),
    #[error("{local} does not exist in {zone}: clocks skip over it")]
    NonexistentLocalTime { local: NaiveDateTime, zone: String },
    #[error("{local} happens twice in {zone}: clocks repeat it")]
    AmbiguousLocalTime { local: NaiveDateTime, zone: String },
    #[error("scheduled time {0} is not in the future")]
    InPast(String),
}

/// Where the UTC offset for a conversion comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetSource {
    /// One offset, captured up front and applied to any date.
    Fixed(i32),
    /// The offset in force at the converted instant.
    Zone(Tz),
}

impl OffsetSource {
    /// The host's offset right now.
    pub fn current_local() -> Self {
        let east = chrono::Local::now().offset().local_minus_utc();
        OffsetSource::Fixed(-east / 60)
    }

    pub fn zone(name: &str) -> Result<Self, ScheduleError> {
        name.trim()
            .parse::<Tz>()
            .map(OffsetSource::Zone)
            .map_err(|_| ScheduleError::UnknownZone(name.to_string()))
    }

    /// The host's IANA zone, if the platform reports one.
    pub fn detect_zone() -> Option<Self> {
        let name = iana_time_zone::get_timezone().ok()?;
        Self::zone(&name).ok()
    }

    pub fn describe(&self) -> String {
        match self {
            OffsetSource::Fixed(m) => format!("fixed offset {}", format_offset(*m)),
            OffsetSource::Zone(tz) => tz.name().to_string(),
        }
    }
}

/// A confirmed schedule: the wall-clock time the user picked and the instant it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTime {
    pub local: NaiveDateTime,
    pub utc: DateTime<Utc>,
    /// Minutes behind UTC at `local`.
    pub offset_minutes: i32,
}

impl ScheduledTime {
    pub fn utc_display(&self) -> String {
        format_utc(self.utc)
    }

    pub fn utc_iso(&self) -> String {
        self.utc.format(UTC_ISO_FORMAT).to_string()
    }

    pub fn local_iso(&self) -> String {
        self.local.format(LOCAL_ISO_FORMAT).to_string()
    }

    /// e.g. "Sunday, March 9, 2025 at 14:30 (UTC-05:00)"
    pub fn confirmation(&self) -> String {
        format!(
            "{} ({})",
            self.local.format("%A, %B %-d, %Y at %H:%M"),
            format_offset(self.offset_minutes)
        )
    }

    pub fn ensure_future(&self, now: DateTime<Utc>) -> Result<(), ScheduleError> {
        if self.utc <= now {
            return Err(ScheduleError::InPast(self.utc_display()));
        }
        Ok(())
    }
}

pub fn parse_date(date: &str) -> Result<NaiveDate, ScheduleError> {
    let date = date.trim();
    let shaped = date.len() == 10 && date.as_bytes()[4] == b'-' && date.as_bytes()[7] == b'-';
    if !shaped {
        return Err(ScheduleError::InvalidDate(date.to_string()));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| ScheduleError::InvalidDate(date.to_string()))
}

pub fn parse_time(time: &str) -> Result<NaiveTime, ScheduleError> {
    let time = time.trim();
    if time.len() != 5 || time.as_bytes()[2] != b':' {
        return Err(ScheduleError::InvalidTime(time.to_string()));
    }
    NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| ScheduleError::InvalidTime(time.to_string()))
}

/// Validate `date`/`time` and convert them to UTC.
pub fn convert(date: &str, time: &str, source: OffsetSource) -> Result<ScheduledTime, ScheduleError> {
    let local = parse_date(date)?.and_time(parse_time(time)?);
    let (utc, offset_minutes) = local_to_utc(local, source)?;
    log::debug!(
        "schedule {} local -> {} ({})",
        local,
        format_utc(utc),
        source.describe()
    );
    Ok(ScheduledTime {
        local,
        utc,
        offset_minutes,
    })
}

pub fn local_to_utc(
    local: NaiveDateTime,
    source: OffsetSource,
) -> Result<(DateTime<Utc>, i32), ScheduleError> {
    match source {
        OffsetSource::Fixed(minutes) => {
            let utc = local + Duration::minutes(i64::from(minutes));
            Ok((Utc.from_utc_datetime(&utc), minutes))
        }
        OffsetSource::Zone(tz) => match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => {
                let minutes = -dt.offset().fix().local_minus_utc() / 60;
                Ok((dt.with_timezone(&Utc), minutes))
            }
            LocalResult::None => Err(ScheduleError::NonexistentLocalTime {
                local,
                zone: tz.name().to_string(),
            }),
            LocalResult::Ambiguous(_, _) => Err(ScheduleError::AmbiguousLocalTime {
                local,
                zone: tz.name().to_string(),
            }),
        },
    }
}

/// Wall-clock time at `utc`, for showing a stored schedule back to the user.
pub fn to_local(utc: DateTime<Utc>, source: OffsetSource) -> NaiveDateTime {
    match source {
        OffsetSource::Fixed(minutes) => utc.naive_utc() - Duration::minutes(i64::from(minutes)),
        OffsetSource::Zone(tz) => utc.with_timezone(&tz).naive_local(),
    }
}

pub fn format_utc(utc: DateTime<Utc>) -> String {
    utc.format(UTC_DISPLAY_FORMAT).to_string()
}

/// Parse a backend timestamp. Accepts RFC 3339 and the naive ISO form the
/// backend stores (treated as UTC).
pub fn parse_backend_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = value.trim_end_matches('Z');
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|n| n.and_utc())
}

/// Minutes-behind-UTC rendered the usual way round, e.g. `-60` -> `UTC+01:00`.
fn format_offset(minutes_behind: i32) -> String {
    let east = -minutes_behind;
    let sign = if east < 0 { '-' } else { '+' };
    let abs = east.abs();
    format!("UTC{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ny() -> OffsetSource {
        OffsetSource::zone("America/New_York").unwrap()
    }

    #[test]
    fn fixed_offset_ahead_of_utc() {
        // CET: one hour ahead, browser offset -60
        let s = convert("2025-06-01", "12:00", OffsetSource::Fixed(-60)).unwrap();
        assert_eq!(s.utc_display(), "2025-06-01 11:00:00 UTC");
        assert_eq!(s.utc_iso(), "2025-06-01T11:00:00Z");
        assert_eq!(s.local_iso(), "2025-06-01T12:00:00");
    }

    #[test]
    fn fixed_offset_crosses_midnight() {
        let s = convert("2025-12-31", "22:30", OffsetSource::Fixed(300)).unwrap();
        assert_eq!(s.utc_display(), "2026-01-01 03:30:00 UTC");
    }

    #[test]
    fn zone_offset_is_read_at_the_converted_instant() {
        let summer = convert("2025-07-01", "12:00", OffsetSource::zone("Europe/Berlin").unwrap()).unwrap();
        let winter = convert("2025-01-15", "12:00", OffsetSource::zone("Europe/Berlin").unwrap()).unwrap();
        assert_eq!(summer.utc_display(), "2025-07-01 10:00:00 UTC");
        assert_eq!(summer.offset_minutes, -120);
        assert_eq!(winter.utc_display(), "2025-01-15 11:00:00 UTC");
        assert_eq!(winter.offset_minutes, -60);
    }

    #[test]
    fn spring_forward_gap_is_rejected_for_zones() {
        let err = convert("2025-03-09", "02:30", ny()).unwrap_err();
        assert!(matches!(err, ScheduleError::NonexistentLocalTime { .. }));
    }

    #[test]
    fn spring_forward_gap_with_fixed_offset_applies_it_unconditionally() {
        let s = convert("2025-03-09", "02:30", OffsetSource::Fixed(300)).unwrap();
        assert_eq!(s.utc_display(), "2025-03-09 07:30:00 UTC");
    }

    #[test]
    fn fall_back_overlap_is_rejected_for_zones() {
        let err = convert("2025-11-02", "01:30", ny()).unwrap_err();
        assert!(matches!(err, ScheduleError::AmbiguousLocalTime { .. }));
    }

    #[test]
    fn round_trip_without_transition() {
        for source in [OffsetSource::Fixed(-330), OffsetSource::Fixed(480), ny()] {
            let s = convert("2025-05-20", "09:45", source).unwrap();
            assert_eq!(to_local(s.utc, source), s.local, "{}", source.describe());
        }
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        let fixed = OffsetSource::Fixed(0);
        assert_eq!(
            convert("2025-3-9", "10:00", fixed).unwrap_err(),
            ScheduleError::InvalidDate("2025-3-9".into())
        );
        assert!(matches!(convert("2025-02-30", "10:00", fixed), Err(ScheduleError::InvalidDate(_))));
        assert!(matches!(convert("2025-02-10", "25:00", fixed), Err(ScheduleError::InvalidTime(_))));
        assert!(matches!(convert("2025-02-10", "9:00", fixed), Err(ScheduleError::InvalidTime(_))));
        assert!(matches!(convert("2025-02-10", "09:00:00", fixed), Err(ScheduleError::InvalidTime(_))));
    }

    #[test]
    fn unknown_zone() {
        assert_eq!(
            OffsetSource::zone("Mars/Olympus").unwrap_err(),
            ScheduleError::UnknownZone("Mars/Olympus".into())
        );
    }

    #[test]
    fn confirmation_is_in_local_time() {
        let s = convert("2025-03-09", "14:30", OffsetSource::Fixed(300)).unwrap();
        assert_eq!(s.confirmation(), "Sunday, March 9, 2025 at 14:30 (UTC-05:00)");
        let s = convert("2025-03-09", "14:30", OffsetSource::Fixed(-330)).unwrap();
        assert!(s.confirmation().ends_with("(UTC+05:30)"));
    }

    #[test]
    fn past_schedules_are_flagged() {
        let s = convert("2025-01-01", "00:00", OffsetSource::Fixed(0)).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 1).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap();
        assert!(matches!(s.ensure_future(later), Err(ScheduleError::InPast(_))));
        assert!(s.ensure_future(earlier).is_ok());
    }

    #[test]
    fn backend_timestamps() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 9, 7, 30, 0).unwrap();
        assert_eq!(parse_backend_timestamp("2025-03-09T07:30:00Z"), Some(expected));
        assert_eq!(parse_backend_timestamp("2025-03-09T07:30:00"), Some(expected));
        assert_eq!(parse_backend_timestamp("2025-03-09T07:30:00.000000Z"), Some(expected));
        assert_eq!(parse_backend_timestamp("2025-03-09T08:30:00+01:00"), Some(expected));
        assert_eq!(parse_backend_timestamp("soon"), None);
    }
}
