use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

///
/// TimeFormat
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TimeFormat {
    #[default]
    Local,
    Utc,
}

///
/// Clock
///
/// Current-time access for hosts that stamp or render filter bounds. The
/// predicate core never reads the clock itself: callers supply date bounds
/// explicitly, so this trait exists purely as the host-facing collaborator
/// and for deterministic substitution in tests.
///

pub trait Clock {
    fn now_utc(&self) -> OffsetDateTime;

    /// Local wall-clock time; falls back to UTC when the local offset
    /// cannot be determined.
    fn now_local(&self) -> OffsetDateTime {
        let now = self.now_utc();
        UtcOffset::current_local_offset().map_or(now, |offset| now.to_offset(offset))
    }

    fn now(&self, format: TimeFormat) -> OffsetDateTime {
        match format {
            TimeFormat::Local => self.now_local(),
            TimeFormat::Utc => self.now_utc(),
        }
    }

    /// Unix timestamp in milliseconds, saturating at the i64 range.
    fn to_unix_millis(&self, format: TimeFormat) -> i64 {
        let millis = self.now(format).unix_timestamp_nanos() / 1_000_000;
        i64::try_from(millis).unwrap_or(i64::MAX)
    }

    /// RFC 3339 rendering; empty string when formatting fails.
    fn to_iso(&self, format: TimeFormat) -> String {
        self.now(format).format(&Rfc3339).unwrap_or_default()
    }
}

///
/// SystemClock
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

///
/// TESTS
///
