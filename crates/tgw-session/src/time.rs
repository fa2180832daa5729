//! Exchange-local time helpers. All venues report naive China Standard Time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const CHINA_TZ: Tz = chrono_tz::Asia::Shanghai;

/// Attach the exchange timezone to a naive local timestamp.
pub fn localize(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    CHINA_TZ
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}

/// Current date in the exchange timezone.
pub fn china_today() -> NaiveDate {
    Utc::now().with_timezone(&CHINA_TZ).date_naive()
}

/// Current wall-clock time in the exchange timezone.
pub fn china_now_time() -> NaiveTime {
    Utc::now().with_timezone(&CHINA_TZ).time()
}

/// `YYYYMMDD`
pub fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y%m%d").ok()
}

/// `YYYYMMDD` + `HH:MM:SS`, localized.
pub fn parse_date_time(date: &str, time: &str) -> Option<DateTime<FixedOffset>> {
    let naive =
        NaiveDateTime::parse_from_str(&format!("{} {}", date.trim(), time.trim()), "%Y%m%d %H:%M:%S")
            .ok()?;
    localize(naive)
}

/// Date + `HHMMSS` packed integer (leading zero dropped, e.g. `93015`), localized.
pub fn compose_packed_time(date: NaiveDate, hhmmss: u32) -> Option<DateTime<FixedOffset>> {
    let time = NaiveTime::parse_from_str(&format!("{hhmmss:06}"), "%H%M%S").ok()?;
    localize(date.and_time(time))
}
