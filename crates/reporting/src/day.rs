//! Where "today" starts for the dashboard counters.

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Timezone whose calendar day bounds the "today" counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    /// The server's local timezone.
    #[default]
    Local,
    Utc,
    /// A named IANA zone such as `Europe/Berlin`.
    Named(Tz),
}

impl DayBoundary {
    /// Returns the instant at which the calendar day containing `now` began.
    ///
    /// When local midnight does not exist (a DST gap), the day starts at the
    /// first valid local instant after it.
    pub fn start_of_day(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            DayBoundary::Local => midnight_in(&Local, now),
            DayBoundary::Utc => midnight_in(&Utc, now),
            DayBoundary::Named(tz) => midnight_in(tz, now),
        }
    }
}

fn midnight_in<Z: TimeZone>(zone: &Z, now: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = now.with_timezone(zone).date_naive().and_time(NaiveTime::MIN);

    (0..=24 * 60)
        .find_map(|minutes| {
            zone.from_local_datetime(&(midnight + Duration::minutes(minutes)))
                .earliest()
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(now)
}

impl std::fmt::Display for DayBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayBoundary::Local => f.write_str("local"),
            DayBoundary::Utc => f.write_str("utc"),
            DayBoundary::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl std::str::FromStr for DayBoundary {
    type Err = String;

    /// Accepts `local`, `utc` (any case) or an IANA zone name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(DayBoundary::Local);
        }
        if s.eq_ignore_ascii_case("utc") {
            return Ok(DayBoundary::Utc);
        }
        s.parse::<Tz>()
            .map(DayBoundary::Named)
            .map_err(|_| format!("unknown timezone '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn utc_day_starts_at_midnight() {
        let start = DayBoundary::Utc.start_of_day(at(2024, 3, 15, 17, 45));
        assert_eq!(start, at(2024, 3, 15, 0, 0));
    }

    #[test]
    fn named_zone_shifts_the_boundary() {
        let tokyo = DayBoundary::Named(chrono_tz::Asia::Tokyo);
        // 20:00 UTC on the 15th is already the 16th in Tokyo (UTC+9).
        let start = tokyo.start_of_day(at(2024, 3, 15, 20, 0));
        assert_eq!(start, at(2024, 3, 15, 15, 0));
    }

    #[test]
    fn dst_gap_at_midnight_uses_first_valid_instant() {
        // Havana skipped 2024-03-10 00:00 local, clocks jumped to 01:00 (UTC-4).
        let havana = DayBoundary::Named(chrono_tz::America::Havana);
        let start = havana.start_of_day(at(2024, 3, 10, 15, 0));
        assert_eq!(start, at(2024, 3, 10, 5, 0));
    }

    #[test]
    fn local_start_is_not_after_now() {
        let now = Utc::now();
        assert!(DayBoundary::Local.start_of_day(now) <= now);
    }

    #[test]
    fn parses_keywords_and_zone_names() {
        assert_eq!("local".parse::<DayBoundary>().unwrap(), DayBoundary::Local);
        assert_eq!(" UTC ".parse::<DayBoundary>().unwrap(), DayBoundary::Utc);
        assert_eq!(
            "Europe/Berlin".parse::<DayBoundary>().unwrap(),
            DayBoundary::Named(chrono_tz::Europe::Berlin)
        );
        assert!("Mars/Olympus".parse::<DayBoundary>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let berlin = DayBoundary::Named(chrono_tz::Europe::Berlin);
        assert_eq!(berlin.to_string().parse::<DayBoundary>().unwrap(), berlin);
    }
}
