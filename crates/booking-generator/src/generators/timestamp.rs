//! Timestamp value generators.

use chrono::{DateTime, Duration, Local, NaiveDateTime, SubsecRound, Utc};
use rand::Rng;

/// Wire format for every timestamp in an event.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render `now` as the event time, either in UTC or in the local time zone.
pub fn generate_event_time(now: DateTime<Utc>, utc: bool) -> NaiveDateTime {
    let now = now.trunc_subsecs(0);
    if utc {
        now.naive_utc()
    } else {
        now.with_timezone(&Local).naive_local()
    }
}

/// Generate a stay window: a start some days ahead of `now`, and an end a
/// positive number of days after the start.
///
/// `start_days` and `stay_days` are inclusive ranges; `stay_days.0` must be
/// at least 1 so that the end always follows the start.
pub fn generate_stay<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    start_days: (i64, i64),
    stay_days: (i64, i64),
) -> (NaiveDateTime, NaiveDateTime) {
    let offset = Duration::days(rng.gen_range(start_days.0..=start_days.1))
        + Duration::seconds(rng.gen_range(0..=86_400));
    let start = (now + offset).trunc_subsecs(0).naive_utc();
    let end = start + Duration::days(rng.gen_range(stay_days.0..=stay_days.1));
    (start, end)
}

/// Serde adapter for [`TIMESTAMP_FORMAT`].
pub mod serde_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&dt.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-10T12:30:45.987Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_event_time_second_precision() {
        let t = generate_event_time(fixed_now(), true);
        assert_eq!(t.nanosecond(), 0);
        assert_eq!(t.format(TIMESTAMP_FORMAT).to_string(), "2024-03-10 12:30:45");
    }

    #[test]
    fn test_event_time_local() {
        let t = generate_event_time(fixed_now(), false);
        let expected = fixed_now()
            .with_timezone(&Local)
            .naive_local()
            .trunc_subsecs(0);

        assert_eq!(t, expected);
        assert_eq!(t.nanosecond(), 0);
    }

    #[test]
    fn test_stay_window_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = fixed_now().naive_utc();

        for _ in 0..500 {
            let (start, end) = generate_stay(&mut rng, fixed_now(), (3, 67), (1, 20));
            assert!(end > start);
            assert!(start >= now + Duration::days(2));
            assert!(start <= now + Duration::days(69));
            assert!(end - start >= Duration::days(1));
            assert!(end - start <= Duration::days(20));
        }
    }

    #[test]
    fn test_deterministic_generation() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        let value1 = generate_stay(&mut rng1, fixed_now(), (3, 67), (1, 20));
        let value2 = generate_stay(&mut rng2, fixed_now(), (3, 67), (1, 20));

        assert_eq!(value1, value2);
    }
}
