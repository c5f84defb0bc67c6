//! Rendering of stored instants for read paths.
//!
//! Rows keep `created_date` as a UTC instant. Reads hand it back in the
//! server's local civil time so existing clients that display the value
//! verbatim keep showing wall-clock times. Only the offset changes; the
//! instant compares equal before and after conversion.

use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};

/// Converts a stored instant into the server's local time.
pub fn to_local(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    to_local_in(instant, &Local)
}

/// Same as [`to_local`], for an explicit time zone.
pub fn to_local_in<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> DateTime<FixedOffset> {
    instant.with_timezone(tz).fixed_offset()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_local_in_keeps_the_instant_and_applies_the_offset() {
        let instant = Utc.with_ymd_and_hms(2025, 8, 29, 16, 16, 53).unwrap();
        let brussels_summer = FixedOffset::east_opt(2 * 3600).unwrap();

        let local = to_local_in(instant, &brussels_summer);

        assert_eq!(local, instant);
        assert_eq!(local.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(local.to_rfc3339(), "2025-08-29T18:16:53+02:00");
    }

    #[test]
    fn to_local_matches_chrono_local() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap();

        let local = to_local(instant);

        assert_eq!(local, instant);
        assert_eq!(
            local.offset().local_minus_utc(),
            instant.with_timezone(&Local).offset().local_minus_utc()
        );
    }
}
