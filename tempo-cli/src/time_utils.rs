use time::{OffsetDateTime, UtcOffset};

/// Shift `dt` to the local offset in effect at that instant, so entries on
/// either side of a daylight-saving change keep their wall-clock time.
/// Falls back to UTC when the local offset can't be determined.
pub fn to_local_time(dt: OffsetDateTime) -> OffsetDateTime {
    to_offset_at(dt, UtcOffset::local_offset_at)
}

fn to_offset_at<E>(
    dt: OffsetDateTime,
    offset_at: impl Fn(OffsetDateTime) -> Result<UtcOffset, E>,
) -> OffsetDateTime {
    match offset_at(dt) {
        Ok(offset) => dt.to_offset(offset),
        Err(_) => dt.to_offset(UtcOffset::UTC),
    }
}

/// `HH:MM` in the timestamp's own offset.
pub fn clock_time(dt: OffsetDateTime) -> String {
    format!("{:02}:{:02}", dt.hour(), dt.minute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};
    use time::Month;

    /// US Eastern, with summer time from April through October.
    fn eastern(dt: OffsetDateTime) -> Result<UtcOffset, ()> {
        match dt.month() {
            Month::April
            | Month::May
            | Month::June
            | Month::July
            | Month::August
            | Month::September
            | Month::October => Ok(offset!(-4)),
            _ => Ok(offset!(-5)),
        }
    }

    #[test]
    fn winter_and_summer_use_their_own_offset() {
        let winter = to_offset_at(datetime!(2023-01-01 15:00 UTC), eastern);
        let summer = to_offset_at(datetime!(2023-07-01 15:00 UTC), eastern);

        assert_eq!(clock_time(winter), "10:00");
        assert_eq!(clock_time(summer), "11:00");
    }

    #[test]
    fn unknown_offset_falls_back_to_utc() {
        let shifted = to_offset_at(datetime!(2023-01-01 15:00 +02:00), |_| Err(()));

        assert_eq!(shifted.offset(), UtcOffset::UTC);
        assert_eq!(clock_time(shifted), "13:00");
    }
}
