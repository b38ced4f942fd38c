//! Conversions to and from `chrono`'s naive types.
//!
//! BC years are mapped onto the astronomical calendar, so 1 BC is
//! year 0 and 2 BC is year -1.  A time with a zone is shifted to UTC.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::{CalendarDate, Era, PgDate, PgTime, PgTimestamp, Zone};
use crate::value::{Codec, PgValue, RawValue, SqlValue, ValueError};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

fn out_of_range<T: std::fmt::Display>(value: &T) -> ValueError {
    ValueError::OutOfRange(value.to_string())
}

impl CalendarDate {
    /// The year counted astronomically, with a year zero.
    pub fn astronomical_year(&self) -> i32 {
        match self.era {
            Era::Ad => self.year,
            Era::Bc => 1 - self.year,
        }
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        let year = date.year();
        if year > 0 {
            CalendarDate::new(year, date.month(), date.day())
        } else {
            CalendarDate::new(1 - year, date.month(), date.day()).with_era(Era::Bc)
        }
    }
}

impl TryFrom<CalendarDate> for NaiveDate {
    type Error = ValueError;

    fn try_from(date: CalendarDate) -> Result<Self, Self::Error> {
        NaiveDate::from_ymd_opt(date.astronomical_year(), date.month, date.day)
            .ok_or_else(|| out_of_range(&PgDate::Date(date)))
    }
}

impl From<NaiveDate> for PgDate {
    fn from(date: NaiveDate) -> Self {
        PgDate::Date(date.into())
    }
}

impl TryFrom<PgDate> for NaiveDate {
    type Error = ValueError;

    fn try_from(date: PgDate) -> Result<Self, Self::Error> {
        match date {
            PgDate::Date(date) => date.try_into(),
            sentinel => Err(out_of_range(&sentinel)),
        }
    }
}

impl From<NaiveTime> for PgTime {
    fn from(time: NaiveTime) -> Self {
        // chrono represents a leap second as a nanosecond overflow
        let (second, nanosecond) = match time.nanosecond() {
            nanosecond if nanosecond >= NANOS_PER_SECOND => {
                (time.second() + 1, nanosecond - NANOS_PER_SECOND)
            }
            nanosecond => (time.second(), nanosecond),
        };
        PgTime::from_hms_nano(time.hour(), time.minute(), second, nanosecond)
    }
}

impl PgTime {
    fn naive_local(&self) -> Result<NaiveTime, ValueError> {
        let (second, nanosecond) = match self.whole_seconds() {
            60 => (59, self.nanosecond() + NANOS_PER_SECOND),
            second => (second, self.nanosecond()),
        };
        NaiveTime::from_hms_nano_opt(self.hour, self.minute, second, nanosecond)
            .ok_or_else(|| out_of_range(self))
    }
}

fn offset(zone: Option<Zone>) -> Duration {
    Duration::minutes(zone.map(|zone| i64::from(zone.total_minutes())).unwrap_or(0))
}

impl TryFrom<PgTime> for NaiveTime {
    type Error = ValueError;

    fn try_from(time: PgTime) -> Result<Self, Self::Error> {
        let (utc, _days) = time.naive_local()?.overflowing_sub_signed(offset(time.zone));
        Ok(utc)
    }
}

impl From<NaiveDateTime> for PgTimestamp {
    fn from(timestamp: NaiveDateTime) -> Self {
        PgTimestamp::At(timestamp.date().into(), timestamp.time().into())
    }
}

impl TryFrom<PgTimestamp> for NaiveDateTime {
    type Error = ValueError;

    fn try_from(timestamp: PgTimestamp) -> Result<Self, Self::Error> {
        match timestamp {
            PgTimestamp::At(date, time) => {
                let local = NaiveDateTime::new(date.try_into()?, time.naive_local()?);
                local
                    .checked_sub_signed(offset(time.zone))
                    .ok_or_else(|| out_of_range(&timestamp))
            }
            sentinel => Err(out_of_range(&sentinel)),
        }
    }
}

macro_rules! impl_chrono_value {
    ($($ty:ty => $pg:ty),* $(,)?) => {
        $(
            impl PgValue for $ty {
                fn from_text(text: &str) -> Result<Self, ValueError> {
                    text.parse::<$pg>()?.try_into()
                }

                fn to_raw(&self) -> RawValue {
                    RawValue::Textual(<$pg>::from(*self).to_string())
                }
            }

            impl SqlValue for $ty {
                fn codec() -> Codec<Self> {
                    Codec::native_text()
                }
            }
        )*
    };
}

impl_chrono_value! {
    NaiveDate => PgDate,
    NaiveTime => PgTime,
    NaiveDateTime => PgTimestamp,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::{decode, encode};
    use pretty_assertions::assert_eq;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn bc_years_are_astronomical() {
        let date = CalendarDate::new(1, 1, 1).with_era(Era::Bc);
        assert_eq!(Ok(ymd(0, 1, 1)), NaiveDate::try_from(date));
        assert_eq!(date, CalendarDate::from(ymd(0, 1, 1)));

        let date = CalendarDate::new(44, 3, 15).with_era(Era::Bc);
        assert_eq!(-43, date.astronomical_year());
        assert_eq!(date, CalendarDate::from(ymd(-43, 3, 15)));
    }

    #[test]
    fn impossible_dates_are_out_of_range() {
        assert_eq!(
            Err(ValueError::OutOfRange("2020-13-01".into())),
            NaiveDate::try_from(PgDate::ymd(2020, 13, 1))
        );
        assert_eq!(
            Err(ValueError::OutOfRange("infinity".into())),
            NaiveDate::try_from(PgDate::DistantFuture)
        );
        assert_eq!(
            Err(ValueError::OutOfRange("-infinity".into())),
            NaiveDateTime::try_from(PgTimestamp::DistantPast)
        );
    }

    #[test]
    fn zones_shift_to_utc() {
        let timestamp: PgTimestamp = "2020-03-15 01:30:00+05:30".parse().unwrap();
        let utc = NaiveDateTime::try_from(timestamp).unwrap();
        assert_eq!(
            NaiveDateTime::new(ymd(2020, 3, 14), NaiveTime::from_hms_opt(20, 0, 0).unwrap()),
            utc
        );

        let time: PgTime = "23:00:00-02".parse().unwrap();
        assert_eq!(Ok(NaiveTime::from_hms_opt(1, 0, 0).unwrap()), NaiveTime::try_from(time));
    }

    #[test]
    fn fractions_survive() {
        let time = NaiveTime::from_hms_nano_opt(4, 5, 6, 789_000_000).unwrap();
        let pg = PgTime::from(time);
        assert_eq!(789_000_000, pg.nanosecond());
        assert_eq!(Ok(time), NaiveTime::try_from(pg));
    }

    #[test]
    fn through_the_bridge() {
        let timestamp = NaiveDateTime::new(
            ymd(1999, 12, 31),
            NaiveTime::from_hms_milli_opt(23, 59, 59, 500).unwrap(),
        );
        let raw = encode(&timestamp).unwrap();
        assert_eq!(RawValue::text("1999-12-31 23:59:59.500000000"), raw);
        assert_eq!(Ok(timestamp), decode(&raw));

        assert_eq!(Ok(RawValue::text("0001-01-01 BC")), encode(&ymd(0, 1, 1)));
        assert_eq!(Ok(ymd(0, 1, 1)), decode(&RawValue::text("0001-01-01 BC")));
    }

    #[test]
    fn leap_seconds_come_back() {
        let time = NaiveTime::from_hms_milli_opt(23, 59, 59, 1_500).unwrap();
        let raw = encode(&time).unwrap();
        assert_eq!(RawValue::text("23:59:60.500000000"), raw);
        assert_eq!(Ok(time), decode(&raw));

        let timestamp = NaiveDateTime::new(ymd(2016, 12, 31), time);
        let raw = encode(&timestamp).unwrap();
        assert_eq!(RawValue::text("2016-12-31 23:59:60.500000000"), raw);
        assert_eq!(Ok(timestamp), decode(&raw));
    }
}
