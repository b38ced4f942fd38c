//! PostgreSQL dates, times and timestamps.
//!
//! These types mirror what the server sends in text format.  They are
//! deliberately loose: a month of 13 or a day of 40 is carried through
//! as-is, and it is left to the server to reject such values.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::value::ValueError;

#[cfg(feature = "chrono")]
mod naive;
mod format;
mod parse;

pub use parse::{Parsed, Style};

/// How many digits of fractional seconds we read and write.
pub const NANOSECOND_DIGITS: usize = 9;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Era {
    Bc,
    #[default]
    Ad,
}

/// A date on the calendar, without any time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarDate {
    pub era: Era,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    /// A date in the common era.
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        CalendarDate {
            era: Era::Ad,
            year,
            month,
            day,
        }
    }

    pub fn with_era(self, era: Era) -> Self {
        CalendarDate { era, ..self }
    }
}

/// A PostgreSQL `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PgDate {
    /// `-infinity`
    DistantPast,
    Date(CalendarDate),
    /// `infinity`
    DistantFuture,
}

impl PgDate {
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        PgDate::Date(CalendarDate::new(year, month, day))
    }

    pub fn calendar_date(&self) -> Option<&CalendarDate> {
        match self {
            PgDate::Date(date) => Some(date),
            PgDate::DistantPast | PgDate::DistantFuture => None,
        }
    }
}

impl From<CalendarDate> for PgDate {
    fn from(date: CalendarDate) -> Self {
        PgDate::Date(date)
    }
}

/// A time zone offset from UTC.
///
/// The hours and minutes always agree in sign, so `-03:30` is
/// `-3` hours and `-30` minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Zone {
    hours: i32,
    minutes: i32,
}

impl Zone {
    pub const UTC: Zone = Zone {
        hours: 0,
        minutes: 0,
    };

    pub fn new(hours: i32, minutes: i32) -> Result<Self, ValueError> {
        let mixed_signs = (hours < 0 && minutes > 0) || (hours > 0 && minutes < 0);
        if mixed_signs || minutes.unsigned_abs() >= 60 {
            return Err(ValueError::InvalidTimeZone { hours, minutes });
        }
        Ok(Zone { hours, minutes })
    }

    /// Decode an offset packed into a single signed integer.
    ///
    /// The short form is the hours alone, `±hh`, up to twelve.
    /// The long form is `±hhmm`, from `15` to `1259`.  Anything
    /// in between is rejected, as is a minute part of 60 or more.
    ///
    /// ```
    /// # use sqlvalue::temporal::Zone;
    /// let zone = Zone::from_packed(-530).unwrap();
    /// assert_eq!((-5, -30), (zone.hours(), zone.minutes()));
    ///
    /// assert!(Zone::from_packed(13).is_err());
    /// ```
    pub fn from_packed(packed: i32) -> Result<Self, ValueError> {
        match packed.unsigned_abs() {
            0..=12 => Zone::new(packed, 0),
            magnitude @ 15..=1259 if magnitude % 100 < 60 => Zone::new(packed / 100, packed % 100),
            _ => Err(ValueError::InvalidTimeZoneOffset(packed)),
        }
    }

    pub fn hours(&self) -> i32 {
        self.hours
    }

    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    /// The whole offset in minutes east of UTC.
    pub fn total_minutes(&self) -> i32 {
        self.hours * 60 + self.minutes
    }

    fn is_negative(&self) -> bool {
        self.hours < 0 || self.minutes < 0
    }
}

/// A PostgreSQL `time` or `timetz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PgTime {
    pub hour: u32,
    pub minute: u32,
    pub second: Decimal,
    pub zone: Option<Zone>,
}

impl PgTime {
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Self {
        PgTime::from_hms_nano(hour, minute, second, 0)
    }

    pub fn from_hms_nano(hour: u32, minute: u32, second: u32, nanosecond: u32) -> Self {
        let scaled = i64::from(second) * NANOS_PER_SECOND + i64::from(nanosecond);
        PgTime {
            hour,
            minute,
            second: Decimal::new(scaled, NANOSECOND_DIGITS as u32),
            zone: None,
        }
    }

    pub fn with_zone(self, zone: Zone) -> Self {
        PgTime {
            zone: Some(zone),
            ..self
        }
    }

    pub fn whole_seconds(&self) -> u32 {
        self.second.trunc().to_u32().unwrap_or_default()
    }

    /// The fractional part of the seconds, truncated to nanoseconds.
    pub fn nanosecond(&self) -> u32 {
        (self.second.fract() * Decimal::from(NANOS_PER_SECOND))
            .trunc()
            .to_u32()
            .unwrap_or_default()
    }
}

/// A PostgreSQL `timestamp` or `timestamptz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PgTimestamp {
    /// `-infinity`
    DistantPast,
    At(CalendarDate, PgTime),
    /// `infinity`
    DistantFuture,
}

impl PgTimestamp {
    /// Combine a date and a time.
    ///
    /// A sentinel date makes the whole timestamp that sentinel,
    /// and the time is dropped.
    pub fn new(date: PgDate, time: PgTime) -> Self {
        match date {
            PgDate::DistantPast => PgTimestamp::DistantPast,
            PgDate::Date(date) => PgTimestamp::At(date, time),
            PgDate::DistantFuture => PgTimestamp::DistantFuture,
        }
    }

    pub fn date(&self) -> PgDate {
        match self {
            PgTimestamp::DistantPast => PgDate::DistantPast,
            PgTimestamp::At(date, _) => PgDate::Date(*date),
            PgTimestamp::DistantFuture => PgDate::DistantFuture,
        }
    }

    pub fn time(&self) -> Option<&PgTime> {
        match self {
            PgTimestamp::At(_, time) => Some(time),
            PgTimestamp::DistantPast | PgTimestamp::DistantFuture => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn packed_offsets() {
        assert_eq!(Ok(Zone::new(5, 30).unwrap()), Zone::from_packed(530));
        assert_eq!(Ok(Zone::new(-5, -30).unwrap()), Zone::from_packed(-530));
        assert_eq!(Ok(Zone::new(12, 0).unwrap()), Zone::from_packed(12));
        assert_eq!(Ok(Zone::new(-12, 0).unwrap()), Zone::from_packed(-12));
        assert_eq!(Ok(Zone::UTC), Zone::from_packed(0));
        assert_eq!(Ok(Zone::new(0, 15).unwrap()), Zone::from_packed(15));
        assert_eq!(Ok(Zone::new(12, 59).unwrap()), Zone::from_packed(1259));
    }

    #[test]
    fn packed_offset_gap() {
        assert_eq!(Err(ValueError::InvalidTimeZoneOffset(13)), Zone::from_packed(13));
        assert_eq!(Err(ValueError::InvalidTimeZoneOffset(-14)), Zone::from_packed(-14));
        assert_eq!(Err(ValueError::InvalidTimeZoneOffset(1260)), Zone::from_packed(1260));
        assert_eq!(Err(ValueError::InvalidTimeZoneOffset(575)), Zone::from_packed(575));
    }

    #[test]
    fn zone_signs_must_agree() {
        assert!(Zone::new(-3, -30).is_ok());
        assert!(Zone::new(0, -30).is_ok());
        assert!(Zone::new(3, 0).is_ok());
        assert_eq!(
            Err(ValueError::InvalidTimeZone {
                hours: -3,
                minutes: 30
            }),
            Zone::new(-3, 30)
        );
        assert_eq!(-210, Zone::new(-3, -30).unwrap().total_minutes());
    }

    #[test]
    fn seconds_split() {
        let time = PgTime::from_hms_nano(10, 0, 7, 250_000_000);
        assert_eq!(Decimal::new(725, 2), time.second);
        assert_eq!(7, time.whole_seconds());
        assert_eq!(250_000_000, time.nanosecond());
    }

    #[test]
    fn sentinel_dates_absorb_time() {
        let time = PgTime::from_hms(1, 2, 3);
        assert_eq!(
            PgTimestamp::DistantPast,
            PgTimestamp::new(PgDate::DistantPast, time)
        );
        assert_eq!(
            PgTimestamp::DistantFuture,
            PgTimestamp::new(PgDate::DistantFuture, time)
        );
        let at = PgTimestamp::new(PgDate::ymd(2020, 1, 2), time);
        assert_eq!(PgDate::ymd(2020, 1, 2), at.date());
        assert_eq!(Some(&time), at.time());
    }
}
