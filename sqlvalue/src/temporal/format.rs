use std::fmt;

use super::{CalendarDate, Era, PgDate, PgTime, PgTimestamp, Zone, NANOSECOND_DIGITS};

const BC_SUFFIX: &str = " BC";

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Writes the packed `±hhmm` form.
///
/// Only offsets that [`Zone::from_packed`] accepts read back unchanged.
/// A zero hour with one to fourteen minutes reads back as hours or not
/// at all, and anything past twelve hours fifty-nine is rejected.
impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.is_negative() { '-' } else { '+' };
        write!(
            f,
            "{sign}{:02}{:02}",
            self.hours.unsigned_abs(),
            self.minutes.unsigned_abs()
        )
    }
}

impl fmt::Display for PgTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour,
            self.minute,
            self.whole_seconds()
        )?;

        let nanosecond = self.nanosecond();
        if nanosecond != 0 {
            write!(f, ".{:0width$}", nanosecond, width = NANOSECOND_DIGITS)?;
        }

        if let Some(zone) = &self.zone {
            write!(f, "{zone}")?;
        }

        Ok(())
    }
}

impl fmt::Display for PgDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PgDate::DistantPast => f.write_str("-infinity"),
            PgDate::DistantFuture => f.write_str("infinity"),
            PgDate::Date(date) => {
                write!(f, "{date}")?;
                if date.era == Era::Bc {
                    f.write_str(BC_SUFFIX)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for PgTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PgTimestamp::DistantPast => f.write_str("-infinity"),
            PgTimestamp::DistantFuture => f.write_str("infinity"),
            PgTimestamp::At(date, time) => {
                write!(f, "{date} {time}")?;
                if date.era == Era::Bc {
                    f.write_str(BC_SUFFIX)?;
                }
                Ok(())
            }
        }
    }
}
