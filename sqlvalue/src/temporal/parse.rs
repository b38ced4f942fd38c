//! The text grammar shared by dates, times and timestamps.
//!
//! ```text
//! YYYY-MM-DD[ |T]HH:MM:SS[.fraction][±HH[[:]MM]][ BC]
//! ```
//!
//! A date leaves off everything from the hour on (but keeps the era),
//! a time leaves off the date and the era.

use super::{CalendarDate, Era, PgDate, PgTime, PgTimestamp, Zone, NANOSECOND_DIGITS};
use crate::parser::{number, StringParser};
use crate::value::{ParseFailure, ValueError};

/// Which parts of the grammar to expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Timestamp,
    Date,
    Time,
}

/// The result of parsing with a given [`Style`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parsed {
    Timestamp(PgTimestamp),
    Date(PgDate),
    Time(PgTime),
}

impl Style {
    pub fn include_date(self) -> bool {
        self != Style::Time
    }

    pub fn include_time(self) -> bool {
        self != Style::Date
    }

    /// Parse text in this style.
    ///
    /// ```
    /// # use sqlvalue::temporal::{Parsed, PgDate, Style};
    /// let parsed = Style::Date.parse("2020-13-01").unwrap();
    /// assert_eq!(Parsed::Date(PgDate::ymd(2020, 13, 1)), parsed);
    /// ```
    pub fn parse(self, input: &str) -> Result<Parsed, ValueError> {
        if self.include_date() {
            match input {
                "infinity" => return Ok(self.sentinel(PgDate::DistantFuture)),
                "-infinity" => return Ok(self.sentinel(PgDate::DistantPast)),
                _ => {}
            }
        }

        TemporalParser { style: self }.parse(input)
    }

    fn sentinel(self, date: PgDate) -> Parsed {
        match (self, date) {
            (Style::Timestamp, PgDate::DistantPast) => Parsed::Timestamp(PgTimestamp::DistantPast),
            (Style::Timestamp, _) => Parsed::Timestamp(PgTimestamp::DistantFuture),
            (_, date) => Parsed::Date(date),
        }
    }

    fn wrap(self, failure: ParseFailure) -> ValueError {
        match self {
            Style::Timestamp => ValueError::InvalidTimestamp(failure),
            Style::Date => ValueError::InvalidDate(failure),
            Style::Time => ValueError::InvalidTime(failure),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Fraction,
    Zone,
}

impl Field {
    fn name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Fraction => "fractional second",
            Field::Zone => "time zone",
        }
    }
}

#[derive(Debug)]
enum Phase {
    Expecting(Field),
    Parsing(Field, String),
    ExpectingEraB,
    ExpectingEraC,
    ParsedBc,
}

/// Everything read so far.
#[derive(Debug, Default)]
struct Fields {
    era: Era,
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    nanosecond: Option<u32>,
    zone: Option<Zone>,
}

impl Fields {
    fn store(&mut self, field: Field, digits: &str) -> Result<(), ValueError> {
        match field {
            Field::Year => self.year = Some(number(digits)?),
            Field::Month => self.month = Some(number(digits)?),
            Field::Day => self.day = Some(number(digits)?),
            Field::Hour => self.hour = Some(number(digits)?),
            Field::Minute => self.minute = Some(number(digits)?),
            Field::Second => self.second = Some(number(digits)?),
            Field::Fraction => self.nanosecond = Some(nanoseconds(digits)?),
            Field::Zone => self.zone = Some(Zone::from_packed(number(digits)?)?),
        }
        Ok(())
    }

    fn date(&self) -> Result<CalendarDate, ValueError> {
        match (self.year, self.month, self.day) {
            (Some(year), Some(month), Some(day)) => Ok(CalendarDate {
                era: self.era,
                year,
                month,
                day,
            }),
            _ => Err(ValueError::EarlyTermination),
        }
    }

    fn time(&self) -> Result<PgTime, ValueError> {
        match (self.hour, self.minute, self.second) {
            (Some(hour), Some(minute), Some(second)) => {
                let time = PgTime::from_hms_nano(hour, minute, second, self.nanosecond.unwrap_or(0));
                Ok(PgTime {
                    zone: self.zone,
                    ..time
                })
            }
            _ => Err(ValueError::EarlyTermination),
        }
    }
}

/// Right-pad or truncate fractional digits to nanoseconds.
fn nanoseconds(digits: &str) -> Result<u32, ValueError> {
    let mut padded: String = digits.chars().take(NANOSECOND_DIGITS).collect();
    while padded.len() < NANOSECOND_DIGITS {
        padded.push('0');
    }
    number(&padded)
}

#[derive(Debug)]
struct State {
    phase: Phase,
    fields: Fields,
}

struct TemporalParser {
    style: Style,
}

impl TemporalParser {
    /// Where to go once `field` is terminated by `ch`.
    fn after(&self, field: Field, ch: char) -> Result<Phase, ValueError> {
        let phase = match (field, ch) {
            (Field::Year, '-') => Phase::Expecting(Field::Month),
            (Field::Month, '-') => Phase::Expecting(Field::Day),
            (Field::Day, ' ' | 'T') if self.style.include_time() => Phase::Expecting(Field::Hour),
            (Field::Day, ' ' | 'T') => Phase::ExpectingEraB,
            (Field::Hour, ':') => Phase::Expecting(Field::Minute),
            (Field::Minute, ':') => Phase::Expecting(Field::Second),
            (Field::Second, '.') => Phase::Expecting(Field::Fraction),
            (Field::Second | Field::Fraction, '+' | '-') => Phase::Parsing(Field::Zone, ch.into()),
            (Field::Second | Field::Fraction | Field::Zone, ' ') if self.style.include_date() => {
                Phase::ExpectingEraB
            }
            _ => return Err(ValueError::UnexpectedCharacter(ch)),
        };
        Ok(phase)
    }
}

impl StringParser for TemporalParser {
    type State = State;
    type Output = Parsed;

    fn start(&self) -> State {
        let first = if self.style.include_date() {
            Field::Year
        } else {
            Field::Hour
        };
        State {
            phase: Phase::Expecting(first),
            fields: Fields::default(),
        }
    }

    fn step(&self, state: &mut State, ch: char) -> Result<(), ValueError> {
        let next = match (&mut state.phase, ch) {
            (Phase::Parsing(_, digits), '0'..='9') => {
                digits.push(ch);
                return Ok(());
            }
            (Phase::Parsing(Field::Zone, _), ':') => return Ok(()),
            (Phase::Parsing(field, digits), _) => {
                let next = self.after(*field, ch)?;
                state.fields.store(*field, digits)?;
                next
            }
            (Phase::Expecting(field), '0'..='9') => Phase::Parsing(*field, ch.into()),
            (Phase::Expecting(Field::Year), '-') => Phase::Parsing(Field::Year, ch.into()),
            (Phase::ExpectingEraB, 'B') => Phase::ExpectingEraC,
            (Phase::ExpectingEraC, 'C') => {
                state.fields.era = Era::Bc;
                Phase::ParsedBc
            }
            _ => return Err(ValueError::UnexpectedCharacter(ch)),
        };
        state.phase = next;
        Ok(())
    }

    fn finish(&self, state: &mut State) -> Result<Parsed, ValueError> {
        match &state.phase {
            Phase::Parsing(Field::Zone, sign) if sign.len() == 1 => {
                return Err(ValueError::EarlyTermination)
            }
            Phase::Parsing(field, digits) => state.fields.store(*field, digits)?,
            Phase::ParsedBc => {}
            Phase::Expecting(_) | Phase::ExpectingEraB | Phase::ExpectingEraC => {
                return Err(ValueError::EarlyTermination)
            }
        }

        let fields = &state.fields;
        Ok(match self.style {
            Style::Timestamp => Parsed::Timestamp(PgTimestamp::At(fields.date()?, fields.time()?)),
            Style::Date => Parsed::Date(PgDate::Date(fields.date()?)),
            Style::Time => Parsed::Time(fields.time()?),
        })
    }

    fn describe(&self, state: &State) -> String {
        match &state.phase {
            Phase::Expecting(field) => format!("while expecting the {} field", field.name()),
            Phase::Parsing(field, _) => format!("while parsing the {} field", field.name()),
            Phase::ExpectingEraB | Phase::ExpectingEraC => "while parsing the era".into(),
            Phase::ParsedBc => "after the era".into(),
        }
    }

    fn wrap_error(&self, failure: ParseFailure) -> ValueError {
        self.style.wrap(failure)
    }
}

impl std::str::FromStr for PgTimestamp {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Style::Timestamp.parse(s)? {
            Parsed::Timestamp(timestamp) => Ok(timestamp),
            _ => unreachable!("timestamp style always parses a timestamp"),
        }
    }
}

impl std::str::FromStr for PgDate {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Style::Date.parse(s)? {
            Parsed::Date(date) => Ok(date),
            _ => unreachable!("date style always parses a date"),
        }
    }
}

impl std::str::FromStr for PgTime {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Style::Time.parse(s)? {
            Parsed::Time(time) => Ok(time),
            _ => unreachable!("time style always parses a time"),
        }
    }
}

/// Reads `±hh`, `±hhmm` or `±hh:mm`, see [`Zone::from_packed`].
impl std::str::FromStr for Zone {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let packed: String = s.chars().filter(|ch| *ch != ':').collect();
        Zone::from_packed(number(&packed)?)
    }
}
