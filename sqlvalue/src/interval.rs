//! PostgreSQL intervals, in ISO 8601 duration format.
//!
//! The server writes intervals this way when `IntervalStyle` is set to
//! `iso_8601`:
//!
//! ```text
//! P[nY][nM][nW][nD][T[nH][nM][nS]]
//! ```
//!
//! `M` means months before the `T` and minutes after it.

use std::collections::BTreeMap;
use std::fmt;

use crate::parser::{number, StringParser};
use crate::value::{ParseFailure, ValueError};

/// The date or time half of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Date,
    Time,
}

/// One of the calendar units an interval may count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl Component {
    pub const ALL: [Component; 7] = [
        Component::Year,
        Component::Month,
        Component::Week,
        Component::Day,
        Component::Hour,
        Component::Minute,
        Component::Second,
    ];

    pub fn section(self) -> Section {
        match self {
            Component::Year | Component::Month | Component::Week | Component::Day => Section::Date,
            Component::Hour | Component::Minute | Component::Second => Section::Time,
        }
    }

    /// The unit letter written after the quantity.
    pub fn unit(self) -> char {
        match self {
            Component::Year => 'Y',
            Component::Month => 'M',
            Component::Week => 'W',
            Component::Day => 'D',
            Component::Hour => 'H',
            Component::Minute => 'M',
            Component::Second => 'S',
        }
    }

    /// Look up a unit letter within one section.
    pub fn from_unit(section: Section, unit: char) -> Option<Component> {
        Component::ALL
            .into_iter()
            .find(|component| component.section() == section && component.unit() == unit)
    }

    pub fn name(self) -> &'static str {
        match self {
            Component::Year => "year",
            Component::Month => "month",
            Component::Week => "week",
            Component::Day => "day",
            Component::Hour => "hour",
            Component::Minute => "minute",
            Component::Second => "second",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A PostgreSQL `interval`.
///
/// Only non-zero quantities are stored: a missing component is zero,
/// and setting a component to zero removes it.
///
/// ```
/// # use sqlvalue::interval::{Component, PgInterval};
/// let interval: PgInterval = "P1Y2M3DT4H5M6S".parse().unwrap();
/// assert_eq!(2, interval.get(Component::Month));
/// assert_eq!(5, interval.get(Component::Minute));
/// assert_eq!(0, interval.get(Component::Week));
/// assert_eq!("P1Y2M3DT4H5M6S", interval.to_string());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct PgInterval {
    quantities: BTreeMap<Component, i64>,
}

impl PgInterval {
    pub fn new() -> Self {
        PgInterval::default()
    }

    pub fn get(&self, component: Component) -> i64 {
        self.quantities.get(&component).copied().unwrap_or(0)
    }

    /// Set a component, returning the previous quantity if there was one.
    pub fn set(&mut self, component: Component, quantity: i64) -> Option<i64> {
        if quantity == 0 {
            self.quantities.remove(&component)
        } else {
            self.quantities.insert(component, quantity)
        }
    }

    pub fn with(mut self, component: Component, quantity: i64) -> Self {
        self.set(component, quantity);
        self
    }

    pub fn remove(&mut self, component: Component) -> Option<i64> {
        self.quantities.remove(&component)
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// The non-zero components, in order from years to seconds.
    pub fn iter(&self) -> impl Iterator<Item = (Component, i64)> + '_ {
        self.quantities
            .iter()
            .map(|(component, quantity)| (*component, *quantity))
    }

    fn section(&self, section: Section) -> impl Iterator<Item = (Component, i64)> + '_ {
        self.iter()
            .filter(move |(component, _)| component.section() == section)
    }

    /// Set a component that must not have been given yet.
    fn set_new(&mut self, component: Component, quantity: i64) -> Result<(), ValueError> {
        match self.quantities.get(&component) {
            Some(&old) => Err(ValueError::RedundantQuantity {
                old,
                new: quantity,
                component,
            }),
            None => {
                self.set(component, quantity);
                Ok(())
            }
        }
    }
}

impl FromIterator<(Component, i64)> for PgInterval {
    fn from_iter<I: IntoIterator<Item = (Component, i64)>>(iter: I) -> Self {
        let mut interval = PgInterval::new();
        for (component, quantity) in iter {
            interval.set(component, quantity);
        }
        interval
    }
}

impl fmt::Display for PgInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("PT0S");
        }

        f.write_str("P")?;
        for (component, quantity) in self.section(Section::Date) {
            write!(f, "{quantity}{}", component.unit())?;
        }

        let mut time = self.section(Section::Time).peekable();
        if time.peek().is_some() {
            f.write_str("T")?;
            for (component, quantity) in time {
                write!(f, "{quantity}{}", component.unit())?;
            }
        }

        Ok(())
    }
}

impl std::str::FromStr for PgInterval {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntervalParser.parse(s)
    }
}

#[derive(Debug)]
enum Phase {
    Start,
    Expecting(Section),
    Reading(Section, String),
}

#[derive(Debug)]
struct State {
    phase: Phase,
    interval: PgInterval,
}

struct IntervalParser;

impl StringParser for IntervalParser {
    type State = State;
    type Output = PgInterval;

    fn start(&self) -> State {
        State {
            phase: Phase::Start,
            interval: PgInterval::new(),
        }
    }

    fn step(&self, state: &mut State, ch: char) -> Result<(), ValueError> {
        let next = match (&mut state.phase, ch) {
            (Phase::Start, 'P') => Phase::Expecting(Section::Date),
            (Phase::Start, _) => return Err(ValueError::MissingIntervalPrefix(ch)),
            (Phase::Reading(_, digits), '0'..='9') => {
                digits.push(ch);
                return Ok(());
            }
            (Phase::Reading(section, digits), _) if ch.is_ascii_alphabetic() => {
                let component = Component::from_unit(*section, ch)
                    .ok_or(ValueError::UnknownIntervalUnit(ch))?;
                state.interval.set_new(component, number(digits)?)?;
                Phase::Expecting(*section)
            }
            (Phase::Expecting(Section::Date), 'T') => Phase::Expecting(Section::Time),
            (Phase::Expecting(section), '0'..='9' | '-' | '+') => Phase::Reading(*section, ch.into()),
            _ => return Err(ValueError::UnexpectedCharacter(ch)),
        };
        state.phase = next;
        Ok(())
    }

    fn finish(&self, state: &mut State) -> Result<PgInterval, ValueError> {
        match &state.phase {
            Phase::Start => Err(ValueError::EarlyTermination),
            Phase::Reading(_, digits) => Err(ValueError::UnitlessQuantity(number(digits)?)),
            Phase::Expecting(_) => Ok(std::mem::take(&mut state.interval)),
        }
    }

    fn describe(&self, state: &State) -> String {
        let section = |section: &Section| match section {
            Section::Date => "date",
            Section::Time => "time",
        };
        match &state.phase {
            Phase::Start => "while expecting the 'P' prefix".into(),
            Phase::Expecting(s) => format!("while expecting a {} quantity", section(s)),
            Phase::Reading(s, _) => format!("while reading a {} quantity", section(s)),
        }
    }

    fn wrap_error(&self, failure: ParseFailure) -> ValueError {
        ValueError::InvalidInterval(failure)
    }
}
