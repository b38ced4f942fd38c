use crate::interval::Component;

/// A failure to convert between a raw value and a typed value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    #[error("unexpected end of input")]
    EarlyTermination,

    #[error("expected an interval to start with 'P', found {0:?}")]
    MissingIntervalPrefix(char),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("invalid boolean {0:?}")]
    InvalidBoolean(String),

    #[error("invalid bytea {0:?}")]
    InvalidBytea(String),

    #[error("text value is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid time zone offset {0}")]
    InvalidTimeZoneOffset(i32),

    #[error("time zone offset {hours} hours {minutes} minutes mixes signs")]
    InvalidTimeZone { hours: i32, minutes: i32 },

    #[error("unknown interval unit {0:?}")]
    UnknownIntervalUnit(char),

    #[error("{component} given twice, first as {old} and then as {new}")]
    RedundantQuantity {
        old: i64,
        new: i64,
        component: Component,
    },

    #[error("quantity {0} is missing a unit")]
    UnitlessQuantity(i64),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(ParseFailure),

    #[error("invalid date: {0}")]
    InvalidDate(ParseFailure),

    #[error("invalid time: {0}")]
    InvalidTime(ParseFailure),

    #[error("invalid interval: {0}")]
    InvalidInterval(ParseFailure),

    #[error("type {type_name} is not supported by this client")]
    TypeUnsupportedByClient { type_name: &'static str },

    #[error("cannot convert {text:?} to {type_name}")]
    StringNotConvertible {
        text: String,
        type_name: &'static str,
    },

    #[error("unexpected NULL value")]
    UnexpectedNull,

    #[error("{0} is out of range")]
    OutOfRange(String),
}

impl ValueError {
    /// The location details, if this error came out of one of the parsers.
    pub fn parse_failure(&self) -> Option<&ParseFailure> {
        match self {
            ValueError::InvalidTimestamp(failure)
            | ValueError::InvalidDate(failure)
            | ValueError::InvalidTime(failure)
            | ValueError::InvalidInterval(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Where and why a parser gave up.
///
/// `state` is a phrase describing what the parser was doing,
/// such as "while parsing the minute field".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub error: Box<ValueError>,
    pub index: usize,
    pub input: String,
    pub state: String,
}

impl ParseFailure {
    pub fn new<S: Into<String>>(error: ValueError, index: usize, input: &str, state: S) -> Self {
        ParseFailure {
            error: Box::new(error),
            index,
            input: input.into(),
            state: state.into(),
        }
    }
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} at position {} in {:?} {}",
            self.error, self.index, self.input, self.state
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_position_and_state() {
        let failure = ParseFailure::new(
            ValueError::UnexpectedCharacter('x'),
            15,
            "2020-01-01 10:6x:00",
            "while parsing the minute field",
        );
        let error = ValueError::InvalidTimestamp(failure);
        assert_eq!(
            "invalid timestamp: unexpected character 'x' at position 15 \
             in \"2020-01-01 10:6x:00\" while parsing the minute field",
            error.to_string()
        );
        assert_eq!(15, error.parse_failure().unwrap().index);
    }

    #[test]
    fn redundant_quantity_names_component() {
        let error = ValueError::RedundantQuantity {
            old: 1,
            new: 2,
            component: Component::Year,
        };
        assert_eq!("year given twice, first as 1 and then as 2", error.to_string());
    }
}
