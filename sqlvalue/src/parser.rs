//! Single-pass, character-at-a-time parsing.
//!
//! Each grammar provides a state, a transition function, a finalizer,
//! and a way to wrap errors.  The shared driver below tracks the position
//! and makes sure no error escapes without its location attached.

use crate::value::{ParseFailure, ValueError};

pub(crate) trait StringParser {
    type State;
    type Output;

    fn start(&self) -> Self::State;

    /// Consume one character.
    ///
    /// On error the state must be left as it was before the character,
    /// so that it can still be described.
    fn step(&self, state: &mut Self::State, ch: char) -> Result<(), ValueError>;

    /// Produce the output once the input is exhausted.
    fn finish(&self, state: &mut Self::State) -> Result<Self::Output, ValueError>;

    /// A phrase describing the state, like "while parsing the hour field".
    fn describe(&self, state: &Self::State) -> String;

    fn wrap_error(&self, failure: ParseFailure) -> ValueError;

    fn parse(&self, input: &str) -> Result<Self::Output, ValueError> {
        let mut state = self.start();
        let mut index = 0;

        for ch in input.chars() {
            if let Err(error) = self.step(&mut state, ch) {
                return Err(self.fail(error, index, input, &state));
            }
            index += 1;
        }

        self.finish(&mut state)
            .map_err(|error| self.fail(error, index, input, &state))
    }

    fn fail(&self, error: ValueError, index: usize, input: &str, state: &Self::State) -> ValueError {
        self.wrap_error(ParseFailure::new(error, index, input, self.describe(state)))
    }
}

/// Parse an accumulated run of digits as a number.
pub(crate) fn number<T: std::str::FromStr>(digits: &str) -> Result<T, ValueError> {
    digits
        .parse()
        .map_err(|_| ValueError::InvalidNumber(digits.into()))
}

#[cfg(test)]
mod test {
    use super::*;

    /// Accepts a run of `a` characters and counts them.
    struct CountAs;

    impl StringParser for CountAs {
        type State = usize;
        type Output = usize;

        fn start(&self) -> usize {
            0
        }

        fn step(&self, state: &mut usize, ch: char) -> Result<(), ValueError> {
            match ch {
                'a' => {
                    *state += 1;
                    Ok(())
                }
                _ => Err(ValueError::UnexpectedCharacter(ch)),
            }
        }

        fn finish(&self, state: &mut usize) -> Result<usize, ValueError> {
            match *state {
                0 => Err(ValueError::EarlyTermination),
                n => Ok(n),
            }
        }

        fn describe(&self, state: &usize) -> String {
            format!("after {state} a's")
        }

        fn wrap_error(&self, failure: ParseFailure) -> ValueError {
            ValueError::InvalidInterval(failure)
        }
    }

    #[test]
    fn counts() {
        assert_eq!(Ok(3), CountAs.parse("aaa"));
    }

    #[test]
    fn wraps_step_errors_with_position() {
        let expected = ValueError::InvalidInterval(ParseFailure::new(
            ValueError::UnexpectedCharacter('b'),
            2,
            "aab",
            "after 2 a's",
        ));
        assert_eq!(Err(expected), CountAs.parse("aab"));
    }

    #[test]
    fn wraps_finish_errors_at_end() {
        let expected = ValueError::InvalidInterval(ParseFailure::new(
            ValueError::EarlyTermination,
            0,
            "",
            "after 0 a's",
        ));
        assert_eq!(Err(expected), CountAs.parse(""));
    }

    #[test]
    fn number_reports_its_input() {
        assert_eq!(Ok(42), number::<i32>("42"));
        assert_eq!(
            Err(ValueError::InvalidNumber("4x".into())),
            number::<i32>("4x")
        );
    }
}
