//! Error handling.
//!
//! Errors can happen in one of a few different phases:
//!
//! * preparing a query
//! * executing a query
//! * encoding the query parameters
//! * retrieving values from the results
//!
//! Use the `kind()` method on [`Error`] to find out
//! which step it was.  If we have an underlying database
//! error it can be retrieved with the `inner()` method, and
//! a failed value conversion with `value_error()`.

use crate::value::ValueError;

/// An error that occurred when trying to use the database.
#[derive(Debug, Clone)]
pub struct Error<ClientError> {
    message: String,
    kind: ErrorKind,
    inner: Option<ClientError>,
    value: Option<ValueError>,
}

impl<ClientError> Error<ClientError> {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn inner(&self) -> Option<&ClientError> {
        self.inner.as_ref()
    }

    pub fn value_error(&self) -> Option<&ValueError> {
        self.value.as_ref()
    }

    fn new<S: Into<String>>(kind: ErrorKind, message: S, inner: Option<ClientError>) -> Self {
        Error {
            message: message.into(),
            kind,
            inner,
            value: None,
        }
    }

    fn from_value(kind: ErrorKind, context: &str, value: ValueError) -> Self {
        Error {
            message: format!("{context}: {value}"),
            kind,
            inner: None,
            value: Some(value),
        }
    }

    pub fn from_column_str<S: Into<String>>(message: S, inner: Option<ClientError>) -> Self {
        Self::new(ErrorKind::FromColumn, message, inner)
    }

    pub fn prepare_str<S: Into<String>>(message: S, inner: Option<ClientError>) -> Self {
        Self::new(ErrorKind::Prepare, message, inner)
    }

    pub fn query_str<S: Into<String>>(message: S, inner: Option<ClientError>) -> Self {
        Self::new(ErrorKind::Query, message, inner)
    }

    /// A column value that could not be decoded.
    pub fn from_column_value(column: &str, value: ValueError) -> Self {
        Self::from_value(ErrorKind::FromColumn, &format!("column {column}"), value)
    }

    /// A query parameter that could not be encoded.
    pub fn to_param(index: usize, value: ValueError) -> Self {
        Self::from_value(ErrorKind::ToParam, &format!("parameter ${}", index + 1), value)
    }
}

impl<ClientError: std::fmt::Display> Error<ClientError> {
    pub fn from_column(inner: ClientError) -> Self {
        let message = inner.to_string();
        Self::from_column_str(message, Some(inner))
    }

    pub fn prepare(inner: ClientError) -> Self {
        let message = inner.to_string();
        Self::prepare_str(message, Some(inner))
    }

    pub fn query(inner: ClientError) -> Self {
        let message = inner.to_string();
        Self::query_str(message, Some(inner))
    }
}

impl<ClientError: std::error::Error + 'static> std::error::Error for Error<ClientError> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match (&self.inner, &self.value) {
            (Some(inner), _) => Some(inner as &(dyn std::error::Error + 'static)),
            (None, Some(value)) => Some(value as &(dyn std::error::Error + 'static)),
            (None, None) => None,
        }
    }
}

/// What operation prompted the error?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Database error while preparing a query.
    Prepare,

    /// Database error while executing a query.
    Query,

    /// Bad conversion from a database column.
    FromColumn,

    /// Bad conversion to a query parameter.
    ToParam,
}

impl<ClientError> std::fmt::Display for Error<ClientError> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug)]
    struct Boom;

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("boom")
        }
    }

    impl std::error::Error for Boom {}

    #[test]
    fn client_errors_keep_their_message() {
        let error = Error::query(Boom);
        assert_eq!(ErrorKind::Query, error.kind());
        assert_eq!("boom", error.to_string());
        assert!(error.inner().is_some());
        assert!(error.value_error().is_none());
        assert_eq!("boom", error.source().unwrap().to_string());
    }

    #[test]
    fn value_errors_name_the_column() {
        let error = Error::<Boom>::from_column_value("1", ValueError::UnexpectedNull);
        assert_eq!(ErrorKind::FromColumn, error.kind());
        assert_eq!("column 1: unexpected NULL value", error.to_string());
        assert_eq!(Some(&ValueError::UnexpectedNull), error.value_error());
        assert!(error.inner().is_none());
        assert_eq!(
            "unexpected NULL value",
            error.source().unwrap().to_string()
        );
    }

    #[test]
    fn params_are_numbered_from_one() {
        let error = Error::<Boom>::to_param(0, ValueError::InvalidUtf8);
        assert_eq!(ErrorKind::ToParam, error.kind());
        assert_eq!("parameter $1: text value is not valid UTF-8", error.to_string());
    }
}
