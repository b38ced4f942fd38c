//! A PostgreSQL client speaking the text format.
//!
//! The transport is left to a [`Connection`], which only ever sees
//! raw values.  The [`Client`] wraps it with a statement cache and
//! converts parameters and columns with the [`value`](crate::value)
//! codecs.

use tracing::{debug, trace};

use crate::client::{FromColumnIndexed, FromColumnNamed, ToParam};
use crate::query::{Query, QueryOne, Statement, StaticQueryText};
use crate::row::FromRow;
use crate::value::{FromRawValue, RawValue, ToRawValue};
use crate::error;

/// The type of errors from a `Client`.
pub type Error<C> = error::Error<<C as Connection>::Error>;

/// The type of query parameters for a `Client`.
pub type Param<'a> = &'a dyn ToRawValue;

/// A connection to the database, which moves raw values.
///
/// Parameters and columns are `None` for NULL.
pub trait Connection {
    type Statement: Clone;
    type Error: std::fmt::Display;

    fn prepare(&mut self, query_text: &str) -> Result<Self::Statement, Self::Error>;

    fn query(
        &mut self,
        statement: &Self::Statement,
        params: &[Option<RawValue>],
    ) -> Result<Vec<Row>, Self::Error>;

    fn execute(
        &mut self,
        statement: &Self::Statement,
        params: &[Option<RawValue>],
    ) -> Result<u64, Self::Error>;
}

/// A result row, as received from the database.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Row {
    names: Vec<String>,
    values: Vec<Option<RawValue>>,
}

impl Row {
    /// Build a row from its column names and values.
    ///
    /// # Panics
    ///
    /// Panics if there are not as many names as values.
    pub fn new(names: Vec<String>, values: Vec<Option<RawValue>>) -> Self {
        assert_eq!(
            names.len(),
            values.len(),
            "a row needs one name per column"
        );
        Row { names, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The value at `index`, or `None` if there is no such column.
    pub fn get(&self, index: usize) -> Option<Option<&RawValue>> {
        self.values.get(index).map(Option::as_ref)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|column| column == name)
    }
}

impl<C: Connection, T: FromRawValue> FromColumnIndexed<Client<C>> for T {
    fn from_column(row: &Row, index: usize) -> Result<Self, Error<C>> {
        let raw = row.get(index).ok_or_else(|| {
            Error::<C>::from_column_str(format!("no column at index {index}"), None)
        })?;
        T::from_raw_value(raw)
            .map_err(|error| Error::<C>::from_column_value(&index.to_string(), error))
    }
}

impl<C: Connection, T: FromRawValue> FromColumnNamed<Client<C>> for T {
    fn from_column(row: &Row, name: &str) -> Result<Self, Error<C>> {
        let raw = row.index_of(name).and_then(|index| row.get(index)).ok_or_else(|| {
            Error::<C>::from_column_str(format!("no column named {name:?}"), None)
        })?;
        T::from_raw_value(raw).map_err(|error| Error::<C>::from_column_value(name, error))
    }
}

impl<C: Connection, T: ToRawValue> ToParam<Client<C>> for T {
    fn to_param(&self) -> Param<'_> {
        self
    }
}

/// A PostgreSQL client over some connection.
pub struct Client<C: Connection> {
    connection: C,
    statements: std::collections::HashMap<String, C::Statement>,
}

impl<C: Connection> crate::client::Client for Client<C> {
    type Row<'a> = Row;
    type Param<'a> = Param<'a>;
    type Error = C::Error;
}

impl<C: Connection> AsRef<C> for Client<C> {
    fn as_ref(&self) -> &C {
        &self.connection
    }
}

impl<C: Connection> AsMut<C> for Client<C> {
    fn as_mut(&mut self) -> &mut C {
        &mut self.connection
    }
}

impl<C: Connection> From<C> for Client<C> {
    fn from(connection: C) -> Self {
        Self::new(connection)
    }
}

fn encode_params<C: Connection>(
    params: Option<Vec<Param<'_>>>,
) -> Result<Vec<Option<RawValue>>, Error<C>> {
    params
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, param)| {
            param.to_raw_value().map_err(|error| {
                debug!(index, %error, "failed to encode query parameter");
                Error::<C>::to_param(index, error)
            })
        })
        .collect()
}

impl<C: Connection> Client<C> {
    /// Create a new `Client` over an open connection.
    pub fn new(connection: C) -> Self {
        let statements = std::collections::HashMap::new();
        Client {
            connection,
            statements,
        }
    }

    pub fn into_inner(self) -> C {
        self.connection
    }

    fn prepare_internal<S: Into<String>>(&mut self, query_text: S) -> Result<C::Statement, Error<C>> {
        match self.statements.entry(query_text.into()) {
            std::collections::hash_map::Entry::Occupied(entry) => Ok(entry.get().clone()),
            std::collections::hash_map::Entry::Vacant(entry) => {
                debug!(query_text = entry.key().as_str(), "preparing statement");
                let statement = self
                    .connection
                    .prepare(entry.key())
                    .map_err(Error::<C>::prepare)?;
                Ok(entry.insert(statement).clone())
            }
        }
    }

    /// Creates and caches new prepared statement.
    ///
    /// Everything required to prepare the statement is available on the
    /// type argument, so no runtime input is needed.
    pub fn prepare<S: StaticQueryText>(&mut self) -> Result<(), Error<C>> {
        self.prepare_internal(S::QUERY_TEXT)?;
        Ok(())
    }

    fn run<Q: Query<Self>>(&mut self, query: &Q) -> Result<Vec<Row>, Error<C>> {
        let params = encode_params::<C>(query.to_params())?;
        let statement = self.prepare_internal(query.query_text())?;

        trace!(params = params.len(), "running query");
        let rows = self
            .connection
            .query(&statement, &params)
            .map_err(Error::<C>::query)?;
        trace!(rows = rows.len(), "query returned");

        Ok(rows)
    }

    /// Executes a query, returning the resulting rows.
    ///
    /// We'll prepare the statement first if we haven't yet.
    pub fn query<Q: Query<Self>>(&mut self, query: &Q) -> Result<Vec<Q::Row>, Error<C>> {
        let rows = self.run(query)?;
        <Q::Row as FromRow<Self>>::from_rows(&rows)
    }

    /// Executes a query which returns at most one row, returning it.
    pub fn query_opt<Q: QueryOne<Self>>(&mut self, query: &Q) -> Result<Option<Q::Row>, Error<C>> {
        let rows = self.run(query)?;
        rows.first()
            .map(|row| <Q::Row as FromRow<Self>>::from_row(row))
            .transpose()
    }

    /// Executes a query which returns a single row, returning it.
    ///
    /// Returns an error if the query returns no rows.
    pub fn query_one<Q: QueryOne<Self>>(&mut self, query: &Q) -> Result<Q::Row, Error<C>> {
        self.query_opt(query)?
            .ok_or_else(|| Error::<C>::query_str("query returned no rows", None))
    }

    /// Executes a statement, returning the number of rows modified.
    pub fn execute<S: Statement<Self>>(&mut self, statement: &S) -> Result<u64, Error<C>> {
        let params = encode_params::<C>(statement.to_params())?;
        let prepared = self.prepare_internal(statement.query_text())?;

        trace!(params = params.len(), "executing statement");
        self.connection
            .execute(&prepared, &params)
            .map_err(Error::<C>::query)
    }
}
