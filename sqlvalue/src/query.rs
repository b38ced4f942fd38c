//! Traits to define database queries.
//!
//! This module contains a group of traits that together provide
//! the tools needed to define database queries.  A query is a
//! plain Rust struct: its text is fixed, its fields are the
//! parameters, and its associated `Row` type is the result.
//!
//! ```
//! use sqlvalue::query::{Query, StaticQueryText, ToParams};
//! use sqlvalue::client::ToParam;
//! use sqlvalue::postgres::{Client, Connection, Param};
//! use sqlvalue::temporal::PgTimestamp;
//!
//! struct EventsSince(PgTimestamp);
//!
//! impl StaticQueryText for EventsSince {
//!     const QUERY_TEXT: &'static str = "SELECT id, name FROM events WHERE at > $1";
//! }
//!
//! impl<C: Connection> ToParams<Client<C>> for EventsSince {
//!     fn to_params(&self) -> Option<Vec<Param<'_>>> {
//!         Some(vec![ToParam::<Client<C>>::to_param(&self.0)])
//!     }
//! }
//!
//! impl<C: Connection> Query<Client<C>> for EventsSince {
//!     type Row = (i32, String);
//! }
//! ```

use crate::client::Client;
use crate::row::FromRow;

/// The text of a given `Query` or `Statement`.
///
/// Most types will get the blanket implementation of
/// this trait for implementors of [`StaticQueryText`].
/// The dynamic version exists, however, to allow query
/// text built at runtime.
pub trait QueryText {
    fn query_text(&self) -> String;
}

/// The constant text of a `Query` or `Statement`.
///
/// Types that implement this trait can be prepared
/// statically, without reference to any particular
/// query parameters.
pub trait StaticQueryText {
    const QUERY_TEXT: &'static str;
}

impl<S: StaticQueryText> QueryText for S {
    fn query_text(&self) -> String {
        Self::QUERY_TEXT.into()
    }
}

/// A helper trait to build query parameters for a `Client`.
///
/// Types that wish to be used as a `Query` or `Statement`
/// need to be able to be converted to the right
/// parameter type for a given `Client`.  `None` means
/// the query takes no parameters.
pub trait ToParams<C: Client>: Sync {
    fn to_params(&self) -> Option<Vec<C::Param<'_>>>;
}

/// A database statement which returns no results.
///
/// A `Statement` is something that has query text and can be
/// converted to the parameters of some database `Client`.
pub trait Statement<C: Client>: QueryText + ToParams<C> + Sync {}

impl<C: Client, S: QueryText + ToParams<C> + Sync> Statement<C> for S {}

/// A database query that returns zero or more result rows.
///
/// A `Query` is something that has `QueryText`, can be converted
/// to the parameters of some database `Client`, and has a result
/// type that can be produced from that `Client`'s rows.
pub trait Query<C: Client>: QueryText + ToParams<C> + Sync {
    type Row: FromRow<C>;
}

/// A marker trait for a query that returns at most one row.
pub trait QueryOne<C: Client>: Query<C> {}
