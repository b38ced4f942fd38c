//! Traits that represent database clients.
//!
//! Our model expects each database backend to manage the
//! connection as well as caching prepared statements.
//! A client names its row and parameter types, and the
//! traits below connect those to Rust values.

use crate::error::Error;

/// A database client's parameter and row types.
pub trait Client: Sized {
    type Row<'a>;
    type Param<'a>;
    type Error;
}

/// A type that can be retrieved from a database column by index.
pub trait FromColumnIndexed<C: Client>: Sized {
    fn from_column(row: &C::Row<'_>, index: usize) -> Result<Self, Error<C::Error>>;
}

/// A type that can be retrieved from a database column by name.
pub trait FromColumnNamed<C: Client>: Sized {
    fn from_column(row: &C::Row<'_>, name: &str) -> Result<Self, Error<C::Error>>;
}

/// A type that can be converted to a database param.
pub trait ToParam<C: Client> {
    fn to_param(&self) -> C::Param<'_>;
}
