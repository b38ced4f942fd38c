//! Traits to load result rows.
//!
//! A row type either reads its columns in order, with
//! [`FromColumnsIndexed`], or by name, with [`FromColumnsNamed`].
//! Either way, nested row types read from a child view of the
//! same row: offset by a number of columns, or by a name prefix.

use crate::client::{Client, FromColumnIndexed, FromColumnNamed};
use crate::error::Error;

/// A type that can be produced from a database's result row.
///
/// Tuples of column types implement this trait, reading their
/// fields in column order.  Other types usually delegate to
/// [`FromColumnsIndexed`] or [`FromColumnsNamed`]:
///
/// ```
/// use sqlvalue::client::{Client, FromColumnNamed};
/// use sqlvalue::row::{ColumnsNamed, FromColumnsNamed, FromRow};
/// use sqlvalue::Error;
///
/// struct Customer {
///     id: i32,
///     name: String,
/// }
///
/// impl<C: Client> FromColumnsNamed<C> for Customer
/// where
///     i32: FromColumnNamed<C>,
///     String: FromColumnNamed<C>,
/// {
///     fn from_columns(columns: ColumnsNamed<'_, '_, C>) -> Result<Self, Error<C::Error>> {
///         Ok(Customer {
///             id: columns.get("id")?,
///             name: columns.get("name")?,
///         })
///     }
/// }
///
/// impl<C: Client> FromRow<C> for Customer
/// where
///     Customer: FromColumnsNamed<C>,
/// {
///     fn from_row(row: &C::Row<'_>) -> Result<Self, Error<C::Error>> {
///         FromColumnsNamed::from_columns(ColumnsNamed::new(row))
///     }
/// }
/// ```
pub trait FromRow<C: Client>: Sized {
    fn from_row(row: &C::Row<'_>) -> Result<Self, Error<C::Error>>;

    fn from_rows(rows: &[C::Row<'_>]) -> Result<Vec<Self>, Error<C::Error>> {
        rows.iter().map(|row| FromRow::from_row(row)).collect()
    }
}

/// A view of a row's columns by position, starting at some offset.
pub struct ColumnsIndexed<'a, 'r, C: Client> {
    row: &'a C::Row<'r>,
    offset: usize,
}

impl<'a, 'r, C: Client> ColumnsIndexed<'a, 'r, C> {
    pub fn new(row: &'a C::Row<'r>) -> Self {
        ColumnsIndexed { row, offset: 0 }
    }

    pub fn get<T>(&self, index: usize) -> Result<T, Error<C::Error>>
    where
        T: FromColumnIndexed<C>,
    {
        FromColumnIndexed::from_column(self.row, self.offset + index)
    }

    /// A view starting `offset` columns further along.
    pub fn child(&self, offset: usize) -> Self {
        ColumnsIndexed {
            row: self.row,
            offset: self.offset + offset,
        }
    }
}

/// A view of a row's columns by name, with some prefix.
pub struct ColumnsNamed<'a, 'r, C: Client> {
    row: &'a C::Row<'r>,
    prefix: String,
}

impl<'a, 'r, C: Client> ColumnsNamed<'a, 'r, C> {
    pub fn new(row: &'a C::Row<'r>) -> Self {
        ColumnsNamed {
            row,
            prefix: String::new(),
        }
    }

    pub fn get<T>(&self, name: &str) -> Result<T, Error<C::Error>>
    where
        T: FromColumnNamed<C>,
    {
        let mut column = self.prefix.clone();
        column.push_str(name);
        FromColumnNamed::from_column(self.row, &column)
    }

    /// A view of the columns whose names continue with `prefix`.
    pub fn child(&self, prefix: &str) -> Self {
        let mut nested = self.prefix.clone();
        nested.push_str(prefix);
        ColumnsNamed {
            row: self.row,
            prefix: nested,
        }
    }
}

/// A type that can be produced from a run of columns, by position.
pub trait FromColumnsIndexed<C: Client>: Sized {
    /// How many columns this type reads.
    const NUM_COLUMNS: usize;

    fn from_columns(columns: ColumnsIndexed<'_, '_, C>) -> Result<Self, Error<C::Error>>;
}

/// A type that can be produced from columns, by name.
pub trait FromColumnsNamed<C: Client>: Sized {
    fn from_columns(columns: ColumnsNamed<'_, '_, C>) -> Result<Self, Error<C::Error>>;
}

macro_rules! impl_tuple_from_columns {
    (
        $count:literal;
        $(
            $name:ident $index:tt
        ),*
        $(,)?
    ) => {
        impl<
            C,
            $(
                $name,
            )*
        > FromColumnsIndexed<C> for ($($name,)*)
        where
            C: Client,
            $(
                $name: FromColumnIndexed<C>,
            )*
        {
            const NUM_COLUMNS: usize = $count;

            #[allow(unused_variables)]
            fn from_columns(columns: ColumnsIndexed<'_, '_, C>) -> Result<Self, Error<C::Error>> {
                Ok(($(columns.get::<$name>($index)?,)*))
            }
        }

        impl<
            C,
            $(
                $name,
            )*
        > FromRow<C> for ($($name,)*)
        where
            C: Client,
            ($($name,)*): FromColumnsIndexed<C>,
        {
            fn from_row(row: &C::Row<'_>) -> Result<Self, Error<C::Error>> {
                FromColumnsIndexed::from_columns(ColumnsIndexed::new(row))
            }
        }
    };
}

impl_tuple_from_columns!(0;);
impl_tuple_from_columns!(1; T0 0);
impl_tuple_from_columns!(2; T0 0, T1 1);
impl_tuple_from_columns!(3; T0 0, T1 1, T2 2);
impl_tuple_from_columns!(4; T0 0, T1 1, T2 2, T3 3);
impl_tuple_from_columns!(5; T0 0, T1 1, T2 2, T3 3, T4 4);
impl_tuple_from_columns!(6; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
impl_tuple_from_columns!(7; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
impl_tuple_from_columns!(8; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);
