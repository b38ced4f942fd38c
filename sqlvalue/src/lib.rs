#![cfg_attr(docsrs, feature(doc_cfg))]

//! Typed SQL values, and the PostgreSQL text format.
//!
//! PostgreSQL sends every value over the wire as either text or
//! bytes, without saying what type it is.  This crate turns those
//! raw values into Rust types and back:
//!
//! * [`temporal`] has dates, times and timestamps, with their
//!   sentinels, eras, fractional seconds and time zones,
//! * [`interval`] has intervals in ISO 8601 format,
//! * [`value`] has the raw values themselves, the scalar codecs,
//!   and the machinery to pick a codec for a type.
//!
//! ```
//! use sqlvalue::temporal::{PgTimestamp, Zone};
//! use sqlvalue::value::{self, RawValue};
//!
//! let raw = RawValue::text("2020-03-15 14:30:00.250000+05:30");
//! let timestamp: PgTimestamp = value::decode(&raw).unwrap();
//!
//! let time = timestamp.time().unwrap();
//! assert_eq!(250_000_000, time.nanosecond());
//! assert_eq!(Some(Zone::new(5, 30).unwrap()), time.zone);
//!
//! assert_eq!(
//!     RawValue::text("2020-03-15 14:30:00.250000000+0530"),
//!     value::encode(&timestamp).unwrap(),
//! );
//! ```
//!
//! On top of the values sits a small client abstraction.  Queries
//! are plain Rust structs implementing [`Statement`] or [`Query`],
//! and results are read by [`FromRow`].  The [`postgres`] client
//! runs them over any [`Connection`](postgres::Connection) that can
//! move raw values, caching prepared statements along the way.
//!
//! ## Features
//!
//! | Feature | Adds |
//! | ------- | ---- |
//! | `chrono` | Conversions between the temporal types and `chrono`'s naive types |

pub mod client;
pub mod error;
pub mod interval;
pub mod postgres;
pub mod query;
pub mod row;
pub mod temporal;
pub mod value;

mod parser;

#[cfg(test)]
mod test;

pub use error::Error;
pub use query::{Query, QueryOne, Statement};
pub use row::FromRow;
