//! Conversions between typed values and their wire representation.
//!
//! A [`RawValue`] is what crosses the wire: text or bytes, with no
//! type information attached.  Each [`SqlValue`] type names a [`Codec`]
//! describing how it gets to and from a `RawValue`:
//!
//! * types the server understands natively implement [`PgValue`],
//!   and possibly [`PgBinaryValue`] if they can also read binary data,
//! * other types may get by with [`StringConvertible`], a plain
//!   string representation.
//!
//! The functions [`check_compatibility`], [`decode`] and [`encode`]
//! dispatch on that codec.  NULL is handled one layer up, by
//! [`FromRawValue`] and [`ToRawValue`].

mod bridge;
mod error;
mod raw;
mod scalar;

pub use bridge::{
    check_compatibility, decode, encode, Codec, FromRawValue, PgBinaryValue, PgValue, Protocol,
    SqlValue, StringConvertible, ToRawValue,
};
pub use error::{ParseFailure, ValueError};
pub use raw::{Format, RawValue};
