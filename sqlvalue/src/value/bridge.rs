use super::{RawValue, ValueError};

/// A type the server understands natively, in text format.
pub trait PgValue: Sized {
    fn from_text(text: &str) -> Result<Self, ValueError>;

    fn to_raw(&self) -> RawValue;
}

/// A native type that can also be read from binary format.
pub trait PgBinaryValue: PgValue {
    fn from_binary(bytes: &[u8]) -> Result<Self, ValueError>;
}

/// A type with a plain string representation, for types the
/// server has no direct counterpart for.
pub trait StringConvertible: Sized {
    fn from_sql_string(text: &str) -> Option<Self>;

    fn to_sql_string(&self) -> String;
}

/// How a type gets to and from a [`RawValue`].
///
/// Build one with [`Codec::native_text`], [`Codec::native_binary`]
/// or [`Codec::fallback`], depending on which of the traits above
/// the type implements.
pub enum Codec<T> {
    Text {
        decode: fn(&str) -> Result<T, ValueError>,
        encode: fn(&T) -> RawValue,
    },
    Binary {
        decode_text: fn(&str) -> Result<T, ValueError>,
        decode_binary: fn(&[u8]) -> Result<T, ValueError>,
        encode: fn(&T) -> RawValue,
    },
    Fallback {
        parse: fn(&str) -> Option<T>,
        format: fn(&T) -> String,
    },
    Unsupported,
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Codec<T> {}

impl<T> std::fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.protocol() {
            Some(protocol) => write!(f, "Codec({protocol:?})"),
            None => f.write_str("Codec(Unsupported)"),
        }
    }
}

impl<T: PgValue> Codec<T> {
    pub fn native_text() -> Self {
        Codec::Text {
            decode: T::from_text,
            encode: T::to_raw,
        }
    }
}

impl<T: PgBinaryValue> Codec<T> {
    pub fn native_binary() -> Self {
        Codec::Binary {
            decode_text: T::from_text,
            decode_binary: T::from_binary,
            encode: T::to_raw,
        }
    }
}

impl<T: StringConvertible> Codec<T> {
    pub fn fallback() -> Self {
        Codec::Fallback {
            parse: T::from_sql_string,
            format: T::to_sql_string,
        }
    }
}

impl<T> Codec<T> {
    pub fn protocol(&self) -> Option<Protocol> {
        match self {
            Codec::Text { .. } => Some(Protocol::Native),
            Codec::Binary { .. } => Some(Protocol::NativeBinary),
            Codec::Fallback { .. } => Some(Protocol::StringFallback),
            Codec::Unsupported => None,
        }
    }
}

/// Which way a type is carried over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Native, text format only.
    Native,
    /// Native, text or binary format.
    NativeBinary,
    /// As a plain string.
    StringFallback,
}

/// A type that can be used as a column value or query parameter.
///
/// The codec is resolved once per type.  Types that don't
/// override it are unsupported, and every conversion of them
/// fails with [`ValueError::TypeUnsupportedByClient`].
///
/// ```
/// # use sqlvalue::value::{self, Codec, SqlValue, StringConvertible, RawValue};
/// #[derive(Debug, PartialEq)]
/// struct Color(String);
///
/// impl StringConvertible for Color {
///     fn from_sql_string(text: &str) -> Option<Self> {
///         text.strip_prefix('#').map(|hex| Color(hex.into()))
///     }
///
///     fn to_sql_string(&self) -> String {
///         format!("#{}", self.0)
///     }
/// }
///
/// impl SqlValue for Color {
///     fn codec() -> Codec<Self> {
///         Codec::fallback()
///     }
/// }
///
/// let raw = value::encode(&Color("ff0000".into())).unwrap();
/// assert_eq!(RawValue::text("#ff0000"), raw);
/// assert_eq!(Color("ff0000".into()), value::decode(&raw).unwrap());
/// ```
pub trait SqlValue: Sized {
    fn codec() -> Codec<Self> {
        Codec::Unsupported
    }
}

fn unsupported<T>() -> ValueError {
    ValueError::TypeUnsupportedByClient {
        type_name: std::any::type_name::<T>(),
    }
}

/// Find out how `T` would be carried, or that it can't be.
pub fn check_compatibility<T: SqlValue>() -> Result<Protocol, ValueError> {
    T::codec().protocol().ok_or_else(unsupported::<T>)
}

/// Decode a raw value as a `T`.
///
/// # Panics
///
/// Panics when given binary data for a type that only reads text.
pub fn decode<T: SqlValue>(raw: &RawValue) -> Result<T, ValueError> {
    match (T::codec(), raw) {
        (Codec::Text { decode, .. }, RawValue::Textual(text)) => decode(text),
        (Codec::Text { .. }, RawValue::Binary(_)) => panic!(
            "binary value given to {}, which only reads text",
            std::any::type_name::<T>()
        ),
        (Codec::Binary { decode_text, .. }, RawValue::Textual(text)) => decode_text(text),
        (Codec::Binary { decode_binary, .. }, RawValue::Binary(bytes)) => decode_binary(bytes),
        (Codec::Fallback { parse, .. }, raw) => {
            let text = match raw {
                RawValue::Textual(text) => text.as_str(),
                RawValue::Binary(bytes) => {
                    std::str::from_utf8(bytes).map_err(|_| ValueError::InvalidUtf8)?
                }
            };
            parse(text).ok_or_else(|| ValueError::StringNotConvertible {
                text: text.into(),
                type_name: std::any::type_name::<T>(),
            })
        }
        (Codec::Unsupported, _) => Err(unsupported::<T>()),
    }
}

/// Encode a `T` as a raw value.
pub fn encode<T: SqlValue>(value: &T) -> Result<RawValue, ValueError> {
    match T::codec() {
        Codec::Text { encode, .. } | Codec::Binary { encode, .. } => Ok(encode(value)),
        Codec::Fallback { format, .. } => Ok(RawValue::Textual(format(value))),
        Codec::Unsupported => Err(unsupported::<T>()),
    }
}

/// A value that can be read from a possibly-NULL column.
pub trait FromRawValue: Sized {
    fn from_raw_value(raw: Option<&RawValue>) -> Result<Self, ValueError>;
}

impl<T: SqlValue> FromRawValue for T {
    fn from_raw_value(raw: Option<&RawValue>) -> Result<Self, ValueError> {
        match raw {
            Some(raw) => decode(raw),
            None => Err(ValueError::UnexpectedNull),
        }
    }
}

impl<T: SqlValue> FromRawValue for Option<T> {
    fn from_raw_value(raw: Option<&RawValue>) -> Result<Self, ValueError> {
        raw.map(decode).transpose()
    }
}

/// A value that can be sent as a possibly-NULL parameter.
///
/// This trait is object safe, query parameters are passed
/// around as `&dyn ToRawValue`.
pub trait ToRawValue: Sync {
    /// Encode the value, with `None` meaning NULL.
    fn to_raw_value(&self) -> Result<Option<RawValue>, ValueError>;
}

impl<T: SqlValue + Sync> ToRawValue for T {
    fn to_raw_value(&self) -> Result<Option<RawValue>, ValueError> {
        encode(self).map(Some)
    }
}

impl<T: SqlValue + Sync> ToRawValue for Option<T> {
    fn to_raw_value(&self) -> Result<Option<RawValue>, ValueError> {
        self.as_ref().map(encode).transpose()
    }
}

impl ToRawValue for &str {
    fn to_raw_value(&self) -> Result<Option<RawValue>, ValueError> {
        Ok(Some(RawValue::text(*self)))
    }
}

impl ToRawValue for &[u8] {
    fn to_raw_value(&self) -> Result<Option<RawValue>, ValueError> {
        let bytes: Vec<u8> = self.to_vec();
        encode(&bytes).map(Some)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq)]
    struct Opaque;

    impl SqlValue for Opaque {}

    #[derive(Debug, PartialEq)]
    struct Level(u8);

    impl StringConvertible for Level {
        fn from_sql_string(text: &str) -> Option<Self> {
            text.strip_prefix('L')?.parse().ok().map(Level)
        }

        fn to_sql_string(&self) -> String {
            format!("L{}", self.0)
        }
    }

    impl SqlValue for Level {
        fn codec() -> Codec<Self> {
            Codec::fallback()
        }
    }

    #[test]
    fn compatibility() {
        assert_eq!(Ok(Protocol::Native), check_compatibility::<i32>());
        assert_eq!(Ok(Protocol::NativeBinary), check_compatibility::<String>());
        assert_eq!(Ok(Protocol::StringFallback), check_compatibility::<Level>());
        assert!(matches!(
            check_compatibility::<Opaque>(),
            Err(ValueError::TypeUnsupportedByClient { type_name }) if type_name.ends_with("Opaque")
        ));
    }

    #[test]
    fn unsupported_types_fail_both_ways() {
        assert!(matches!(
            encode(&Opaque),
            Err(ValueError::TypeUnsupportedByClient { .. })
        ));
        assert!(matches!(
            decode::<Opaque>(&RawValue::text("")),
            Err(ValueError::TypeUnsupportedByClient { .. })
        ));
    }

    #[test]
    fn fallback_goes_through_text() {
        assert_eq!(Ok(RawValue::text("L3")), encode(&Level(3)));
        assert_eq!(Ok(Level(7)), decode(&RawValue::text("L7")));
        assert_eq!(Ok(Level(7)), decode(&RawValue::binary(b"L7".to_vec())));
    }

    #[test]
    fn fallback_failure_names_type() {
        let error = decode::<Level>(&RawValue::text("high")).unwrap_err();
        match error {
            ValueError::StringNotConvertible { text, type_name } => {
                assert_eq!("high", text);
                assert!(type_name.ends_with("Level"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn fallback_rejects_bad_utf8() {
        assert_eq!(
            Err(ValueError::InvalidUtf8),
            decode::<Level>(&RawValue::binary(vec![0xff]))
        );
    }

    #[test]
    fn binary_capable_types_read_both() {
        assert_eq!(Ok(String::from("hi")), decode(&RawValue::text("hi")));
        assert_eq!(Ok(String::from("hi")), decode(&RawValue::binary(b"hi".to_vec())));
    }

    #[test]
    #[should_panic(expected = "only reads text")]
    fn binary_into_text_only_type_panics() {
        let _ = decode::<i32>(&RawValue::binary(vec![0, 0, 0, 1]));
    }

    #[test]
    fn null_handling() {
        assert_eq!(Ok(None), Option::<i32>::from_raw_value(None));
        assert_eq!(
            Ok(Some(5)),
            Option::<i32>::from_raw_value(Some(&RawValue::text("5")))
        );
        assert_eq!(Err(ValueError::UnexpectedNull), i32::from_raw_value(None));

        assert_eq!(Ok(None), None::<i32>.to_raw_value());
        assert_eq!(Ok(Some(RawValue::text("5"))), Some(5i32).to_raw_value());
        assert_eq!(Ok(Some(RawValue::text("5"))), 5i32.to_raw_value());
    }

    #[test]
    fn params_are_object_safe() {
        let params: Vec<&dyn ToRawValue> = vec![&1i64, &"two", &None::<bool>];
        let raw: Result<Vec<_>, _> = params.iter().map(|param| param.to_raw_value()).collect();
        assert_eq!(
            Ok(vec![Some(RawValue::text("1")), Some(RawValue::text("two")), None]),
            raw
        );
    }

    #[test]
    fn codec_debug_names_protocol() {
        assert_eq!("Codec(Native)", format!("{:?}", i32::codec()));
        assert_eq!("Codec(Unsupported)", format!("{:?}", Opaque::codec()));
    }
}
