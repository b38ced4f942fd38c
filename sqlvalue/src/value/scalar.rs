use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use rust_decimal::Decimal;

use super::{Codec, PgBinaryValue, PgValue, RawValue, SqlValue, StringConvertible, ValueError};
use crate::interval::PgInterval;
use crate::parser::number;
use crate::temporal::{PgDate, PgTime, PgTimestamp};

const TRUE_TOKENS: [&str; 6] = ["t", "true", "y", "yes", "on", "1"];
const FALSE_TOKENS: [&str; 6] = ["f", "false", "n", "no", "off", "0"];

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

macro_rules! impl_sql_value {
    ($codec:ident: $($ty:ty),* $(,)?) => {
        $(
            impl SqlValue for $ty {
                fn codec() -> Codec<Self> {
                    Codec::$codec()
                }
            }
        )*
    };
}

impl_sql_value!(native_text: i16, i32, i64, f32, f64, bool, Decimal);
impl_sql_value!(native_text: PgDate, PgTime, PgTimestamp, PgInterval);
impl_sql_value!(native_binary: String, Vec<u8>);
impl_sql_value!(fallback: IpAddr, Ipv4Addr, Ipv6Addr);

macro_rules! impl_numeric_value {
    ($($ty:ty),*) => {
        $(
            impl PgValue for $ty {
                fn from_text(text: &str) -> Result<Self, ValueError> {
                    number(text)
                }

                fn to_raw(&self) -> RawValue {
                    RawValue::Textual(self.to_string())
                }
            }
        )*
    };
}

impl_numeric_value!(i16, i32, i64);

impl PgValue for Decimal {
    fn from_text(text: &str) -> Result<Self, ValueError> {
        let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.len() + fraction.len() == 0 || !digits(whole) || !digits(fraction) {
            return Err(ValueError::InvalidNumber(text.into()));
        }
        number(text)
    }

    fn to_raw(&self) -> RawValue {
        RawValue::Textual(self.to_string())
    }
}

macro_rules! impl_float_value {
    ($($ty:ident),*) => {
        $(
            impl PgValue for $ty {
                fn from_text(text: &str) -> Result<Self, ValueError> {
                    match text {
                        "NaN" => Ok($ty::NAN),
                        "Infinity" => Ok($ty::INFINITY),
                        "-Infinity" => Ok($ty::NEG_INFINITY),
                        _ => number(text),
                    }
                }

                fn to_raw(&self) -> RawValue {
                    let text = if self.is_nan() {
                        "NaN".into()
                    } else if self.is_infinite() && self.is_sign_positive() {
                        "Infinity".into()
                    } else if self.is_infinite() {
                        "-Infinity".into()
                    } else {
                        self.to_string()
                    };
                    RawValue::Textual(text)
                }
            }
        )*
    };
}

impl_float_value!(f32, f64);

macro_rules! impl_parsed_value {
    ($($ty:ty),*) => {
        $(
            impl PgValue for $ty {
                fn from_text(text: &str) -> Result<Self, ValueError> {
                    text.parse()
                }

                fn to_raw(&self) -> RawValue {
                    RawValue::Textual(self.to_string())
                }
            }
        )*
    };
}

impl_parsed_value!(PgDate, PgTime, PgTimestamp, PgInterval);

impl PgValue for bool {
    fn from_text(text: &str) -> Result<Self, ValueError> {
        if TRUE_TOKENS.contains(&text) {
            Ok(true)
        } else if FALSE_TOKENS.contains(&text) {
            Ok(false)
        } else {
            Err(ValueError::InvalidBoolean(text.into()))
        }
    }

    fn to_raw(&self) -> RawValue {
        RawValue::text(if *self { "t" } else { "f" })
    }
}

impl PgValue for String {
    fn from_text(text: &str) -> Result<Self, ValueError> {
        Ok(text.into())
    }

    fn to_raw(&self) -> RawValue {
        RawValue::Textual(self.clone())
    }
}

impl PgBinaryValue for String {
    fn from_binary(bytes: &[u8]) -> Result<Self, ValueError> {
        std::str::from_utf8(bytes)
            .map(Into::into)
            .map_err(|_| ValueError::InvalidUtf8)
    }
}

/// `bytea`, written in hex format and read in either hex
/// or the older escape format.
impl PgValue for Vec<u8> {
    fn from_text(text: &str) -> Result<Self, ValueError> {
        let bytes = match text.strip_prefix("\\x") {
            Some(hex) => unhex(hex),
            None => unescape(text),
        };
        bytes.ok_or_else(|| ValueError::InvalidBytea(text.into()))
    }

    fn to_raw(&self) -> RawValue {
        let mut text = String::with_capacity(2 + self.len() * 2);
        text.push_str("\\x");
        for byte in self {
            text.push(HEX_DIGITS[usize::from(byte >> 4)].into());
            text.push(HEX_DIGITS[usize::from(byte & 0xf)].into());
        }
        RawValue::Textual(text)
    }
}

impl PgBinaryValue for Vec<u8> {
    fn from_binary(bytes: &[u8]) -> Result<Self, ValueError> {
        Ok(bytes.to_vec())
    }
}

fn unhex(hex: &str) -> Option<Vec<u8>> {
    let nibbles = hex
        .chars()
        .map(|ch| ch.to_digit(16).and_then(|digit| u8::try_from(digit).ok()))
        .collect::<Option<Vec<u8>>>()?;

    if nibbles.len() % 2 != 0 {
        return None;
    }

    Some(nibbles.chunks(2).map(|pair| pair[0] << 4 | pair[1]).collect())
}

/// Escape format: `\\` is a backslash, `\nnn` an octal byte,
/// anything else stands for itself.
fn unescape(text: &str) -> Option<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'\\' if bytes.get(index + 1) == Some(&b'\\') => {
                result.push(b'\\');
                index += 2;
            }
            b'\\' => {
                let digits = bytes.get(index + 1..index + 4)?;
                if !digits.iter().all(|digit| (b'0'..=b'7').contains(digit)) {
                    return None;
                }
                let value = digits
                    .iter()
                    .fold(0u16, |value, digit| value * 8 + u16::from(digit - b'0'));
                result.push(u8::try_from(value).ok()?);
                index += 4;
            }
            byte => {
                result.push(byte);
                index += 1;
            }
        }
    }

    Some(result)
}

/// Host addresses in `inet` form, where a full-length mask is optional.
impl StringConvertible for Ipv4Addr {
    fn from_sql_string(text: &str) -> Option<Self> {
        text.strip_suffix("/32").unwrap_or(text).parse().ok()
    }

    fn to_sql_string(&self) -> String {
        self.to_string()
    }
}

impl StringConvertible for Ipv6Addr {
    fn from_sql_string(text: &str) -> Option<Self> {
        text.strip_suffix("/128").unwrap_or(text).parse().ok()
    }

    fn to_sql_string(&self) -> String {
        self.to_string()
    }
}

impl StringConvertible for IpAddr {
    fn from_sql_string(text: &str) -> Option<Self> {
        Ipv4Addr::from_sql_string(text)
            .map(IpAddr::V4)
            .or_else(|| Ipv6Addr::from_sql_string(text).map(IpAddr::V6))
    }

    fn to_sql_string(&self) -> String {
        self.to_string()
    }
}
