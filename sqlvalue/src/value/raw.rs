use super::ValueError;

/// The wire format of a single value.
///
/// This is metadata sent alongside a value, it must always agree
/// with the variant of the [`RawValue`] it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum Format {
    Textual = 0,
    Binary = 1,
}

impl Format {
    /// The format code used on the wire.
    pub fn code(self) -> i16 {
        self as i16
    }
}

/// A single value as it travels over the wire, before type decoding.
///
/// Neither variant carries any information about the type of the
/// value, the reader must know what to expect from context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawValue {
    Textual(String),
    Binary(Vec<u8>),
}

impl RawValue {
    /// Builds a textual raw value.
    pub fn text<S: Into<String>>(text: S) -> Self {
        RawValue::Textual(text.into())
    }

    /// Builds a binary raw value.
    pub fn binary<B: Into<Vec<u8>>>(bytes: B) -> Self {
        RawValue::Binary(bytes.into())
    }

    /// Builds a raw value from a wire payload and its format tag.
    ///
    /// Textual payloads must be valid UTF-8.
    pub fn from_wire(bytes: Vec<u8>, format: Format) -> Result<Self, ValueError> {
        match format {
            Format::Binary => Ok(RawValue::Binary(bytes)),
            Format::Textual => String::from_utf8(bytes)
                .map(RawValue::Textual)
                .map_err(|_| ValueError::InvalidUtf8),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            RawValue::Textual(_) => Format::Textual,
            RawValue::Binary(_) => Format::Binary,
        }
    }

    /// The length of the payload in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawValue::Textual(text) => text.as_bytes(),
            RawValue::Binary(bytes) => bytes,
        }
    }

    /// The text of a textual value, or `None` for a binary one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Textual(text) => Some(text),
            RawValue::Binary(_) => None,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RawValue::Textual(text) => text.into_bytes(),
            RawValue::Binary(bytes) => bytes,
        }
    }
}

impl From<String> for RawValue {
    fn from(text: String) -> Self {
        RawValue::Textual(text)
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        RawValue::Textual(text.into())
    }
}
