//! Text encodings accepted for `.env` files.

use std::sync::Arc;

use uncased::UncasedStr;

use crate::{SettingsError, SettingsResult};

const BOM: char = '\u{feff}';

/// Encoding used to decode `.env` file bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FileEncoding {
    /// UTF-8; a leading byte-order mark is tolerated and dropped.
    #[default]
    Utf8,
    /// UTF-8 with an optional leading byte-order mark.
    Utf8Sig,
    /// ISO-8859-1, every byte maps to the code point of the same value.
    Latin1,
    /// Seven-bit ASCII.
    Ascii,
}

impl FileEncoding {
    const NAMES: &'static [(&'static str, Self)] = &[
        ("utf-8", Self::Utf8),
        ("utf8", Self::Utf8),
        ("utf-8-sig", Self::Utf8Sig),
        ("utf8-sig", Self::Utf8Sig),
        ("latin-1", Self::Latin1),
        ("latin1", Self::Latin1),
        ("iso-8859-1", Self::Latin1),
        ("ascii", Self::Ascii),
        ("us-ascii", Self::Ascii),
    ];

    /// Look up an encoding by name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::UnsupportedEncoding`] for unknown names.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotsettings::FileEncoding;
    /// assert_eq!(FileEncoding::from_name("UTF-8").ok(), Some(FileEncoding::Utf8));
    /// assert!(FileEncoding::from_name("ebcdic").is_err());
    /// ```
    pub fn from_name(name: &str) -> SettingsResult<Self> {
        let wanted = UncasedStr::new(name.trim());
        Self::NAMES
            .iter()
            .find(|(candidate, _)| UncasedStr::new(candidate) == wanted)
            .map(|&(_, encoding)| encoding)
            .ok_or_else(|| {
                Arc::new(SettingsError::UnsupportedEncoding {
                    encoding: name.to_owned(),
                })
            })
    }

    /// Canonical name of the encoding.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Sig => "utf-8-sig",
            Self::Latin1 => "latin-1",
            Self::Ascii => "ascii",
        }
    }

    /// Decode `bytes` into text.
    ///
    /// # Errors
    ///
    /// Returns a description of the first byte sequence that is invalid in
    /// this encoding.
    pub fn decode(self, bytes: &[u8]) -> Result<String, String> {
        match self {
            Self::Utf8 | Self::Utf8Sig => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| format!("invalid byte sequence at offset {}", e.valid_up_to()))?;
                Ok(text.strip_prefix(BOM).unwrap_or(text).to_owned())
            }
            Self::Latin1 => Ok(bytes.iter().copied().map(char::from).collect()),
            Self::Ascii => {
                if let Some((offset, byte)) = bytes.iter().enumerate().find(|(_, b)| !b.is_ascii())
                {
                    return Err(format!("non-ASCII byte 0x{byte:02x} at offset {offset}"));
                }
                Ok(bytes.iter().copied().map(char::from).collect())
            }
        }
    }
}
