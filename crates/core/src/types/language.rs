//! Languages supported by the store assistant.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A language code that is not one of [`Language::ALL`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported language code: {0}")]
pub struct UnknownLanguage(pub String);

/// Writing direction for rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

impl TextDirection {
    /// Value for an HTML `dir` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Active language of the assistant, stored under the `lang` key.
///
/// Serialized as its two-letter code (`"en"`, `"fr"`, `"ar"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (the language canned answers are written in).
    #[default]
    En,
    /// French.
    Fr,
    /// Arabic.
    Ar,
}

impl Language {
    /// Every supported language, English first.
    pub const ALL: [Self; 3] = [Self::En, Self::Fr, Self::Ar];

    /// Two-letter language code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::Ar => "ar",
        }
    }

    /// English name of the language, as used in prompts.
    #[must_use]
    pub const fn english_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Fr => "French",
            Self::Ar => "Arabic",
        }
    }

    /// Writing direction of the language.
    #[must_use]
    pub const fn direction(self) -> TextDirection {
        match self {
            Self::Ar => TextDirection::Rtl,
            Self::En | Self::Fr => TextDirection::Ltr,
        }
    }

    /// Parse a code, treating anything unsupported as English.
    ///
    /// Client storage may hold codes written by other page components
    /// (`"en-US"`, `"de"`, ...); those get the untranslated English answers.
    #[must_use]
    pub fn from_code_or_default(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            "ar" => Ok(Self::Ar),
            _ => Err(UnknownLanguage(s.to_owned())),
        }
    }
}
