//! Supported locales.
//!
//! The set of locales is closed: translation files are only looked up for the
//! tags listed here. `Option<Locale>::None` is used wherever "unset, use the
//! default locale" has to be expressed.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Error returned when a tag is not one of the supported locales.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported locale '{tag}'")]
pub struct LocaleError {
    /// The rejected tag as given by the caller
    pub tag: String,
}

/// A supported locale.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Locale {
    #[default]
    EnUs,
    EsMx,
    FrFr,
    NlNl,
    DeDe,
    ItIt,
    Pol,
    ElGr,
    PtBr,
    PtPt,
    ArSa,
    ZhCht,
    KoKr,
    JaJp,
    ViVn,
    RoRo,
    RuRu,
    BgBg,
    IdId,
    MkMk,
    ThTh,
    ZhChs,
    TrTr,
}

impl Locale {
    /// Every supported locale, in declaration order.
    pub const ALL: [Self; 23] = [
        Self::EnUs,
        Self::EsMx,
        Self::FrFr,
        Self::NlNl,
        Self::DeDe,
        Self::ItIt,
        Self::Pol,
        Self::ElGr,
        Self::PtBr,
        Self::PtPt,
        Self::ArSa,
        Self::ZhCht,
        Self::KoKr,
        Self::JaJp,
        Self::ViVn,
        Self::RoRo,
        Self::RuRu,
        Self::BgBg,
        Self::IdId,
        Self::MkMk,
        Self::ThTh,
        Self::ZhChs,
        Self::TrTr,
    ];

    /// The tag used in translation file names (e.g. `es-MX` in `app.es-MX.json`).
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EsMx => "es-MX",
            Self::FrFr => "fr-FR",
            Self::NlNl => "nl-NL",
            Self::DeDe => "de-DE",
            Self::ItIt => "it-IT",
            Self::Pol => "pol",
            Self::ElGr => "el-GR",
            Self::PtBr => "pt-BR",
            Self::PtPt => "pt-PT",
            Self::ArSa => "ar-SA",
            Self::ZhCht => "zh-CHT",
            Self::KoKr => "ko-KR",
            Self::JaJp => "ja-JP",
            Self::ViVn => "vi-VN",
            Self::RoRo => "ro-RO",
            Self::RuRu => "ru-RU",
            Self::BgBg => "bg-BG",
            Self::IdId => "id-ID",
            Self::MkMk => "mk-MK",
            Self::ThTh => "th-TH",
            Self::ZhChs => "zh-CHS",
            Self::TrTr => "tr-TR",
        }
    }

    /// English name of the language.
    #[must_use]
    pub const fn language(self) -> &'static str {
        match self {
            Self::EnUs => "English",
            Self::EsMx => "Spanish",
            Self::FrFr => "French",
            Self::NlNl => "Dutch",
            Self::DeDe => "German",
            Self::ItIt => "Italian",
            Self::Pol => "Polish",
            Self::ElGr => "Greek",
            Self::PtBr | Self::PtPt => "Portuguese",
            Self::ArSa => "Arabic",
            Self::ZhCht => "Chinese (Traditional)",
            Self::ZhChs => "Chinese (Simplified)",
            Self::KoKr => "Korean",
            Self::JaJp => "Japanese",
            Self::ViVn => "Vietnamese",
            Self::RoRo => "Romanian",
            Self::RuRu => "Russian",
            Self::BgBg => "Bulgarian",
            Self::IdId => "Indonesian",
            Self::MkMk => "Macedonian",
            Self::ThTh => "Thai",
            Self::TrTr => "Turkish",
        }
    }

    /// Region the locale is used in, if the tag carries one.
    #[must_use]
    pub const fn region(self) -> Option<&'static str> {
        match self {
            Self::EnUs => Some("United States"),
            Self::EsMx => Some("Mexico"),
            Self::FrFr => Some("France"),
            Self::NlNl => Some("Netherlands"),
            Self::DeDe => Some("Germany"),
            Self::ItIt => Some("Italy"),
            Self::Pol => Some("Poland"),
            Self::ElGr => Some("Greece"),
            Self::PtBr => Some("Brazil"),
            Self::PtPt => Some("Portugal"),
            Self::ArSa => Some("Saudi Arabia"),
            Self::KoKr => Some("Korea"),
            Self::JaJp => Some("Japan"),
            Self::ViVn => Some("Vietnam"),
            Self::RoRo => Some("Romania"),
            Self::RuRu => Some("Russia"),
            Self::BgBg => Some("Bulgaria"),
            Self::IdId => Some("Indonesia"),
            Self::MkMk => Some("North Macedonia"),
            Self::ThTh => Some("Thailand"),
            Self::TrTr => Some("Turkey"),
            Self::ZhCht | Self::ZhChs => None,
        }
    }
}

/// Normalize a locale tag for comparison (lowercase and replace `_` with `-`).
fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase().replace('_', "-")
}

impl FromStr for Locale {
    type Err = LocaleError;

    /// Parses a tag, ignoring case and accepting `_` as separator (`es_mx` → `es-MX`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_tag(s);
        Self::ALL
            .into_iter()
            .find(|locale| normalize_tag(locale.tag()) == normalized)
            .ok_or_else(|| LocaleError { tag: s.to_string() })
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag().to_string()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
