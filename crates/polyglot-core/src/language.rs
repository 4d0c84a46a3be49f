use serde::{Deserialize, Serialize};

/// A language label.
///
/// The set is closed and fixed at build time. Declaration order is meaningful:
/// it is the index order of [`LanguageDecision`](crate::LanguageDecision)
/// confidence vectors and the tie-break order for the most confident language.
///
/// [`Language::Other`] is the synthetic background label used when one
/// language is trained against all the others; it is never reported as a final
/// answer by a multi-class classifier.
///
/// Parsing is case-insensitive:
///
/// ```
/// use polyglot_core::Language;
///
/// assert_eq!("english".parse::<Language>().unwrap(), Language::English);
/// assert_eq!(Language::Samoan.to_string(), "Samoan");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum Language {
    Albanian,
    Croatian,
    Czech,
    Danish,
    Dutch,
    English,
    French,
    Gaelic,
    German,
    Hawaiian,
    Icelandic,
    Italian,
    Romanian,
    Samoan,
    Spanish,
    Other,
}

impl Language {
    /// Number of labels, including [`Language::Other`].
    pub const LEN: usize = 16;

    /// Every label in declaration order.
    pub const ALL: [Self; Self::LEN] = [
        Self::Albanian,
        Self::Croatian,
        Self::Czech,
        Self::Danish,
        Self::Dutch,
        Self::English,
        Self::French,
        Self::Gaelic,
        Self::German,
        Self::Hawaiian,
        Self::Icelandic,
        Self::Italian,
        Self::Romanian,
        Self::Samoan,
        Self::Spanish,
        Self::Other,
    ];

    /// Position of this label in [`Language::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for the synthetic background label.
    #[must_use]
    pub const fn is_background(self) -> bool {
        matches!(self, Self::Other)
    }

    /// Every real language, i.e. all labels except [`Language::Other`].
    pub fn learnable() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|language| !language.is_background())
    }
}
