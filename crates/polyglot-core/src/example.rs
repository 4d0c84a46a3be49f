use serde::{Deserialize, Serialize};

use crate::Language;

/// Characters that separate words, in addition to whitespace.
const WORD_SEPARATORS: &[char] = &[
    '-', '(', ')', '*', '&', '^', '%', '$', '#', '@', '!', ',', '.', '/', '?', '"', ';', ':', '+',
    '«', '»', '‘', '[', ']', '{', '}', '=', '_', '\\', '|', '°', '′', '”', '″', '“', '’', 'ʻ', '·',
    '–', '—', '•', 'º', '„',
];

/// Separates the label from the phrase in a labeled example line.
const LABEL_SEPARATOR: char = '|';

/// A phrase to classify or learn from.
///
/// An example is a label (absent for unlabeled input) plus the phrase split into
/// lowercase word tokens. Examples are immutable once built; relabeling
/// produces a new example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    language: Option<Language>,
    words: Vec<String>,
}

/// Failure to parse a labeled example line.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseExampleError {
    #[display("unknown language label '{label}'")]
    UnknownLabel { label: String },
}

impl Example {
    /// Builds an example by tokenizing `text`.
    #[must_use]
    pub fn new(language: Option<Language>, text: &str) -> Self {
        Self {
            language,
            words: tokenize(text),
        }
    }

    #[must_use]
    pub fn labeled(language: Language, text: &str) -> Self {
        Self::new(Some(language), text)
    }

    #[must_use]
    pub fn unlabeled(text: &str) -> Self {
        Self::new(None, text)
    }

    /// Builds an example from words that are already tokenized.
    ///
    /// Empty words are dropped so the tokens satisfy the same invariant as
    /// [`Example::new`].
    #[must_use]
    pub fn from_words<I, S>(language: Option<Language>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words
            .into_iter()
            .map(Into::into)
            .filter(|word: &String| !word.is_empty())
            .collect();
        Self { language, words }
    }

    /// Parses one line of a labeled example file.
    ///
    /// The format is `Label|phrase`. A line without the separator is an
    /// unlabeled phrase.
    ///
    /// ```
    /// use polyglot_core::{Example, Language};
    ///
    /// let example = Example::parse_line("Dutch|De kat zit op de mat").unwrap();
    /// assert_eq!(example.language(), Some(Language::Dutch));
    /// assert_eq!(example.words().len(), 6);
    ///
    /// let example = Example::parse_line("no label here").unwrap();
    /// assert_eq!(example.language(), None);
    /// ```
    pub fn parse_line(line: &str) -> Result<Self, ParseExampleError> {
        let Some((label, text)) = line.split_once(LABEL_SEPARATOR) else {
            return Ok(Self::unlabeled(line));
        };
        let label = label.trim();
        let language = label
            .parse::<Language>()
            .map_err(|_| ParseExampleError::UnknownLabel {
                label: label.to_owned(),
            })?;
        Ok(Self::labeled(language, text))
    }

    #[must_use]
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns a copy of this example carrying a different label.
    #[must_use]
    pub fn relabeled(&self, language: Language) -> Self {
        Self {
            language: Some(language),
            words: self.words.clone(),
        }
    }
}

/// Splits text into lowercase words.
///
/// Words are separated by whitespace and by a fixed set of punctuation
/// characters; empty tokens are dropped.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || WORD_SEPARATORS.contains(&c))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_punctuation_and_empty_tokens() {
        let words = tokenize("  Hello, world!  «Bonjour»—le monde... ");
        assert_eq!(words, ["hello", "world", "bonjour", "le", "monde"]);
    }

    #[test]
    fn test_tokenize_keeps_letters_outside_ascii() {
        assert_eq!(tokenize("Þetta ER íslenska"), ["þetta", "er", "íslenska"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" ,.;: ").is_empty());
    }

    #[test]
    fn test_parse_line_with_label() {
        let example = Example::parse_line("Spanish|Hola, ¿qué tal?").unwrap();
        assert_eq!(example.language(), Some(Language::Spanish));
        assert_eq!(example.words(), ["hola", "¿qué", "tal"]);
    }

    #[test]
    fn test_parse_line_with_unknown_label() {
        let error = Example::parse_line("Klingon|nuqneH").unwrap_err();
        assert_eq!(
            error,
            ParseExampleError::UnknownLabel {
                label: "Klingon".to_owned()
            }
        );
    }

    #[test]
    fn test_relabeled_keeps_words() {
        let example = Example::labeled(Language::Danish, "hej med dig");
        let other = example.relabeled(Language::Other);
        assert_eq!(other.language(), Some(Language::Other));
        assert_eq!(other.words(), example.words());
    }

    #[test]
    fn test_from_words_drops_empty() {
        let example = Example::from_words(None, ["a", "", "b"]);
        assert_eq!(example.words(), ["a", "b"]);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let example = Example::labeled(Language::Italian, "ciao a tutti");
        let json = serde_json::to_string(&example).unwrap();
        let restored: Example = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, example);
    }
}
