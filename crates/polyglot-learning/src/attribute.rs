//! Boolean text features used as decision tree splits.
//!
//! An [`Attribute`] is a predicate over an [`Example`] together with a cached
//! fitness score. Five families exist (see [`AttributeKind`]):
//!
//! - **Letter frequency** - the phrase has more of one character than another
//! - **Exact word** - some word equals a given word
//! - **Contains** - some word contains a substring
//! - **Prefix** - some word starts with a substring
//! - **Suffix** - some word ends with a substring
//!
//! # Fitness
//!
//! Fitness is the accuracy of the best one-level decision stump that splits on
//! the attribute alone. The examples are partitioned into four buckets by
//! (predicate true/false) × (language A / anything else):
//!
//! ```text
//! fitness = (max(true_a, true_b) + max(false_a, false_b)) / total
//! ```
//!
//! It is computed once, when the attribute is created, against the example set
//! held by an [`AttributeContext`]. Attributes are immutable: mutation returns a
//! new attribute with its own fitness.
//!
//! # Ordering
//!
//! Attributes order by fitness, then by name. Names are unique per predicate,
//! so two attributes compare equal only when they test the same thing.

use std::{cmp::Ordering, fmt};

use polyglot_core::{Example, Language};
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

/// The predicate an attribute tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeKind {
    /// The phrase contains more `more` characters than `less` characters.
    LetterFrequency { more: char, less: char },
    /// Some word equals this word.
    ExactWord(String),
    /// Some word contains this text.
    Contains(String),
    /// Some word starts with this text.
    Prefix(String),
    /// Some word ends with this text.
    Suffix(String),
}

impl AttributeKind {
    /// The unmutated starting point of each attribute family.
    ///
    /// These are never useful splits themselves; genetic search mutates them
    /// to seed its pool.
    #[must_use]
    pub fn blank_seeds() -> [Self; 5] {
        [
            Self::ExactWord("a".to_owned()),
            Self::LetterFrequency {
                more: 'a',
                less: 'z',
            },
            Self::Suffix(String::new()),
            Self::Prefix(String::new()),
            Self::Contains(String::new()),
        ]
    }

    /// Returns `true` if the predicate holds for `example`.
    #[must_use]
    pub fn has(&self, example: &Example) -> bool {
        let mut words = example.words().iter();
        match self {
            Self::LetterFrequency { more, less } => {
                let (mut more_count, mut less_count) = (0_usize, 0_usize);
                for c in words.flat_map(|word| word.chars()) {
                    if c == *more {
                        more_count += 1;
                    }
                    if c == *less {
                        less_count += 1;
                    }
                }
                more_count > less_count
            }
            Self::ExactWord(word) => words.any(|w| w == word),
            Self::Contains(text) => words.any(|w| w.contains(text.as_str())),
            Self::Prefix(text) => words.any(|w| w.starts_with(text.as_str())),
            Self::Suffix(text) => words.any(|w| w.ends_with(text.as_str())),
        }
    }

    /// Proposes a structurally adjacent predicate.
    ///
    /// Returns `None` when no candidate word supports a change; the caller then
    /// keeps the unmutated attribute.
    fn mutate<R>(&self, words: &[&str], rng: &mut R) -> Option<Self>
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::LetterFrequency { more, less } => {
                let word = words.choose(rng)?;
                let letters = word.chars().collect::<Vec<_>>();
                let letter = *letters.choose(rng)?;
                if rng.random_bool(0.5) {
                    Some(Self::LetterFrequency {
                        more: *more,
                        less: letter,
                    })
                } else {
                    Some(Self::LetterFrequency {
                        more: letter,
                        less: *less,
                    })
                }
            }
            Self::ExactWord(_) => {
                let word = words.choose(rng)?;
                Some(Self::ExactWord((*word).to_owned()))
            }
            Self::Contains(text) => mutate_contains(text, words, rng),
            Self::Prefix(text) => mutate_prefix(text, words, rng),
            Self::Suffix(text) => mutate_suffix(text, words, rng),
        }
    }
}

/// Shrinking happens a quarter of the time: two fair coin flips must agree.
fn should_shrink<R>(text: &str, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    rng.random_bool(0.5) && rng.random_bool(0.5) && !text.is_empty()
}

fn without_first_char(text: &str) -> String {
    let mut chars = text.chars();
    chars.next();
    chars.as_str().to_owned()
}

fn without_last_char(text: &str) -> String {
    let mut chars = text.chars();
    chars.next_back();
    chars.as_str().to_owned()
}

fn pick_word_with<'w, R, P>(words: &[&'w str], rng: &mut R, predicate: P) -> Option<&'w str>
where
    R: Rng + ?Sized,
    P: Fn(&str) -> bool,
{
    let candidates = words
        .iter()
        .copied()
        .filter(|&word| predicate(word))
        .collect::<Vec<_>>();
    candidates.choose(rng).copied()
}

fn mutate_contains<R>(text: &str, words: &[&str], rng: &mut R) -> Option<AttributeKind>
where
    R: Rng + ?Sized,
{
    let base = if should_shrink(text, rng) {
        if rng.random_bool(0.5) {
            without_first_char(text)
        } else {
            without_last_char(text)
        }
    } else {
        text.to_owned()
    };

    let word = pick_word_with(words, rng, |w| w.contains(base.as_str()))?;
    let start = word.find(base.as_str())?;
    if rng.random_bool(0.5) {
        let c = word[..start].chars().next_back()?;
        Some(AttributeKind::Contains(format!("{c}{base}")))
    } else {
        let c = word[start + base.len()..].chars().next()?;
        Some(AttributeKind::Contains(format!("{base}{c}")))
    }
}

fn mutate_prefix<R>(text: &str, words: &[&str], rng: &mut R) -> Option<AttributeKind>
where
    R: Rng + ?Sized,
{
    let base = if should_shrink(text, rng) {
        without_last_char(text)
    } else {
        text.to_owned()
    };

    let word = pick_word_with(words, rng, |w| w.starts_with(base.as_str()))?;
    let rest = &word[base.len()..];
    // the grown prefix must leave at least one character of the word uncovered
    if rest.chars().count() > 1 {
        let c = rest.chars().next()?;
        Some(AttributeKind::Prefix(format!("{base}{c}")))
    } else {
        None
    }
}

fn mutate_suffix<R>(text: &str, words: &[&str], rng: &mut R) -> Option<AttributeKind>
where
    R: Rng + ?Sized,
{
    let base = if should_shrink(text, rng) {
        without_first_char(text)
    } else {
        text.to_owned()
    };

    let word = pick_word_with(words, rng, |w| w.ends_with(base.as_str()))?;
    let rest = &word[..word.len() - base.len()];
    // the grown suffix must leave at least one character of the word uncovered
    if rest.chars().count() > 1 {
        let c = rest.chars().next_back()?;
        Some(AttributeKind::Suffix(format!("{c}{base}")))
    } else {
        None
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LetterFrequency { more, less } => {
                write!(f, "words have more '{more}' than '{less}'")
            }
            Self::ExactWord(word) => write!(f, "a word is '{word}'"),
            Self::Contains(text) => write!(f, "a word contains '{text}'"),
            Self::Prefix(text) => write!(f, "a word starts with '{text}'"),
            Self::Suffix(text) => write!(f, "a word ends with '{text}'"),
        }
    }
}

/// The reference data attributes are scored and mutated against.
///
/// Holds a two-language example set and every word occurring in it. Every
/// example is expected to be labeled `language_a` or `language_b`; anything
/// that is not `language_a` counts as `language_b` for fitness.
#[derive(Debug, Clone)]
pub struct AttributeContext<'a> {
    examples: &'a [Example],
    words: Vec<&'a str>,
    language_a: Language,
    language_b: Language,
}

impl<'a> AttributeContext<'a> {
    #[must_use]
    pub fn new(examples: &'a [Example], language_a: Language, language_b: Language) -> Self {
        let words = examples
            .iter()
            .flat_map(|example| example.words().iter().map(String::as_str))
            .collect();
        Self {
            examples,
            words,
            language_a,
            language_b,
        }
    }

    #[must_use]
    pub fn examples(&self) -> &'a [Example] {
        self.examples
    }

    /// Every word of every example, duplicates included.
    ///
    /// Frequent words are proportionally more likely to be drawn by mutation.
    #[must_use]
    pub fn words(&self) -> &[&'a str] {
        &self.words
    }

    #[must_use]
    pub fn language_a(&self) -> Language {
        self.language_a
    }

    #[must_use]
    pub fn language_b(&self) -> Language {
        self.language_b
    }

    /// Creates an attribute, computing its fitness on this context.
    #[must_use]
    pub fn evaluate(&self, kind: AttributeKind) -> Attribute {
        let fitness = fitness(&kind, self.examples, self.language_a);
        Attribute { kind, fitness }
    }
}

/// Accuracy of the best one-level stump splitting on `kind`.
///
/// Returns a value in \[0.0, 1.0\]; an empty example set scores 0.0.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn fitness(kind: &AttributeKind, examples: &[Example], language_a: Language) -> f64 {
    if examples.is_empty() {
        return 0.0;
    }

    let (mut true_a, mut true_b, mut false_a, mut false_b) = (0_usize, 0_usize, 0_usize, 0_usize);
    for example in examples {
        let is_a = example.language() == Some(language_a);
        match (kind.has(example), is_a) {
            (true, true) => true_a += 1,
            (true, false) => true_b += 1,
            (false, true) => false_a += 1,
            (false, false) => false_b += 1,
        }
    }

    let correct = true_a.max(true_b) + false_a.max(false_b);
    correct as f64 / examples.len() as f64
}

/// A predicate with its cached fitness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    kind: AttributeKind,
    fitness: f64,
}

impl Attribute {
    #[must_use]
    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    /// Fitness on the context this attribute was created from.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn has(&self, example: &Example) -> bool {
        self.kind.has(example)
    }

    /// Human-readable name, unique per predicate.
    #[must_use]
    pub fn name(&self) -> String {
        self.kind.to_string()
    }

    /// Returns a randomly mutated copy of this attribute.
    ///
    /// Mutation never fails: when no word supports a change the result is an
    /// unmodified clone.
    #[must_use]
    pub fn mutate<R>(&self, context: &AttributeContext<'_>, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        match self.kind.mutate(context.words(), rng) {
            Some(kind) => context.evaluate(kind),
            None => self.clone(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Attribute {}

impl PartialOrd for Attribute {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Attribute {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fitness
            .total_cmp(&other.fitness)
            .then_with(|| self.name().cmp(&other.name()))
    }
}
