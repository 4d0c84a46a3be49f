use std::fmt;

use crate::Language;

/// Confidence assigned to every language by a classifier.
///
/// Confidences need not sum to 1.0 unless the decision was explicitly
/// [normalized](LanguageDecision::normalized).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageDecision {
    confidences: [f64; Language::LEN],
}

/// Fully confident decisions, one per language.
static CERTAIN_DECISIONS: [LanguageDecision; Language::LEN] = certain_decisions();

const fn certain_decisions() -> [LanguageDecision; Language::LEN] {
    let mut decisions = [LanguageDecision::zero(); Language::LEN];
    let mut i = 0;
    while i < Language::LEN {
        decisions[i].confidences[i] = 1.0;
        i += 1;
    }
    decisions
}

impl Default for LanguageDecision {
    fn default() -> Self {
        Self::zero()
    }
}

impl LanguageDecision {
    /// A decision with zero confidence for every language.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            confidences: [0.0; Language::LEN],
        }
    }

    /// Full confidence in `language`, zero for every other language.
    #[must_use]
    pub fn certain(language: Language) -> Self {
        CERTAIN_DECISIONS[language.index()]
    }

    /// Splits confidence between two languages.
    ///
    /// `fraction_a` goes to `language_a` and the remainder to `language_b`.
    #[must_use]
    pub fn binary(language_a: Language, language_b: Language, fraction_a: f64) -> Self {
        let mut decision = Self::zero();
        decision.confidences[language_a.index()] += fraction_a;
        decision.confidences[language_b.index()] += 1.0 - fraction_a;
        decision
    }

    #[must_use]
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Language) -> f64,
    {
        let mut decision = Self::zero();
        for language in Language::ALL {
            decision.confidences[language.index()] = f(language);
        }
        decision
    }

    #[must_use]
    pub fn confidence(&self, language: Language) -> f64 {
        self.confidences[language.index()]
    }

    /// Iterates over `(language, confidence)` in declaration order.
    pub fn confidences(&self) -> impl Iterator<Item = (Language, f64)> + '_ {
        Language::ALL
            .into_iter()
            .map(|language| (language, self.confidence(language)))
    }

    /// Sum of all confidences.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.confidences.iter().sum()
    }

    /// The language with the highest confidence.
    ///
    /// Ties go to the language declared first.
    #[must_use]
    pub fn most_confident_language(&self) -> Language {
        let mut best = Language::ALL[0];
        for (language, confidence) in self.confidences() {
            if confidence > self.confidence(best) {
                best = language;
            }
        }
        best
    }

    /// Adds `scale * other` to this decision, language by language.
    pub fn accumulate(&mut self, other: &Self, scale: f64) {
        for (sum, value) in self.confidences.iter_mut().zip(other.confidences) {
            *sum += scale * value;
        }
    }

    /// Returns a copy with the confidence for `language` replaced.
    #[must_use]
    pub fn with_confidence(mut self, language: Language, confidence: f64) -> Self {
        self.confidences[language.index()] = confidence;
        self
    }

    /// Scales confidences to sum to 1.0.
    ///
    /// Returns `None` if the total is zero, negative, or not finite.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let total = self.total();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        Some(Self {
            confidences: self.confidences.map(|c| c / total),
        })
    }
}

impl fmt::Display for LanguageDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ranked = self.confidences().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        write!(
            f,
            "Decision: {} with probabilities:",
            self.most_confident_language()
        )?;
        for (language, confidence) in ranked {
            write!(f, " {language}={:.1}%", confidence * 100.0)?;
        }
        Ok(())
    }
}
