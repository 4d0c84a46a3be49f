//! Trained classifiers.
//!
//! Every trained artifact is a [`Decider`]: a closed set of variants that map an
//! [`Example`] to a [`LanguageDecision`] and can describe their own logic.
//! Deciders are immutable once learned and are safe to share between threads.

use polyglot_core::{Example, LanguageDecision};
use serde::{Deserialize, Serialize};

use crate::{Adaboost, DecisionTree, LearnError, MultiClassifier};

pub use self::{absolute::*, confidence::*};

mod absolute;
mod confidence;

/// A trained classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(rename_all = "snake_case")]
pub enum Decider {
    /// Always answers one language with full confidence.
    Absolute(AbsoluteDecider),
    /// Splits confidence between two languages.
    Confidence(ConfidenceDecider),
    /// Binary decision tree.
    Tree(DecisionTree),
    /// Boosted ensemble of decision stumps.
    Boosted(Adaboost),
    /// One binary classifier per language, fused into one distribution.
    MultiClass(MultiClassifier),
}

impl Decider {
    /// Returns the confidence assigned to each language for `example`.
    #[must_use]
    pub fn decide(&self, example: &Example) -> LanguageDecision {
        match self {
            Self::Absolute(decider) => decider.decide(),
            Self::Confidence(decider) => decider.decide(),
            Self::Tree(tree) => tree.decide(example),
            Self::Boosted(ensemble) => ensemble.decide(example),
            Self::MultiClass(classifier) => classifier.decide(example),
        }
    }

    /// Renders the decision logic as indented text.
    ///
    /// `indent` is the column nested blocks are aligned to; the first line is
    /// never indented.
    #[must_use]
    pub fn explain(&self, indent: usize) -> String {
        match self {
            Self::Absolute(decider) => decider.explain(),
            Self::Confidence(decider) => decider.explain(),
            Self::Tree(tree) => tree.explain(indent),
            Self::Boosted(ensemble) => ensemble.explain(),
            Self::MultiClass(classifier) => classifier.explain(indent),
        }
    }

    /// Fraction of `examples` whose most confident language differs from the
    /// label. Every example counts the same.
    ///
    /// Unlabeled examples always count as errors.
    #[expect(clippy::cast_precision_loss)]
    pub fn error_rate(&self, examples: &[Example]) -> Result<f64, LearnError> {
        if examples.is_empty() {
            return Err(LearnError::EmptyExamples);
        }
        let wrong = examples
            .iter()
            .filter(|example| {
                Some(self.decide(example).most_confident_language()) != example.language()
            })
            .count();
        Ok(wrong as f64 / examples.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use polyglot_core::Language;

    use super::*;

    #[test]
    fn test_error_rate() {
        let decider = Decider::from(AbsoluteDecider::for_language(Language::French));
        let examples = [
            Example::labeled(Language::French, "bonjour"),
            Example::labeled(Language::French, "merci"),
            Example::labeled(Language::Italian, "grazie"),
            Example::unlabeled("ciao"),
        ];
        assert!((decider.error_rate(&examples).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_error_rate_empty() {
        let decider = Decider::from(AbsoluteDecider::for_language(Language::French));
        assert_eq!(decider.error_rate(&[]), Err(LearnError::EmptyExamples));
    }

    #[test]
    fn test_leaf_explanations() {
        let absolute = Decider::from(AbsoluteDecider::for_language(Language::Czech));
        assert_eq!(absolute.explain(4), "return Czech, 1.0 confidence");

        let confidence =
            Decider::from(ConfidenceDecider::new(Language::Czech, Language::Other, 0.25).unwrap());
        assert_eq!(
            confidence.explain(0),
            "return Czech with 0.25, Other with 0.75"
        );
    }
}
