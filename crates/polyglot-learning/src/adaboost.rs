//! Adaptive boosting over decision stumps.
//!
//! Each round trains a depth-1 [`DecisionTree`] on the current example
//! distribution, then shrinks the weight of the examples it got right by
//! `error / (1 - error)` so the next stump concentrates on the mistakes. The
//! stump votes with weight `log2((1 - error) / error)`.
//!
//! Two rounds end boosting early:
//!
//! - a stump with zero weighted error is kept with weight 1.0
//! - a stump no better than chance (error ≥ 0.5) would get a non-positive
//!   vote and leave the distribution unchanged; it is kept only when the
//!   ensemble would otherwise be empty
//!
//! Inference sums every stump's confidence vector scaled by its normalized
//! vote, so the ensemble reports a calibrated two-way confidence rather than a
//! bare label.

use polyglot_core::{Example, Language, LanguageDecision, WeightedList};
use serde::{Deserialize, Serialize};

use crate::{Attribute, Decider, DecisionTree, LearnError};

/// A boosted ensemble of decision stumps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adaboost {
    /// Stumps with votes normalized to sum to 1.0.
    stumps: WeightedList<Decider>,
}

impl Adaboost {
    /// Boosts up to `ensemble_size` stumps separating `language_a` from
    /// `language_b`.
    ///
    /// # Errors
    ///
    /// Fails if `ensemble_size` is zero, if the examples are empty or carry
    /// labels other than the two languages, or if the example weights cannot be
    /// renormalized.
    pub fn learn(
        examples: &WeightedList<&Example>,
        ensemble_size: usize,
        attributes: &[Attribute],
        language_a: Language,
        language_b: Language,
    ) -> Result<Self, LearnError> {
        if ensemble_size == 0 {
            return Err(LearnError::EmptyEnsemble);
        }
        if examples.is_empty() {
            return Err(LearnError::EmptyExamples);
        }

        let total_size = examples.len();
        let mut distribution = examples.clone();
        let mut stumps = WeightedList::new();

        for round in 0..ensemble_size {
            let stump = DecisionTree::learn(
                &distribution,
                1,
                attributes,
                total_size,
                language_a,
                language_b,
            )?;

            let correct = distribution
                .items()
                .map(|example| {
                    Some(stump.decide(example).most_confident_language()) == example.language()
                })
                .collect::<Vec<_>>();
            let error = distribution
                .iter()
                .zip(&correct)
                .filter(|(_, correct)| !**correct)
                .map(|((weight, _), _)| weight)
                .sum::<f64>();

            if error == 0.0 {
                tracing::debug!(%language_a, round, "stump fits the distribution exactly");
                stumps.add_weight(1.0, stump);
                break;
            }
            // A stump trained on this distribution never does worse than chance,
            // and at exactly 0.5 its vote would be zero.
            if error >= 0.5 {
                tracing::debug!(%language_a, round, error, "stump no better than chance");
                if stumps.is_empty() {
                    stumps.add_weight(1.0, stump);
                }
                break;
            }

            let reduction = error / (1.0 - error);
            for (i, correct) in correct.iter().enumerate() {
                if *correct {
                    distribution.set_weight(i, distribution.weight(i) * reduction);
                }
            }
            distribution = distribution.normalized()?;

            let vote = ((1.0 - error) / error).log2();
            tracing::debug!(%language_a, round, error, vote, "boosted stump");
            stumps.add_weight(vote, stump);
        }

        Ok(Self {
            stumps: stumps.normalized()?,
        })
    }

    /// Number of stumps in the ensemble.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stumps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stumps.is_empty()
    }

    /// Stumps with their normalized votes.
    #[must_use]
    pub fn stumps(&self) -> &WeightedList<Decider> {
        &self.stumps
    }

    #[must_use]
    pub fn decide(&self, example: &Example) -> LanguageDecision {
        let mut sum = LanguageDecision::zero();
        for (vote, stump) in self.stumps.iter() {
            sum.accumulate(&stump.decide(example), vote);
        }
        sum.normalized().unwrap_or(sum)
    }

    #[must_use]
    pub fn explain(&self) -> String {
        let stumps = self
            .stumps
            .iter()
            .map(|(vote, stump)| format!("Weight: {vote}, stump:\n{}", stump.explain(0)))
            .collect::<Vec<_>>()
            .join("\n\n");
        format!(
            "Adaboost on the following {} decision stumps:\n{stumps}",
            self.stumps.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::attribute::{AttributeContext, AttributeKind};

    use super::*;

    fn examples() -> Vec<Example> {
        let mut examples = Vec::new();
        for i in 0..8 {
            examples.push(Example::labeled(Language::Samoan, &format!("talofa w{i}")));
            examples.push(Example::labeled(Language::Other, &format!("hello w{i}")));
        }
        examples
    }

    fn attributes(examples: &[Example], kinds: Vec<AttributeKind>) -> Vec<Attribute> {
        let context = AttributeContext::new(examples, Language::Samoan, Language::Other);
        kinds.into_iter().map(|kind| context.evaluate(kind)).collect()
    }

    #[test]
    fn test_perfect_attribute_gives_one_stump() {
        let examples = examples();
        let attributes = attributes(
            &examples,
            vec![
                AttributeKind::ExactWord("talofa".to_owned()),
                AttributeKind::Prefix("w".to_owned()),
            ],
        );
        let weighted = WeightedList::uniform(examples.iter());
        let ensemble =
            Adaboost::learn(&weighted, 5, &attributes, Language::Samoan, Language::Other).unwrap();
        assert_eq!(ensemble.len(), 1);
        assert!((ensemble.stumps().weight(0) - 1.0).abs() < 1e-12);

        let decision = ensemble.decide(&Example::unlabeled("talofa lava"));
        assert_eq!(decision.most_confident_language(), Language::Samoan);
        assert!((decision.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_imperfect_attributes_build_weighted_ensemble() {
        // "a" marks most Samoan phrases, "b" catches the rest
        let examples = [
            Example::labeled(Language::Samoan, "a"),
            Example::labeled(Language::Samoan, "a"),
            Example::labeled(Language::Samoan, "b"),
            Example::labeled(Language::Other, "c"),
            Example::labeled(Language::Other, "c"),
            Example::labeled(Language::Other, "c"),
        ];
        let attributes = attributes(
            &examples,
            vec![
                AttributeKind::ExactWord("a".to_owned()),
                AttributeKind::ExactWord("b".to_owned()),
            ],
        );
        let weighted = WeightedList::uniform(examples.iter());
        let ensemble =
            Adaboost::learn(&weighted, 4, &attributes, Language::Samoan, Language::Other).unwrap();
        assert!(ensemble.len() >= 2);
        assert!((ensemble.stumps().total_weight() - 1.0).abs() < 1e-12);
        for example in &examples {
            let decision = ensemble.decide(example);
            assert!((decision.total() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_empty_ensemble_and_examples() {
        let examples = examples();
        let weighted = WeightedList::uniform(examples.iter());
        assert_eq!(
            Adaboost::learn(&weighted, 0, &[], Language::Samoan, Language::Other),
            Err(LearnError::EmptyEnsemble)
        );
        assert_eq!(
            Adaboost::learn(
                &WeightedList::new(),
                3,
                &[],
                Language::Samoan,
                Language::Other
            ),
            Err(LearnError::EmptyExamples)
        );
    }

    #[test]
    fn test_no_attributes_keeps_single_chance_stump() {
        let examples = examples();
        let weighted = WeightedList::uniform(examples.iter());
        let ensemble =
            Adaboost::learn(&weighted, 3, &[], Language::Samoan, Language::Other).unwrap();
        assert_eq!(ensemble.len(), 1);
    }

    #[test]
    fn test_explain_lists_stumps() {
        let examples = examples();
        let attributes = attributes(&examples, vec![AttributeKind::ExactWord("talofa".to_owned())]);
        let weighted = WeightedList::uniform(examples.iter());
        let ensemble =
            Adaboost::learn(&weighted, 2, &attributes, Language::Samoan, Language::Other).unwrap();
        let text = ensemble.explain();
        assert!(text.starts_with("Adaboost on the following 1 decision stumps:\nWeight: 1, stump:\nif a word is 'talofa' then:"));
    }
}
