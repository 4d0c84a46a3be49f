//! Binary decision trees over weighted examples.
//!
//! Trees are grown greedily. At each node the candidate attribute with the
//! lowest weighted split cost is chosen:
//!
//! ```text
//! cost = |true| / N · H(true) + |false| / N · H(false)
//! ```
//!
//! where `N` is the size of the whole training set (not just the node's share)
//! and `H` is the binary [`entropy`] of the weighted fraction of language A in
//! a subset.
//!
//! Leaves are either [`AbsoluteDecider`]s, for nodes that hold one language
//! only, or [`ConfidenceDecider`]s carrying the weighted fraction of language A
//! once the depth budget or the attributes run out. A split that sends every
//! example to one side does not consume depth.
//!
//! Learning is deterministic: the same examples, depth and candidates always
//! produce the same tree.

use polyglot_core::{Example, Language, LanguageDecision, WeightedList};
use serde::{Deserialize, Serialize};

use crate::{AbsoluteDecider, Attribute, ConfidenceDecider, Decider, LearnError};

/// An internal tree node.
///
/// Each node owns its split attribute and both subtrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    split_on: Attribute,
    when_true: Box<Decider>,
    when_false: Box<Decider>,
}

impl DecisionTree {
    #[must_use]
    pub fn split_on(&self) -> &Attribute {
        &self.split_on
    }

    #[must_use]
    pub fn decide(&self, example: &Example) -> LanguageDecision {
        if self.split_on.has(example) {
            self.when_true.decide(example)
        } else {
            self.when_false.decide(example)
        }
    }

    #[must_use]
    pub fn explain(&self, indent: usize) -> String {
        let inner = indent + 2;
        format!(
            "if {} then:\n{:inner$}{}\n{:indent$}else:\n{:inner$}{}",
            self.split_on,
            "",
            self.when_true.explain(inner),
            "",
            "",
            self.when_false.explain(inner),
        )
    }

    /// Learns a binary classifier separating `language_a` from `language_b`.
    ///
    /// `total_size` is the size of the complete training set the examples were
    /// drawn from; split costs are scaled by it. `depth` counts the levels of
    /// splits allowed below this node.
    ///
    /// # Errors
    ///
    /// Fails on an empty example set, on an example labeled with neither
    /// language, or when a leaf would be built from zero total weight.
    pub fn learn(
        examples: &WeightedList<&Example>,
        depth: usize,
        candidates: &[Attribute],
        total_size: usize,
        language_a: Language,
        language_b: Language,
    ) -> Result<Decider, LearnError> {
        if examples.is_empty() {
            return Err(LearnError::EmptyExamples);
        }
        for example in examples.items() {
            match example.language() {
                None => return Err(LearnError::UnlabeledExample),
                Some(found) if found != language_a && found != language_b => {
                    return Err(LearnError::UnexpectedLabel {
                        found,
                        language_a,
                        language_b,
                    });
                }
                Some(_) => {}
            }
        }

        let candidates = candidates.iter().collect::<Vec<_>>();
        let learner = TreeLearner {
            total_size,
            language_a,
            language_b,
        };
        learner.learn_node(examples, depth, &candidates)
    }
}

/// Fixed inputs shared by every node of one tree.
struct TreeLearner {
    total_size: usize,
    language_a: Language,
    language_b: Language,
}

impl TreeLearner {
    fn is_a(&self, example: &Example) -> bool {
        example.language() == Some(self.language_a)
    }

    fn learn_node(
        &self,
        examples: &WeightedList<&Example>,
        depth: usize,
        candidates: &[&Attribute],
    ) -> Result<Decider, LearnError> {
        let count_a = examples.items().filter(|example| self.is_a(example)).count();
        if count_a == examples.len() {
            return Ok(AbsoluteDecider::for_language(self.language_a).into());
        }
        if count_a == 0 {
            return Ok(AbsoluteDecider::for_language(self.language_b).into());
        }

        if depth == 0 {
            return self.confidence_leaf(examples);
        }

        let best = candidates
            .iter()
            .copied()
            .map(|attribute| (attribute, self.split_cost(attribute, examples)))
            .min_by(|(x, x_cost), (y, y_cost)| x_cost.total_cmp(y_cost).then_with(|| y.cmp(x)))
            .map(|(attribute, _)| attribute);
        let Some(best) = best else {
            // attributes exhausted before depth
            return self.confidence_leaf(examples);
        };

        let when_true = examples.values_with(|example| best.has(example));
        let when_false = examples.values_with(|example| !best.has(example));
        let remaining = candidates
            .iter()
            .copied()
            .filter(|attribute| *attribute != best)
            .collect::<Vec<_>>();

        if when_true.is_empty() {
            return self.learn_node(&when_false, depth, &remaining);
        }
        if when_false.is_empty() {
            return self.learn_node(&when_true, depth, &remaining);
        }

        let when_true = self.learn_node(&when_true, depth - 1, &remaining)?;
        let when_false = self.learn_node(&when_false, depth - 1, &remaining)?;
        Ok(DecisionTree {
            split_on: best.clone(),
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
        }
        .into())
    }

    fn confidence_leaf(&self, examples: &WeightedList<&Example>) -> Result<Decider, LearnError> {
        let weight_a = examples
            .iter()
            .filter(|(_, example)| self.is_a(example))
            .map(|(weight, _)| weight)
            .sum::<f64>();
        let fraction_a = weight_a / examples.total_weight();
        Ok(ConfidenceDecider::new(self.language_a, self.language_b, fraction_a)?.into())
    }

    #[expect(clippy::cast_precision_loss)]
    fn split_cost(&self, attribute: &Attribute, examples: &WeightedList<&Example>) -> f64 {
        let mut true_side = Side::default();
        let mut false_side = Side::default();
        for (weight, example) in examples.iter() {
            let side = if attribute.has(example) {
                &mut true_side
            } else {
                &mut false_side
            };
            side.count += 1;
            side.weight += weight;
            if self.is_a(example) {
                side.weight_a += weight;
            }
        }

        let total_size = self.total_size as f64;
        true_side.count as f64 / total_size * true_side.entropy()
            + false_side.count as f64 / total_size * false_side.entropy()
    }
}

/// Tally of one side of a candidate split.
#[derive(Debug, Default)]
struct Side {
    count: usize,
    weight: f64,
    weight_a: f64,
}

impl Side {
    fn entropy(&self) -> f64 {
        if self.count == 0 || self.weight <= 0.0 {
            return 0.0;
        }
        entropy(self.weight_a / self.weight)
    }
}

/// Binary entropy in bits of an event with probability `p`.
///
/// Defined as 0.0 at `p == 0.0` and `p == 1.0`.
///
/// ```
/// use polyglot_learning::entropy;
///
/// assert_eq!(entropy(0.0), 0.0);
/// assert_eq!(entropy(0.5), 1.0);
/// ```
#[must_use]
pub fn entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    let q = 1.0 - p;
    -(p * p.log2() + q * q.log2())
}
