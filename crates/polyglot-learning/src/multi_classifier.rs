//! One-vs-rest classification over every language.
//!
//! Training builds one binary problem per learnable language: all examples of
//! that language, plus an equally sized random sample of every other example
//! relabeled [`Language::Other`]. Each problem gets its own attribute pool from
//! genetic search and its own [`DecisionTree`] or [`Adaboost`] decider.
//!
//! The per-language problems share nothing mutable, so they are trained on a
//! pool of worker threads. Each problem draws its randomness from a child
//! generator seeded from the caller's generator before any work starts, which
//! keeps results independent of thread scheduling.
//!
//! Inference sums the confidence vectors of every binary decider, discards the
//! accumulated [`Language::Other`] votes and renormalizes what remains.

use std::{
    fmt,
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
    thread,
};

use polyglot_core::{Example, Language, LanguageDecision, WeightedList};
use rand::{Rng, SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::{Adaboost, Decider, DecisionTree, LearnError, TrainingParams, genetic};

/// How each per-language binary classifier is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum TrainingMethod {
    /// A single decision tree of at most `depth` levels.
    DecisionTree { depth: usize },
    /// An Adaboost ensemble of at most `ensemble_size` stumps.
    AdaBoost { ensemble_size: usize },
}

impl Default for TrainingMethod {
    fn default() -> Self {
        Self::DecisionTree { depth: 6 }
    }
}

impl fmt::Display for TrainingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecisionTree { .. } => f.write_str("DECISION_TREE"),
            Self::AdaBoost { .. } => f.write_str("ADAPTIVE_BOOSTING_TREE"),
        }
    }
}

/// The binary decider trained for one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDecider {
    pub language: Language,
    pub decider: Decider,
}

/// A multi-class classifier fusing one binary decider per language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiClassifier {
    deciders: Vec<LanguageDecider>,
    description: String,
}

/// Outcome of one per-language training task.
struct BinaryOutcome {
    decider: Decider,
    training_accuracy: f64,
}

impl MultiClassifier {
    /// Trains one binary decider per language found in `examples`.
    ///
    /// Languages without any example are skipped.
    ///
    /// # Errors
    ///
    /// Fails if `examples` is empty or contains an unlabeled example, or if
    /// any binary problem fails to train.
    pub fn learn<R>(
        examples: &[Example],
        method: TrainingMethod,
        params: &TrainingParams,
        rng: &mut R,
    ) -> Result<Self, LearnError>
    where
        R: Rng + ?Sized,
    {
        if examples.is_empty() {
            return Err(LearnError::EmptyExamples);
        }
        if examples.iter().any(|example| example.language().is_none()) {
            return Err(LearnError::UnlabeledExample);
        }

        let description = describe(examples.len(), method, params);

        // seeds are drawn for every language, trained or not, so adding
        // examples for one language leaves the others' seeds unchanged
        let mut tasks = Vec::new();
        for language in Language::learnable() {
            let seed = rng.random::<u64>();
            if examples.iter().any(|example| example.language() == Some(language)) {
                tasks.push((language, seed));
            } else {
                tracing::warn!(%language, "no training examples, skipping language");
            }
        }

        let outcomes = run_parallel(&tasks, |&(language, seed)| {
            train_binary(examples, language, method, params, seed)
        });

        let mut deciders = Vec::with_capacity(tasks.len());
        for (&(language, _), outcome) in tasks.iter().zip(outcomes) {
            let outcome = outcome?;
            tracing::info!(
                %language,
                accuracy = outcome.training_accuracy * 100.0,
                "binary classifier training accuracy ({language} vs {})",
                Language::Other,
            );
            deciders.push(LanguageDecider {
                language,
                decider: outcome.decider,
            });
        }

        Ok(Self {
            deciders,
            description,
        })
    }

    /// Human-readable summary of the training run.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn deciders(&self) -> &[LanguageDecider] {
        &self.deciders
    }

    /// Sums every binary decision, drops [`Language::Other`] and renormalizes.
    ///
    /// If no decider gives any confidence to a real language, the decision is
    /// spread evenly over the trained languages.
    #[must_use]
    pub fn decide(&self, example: &Example) -> LanguageDecision {
        let mut sum = LanguageDecision::zero();
        for LanguageDecider { decider, .. } in &self.deciders {
            sum.accumulate(&decider.decide(example), 1.0);
        }
        sum.with_confidence(Language::Other, 0.0)
            .normalized()
            .unwrap_or_else(|| self.uniform_decision())
    }

    fn uniform_decision(&self) -> LanguageDecision {
        let trained = LanguageDecision::from_fn(|language| {
            if self.deciders.iter().any(|decider| decider.language == language) {
                1.0
            } else {
                0.0
            }
        });
        trained.normalized().unwrap_or_default()
    }

    #[must_use]
    pub fn explain(&self, indent: usize) -> String {
        let mut text = String::from("Learn using the following deciders:");
        for LanguageDecider { language, decider } in &self.deciders {
            text.push_str(&format!(
                "\n{:indent$}{language} vs {}: {}",
                "",
                Language::Other,
                decider.explain(indent)
            ));
        }
        text
    }
}

fn describe(total: usize, method: TrainingMethod, params: &TrainingParams) -> String {
    let mut description = format!(
        "Model using {total} total phrases, method={method}, attributeGenerations={}, attributePoolSize={}",
        params.generations, params.pool_size
    );
    match method {
        TrainingMethod::DecisionTree { depth } => {
            description.push_str(&format!(", treeDepth={depth}"));
        }
        TrainingMethod::AdaBoost { ensemble_size } => {
            description.push_str(&format!(", ensembleSize={ensemble_size}"));
        }
    }
    description
}

/// Builds the balanced `language` vs [`Language::Other`] problem and trains it.
fn train_binary(
    examples: &[Example],
    language: Language,
    method: TrainingMethod,
    params: &TrainingParams,
    seed: u64,
) -> Result<BinaryOutcome, LearnError> {
    let mut rng = Pcg64::seed_from_u64(seed);

    let mut problem = examples
        .iter()
        .filter(|example| example.language() == Some(language))
        .cloned()
        .collect::<Vec<_>>();
    let mut others = examples
        .iter()
        .filter(|example| example.language() != Some(language))
        .map(|example| example.relabeled(Language::Other))
        .collect::<Vec<_>>();
    others.shuffle(&mut rng);
    others.truncate(problem.len());
    problem.extend(others);

    let attributes =
        genetic::learn_attributes(&problem, language, Language::Other, params, &mut rng);
    let weighted = WeightedList::uniform(problem.iter());
    let decider = match method {
        TrainingMethod::DecisionTree { depth } => DecisionTree::learn(
            &weighted,
            depth,
            &attributes,
            problem.len(),
            language,
            Language::Other,
        )?,
        TrainingMethod::AdaBoost { ensemble_size } => Adaboost::learn(
            &weighted,
            ensemble_size,
            &attributes,
            language,
            Language::Other,
        )?
        .into(),
    };

    let training_accuracy = 1.0 - decider.error_rate(&problem)?;
    Ok(BinaryOutcome {
        decider,
        training_accuracy,
    })
}

/// Runs `f` on every task using a pool sized to the available cores.
///
/// Results are returned in task order.
fn run_parallel<T, U, F>(tasks: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync,
{
    let workers = thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(tasks.len());
    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel();

    thread::scope(|s| {
        for _ in 0..workers {
            let tx = tx.clone();
            let (next, f) = (&next, &f);
            s.spawn(move || {
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(task) = tasks.get(index) else {
                        break;
                    };
                    if tx.send((index, f(task))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(tx);

    let mut results = rx.into_iter().collect::<Vec<_>>();
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three vocabularies over disjoint alphabets, each sharing a marker word.
    fn separable_examples() -> Vec<Example> {
        let phrases = [
            (
                Language::English,
                [
                    "ace bad cab",
                    "ace fed dab",
                    "ace beef",
                    "ace had egg",
                    "ace deaf cafe",
                    "ace bagged",
                ],
            ),
            (
                Language::Hawaiian,
                [
                    "kino lilo",
                    "kino pono",
                    "kino mili",
                    "kino ono pili",
                    "kino limp",
                    "kino moon",
                ],
            ),
            (
                Language::Icelandic,
                [
                    "þurs stuv",
                    "þurs tryst",
                    "þurs wyrt",
                    "þurs zur",
                    "þurs rust",
                    "þurs vyx",
                ],
            ),
        ];
        phrases
            .iter()
            .flat_map(|(language, texts)| {
                texts.iter().map(|text| Example::labeled(*language, text))
            })
            .collect()
    }

    fn train(seed: u64, method: TrainingMethod) -> MultiClassifier {
        let mut rng = Pcg64::seed_from_u64(seed);
        MultiClassifier::learn(
            &separable_examples(),
            method,
            &TrainingParams::default(),
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn test_separable_languages_train_perfectly() {
        let examples = separable_examples();
        let classifier = Decider::from(train(1, TrainingMethod::DecisionTree { depth: 6 }));
        assert_eq!(classifier.error_rate(&examples), Ok(0.0));
    }

    #[test]
    fn test_separable_languages_with_adaboost() {
        let examples = separable_examples();
        let classifier = Decider::from(train(2, TrainingMethod::AdaBoost { ensemble_size: 6 }));
        assert_eq!(classifier.error_rate(&examples), Ok(0.0));
    }

    #[test]
    fn test_only_present_languages_are_trained() {
        let classifier = train(3, TrainingMethod::DecisionTree { depth: 2 });
        let languages = classifier
            .deciders()
            .iter()
            .map(|decider| decider.language)
            .collect::<Vec<_>>();
        assert_eq!(
            languages,
            [Language::English, Language::Hawaiian, Language::Icelandic]
        );
    }

    #[test]
    fn test_decisions_sum_to_one_without_other() {
        let classifier = train(4, TrainingMethod::DecisionTree { depth: 6 });
        for text in ["ace cab", "kino", "þurs", "qqq jjj"] {
            let decision = classifier.decide(&Example::unlabeled(text));
            assert_eq!(decision.confidence(Language::Other), 0.0);
            assert!((decision.total() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unrecognized_phrase_spreads_over_trained_languages() {
        let trained = [Language::English, Language::Hawaiian, Language::Icelandic];
        for seed in 0..5 {
            let classifier = train(seed, TrainingMethod::DecisionTree { depth: 6 });
            for text in ["qqq jjj", ""] {
                let decision = classifier.decide(&Example::unlabeled(text));
                assert!((decision.total() - 1.0).abs() < 1e-9);
                assert_eq!(decision.confidence(Language::Other), 0.0);
                assert!(trained.contains(&decision.most_confident_language()));
                for language in Language::ALL {
                    if !trained.contains(&language) {
                        assert_eq!(decision.confidence(language), 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_model() {
        let a = train(5, TrainingMethod::DecisionTree { depth: 3 });
        let b = train(5, TrainingMethod::DecisionTree { depth: 3 });
        assert_eq!(a, b);
    }

    #[test]
    fn test_description() {
        let classifier = train(6, TrainingMethod::AdaBoost { ensemble_size: 4 });
        assert_eq!(
            classifier.description(),
            "Model using 18 total phrases, method=ADAPTIVE_BOOSTING_TREE, attributeGenerations=50, attributePoolSize=12, ensembleSize=4"
        );
    }

    #[test]
    fn test_rejects_invalid_input() {
        let mut rng = Pcg64::seed_from_u64(0);
        let params = TrainingParams::default();
        assert_eq!(
            MultiClassifier::learn(&[], TrainingMethod::default(), &params, &mut rng),
            Err(LearnError::EmptyExamples)
        );
        assert_eq!(
            MultiClassifier::learn(
                &[Example::unlabeled("hello")],
                TrainingMethod::default(),
                &params,
                &mut rng
            ),
            Err(LearnError::UnlabeledExample)
        );
    }

    #[test]
    fn test_run_parallel_keeps_task_order() {
        let tasks = (0..40).collect::<Vec<u32>>();
        let squares = run_parallel(&tasks, |n| n * n);
        assert_eq!(squares, tasks.iter().map(|n| n * n).collect::<Vec<_>>());
        assert!(run_parallel(&[] as &[u32], |n| *n).is_empty());
    }
}
