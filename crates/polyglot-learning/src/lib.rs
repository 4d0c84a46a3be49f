//! Learning algorithms for phrase language classification.
//!
//! This crate trains [`Decider`]s: classifiers mapping a tokenized
//! [`Example`](polyglot_core::Example) to a confidence for every language.
//! Everything is implemented from first principles: entropy, weighted
//! resampling and ensemble combination.
//!
//! # Training Pipeline
//!
//! ```text
//! labeled examples
//!     ↓ split per language (one vs rest)
//! binary problems
//!     ↓ genetic search (genetic)
//! attribute pools
//!     ↓ decision tree or Adaboost (decision_tree, adaboost)
//! binary deciders
//!     ↓ fused (multi_classifier)
//! MultiClassifier
//!     ↓ persisted (persistence)
//! opaque byte blob
//! ```
//!
//! Use [`train_decision_tree`] or [`train_adaboost`] to run the whole
//! pipeline.
//!
//! # Randomness
//!
//! Every stochastic step takes an explicit random number generator. Seeding it
//! (for example `rand_pcg::Pcg64::seed_from_u64`) makes training reproducible,
//! even though per-language problems are trained in parallel.
//!
//! # Logging
//!
//! Progress is reported through [`tracing`]: per-generation and per-round
//! details at `debug`, per-language training accuracy at `info`.

use polyglot_core::Example;
use rand::Rng;

pub use self::{
    adaboost::*, attribute::Attribute, decider::*, decision_tree::*, error::*,
    genetic::TrainingParams, multi_classifier::*, persistence::FORMAT_VERSION,
};

pub mod adaboost;
pub mod attribute;
pub mod decider;
pub mod decision_tree;
mod error;
pub mod genetic;
pub mod multi_classifier;
pub mod persistence;

/// Trains a one-vs-rest classifier built from decision trees of at most
/// `depth` levels.
pub fn train_decision_tree<R>(
    examples: &[Example],
    depth: usize,
    generations: usize,
    pool_size: usize,
    rng: &mut R,
) -> Result<Decider, LearnError>
where
    R: Rng + ?Sized,
{
    let params = TrainingParams {
        generations,
        pool_size,
    };
    let classifier =
        MultiClassifier::learn(examples, TrainingMethod::DecisionTree { depth }, &params, rng)?;
    Ok(classifier.into())
}

/// Trains a one-vs-rest classifier built from Adaboost ensembles of at most
/// `ensemble_size` decision stumps.
pub fn train_adaboost<R>(
    examples: &[Example],
    ensemble_size: usize,
    generations: usize,
    pool_size: usize,
    rng: &mut R,
) -> Result<Decider, LearnError>
where
    R: Rng + ?Sized,
{
    let params = TrainingParams {
        generations,
        pool_size,
    };
    let classifier = MultiClassifier::learn(
        examples,
        TrainingMethod::AdaBoost { ensemble_size },
        &params,
        rng,
    )?;
    Ok(classifier.into())
}
