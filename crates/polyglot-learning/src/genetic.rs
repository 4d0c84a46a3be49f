//! Genetic search for a pool of useful attributes.
//!
//! The search is a (μ+λ)-style evolution strategy without crossover:
//!
//! 1. **Seed** - each of the five attribute families contributes
//!    [`SEED_MUTATIONS`] random mutations of its blank seed
//! 2. **Reproduce** - every pool member spawns a mutant with probability equal
//!    to its fitness
//! 3. **Select** - mutants join the pool and the lowest-ranked members are
//!    discarded until the pool fits the configured size
//!
//! Steps 2 and 3 repeat once per generation. Ranking follows the
//! [`Attribute`] ordering, so the pool never holds two attributes with the same
//! name and fitness.

use std::collections::BTreeSet;

use polyglot_core::{Example, Language};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeContext, AttributeKind};

/// Number of random mutations drawn from each blank seed.
pub const SEED_MUTATIONS: usize = 20;

/// Parameters of the genetic attribute search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingParams {
    /// Number of generations to evolve.
    pub generations: usize,
    /// Maximum number of attributes kept after each generation.
    pub pool_size: usize,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            generations: 50,
            pool_size: 12,
        }
    }
}

/// Summary of the fitness values in a pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

/// An evolving set of attributes for one two-language problem.
#[derive(Debug, Clone)]
pub struct AttributePool<'a> {
    context: AttributeContext<'a>,
    attributes: BTreeSet<Attribute>,
}

impl<'a> AttributePool<'a> {
    /// Creates the initial pool from mutations of every blank seed.
    ///
    /// The seeded pool is not truncated; the first generation trims it.
    #[must_use]
    pub fn seeded<R>(context: AttributeContext<'a>, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut attributes = BTreeSet::new();
        for kind in AttributeKind::blank_seeds() {
            let blank = context.evaluate(kind);
            for _ in 0..SEED_MUTATIONS {
                attributes.insert(blank.mutate(&context, rng));
            }
        }
        Self {
            context,
            attributes,
        }
    }

    /// Runs one round of fitness-proportional mutation and truncation.
    pub fn next_generation<R>(&mut self, max_pool_size: usize, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let mut offspring = BTreeSet::new();
        for attribute in &self.attributes {
            if rng.random::<f64>() < attribute.fitness() {
                offspring.insert(attribute.mutate(&self.context, rng));
            }
        }
        self.attributes.extend(offspring);

        while self.attributes.len() > max_pool_size {
            self.attributes.pop_first();
        }
    }

    /// Attributes in ascending rank order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> + '_ {
        self.attributes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Returns `None` for an empty pool.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fitness_stats(&self) -> Option<FitnessStats> {
        let min = self.attributes.first()?.fitness();
        let max = self.attributes.last()?.fitness();
        let sum = self.attributes.iter().map(Attribute::fitness).sum::<f64>();
        Some(FitnessStats {
            min,
            mean: sum / self.attributes.len() as f64,
            max,
        })
    }

    /// Consumes the pool, returning attributes in ascending rank order.
    #[must_use]
    pub fn into_attributes(self) -> Vec<Attribute> {
        self.attributes.into_iter().collect()
    }
}

/// Evolves an attribute pool for separating `language_a` from `language_b`.
///
/// Every example should be labeled `language_a` or `language_b`.
#[must_use]
pub fn learn_attributes<R>(
    examples: &[Example],
    language_a: Language,
    language_b: Language,
    params: &TrainingParams,
    rng: &mut R,
) -> Vec<Attribute>
where
    R: Rng + ?Sized,
{
    let context = AttributeContext::new(examples, language_a, language_b);
    let mut pool = AttributePool::seeded(context, rng);
    for generation in 0..params.generations {
        pool.next_generation(params.pool_size, rng);
        if let Some(stats) = pool.fitness_stats() {
            tracing::debug!(
                %language_a,
                generation,
                pool_size = pool.len(),
                min = stats.min,
                mean = stats.mean,
                max = stats.max,
                "evolved attribute pool"
            );
        }
    }
    pool.into_attributes()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    fn examples() -> Vec<Example> {
        let english = [
            "the quick brown fox",
            "we went to the shop",
            "the weather is nice today",
            "where is the station",
            "this is my house",
        ];
        let german = [
            "der schnelle braune fuchs",
            "wir gingen zum laden",
            "das wetter ist heute schön",
            "wo ist der bahnhof",
            "das ist mein haus",
        ];
        english
            .iter()
            .map(|text| Example::labeled(Language::English, text))
            .chain(german.iter().map(|text| Example::labeled(Language::Other, text)))
            .collect()
    }

    #[test]
    fn test_pool_is_bounded() {
        let examples = examples();
        let params = TrainingParams {
            generations: 10,
            pool_size: 7,
        };
        let mut rng = Pcg64::seed_from_u64(3);
        let attributes =
            learn_attributes(&examples, Language::English, Language::Other, &params, &mut rng);
        assert!(!attributes.is_empty());
        assert!(attributes.len() <= 7);
    }

    #[test]
    fn test_pool_is_sorted_by_rank() {
        let examples = examples();
        let mut rng = Pcg64::seed_from_u64(11);
        let attributes = learn_attributes(
            &examples,
            Language::English,
            Language::Other,
            &TrainingParams::default(),
            &mut rng,
        );
        assert!(attributes.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_generations_never_lower_best_fitness() {
        let examples = examples();
        let context = AttributeContext::new(&examples, Language::English, Language::Other);
        let mut rng = Pcg64::seed_from_u64(5);
        let mut pool = AttributePool::seeded(context, &mut rng);
        let mut best = pool.fitness_stats().unwrap().max;
        for _ in 0..20 {
            pool.next_generation(12, &mut rng);
            let stats = pool.fitness_stats().unwrap();
            assert!(stats.max >= best);
            assert!(stats.min <= stats.mean + 1e-12 && stats.mean <= stats.max + 1e-12);
            best = stats.max;
        }
    }

    #[test]
    fn test_zero_generations_keeps_seeded_pool() {
        let examples = examples();
        let params = TrainingParams {
            generations: 0,
            pool_size: 1,
        };
        let mut rng = Pcg64::seed_from_u64(9);
        let attributes =
            learn_attributes(&examples, Language::English, Language::Other, &params, &mut rng);
        assert!(attributes.len() > 1);
        assert!(attributes.len() <= 5 * SEED_MUTATIONS);
    }

    #[test]
    fn test_same_seed_same_pool() {
        let examples = examples();
        let params = TrainingParams::default();
        let run = |seed| {
            let mut rng = Pcg64::seed_from_u64(seed);
            learn_attributes(&examples, Language::English, Language::Other, &params, &mut rng)
                .iter()
                .map(Attribute::name)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(17), run(17));
    }

    #[test]
    fn test_empty_examples_do_not_panic() {
        let mut rng = Pcg64::seed_from_u64(0);
        let attributes = learn_attributes(
            &[],
            Language::English,
            Language::Other,
            &TrainingParams::default(),
            &mut rng,
        );
        assert!(attributes.len() <= 12);
    }
}
