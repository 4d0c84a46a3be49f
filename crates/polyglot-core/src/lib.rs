//! Data model shared by the language classifier.
//!
//! This crate holds the plain data the learning algorithms operate on:
//!
//! - [`Language`] - The closed set of language labels, including the synthetic
//!   background label [`Language::Other`]
//! - [`Example`] - A tokenized phrase with an optional label
//! - [`WeightedList`] - An ordered list of `(weight, item)` pairs used for every
//!   weighted-sampling step of training
//! - [`LanguageDecision`] - A confidence value for every language, produced by
//!   every trained classifier
//!
//! Nothing here is random or fallible except normalization of weights, which
//! refuses to divide by a zero or non-finite total (see [`WeightError`]).
//!
//! # Example
//!
//! ```
//! use polyglot_core::{Example, Language, WeightedList};
//!
//! let examples = [
//!     Example::labeled(Language::English, "The quick brown fox"),
//!     Example::labeled(Language::Spanish, "El rápido zorro marrón"),
//! ];
//! assert_eq!(examples[0].words(), ["the", "quick", "brown", "fox"]);
//!
//! let weighted = WeightedList::uniform(&examples);
//! assert!((weighted.total_weight() - 1.0).abs() < 1e-12);
//! ```

pub use self::{decision::*, example::*, language::*, weighted_list::*};

mod decision;
mod example;
mod language;
mod weighted_list;

/// Failure to turn a weighted list into a probability distribution.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum WeightError {
    #[display("cannot normalize weights summing to zero")]
    ZeroTotalWeight,
    #[display("cannot normalize weights with non-finite total {total}")]
    NonFiniteTotalWeight { total: f64 },
}
