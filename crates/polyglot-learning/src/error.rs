use polyglot_core::{Language, WeightError};

/// Invalid input handed to a learning algorithm.
///
/// These are caller errors. Degenerate training situations (a perfect stump,
/// an exhausted attribute pool) are not errors and never produce this type.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum LearnError {
    #[display("cannot learn from an empty example set")]
    EmptyExamples,
    #[display("training examples must be labeled")]
    UnlabeledExample,
    #[display("example labeled {found} in a {language_a} vs {language_b} problem")]
    UnexpectedLabel {
        found: Language,
        language_a: Language,
        language_b: Language,
    },
    #[display("confidence between {language_a} and {language_b} is NaN")]
    NanConfidence {
        language_a: Language,
        language_b: Language,
    },
    #[display("an ensemble needs at least one member")]
    EmptyEnsemble,
    #[display("invalid example weights: {_0}")]
    Weight(WeightError),
}

impl From<WeightError> for LearnError {
    fn from(error: WeightError) -> Self {
        Self::Weight(error)
    }
}

/// Failure to encode or decode a stored decider.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PersistenceError {
    #[display("failed to encode decider: {_0}")]
    Encode(serde_json::Error),
    #[display("stored decider is corrupt: {_0}")]
    Corrupt(serde_json::Error),
    #[display("stored decider has format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
}
