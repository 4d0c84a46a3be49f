use polyglot_core::{Language, LanguageDecision};
use serde::{Deserialize, Serialize};

use crate::LearnError;

/// A leaf that splits confidence between two languages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceDecider {
    language_a: Language,
    language_b: Language,
    fraction_a: f64,
}

impl ConfidenceDecider {
    /// Creates a leaf giving `fraction_a` to `language_a` and the rest to
    /// `language_b`.
    ///
    /// A NaN fraction is rejected.
    pub fn new(
        language_a: Language,
        language_b: Language,
        fraction_a: f64,
    ) -> Result<Self, LearnError> {
        if fraction_a.is_nan() {
            return Err(LearnError::NanConfidence {
                language_a,
                language_b,
            });
        }
        Ok(Self {
            language_a,
            language_b,
            fraction_a,
        })
    }

    #[must_use]
    pub fn fraction_a(&self) -> f64 {
        self.fraction_a
    }

    #[must_use]
    pub fn decide(&self) -> LanguageDecision {
        LanguageDecision::binary(self.language_a, self.language_b, self.fraction_a)
    }

    #[must_use]
    pub fn explain(&self) -> String {
        format!(
            "return {} with {}, {} with {}",
            self.language_a,
            self.fraction_a,
            self.language_b,
            1.0 - self.fraction_a
        )
    }
}
