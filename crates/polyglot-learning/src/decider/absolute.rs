use polyglot_core::{Language, LanguageDecision};
use serde::{Deserialize, Serialize};

/// A leaf that always answers one language with full confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsoluteDecider {
    language: Language,
}

static ABSOLUTE_DECIDERS: [AbsoluteDecider; Language::LEN] = absolute_deciders();

const fn absolute_deciders() -> [AbsoluteDecider; Language::LEN] {
    let mut deciders = [AbsoluteDecider {
        language: Language::Other,
    }; Language::LEN];
    let mut i = 0;
    while i < Language::LEN {
        deciders[i].language = Language::ALL[i];
        i += 1;
    }
    deciders
}

impl AbsoluteDecider {
    /// Returns the shared decider for `language`.
    #[must_use]
    pub fn for_language(language: Language) -> Self {
        ABSOLUTE_DECIDERS[language.index()]
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn decide(&self) -> LanguageDecision {
        LanguageDecision::certain(self.language)
    }

    #[must_use]
    pub fn explain(&self) -> String {
        format!("return {}, 1.0 confidence", self.language)
    }
}
