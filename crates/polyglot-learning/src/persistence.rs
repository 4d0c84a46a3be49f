//! Serialization of trained deciders.
//!
//! A decider is stored as a JSON envelope carrying a format version:
//!
//! ```text
//! { "format_version": 1, "decider": { ... } }
//! ```
//!
//! The byte layout is not a compatibility contract; only the round trip is.
//! Loading checks the version before decoding the decider so an incompatible
//! blob is reported as such rather than as corruption.

use serde::{Deserialize, Serialize};

use crate::{Decider, PersistenceError};

/// Version written by [`Decider::to_bytes`].
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format_version: u32,
    decider: &'a Decider,
}

#[derive(Deserialize)]
struct Envelope {
    decider: Decider,
}

#[derive(Deserialize)]
struct VersionProbe {
    format_version: u32,
}

impl Decider {
    /// Encodes this decider into an opaque byte blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        let envelope = EnvelopeRef {
            format_version: FORMAT_VERSION,
            decider: self,
        };
        serde_json::to_vec(&envelope).map_err(PersistenceError::Encode)
    }

    /// Decodes a blob produced by [`Decider::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::UnsupportedVersion`] for a blob written in
    /// another format version and [`PersistenceError::Corrupt`] for anything
    /// that does not decode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistenceError> {
        let probe: VersionProbe = serde_json::from_slice(bytes).map_err(PersistenceError::Corrupt)?;
        if probe.format_version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: probe.format_version,
                expected: FORMAT_VERSION,
            });
        }
        let envelope: Envelope = serde_json::from_slice(bytes).map_err(PersistenceError::Corrupt)?;
        Ok(envelope.decider)
    }
}

#[cfg(test)]
mod tests {
    use polyglot_core::{Example, Language};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{MultiClassifier, TrainingMethod, TrainingParams};

    fn trained(method: TrainingMethod) -> Decider {
        let examples = [
            "hola amigo",
            "buenos dias",
            "que tal amigo",
            "hello friend",
            "good morning",
            "how are you friend",
            "ciao amico",
            "buongiorno a tutti",
            "come stai amico",
        ]
        .iter()
        .zip(
            [Language::Spanish, Language::English, Language::Italian]
                .iter()
                .flat_map(|language| [*language; 3]),
        )
        .map(|(text, language)| Example::labeled(language, text))
        .collect::<Vec<_>>();
        let params = TrainingParams {
            generations: 10,
            pool_size: 8,
        };
        let mut rng = Pcg64::seed_from_u64(21);
        MultiClassifier::learn(&examples, method, &params, &mut rng)
            .unwrap()
            .into()
    }

    #[test]
    fn test_roundtrip_preserves_decisions() {
        let probes = [
            "hola", "amigo", "friend", "buongiorno", "good dias", "xyzzy", "",
        ]
        .map(Example::unlabeled);
        for method in [
            TrainingMethod::DecisionTree { depth: 4 },
            TrainingMethod::AdaBoost { ensemble_size: 4 },
        ] {
            let decider = trained(method);
            let restored = Decider::from_bytes(&decider.to_bytes().unwrap()).unwrap();
            assert_eq!(restored, decider);
            for probe in &probes {
                assert_eq!(restored.decide(probe), decider.decide(probe));
            }
        }
    }

    #[test]
    fn test_corrupt_blob_fails() {
        assert!(matches!(
            Decider::from_bytes(b"not json"),
            Err(PersistenceError::Corrupt(_))
        ));
        assert!(matches!(
            Decider::from_bytes(br#"{"format_version": 1, "decider": {"bogus": 3}}"#),
            Err(PersistenceError::Corrupt(_))
        ));
    }

    #[test]
    fn test_wrong_version_fails() {
        let decider = Decider::from(crate::AbsoluteDecider::for_language(Language::Gaelic));
        let bytes = decider.to_bytes().unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        value["format_version"] = serde_json::json!(2);
        let bytes = serde_json::to_vec(&value).unwrap();
        assert!(matches!(
            Decider::from_bytes(&bytes),
            Err(PersistenceError::UnsupportedVersion {
                found: 2,
                expected: FORMAT_VERSION
            })
        ));
    }
}
