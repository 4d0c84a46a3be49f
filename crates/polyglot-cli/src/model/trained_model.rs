use chrono::{DateTime, Utc};
use polyglot_learning::{TrainingMethod, TrainingParams};
use serde::{Deserialize, Serialize};

/// Catalog entry describing a stored decider.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrainedModel {
    pub id: String,
    pub description: String,
    pub method: TrainingMethod,
    pub params: TrainingParams,
    pub seed: u64,
    pub trained_at: DateTime<Utc>,
    pub training_accuracy_percentage: f64,
    pub testing_accuracy_percentage: Option<f64>,
}
