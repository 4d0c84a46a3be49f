use std::path::PathBuf;

use chrono::Utc;
use polyglot_core::Example;
use polyglot_learning::{Decider, MultiClassifier, TrainingMethod, TrainingParams};
use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use uuid::Uuid;

use crate::{
    model::{ModelCatalog, TrainedModel},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum MethodKind {
    #[default]
    DecisionTree,
    Adaboost,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Labeled examples to train on (`Label|phrase` per line)
    #[arg(long)]
    examples: PathBuf,
    /// Labeled examples to measure testing accuracy on
    #[arg(long)]
    testing: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t)]
    method: MethodKind,
    /// Maximum decision tree depth
    #[arg(long, default_value_t = 6)]
    depth: usize,
    /// Maximum number of stumps per Adaboost ensemble
    #[arg(long, default_value_t = 6)]
    ensemble_size: usize,
    /// Generations of genetic attribute search
    #[arg(long, default_value_t = 50)]
    generations: usize,
    /// Attributes kept in each genetic pool
    #[arg(long, default_value_t = 12)]
    pool_size: usize,
    /// Random seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the model metadata
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TrainArg {
    fn training_method(&self) -> TrainingMethod {
        match self.method {
            MethodKind::DecisionTree => TrainingMethod::DecisionTree { depth: self.depth },
            MethodKind::Adaboost => TrainingMethod::AdaBoost {
                ensemble_size: self.ensemble_size,
            },
        }
    }
}

pub(crate) fn run(arg: &TrainArg, catalog: &ModelCatalog) -> anyhow::Result<()> {
    let training = util::read_examples_file(&arg.examples)?;
    let testing = arg
        .testing
        .as_ref()
        .map(util::read_examples_file)
        .transpose()?;

    let method = arg.training_method();
    let params = TrainingParams {
        generations: arg.generations,
        pool_size: arg.pool_size,
    };
    let seed = arg.seed.unwrap_or_else(rand::random);
    tracing::info!(
        examples = training.len(),
        %method,
        generations = params.generations,
        pool_size = params.pool_size,
        seed,
        "training model"
    );

    let mut rng = Pcg64::seed_from_u64(seed);
    let classifier = MultiClassifier::learn(&training, method, &params, &mut rng)?;
    let description = classifier.description().to_owned();
    let decider = Decider::from(classifier);

    let training_accuracy_percentage = accuracy_percentage(&decider, &training)?;
    let testing_accuracy_percentage = testing
        .as_deref()
        .map(|testing| accuracy_percentage(&decider, testing))
        .transpose()?;

    let model = TrainedModel {
        id: Uuid::new_v4().to_string(),
        description,
        method,
        params,
        seed,
        trained_at: Utc::now(),
        training_accuracy_percentage,
        testing_accuracy_percentage,
    };
    catalog.register(model.clone(), &decider)?;
    Output::save_json(&model, arg.output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    eprintln!("  Id: {}", model.id);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Training accuracy: {training_accuracy_percentage:.2}%");
    if let Some(testing) = testing_accuracy_percentage {
        eprintln!("  Testing accuracy: {testing:.2}%");
    }

    Ok(())
}

pub(crate) fn accuracy_percentage(decider: &Decider, examples: &[Example]) -> anyhow::Result<f64> {
    Ok(100.0 * (1.0 - decider.error_rate(examples)?))
}
