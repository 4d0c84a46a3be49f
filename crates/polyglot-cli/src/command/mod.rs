use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::model::ModelCatalog;

use self::{
    classify::ClassifyArg, explain::ExplainArg, list_models::ListModelsArg,
    test_model::TestModelArg, train::TrainArg,
};

mod classify;
mod explain;
mod list_models;
mod test_model;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Directory holding trained models
    #[arg(long, global = true, default_value = "models")]
    models_dir: PathBuf,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train a classifier on labeled examples and store it
    Train(#[clap(flatten)] TrainArg),
    /// Measure the accuracy of a stored classifier on labeled examples
    #[command(name = "test")]
    TestModel(#[clap(flatten)] TestModelArg),
    /// Classify phrases with a stored classifier
    Classify(#[clap(flatten)] ClassifyArg),
    /// Print the decision logic of a stored classifier
    Explain(#[clap(flatten)] ExplainArg),
    /// List stored classifiers
    #[command(name = "models")]
    ListModels(#[clap(flatten)] ListModelsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let catalog = ModelCatalog::open(args.models_dir)?;
    match args.mode {
        Mode::Train(arg) => train::run(&arg, &catalog)?,
        Mode::TestModel(arg) => test_model::run(&arg, &catalog)?,
        Mode::Classify(arg) => classify::run(&arg, &catalog)?,
        Mode::Explain(arg) => explain::run(&arg, &catalog)?,
        Mode::ListModels(arg) => list_models::run(&arg, &catalog)?,
    }
    Ok(())
}
