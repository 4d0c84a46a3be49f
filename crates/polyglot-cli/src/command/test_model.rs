use std::path::PathBuf;

use anyhow::Context;

use crate::{
    command::train,
    model::ModelCatalog,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TestModelArg {
    /// Id of the model to test
    #[arg(long)]
    model: String,
    /// Labeled examples to test on
    #[arg(long)]
    testing: PathBuf,
}

pub(crate) fn run(arg: &TestModelArg, catalog: &ModelCatalog) -> anyhow::Result<()> {
    let decider = catalog.load_decider(&arg.model)?;
    let examples = util::read_examples_file(&arg.testing)?;
    let accuracy = train::accuracy_percentage(&decider, &examples)
        .with_context(|| format!("Failed to test model {}", arg.model))?;

    let mut output = Output::stdout();
    output.write_line(&format!("Testing accuracy: {accuracy:.2}%"))?;
    Ok(())
}
