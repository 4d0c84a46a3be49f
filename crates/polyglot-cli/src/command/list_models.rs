use std::path::PathBuf;

use crate::{model::ModelCatalog, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ListModelsArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ListModelsArg, catalog: &ModelCatalog) -> anyhow::Result<()> {
    let models = catalog.models();
    tracing::debug!(count = models.len(), "listing models");
    Output::save_json(&models, arg.output.clone())
}
