use crate::{model::ModelCatalog, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ExplainArg {
    /// Id of the model to explain
    #[arg(long)]
    model: String,
}

pub(crate) fn run(arg: &ExplainArg, catalog: &ModelCatalog) -> anyhow::Result<()> {
    let decider = catalog.load_decider(&arg.model)?;
    if let Some(model) = catalog.get(&arg.model) {
        eprintln!("{}", model.description);
    }
    let mut output = Output::stdout();
    output.write_line(&decider.explain(0))?;
    Ok(())
}
