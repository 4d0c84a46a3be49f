use std::io::{self, BufRead as _};

use anyhow::Context;
use polyglot_core::Example;

use crate::{model::ModelCatalog, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ClassifyArg {
    /// Id of the model to classify with
    #[arg(long)]
    model: String,
    /// Phrases to classify (one per line from stdin if omitted)
    phrases: Vec<String>,
}

pub(crate) fn run(arg: &ClassifyArg, catalog: &ModelCatalog) -> anyhow::Result<()> {
    let decider = catalog.load_decider(&arg.model)?;
    let mut output = Output::stdout();

    let mut classify = |phrase: &str| {
        let decision = decider.decide(&Example::unlabeled(phrase));
        output.write_line(&decision.to_string())
    };

    if arg.phrases.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read phrase from stdin")?;
            if !line.trim().is_empty() {
                classify(&line)?;
            }
        }
    } else {
        for phrase in &arg.phrases {
            classify(phrase)?;
        }
    }
    Ok(())
}
