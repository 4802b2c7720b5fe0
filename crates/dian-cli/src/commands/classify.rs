//! Classify command - report the document type of each input file.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use dian_core::{open_document, Pipeline};

use super::load_config;

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Input files (PDF or JSON page dump)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

pub async fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let pipeline = Pipeline::with_config(&config);

    let mut unrecognized = 0;
    for path in &args.inputs {
        let result =
            open_document(path, &config.pdf).and_then(|doc| pipeline.classify(doc.as_ref()));

        match result {
            Ok(kind) => println!("{}\t{}", path.display(), kind),
            Err(e) => {
                debug!("Could not classify {}: {}", path.display(), e);
                unrecognized += 1;
                println!("{}\t{}", path.display(), style(format!("? ({})", e)).yellow());
            }
        }
    }

    if unrecognized == args.inputs.len() {
        anyhow::bail!("No document type recognized");
    }

    Ok(())
}
