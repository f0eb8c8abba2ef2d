use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use smash_stream::analysis::run_analysis;

use super::config::Config;

/// Run a named analysis, merging flags over the optional config file
pub fn run(
    file: PathBuf,
    analysis: Option<String>,
    quantities: Vec<String>,
    save: Option<PathBuf>,
    quiet: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = match config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Config::from_file(&path)?
        }
        None => Config::default(),
    };

    let analysis = analysis
        .or(config.run.analysis)
        .context("No analysis given; pass --analysis or set [run].analysis in the config")?;
    let quantities = if quantities.is_empty() {
        config.run.quantities.unwrap_or_default()
    } else {
        quantities
    };
    let save_path = save.or(config.run.save_path);
    let print_output = !quiet && config.run.print.unwrap_or(true);

    info!("Running '{}' over {}", analysis, file.display());
    let summary = run_analysis(
        &file,
        &analysis,
        &quantities,
        save_path.as_deref(),
        print_output,
    )
    .with_context(|| format!("Analysis '{}' failed on {}", analysis, file.display()))?;

    if print_output {
        print!("{}", summary);
    }
    if let Some(path) = save_path {
        info!("Result saved to {}", path.display());
    }
    Ok(())
}
