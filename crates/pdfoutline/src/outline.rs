use std::path::PathBuf;

use crate::config::ConfigArgs;
use crate::output::to_json_pretty;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct App {
    /// Path to the PDF file
    pub path: PathBuf,

    #[clap(flatten)]
    pub config: ConfigArgs,
}

/// Print the output record of a single document.
pub async fn run(app: App, _global: crate::Global) -> Result<()> {
    let config = app.config.resolve();
    let path = app.path;
    let result = tokio::task::spawn_blocking(move || pdf::outline_file(&path, &config))
        .await?
        .map_err(|e| eyre!(e))?;
    println!("{}", to_json_pretty(&result)?);
    Ok(())
}
