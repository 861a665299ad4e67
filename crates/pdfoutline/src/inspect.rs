use std::path::PathBuf;

use colored::Colorize;
use pdfoutline_core::DocumentReport;

use crate::config::ConfigArgs;
use crate::output::to_json_pretty;
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args)]
pub struct App {
    /// Path to the PDF file
    pub path: PathBuf,

    #[clap(flatten)]
    pub config: ConfigArgs,
}

/// Print the document-level analysis: font statistics, script and title.
pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = app.config.resolve();
    let path = app.path.clone();
    let report: DocumentReport =
        tokio::task::spawn_blocking(move || pdf::inspect_file(&path, &config))
            .await?
            .map_err(|e| eyre!(e))?;

    if global.verbose {
        eprintln!(
            "{} {} pages, body {}pt, script {}",
            app.path.display().to_string().bold().cyan(),
            report.page_count,
            report.stats.body_size,
            report.script
        );
    }
    println!("{}", to_json_pretty(&report)?);
    Ok(())
}
