use clap::Parser;
use pdfoutline::prelude::*;
use pdfoutline::Global;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Infer document titles and H1-H3 outlines from PDF files"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Process every PDF in a directory into one JSON record per file
    Batch(pdfoutline::batch::App),

    /// Print the outline record of a single PDF
    Outline(pdfoutline::outline::App),

    /// Print font statistics, script and title diagnostics for a PDF
    Inspect(pdfoutline::inspect::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();

    let default_filter = if app.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    color_eyre::install()?;

    match app.command {
        SubCommands::Batch(sub_app) => pdfoutline::batch::run(sub_app, app.global).await,
        SubCommands::Outline(sub_app) => pdfoutline::outline::run(sub_app, app.global).await,
        SubCommands::Inspect(sub_app) => pdfoutline::inspect::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
