//! Imperative shell of pdfoutline: file traversal, concurrency, progress
//! reporting and JSON output around the pure heuristics in
//! [`pdfoutline_core`] and the extraction layer in [`pdf`].

pub mod batch;
pub mod config;
pub mod error;
pub mod inspect;
pub mod outline;
pub mod output;
pub mod prelude;

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(
        long,
        env = "PDFOUTLINE_VERBOSE",
        global = true,
        default_value = "false"
    )]
    pub verbose: bool,
}
