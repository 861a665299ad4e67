use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use pdfoutline_core::{OutlineConfig, OutlineResult};

use crate::config::ConfigArgs;
use crate::output::write_json;
use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct App {
    /// Directory containing the input PDF files
    #[arg(env = "PDFOUTLINE_INPUT", default_value = "sample_dataset/pdfs")]
    pub input: PathBuf,

    /// Directory receiving one JSON record per input file
    #[arg(env = "PDFOUTLINE_OUTPUT", default_value = "sample_dataset/outputs")]
    pub output: PathBuf,

    /// Number of documents processed concurrently
    #[arg(short, long, env = "PDFOUTLINE_JOBS", default_value_t = 1)]
    pub jobs: usize,

    #[clap(flatten)]
    pub config: ConfigArgs,
}

/// Resolved batch parameters.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub jobs: usize,
    pub config: OutlineConfig,
}

impl From<App> for BatchOptions {
    fn from(app: App) -> Self {
        Self {
            input: app.input,
            output: app.output,
            jobs: app.jobs,
            config: app.config.resolve(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files for which a record was written.
    pub written: usize,
    /// Files whose document could not be processed; their record is empty.
    pub failed: usize,
}

/// What happened to one input file.
#[derive(Debug)]
struct FileOutcome {
    name: String,
    record: String,
    headings: usize,
    /// Why the document degraded to an empty record.
    failure: Option<String>,
}

pub async fn run(app: App, _global: crate::Global) -> Result<()> {
    let summary = process_directory(&BatchOptions::from(app)).await?;
    log::debug!("batch summary: {:?}", summary);
    Ok(())
}

/// `*.pdf` files directly inside `dir`, extension matched case-insensitively,
/// sorted by path.
pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InputDirMissing(dir.to_path_buf()).into());
    }

    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).wrap_err_with(|| f!("failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(Error::NoInputFiles(dir.to_path_buf()).into());
    }
    Ok(files)
}

/// Infer the outline of one file, degrading to an empty record when the
/// document cannot be opened.
pub fn outline_or_empty(
    path: &Path,
    config: &OutlineConfig,
) -> (OutlineResult, Option<pdf::PdfError>) {
    match pdf::outline_file(path, config) {
        Ok(result) => (result, None),
        Err(e) => {
            log::warn!("{}: {}", path.display(), e);
            (OutlineResult::empty(), Some(e))
        }
    }
}

/// Per-file work run on the blocking pool.
type Worker = fn(&Path, &Path, &OutlineConfig) -> Result<FileOutcome>;

/// `<stem>.json`, with any invalid UTF-8 in the stem replaced.
fn record_name(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .ok_or_else(|| Error::UnnamedInput(path.to_path_buf()))?;
    Ok(f!("{}.json", stem.to_string_lossy()))
}

fn process_file(path: &Path, output_dir: &Path, config: &OutlineConfig) -> Result<FileOutcome> {
    let record = record_name(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| record.clone());

    let (result, failure) = outline_or_empty(path, config);
    write_json(&output_dir.join(&record), &result)?;

    Ok(FileOutcome {
        name,
        record,
        headings: result.outline.len(),
        failure: failure.map(|e| e.to_string()),
    })
}

fn write_empty_record(path: &Path, output_dir: &Path) -> Result<()> {
    write_json(&output_dir.join(record_name(path)?), &OutlineResult::empty())
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .wrap_err("invalid progress bar template")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

/// Process every PDF in `options.input`, writing `<stem>.json` records into
/// `options.output`.
///
/// Fails only when there is nothing to process or the output directory is
/// unusable. Per-document failures are reported and produce empty records.
pub async fn process_directory(options: &BatchOptions) -> Result<BatchSummary> {
    process_directory_with(options, process_file).await
}

async fn process_directory_with(options: &BatchOptions, worker: Worker) -> Result<BatchSummary> {
    std::fs::create_dir_all(&options.output)
        .wrap_err_with(|| f!("failed to create {}", options.output.display()))?;

    let files = find_pdfs(&options.input)?;
    println!("Found {} PDF files to process", files.len());

    let bar = progress_bar(files.len())?;
    let config = Arc::new(options.config.clone());

    let mut outcomes = futures::stream::iter(files.into_iter().map(|path| {
        let config = Arc::clone(&config);
        let output_dir = options.output.clone();
        let worker_path = path.clone();
        let handle =
            tokio::task::spawn_blocking(move || worker(&worker_path, &output_dir, &config));
        async move { (path, handle.await) }
    }))
    .buffer_unordered(options.jobs.max(1));

    let mut summary = BatchSummary::default();
    while let Some((path, joined)) = outcomes.next().await {
        bar.inc(1);

        match joined {
            Ok(Ok(FileOutcome {
                name,
                record,
                headings,
                failure: None,
            })) => {
                summary.written += 1;
                bar.set_message(name.clone());
                bar.suspend(|| {
                    println!(
                        "{} {} -> {} ({} headings)",
                        "✓".green(),
                        name,
                        record,
                        headings
                    )
                });
            }
            Ok(Ok(FileOutcome {
                name,
                failure: Some(reason),
                ..
            })) => {
                summary.written += 1;
                summary.failed += 1;
                bar.suspend(|| println!("{} {}: {}", "✗".red(), name, reason));
            }
            Ok(Err(e)) => {
                summary.failed += 1;
                log::warn!("{}: {:#}", path.display(), e);
                bar.suspend(|| println!("{} {}: {:#}", "✗".red(), path.display(), e));
            }
            Err(join_error) => {
                summary.failed += 1;
                log::warn!("{}: {}", path.display(), join_error);
                match write_empty_record(&path, &options.output) {
                    Ok(()) => summary.written += 1,
                    Err(e) => log::warn!("{}: {:#}", path.display(), e),
                }
                bar.suspend(|| {
                    println!(
                        "{} {}: document worker panicked",
                        "✗".red(),
                        path.display()
                    )
                });
            }
        }
    }

    bar.finish_and_clear();
    println!("Processing complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_pdfs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "A.PDF", "notes.txt", "c.Pdf"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = find_pdfs(dir.path()).unwrap();
        let names: Vec<&str> = files
            .iter()
            .filter_map(|p| p.file_name()?.to_str())
            .collect();
        assert_eq!(names, vec!["A.PDF", "b.pdf", "c.Pdf"]);
    }

    #[test]
    fn test_find_pdfs_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_pdfs(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InputDirMissing(_))
        ));
    }

    #[test]
    fn test_find_pdfs_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), b"x").unwrap();
        let err = find_pdfs(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NoInputFiles(_))
        ));
    }

    #[test]
    fn test_record_name_uses_stem() {
        assert_eq!(
            record_name(Path::new("/data/pdfs/file02.PDF")).unwrap(),
            "file02.json"
        );
        assert_eq!(record_name(Path::new("annual.report.pdf")).unwrap(), "annual.report.json");
        assert!(matches!(
            record_name(Path::new("/")).unwrap_err().downcast_ref::<Error>(),
            Some(Error::UnnamedInput(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_stem_still_gets_a_record() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let path = input.path().join(OsStr::from_bytes(b"caf\xe9.pdf"));
        std::fs::write(&path, b"definitely not a pdf").unwrap();

        let outcome = process_file(&path, output.path(), &OutlineConfig::default()).unwrap();
        assert_eq!(outcome.record, "caf\u{fffd}.json");
        assert!(outcome.failure.is_some());

        let written = std::fs::read_to_string(output.path().join("caf\u{fffd}.json")).unwrap();
        assert_eq!(written, "{\n    \"title\": \"\",\n    \"outline\": []\n}");
    }

    /// Writes an empty record for every file, except that it panics on
    /// `boom.pdf`.
    fn panics_on_boom(
        path: &Path,
        output_dir: &Path,
        _config: &OutlineConfig,
    ) -> Result<FileOutcome> {
        if path.file_name().is_some_and(|n| n == "boom.pdf") {
            panic!("malformed object stream");
        }
        let record = record_name(path)?;
        write_json(&output_dir.join(&record), &OutlineResult::empty())?;
        Ok(FileOutcome {
            name: record.clone(),
            record,
            headings: 0,
            failure: None,
        })
    }

    #[tokio::test]
    async fn test_worker_panic_degrades_to_empty_record() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for name in ["a.pdf", "boom.pdf", "c.pdf"] {
            std::fs::write(input.path().join(name), b"x").unwrap();
        }
        let options = BatchOptions {
            input: input.path().to_path_buf(),
            output: output.path().to_path_buf(),
            jobs: 1,
            config: OutlineConfig::default(),
        };

        let summary = process_directory_with(&options, panics_on_boom)
            .await
            .unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                written: 3,
                failed: 1
            }
        );

        for record in ["a.json", "boom.json", "c.json"] {
            let json = std::fs::read_to_string(output.path().join(record)).unwrap();
            assert_eq!(json, "{\n    \"title\": \"\",\n    \"outline\": []\n}");
        }
    }

    #[test]
    fn test_outline_or_empty_on_corrupt_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();

        let (result, failure) = outline_or_empty(&path, &OutlineConfig::default());
        assert_eq!(result, OutlineResult::empty());
        assert!(matches!(failure, Some(pdf::PdfError::Parse(_))));
    }
}
