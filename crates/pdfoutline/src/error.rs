use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Input directory not found: {}", .0.display())]
    InputDirMissing(PathBuf),

    #[error("No PDF files found in {}", .0.display())]
    NoInputFiles(PathBuf),

    #[error("Cannot derive an output name from {}", .0.display())]
    UnnamedInput(PathBuf),
}
