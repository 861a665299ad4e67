use pdfoutline_core::OutlineConfig;

/// Outline tunables shared by every subcommand.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Maximum number of pages scanned for headings
    #[arg(long, env = "PDFOUTLINE_MAX_PAGES")]
    pub max_pages: Option<usize>,

    /// Substrings that qualify a title candidate set below the page's largest
    /// font (comma separated)
    #[arg(long = "title-hint", env = "PDFOUTLINE_TITLE_HINTS", value_delimiter = ',')]
    pub title_hints: Vec<String>,
}

impl ConfigArgs {
    pub fn resolve(self) -> OutlineConfig {
        OutlineConfig::default().with_overrides(self.max_pages, self.title_hints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(ConfigArgs::default().resolve(), OutlineConfig::default());
    }

    #[test]
    fn test_resolve_overrides() {
        let config = ConfigArgs {
            max_pages: Some(3),
            title_hints: vec!["Challenge".to_string()],
        }
        .resolve();
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.title_hints, vec!["challenge".to_string()]);
    }
}
