use serde::{Deserialize, Serialize};

/// Tunables for one outline pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Pages beyond this cap are ignored (with a warning).
    pub max_pages: usize,
    /// Pages sampled by the font-statistics analyzer.
    pub stats_sample_pages: usize,
    /// Pages searched by the heuristic title fallback.
    pub title_scan_pages: usize,
    /// Pages sampled for script detection.
    pub script_sample_pages: usize,
    /// Characters taken from each sampled page for script detection.
    pub script_sample_chars: usize,
    /// Optional lowercase substrings that qualify a title candidate even when
    /// it is not set in the page's largest font.
    pub title_hints: Vec<String>,
    /// Boilerplate prefixes stripped from a heuristic title.
    pub title_prefixes: Vec<String>,
    /// Maximum vertical distance for two spans to share a group.
    pub line_threshold: f32,
    /// Maximum horizontal gap for two spans to share a group.
    pub word_threshold: f32,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            stats_sample_pages: 5,
            title_scan_pages: 3,
            script_sample_pages: 3,
            script_sample_chars: 1000,
            title_hints: Vec::new(),
            title_prefixes: vec!["Welcome to the ".to_string()],
            line_threshold: 5.0,
            word_threshold: 20.0,
        }
    }
}

impl OutlineConfig {
    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, max_pages: Option<usize>, title_hints: Vec<String>) -> Self {
        if let Some(max) = max_pages {
            self.max_pages = max;
        }
        if !title_hints.is_empty() {
            self.title_hints = title_hints
                .into_iter()
                .map(|h| h.trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect();
        }
        self
    }
}
