#![forbid(unsafe_code)]

use std::path::PathBuf;

/// Answers the questions backup and restore need from an operator.
pub trait Selector: Send + Sync {
    /// Pick one file out of `candidates`, or none.
    fn select_file(&self, candidates: &[PathBuf]) -> Option<PathBuf>;

    /// Pick one backup folder out of `candidates`, or none.
    fn select_folder(&self, candidates: &[PathBuf]) -> Option<PathBuf>;

    fn confirm(&self, question: &str) -> bool;

    /// Free-text answer, `default` when the operator gives none.
    fn prompt(&self, question: &str, default: &str) -> String;
}

/// Pre-supplied answers, for unattended runs.
///
/// Without a preset folder the last candidate is taken: candidates are
/// sorted, so that is the newest timestamped backup. Files are never
/// guessed. Prompts always get their default.
#[derive(Debug, Clone, Default)]
pub struct PresetSelector {
    pub file: Option<PathBuf>,
    pub folder: Option<PathBuf>,
    pub confirm: bool,
}

impl PresetSelector {
    pub fn unattended() -> Self {
        Self {
            confirm: true,
            ..Self::default()
        }
    }

    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    pub fn with_folder(mut self, folder: Option<PathBuf>) -> Self {
        self.folder = folder;
        self
    }
}

impl Selector for PresetSelector {
    fn select_file(&self, _candidates: &[PathBuf]) -> Option<PathBuf> {
        self.file.clone()
    }

    fn select_folder(&self, candidates: &[PathBuf]) -> Option<PathBuf> {
        self.folder.clone().or_else(|| candidates.last().cloned())
    }

    fn confirm(&self, _question: &str) -> bool {
        self.confirm
    }

    fn prompt(&self, _question: &str, default: &str) -> String {
        default.to_owned()
    }
}
