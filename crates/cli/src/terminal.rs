use parking_lot::Mutex;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::path::PathBuf;
use tracing::warn;
use views::Selector;

/// Asks the operator through numbered lists and line prompts.
///
/// A file or folder given up front is used without asking. End of input
/// counts as "no selection", "no" or "keep the default".
pub struct TerminalSelector<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
    file: Option<PathBuf>,
    folder: Option<PathBuf>,
}

impl TerminalSelector<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead + Send, W: Write + Send> TerminalSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
            file: None,
            folder: None,
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

    fn ask(&self, question: &str) -> Option<String> {
        {
            let mut output = self.output.lock();
            write!(output, "{question}").and_then(|_| output.flush()).ok()?;
        }
        let mut line = String::new();
        match self.input.lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_owned()),
            Err(err) => {
                warn!(%err, "failed to read answer");
                None
            }
        }
    }

    fn say(&self, line: &str) {
        let mut output = self.output.lock();
        if let Err(err) = writeln!(output, "{line}") {
            warn!(%err, "failed to write prompt");
        }
    }

    fn choose(&self, what: &str, candidates: &[PathBuf]) -> Option<PathBuf> {
        if candidates.is_empty() {
            return None;
        }
        self.say(&format!("Available {what}s:"));
        for (i, candidate) in candidates.iter().enumerate() {
            self.say(&format!("{}. {}", i + 1, candidate.display()));
        }
        loop {
            let answer = self.ask(&format!("Enter the number of the {what} to restore: "))?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=candidates.len()).contains(&n) => {
                    return Some(candidates[n - 1].clone());
                }
                _ => self.say("Selection outside the scope. Please select a valid number."),
            }
        }
    }
}

impl<R: BufRead + Send, W: Write + Send> Selector for TerminalSelector<R, W> {
    fn select_file(&self, candidates: &[PathBuf]) -> Option<PathBuf> {
        self.file.clone().or_else(|| self.choose("file", candidates))
    }

    fn select_folder(&self, candidates: &[PathBuf]) -> Option<PathBuf> {
        self.folder.clone().or_else(|| self.choose("folder", candidates))
    }

    fn confirm(&self, question: &str) -> bool {
        self.ask(&format!("{question} [y/N]: "))
            .is_some_and(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    fn prompt(&self, question: &str, default: &str) -> String {
        match self.ask(&format!("{question} [{default}]: ")) {
            Some(answer) if !answer.is_empty() => answer,
            _ => default.to_owned(),
        }
    }
}
