#![forbid(unsafe_code)]

/// Outcome of a batch that keeps going past individual failures.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Names of the views handled successfully.
    pub succeeded: Vec<String>,
    pub failures: Vec<Failure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// View name or file the failure is about.
    pub item: String,
    pub reason: String,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn fail(&mut self, item: impl Into<String>, reason: &impl ToString) {
        self.failures.push(Failure {
            item: item.into(),
            reason: reason.to_string(),
        });
    }
}
