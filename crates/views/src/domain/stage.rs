#![forbid(unsafe_code)]

use super::ViewDocument;
use std::fmt;

const EXTENSION: &str = ".json";
const HOSTNAME_SUFFIX: &str = "_HOSTNAME";
const NEW_SERIAL_SUFFIX: &str = "_NEW_SN";

/// Identity namespace used by a view's `positions` keys.
///
/// Ordered: a view only ever moves forward, and only `NewSerial` views are
/// uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Serial numbers recorded at backup time.
    Original,
    Hostname,
    /// Serial numbers of the devices present at restore time.
    NewSerial,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Original, Stage::Hostname, Stage::NewSerial];

    /// Classify a file by its name, returning the stage and the view's base
    /// name. Anything not ending in `.json` is not a view file.
    ///
    /// ```
    /// # use views::domain::Stage;
    /// assert_eq!(Stage::classify("Core.json"), Some((Stage::Original, "Core")));
    /// assert_eq!(Stage::classify("Core_HOSTNAME.json"), Some((Stage::Hostname, "Core")));
    /// assert_eq!(Stage::classify("Core_NEW_SN.json"), Some((Stage::NewSerial, "Core")));
    /// assert_eq!(Stage::classify("notes.txt"), None);
    /// ```
    pub fn classify(file_name: &str) -> Option<(Stage, &str)> {
        let stem = file_name.strip_suffix(EXTENSION)?;
        if let Some(base) = stem.strip_suffix(NEW_SERIAL_SUFFIX) {
            Some((Stage::NewSerial, base))
        } else if let Some(base) = stem.strip_suffix(HOSTNAME_SUFFIX) {
            Some((Stage::Hostname, base))
        } else {
            Some((Stage::Original, stem))
        }
    }

    /// Base name of `file_name` when it is already known to hold a view of
    /// this stage, e.g. a file found in this stage's subfolder. Only this
    /// stage's suffix is removed, so `Edge_HOSTNAME.json` read as an
    /// original view keeps its full name.
    ///
    /// ```
    /// # use views::domain::Stage;
    /// assert_eq!(Stage::Original.base_name("Edge_HOSTNAME.json"), Some("Edge_HOSTNAME"));
    /// assert_eq!(Stage::Hostname.base_name("Lab_NEW_SN_HOSTNAME.json"), Some("Lab_NEW_SN"));
    /// assert_eq!(Stage::NewSerial.base_name("notes.txt"), None);
    /// ```
    pub fn base_name(self, file_name: &str) -> Option<&str> {
        let stem = file_name.strip_suffix(EXTENSION)?;
        Some(stem.strip_suffix(self.suffix()).unwrap_or(stem))
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Stage::Original => "",
            Stage::Hostname => HOSTNAME_SUFFIX,
            Stage::NewSerial => NEW_SERIAL_SUFFIX,
        }
    }

    pub fn file_name(self, base_name: &str) -> String {
        format!("{base_name}{}{EXTENSION}", self.suffix())
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::NewSerial
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Original => "original",
            Stage::Hostname => "hostname",
            Stage::NewSerial => "new-serial",
        };
        f.write_str(name)
    }
}

/// A view together with the stage it is in. The file name is derived from
/// both and only used when the view is written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedView {
    pub stage: Stage,
    pub base_name: String,
    pub document: ViewDocument,
}

impl StagedView {
    pub fn new(stage: Stage, base_name: impl Into<String>, document: ViewDocument) -> Self {
        Self {
            stage,
            base_name: base_name.into(),
            document,
        }
    }

    pub fn from_file_name(file_name: &str, document: ViewDocument) -> Option<Self> {
        let (stage, base_name) = Stage::classify(file_name)?;
        Some(Self::new(stage, base_name, document))
    }

    /// A view read from a file whose stage is known from where it was found.
    pub fn in_stage(stage: Stage, file_name: &str, document: ViewDocument) -> Option<Self> {
        let base_name = stage.base_name(file_name)?;
        Some(Self::new(stage, base_name, document))
    }

    pub fn file_name(&self) -> String {
        self.stage.file_name(&self.base_name)
    }
}
