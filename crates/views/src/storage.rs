#![forbid(unsafe_code)]

use crate::domain::{Stage, StagedView, ViewDocument};
use crate::error::Error;
use config::Storage;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Characters removed from view names before they become file names.
const FORBIDDEN: &str = "<>:\"/\\|?*&#^()[]+={}%$@!`~";

/// Name used when sanitizing leaves nothing.
const UNNAMED: &str = "unnamed";

/// Strip every character that is unsafe in a file name.
///
/// ```
/// # use views::storage::sanitize_name;
/// assert_eq!(sanitize_name("WAN/Edge<View>"), "WANEdgeView");
/// assert_eq!(sanitize_name("Core Topology"), "Core Topology");
/// ```
pub fn sanitize_name(name: &str) -> String {
    let sanitized: String = name.chars().filter(|c| !FORBIDDEN.contains(*c)).collect();
    if sanitized.is_empty() {
        UNNAMED.to_owned()
    } else {
        sanitized
    }
}

/// Default backup folder name for a `%Y-%m-%d %H:%M:%S` timestamp.
///
/// ```
/// # use views::storage::default_folder_name;
/// assert_eq!(default_folder_name("2024-03-01 14:05:09"), "2024-03-01_140509_backup");
/// ```
pub fn default_folder_name(timestamp: &str) -> String {
    format!("{}_backup", timestamp.replace(':', "").replace(' ', "_"))
}

/// Read a view file and classify it by its file name.
pub fn read_view(path: &Path) -> Result<StagedView, Error> {
    let (file_name, document) = read_document(path)?;
    StagedView::from_file_name(file_name, document)
        .ok_or_else(|| Error::InvalidPath(path.to_owned()))
}

/// Read a view file already known to be in `stage`. The name is not
/// classified, so a view called `Edge_HOSTNAME` stays an original view.
pub fn read_view_in(path: &Path, stage: Stage) -> Result<StagedView, Error> {
    let (file_name, document) = read_document(path)?;
    StagedView::in_stage(stage, file_name, document)
        .ok_or_else(|| Error::InvalidPath(path.to_owned()))
}

fn read_document(path: &Path) -> Result<(&str, ViewDocument), Error> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| name.ends_with(".json"))
        .ok_or_else(|| Error::InvalidPath(path.to_owned()))?;
    let raw = fs::read_to_string(path).map_err(Error::io(path))?;
    let document = serde_json::from_str(&raw).map_err(Error::json(path))?;
    Ok((file_name, document))
}

/// Write `view` into `dir` under its stage file name, creating `dir` if needed.
pub fn write_view(dir: &Path, view: &StagedView) -> Result<PathBuf, Error> {
    fs::create_dir_all(dir).map_err(Error::io(dir))?;
    let path = dir.join(view.file_name());

    let mut buf = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    view.document
        .serialize(&mut serializer)
        .map_err(Error::json(&path))?;
    fs::write(&path, buf).map_err(Error::io(&path))?;
    Ok(path)
}

/// Every `*.json` file below `root`, sorted. A missing root yields nothing.
pub fn find_view_files(root: &Path) -> Result<Vec<PathBuf>, Error> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    glob_paths(&format!("{}/**/*.json", escaped(root)?))
}

/// Every backup folder below the storage root, sorted. A backup folder is
/// any directory holding an original-stage subfolder.
pub fn find_backup_folders(storage: &Storage) -> Result<Vec<BackupFolder>, Error> {
    if !storage.root.is_dir() {
        return Ok(Vec::new());
    }
    let pattern = format!(
        "{}/**/{}",
        escaped(&storage.root)?,
        glob::Pattern::escape(&storage.original_folder)
    );
    Ok(glob_paths(&pattern)?
        .into_iter()
        .filter(|path| path.is_dir())
        .filter_map(|path| path.parent().map(|root| BackupFolder::new(root, storage)))
        .collect())
}

fn escaped(path: &Path) -> Result<String, Error> {
    path.to_str()
        .map(glob::Pattern::escape)
        .ok_or_else(|| Error::InvalidPath(path.to_owned()))
}

fn glob_paths(pattern: &str) -> Result<Vec<PathBuf>, Error> {
    let mut paths: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(
                    path = %err.path().display(),
                    error = %err.error(),
                    "skipping unreadable path"
                );
                None
            }
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// One backup run on disk: a root directory with one subfolder per stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFolder {
    path: PathBuf,
    original: String,
    hostname: String,
    new_serial: String,
}

impl BackupFolder {
    pub fn new(path: impl Into<PathBuf>, storage: &Storage) -> Self {
        Self {
            path: path.into(),
            original: storage.original_folder.clone(),
            hostname: storage.hostname_folder.clone(),
            new_serial: storage.new_serial_folder.clone(),
        }
    }

    /// Open a backup folder given either its root or one of its stage
    /// subfolders.
    pub fn open(path: &Path, storage: &Storage) -> Self {
        let root = Self::containing_dir(path, storage).unwrap_or(path);
        Self::new(root, storage)
    }

    /// The backup folder `file` belongs to, when it sits in a stage subfolder.
    pub fn containing(file: &Path, storage: &Storage) -> Option<Self> {
        let dir = file.parent()?;
        Self::containing_dir(dir, storage).map(|root| Self::new(root, storage))
    }

    fn containing_dir<'p>(dir: &'p Path, storage: &Storage) -> Option<&'p Path> {
        let name = dir.file_name()?.to_str()?;
        let is_stage_dir = [
            &storage.original_folder,
            &storage.hostname_folder,
            &storage.new_serial_folder,
        ]
        .iter()
        .any(|folder| folder.as_str() == name);
        if is_stage_dir { dir.parent() } else { None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stage_dir(&self, stage: Stage) -> PathBuf {
        let name = match stage {
            Stage::Original => &self.original,
            Stage::Hostname => &self.hostname,
            Stage::NewSerial => &self.new_serial,
        };
        self.path.join(name)
    }

    /// The stage of `file` when it sits directly in one of this folder's
    /// stage subfolders.
    pub fn stage_of(&self, file: &Path) -> Option<Stage> {
        let dir = file.parent()?;
        Stage::ALL
            .into_iter()
            .find(|stage| self.stage_dir(*stage) == dir)
    }

    /// Read `path`, taking its stage from the subfolder it sits in and
    /// falling back to its file name outside this folder.
    pub fn read(&self, path: &Path) -> Result<StagedView, Error> {
        match self.stage_of(path) {
            Some(stage) => read_view_in(path, stage),
            None => read_view(path),
        }
    }

    /// Create the subfolder of `stage` ("create if absent").
    pub fn create(&self, stage: Stage) -> Result<PathBuf, Error> {
        let dir = self.stage_dir(stage);
        fs::create_dir_all(&dir).map_err(Error::io(&dir))?;
        Ok(dir)
    }

    /// Write `view` into the subfolder of its stage.
    pub fn write(&self, view: &StagedView) -> Result<PathBuf, Error> {
        write_view(&self.stage_dir(view.stage), view)
    }

    /// The file to restore each backed-up view from, sorted by view.
    ///
    /// Every file of the original-stage subfolder is a backed-up view,
    /// whatever its name. When a hostname-stage copy of the same view exists
    /// it is preferred, since it already went through the discovery-history
    /// mapping. Files that cannot be views are still returned so that
    /// restoring them fails visibly instead of dropping them.
    pub fn restore_sources(&self) -> Result<Vec<PathBuf>, Error> {
        let original_dir = self.stage_dir(Stage::Original);
        let hostname_dir = self.stage_dir(Stage::Hostname);

        let mut originals = Vec::new();
        for entry in fs::read_dir(&original_dir).map_err(Error::io(&original_dir))? {
            let path = entry.map_err(Error::io(&original_dir))?.path();
            if path.is_file() {
                originals.push(path);
            }
        }
        originals.sort();

        Ok(originals
            .into_iter()
            .map(|path| {
                let base_name = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| Stage::Original.base_name(name));
                let Some(base_name) = base_name else {
                    warn!(path = %path.display(), "not a view file, it will fail to restore");
                    return path;
                };
                let hostname = hostname_dir.join(Stage::Hostname.file_name(base_name));
                if hostname.is_file() { hostname } else { path }
            })
            .collect())
    }
}
