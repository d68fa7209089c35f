use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::{Path, PathBuf};

/// manage-views: back up, delete and restore platform views
///
/// Views are saved as JSON files. On restore, the devices a view refers to
/// are mapped from their backup-time serial numbers to hostnames and then to
/// the serial numbers currently in the inventory, so views survive device
/// replacements.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Path to configuration file.
    ///
    /// Settings also come from `IPF_*` and `MANAGE_VIEWS_*` environment
    /// variables and from a `.env` file.
    #[arg(short, long, global = true, value_parser = validate_file)]
    pub conffile: Option<PathBuf>,

    /// Path to log file.
    ///
    /// Logs go to stderr when unset.
    #[arg(short, long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Never prompt: answer yes and keep default names everywhere.
    #[arg(short, long, global = true)]
    pub unattended: bool,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Save every view into a new backup folder.
    Backup,
    /// Restore one saved view or a whole backup folder.
    Restore(RestoreArgs),
    /// Delete every view on the platform.
    Delete,
    /// Backup, delete, then restore everything from the new backup.
    DoAll,
}

#[derive(Debug, Args, Clone)]
pub struct RestoreArgs {
    /// Restore a single view.
    #[arg(short, long)]
    pub single_file: bool,

    /// Restore all views of a backup folder.
    #[arg(short, long)]
    pub all_files: bool,

    /// View file to restore instead of choosing from a list.
    #[arg(long, requires = "single_file", value_parser = validate_file)]
    pub file: Option<PathBuf>,

    /// Backup folder to restore instead of choosing from a list.
    #[arg(long, requires = "all_files")]
    pub folder: Option<PathBuf>,
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.exists() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn restore_flags_parse() {
        let cli = Cli::try_parse_from(["manage-views", "restore", "-a", "-u"]).unwrap();
        assert!(cli.unattended);
        let Command::Restore(args) = cli.command else {
            panic!("expected restore");
        };
        assert!(args.all_files);
        assert!(!args.single_file);
        assert_eq!(args.folder, None);
    }

    #[test]
    fn folder_requires_all_files() {
        assert!(Cli::try_parse_from(["manage-views", "restore", "--folder", "json/run1"]).is_err());
        let cli = Cli::try_parse_from([
            "manage-views",
            "restore",
            "--all-files",
            "--folder",
            "json/run1",
        ])
        .unwrap();
        let Command::Restore(args) = cli.command else {
            panic!("expected restore");
        };
        assert_eq!(args.folder, Some(PathBuf::from("json/run1")));
    }

    #[test]
    fn missing_conffile_is_rejected() {
        assert!(
            Cli::try_parse_from(["manage-views", "-c", "/definitely/not/here.toml", "backup"])
                .is_err()
        );
    }

    #[test]
    fn do_all_is_kebab_case() {
        let cli = Cli::try_parse_from(["manage-views", "do-all", "--unattended"]).unwrap();
        assert!(matches!(cli.command, Command::DoAll));
        assert!(cli.unattended);
    }
}
