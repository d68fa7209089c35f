use clap::Parser;
use config::Config;
use manage_views::{
    Error,
    cli::{Cli, Command},
    commands::App,
    terminal::TerminalSelector,
};
use std::{fs::OpenOptions, sync::Mutex};
use tracing::{debug, info};
use tracing_log::AsTrace;
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};
use views::{PresetSelector, RestPlatform, Selector};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli)?;

    info!("--------------------- New execution ---------------------");
    debug!(config = ?cli);

    let config = match &cli.conffile {
        Some(path) => Config::load(path).map_err(Error::from)?,
        _ => Config::new().map_err(Error::from)?,
    };
    config.validate().map_err(Error::from)?;
    debug!(config = ?config, "configuration loaded");

    let platform = RestPlatform::new(&config.platform).map_err(Error::from)?;

    let (file, folder) = match &cli.command {
        Command::Restore(args) => (args.file.clone(), args.folder.clone()),
        _ => (None, None),
    };
    let selector: Box<dyn Selector> = if cli.unattended {
        Box::new(
            PresetSelector::unattended()
                .with_file(file)
                .with_folder(folder),
        )
    } else {
        Box::new(
            TerminalSelector::stdio()
                .with_file(file)
                .with_folder(folder),
        )
    };

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    App::new(&config, &platform, selector.as_ref(), cli.unattended)
        .run(&cli.command, &timestamp)
        .await?;
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<(), Error> {
    let filter = EnvFilter::builder()
        .with_default_directive(cli.verbosity.log_level_filter().as_trace().into())
        .from_env_lossy();

    let (writer, ansi) = match &cli.logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| Error::LogFile {
                    path: path.clone(),
                    source,
                })?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_level(true)
        .with_target(false)
        .init();
    Ok(())
}
