mod app;
mod board;
mod cli;
mod command;
mod config;
mod consts;
mod engine;
mod game;
mod logging;
mod menu;
mod options;
mod records;
mod scores;
mod util;
use crate::app::{App, Globals};
use crate::cli::{Arguments, CliAction, USAGE};
use crate::config::Config;
use crate::records::RecordStore;
use anyhow::Context;
use std::io::{self, ErrorKind};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match CliAction::from_env() {
        Ok(CliAction::Run(args)) => args,
        Ok(CliAction::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(CliAction::Version) => {
            println!("timed-snake {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("timed-snake: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    let globals = match setup(args) {
        Ok(globals) => globals,
        Err(e) => {
            eprintln!("timed-snake: {e:?}");
            return ExitCode::FAILURE;
        }
    };
    let terminal = ratatui::init();
    let r = App::new(globals).run(terminal);
    ratatui::restore();
    if let Err(ref e) = r {
        log::error!("Terminal I/O failed: {e}");
    }
    log::info!("Exiting");
    io_exit(r)
}

/// Load configuration, start logging, and read the records file
fn setup(args: Arguments) -> anyhow::Result<Globals> {
    let config = match args.config {
        Some(ref path) => Config::load(path, false),
        None => Config::default_path().and_then(|path| Config::load(&path, true)),
    }
    .context("Failed to load configuration")?;
    let log_file = config.log_file()?;
    logging::init(&log_file)?;
    log::info!("Starting timed-snake {}", env!("CARGO_PKG_VERSION"));
    let records = RecordStore::load(config.records_file()?);
    let player_name = args
        .name
        .or(config.player_name)
        .unwrap_or_else(|| String::from(consts::DEFAULT_PLAYER_NAME));
    Ok(Globals {
        options: config.options,
        records,
        player_name,
    })
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}
