use std::ffi::OsString;

use cf_core::CaseFileError;
use clap::Parser;
use tracing::info;

mod agent;
mod case_loader;
mod cli_args;
mod config;
mod dashboard;
mod error_map;
mod logging;
mod tui;
mod tui_actions;
mod tui_render;
mod tui_state;

pub(crate) use cli_args::{CaseArgs, Cli, Mode};
pub(crate) use error_map::{
    emit_error, map_agent_io, map_case_invalid, map_cli_case_path, map_cli_case_read,
    map_cli_case_scan, map_cli_config_invalid, map_cli_config_read, map_tui_io, write_error,
};

use config::CaseFileConfig;
use dashboard::Dashboard;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, CaseFileError> {
    let config = config::load_config(cli.config.as_deref())?;
    logging::init_tracing(&config.log_filter);

    match cli.command {
        Mode::Agent(args) => {
            let mut dashboard = open_dashboard(&args, &config)?;
            agent::run_agent(&mut dashboard)
        }
        Mode::Tui(args) => {
            let mut dashboard = open_dashboard(&args, &config)?;
            tui::run_tui_ratatui_mode(&mut dashboard, &config)
        }
    }
}

fn open_dashboard(args: &CaseArgs, config: &CaseFileConfig) -> Result<Dashboard, CaseFileError> {
    let episodes = case_loader::load_episodes(&args.case_dir)?;
    let episode = case_loader::select_episode(episodes, args.episode.as_deref())?;
    let initial_path = args
        .initial_path
        .as_deref()
        .unwrap_or(config.initial_path.as_str());
    info!(episode = %episode.id, initial_path, "opening case");
    Dashboard::open(episode, initial_path)
}

#[cfg(test)]
mod tests;
