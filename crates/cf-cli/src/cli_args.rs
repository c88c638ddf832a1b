use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "casefile")]
#[command(about = "Detective case dashboard")]
pub(crate) struct Cli {
    #[arg(long = "config", global = true)]
    pub(crate) config: Option<String>,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Agent(CaseArgs),
    Tui(CaseArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CaseArgs {
    #[arg(long = "case-dir")]
    pub(crate) case_dir: String,
    #[arg(long = "episode")]
    pub(crate) episode: Option<String>,
    #[arg(long = "initial-path")]
    pub(crate) initial_path: Option<String>,
}
