mod common;
mod reconcile;
mod watch;

use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::{
    builder::{styling::AnsiColor, Styles},
    ArgAction, Args, Parser, Subcommand,
};
use humantime::parse_duration;
use log::error;

use crate::logger;

const DEFAULT_EXTENSIONS: [&str; 2] = [".mp4", ".MP4"];
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_MAX_JOBS: usize = 4;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, propagate_version = true, styles = cli_styles())]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch a directory and upload files as they stabilize
    Watch(WatchArgs),
    /// Upload files already present, then optionally keep watching
    Reconcile(ReconcileArgs),
}

impl Command {
    fn global(&self) -> &GlobalArgs {
        match self {
            Command::Watch(args) => &args.global,
            Command::Reconcile(args) => &args.global,
        }
    }
}

#[derive(Args, Debug)]
struct WatchArgs {
    pub directory: PathBuf,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug)]
struct ReconcileArgs {
    pub directory: PathBuf,

    /// Keep watching after the initial sweep
    #[arg(long)]
    pub watch: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug)]
struct SettingsArgs {
    #[arg(short, long = "ext", value_name = "SUFFIX", default_values_t = DEFAULT_EXTENSIONS.map(ToOwned::to_owned))]
    pub extensions: Vec<String>,

    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    #[arg(long, value_name = "DURATION", value_parser = parse_duration, default_value = "5s")]
    pub initial_delay: Duration,

    #[arg(long, value_name = "DURATION", value_parser = parse_duration, default_value = "2s")]
    pub age_threshold: Duration,

    #[arg(long, value_name = "DURATION", value_parser = parse_duration, default_value = "1s")]
    pub sweep_interval: Duration,

    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_MAX_JOBS)]
    pub jobs: usize,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    #[arg(short, long, value_name = "BUCKET")]
    pub bucket: Option<String>,

    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    #[arg(long, value_name = "PATH")]
    pub local: Option<PathBuf>,

    #[arg(long, value_parser = parse_duration)]
    pub latency: Option<Duration>,

    #[arg(short, long, action = ArgAction::Count, group = "verbosity")]
    pub verbose: u8,

    #[arg(short, long, action = ArgAction::Count, group = "verbosity")]
    pub quiet: u8,
}

pub async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.command.global());

    let result = match cli.command {
        Command::Watch(args) => watch::main(args).await,
        Command::Reconcile(args) => reconcile::main(args).await,
    };

    match result {
        Ok(summary) if summary.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger(args: &GlobalArgs) {
    let level = log_level_from_args(args.verbose, args.quiet);
    logger::init(level);
}

fn log_level_from_args(verbose: u8, quiet: u8) -> log::LevelFilter {
    let base_verbosity: i8 = verbose.try_into().unwrap_or(i8::MAX);
    let quiet_verbosity: i8 = quiet.try_into().unwrap_or(i8::MAX);
    let verbosity = base_verbosity - quiet_verbosity;
    match verbosity {
        i8::MIN..=-2 => log::LevelFilter::Error,
        -1 => log::LevelFilter::Warn,
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightMagenta.on_default())
        .usage(AnsiColor::BrightMagenta.on_default())
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightCyan.on_default())
}
