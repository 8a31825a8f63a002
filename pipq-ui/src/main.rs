mod cli;
mod client;
mod hat;
mod logging;
mod ui;

#[cfg(test)]
mod test_support;

use std::fmt;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use pipq_core::bridge::{Backend, ShellPowerControl};
use pipq_core::config::{self, Config};
use pipq_core::discovery::load_library;
use pipq_core::process::PianoteqProcess;
use pipq_core::rpc::JsonRpcClient;
use pipq_core::state_monitor::{StateMonitor, DEFAULT_POLL_INTERVAL};
use pipq_core::CoreError;

use cli::CliClient;
use client::{Client, ClientError, ClientKind};
use hat::{HatClient, TerminalPanel};
use logging::{LogBuffer, LOG_BUFFER_CAPACITY};

const QUIT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "pi-pianoteq")]
#[command(version, about = "Pianoteq preset browser for the Raspberry Pi", long_about = None)]
struct Args {
    /// Client to run (cli or gfxhat); defaults to the configured client
    #[arg(long)]
    client: Option<String>,

    /// List the available clients and exit
    #[arg(long)]
    list_clients: bool,

    /// Print every configuration value with its source and exit
    #[arg(long)]
    show_config: bool,

    /// Write the default config file to the user config path and exit
    #[arg(long)]
    init_config: bool,

    /// Also list demo instruments on licensed installs
    #[arg(long)]
    include_demo: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
enum RunError {
    Client(ClientError),
    Core(CoreError),
    Io(std::io::Error),
}

impl From<ClientError> for RunError {
    fn from(e: ClientError) -> Self {
        Self::Client(e)
    }
}

impl From<CoreError> for RunError {
    fn from(e: CoreError) -> Self {
        Self::Core(e)
    }
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(e) => write!(f, "{}", e),
            Self::Core(e) => write!(f, "{}", e),
            Self::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for RunError {}

fn create_client(
    kind: ClientKind,
    logs: &LogBuffer,
    quit: &Arc<AtomicBool>,
) -> Result<Box<dyn Client>, ClientError> {
    log::info!("using {} client", kind.name());
    Ok(match kind {
        ClientKind::Cli => Box::new(CliClient::new(logs.clone(), Arc::clone(quit))?),
        ClientKind::Gfxhat => {
            let panel = TerminalPanel::new(Arc::clone(quit))?;
            Box::new(HatClient::new(panel, Arc::clone(quit)))
        }
    })
}

fn run(args: &Args, config: &Config, logs: &LogBuffer) -> Result<(), RunError> {
    let quit = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&quit);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        log::warn!("failed to install signal handler: {}", e);
    }

    let kind: ClientKind = args.client.as_deref().unwrap_or(config.client()).parse()?;
    let mut client = create_client(kind, logs, &quit)?;

    let gateway = Arc::new(JsonRpcClient::new(config.rpc_url()));
    let mut process = PianoteqProcess::from_config(config);
    if config.launch() {
        client.show_loading_message("Starting Pianoteq...")?;
        match process.version() {
            Ok(version) => log::info!("{}", version),
            Err(e) => log::warn!("could not read Pianoteq version: {}", e),
        }
        process.start()?;
    } else {
        log::info!("PIANOTEQ_LAUNCH is off, expecting Pianoteq at {}", config.rpc_url());
    }

    client.show_loading_message("Loading instruments...")?;
    let library = load_library(
        &*gateway,
        args.include_demo,
        config.api_attempts(),
        config.api_interval(),
    )?;

    let power = ShellPowerControl::new(config.shutdown_command());
    let backend = Backend::new(Arc::new(library), Arc::clone(&gateway), Box::new(power))?;
    client.attach_state_monitor(StateMonitor::start(Arc::clone(&gateway), DEFAULT_POLL_INTERVAL));
    client.set_api(Box::new(backend))?;
    client.start()?;

    // Restore the terminal before waiting on the engine.
    drop(client);
    if config.launch() {
        process.quit(&*gateway, QUIT_TIMEOUT);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.list_clients {
        for kind in ClientKind::ALL {
            println!("{:<8} {}", kind.name(), kind.description());
        }
        return ExitCode::SUCCESS;
    }

    if args.init_config {
        let Some(path) = config::user_config_path() else {
            eprintln!("No config directory available");
            return ExitCode::FAILURE;
        };
        return match config::init_user_config(&path) {
            Ok(message) => {
                println!("{}", message);
                ExitCode::SUCCESS
            }
            Err(message) => {
                eprintln!("{}", message);
                ExitCode::FAILURE
            }
        };
    }

    let logs = LogBuffer::new(LOG_BUFFER_CAPACITY);
    logging::init_logging(args.verbose, &logs);
    let config = Config::load();

    if args.show_config {
        for (key, value, source) in config.entries() {
            println!("{:<20} {:<40} ({})", key, value, source);
        }
        return ExitCode::SUCCESS;
    }

    match run(&args, &config, &logs) {
        Ok(()) => {
            log::info!("pi-pianoteq exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("fatal: {}", e);
            eprintln!("pi-pianoteq: {}", e);
            ExitCode::FAILURE
        }
    }
}
