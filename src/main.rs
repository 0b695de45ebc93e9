#![forbid(unsafe_code)]

mod config;
mod console;
mod constants;
mod credentials;
mod error;
mod flows;
mod process;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use config::{ConfigWriter, ConflictPolicy, UuidGenerator};
use console::TerminalConfirmation;
use constants::layout;
use credentials::{CredentialChain, FileCredentialSource, PromptCredentialSource};
use error::{BootstrapError, Severity};
use flows::{SetupFlow, SetupOptions, SetupOutcome, StartFlow, StartOptions, StepOutcome};
use process::{ProcessGate, ProcessLauncher};
use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "obs-bootstrap", version, about = "Provision and launch an OBS streaming setup")]
struct Cli {
    /// Settings file (default: <config dir>/obs-bootstrap/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// OBS settings root (default: <config dir>/obs-studio)
    #[arg(long, global = true)]
    obs_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the streaming profile, scene collection and global settings
    Setup(SetupArgs),
    /// Start OBS and the configured companion programs
    Start(StartArgs),
}

#[derive(Args, Debug)]
struct SetupArgs {
    /// Overwrite existing files without asking
    #[arg(long, conflicts_with = "fail_on_conflict")]
    force: bool,

    /// Abort if any target file already exists
    #[arg(long)]
    fail_on_conflict: bool,

    /// File holding the stream key
    #[arg(long)]
    stream_key_file: Option<PathBuf>,

    /// Render and list the target files without writing
    #[arg(long)]
    dry_run: bool,
}

impl SetupArgs {
    fn policy(&self) -> ConflictPolicy {
        if self.force {
            ConflictPolicy::Force
        } else if self.fail_on_conflict {
            ConflictPolicy::FailOnConflict
        } else {
            ConflictPolicy::PromptOnConflict
        }
    }
}

#[derive(Args, Debug)]
struct StartArgs {
    /// Go live as soon as OBS is up
    #[arg(long)]
    stream: bool,

    /// Only start OBS
    #[arg(long)]
    skip_companions: bool,
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    // stdout belongs to the operator-facing messages
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")?;
    Ok(())
}

fn resolve_obs_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(root) => Ok(root),
        None => dirs::config_dir()
            .map(|dir| dir.join(layout::OBS_DIR))
            .context("Could not determine the platform config directory; pass --obs-root"),
    }
}

fn run_setup(settings: &Settings, obs_root: PathBuf, args: SetupArgs) -> Severity {
    let mut credentials = CredentialChain::new();
    if let Some(path) = args.stream_key_file.clone().or_else(|| settings.stream_key_file.clone()) {
        credentials = credentials.with(Box::new(FileCredentialSource::new(path)));
    }
    let credentials = credentials.with(Box::new(PromptCredentialSource::new("Stream key")));

    let gate = ProcessGate::system();
    let writer = ConfigWriter::new(obs_root, Box::new(TerminalConfirmation));
    let flow = SetupFlow {
        gate: &gate,
        credentials: &credentials,
        writer: &writer,
        ids: &UuidGenerator,
    };
    let options = SetupOptions {
        policy: args.policy(),
        dry_run: args.dry_run,
    };

    match flow.run(settings, &options) {
        Ok(SetupOutcome::Planned(plan)) => {
            for planned in &plan {
                let note = if planned.exists { ", replaces existing file" } else { "" };
                console::info(format!(
                    "would write {} ({} bytes{note})",
                    planned.path.display(),
                    planned.bytes
                ));
            }
            console::info(format!("dry run: {} file(s), nothing written", plan.len()));
            Severity::Info
        }
        Ok(SetupOutcome::Written(report)) => {
            for path in &report.written {
                console::info(format!("wrote {}", path.display()));
            }
            console::info(format!("setup complete: {report}"));
            Severity::Info
        }
        Err(e) => {
            if let BootstrapError::PartialWrite(report) = &e {
                for path in &report.written {
                    console::warning(format!("written before the failure: {}", path.display()));
                }
            }
            console::report(&e);
            e.severity()
        }
    }
}

fn run_start(settings: &Settings, args: StartArgs) -> Severity {
    let gate = ProcessGate::system();
    let launcher = ProcessLauncher::system();
    let flow = StartFlow {
        gate: &gate,
        launcher: &launcher,
    };
    let options = StartOptions {
        stream: args.stream,
        skip_companions: args.skip_companions,
    };

    let report = flow.run(settings, &options);
    for step in &report.steps {
        match &step.outcome {
            StepOutcome::AlreadyRunning => console::info(format!("{} is already running", step.name)),
            StepOutcome::Started(result) => console::info(result.summary(&step.name)),
            StepOutcome::Failed(e) if step.required => console::fatal(e.to_string()),
            StepOutcome::Failed(e) => console::report(e),
        }
    }
    report.severity()
}

fn run(cli: Cli) -> Result<Severity> {
    let settings_path = cli.config.unwrap_or_else(Settings::default_path);
    let generated = !settings_path.exists();
    let mut settings = Settings::load(&settings_path)?;
    if generated {
        console::info(format!(
            "created default settings at {}; edit it to change the setup",
            settings_path.display()
        ));
    }
    settings.apply_env_overrides();

    match cli.command {
        Command::Setup(args) => {
            let obs_root = resolve_obs_root(cli.obs_root)?;
            info!(root = %obs_root.display(), "Using OBS settings root");
            Ok(run_setup(&settings, obs_root, args))
        }
        Command::Start(args) => Ok(run_start(&settings, args)),
    }
}

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        console::warning(format!("{e:#}"));
    }

    let cli = Cli::parse();
    match run(cli) {
        Ok(severity) if severity.exit_code() == 0 => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            console::fatal(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
