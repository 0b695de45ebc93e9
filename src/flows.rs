//! The two operational flows
//!
//! `setup` renders the standard profile and scene collection and writes them
//! into the OBS settings root. `start` brings up OBS and any companion
//! programs, skipping what is already running.
//!
//! Both flows only see collaborators through their traits, so everything
//! here runs against fakes in tests.

use std::fs;
use std::io;
use std::mem;

use tracing::{info, warn};

use crate::config::render::global_ini_path;
use crate::config::writer::PlannedWrite;
use crate::config::{ConfigWriter, ConflictPolicy, IdGenerator, IniDocument, SetupModel, WriteReport, render};
use crate::constants::config;
use crate::credentials::CredentialSource;
use crate::error::{BootstrapError, BootstrapResult, Severity};
use crate::process::{LaunchResult, ProcessGate, ProcessLauncher};
use crate::settings::{LaunchTarget, Settings};

// ==============================================================================
// Setup
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupOptions {
    pub policy: ConflictPolicy,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum SetupOutcome {
    /// Dry run: what would be written, nothing touched
    Planned(Vec<PlannedWrite>),
    Written(WriteReport),
}

pub struct SetupFlow<'a> {
    pub gate: &'a ProcessGate,
    pub credentials: &'a dyn CredentialSource,
    pub writer: &'a ConfigWriter,
    pub ids: &'a dyn IdGenerator,
}

impl SetupFlow<'_> {
    /// Gate, collect the stream key, build, render, write
    ///
    /// Every file, `global.ini` included, goes out as one batch under the
    /// operator's policy: an existing `global.ini` is merged into, but only
    /// once the policy allows overwriting it.
    pub fn run(&self, settings: &Settings, options: &SetupOptions) -> BootstrapResult<SetupOutcome> {
        let obs = &settings.obs;
        if options.dry_run {
            info!("Dry run, skipping running-process check");
        } else {
            self.gate.ensure_not_running(&obs.process_name, &obs.display_name)?;
        }

        let stream_key = self
            .credentials
            .get_secret(config::STREAM_KEY)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                BootstrapError::precondition(
                    "a stream key is required; pass --stream-key-file or enter it when prompted",
                )
            })?;

        let existing = self.read_existing_global()?;
        let mut model = SetupModel::standard(&settings.setup, self.ids, stream_key)?;
        model.global = mem::take(&mut model.global).over(existing);

        let rendered = render(&model)?;
        info!(
            root = %self.writer.root().display(),
            profile = %model.profile.name,
            collection = %model.collection.name,
            files = rendered.len(),
            "Rendered setup"
        );

        if options.dry_run {
            return Ok(SetupOutcome::Planned(self.writer.plan(&rendered)?));
        }

        let report = self.writer.materialize(&rendered, options.policy)?;
        Ok(SetupOutcome::Written(report))
    }

    fn read_existing_global(&self) -> BootstrapResult<IniDocument> {
        let path = self.writer.target(&global_ini_path())?;
        match fs::read_to_string(&path) {
            Ok(text) => {
                info!(path = %path.display(), "Merging over existing global settings");
                Ok(IniDocument::parse(&text))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(IniDocument::new()),
            Err(e) => Err(BootstrapError::io(path, e)),
        }
    }
}

// ==============================================================================
// Start
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Ask OBS to go live right away
    pub stream: bool,
    pub skip_companions: bool,
}

#[derive(Debug)]
pub enum StepOutcome {
    AlreadyRunning,
    Started(LaunchResult),
    Failed(BootstrapError),
}

#[derive(Debug)]
pub struct StepReport {
    pub name: String,
    /// A failed required step makes the whole run fail
    pub required: bool,
    pub outcome: StepOutcome,
}

impl StepReport {
    pub fn severity(&self) -> Severity {
        match &self.outcome {
            StepOutcome::AlreadyRunning | StepOutcome::Started(_) => Severity::Info,
            StepOutcome::Failed(_) if self.required => Severity::Fatal,
            StepOutcome::Failed(e) => e.severity(),
        }
    }
}

#[derive(Debug, Default)]
pub struct StartReport {
    pub steps: Vec<StepReport>,
}

impl StartReport {
    pub fn severity(&self) -> Severity {
        if self.steps.iter().any(|s| s.severity() == Severity::Fatal) {
            Severity::Fatal
        } else if self.steps.iter().any(|s| s.severity() == Severity::Warning) {
            Severity::Warning
        } else {
            Severity::Info
        }
    }
}

pub struct StartFlow<'a> {
    pub gate: &'a ProcessGate,
    pub launcher: &'a ProcessLauncher,
}

impl StartFlow<'_> {
    /// Start OBS, then each companion in order
    ///
    /// A step that cannot start is recorded and the next one still runs.
    pub fn run(&self, settings: &Settings, options: &StartOptions) -> StartReport {
        let mut report = StartReport::default();

        report.steps.push(self.start_target(&settings.obs, obs_args(settings, options)));

        if options.skip_companions {
            info!(count = settings.companions.len(), "Skipping companion programs");
        } else {
            for companion in &settings.companions {
                report.steps.push(self.start_target(companion, Vec::new()));
            }
        }

        report
    }

    fn start_target(&self, target: &LaunchTarget, leading_args: Vec<String>) -> StepReport {
        let outcome = if !target.process_name.is_empty() && self.gate.is_running(&target.process_name) {
            info!(process = %target.display_name, "Already running, not starting another instance");
            StepOutcome::AlreadyRunning
        } else {
            match self.launch(target, leading_args) {
                Ok(result) => {
                    result.wait_settled(&target.display_name);
                    StepOutcome::Started(result)
                }
                Err(e) => {
                    warn!(process = %target.display_name, optional = target.optional, error = %e, "Could not start");
                    StepOutcome::Failed(e)
                }
            }
        };

        StepReport {
            name: target.display_name.clone(),
            required: !target.optional,
            outcome,
        }
    }

    fn launch(&self, target: &LaunchTarget, leading_args: Vec<String>) -> BootstrapResult<LaunchResult> {
        let descriptor = target.descriptor(leading_args);
        match self.launcher.launch(&descriptor) {
            Err(err @ BootstrapError::NotFound { .. }) => match &target.fallback_uri {
                Some(uri) => {
                    info!(process = %target.display_name, uri = %uri, "No install found, using launch URI");
                    self.launcher.launch_uri(&target.display_name, uri, descriptor.settle_delay)
                }
                None => Err(err),
            },
            other => other,
        }
    }
}

fn obs_args(settings: &Settings, options: &StartOptions) -> Vec<String> {
    let mut args = vec![
        "--profile".to_string(),
        settings.setup.profile.name.clone(),
        "--collection".to_string(),
        settings.setup.collection.name.clone(),
    ];
    if options.stream {
        args.push("--startstreaming".to_string());
    }
    if settings.minimize_to_tray {
        args.push("--minimize-to-tray".to_string());
    }
    args
}
