//! Fire-and-forget process launching
//!
//! The launcher never waits for exit and never restarts anything. After a
//! successful start the caller may wait a fixed settle delay; there is no
//! readiness probing.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{BootstrapError, BootstrapResult};

/// One fixed path, or install locations tried in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutablePath {
    Single(PathBuf),
    Candidates(Vec<PathBuf>),
}

impl ExecutablePath {
    pub fn candidates(&self) -> &[PathBuf] {
        match self {
            ExecutablePath::Single(path) => std::slice::from_ref(path),
            ExecutablePath::Candidates(paths) => paths.as_slice(),
        }
    }
}

/// Built per launch attempt, never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDescriptor {
    pub display_name: String,
    pub executable: ExecutablePath,
    pub args: Vec<String>,
    pub settle_delay: Duration,
}

impl ProcessDescriptor {
    pub fn new(display_name: impl Into<String>, executable: ExecutablePath) -> Self {
        Self {
            display_name: display_name.into(),
            executable,
            args: Vec::new(),
            settle_delay: Duration::ZERO,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn settle_secs(mut self, secs: u64) -> Self {
        self.settle_delay = Duration::from_secs(secs);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchResult {
    pub started: bool,
    pub resolved_path: Option<PathBuf>,
    pub pid: Option<u32>,
    pub settle_delay: Duration,
}

impl LaunchResult {
    /// One-line description of how `display_name` came up
    pub fn summary(&self, display_name: &str) -> String {
        let mut line = match &self.resolved_path {
            Some(path) => format!("started {display_name} from {}", path.display()),
            None => format!("started {display_name} through its launch URI"),
        };
        if let Some(pid) = self.pid {
            line.push_str(&format!(" (pid {pid})"));
        }
        line
    }

    /// Block for the settle delay so the process can come up
    pub fn wait_settled(&self, display_name: &str) {
        if self.started && !self.settle_delay.is_zero() {
            info!(process = %display_name, secs = self.settle_delay.as_secs(), "Waiting for process to settle");
            thread::sleep(self.settle_delay);
        }
    }
}

/// OS boundary for starting processes
pub trait ProcessSpawner {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Start detached and return the pid
    fn spawn(&self, path: &Path, args: &[String]) -> io::Result<u32>;

    /// Hand a URI to the platform's default handler
    fn open_uri(&self, uri: &str) -> io::Result<u32>;
}

#[derive(Debug, Default)]
pub struct SystemSpawner;

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, path: &Path, args: &[String]) -> io::Result<u32> {
        let mut command = Command::new(path);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        // OBS finds its data files relative to the working directory
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            command.current_dir(dir);
        }
        let child = command.spawn()?;
        Ok(child.id())
    }

    fn open_uri(&self, uri: &str) -> io::Result<u32> {
        let child = uri_command(uri)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(child.id())
    }
}

#[cfg(target_os = "windows")]
fn uri_command(uri: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", uri]);
    command
}

#[cfg(target_os = "macos")]
fn uri_command(uri: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(uri);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn uri_command(uri: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(uri);
    command
}

pub struct ProcessLauncher {
    spawner: Box<dyn ProcessSpawner>,
}

impl ProcessLauncher {
    pub fn new(spawner: Box<dyn ProcessSpawner>) -> Self {
        Self { spawner }
    }

    pub fn system() -> Self {
        Self::new(Box::new(SystemSpawner))
    }

    /// First candidate that exists, in the given order
    pub fn resolve(&self, descriptor: &ProcessDescriptor) -> BootstrapResult<PathBuf> {
        let candidates = descriptor.executable.candidates();
        for candidate in candidates {
            if self.spawner.exists(candidate) {
                debug!(process = %descriptor.display_name, path = %candidate.display(), "Resolved executable");
                return Ok(candidate.clone());
            }
            debug!(process = %descriptor.display_name, path = %candidate.display(), "Candidate missing");
        }
        Err(BootstrapError::NotFound {
            name: descriptor.display_name.clone(),
            candidates: candidates.to_vec(),
        })
    }

    pub fn launch(&self, descriptor: &ProcessDescriptor) -> BootstrapResult<LaunchResult> {
        let path = self.resolve(descriptor)?;
        let pid = self
            .spawner
            .spawn(&path, &descriptor.args)
            .map_err(|source| BootstrapError::Launch {
                name: descriptor.display_name.clone(),
                path: path.clone(),
                source,
            })?;
        info!(process = %descriptor.display_name, pid, path = %path.display(), "Started process");
        Ok(LaunchResult {
            started: true,
            resolved_path: Some(path),
            pid: Some(pid),
            settle_delay: descriptor.settle_delay,
        })
    }

    /// Start through a URI handler instead of an executable (e.g. `steam://`)
    pub fn launch_uri(&self, display_name: &str, uri: &str, settle_delay: Duration) -> BootstrapResult<LaunchResult> {
        let pid = self
            .spawner
            .open_uri(uri)
            .map_err(|source| BootstrapError::Launch {
                name: display_name.to_string(),
                path: PathBuf::from(uri),
                source,
            })?;
        info!(process = %display_name, uri = %uri, "Opened launch URI");
        Ok(LaunchResult {
            started: true,
            resolved_path: None,
            pid: Some(pid),
            settle_delay,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Severity;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    /// Records spawns; only `existing` paths exist, `broken` ones fail to start
    #[derive(Default, Clone)]
    pub(crate) struct FakeSpawner {
        pub existing: HashSet<PathBuf>,
        pub broken: HashSet<PathBuf>,
        pub spawned: Rc<RefCell<Vec<(PathBuf, Vec<String>)>>>,
        pub opened: Rc<RefCell<Vec<String>>>,
    }

    impl FakeSpawner {
        pub(crate) fn with_existing(paths: &[&str]) -> Self {
            Self {
                existing: paths.iter().map(PathBuf::from).collect(),
                ..Self::default()
            }
        }
    }

    impl ProcessSpawner for FakeSpawner {
        fn exists(&self, path: &Path) -> bool {
            self.existing.contains(path)
        }

        fn spawn(&self, path: &Path, args: &[String]) -> io::Result<u32> {
            if self.broken.contains(path) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"));
            }
            self.spawned.borrow_mut().push((path.to_path_buf(), args.to_vec()));
            Ok(1000 + self.spawned.borrow().len() as u32)
        }

        fn open_uri(&self, uri: &str) -> io::Result<u32> {
            self.opened.borrow_mut().push(uri.to_string());
            Ok(42)
        }
    }

    fn candidates(paths: &[&str]) -> ExecutablePath {
        ExecutablePath::Candidates(paths.iter().map(PathBuf::from).collect())
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let spawner = FakeSpawner::with_existing(&[r"D:\B\x.exe"]);
        let launcher = ProcessLauncher::new(Box::new(spawner.clone()));
        let descriptor = ProcessDescriptor::new("X", candidates(&[r"C:\A\x.exe", r"D:\B\x.exe"]));

        let result = launcher.launch(&descriptor).unwrap();
        assert!(result.started);
        assert_eq!(result.resolved_path, Some(PathBuf::from(r"D:\B\x.exe")));
        assert_eq!(spawner.spawned.borrow().len(), 1);
    }

    #[test]
    fn test_candidate_order_is_respected() {
        let spawner = FakeSpawner::with_existing(&["/a/x", "/b/x"]);
        let launcher = ProcessLauncher::new(Box::new(spawner));
        let descriptor = ProcessDescriptor::new("X", candidates(&["/b/x", "/a/x"]));
        assert_eq!(launcher.resolve(&descriptor).unwrap(), PathBuf::from("/b/x"));
    }

    #[test]
    fn test_no_candidate_exists() {
        let spawner = FakeSpawner::default();
        let launcher = ProcessLauncher::new(Box::new(spawner.clone()));
        let descriptor = ProcessDescriptor::new("X", candidates(&[r"C:\A\x.exe", r"D:\B\x.exe"]));

        match launcher.launch(&descriptor).unwrap_err() {
            BootstrapError::NotFound { name, candidates } => {
                assert_eq!(name, "X");
                assert_eq!(candidates, vec![PathBuf::from(r"C:\A\x.exe"), PathBuf::from(r"D:\B\x.exe")]);
            }
            other => panic!("expected not found, got {other:?}"),
        }
        assert!(spawner.spawned.borrow().is_empty());
    }

    #[test]
    fn test_empty_candidate_list() {
        let launcher = ProcessLauncher::new(Box::new(FakeSpawner::default()));
        let descriptor = ProcessDescriptor::new("X", ExecutablePath::Candidates(Vec::new()));
        let err = launcher.launch(&descriptor).unwrap_err();
        assert!(matches!(err, BootstrapError::NotFound { ref candidates, .. } if candidates.is_empty()));
        assert_eq!(err.severity(), Severity::Warning);
    }

    #[test]
    fn test_spawn_failure_is_launch_error() {
        let mut spawner = FakeSpawner::with_existing(&["/opt/x"]);
        spawner.broken.insert(PathBuf::from("/opt/x"));
        let launcher = ProcessLauncher::new(Box::new(spawner));
        let descriptor = ProcessDescriptor::new("X", ExecutablePath::Single(PathBuf::from("/opt/x")));

        let err = launcher.launch(&descriptor).unwrap_err();
        assert!(matches!(err, BootstrapError::Launch { ref path, .. } if path == Path::new("/opt/x")));
        assert_eq!(err.severity(), Severity::Warning);
    }

    #[test]
    fn test_args_and_settle_delay_pass_through() {
        let spawner = FakeSpawner::with_existing(&["/opt/obs"]);
        let launcher = ProcessLauncher::new(Box::new(spawner.clone()));
        let descriptor = ProcessDescriptor::new("OBS", ExecutablePath::Single(PathBuf::from("/opt/obs")))
            .args(["--profile", "Streaming"])
            .settle_secs(5);

        let result = launcher.launch(&descriptor).unwrap();
        assert_eq!(result.settle_delay, Duration::from_secs(5));
        assert_eq!(
            spawner.spawned.borrow()[0].1,
            vec!["--profile".to_string(), "Streaming".to_string()]
        );
    }

    #[test]
    fn test_launch_uri() {
        let spawner = FakeSpawner::default();
        let launcher = ProcessLauncher::new(Box::new(spawner.clone()));
        let result = launcher
            .launch_uri("Game", "steam://rungameid/570", Duration::ZERO)
            .unwrap();
        assert!(result.started);
        assert_eq!(result.resolved_path, None);
        assert_eq!(spawner.opened.borrow().as_slice(), ["steam://rungameid/570".to_string()]);
    }

    #[test]
    fn test_summary_names_path_and_pid() {
        let spawner = FakeSpawner::with_existing(&["/opt/obs"]);
        let launcher = ProcessLauncher::new(Box::new(spawner.clone()));
        let descriptor = ProcessDescriptor::new("OBS", ExecutablePath::Single(PathBuf::from("/opt/obs")));

        let result = launcher.launch(&descriptor).unwrap();
        assert_eq!(result.pid, Some(1001));
        assert_eq!(result.summary("OBS"), "started OBS from /opt/obs (pid 1001)");

        let uri = launcher.launch_uri("Game", "steam://rungameid/570", Duration::ZERO).unwrap();
        assert_eq!(uri.summary("Game"), "started Game through its launch URI (pid 42)");

        let detached = LaunchResult { pid: None, ..result };
        assert_eq!(detached.summary("OBS"), "started OBS from /opt/obs");
    }

    #[test]
    fn test_zero_settle_returns_immediately() {
        let result = LaunchResult {
            started: true,
            resolved_path: None,
            pid: None,
            settle_delay: Duration::ZERO,
        };
        let before = std::time::Instant::now();
        result.wait_settled("X");
        assert!(before.elapsed() < Duration::from_secs(1));
    }
}
