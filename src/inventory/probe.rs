//! Running the probe program under an extracted runtime.
//!
//! The probe prints, one per line, the file version of the core library,
//! its informational version (which ends in the source commit), and the
//! framework description. A fourth line with the environment version is
//! optional.

use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::detect::StaticSignals;
use crate::error::{NetverError, Result};
use crate::version::Version;

use super::platform::Platform;

/// Keeps the host from falling back to globally installed runtimes.
pub const MULTILEVEL_LOOKUP_VAR: &str = "DOTNET_MULTILEVEL_LOOKUP";

pub const DEFAULT_PROBE_ASSEMBLY: &str = "PrintVersion.dll";

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// What the probe printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutput {
    pub build: Version,
    pub informational_version: String,
    pub description: String,
    pub environment_version: Option<Version>,
}

impl ProbeOutput {
    /// The signals a resolver would see inside the probed process.
    pub fn signals(&self) -> StaticSignals {
        let mut signals = StaticSignals::default()
            .with_description(self.description.clone())
            .with_corelib(self.build, self.informational_version.clone());
        signals.environment_version = self.environment_version;
        signals
    }
}

/// One runtime's observed build identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredBuild {
    pub runtime_version: Version,
    pub build: Version,
    pub informational_version: String,
    pub description: String,
}

impl DiscoveredBuild {
    /// The source commit: the token after the last space of the
    /// informational version.
    pub fn commit(&self) -> &str {
        commit_token(&self.informational_version)
    }

    /// The signals this runtime presents at run time.
    pub fn signals(&self) -> StaticSignals {
        StaticSignals::default()
            .with_description(self.description.clone())
            .with_corelib(self.build, self.informational_version.clone())
    }
}

pub(crate) fn commit_token(informational_version: &str) -> &str {
    informational_version
        .rsplit(' ')
        .next()
        .unwrap_or(informational_version)
}

/// Turns an extracted runtime directory into a [`DiscoveredBuild`].
pub trait BuildProbe: Send + Sync {
    fn probe(&self, runtime_dir: &Path, runtime_version: Version) -> Result<DiscoveredBuild>;
}

/// [`BuildProbe`] that runs the real probe program.
#[derive(Debug, Clone)]
pub struct ProbeRunner {
    probe_root: PathBuf,
    assembly: String,
    platform: Platform,
    timeout: Duration,
}

impl ProbeRunner {
    pub fn new(probe_root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            probe_root: probe_root.into(),
            assembly: DEFAULT_PROBE_ASSEMBLY.to_string(),
            platform,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_assembly(mut self, assembly: impl Into<String>) -> Self {
        self.assembly = assembly.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `<probe_root>/netcoreapp<major>.<minor>/<assembly>`.
    pub fn artifact_path(&self, runtime_version: Version) -> PathBuf {
        self.probe_root
            .join(format!(
                "netcoreapp{}.{}",
                runtime_version.major(),
                runtime_version.minor()
            ))
            .join(&self.assembly)
    }

    pub fn executable_path(&self, runtime_dir: &Path) -> PathBuf {
        runtime_dir.join(self.platform.host_executable())
    }
}

impl BuildProbe for ProbeRunner {
    fn probe(&self, runtime_dir: &Path, runtime_version: Version) -> Result<DiscoveredBuild> {
        let executable = self.executable_path(runtime_dir);
        let artifact = self.artifact_path(runtime_version);
        tracing::debug!("Probing {} with {}", runtime_version, artifact.display());

        let output = run_probe(&executable, &artifact, self.timeout)?;
        Ok(DiscoveredBuild {
            runtime_version,
            build: output.build,
            informational_version: output.informational_version,
            description: output.description,
        })
    }
}

/// Run `executable artifact` and parse what it prints.
pub fn run_probe(executable: &Path, artifact: &Path, timeout: Duration) -> Result<ProbeOutput> {
    let mut child = Command::new(executable)
        .arg(artifact)
        .env(MULTILEVEL_LOOKUP_VAR, "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| anyhow::anyhow!("Failed to start {}: {}", executable.display(), e))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_handle = thread::spawn(move || read_all(stdout));
    let stderr_handle = thread::spawn(move || read_all(stderr));

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(NetverError::ProbeTimeout {
                runtime: executable.to_path_buf(),
                seconds: timeout.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    if !status.success() {
        if !stderr.trim().is_empty() {
            tracing::debug!("Probe stderr:\n{}", stderr.trim_end());
        }
        return Err(NetverError::ProbeFailed {
            runtime: executable.to_path_buf(),
            code: status.code(),
        });
    }

    parse_probe_output(&stdout).map_err(|message| NetverError::ProbeOutput {
        runtime: executable.to_path_buf(),
        message,
    })
}

fn read_all(pipe: Option<impl Read>) -> String {
    let mut buffer = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buffer);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Parse probe stdout. Lines may end in CR, LF or both; blank lines are
/// ignored.
pub fn parse_probe_output(stdout: &str) -> std::result::Result<ProbeOutput, String> {
    let lines: Vec<&str> = stdout
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .collect();

    let [build, informational, description, rest @ ..] = lines.as_slice() else {
        return Err(format!("expected at least 3 lines, got {}", lines.len()));
    };

    let build: Version = build
        .trim()
        .parse()
        .map_err(|e| format!("bad build identifier: {}", e))?;

    let environment_version = match rest.first() {
        Some(line) => Some(
            line.trim()
                .parse()
                .map_err(|e| format!("bad environment version: {}", e))?,
        ),
        None => None,
    };

    Ok(ProbeOutput {
        build,
        informational_version: informational.trim().to_string(),
        description: description.trim().to_string(),
        environment_version,
    })
}
