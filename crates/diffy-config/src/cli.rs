//! Command line parsing and validation

use crate::{ConfigError, ConfigResult};
use clap::Parser;
use diffy_client::BackendAddr;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Default log destination
pub const DEFAULT_LOG_FILE: &str = "/logs/diffy.log";

const USAGE_EXAMPLE: &str = "\
Example:
  diffy --primary http://abc.com --candidate http://candidate:80 --port 8080

Parameters can also be defined in the environment as diffy.primary,
diffy.candidate, diffy.port, diffy.log_file and diffy.timeout_secs.
Forward mirrored traffic to the listen port; GET / or /result shows the counters.";

/// Raw command line, before validation
#[derive(Debug, Clone, Parser)]
#[command(
    name = "diffy",
    version,
    about = "Replays mirrored traffic against a primary and a candidate backend and compares the responses",
    after_help = USAGE_EXAMPLE
)]
pub struct Cli {
    /// Primary server running the current logic
    #[arg(long, env = "diffy.primary", value_name = "URL")]
    pub primary: Option<String>,

    /// Candidate server running the logic under development
    #[arg(long, env = "diffy.candidate", value_name = "URL")]
    pub candidate: Option<String>,

    /// Listen port
    #[arg(long, env = "diffy.port", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Log file, or `-` to log to stderr
    #[arg(long, env = "diffy.log_file", default_value = DEFAULT_LOG_FILE, value_name = "PATH")]
    pub log_file: PathBuf,

    /// Give up on a backend call after this many seconds (default: wait forever)
    #[arg(long, env = "diffy.timeout_secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Validated settings, fixed for the lifetime of the process
#[derive(Debug, Clone)]
pub struct Settings {
    pub primary: BackendAddr,
    pub candidate: BackendAddr,
    pub port: u16,
    pub log_target: LogTarget,
    pub timeout: Option<Duration>,
}

impl Cli {
    /// Validate the raw arguments
    pub fn into_settings(self) -> ConfigResult<Settings> {
        let primary = backend("primary", self.primary.as_deref())?;
        let candidate = backend("candidate", self.candidate.as_deref())?;

        let timeout = match self.timeout_secs {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "timeout_secs".to_string(),
                    reason: "must be greater than zero".to_string(),
                })
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let log_target = if self.log_file.as_os_str() == "-" {
            LogTarget::Stderr
        } else if self.log_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "log_file".to_string(),
                reason: "must not be empty".to_string(),
            });
        } else {
            LogTarget::File(self.log_file)
        };

        let settings = Settings {
            primary,
            candidate,
            port: self.port,
            log_target,
            timeout,
        };
        debug!(?settings, "Configuration loaded");
        Ok(settings)
    }
}

impl Settings {
    /// Address the ingress listener binds to
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn backend(name: &'static str, raw: Option<&str>) -> ConfigResult<BackendAddr> {
    match raw.map(str::trim) {
        None | Some("") => Err(ConfigError::MissingBackend { name }),
        Some(raw) => {
            BackendAddr::parse(raw).map_err(|source| ConfigError::InvalidBackend { name, source })
        }
    }
}
