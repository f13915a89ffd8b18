//! Configuration for diffy
//!
//! Every setting can be given as a flag or, failing that, through an
//! environment variable:
//!
//! | flag             | environment          | default           |
//! |------------------|----------------------|-------------------|
//! | `--primary`      | `diffy.primary`      | required          |
//! | `--candidate`    | `diffy.candidate`    | required          |
//! | `--port`         | `diffy.port`         | `8080`            |
//! | `--log-file`     | `diffy.log_file`     | `/logs/diffy.log` |
//! | `--timeout-secs` | `diffy.timeout_secs` | no timeout        |
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use diffy_config::Cli;
//!
//! let settings = Cli::parse().into_settings()?;
//! println!("listening on {}", settings.listen_addr());
//! ```

mod cli;
mod error;

pub use cli::{Cli, LogTarget, Settings, DEFAULT_LOG_FILE, DEFAULT_PORT};
pub use error::{ConfigError, ConfigResult};
