//! Domain-specific error types for the setup engine.
//!
//! Internal modules return typed errors (e.g., [`FetchError`],
//! [`ResourceError`]) while command handlers at the CLI boundary convert
//! them to [`anyhow::Error`] via the standard `?` operator.
//!
//! Each layer has its own enum:
//!
//! ```text
//! ConfigError   TOML parsing, root resolution
//! TaskError     whole-run failure
//! ResourceError symlinks, preferences, packages
//! FetchError    remote ignore-list downloads
//! ```

use thiserror::Error;

/// Errors that arise from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML file contains a syntax or schema error.
    #[error("Invalid TOML in {file}: {message}")]
    InvalidSyntax {
        /// File that failed to parse.
        file: String,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The repository root could not be located.
    #[error("cannot determine dotfyles root. Use --root or set DOTFYLES_ROOT env var")]
    RootNotFound,
}

/// Errors that arise during task execution.
#[derive(Error, Debug)]
pub enum TaskError {
    /// One or more tasks of a run failed.
    #[error("{0} task(s) failed")]
    RunFailed(usize),
}

/// Errors that arise from resource operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The destination of a link is a real directory and is left alone.
    #[error("refusing to replace directory: {0}")]
    DirectoryInTheWay(String),

    /// A preference write failed.
    #[error("Preference write failed: {domain} {key}")]
    Defaults {
        /// Preference domain (e.g. `com.apple.dock`).
        domain: String,
        /// Preference key.
        key: String,
    },

    /// A package installation failed.
    #[error("Package installation failed: {package}")]
    PackageInstall {
        /// Name of the package that could not be installed.
        package: String,
        /// Underlying error from the package manager.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors that arise while downloading remote ignore lists.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP request failed (DNS, TLS, timeout, non-2xx status).
    #[error("GET {url} failed: {message}")]
    Request {
        /// URL that was requested.
        url: String,
        /// Transport or status message.
        message: String,
    },

    /// The response body could not be read as text.
    #[error("reading body of {url} failed: {message}")]
    Body {
        /// URL whose body could not be read.
        url: String,
        /// Decoder message.
        message: String,
    },
}
