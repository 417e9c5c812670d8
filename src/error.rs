use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDir,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not logged in. Run 'lane login' to authenticate")]
    NotLoggedIn,

    #[error("Could not access token at {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to connect to Lane API: {source}")]
    Connection { source: reqwest::Error },

    #[error("API returned status {status}")]
    BadStatus { status: StatusCode },

    #[error("Unexpected response from Lane API: {reason}")]
    Protocol { reason: String },

    #[error("{message}")]
    Rejected { message: String },

    #[error("Authentication timed out after {} seconds", .waited.as_secs())]
    TimedOut { waited: std::time::Duration },

    #[error("{source}")]
    Store {
        #[from]
        source: StoreError,
    },
}

/// A single poll tick that could not be classified. Never fatal on its own.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("poll request failed: {source}")]
    Transport { source: reqwest::Error },

    #[error("poll response could not be decoded: {source}")]
    Decode { source: serde_json::Error },
}

#[derive(Debug, Error, PartialEq)]
pub enum AmountError {
    #[error("Invalid amount: {input}")]
    Invalid { input: String },

    #[error("Amount must be greater than zero")]
    NotPositive,
}

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("Request failed: {source}")]
    Connection {
        #[from]
        source: reqwest::Error,
    },

    #[error("{message}")]
    Api { message: String },

    #[error("Failed to parse response: {source}")]
    Protocol {
        #[from]
        source: serde_json::Error,
    },

    #[error("Unsupported currency '{code}', expected one of: {supported}")]
    Currency { code: String, supported: String },
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("unsupported platform: {os}")]
    Unsupported { os: &'static str },

    #[error("could not open browser: {source}")]
    Browser { source: io::Error },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed {
        program: &'static str,
        status: std::process::ExitStatus,
    },
}
