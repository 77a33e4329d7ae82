// Copyright 2026 the mdcli authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for CLI session driving and transfer verification

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while driving the device CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Initial handshake or base-prompt capture failed
    #[error("session preparation failed: {0}")]
    Preparation(String),

    /// Configuration mode could not be confirmed exited. Treated as fatal:
    /// the session state model is no longer trustworthy.
    #[error("failed to exit configuration mode")]
    ExitConfig,

    /// An expected pattern was absent from device output
    #[error("pattern '{pattern}' not found in device output")]
    Parse { pattern: String },

    /// Output matched neither expected branch of a boolean check
    #[error("unexpected output from {operation}: {output:?}")]
    UnexpectedOutput {
        operation: &'static str,
        output: String,
    },

    /// Remote file was absent when its size was requested
    #[error("unable to find file on remote system: {0}")]
    RemoteFileMissing(String),

    /// A channel read did not match its pattern within the timeout
    #[error("timed out after {timeout:?} waiting for pattern '{pattern}'")]
    Timeout { pattern: String, timeout: Duration },

    /// Transport-level channel failure
    #[error("channel error: {0}")]
    Channel(String),

    /// Local filesystem error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for CLI session operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::Preparation("initial prompt read returned empty".to_string());
        assert_eq!(
            err.to_string(),
            "session preparation failed: initial prompt read returned empty"
        );

        let err = CliError::ExitConfig;
        assert_eq!(err.to_string(), "failed to exit configuration mode");

        let err = CliError::Parse {
            pattern: r"(\d+)\s+\w+\s+free".to_string(),
        };
        assert_eq!(
            err.to_string(),
            r"pattern '(\d+)\s+\w+\s+free' not found in device output"
        );

        let err = CliError::RemoteFileMissing("config.cfg".to_string());
        assert_eq!(
            err.to_string(),
            "unable to find file on remote system: config.cfg"
        );
    }
}
