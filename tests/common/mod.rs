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

//! Scripted channel mock shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Once;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing_subscriber::EnvFilter;

use mdcli::error::{CliError, Result};
use mdcli::{Channel, SessionOptions};

/// Install a fmt subscriber once so failing scenarios can be replayed with
/// `RUST_LOG=mdcli=debug`. Silent unless RUST_LOG is set.
pub fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A channel that replays pre-scripted device output.
///
/// Reads are consumed front to back; a read whose scripted output does not
/// match the requested pattern behaves like the real channel and times out.
/// Everything written is recorded for ordering assertions.
#[derive(Debug)]
pub struct ScriptedChannel {
    reads: VecDeque<String>,
    /// Raw writes, in order (includes the trailing newline the session adds)
    pub writes: Vec<String>,
    /// Commands sent through the composite send_command primitive, in order
    pub commands: Vec<String>,
}

impl ScriptedChannel {
    pub fn new<I, S>(reads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reads: reads.into_iter().map(Into::into).collect(),
            writes: Vec::new(),
            commands: Vec::new(),
        }
    }

    fn next_read(&mut self, pattern: &str, timeout: Duration) -> Result<String> {
        self.reads.pop_front().ok_or_else(|| CliError::Timeout {
            pattern: pattern.to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    async fn read_until_pattern(&mut self, pattern: &Regex, timeout: Duration) -> Result<String> {
        let output = self.next_read(pattern.as_str(), timeout)?;
        if !pattern.is_match(&output) {
            return Err(CliError::Timeout {
                pattern: pattern.as_str().to_string(),
                timeout,
            });
        }
        Ok(output)
    }

    async fn read_until_prompt(&mut self, timeout: Duration) -> Result<String> {
        self.next_read("<prompt>", timeout)
    }

    async fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.writes.push(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<String> {
        self.commands.push(command.to_string());
        self.next_read("<prompt>", Duration::from_secs(0))
    }

    async fn drain(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Options with the settle delay zeroed out so tests do not sleep
pub fn test_options() -> SessionOptions {
    init_test_logging();
    SessionOptions {
        global_delay_factor: 0.0,
        ..SessionOptions::default()
    }
}

/// Reads consumed by session preparation against a classical device
pub fn classical_prepare_reads() -> Vec<String> {
    vec![
        // banner flush
        "\n*A:node-1#".to_string(),
        // raw prompt capture
        "\n*A:node-1#".to_string(),
        // two paging-disable commands
        "*A:node-1#".to_string(),
        "*A:node-1#".to_string(),
    ]
}

/// Reads consumed by session preparation against a model-driven device
pub fn model_driven_prepare_reads() -> Vec<String> {
    vec![
        "\n*A:node-1@>config#".to_string(),
        "\n*A:node-1@>config#".to_string(),
        // two paging-disable commands plus the width command
        "A:node-1@#".to_string(),
        "A:node-1@#".to_string(),
        "A:node-1@#".to_string(),
    ]
}
