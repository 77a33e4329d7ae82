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

//! The character-oriented remote channel abstraction
//!
//! Transport setup (TCP/SSH handshake, authentication), read buffering and
//! session logging all live behind this trait. The session layer only ever
//! performs synchronous request/response turns over it: one write, then one
//! blocking read until a pattern matches or the timeout elapses.

use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use crate::error::Result;

/// A half-duplex character channel to the remote device.
///
/// Implementations must surface a read that does not match its pattern within
/// `timeout` as [`CliError::Timeout`](crate::CliError::Timeout); the session
/// layer treats that as protocol desynchronization and never retries it.
#[async_trait]
pub trait Channel: Send {
    /// Block until `pattern` matches the accumulated output, returning
    /// everything read so far
    async fn read_until_pattern(&mut self, pattern: &Regex, timeout: Duration) -> Result<String>;

    /// Block until the channel's generic prompt pattern matches
    async fn read_until_prompt(&mut self, timeout: Duration) -> Result<String>;

    /// Send raw bytes with no implicit newline
    async fn write_raw(&mut self, data: &[u8]) -> Result<()>;

    /// Composite write plus read-until-prompt, for simple commands that do
    /// not change the device mode
    async fn send_command(&mut self, command: &str) -> Result<String>;

    /// Discard whatever is currently buffered without blocking
    async fn drain(&mut self) -> Result<()>;
}
