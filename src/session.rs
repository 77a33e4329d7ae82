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

//! Interactive session state machine for the device CLI
//!
//! Tracks the normalized base prompt and the CLI personality, and drives
//! configuration-mode transitions purely from observed prompt text and
//! echoed command output. All operations are strict half-duplex turns:
//! one write, then a blocking read until a pattern matches or times out.

use tracing::{debug, info, warn};

use crate::channel::Channel;
use crate::config::SessionOptions;
use crate::detect;
use crate::error::{CliError, Result};
use crate::personality::{Personality, PERSONALITY_MARKER};

const EXIT_ALL_COMMAND: &str = "exit all";
const QUIT_CONFIG_COMMAND: &str = "quit-config";
const COMMIT_COMMAND: &str = "commit";
const DISCARD_COMMAND: &str = "discard";
const SAVE_COMMAND: &str = "/admin save";
const LOGOUT_COMMAND: &str = "logout";

/// A prepared interactive CLI session.
///
/// Construction runs the one-time preparation handshake: the read buffer is
/// flushed, the raw prompt is captured, the personality is classified from
/// it (exactly once, before any stripping), paging is disabled and the
/// terminal width set, then the buffer is drained after a settle delay.
///
/// Not designed for concurrent use; every operation takes `&mut self`.
#[derive(Debug)]
pub struct CliSession<C: Channel> {
    channel: C,
    options: SessionOptions,
    base_prompt: String,
    personality: Personality,
}

impl<C: Channel> CliSession<C> {
    /// Prepare a session over a freshly opened channel.
    ///
    /// Fails with [`CliError::Preparation`] if the initial prompt read times
    /// out or captures nothing.
    pub async fn prepare(mut channel: C, options: SessionOptions) -> Result<Self> {
        let timeout = options.read_timeout();

        // No-op read to flush any login banner
        channel.write_raw(b"\n").await?;
        channel
            .read_until_prompt(timeout)
            .await
            .map_err(|e| CliError::Preparation(e.to_string()))?;

        // Capture the raw prompt; the personality marker must be inspected
        // before normalization strips it
        channel.write_raw(b"\n").await?;
        let output = channel
            .read_until_prompt(timeout)
            .await
            .map_err(|e| CliError::Preparation(e.to_string()))?;
        let raw_prompt = output
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                CliError::Preparation("initial prompt read returned empty".to_string())
            })?;

        let personality = Personality::classify(&raw_prompt);
        let base_prompt = match detect::try_normalize_base_prompt(&raw_prompt) {
            Some(prompt) => prompt,
            None => {
                warn!(prompt = %raw_prompt, "captured prompt did not normalize, using it verbatim");
                raw_prompt.clone()
            }
        };
        debug!(%base_prompt, ?personality, "session prepared");

        let mut session = Self {
            channel,
            options,
            base_prompt,
            personality,
        };

        // Both paging syntaxes are sent unconditionally; one of them is a
        // no-op on any given firmware
        for command in session.personality.paging_disable_commands() {
            session.channel.send_command(command).await?;
        }
        if let Some(command) = session.personality.terminal_width_command() {
            session.channel.send_command(command).await?;
        }

        // Let delayed echoes land, then drop them
        tokio::time::sleep(session.options.settle_delay()).await;
        session.channel.drain().await?;

        Ok(session)
    }

    /// The normalized, context-independent prompt root
    pub fn base_prompt(&self) -> &str {
        &self.base_prompt
    }

    /// The personality classified during preparation
    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Direct access to the underlying channel
    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Send a simple non-mode-changing command and return its output
    pub async fn send_command(&mut self, command: &str) -> Result<String> {
        self.channel.send_command(command).await
    }

    /// The device has no separate privileged mode; exists only to satisfy a
    /// generic session-lifecycle contract
    pub async fn enable(&mut self) -> Result<String> {
        Ok(String::new())
    }

    /// See [`enable`](Self::enable)
    pub async fn exit_enable_mode(&mut self) -> Result<String> {
        Ok(String::new())
    }

    /// Always at maximal privilege
    pub fn check_enable_mode(&self) -> bool {
        true
    }

    /// Enter the exclusive candidate configuration context.
    ///
    /// A no-op in the classical personality, which has no separate
    /// configuration mode.
    pub async fn enter_config(&mut self) -> Result<String> {
        let command = self.personality.config_entry_command();
        self.enter_config_with(command, detect::config_entry_pattern())
            .await
    }

    /// [`enter_config`](Self::enter_config) with an explicit entry command
    /// and confirmation pattern
    pub async fn enter_config_with(
        &mut self,
        command: &str,
        pattern: &regex::Regex,
    ) -> Result<String> {
        if !self.personality.supports_config_mode() {
            return Ok(String::new());
        }
        let timeout = self.options.read_timeout();
        self.channel
            .write_raw(format!("{command}\n").as_bytes())
            .await?;
        self.channel.read_until_pattern(pattern, timeout).await
    }

    /// Whether the device is currently in a configuration context.
    ///
    /// Classical sessions answer false without any channel interaction.
    /// Model-driven sessions prod the device with a bare newline and inspect
    /// the refreshed prompt fragment.
    pub async fn check_config_active(&mut self) -> Result<bool> {
        if !self.personality.supports_config_mode() {
            return Ok(false);
        }
        let timeout = self.options.read_timeout();
        self.channel.write_raw(b"\n").await?;
        let output = self
            .channel
            .read_until_pattern(detect::marker_pattern(), timeout)
            .await?;
        Ok(detect::in_config_context(&output))
    }

    /// Leave configuration mode unconditionally, returning to the root
    /// context first.
    ///
    /// Uncommitted edits observed on the way out are discarded (with a
    /// warning, since this destroys user edits). The discard/quit-config
    /// cycle is bounded by `SessionOptions::max_exit_attempts`; exceeding it,
    /// or a residual active context afterwards, is [`CliError::ExitConfig`]
    /// because the session state model can no longer be trusted.
    pub async fn exit_config(&mut self) -> Result<String> {
        let mut output = self.exit_all().await?;
        if self.personality == Personality::ModelDriven {
            let mut fragment = output.clone();
            let mut attempts = 0;
            while detect::in_config_context(&fragment) {
                if attempts >= self.options.max_exit_attempts {
                    return Err(CliError::ExitConfig);
                }
                attempts += 1;
                if detect::has_uncommitted_changes(&fragment) {
                    warn!("uncommitted changes on config exit, discarding");
                    let discarded = self.discard().await?;
                    output.push_str(&discarded);
                }
                fragment = self.send_and_confirm(QUIT_CONFIG_COMMAND).await?;
                output.push_str(&fragment);
            }
        }
        if self.check_config_active().await? {
            return Err(CliError::ExitConfig);
        }
        Ok(output)
    }

    /// Activate uncommitted candidate edits.
    ///
    /// Returns to the root context first (a prerequisite for commit), then
    /// commits only if the dirty marker is present. Besides the context
    /// reset this is a no-op in the classical personality or when there is
    /// nothing to commit.
    pub async fn commit(&mut self) -> Result<String> {
        let mut output = self.exit_all().await?;
        if self.personality == Personality::ModelDriven && detect::has_uncommitted_changes(&output)
        {
            info!("applying uncommitted changes");
            let mut new_output = self.send_and_confirm(COMMIT_COMMAND).await?;
            // Commit can cause a secondary prompt transition; wait for the
            // marker if it has not reappeared yet
            if !new_output.contains(PERSONALITY_MARKER) {
                let timeout = self.options.read_timeout();
                new_output += &self
                    .channel
                    .read_until_pattern(detect::marker_pattern(), timeout)
                    .await?;
            }
            output.push_str(&new_output);
        }
        Ok(output)
    }

    /// Drop uncommitted candidate edits. Only active in the model-driven
    /// personality; exposed for direct use and invoked automatically by
    /// [`exit_config`](Self::exit_config) on a dirty exit.
    pub async fn discard(&mut self) -> Result<String> {
        if self.personality != Personality::ModelDriven {
            return Ok(String::new());
        }
        let mut output = self.send_and_confirm(DISCARD_COMMAND).await?;
        if !output.contains(PERSONALITY_MARKER) {
            let timeout = self.options.read_timeout();
            output += &self.channel.read_until_prompt(timeout).await?;
        }
        Ok(output)
    }

    /// Send a batch of configuration commands.
    ///
    /// `exit_after = None` resolves per personality: model-driven sessions
    /// stay inside configuration mode after the batch, classical sessions
    /// exit, matching the conventional flat command model.
    pub async fn send_config_set(
        &mut self,
        commands: &[&str],
        exit_after: Option<bool>,
    ) -> Result<String> {
        let exit_after = exit_after.unwrap_or_else(|| self.personality.exits_config_after_batch());
        let mut output = self.enter_config().await?;
        for command in commands {
            output += &self.send_and_confirm(command).await?;
        }
        if exit_after {
            output += &self.exit_config().await?;
        }
        Ok(output)
    }

    /// Persist the running configuration. Pure pass-through, no state
    /// machine interaction.
    pub async fn save_config(&mut self) -> Result<String> {
        self.channel.send_command(SAVE_COMMAND).await
    }

    /// Strip CLI decoration from command output: the trailing prompt line,
    /// and in the model-driven personality also the context breadcrumbs
    pub fn strip_output(&self, output: &str) -> String {
        let stripped = detect::strip_prompt(output, &self.base_prompt);
        match self.personality {
            Personality::ModelDriven => detect::strip_context_breadcrumbs(&stripped),
            Personality::Classical => stripped,
        }
    }

    /// Best-effort graceful teardown with the default `logout` command
    pub async fn cleanup(&mut self) {
        self.cleanup_with(LOGOUT_COMMAND).await;
    }

    /// Best-effort graceful teardown.
    ///
    /// Detection and exit failures are swallowed: the exit command is always
    /// sent as a final unconfirmed write, and a failed cleanup must not
    /// prevent session termination.
    pub async fn cleanup_with(&mut self, command: &str) {
        match self.check_config_active().await {
            Ok(true) => {
                if let Err(e) = self.exit_config().await {
                    debug!(error = %e, "config exit during cleanup failed");
                }
            }
            Ok(false) => {}
            Err(e) => debug!(error = %e, "config detection during cleanup failed"),
        }
        if let Err(e) = self.channel.write_raw(format!("{command}\n").as_bytes()).await {
            debug!(error = %e, "final exit command write failed");
        }
    }

    /// Return the remote context to root
    async fn exit_all(&mut self) -> Result<String> {
        self.send_and_confirm(EXIT_ALL_COMMAND).await
    }

    /// Write a command and read back its echo, staying in sync with the
    /// device. Degrades to waiting for a plain prompt when echo verification
    /// is disabled.
    async fn send_and_confirm(&mut self, command: &str) -> Result<String> {
        let timeout = self.options.read_timeout();
        self.channel
            .write_raw(format!("{command}\n").as_bytes())
            .await?;
        if self.options.verify_command_echo {
            let echo = detect::literal_pattern(command);
            self.channel.read_until_pattern(&echo, timeout).await
        } else {
            self.channel.read_until_prompt(timeout).await
        }
    }
}
