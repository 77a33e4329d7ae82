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

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Deployment-tunable session knobs.
///
/// `global_delay_factor` scales the settle delay inserted after paging and
/// width commands; slow devices need a larger factor. It is a timing
/// heuristic, not a synchronization primitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Multiplier applied to all built-in settle delays
    #[serde(default = "default_delay_factor")]
    pub global_delay_factor: f64,

    /// When true, every sent command is confirmed by reading back its echo.
    /// When false, confirmation degrades to waiting for a plain prompt.
    #[serde(default = "default_verify_echo")]
    pub verify_command_echo: bool,

    /// Timeout for each blocking channel read, in seconds
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,

    /// Upper bound on discard/quit-config cycles when leaving configuration
    /// mode. Exceeding it is a fatal desynchronization.
    #[serde(default = "default_exit_attempts")]
    pub max_exit_attempts: usize,
}

fn default_delay_factor() -> f64 {
    1.0
}

fn default_verify_echo() -> bool {
    true
}

fn default_read_timeout() -> u64 {
    30
}

fn default_exit_attempts() -> usize {
    3
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            global_delay_factor: default_delay_factor(),
            verify_command_echo: default_verify_echo(),
            read_timeout_secs: default_read_timeout(),
            max_exit_attempts: default_exit_attempts(),
        }
    }
}

impl SessionOptions {
    /// Timeout applied to each blocking channel read
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Delay inserted before the defensive buffer drain at the end of
    /// session preparation (0.3s scaled by the global factor)
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs_f64(0.3 * self.global_delay_factor.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = SessionOptions::default();
        assert_eq!(opts.global_delay_factor, 1.0);
        assert!(opts.verify_command_echo);
        assert_eq!(opts.read_timeout(), Duration::from_secs(30));
        assert_eq!(opts.max_exit_attempts, 3);
    }

    #[test]
    fn test_settle_delay_scales_with_factor() {
        let mut opts = SessionOptions::default();
        assert_eq!(opts.settle_delay(), Duration::from_millis(300));

        opts.global_delay_factor = 4.0;
        assert_eq!(opts.settle_delay(), Duration::from_millis(1200));

        opts.global_delay_factor = 0.0;
        assert_eq!(opts.settle_delay(), Duration::ZERO);
    }
}
