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

//! The two mutually exclusive CLI personalities
//!
//! The device exposes either a flat classical command mode or a hierarchical
//! model-driven configuration mode, signaled by an `@` in the raw prompt.
//! Every mode-dependent behavior is keyed here so that the marker character
//! is inspected in exactly one place.

/// The character whose presence in the raw prompt marks a model-driven CLI
pub const PERSONALITY_MARKER: char = '@';

/// CLI personality, determined once from the unmodified first-read prompt
/// and immutable afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Personality {
    /// Flat command mode with no distinct candidate configuration context
    Classical,
    /// Hierarchical configuration mode with exclusive/private candidate
    /// contexts requiring explicit commit or discard
    ModelDriven,
}

impl Personality {
    /// Classify from the raw, unnormalized prompt. Must run before any
    /// prompt stripping, since normalization removes the marker.
    pub fn classify(raw_prompt: &str) -> Self {
        if raw_prompt.contains(PERSONALITY_MARKER) {
            Personality::ModelDriven
        } else {
            Personality::Classical
        }
    }

    /// Both historical paging-disable syntaxes, sent unconditionally during
    /// preparation to tolerate firmware variance. Order differs per
    /// personality: the native syntax first, the escaped legacy one second.
    pub fn paging_disable_commands(&self) -> [&'static str; 2] {
        match self {
            Personality::ModelDriven => ["environment more false", "//environment no more"],
            Personality::Classical => ["environment no more", "//environment more false"],
        }
    }

    /// Terminal width command, only needed by the model-driven CLI
    pub fn terminal_width_command(&self) -> Option<&'static str> {
        match self {
            Personality::ModelDriven => Some("environment console width 512"),
            Personality::Classical => None,
        }
    }

    /// Whether a separate configuration mode exists at all
    pub fn supports_config_mode(&self) -> bool {
        matches!(self, Personality::ModelDriven)
    }

    /// Command that enters the exclusive candidate configuration context
    pub fn config_entry_command(&self) -> &'static str {
        "edit-config exclusive"
    }

    /// Default for leaving configuration mode after a command batch.
    /// Model-driven sessions must stay inside the nested context; exiting
    /// between commands would be incorrect.
    pub fn exits_config_after_batch(&self) -> bool {
        matches!(self, Personality::Classical)
    }

    /// Escape prefix forcing classical interpretation of legacy commands.
    /// The model-driven CLI reinterprets some of them otherwise.
    pub fn command_prefix(&self) -> &'static str {
        match self {
            Personality::ModelDriven => "//",
            Personality::Classical => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_from_raw_prompt() {
        assert_eq!(Personality::classify("*A:node-1#"), Personality::Classical);
        assert_eq!(
            Personality::classify("*A:node-1@>config#"),
            Personality::ModelDriven
        );
        assert_eq!(
            Personality::classify("A:admin@node-2#"),
            Personality::ModelDriven
        );
        // Holds independent of prompt length/content
        assert_eq!(Personality::classify(""), Personality::Classical);
        assert_eq!(
            Personality::classify("@"),
            Personality::ModelDriven
        );
    }

    #[test]
    fn test_paging_commands_swap_per_personality() {
        assert_eq!(
            Personality::ModelDriven.paging_disable_commands(),
            ["environment more false", "//environment no more"]
        );
        assert_eq!(
            Personality::Classical.paging_disable_commands(),
            ["environment no more", "//environment more false"]
        );
    }

    #[test]
    fn test_width_command_only_model_driven() {
        assert_eq!(
            Personality::ModelDriven.terminal_width_command(),
            Some("environment console width 512")
        );
        assert_eq!(Personality::Classical.terminal_width_command(), None);
    }

    #[test]
    fn test_command_prefix() {
        assert_eq!(Personality::ModelDriven.command_prefix(), "//");
        assert_eq!(Personality::Classical.command_prefix(), "");
    }

    #[test]
    fn test_batch_exit_defaults() {
        assert!(Personality::Classical.exits_config_after_batch());
        assert!(!Personality::ModelDriven.exits_config_after_batch());
    }
}
