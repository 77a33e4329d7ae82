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

//! Pure output-text to state-fragment inference
//!
//! There is no structured protocol: every session-state transition is
//! inferred from regex matches against noisy, buffered terminal output. Each
//! inference lives here as a pure function so it can be unit-tested against
//! literal captured transcripts without a live channel.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Output fragment marking an active exclusive-candidate configuration context
pub const CONFIG_MARKER: &str = "(ex)[";

/// Output fragment marking uncommitted edits in the candidate configuration
pub const DIRTY_MARKER: &str = "*(ex)[";

/// Literal the device prints for a missing file in `file dir` output
pub const FILE_NOT_FOUND: &str = "File Not Found";

/// Optional leading `*`, lazy core, optional personality marker, then any
/// number of `>`-introduced navigation suffixes, ending in `#`
static BASE_PROMPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*?(.*?)@?(?:>.*)*#").expect("valid base prompt pattern"));

/// Trailing context breadcrumbs the model-driven CLI appends to output:
/// optional `!`/`*` markers, an optional two-letter context tag in
/// parentheses, and a bracketed path segment on its own line(s)
static BREADCRUMB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\r\n]*!?\*?(\((ex|gl|pr|ro)\))?\[\S*\][\r\n]*").expect("valid breadcrumb pattern")
});

/// `file dir` free-space line, e.g.
/// `               3 Dir(s)               961531904 bytes free.`
static FREE_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s+\w+\s+free").expect("valid free space pattern"));

/// Fragment confirming entry into the exclusive candidate context
static CONFIG_ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(ex\)\[").expect("valid config entry pattern"));

/// The personality marker as a pattern, for reads that settle once any
/// model-driven prompt has appeared
static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new("@").expect("valid marker pattern"));

pub(crate) fn config_entry_pattern() -> &'static Regex {
    &CONFIG_ENTRY_RE
}

pub(crate) fn marker_pattern() -> &'static Regex {
    &MARKER_RE
}

/// Pattern matching a command echo literally
pub(crate) fn literal_pattern(text: &str) -> Regex {
    Regex::new(&regex::escape(text)).expect("escaped literal is a valid pattern")
}

/// Normalize a raw captured prompt to its context-independent core, or
/// `None` if the prompt pattern does not match at all.
///
/// `*A:node-1#` and `*A:node-1@>config#` both normalize to `A:node-1`.
pub fn try_normalize_base_prompt(raw_prompt: &str) -> Option<String> {
    BASE_PROMPT_RE
        .captures(raw_prompt)
        .map(|caps| caps[1].to_string())
}

/// [`try_normalize_base_prompt`] with a keep-verbatim fallback, which also
/// makes normalization idempotent: an already-normalized prompt has no
/// trailing `#` and comes back unchanged.
pub fn normalize_base_prompt(raw_prompt: &str) -> String {
    try_normalize_base_prompt(raw_prompt).unwrap_or_else(|| {
        debug!(prompt = raw_prompt, "prompt did not normalize, keeping raw");
        raw_prompt.to_string()
    })
}

/// Whether the fragment shows an active configuration context
pub fn in_config_context(output: &str) -> bool {
    output.contains(CONFIG_MARKER)
}

/// Whether the fragment shows uncommitted candidate edits
pub fn has_uncommitted_changes(output: &str) -> bool {
    output.contains(DIRTY_MARKER)
}

/// Whether a `file dir` response reports the file missing
pub fn is_file_not_found(output: &str) -> bool {
    output.contains(FILE_NOT_FOUND)
}

/// Drop a trailing line that still carries the base prompt
pub fn strip_prompt(output: &str, base_prompt: &str) -> String {
    let mut lines: Vec<&str> = output.lines().collect();
    if let Some(last) = lines.last() {
        if !base_prompt.is_empty() && last.contains(base_prompt) {
            lines.pop();
        }
    }
    lines.join("\n")
}

/// Remove the model-driven CLI's trailing context breadcrumbs
pub fn strip_context_breadcrumbs(output: &str) -> String {
    BREADCRUMB_RE.replace_all(output, "").into_owned()
}

/// Extract the free-byte count from `file dir` output
pub fn parse_free_space(output: &str) -> Option<u64> {
    FREE_SPACE_RE
        .captures(output)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Extract a file size from a `file dir` listing line of the form
/// `<date> <time> <size> <filename>`, matching the filename literally
pub fn parse_remote_file_size(output: &str, filename: &str) -> Option<u64> {
    let pattern = format!(r"\S+\s+\S+\s+(\d+)\s+{}", regex::escape(filename));
    let re = Regex::new(&pattern).ok()?;
    re.captures(output)?.get(1)?.as_str().parse().ok()
}
