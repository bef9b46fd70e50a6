// SPDX-License-Identifier: MIT

//! `Hybrid`: a CLI with both an interactive pane mode and a one-shot print
//! mode, combining a guard-extension-language translator with
//! `detect_ready` pane-text matching (spec.md §4.2's third adapter variant).

use crate::adapter::{AppendSystemPrompt, ReadyState, RuntimeAdapter, SpawnCommandOptions, TranscriptSummary};
use crate::error::AgentAdapterError;
use crate::guards::{render_guard_extension_source, HooksDef};
use crate::transcript;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

const DIALOG_PROMPTS: &[(&str, &str)] = &[("Continue?", "y"), ("Overwrite existing file?", "y")];

pub struct Hybrid;

#[async_trait]
impl RuntimeAdapter for Hybrid {
    fn id(&self) -> &'static str {
        "hybrid"
    }

    fn instruction_path(&self) -> &'static str {
        ".hybrid/AGENTS.md"
    }

    fn build_spawn_command(&self, opts: &SpawnCommandOptions) -> String {
        let mut command = format!("hy --interactive --model {}", shell_quote(&opts.model));
        match &opts.append_system_prompt {
            Some(AppendSystemPrompt::Path(path)) => {
                command.push_str(&format!(" --system-prompt-file {}", shell_quote(&path.to_string_lossy())));
            }
            Some(AppendSystemPrompt::Text(text)) => {
                command.push_str(&format!(" --system-prompt {}", shell_quote(text)));
            }
            None => {}
        }
        command
    }

    fn build_print_command(&self, prompt: &str, model: Option<&str>) -> Vec<String> {
        let mut argv = vec!["hy".to_string(), "--print".to_string()];
        if let Some(model) = model {
            argv.push("--model".to_string());
            argv.push(model.to_string());
        }
        argv.push(prompt.to_string());
        argv
    }

    async fn deploy_config(&self, worktree: &Path, overlay: Option<&str>, hooks: &HooksDef) -> Result<(), AgentAdapterError> {
        crate::deploy::deploy_overlay_and_hooks(self, worktree, overlay, hooks, |h| Ok(render_guard_extension_source(h).into_bytes())).await
    }

    fn detect_ready(&self, pane_snapshot: &str) -> ReadyState {
        for (prompt, action) in DIALOG_PROMPTS {
            if pane_snapshot.contains(prompt) {
                return ReadyState::Dialog((*action).to_string());
            }
        }
        if pane_snapshot.contains(">>> ") {
            return ReadyState::Ready;
        }
        ReadyState::Loading
    }

    fn parse_transcript(&self, path: &Path) -> Option<TranscriptSummary> {
        transcript::parse_jsonl_transcript(path)
    }

    fn build_env(&self, resolved_model: &str) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("HYBRID_MODEL".to_string(), resolved_model.to_string());
        env
    }

    fn requires_beacon_verification(&self) -> bool {
        true
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(test)]
#[path = "hybrid_tests.rs"]
mod tests;
