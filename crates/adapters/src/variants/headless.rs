// SPDX-License-Identifier: MIT

//! `Headless`: an always-ready one-shot CLI with no beacon and no
//! interactive hook surface — guard enforcement for this variant is OS
//! sandbox rules instead (spec.md §4.2's second adapter variant).

use crate::adapter::{AppendSystemPrompt, ReadyState, RuntimeAdapter, SpawnCommandOptions, TranscriptSummary};
use crate::error::AgentAdapterError;
use crate::guards::{render_sandbox_rules, HooksDef};
use crate::transcript;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

pub struct Headless;

#[async_trait]
impl RuntimeAdapter for Headless {
    fn id(&self) -> &'static str {
        "headless"
    }

    fn instruction_path(&self) -> &'static str {
        ".headless/SYSTEM.md"
    }

    fn build_spawn_command(&self, opts: &SpawnCommandOptions) -> String {
        let mut command = format!("hcli run --model {}", shell_quote(&opts.model));
        if let Some(AppendSystemPrompt::Path(path)) = &opts.append_system_prompt {
            command.push_str(&format!(" --system-file {}", shell_quote(&path.to_string_lossy())));
        }
        command
    }

    fn build_print_command(&self, prompt: &str, model: Option<&str>) -> Vec<String> {
        let mut argv = vec!["hcli".to_string(), "run".to_string(), "--non-interactive".to_string()];
        if let Some(model) = model {
            argv.push("--model".to_string());
            argv.push(model.to_string());
        }
        argv.push(prompt.to_string());
        argv
    }

    async fn deploy_config(&self, worktree: &Path, overlay: Option<&str>, hooks: &HooksDef) -> Result<(), AgentAdapterError> {
        crate::deploy::deploy_overlay_and_hooks(self, worktree, overlay, hooks, |h| Ok(render_sandbox_rules(h).into_bytes())).await
    }

    fn detect_ready(&self, _pane_snapshot: &str) -> ReadyState {
        // Headless CLIs run to completion in a single invocation; there is
        // no "waiting for a prompt" phase to detect.
        ReadyState::Ready
    }

    fn parse_transcript(&self, path: &Path) -> Option<TranscriptSummary> {
        transcript::parse_jsonl_transcript(path)
    }

    fn build_env(&self, resolved_model: &str) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("HCLI_MODEL".to_string(), resolved_model.to_string());
        env
    }

    fn requires_beacon_verification(&self) -> bool {
        false
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(test)]
#[path = "headless_tests.rs"]
mod tests;
