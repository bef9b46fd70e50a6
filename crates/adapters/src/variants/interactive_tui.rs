// SPDX-License-Identifier: MIT

//! `InteractiveTui`: a TUI coding CLI with a status-bar readiness signal and
//! a JSON hook mechanism (spec.md §4.2's first adapter variant).

use crate::adapter::{AppendSystemPrompt, ReadyState, RuntimeAdapter, SpawnCommandOptions, TranscriptSummary};
use crate::error::AgentAdapterError;
use crate::guards::{render_json_hooks, HooksDef};
use crate::transcript;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Dialog prompts this runtime shows that the spawner must dismiss by
/// sending the paired action. Checked in order; the first match wins.
const DIALOG_PROMPTS: &[(&str, &str)] = &[
    ("Trust the files in this folder?", "1"),
    ("Do you want to proceed?", "1"),
    ("Select a theme", "\r"),
];

const LOADING_MARKERS: &[&str] = &["Loading...", "Initializing", "Starting up"];

pub struct InteractiveTui;

#[async_trait]
impl RuntimeAdapter for InteractiveTui {
    fn id(&self) -> &'static str {
        "interactive-tui"
    }

    fn instruction_path(&self) -> &'static str {
        ".claude/CLAUDE.md"
    }

    fn build_spawn_command(&self, opts: &SpawnCommandOptions) -> String {
        let mut command = format!("itui --model {} --permission-mode {}", shell_quote(&opts.model), permission_flag(opts));
        match &opts.append_system_prompt {
            Some(AppendSystemPrompt::Path(path)) => {
                command.push_str(&format!(" --append-system-prompt-file {}", shell_quote(&path.to_string_lossy())));
            }
            Some(AppendSystemPrompt::Text(text)) => {
                command.push_str(&format!(" --append-system-prompt {}", shell_quote(text)));
            }
            None => {}
        }
        command
    }

    fn build_print_command(&self, prompt: &str, model: Option<&str>) -> Vec<String> {
        let mut argv = vec!["itui".to_string(), "--print".to_string()];
        if let Some(model) = model {
            argv.push("--model".to_string());
            argv.push(model.to_string());
        }
        argv.push(prompt.to_string());
        argv
    }

    async fn deploy_config(&self, worktree: &Path, overlay: Option<&str>, hooks: &HooksDef) -> Result<(), AgentAdapterError> {
        crate::deploy::deploy_overlay_and_hooks(self, worktree, overlay, hooks, |h| {
            serde_json::to_vec_pretty(&render_json_hooks(h)).map_err(|source| AgentAdapterError::Serde { runtime: "interactive-tui".to_string(), source })
        })
        .await
    }

    fn detect_ready(&self, pane_snapshot: &str) -> ReadyState {
        for (prompt, action) in DIALOG_PROMPTS {
            if pane_snapshot.contains(prompt) {
                return ReadyState::Dialog((*action).to_string());
            }
        }
        if LOADING_MARKERS.iter().any(|m| pane_snapshot.contains(m)) {
            return ReadyState::Loading;
        }
        if pane_snapshot.contains("Esc to interrupt") || pane_snapshot.contains("? for shortcuts") {
            return ReadyState::Ready;
        }
        ReadyState::Loading
    }

    fn parse_transcript(&self, path: &Path) -> Option<TranscriptSummary> {
        transcript::parse_jsonl_transcript(path)
    }

    fn build_env(&self, resolved_model: &str) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("ITUI_MODEL".to_string(), resolved_model.to_string());
        env
    }

    fn requires_beacon_verification(&self) -> bool {
        true
    }
}

fn permission_flag(opts: &SpawnCommandOptions) -> &'static str {
    match opts.permission_mode {
        ov_core::PermissionMode::BypassPermissions => "bypassPermissions",
        ov_core::PermissionMode::Default => "default",
        ov_core::PermissionMode::Strict => "strict",
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(test)]
#[path = "interactive_tui_tests.rs"]
mod tests;
