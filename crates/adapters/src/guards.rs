// SPDX-License-Identifier: MIT

//! Guard deployment: translating a common [`HooksDef`] into each runtime's
//! native permission-boundary mechanism (spec.md §4.2 "Guard deployment",
//! §9's "hook generation that currently targets several distinct on-disk
//! formats").
//!
//! Every translator is a pure function of the `HooksDef` and the shared rule
//! tables below — no filesystem access beyond whatever the caller does with
//! the returned string, no network. Regardless of the on-disk mechanism, the
//! seven guard rules in spec.md §4.2 are encoded identically everywhere.

use ov_core::Capability;

/// Tools that delegate to a sub-agent via the runtime's own native
/// team/task-tool surface. Always blocked — delegation must go through the
/// spawner (guard rule 1).
pub const NATIVE_DELEGATION_TOOLS: &[&str] = &["Task", "TeamCreate", "SubAgent", "Dispatch"];

/// Tools that require a human to be present at a terminal. Always blocked —
/// escalation must go through mail instead (guard rule 2).
pub const HUMAN_INTERACTION_TOOLS: &[&str] = &["AskHuman", "RequestApproval", "Prompt"];

/// Tools that modify files on disk. Blocked for every capability except
/// those [`Capability::is_write_capable`] returns true for (guard rule 3).
pub const FILE_MODIFYING_TOOLS: &[&str] = &["Write", "Edit", "MultiEdit", "NotebookEdit"];

/// Read-only inspection commands, quality-gate commands, and ecosystem
/// sibling CLIs that are always safe to run even for non-implementation
/// agents (guard rule 6: consulted before the dangerous-pattern blocklist).
pub const SAFE_PREFIXES: &[&str] = &[
    "git status",
    "git diff",
    "git log",
    "git show",
    "git branch --list",
    "cat ",
    "ls ",
    "rg ",
    "grep ",
    "cargo check",
    "cargo build",
    "cargo test",
    "cargo clippy",
    "cargo fmt --check",
    "ov-issues ",
    "ov-expertise ",
];

/// Dangerous universal shell patterns blocked for every capability (guard
/// rule 5): pushing to remote, destructive resets, non-conforming branch
/// creation.
pub const DANGEROUS_PATTERNS: &[&str] = &[
    "git push",
    "git reset --hard",
    "git clean -fd",
    "git branch -D",
    "git checkout -B",
    "rm -rf /",
    "git rebase -i",
];

/// Narrow git operations granted to coordination capabilities for metadata
/// sync (guard rule 7).
pub const COORDINATION_GIT_EXCEPTIONS: &[&str] = &["git add", "git commit"];

/// Paths universally exempt from the worktree path-boundary check (guard
/// rule 4).
pub const PATH_BOUNDARY_EXCEPTIONS: &[&str] = &["/dev/", "/tmp/"];

/// The inputs to every guard translator: agent identity, capability,
/// worktree path, and any per-spawn quality-gate commands the overlay also
/// renders into the instruction file.
#[derive(Debug, Clone)]
pub struct HooksDef {
    pub agent_name: String,
    pub capability: Capability,
    pub worktree_path: String,
    pub quality_gate_commands: Vec<String>,
}

impl HooksDef {
    /// Whether a shell command string is allowed for this agent, applying
    /// guard rules 1, 2, 5, 6, 7 (rules 3 and 4 are tool/path-specific and
    /// checked separately by [`HooksDef::is_write_tool_allowed`] /
    /// [`HooksDef::is_path_allowed`]).
    pub fn command_is_allowed(&self, command: &str) -> bool {
        let trimmed = command.trim();
        if DANGEROUS_PATTERNS.iter().any(|p| trimmed.starts_with(p)) {
            return false;
        }
        if self.capability.has_coordination_git_exception()
            && COORDINATION_GIT_EXCEPTIONS.iter().any(|p| trimmed.starts_with(p))
        {
            return true;
        }
        if self.capability.is_write_capable() {
            return true;
        }
        SAFE_PREFIXES.iter().any(|p| trimmed.starts_with(p))
            || self.quality_gate_commands.iter().any(|g| trimmed.starts_with(g.as_str()))
    }

    /// Whether a tool invocation by name is allowed (guard rules 1-3).
    pub fn tool_is_allowed(&self, tool_name: &str) -> bool {
        if NATIVE_DELEGATION_TOOLS.contains(&tool_name) || HUMAN_INTERACTION_TOOLS.contains(&tool_name) {
            return false;
        }
        if FILE_MODIFYING_TOOLS.contains(&tool_name) {
            return self.capability.is_write_capable();
        }
        true
    }

    /// Guard rule 4: writes may only target paths under the agent's
    /// worktree, except `/dev/*` and `/tmp/*`.
    pub fn path_is_allowed(&self, file_path: &str) -> bool {
        if PATH_BOUNDARY_EXCEPTIONS.iter().any(|prefix| file_path.starts_with(prefix)) {
            return true;
        }
        file_path.starts_with(&self.worktree_path)
    }
}

/// Serialize `HooksDef` into a JSON hook-configuration document, the
/// mechanism used by [`crate::variants::InteractiveTui`]: `before`/`after`
/// tool-call commands that shell out to the `tool-start`/`tool-end` hook
/// commands from spec.md §6.
pub fn render_json_hooks(hooks: &HooksDef) -> serde_json::Value {
    serde_json::json!({
        "hooks": {
            "before_tool_call": {
                "command": format!("ov hook tool-start {} {{tool_name}}", hooks.agent_name),
            },
            "after_tool_call": {
                "command": format!("ov hook tool-end {} {{tool_name}}", hooks.agent_name),
            },
            "session_end": {
                "command": format!("ov hook session-end {}", hooks.agent_name),
            },
        },
        "blocked_tools": NATIVE_DELEGATION_TOOLS.iter().chain(HUMAN_INTERACTION_TOOLS.iter()).collect::<Vec<_>>(),
        "file_modifying_tools_allowed": hooks.capability.is_write_capable(),
        "worktree_path": hooks.worktree_path,
        "quality_gates": hooks.quality_gate_commands,
    })
}

/// Render a guard-extension-language source file (the mechanism used by
/// [`crate::variants::Hybrid`]): a deterministic string builder with a tiny
/// escaping helper, no templating engine, matching spec.md §9's "serializers
/// emit ... source code for a sibling extension language ... via
/// deterministic string builders with escaping helpers".
pub fn render_guard_extension_source(hooks: &HooksDef) -> String {
    let mut out = String::new();
    out.push_str("// auto-generated guard extension — do not edit by hand\n");
    out.push_str(&format!("export const agentName = {};\n", quote(&hooks.agent_name)));
    out.push_str(&format!("export const worktreePath = {};\n", quote(&hooks.worktree_path)));
    out.push_str(&format!("export const writeCapable = {};\n", hooks.capability.is_write_capable()));
    out.push_str("export const blockedTools = [\n");
    for tool in NATIVE_DELEGATION_TOOLS.iter().chain(HUMAN_INTERACTION_TOOLS.iter()) {
        out.push_str(&format!("  {},\n", quote(tool)));
    }
    out.push_str("];\n");
    out.push_str("export const dangerousPatterns = [\n");
    for pattern in DANGEROUS_PATTERNS {
        out.push_str(&format!("  {},\n", quote(pattern)));
    }
    out.push_str("];\n");
    out.push_str("export const safePrefixes = [\n");
    for prefix in SAFE_PREFIXES.iter().chain(hooks.quality_gate_commands.iter().map(|s| s.as_str())) {
        out.push_str(&format!("  {},\n", quote(prefix)));
    }
    out.push_str("];\n");
    out.push_str(&format!(
        "export function beforeToolCall(tool) {{ return tool !== {} ? true : writeCapable; }}\n",
        quote("Write")
    ));
    out
}

/// Render an OS-sandbox rule document (the mechanism used by
/// [`crate::variants::Headless`], which has no interactive hook surface).
pub fn render_sandbox_rules(hooks: &HooksDef) -> String {
    let mut out = String::new();
    out.push_str("(version 1)\n(deny default)\n");
    out.push_str(&format!("(allow file-write* (subpath {}))\n", quote(&hooks.worktree_path)));
    for exception in PATH_BOUNDARY_EXCEPTIONS {
        out.push_str(&format!("(allow file-write* (subpath {}))\n", quote(exception)));
    }
    out.push_str("(allow file-read*)\n");
    out.push_str("(allow process-exec)\n");
    out
}

/// Minimal single-line-string escaper shared by both source-emitting
/// translators.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
#[path = "guards_tests.rs"]
mod tests;
