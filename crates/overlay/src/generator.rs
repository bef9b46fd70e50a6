// SPDX-License-Identifier: MIT

//! Pure rendering of an [`OverlayConfig`] into the per-agent instruction
//! file body (spec.md §4.5), plus an atomic writer carrying the same
//! canonical-root safety invariant as `ov_worktree` and `ov_adapters`.

use crate::error::OverlayError;
use crate::quality_gates::{read_only_section, writable_section};
use ov_core::{Capability, DispatchOverrides, OverlayConfig};
use std::path::Path;

const TEMPLATE: &str = include_str!("../templates/overlay.md.tmpl");

/// Render `config` into the overlay file body. Every `{{name}}` placeholder
/// in the template is replaced; none survive in the output.
pub fn render(config: &OverlayConfig) -> String {
    let mut body = TEMPLATE.to_string();
    for (placeholder, value) in substitutions(config) {
        body = body.replace(&placeholder, &value);
    }
    body
}

fn substitutions(config: &OverlayConfig) -> Vec<(String, String)> {
    vec![
        ("{{agent_name}}".to_string(), config.agent_name.clone()),
        ("{{task_id}}".to_string(), config.task_id.clone()),
        ("{{branch_name}}".to_string(), config.branch_name.clone()),
        ("{{worktree_path}}".to_string(), config.worktree_path.clone()),
        ("{{parent}}".to_string(), config.parent_agent.clone().unwrap_or_else(|| "none".to_string())),
        ("{{depth}}".to_string(), config.depth.to_string()),
        ("{{spec_path}}".to_string(), config.spec_path.clone().unwrap_or_else(|| "No spec file was provided for this task.".to_string())),
        ("{{file_scope}}".to_string(), file_scope_section(&config.file_scope)),
        ("{{expertise_domains}}".to_string(), expertise_domains_line(&config.expertise_domains)),
        ("{{preloaded_expertise_block}}".to_string(), preloaded_expertise_block(config.preloaded_expertise.as_deref())),
        ("{{can_spawn_clause}}".to_string(), can_spawn_clause(config)),
        ("{{quality_gates_section}}".to_string(), quality_gates_section(config)),
        ("{{constraints_section}}".to_string(), constraints_section(&config.capability)),
        ("{{skip_scout_directive}}".to_string(), skip_scout_directive(config.skip_scout)),
        ("{{dispatch_overrides_section}}".to_string(), dispatch_overrides_section(config.dispatch_overrides.as_ref())),
        ("{{base_role_definition}}".to_string(), config.base_role_definition.clone()),
    ]
}

fn file_scope_section(scope: &[String]) -> String {
    if scope.is_empty() {
        "No file scope was set; treat the whole worktree as in scope.".to_string()
    } else {
        scope.iter().map(|s| format!("- {s}")).collect::<Vec<_>>().join("\n")
    }
}

fn expertise_domains_line(domains: &[String]) -> String {
    if domains.is_empty() {
        "none specified".to_string()
    } else {
        domains.join(", ")
    }
}

fn preloaded_expertise_block(expertise: Option<&str>) -> String {
    match expertise {
        Some(text) => format!("\n{text}"),
        None => String::new(),
    }
}

fn can_spawn_clause(config: &OverlayConfig) -> String {
    if config.can_spawn {
        format!("You may spawn sub-agents, e.g. `overstory spawn --parent {} --capability builder \"<task>\"`.", config.agent_name)
    } else {
        "You may not spawn sub-agents; hand follow-up work back to your parent.".to_string()
    }
}

fn quality_gates_section(config: &OverlayConfig) -> String {
    if config.capability.is_write_capable() {
        writable_section(&config.quality_gates)
    } else {
        read_only_section(&config.quality_gates)
    }
}

fn constraints_section(capability: &Capability) -> String {
    if capability.is_write_capable() {
        "You may modify files within your worktree's file scope and commit your own changes.".to_string()
    } else {
        "You are read-only: report findings, do not modify files.".to_string()
    }
}

fn skip_scout_directive(skip_scout: bool) -> String {
    if skip_scout {
        "\nSkip the scouting phase; proceed directly to implementation.".to_string()
    } else {
        String::new()
    }
}

fn dispatch_overrides_section(overrides: Option<&DispatchOverrides>) -> String {
    match overrides {
        None => String::new(),
        Some(overrides) => {
            let mut lines = Vec::new();
            if overrides.skip_review {
                lines.push("Skip the review gate for this task.".to_string());
            }
            if let Some(max) = overrides.max_sub_agents {
                lines.push(format!("Spawn at most {max} sub-agent(s)."));
            }
            if lines.is_empty() {
                String::new()
            } else {
                format!("\n{}", lines.join("\n"))
            }
        }
    }
}

/// Write `body` to `path` atomically, refusing any path that resolves to
/// the canonical project root.
pub async fn write_overlay(project_root: &Path, path: &Path, body: &str) -> Result<(), OverlayError> {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let root = std::fs::canonicalize(project_root).unwrap_or_else(|_| project_root.to_path_buf());
    if resolved == root {
        return Err(OverlayError::CanonicalRoot { path: path.display().to_string() });
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|source| OverlayError::Io { path: path.display().to_string(), source })?;
    }
    let tmp_path = path.with_extension("tmp");
    tokio::fs::write(&tmp_path, body.as_bytes()).await.map_err(|source| OverlayError::Io { path: path.display().to_string(), source })?;
    tokio::fs::rename(&tmp_path, path).await.map_err(|source| OverlayError::Io { path: path.display().to_string(), source })?;
    Ok(())
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
